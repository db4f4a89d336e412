//! Matching segmented rules against the input sentences
//!
//! A rule can only be used if some sentence contains all of its n-gram
//! segments, in order, with enough words between them for the gaps:
//! 1. Look up each n-gram segment in the occurrence index
//! 2. Intersect the sentences they occur in
//! 3. In each candidate sentence, enumerate increasing position tuples
//! 4. Accept the first tuple that satisfies the gap widths

use crate::corpus::Corpus;
use crate::index::{Occurrences, OccurrenceIndex, SentenceId};
use crate::rule::{Symbol, is_boundary_anchored};
use crate::segment::{Segment, segment_rhs};

/// Decides whether a rule's source side can match the input
pub struct Matcher<'a> {
    corpus: &'a Corpus,
    index: &'a OccurrenceIndex,
}

impl<'a> Matcher<'a> {
    pub fn new(corpus: &'a Corpus, index: &'a OccurrenceIndex) -> Self {
        Self { corpus, index }
    }

    /// N-gram order the rules are segmented with
    pub fn max_n(&self) -> usize {
        self.index.max_n()
    }

    /// Match a full right-hand side
    ///
    /// Glue rules anchored on `<s>` or `</s>` always match: the boundary
    /// markers never occur in the index.
    pub fn matches_rhs(&self, rhs: &[Symbol]) -> bool {
        if is_boundary_anchored(rhs) {
            return true;
        }
        let segments = segment_rhs(rhs, self.max_n());
        self.matches(&segments)
    }

    /// Match a segmented right-hand side
    ///
    /// Segments without any n-gram (pure gaps, or nothing at all) always
    /// match.
    pub fn matches(&self, segments: &[Segment]) -> bool {
        let mut ngram_maps: Vec<&Occurrences> = Vec::new();
        let mut ngram_lens = Vec::new();
        for segment in segments {
            if let Segment::NGram(words) = segment {
                let occurrences = self
                    .corpus
                    .lookup(words)
                    .and_then(|key| self.index.get(&key));
                let Some(occurrences) = occurrences else {
                    return false;
                };
                ngram_maps.push(occurrences);
                ngram_lens.push(words.len());
            }
        }

        if ngram_maps.is_empty() {
            return true;
        }

        candidate_sentences(&ngram_maps)
            .into_iter()
            .any(|sentence_id| {
                let sentence_len = self
                    .corpus
                    .sentence(sentence_id)
                    .map_or(0, |sentence| sentence.len());
                let lists: Vec<&[usize]> = ngram_maps
                    .iter()
                    .map(|occurrences| occurrences[&sentence_id].as_slice())
                    .collect();
                let mut tuple = Vec::with_capacity(lists.len());
                enumerate_positions(&lists, &ngram_lens, 0, &mut tuple, &mut |positions| {
                    fits(segments, positions, sentence_len)
                })
            })
    }
}

/// Sentences containing every n-gram, in ascending order
fn candidate_sentences(ngram_maps: &[&Occurrences]) -> Vec<SentenceId> {
    let Some(smallest) = ngram_maps.iter().min_by_key(|occurrences| occurrences.len()) else {
        return Vec::new();
    };
    let mut sentences: Vec<SentenceId> = smallest
        .keys()
        .copied()
        .filter(|id| ngram_maps.iter().all(|occurrences| occurrences.contains_key(id)))
        .collect();
    sentences.sort_unstable();
    sentences
}

/// Depth-first enumeration of position tuples
///
/// Position `k` is drawn from `lists[k]` and must be at least the previous
/// position plus the previous n-gram's length. Each complete tuple is
/// passed to `accept`; enumeration stops as soon as it returns true.
fn enumerate_positions<F>(
    lists: &[&[usize]],
    lens: &[usize],
    lower_bound: usize,
    tuple: &mut Vec<usize>,
    accept: &mut F,
) -> bool
where
    F: FnMut(&[usize]) -> bool,
{
    let Some((first, rest)) = lists.split_first() else {
        return accept(tuple);
    };
    // Lists are ascending, so skip straight to the lower bound
    let start = first.partition_point(|&pos| pos < lower_bound);
    for &pos in &first[start..] {
        tuple.push(pos);
        if enumerate_positions(rest, &lens[1..], pos + lens[0], tuple, accept) {
            return true;
        }
        tuple.pop();
    }
    false
}

/// Check a position tuple against the full segment sequence
///
/// Walks the segments keeping the window `[min_pos, max_pos]` in which the
/// next segment may start. A gap pushes `min_pos` forward by its width and
/// opens the window to the end of the sentence; an n-gram pins the next
/// segment to start right after it.
pub fn fits(segments: &[Segment], positions: &[usize], sentence_len: usize) -> bool {
    let mut positions = positions.iter().copied();
    let mut min_pos = 0;
    let mut max_pos = sentence_len.saturating_sub(1);

    for segment in segments {
        match segment {
            Segment::Gap(width) => {
                if min_pos + width > sentence_len {
                    return false;
                }
                min_pos += width;
                max_pos = sentence_len.saturating_sub(1);
            }
            Segment::NGram(words) => {
                let Some(pos) = positions.next() else {
                    return false;
                };
                if pos < min_pos || pos > max_pos {
                    return false;
                }
                min_pos = pos + words.len();
                max_pos = min_pos;
            }
        }
    }

    true
}
