//! N-gram occurrence index over the input sentences
//!
//! Every n-gram of order 1..=N is mapped to the sentences it occurs in, and
//! for each sentence to its start positions. Memory grows with
//! corpus size times N, which limits the filter to small or medium inputs.

use crate::corpus::Sentence;
use lasso::Spur;
use rustc_hash::FxHashMap;

/// Unique identifier for an input sentence (its line index)
pub type SentenceId = usize;

/// Start positions of an n-gram, per sentence
pub type Occurrences = FxHashMap<SentenceId, Vec<usize>>;

/// Inverted n-gram index
#[derive(Debug, Clone, Default)]
pub struct OccurrenceIndex {
    max_n: usize,
    by_ngram: FxHashMap<Vec<Spur>, Occurrences>,
}

impl OccurrenceIndex {
    /// Build an index of all n-grams up to `max_n` words long
    pub fn build(sentences: &[Sentence], max_n: usize) -> Self {
        let mut index = Self {
            max_n,
            by_ngram: FxHashMap::default(),
        };

        for (sentence_id, sentence) in sentences.iter().enumerate() {
            index.add_sentence(sentence_id, sentence);
        }

        index
    }

    /// Add every n-gram of a sentence
    fn add_sentence(&mut self, sentence_id: SentenceId, sentence: &[Spur]) {
        for n in 1..=self.max_n.min(sentence.len()) {
            // Positions are pushed in increasing order
            for (start, ngram) in sentence.windows(n).enumerate() {
                self.by_ngram
                    .entry(ngram.to_vec())
                    .or_default()
                    .entry(sentence_id)
                    .or_default()
                    .push(start);
            }
        }
    }

    /// Get the occurrences of an n-gram
    pub fn get(&self, ngram: &[Spur]) -> Option<&Occurrences> {
        self.by_ngram.get(ngram)
    }

    /// Get the start positions of an n-gram in one sentence
    pub fn positions(&self, ngram: &[Spur], sentence_id: SentenceId) -> Option<&[usize]> {
        self.get(ngram)
            .and_then(|occurrences| occurrences.get(&sentence_id))
            .map(|v| v.as_slice())
    }

    /// Highest n-gram order indexed
    pub fn max_n(&self) -> usize {
        self.max_n
    }

    /// Number of distinct n-grams
    pub fn len(&self) -> usize {
        self.by_ngram.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_ngram.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[Spur], &Occurrences)> {
        self.by_ngram
            .iter()
            .map(|(ngram, occurrences)| (ngram.as_slice(), occurrences))
    }
}
