//! Segmentation of a source right-hand side
//!
//! A right-hand side is reduced to alternating runs of fixed words and
//! gaps. Word runs become n-gram lookup keys (split so no key is longer
//! than the index order); runs of nonterminals collapse into a single gap
//! that must cover at least one input word per nonterminal.

use crate::rule::Symbol;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Consecutive terminals, at most N of them
    NGram(Vec<String>),
    /// Consecutive nonterminals; the number of words they must cover at least
    Gap(usize),
}

impl Segment {
    pub fn is_ngram(&self) -> bool {
        matches!(self, Segment::NGram(_))
    }

    /// Minimum number of input words the segment consumes
    pub fn min_span(&self) -> usize {
        match self {
            Segment::NGram(words) => words.len(),
            Segment::Gap(width) => *width,
        }
    }
}

/// Split a right-hand side into n-gram and gap segments
pub fn segment_rhs(rhs: &[Symbol], max_n: usize) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut terminals: Vec<String> = Vec::new();
    let mut gap_width = 0;

    for symbol in rhs {
        match symbol {
            Symbol::NonTerminal(_) => {
                if !terminals.is_empty() {
                    segments.push(Segment::NGram(std::mem::take(&mut terminals)));
                }
                gap_width += 1;
            }
            Symbol::Terminal(word) => {
                if gap_width > 0 {
                    segments.push(Segment::Gap(gap_width));
                    gap_width = 0;
                }
                terminals.push(word.clone());
                if terminals.len() >= max_n {
                    segments.push(Segment::NGram(std::mem::take(&mut terminals)));
                }
            }
        }
    }

    // At most one accumulator is non-empty here
    if gap_width > 0 {
        segments.push(Segment::Gap(gap_width));
    } else if !terminals.is_empty() {
        segments.push(Segment::NGram(terminals));
    }

    segments
}
