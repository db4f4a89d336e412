//! Streaming rule-table filter
//!
//! Reads a rule table line by line and writes out, unchanged and in order,
//! every rule that survives:
//! 1. Count pruning of non-initial rules below the threshold
//! 2. Reuse of the previous verdict when the source side repeats
//! 3. Matching against the input sentences

use crate::matcher::Matcher;
use crate::rule::{Rule, RuleError, Symbol};
use std::fmt;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Error while filtering a rule table
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Filter error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Filter settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    /// Non-initial rules with a count below this are dropped; 0 disables
    pub min_non_initial_count: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_non_initial_count: 0.0,
        }
    }
}

/// What happened to one rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Retained,
    /// Non-initial rule whose count is below the threshold
    PrunedByCount,
    /// Source side cannot match any input sentence
    Unmatched,
}

impl Decision {
    pub fn is_retained(self) -> bool {
        self == Decision::Retained
    }
}

/// Counters for one filtering run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub rules: usize,
    pub retained: usize,
    pub pruned_by_count: usize,
    pub unmatched: usize,
    /// Verdicts taken from the previous rule instead of the matcher
    pub reused: usize,
}

impl FilterStats {
    fn record(&mut self, decision: Decision) {
        self.rules += 1;
        match decision {
            Decision::Retained => self.retained += 1,
            Decision::PrunedByCount => self.pruned_by_count += 1,
            Decision::Unmatched => self.unmatched += 1,
        }
    }
}

impl fmt::Display for FilterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rules: {} retained, {} pruned by count, {} unmatched ({} verdicts reused)",
            self.rules, self.retained, self.pruned_by_count, self.unmatched, self.reused
        )
    }
}

/// Rule-table filter over a fixed set of input sentences
///
/// Rules sharing a source side are expected to be adjacent in the table,
/// as they are in a sorted table. When they are not, the verdict is simply
/// recomputed.
pub struct RuleFilter<'a> {
    matcher: Matcher<'a>,
    config: FilterConfig,
    /// Source side of the last rule that reached the matcher, and its verdict
    previous: Option<(Vec<Symbol>, bool)>,
    stats: FilterStats,
}

impl<'a> RuleFilter<'a> {
    pub fn new(matcher: Matcher<'a>, config: FilterConfig) -> Self {
        Self {
            matcher,
            config,
            previous: None,
            stats: FilterStats::default(),
        }
    }

    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    /// Decide the fate of one parsed rule
    pub fn judge(&mut self, rule: Rule) -> Decision {
        let decision = self.decide(rule);
        self.stats.record(decision);
        decision
    }

    fn decide(&mut self, rule: Rule) -> Decision {
        if let Some(count) = rule.count {
            if count < self.config.min_non_initial_count && rule.is_non_initial() {
                self.previous = None;
                return Decision::PrunedByCount;
            }
        }

        let reused = match &self.previous {
            Some((rhs, verdict)) if *rhs == rule.rhs => Some(*verdict),
            _ => None,
        };
        let verdict = match reused {
            Some(verdict) => {
                self.stats.reused += 1;
                verdict
            }
            None => {
                let verdict = self.matcher.matches_rhs(&rule.rhs);
                self.previous = Some((rule.rhs, verdict));
                verdict
            }
        };

        if verdict {
            Decision::Retained
        } else {
            Decision::Unmatched
        }
    }

    /// Filter a whole rule table
    ///
    /// Retained lines are written byte for byte, line terminator included.
    /// A malformed line aborts the run; lines already written stay written.
    pub fn filter<R: BufRead, W: Write>(
        &mut self,
        mut reader: R,
        mut writer: W,
    ) -> Result<FilterStats, FilterError> {
        self.previous = None;
        self.stats = FilterStats::default();

        let mut line = Vec::new();
        let mut line_num = 0;
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            line_num += 1;

            let rule = Rule::parse(&line, line_num)?;
            if self.judge(rule).is_retained() {
                writer.write_all(&line)?;
            }
        }

        writer.flush()?;
        Ok(self.stats)
    }
}
