//! Rulefilter: rule-table filtering for syntax-based machine translation
//!
//! Prunes the rules of a synchronous-grammar rule table whose source side
//! cannot match any sentence of a given input text, so the decoder only
//! loads rules it could use.

// Core modules (algorithm-first approach)
pub mod bytes; // Byte-level field splitting
pub mod corpus; // Input text loading and cleaning
pub mod filter; // Streaming filter driver
pub mod index; // N-gram occurrence index
pub mod matcher; // Segment matching against the index
pub mod rule; // Rule-table line parsing
pub mod segment; // Right-hand side segmentation

/// N-gram order used when none is given
pub const DEFAULT_MAX_NGRAM: usize = 10;

// Re-exports for convenience
pub use corpus::{Corpus, CorpusError, InputFormat, Sentence};
pub use filter::{Decision, FilterConfig, FilterError, FilterStats, RuleFilter};
pub use index::{OccurrenceIndex, SentenceId};
pub use matcher::Matcher;
pub use rule::{Rule, RuleError, Symbol};
pub use segment::{Segment, segment_rhs};
