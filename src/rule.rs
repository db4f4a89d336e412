//! Rule-table lines
//!
//! Only the source side of a rule is decoded. Field 0 of a line holds the
//! source pattern as space-separated tokens: quoted tokens are terminals,
//! `x<digit>` tokens are nonterminal slots, and `@` ends the pattern (the
//! rest is the left-hand side). Field 3 may carry the rule counts.

use crate::bytes::{split_fields, trim_line_end};
use bstr::ByteSlice;
use std::fmt;
use thiserror::Error;

/// Sentence-start marker used by glue rules
pub const SENTENCE_START: &str = "<s>";
/// Sentence-end marker used by glue rules
pub const SENTENCE_END: &str = "</s>";

/// Error while parsing a rule-table line
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Rule error at line {line}: invalid rule count {value:?}")]
    InvalidCount { line: usize, value: String },
}

/// One symbol of a source right-hand side
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A literal source word
    Terminal(String),
    /// A gap of one source span; the label is kept only for display
    NonTerminal(String),
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::NonTerminal(_))
    }

    /// The word of a terminal
    pub fn word(&self) -> Option<&str> {
        match self {
            Symbol::Terminal(word) => Some(word),
            Symbol::NonTerminal(_) => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(word) => write!(f, "\"{}\"", word),
            Symbol::NonTerminal(label) => write!(f, "[{}]", label),
        }
    }
}

/// What a single source-side token means
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceToken {
    Symbol(Symbol),
    /// `@`: the source pattern ends here
    End,
    /// Tree brackets, node labels and other decoration
    Skip,
}

/// Decode one token of a rule's source field
pub fn decode_token(token: &str) -> SourceToken {
    let bytes = token.as_bytes();
    if bytes.len() < 2 {
        return if token == "@" {
            SourceToken::End
        } else {
            SourceToken::Skip
        };
    }
    if bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"' {
        let word = &token[1..token.len() - 1];
        return SourceToken::Symbol(Symbol::Terminal(word.to_string()));
    }
    if bytes[0] == b'x' && bytes[1].is_ascii_digit() {
        let label = match token.get(3..) {
            Some(label) if !label.is_empty() => label,
            _ => "X",
        };
        return SourceToken::Symbol(Symbol::NonTerminal(label.to_string()));
    }
    SourceToken::Skip
}

/// Decode a rule's source field into its right-hand side
pub fn parse_source(field: &str) -> Vec<Symbol> {
    let mut rhs = Vec::new();
    for token in field.split(' ') {
        match decode_token(token) {
            SourceToken::Symbol(symbol) => rhs.push(symbol),
            SourceToken::End => break,
            SourceToken::Skip => {}
        }
    }
    rhs
}

/// The parts of a rule-table line the filter looks at
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub rhs: Vec<Symbol>,
    pub count: Option<f64>,
}

impl Rule {
    /// Parse one line of a rule table; `line_num` is used for errors only
    pub fn parse(line: &[u8], line_num: usize) -> Result<Self, RuleError> {
        let line = trim_line_end(line);
        let fields = split_fields(line);
        let rhs = parse_source(&fields[0].to_str_lossy());

        let mut count = None;
        if let Some(counts) = fields.get(3) {
            let counts: Vec<&[u8]> = counts.fields().collect();
            if let [_, _, value] = counts.as_slice() {
                let value = value.to_str_lossy();
                let parsed = value.parse::<f64>().map_err(|_| RuleError::InvalidCount {
                    line: line_num,
                    value: value.to_string(),
                })?;
                count = Some(parsed);
            }
        }

        Ok(Self { rhs, count })
    }

    /// A rule with at least one nonterminal on its source side
    pub fn is_non_initial(&self) -> bool {
        is_non_initial(&self.rhs)
    }
}

pub fn is_non_initial(rhs: &[Symbol]) -> bool {
    rhs.iter().any(Symbol::is_nonterminal)
}

/// Glue rules: starting with `<s>` or ending with `</s>`
pub fn is_boundary_anchored(rhs: &[Symbol]) -> bool {
    let starts = rhs.first().and_then(Symbol::word) == Some(SENTENCE_START);
    let ends = rhs.last().and_then(Symbol::word) == Some(SENTENCE_END);
    starts || ends
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(word: &str) -> Symbol {
        Symbol::Terminal(word.to_string())
    }

    fn nt(label: &str) -> Symbol {
        Symbol::NonTerminal(label.to_string())
    }

    #[test]
    fn test_decode_terminal() {
        assert_eq!(decode_token("\"dog\""), SourceToken::Symbol(t("dog")));
        assert_eq!(decode_token("\"\""), SourceToken::Symbol(t("")));
        assert_eq!(decode_token("\"x0\""), SourceToken::Symbol(t("x0")));
        assert_eq!(decode_token("\"[NP]\""), SourceToken::Symbol(t("[NP]")));
    }

    #[test]
    fn test_bracketed_terminal_stays_terminal() {
        // Quoting decides the symbol kind, not the brackets around the word
        let rule = Rule::parse(b"\"[NP]\" \"dog\" ||| a ||| p ||| 1 1 0.1\n", 1).unwrap();
        assert_eq!(rule.rhs, vec![t("[NP]"), t("dog")]);
        assert!(!rule.is_non_initial());

        let segments = crate::segment::segment_rhs(&rule.rhs, 10);
        assert_eq!(
            segments,
            vec![crate::segment::Segment::NGram(vec![
                "[NP]".to_string(),
                "dog".to_string()
            ])]
        );
    }

    #[test]
    fn test_decode_nonterminal() {
        assert_eq!(decode_token("x0"), SourceToken::Symbol(nt("X")));
        assert_eq!(decode_token("x0:"), SourceToken::Symbol(nt("X")));
        assert_eq!(decode_token("x0:NP"), SourceToken::Symbol(nt("NP")));
        assert_eq!(decode_token("x1:JJ"), SourceToken::Symbol(nt("JJ")));
    }

    #[test]
    fn test_decode_end_and_skip() {
        assert_eq!(decode_token("@"), SourceToken::End);
        assert_eq!(decode_token(""), SourceToken::Skip);
        assert_eq!(decode_token("("), SourceToken::Skip);
        assert_eq!(decode_token("NP"), SourceToken::Skip);
        assert_eq!(decode_token("xa"), SourceToken::Skip);
        assert_eq!(decode_token("\"dog"), SourceToken::Skip);
    }

    #[test]
    fn test_parse_source_hiero() {
        let rhs = parse_source("\"the\" x0:JJ \"dog\" @ NP");
        assert_eq!(rhs, vec![t("the"), nt("JJ"), t("dog")]);
    }

    #[test]
    fn test_parse_source_tree() {
        // Tree-to-string rules carry brackets and node labels
        let rhs = parse_source("NP ( DT ( \"the\" ) x0:NN ) ");
        assert_eq!(rhs, vec![t("the"), nt("NN")]);
    }

    #[test]
    fn test_parse_source_double_space() {
        let rhs = parse_source("\"a\"  \"b\"");
        assert_eq!(rhs, vec![t("a"), t("b")]);
    }

    #[test]
    fn test_parse_rule_with_count() {
        let line = b"\"the\" x0 @ X ||| \"le\" x0 @ X ||| p=0.5 ||| 1 1 2.5 ||| 0-0\n";
        let rule = Rule::parse(line, 1).unwrap();
        assert_eq!(rule.rhs, vec![t("the"), nt("X")]);
        assert_eq!(rule.count, Some(2.5));
        assert!(rule.is_non_initial());
    }

    #[test]
    fn test_parse_rule_count_field_last() {
        let rule = Rule::parse(b"\"a\" ||| \"b\" ||| p=1 ||| 1 1 3\n", 1).unwrap();
        assert_eq!(rule.count, Some(3.0));
    }

    #[test]
    fn test_parse_rule_without_count() {
        // Too few fields
        let rule = Rule::parse(b"\"a\" ||| \"b\" ||| p=1\n", 1).unwrap();
        assert_eq!(rule.count, None);
        assert!(!rule.is_non_initial());

        // Field 3 present but not three subfields
        let rule = Rule::parse(b"\"a\" ||| \"b\" ||| p=1 ||| 1 2 ||| x\n", 1).unwrap();
        assert_eq!(rule.count, None);
    }

    #[test]
    fn test_parse_rule_bad_count() {
        let err = Rule::parse(b"\"a\" x0 ||| b ||| p ||| 1 1 lots\n", 7).unwrap_err();
        let RuleError::InvalidCount { line, value } = err;
        assert_eq!(line, 7);
        assert_eq!(value, "lots");
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(t("dog").to_string(), "\"dog\"");
        assert_eq!(nt("NP").to_string(), "[NP]");
    }

    #[test]
    fn test_boundary_anchored() {
        assert!(is_boundary_anchored(&[t("<s>"), nt("X")]));
        assert!(is_boundary_anchored(&[nt("X"), t("</s>")]));
        assert!(!is_boundary_anchored(&[t("</s>"), nt("X")]));
        assert!(!is_boundary_anchored(&[nt("X"), t("<s>")]));
        assert!(!is_boundary_anchored(&[]));
        // A nonterminal labelled like a marker is not a marker
        assert!(!is_boundary_anchored(&[nt("<s>")]));
    }
}
