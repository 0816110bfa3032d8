//! Line tokenizer and token type classifier shared by all file readers.
//!
//! JANA output is whitespace delimited with irregular padding. Every token is
//! inferred as an integer, a float, or a label, trying integer first so that
//! `"7"` stays an integer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A classified token from a JANA output line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    Integer(i64),
    Float(f64),
    Label(String),
}

impl Token {
    /// Classify a single raw token
    pub fn classify(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            return Token::Integer(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Token::Float(f);
        }
        Token::Label(raw.to_string())
    }

    /// True when the token is neither integer- nor float-parseable
    pub fn is_label(&self) -> bool {
        matches!(self, Token::Label(_))
    }

    /// Numeric value of the token, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Token::Integer(i) => Some(*i as f64),
            Token::Float(f) => Some(*f),
            Token::Label(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Token::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            Token::Label(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(i) => write!(f, "{i}"),
            Token::Float(x) => write!(f, "{x}"),
            Token::Label(s) => write!(f, "{s}"),
        }
    }
}

/// Split a raw line into its non-empty tokens
pub fn clean_line(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Split and classify every token of a line
pub fn classify_line(line: &str) -> Vec<Token> {
    clean_line(line).into_iter().map(Token::classify).collect()
}

/// Whether a raw token is numeric (integer or float)
pub fn is_numeric(raw: &str) -> bool {
    !Token::classify(raw).is_label()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_before_float() {
        assert_eq!(Token::classify("42"), Token::Integer(42));
        assert_eq!(Token::classify("-3"), Token::Integer(-3));
        assert_eq!(Token::classify("4.2"), Token::Float(4.2));
        assert_eq!(Token::classify("7.0"), Token::Float(7.0));
        assert_eq!(Token::classify("1e-3"), Token::Float(0.001));
    }

    #[test]
    fn test_labels() {
        for raw in ["lambda", "cell", "x1", "Xmmm(0b0)s00", "4.2.1", "1,5"] {
            let token = Token::classify(raw);
            assert!(token.is_label(), "{raw} should be a label");
            assert_eq!(token, Token::Label(raw.to_string()));
        }
    }

    #[test]
    fn test_clean_line_strips_padding_and_newline() {
        let tokens = clean_line("   1    0  -2\t 1   12.500 \n");
        assert_eq!(tokens, vec!["1", "0", "-2", "1", "12.500"]);
        assert!(clean_line("   \n").is_empty());
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(Token::Integer(5).as_f64(), Some(5.0));
        assert_eq!(Token::Float(2.5).as_i64(), None);
        assert_eq!(Token::Label("a".into()).as_f64(), None);
        assert_eq!(Token::Label("a".into()).as_label(), Some("a"));
        assert!(is_numeric("0.25"));
        assert!(!is_numeric("wmatrix"));
    }

    #[test]
    fn test_classify_line() {
        let tokens = classify_line("lambda 1.540593 10 ");
        assert_eq!(
            tokens,
            vec![
                Token::Label("lambda".into()),
                Token::Float(1.540593),
                Token::Integer(10)
            ]
        );
    }
}
