use serde::{Deserialize, Serialize};

/// Zero-based `(row, column)` coordinate into a scoring or match matrix.
pub type MatrixCoord = (usize, usize);

/// Symbol emitted into an aligned string where one side has no counterpart.
pub const GAP_SYMBOL: u8 = b'-';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    pub data: Vec<u8>,
}

impl Sequence {
    pub fn new(id: String, data: Vec<u8>) -> Self {
        Self {
            id,
            description: None,
            data,
        }
    }

    /// Build an unnamed sequence from a literal, e.g. a command-line argument.
    pub fn from_literal(id: &str, literal: &str) -> Self {
        Self::new(id.to_string(), literal.as_bytes().to_vec())
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Upper-case copy, so that `a` and `A` compare as the same symbol.
    pub fn to_uppercase(&self) -> Self {
        Self {
            id: self.id.clone(),
            description: self.description.clone(),
            data: self.data.to_ascii_uppercase(),
        }
    }

    /// Lossy text view of the symbols for display purposes.
    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

impl AsRef<[u8]> for Sequence {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_from_literal() {
        let seq = Sequence::from_literal("a", "CTATGAA");
        assert_eq!(seq.id, "a");
        assert_eq!(seq.len(), 7);
        assert_eq!(seq.as_bytes(), b"CTATGAA");
        assert!(seq.description.is_none());
    }

    #[test]
    fn test_uppercase_keeps_metadata() {
        let seq = Sequence::from_literal("s", "acgt").with_description("demo".to_string());
        let upper = seq.to_uppercase();
        assert_eq!(upper.as_bytes(), b"ACGT");
        assert_eq!(upper.description.as_deref(), Some("demo"));
    }

    #[test]
    fn test_empty_sequence() {
        let seq = Sequence::from_literal("e", "");
        assert!(seq.is_empty());
        assert_eq!(seq.as_text(), "");
    }
}
