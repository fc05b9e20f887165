//! Tagged DNA tokens and the delimiter-joined string form
//!
//! In memory every token knows the layer slot it belongs to. The string form
//! `<id>:<filename>[?bypassDNA=true]` joined by `-` is what gets hashed into
//! metadata and what [`crate::dna::parser::parse_dna`] reads back.

use crate::io::configuration::{BYPASS_DNA_FLAG, DNA_DELIMITER};
use sha2::{Digest, Sha256};
use std::fmt;

/// One layer's selection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnaToken {
    /// Index of the layer definition in the layer order
    pub slot: usize,
    /// Layer kind the element was drawn from
    pub kind: String,
    /// Catalog id of the selected element
    pub element_id: usize,
    /// File name of the selected element
    pub filename: String,
    /// Excluded from uniqueness comparison
    pub bypass: bool,
}

impl fmt::Display for DnaToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.element_id, self.filename)?;
        if self.bypass {
            write!(f, "?{BYPASS_DNA_FLAG}")?;
        }
        Ok(())
    }
}

/// Ordered selections of one edition attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Dna {
    /// Tokens in layer draw order
    pub tokens: Vec<DnaToken>,
}

impl Dna {
    /// Create an empty DNA
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no layer selected anything
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token bound to a layer slot
    pub fn token_for_slot(&self, slot: usize) -> Option<&DnaToken> {
        self.tokens.iter().find(|t| t.slot == slot)
    }

    /// Full string form
    pub fn encode(&self) -> String {
        join_tokens(self.tokens.iter())
    }

    /// String form without bypass tokens, used for uniqueness
    pub fn normalized(&self) -> String {
        join_tokens(self.tokens.iter().filter(|t| !t.bypass))
    }

    /// Lowercase hex SHA-256 of the full string form
    pub fn hash(&self) -> String {
        let digest = Sha256::digest(self.encode().as_bytes());
        let mut out = String::with_capacity(digest.len() * 2);
        for b in digest {
            out.push_str(&format!("{b:02x}"));
        }
        out
    }
}

impl fmt::Display for Dna {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

fn join_tokens<'a>(tokens: impl Iterator<Item = &'a DnaToken>) -> String {
    tokens
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(DNA_DELIMITER)
}

/// Token read back from a DNA string, not yet bound to a layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    /// Encoded element id
    pub element_id: usize,
    /// Encoded file name
    pub filename: String,
    /// Carries the bypass flag
    pub bypass: bool,
}

/// Split a DNA string into token substrings
///
/// A delimiter only separates tokens when it is followed by `<digits>:`, so
/// file names containing the delimiter survive.
pub fn split_tokens(dna: &str) -> Vec<&str> {
    if dna.is_empty() {
        return Vec::new();
    }

    let mut tokens = Vec::new();
    let mut start = 0;
    for (position, _) in dna.match_indices(DNA_DELIMITER) {
        let next = position + DNA_DELIMITER.len();
        let rest = dna.get(next..).unwrap_or_default();
        if starts_with_token_prefix(rest) {
            tokens.push(dna.get(start..position).unwrap_or_default());
            start = next;
        }
    }
    tokens.push(dna.get(start..).unwrap_or_default());
    tokens
}

fn starts_with_token_prefix(text: &str) -> bool {
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && text.as_bytes().get(digits) == Some(&b':')
}

/// Parse one `<id>:<filename>[?query]` token
pub fn parse_token(token: &str) -> Option<RawToken> {
    let (id, rest) = token.split_once(':')?;
    let element_id = id.parse().ok()?;
    let (filename, bypass) = match rest.split_once('?') {
        Some((filename, query)) => (filename, query.split('&').any(|q| q == BYPASS_DNA_FLAG)),
        None => (rest, false),
    };
    Some(RawToken {
        element_id,
        filename: filename.to_string(),
        bypass,
    })
}
