//! Text-based transformations using regex patterns.
//!
//! Everything here is lexical: a "word" is whatever the regex `\b` anchors
//! consider bounded by non-identifier characters. Dotted attribute paths are
//! escaped so the dots match literally.

use super::Transform;
use crate::error::Result;
use regex::{NoExpand, Regex};

/// Compiles a whole-word pattern for `needle`, escaping regex metacharacters.
pub fn word_pattern(needle: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(r"\b{}\b", regex::escape(needle)))?)
}

/// Returns true if `needle` occurs in `haystack` as a whole word.
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    // An escaped needle always compiles; a failure here can only mean an
    // oversized pattern, which is treated as "not found".
    word_pattern(needle).is_ok_and(|re| re.is_match(haystack))
}

/// Text-based transformation using regex replacement.
pub struct TextTransform {
    kind: TextTransformKind,
}

enum TextTransformKind {
    Replace { pattern: Regex, replacement: String },
    ReplaceWord { word: String, pattern: Regex, replacement: String },
    ReplaceLiteral { needle: String, replacement: String },
    Prepend { content: String },
}

impl TextTransform {
    /// Creates a regex replacement transform. `$1`-style group references in
    /// the replacement are expanded.
    pub fn replace(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            kind: TextTransformKind::Replace {
                pattern: Regex::new(pattern)?,
                replacement: replacement.to_string(),
            },
        })
    }

    /// Creates a transform replacing every whole-word occurrence of `word`.
    ///
    /// The replacement is inserted verbatim, so target descriptions containing
    /// `$` or parentheses are safe.
    pub fn replace_word(word: &str, replacement: impl Into<String>) -> Result<Self> {
        Ok(Self {
            kind: TextTransformKind::ReplaceWord {
                word: word.to_string(),
                pattern: word_pattern(word)?,
                replacement: replacement.into(),
            },
        })
    }

    /// Creates a literal string replacement transform.
    pub fn replace_literal(needle: &str, replacement: &str) -> Self {
        Self {
            kind: TextTransformKind::ReplaceLiteral {
                needle: needle.to_string(),
                replacement: replacement.to_string(),
            },
        }
    }

    /// Creates a transform that puts `content` in front of the whole text.
    pub fn prepend(content: impl Into<String>) -> Self {
        Self {
            kind: TextTransformKind::Prepend {
                content: content.into(),
            },
        }
    }
}

impl Transform for TextTransform {
    fn apply(&self, source: &str) -> Result<String> {
        match &self.kind {
            TextTransformKind::Replace { pattern, replacement } => {
                Ok(pattern.replace_all(source, replacement.as_str()).into_owned())
            }
            TextTransformKind::ReplaceWord {
                pattern,
                replacement,
                ..
            } => Ok(pattern
                .replace_all(source, NoExpand(replacement.as_str()))
                .into_owned()),
            TextTransformKind::ReplaceLiteral { needle, replacement } => {
                Ok(source.replace(needle, replacement))
            }
            TextTransformKind::Prepend { content } => Ok(format!("{content}{source}")),
        }
    }

    fn describe(&self) -> String {
        match &self.kind {
            TextTransformKind::Replace { pattern, replacement } => {
                format!("Replace pattern '{}' with '{}'", pattern.as_str(), replacement)
            }
            TextTransformKind::ReplaceWord {
                word, replacement, ..
            } => {
                format!("Replace word '{}' with '{}'", word, replacement)
            }
            TextTransformKind::ReplaceLiteral { needle, replacement } => {
                format!("Replace literal '{}' with '{}'", needle, replacement)
            }
            TextTransformKind::Prepend { content } => {
                format!("Prepend {} line(s)", content.lines().count())
            }
        }
    }
}
