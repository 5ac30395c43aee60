//! Transform pipeline for lexical code rewriting.

pub mod text;

pub use text::{TextTransform, contains_word, word_pattern};

use crate::error::Result;

/// A code transformation that can be applied to source text.
pub trait Transform: Send + Sync {
    /// Applies the transformation to the given source code.
    fn apply(&self, source: &str) -> Result<String>;

    /// Returns a description of the transformation.
    fn describe(&self) -> String;
}

/// The main transform builder that combines multiple transformations.
///
/// Transforms run in insertion order, each seeing the output of the previous
/// one.
#[derive(Default)]
pub struct TransformBuilder {
    transforms: Vec<Box<dyn Transform>>,
}

impl TransformBuilder {
    /// Creates a new transform builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a regex pattern replacement.
    pub fn replace_pattern(self, pattern: &str, replacement: &str) -> Result<Self> {
        Ok(self.custom(TextTransform::replace(pattern, replacement)?))
    }

    /// Adds a whole-word replacement.
    pub fn replace_word(self, word: &str, replacement: impl Into<String>) -> Result<Self> {
        Ok(self.custom(TextTransform::replace_word(word, replacement)?))
    }

    /// Adds a literal string replacement.
    pub fn replace_literal(self, needle: &str, replacement: &str) -> Self {
        self.custom(TextTransform::replace_literal(needle, replacement))
    }

    /// Adds a transform that prepends content to the whole text.
    pub fn prepend(self, content: impl Into<String>) -> Self {
        self.custom(TextTransform::prepend(content))
    }

    /// Adds a custom transformation.
    pub fn custom<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Applies all transformations to the source code in order.
    pub fn apply(&self, source: &str) -> Result<String> {
        let mut result = source.to_string();
        for transform in &self.transforms {
            result = transform.apply(&result)?;
        }
        Ok(result)
    }

    /// Returns descriptions of all transformations.
    pub fn describe(&self) -> Vec<String> {
        self.transforms.iter().map(|t| t.describe()).collect()
    }

    /// Returns the number of transformations.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Returns true if there are no transformations.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_applies_in_order() {
        let builder = TransformBuilder::new()
            .replace_word("getOrders", "searchOrders")
            .unwrap()
            .replace_word("searchOrders", "searchOrders /* v1 */")
            .unwrap();

        assert_eq!(builder.len(), 2);
        assert_eq!(
            builder.apply("await getOrders();").unwrap(),
            "await searchOrders /* v1 */();"
        );
    }

    #[test]
    fn test_empty_builder_is_identity() {
        let builder = TransformBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.apply("unchanged").unwrap(), "unchanged");
    }

    #[test]
    fn test_describe_lists_every_step() {
        let builder = TransformBuilder::new()
            .replace_literal("/orders/v0/", "/orders/2026-01-01/")
            .prepend("/* header */\n");
        assert_eq!(
            builder.describe(),
            vec![
                "Replace literal '/orders/v0/' with '/orders/2026-01-01/'".to_string(),
                "Prepend 1 line(s)".to_string(),
            ]
        );
    }
}
