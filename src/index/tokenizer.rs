//! Tokenizers for the text index
//!
//! A tokenizer turns a text value into an ordered sequence of terms. The same
//! tokenizer processes indexed values and query strings, so both sides see the
//! same terms. Length filtering is applied by the text index, not here.

use std::fmt::Debug;
use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

/// Strategy for splitting text into terms.
pub trait Tokenizer: Send + Sync + Debug {
    /// Extract terms from `text` in order of appearance.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Name used in configuration and snapshots
    fn name(&self) -> &'static str;
}

/// Built-in tokenizer with the given name
pub fn tokenizer_by_name(name: &str) -> Option<Arc<dyn Tokenizer>> {
    match name {
        "unicode_word" => Some(Arc::new(WordTokenizer)),
        "whitespace" => Some(Arc::new(WhitespaceTokenizer)),
        _ => None,
    }
}

/// Unicode word-boundary tokenizer that lower-cases every term.
///
/// Punctuation and whitespace never form terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words().map(str::to_lowercase).collect()
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}

/// Splits on whitespace only and lower-cases; punctuation stays attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_lowercase).collect()
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_tokenizer() {
        let tokens = WordTokenizer.tokenize("The Quick, brown fox's den!");
        assert_eq!(tokens, vec!["the", "quick", "brown", "fox's", "den"]);
    }

    #[test]
    fn test_word_tokenizer_empty() {
        assert!(WordTokenizer.tokenize("  ... ").is_empty());
    }

    #[test]
    fn test_whitespace_tokenizer() {
        let tokens = WhitespaceTokenizer.tokenize("Hello,  World");
        assert_eq!(tokens, vec!["hello,", "world"]);
    }

    #[test]
    fn test_by_name() {
        for name in ["unicode_word", "whitespace"] {
            assert_eq!(tokenizer_by_name(name).unwrap().name(), name);
        }
        assert!(tokenizer_by_name("stemmer").is_none());
    }
}
