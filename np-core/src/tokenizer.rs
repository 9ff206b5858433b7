//! # Tokenizador
//!
//! Divide o texto bruto em palavras, números e pontuação usando as fronteiras
//! de palavra do Unicode (UAX #29, via `unicode-segmentation`).
//!
//! - Números com separadores internos (`3.14`, `1,000`) ficam inteiros.
//! - Palavras hifenizadas (`из-за`, `curou-se`) ficam inteiras quando o hífen
//!   não tem espaço dos lados.
//! - Cada caractere de pontuação vira um token.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use np_core::tokenizer::{StandardTokenizer, Tokenizer};
//!
//! let words = StandardTokenizer.tokenize("Мама мыла раму, а кот спал.");
//! assert_eq!(words, ["Мама", "мыла", "раму", ",", "а", "кот", "спал", "."]);
//! ```

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Tokenização de uma sentença em palavras.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Um token com sua posição no texto original.
///
/// `start` e `end` são índices de byte (end exclusivo).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextToken {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Tokenizador padrão baseado nas fronteiras de palavra do Unicode.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTokenizer;

impl StandardTokenizer {
    /// Tokeniza preservando os offsets de cada token.
    pub fn tokenize_with_offsets(&self, text: &str) -> Vec<TextToken> {
        let segments: Vec<(usize, &str)> = text
            .split_word_bound_indices()
            .filter(|(_, s)| !s.chars().all(char::is_whitespace))
            .collect();

        let mut tokens: Vec<TextToken> = Vec::with_capacity(segments.len());
        let mut i = 0;
        while i < segments.len() {
            let (start, seg) = segments[i];
            let end = start + seg.len();

            // Junta `palavra-palavra` sem espaços em volta do hífen
            if seg == "-" {
                let following = segments.get(i + 1);
                if let (Some(prev), Some(&(next_start, next))) = (tokens.last_mut(), following) {
                    if prev.end == start
                        && next_start == end
                        && ends_alphanumeric(&prev.text)
                        && starts_alphanumeric(next)
                    {
                        prev.text.push('-');
                        prev.text.push_str(next);
                        prev.end = next_start + next.len();
                        i += 2;
                        continue;
                    }
                }
            }

            tokens.push(TextToken {
                text: seg.to_string(),
                start,
                end,
            });
            i += 1;
        }
        tokens
    }
}

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenize_with_offsets(text)
            .into_iter()
            .map(|t| t.text)
            .collect()
    }
}

fn ends_alphanumeric(s: &str) -> bool {
    s.chars().next_back().is_some_and(char::is_alphanumeric)
}

fn starts_alphanumeric(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        StandardTokenizer.tokenize(text)
    }

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(
            words("The quick brown fox jumps."),
            ["The", "quick", "brown", "fox", "jumps", "."]
        );
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(words("Цена 3.14 или 1,000"), ["Цена", "3.14", "или", "1,000"]);
    }

    #[test]
    fn test_tokenize_hyphenated() {
        assert_eq!(words("из-за дождя"), ["из-за", "дождя"]);
        assert_eq!(words("a - b"), ["a", "-", "b"]);
        assert_eq!(words("северо-восток-юг"), ["северо-восток-юг"]);
    }

    #[test]
    fn test_tokenize_punctuation_split() {
        assert_eq!(words("Да!?"), ["Да", "!", "?"]);
        assert_eq!(words("(кот)"), ["(", "кот", ")"]);
    }

    #[test]
    fn test_offsets_point_into_text() {
        let text = "Кот  спит.";
        for token in StandardTokenizer.tokenize_with_offsets(text) {
            assert_eq!(&text[token.start..token.end], token.text);
        }
    }

    #[test]
    fn test_empty_text() {
        assert!(words("").is_empty());
        assert!(words("   \n").is_empty());
    }
}
