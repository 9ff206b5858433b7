//! # Esquema de Tags BIO para Sintagmas Nominais
//!
//! Define o esquema de anotação **BIO** (Beginning-Inside-Outside) utilizado
//! para rotular tokens na extração de sintagmas nominais (NP chunking).
//!
//! Diferente do NER, aqui existe uma única categoria (o sintagma nominal),
//! então as tags não carregam sufixo de tipo:
//!
//! | Tag | Significado                                   |
//! |-----|-----------------------------------------------|
//! | `B` | Begin — primeiro token de um sintagma         |
//! | `I` | Inside — tokens subsequentes do mesmo sintagma|
//! | `O` | Outside — fora de qualquer sintagma           |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NpError;

/// Tag BIO aplicada a um token.
///
/// Serializada como a letra única (`"B"`, `"I"`, `"O"`), que é exatamente o
/// vocabulário de saída do rotulador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    #[serde(rename = "B")]
    Begin,
    #[serde(rename = "I")]
    Inside,
    #[serde(rename = "O")]
    Outside,
}

impl Tag {
    /// Número total de tags possíveis
    pub const COUNT: usize = 3;

    /// Representação textual da tag (`"B"`, `"I"` ou `"O"`)
    pub fn label(&self) -> &'static str {
        match self {
            Tag::Begin => "B",
            Tag::Inside => "I",
            Tag::Outside => "O",
        }
    }

    /// Índice numérico da tag para a matriz de transição e o Viterbi.
    pub fn index(&self) -> usize {
        match self {
            Tag::Outside => 0,
            Tag::Begin => 1,
            Tag::Inside => 2,
        }
    }

    /// Todas as tags, na ordem de [`Tag::index`]
    pub fn all() -> [Tag; 3] {
        [Tag::Outside, Tag::Begin, Tag::Inside]
    }

    /// Verifica se a transição `prev → next` é bem formada no esquema BIO.
    ///
    /// `I` só pode seguir `B` ou `I`; `B` e `O` podem seguir qualquer tag.
    pub fn is_valid_transition(prev: Option<Tag>, next: Tag) -> bool {
        match next {
            Tag::Inside => matches!(prev, Some(Tag::Begin) | Some(Tag::Inside)),
            _ => true,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tag {
    type Err = NpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "B" => Ok(Tag::Begin),
            "I" => Ok(Tag::Inside),
            "O" => Ok(Tag::Outside),
            other => Err(NpError::Validation(format!("unknown tag {other:?}"))),
        }
    }
}

/// Um token com a tag BIO atribuída (pelo rotulador ou pelo corpus).
///
/// É a "tripla" `(palavra, classe gramatical, tag)` devolvida pela forma
/// sequencial do decodificador de spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub word: String,
    pub postag: Option<String>,
    pub tag: Tag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_labels() {
        assert_eq!(Tag::Outside.label(), "O");
        assert_eq!(Tag::Begin.label(), "B");
        assert_eq!(Tag::Inside.to_string(), "I");
    }

    #[test]
    fn test_tag_from_str() {
        assert_eq!("B".parse::<Tag>().unwrap(), Tag::Begin);
        assert_eq!("O".parse::<Tag>().unwrap(), Tag::Outside);
        assert!("B-NP".parse::<Tag>().is_err());
    }

    #[test]
    fn test_valid_transitions() {
        assert!(Tag::is_valid_transition(Some(Tag::Begin), Tag::Inside));
        assert!(Tag::is_valid_transition(Some(Tag::Inside), Tag::Inside));
        assert!(!Tag::is_valid_transition(Some(Tag::Outside), Tag::Inside));
        assert!(!Tag::is_valid_transition(None, Tag::Inside));
        assert!(Tag::is_valid_transition(None, Tag::Begin));
    }

    #[test]
    fn test_all_tags_have_unique_indices() {
        let mut indices: Vec<usize> = Tag::all().iter().map(|t| t.index()).collect();
        indices.sort();
        indices.dedup();
        assert_eq!(indices.len(), Tag::COUNT);
    }

    #[test]
    fn test_tag_serde_uses_single_letter() {
        let json = serde_json::to_string(&Tag::Begin).unwrap();
        assert_eq!(json, "\"B\"");
        let back: Tag = serde_json::from_str("\"I\"").unwrap();
        assert_eq!(back, Tag::Inside);
    }
}
