//! # Tokens e Sentenças
//!
//! Uma sentença é uma sequência ordenada de [`Token`]s. A ordem importa: ela
//! define a adjacência usada pela janela de features e a contiguidade dos
//! sintagmas.
//!
//! ## Formas de token
//!
//! No formato de corpus, cada token é uma tupla com 2, 3 ou 6 campos:
//!
//! | Forma     | Campos                                        |
//! |-----------|-----------------------------------------------|
//! | `Plain`   | palavra, classe gramatical                    |
//! | `Labeled` | palavra, classe gramatical, tag BIO           |
//! | `Morph`   | palavra, classe, tag, caso, gênero, número    |
//!
//! Todos os tokens de uma sentença devem ter a mesma forma.

use serde::{Deserialize, Serialize};

use crate::error::{NpError, Result};
use crate::tagger::{Tag, TaggedToken};

/// Atributos morfológicos de um token (caso, gênero e número).
///
/// Cada atributo é opcional; a ausência vira um valor vazio na feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morphology {
    pub case: Option<String>,
    pub gender: Option<String>,
    pub number: Option<String>,
}

/// Um token de sentença anotada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// A forma de superfície (ex: "кошка", "Москва").
    pub word: String,
    /// Classe gramatical no tag-set alvo (ex: "S", "A", "V").
    pub postag: Option<String>,
    /// Tag BIO de referência, presente em sentenças de treino.
    #[serde(default)]
    pub label: Option<Tag>,
    /// Morfologia, presente apenas em tokens de 6 campos.
    #[serde(default)]
    pub morph: Option<Morphology>,
}

impl Token {
    /// Token de 2 campos: palavra e classe gramatical.
    pub fn new(word: impl Into<String>, postag: Option<&str>) -> Self {
        Self {
            word: word.into(),
            postag: postag.map(str::to_string),
            label: None,
            morph: None,
        }
    }

    /// Token de 3 campos, com tag de referência.
    pub fn labeled(word: impl Into<String>, postag: Option<&str>, label: Tag) -> Self {
        Self {
            label: Some(label),
            ..Self::new(word, postag)
        }
    }

    /// Token de 6 campos, com tag e morfologia.
    pub fn with_morph(
        word: impl Into<String>,
        postag: Option<&str>,
        label: Tag,
        morph: Morphology,
    ) -> Self {
        Self {
            label: Some(label),
            morph: Some(morph),
            ..Self::new(word, postag)
        }
    }

    /// A forma (aridade) deste token.
    ///
    /// Morfologia sem label não corresponde a nenhuma tupla válida e é
    /// reportada como `None`.
    pub fn shape(&self) -> Option<TokenShape> {
        match (&self.label, &self.morph) {
            (None, None) => Some(TokenShape::Plain),
            (Some(_), None) => Some(TokenShape::Labeled),
            (Some(_), Some(_)) => Some(TokenShape::Morph),
            (None, Some(_)) => None,
        }
    }

    pub fn postag_str(&self) -> &str {
        self.postag.as_deref().unwrap_or("")
    }
}

/// Aridade da tupla de um token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TokenShape {
    Plain,
    Labeled,
    Morph,
}

impl TokenShape {
    /// Número de campos da tupla.
    pub fn arity(&self) -> usize {
        match self {
            TokenShape::Plain => 2,
            TokenShape::Labeled => 3,
            TokenShape::Morph => 6,
        }
    }
}

pub type Sentence = Vec<Token>;

/// Verifica que todos os tokens têm a mesma forma e a retorna.
///
/// Sentença vazia retorna `Ok(None)`.
pub fn sentence_shape(sent: &[Token]) -> Result<Option<TokenShape>> {
    let mut shape = None;
    for (i, token) in sent.iter().enumerate() {
        let current = token.shape().ok_or_else(|| {
            NpError::Validation(format!(
                "token {i} ({:?}) carries morphology without a label",
                token.word
            ))
        })?;
        match shape {
            None => shape = Some(current),
            Some(expected) if expected != current => {
                return Err(NpError::Validation(format!(
                    "token {i} ({:?}) has {} fields, expected {}",
                    token.word,
                    current.arity(),
                    expected.arity()
                )));
            }
            Some(_) => {}
        }
    }
    Ok(shape)
}

/// Extrai as tags de referência de uma sentença rotulada.
pub fn sent2labels(sent: &[Token]) -> Result<Vec<Tag>> {
    sent.iter()
        .enumerate()
        .map(|(i, t)| {
            t.label.ok_or_else(|| {
                NpError::Validation(format!("token {i} ({:?}) has no label", t.word))
            })
        })
        .collect()
}

/// Extrai as palavras de uma sentença.
pub fn sent2tokens(sent: &[Token]) -> Vec<String> {
    sent.iter().map(|t| t.word.clone()).collect()
}

/// Anexa tags previstas à sentença, substituindo as tags de referência.
///
/// Tokens `Plain` e `Labeled` viram `Labeled`; tokens `Morph` preservam a
/// morfologia.
pub fn tag_sentence(sent: &[Token], tags: &[Tag]) -> Result<Sentence> {
    if sent.len() != tags.len() {
        return Err(NpError::Validation(format!(
            "{} tags for {} tokens",
            tags.len(),
            sent.len()
        )));
    }
    sentence_shape(sent)?;
    Ok(sent
        .iter()
        .zip(tags)
        .map(|(token, &tag)| Token {
            label: Some(tag),
            ..token.clone()
        })
        .collect())
}

/// Pareia cada token com sua tag prevista, na ordem da sentença.
pub fn zip_tagged(sent: &[Token], tags: &[Tag]) -> Result<Vec<TaggedToken>> {
    if sent.len() != tags.len() {
        return Err(NpError::Validation(format!(
            "{} tags for {} tokens",
            tags.len(),
            sent.len()
        )));
    }
    Ok(sent
        .iter()
        .zip(tags)
        .map(|(token, &tag)| TaggedToken {
            word: token.word.clone(),
            postag: token.postag.clone(),
            tag,
        })
        .collect())
}
