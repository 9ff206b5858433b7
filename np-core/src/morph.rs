//! # Análise Morfológica
//!
//! O finder de texto bruto precisa, para cada palavra, da classe gramatical
//! e dos gramemas da análise mais provável. O trait [`MorphAnalyzer`] isola
//! essa dependência; [`LexiconAnalyzer`] é uma implementação simples baseada
//! em um léxico (carregável de JSON) com um classificador de superfície para
//! palavras desconhecidas.
//!
//! ## Classificador de superfície
//!
//! | Gramema | Forma                                   |
//! |---------|-----------------------------------------|
//! | `PNCT`  | só pontuação/símbolos                   |
//! | `NUMB`  | dígitos, com `.`/`,` internos           |
//! | `ROMN`  | numeral romano em maiúsculas (`XIV`)    |
//! | `LATN`  | palavra em alfabeto latino              |
//! | `UNKN`  | qualquer outra coisa                    |

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Uma análise morfológica de uma palavra.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Analysis {
    /// Classe gramatical no tag-set do analisador (ex: `NOUN`, `ADJF`).
    pub pos: Option<String>,
    pub grammemes: BTreeSet<String>,
    pub case: Option<String>,
    pub gender: Option<String>,
    pub number: Option<String>,
}

impl Analysis {
    pub fn with_pos(pos: impl Into<String>) -> Self {
        Self {
            pos: Some(pos.into()),
            ..Self::default()
        }
    }

    /// Análise sem classe, apenas com um gramema de superfície.
    pub fn surface(grammeme: &str) -> Self {
        Self {
            grammemes: BTreeSet::from([grammeme.to_string()]),
            ..Self::default()
        }
    }

    pub fn has_grammeme(&self, grammeme: &str) -> bool {
        self.grammemes.contains(grammeme)
    }
}

/// Analisador morfológico: análises ordenadas da mais para a menos provável.
pub trait MorphAnalyzer {
    fn analyze(&self, word: &str) -> Vec<Analysis>;
}

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:[.,]\d+)*$").expect("valid regex"));
static ROMAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^M{0,4}(?:CM|CD|D?C{0,3})(?:XC|XL|L?X{0,3})(?:IX|IV|V?I{0,3})$")
        .expect("valid regex")
});
static LATIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+(?:['\-][A-Za-z]+)*$").expect("valid regex"));
static PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{P}\p{S}]+$").expect("valid regex"));

/// Gramema de superfície de uma palavra fora do léxico.
pub fn classify_surface(word: &str) -> &'static str {
    if PUNCT_RE.is_match(word) {
        "PNCT"
    } else if NUMBER_RE.is_match(word) {
        "NUMB"
    } else if !word.is_empty() && ROMAN_RE.is_match(word) {
        "ROMN"
    } else if LATIN_RE.is_match(word) {
        "LATN"
    } else {
        "UNKN"
    }
}

/// Analisador baseado em léxico, indexado pela forma em minúsculas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LexiconAnalyzer {
    entries: HashMap<String, Vec<Analysis>>,
}

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acrescenta uma análise para a palavra (depois das já existentes).
    pub fn insert(&mut self, word: &str, analysis: Analysis) {
        self.entries
            .entry(word.to_lowercase())
            .or_default()
            .push(analysis);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Carrega um léxico `{"palavra": [análise, ...]}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<Analysis>> = serde_json::from_str(json)?;
        let mut lexicon = Self::new();
        for (word, analyses) in raw {
            for analysis in analyses {
                lexicon.insert(&word, analysis);
            }
        }
        Ok(lexicon)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl MorphAnalyzer for LexiconAnalyzer {
    fn analyze(&self, word: &str) -> Vec<Analysis> {
        match self.entries.get(&word.to_lowercase()) {
            Some(analyses) if !analyses.is_empty() => analyses.clone(),
            _ => vec![Analysis::surface(classify_surface(word))],
        }
    }
}
