//! # Tradução de Tag-sets
//!
//! Converte a classe gramatical do analisador morfológico (tag-set do
//! OpenCorpora) para o tag-set do SynTagRus, com o qual o rotulador foi
//! treinado.
//!
//! A tradução consulta primeiro a tabela de classes. Se a análise não tem
//! classe (ou a classe não está na tabela), os gramemas de superfície são
//! testados em ordem fixa:
//!
//! 1. `LATN` → `NID`
//! 2. `PNCT` → sem tag (a palavra é descartada)
//! 3. `NUMB` → `NUM`
//! 4. `ROMN` → `NUM`
//! 5. `UNKN` → `NID`

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::morph::Analysis;

/// Tabela de tradução: mapa de classes + fallbacks ordenados por gramema.
#[derive(Debug, Clone)]
pub struct TagMap {
    primary: HashMap<String, String>,
    /// `(gramema, tag)`; `None` significa "sem tag".
    fallbacks: Vec<(String, Option<String>)>,
}

const OPENCORPORA_TO_SYNTAGRUS: &[(&str, &str)] = &[
    ("NOUN", "S"),
    ("ADJF", "A"),
    ("ADJS", "A"),
    ("COMP", "ADV"),
    ("VERB", "V"),
    ("INFN", "V"),
    ("PRTF", "V"),
    ("PRTS", "V"),
    ("GRND", "V"),
    ("NUMR", "NUM"),
    ("ADVB", "ADV"),
    ("NPRO", "S"),
    ("PRED", "V"),
    ("PREP", "PR"),
    ("CONJ", "CONJ"),
    ("PRCL", "PART"),
    ("INTJ", "INTJ"),
];

const SURFACE_FALLBACKS: &[(&str, Option<&str>)] = &[
    ("LATN", Some("NID")),
    ("PNCT", None),
    ("NUMB", Some("NUM")),
    ("ROMN", Some("NUM")),
    ("UNKN", Some("NID")),
];

static DEFAULT_MAP: LazyLock<TagMap> = LazyLock::new(|| {
    TagMap::new(
        OPENCORPORA_TO_SYNTAGRUS
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string())),
        SURFACE_FALLBACKS
            .iter()
            .map(|(grammeme, tag)| (grammeme.to_string(), tag.map(str::to_string))),
    )
});

impl TagMap {
    pub fn new(
        primary: impl IntoIterator<Item = (String, String)>,
        fallbacks: impl IntoIterator<Item = (String, Option<String>)>,
    ) -> Self {
        Self {
            primary: primary.into_iter().collect(),
            fallbacks: fallbacks.into_iter().collect(),
        }
    }

    /// Tabela OpenCorpora → SynTagRus, construída uma única vez.
    pub fn default_map() -> &'static TagMap {
        &DEFAULT_MAP
    }

    /// Tag de destino da análise, ou `None` quando a palavra não tem tag.
    pub fn resolve(&self, analysis: &Analysis) -> Option<&str> {
        if let Some(tag) = analysis.pos.as_deref().and_then(|pos| self.primary.get(pos)) {
            return Some(tag);
        }
        // o primeiro gramema presente decide, mesmo que seja "sem tag"
        self.fallbacks
            .iter()
            .find(|(grammeme, _)| analysis.has_grammeme(grammeme))
            .and_then(|(_, tag)| tag.as_deref())
    }

    pub fn lookup(&self, pos: &str) -> Option<&str> {
        self.primary.get(pos).map(String::as_str)
    }
}
