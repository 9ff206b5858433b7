//! # Engenharia de Features para NP Chunking
//!
//! Para cada token, gera uma lista **ordenada** de features em forma de
//! string que o rotulador de sequências consome. O rotulador identifica cada
//! feature pela string exata, então a mesma configuração precisa sempre
//! produzir as mesmas strings, na mesma ordem, no treino e na inferência.
//!
//! ## Features Implementadas
//!
//! ### Token atual
//! - `bias` (constante)
//! - `postag=<classe>` (vazio se ausente)
//! - `word.isupper=`, `word.istitle=`, `word.isdigit=` (`True`/`False`)
//! - `word.lower=<palavra>` (opcional, `use_tokens`)
//! - `BOS` / `EOS` nas fronteiras da sentença
//! - `word.case=`, `word.rod=`, `word.number=` (apenas na variante morfológica)
//!
//! ### Janela de contexto (`siblings` tokens de cada lado)
//! As mesmas features (sem `bias`), prefixadas pelo deslocamento com sinal:
//! `-1:postag=S`, `2:word.istitle=True`. À esquerda só pode aparecer `BOS`
//! (`-2:BOS`), à direita só `EOS` (`1:EOS`). Posições fora da sentença são
//! simplesmente omitidas.
//!
//! ## Exemplo
//!
//! ```rust
//! use np_core::config::FeatureConfig;
//! use np_core::features::FeatureEncoder;
//! use np_core::sentence::Token;
//!
//! let sent = vec![Token::new("Мама", Some("S")), Token::new("мыла", Some("V"))];
//! let encoder = FeatureEncoder::base(FeatureConfig::default());
//! let fvs = encoder.encode(&sent).unwrap();
//! assert_eq!(fvs[0].features[..2], ["bias", "postag=S"]);
//! assert!(fvs[1].features.contains(&"-1:BOS".to_string()));
//! ```

use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{EncoderVariant, FeatureConfig};
use crate::error::{NpError, Result};
use crate::sentence::{sentence_shape, Sentence, Token, TokenShape};

/// Features de um token, na ordem em que foram emitidas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// As features ativas. Ex: `["bias", "postag=S", "word.istitle=True", ...]`.
    pub features: Vec<String>,
    /// Referência ao índice do token original na sentença.
    pub token_index: usize,
}

impl FeatureVector {
    pub fn new(token_index: usize) -> Self {
        Self {
            features: Vec::new(),
            token_index,
        }
    }

    pub fn push(&mut self, feature: impl Into<String>) {
        self.features.push(feature.into());
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Codificador de features por janela deslizante.
///
/// Uma única estrutura cobre as duas variantes; a variante morfológica só
/// aceita sentenças com tokens de 6 campos.
#[derive(Debug, Clone, Default)]
pub struct FeatureEncoder {
    config: FeatureConfig,
    variant: EncoderVariant,
}

impl FeatureEncoder {
    pub fn new(config: FeatureConfig, variant: EncoderVariant) -> Self {
        Self { config, variant }
    }

    pub fn base(config: FeatureConfig) -> Self {
        Self::new(config, EncoderVariant::Base)
    }

    pub fn morphological(config: FeatureConfig) -> Self {
        Self::new(config, EncoderVariant::Morphological)
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    pub fn variant(&self) -> EncoderVariant {
        self.variant
    }

    /// Valida a forma dos tokens para esta variante, antes de emitir qualquer feature.
    pub fn validate(&self, sent: &[Token]) -> Result<()> {
        let shape = sentence_shape(sent)?;
        if self.variant == EncoderVariant::Morphological {
            if let Some(shape) = shape {
                if shape != TokenShape::Morph {
                    return Err(NpError::Validation(format!(
                        "morphological encoder needs 6-field tokens, got {}",
                        shape.arity()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Gera vetores de features para toda a sentença.
    ///
    /// O índice `i` do retorno corresponde ao token `i` da entrada.
    pub fn encode(&self, sent: &[Token]) -> Result<Vec<FeatureVector>> {
        self.validate(sent)?;
        Ok((0..sent.len())
            .map(|i| self.extract_for_token(sent, i))
            .collect())
    }

    /// Codifica um corpus inteiro em paralelo, preservando a ordem das sentenças.
    ///
    /// Cada sentença é independente das demais, então não há coordenação além
    /// da coleta dos resultados.
    pub fn encode_corpus(&self, sents: &[Sentence]) -> Result<Vec<Vec<FeatureVector>>> {
        sents.par_iter().map(|sent| self.encode(sent)).collect()
    }

    /// Extrai features para um único token em seu contexto.
    ///
    /// Não valida a sentença; use [`FeatureEncoder::encode`].
    pub fn extract_for_token(&self, sent: &[Token], i: usize) -> FeatureVector {
        let n = sent.len();
        let mut fv = FeatureVector::new(i);

        // === Token atual ===
        fv.push("bias");
        self.push_lexical(&mut fv, "", &sent[i]);
        if self.config.use_bos_eos {
            if i == 0 {
                fv.push("BOS");
            }
            if i == n - 1 {
                fv.push("EOS");
            }
        }
        self.push_morph(&mut fv, "", &sent[i]);

        // === Contexto à esquerda (mais próximo primeiro) ===
        for j in 1..=self.config.siblings {
            let Some(pos) = i.checked_sub(j) else { break };
            let prefix = format!("-{j}:");
            self.push_lexical(&mut fv, &prefix, &sent[pos]);
            if self.config.use_bos_eos && pos == 0 {
                fv.push(format!("{prefix}BOS"));
            }
            self.push_morph(&mut fv, &prefix, &sent[pos]);
        }

        // === Contexto à direita ===
        for j in 1..=self.config.siblings {
            let pos = i + j;
            if pos >= n {
                break;
            }
            let prefix = format!("{j}:");
            self.push_lexical(&mut fv, &prefix, &sent[pos]);
            if self.config.use_bos_eos && pos == n - 1 {
                fv.push(format!("{prefix}EOS"));
            }
            self.push_morph(&mut fv, &prefix, &sent[pos]);
        }

        fv
    }

    /// Classe gramatical e ortografia de um token da janela.
    fn push_lexical(&self, fv: &mut FeatureVector, prefix: &str, token: &Token) {
        let word = token.word.as_str();
        fv.push(format!("{prefix}postag={}", token.postag_str()));
        if self.config.use_isupper {
            fv.push(format!("{prefix}word.isupper={}", py_bool(is_upper(word))));
        }
        if self.config.use_istitle {
            fv.push(format!("{prefix}word.istitle={}", py_bool(is_title(word))));
        }
        if self.config.use_isdigit {
            fv.push(format!("{prefix}word.isdigit={}", py_bool(is_digit(word))));
        }
        if self.config.use_tokens {
            fv.push(format!("{prefix}word.lower={}", word.to_lowercase()));
        }
    }

    fn push_morph(&self, fv: &mut FeatureVector, prefix: &str, token: &Token) {
        if self.variant != EncoderVariant::Morphological {
            return;
        }
        let morph = token.morph.as_ref();
        let case = morph.and_then(|m| m.case.as_deref()).unwrap_or("");
        let gender = morph.and_then(|m| m.gender.as_deref()).unwrap_or("");
        let number = morph.and_then(|m| m.number.as_deref()).unwrap_or("");
        fv.push(format!("{prefix}word.case={case}"));
        fv.push(format!("{prefix}word.rod={gender}"));
        fv.push(format!("{prefix}word.number={number}"));
    }
}

static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Nd}+$").expect("valid regex"));

fn py_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Tem ao menos uma letra com caixa e nenhuma minúscula.
fn is_upper(word: &str) -> bool {
    let mut cased = false;
    for c in word.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Maiúsculas só depois de caracteres sem caixa, minúsculas só depois de
/// caracteres com caixa, e ao menos uma letra com caixa ("Москва", "Рио-Де").
fn is_title(word: &str) -> bool {
    let mut cased = false;
    let mut prev_cased = false;
    for c in word.chars() {
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            prev_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            prev_cased = true;
            cased = true;
        } else {
            prev_cased = false;
        }
    }
    cased
}

/// Só dígitos decimais (`\p{Nd}`): `½`, `Ⅻ` e `五` não contam.
fn is_digit(word: &str) -> bool {
    DIGITS_RE.is_match(word)
}
