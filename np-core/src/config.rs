//! # Configuração
//!
//! ## Contrato de compatibilidade
//!
//! [`FeatureConfig`] define o **vocabulário de features**. O rotulador
//! identifica cada feature pela string exata, então qualquer mudança em um
//! toggle (ou em `siblings`) produz strings diferentes e invalida modelos
//! treinados anteriormente. Os nomes dos campos, seus nomes na serialização
//! e as strings de feature derivadas deles são congelados: não renomeie nem
//! reordene. O modelo persistido guarda a configuração com que foi treinado
//! e a carga falha com [`NpError::ConfigMismatch`](crate::NpError::ConfigMismatch)
//! se ela divergir.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Toggles do codificador de features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Raio da janela de contexto (tokens de cada lado).
    pub siblings: usize,
    pub use_isupper: bool,
    pub use_istitle: bool,
    pub use_isdigit: bool,
    /// Emite a palavra em minúsculas como feature. Desligado por padrão:
    /// gera features esparsas e causa overfitting.
    pub use_tokens: bool,
    /// Emite os marcadores de fronteira de sentença `BOS` / `EOS`.
    #[serde(rename = "use_BOS_EOS")]
    pub use_bos_eos: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            siblings: 2,
            use_isupper: true,
            use_istitle: true,
            use_isdigit: true,
            use_tokens: false,
            use_bos_eos: true,
        }
    }
}

/// Variante do codificador: base (lexical/ortográfica) ou estendida, que
/// acrescenta caso, gênero e número de cada token da janela.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderVariant {
    #[default]
    Base,
    Morphological,
}

/// O que fazer com uma sequência de tags que começa com `I` sem um `B`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// O acumulador pendente ao fim da varredura é descartado em silêncio.
    #[default]
    Lenient,
    /// Todo `I` que não segue `B` ou `I` é um erro de validação.
    Strict,
}

/// O que fazer com uma palavra cuja classe gramatical não tem tradução.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedTagPolicy {
    /// Remove a palavra da sentença analisada (a janela de contexto passa a
    /// "pular" a palavra removida).
    #[default]
    Drop,
    /// Mantém a palavra com classe ausente (`postag=` vazio).
    KeepEmpty,
}

/// Parâmetros de treino do rotulador.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainOptions {
    /// Inclui transições possíveis mas não observadas no corpus de treino.
    pub possible_transitions: bool,
    pub max_iterations: usize,
    pub verbose: bool,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            possible_transitions: true,
            max_iterations: 10,
            verbose: false,
        }
    }
}

/// Configuração completa de um finder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    pub features: FeatureConfig,
    pub variant: EncoderVariant,
    pub decode: DecodePolicy,
    pub unresolved_tags: UnresolvedTagPolicy,
    pub train: TrainOptions,
}

impl FinderConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Carrega a configuração de um arquivo JSON. Campos ausentes assumem o padrão.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
