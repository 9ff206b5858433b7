//! # Erros do Crate
//!
//! Todas as operações falíveis retornam [`Result`], com um único enum de erro.
//! Nenhuma operação faz retry: ou produz um resultado determinístico, ou falha
//! imediatamente com um erro tipado.

use thiserror::Error;

/// Erros que podem ocorrer ao codificar, decodificar, treinar ou alinhar spans.
#[derive(Debug, Error)]
pub enum NpError {
    /// Entrada malformada: formas de token misturadas, labels ausentes,
    /// contagem de labels diferente da de tokens, `I` órfão em modo estrito...
    #[error("validation error: {0}")]
    Validation(String),

    /// Um sintagma decodificado não foi encontrado no texto original.
    ///
    /// Indica dessincronização entre o tokenizador e o texto cru.
    #[error("span {span:?} not found in {text:?} at or after byte {from}")]
    SpanAlignment {
        span: String,
        from: usize,
        text: String,
    },

    /// O modelo persistido foi treinado com outra configuração de features.
    #[error("model was trained with a different feature configuration")]
    ConfigMismatch,

    #[error("training set is empty")]
    EmptyTrainingSet,

    /// Linha inválida em um arquivo de corpus.
    #[error("corpus line {line}: {message}")]
    Corpus { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NpError>;
