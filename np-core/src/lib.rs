//! # np-core — Extração de Sintagmas Nominais (NP chunking)
//!
//! Este crate encontra sintagmas nominais em sentenças rotulando cada token
//! com uma tag BIO (`B` início, `I` dentro, `O` fora) e reconstruindo os
//! spans a partir das tags.
//!
//! ## Arquitetura do Sistema
//!
//! 1.  **Entrada**: texto bruto ou sentença já anotada com classes gramaticais.
//! 2.  **Análise** ([`pipeline`]): tokenização ([`tokenizer`]), análise
//!     morfológica ([`morph`]) e tradução de tag-set ([`tagset`]).
//! 3.  **Extração de Features** ([`features`]): janela deslizante de strings
//!     de features por token, configurada por [`FeatureConfig`].
//! 4.  **Rotulação** ([`labeler`]): qualquer [`SequenceLabeler`]; o crate
//!     traz um CRF linear-chain ([`crf`], [`viterbi`]) treinado com perceptron
//!     médio ([`perceptron`]).
//! 5.  **Saída** ([`span`]): sintagmas como texto, como sequências de tokens
//!     ou como o texto original com colchetes.
//!
//! ## Exemplo de Uso
//!
//! ```rust,no_run
//! use np_core::corpus::{demo_corpus, demo_lexicon};
//! use np_core::{CrfModel, FinderConfig, NpFinder, StandardTokenizer, TextNpFinder};
//!
//! let config = FinderConfig::default();
//! NpFinder::train(&config, &demo_corpus(), "np.model")?;
//!
//! let model = CrfModel::load_for("np.model", &config.features, config.variant)?;
//! let finder = TextNpFinder::new(&config, StandardTokenizer, demo_lexicon(), model);
//!
//! // "[Старый дом] стоит на [берегу реки]."
//! println!("{}", finder.bracket("Старый дом стоит на берегу реки.")?);
//! # Ok::<(), np_core::NpError>(())
//! ```

pub mod config;
pub mod corpus;
pub mod crf;
pub mod error;
pub mod features;
pub mod finder;
pub mod labeler;
pub mod metrics;
pub mod morph;
pub mod perceptron;
pub mod pipeline;
pub mod sentence;
pub mod span;
pub mod tagger;
pub mod tagset;
pub mod tokenizer;
pub mod viterbi;

pub use config::{
    DecodePolicy, EncoderVariant, FeatureConfig, FinderConfig, TrainOptions, UnresolvedTagPolicy,
};
pub use crf::CrfModel;
pub use error::{NpError, Result};
pub use features::{FeatureEncoder, FeatureVector};
pub use finder::NpFinder;
pub use labeler::{LabelerTrainer, SequenceLabeler};
pub use morph::{Analysis, LexiconAnalyzer, MorphAnalyzer};
pub use pipeline::TextNpFinder;
pub use sentence::{Morphology, Sentence, Token, TokenShape};
pub use tagger::{Tag, TaggedToken};
pub use tagset::TagMap;
pub use tokenizer::{StandardTokenizer, Tokenizer};
