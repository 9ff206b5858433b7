//! # Fronteira com o Rotulador de Sequências
//!
//! O finder não depende de um algoritmo de rotulação específico: ele entrega
//! listas de features por token e recebe uma tag BIO por token. O crate traz
//! uma implementação (CRF linear-chain treinado com perceptron médio), mas
//! qualquer tipo que implemente estes traits serve.

use std::path::Path;

use crate::config::TrainOptions;
use crate::crf::CrfModel;
use crate::error::Result;
use crate::features::FeatureVector;
use crate::tagger::Tag;
use crate::viterbi::viterbi_decode;

/// Inferência: uma tag por token, na ordem dos tokens.
pub trait SequenceLabeler {
    fn tag(&self, features: &[FeatureVector]) -> Result<Vec<Tag>>;
}

/// Treino: consome as features e as tags de cada sentença e grava o modelo
/// em `model_path`.
pub trait LabelerTrainer {
    fn train(
        &self,
        xs: &[Vec<FeatureVector>],
        ys: &[Vec<Tag>],
        model_path: &Path,
        options: &TrainOptions,
    ) -> Result<()>;
}

impl SequenceLabeler for CrfModel {
    fn tag(&self, features: &[FeatureVector]) -> Result<Vec<Tag>> {
        Ok(viterbi_decode(self, features).best_sequence)
    }
}

impl<L: SequenceLabeler + ?Sized> SequenceLabeler for &L {
    fn tag(&self, features: &[FeatureVector]) -> Result<Vec<Tag>> {
        (**self).tag(features)
    }
}

impl<L: SequenceLabeler + ?Sized> SequenceLabeler for Box<L> {
    fn tag(&self, features: &[FeatureVector]) -> Result<Vec<Tag>> {
        (**self).tag(features)
    }
}
