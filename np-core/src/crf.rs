//! # CRF — Modelo Linear-Chain sobre as tags BIO
//!
//! Modelo de marcação de sequências usado como rotulador padrão do finder.
//!
//! ## Estrutura do Modelo
//!
//! Score total de uma sequência de tags:
//!
//! ```text
//! score(y, x) = Σ_i [emission_score(y_i, x, i) + transition_score(y_{i-1}, y_i)]
//! ```
//!
//! As features são binárias (strings vindas de [`crate::features`]); o peso de
//! emissão é indexado por `"<feature>|<tag>"`. Os pesos são aprendidos pelo
//! perceptron médio estruturado ([`crate::perceptron`]) e a melhor sequência
//! é encontrada pelo Viterbi ([`crate::viterbi`]).
//!
//! O modelo persistido carrega a [`FeatureConfig`] com que foi treinado,
//! pois qualquer mudança de configuração muda o vocabulário de features.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{EncoderVariant, FeatureConfig};
use crate::error::{NpError, Result};
use crate::features::FeatureVector;
use crate::tagger::Tag;

/// Modelo CRF com pesos aprendidos
///
/// Contém:
/// - `emission_weights`: mapa feature×tag → peso
/// - `transition_weights`: matriz tag_prev×tag_next → peso
/// - `observed_transitions`: transições vistas no corpus de treino
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrfModel {
    /// Configuração de features usada no treino.
    pub feature_config: FeatureConfig,
    pub variant: EncoderVariant,
    /// Pesos de emissão: (feature_name + "|" + tag_label) → f64
    pub emission_weights: HashMap<String, f64>,
    /// Pesos de transição: indexed by [prev_tag_idx][next_tag_idx]
    pub transition_weights: Vec<Vec<f64>>,
    pub observed_transitions: Vec<Vec<bool>>,
    /// Se falso, transições não observadas no treino ficam sem peso (score 0).
    pub possible_transitions: bool,
}

impl CrfModel {
    /// Cria um modelo CRF com pesos zerados
    pub fn new(feature_config: FeatureConfig, variant: EncoderVariant) -> Self {
        let n = Tag::COUNT;
        Self {
            feature_config,
            variant,
            emission_weights: HashMap::new(),
            transition_weights: vec![vec![0.0f64; n]; n],
            observed_transitions: vec![vec![false; n]; n],
            possible_transitions: true,
        }
    }

    /// Calcula o score de emissão para uma tag num token com features dadas
    ///
    /// `score = Σ_k w_{k, tag}` sobre as features ativas.
    pub fn emission_score(&self, features: &FeatureVector, tag: Tag) -> f64 {
        let tag_label = tag.label();
        features
            .features
            .iter()
            .map(|feat_name| {
                let key = format!("{feat_name}|{tag_label}");
                *self.emission_weights.get(&key).unwrap_or(&0.0)
            })
            .sum()
    }

    /// Score de transição.
    ///
    /// Com `possible_transitions = false`, uma transição não observada no
    /// treino não tem peso próprio e vale sempre `0.0`.
    pub fn transition_score(&self, prev: Tag, next: Tag) -> f64 {
        if !self.has_transition_weight(prev, next) {
            return 0.0;
        }
        self.transition_weights[prev.index()][next.index()]
    }

    /// Se a transição carrega um peso aprendido.
    pub fn has_transition_weight(&self, prev: Tag, next: Tag) -> bool {
        self.possible_transitions || self.observed_transitions[prev.index()][next.index()]
    }

    /// Configura um peso de emissão
    pub fn set_emission(&mut self, feature: &str, tag: Tag, weight: f64) {
        let key = format!("{feature}|{}", tag.label());
        self.emission_weights.insert(key, weight);
    }

    /// Configura um peso de transição
    pub fn set_transition(&mut self, from: Tag, to: Tag, weight: f64) {
        self.transition_weights[from.index()][to.index()] = weight;
    }

    /// Marca uma transição como observada no corpus de treino.
    pub fn observe_transition(&mut self, from: Tag, to: Tag) {
        self.observed_transitions[from.index()][to.index()] = true;
    }

    /// Persiste o modelo em JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// Carrega o modelo e confere que ele foi treinado com esta configuração.
    pub fn load_for(
        path: impl AsRef<Path>,
        feature_config: &FeatureConfig,
        variant: EncoderVariant,
    ) -> Result<Self> {
        let model = Self::load(path)?;
        if &model.feature_config != feature_config || model.variant != variant {
            return Err(NpError::ConfigMismatch);
        }
        Ok(model)
    }
}

impl Default for CrfModel {
    fn default() -> Self {
        Self::new(FeatureConfig::default(), EncoderVariant::Base)
    }
}

/// Calcula os scores de emissão para todos os tokens e tags: `[token][tag]`
pub fn compute_emission_scores(
    model: &CrfModel,
    feature_vectors: &[FeatureVector],
) -> Vec<Vec<f64>> {
    let tags = Tag::all();
    feature_vectors
        .iter()
        .map(|fv| tags.iter().map(|&tag| model.emission_score(fv, tag)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emission_score_positive() {
        let mut model = CrfModel::default();
        model.set_emission("postag=S", Tag::Begin, 2.5);

        let mut fv = FeatureVector::new(0);
        fv.push("bias");
        fv.push("postag=S");

        assert!((model.emission_score(&fv, Tag::Begin) - 2.5).abs() < 1e-9);
        assert!(model.emission_score(&fv, Tag::Outside).abs() < 1e-9);
    }

    #[test]
    fn test_transition_score() {
        let mut model = CrfModel::default();
        model.set_transition(Tag::Begin, Tag::Inside, 3.0);

        assert_eq!(model.transition_score(Tag::Begin, Tag::Inside), 3.0);
        // Transição default é 0
        assert_eq!(model.transition_score(Tag::Outside, Tag::Inside), 0.0);
    }

    #[test]
    fn test_unobserved_transition_has_no_weight() {
        let mut model = CrfModel::default();
        model.possible_transitions = false;
        model.observe_transition(Tag::Begin, Tag::Inside);
        model.set_transition(Tag::Begin, Tag::Inside, 1.5);
        model.set_transition(Tag::Outside, Tag::Inside, -4.0);

        assert_eq!(model.transition_score(Tag::Begin, Tag::Inside), 1.5);
        assert!(!model.has_transition_weight(Tag::Outside, Tag::Inside));
        assert_eq!(model.transition_score(Tag::Outside, Tag::Inside), 0.0);

        model.possible_transitions = true;
        assert_eq!(model.transition_score(Tag::Outside, Tag::Inside), -4.0);
    }

    #[test]
    fn test_save_and_load_checks_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let mut model = CrfModel::default();
        model.set_emission("bias", Tag::Outside, 0.5);
        model.save(&path).unwrap();

        let loaded = CrfModel::load_for(&path, &FeatureConfig::default(), EncoderVariant::Base)
            .unwrap();
        assert_eq!(loaded.emission_weights, model.emission_weights);

        let other = FeatureConfig {
            use_tokens: true,
            ..FeatureConfig::default()
        };
        assert!(matches!(
            CrfModel::load_for(&path, &other, EncoderVariant::Base),
            Err(NpError::ConfigMismatch)
        ));
        assert!(matches!(
            CrfModel::load_for(&path, &FeatureConfig::default(), EncoderVariant::Morphological),
            Err(NpError::ConfigMismatch)
        ));
    }
}
