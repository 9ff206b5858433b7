//! # Averaged Perceptron Estruturado
//!
//! Treina os pesos do [`CrfModel`] com o perceptron médio estruturado
//! (o mesmo algoritmo `ap` do CRFsuite): para cada sentença, decodifica com os
//! pesos atuais e, se a sequência prevista diferir da de referência,
//! promove as features/transições corretas e penaliza as previstas.
//! Utiliza "Lazy Averaging" para evitar custo O(N*T) na atualização dos pesos médios.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::config::{EncoderVariant, FeatureConfig, TrainOptions};
use crate::crf::CrfModel;
use crate::error::{NpError, Result};
use crate::features::FeatureVector;
use crate::labeler::LabelerTrainer;
use crate::tagger::Tag;
use crate::viterbi::viterbi_decode;

/// Pesos com média preguiçosa (lazy averaging).
///
/// Calcular a média real a cada passo seria $O(N \cdot T)$. Aqui a média de
/// um peso só é atualizada quando ele muda, o que resulta no mesmo modelo
/// matemático com custo constante por atualização.
#[derive(Debug, Default)]
struct AveragedWeights {
    /// Pesos atuais $w$.
    weights: HashMap<String, f64>,
    /// Soma acumulada $\sum w_t$ até `last_update`.
    totals: HashMap<String, f64>,
    /// Último passo em que o peso foi atualizado.
    last_update: HashMap<String, usize>,
}

impl AveragedWeights {
    fn get(&self, key: &str) -> f64 {
        *self.weights.get(key).unwrap_or(&0.0)
    }

    fn update(&mut self, key: &str, delta: f64, step: usize) {
        // Acumula o peso ANTIGO pelos passos em que ele ficou constante
        let current_w = self.get(key);
        let last_step = *self.last_update.get(key).unwrap_or(&0);
        *self.totals.entry(key.to_string()).or_insert(0.0) += (step - last_step) as f64 * current_w;
        self.last_update.insert(key.to_string(), step);

        *self.weights.entry(key.to_string()).or_insert(0.0) += delta;
    }

    /// Fecha os acumuladores no passo final e devolve as médias ($\sum w_t / T$).
    fn finalize(mut self, steps: usize) -> HashMap<String, f64> {
        if steps == 0 {
            return self.weights;
        }
        for (key, w) in &self.weights {
            let last_step = *self.last_update.get(key).unwrap_or(&0);
            *self.totals.entry(key.clone()).or_insert(0.0) += (steps - last_step) as f64 * w;
        }
        let steps = steps as f64;
        self.totals
            .into_iter()
            .map(|(key, total)| (key, total / steps))
            .filter(|(_, w)| *w != 0.0)
            .collect()
    }
}

fn transition_key(prev: Tag, next: Tag) -> String {
    format!("{prev}>{next}")
}

/// Treinador padrão: perceptron médio sobre o modelo linear-chain.
///
/// Guarda a configuração de features para gravá-la no modelo.
#[derive(Debug, Clone, Default)]
pub struct PerceptronTrainer {
    feature_config: FeatureConfig,
    variant: EncoderVariant,
}

impl PerceptronTrainer {
    pub fn new(feature_config: FeatureConfig, variant: EncoderVariant) -> Self {
        Self {
            feature_config,
            variant,
        }
    }

    /// Treina e devolve o modelo em memória.
    ///
    /// Com `possible_transitions = false` só as transições vistas no corpus
    /// ganham peso; as demais ficam em 0, no treino e no modelo final.
    pub fn fit(
        &self,
        xs: &[Vec<FeatureVector>],
        ys: &[Vec<Tag>],
        options: &TrainOptions,
    ) -> Result<CrfModel> {
        if xs.is_empty() {
            return Err(NpError::EmptyTrainingSet);
        }
        if xs.len() != ys.len() {
            return Err(NpError::Validation(format!(
                "{} feature sequences for {} label sequences",
                xs.len(),
                ys.len()
            )));
        }
        for (i, (x, y)) in xs.iter().zip(ys).enumerate() {
            if x.len() != y.len() {
                return Err(NpError::Validation(format!(
                    "sentence {i}: {} feature vectors for {} labels",
                    x.len(),
                    y.len()
                )));
            }
        }

        let mut observed = HashSet::new();
        for y in ys {
            for pair in y.windows(2) {
                observed.insert((pair[0], pair[1]));
            }
        }

        let mut emissions = AveragedWeights::default();
        let mut transitions = AveragedWeights::default();
        // Pesos REAIS (não averaged), usados para decodificar durante o treino
        let mut current = CrfModel::new(self.feature_config.clone(), self.variant);
        current.possible_transitions = options.possible_transitions;
        for &(prev, next) in &observed {
            current.observe_transition(prev, next);
        }
        let mut steps = 0usize;

        for iteration in 0..options.max_iterations {
            let mut mistakes = 0usize;

            for (x, gold) in xs.iter().zip(ys) {
                let pred = viterbi_decode(&current, x).best_sequence;

                if &pred != gold {
                    mistakes += 1;
                    for (i, fv) in x.iter().enumerate() {
                        if gold[i] != pred[i] {
                            for feature in &fv.features {
                                for (tag, delta) in [(gold[i], 1.0), (pred[i], -1.0)] {
                                    let key = format!("{feature}|{tag}");
                                    emissions.update(&key, delta, steps);
                                    let w = emissions.get(&key);
                                    current.emission_weights.insert(key, w);
                                }
                            }
                        }
                        if i > 0 && (gold[i - 1], gold[i]) != (pred[i - 1], pred[i]) {
                            for ((prev, next), delta) in
                                [((gold[i - 1], gold[i]), 1.0), ((pred[i - 1], pred[i]), -1.0)]
                            {
                                if !current.has_transition_weight(prev, next) {
                                    continue;
                                }
                                let key = transition_key(prev, next);
                                transitions.update(&key, delta, steps);
                                current.set_transition(prev, next, transitions.get(&key));
                            }
                        }
                    }
                }
                steps += 1;
            }

            if options.verbose {
                tracing::info!(iteration, mistakes, sentences = xs.len(), "perceptron epoch");
            } else {
                tracing::debug!(iteration, mistakes, "perceptron epoch");
            }
        }

        let mut model = CrfModel::new(self.feature_config.clone(), self.variant);
        model.emission_weights = emissions.finalize(steps);
        let transition_weights = transitions.finalize(steps);
        for prev in Tag::all() {
            for next in Tag::all() {
                let w = *transition_weights.get(&transition_key(prev, next)).unwrap_or(&0.0);
                model.set_transition(prev, next, w);
                if observed.contains(&(prev, next)) {
                    model.observe_transition(prev, next);
                }
            }
        }
        model.possible_transitions = options.possible_transitions;
        Ok(model)
    }
}

impl LabelerTrainer for PerceptronTrainer {
    fn train(
        &self,
        xs: &[Vec<FeatureVector>],
        ys: &[Vec<Tag>],
        model_path: &Path,
        options: &TrainOptions,
    ) -> Result<()> {
        let model = self.fit(xs, ys, options)?;
        model.save(model_path)?;
        tracing::info!(
            path = %model_path.display(),
            weights = model.emission_weights.len(),
            "model saved"
        );
        Ok(())
    }
}
