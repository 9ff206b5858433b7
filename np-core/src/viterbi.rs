//! # Algoritmo de Viterbi — Decodificação de Sequências CRF
//!
//! O Viterbi é um método de **programação dinâmica** que encontra a sequência
//! de tags de maior score. Com 3 tags e N tokens, uma busca exaustiva custaria
//! `O(3^N)`; o Viterbi explora que a melhor sequência até o token `i` com tag
//! `t` depende apenas da melhor sequência até `i-1` → `O(N × T²)`.
//!
//! ```text
//! Inicialização: viterbi[0][t] = emission(t, x_0)
//! Recursão:      viterbi[i][t] = max_{t'} [viterbi[i-1][t'] + transition(t', t)]
//!                                + emission(t, x_i)
//! Backtracking:  reconstrói o caminho ótimo de trás pra frente
//! ```
//!
//! Com `possible_transitions = false`, transições não observadas no treino
//! entram com score 0: continuam alcançáveis, só não têm peso aprendido.

use serde::{Deserialize, Serialize};

use crate::crf::{compute_emission_scores, CrfModel};
use crate::features::FeatureVector;
use crate::tagger::Tag;

/// Resultado completo do Viterbi
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViterbiResult {
    /// Sequência de tags mais provável (uma por token)
    pub best_sequence: Vec<Tag>,
    /// Score (não-normalizado) da melhor sequência
    pub best_score: f64,
}

/// Executa o algoritmo de Viterbi sobre os features de uma sequência
pub fn viterbi_decode(model: &CrfModel, feature_vectors: &[FeatureVector]) -> ViterbiResult {
    if feature_vectors.is_empty() {
        return ViterbiResult {
            best_sequence: vec![],
            best_score: 0.0,
        };
    }

    let n_tokens = feature_vectors.len();
    let tags = Tag::all();
    let n_tags = tags.len();

    // Pré-calcula scores de emissão: emission[i][t]
    let emission = compute_emission_scores(model, feature_vectors);

    // viterbi[t] = melhor score acumulado para tag t no token atual
    let mut viterbi: Vec<f64> = emission[0].clone();
    // backptr[i][t] = índice da tag anterior que maximiza o score
    let mut backptr: Vec<Vec<usize>> = vec![vec![0usize; n_tags]; n_tokens];

    for i in 1..n_tokens {
        let mut new_viterbi = vec![f64::NEG_INFINITY; n_tags];

        for t in 0..n_tags {
            let mut best_prev_score = f64::NEG_INFINITY;
            let mut best_prev_tag = 0;

            for prev_t in 0..n_tags {
                let score = viterbi[prev_t] + model.transition_score(tags[prev_t], tags[t]);
                if score > best_prev_score {
                    best_prev_score = score;
                    best_prev_tag = prev_t;
                }
            }

            new_viterbi[t] = best_prev_score + emission[i][t];
            backptr[i][t] = best_prev_tag;
        }

        viterbi = new_viterbi;
    }

    // === Backtracking ===
    let (mut best_last, best_score) = best_in_slice(&viterbi);
    let mut best_sequence: Vec<Tag> = vec![tags[0]; n_tokens];
    best_sequence[n_tokens - 1] = tags[best_last];

    for i in (0..n_tokens - 1).rev() {
        best_last = backptr[i + 1][best_last];
        best_sequence[i] = tags[best_last];
    }

    ViterbiResult {
        best_sequence,
        best_score,
    }
}

/// Retorna (índice, valor) do máximo; em empate, o menor índice.
fn best_in_slice(scores: &[f64]) -> (usize, f64) {
    scores
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, &v)| {
            if v > best.1 {
                (i, v)
            } else {
                best
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fv(index: usize, features: &[&str]) -> FeatureVector {
        let mut fv = FeatureVector::new(index);
        for f in features {
            fv.push(*f);
        }
        fv
    }

    #[test]
    fn test_viterbi_follows_emissions() {
        let mut model = CrfModel::default();
        model.set_emission("postag=A", Tag::Begin, 5.0);
        model.set_emission("postag=S", Tag::Inside, 2.0);
        model.set_emission("postag=V", Tag::Outside, 4.0);

        let fvs = vec![
            fv(0, &["bias", "postag=A"]),
            fv(1, &["bias", "postag=S"]),
            fv(2, &["bias", "postag=V"]),
        ];

        let result = viterbi_decode(&model, &fvs);
        assert_eq!(result.best_sequence, vec![Tag::Begin, Tag::Inside, Tag::Outside]);
        assert!((result.best_score - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_viterbi_transition_overrides_weak_emission() {
        let mut model = CrfModel::default();
        model.set_emission("postag=S", Tag::Begin, 1.0);
        model.set_emission("postag=S", Tag::Inside, 0.5);
        model.set_transition(Tag::Begin, Tag::Inside, 2.0);

        let fvs = vec![fv(0, &["postag=S"]), fv(1, &["postag=S"])];
        let result = viterbi_decode(&model, &fvs);
        assert_eq!(result.best_sequence, vec![Tag::Begin, Tag::Inside]);
    }

    #[test]
    fn test_viterbi_ignores_weight_of_unobserved_transition() {
        let mut model = CrfModel::default();
        model.possible_transitions = false;
        model.observe_transition(Tag::Begin, Tag::Inside);
        model.set_transition(Tag::Begin, Tag::Inside, 1.0);
        // peso negativo numa transição nunca vista não conta
        model.set_transition(Tag::Outside, Tag::Inside, -10.0);
        model.set_emission("x", Tag::Outside, 3.0);
        model.set_emission("y", Tag::Inside, 3.0);

        let fvs = vec![fv(0, &["x"]), fv(1, &["y"])];
        let result = viterbi_decode(&model, &fvs);
        assert_eq!(result.best_sequence, vec![Tag::Outside, Tag::Inside]);
        assert!((result.best_score - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_viterbi_score_is_finite_when_transitions_unobserved() {
        let mut model = CrfModel::default();
        model.possible_transitions = false;
        model.observe_transition(Tag::Begin, Tag::Outside);
        model.set_emission("x", Tag::Outside, 1.0);

        let fvs = vec![fv(0, &["x"]), fv(1, &["x"]), fv(2, &["x"])];
        let result = viterbi_decode(&model, &fvs);
        assert_eq!(result.best_sequence.len(), 3);
        assert!(result.best_score.is_finite());
        assert!((result.best_score - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_viterbi_empty() {
        let result = viterbi_decode(&CrfModel::default(), &[]);
        assert!(result.best_sequence.is_empty());
    }
}
