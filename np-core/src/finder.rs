//! # Finder de Sintagmas sobre Sentenças Anotadas
//!
//! Fachada que liga o codificador de features, o rotulador e o decodificador
//! de spans para sentenças já tokenizadas e com classe gramatical (tuplas de
//! 2, 3 ou 6 campos).
//!
//! ## Exemplo de Uso
//!
//! ```rust,no_run
//! use np_core::{FinderConfig, NpFinder};
//! use np_core::corpus::read_corpus_file;
//!
//! let config = FinderConfig::default();
//! let train = read_corpus_file("train.tsv")?;
//! NpFinder::train(&config, &train, "np.model")?;
//!
//! let finder = NpFinder::load_model(&config, "np.model")?;
//! for np in finder.get_nps(&train[0])? {
//!     println!("{np}");
//! }
//! # Ok::<(), np_core::NpError>(())
//! ```

use std::path::Path;

use crate::config::{DecodePolicy, FinderConfig};
use crate::crf::CrfModel;
use crate::error::{NpError, Result};
use crate::features::{FeatureEncoder, FeatureVector};
use crate::labeler::{LabelerTrainer, SequenceLabeler};
use crate::metrics::{classification_report, ClassificationReport};
use crate::perceptron::PerceptronTrainer;
use crate::sentence::{sent2labels, tag_sentence, zip_tagged, Sentence, Token};
use crate::span::{decode_text_spans, decode_token_spans};
use crate::tagger::{Tag, TaggedToken};

/// Finder de sintagmas nominais sobre sentenças anotadas.
pub struct NpFinder<L = CrfModel> {
    encoder: FeatureEncoder,
    decode: DecodePolicy,
    labeler: L,
}

impl NpFinder<CrfModel> {
    /// Treina o rotulador padrão (perceptron médio) e grava o modelo em `model_path`.
    pub fn train(
        config: &FinderConfig,
        sents: &[Sentence],
        model_path: impl AsRef<Path>,
    ) -> Result<()> {
        let trainer = PerceptronTrainer::new(config.features.clone(), config.variant);
        train_with(config, &trainer, sents, model_path.as_ref())
    }

    /// Carrega um modelo treinado com exatamente esta configuração de features.
    pub fn load_model(config: &FinderConfig, model_path: impl AsRef<Path>) -> Result<Self> {
        let model = CrfModel::load_for(model_path, &config.features, config.variant)?;
        Ok(Self::new(config, model))
    }
}

impl<L: SequenceLabeler> NpFinder<L> {
    pub fn new(config: &FinderConfig, labeler: L) -> Self {
        Self {
            encoder: FeatureEncoder::new(config.features.clone(), config.variant),
            decode: config.decode,
            labeler,
        }
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn labeler(&self) -> &L {
        &self.labeler
    }

    /// Features de cada token da sentença.
    pub fn sent2features(&self, sent: &[Token]) -> Result<Vec<FeatureVector>> {
        self.encoder.encode(sent)
    }

    /// Tags BIO previstas, uma por token.
    pub fn get_tags(&self, sent: &[Token]) -> Result<Vec<Tag>> {
        if sent.is_empty() {
            return Ok(Vec::new());
        }
        let features = self.encoder.encode(sent)?;
        let tags = self.labeler.tag(&features)?;
        if tags.len() != sent.len() {
            return Err(NpError::Validation(format!(
                "labeler returned {} tags for {} tokens",
                tags.len(),
                sent.len()
            )));
        }
        Ok(tags)
    }

    /// A sentença com as tags previstas no lugar das de referência.
    pub fn tag_sent(&self, sent: &[Token]) -> Result<Sentence> {
        let tags = self.get_tags(sent)?;
        tag_sentence(sent, &tags)
    }

    /// Sintagmas previstos, como texto, na ordem do documento.
    pub fn get_nps(&self, sent: &[Token]) -> Result<Vec<String>> {
        let tags = self.get_tags(sent)?;
        decode_text_spans(&zip_tagged(sent, &tags)?, self.decode)
    }

    /// Sintagmas previstos, como sequências de (palavra, classe, tag).
    pub fn get_nps_seq(&self, sent: &[Token]) -> Result<Vec<Vec<TaggedToken>>> {
        let tags = self.get_tags(sent)?;
        decode_token_spans(&zip_tagged(sent, &tags)?, self.decode)
    }

    /// Compara as tags previstas com as de referência de um corpus rotulado.
    pub fn evaluate(&self, sents: &[Sentence]) -> Result<ClassificationReport> {
        let mut gold = Vec::with_capacity(sents.len());
        let mut pred = Vec::with_capacity(sents.len());
        for sent in sents {
            gold.push(sent2labels(sent)?);
            pred.push(self.get_tags(sent)?);
        }
        classification_report(&gold, &pred)
    }
}

/// Treina qualquer rotulador a partir de sentenças rotuladas (3 ou 6 campos).
pub fn train_with<T: LabelerTrainer>(
    config: &FinderConfig,
    trainer: &T,
    sents: &[Sentence],
    model_path: &Path,
) -> Result<()> {
    if sents.is_empty() {
        return Err(NpError::EmptyTrainingSet);
    }
    let encoder = FeatureEncoder::new(config.features.clone(), config.variant);
    let xs = encoder.encode_corpus(sents)?;
    let ys = sents
        .iter()
        .map(|s| sent2labels(s))
        .collect::<Result<Vec<_>>>()?;
    tracing::info!(
        sentences = sents.len(),
        tokens = ys.iter().map(Vec::len).sum::<usize>(),
        "training noun-phrase labeler"
    );
    trainer.train(&xs, &ys, model_path, &config.train)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EncoderVariant, FeatureConfig};
    use crate::corpus::demo_corpus;
    use crate::sentence::Morphology;

    /// Rotulador fixo para testar a fachada sem modelo treinado.
    struct FixedLabeler(Vec<Tag>);

    impl SequenceLabeler for FixedLabeler {
        fn tag(&self, _features: &[FeatureVector]) -> Result<Vec<Tag>> {
            Ok(self.0.clone())
        }
    }

    fn plain(words: &[(&str, &str)]) -> Sentence {
        words.iter().map(|(w, p)| Token::new(*w, Some(*p))).collect()
    }

    #[test]
    fn test_get_nps_with_fixed_labeler() {
        use Tag::*;
        let sent = plain(&[
            ("the", "DT"),
            ("cat", "NN"),
            ("sat", "VB"),
            ("on", "IN"),
            ("mat", "NN"),
            ("dog", "NN"),
            ("ran", "VB"),
        ]);
        let labeler = FixedLabeler(vec![Outside, Begin, Inside, Inside, Outside, Begin, Outside]);
        let finder = NpFinder::new(&FinderConfig::default(), labeler);

        assert_eq!(finder.get_nps(&sent).unwrap(), vec!["cat sat on", "dog"]);
        let seq = finder.get_nps_seq(&sent).unwrap();
        assert_eq!(seq[1][0].postag.as_deref(), Some("NN"));

        let tagged = finder.tag_sent(&sent).unwrap();
        assert_eq!(tagged[1].label, Some(Begin));
        assert_eq!(tagged[0].label, Some(Outside));
    }

    #[test]
    fn test_labeler_length_mismatch() {
        let sent = plain(&[("кот", "S"), ("спит", "V")]);
        let finder = NpFinder::new(&FinderConfig::default(), FixedLabeler(vec![Tag::Begin]));
        assert!(matches!(finder.get_tags(&sent), Err(NpError::Validation(_))));
    }

    #[test]
    fn test_empty_sentence() {
        let finder = NpFinder::new(&FinderConfig::default(), FixedLabeler(vec![Tag::Begin]));
        assert!(finder.get_tags(&[]).unwrap().is_empty());
        assert!(finder.get_nps(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_train_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("np.model");
        let config = FinderConfig::default();
        let corpus = demo_corpus();

        NpFinder::train(&config, &corpus, &path).unwrap();
        let finder = NpFinder::load_model(&config, &path).unwrap();

        let tags = finder.get_tags(&corpus[0]).unwrap();
        assert_eq!(tags.len(), corpus[0].len());

        let report = finder.evaluate(&corpus).unwrap();
        assert_eq!(report.support, corpus.iter().map(Vec::len).sum::<usize>());
    }

    #[test]
    fn test_load_with_other_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("np.model");
        NpFinder::train(&FinderConfig::default(), &demo_corpus(), &path).unwrap();

        let other = FinderConfig {
            features: FeatureConfig {
                siblings: 1,
                ..FeatureConfig::default()
            },
            ..FinderConfig::default()
        };
        assert!(matches!(
            NpFinder::load_model(&other, &path),
            Err(NpError::ConfigMismatch)
        ));
    }

    #[test]
    fn test_train_requires_labels() {
        let dir = tempfile::tempdir().unwrap();
        let sents = vec![plain(&[("кот", "S")])];
        let err = NpFinder::train(&FinderConfig::default(), &sents, dir.path().join("m"));
        assert!(matches!(err, Err(NpError::Validation(_))));
    }

    #[test]
    fn test_morphological_finder() {
        let config = FinderConfig {
            variant: EncoderVariant::Morphological,
            ..FinderConfig::default()
        };
        let sent = vec![
            Token::with_morph("кот", Some("S"), Tag::Outside, Morphology::default()),
            Token::with_morph("спит", Some("V"), Tag::Outside, Morphology::default()),
        ];
        let finder = NpFinder::new(&config, FixedLabeler(vec![Tag::Begin, Tag::Outside]));
        let tagged = finder.tag_sent(&sent).unwrap();
        assert_eq!(tagged[0].label, Some(Tag::Begin));
        assert!(tagged[0].morph.is_some());
        assert_eq!(finder.get_nps(&sent).unwrap(), vec!["кот"]);
    }
}
