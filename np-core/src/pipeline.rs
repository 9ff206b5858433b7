//! # Pipeline de Texto Bruto
//!
//! Coordena tokenizador, analisador morfológico, tradução de tag-set e o
//! [`NpFinder`] para extrair sintagmas nominais de texto cru:
//!
//! ```text
//! texto → tokenize → analyze (1ª análise) → TagMap → [NpFinder] → spans
//!                                                              ↘ bracket
//! ```
//!
//! Palavras sem tag de destino seguem a [`UnresolvedTagPolicy`]: com `Drop`
//! elas somem da sentença analisada e a janela de contexto do codificador
//! passa por cima delas.

use std::borrow::Cow;

use crate::config::{FinderConfig, UnresolvedTagPolicy};
use crate::crf::CrfModel;
use crate::error::{NpError, Result};
use crate::features::FeatureVector;
use crate::finder::NpFinder;
use crate::labeler::SequenceLabeler;
use crate::morph::{LexiconAnalyzer, MorphAnalyzer};
use crate::sentence::{Sentence, Token};
use crate::tagger::{Tag, TaggedToken};
use crate::tagset::TagMap;
use crate::tokenizer::{StandardTokenizer, Tokenizer};

/// Finder de sintagmas sobre texto bruto.
pub struct TextNpFinder<T = StandardTokenizer, M = LexiconAnalyzer, L = CrfModel> {
    tokenizer: T,
    analyzer: M,
    tag_map: Cow<'static, TagMap>,
    unresolved: UnresolvedTagPolicy,
    finder: NpFinder<L>,
}

impl<T, M, L> TextNpFinder<T, M, L>
where
    T: Tokenizer,
    M: MorphAnalyzer,
    L: SequenceLabeler,
{
    pub fn new(config: &FinderConfig, tokenizer: T, analyzer: M, labeler: L) -> Self {
        Self {
            tokenizer,
            analyzer,
            tag_map: Cow::Borrowed(TagMap::default_map()),
            unresolved: config.unresolved_tags,
            finder: NpFinder::new(config, labeler),
        }
    }

    /// Substitui a tabela de tradução padrão.
    pub fn with_tag_map(mut self, tag_map: TagMap) -> Self {
        self.tag_map = Cow::Owned(tag_map);
        self
    }

    /// Tabela em uso; sem [`with_tag_map`](Self::with_tag_map) é a tabela
    /// estática compartilhada por todos os finders.
    pub fn tag_map(&self) -> &TagMap {
        &self.tag_map
    }

    pub fn finder(&self) -> &NpFinder<L> {
        &self.finder
    }

    /// Tokeniza e anota cada palavra com a tag traduzida da sua análise mais provável.
    pub fn analyze_sent(&self, raw: &str) -> Sentence {
        let mut sent = Vec::new();
        for word in self.tokenizer.tokenize(raw) {
            let analysis = self
                .analyzer
                .analyze(&word)
                .into_iter()
                .next()
                .unwrap_or_default();
            match self.tag_map.resolve(&analysis) {
                Some(pos) => sent.push(Token::new(word, Some(pos))),
                None => match self.unresolved {
                    UnresolvedTagPolicy::Drop => {
                        tracing::debug!(word = %word, "word without target tag dropped");
                    }
                    UnresolvedTagPolicy::KeepEmpty => sent.push(Token::new(word, None)),
                },
            }
        }
        sent
    }

    /// Features de cada palavra mantida pela análise.
    pub fn sent2features(&self, raw: &str) -> Result<Vec<FeatureVector>> {
        self.finder.sent2features(&self.analyze_sent(raw))
    }

    pub fn get_tags(&self, raw: &str) -> Result<Vec<Tag>> {
        self.finder.get_tags(&self.analyze_sent(raw))
    }

    pub fn tag_sent(&self, raw: &str) -> Result<Sentence> {
        self.finder.tag_sent(&self.analyze_sent(raw))
    }

    pub fn get_nps(&self, raw: &str) -> Result<Vec<String>> {
        self.finder.get_nps(&self.analyze_sent(raw))
    }

    pub fn get_nps_seq(&self, raw: &str) -> Result<Vec<Vec<TaggedToken>>> {
        self.finder.get_nps_seq(&self.analyze_sent(raw))
    }

    /// Cópia do texto com cada sintagma entre colchetes.
    ///
    /// ```text
    /// "The quick brown fox jumps." → "The [quick brown fox] jumps."
    /// ```
    pub fn bracket(&self, raw: &str) -> Result<String> {
        let nps = self.get_nps(raw)?;
        insert_brackets(raw, &nps)
    }
}

/// Insere `[` e `]` em volta de cada span, procurando-os em ordem no texto.
///
/// A busca de cada span começa no fim da ocorrência anterior, então spans
/// repetidos são casados com ocorrências sucessivas. O texto fora dos spans é
/// copiado sem alteração.
pub fn insert_brackets(text: &str, spans: &[String]) -> Result<String> {
    let mut out = String::with_capacity(text.len() + 2 * spans.len());
    let mut cursor = 0;

    for span in spans {
        let start = text[cursor..]
            .find(span.as_str())
            .map(|offset| cursor + offset)
            .ok_or_else(|| NpError::SpanAlignment {
                span: span.clone(),
                from: cursor,
                text: text.to_string(),
            })?;
        let end = start + span.len();

        out.push_str(&text[cursor..start]);
        out.push('[');
        out.push_str(span);
        out.push(']');
        cursor = end;
    }
    out.push_str(&text[cursor..]);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureConfig;
    use crate::corpus::{demo_corpus, demo_lexicon};
    use crate::morph::Analysis;

    struct FixedLabeler(Vec<Tag>);

    impl SequenceLabeler for FixedLabeler {
        fn tag(&self, _features: &[FeatureVector]) -> Result<Vec<Tag>> {
            Ok(self.0.clone())
        }
    }

    type TestFinder = TextNpFinder<StandardTokenizer, LexiconAnalyzer, FixedLabeler>;

    fn finder(tags: Vec<Tag>, policy: UnresolvedTagPolicy) -> TestFinder {
        let config = FinderConfig {
            unresolved_tags: policy,
            ..FinderConfig::default()
        };
        TextNpFinder::new(
            &config,
            StandardTokenizer,
            LexiconAnalyzer::new(),
            FixedLabeler(tags),
        )
    }

    #[test]
    fn test_bracket_sentence() {
        use Tag::*;
        let f = finder(
            vec![Outside, Begin, Inside, Inside, Outside],
            UnresolvedTagPolicy::Drop,
        );
        assert_eq!(
            f.get_nps("The quick brown fox jumps.").unwrap(),
            vec!["quick brown fox"]
        );
        assert_eq!(
            f.bracket("The quick brown fox jumps.").unwrap(),
            "The [quick brown fox] jumps."
        );
    }

    #[test]
    fn test_bracket_duplicate_occurrences() {
        use Tag::*;
        let f = finder(
            vec![Begin, Inside, Outside, Begin, Inside],
            UnresolvedTagPolicy::Drop,
        );
        assert_eq!(
            f.bracket("the cat saw the cat").unwrap(),
            "[the cat] saw [the cat]"
        );

        let f = finder(vec![Begin, Begin], UnresolvedTagPolicy::Drop);
        assert_eq!(f.bracket("cat cat").unwrap(), "[cat] [cat]");
    }

    #[test]
    fn test_bracket_preserves_spacing() {
        let spans = vec!["big dog".to_string()];
        assert_eq!(
            insert_brackets("  a big dog  barks ", &spans).unwrap(),
            "  a [big dog]  barks "
        );
        assert_eq!(insert_brackets("no spans", &[]).unwrap(), "no spans");
    }

    #[test]
    fn test_bracket_alignment_error() {
        use Tag::*;
        // a vírgula é descartada, então o span "кот пёс" não existe no texto
        let f = finder(vec![Begin, Inside], UnresolvedTagPolicy::Drop);
        let err = f.bracket("кот, пёс").unwrap_err();
        match err {
            NpError::SpanAlignment { span, from, .. } => {
                assert_eq!(span, "кот пёс");
                assert_eq!(from, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unresolved_policy() {
        let drop = finder(vec![], UnresolvedTagPolicy::Drop).analyze_sent("Кот, спит.");
        assert_eq!(drop.len(), 2);
        assert_eq!(drop[0].postag.as_deref(), Some("NID"));

        let keep = finder(vec![], UnresolvedTagPolicy::KeepEmpty).analyze_sent("Кот, спит.");
        assert_eq!(keep.len(), 4);
        assert_eq!(keep[1].word, ",");
        assert_eq!(keep[1].postag, None);

        let features = finder(vec![], UnresolvedTagPolicy::KeepEmpty)
            .sent2features("Кот, спит.")
            .unwrap();
        assert!(features[1].features.contains(&"postag=".to_string()));
    }

    #[test]
    fn test_analyze_with_lexicon() {
        let mut lexicon = LexiconAnalyzer::new();
        lexicon.insert("кошка", Analysis::with_pos("NOUN"));
        lexicon.insert("спит", Analysis::with_pos("VERB"));
        let f = TextNpFinder::new(
            &FinderConfig::default(),
            StandardTokenizer,
            lexicon,
            FixedLabeler(vec![Tag::Begin, Tag::Outside, Tag::Outside]),
        );
        let sent = f.analyze_sent("Кошка спит XIV");
        let tags: Vec<_> = sent.iter().map(|t| t.postag_str()).collect();
        assert_eq!(tags, ["S", "V", "NUM"]);

        let tagged = f.tag_sent("Кошка спит XIV").unwrap();
        assert_eq!(tagged[0].label, Some(Tag::Begin));
        let seq = f.get_nps_seq("Кошка спит XIV").unwrap();
        assert_eq!(seq[0][0].word, "Кошка");
    }

    #[test]
    fn test_custom_tag_map() {
        let map = TagMap::new(
            [("NOUN".to_string(), "NN".to_string())],
            [("UNKN".to_string(), Some("X".to_string()))],
        );
        let mut lexicon = LexiconAnalyzer::new();
        lexicon.insert("кот", Analysis::with_pos("NOUN"));
        let f = TextNpFinder::new(
            &FinderConfig::default(),
            StandardTokenizer,
            lexicon,
            FixedLabeler(vec![]),
        )
        .with_tag_map(map);
        assert!(!std::ptr::eq(f.tag_map(), TagMap::default_map()));
        let sent = f.analyze_sent("кот спит");
        assert_eq!(sent[0].postag.as_deref(), Some("NN"));
        assert_eq!(sent[1].postag.as_deref(), Some("X"));
    }

    #[test]
    fn test_finders_share_default_tag_map() {
        let a = finder(vec![], UnresolvedTagPolicy::Drop);
        let b = finder(vec![], UnresolvedTagPolicy::KeepEmpty);
        assert!(std::ptr::eq(a.tag_map(), TagMap::default_map()));
        assert!(std::ptr::eq(a.tag_map(), b.tag_map()));
    }

    #[test]
    fn test_trained_model_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("np.model");
        let config = FinderConfig {
            features: FeatureConfig::default(),
            ..FinderConfig::default()
        };
        NpFinder::train(&config, &demo_corpus(), &path).unwrap();
        let model = CrfModel::load_for(&path, &config.features, config.variant).unwrap();
        let f = TextNpFinder::new(&config, StandardTokenizer, demo_lexicon(), model);

        let raw = "Старый дом стоит на берегу реки.";
        assert_eq!(f.get_tags(raw).unwrap().len(), 6);
        let bracketed = f.bracket(raw).unwrap();
        assert_eq!(bracketed.replace(['[', ']'], ""), raw);
    }
}
