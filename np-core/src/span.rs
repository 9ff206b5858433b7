//! # Decodificação BIO → Sintagmas
//!
//! Reconstrói os sintagmas nominais a partir da sequência de tags prevista.
//!
//! ## Algoritmo
//! A sequência é varrida **de trás para frente** com um acumulador:
//! - `I`: o token entra no acumulador (nada é fechado);
//! - `B`: o token entra no acumulador e o sintagma é fechado;
//! - `O`: o acumulador não é alterado.
//!
//! No fim, a lista de sintagmas é invertida para voltar à ordem do texto.
//! Um acumulador ainda aberto ao fim da varredura (sequência iniciada por
//! `I` sem `B`) é tratado conforme a [`DecodePolicy`].

use crate::config::DecodePolicy;
use crate::error::{NpError, Result};
use crate::tagger::{Tag, TaggedToken};

/// Varredura reversa; devolve, para cada sintagma, seus tokens em ordem direta.
fn collect_spans(tagged: &[TaggedToken], policy: DecodePolicy) -> Result<Vec<Vec<&TaggedToken>>> {
    if policy == DecodePolicy::Strict {
        let mut prev = None;
        for (i, token) in tagged.iter().enumerate() {
            if !Tag::is_valid_transition(prev, token.tag) {
                return Err(NpError::Validation(format!(
                    "tag I at token {i} ({:?}) does not continue a noun phrase",
                    token.word
                )));
            }
            prev = Some(token.tag);
        }
    }

    let init: (Vec<&TaggedToken>, Vec<Vec<&TaggedToken>>) = (Vec::new(), Vec::new());
    let (pending, mut spans) = tagged.iter().rev().fold(
        init,
        |(mut current, mut spans), token| {
            match token.tag {
                Tag::Inside => current.push(token),
                Tag::Begin => {
                    current.push(token);
                    current.reverse();
                    spans.push(std::mem::take(&mut current));
                }
                Tag::Outside => {}
            }
            (current, spans)
        },
    );

    if !pending.is_empty() {
        tracing::debug!(
            tokens = pending.len(),
            "discarding leading I run without a B"
        );
    }

    spans.reverse();
    Ok(spans)
}

/// Sintagmas como texto: palavras unidas por um espaço.
///
/// # Exemplo
/// `[the/O cat/B sat/I on/I mat/O dog/B ran/O]` → `["cat sat on", "dog"]`
pub fn decode_text_spans(tagged: &[TaggedToken], policy: DecodePolicy) -> Result<Vec<String>> {
    Ok(collect_spans(tagged, policy)?
        .into_iter()
        .map(|span| {
            let words: Vec<&str> = span.iter().map(|t| t.word.as_str()).collect();
            words.join(" ").trim_end().to_string()
        })
        .collect())
}

/// Sintagmas como sequências de tokens (palavra, classe, tag), em ordem direta.
pub fn decode_token_spans(
    tagged: &[TaggedToken],
    policy: DecodePolicy,
) -> Result<Vec<Vec<TaggedToken>>> {
    Ok(collect_spans(tagged, policy)?
        .into_iter()
        .map(|span| span.into_iter().cloned().collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(words: &[&str], tags: &[&str]) -> Vec<TaggedToken> {
        words
            .iter()
            .zip(tags)
            .map(|(w, t)| TaggedToken {
                word: w.to_string(),
                postag: None,
                tag: t.parse().unwrap(),
            })
            .collect()
    }

    #[test]
    fn test_decode_text_spans() {
        let seq = tagged(
            &["the", "cat", "sat", "on", "mat", "dog", "ran"],
            &["O", "B", "I", "I", "O", "B", "O"],
        );
        let spans = decode_text_spans(&seq, DecodePolicy::Lenient).unwrap();
        assert_eq!(spans, vec!["cat sat on", "dog"]);
    }

    #[test]
    fn test_decode_token_spans() {
        let seq = tagged(
            &["the", "cat", "sat", "on", "mat", "dog", "ran"],
            &["O", "B", "I", "I", "O", "B", "O"],
        );
        let spans = decode_token_spans(&seq, DecodePolicy::Lenient).unwrap();
        assert_eq!(spans.len(), 2);
        let words: Vec<&str> = spans[0].iter().map(|t| t.word.as_str()).collect();
        assert_eq!(words, vec!["cat", "sat", "on"]);
        assert_eq!(spans[0][0].tag, Tag::Begin);
        assert_eq!(spans[0][2].tag, Tag::Inside);
        assert_eq!(spans[1][0].word, "dog");
    }

    #[test]
    fn test_adjacent_spans() {
        let seq = tagged(&["старый", "дом", "новый", "сад"], &["B", "I", "B", "I"]);
        let spans = decode_text_spans(&seq, DecodePolicy::Lenient).unwrap();
        assert_eq!(spans, vec!["старый дом", "новый сад"]);
    }

    #[test]
    fn test_leading_inside_is_dropped_when_lenient() {
        let seq = tagged(&["cat", "ran"], &["I", "O"]);
        assert!(decode_text_spans(&seq, DecodePolicy::Lenient).unwrap().is_empty());
        assert!(decode_token_spans(&seq, DecodePolicy::Lenient).unwrap().is_empty());
    }

    #[test]
    fn test_leading_inside_is_rejected_when_strict() {
        let seq = tagged(&["cat", "ran"], &["I", "O"]);
        assert!(matches!(
            decode_text_spans(&seq, DecodePolicy::Strict),
            Err(NpError::Validation(_))
        ));
    }

    #[test]
    fn test_inside_after_outside_joins_previous_begin_when_lenient() {
        // O não fecha o acumulador: o `I` órfão é absorvido pelo `B` anterior.
        let seq = tagged(&["a", "b", "c"], &["B", "O", "I"]);
        let spans = decode_text_spans(&seq, DecodePolicy::Lenient).unwrap();
        assert_eq!(spans, vec!["a c"]);
        assert!(decode_text_spans(&seq, DecodePolicy::Strict).is_err());
    }

    #[test]
    fn test_empty_and_all_outside() {
        assert!(decode_text_spans(&[], DecodePolicy::Strict).unwrap().is_empty());
        let seq = tagged(&["и", "но"], &["O", "O"]);
        assert!(decode_text_spans(&seq, DecodePolicy::Strict).unwrap().is_empty());
    }
}
