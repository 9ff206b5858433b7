//! # Avaliação por Tag
//!
//! Relatório de classificação por tag BIO (precisão, revocação, F1 e suporte)
//! sobre as sequências de referência e previstas, contadas token a token.
//! Divisões por zero valem `0.0`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NpError, Result};
use crate::tagger::Tag;

/// Métricas de uma tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub tag: Tag,
    pub precision: f64,
    pub recall: f64,
    pub fscore: f64,
    pub support: usize,
}

/// Relatório completo: uma linha por tag mais médias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_fscore: f64,
    pub weighted_fscore: f64,
    pub support: usize,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Compara sequências de referência e previstas, sentença a sentença.
pub fn classification_report(
    gold: &[Vec<Tag>],
    pred: &[Vec<Tag>],
) -> Result<ClassificationReport> {
    if gold.len() != pred.len() {
        return Err(NpError::Validation(format!(
            "{} gold sequences for {} predicted sequences",
            gold.len(),
            pred.len()
        )));
    }

    // [gold][pred]
    let mut confusion = [[0usize; Tag::COUNT]; Tag::COUNT];
    for (i, (g, p)) in gold.iter().zip(pred).enumerate() {
        if g.len() != p.len() {
            return Err(NpError::Validation(format!(
                "sentence {i}: {} gold tags for {} predicted tags",
                g.len(),
                p.len()
            )));
        }
        for (gt, pt) in g.iter().zip(p) {
            confusion[gt.index()][pt.index()] += 1;
        }
    }

    let total: usize = confusion.iter().flatten().sum();
    let correct: usize = (0..Tag::COUNT).map(|t| confusion[t][t]).sum();

    let classes: Vec<ClassMetrics> = [Tag::Begin, Tag::Inside, Tag::Outside]
        .into_iter()
        .map(|tag| {
            let t = tag.index();
            let tp = confusion[t][t];
            let predicted: usize = (0..Tag::COUNT).map(|g| confusion[g][t]).sum();
            let support: usize = confusion[t].iter().sum();
            let precision = ratio(tp, predicted);
            let recall = ratio(tp, support);
            let fscore = if precision + recall == 0.0 {
                0.0
            } else {
                2.0 * precision * recall / (precision + recall)
            };
            ClassMetrics {
                tag,
                precision,
                recall,
                fscore,
                support,
            }
        })
        .collect();

    let macro_fscore = classes.iter().map(|c| c.fscore).sum::<f64>() / classes.len() as f64;
    let weighted_fscore = if total == 0 {
        0.0
    } else {
        classes
            .iter()
            .map(|c| c.fscore * c.support as f64)
            .sum::<f64>()
            / total as f64
    };

    Ok(ClassificationReport {
        classes,
        accuracy: ratio(correct, total),
        macro_fscore,
        weighted_fscore,
        support: total,
    })
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>6} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>6} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                c.tag.label(), c.precision, c.recall, c.fscore, c.support
            )?;
        }
        writeln!(f)?;
        let averages = [
            ("acc", self.accuracy),
            ("macro", self.macro_fscore),
            ("wavg", self.weighted_fscore),
        ];
        for (i, (name, value)) in averages.into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{name:>6} {:>9} {:>9} {value:>9.2} {:>9}", "", "", self.support)?;
        }
        Ok(())
    }
}
