//! # Corpus Anotado em Colunas
//!
//! Leitura de corpora no formato de colunas separadas por TAB, um token por
//! linha e uma linha em branco entre sentenças:
//!
//! ```text
//! Красная	A	B
//! площадь	S	I
//! находится	V	O
//! ```
//!
//! Cada linha tem 2 (palavra, classe), 3 (+ tag BIO) ou 6 colunas
//! (+ caso, gênero, número). `_` marca um valor ausente. Linhas iniciadas por
//! `#` são comentários.
//!
//! O módulo também traz um pequeno corpus de demonstração em russo, com o
//! tag-set do SynTagRus e sem pontuação (como o analisador padrão produz).

use std::io::BufRead;
use std::path::Path;

use crate::error::{NpError, Result};
use crate::morph::{Analysis, LexiconAnalyzer, MorphAnalyzer};
use crate::sentence::{sentence_shape, Morphology, Sentence, Token};
use crate::tagger::Tag;

fn field(value: &str) -> Option<&str> {
    match value {
        "_" | "" => None,
        v => Some(v),
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<Token> {
    let cols: Vec<&str> = line.split('\t').collect();
    let label = |raw: &str| -> Result<Tag> {
        raw.parse().map_err(|_| NpError::Corpus {
            line: line_no,
            message: format!("unknown tag {raw:?}"),
        })
    };
    match cols.as_slice() {
        [word, pos] => Ok(Token::new(*word, field(*pos))),
        [word, pos, tag] => Ok(Token::labeled(*word, field(*pos), label(*tag)?)),
        [word, pos, tag, case, gender, number] => Ok(Token::with_morph(
            *word,
            field(*pos),
            label(*tag)?,
            Morphology {
                case: field(*case).map(str::to_string),
                gender: field(*gender).map(str::to_string),
                number: field(*number).map(str::to_string),
            },
        )),
        _ => Err(NpError::Corpus {
            line: line_no,
            message: format!("expected 2, 3 or 6 columns, got {}", cols.len()),
        }),
    }
}

/// Lê sentenças de qualquer fonte bufferizada.
///
/// Cada sentença é validada: todos os tokens devem ter o mesmo número de colunas.
pub fn read_corpus<R: BufRead>(reader: R) -> Result<Vec<Sentence>> {
    let mut sents = Vec::new();
    let mut current: Sentence = Vec::new();
    let mut start_line = 1;

    let mut finish = |current: &mut Sentence, start_line: usize| -> Result<()> {
        if current.is_empty() {
            return Ok(());
        }
        sentence_shape(current).map_err(|e| NpError::Corpus {
            line: start_line,
            message: e.to_string(),
        })?;
        sents.push(std::mem::take(current));
        Ok(())
    };

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty() {
            finish(&mut current, start_line)?;
            continue;
        }
        if trimmed.starts_with('#') {
            continue;
        }
        if current.is_empty() {
            start_line = line_no;
        }
        current.push(parse_line(trimmed, line_no)?);
    }
    finish(&mut current, start_line)?;

    Ok(sents)
}

pub fn read_corpus_str(text: &str) -> Result<Vec<Sentence>> {
    read_corpus(text.as_bytes())
}

pub fn read_corpus_file(path: impl AsRef<Path>) -> Result<Vec<Sentence>> {
    let file = std::fs::File::open(path)?;
    read_corpus(std::io::BufReader::new(file))
}

/// Uma sentença anotada do corpus embutido: (palavra, classe, tag).
pub struct AnnotatedSentence {
    pub text: &'static str,
    pub annotations: &'static [(&'static str, &'static str, &'static str)],
}

const DEMO: &[AnnotatedSentence] = &[
    AnnotatedSentence {
        text: "Красная площадь находится в центре Москвы.",
        annotations: &[
            ("Красная", "A", "B"),
            ("площадь", "S", "I"),
            ("находится", "V", "O"),
            ("в", "PR", "O"),
            ("центре", "S", "B"),
            ("Москвы", "S", "I"),
        ],
    },
    AnnotatedSentence {
        text: "Старый дом стоит на берегу реки.",
        annotations: &[
            ("Старый", "A", "B"),
            ("дом", "S", "I"),
            ("стоит", "V", "O"),
            ("на", "PR", "O"),
            ("берегу", "S", "B"),
            ("реки", "S", "I"),
        ],
    },
    AnnotatedSentence {
        text: "Мама мыла раму.",
        annotations: &[("Мама", "S", "B"), ("мыла", "V", "O"), ("раму", "S", "B")],
    },
    AnnotatedSentence {
        text: "Новый учебник лежит на столе.",
        annotations: &[
            ("Новый", "A", "B"),
            ("учебник", "S", "I"),
            ("лежит", "V", "O"),
            ("на", "PR", "O"),
            ("столе", "S", "B"),
        ],
    },
    AnnotatedSentence {
        text: "Студенты читают интересную книгу.",
        annotations: &[
            ("Студенты", "S", "B"),
            ("читают", "V", "O"),
            ("интересную", "A", "B"),
            ("книгу", "S", "I"),
        ],
    },
    AnnotatedSentence {
        text: "Большая собака громко лает.",
        annotations: &[
            ("Большая", "A", "B"),
            ("собака", "S", "I"),
            ("громко", "ADV", "O"),
            ("лает", "V", "O"),
        ],
    },
    AnnotatedSentence {
        text: "Мы купили свежий хлеб и молоко.",
        annotations: &[
            ("Мы", "S", "B"),
            ("купили", "V", "O"),
            ("свежий", "A", "B"),
            ("хлеб", "S", "I"),
            ("и", "CONJ", "O"),
            ("молоко", "S", "B"),
        ],
    },
    AnnotatedSentence {
        text: "Кошка спит на тёплом диване.",
        annotations: &[
            ("Кошка", "S", "B"),
            ("спит", "V", "O"),
            ("на", "PR", "O"),
            ("тёплом", "A", "B"),
            ("диване", "S", "I"),
        ],
    },
    AnnotatedSentence {
        text: "Учитель объясняет новую тему.",
        annotations: &[
            ("Учитель", "S", "B"),
            ("объясняет", "V", "O"),
            ("новую", "A", "B"),
            ("тему", "S", "I"),
        ],
    },
    AnnotatedSentence {
        text: "Компания Google выпустила новый телефон.",
        annotations: &[
            ("Компания", "S", "B"),
            ("Google", "NID", "I"),
            ("выпустила", "V", "O"),
            ("новый", "A", "B"),
            ("телефон", "S", "I"),
        ],
    },
    AnnotatedSentence {
        text: "Дети играют в парке.",
        annotations: &[
            ("Дети", "S", "B"),
            ("играют", "V", "O"),
            ("в", "PR", "O"),
            ("парке", "S", "B"),
        ],
    },
];

/// Corpus de demonstração como sentenças rotuladas (3 campos).
pub fn demo_corpus() -> Vec<Sentence> {
    DEMO.iter()
        .map(|s| {
            s.annotations
                .iter()
                .map(|(word, pos, tag)| {
                    let tag: Tag = tag.parse().expect("demo corpus tag is B, I or O");
                    Token::labeled(*word, Some(*pos), tag)
                })
                .collect()
        })
        .collect()
}

/// Textos brutos do corpus de demonstração.
pub fn demo_texts() -> Vec<&'static str> {
    DEMO.iter().map(|s| s.text).collect()
}

/// Léxico com as palavras do corpus de demonstração.
///
/// As classes são convertidas de volta para o tag-set do OpenCorpora para que
/// a tradução padrão reproduza as tags do corpus. Palavras `NID` ficam de
/// fora: o classificador de superfície já as resolve.
pub fn demo_lexicon() -> LexiconAnalyzer {
    let mut lexicon = LexiconAnalyzer::new();
    for (word, pos, _) in DEMO.iter().flat_map(|s| s.annotations.iter()) {
        let source = match *pos {
            "S" => "NOUN",
            "A" => "ADJF",
            "V" => "VERB",
            "PR" => "PREP",
            "CONJ" => "CONJ",
            "ADV" => "ADVB",
            "NUM" => "NUMR",
            "PART" => "PRCL",
            _ => continue,
        };
        if lexicon.analyze(word)[0].pos.is_none() {
            lexicon.insert(word, Analysis::with_pos(source));
        }
    }
    lexicon
}
