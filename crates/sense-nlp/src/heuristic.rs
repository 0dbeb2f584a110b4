//! Rule-based annotation capability.
//!
//! Tokenises with a single regular expression, flags stop words, punctuation
//! and alphabetic tokens, folds regular plurals into lemmas and recognises
//! entities from surface cues (handles, hashtags, numbers, acronyms and runs
//! of capitalised words).

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use sense_core::AnnotationError;
use tracing::{debug, info};

use crate::annotation::{AnnotatedDoc, Annotator, Entity, Token};
use crate::stopwords::is_stop_word;

const TOKEN_PATTERN: &str =
    r"https?://\S+|[@#][\p{L}\p{N}_]+|[\p{L}\p{N}]+(?:['’]\p{L}+)*|\S";

const IRREGULAR_LEMMAS: &[(&str, &str)] = &[
    ("children", "child"),
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("went", "go"),
    ("gone", "go"),
    ("ran", "run"),
    ("wrote", "write"),
    ("written", "write"),
    ("ate", "eat"),
    ("eaten", "eat"),
    ("saw", "see"),
    ("seen", "see"),
    ("took", "take"),
    ("taken", "take"),
    ("better", "good"),
    ("best", "good"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Url,
    Handle,
    Hashtag,
    Word,
    Symbol,
}

// ── HeuristicAnnotator ────────────────────────────────────────────────────────

/// Rule-based [`Annotator`] for English social-media text.
#[derive(Debug)]
pub struct HeuristicAnnotator {
    token_pattern: Regex,
    irregular: HashMap<&'static str, &'static str>,
}

static SHARED: OnceLock<HeuristicAnnotator> = OnceLock::new();

/// The process-wide annotator, built on first use and reused afterwards.
pub fn shared_annotator() -> Result<&'static HeuristicAnnotator, AnnotationError> {
    if let Some(annotator) = SHARED.get() {
        return Ok(annotator);
    }
    let annotator = HeuristicAnnotator::new()?;
    info!("Heuristic annotation model loaded");
    Ok(SHARED.get_or_init(|| annotator))
}

impl HeuristicAnnotator {
    pub fn new() -> Result<Self, AnnotationError> {
        let token_pattern = Regex::new(TOKEN_PATTERN)
            .map_err(|e| AnnotationError::ModelUnavailable(e.to_string()))?;
        Ok(Self {
            token_pattern,
            irregular: IRREGULAR_LEMMAS.iter().copied().collect(),
        })
    }

    /// Annotate a single string.
    pub fn annotate(&self, text: &str) -> Result<AnnotatedDoc, AnnotationError> {
        if text.contains('\0') {
            return Err(AnnotationError::UnsupportedInput(
                "text contains a NUL byte".to_string(),
            ));
        }

        let mut tokens = Vec::new();
        let mut kinds = Vec::new();
        let mut sentence_starts = Vec::new();
        let mut prev_end = 0;
        let mut after_terminator = true;

        for m in self.token_pattern.find_iter(text) {
            let surface = m.as_str();
            let starts_sentence = after_terminator || text[prev_end..m.start()].contains('\n');
            prev_end = m.end();

            let kind = classify(surface);
            after_terminator = kind == TokenKind::Symbol && matches!(surface, "." | "!" | "?" | "…");

            tokens.push(self.make_token(surface, kind));
            kinds.push(kind);
            sentence_starts.push(starts_sentence);
        }

        let entities = find_entities(&tokens, &kinds, &sentence_starts);
        Ok(AnnotatedDoc { tokens, entities })
    }

    fn make_token(&self, surface: &str, kind: TokenKind) -> Token {
        let lower = surface.to_lowercase();
        let is_alpha = kind == TokenKind::Word && surface.chars().all(char::is_alphabetic);
        let is_punct = kind == TokenKind::Symbol && surface.chars().all(is_punctuation);
        let is_stop = is_stop_word(&lower);
        let lemma = if is_alpha {
            self.lemmatize(&lower)
        } else {
            lower
        };
        Token {
            text: surface.to_string(),
            lemma,
            is_stop,
            is_punct,
            is_alpha,
        }
    }

    /// Fold a lowercase alphabetic word to its dictionary form.
    fn lemmatize(&self, lower: &str) -> String {
        if let Some(lemma) = self.irregular.get(lower) {
            return (*lemma).to_string();
        }

        let len = lower.chars().count();
        if len > 4 {
            if let Some(stem) = lower.strip_suffix("ies") {
                return format!("{stem}y");
            }
        }
        if let Some(stem) = lower.strip_suffix("sses") {
            return format!("{stem}ss");
        }
        for suffix in ["ches", "shes", "xes"] {
            if let Some(stem) = lower.strip_suffix(suffix) {
                if stem.chars().count() >= 2 {
                    return format!("{stem}{}", &suffix[..suffix.len() - 2]);
                }
            }
        }
        if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
            return lower.to_string();
        }
        if len > 3 {
            if let Some(stem) = lower.strip_suffix('s') {
                return stem.to_string();
            }
        }
        lower.to_string()
    }
}

impl Annotator for HeuristicAnnotator {
    fn annotate_batch(&self, texts: &[&str]) -> Result<Vec<AnnotatedDoc>, AnnotationError> {
        debug!("Annotating batch of {} texts", texts.len());
        texts.iter().map(|text| self.annotate(text)).collect()
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn classify(surface: &str) -> TokenKind {
    if surface.starts_with("http://") || surface.starts_with("https://") {
        TokenKind::Url
    } else if surface.len() > 1 && surface.starts_with('@') {
        TokenKind::Handle
    } else if surface.len() > 1 && surface.starts_with('#') {
        TokenKind::Hashtag
    } else if surface.chars().next().is_some_and(char::is_alphanumeric) {
        TokenKind::Word
    } else {
        TokenKind::Symbol
    }
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '“' | '”' | '‘' | '’' | '…' | '—' | '–' | '«' | '»' | '¡' | '¿' | '·' | '•'
        )
}

fn is_capitalised(token: &Token) -> bool {
    let mut chars = token.text.chars();
    let first_upper = chars.next().is_some_and(char::is_uppercase);
    first_upper && !is_all_caps(token)
}

fn is_all_caps(token: &Token) -> bool {
    token.text.chars().count() >= 2 && token.text.chars().all(char::is_uppercase)
}

/// Recognise entities from token surface cues.
fn find_entities(tokens: &[Token], kinds: &[TokenKind], sentence_starts: &[bool]) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut run: Vec<usize> = Vec::new();

    let flush = |run: &mut Vec<usize>, entities: &mut Vec<Entity>| {
        // A lone capitalised word opening a sentence is just grammar.
        let keep = run.len() > 1 || run.first().is_some_and(|&i| !sentence_starts[i]);
        if keep {
            let text = run
                .iter()
                .map(|&i| tokens[i].text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            entities.push(Entity {
                text,
                label: "NAME".to_string(),
            });
        }
        run.clear();
    };

    for (i, token) in tokens.iter().enumerate() {
        let extends_name = token.is_alpha
            && !token.is_stop
            && is_capitalised(token)
            && (run.is_empty() || !sentence_starts[i]);

        if extends_name {
            run.push(i);
            continue;
        }
        flush(&mut run, &mut entities);

        // A capitalised word that broke a run by opening a new sentence starts its own.
        if token.is_alpha && !token.is_stop && is_capitalised(token) {
            run.push(i);
            continue;
        }

        let label = match kinds[i] {
            TokenKind::Handle => Some("HANDLE"),
            TokenKind::Hashtag => Some("HASHTAG"),
            TokenKind::Word if token.text.chars().all(|c| c.is_ascii_digit()) => Some("CARDINAL"),
            TokenKind::Word if token.is_alpha && !token.is_stop && is_all_caps(token) => {
                Some("ORG")
            }
            _ => None,
        };
        if let Some(label) = label {
            entities.push(Entity {
                text: token.text.clone(),
                label: label.to_string(),
            });
        }
    }
    flush(&mut run, &mut entities);

    entities
}

// ── Tests ─────────────────────────────────────────────────────────────────────
