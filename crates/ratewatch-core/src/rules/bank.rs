//! Bank name resolution from filename and document text.

use std::sync::Arc;

use super::ExtractionMatch;
use super::patterns::GENERIC_BANK_NAME;
use crate::registry::BankRegistry;

/// Filename words that never form part of a bank name.
const NOISE_WORDS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep",
    "sept", "oct", "nov", "dec", "rate", "rates", "interest", "schedule", "tariff", "tariffs",
    "pricing", "sheet", "pdf", "jpg", "jpeg", "png", "scan", "scanned", "document", "doc",
    "final", "copy", "updated", "new", "effective", "image", "img", "page",
];

/// Resolves a bank name in three steps: a registry alias as a whole phrase
/// (filename first, then text), a generic "... Bank" phrase in the text, and
/// finally a name derived from the filename.
pub struct BankNameResolver {
    registry: Arc<BankRegistry>,
}

impl BankNameResolver {
    pub fn new(registry: Arc<BankRegistry>) -> Self {
        Self { registry }
    }

    pub fn resolve(&self, text: &str, filename: &str) -> Option<ExtractionMatch<String>> {
        let file_words = word_sequence(filename);
        if let Some(name) = self.registry_match(&file_words) {
            return Some(ExtractionMatch::new(name, 0.95, filename));
        }

        let text_words = word_sequence(text);
        if let Some(name) = self.registry_match(&text_words) {
            return Some(ExtractionMatch::new(name, 0.85, "document text"));
        }

        if let Some(caps) = GENERIC_BANK_NAME.captures(text) {
            if let Some(phrase) = caps.get(1) {
                let name = phrase.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
                return Some(
                    ExtractionMatch::new(name, 0.6, phrase.as_str())
                        .with_position(phrase.start(), phrase.end()),
                );
            }
        }

        name_from_filename(filename).map(|name| ExtractionMatch::new(name, 0.3, filename))
    }

    fn registry_match(&self, words: &str) -> Option<String> {
        self.registry
            .iter()
            .find(|profile| {
                profile
                    .aliases
                    .iter()
                    .any(|alias| words.contains(&word_sequence(alias)))
            })
            .map(|profile| profile.display_name.clone())
    }
}

/// Lowercase words separated and surrounded by single spaces, so that
/// `contains(" absa ")` is a whole-word test.
fn word_sequence(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push(' ');
    for word in raw
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        out.push_str(&word.to_lowercase());
        out.push(' ');
    }
    out
}

/// A readable bank name from a filename, or `None` if nothing meaningful is left.
pub fn name_from_filename(filename: &str) -> Option<String> {
    let stem = match filename.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && ext.len() <= 4 => stem,
        _ => filename,
    };

    let words: Vec<String> = stem
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| w.chars().count() > 1)
        .filter(|w| !NOISE_WORDS.contains(&w.to_lowercase().as_str()))
        .map(title_case)
        .collect();

    (!words.is_empty()).then(|| words.join(" "))
}

fn title_case(word: &str) -> String {
    let mixed = word.chars().any(char::is_uppercase) && word.chars().any(char::is_lowercase);
    if mixed {
        return word.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
