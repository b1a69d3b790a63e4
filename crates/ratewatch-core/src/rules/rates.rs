//! Label-anchored rate extraction.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::patterns::RATE_TOKEN;
use super::{ExtractionMatch, FieldExtractor, best_match};
use crate::models::record::RateRecord;

/// Characters read after a label, bounded by the end of its line.
pub const WINDOW_CHARS: usize = 60;

/// Tokens at or above this value are page numbers, years or balances, not rates.
pub const MAX_RATE: f64 = 100.0;

type Slot = fn(&mut RateRecord) -> &mut Option<f64>;

/// Where a reading lands in the record.
#[derive(Clone, Copy)]
enum Target {
    Single(Slot),
    Range { min: Slot, max: Slot },
}

/// Up to two numeric tokens read after a label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateReading {
    /// Token in document order.
    pub first: f64,
    pub min: f64,
    pub max: f64,
}

impl RateReading {
    fn from_tokens(tokens: &[f64]) -> Option<Self> {
        let first = *tokens.first()?;
        let second = tokens.get(1).copied().unwrap_or(first);
        Some(Self {
            first,
            min: first.min(second),
            max: first.max(second),
        })
    }
}

/// One product's ordered label alternatives and its record fields.
pub struct RateField {
    pub name: &'static str,
    labels: Vec<Regex>,
    target: Target,
}

impl RateField {
    fn single(name: &'static str, labels: &[&str], slot: Slot) -> Self {
        Self::build(name, labels, Target::Single(slot))
    }

    fn range(name: &'static str, labels: &[&str], min: Slot, max: Slot) -> Self {
        Self::build(name, labels, Target::Range { min, max })
    }

    fn build(name: &'static str, labels: &[&str], target: Target) -> Self {
        Self {
            name,
            labels: labels.iter().map(|p| Regex::new(p).unwrap()).collect(),
            target,
        }
    }

    /// Write a reading into the record.
    pub fn apply(&self, reading: &RateReading, record: &mut RateRecord) {
        match self.target {
            Target::Single(slot) => *slot(record) = Some(reading.first),
            Target::Range { min, max } => {
                *min(record) = Some(reading.min);
                *max(record) = Some(reading.max);
            }
        }
    }
}

impl FieldExtractor for RateField {
    type Output = ExtractionMatch<RateReading>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        best_match(self.extract_all(text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for (priority, label) in self.labels.iter().enumerate() {
            for caps in label.captures_iter(text) {
                // "Over 24 Months" style qualifiers belong to a different product.
                if caps.name("neg").is_some() {
                    continue;
                }
                let Some(full_match) = caps.get(0) else {
                    continue;
                };

                let window = window_after(text, full_match.end());
                let tokens = rate_tokens(window);
                if let Some(reading) = RateReading::from_tokens(&tokens) {
                    let confidence = 0.8 - 0.1 * priority as f32;
                    results.push(
                        ExtractionMatch::new(reading, confidence.max(0.5), window)
                            .with_position(full_match.start(), full_match.end()),
                    );
                }
            }
        }

        results
    }
}

lazy_static! {
    /// Rate products in extraction order.
    pub static ref RATE_FIELDS: Vec<RateField> = vec![
        RateField::single(
            "MoPR",
            &[r"(?i)\bMoPR\b", r"(?i)\bmonetary\s+policy\s+rate\b"],
            |r| &mut r.mopr,
        ),
        RateField::single(
            "Prime Lending Rate",
            &[r"(?i)\bprime\s+lending\s+rate\b", r"(?i)\bPLR\b", r"(?i)\bprime\s+rate\b"],
            |r| &mut r.prime_lending_rate,
        ),
        RateField::range(
            "Current Account",
            &[r"(?i)\bcurrent\s+accounts?\b", r"(?i)\bcheque\s+accounts?\b", r"(?i)\bcurrent\b"],
            |r| &mut r.current_account_min,
            |r| &mut r.current_account_max,
        ),
        RateField::range(
            "Call Account",
            &[r"(?i)\bcall\s+(?:accounts?|deposits?)\b", r"(?i)\bcall\b"],
            |r| &mut r.call_account_min,
            |r| &mut r.call_account_max,
        ),
        RateField::range(
            "Savings",
            &[r"(?i)\bsavings\s+accounts?\b", r"(?i)\bsavings\b"],
            |r| &mut r.savings_min,
            |r| &mut r.savings_max,
        ),
        RateField::range(
            "FD 3M Nominal",
            &[r"(?i)\b3\s*(?:months?|mths?)\b", r"(?i)\bthree\s+months?\b", r"(?i)\b3\s*M\b"],
            |r| &mut r.fd_3m_nominal_min,
            |r| &mut r.fd_3m_nominal_max,
        ),
        RateField::range(
            "FD 6M Nominal",
            &[r"(?i)\b6\s*(?:months?|mths?)\b", r"(?i)\bsix\s+months?\b", r"(?i)\b6\s*M\b"],
            |r| &mut r.fd_6m_nominal_min,
            |r| &mut r.fd_6m_nominal_max,
        ),
        RateField::range(
            "FD 12M Nominal",
            &[r"(?i)\b12\s*(?:months?|mths?)\b", r"(?i)\b(?:1|one)\s+year\b", r"(?i)\b12\s*M\b"],
            |r| &mut r.fd_12m_nominal_min,
            |r| &mut r.fd_12m_nominal_max,
        ),
        RateField::range(
            "FD 24M Nominal",
            &[
                r"(?i)(?P<neg>(?:over|above|more\s+than|>)\s*)?\b24\s*(?:months?|mths?)\b",
                r"(?i)(?P<neg>(?:over|above|more\s+than|>)\s*)?\b(?:2|two)\s+years\b",
            ],
            |r| &mut r.fd_24m_nominal_min,
            |r| &mut r.fd_24m_nominal_max,
        ),
        RateField::range(
            "Mortgage Rate",
            &[r"(?i)\bmortgages?\b", r"(?i)\bhome\s+loans?\b"],
            |r| &mut r.mortgage_rate_min,
            |r| &mut r.mortgage_rate_max,
        ),
        RateField::range(
            "Credit Card Rate",
            &[r"(?i)\bcredit\s+cards?\b"],
            |r| &mut r.credit_card_rate_min,
            |r| &mut r.credit_card_rate_max,
        ),
        RateField::range(
            "Personal Loan",
            &[r"(?i)\bpersonal\s+loans?\b"],
            |r| &mut r.personal_loan_min,
            |r| &mut r.personal_loan_max,
        ),
    ];
}

/// Text after `from` on the same line, skipping leading spaces and tabs, up to
/// [`WINDOW_CHARS`] characters. A label that ends its line yields an empty window.
pub fn window_after(text: &str, from: usize) -> &str {
    let rest = text.get(from..).unwrap_or_default().trim_start_matches([' ', '\t']);
    let line = rest.split('\n').next().unwrap_or(rest);
    match line.char_indices().nth(WINDOW_CHARS) {
        Some((end, _)) => &line[..end],
        None => line,
    }
}

/// The first two numeric tokens below [`MAX_RATE`].
pub fn rate_tokens(window: &str) -> Vec<f64> {
    RATE_TOKEN
        .find_iter(window)
        .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .filter(|value| *value < MAX_RATE)
        .take(2)
        .collect()
}

/// Fill every rate field the text has a reading for.
pub fn extract_rates(text: &str, record: &mut RateRecord) -> usize {
    let mut found = 0;
    for field in RATE_FIELDS.iter() {
        if let Some(reading) = field.extract(text) {
            debug!(
                field = field.name,
                confidence = reading.confidence,
                window = %reading.source,
                "rate reading"
            );
            field.apply(&reading.value, record);
            found += 1;
        }
    }
    found
}
