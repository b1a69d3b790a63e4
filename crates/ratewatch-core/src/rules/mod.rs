//! Rule-based extraction of rate sheet fields from plain document text.

pub mod bank;
pub mod contact;
pub mod patterns;
pub mod period;
pub mod rates;

use std::sync::Arc;

use tracing::debug;

pub use bank::{BankNameResolver, name_from_filename};
pub use contact::{PhoneExtractor, WebsiteExtractor, normalize_website};
pub use period::PeriodExtractor;
pub use rates::{RATE_FIELDS, RateField, RateReading, extract_rates};

use crate::models::record::RateRecord;
use crate::registry::BankRegistry;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    fn start(&self) -> usize {
        self.position.map_or(usize::MAX, |(start, _)| start)
    }
}

/// Highest-confidence match, earliest in the text on ties.
pub fn best_match<T>(matches: Vec<ExtractionMatch<T>>) -> Option<ExtractionMatch<T>> {
    matches.into_iter().reduce(|best, candidate| {
        let better = candidate.confidence > best.confidence
            || (candidate.confidence == best.confidence && candidate.start() < best.start());
        if better { candidate } else { best }
    })
}

/// Local, network-free extractor that fills a [`RateRecord`] from document text.
pub struct RegexExtractor {
    banks: BankNameResolver,
    periods: PeriodExtractor,
}

impl RegexExtractor {
    pub fn new(registry: Arc<BankRegistry>) -> Self {
        Self {
            banks: BankNameResolver::new(registry),
            periods: PeriodExtractor::new(),
        }
    }

    /// Extract a record, or `None` when the result is not usable: it needs a
    /// bank name and at least one of prime, 12-month FD max, savings max or
    /// call account max.
    pub fn extract(&self, text: &str, filename: &str) -> Option<RateRecord> {
        let Some(bank) = self.banks.resolve(text, filename) else {
            debug!(filename, "no bank name resolvable from filename or text");
            return None;
        };
        debug!(bank = %bank.value, confidence = bank.confidence, "resolved bank name");

        let mut record = RateRecord {
            bank_name: Some(bank.value),
            ..Default::default()
        };

        if let Some(period) = self.periods.extract(text) {
            debug!(source = %period.source, confidence = period.confidence, "resolved period");
            record.data_month = Some(period.value);
        }
        let rates = extract_rates(text, &mut record);
        record.contact_phone = PhoneExtractor.extract(text).map(|m| m.value);
        record.website = WebsiteExtractor.extract(text).map(|m| m.value);

        let usable = [
            record.prime_lending_rate,
            record.fd_12m_nominal_max,
            record.savings_max,
            record.call_account_max,
        ]
        .iter()
        .any(Option::is_some);

        debug!(rates, usable, filled = record.filled_count(), "regex extraction finished");
        usable.then_some(record)
    }
}
