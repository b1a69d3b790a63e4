//! Report period extraction, rendered as "Month YYYY".

use chrono::{Month, NaiveDate};

use super::patterns::{DATE_DMY, EFFECTIVE_FROM, MONTH_YEAR};
use super::{ExtractionMatch, FieldExtractor, best_match};

/// Report period extractor.
pub struct PeriodExtractor;

impl PeriodExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PeriodExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PeriodExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        best_match(self.extract_all(text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        // "March 2026"
        for caps in MONTH_YEAR.captures_iter(text) {
            let Some(full_match) = caps.get(0) else {
                continue;
            };
            if let Some(period) = month_year(&caps[1], &caps[2]) {
                results.push(
                    ExtractionMatch::new(period, 0.9, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        // "Effective from 01.03.2026" / "effective from 1st March, 2026"
        for caps in EFFECTIVE_FROM.captures_iter(text) {
            let Some(full_match) = caps.get(0) else {
                continue;
            };
            if let Some(period) = day_month_year(&caps[1], &caps[2], &caps[3]) {
                results.push(
                    ExtractionMatch::new(period, 0.85, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        // 01/03/2026, day first
        for caps in DATE_DMY.captures_iter(text) {
            let Some(full_match) = caps.get(0) else {
                continue;
            };
            if let Some(period) = day_month_year(&caps[1], &caps[2], &caps[3]) {
                results.push(
                    ExtractionMatch::new(period, 0.6, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

fn month_year(month: &str, year: &str) -> Option<String> {
    let month: Month = month.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    Some(format!("{} {}", month.name(), year))
}

fn day_month_year(day: &str, month: &str, year: &str) -> Option<String> {
    let day: u32 = day.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    let month = match month.parse::<u32>() {
        Ok(number) => number,
        Err(_) => month.parse::<Month>().ok()?.number_from_month(),
    };

    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.format("%B %Y").to_string())
}
