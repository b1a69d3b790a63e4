//! Contact phone and website extraction.

use super::patterns::{PHONE, WEBSITE_DOMAIN, WEBSITE_URL};
use super::{ExtractionMatch, FieldExtractor, best_match};

/// Label-anchored phone number extractor.
pub struct PhoneExtractor;

impl FieldExtractor for PhoneExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        best_match(self.extract_all(text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in PHONE.captures_iter(text) {
            let (Some(full_match), Some(number)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let number = number.as_str().trim();
            let digits = number.chars().filter(char::is_ascii_digit).count();
            if (7..=15).contains(&digits) {
                results.push(
                    ExtractionMatch::new(number.to_string(), 0.8, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

/// Website extractor, preferring explicit URLs over bare domains.
pub struct WebsiteExtractor;

impl FieldExtractor for WebsiteExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        best_match(self.extract_all(text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let explicit = WEBSITE_URL.find_iter(text).map(|m| (m, 0.9));
        let bare = WEBSITE_DOMAIN.find_iter(text).map(|m| (m, 0.6));

        explicit
            .chain(bare)
            .map(|(m, confidence)| {
                ExtractionMatch::new(normalize_website(m.as_str()), confidence, m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Lowercase, drop trailing punctuation and make sure the URL carries `https://`.
pub fn normalize_website(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches(['.', '/', ',']).to_lowercase();
    if trimmed.starts_with("https://") {
        trimmed
    } else if let Some(rest) = trimmed.strip_prefix("http://") {
        format!("https://{rest}")
    } else {
        format!("https://{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_after_label() {
        let phone = PhoneExtractor.extract("Head Office Tel: +267 367 0100 Fax: 390 1234");
        assert_eq!(phone.unwrap().value, "+267 367 0100");

        let phone = PhoneExtractor.extract("Call us on 367 4600\n12 Months 2.05%");
        assert_eq!(phone.unwrap().value, "367 4600");
    }

    #[test]
    fn test_phone_requires_label_and_digits() {
        assert!(PhoneExtractor.extract("367 0100").is_none());
        assert!(PhoneExtractor.extract("Tel: 12 34").is_none());
    }

    #[test]
    fn test_website_prefers_url() {
        let site = WebsiteExtractor.extract("email info@bsb.bw or visit www.bsb.bw.");
        assert_eq!(site.unwrap().value, "https://www.bsb.bw");
    }

    #[test]
    fn test_website_bare_domain() {
        let site = WebsiteExtractor.extract("Absa Bank Botswana, absa.co.bw");
        assert_eq!(site.unwrap().value, "https://absa.co.bw");
    }

    #[test]
    fn test_normalize_website() {
        assert_eq!(normalize_website("HTTP://www.FNB.co.bw/"), "https://www.fnb.co.bw");
        assert_eq!(normalize_website("https://www.sc.com/bw"), "https://www.sc.com/bw");
        assert_eq!(normalize_website("bankg.co.bw"), "https://bankg.co.bw");
    }
}
