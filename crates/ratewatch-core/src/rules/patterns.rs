//! Common regex patterns for rate sheet extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Numeric token: "3.60", "1,000", "24"
    pub static ref RATE_TOKEN: Regex = Regex::new(
        r"\d[\d,]*(?:\.\d+)?"
    ).unwrap();

    // Report period patterns
    pub static ref MONTH_YEAR: Regex = Regex::new(
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)[\s,]+(20\d{2})\b"
    ).unwrap();

    pub static ref EFFECTIVE_FROM: Regex = Regex::new(
        r"(?i)effective\s+(?:from|date|as\s+(?:at|of))?\s*:?\s*(\d{1,2})(?:st|nd|rd|th)?[\s./\-]+(\d{1,2}|[a-z]{3,9})[\s./\-,]+(\d{4})"
    ).unwrap();

    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[./\-](\d{1,2})[./\-](\d{4})\b"
    ).unwrap();

    // Bank identification
    pub static ref GENERIC_BANK_NAME: Regex = Regex::new(
        r"\b((?:[A-Z][A-Za-z&'\-]*[ \t]+){1,3}(?:Bank|Trust|Financial|Capital|Savings))\b"
    ).unwrap();

    // Contact details
    pub static ref PHONE: Regex = Regex::new(
        r"(?i)\b(?:tel(?:ephone)?|phone|contact(?:[ \t]+(?:us|centre|center|number))?|call[ \t]+us(?:[ \t]+on)?)\b\.?[ \t]*(?:no\.?[ \t]*)?[:\-]?[ \t]*(\+?\(?\d[\d \-()]{5,18}\d)"
    ).unwrap();

    pub static ref WEBSITE_URL: Regex = Regex::new(
        r"(?i)\b(?:https?://|www\.)[a-z0-9\-]+(?:\.[a-z0-9\-]+)+(?:/[a-z0-9\-_~/]*)?"
    ).unwrap();

    pub static ref WEBSITE_DOMAIN: Regex = Regex::new(
        r"(?i)\b[a-z0-9][a-z0-9\-]*(?:\.[a-z0-9\-]+)*\.(?:co\.bw|org\.bw|bw|com|co\.za)\b(?:/[a-z0-9\-]+)?"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_token() {
        let tokens: Vec<&str> = RATE_TOKEN
            .find_iter("1.50% - 3.60%, P1,000")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(tokens, vec!["1.50", "3.60", "1,000"]);
    }

    #[test]
    fn test_website_patterns() {
        assert_eq!(
            WEBSITE_URL.find("Visit www.absa.co.bw today").unwrap().as_str(),
            "www.absa.co.bw"
        );
        assert_eq!(
            WEBSITE_DOMAIN.find("see sc.com/bw for details").unwrap().as_str(),
            "sc.com/bw"
        );
        assert!(WEBSITE_DOMAIN.find("Savings 1.50%").is_none());
    }
}
