//! Extraction prompt templates.
//!
//! The prompt is an instruction to the external model; no extraction logic lives here.

use std::fmt::Write;

use crate::models::record::RateRecord;
use crate::registry::BankProfile;

const PREAMBLE: &str = "You are extracting Botswana bank interest rates from this document. \
Return ONLY valid JSON: no markdown fences, no explanation, no preamble.";

const UNIVERSAL_RULES: &str = r#"UNIVERSAL EXTRACTION RULES:
1. Rate values must be PLAIN NUMBERS (e.g. 8.01, not "8.01%", not "Prime+2", not "null")
2. For lending rates quoted as "Prime + X%" or "PLR + X%": ADD the spread to the PLR for the final rate.
   Example: PLR=8.01, spread=+5% -> write 13.01. PLR=6.76, spread=+14% -> write 20.76
3. "Prime to Prime + 5%" means min=PLR, max=PLR+5
4. N/A, Nil, Not Available, Negotiable -> write null
5. "Nominal" and "Effective/Actual" are DIFFERENT columns: extract both separately
6. "91 Day" and "3 Month" are DIFFERENT products: extract separately
7. "Over 24 Months" is DIFFERENT from "24 Months": extract separately
8. IGNORE ZAR, USD, GBP, EUR foreign currency sections: BWP (Botswana Pula) only
9. Minimum balance values: numbers only (e.g. 1000, not "P1,000")"#;

/// Render the vision-mode prompt for an optional resolved bank.
pub fn build_prompt(profile: Option<&BankProfile>) -> String {
    let mut prompt = String::with_capacity(6 * 1024);

    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\n");
    prompt.push_str(UNIVERSAL_RULES);
    prompt.push('\n');

    prompt.push_str(
        "10. WEBSITE FIELD: Look in the ENTIRE document (header, footer, bottom of page, watermark,\n    \
         small print). Extract any URL you can see (e.g. www.bsb.bw, absa.co.bw).\n    \
         Always format as https://www.domain.co.bw",
    );
    if let Some(profile) = profile {
        let _ = write!(
            prompt,
            "\n    If not visible, use the known website: {}",
            profile.website
        );
    }
    prompt.push_str(
        "\n11. CONTACT PHONE: Look in the footer, bottom or contact section. \
         Botswana numbers are 7-8 digits.\n",
    );

    if let Some(profile) = profile.filter(|p| !p.hint_text.is_empty()) {
        prompt.push_str("\nBANK-SPECIFIC KNOWLEDGE FOR THIS DOCUMENT:\n");
        prompt.push_str(&profile.hint_text);
        prompt.push('\n');
    }

    prompt.push_str("\nReturn this EXACT JSON (null for any field not found or not applicable):\n");
    prompt.push_str(&schema_example());
    prompt
}

/// Render the text-mode prompt: the vision prompt followed by the document text.
pub fn build_text_prompt(profile: Option<&BankProfile>, document_text: &str) -> String {
    let mut prompt = build_prompt(profile);
    prompt.push_str("\n\nDOCUMENT TEXT:\n\"\"\"\n");
    prompt.push_str(document_text);
    prompt.push_str("\n\"\"\"\n");
    prompt
}

/// The full field schema as a JSON object with every value `null`.
pub fn schema_example() -> String {
    let mut out = String::from("{\n");
    let last = RateRecord::FIELD_NAMES.len().saturating_sub(1);
    for (i, name) in RateRecord::FIELD_NAMES.iter().enumerate() {
        let comma = if i == last { "" } else { "," };
        let _ = writeln!(out, "  \"{name}\": null{comma}");
    }
    out.push('}');
    out
}
