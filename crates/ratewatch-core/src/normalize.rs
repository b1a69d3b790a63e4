//! Model reply normalization: strip code fences, find the JSON object, parse it
//! into a [`RateRecord`].

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::truncate_body;
use crate::models::record::RateRecord;

/// Remove a leading ```` ``` ```` / ```` ```json ```` fence and a trailing ```` ``` ```` fence.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the language tag on the opening fence line, if any.
        let tag_len = rest
            .find(|c: char| c.is_whitespace() || c == '{')
            .unwrap_or(rest.len());
        let tag = &rest[..tag_len];
        text = if tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            &rest[tag_len..]
        } else {
            rest
        };
    }

    text = text.trim();
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// The span from the first `{` to the last `}`, if both exist in that order.
pub fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Turn a raw model reply into a record.
///
/// Never fails: a reply without a parseable JSON object yields `None`, which
/// callers treat the same as an extraction failure.
pub fn normalize_reply(raw: &str) -> Option<RateRecord> {
    let cleaned = strip_code_fences(raw);

    let Some(span) = find_json_object(cleaned) else {
        debug!("no JSON object found in model reply");
        return None;
    };

    let value: Value = match serde_json::from_str(span) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, raw = %truncate_body(raw, 300), "model reply is not valid JSON");
            return None;
        }
    };

    let Value::Object(mut fields) = value else {
        return None;
    };
    fold_aliases(&mut fields);

    match serde_json::from_value::<RateRecord>(Value::Object(fields)) {
        Ok(record) => {
            debug!(filled = record.filled_count(), "parsed model reply");
            Some(record)
        }
        Err(e) => {
            warn!(error = %e, "model reply does not fit the rate record");
            None
        }
    }
}

/// Alternate key names the model uses, paired with the record field they fill.
const FIELD_ALIASES: &[(&str, &str)] = &[("Report Period", "Data Month")];

/// Fold alias keys into their field. An explicit non-null field value wins.
fn fold_aliases(fields: &mut Map<String, Value>) {
    for (alias, name) in FIELD_ALIASES {
        if let Some(value) = fields.remove(*alias) {
            if fields.get(*name).is_none_or(Value::is_null) {
                fields.insert(name.to_string(), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BODY: &str = r#"{"Bank Name":"ABSA Bank Botswana","Prime Lending Rate":6.76,"Website":null}"#;

    #[test]
    fn test_fenced_and_bare_replies_agree() {
        let bare = normalize_reply(BODY).unwrap();
        for wrapped in [
            format!("```json\n{BODY}\n```"),
            format!("```\n{BODY}\n```"),
            format!("```JSON {BODY}```"),
            format!("  ```json\n{BODY}\n```  \n"),
        ] {
            assert_eq!(normalize_reply(&wrapped).unwrap(), bare, "{wrapped}");
        }
    }

    #[test]
    fn test_scenario_absa_reply() {
        let reply = format!("```json\n{BODY}\n```");
        let record = normalize_reply(&reply).unwrap();
        assert_eq!(record.bank_name.as_deref(), Some("ABSA Bank Botswana"));
        assert_eq!(record.prime_lending_rate, Some(6.76));
        assert_eq!(record.website, None);
    }

    #[test]
    fn test_prose_around_json_is_discarded() {
        let reply = format!("Here are the rates I found:\n{BODY}\nLet me know if you need more.");
        let record = normalize_reply(&reply).unwrap();
        assert_eq!(record.prime_lending_rate, Some(6.76));
    }

    #[test]
    fn test_nested_braces_use_outer_span() {
        let text = r#"x {"a": {"b": 1}} y"#;
        assert_eq!(find_json_object(text), Some(r#"{"a": {"b": 1}}"#));
    }

    #[test]
    fn test_misses_return_none() {
        assert!(normalize_reply("").is_none());
        assert!(normalize_reply("I could not read this document.").is_none());
        assert!(normalize_reply("} backwards {").is_none());
        assert!(normalize_reply("{ not json }").is_none());
        assert!(normalize_reply("```json\n[1, 2]\n```").is_none());
    }

    #[test]
    fn test_report_period_fills_data_month() {
        let record = normalize_reply(r#"{"Report Period": "March 2026"}"#).unwrap();
        assert_eq!(record.data_month.as_deref(), Some("March 2026"));

        let record =
            normalize_reply(r#"{"Data Month": null, "Report Period": "April 2026"}"#).unwrap();
        assert_eq!(record.data_month.as_deref(), Some("April 2026"));
    }

    #[test]
    fn test_reply_with_both_period_keys_still_parses() {
        let reply = r#"{"Bank Name": "BBS Bank", "Data Month": "March 2026", "Report Period": "Q1 2026", "Savings Min": 1.5}"#;
        let record = normalize_reply(reply).unwrap();
        assert_eq!(record.data_month.as_deref(), Some("March 2026"));
        assert_eq!(record.bank_name.as_deref(), Some("BBS Bank"));
        assert_eq!(record.savings_min, Some(1.5));
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("{}"), "{}");
        assert_eq!(strip_code_fences("```{}```"), "{}");
    }
}
