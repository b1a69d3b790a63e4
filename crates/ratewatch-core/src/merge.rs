//! Fill identity fields from static bank knowledge.

use tracing::debug;

use crate::models::record::RateRecord;
use crate::registry::{BankProfile, BankRegistry};

/// Fill `Bank Name` and `Website` when the extraction left them empty.
///
/// `Website` is taken from the resolved profile, or else looked up by the
/// record's bank name. Applying the merge twice changes nothing.
pub fn apply_knowledge(
    record: &mut RateRecord,
    profile: Option<&BankProfile>,
    registry: &BankRegistry,
) {
    if record.bank_name.is_none() {
        if let Some(profile) = profile {
            debug!(bank = %profile.display_name, "bank name filled from registry");
            record.bank_name = Some(profile.display_name.clone());
        }
    }

    let website_missing = record
        .website
        .as_deref()
        .is_none_or(|site| site.trim().is_empty() || site.trim().eq_ignore_ascii_case("null"));

    if website_missing {
        let known = profile.map(|p| p.website.clone()).or_else(|| {
            record
                .bank_name
                .as_deref()
                .and_then(|name| registry.website_for_name(name))
                .map(str::to_string)
        });
        if known.is_some() {
            debug!(website = ?known, "website filled from registry");
            record.website = known;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fills_from_profile() {
        let registry = BankRegistry::builtin();
        let absa = registry.by_id("ABSA");
        let mut record = RateRecord {
            prime_lending_rate: Some(6.76),
            website: Some("null".into()),
            ..Default::default()
        };

        apply_knowledge(&mut record, absa, &registry);
        assert_eq!(record.bank_name.as_deref(), Some("ABSA Bank Botswana"));
        assert_eq!(record.website.as_deref(), Some("https://www.absa.co.bw"));
    }

    #[test]
    fn test_keeps_extracted_values() {
        let registry = BankRegistry::builtin();
        let mut record = RateRecord {
            bank_name: Some("Absa Bank".into()),
            website: Some("https://absa.co.bw".into()),
            ..Default::default()
        };
        let before = record.clone();

        apply_knowledge(&mut record, registry.by_id("ABSA"), &registry);
        assert_eq!(record, before);
    }

    #[test]
    fn test_website_by_name_without_profile() {
        let registry = BankRegistry::builtin();
        let mut record = RateRecord {
            bank_name: Some("BBS Bank".into()),
            ..Default::default()
        };

        apply_knowledge(&mut record, None, &registry);
        assert_eq!(record.website.as_deref(), Some("https://www.bbs.co.bw"));
    }

    #[test]
    fn test_idempotent() {
        let registry = BankRegistry::builtin();
        let profile = registry.by_id("BSB");
        let mut once = RateRecord {
            savings_max: Some(2.75),
            ..Default::default()
        };
        apply_knowledge(&mut once, profile, &registry);

        let mut twice = once.clone();
        apply_knowledge(&mut twice, profile, &registry);
        assert_eq!(twice, once);

        let mut unknown = RateRecord::default();
        apply_knowledge(&mut unknown, None, &registry);
        assert_eq!(unknown, RateRecord::default());
    }
}
