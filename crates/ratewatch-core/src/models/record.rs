//! The flat rate record produced for one bank rate sheet.
//!
//! Serialized field names match the stored record's column names exactly, so the
//! same struct round-trips through the model reply, the HTTP response and the
//! record store. Deserialization is lenient: the model is untrusted, so unit
//! suffixes are stripped, placeholders such as `"N/A"` become absent and unknown
//! keys are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fixed field-set size used as the completeness denominator.
pub const COMPLETENESS_TOTAL: usize = 44;

macro_rules! rate_record {
    (
        text { $( $tfield:ident => $tname:literal, )* }
        rates { $( $rfield:ident => $rname:literal, )* }
    ) => {
        /// Extracted rates for one bank. Every field is optional.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct RateRecord {
            $(
                #[serde(rename = $tname, default, deserialize_with = "lenient::text")]
                pub $tfield: Option<String>,
            )*
            $(
                #[serde(rename = $rname, default, deserialize_with = "lenient::rate")]
                pub $rfield: Option<f64>,
            )*
        }

        impl RateRecord {
            /// Every field name, in schema order.
            pub const FIELD_NAMES: &'static [&'static str] = &[ $($tname,)* $($rname,)* ];

            /// Number of fields holding a value.
            pub fn filled_count(&self) -> usize {
                let mut filled = 0;
                $( if self.$tfield.is_some() { filled += 1; } )*
                $( if self.$rfield.is_some() { filled += 1; } )*
                filled
            }

            /// The non-absent fields as a JSON object, keyed by field name, in schema order.
            pub fn populated_fields(&self) -> Map<String, Value> {
                let mut fields = Map::new();
                $(
                    if let Some(value) = &self.$tfield {
                        fields.insert($tname.to_string(), Value::String(value.clone()));
                    }
                )*
                $(
                    if let Some(number) = self.$rfield.and_then(serde_json::Number::from_f64) {
                        fields.insert($rname.to_string(), Value::Number(number));
                    }
                )*
                fields
            }
        }
    };
}

rate_record! {
    text {
        bank_name => "Bank Name",
        data_month => "Data Month",
        website => "Website",
        contact_phone => "Contact Phone",
    }
    rates {
        mopr => "MoPR",
        prime_lending_rate => "Prime Lending Rate",

        current_account_min => "Current Account Min",
        current_account_max => "Current Account Max",
        call_account_min => "Call Account Min",
        call_account_max => "Call Account Max",
        call_account_effective_min => "Call Account Effective Min",
        call_account_effective_max => "Call Account Effective Max",
        savings_min => "Savings Min",
        savings_max => "Savings Max",
        savings_effective_min => "Savings Effective Min",
        savings_effective_max => "Savings Effective Max",
        ordinary_savings_min => "Ordinary Savings Min",
        ordinary_savings_max => "Ordinary Savings Max",
        saye_min => "SAYE Min",
        saye_max => "SAYE Max",
        saye_effective_min => "SAYE Effective Min",
        saye_effective_max => "SAYE Effective Max",

        fd_91d_nominal_min => "FD 91D Nominal Min",
        fd_91d_nominal_max => "FD 91D Nominal Max",
        fd_91d_effective_min => "FD 91D Effective Min",
        fd_91d_effective_max => "FD 91D Effective Max",
        fd_3m_nominal_min => "FD 3M Nominal Min",
        fd_3m_nominal_max => "FD 3M Nominal Max",
        fd_3m_effective_min => "FD 3M Effective Min",
        fd_3m_effective_max => "FD 3M Effective Max",
        fd_6m_nominal_min => "FD 6M Nominal Min",
        fd_6m_nominal_max => "FD 6M Nominal Max",
        fd_6m_effective_min => "FD 6M Effective Min",
        fd_6m_effective_max => "FD 6M Effective Max",
        fd_12m_nominal_min => "FD 12M Nominal Min",
        fd_12m_nominal_max => "FD 12M Nominal Max",
        fd_12m_effective_min => "FD 12M Effective Min",
        fd_12m_effective_max => "FD 12M Effective Max",
        fd_24m_nominal_min => "FD 24M Nominal Min",
        fd_24m_nominal_max => "FD 24M Nominal Max",
        fd_24m_effective_min => "FD 24M Effective Min",
        fd_24m_effective_max => "FD 24M Effective Max",
        fd_over24m_nominal_min => "FD Over24M Nominal Min",
        fd_over24m_nominal_max => "FD Over24M Nominal Max",
        fd_over24m_effective_min => "FD Over24M Effective Min",
        fd_over24m_effective_max => "FD Over24M Effective Max",
        fd_minimum_balance => "FD Minimum Balance",

        mortgage_rate_min => "Mortgage Rate Min",
        mortgage_rate_max => "Mortgage Rate Max",
        overdraft_min => "Overdraft Min",
        overdraft_max => "Overdraft Max",
        credit_card_rate_min => "Credit Card Rate Min",
        credit_card_rate_max => "Credit Card Rate Max",
        car_loan_min => "Car Loan Min",
        car_loan_max => "Car Loan Max",
        lease_loan_min => "Lease Loan Min",
        lease_loan_max => "Lease Loan Max",
        personal_loan_min => "Personal Loan Min",
        personal_loan_max => "Personal Loan Max",
        other_lt_min => "Other LT Min",
        other_lt_max => "Other LT Max",
    }
}

/// Share of the fixed field set that a record fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletenessScore {
    /// Fields holding a value.
    pub filled: usize,
    /// Fixed field-set size.
    pub total: usize,
    /// `filled / total` as a rounded percentage, capped at 100.
    pub percent: u8,
}

impl RateRecord {
    /// Completeness of this record against the fixed field set.
    pub fn completeness(&self) -> CompletenessScore {
        let filled = self.filled_count();
        let percent = ((filled as f64 / COMPLETENESS_TOTAL as f64) * 100.0).round();
        CompletenessScore {
            filled,
            total: COMPLETENESS_TOTAL,
            percent: percent.min(100.0) as u8,
        }
    }

    /// Whether the record carries a bank name and at least one headline rate.
    pub fn is_sufficient(&self) -> bool {
        self.bank_name.is_some() && self.has_headline_rate()
    }

    fn has_headline_rate(&self) -> bool {
        [
            self.savings_min,
            self.call_account_min,
            self.fd_3m_nominal_min,
            self.fd_6m_nominal_min,
            self.fd_12m_nominal_min,
            self.mortgage_rate_min,
            self.prime_lending_rate,
            self.fd_91d_nominal_min,
        ]
        .iter()
        .any(Option::is_some)
    }

    /// Why [`RateRecord::is_sufficient`] fails, if it does.
    pub fn insufficiency(&self) -> Option<&'static str> {
        if self.bank_name.is_none() {
            Some("no bank name could be resolved")
        } else if !self.has_headline_rate() {
            Some("no rate fields were populated")
        } else {
            None
        }
    }
}

/// Lenient deserializers for values coming from an untrusted model reply.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    const PLACEHOLDERS: &[&str] = &[
        "n/a",
        "na",
        "nil",
        "null",
        "none",
        "not available",
        "not applicable",
        "negotiable",
        "-",
        "--",
        "—",
    ];

    pub fn is_placeholder(value: &str) -> bool {
        let value = value.trim().to_ascii_lowercase();
        value.is_empty() || PLACEHOLDERS.contains(&value.as_str())
    }

    /// Parse a rate or amount such as `"8.01%"`, `"P1,000"` or `" 3.5 "`.
    pub fn parse_number(raw: &str) -> Option<f64> {
        if is_placeholder(raw) {
            return None;
        }
        let cleaned: String = raw
            .trim()
            .trim_start_matches(['P', 'p'])
            .chars()
            .filter(|c| !matches!(c, '%' | ',' | ' ' | '\u{00a0}'))
            .collect();
        cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
    }

    pub fn rate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_number(&s),
            _ => None,
        })
    }

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) if !is_placeholder(&s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }
}
