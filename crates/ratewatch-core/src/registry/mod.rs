//! Static bank knowledge: aliases, display names, websites and prompt hints.

mod builtin;

use std::path::Path;
use std::sync::Arc;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RateWatchError, Result};

lazy_static! {
    static ref BUILTIN_REGISTRY: Arc<BankRegistry> = Arc::new(BankRegistry {
        profiles: builtin::profiles(),
    });
}

/// One bank that publishes rate sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankProfile {
    /// Stable key, e.g. `"ABSA"`.
    pub id: String,
    /// Lowercase substrings matched against filenames.
    pub aliases: Vec<String>,
    /// Official name written into `Bank Name`.
    pub display_name: String,
    /// Known website used when the sheet does not print one.
    pub website: String,
    /// Free-form guidance appended to the extraction prompt.
    #[serde(default)]
    pub hint_text: String,
}

/// Ordered, immutable set of bank profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankRegistry {
    profiles: Vec<BankProfile>,
}

impl BankRegistry {
    /// The compiled-in registry, built once per process.
    pub fn builtin() -> Arc<BankRegistry> {
        Arc::clone(&BUILTIN_REGISTRY)
    }

    /// Parse a registry from JSON (`{"profiles": [...]}`).
    pub fn from_json(json: &str) -> Result<Self> {
        let mut registry: BankRegistry = serde_json::from_str(json)
            .map_err(|e| RateWatchError::Config(format!("invalid bank registry: {e}")))?;

        for profile in &mut registry.profiles {
            profile.aliases = profile
                .aliases
                .iter()
                .map(|a| a.trim().to_lowercase())
                .filter(|a| !a.is_empty())
                .collect();
            if profile.aliases.is_empty() {
                return Err(RateWatchError::Config(format!(
                    "bank profile {} has no aliases",
                    profile.id
                )));
            }
        }

        Ok(registry)
    }

    /// Load a registry from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let registry = Self::from_json(&content)?;
        debug!(path = %path.display(), banks = registry.len(), "loaded bank registry");
        Ok(registry)
    }

    /// The built-in registry, or the one at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Arc<BankRegistry>> {
        match path {
            Some(path) => Ok(Arc::new(Self::from_file(path)?)),
            None => Ok(Self::builtin()),
        }
    }

    /// Find the first bank whose alias occurs in `filename`, ignoring case.
    ///
    /// Registry order decides when several aliases match.
    pub fn detect(&self, filename: &str) -> Option<&BankProfile> {
        let lower = filename.to_lowercase();
        self.profiles
            .iter()
            .find(|p| p.aliases.iter().any(|alias| lower.contains(alias.as_str())))
    }

    /// Known website for a bank display name.
    pub fn website_for_name(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.profiles
            .iter()
            .find(|p| p.display_name.eq_ignore_ascii_case(name))
            .map(|p| p.website.as_str())
    }

    /// Look a profile up by its stable key.
    pub fn by_id(&self, id: &str) -> Option<&BankProfile> {
        self.profiles.iter().find(|p| p.id.eq_ignore_ascii_case(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BankProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
