//! Homebrew JSON API client and formula metadata.
//!
//! The report only needs a handful of fields from each formula: whether it is
//! keg-only, its description, the names it is known by, and the packages it
//! declares conflicts with. Those are read from the bulk `formula.json`
//! index, which is fetched once per run (or served from the disk cache, see
//! [`crate::cache`]) so that classification never waits on the network.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const HOMEBREW_API_BASE: &str = "https://formulae.brew.sh/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Keg-only reason metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KegOnlyReason {
    pub reason: String,
    #[serde(default)]
    pub explanation: String,
}

/// Homebrew formula metadata from JSON API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Formula {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub oldnames: Vec<String>,
    #[serde(default)]
    pub keg_only: bool,
    #[serde(default)]
    pub keg_only_reason: Option<KegOnlyReason>,
    #[serde(default)]
    pub conflicts_with: Vec<String>,
    #[serde(default)]
    pub conflicts_with_reasons: Vec<Option<String>>,
}

/// A package this formula must not be linked alongside
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredConflict {
    pub name: String,
    pub reason: Option<String>,
}

impl Formula {
    /// Declared conflicts in declaration order, paired with their reasons.
    ///
    /// `conflicts_with_reasons` runs parallel to `conflicts_with` and may be
    /// shorter; a missing or blank entry means no reason was given.
    pub fn declared_conflicts(&self) -> Vec<DeclaredConflict> {
        self.conflicts_with
            .iter()
            .enumerate()
            .map(|(i, name)| DeclaredConflict {
                name: name.clone(),
                reason: self
                    .conflicts_with_reasons
                    .get(i)
                    .cloned()
                    .flatten()
                    .filter(|r| !r.trim().is_empty()),
            })
            .collect()
    }
}

/// Homebrew API client
#[derive(Clone)]
pub struct BrewApi {
    client: reqwest::Client,
}

impl BrewApi {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(format!("unlinked/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch all formulae from Homebrew (with local disk caching for 24 hours).
    ///
    /// # Performance
    ///
    /// - First call: ~2-3 seconds (downloads ~25 MB)
    /// - Subsequent calls: <100 ms (loads from cache)
    pub async fn fetch_all_formulae(&self) -> Result<Vec<Formula>> {
        // Try cache first
        if let Some(cached) = crate::cache::get_cached_formulae() {
            return Ok(cached);
        }

        // Fetch fresh from API
        let url = format!("{}/formula.json", HOMEBREW_API_BASE);
        let formulae: Vec<Formula> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Store in cache (ignore errors)
        if let Err(e) = crate::cache::store_formulae(&formulae) {
            tracing::debug!("failed to cache formula index: {}", e);
        }

        Ok(formulae)
    }
}
