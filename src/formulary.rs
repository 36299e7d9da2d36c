//! Formula metadata lookup for installed racks
//!
//! Lookups never fail hard. A formula that cannot be found, or that several
//! taps provide under the same name, comes back as a [`MetadataError`] and
//! callers decide how to degrade.

use crate::api::{BrewApi, Formula};
use crate::cache;
use crate::tap::{self, Tap};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("No available formula with the name \"{0}\"")]
    Unavailable(String),

    #[error("Formulae found in multiple taps: {}", .taps.join(", "))]
    Ambiguous { name: String, taps: Vec<String> },
}

/// Anything that can turn a formula name into metadata
pub trait FormulaSource: Send + Sync {
    fn load(&self, name: &str) -> Result<Formula, MetadataError>;
}

/// Formula index built from the API listing plus installed taps
#[derive(Debug, Default)]
pub struct Formulary {
    formulae: Vec<Formula>,
    by_name: HashMap<String, usize>,
    taps: Vec<Tap>,
}

impl Formulary {
    /// Index `formulae` by name, then full name, then old names, then aliases.
    ///
    /// Earlier keys win, so an alias never shadows a real formula name.
    pub fn new(formulae: Vec<Formula>) -> Self {
        let mut by_name = HashMap::new();

        for (i, f) in formulae.iter().enumerate() {
            by_name.entry(f.name.clone()).or_insert(i);
        }
        for (i, f) in formulae.iter().enumerate() {
            if !f.full_name.is_empty() {
                by_name.entry(f.full_name.clone()).or_insert(i);
            }
        }
        for (i, f) in formulae.iter().enumerate() {
            for old in &f.oldnames {
                by_name.entry(old.clone()).or_insert(i);
            }
        }
        for (i, f) in formulae.iter().enumerate() {
            for alias in &f.aliases {
                by_name.entry(alias.clone()).or_insert(i);
            }
        }

        Self {
            formulae,
            by_name,
            taps: Vec::new(),
        }
    }

    /// Also consult installed taps when a name is not in the index
    pub fn with_taps(mut self, taps_dir: &Path) -> Self {
        match tap::list_taps(taps_dir) {
            Ok(taps) => self.taps = taps,
            Err(e) => tracing::warn!("cannot list taps: {:#}", e),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.formulae.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulae.is_empty()
    }
}

impl FormulaSource for Formulary {
    fn load(&self, name: &str) -> Result<Formula, MetadataError> {
        let key = name.strip_prefix("homebrew/core/").unwrap_or(name);

        if let Some(&i) = self.by_name.get(key) {
            return Ok(self.formulae[i].clone());
        }

        // Tap formulae are Ruby and not evaluated here; they only matter for ambiguity
        let providers: Vec<String> = tap::taps_providing(&self.taps, key)
            .into_iter()
            .filter(|t| t != "homebrew/core")
            .collect();
        if providers.len() > 1 {
            return Err(MetadataError::Ambiguous {
                name: key.to_string(),
                taps: providers,
            });
        }

        Err(MetadataError::Unavailable(name.to_string()))
    }
}

/// Whether a formula is expected to be unlinked.
///
/// `Unknown` is kept apart from `No` so that a failed lookup is visible, but
/// only `Yes` ever hides a rack from the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KegOnly {
    Yes,
    No,
    Unknown,
}

impl KegOnly {
    pub fn excludes(self) -> bool {
        matches!(self, KegOnly::Yes)
    }
}

/// Keg-only status from an already loaded lookup for `name`
pub fn keg_only_status(name: &str, lookup: &Result<Formula, MetadataError>) -> KegOnly {
    match lookup {
        Ok(formula) if formula.keg_only => KegOnly::Yes,
        Ok(_) => KegOnly::No,
        Err(e) => {
            tracing::debug!("{}: keg-only status unknown: {}", name, e);
            KegOnly::Unknown
        }
    }
}

/// Load the formula index for this run.
///
/// Offline runs use the cached index whatever its age. Online runs fall back
/// to a stale cache if the API cannot be reached. With nothing available the
/// index is empty and every rack is reported with its metadata unavailable.
pub async fn load_formulae(offline: bool) -> Vec<Formula> {
    if offline {
        return cache::get_stale_formulae().unwrap_or_else(|| {
            tracing::warn!("no cached formula index; metadata unavailable for all formulae");
            Vec::new()
        });
    }

    let fetched = match BrewApi::new() {
        Ok(api) => api.fetch_all_formulae().await,
        Err(e) => Err(e),
    };

    match fetched {
        Ok(formulae) => formulae,
        Err(e) => {
            tracing::warn!("failed to fetch formula index: {}", e);
            cache::get_stale_formulae().unwrap_or_default()
        }
    }
}
