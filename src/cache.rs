use crate::api::Formula;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60); // 24 hours
const FORMULAE_FILE: &str = "formulae.json";

/// Cache directory name, separate from other Homebrew tools whose
/// `formulae.json` holds a different set of fields
const CACHE_NAME: &str = "unlinked";

/// Get the cache directory (~/.cache/unlinked/ or equivalent)
pub fn cache_dir() -> PathBuf {
    cache_dir_from(
        std::env::var_os("XDG_CACHE_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn cache_dir_from(cache_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    match (cache_home, home) {
        (Some(cache_home), _) => cache_home.join(CACHE_NAME),
        (None, Some(home)) => home.join(".cache").join(CACHE_NAME),
        (None, None) => PathBuf::from(".cache").join(CACHE_NAME),
    }
}

/// Check if a cached file is still fresh (less than TTL old)
fn is_cache_fresh(path: &Path) -> bool {
    let Ok(modified) = std::fs::metadata(path).and_then(|m| m.modified()) else {
        return false;
    };

    match SystemTime::now().duration_since(modified) {
        Ok(age) => age < CACHE_TTL,
        Err(_) => false,
    }
}

fn read_formulae(path: &Path) -> Option<Vec<Formula>> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(formulae) => Some(formulae),
        Err(e) => {
            tracing::warn!("ignoring corrupt formula cache {}: {}", path.display(), e);
            None
        }
    }
}

/// Get cached formulae list or None if stale/missing
pub fn get_cached_formulae() -> Option<Vec<Formula>> {
    let cache_path = cache_dir().join(FORMULAE_FILE);

    if !is_cache_fresh(&cache_path) {
        return None;
    }

    read_formulae(&cache_path)
}

/// Get cached formulae list regardless of age
pub fn get_stale_formulae() -> Option<Vec<Formula>> {
    read_formulae(&cache_dir().join(FORMULAE_FILE))
}

/// Store formulae list in cache
pub fn store_formulae(formulae: &[Formula]) -> Result<()> {
    store_formulae_at(&cache_dir(), formulae)
}

pub(crate) fn store_formulae_at(dir: &Path, formulae: &[Formula]) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    let json = serde_json::to_string(formulae)?;
    std::fs::write(dir.join(FORMULAE_FILE), json)?;

    Ok(())
}
