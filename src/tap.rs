//! Installed taps - locating formula files in third-party repositories

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// An installed tap: `<taps>/<user>/homebrew-<repo>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tap {
    /// Display name, `user/repo`
    pub name: String,
    pub path: PathBuf,
}

impl Tap {
    pub fn is_core(&self) -> bool {
        self.name == "homebrew/core"
    }

    /// Locate `<name>.rb` in the places a tap may keep formulae
    pub fn formula_file(&self, name: &str) -> Option<PathBuf> {
        let file_name = format!("{}.rb", name);
        let formula_dir = self.path.join("Formula");

        let candidates = [
            formula_dir.join(&file_name),
            self.path.join("HomebrewFormula").join(&file_name),
            self.path.join(&file_name),
        ];
        if let Some(found) = candidates.into_iter().find(|p| p.is_file()) {
            return Some(found);
        }

        // Sharded layout: Formula/<shard>/<name>.rb
        fs::read_dir(&formula_dir)
            .ok()?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path().join(&file_name))
            .find(|p| p.is_file())
    }
}

/// List all installed taps, sorted by name
pub fn list_taps(taps_dir: &Path) -> Result<Vec<Tap>> {
    if !taps_dir.exists() {
        return Ok(vec![]);
    }

    let mut taps = Vec::new();

    for user_entry in fs::read_dir(taps_dir)
        .with_context(|| format!("Failed to read taps: {}", taps_dir.display()))?
    {
        let user_entry = user_entry?;
        let user = user_entry.file_name().to_string_lossy().to_string();

        if user.starts_with('.') {
            continue;
        }

        let user_path = user_entry.path();
        if !user_path.is_dir() {
            continue;
        }

        for repo_entry in fs::read_dir(&user_path)? {
            let repo_entry = repo_entry?;
            let repo = repo_entry.file_name().to_string_lossy().to_string();

            if repo.starts_with('.') || !repo_entry.path().is_dir() {
                continue;
            }

            // Remove "homebrew-" prefix for display
            let display_repo = repo.strip_prefix("homebrew-").unwrap_or(&repo);
            taps.push(Tap {
                name: format!("{}/{}", user, display_repo),
                path: repo_entry.path(),
            });
        }
    }

    taps.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(taps)
}

/// Names of the taps that provide a formula file called `name`
pub fn taps_providing(taps: &[Tap], name: &str) -> Vec<String> {
    taps.iter()
        .filter(|tap| tap.formula_file(name).is_some())
        .map(|tap| tap.name.clone())
        .collect()
}
