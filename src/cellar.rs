//! Homebrew Cellar layout - reading racks, kegs and link records

use crate::error::{Result, UnlinkedError};
use crate::keg::Keg;
use std::fs;
use std::path::{Path, PathBuf};

/// Detect the Homebrew prefix on this system
pub fn detect_prefix() -> PathBuf {
    // First check environment variable
    if let Ok(prefix) = std::env::var("HOMEBREW_PREFIX") {
        return PathBuf::from(prefix);
    }

    // Detect by architecture
    #[cfg(target_arch = "aarch64")]
    {
        PathBuf::from("/opt/homebrew")
    }
    #[cfg(target_arch = "x86_64")]
    {
        PathBuf::from("/usr/local")
    }
    #[cfg(not(any(target_arch = "aarch64", target_arch = "x86_64")))]
    {
        PathBuf::from("/usr/local")
    }
}

/// Filesystem locations the report reads from.
///
/// Everything is derived from the prefix unless overridden:
/// - `Cellar/`             installed kegs, one rack per formula
/// - `var/homebrew/linked` one entry per linked formula
/// - `opt/`                version-agnostic keg records
/// - `Library/Taps`        installed taps (under the repository)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub prefix: PathBuf,
    pub cellar: PathBuf,
    pub linked_kegs: PathBuf,
    pub opt: PathBuf,
    pub taps: PathBuf,
}

impl Layout {
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        let prefix = prefix.into();
        Self {
            cellar: prefix.join("Cellar"),
            linked_kegs: prefix.join("var/homebrew/linked"),
            opt: prefix.join("opt"),
            taps: prefix.join("Library/Taps"),
            prefix,
        }
    }

    /// Build the layout from `HOMEBREW_PREFIX`, `HOMEBREW_CELLAR` and `HOMEBREW_REPOSITORY`
    pub fn from_env() -> Self {
        let mut layout = Self::new(detect_prefix());

        if let Some(cellar) = std::env::var_os("HOMEBREW_CELLAR") {
            layout = layout.with_cellar(cellar);
        }
        if let Some(repository) = std::env::var_os("HOMEBREW_REPOSITORY") {
            layout = layout.with_repository(repository);
        }

        layout
    }

    pub fn with_cellar(mut self, cellar: impl Into<PathBuf>) -> Self {
        self.cellar = cellar.into();
        self
    }

    pub fn with_repository(mut self, repository: impl AsRef<Path>) -> Self {
        self.taps = repository.as_ref().join("Library/Taps");
        self
    }

    pub fn rack_path(&self, name: &str) -> PathBuf {
        self.cellar.join(name)
    }

    /// The Cellar with symlinks resolved, used when mapping link targets back to kegs
    pub fn resolved_cellar(&self) -> PathBuf {
        self.cellar
            .canonicalize()
            .unwrap_or_else(|_| self.cellar.clone())
    }
}

/// List every rack (formula installation root) in the Cellar.
///
/// Names are returned in directory order; callers sort before display.
/// A missing Cellar means nothing is installed. An unreadable one is fatal.
pub fn list_racks(layout: &Layout) -> Result<Vec<String>> {
    let cellar = &layout.cellar;

    if !cellar.exists() {
        return Ok(vec![]);
    }

    let unreadable = |source: std::io::Error| UnlinkedError::CellarUnreadable {
        path: cellar.clone(),
        source,
    };

    let entries = fs::read_dir(cellar).map_err(unreadable)?;
    let mut racks = Vec::new();

    for entry in entries {
        let entry = entry.map_err(unreadable)?;
        let name = entry.file_name().to_string_lossy().to_string();

        // Skip hidden files
        if name.starts_with('.') {
            continue;
        }

        // Racks are real directories, not symlinks to somewhere else
        let file_type = entry.file_type().map_err(unreadable)?;
        if !file_type.is_dir() {
            continue;
        }

        racks.push(name);
    }

    Ok(racks)
}

/// Whether `name` has an entry in the linked-keg registry
pub fn is_linked(layout: &Layout, name: &str) -> bool {
    layout.linked_kegs.join(name).is_dir()
}

/// All kegs under a rack, newest version first
pub fn installed_kegs(layout: &Layout, name: &str) -> Vec<Keg> {
    let rack = layout.rack_path(name);

    let entries = match fs::read_dir(&rack) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("cannot read rack {}: {}", rack.display(), e);
            return vec![];
        }
    };

    let mut kegs: Vec<Keg> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| Keg::from_path(entry.path()))
        .collect();

    // Sort by version - newest first
    kegs.sort_by(|a, b| compare_versions(&b.version, &a.version));

    kegs
}

/// The keg that represents a rack: the one recorded in `opt/`, else the newest
pub fn current_keg(layout: &Layout, name: &str) -> Option<Keg> {
    let opt_record = layout.opt.join(name);
    if let Ok(target) = opt_record.canonicalize()
        && let Some(keg) = Keg::for_path(&layout.resolved_cellar(), &target)
        && keg.name == name
    {
        return Some(keg);
    }

    installed_kegs(layout, name).into_iter().next()
}

/// Whether at least one keg of `name` is installed
pub fn is_installed(layout: &Layout, name: &str) -> bool {
    !installed_kegs(layout, name).is_empty()
}

/// Compare two version strings semantically
pub(crate) fn compare_versions(a: &str, b: &str) -> std::cmp::Ordering {
    // Parse as semantic version numbers
    let a_parts: Vec<u32> = a
        .split(['.', '_'])
        .filter_map(|s| s.parse::<u32>().ok())
        .collect();
    let b_parts: Vec<u32> = b
        .split(['.', '_'])
        .filter_map(|s| s.parse::<u32>().ok())
        .collect();

    // Compare version parts numerically
    for i in 0..a_parts.len().max(b_parts.len()) {
        let a_part = a_parts.get(i).unwrap_or(&0);
        let b_part = b_parts.get(i).unwrap_or(&0);
        match a_part.cmp(b_part) {
            std::cmp::Ordering::Equal => continue,
            other => return other,
        }
    }

    // Fall back to lexicographic
    a.cmp(b)
}
