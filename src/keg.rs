//! Kegs and resolving prefix symlinks back to the keg that owns them

use std::fs;
use std::path::{Path, PathBuf};

/// One installed version of a formula: `<cellar>/<name>/<version>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keg {
    pub name: String,
    pub version: String,
    pub path: PathBuf,
}

impl Keg {
    /// Create from a Cellar version directory
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let version = path.file_name()?.to_string_lossy().to_string();
        let name = path.parent()?.file_name()?.to_string_lossy().to_string();
        Some(Self {
            name,
            version,
            path,
        })
    }

    /// Find the keg containing `path`, which must already be fully resolved.
    ///
    /// A keg root is the ancestor whose grandparent is the (resolved) Cellar.
    pub fn for_path(cellar: &Path, path: &Path) -> Option<Self> {
        path.ancestors()
            .find(|ancestor| ancestor.parent().and_then(Path::parent) == Some(cellar))
            .and_then(|root| Self::from_path(root.to_path_buf()))
    }
}

/// What occupies a path in the shared prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOwner {
    /// Nothing there, not even a broken symlink
    Absent,
    /// A real file or directory
    NotSymlink,
    /// A symlink whose target no longer exists
    Dangling,
    /// A symlink resolving outside every keg
    Unowned(PathBuf),
    /// A symlink resolving into a keg
    Keg(Keg),
}

/// Maps prefix entries to owning kegs by following their symlinks.
///
/// Nothing is indexed: every lookup reads the filesystem as it is now.
#[derive(Debug, Clone)]
pub struct OwnerResolver {
    cellar: PathBuf,
}

impl OwnerResolver {
    /// `cellar` should be the resolved Cellar path (see `Layout::resolved_cellar`)
    pub fn new(cellar: PathBuf) -> Self {
        Self { cellar }
    }

    pub fn owner_of(&self, entry: &Path) -> LinkOwner {
        let metadata = match entry.symlink_metadata() {
            Ok(m) => m,
            Err(_) => return LinkOwner::Absent,
        };

        if !metadata.file_type().is_symlink() {
            return LinkOwner::NotSymlink;
        }

        // Fails for missing targets and symlink loops alike
        let target = match fs::canonicalize(entry) {
            Ok(t) => t,
            Err(_) => return LinkOwner::Dangling,
        };

        match Keg::for_path(&self.cellar, &target) {
            Some(keg) => LinkOwner::Keg(keg),
            None => LinkOwner::Unowned(target),
        }
    }
}
