//! Finding what keeps a keg from being linked
//!
//! Two independent checks:
//! - **file conflicts**: something already sits at a path in `bin`/`sbin`
//!   that this keg would link to
//! - **declared conflicts**: the formula names another package that must not
//!   be linked at the same time, and that package is installed and linked

use crate::api::{DeclaredConflict, Formula};
use crate::cellar::{self, Layout};
use crate::formulary::FormulaSource;
use crate::keg::{Keg, LinkOwner, OwnerResolver};
use std::fs;

/// Keg directories whose entries are checked against the prefix
pub const SCANNED_DIRS: &[&str] = &["bin", "sbin"];

/// Filesystem bookkeeping files that are never linked
const IGNORED_FILES: &[&str] = &[".DS_Store", ".localized"];

/// A prefix path occupied by something other than this keg
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileConflict {
    /// A file not owned by any keg, named by its base name
    ExternalFile(String),
    /// A symlink owned by another formula's keg
    Keg(String),
}

fn is_ignored(name: &str) -> bool {
    IGNORED_FILES.contains(&name) || name.starts_with("._")
}

/// Return the first prefix entry in `bin`/`sbin` that blocks `keg`.
///
/// Entries are visited per directory in sorted order, and only the first
/// conflict is reported. Broken symlinks are left over from removed packages
/// and never count as conflicts.
pub fn find_file_conflict(layout: &Layout, keg: &Keg) -> Option<FileConflict> {
    let resolver = OwnerResolver::new(layout.resolved_cellar());

    for dir_name in SCANNED_DIRS {
        let source_dir = keg.path.join(dir_name);

        let entries = match fs::read_dir(&source_dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| !is_ignored(name))
            .collect();
        names.sort();

        let target_dir = layout.prefix.join(dir_name);

        for name in names {
            let target = target_dir.join(&name);

            match resolver.owner_of(&target) {
                LinkOwner::Absent | LinkOwner::Dangling => continue,
                LinkOwner::NotSymlink => {
                    tracing::debug!("{}: {} is not a symlink", keg.name, target.display());
                    return Some(FileConflict::ExternalFile(name));
                }
                LinkOwner::Unowned(real) => {
                    tracing::debug!(
                        "{}: {} points outside the Cellar ({})",
                        keg.name,
                        target.display(),
                        real.display()
                    );
                    return Some(FileConflict::ExternalFile(name));
                }
                LinkOwner::Keg(owner) if owner.name != keg.name => {
                    tracing::debug!(
                        "{}: {} belongs to {} {}",
                        keg.name,
                        target.display(),
                        owner.name,
                        owner.version
                    );
                    return Some(FileConflict::Keg(owner.name));
                }
                LinkOwner::Keg(_) => continue,
            }
        }
    }

    None
}

/// Return the first declared conflict that is installed and linked right now.
///
/// Conflicts whose metadata cannot be loaded, that are not installed, or that
/// are installed but unlinked are skipped.
pub fn find_declared_conflict(
    layout: &Layout,
    source: &dyn FormulaSource,
    formula: &Formula,
) -> Option<DeclaredConflict> {
    formula.declared_conflicts().into_iter().find(|conflict| {
        let other = match source.load(&conflict.name) {
            Ok(f) => f,
            Err(e) => {
                tracing::debug!("{}: skipping conflict {}: {}", formula.name, conflict.name, e);
                return false;
            }
        };

        cellar::is_installed(layout, &other.name) && cellar::is_linked(layout, &other.name)
    })
}
