// Test helpers for isolated testing
// Lays out a fake Homebrew prefix in a temporary directory

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs as unix_fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use unlinked::Layout;

/// Isolated prefix using temporary directories
/// Automatically cleaned up when dropped (RAII pattern)
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub prefix: PathBuf,
    pub layout: Layout,
}

impl TestEnvironment {
    /// Create a new isolated prefix:
    /// - temp/
    ///   - Cellar/               (package installations)
    ///   - bin/, sbin/           (symlinks to executables)
    ///   - var/homebrew/linked/  (linked keg records)
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        // Resolve /tmp symlinks (macOS /var -> /private/var) up front
        let prefix = temp_dir.path().canonicalize().unwrap();
        let layout = Layout::new(&prefix);

        fs::create_dir_all(&layout.cellar).unwrap();
        fs::create_dir_all(&layout.linked_kegs).unwrap();
        fs::create_dir_all(prefix.join("bin")).unwrap();
        fs::create_dir_all(prefix.join("sbin")).unwrap();

        Self {
            temp_dir,
            prefix,
            layout,
        }
    }

    /// Install a keg with the given `bin/` and `sbin/` entries, e.g. `"bin/foo"`
    pub fn install(&self, name: &str, version: &str, files: &[&str]) -> PathBuf {
        let keg = self.layout.cellar.join(name).join(version);
        fs::create_dir_all(&keg).unwrap();
        for file in files {
            let path = keg.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "#!/bin/sh\necho test").unwrap();
        }
        keg
    }

    /// Create an empty rack with no keg inside
    pub fn empty_rack(&self, name: &str) {
        fs::create_dir_all(self.layout.cellar.join(name)).unwrap();
    }

    /// Record a keg as linked (as brew does, a symlink to the keg) and link its files
    pub fn link(&self, name: &str, version: &str, files: &[&str]) {
        self.symlink(
            &format!("var/homebrew/linked/{}", name),
            &format!("Cellar/{}/{}", name, version),
        );
        for file in files {
            self.symlink(file, &format!("Cellar/{}/{}/{}", name, version, file));
        }
    }

    /// Only add the linked-registry entry
    pub fn mark_linked(&self, name: &str) {
        fs::create_dir_all(self.layout.linked_kegs.join(name)).unwrap();
    }

    /// Create `<prefix>/<rel>` as a symlink to `<prefix>/<target_from_prefix>` (relative, like brew)
    pub fn symlink(&self, rel: &str, target_from_prefix: &str) {
        let link = self.prefix.join(rel);
        fs::create_dir_all(link.parent().unwrap()).unwrap();
        let depth = Path::new(rel).components().count() - 1;
        let mut target = PathBuf::new();
        for _ in 0..depth {
            target.push("..");
        }
        target.push(target_from_prefix);
        unix_fs::symlink(target, link).unwrap();
    }

    /// Create a real file at `<prefix>/<rel>`
    pub fn external_file(&self, rel: &str) {
        let path = self.prefix.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "user's custom script").unwrap();
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_creates_directories() {
        let env = TestEnvironment::new();

        assert!(env.layout.cellar.exists());
        assert!(env.layout.linked_kegs.exists());
        assert!(env.prefix.join("bin").exists());
        assert!(env.prefix.join("sbin").exists());
    }

    #[test]
    fn test_link_creates_relative_symlinks() {
        let env = TestEnvironment::new();
        env.install("foo", "1.0", &["bin/foo"]);
        env.link("foo", "1.0", &["bin/foo"]);

        let link = env.prefix.join("bin/foo");
        assert_eq!(
            fs::read_link(&link).unwrap(),
            PathBuf::from("../Cellar/foo/1.0/bin/foo")
        );
        assert!(link.exists());
        assert!(env.layout.linked_kegs.join("foo").is_dir());
    }

    #[test]
    fn test_environment_cleanup() {
        let cellar = {
            let env = TestEnvironment::new();
            env.layout.cellar.clone()
        };

        // After env is dropped, temp directory should be cleaned up
        assert!(!cellar.exists());
    }
}
