//! Local library directory
//!
//! Layout:
//!
//! ```text
//! <library_dir>/libraries.json            name -> versions, in import order
//! <library_dir>/<name>/<version>/index.json
//! <library_dir>/<name>/<version>/README.md
//! <library_dir>/<name>/<version>/.docr-import.json
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    collections::BTreeMap,
    fs,
    path::{Component, Path, PathBuf},
};

use crate::docs::Library;
use crate::error::{DocrError, Result};
use crate::log;

/// Library name -> versions, oldest import first
pub type LibraryVersionSet = BTreeMap<String, Vec<String>>;

pub const INDEX_FILE: &str = "libraries.json";
pub const MANIFEST_FILE: &str = "index.json";
pub const README_FILE: &str = "README.md";
pub const RECORD_FILE: &str = ".docr-import.json";

/// Written next to an imported manifest once it has been verified
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRecord {
    pub sha256: String,
    pub source: String,
}

#[derive(Debug, Clone)]
pub struct LibraryStore {
    root: PathBuf,
}

impl LibraryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    pub fn version_dir(&self, name: &str, version: &str) -> PathBuf {
        self.root.join(name).join(version)
    }

    /// All imported libraries and their versions
    pub fn libraries(&self) -> Result<LibraryVersionSet> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(LibraryVersionSet::new());
        }

        let content = fs::read_to_string(&path).map_err(|e| DocrError::io(&path, e))?;
        serde_json::from_str(&content).map_err(|source| DocrError::Manifest { path, source })
    }

    /// Imported versions of `name`, empty if none
    pub fn versions(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.libraries()?.remove(name).unwrap_or_default())
    }

    /// Directory of an imported version, failing if it is absent
    pub fn library(&self, name: &str, version: &str) -> Result<PathBuf> {
        let versions = self.versions(name)?;
        if versions.is_empty() {
            return Err(DocrError::NotFound(name.to_string()));
        }

        let dir = self.version_dir(name, version);
        if !versions.iter().any(|v| v == version) || !dir.is_dir() {
            return Err(DocrError::VersionNotFound {
                name: name.to_string(),
                version: version.to_string(),
            });
        }

        Ok(dir)
    }

    pub fn contains(&self, name: &str, version: &str) -> Result<bool> {
        Ok(self.versions(name)?.iter().any(|v| v == version)
            && self.version_dir(name, version).is_dir())
    }

    /// Load and parse the documentation manifest of an imported version
    pub fn load(&self, name: &str, version: &str) -> Result<Library> {
        let path = self.library(name, version)?.join(MANIFEST_FILE);
        let content = fs::read_to_string(&path).map_err(|e| DocrError::io(&path, e))?;
        serde_json::from_str(&content).map_err(|source| DocrError::Manifest { path, source })
    }

    /// README of an imported version, `None` when the library has none
    pub fn readme(&self, name: &str, version: &str) -> Result<Option<String>> {
        let path = self.library(name, version)?.join(README_FILE);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DocrError::io(&path, e)),
        }
    }

    /// Move a fully staged version into the library and record it.
    ///
    /// The version only becomes visible through [`LibraryStore::versions`]
    /// once its files are in place.
    pub fn commit(&self, name: &str, version: &str, staged: &Path) -> Result<()> {
        check_dir_name(name, version)?;
        let dest = self.version_dir(name, version);
        if dest.exists() {
            fs::remove_dir_all(&dest).map_err(|e| DocrError::io(&dest, e))?;
        }

        let parent = self.root.join(name);
        fs::create_dir_all(&parent).map_err(|e| DocrError::io(&parent, e))?;

        if let Err(e) = fs::rename(staged, &dest) {
            // cache and library may live on different filesystems
            log::debug(format!("rename failed ({}), copying instead", e));
            copy_dir(staged, &dest)?;
            fs::remove_dir_all(staged).map_err(|e| DocrError::io(staged, e))?;
        }

        let mut libs = self.libraries()?;
        let versions = libs.entry(name.to_string()).or_default();
        if !versions.iter().any(|v| v == version) {
            versions.push(version.to_string());
        }
        self.save_index(&libs)
    }

    /// Remove one version, or every version when `version` is `None`.
    /// Returns the versions that were removed.
    pub fn remove(&self, name: &str, version: Option<&str>) -> Result<Vec<String>> {
        let mut libs = self.libraries()?;
        let Some(versions) = libs.get_mut(name).filter(|v| !v.is_empty()) else {
            return Err(DocrError::NotFound(name.to_string()));
        };

        let removed = match version {
            Some(version) => {
                let Some(pos) = versions.iter().position(|v| v == version) else {
                    return Err(DocrError::VersionNotFound {
                        name: name.to_string(),
                        version: version.to_string(),
                    });
                };
                vec![versions.remove(pos)]
            }
            None => std::mem::take(versions),
        };

        if versions.is_empty() {
            libs.remove(name);
        }
        self.save_index(&libs)?;

        for v in &removed {
            let dir = self.version_dir(name, v);
            if dir.exists() {
                fs::remove_dir_all(&dir).map_err(|e| DocrError::io(&dir, e))?;
            }
        }

        let lib_dir = self.root.join(name);
        if !libs.contains_key(name) && lib_dir.exists() {
            fs::remove_dir_all(&lib_dir).map_err(|e| DocrError::io(&lib_dir, e))?;
        }

        Ok(removed)
    }

    fn save_index(&self, libs: &LibraryVersionSet) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| DocrError::io(&self.root, e))?;

        let path = self.index_path();
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(libs).map_err(|source| DocrError::Manifest {
            path: path.clone(),
            source,
        })?;
        fs::write(&tmp, json).map_err(|e| DocrError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| DocrError::io(&path, e))
    }
}

/// `true` when `name` is a single plain path segment: no separators, `.` or `..`
pub fn is_dir_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == name
    )
}

/// Library and version names become directories under the store root
pub(crate) fn check_dir_name(name: &str, version: &str) -> Result<()> {
    for part in [name, version] {
        if !is_dir_name(part) {
            return Err(DocrError::ImportFailed {
                name: name.to_string(),
                version: version.to_string(),
                reason: format!("'{}' is not a valid directory name", part),
            });
        }
    }
    Ok(())
}

pub fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir_all(to).map_err(|e| DocrError::io(to, e))?;
    for entry in fs::read_dir(from).map_err(|e| DocrError::io(from, e))? {
        let entry = entry.map_err(|e| DocrError::io(from, e))?;
        let target = to.join(entry.file_name());
        if entry.path().is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| DocrError::io(&target, e))?;
        }
    }
    Ok(())
}
