//! Version resolution for imported and importable documentation

use std::{fs, path::Path, path::PathBuf};

use crate::docs::Library;
use crate::error::{DocrError, Result};
use crate::log;
use crate::source::{ImportableVersion, VersionSource, newest_importable};
use crate::store::{
    ImportRecord, LibraryStore, MANIFEST_FILE, README_FILE, RECORD_FILE, check_dir_name,
    compute_hash,
};

/// Which rule picked a toolchain-linked version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Latest version already in the library
    Imported,
    /// Matched the detected toolchain version
    Detected,
    /// Newest importable version
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub version: String,
    pub origin: Origin,
    /// Whether this resolution imported the version
    pub imported: bool,
}

pub struct Registry<'a, S: VersionSource + ?Sized> {
    store: &'a LibraryStore,
    source: &'a S,
    staging: PathBuf,
}

impl<'a, S: VersionSource + ?Sized> Registry<'a, S> {
    pub fn new(store: &'a LibraryStore, source: &'a S, staging: impl Into<PathBuf>) -> Self {
        Self {
            store,
            source,
            staging: staging.into(),
        }
    }

    /// Check that `version` of `name` is imported
    pub fn resolve_explicit(&self, name: &str, version: &str) -> Result<String> {
        self.store.library(name, version)?;
        Ok(version.to_string())
    }

    /// Most recently imported version of `name`
    pub fn resolve_latest(&self, name: &str) -> Result<String> {
        self.store
            .versions(name)?
            .pop()
            .ok_or_else(|| DocrError::NotFound(name.to_string()))
    }

    /// Explicit version when given, latest imported otherwise
    pub fn resolve(&self, name: &str, version: Option<&str>) -> Result<String> {
        match version {
            Some(version) => self.resolve_explicit(name, version),
            None => self.resolve_latest(name),
        }
    }

    /// Pick the version of a toolchain-linked library and import it if needed.
    ///
    /// An already imported library keeps its latest version and `detected` is
    /// ignored. Otherwise the detected version is used when the source has it,
    /// falling back to the newest importable version.
    pub fn resolve_toolchain_version(
        &self,
        name: &str,
        detected: Option<&str>,
    ) -> Result<Resolution> {
        if let Some(latest) = self.store.versions(name)?.pop() {
            log::debug(format!("{} already imported, using version {}", name, latest));
            if self.store.contains(name, &latest)? {
                return Ok(Resolution {
                    version: latest,
                    origin: Origin::Imported,
                    imported: false,
                });
            }
            // recorded but missing on disk
            let imported = self.import(name, &latest)?;
            return Ok(Resolution {
                version: latest,
                origin: Origin::Imported,
                imported,
            });
        }

        let available = self.source.importable_versions(name)?;
        if available.is_empty() {
            return Err(DocrError::NoImportableVersions(name.to_string()));
        }

        let mut target = None;
        if let Some(detected) = detected.filter(|v| !v.is_empty()) {
            match available.iter().find(|v| v.name == detected) {
                Some(v) => target = Some((v, Origin::Detected)),
                None => log::warn(format!(
                    "docs for {} version {} are not available",
                    name, detected
                )),
            }
        }

        let (version, origin) = match target {
            Some(target) => target,
            None => {
                let newest = newest_importable(&available)
                    .ok_or_else(|| DocrError::NoImportableVersions(name.to_string()))?;
                log::info(format!("using {} version {}", name, newest.name));
                (newest, Origin::Fallback)
            }
        };

        let imported = self.import_version(name, version)?;
        Ok(Resolution {
            version: version.name.clone(),
            origin,
            imported,
        })
    }

    /// Importable entry for `version`, or the newest importable version
    pub fn resolve_importable(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> Result<ImportableVersion> {
        let available = self.source.importable_versions(name)?;
        let found = match version {
            Some(version) => available.iter().find(|v| v.name == version).ok_or_else(|| {
                DocrError::NotImportable {
                    name: name.to_string(),
                    version: version.to_string(),
                }
            })?,
            None => newest_importable(&available)
                .ok_or_else(|| DocrError::NoImportableVersions(name.to_string()))?,
        };
        Ok(found.clone())
    }

    /// Import `version` of `name`, looking it up in the source's version list.
    /// Returns `false` when it was already imported.
    pub fn import(&self, name: &str, version: &str) -> Result<bool> {
        if self.store.contains(name, version)? {
            log::debug(format!("{} version {} already imported", name, version));
            return Ok(false);
        }
        let entry = self.resolve_importable(name, Some(version))?;
        self.import_version(name, &entry)
    }

    /// Fetch, verify and commit one version. Nothing is recorded unless every
    /// step succeeds. Returns `false` when it was already imported.
    pub fn import_version(&self, name: &str, version: &ImportableVersion) -> Result<bool> {
        // names come from the remote list and end up as paths
        check_dir_name(name, &version.name)?;
        if self.store.contains(name, &version.name)? {
            log::debug(format!("{} version {} already imported", name, version.name));
            return Ok(false);
        }

        log::info(format!("importing {} version {}...", name, version.name));

        let staged = self.staging.join(name).join(&version.name);
        let result = self
            .source
            .fetch_manifest(name, version)
            .and_then(|bytes| self.stage(name, version, &bytes, &staged))
            .and_then(|()| self.store.commit(name, &version.name, &staged));

        if let Err(e) = result {
            if staged.exists() {
                if let Err(cleanup) = fs::remove_dir_all(&staged) {
                    log::debug(format!("failed to clean {}: {}", staged.display(), cleanup));
                }
            }
            return Err(import_failed(name, &version.name, e));
        }

        log::success(format!("imported {} version {}", name, version.name));
        Ok(true)
    }

    fn stage(
        &self,
        name: &str,
        version: &ImportableVersion,
        manifest: &[u8],
        staged: &Path,
    ) -> Result<()> {
        let library: Library =
            serde_json::from_slice(manifest).map_err(|e| DocrError::ImportFailed {
                name: name.to_string(),
                version: version.name.clone(),
                reason: format!("invalid documentation manifest: {}", e),
            })?;

        if staged.exists() {
            fs::remove_dir_all(staged).map_err(|e| DocrError::io(staged, e))?;
        }
        fs::create_dir_all(staged).map_err(|e| DocrError::io(staged, e))?;

        let manifest_path = staged.join(MANIFEST_FILE);
        fs::write(&manifest_path, manifest).map_err(|e| DocrError::io(&manifest_path, e))?;

        if !library.body.trim().is_empty() {
            let readme_path = staged.join(README_FILE);
            fs::write(&readme_path, &library.body).map_err(|e| DocrError::io(&readme_path, e))?;
        }

        let record = ImportRecord {
            sha256: compute_hash(manifest),
            source: self.source.describe(name, version),
        };
        let record_path = staged.join(RECORD_FILE);
        let json = serde_json::to_string_pretty(&record).map_err(|source| DocrError::Manifest {
            path: record_path.clone(),
            source,
        })?;
        fs::write(&record_path, json).map_err(|e| DocrError::io(&record_path, e))
    }
}

fn import_failed(name: &str, version: &str, err: DocrError) -> DocrError {
    match err {
        DocrError::ImportFailed { .. } => err,
        other => DocrError::ImportFailed {
            name: name.to_string(),
            version: version.to_string(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    const MANIFEST: &str = r##"{"repository_name":"crystal","body":"# Crystal\n","program":{"name":"Top Level Namespace","types":[{"name":"Array","full_name":"Array(T)"}]}}"##;

    struct FakeSource {
        versions: Vec<ImportableVersion>,
        manifest: String,
        list_calls: Cell<usize>,
        fetched: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn new(names: &[&str]) -> Self {
            Self {
                versions: names.iter().map(|n| ImportableVersion::new(*n)).collect(),
                manifest: MANIFEST.to_string(),
                list_calls: Cell::new(0),
                fetched: RefCell::new(Vec::new()),
            }
        }
    }

    impl VersionSource for FakeSource {
        fn importable_versions(&self, _name: &str) -> Result<Vec<ImportableVersion>> {
            self.list_calls.set(self.list_calls.get() + 1);
            Ok(self.versions.clone())
        }

        fn fetch_manifest(&self, _name: &str, version: &ImportableVersion) -> Result<Vec<u8>> {
            self.fetched.borrow_mut().push(version.name.clone());
            Ok(self.manifest.clone().into_bytes())
        }
    }

    struct Fixture {
        _tmp: tempfile::TempDir,
        store: LibraryStore,
        staging: PathBuf,
    }

    fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let store = LibraryStore::new(tmp.path().join("library"));
        let staging = tmp.path().join("cache").join("staging");
        Fixture {
            _tmp: tmp,
            store,
            staging,
        }
    }

    #[test]
    fn test_resolve_latest_uses_stored_order() {
        let fx = fixture();
        let source = FakeSource::new(&["1.0.0", "1.2.0"]);
        let registry = Registry::new(&fx.store, &source, &fx.staging);

        assert!(matches!(
            registry.resolve_latest("crystal"),
            Err(DocrError::NotFound(_))
        ));

        registry.import("crystal", "1.2.0").unwrap();
        registry.import("crystal", "1.0.0").unwrap();

        // import order, not version order
        assert_eq!(registry.resolve_latest("crystal").unwrap(), "1.0.0");
        assert_eq!(registry.resolve("crystal", None).unwrap(), "1.0.0");
    }

    #[test]
    fn test_resolve_explicit() {
        let fx = fixture();
        let source = FakeSource::new(&["1.0.0", "1.1.0"]);
        let registry = Registry::new(&fx.store, &source, &fx.staging);

        assert!(matches!(
            registry.resolve_explicit("crystal", "1.0.0"),
            Err(DocrError::NotFound(_))
        ));

        registry.import("crystal", "1.0.0").unwrap();
        let fetched_before = source.fetched.borrow().len();

        assert_eq!(registry.resolve_explicit("crystal", "1.0.0").unwrap(), "1.0.0");
        assert!(matches!(
            registry.resolve_explicit("crystal", "1.1.0"),
            Err(DocrError::VersionNotFound { .. })
        ));
        assert_eq!(
            source.fetched.borrow().len(),
            fetched_before,
            "explicit resolution never imports"
        );
    }

    #[test]
    fn test_import_round_trip() {
        let fx = fixture();
        let source = FakeSource::new(&["1.2.0"]);
        let registry = Registry::new(&fx.store, &source, &fx.staging);

        assert!(registry.import("crystal", "1.2.0").unwrap());
        assert!(!registry.import("crystal", "1.2.0").unwrap(), "second import is a no-op");

        assert_eq!(fx.store.versions("crystal").unwrap(), vec!["1.2.0"]);
        assert_eq!(registry.resolve_explicit("crystal", "1.2.0").unwrap(), "1.2.0");
        assert_eq!(*source.fetched.borrow(), vec!["1.2.0"]);

        let lib = fx.store.load("crystal", "1.2.0").unwrap();
        assert_eq!(lib.program.types[0].name, "Array");
        assert_eq!(
            fx.store.readme("crystal", "1.2.0").unwrap().as_deref(),
            Some("# Crystal\n")
        );

        let record = fx.store.version_dir("crystal", "1.2.0").join(RECORD_FILE);
        let record: ImportRecord =
            serde_json::from_str(&fs::read_to_string(record).unwrap()).unwrap();
        assert_eq!(record.sha256, compute_hash(MANIFEST.as_bytes()));
    }

    #[test]
    fn test_import_unknown_version() {
        let fx = fixture();
        let source = FakeSource::new(&["1.2.0"]);
        let registry = Registry::new(&fx.store, &source, &fx.staging);

        assert!(matches!(
            registry.import("crystal", "0.1.0"),
            Err(DocrError::NotImportable { .. })
        ));
        assert!(source.fetched.borrow().is_empty());
    }

    #[test]
    fn test_failed_import_leaves_store_untouched() {
        let fx = fixture();
        let mut source = FakeSource::new(&["1.2.0"]);
        source.manifest = "{ not json".to_string();
        let registry = Registry::new(&fx.store, &source, &fx.staging);

        let err = registry.import("crystal", "1.2.0").unwrap_err();
        assert!(matches!(err, DocrError::ImportFailed { .. }), "got {:?}", err);
        assert!(fx.store.versions("crystal").unwrap().is_empty());
        assert!(!fx.store.version_dir("crystal", "1.2.0").exists());
        assert!(!fx.staging.join("crystal").join("1.2.0").exists());
    }

    #[test]
    fn test_toolchain_detected_version() {
        let fx = fixture();
        let source = FakeSource::new(&["1.0.0", "1.1.0", "1.2.0"]);
        let registry = Registry::new(&fx.store, &source, &fx.staging);

        let res = registry
            .resolve_toolchain_version("crystal", Some("1.1.0"))
            .unwrap();
        assert_eq!(
            res,
            Resolution {
                version: "1.1.0".to_string(),
                origin: Origin::Detected,
                imported: true,
            }
        );
        assert_eq!(*source.fetched.borrow(), vec!["1.1.0"]);
        assert_eq!(fx.store.versions("crystal").unwrap(), vec!["1.1.0"]);
    }

    #[test]
    fn test_toolchain_fallback_to_newest() {
        for detected in [Some(""), None, Some("9.9.9")] {
            let fx = fixture();
            let source = FakeSource::new(&["1.0.0", "1.1.0", "1.2.0"]);
            let registry = Registry::new(&fx.store, &source, &fx.staging);

            let res = registry.resolve_toolchain_version("crystal", detected).unwrap();
            assert_eq!(res.version, "1.2.0", "detected = {:?}", detected);
            assert_eq!(res.origin, Origin::Fallback);
            assert!(res.imported);
        }
    }

    #[test]
    fn test_toolchain_ignores_detected_when_imported() {
        let fx = fixture();
        let source = FakeSource::new(&["1.0.0", "1.1.0", "1.2.0"]);
        let registry = Registry::new(&fx.store, &source, &fx.staging);
        registry.import("crystal", "1.0.0").unwrap();
        let list_calls = source.list_calls.get();

        let a = registry
            .resolve_toolchain_version("crystal", Some("1.1.0"))
            .unwrap();
        let b = registry.resolve_toolchain_version("crystal", None).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.version, "1.0.0");
        assert_eq!(a.origin, Origin::Imported);
        assert!(!a.imported);
        assert_eq!(source.list_calls.get(), list_calls, "source is not consulted");
    }

    #[test]
    fn test_toolchain_reimports_missing_directory() {
        let fx = fixture();
        let source = FakeSource::new(&["1.0.0", "1.1.0"]);
        let registry = Registry::new(&fx.store, &source, &fx.staging);
        registry.import("crystal", "1.0.0").unwrap();
        fs::remove_dir_all(fx.store.version_dir("crystal", "1.0.0")).unwrap();

        let res = registry
            .resolve_toolchain_version("crystal", Some("1.1.0"))
            .unwrap();
        assert_eq!(
            res,
            Resolution {
                version: "1.0.0".to_string(),
                origin: Origin::Imported,
                imported: true,
            }
        );
        assert_eq!(fx.store.versions("crystal").unwrap(), vec!["1.0.0"]);
        assert!(fx.store.contains("crystal", "1.0.0").unwrap());
        assert_eq!(*source.fetched.borrow(), vec!["1.0.0", "1.0.0"]);
    }

    #[test]
    fn test_version_names_cannot_escape_directories() {
        let fx = fixture();
        let victim = fx._tmp.path().join("victim");
        fs::create_dir_all(&victim).unwrap();
        fs::write(victim.join("keep.txt"), "keep").unwrap();

        let source = FakeSource::new(&["../../victim"]);
        let registry = Registry::new(&fx.store, &source, &fx.staging);

        let err = registry.resolve_toolchain_version("crystal", None).unwrap_err();
        assert!(matches!(err, DocrError::ImportFailed { .. }), "got {:?}", err);
        assert!(victim.join("keep.txt").exists());
        assert!(fx.store.libraries().unwrap().is_empty());
        assert!(source.fetched.borrow().is_empty(), "nothing is fetched");

        let err = registry.import("crystal", "../../victim").unwrap_err();
        assert!(matches!(err, DocrError::ImportFailed { .. }), "got {:?}", err);
        assert!(victim.join("keep.txt").exists());
    }

    #[test]
    fn test_toolchain_no_importable_versions() {
        let fx = fixture();
        let source = FakeSource::new(&[]);
        let registry = Registry::new(&fx.store, &source, &fx.staging);

        assert!(matches!(
            registry.resolve_toolchain_version("crystal", Some("1.0.0")),
            Err(DocrError::NoImportableVersions(_))
        ));
    }

    #[test]
    fn test_resolve_importable() {
        let fx = fixture();
        let source = FakeSource::new(&["1.2.0", "1.1.0"]);
        let registry = Registry::new(&fx.store, &source, &fx.staging);

        assert_eq!(registry.resolve_importable("crystal", None).unwrap().name, "1.2.0");
        assert_eq!(
            registry.resolve_importable("crystal", Some("1.1.0")).unwrap().name,
            "1.1.0"
        );
        assert!(matches!(
            registry.resolve_importable("crystal", Some("2.0.0")),
            Err(DocrError::NotImportable { .. })
        ));
    }
}
