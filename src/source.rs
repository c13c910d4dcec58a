//! Remote documentation sources
//!
//! A source publishes `versions.json` listing importable versions, newest
//! first, and one `index.json` manifest per version:
//!
//! ```json
//! {"versions": [
//!   {"name": "nightly", "url": "/api/master/", "released": false},
//!   {"name": "1.14.0", "url": "/api/1.14.0/"},
//!   {"name": "1.13.3", "url": "/api/1.13.3/"}
//! ]}
//! ```

use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeMap, io::Read, time::Duration};

use crate::error::{DocrError, Result};
use crate::log;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportableVersion {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_released")]
    pub released: bool,
}

fn default_released() -> bool {
    true
}

impl ImportableVersion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
            released: true,
        }
    }

    /// Directory holding this version's manifest, relative to the source base URL
    pub fn dir(&self) -> &str {
        self.url
            .as_deref()
            .and_then(|url| url.trim_end_matches('/').rsplit('/').next())
            .filter(|dir| !dir.is_empty())
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Deserialize)]
struct VersionList {
    versions: Vec<ImportableVersion>,
}

/// Where importable versions are listed and their manifests fetched from
pub trait VersionSource {
    /// Importable versions of `name`, newest first
    fn importable_versions(&self, name: &str) -> Result<Vec<ImportableVersion>>;

    /// Raw manifest bytes of one version
    fn fetch_manifest(&self, name: &str, version: &ImportableVersion) -> Result<Vec<u8>>;

    /// Human readable origin of a manifest, recorded on import
    fn describe(&self, name: &str, version: &ImportableVersion) -> String {
        format!("{} {}", name, version.name)
    }
}

/// Picks the newest importable version.
///
/// Released versions are preferred over unreleased ones (`nightly`). Among
/// them the highest semantic version wins; names that do not parse as a
/// version rank below all that do, and among themselves the earliest listed
/// wins since sources list newest first.
pub fn newest_importable(versions: &[ImportableVersion]) -> Option<&ImportableVersion> {
    let released: Vec<&ImportableVersion> = versions.iter().filter(|v| v.released).collect();
    let candidates = if released.is_empty() {
        versions.iter().collect()
    } else {
        released
    };

    candidates
        .into_iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| {
            let rank = match (parse_version(&a.name), parse_version(&b.name)) {
                (Some(va), Some(vb)) => va.cmp(&vb),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            };
            // equal ranks: the earlier entry is newer
            rank.then_with(|| ib.cmp(ia))
        })
        .map(|(_, v)| v)
}

/// Lenient semver parse: `1.2` is read as `1.2.0`
fn parse_version(name: &str) -> Option<semver::Version> {
    let name = name.trim_start_matches('v');
    semver::Version::parse(name)
        .ok()
        .or_else(|| semver::Version::parse(&format!("{}.0", name)).ok())
}

/// Fetches versions and manifests over HTTP from configured base URLs
pub struct HttpSource {
    sources: BTreeMap<String, String>,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(sources: BTreeMap<String, String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("docr/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { sources, agent }
    }

    fn base_url(&self, name: &str) -> Result<&str> {
        self.sources
            .get(name)
            .map(|url| url.trim_end_matches('/'))
            .ok_or_else(|| DocrError::NoSource(name.to_string()))
    }

    fn manifest_url(&self, name: &str, version: &ImportableVersion) -> Result<String> {
        Ok(format!("{}/{}/index.json", self.base_url(name)?, version.dir()))
    }
}

impl VersionSource for HttpSource {
    fn importable_versions(&self, name: &str) -> Result<Vec<ImportableVersion>> {
        let url = format!("{}/versions.json", self.base_url(name)?);
        log::debug(format!("GET {}", url));

        let fail = |reason: String| DocrError::Source {
            name: name.to_string(),
            reason,
        };

        let list: VersionList = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| fail(format!("failed to fetch {}: {}", url, e)))?
            .into_json()
            .map_err(|e| fail(format!("failed to parse {}: {}", url, e)))?;

        Ok(list.versions)
    }

    fn fetch_manifest(&self, name: &str, version: &ImportableVersion) -> Result<Vec<u8>> {
        let url = self.manifest_url(name, version)?;
        log::debug(format!("GET {}", url));

        let fail = |reason: String| DocrError::ImportFailed {
            name: name.to_string(),
            version: version.name.clone(),
            reason,
        };

        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| fail(format!("failed to fetch {}: {}", url, e)))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| fail(format!("failed to read response body: {}", e)))?;

        Ok(bytes)
    }

    fn describe(&self, name: &str, version: &ImportableVersion) -> String {
        self.manifest_url(name, version)
            .unwrap_or_else(|_| format!("{} {}", name, version.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(names: &[&str]) -> Vec<ImportableVersion> {
        names.iter().map(|n| ImportableVersion::new(*n)).collect()
    }

    #[test]
    fn test_parse_version_list() {
        let json = r#"{"versions": [
            {"name": "nightly", "url": "/api/master/", "released": false},
            {"name": "1.14.0", "url": "/api/1.14.0/"}
        ]}"#;
        let list: VersionList = serde_json::from_str(json).unwrap();
        assert_eq!(list.versions.len(), 2);
        assert!(!list.versions[0].released);
        assert!(list.versions[1].released, "released defaults to true");
        assert_eq!(list.versions[0].dir(), "master");
        assert_eq!(list.versions[1].dir(), "1.14.0");
    }

    #[test]
    fn test_dir_falls_back_to_name() {
        assert_eq!(ImportableVersion::new("1.0.0").dir(), "1.0.0");
        let v = ImportableVersion {
            url: Some("/".to_string()),
            ..ImportableVersion::new("1.0.0")
        };
        assert_eq!(v.dir(), "1.0.0");
    }

    #[test]
    fn test_newest_is_independent_of_list_order() {
        let oldest_first = versions(&["1.0.0", "1.1.0", "1.2.0"]);
        assert_eq!(newest_importable(&oldest_first).unwrap().name, "1.2.0");

        let newest_first = versions(&["1.2.0", "1.1.0", "1.0.0"]);
        assert_eq!(newest_importable(&newest_first).unwrap().name, "1.2.0");
    }

    #[test]
    fn test_newest_skips_nightly() {
        let mut list = versions(&["nightly", "1.14.0", "1.13.3", "0.36.1"]);
        list[0].released = false;
        assert_eq!(newest_importable(&list).unwrap().name, "1.14.0");
    }

    #[test]
    fn test_newest_semantic_not_lexical() {
        let list = versions(&["0.9.0", "0.10.0", "1.2", "1.10"]);
        assert_eq!(newest_importable(&list).unwrap().name, "1.10");
    }

    #[test]
    fn test_newest_unparseable_prefers_first() {
        let list = versions(&["beta", "alpha"]);
        assert_eq!(newest_importable(&list).unwrap().name, "beta");

        let list = versions(&["beta", "0.1.0"]);
        assert_eq!(newest_importable(&list).unwrap().name, "0.1.0");

        assert!(newest_importable(&[]).is_none());
    }

    #[test]
    fn test_unknown_library_has_no_source() {
        let source = HttpSource::new(BTreeMap::new(), Duration::from_secs(1));
        assert!(matches!(
            source.importable_versions("kemal"),
            Err(DocrError::NoSource(_))
        ));
    }
}
