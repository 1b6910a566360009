//! Module manifest: identity, dependencies and data files of the module.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Error;

/// Technical name of this module.
pub const MODULE_NAME: &str = "library_management";

const GROUPS_FILE: &str = "security/groups.xml";
const ACCESS_FILE: &str = "security/ir.model.access.csv";

/// Metadata the host framework reads before loading a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Technical module name.
    pub name: String,
    /// One-line summary.
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub website: String,
    /// Category used to filter module listings.
    #[serde(default = "default_category")]
    pub category: String,
    pub version: String,
    /// Modules that must be installed first.
    pub depends: Vec<String>,
    /// Data files loaded on install, in order.
    #[serde(default)]
    pub data: Vec<String>,
    /// Data files loaded only in demonstration mode.
    #[serde(default)]
    pub demo: Vec<String>,
}

fn default_category() -> String {
    "Uncategorized".to_string()
}

impl ModuleManifest {
    /// Create a manifest with only a name and version.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: String::new(),
            description: String::new(),
            author: String::new(),
            website: String::new(),
            category: default_category(),
            version: version.into(),
            depends: Vec::new(),
            data: Vec::new(),
            demo: Vec::new(),
        }
    }

    /// The manifest of `library_management`.
    pub fn library_management() -> Self {
        Self {
            summary: "Manage the books of a library and the partners who write and publish them"
                .to_string(),
            description: "Book catalog with authors, publishers, prices and release age".to_string(),
            author: "[Hendra] Forecastle".to_string(),
            website: "http://www.yourcompany.com".to_string(),
            ..Self::new(MODULE_NAME, "1.0")
        }
        .depends_on("base")
        .with_data([
            GROUPS_FILE,
            ACCESS_FILE,
            "views/library_book.xml",
            "views/library_book_categ.xml",
        ])
    }

    /// Add a dependency.
    pub fn depends_on(mut self, module: impl Into<String>) -> Self {
        self.depends.push(module.into());
        self
    }

    /// Append data files.
    pub fn with_data(mut self, files: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.data.extend(files.into_iter().map(Into::into));
        self
    }

    /// Parse a manifest from JSON.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and validate a manifest file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading module manifest");
        let manifest = Self::from_json(&std::fs::read_to_string(path)?)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the manifest can be installed.
    ///
    /// The access CSV references groups by id, so listing it before the
    /// groups file only loads if the groups already exist; that case is
    /// logged rather than rejected.
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::Manifest("module name is empty".to_string()));
        }
        if self.depends.is_empty() {
            return Err(Error::Manifest(format!(
                "module {} depends on nothing, it needs at least base",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for file in self.data.iter().chain(&self.demo) {
            if !seen.insert(file.as_str()) {
                return Err(Error::Manifest(format!("data file {file} listed twice")));
            }
        }

        let position = |file: &str| self.data.iter().position(|f| f == file);
        if let (Some(groups), Some(access)) = (position(GROUPS_FILE), position(ACCESS_FILE)) {
            if access < groups {
                warn!(
                    module = %self.name,
                    "{ACCESS_FILE} is loaded before {GROUPS_FILE}; the groups it references may not exist yet"
                );
            }
        }
        Ok(())
    }
}

impl Default for ModuleManifest {
    fn default() -> Self {
        Self::library_management()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_manifest() {
        let manifest = ModuleManifest::library_management();

        assert_eq!(manifest.name, "library_management");
        assert_eq!(manifest.version, "1.0");
        assert_eq!(manifest.category, "Uncategorized");
        assert_eq!(manifest.depends, vec!["base".to_string()]);
        assert_eq!(manifest.data.first().map(String::as_str), Some(GROUPS_FILE));
        assert_eq!(manifest.data.len(), 4);
        assert!(manifest.demo.is_empty());
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_from_json_defaults() {
        let manifest = ModuleManifest::from_json(
            r#"{"name": "library_extra", "version": "0.1", "depends": ["library_management"]}"#,
        )
        .unwrap();

        assert_eq!(manifest.category, "Uncategorized");
        assert!(manifest.data.is_empty());
        assert!(manifest.validate().is_ok());

        assert!(matches!(
            ModuleManifest::from_json(r#"{"name": "x"}"#),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_validate_rejects() {
        let unnamed = ModuleManifest::new(" ", "1.0").depends_on("base");
        assert!(matches!(unnamed.validate(), Err(Error::Manifest(_))));

        let standalone = ModuleManifest::new("lonely", "1.0");
        assert!(matches!(standalone.validate(), Err(Error::Manifest(_))));

        let duplicated = ModuleManifest::library_management().with_data([GROUPS_FILE]);
        assert!(matches!(
            duplicated.validate(),
            Err(Error::Manifest(msg)) if msg.contains("listed twice")
        ));
    }

    #[test]
    fn test_access_before_groups_is_allowed() {
        let manifest = ModuleManifest::new("reordered", "1.0")
            .depends_on("base")
            .with_data([ACCESS_FILE, GROUPS_FILE]);

        assert!(manifest.validate().is_ok());
    }
}
