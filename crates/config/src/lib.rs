//! Configuration for the quire bundle engine.
//!
//! Configuration is written in KDL (v2) format:
//!
//! ```kdl
//! // Identity exported to commands as TM_APP_NAME, TM_APP_VERSION, ...
//! editor {
//!     name "quire"
//!     version "0.1.0"
//!     app-path "/usr/local/bin/quire"
//!     support-path "/usr/local/share/quire/Support"
//! }
//!
//! // Preference resolution
//! cascade {
//!     cache #true
//! }
//!
//! // Extra variables for every command environment
//! environment {
//!     LANG "en_US.UTF-8"
//! }
//! ```
//!
//! Every section and field is optional; unset values fall back to what the
//! running process detects. Unknown nodes are reported in
//! [`EngineConfig::warnings`] and otherwise ignored.

pub mod error;
pub mod kdl_util;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use kdl::KdlDocument;
use quire_bundle::{CascadeOptions, ProcessDefaults};
use tracing::{debug, warn};

pub use error::{ConfigError, ConfigWarning, Result};

/// `editor { }` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorConfig {
	pub name: Option<String>,
	pub version: Option<String>,
	pub app_path: Option<PathBuf>,
	pub support_path: Option<PathBuf>,
}

/// `cascade { }` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeConfig {
	pub cache: Option<bool>,
}

/// Parsed configuration from a KDL file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
	pub editor: EditorConfig,
	pub cascade: CascadeConfig,
	/// Variables added to the process layer of every command environment.
	pub environment: IndexMap<String, String>,
	/// Non-fatal warnings encountered during parsing.
	pub warnings: Vec<ConfigWarning>,
}

const SECTIONS: &[&str] = &["editor", "cascade", "environment"];
const EDITOR_FIELDS: &[&str] = &["name", "version", "app-path", "support-path"];
const CASCADE_FIELDS: &[&str] = &["cache"];

impl EngineConfig {
	/// Parse a KDL string into an [`EngineConfig`].
	pub fn parse(input: &str) -> Result<Self> {
		let doc: KdlDocument = input.parse()?;
		let mut warnings = kdl_util::unknown_nodes(&doc, "top level", SECTIONS);

		let mut editor = EditorConfig::default();
		if let Some(block) = doc.get("editor").and_then(|node| node.children()) {
			editor.name = kdl_util::string_field(block, "editor", "name")?;
			editor.version = kdl_util::string_field(block, "editor", "version")?;
			editor.app_path = kdl_util::string_field(block, "editor", "app-path")?.map(PathBuf::from);
			editor.support_path =
				kdl_util::string_field(block, "editor", "support-path")?.map(PathBuf::from);
			warnings.extend(kdl_util::unknown_nodes(block, "editor", EDITOR_FIELDS));
		}

		let mut cascade = CascadeConfig::default();
		if let Some(block) = doc.get("cascade").and_then(|node| node.children()) {
			cascade.cache = kdl_util::bool_field(block, "cascade", "cache")?;
			warnings.extend(kdl_util::unknown_nodes(block, "cascade", CASCADE_FIELDS));
		}

		let environment = match doc.get("environment") {
			Some(node) => kdl_util::string_entries(node, "environment")?,
			None => IndexMap::new(),
		};

		for warning in &warnings {
			warn!(%warning, "config warning");
		}

		Ok(EngineConfig {
			editor,
			cascade,
			environment,
			warnings,
		})
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		let config = Self::parse(&content)?;
		debug!(path = %path.display(), vars = config.environment.len(), "loaded engine config");
		Ok(config)
	}

	/// Merge another config into this one.
	///
	/// Values set in `other` override values in `self`.
	pub fn merge(&mut self, other: EngineConfig) {
		let EditorConfig {
			name,
			version,
			app_path,
			support_path,
		} = other.editor;
		self.editor.name = name.or(self.editor.name.take());
		self.editor.version = version.or(self.editor.version.take());
		self.editor.app_path = app_path.or(self.editor.app_path.take());
		self.editor.support_path = support_path.or(self.editor.support_path.take());
		self.cascade.cache = other.cascade.cache.or(self.cascade.cache);
		self.environment.extend(other.environment);
		self.warnings.extend(other.warnings);
	}

	/// The process environment layer, starting from what the running process
	/// detects and overriding it with configured values.
	pub fn process_defaults(&self) -> ProcessDefaults {
		let mut defaults = ProcessDefaults::detect();
		if let Some(name) = &self.editor.name {
			defaults.app_name = name.clone();
		}
		if let Some(version) = &self.editor.version {
			defaults.app_version = version.clone();
		}
		if let Some(path) = &self.editor.app_path {
			defaults.app_path = Some(path.clone());
		}
		if let Some(path) = &self.editor.support_path {
			defaults.support_path = Some(path.clone());
		}
		defaults.variables.extend(self.environment.clone());
		defaults
	}

	pub fn cascade_options(&self) -> CascadeOptions {
		let mut options = CascadeOptions::default();
		if let Some(cache) = self.cascade.cache {
			options.cache = cache;
		}
		options
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	const FULL: &str = r#"
editor {
    name "quire"
    version "9.9.9"
    app-path "/opt/quire/bin/quire"
    support-path "/opt/quire/Support"
}
cascade {
    cache #false
}
environment {
    LANG "en_US.UTF-8"
    TM_ORGANIZATION_NAME "Acme"
}
"#;

	#[test]
	fn test_parse_all_sections() {
		let config = EngineConfig::parse(FULL).unwrap();
		assert_eq!(config.editor.name.as_deref(), Some("quire"));
		assert_eq!(config.editor.app_path, Some(PathBuf::from("/opt/quire/bin/quire")));
		assert_eq!(config.cascade.cache, Some(false));
		assert_eq!(config.environment.get("LANG").map(String::as_str), Some("en_US.UTF-8"));
		assert!(config.warnings.is_empty());
		assert!(!config.cascade_options().cache);
	}

	#[test]
	fn test_empty_config_uses_defaults() {
		let config = EngineConfig::parse("").unwrap();
		assert_eq!(config, EngineConfig::default());
		assert_eq!(config.cascade_options(), CascadeOptions::default());
		assert_eq!(config.process_defaults().app_name, ProcessDefaults::default().app_name);
	}

	#[test]
	fn test_process_defaults_apply_overrides() {
		let defaults = EngineConfig::parse(FULL).unwrap().process_defaults();
		assert_eq!(defaults.app_name, "quire");
		assert_eq!(defaults.app_version, "9.9.9");
		assert_eq!(defaults.support_path, Some(PathBuf::from("/opt/quire/Support")));
		assert_eq!(
			defaults.variables.get("TM_ORGANIZATION_NAME").map(String::as_str),
			Some("Acme")
		);
	}

	#[test]
	fn test_unknown_nodes_warn() {
		let config = EngineConfig::parse("theme \"dark\"\neditor { colour \"red\" }").unwrap();
		let found: Vec<_> = config.warnings.iter().map(ToString::to_string).collect();
		assert_eq!(
			found,
			[
				"unknown node 'theme' in top level will be ignored",
				"unknown node 'colour' in editor will be ignored",
			]
		);
	}

	#[test]
	fn test_invalid_values_error() {
		assert!(matches!(
			EngineConfig::parse("cascade { cache \"yes\" }"),
			Err(ConfigError::InvalidValue { field, .. }) if field == "cascade.cache"
		));
		assert!(matches!(
			EngineConfig::parse("environment { LANG 1 }"),
			Err(ConfigError::InvalidValue { field, .. }) if field == "environment.LANG"
		));
		assert!(matches!(EngineConfig::parse("editor {"), Err(ConfigError::Kdl(_))));
	}

	#[test]
	fn test_merge_overrides_set_values() {
		let mut base = EngineConfig::parse(FULL).unwrap();
		let user = EngineConfig::parse(
			"editor { version \"1.0.0\" }\nenvironment { LANG \"C\"; EXTRA \"1\" }",
		)
		.unwrap();
		base.merge(user);

		assert_eq!(base.editor.name.as_deref(), Some("quire"));
		assert_eq!(base.editor.version.as_deref(), Some("1.0.0"));
		assert_eq!(base.cascade.cache, Some(false));
		let vars: Vec<_> = base.environment.keys().map(String::as_str).collect();
		assert_eq!(vars, ["LANG", "TM_ORGANIZATION_NAME", "EXTRA"]);
		assert_eq!(base.environment["LANG"], "C");
	}
}
