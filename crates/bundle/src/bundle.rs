//! Loaded bundle metadata.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::item::BundleItem;
use crate::settings::SettingsFragment;

/// Name of the directory holding a bundle's support files.
const SUPPORT_DIR: &str = "Support";

/// A language grammar declared by a bundle. Only its identity is kept here;
/// tokenization lives elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
	pub name: String,
	/// Root scope assigned by the grammar, e.g. `source.python`.
	pub scope_name: String,
	#[serde(default)]
	pub file_types: Vec<String>,
}

/// A scoped settings dictionary declared by a bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct Preference {
	pub uuid: Option<String>,
	pub name: Option<String>,
	/// Scope selector; `None` applies everywhere.
	pub scope: Option<String>,
	pub settings: SettingsFragment,
}

impl Preference {
	pub fn new(scope: impl Into<String>, settings: SettingsFragment) -> Self {
		Self {
			uuid: None,
			name: None,
			scope: Some(scope.into()),
			settings,
		}
	}

	/// Builds a preference from a parsed `{name, scope, settings, uuid}` dictionary.
	pub fn from_json(value: &Value) -> Result<Self> {
		let raw = RawPreference::deserialize(value)?;
		Ok(Self {
			uuid: raw.uuid,
			name: raw.name,
			scope: raw.scope.filter(|s| !s.trim().is_empty()),
			settings: SettingsFragment::from_json(&raw.settings),
		})
	}
}

#[derive(Deserialize)]
struct RawPreference {
	uuid: Option<String>,
	name: Option<String>,
	scope: Option<String>,
	#[serde(default)]
	settings: Value,
}

/// A bundle package: languages, preferences, commands and snippets sharing an
/// identifier and a support directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
	uuid: String,
	name: String,
	path: PathBuf,
	/// Bundle-level variables exported to every command of the bundle.
	variables: IndexMap<String, String>,
	languages: Vec<Language>,
	preferences: Vec<Preference>,
	items: Vec<Arc<BundleItem>>,
}

impl Bundle {
	pub fn new(uuid: impl Into<String>, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
		Self {
			uuid: uuid.into(),
			name: name.into(),
			path: path.into(),
			variables: IndexMap::new(),
			languages: Vec::new(),
			preferences: Vec::new(),
			items: Vec::new(),
		}
	}

	pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.variables.insert(name.into(), value.into());
		self
	}

	pub fn with_language(mut self, language: Language) -> Self {
		self.languages.push(language);
		self
	}

	pub fn with_preference(mut self, preference: Preference) -> Self {
		self.preferences.push(preference);
		self
	}

	pub fn with_item(mut self, item: BundleItem) -> Self {
		self.items.push(Arc::new(item));
		self
	}

	pub fn uuid(&self) -> &str {
		&self.uuid
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// `<bundle>/Support`, exported as `TM_BUNDLE_SUPPORT`.
	pub fn support_path(&self) -> PathBuf {
		self.path.join(SUPPORT_DIR)
	}

	pub fn variables(&self) -> &IndexMap<String, String> {
		&self.variables
	}

	pub fn languages(&self) -> &[Language] {
		&self.languages
	}

	pub fn preferences(&self) -> &[Preference] {
		&self.preferences
	}

	pub fn items(&self) -> &[Arc<BundleItem>] {
		&self.items
	}

	pub fn item(&self, uuid: &str) -> Option<&Arc<BundleItem>> {
		self.items.iter().find(|item| item.uuid == uuid)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::settings::{Flag, Setting, SettingKey};

	#[test]
	fn test_preference_from_json() {
		let pref = Preference::from_json(&json!({
			"name": "Symbol List",
			"scope": "source.python entity.name.function",
			"settings": { "showInSymbolList": 1 },
			"uuid": "F1"
		}))
		.unwrap();
		assert_eq!(pref.scope.as_deref(), Some("source.python entity.name.function"));
		assert_eq!(
			pref.settings.get(&SettingKey::Flag(Flag::ShowInSymbolList)),
			Some(&Setting::Flag(Flag::ShowInSymbolList, true))
		);
	}

	#[test]
	fn test_preference_without_scope_applies_everywhere() {
		let pref = Preference::from_json(&json!({ "scope": "", "settings": {} })).unwrap();
		assert_eq!(pref.scope, None);
		assert!(pref.settings.is_empty());
	}

	#[test]
	fn test_support_path_and_language() {
		let language: Language = serde_json::from_value(json!({
			"name": "Python",
			"scopeName": "source.python",
			"fileTypes": ["py", "pyw"]
		}))
		.unwrap();
		let bundle = Bundle::new("B", "Python", "/bundles/Python.tmbundle").with_language(language);
		assert_eq!(bundle.support_path(), PathBuf::from("/bundles/Python.tmbundle/Support"));
		assert_eq!(bundle.languages()[0].file_types, ["py", "pyw"]);
	}
}
