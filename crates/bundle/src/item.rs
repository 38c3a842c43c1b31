//! Bundle items: commands and snippets offered in scope menus.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BundleError, Result};

/// Whether an item may be offered with or without an active selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionRequirement {
	#[default]
	Any,
	/// Only offered while text is selected.
	Required,
	/// Only offered while nothing is selected.
	Forbidden,
}

impl SelectionRequirement {
	pub fn admits(self, has_selection: bool) -> bool {
		match self {
			SelectionRequirement::Any => true,
			SelectionRequirement::Required => has_selection,
			SelectionRequirement::Forbidden => !has_selection,
		}
	}
}

/// What an item does when invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
	/// A shell command run with the composed environment.
	Command {
		command: String,
		/// Text handed to the command on stdin (`selection`, `document`, `line`, ...).
		input: Option<String>,
		fallback_input: Option<String>,
		output: Option<String>,
	},
	/// Text inserted at the caret.
	Snippet { content: String },
}

/// A command or snippet declared by a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleItem {
	pub uuid: String,
	pub name: String,
	/// Scope selector limiting where the item is offered; `None` means everywhere.
	pub scope: Option<String>,
	pub key_equivalent: Option<String>,
	pub tab_trigger: Option<String>,
	pub selection: SelectionRequirement,
	pub kind: ItemKind,
}

impl BundleItem {
	pub fn new(uuid: impl Into<String>, name: impl Into<String>, kind: ItemKind) -> Self {
		Self {
			uuid: uuid.into(),
			name: name.into(),
			scope: None,
			key_equivalent: None,
			tab_trigger: None,
			selection: SelectionRequirement::Any,
			kind,
		}
	}

	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());
		self
	}

	pub fn with_selection(mut self, selection: SelectionRequirement) -> Self {
		self.selection = selection;
		self
	}

	pub fn with_key_equivalent(mut self, key: impl Into<String>) -> Self {
		self.key_equivalent = Some(key.into());
		self
	}

	pub fn with_tab_trigger(mut self, trigger: impl Into<String>) -> Self {
		self.tab_trigger = Some(trigger.into());
		self
	}

	pub fn is_command(&self) -> bool {
		matches!(self.kind, ItemKind::Command { .. })
	}

	/// Builds an item from a parsed command or snippet dictionary.
	///
	/// Without an explicit `selection` key, a command whose `input` is
	/// `selection` and that has no `fallbackInput` requires a selection.
	pub fn from_json(value: &Value) -> Result<Self> {
		let raw = RawItem::deserialize(value)?;

		let kind = match (raw.command, raw.content) {
			(Some(command), _) => ItemKind::Command {
				command,
				input: raw.input,
				fallback_input: raw.fallback_input,
				output: raw.output,
			},
			(None, Some(content)) => ItemKind::Snippet { content },
			(None, None) => return Err(BundleError::MissingField("command or content")),
		};

		let selection = raw.selection.unwrap_or_else(|| match &kind {
			ItemKind::Command {
				input: Some(input),
				fallback_input: None,
				..
			} if input == "selection" => SelectionRequirement::Required,
			_ => SelectionRequirement::Any,
		});

		Ok(Self {
			uuid: raw.uuid,
			name: raw.name,
			scope: raw.scope.filter(|s| !s.trim().is_empty()),
			key_equivalent: raw.key_equivalent,
			tab_trigger: raw.tab_trigger,
			selection,
			kind,
		})
	}
}

/// On-disk shape of a command or snippet dictionary.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
	uuid: String,
	name: String,
	scope: Option<String>,
	key_equivalent: Option<String>,
	tab_trigger: Option<String>,
	selection: Option<SelectionRequirement>,
	command: Option<String>,
	content: Option<String>,
	input: Option<String>,
	fallback_input: Option<String>,
	output: Option<String>,
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn test_selection_requirement_admits() {
		assert!(SelectionRequirement::Any.admits(true));
		assert!(SelectionRequirement::Any.admits(false));
		assert!(SelectionRequirement::Required.admits(true));
		assert!(!SelectionRequirement::Required.admits(false));
		assert!(!SelectionRequirement::Forbidden.admits(true));
		assert!(SelectionRequirement::Forbidden.admits(false));
	}

	#[test]
	fn test_command_from_json_infers_selection_requirement() {
		let item = BundleItem::from_json(&json!({
			"uuid": "A1",
			"name": "Sort Lines",
			"scope": "source",
			"input": "selection",
			"output": "replaceSelectedText",
			"command": "sort",
			"keyEquivalent": "^S"
		}))
		.unwrap();
		assert!(item.is_command());
		assert_eq!(item.selection, SelectionRequirement::Required);
		assert_eq!(item.key_equivalent.as_deref(), Some("^S"));

		let item = BundleItem::from_json(&json!({
			"uuid": "A2",
			"name": "Sort Lines",
			"input": "selection",
			"fallbackInput": "document",
			"command": "sort"
		}))
		.unwrap();
		assert_eq!(item.selection, SelectionRequirement::Any);
	}

	#[test]
	fn test_explicit_selection_and_snippets() {
		let item = BundleItem::from_json(&json!({
			"uuid": "B1",
			"name": "def",
			"scope": " ",
			"tabTrigger": "def",
			"content": "def ${1:name}():\n\t$0",
			"selection": "forbidden"
		}))
		.unwrap();
		assert!(!item.is_command());
		assert_eq!(item.scope, None);
		assert_eq!(item.selection, SelectionRequirement::Forbidden);
		assert_eq!(item.tab_trigger.as_deref(), Some("def"));
	}

	#[test]
	fn test_from_json_requires_body() {
		let err = BundleItem::from_json(&json!({ "uuid": "C1", "name": "Nothing" })).unwrap_err();
		assert!(matches!(err, BundleError::MissingField(_)));
		assert!(BundleItem::from_json(&json!({ "name": "No uuid", "command": "true" })).is_err());
	}
}
