//! Environment variables for bundle commands.
//!
//! [`EnvironmentComposer::compose`] layers, each overriding the previous:
//!
//! 1. process defaults ([`ProcessDefaults`]);
//! 2. the bundle's globals and declared variables;
//! 3. shell variables resolved for the caret scope, passed in by the caller;
//! 4. window context (working directory, project root);
//! 5. text view context (caret, selection, scope, file, tab settings).
//!
//! Optional context that is absent produces no variable at all rather than an
//! empty value.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use quire_scope::ScopePath;
use serde::Serialize;

use crate::bundle::Bundle;

mod defaults;

pub use defaults::ProcessDefaults;

/// A composed variable mapping, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Environment {
	vars: BTreeMap<String, String>,
}

impl Environment {
	pub fn get(&self, name: &str) -> Option<&str> {
		self.vars.get(name).map(String::as_str)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.vars.contains_key(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn len(&self) -> usize {
		self.vars.len()
	}

	pub fn is_empty(&self) -> bool {
		self.vars.is_empty()
	}

	pub fn into_inner(self) -> BTreeMap<String, String> {
		self.vars
	}

	fn set(&mut self, name: &str, value: impl Into<String>) {
		self.vars.insert(name.to_string(), value.into());
	}

	fn set_opt(&mut self, name: &str, value: Option<impl Into<String>>) {
		if let Some(value) = value {
			self.set(name, value);
		}
	}

	fn set_path(&mut self, name: &str, path: Option<&Path>) {
		self.set_opt(name, path.map(|p| p.to_string_lossy().into_owned()));
	}

	fn extend(&mut self, vars: &IndexMap<String, String>) {
		self.vars
			.extend(vars.iter().map(|(k, v)| (k.clone(), v.clone())));
	}
}

impl IntoIterator for Environment {
	type Item = (String, String);
	type IntoIter = std::collections::btree_map::IntoIter<String, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.vars.into_iter()
	}
}

/// Window-level context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowInfo {
	pub working_directory: Option<PathBuf>,
	pub project_root: Option<PathBuf>,
}

/// A 0-based line/column position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
	pub line: usize,
	pub column: usize,
}

impl Position {
	pub fn new(line: usize, column: usize) -> Self {
		Self { line, column }
	}
}

/// Context of the text view a command was invoked from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextViewInfo {
	pub caret: Position,
	/// Start of the text handed to the command, when it is not the caret.
	pub input_start: Option<Position>,
	/// Selected text, verbatim.
	pub selected_text: Option<String>,
	pub current_line: Option<String>,
	pub current_word: Option<String>,
	pub scope: Option<ScopePath>,
	pub file_path: Option<PathBuf>,
	pub soft_tabs: bool,
	pub tab_size: usize,
}

impl Default for TextViewInfo {
	fn default() -> Self {
		Self {
			caret: Position::default(),
			input_start: None,
			selected_text: None,
			current_line: None,
			current_word: None,
			scope: None,
			file_path: None,
			soft_tabs: false,
			tab_size: 8,
		}
	}
}

/// Everything a command invocation knows about where it was invoked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentContext {
	/// Overrides the bundle's own `Support` directory.
	pub bundle_support_path: Option<PathBuf>,
	/// Shell variables resolved for the caret scope.
	pub shell_variables: IndexMap<String, String>,
	pub window: WindowInfo,
	/// `None` for commands run without a text view.
	pub text: Option<TextViewInfo>,
}

/// Builds command environments on top of a fixed process layer.
#[derive(Debug, Clone)]
pub struct EnvironmentComposer {
	defaults: Arc<ProcessDefaults>,
}

impl Default for EnvironmentComposer {
	fn default() -> Self {
		Self::new(ProcessDefaults::global())
	}
}

impl EnvironmentComposer {
	pub fn new(defaults: Arc<ProcessDefaults>) -> Self {
		Self { defaults }
	}

	pub fn defaults(&self) -> &ProcessDefaults {
		&self.defaults
	}

	/// Global variables for `bundle`: the process and bundle layers only.
	pub fn bundle_environment(&self, bundle: &Bundle) -> Environment {
		let mut env = Environment::default();
		self.defaults.apply(&mut env);
		apply_bundle(&mut env, bundle, None);
		env
	}

	/// The full environment for running one of `bundle`'s commands.
	pub fn compose(&self, bundle: &Bundle, context: &EnvironmentContext) -> Environment {
		let mut env = Environment::default();
		self.defaults.apply(&mut env);
		apply_bundle(&mut env, bundle, context.bundle_support_path.as_deref());
		env.extend(&context.shell_variables);
		apply_window(&mut env, &context.window);
		if let Some(text) = &context.text {
			apply_text_view(&mut env, text);
		}
		tracing::trace!(bundle = bundle.uuid(), vars = env.len(), "composed command environment");
		env
	}
}

fn apply_bundle(env: &mut Environment, bundle: &Bundle, support_override: Option<&Path>) {
	env.set_path("TM_BUNDLE_PATH", Some(bundle.path()));
	let support = support_override.map_or_else(|| bundle.support_path(), Path::to_path_buf);
	env.set_path("TM_BUNDLE_SUPPORT", Some(support.as_path()));
	env.set("TM_BUNDLE_UUID", bundle.uuid());
	env.set("TM_BUNDLE_NAME", bundle.name());
	env.extend(bundle.variables());
}

fn apply_window(env: &mut Environment, window: &WindowInfo) {
	env.set_path("PWD", window.working_directory.as_deref());
	env.set_path("TM_PROJECT_DIRECTORY", window.project_root.as_deref());
}

fn apply_text_view(env: &mut Environment, text: &TextViewInfo) {
	env.set("TM_LINE_NUMBER", (text.caret.line + 1).to_string());
	env.set("TM_LINE_INDEX", text.caret.column.to_string());
	env.set("TM_COLUMN_NUMBER", (text.caret.column + 1).to_string());

	if let Some(start) = text.input_start {
		env.set("TM_INPUT_START_LINE", (start.line + 1).to_string());
		env.set("TM_INPUT_START_LINE_INDEX", start.column.to_string());
		env.set("TM_INPUT_START_COLUMN", (start.column + 1).to_string());
	}

	// An empty selection is no selection.
	env.set_opt(
		"TM_SELECTED_TEXT",
		text.selected_text.as_deref().filter(|s| !s.is_empty()),
	);
	env.set_opt("TM_CURRENT_LINE", text.current_line.as_deref());
	env.set_opt("TM_CURRENT_WORD", text.current_word.as_deref());
	env.set_opt("TM_SCOPE", text.scope.as_ref().map(ScopePath::to_string));

	if let Some(file) = &text.file_path {
		env.set_path("TM_FILEPATH", Some(file));
		env.set_opt(
			"TM_FILENAME",
			file.file_name().map(|name| name.to_string_lossy().into_owned()),
		);
		env.set_path("TM_DIRECTORY", file.parent().filter(|p| !p.as_os_str().is_empty()));
	}

	env.set("TM_SOFT_TABS", if text.soft_tabs { "YES" } else { "NO" });
	env.set("TM_TAB_SIZE", text.tab_size.to_string());
}
