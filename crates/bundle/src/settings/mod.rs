//! Typed preference settings.
//!
//! Bundle preferences are free-form dictionaries. The keys the editor
//! understands are modelled as [`Setting`] variants with typed payloads; all
//! other keys are kept verbatim as [`Setting::Custom`]. Each setting has a
//! [`MergePolicy`]: most settings are replaced by a higher-priority record,
//! while shell variables and the command list are merged entry by entry.

use std::collections::BTreeMap;
use std::sync::Arc;

use bitflags::bitflags;
use indexmap::IndexMap;
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::color::Color;
use crate::item::BundleItem;

mod normalize;
#[cfg(test)]
mod tests;

/// Color-valued settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum ColorRole {
	Foreground,
	Background,
	Caret,
	Selection,
	Invisibles,
	LineHighlight,
}

/// Indentation rule patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, IntoStaticStr, EnumIter)]
pub enum IndentRule {
	#[strum(serialize = "increaseIndentPattern")]
	Increase,
	#[strum(serialize = "decreaseIndentPattern")]
	Decrease,
	#[strum(serialize = "indentNextLinePattern")]
	IndentNextLine,
	#[strum(serialize = "unIndentedLinePattern")]
	UnIndentedLine,
}

/// Boolean settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum Flag {
	ShowInSymbolList,
	SpellChecking,
	DisableIndentCorrections,
}

bitflags! {
	/// Font style modifiers from the `fontStyle` setting.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct FontStyle: u8 {
		const BOLD = 1 << 0;
		const ITALIC = 1 << 1;
		const UNDERLINE = 1 << 2;
	}
}

impl FontStyle {
	/// Parses a space-separated list such as `"bold italic"`.
	///
	/// Unknown words are ignored so an odd theme never blocks rendering.
	pub fn parse(value: &str) -> Self {
		value
			.split_whitespace()
			.fold(FontStyle::empty(), |style, word| match word.to_ascii_lowercase().as_str() {
				"bold" => style | FontStyle::BOLD,
				"italic" => style | FontStyle::ITALIC,
				"underline" | "underlined" => style | FontStyle::UNDERLINE,
				other => {
					tracing::trace!(word = other, "ignoring unknown font style");
					style
				}
			})
	}
}

/// A compiled indentation pattern. Equality compares the source text.
#[derive(Debug, Clone)]
pub struct Pattern {
	source: Box<str>,
	regex: Arc<fancy_regex::Regex>,
}

impl Pattern {
	pub fn new(source: &str) -> Result<Self, fancy_regex::Error> {
		Ok(Self {
			source: source.into(),
			regex: Arc::new(fancy_regex::Regex::new(source)?),
		})
	}

	pub fn as_str(&self) -> &str {
		&self.source
	}

	/// Returns `true` if the pattern matches somewhere in `line`.
	///
	/// Backtracking limit failures count as no match.
	pub fn is_match(&self, line: &str) -> bool {
		self.regex.is_match(line).unwrap_or(false)
	}
}

impl PartialEq for Pattern {
	fn eq(&self, other: &Self) -> bool {
		self.source == other.source
	}
}

impl Eq for Pattern {}

/// An opening/closing pair such as `(` / `)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
	pub open: String,
	pub close: String,
}

impl Pair {
	pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
		Self {
			open: open.into(),
			close: close.into(),
		}
	}
}

/// One entry of the scope command list.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandEntry {
	/// Offer this item at the scope.
	Include(Arc<BundleItem>),
	/// Hide an item contributed by a broader scope.
	Exclude,
}

/// How a later setting combines with an earlier one under the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
	/// The later value replaces the earlier one.
	Override,
	/// Entries are unioned; the later value wins per entry.
	Additive,
}

/// Key of a setting within a fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKey {
	Color(ColorRole),
	FontStyle,
	IndentPattern(IndentRule),
	Flag(Flag),
	SymbolTransformation,
	SmartTypingPairs,
	HighlightPairs,
	ShellVariables,
	Commands,
	Custom(Box<str>),
}

impl SettingKey {
	/// Maps a bundle dictionary key to a setting key.
	pub fn from_name(name: &str) -> Self {
		if let Ok(role) = name.parse() {
			return SettingKey::Color(role);
		}
		if let Ok(rule) = name.parse() {
			return SettingKey::IndentPattern(rule);
		}
		if let Ok(flag) = name.parse() {
			return SettingKey::Flag(flag);
		}
		match name {
			"fontStyle" => SettingKey::FontStyle,
			"symbolTransformation" => SettingKey::SymbolTransformation,
			"smartTypingPairs" => SettingKey::SmartTypingPairs,
			"highlightPairs" => SettingKey::HighlightPairs,
			"shellVariables" => SettingKey::ShellVariables,
			"commands" => SettingKey::Commands,
			other => SettingKey::Custom(other.into()),
		}
	}

	/// The bundle dictionary key for this setting.
	pub fn name(&self) -> &str {
		match self {
			SettingKey::Color(role) => role.into(),
			SettingKey::IndentPattern(rule) => rule.into(),
			SettingKey::Flag(flag) => flag.into(),
			SettingKey::FontStyle => "fontStyle",
			SettingKey::SymbolTransformation => "symbolTransformation",
			SettingKey::SmartTypingPairs => "smartTypingPairs",
			SettingKey::HighlightPairs => "highlightPairs",
			SettingKey::ShellVariables => "shellVariables",
			SettingKey::Commands => "commands",
			SettingKey::Custom(name) => name,
		}
	}

	pub fn merge_policy(&self) -> MergePolicy {
		match self {
			SettingKey::ShellVariables | SettingKey::Commands => MergePolicy::Additive,
			_ => MergePolicy::Override,
		}
	}
}

/// A typed setting value. Each variant determines its own [`SettingKey`].
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
	Color(ColorRole, Color),
	FontStyle(FontStyle),
	IndentPattern(IndentRule, Pattern),
	Flag(Flag, bool),
	SymbolTransformation(String),
	SmartTypingPairs(Vec<Pair>),
	HighlightPairs(Vec<Pair>),
	ShellVariables(IndexMap<String, String>),
	Commands(IndexMap<String, CommandEntry>),
	Custom(Box<str>, serde_json::Value),
}

impl Setting {
	pub fn key(&self) -> SettingKey {
		match self {
			Setting::Color(role, _) => SettingKey::Color(*role),
			Setting::FontStyle(_) => SettingKey::FontStyle,
			Setting::IndentPattern(rule, _) => SettingKey::IndentPattern(*rule),
			Setting::Flag(flag, _) => SettingKey::Flag(*flag),
			Setting::SymbolTransformation(_) => SettingKey::SymbolTransformation,
			Setting::SmartTypingPairs(_) => SettingKey::SmartTypingPairs,
			Setting::HighlightPairs(_) => SettingKey::HighlightPairs,
			Setting::ShellVariables(_) => SettingKey::ShellVariables,
			Setting::Commands(_) => SettingKey::Commands,
			Setting::Custom(name, _) => SettingKey::Custom(name.clone()),
		}
	}

	/// Combines `later` into `self` according to the key's merge policy.
	///
	/// Both settings must have the same key.
	fn merge(&mut self, later: Setting) {
		match (self, later) {
			(Setting::ShellVariables(acc), Setting::ShellVariables(more)) => acc.extend(more),
			(Setting::Commands(acc), Setting::Commands(more)) => acc.extend(more),
			(slot, later) => *slot = later,
		}
	}
}

/// Merges `setting` into `map` under its key.
fn merge_into(map: &mut BTreeMap<SettingKey, Setting>, setting: Setting) {
	match map.entry(setting.key()) {
		std::collections::btree_map::Entry::Occupied(mut slot) => slot.get_mut().merge(setting),
		std::collections::btree_map::Entry::Vacant(slot) => {
			slot.insert(setting);
		}
	}
}

/// The settings contributed by one preference or command record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsFragment {
	settings: BTreeMap<SettingKey, Setting>,
}

impl SettingsFragment {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a setting, merging with one already present under the same key.
	pub fn insert(&mut self, setting: Setting) {
		merge_into(&mut self.settings, setting);
	}

	pub fn with(mut self, setting: Setting) -> Self {
		self.insert(setting);
		self
	}

	pub fn get(&self, key: &SettingKey) -> Option<&Setting> {
		self.settings.get(key)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Setting> {
		self.settings.values()
	}

	pub fn len(&self) -> usize {
		self.settings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.settings.is_empty()
	}
}

impl FromIterator<Setting> for SettingsFragment {
	fn from_iter<I: IntoIterator<Item = Setting>>(iter: I) -> Self {
		let mut fragment = Self::new();
		for setting in iter {
			fragment.insert(setting);
		}
		fragment
	}
}

/// The merged result of every record matching a scope path.
///
/// An empty value means "use built-in defaults".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectiveSettings {
	settings: BTreeMap<SettingKey, Setting>,
}

impl EffectiveSettings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Folds a higher-priority fragment over the accumulated settings.
	pub fn apply(&mut self, fragment: &SettingsFragment) {
		for setting in fragment.iter() {
			merge_into(&mut self.settings, setting.clone());
		}
	}

	pub fn get(&self, key: &SettingKey) -> Option<&Setting> {
		self.settings.get(key)
	}

	pub fn color(&self, role: ColorRole) -> Option<Color> {
		match self.get(&SettingKey::Color(role)) {
			Some(Setting::Color(_, color)) => Some(*color),
			_ => None,
		}
	}

	pub fn font_style(&self) -> Option<FontStyle> {
		match self.get(&SettingKey::FontStyle) {
			Some(Setting::FontStyle(style)) => Some(*style),
			_ => None,
		}
	}

	pub fn indent_pattern(&self, rule: IndentRule) -> Option<&Pattern> {
		match self.get(&SettingKey::IndentPattern(rule)) {
			Some(Setting::IndentPattern(_, pattern)) => Some(pattern),
			_ => None,
		}
	}

	pub fn flag(&self, flag: Flag) -> Option<bool> {
		match self.get(&SettingKey::Flag(flag)) {
			Some(Setting::Flag(_, value)) => Some(*value),
			_ => None,
		}
	}

	pub fn symbol_transformation(&self) -> Option<&str> {
		match self.get(&SettingKey::SymbolTransformation) {
			Some(Setting::SymbolTransformation(value)) => Some(value),
			_ => None,
		}
	}

	pub fn smart_typing_pairs(&self) -> &[Pair] {
		match self.get(&SettingKey::SmartTypingPairs) {
			Some(Setting::SmartTypingPairs(pairs)) => pairs,
			_ => &[],
		}
	}

	pub fn highlight_pairs(&self) -> &[Pair] {
		match self.get(&SettingKey::HighlightPairs) {
			Some(Setting::HighlightPairs(pairs)) => pairs,
			_ => &[],
		}
	}

	/// Merged shell variables, in first-declaration order.
	pub fn shell_variables(&self) -> Option<&IndexMap<String, String>> {
		match self.get(&SettingKey::ShellVariables) {
			Some(Setting::ShellVariables(vars)) => Some(vars),
			_ => None,
		}
	}

	/// Items offered at the scope, with excluded entries removed.
	pub fn commands(&self) -> Vec<Arc<BundleItem>> {
		match self.get(&SettingKey::Commands) {
			Some(Setting::Commands(entries)) => entries
				.values()
				.filter_map(|entry| match entry {
					CommandEntry::Include(item) => Some(item.clone()),
					CommandEntry::Exclude => None,
				})
				.collect(),
			_ => Vec::new(),
		}
	}

	pub fn custom(&self, name: &str) -> Option<&serde_json::Value> {
		match self.get(&SettingKey::Custom(name.into())) {
			Some(Setting::Custom(_, value)) => Some(value),
			_ => None,
		}
	}

	/// Keeps only the settings whose keys are listed.
	pub fn select(&self, keys: &[SettingKey]) -> EffectiveSettings {
		EffectiveSettings {
			settings: keys
				.iter()
				.filter_map(|key| Some((key.clone(), self.settings.get(key)?.clone())))
				.collect(),
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = &Setting> {
		self.settings.values()
	}

	pub fn len(&self) -> usize {
		self.settings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.settings.is_empty()
	}
}
