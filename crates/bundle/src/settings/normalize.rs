//! Conversion of raw bundle preference dictionaries into typed settings.
//!
//! Bad values never fail the whole fragment: malformed colors become
//! [`Color::TRANSPARENT`], everything else that cannot be understood is
//! dropped with a warning.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

use super::{CommandEntry, FontStyle, Pair, Pattern, Setting, SettingKey, SettingsFragment};
use crate::color::Color;

impl SettingsFragment {
	/// Normalizes a `settings` dictionary from a bundle preference.
	pub fn from_json(value: &Value) -> Self {
		let Some(object) = value.as_object() else {
			warn!(kind = json_kind(value), "preference settings are not a dictionary");
			return Self::new();
		};

		object
			.iter()
			.filter_map(|(name, value)| normalize(SettingKey::from_name(name), value))
			.collect()
	}
}

fn normalize(key: SettingKey, value: &Value) -> Option<Setting> {
	let setting = match &key {
		SettingKey::Color(role) => value.as_str().map(|hex| Setting::Color(*role, Color::from_hex(hex))),
		SettingKey::FontStyle => value.as_str().map(|s| Setting::FontStyle(FontStyle::parse(s))),
		SettingKey::IndentPattern(rule) => match value.as_str().map(Pattern::new) {
			Some(Ok(pattern)) => Some(Setting::IndentPattern(*rule, pattern)),
			Some(Err(error)) => {
				warn!(setting = key.name(), %error, "dropping invalid indentation pattern");
				return None;
			}
			None => None,
		},
		SettingKey::Flag(flag) => as_flag(value).map(|v| Setting::Flag(*flag, v)),
		SettingKey::SymbolTransformation => value
			.as_str()
			.map(|s| Setting::SymbolTransformation(s.to_string())),
		SettingKey::SmartTypingPairs => as_pairs(value).map(Setting::SmartTypingPairs),
		SettingKey::HighlightPairs => as_pairs(value).map(Setting::HighlightPairs),
		SettingKey::ShellVariables => as_variables(value).map(Setting::ShellVariables),
		SettingKey::Commands => as_command_exclusions(value).map(Setting::Commands),
		SettingKey::Custom(name) => Some(Setting::Custom(name.clone(), value.clone())),
	};

	if setting.is_none() {
		warn!(setting = key.name(), kind = json_kind(value), "dropping setting with unexpected value");
	}
	setting
}

/// Accepts JSON booleans as well as the integer and string forms found in
/// property lists.
fn as_flag(value: &Value) -> Option<bool> {
	match value {
		Value::Bool(b) => Some(*b),
		Value::Number(n) => n.as_i64().map(|n| n != 0),
		Value::String(s) => match s.to_ascii_lowercase().as_str() {
			"1" | "true" | "yes" => Some(true),
			"0" | "false" | "no" => Some(false),
			_ => None,
		},
		_ => None,
	}
}

/// `[["(", ")"], ["[", "]"]]`
fn as_pairs(value: &Value) -> Option<Vec<Pair>> {
	value
		.as_array()?
		.iter()
		.map(|pair| match pair.as_array()?.as_slice() {
			[open, close] => Some(Pair::new(open.as_str()?, close.as_str()?)),
			_ => None,
		})
		.collect()
}

/// Either the property-list form `[{"name": .., "value": ..}]` or a plain
/// `{"NAME": "value"}` dictionary.
fn as_variables(value: &Value) -> Option<IndexMap<String, String>> {
	match value {
		Value::Array(entries) => entries
			.iter()
			.map(|entry| {
				let name = entry.get("name")?.as_str()?;
				let value = as_text(entry.get("value")?)?;
				Some((name.to_string(), value))
			})
			.collect(),
		Value::Object(map) => map
			.iter()
			.map(|(name, value)| Some((name.clone(), as_text(value)?)))
			.collect(),
		_ => None,
	}
}

/// `{"<item uuid>": false}` hides an item from the command list.
///
/// Entries with any other value are dropped one by one.
fn as_command_exclusions(value: &Value) -> Option<IndexMap<String, CommandEntry>> {
	let entries = value
		.as_object()?
		.iter()
		.filter_map(|(uuid, enabled)| match enabled {
			Value::Bool(false) => Some((uuid.clone(), CommandEntry::Exclude)),
			other => {
				warn!(item = %uuid, kind = json_kind(other), "ignoring command list entry");
				None
			}
		})
		.collect();
	Some(entries)
}

fn as_text(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "dictionary",
	}
}
