use pretty_assertions::assert_eq;
use serde_json::json;
use strum::IntoEnumIterator;

use super::*;
use crate::item::{BundleItem, ItemKind};

fn item(uuid: &str) -> Arc<BundleItem> {
	Arc::new(BundleItem::new(uuid, uuid, ItemKind::Snippet { content: String::new() }))
}

#[test]
fn test_setting_key_names_round_trip() {
	let keys = ColorRole::iter()
		.map(SettingKey::Color)
		.chain(IndentRule::iter().map(SettingKey::IndentPattern))
		.chain(Flag::iter().map(SettingKey::Flag))
		.chain([
			SettingKey::FontStyle,
			SettingKey::SymbolTransformation,
			SettingKey::SmartTypingPairs,
			SettingKey::HighlightPairs,
			SettingKey::ShellVariables,
			SettingKey::Commands,
			SettingKey::Custom("tabSize".into()),
		]);
	for key in keys {
		assert_eq!(SettingKey::from_name(key.name()), key);
	}
	assert_eq!(SettingKey::Color(ColorRole::LineHighlight).name(), "lineHighlight");
	assert_eq!(SettingKey::IndentPattern(IndentRule::UnIndentedLine).name(), "unIndentedLinePattern");
}

#[test]
fn test_only_shell_variables_and_commands_are_additive() {
	assert_eq!(SettingKey::ShellVariables.merge_policy(), MergePolicy::Additive);
	assert_eq!(SettingKey::Commands.merge_policy(), MergePolicy::Additive);
	assert_eq!(SettingKey::FontStyle.merge_policy(), MergePolicy::Override);
	assert_eq!(SettingKey::Custom("x".into()).merge_policy(), MergePolicy::Override);
}

#[test]
fn test_apply_overrides_and_unions() {
	let broad = SettingsFragment::new()
		.with(Setting::Color(ColorRole::Foreground, Color::WHITE))
		.with(Setting::ShellVariables(IndexMap::from([
			("TM_COMMENT_START".to_string(), "# ".to_string()),
			("TM_LINT".to_string(), "pyflakes".to_string()),
		])))
		.with(Setting::Commands(IndexMap::from([
			("run".to_string(), CommandEntry::Include(item("run"))),
			("docs".to_string(), CommandEntry::Include(item("docs"))),
		])));
	let narrow = SettingsFragment::new()
		.with(Setting::Color(ColorRole::Foreground, Color::BLACK))
		.with(Setting::ShellVariables(IndexMap::from([(
			"TM_LINT".to_string(),
			"ruff".to_string(),
		)])))
		.with(Setting::Commands(IndexMap::from([
			("docs".to_string(), CommandEntry::Exclude),
			("test".to_string(), CommandEntry::Include(item("test"))),
		])));

	let mut effective = EffectiveSettings::new();
	effective.apply(&broad);
	effective.apply(&narrow);

	assert_eq!(effective.color(ColorRole::Foreground), Some(Color::BLACK));
	let vars = effective.shell_variables().unwrap();
	assert_eq!(vars.get("TM_COMMENT_START").map(String::as_str), Some("# "));
	assert_eq!(vars.get("TM_LINT").map(String::as_str), Some("ruff"));
	let uuids: Vec<_> = effective.commands().iter().map(|i| i.uuid.clone()).collect();
	assert_eq!(uuids, ["run", "test"]);
}

#[test]
fn test_from_json_normalizes_known_keys() {
	let fragment = SettingsFragment::from_json(&json!({
		"foreground": "#F8F8F2",
		"background": "not a color",
		"fontStyle": "bold underline sparkly",
		"increaseIndentPattern": "^\\s*(def|class)\\b.*:\\s*$",
		"showInSymbolList": 1,
		"spellChecking": "NO",
		"smartTypingPairs": [["(", ")"], ["\"", "\""]],
		"shellVariables": [
			{ "name": "TM_COMMENT_START", "value": "# " },
			{ "name": "TM_TAB_WIDTH", "value": 4 }
		],
		"tabSize": 4
	}));

	let mut effective = EffectiveSettings::new();
	effective.apply(&fragment);

	assert_eq!(effective.color(ColorRole::Foreground), Some(Color::rgb(0xf8, 0xf8, 0xf2)));
	assert_eq!(effective.color(ColorRole::Background), Some(Color::TRANSPARENT));
	assert_eq!(effective.font_style(), Some(FontStyle::BOLD | FontStyle::UNDERLINE));
	assert!(effective.indent_pattern(IndentRule::Increase).unwrap().is_match("    def run(self):"));
	assert_eq!(effective.flag(Flag::ShowInSymbolList), Some(true));
	assert_eq!(effective.flag(Flag::SpellChecking), Some(false));
	assert_eq!(effective.smart_typing_pairs(), &[Pair::new("(", ")"), Pair::new("\"", "\"")]);
	assert_eq!(
		effective.shell_variables().unwrap().get("TM_TAB_WIDTH").map(String::as_str),
		Some("4")
	);
	assert_eq!(effective.custom("tabSize"), Some(&json!(4)));
}

#[test]
fn test_from_json_drops_bad_values() {
	let fragment = SettingsFragment::from_json(&json!({
		"decreaseIndentPattern": "(unclosed",
		"foreground": 12,
		"highlightPairs": [["("]],
		"shellVariables": { "OK": "yes" },
		"commands": { "5A1B": false }
	}));

	assert_eq!(fragment.get(&SettingKey::IndentPattern(IndentRule::Decrease)), None);
	assert_eq!(fragment.get(&SettingKey::Color(ColorRole::Foreground)), None);
	assert_eq!(fragment.get(&SettingKey::HighlightPairs), None);
	assert_eq!(fragment.len(), 2);
	assert_eq!(
		fragment.get(&SettingKey::Commands),
		Some(&Setting::Commands(IndexMap::from([("5A1B".to_string(), CommandEntry::Exclude)])))
	);
}

#[test]
fn test_from_json_keeps_exclusions_beside_bad_command_entries() {
	let fragment = SettingsFragment::from_json(&json!({
		"commands": { "A": false, "B": true, "C": "off", "D": false }
	}));

	assert_eq!(
		fragment.get(&SettingKey::Commands),
		Some(&Setting::Commands(IndexMap::from([
			("A".to_string(), CommandEntry::Exclude),
			("D".to_string(), CommandEntry::Exclude),
		])))
	);
}

#[test]
fn test_from_json_non_dictionary_is_empty() {
	assert!(SettingsFragment::from_json(&json!(["foreground"])).is_empty());
}

#[test]
fn test_select_keeps_requested_keys() {
	let mut effective = EffectiveSettings::new();
	effective.apply(
		&SettingsFragment::new()
			.with(Setting::Flag(Flag::SpellChecking, true))
			.with(Setting::SymbolTransformation("s/^def //".into())),
	);
	let selected = effective.select(&[SettingKey::SymbolTransformation, SettingKey::FontStyle]);
	assert_eq!(selected.len(), 1);
	assert_eq!(selected.symbol_transformation(), Some("s/^def //"));
}
