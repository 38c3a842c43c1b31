//! End-to-end resolution through a registry of JSON-described bundles.

#![allow(unused_crate_dependencies)]

use std::path::PathBuf;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use quire_bundle::{
	Bundle, BundleItem, BundleRegistry, Color, ColorRole, EnvironmentComposer, EnvironmentContext,
	Flag, Pattern, Preference, PreferenceCascade, ProcessDefaults, ScopePath, Setting, SettingKey,
	SettingsFragment, TextViewInfo,
};
use serde_json::json;

fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn path(text: &str) -> ScopePath {
	ScopePath::parse(text).unwrap()
}

fn python_bundle() -> Bundle {
	let preferences = [
		json!({
			"name": "Base",
			"scope": "source",
			"settings": { "foreground": "#FFFFFF", "spellChecking": "1" }
		}),
		json!({
			"name": "Python",
			"scope": "source.python",
			"settings": {
				"foreground": "#000000",
				"increaseIndentPattern": ":\\s*$",
				"shellVariables": [
					{ "name": "TM_COMMENT_START", "value": "# " }
				]
			}
		}),
		json!({
			"name": "Strings",
			"scope": "source.python string",
			"settings": { "spellChecking": true, "foreground": "not a color" }
		}),
	];
	let items = [
		json!({
			"uuid": "RUN",
			"name": "Run Script",
			"scope": "source.python",
			"command": "python3 \"$TM_FILEPATH\"",
			"input": "document"
		}),
		json!({
			"uuid": "EVAL",
			"name": "Evaluate Selection",
			"scope": "source.python",
			"command": "python3 -",
			"input": "selection"
		}),
	];

	let mut bundle = Bundle::new("PY", "Python", "/bundles/Python.tmbundle");
	for pref in &preferences {
		bundle = bundle.with_preference(Preference::from_json(pref).unwrap());
	}
	for item in &items {
		bundle = bundle.with_item(BundleItem::from_json(item).unwrap());
	}
	bundle
}

fn registry() -> BundleRegistry {
	init_tracing();
	let registry = BundleRegistry::new(Arc::new(PreferenceCascade::new()));
	assert!(registry.load(python_bundle()).is_clean());
	registry
}

#[test]
fn test_more_specific_bundle_preference_wins() {
	let registry = registry();
	let settings = registry.cascade().resolve(&path("source.python"), false);

	assert_eq!(settings.color(ColorRole::Foreground), Some(Color::BLACK));
	assert_eq!(settings.flag(Flag::SpellChecking), Some(true));
	assert_eq!(
		settings.indent_pattern(quire_bundle::IndentRule::Increase),
		Some(&Pattern::new(":\\s*$").unwrap())
	);
}

#[test]
fn test_malformed_color_falls_back_to_transparent() {
	let registry = registry();
	let settings = registry
		.cascade()
		.resolve(&path("source.python string.quoted.double"), false);
	assert_eq!(settings.color(ColorRole::Foreground), Some(Color::TRANSPARENT));
}

#[test]
fn test_selection_commands_need_a_selection() {
	let registry = registry();
	let at = path("source.python meta.function");

	let uuids = |has_selection| {
		registry
			.cascade()
			.commands_for_scope(&at, has_selection)
			.iter()
			.map(|item| item.uuid.clone())
			.collect::<Vec<_>>()
	};
	assert_eq!(uuids(false), ["RUN"]);
	assert_eq!(uuids(true), ["RUN", "EVAL"]);
	assert!(registry.cascade().commands_for_scope(&path("text.plain"), true).is_empty());
}

#[test]
fn test_command_environment_from_resolved_shell_variables() {
	let registry = registry();
	let at = path("source.python");
	let bundle = registry.get("PY").unwrap();
	let settings = registry.cascade().resolve(&at, false);

	let composer = EnvironmentComposer::new(Arc::new(ProcessDefaults::default()));
	let context = EnvironmentContext {
		shell_variables: settings.shell_variables().cloned().unwrap_or_default(),
		text: Some(TextViewInfo {
			scope: Some(at.clone()),
			..TextViewInfo::default()
		}),
		..EnvironmentContext::default()
	};
	let env = composer.compose(&bundle, &context);

	assert_eq!(env.get("TM_COMMENT_START"), Some("# "));
	assert_eq!(env.get("TM_SCOPE"), Some("source.python"));
	assert_eq!(env.get("TM_BUNDLE_SUPPORT"), Some("/bundles/Python.tmbundle/Support"));
	assert!(!env.contains("TM_FILEPATH"));
	assert!(!env.contains("TM_FILENAME"));

	let with_file = EnvironmentContext {
		text: Some(TextViewInfo {
			file_path: Some(PathBuf::from("/src/app.py")),
			..TextViewInfo::default()
		}),
		..context
	};
	assert_eq!(composer.compose(&bundle, &with_file).get("TM_FILEPATH"), Some("/src/app.py"));
}

#[test]
fn test_unloading_bundle_clears_its_preferences() {
	let registry = registry();
	let at = path("source.python");
	assert!(!registry.cascade().resolve(&at, false).is_empty());

	registry.unload("PY").unwrap();
	assert!(registry.cascade().resolve(&at, false).is_empty());
	assert_eq!(registry.cascade().preference(&at, &SettingKey::Color(ColorRole::Foreground)), None);
}

#[test]
fn test_malformed_selector_is_reported_and_siblings_load() {
	init_tracing();
	let registry = BundleRegistry::new(Arc::new(PreferenceCascade::new()));
	let bundle = Bundle::new("BAD", "Bad", "/bundles/Bad.tmbundle")
		.with_preference(Preference::new(
			"source.python -",
			SettingsFragment::new().with(Setting::Color(ColorRole::Caret, Color::WHITE)),
		))
		.with_preference(Preference::new(
			"source",
			SettingsFragment::new().with(Setting::Color(ColorRole::Caret, Color::BLACK)),
		));

	let report = registry.load(bundle);
	assert_eq!(report.registered.len(), 1);
	assert_eq!(report.rejected.len(), 1);
	assert_eq!(
		registry.cascade().resolve(&path("source.python"), false).color(ColorRole::Caret),
		Some(Color::BLACK)
	);
}

proptest! {
	#[test]
	fn prop_latest_equal_record_wins(shades in proptest::collection::vec(any::<u8>(), 1..12)) {
		let cascade = PreferenceCascade::new();
		let mut bundle = Bundle::new("P", "P", "/p");
		for shade in &shades {
			bundle = bundle.with_preference(Preference::new(
				"source",
				SettingsFragment::new().with(Setting::Color(ColorRole::Background, Color::rgb(*shade, 0, 0))),
			));
		}
		cascade.register_bundle(&bundle);

		let at = path("source.rust meta.block");
		let first = cascade.resolve(&at, false);
		let second = cascade.resolve(&at, false);
		let last = *shades.last().unwrap();
		prop_assert_eq!(first.color(ColorRole::Background), Some(Color::rgb(last, 0, 0)));
		prop_assert!(Arc::ptr_eq(&first, &second));
		prop_assert_eq!(&*first, &cascade.resolve_uncached(&at, false));
	}
}
