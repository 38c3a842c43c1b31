//! Bundle preference cascade and command environments.
//!
//! # Architecture
//!
//! * [`settings`]: typed preference settings and their merge policies
//! * [`color`]: hex color specifications
//! * [`item`]: commands and snippets
//! * [`bundle`]: bundle metadata (languages, preferences, items)
//! * [`record`]: selector-tagged records fed to the cascade
//! * [`cascade`]: scope resolution, ranking, merging and caching
//! * [`registry`]: loaded bundles, kept in sync with the cascade
//! * [`environment`]: layered variables for bundle commands
//!
//! Scope paths and selectors come from [`quire_scope`].

pub mod bundle;
pub mod cascade;
pub mod color;
pub mod environment;
pub mod error;
pub mod item;
pub mod record;
pub mod registry;
pub mod settings;

pub use bundle::{Bundle, Language, Preference};
pub use cascade::{CascadeOptions, PreferenceCascade, RankedMatch, RegisterReport};
pub use color::Color;
pub use environment::{
	Environment, EnvironmentComposer, EnvironmentContext, Position, ProcessDefaults, TextViewInfo,
	WindowInfo,
};
pub use error::{BundleError, Result};
pub use item::{BundleItem, ItemKind, SelectionRequirement};
pub use quire_scope::{ParseError, ScopePath, Selector, Specificity};
pub use record::{PreferenceRecord, RecordId, RecordSpec};
pub use registry::BundleRegistry;
pub use settings::{
	ColorRole, CommandEntry, EffectiveSettings, Flag, FontStyle, IndentRule, MergePolicy, Pair,
	Pattern, Setting, SettingKey, SettingsFragment,
};
