//! Cascade records: a selector, a settings fragment and a declaration order.

use std::sync::Arc;

use indexmap::IndexMap;
use quire_scope::{ScopePath, Selector, Specificity, rank};

use crate::error::{BundleError, Result};
use crate::item::{BundleItem, SelectionRequirement};
use crate::settings::{CommandEntry, Setting, SettingsFragment};

/// Identifies a registered record. Equal to its declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub u64);

/// An unparsed record as supplied by the bundle loader.
#[derive(Debug, Clone)]
pub struct RecordSpec {
	pub bundle_id: String,
	/// Selector text; `None` applies everywhere.
	pub selector: Option<String>,
	pub settings: SettingsFragment,
	pub selection: SelectionRequirement,
}

impl RecordSpec {
	pub fn preference(
		bundle_id: impl Into<String>,
		selector: Option<&str>,
		settings: SettingsFragment,
	) -> Self {
		Self {
			bundle_id: bundle_id.into(),
			selector: selector.map(str::to_string),
			settings,
			selection: SelectionRequirement::Any,
		}
	}

	/// A record adding `item` to the command list of the scopes it targets.
	pub fn item(bundle_id: impl Into<String>, item: &Arc<BundleItem>) -> Self {
		Self {
			bundle_id: bundle_id.into(),
			selector: item.scope.clone(),
			settings: SettingsFragment::new().with(Setting::Commands(IndexMap::from([(
				item.uuid.clone(),
				CommandEntry::Include(item.clone()),
			)]))),
			selection: item.selection,
		}
	}

	/// Parses the selector. The declaration order is assigned by the cascade.
	pub(crate) fn compile(self) -> Result<CompiledSpec> {
		let selector = match &self.selector {
			Some(text) => Some(Selector::parse(text).map_err(|source| BundleError::Selector {
				bundle: self.bundle_id.clone(),
				selector: text.clone(),
				source,
			})?),
			None => None,
		};
		Ok(CompiledSpec {
			selector,
			settings: self.settings,
			bundle_id: self.bundle_id.into(),
			selection: self.selection,
		})
	}
}

/// A record whose selector parsed, waiting for its declaration order.
pub(crate) struct CompiledSpec {
	selector: Option<Selector>,
	settings: SettingsFragment,
	bundle_id: Box<str>,
	selection: SelectionRequirement,
}

impl CompiledSpec {
	pub(crate) fn into_record(self, declaration_order: u64) -> PreferenceRecord {
		PreferenceRecord {
			selector: self.selector,
			settings: self.settings,
			declaration_order,
			bundle_id: self.bundle_id,
			selection: self.selection,
		}
	}
}

/// An immutable record held by the cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceRecord {
	pub selector: Option<Selector>,
	pub settings: SettingsFragment,
	/// Registration order across all bundles; breaks specificity ties.
	pub declaration_order: u64,
	pub bundle_id: Box<str>,
	pub selection: SelectionRequirement,
}

impl PreferenceRecord {
	pub fn id(&self) -> RecordId {
		RecordId(self.declaration_order)
	}

	/// Specificity of this record at `path`, or `None` if it does not apply.
	pub fn rank(&self, path: &ScopePath, has_selection: bool) -> Option<Specificity> {
		if !self.selection.admits(has_selection) {
			return None;
		}
		match &self.selector {
			Some(selector) => selector.matches(path).map(|result| rank(&result)),
			None => Some(Specificity::universal()),
		}
	}
}
