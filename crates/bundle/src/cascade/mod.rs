//! Preference cascade.
//!
//! Holds every record contributed by loaded bundles and resolves a scope path
//! to the merged settings of all records matching it. Matching records are
//! sorted ascending by `(specificity, declaration order)` and folded in that
//! order, so the most specific (and, on ties, the latest registered) record
//! has the final word.
//!
//! Records and the result cache share one [`RwLock`]: resolution takes the
//! read side, registration the write side. A resolve never observes a
//! half-updated record list.

use std::sync::Arc;

use parking_lot::RwLock;
use quire_scope::{ScopePath, Specificity};
use rustc_hash::FxHashMap as HashMap;
use tracing::{debug, trace, warn};

use crate::bundle::Bundle;
use crate::error::{BundleError, Result};
use crate::item::BundleItem;
use crate::record::{CompiledSpec, PreferenceRecord, RecordId, RecordSpec};
use crate::settings::{EffectiveSettings, Setting, SettingKey};


/// Tunables for [`PreferenceCascade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeOptions {
	/// Memoize resolved settings per `(scope path, selection state)`.
	pub cache: bool,
}

impl Default for CascadeOptions {
	fn default() -> Self {
		Self { cache: true }
	}
}

/// A record matching a queried scope path.
#[derive(Debug, Clone)]
pub struct RankedMatch {
	pub record: Arc<PreferenceRecord>,
	pub specificity: Specificity,
}

/// Outcome of registering all records of a bundle.
#[derive(Debug, Default)]
pub struct RegisterReport {
	pub registered: Vec<RecordId>,
	/// Records that were rejected; the others are registered regardless.
	pub rejected: Vec<BundleError>,
}

impl RegisterReport {
	pub fn is_clean(&self) -> bool {
		self.rejected.is_empty()
	}
}

type CacheKey = (ScopePath, bool);

#[derive(Default)]
struct CascadeState {
	records: Vec<Arc<PreferenceRecord>>,
	next_order: u64,
	/// Bumped on every mutation so stale results are never cached.
	generation: u64,
	cache: HashMap<CacheKey, Arc<EffectiveSettings>>,
}

impl CascadeState {
	fn push(&mut self, spec: CompiledSpec) -> RecordId {
		let record = spec.into_record(self.next_order);
		self.next_order += 1;
		let id = record.id();
		self.records.push(Arc::new(record));
		id
	}

	fn invalidate(&mut self) {
		self.generation += 1;
		if !self.cache.is_empty() {
			trace!(entries = self.cache.len(), "clearing preference cache");
			self.cache.clear();
		}
	}
}

/// Ordered collection of preference and command records with cached resolution.
///
/// Thread-safe; share it via `Arc<PreferenceCascade>`.
#[derive(Default)]
pub struct PreferenceCascade {
	state: RwLock<CascadeState>,
	options: CascadeOptions,
}

impl PreferenceCascade {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_options(options: CascadeOptions) -> Self {
		Self {
			state: RwLock::default(),
			options,
		}
	}

	/// Registers one record.
	///
	/// # Errors
	///
	/// Returns [`BundleError::Selector`] if the selector does not parse; the
	/// record is not registered.
	pub fn register(&self, spec: RecordSpec) -> Result<RecordId> {
		let compiled = spec.compile().inspect_err(|error| warn!(%error, "rejecting preference record"))?;
		let mut state = self.state.write();
		let id = state.push(compiled);
		state.invalidate();
		Ok(id)
	}

	/// Registers every preference and item of `bundle` in declaration order.
	///
	/// Records with malformed selectors are reported and skipped.
	pub fn register_bundle(&self, bundle: &Bundle) -> RegisterReport {
		let (compiled, mut report) = compile_bundle(bundle);
		let mut state = self.state.write();
		report.registered = compiled.into_iter().map(|spec| state.push(spec)).collect();
		state.invalidate();
		drop(state);
		debug!(
			bundle = bundle.uuid(),
			registered = report.registered.len(),
			rejected = report.rejected.len(),
			"registered bundle records"
		);
		report
	}

	/// Swaps every record of `bundle`'s identifier for its current records.
	///
	/// Removal and registration happen under one write lock, so a concurrent
	/// resolve sees either the old records or the new ones.
	pub fn replace_bundle(&self, bundle: &Bundle) -> RegisterReport {
		let (compiled, mut report) = compile_bundle(bundle);
		let mut state = self.state.write();
		let before = state.records.len();
		state.records.retain(|record| &*record.bundle_id != bundle.uuid());
		let removed = before - state.records.len();
		report.registered = compiled.into_iter().map(|spec| state.push(spec)).collect();
		state.invalidate();
		drop(state);
		debug!(
			bundle = bundle.uuid(),
			removed,
			registered = report.registered.len(),
			rejected = report.rejected.len(),
			"replaced bundle records"
		);
		report
	}

	/// Removes every record contributed by `bundle_id`. Returns how many were removed.
	pub fn unregister_bundle(&self, bundle_id: &str) -> usize {
		let mut state = self.state.write();
		let before = state.records.len();
		state.records.retain(|record| &*record.bundle_id != bundle_id);
		let removed = before - state.records.len();
		if removed > 0 {
			state.invalidate();
			debug!(bundle = bundle_id, removed, "unregistered bundle records");
		}
		removed
	}

	/// Resolves the effective settings at `path`.
	///
	/// Repeated calls with the same arguments and no intervening mutation
	/// return the same `Arc`.
	pub fn resolve(&self, path: &ScopePath, has_selection: bool) -> Arc<EffectiveSettings> {
		let key = (path.clone(), has_selection);
		let (settings, generation) = {
			let state = self.state.read();
			if let Some(hit) = state.cache.get(&key) {
				trace!(scope = %path, has_selection, "preference cache hit");
				return hit.clone();
			}
			let settings = Arc::new(fold(&ranked(&state.records, path, has_selection)));
			(settings, state.generation)
		};

		if !self.options.cache {
			return settings;
		}
		self.store(key, settings, generation)
	}

	/// Caches `settings` unless the records changed since `generation`.
	fn store(&self, key: CacheKey, settings: Arc<EffectiveSettings>, generation: u64) -> Arc<EffectiveSettings> {
		let mut state = self.state.write();
		if state.generation != generation {
			trace!(scope = %key.0, "discarding stale resolution");
			return settings;
		}
		trace!(scope = %key.0, has_selection = key.1, "caching resolved preferences");
		state.cache.entry(key).or_insert(settings).clone()
	}

	/// Resolves without consulting or filling the cache.
	pub fn resolve_uncached(&self, path: &ScopePath, has_selection: bool) -> EffectiveSettings {
		let state = self.state.read();
		fold(&ranked(&state.records, path, has_selection))
	}

	/// Every record matching `path`, lowest priority first.
	pub fn matches(&self, path: &ScopePath, has_selection: bool) -> Vec<RankedMatch> {
		ranked(&self.state.read().records, path, has_selection)
	}

	/// The effective value of one setting at `path`.
	pub fn preference(&self, path: &ScopePath, key: &SettingKey) -> Option<Setting> {
		self.resolve(path, false).get(key).cloned()
	}

	/// The effective values of several settings at `path`.
	pub fn preferences(&self, path: &ScopePath, keys: &[SettingKey]) -> EffectiveSettings {
		self.resolve(path, false).select(keys)
	}

	/// Commands and snippets offered at `path` for the given selection state.
	pub fn commands_for_scope(&self, path: &ScopePath, has_selection: bool) -> Vec<Arc<BundleItem>> {
		self.resolve(path, has_selection).commands()
	}

	/// Number of registered records.
	pub fn len(&self) -> usize {
		self.state.read().records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.state.read().records.is_empty()
	}

	/// Number of memoized resolutions.
	pub fn cached_entries(&self) -> usize {
		self.state.read().cache.len()
	}
}

/// Compiles the records of `bundle`, collecting rejected selectors in the report.
fn compile_bundle(bundle: &Bundle) -> (Vec<CompiledSpec>, RegisterReport) {
	let specs = bundle
		.preferences()
		.iter()
		.map(|pref| RecordSpec::preference(bundle.uuid(), pref.scope.as_deref(), pref.settings.clone()))
		.chain(bundle.items().iter().map(|item| RecordSpec::item(bundle.uuid(), item)));

	let mut report = RegisterReport::default();
	let mut compiled = Vec::new();
	for spec in specs {
		match spec.compile() {
			Ok(spec) => compiled.push(spec),
			Err(error) => {
				warn!(bundle = bundle.uuid(), %error, "rejecting preference record");
				report.rejected.push(error);
			}
		}
	}
	(compiled, report)
}

fn ranked(records: &[Arc<PreferenceRecord>], path: &ScopePath, has_selection: bool) -> Vec<RankedMatch> {
	let mut matches: Vec<RankedMatch> = records
		.iter()
		.filter_map(|record| {
			let specificity = record.rank(path, has_selection)?;
			Some(RankedMatch {
				record: record.clone(),
				specificity,
			})
		})
		.collect();
	matches.sort_by(|a, b| {
		a.specificity
			.cmp(&b.specificity)
			.then(a.record.declaration_order.cmp(&b.record.declaration_order))
	});
	matches
}

fn fold(matches: &[RankedMatch]) -> EffectiveSettings {
	let mut settings = EffectiveSettings::new();
	for ranked in matches {
		settings.apply(&ranked.record.settings);
	}
	settings
}
