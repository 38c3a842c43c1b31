//! Registry of loaded bundles.
//!
//! Owns bundle metadata and keeps the [`PreferenceCascade`] in sync with it.
//! Reading bundle packages from disk is the loader's job; the registry only
//! receives finished [`Bundle`] values.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::info;

use crate::bundle::Bundle;
use crate::cascade::{PreferenceCascade, RegisterReport};
use crate::item::BundleItem;

/// Loaded bundles by identifier, in load order.
///
/// Thread-safe; can be shared via `Arc<BundleRegistry>`.
pub struct BundleRegistry {
	bundles: RwLock<IndexMap<String, Arc<Bundle>>>,
	cascade: Arc<PreferenceCascade>,
}

impl BundleRegistry {
	pub fn new(cascade: Arc<PreferenceCascade>) -> Self {
		Self {
			bundles: RwLock::new(IndexMap::new()),
			cascade,
		}
	}

	pub fn cascade(&self) -> &Arc<PreferenceCascade> {
		&self.cascade
	}

	/// Loads `bundle`, replacing a previously loaded bundle with the same identifier.
	///
	/// A reloaded bundle's records are registered anew and therefore rank after
	/// every record registered before the reload.
	pub fn load(&self, bundle: Bundle) -> RegisterReport {
		let bundle = Arc::new(bundle);
		let mut bundles = self.bundles.write();
		let report = match bundles.shift_remove(bundle.uuid()) {
			Some(_) => self.cascade.replace_bundle(&bundle),
			None => self.cascade.register_bundle(&bundle),
		};
		info!(
			bundle = bundle.uuid(),
			name = bundle.name(),
			records = report.registered.len(),
			"loaded bundle"
		);
		bundles.insert(bundle.uuid().to_string(), bundle);
		report
	}

	/// Unloads a bundle and its records.
	pub fn unload(&self, uuid: &str) -> Option<Arc<Bundle>> {
		let removed = self.bundles.write().shift_remove(uuid)?;
		self.cascade.unregister_bundle(uuid);
		info!(bundle = uuid, "unloaded bundle");
		Some(removed)
	}

	pub fn get(&self, uuid: &str) -> Option<Arc<Bundle>> {
		self.bundles.read().get(uuid).cloned()
	}

	/// All loaded bundles in load order.
	pub fn bundles(&self) -> Vec<Arc<Bundle>> {
		self.bundles.read().values().cloned().collect()
	}

	/// Finds a command or snippet by its uuid across all bundles.
	pub fn item(&self, uuid: &str) -> Option<(Arc<Bundle>, Arc<BundleItem>)> {
		self.bundles.read().values().find_map(|bundle| {
			let item = bundle.item(uuid)?.clone();
			Some((bundle.clone(), item))
		})
	}

	pub fn len(&self) -> usize {
		self.bundles.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.bundles.read().is_empty()
	}
}

#[cfg(test)]
mod tests {
	use quire_scope::ScopePath;

	use super::*;
	use crate::color::Color;
	use crate::item::ItemKind;
	use crate::settings::{ColorRole, Setting, SettingsFragment};
	use crate::Preference;

	fn bundle(uuid: &str, color: Color) -> Bundle {
		Bundle::new(uuid, uuid, format!("/bundles/{uuid}.tmbundle"))
			.with_preference(Preference::new(
				"source",
				SettingsFragment::new().with(Setting::Color(ColorRole::Foreground, color)),
			))
			.with_item(BundleItem::new(
				format!("{uuid}-snippet"),
				"Snippet",
				ItemKind::Snippet { content: "x".into() },
			))
	}

	#[test]
	fn test_load_registers_and_reload_replaces() {
		let registry = BundleRegistry::new(Arc::new(PreferenceCascade::new()));
		let at = ScopePath::parse("source.c").unwrap();

		assert!(registry.load(bundle("a", Color::WHITE)).is_clean());
		registry.load(bundle("b", Color::BLACK));
		assert_eq!(registry.cascade().len(), 4);
		assert_eq!(
			registry.cascade().resolve(&at, false).color(ColorRole::Foreground),
			Some(Color::BLACK)
		);

		let red = Color::rgb(255, 0, 0);
		registry.load(bundle("a", red));
		assert_eq!(registry.len(), 2);
		assert_eq!(registry.cascade().len(), 4);
		assert_eq!(
			registry.cascade().resolve(&at, false).color(ColorRole::Foreground),
			Some(red)
		);
		let order: Vec<_> = registry.bundles().iter().map(|b| b.uuid().to_string()).collect();
		assert_eq!(order, ["b", "a"]);
	}

	#[test]
	fn test_unload_and_item_lookup() {
		let registry = BundleRegistry::new(Arc::new(PreferenceCascade::new()));
		registry.load(bundle("a", Color::WHITE));

		let (owner, item) = registry.item("a-snippet").unwrap();
		assert_eq!(owner.uuid(), "a");
		assert_eq!(item.name, "Snippet");

		assert!(registry.unload("a").is_some());
		assert!(registry.unload("a").is_none());
		assert!(registry.is_empty());
		assert!(registry.cascade().is_empty());
		assert!(registry.item("a-snippet").is_none());
	}
}
