//! Process-wide default variables.
//!
//! Populated once, either explicitly with [`ProcessDefaults::install`] at
//! startup or lazily from [`ProcessDefaults::detect`] on first use, and never
//! changed afterwards.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use super::Environment;

static PROCESS_DEFAULTS: OnceLock<Arc<ProcessDefaults>> = OnceLock::new();

/// Editor identity and shared support root exported to every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDefaults {
	pub app_name: String,
	pub app_version: String,
	/// Path of the editor executable, `TM_APP_PATH`.
	pub app_path: Option<PathBuf>,
	/// Shared support directory, `TM_SUPPORT_PATH`.
	pub support_path: Option<PathBuf>,
	/// Additional variables from the engine configuration.
	pub variables: IndexMap<String, String>,
}

impl Default for ProcessDefaults {
	fn default() -> Self {
		Self {
			app_name: "quire".to_string(),
			app_version: env!("CARGO_PKG_VERSION").to_string(),
			app_path: None,
			support_path: None,
			variables: IndexMap::new(),
		}
	}
}

impl ProcessDefaults {
	/// Defaults for the running process.
	pub fn detect() -> Self {
		Self {
			app_path: std::env::current_exe().ok(),
			..Self::default()
		}
	}

	/// Installs the process-wide defaults. Returns `false` if they were
	/// already populated.
	pub fn install(self) -> bool {
		let installed = PROCESS_DEFAULTS.set(Arc::new(self)).is_ok();
		if !installed {
			tracing::warn!("process environment defaults already populated");
		}
		installed
	}

	/// The process-wide defaults, detecting them on first use.
	pub fn global() -> Arc<ProcessDefaults> {
		PROCESS_DEFAULTS
			.get_or_init(|| Arc::new(Self::detect()))
			.clone()
	}

	pub(super) fn apply(&self, env: &mut Environment) {
		env.set("TM_APP_NAME", &self.app_name);
		env.set("TM_APP_VERSION", &self.app_version);
		env.set_path("TM_APP_PATH", self.app_path.as_deref());
		env.set_path("TM_SUPPORT_PATH", self.support_path.as_deref());
		env.extend(&self.variables);
	}
}
