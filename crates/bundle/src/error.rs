//! Error types for bundle records.

use quire_scope::ParseError;
use thiserror::Error;

/// Errors raised while turning bundle data into cascade records.
#[derive(Debug, Clone, Error)]
pub enum BundleError {
	/// A record's scope selector failed to parse; the record was rejected.
	#[error("bundle {bundle}: invalid scope selector {selector:?}: {source}")]
	Selector {
		/// Identifier of the bundle that declared the record.
		bundle: String,
		/// The selector text as declared.
		selector: String,
		/// The underlying parse error.
		source: ParseError,
	},

	/// A bundle dictionary did not have the expected shape.
	#[error("malformed bundle data: {0}")]
	Malformed(String),

	/// A required field is missing from a bundle dictionary.
	#[error("missing required field: {0}")]
	MissingField(&'static str),
}

impl From<serde_json::Error> for BundleError {
	fn from(error: serde_json::Error) -> Self {
		BundleError::Malformed(error.to_string())
	}
}

/// Result type for bundle operations.
pub type Result<T> = std::result::Result<T, BundleError>;
