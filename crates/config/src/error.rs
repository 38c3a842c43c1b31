//! Error types for configuration parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing KDL syntax.
	#[error("KDL parse error: {0}")]
	Kdl(#[from] kdl::KdlError),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A value has the wrong type.
	#[error("invalid value for {field}: expected {expected}")]
	InvalidValue {
		/// Dotted path of the offending field, e.g. `cascade.cache`.
		field: String,
		expected: &'static str,
	},
}

/// Non-fatal issues found while parsing; the offending node is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
	/// A node this version does not know about.
	UnknownNode {
		/// The node's name.
		node: String,
		/// The enclosing block, or `"top level"`.
		found_in: String,
	},
}

impl std::fmt::Display for ConfigWarning {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ConfigWarning::UnknownNode { node, found_in } => {
				write!(f, "unknown node '{node}' in {found_in} will be ignored")
			}
		}
	}
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
