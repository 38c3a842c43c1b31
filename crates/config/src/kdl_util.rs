//! KDL accessors shared by the config sections.

use indexmap::IndexMap;
use kdl::{KdlDocument, KdlNode, KdlValue};

use crate::error::{ConfigError, ConfigWarning, Result};

fn field_value<'a>(
	block: &'a KdlDocument,
	section: &str,
	name: &str,
	expected: &'static str,
) -> Result<Option<&'a KdlValue>> {
	let Some(node) = block.get(name) else {
		return Ok(None);
	};
	node.get(0).map(Some).ok_or_else(|| invalid(section, name, expected))
}

fn invalid(section: &str, name: &str, expected: &'static str) -> ConfigError {
	ConfigError::InvalidValue {
		field: format!("{section}.{name}"),
		expected,
	}
}

/// Reads `name "value"` from a block. Absent nodes yield `None`.
pub fn string_field(block: &KdlDocument, section: &str, name: &str) -> Result<Option<String>> {
	field_value(block, section, name, "a string")?
		.map(|value| {
			value
				.as_string()
				.map(str::to_string)
				.ok_or_else(|| invalid(section, name, "a string"))
		})
		.transpose()
}

/// Reads `name #true` or `name #false` from a block.
pub fn bool_field(block: &KdlDocument, section: &str, name: &str) -> Result<Option<bool>> {
	field_value(block, section, name, "a boolean")?
		.map(|value| value.as_bool().ok_or_else(|| invalid(section, name, "a boolean")))
		.transpose()
}

/// Collects `NAME "value"` children of `node` in declaration order.
///
/// A repeated name keeps its last value.
pub fn string_entries(node: &KdlNode, section: &str) -> Result<IndexMap<String, String>> {
	let mut entries = IndexMap::new();
	let Some(children) = node.children() else {
		return Ok(entries);
	};
	for child in children.nodes() {
		let name = child.name().value();
		let value = child
			.get(0)
			.and_then(|v| v.as_string())
			.ok_or_else(|| invalid(section, name, "a string"))?;
		entries.insert(name.to_string(), value.to_string());
	}
	Ok(entries)
}

/// Warns about every node of `block` whose name is not in `known`.
pub fn unknown_nodes(block: &KdlDocument, found_in: &str, known: &[&str]) -> Vec<ConfigWarning> {
	block
		.nodes()
		.iter()
		.map(|node| node.name().value())
		.filter(|name| !known.contains(name))
		.map(|name| ConfigWarning::UnknownNode {
			node: name.to_string(),
			found_in: found_in.to_string(),
		})
		.collect()
}
