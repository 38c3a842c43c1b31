//! Scope paths: the ancestor chain of scopes at a document position.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ScopePathError;

/// Characters allowed inside a scope segment, shared by paths and selectors.
pub(crate) fn is_segment_char(ch: char) -> bool {
	ch.is_ascii_alphanumeric() || matches!(ch, '_' | '+' | '#' | '-')
}

/// A single dot-separated scope such as `string.quoted.double.python`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scope {
	name: Box<str>,
}

impl Scope {
	/// Validates and wraps a scope name.
	pub fn new(name: impl AsRef<str>) -> Result<Self, ScopePathError> {
		let name = name.as_ref();
		if name.chars().any(char::is_whitespace) {
			return Err(ScopePathError::Whitespace(name.to_string()));
		}
		if name.split('.').any(str::is_empty) {
			return Err(ScopePathError::EmptySegment(name.to_string()));
		}
		if let Some(ch) = name.chars().find(|&ch| ch != '.' && !is_segment_char(ch)) {
			return Err(ScopePathError::InvalidChar {
				scope: name.to_string(),
				ch,
			});
		}
		Ok(Self { name: name.into() })
	}

	pub fn as_str(&self) -> &str {
		&self.name
	}

	/// Iterates the dot segments, outermost first.
	pub fn segments(&self) -> std::str::Split<'_, char> {
		self.name.split('.')
	}

	pub fn segment_count(&self) -> usize {
		self.segments().count()
	}

	/// Returns `true` if this scope's segment list starts with `prefix`.
	///
	/// This is a segment-wise comparison: `source.python` has the prefix
	/// `["source"]` but not `["sour"]`.
	pub fn has_prefix<S: AsRef<str>>(&self, prefix: &[S]) -> bool {
		let mut segments = self.segments();
		prefix
			.iter()
			.all(|want| segments.next() == Some(want.as_ref()))
	}
}

impl fmt::Display for Scope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)
	}
}

impl FromStr for Scope {
	type Err = ScopePathError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

/// An immutable, non-empty chain of scopes, outermost first.
///
/// Cloning is cheap; the scopes are shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopePath {
	scopes: Arc<[Scope]>,
}

impl ScopePath {
	/// Parses the canonical textual form: scopes separated by whitespace.
	pub fn parse(text: &str) -> Result<Self, ScopePathError> {
		Self::from_scopes(text.split_whitespace().map(Scope::new).collect::<Result<Vec<_>, _>>()?)
	}

	/// Builds a path from already validated scopes.
	pub fn from_scopes(scopes: impl IntoIterator<Item = Scope>) -> Result<Self, ScopePathError> {
		let scopes: Arc<[Scope]> = scopes.into_iter().collect();
		if scopes.is_empty() {
			return Err(ScopePathError::Empty);
		}
		Ok(Self { scopes })
	}

	pub fn scopes(&self) -> &[Scope] {
		&self.scopes
	}

	/// Number of scopes in the path. Always at least one.
	pub fn depth(&self) -> usize {
		self.scopes.len()
	}

	/// The innermost (deepest) scope.
	pub fn innermost(&self) -> &Scope {
		&self.scopes[self.scopes.len() - 1]
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Scope> {
		self.scopes.iter()
	}

	/// Returns a new path with `scope` appended as the innermost element.
	pub fn child(&self, scope: Scope) -> Self {
		let scopes: Arc<[Scope]> = self.scopes.iter().cloned().chain(std::iter::once(scope)).collect();
		Self { scopes }
	}
}

impl fmt::Display for ScopePath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, scope) in self.scopes.iter().enumerate() {
			if i > 0 {
				f.write_str(" ")?;
			}
			f.write_str(scope.as_str())?;
		}
		Ok(())
	}
}

impl FromStr for ScopePath {
	type Err = ScopePathError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl<'a> IntoIterator for &'a ScopePath {
	type Item = &'a Scope;
	type IntoIter = std::slice::Iter<'a, Scope>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
