//! Scope selector expressions.
//!
//! [`Selector::parse`] turns selector text into an [`Expr`] tree and
//! [`Selector::matches`] evaluates that tree against a [`ScopePath`]. The two
//! halves live in [`parser`] and [`matcher`] and share nothing but the tree.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::path::{Scope, ScopePath};

mod matcher;
mod parser;

pub use matcher::{AtomMatch, MatchResult};

/// A dot-path prefix such as `source.python`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
	segments: Box<[Box<str>]>,
}

impl Atom {
	pub(crate) fn new(segments: Vec<Box<str>>) -> Self {
		Self {
			segments: segments.into_boxed_slice(),
		}
	}

	pub fn segments(&self) -> &[Box<str>] {
		&self.segments
	}

	/// Number of dot segments; the atom's contribution to specificity.
	pub fn len(&self) -> usize {
		self.segments.len()
	}

	/// Always `false`; the parser never produces an empty atom.
	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}

	/// Segment-wise prefix match against one scope.
	pub fn matches(&self, scope: &Scope) -> bool {
		scope.has_prefix(&self.segments)
	}
}

impl fmt::Display for Atom {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, segment) in self.segments.iter().enumerate() {
			if i > 0 {
				f.write_str(".")?;
			}
			f.write_str(segment)?;
		}
		Ok(())
	}
}

/// Parsed selector tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
	/// Matches a single scope by segment prefix.
	Atom(Atom),
	/// Descendant chain: each term must match strictly deeper than the previous one.
	Sequence(Vec<Expr>),
	/// Comma-separated alternatives at the top level.
	Union(Vec<Expr>),
	/// `include - exclude`: the include side matches and the exclude side does not.
	Exclusion(Box<Expr>, Box<Expr>),
	/// Parenthesised alternatives, usable as a sequence term.
	Group(Vec<Expr>),
}

impl Expr {
	/// Visits every atom in the tree, including excluded ones.
	pub fn for_each_atom<'a>(&'a self, f: &mut impl FnMut(&'a Atom)) {
		match self {
			Expr::Atom(atom) => f(atom),
			Expr::Sequence(items) | Expr::Union(items) | Expr::Group(items) => {
				for item in items {
					item.for_each_atom(f);
				}
			}
			Expr::Exclusion(include, exclude) => {
				include.for_each_atom(f);
				exclude.for_each_atom(f);
			}
		}
	}
}

/// An immutable, parsed scope selector.
#[derive(Debug, Clone)]
pub struct Selector {
	source: Box<str>,
	expr: Expr,
}

impl Selector {
	/// Parses selector text.
	///
	/// # Errors
	///
	/// Returns a [`ParseError`] for empty input, empty atoms, dangling
	/// operators or unbalanced parentheses.
	pub fn parse(text: &str) -> Result<Self, ParseError> {
		let expr = parser::parse(text)?;
		Ok(Self {
			source: text.trim().into(),
			expr,
		})
	}

	/// Evaluates the selector against `path`.
	///
	/// Returns the most specific way the selector matches, or `None`.
	pub fn matches(&self, path: &ScopePath) -> Option<MatchResult> {
		matcher::best_match(&self.expr, path.scopes())
	}

	pub fn is_match(&self, path: &ScopePath) -> bool {
		self.matches(path).is_some()
	}

	pub fn expr(&self) -> &Expr {
		&self.expr
	}

	/// The selector text as written, trimmed.
	pub fn as_str(&self) -> &str {
		&self.source
	}
}

impl PartialEq for Selector {
	fn eq(&self, other: &Self) -> bool {
		self.expr == other.expr
	}
}

impl Eq for Selector {}

impl fmt::Display for Selector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.source)
	}
}

impl FromStr for Selector {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
