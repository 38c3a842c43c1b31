//! Error types for scope paths and selectors.

use thiserror::Error;

/// Reason a selector failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
	/// The selector contains nothing but whitespace.
	#[error("empty selector")]
	EmptySelector,
	/// A scope atom has an empty segment (`source..python`, `string.`).
	#[error("empty scope segment")]
	EmptyAtom,
	/// An operator is missing its right-hand (or left-hand) operand.
	#[error("dangling operator '{0}'")]
	DanglingOperator(char),
	/// A `(` was never closed.
	#[error("unclosed '('")]
	UnclosedGroup,
	/// A `)` has no matching `(`.
	#[error("unmatched ')'")]
	UnmatchedParen,
	/// A group contains no alternatives.
	#[error("empty group '()'")]
	EmptyGroup,
	/// `|` is only valid between the parentheses of a group.
	#[error("'|' outside of a group")]
	AlternationOutsideGroup,
	/// A character that cannot start or continue any selector term.
	#[error("unexpected character '{0}'")]
	UnexpectedChar(char),
}

/// A selector parse failure with its location in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("selector parse error at position {position} near {fragment:?}: {kind}")]
pub struct ParseError {
	/// What went wrong.
	pub kind: ParseErrorKind,
	/// Byte offset in the selector text.
	pub position: usize,
	/// The offending piece of the selector text.
	pub fragment: String,
}

/// Errors building a [`ScopePath`](crate::ScopePath).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopePathError {
	/// A scope path needs at least one scope.
	#[error("empty scope path")]
	Empty,
	/// A scope has an empty dot segment.
	#[error("scope {0:?} has an empty segment")]
	EmptySegment(String),
	/// A single scope may not contain whitespace.
	#[error("scope {0:?} contains whitespace")]
	Whitespace(String),
	/// A scope contains a character outside `[A-Za-z0-9_+#-]` and `.`.
	#[error("scope {scope:?} contains invalid character '{ch}'")]
	InvalidChar { scope: String, ch: char },
}
