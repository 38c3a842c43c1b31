//! Scope paths and scope selectors.
//!
//! A syntax highlighter labels every position of a document with a [`ScopePath`],
//! the chain of dot-separated scopes enclosing it, outermost first:
//!
//! ```text
//! source.python meta.function.python entity.name.function.python
//! ```
//!
//! Bundles target preferences and commands at such paths with a [`Selector`]:
//!
//! ```text
//! selector    = union
//! union       = exclusion ("," exclusion)*
//! exclusion   = sequence ("-" sequence)*
//! sequence    = term+
//! term        = atom | group
//! group       = "(" exclusion (("|" | ",") exclusion)* ")"
//! atom        = segment ("." segment)*
//! ```
//!
//! Parsing and matching are separate: [`Selector::parse`] builds an immutable
//! [`Expr`] tree, [`Selector::matches`] evaluates it against a path and returns a
//! [`MatchResult`] which [`rank`] turns into a totally ordered [`Specificity`].

pub mod error;
pub mod path;
pub mod selector;
pub mod specificity;

pub use error::{ParseError, ParseErrorKind, ScopePathError};
pub use path::{Scope, ScopePath};
pub use selector::{Atom, AtomMatch, Expr, MatchResult, Selector};
pub use specificity::{Specificity, Weight, rank};
