//! Recursive descent parser for scope selectors.
//!
//! A `-` is an exclusion operator only where a new term could start (after
//! whitespace, `(`, `|`, `,` or at the beginning of input). Inside an atom it
//! is an ordinary segment character, so `meta.tag-name` is one atom while
//! `source -string` is an exclusion.

use super::{Atom, Expr};
use crate::error::{ParseError, ParseErrorKind};
use crate::path::is_segment_char;

/// Maximum length of the text excerpt attached to a [`ParseError`].
const FRAGMENT_LEN: usize = 24;

/// Maintains the parser's position in the selector text.
struct Parser<'a> {
	/// The complete selector text, for error excerpts.
	source: &'a str,
	/// Unconsumed input.
	input: &'a str,
	/// Byte offset of `input` within `source`.
	position: usize,
}

impl<'a> Parser<'a> {
	fn new(source: &'a str) -> Self {
		Self {
			source,
			input: source,
			position: 0,
		}
	}

	fn peek(&self) -> Option<char> {
		self.input.chars().next()
	}

	fn next(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.position += ch.len_utf8();
		self.input = &self.input[ch.len_utf8()..];
		Some(ch)
	}

	fn is_end(&self) -> bool {
		self.input.is_empty()
	}

	fn skip_whitespace(&mut self) {
		while self.peek().is_some_and(char::is_whitespace) {
			self.next();
		}
	}

	fn take_while<F>(&mut self, predicate: F) -> &'a str
	where
		F: Fn(char) -> bool,
	{
		let len = self
			.input
			.char_indices()
			.find(|&(_, ch)| !predicate(ch))
			.map_or(self.input.len(), |(i, _)| i);
		let (taken, rest) = self.input.split_at(len);
		self.input = rest;
		self.position += len;
		taken
	}

	/// Creates a [`ParseError`] at the current position.
	fn error(&self, kind: ParseErrorKind) -> ParseError {
		self.error_at(kind, self.position)
	}

	fn error_at(&self, kind: ParseErrorKind, position: usize) -> ParseError {
		let after = self.source[position..]
			.split(char::is_whitespace)
			.next()
			.unwrap_or_default();
		let fragment = if after.is_empty() {
			self.source[..position]
				.split_whitespace()
				.last()
				.unwrap_or_default()
		} else {
			after
		};
		ParseError {
			kind,
			position,
			fragment: fragment.chars().take(FRAGMENT_LEN).collect(),
		}
	}
}

/// Parses a complete selector.
pub(super) fn parse(text: &str) -> Result<Expr, ParseError> {
	let mut parser = Parser::new(text);
	parser.skip_whitespace();
	if parser.is_end() {
		return Err(parser.error(ParseErrorKind::EmptySelector));
	}

	let expr = parse_union(&mut parser, false)?;

	parser.skip_whitespace();
	match parser.peek() {
		None => Ok(expr),
		Some(')') => Err(parser.error(ParseErrorKind::UnmatchedParen)),
		Some(ch) => Err(parser.error(ParseErrorKind::UnexpectedChar(ch))),
	}
}

/// `union = exclusion ("," exclusion)*`, also accepting `|` inside groups.
fn parse_union(parser: &mut Parser, in_group: bool) -> Result<Expr, ParseError> {
	let mut alternatives = vec![parse_exclusion(parser, None)?];

	loop {
		parser.skip_whitespace();
		match parser.peek() {
			Some(op @ ',') => {
				parser.next();
				alternatives.push(parse_exclusion(parser, Some(op))?);
			}
			Some(op @ '|') if in_group => {
				parser.next();
				alternatives.push(parse_exclusion(parser, Some(op))?);
			}
			Some('|') => return Err(parser.error(ParseErrorKind::AlternationOutsideGroup)),
			_ => break,
		}
	}

	if in_group {
		return Ok(Expr::Group(alternatives));
	}
	Ok(match alternatives.len() {
		1 => alternatives.swap_remove(0),
		_ => Expr::Union(alternatives),
	})
}

/// `exclusion = sequence ("-" sequence)*`, left associative.
fn parse_exclusion(parser: &mut Parser, after: Option<char>) -> Result<Expr, ParseError> {
	let mut expr = parse_sequence(parser, after)?;

	loop {
		parser.skip_whitespace();
		if parser.peek() != Some('-') {
			break;
		}
		parser.next();
		let exclude = parse_sequence(parser, Some('-'))?;
		expr = Expr::Exclusion(Box::new(expr), Box::new(exclude));
	}

	Ok(expr)
}

/// `sequence = term+`. `after` is the operator that preceded this sequence.
fn parse_sequence(parser: &mut Parser, after: Option<char>) -> Result<Expr, ParseError> {
	let mut terms = Vec::new();

	loop {
		parser.skip_whitespace();
		match parser.peek() {
			Some('(') => terms.push(parse_group(parser)?),
			Some('-') => break,
			Some(ch) if ch == '.' || is_segment_char(ch) => terms.push(parse_atom(parser)?),
			_ => break,
		}
	}

	if terms.is_empty() {
		let kind = match (parser.peek(), after) {
			(Some(op @ (',' | '|' | '-')), _) => ParseErrorKind::DanglingOperator(op),
			(_, Some(op)) => ParseErrorKind::DanglingOperator(op),
			(Some(')'), None) => ParseErrorKind::UnmatchedParen,
			(Some(ch), None) => ParseErrorKind::UnexpectedChar(ch),
			(None, None) => ParseErrorKind::EmptySelector,
		};
		return Err(parser.error(kind));
	}

	Ok(match terms.len() {
		1 => terms.swap_remove(0),
		_ => Expr::Sequence(terms),
	})
}

/// `group = "(" exclusion (("|" | ",") exclusion)* ")"`
fn parse_group(parser: &mut Parser) -> Result<Expr, ParseError> {
	let open = parser.position;
	parser.next();
	parser.skip_whitespace();
	if parser.peek() == Some(')') {
		return Err(parser.error_at(ParseErrorKind::EmptyGroup, open));
	}

	let group = parse_union(parser, true)?;

	parser.skip_whitespace();
	match parser.peek() {
		Some(')') => {
			parser.next();
			Ok(group)
		}
		Some(ch) => Err(parser.error(ParseErrorKind::UnexpectedChar(ch))),
		None => Err(parser.error_at(ParseErrorKind::UnclosedGroup, open)),
	}
}

/// `atom = segment ("." segment)*`
fn parse_atom(parser: &mut Parser) -> Result<Expr, ParseError> {
	let start = parser.position;
	let mut segments = Vec::new();

	loop {
		let segment = parser.take_while(is_segment_char);
		if segment.is_empty() {
			return Err(match parser.peek() {
				Some(ch) if !ch.is_whitespace() && !matches!(ch, '.' | ',' | '|' | '(' | ')') => {
					parser.error(ParseErrorKind::UnexpectedChar(ch))
				}
				_ => parser.error_at(ParseErrorKind::EmptyAtom, start),
			});
		}
		segments.push(Box::from(segment));

		if parser.peek() == Some('.') {
			parser.next();
		} else {
			break;
		}
	}

	Ok(Expr::Atom(Atom::new(segments)))
}
