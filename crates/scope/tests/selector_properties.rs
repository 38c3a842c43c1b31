#![allow(unused_crate_dependencies)]

use proptest::prelude::*;
use quire_scope::{ScopePath, Selector, rank};

fn segment() -> impl Strategy<Value = String> {
	"[a-z][a-z0-9]{0,5}"
}

fn atom() -> impl Strategy<Value = String> {
	prop::collection::vec(segment(), 1..4).prop_map(|segments| segments.join("."))
}

fn sequence() -> impl Strategy<Value = Vec<String>> {
	prop::collection::vec(atom(), 1..5)
}

fn scope_path() -> impl Strategy<Value = String> {
	prop::collection::vec(atom(), 1..8).prop_map(|scopes| scopes.join(" "))
}

proptest! {
	#[test]
	fn matching_is_deterministic(selector in sequence(), path in scope_path()) {
		let selector = Selector::parse(&selector.join(" ")).unwrap();
		let path = ScopePath::parse(&path).unwrap();
		let first = selector.matches(&path);
		let second = selector.matches(&path);
		prop_assert_eq!(first.as_ref().map(rank), second.as_ref().map(rank));
		prop_assert_eq!(first, second);
	}

	#[test]
	fn selector_matches_path_built_from_its_atoms(atoms in sequence()) {
		let text = atoms.join(" ");
		let selector = Selector::parse(&text).unwrap();
		let path = ScopePath::parse(&text).unwrap();
		prop_assert!(selector.is_match(&path));
	}

	#[test]
	fn union_matches_path_built_from_its_atoms(left in sequence(), right in sequence()) {
		let selector = Selector::parse(&format!("{}, {}", left.join(" "), right.join(" "))).unwrap();
		let path = ScopePath::parse(&format!("{} {}", left.join(" "), right.join(" "))).unwrap();
		prop_assert!(selector.is_match(&path));
	}

	#[test]
	fn intervening_ancestors_and_longer_scopes_still_match(
		atoms in sequence(),
		filler in atom(),
		suffix in segment(),
	) {
		let selector = Selector::parse(&atoms.join(" ")).unwrap();
		let widened: Vec<String> = atoms
			.iter()
			.flat_map(|a| [format!("{a}.{suffix}"), format!("filler.{filler}")])
			.collect();
		let path = ScopePath::parse(&widened.join(" ")).unwrap();
		prop_assert!(selector.is_match(&path));
	}
}

#[test]
fn prefix_match_on_first_element() {
	let selector = Selector::parse("source.python").unwrap();
	let path = ScopePath::parse("source.python string.quoted").unwrap();
	assert!(selector.is_match(&path));
}

#[test]
fn non_contiguous_descendant() {
	let selector = Selector::parse("source.python string.quoted").unwrap();
	let path = ScopePath::parse("source.python meta.other string.quoted.double").unwrap();
	assert!(selector.is_match(&path));
}

#[test]
fn exclusion_triggers() {
	let selector = Selector::parse("source.python - string").unwrap();
	let path = ScopePath::parse("source.python string.quoted").unwrap();
	assert!(selector.matches(&path).is_none());
}
