//! Selector evaluation against a scope path.
//!
//! Every subexpression is evaluated to a set of candidate matches inside a
//! window `path[..limit]`. A candidate is summarized by the shallowest path
//! index it uses (`start`, which bounds where the preceding sequence terms may
//! match) and the atoms it matched, deepest first. For a given `start` only the
//! most specific candidate is kept, since the start is the only thing an
//! enclosing sequence constrains.

use smallvec::SmallVec;

use super::Expr;
use crate::path::Scope;

/// One atom matched against one path element.
///
/// The derived ordering compares depth first and segment count second, which
/// is the same ordering [`Specificity`](crate::Specificity) uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomMatch {
	/// Index of the matched scope in the path (0 is outermost).
	pub index: usize,
	/// Number of dot segments the atom matched.
	pub segments: usize,
}

/// A successful selector match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchResult {
	/// Index of the outermost scope used by the match.
	pub start: usize,
	/// One past the index of the innermost scope used by the match.
	pub end: usize,
	/// Matched atoms, deepest first. Indices are strictly decreasing.
	pub atoms: SmallVec<[AtomMatch; 4]>,
}

impl MatchResult {
	/// Number of scopes the matched span covers.
	pub fn len(&self) -> usize {
		self.end - self.start
	}

	/// Always `false` for results produced by the matcher.
	pub fn is_empty(&self) -> bool {
		self.atoms.is_empty()
	}
}

#[derive(Debug, Clone)]
struct Candidate {
	start: usize,
	atoms: SmallVec<[AtomMatch; 4]>,
}

type Candidates = SmallVec<[Candidate; 4]>;

/// Keeps only the most specific candidate per start index.
fn insert_best(out: &mut Candidates, candidate: Candidate) {
	match out.iter_mut().find(|c| c.start == candidate.start) {
		Some(existing) if candidate.atoms > existing.atoms => *existing = candidate,
		Some(_) => {}
		None => out.push(candidate),
	}
}

/// Returns the most specific match of `expr` against the whole path.
pub(super) fn best_match(expr: &Expr, path: &[Scope]) -> Option<MatchResult> {
	candidates(expr, path, path.len())
		.into_iter()
		.max_by(|a, b| a.atoms.cmp(&b.atoms))
		.map(|c| MatchResult {
			start: c.start,
			end: c.atoms.first().map_or(c.start, |a| a.index) + 1,
			atoms: c.atoms,
		})
}

fn candidates(expr: &Expr, path: &[Scope], limit: usize) -> Candidates {
	match expr {
		Expr::Atom(atom) => (0..limit)
			.rev()
			.filter(|&i| atom.matches(&path[i]))
			.map(|index| Candidate {
				start: index,
				atoms: smallvec::smallvec![AtomMatch {
					index,
					segments: atom.len(),
				}],
			})
			.collect(),
		Expr::Union(alternatives) | Expr::Group(alternatives) => {
			let mut out = Candidates::new();
			for alternative in alternatives {
				for candidate in candidates(alternative, path, limit) {
					insert_best(&mut out, candidate);
				}
			}
			out
		}
		Expr::Sequence(terms) => SequenceMatcher::new(terms, path).candidates(terms.len(), limit),
		Expr::Exclusion(include, exclude) => {
			if candidates(exclude, path, limit).is_empty() {
				candidates(include, path, limit)
			} else {
				Candidates::new()
			}
		}
	}
}

/// Memoized descendant search over the terms of one sequence.
struct SequenceMatcher<'a> {
	terms: &'a [Expr],
	path: &'a [Scope],
	/// `memo[n][limit]` holds the candidates of `terms[..n]` inside `path[..limit]`.
	memo: Vec<Vec<Option<Candidates>>>,
}

impl<'a> SequenceMatcher<'a> {
	fn new(terms: &'a [Expr], path: &'a [Scope]) -> Self {
		Self {
			terms,
			path,
			memo: vec![vec![None; path.len() + 1]; terms.len() + 1],
		}
	}

	/// Candidates for the first `n` terms within `path[..limit]`.
	fn candidates(&mut self, n: usize, limit: usize) -> Candidates {
		if let Some(cached) = &self.memo[n][limit] {
			return cached.clone();
		}

		let last = &self.terms[n - 1];
		let tail = candidates(last, self.path, limit);
		let out = if n == 1 {
			tail
		} else {
			let mut out = Candidates::new();
			for candidate in tail {
				for prefix in self.candidates(n - 1, candidate.start) {
					let mut atoms = candidate.atoms.clone();
					atoms.extend(prefix.atoms);
					insert_best(
						&mut out,
						Candidate {
							start: prefix.start,
							atoms,
						},
					);
				}
			}
			out
		};

		self.memo[n][limit] = Some(out.clone());
		out
	}
}
