//! Ranking of selector matches.
//!
//! A [`Specificity`] is the list of matched atoms' weights, deepest first,
//! compared lexicographically:
//!
//! 1. the match that reaches a deeper scope wins;
//! 2. at equal depth, the atom with more dot segments wins;
//! 3. otherwise the next-deepest atoms are compared the same way;
//! 4. if one list is a prefix of the other, the longer list wins.
//!
//! So `string` outranks `source.python` at `source.python string.quoted`, and
//! `source.python string` outranks `string`. Equal specificities are left to
//! the caller, which breaks ties by declaration order.

use smallvec::SmallVec;

use crate::selector::MatchResult;

/// Weight of one matched atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Weight {
	/// 1-based depth of the matched scope in the path.
	pub depth: usize,
	/// Number of dot segments matched.
	pub segments: usize,
}

/// Totally ordered measure of how precisely a selector targets a scope path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Specificity {
	weights: SmallVec<[Weight; 4]>,
}

impl Specificity {
	/// The lowest specificity, used for records that apply to every scope.
	pub fn universal() -> Self {
		Self::default()
	}

	pub fn is_universal(&self) -> bool {
		self.weights.is_empty()
	}

	/// Weights, deepest first.
	pub fn weights(&self) -> &[Weight] {
		&self.weights
	}

	/// Total number of dot segments matched across the selector.
	pub fn segments(&self) -> usize {
		self.weights.iter().map(|w| w.segments).sum()
	}
}

/// Computes the specificity of a match.
pub fn rank(result: &MatchResult) -> Specificity {
	Specificity {
		weights: result
			.atoms
			.iter()
			.map(|atom| Weight {
				depth: atom.index + 1,
				segments: atom.segments,
			})
			.collect(),
	}
}
