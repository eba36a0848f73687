use super::error::PruneError;
use super::{Pixel, Quadtree, QuadtreeNode};

/// Smallest pruning tolerance.
pub const MIN_TOLERANCE: u32 = 0;
/// Color distance between black and white; pruning with this tolerance
/// always collapses a tree to a single leaf.
pub const MAX_TOLERANCE: u32 = 3 * 255 * 255;

impl QuadtreeNode {
	/// Whether every leaf below this node is within `tolerance` of `avg`.
	fn leaves_within(&self, avg: &Pixel, tolerance: u32) -> bool {
		match self {
			QuadtreeNode::Leaf(c) => c.distance(avg) <= tolerance,
			QuadtreeNode::Branch(_, sects) => sects.iter().all(|s| s.leaves_within(avg, tolerance)),
		}
	}

	/// Whether this node is a branch that can stand in for all of its leaves.
	pub fn is_prunable(&self, tolerance: u32) -> bool {
		match self {
			QuadtreeNode::Leaf(_) => false,
			QuadtreeNode::Branch(avg, _) => self.leaves_within(avg, tolerance),
		}
	}

	/// Collapses every outermost prunable branch in this subtree into a leaf
	/// of its average color.
	///
	/// Prunability only ever looks at the original leaves below a node, so
	/// a branch is never reconsidered after its descendants were pruned.
	pub fn prune(&mut self, tolerance: u32) {
		if self.is_prunable(tolerance) {
			*self = QuadtreeNode::Leaf(self.color());
		} else if let QuadtreeNode::Branch(_, sects) = self {
			sects.iter_mut().for_each(|s| s.prune(tolerance));
		}
	}

	/// Number of leaves this subtree would have after `prune(tolerance)`.
	pub fn prune_size(&self, tolerance: u32) -> usize {
		match self {
			QuadtreeNode::Leaf(_) => 1,
			QuadtreeNode::Branch(..) if self.is_prunable(tolerance) => 1,
			QuadtreeNode::Branch(_, sects) => sects.iter().map(|s| s.prune_size(tolerance)).sum(),
		}
	}
}

/// Binary search for the smallest tolerance in
/// `MIN_TOLERANCE..=MAX_TOLERANCE` whose size, as given by `prune_size`,
/// is at most `num_leaves`.
///
/// `prune_size` must be non-increasing, and `prune_size(MAX_TOLERANCE)`
/// must be at most `num_leaves`. It is called no more than twice per halving
/// of the range.
pub fn search_tolerance<F: FnMut(u32) -> usize>(num_leaves: usize, mut prune_size: F) -> u32 {
	let (mut min, mut max) = (MIN_TOLERANCE, MAX_TOLERANCE);
	loop {
		let try_tolerance = min + (max - min) / 2;
		let size = prune_size(try_tolerance);
		log::trace!("tolerance {} keeps {} leaves", try_tolerance, size);
		if size <= num_leaves {
			if try_tolerance == MIN_TOLERANCE || prune_size(try_tolerance - 1) > num_leaves {
				return try_tolerance;
			}
			// A smaller tolerance is also good enough
			max = try_tolerance;
		} else {
			min = try_tolerance + 1;
		}
	}
}

impl Quadtree {
	/// Collapses, in place, every outermost branch whose leaves are all
	/// within `tolerance` of its average color.
	pub fn prune(&mut self, tolerance: u32) {
		if let Some(root) = &mut self.root {
			root.prune(tolerance);
			log::debug!("pruned at tolerance {}, {} leaves remain", tolerance, root.leaf_count());
		}
	}

	/// Number of leaves the tree would have after `prune(tolerance)`,
	/// without modifying it.
	pub fn prune_size(&self, tolerance: u32) -> usize {
		self.root.as_ref().map_or(0, |root| root.prune_size(tolerance))
	}

	/// Smallest tolerance such that pruning with it leaves at most
	/// `num_leaves` leaves.
	///
	/// An empty tree gives 0. Will return an `Err` if `num_leaves` is 0
	/// and the tree is not empty.
	pub fn ideal_prune(&self, num_leaves: usize) -> Result<u32, PruneError> {
		let root = match &self.root {
			Some(root) => root,
			None => return Ok(0),
		};
		if num_leaves == 0 {
			return Err(PruneError::UnreachableLeafCount);
		}
		let tolerance = search_tolerance(num_leaves, |t| root.prune_size(t));
		log::debug!("ideal tolerance for {} leaves is {}", num_leaves, tolerance);
		Ok(tolerance)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn leaf(r: u8, g: u8, b: u8) -> QuadtreeNode {
		QuadtreeNode::leaf(Pixel::rgb(r, g, b))
	}

	fn uniform(r: u8, g: u8, b: u8) -> QuadtreeNode {
		QuadtreeNode::branch([leaf(r, g, b), leaf(r, g, b), leaf(r, g, b), leaf(r, g, b)])
	}

	#[test]
	fn prunability_checks_distance_to_average() {
		// Average is (2,0,0); leaves are at distances 4, 4, 0, 4.
		let node = QuadtreeNode::branch([leaf(0, 0, 0), leaf(4, 0, 0), leaf(2, 0, 0), leaf(2, 2, 0)]);
		assert_eq!(node.color(), Pixel::rgb(2, 0, 0));
		assert!(!node.is_prunable(3));
		assert!(node.is_prunable(4));
		assert!(!leaf(0, 0, 0).is_prunable(MAX_TOLERANCE));
	}

	#[test]
	fn prunability_looks_at_all_leaves_not_children() {
		// The NW child averages to the root color, but one of its leaves is far off.
		let nw = QuadtreeNode::branch([leaf(0, 0, 0), leaf(20, 0, 0), leaf(20, 0, 0), leaf(20, 0, 0)]);
		let node = QuadtreeNode::branch([nw, uniform(15, 0, 0), uniform(15, 0, 0), uniform(15, 0, 0)]);
		assert_eq!(node.color(), Pixel::rgb(15, 0, 0));
		assert!(!node.is_prunable(224));
		assert!(node.is_prunable(225));
	}

	#[test]
	fn prune_collapses_outermost_prunable_branches() {
		let mut node = QuadtreeNode::branch([
			uniform(255, 0, 0),
			uniform(0, 255, 0),
			QuadtreeNode::branch([leaf(0, 0, 255), leaf(0, 0, 250), leaf(0, 0, 255), leaf(0, 0, 250)]),
			uniform(255, 255, 0),
		]);
		assert_eq!(node.prune_size(0), 7);
		assert_eq!(node.prune_size(9), 4);
		node.prune(9);
		assert_eq!(node.leaf_count(), 4);
		assert_eq!(node.sections().unwrap()[2], leaf(0, 0, 252));
		assert_eq!(node.sections().unwrap()[0], leaf(255, 0, 0));
	}

	#[test]
	fn prune_to_max_tolerance_leaves_single_leaf() {
		let mut tree = Quadtree {
			root: Some(QuadtreeNode::branch([uniform(255, 255, 255), leaf(0, 0, 0), leaf(9, 9, 9), uniform(1, 2, 3)])),
			res: 4,
		};
		let color = tree.root().unwrap().color();
		assert_eq!(tree.prune_size(MAX_TOLERANCE), 1);
		tree.prune(MAX_TOLERANCE);
		assert_eq!(tree.root(), Some(&QuadtreeNode::leaf(color)));
		assert_eq!(tree.resolution(), 4);
		assert_eq!(tree.get_pixel(3, 3), color);
	}

	#[test]
	fn prune_size_does_not_modify() {
		let tree = Quadtree { root: Some(uniform(7, 7, 7)), res: 2 };
		assert_eq!(tree.prune_size(0), 1);
		assert_eq!(tree.leaf_count(), 4);
	}

	#[test]
	fn empty_tree_prunes_to_nothing() {
		let mut tree = Quadtree::new();
		tree.prune(MAX_TOLERANCE);
		assert!(tree.is_empty());
		assert_eq!(tree.prune_size(0), 0);
		assert_eq!(tree.ideal_prune(0), Ok(0));
		assert_eq!(tree.ideal_prune(5), Ok(0));
	}

	#[test]
	fn ideal_prune_rejects_zero_leaves() {
		let tree = Quadtree { root: Some(uniform(7, 7, 7)), res: 2 };
		assert_eq!(tree.ideal_prune(0), Err(PruneError::UnreachableLeafCount));
	}

	#[test]
	fn ideal_prune_finds_boundary() {
		let node = QuadtreeNode::branch([leaf(0, 0, 0), leaf(4, 0, 0), leaf(2, 0, 0), leaf(2, 2, 0)]);
		let tree = Quadtree { root: Some(node), res: 2 };
		assert_eq!(tree.ideal_prune(4), Ok(0));
		assert_eq!(tree.ideal_prune(3), Ok(4));
		assert_eq!(tree.ideal_prune(1), Ok(4));
	}

	#[test]
	fn search_finds_every_threshold() {
		for &threshold in &[MIN_TOLERANCE, 1, 2, 1000, 65025, MAX_TOLERANCE - 1, MAX_TOLERANCE] {
			let size = |t: u32| if t >= threshold { 1 } else { 2 };
			assert_eq!(search_tolerance(1, size), threshold);
		}
	}

	#[test]
	fn search_uses_logarithmic_calls() {
		let bound = 2 * ((32 - MAX_TOLERANCE.leading_zeros()) as usize + 2);
		for &threshold in &[MIN_TOLERANCE, 3, 777, 100_000, MAX_TOLERANCE] {
			let mut calls = 0;
			let found = search_tolerance(10, |t| {
				calls += 1;
				if t >= threshold { 10 } else { 11 }
			});
			assert_eq!(found, threshold);
			assert!(calls <= bound, "{} calls for threshold {}", calls, threshold);
		}
	}

	#[test]
	fn search_handles_step_sizes() {
		// Leaf count drops by steps; ask for a budget between two steps.
		let size = |t: u32| match t {
			0..=9 => 64,
			10..=499 => 40,
			500..=8999 => 16,
			_ => 1,
		};
		assert_eq!(search_tolerance(64, size), 0);
		assert_eq!(search_tolerance(50, size), 10);
		assert_eq!(search_tolerance(40, size), 10);
		assert_eq!(search_tolerance(39, size), 500);
		assert_eq!(search_tolerance(2, size), 9000);
	}
}
