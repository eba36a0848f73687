use std::io::{self, Write};

use super::{Quadtree, QuadtreeNode};

impl QuadtreeNode {
	/// Visits this node, then its sections in NW, NE, SW, SE order.
	///
	/// `depth` is the depth of this node; children get `depth + 1`.
	pub fn walk_preorder<F: FnMut(&QuadtreeNode, u32)>(&self, depth: u32, visit: &mut F) {
		visit(self, depth);
		if let Some(sects) = self.sections() {
			for section in sects.iter() {
				section.walk_preorder(depth + 1, visit);
			}
		}
	}
}

impl Quadtree {
	/// Visits every node in preorder. The root is at depth 1.
	pub fn walk_preorder<F: FnMut(&QuadtreeNode, u32)>(&self, mut visit: F) {
		if let Some(root) = &self.root {
			root.walk_preorder(1, &mut visit);
		}
	}

	/// Writes one line per leaf, in preorder, as `<color> at depth <depth>`.
	///
	/// With `branches`, branch averages are listed too, marked `avg`.
	pub fn print_tree<W: Write>(&self, out: &mut W, branches: bool) -> io::Result<()> {
		if self.is_empty() {
			return writeln!(out, "Empty tree.");
		}
		let mut result = Ok(());
		self.walk_preorder(|node, depth| {
			if result.is_err() {
				return;
			}
			result = match node {
				QuadtreeNode::Leaf(c) => writeln!(out, "{} at depth {}", c, depth),
				QuadtreeNode::Branch(c, _) if branches => writeln!(out, "avg {} at depth {}", c, depth),
				QuadtreeNode::Branch(..) => Ok(()),
			};
		});
		result
	}
}
