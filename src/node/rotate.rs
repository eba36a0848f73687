use super::{Quadtree, QuadtreeNode};
use super::{NORTHEAST, NORTHWEST, SOUTHEAST, SOUTHWEST};

impl QuadtreeNode {
	/// Rotates this subtree 90 degrees clockwise by moving subnodes between
	/// quadrants. Colors are left as they are.
	pub fn clockwise_rotate(&mut self) {
		if let QuadtreeNode::Branch(_, sects) = self {
			// NW, NE, SW, SE becomes SW, NW, SE, NE
			sects.swap(NORTHWEST, SOUTHWEST);
			sects.swap(NORTHEAST, SOUTHWEST);
			sects.swap(SOUTHWEST, SOUTHEAST);
			sects.iter_mut().for_each(QuadtreeNode::clockwise_rotate);
		}
	}
}

impl Quadtree {
	/// Turns the represented image 90 degrees clockwise.
	pub fn clockwise_rotate(&mut self) {
		if let Some(root) = &mut self.root {
			root.clockwise_rotate();
		}
	}
}
