pub mod error;
pub mod pixel;

pub use pixel::Pixel;

/// Index of the northwest quadrant in a branch's children.
pub const NORTHWEST: usize = 0;
/// Index of the northeast quadrant in a branch's children.
pub const NORTHEAST: usize = 1;
/// Index of the southwest quadrant in a branch's children.
pub const SOUTHWEST: usize = 2;
/// Index of the southeast quadrant in a branch's children.
pub const SOUTHEAST: usize = 3;

/// Node in a quadtree for storing an image.
///
/// Either a leaf holding the color of the square it spans, or a branch
/// with exactly four subnodes, ordered northwest, northeast, southwest,
/// southeast (bit 0 of the index picks the east half, bit 1 the south half).
///
/// It always contains a color, such that tree descent can stop at any
/// level and give a meaningful preview. For a branch, this is the
/// truncated mean of its four children's colors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuadtreeNode {
	Leaf(Pixel),
	Branch(Pixel, Box<[QuadtreeNode; 4]>),
}

impl QuadtreeNode {
	pub fn leaf(color: Pixel) -> Self {
		QuadtreeNode::Leaf(color)
	}

	/// Joins four subnodes under a new branch whose color is their average.
	pub fn branch(sections: [QuadtreeNode; 4]) -> Self {
		let color = Pixel::average_of(&[
			sections[NORTHWEST].color(),
			sections[NORTHEAST].color(),
			sections[SOUTHWEST].color(),
			sections[SOUTHEAST].color(),
		]);
		QuadtreeNode::Branch(color, Box::new(sections))
	}

	/// The leaf color, or the memoized average of a branch.
	pub fn color(&self) -> Pixel {
		match self {
			QuadtreeNode::Leaf(c) | QuadtreeNode::Branch(c, _) => *c,
		}
	}

	pub fn has_children(&self) -> bool {
		matches!(self, QuadtreeNode::Branch(..))
	}

	pub fn sections(&self) -> Option<&[QuadtreeNode; 4]> {
		match self {
			QuadtreeNode::Leaf(_) => None,
			QuadtreeNode::Branch(_, sects) => Some(sects),
		}
	}

	/// Number of leaves in this subtree.
	pub fn leaf_count(&self) -> usize {
		match self {
			QuadtreeNode::Leaf(_) => 1,
			QuadtreeNode::Branch(_, sects) => sects.iter().map(QuadtreeNode::leaf_count).sum(),
		}
	}
}

/// A square image of side `res` stored as a quadtree.
///
/// An empty tree has no root and a resolution of 0. Cloning copies every
/// node; trees never share nodes.
#[derive(Clone, Debug, Default)]
pub struct Quadtree {
	root: Option<QuadtreeNode>,
	res: u32,
}

impl Quadtree {
	/// An empty tree.
	pub fn new() -> Self {
		Default::default()
	}

	pub fn is_empty(&self) -> bool {
		self.root.is_none()
	}

	/// Side length of the square this tree represents; 0 when empty.
	pub fn resolution(&self) -> u32 {
		self.res
	}

	pub fn root(&self) -> Option<&QuadtreeNode> {
		self.root.as_ref()
	}

	/// Number of leaves currently in the tree.
	pub fn leaf_count(&self) -> usize {
		self.root.as_ref().map_or(0, QuadtreeNode::leaf_count)
	}

	/// Color of the pixel at `(x, y)` of the represented image.
	///
	/// Returns the default (all-zero) pixel for an empty tree or for
	/// coordinates outside of `0..res`. Below a pruned branch, every
	/// pixel reads as that branch's averaged color.
	///
	/// Coordinates are made quadrant-local at each level, the same
	/// partition `build` and `decompress` use.
	pub fn get_pixel(&self, x: u32, y: u32) -> Pixel {
		let mut node = match &self.root {
			Some(root) if x < self.res && y < self.res => root,
			_ => return Pixel::default(),
		};
		let (mut x, mut y, mut size) = (x, y, self.res);
		loop {
			match node {
				QuadtreeNode::Leaf(c) => return *c,
				QuadtreeNode::Branch(_, sects) => {
					size /= 2;
					let mut sect_ind = 0;
					if x >= size {
						sect_ind |= 1;
						x -= size;
					}
					if y >= size {
						sect_ind |= 2;
						y -= size;
					}
					node = &sects[sect_ind];
				}
			}
		}
	}
}

/// Trees are equal when their node structures match and every pair of
/// corresponding nodes holds the same color. The resolution is not compared.
impl PartialEq for Quadtree {
	fn eq(&self, other: &Self) -> bool {
		self.root == other.root
	}
}

impl Eq for Quadtree {}

pub mod image;
pub mod print;
pub mod prune;
pub mod qti;
pub mod rotate;
