use super::error::AnalyzeError;
use super::{Pixel, Quadtree, QuadtreeNode};

/// Per-pixel access to a rectangular image, with the origin at the top left.
pub trait Raster {
	fn width(&self) -> u32;
	fn height(&self) -> u32;
	fn read(&self, x: u32, y: u32) -> Pixel;
	fn write(&mut self, x: u32, y: u32, pixel: Pixel);
	/// A raster of the given size; `blank(0, 0)` is the empty raster.
	fn blank(width: u32, height: u32) -> Self where Self: Sized;
}

impl Raster for image::RgbaImage {
	fn width(&self) -> u32 {
		image::ImageBuffer::width(self)
	}

	fn height(&self) -> u32 {
		image::ImageBuffer::height(self)
	}

	fn read(&self, x: u32, y: u32) -> Pixel {
		(*self.get_pixel(x, y)).into()
	}

	fn write(&mut self, x: u32, y: u32, pixel: Pixel) {
		self.put_pixel(x, y, pixel.into());
	}

	fn blank(width: u32, height: u32) -> Self {
		image::RgbaImage::new(width, height)
	}
}

fn build_node<R: Raster>(raster: &R, size: u32, start_pos: (u32, u32)) -> QuadtreeNode {
	if size == 1 {
		return QuadtreeNode::leaf(raster.read(start_pos.0, start_pos.1));
	}
	let half = size / 2;
	let section = |sect_ind: u32| build_node(
		raster,
		half,
		(start_pos.0 + (sect_ind & 1) * half, start_pos.1 + (sect_ind >> 1) * half)
	);
	QuadtreeNode::branch([section(0), section(1), section(2), section(3)])
}

fn draw_node<R: Raster>(node: &QuadtreeNode, raster: &mut R, size: u32, start_pos: (u32, u32)) {
	match node {
		QuadtreeNode::Leaf(c) => {
			for row in start_pos.1..(start_pos.1 + size) {
				for col in start_pos.0..(start_pos.0 + size) {
					raster.write(col, row, *c);
				}
			}
		},
		QuadtreeNode::Branch(_, sects) => {
			let half = size / 2;
			for (ind, section) in sects.iter().enumerate() {
				let ind = ind as u32;
				draw_node(
					section,
					raster,
					half,
					(start_pos.0 + (ind & 1) * half, start_pos.1 + (ind >> 1) * half)
				);
			}
		}
	}
}

impl Quadtree {
	/// Builds a tree representing the top-left `resolution` by `resolution`
	/// block of `raster`.
	pub fn from_raster<R: Raster>(raster: &R, resolution: u32) -> Result<Self, AnalyzeError> {
		let mut tree = Quadtree::new();
		tree.build(raster, resolution)?;
		Ok(tree)
	}

	/// Replaces the contents of this tree with the top-left `resolution` by
	/// `resolution` block of `raster`.
	///
	/// Every branch color is the truncated mean of its four children,
	/// computed bottom-up. This is not always the mean of all the leaves.
	///
	/// Will return an `Err`, leaving the tree untouched, if `resolution`
	/// is not a power of two or the raster is smaller than it.
	pub fn build<R: Raster>(&mut self, raster: &R, resolution: u32) -> Result<(), AnalyzeError> {
		// Validate input
		if !resolution.is_power_of_two() {
			return Err(AnalyzeError::NonPowerOfTwo(resolution));
		}
		if raster.width() < resolution || raster.height() < resolution {
			return Err(AnalyzeError::RasterTooSmall {
				resolution,
				width: raster.width(),
				height: raster.height(),
			});
		}

		self.root = Some(build_node(raster, resolution, (0, 0)));
		self.res = resolution;
		log::debug!("built {0}x{0} quadtree", resolution);
		Ok(())
	}

	/// Renders the tree into a new `res` by `res` raster.
	///
	/// A leaf fills the whole square it spans. An empty tree gives an
	/// empty raster.
	pub fn decompress<R: Raster>(&self) -> R {
		match &self.root {
			None => R::blank(0, 0),
			Some(root) => {
				let mut img = R::blank(self.res, self.res);
				draw_node(root, &mut img, self.res, (0, 0));
				img
			}
		}
	}
}
