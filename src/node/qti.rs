use bitvec::vec::BitVec;

use super::error::DecodeError;
use super::{Pixel, Quadtree, QuadtreeNode};

/// A `BitVec` variant ideal for encoding and decoding quadtrees.
type QuadtreeEncodeBitVec = BitVec<bitvec::order::Msb0, u8>;

const MAGIC: &[u8; 6] = b"QTRGBA";
const VERSION: u8 = 1;
const HEADER_LEN: usize = 11;

/// Largest resolution accepted when decoding; a rendered image of this
/// side takes 4 GiB.
pub const MAX_RESOLUTION: u32 = 1 << 15;

impl QuadtreeNode {
	/// Appends this node and its sections to `buffer` in preorder.
	///
	/// Each node is a bit to indicate subsections, followed by its red,
	/// green, blue and alpha channels as bitwise big-endian bytes.
	pub fn encode(&self, buffer: &mut QuadtreeEncodeBitVec) {
		// Bit to indicate subsections
		buffer.push(self.has_children());
		let c = self.color();
		for &channel in &[c.red, c.green, c.blue, c.alpha] {
			for bit_ind in 0..8 {
				buffer.push(channel & (0x80 >> bit_ind) != 0);
			}
		}
		// Recursion
		if let Some(sects) = self.sections() {
			for section in sects.iter() {
				section.encode(buffer);
			}
		}
	}

	/// Reads a node of the sort written by `.encode()`, starting at bit
	/// `curr_ind` of a region of side `size`.
	///
	/// Successful return value is the node and the index to which the
	/// parser has progressed.
	pub fn decode(
		buffer: &QuadtreeEncodeBitVec,
		size: u32,
		mut curr_ind: usize
	) -> Result<(QuadtreeNode, usize), DecodeError> {
		// Validate data quantity
		if buffer.len() < curr_ind + 33 {
			return Err(DecodeError::InsufficientData);
		}
		let mut channels = [0u8; 4];
		for (ch_ind, channel) in channels.iter_mut().enumerate() {
			for bit_ind in 0..8 {
				*channel = (*channel << 1) | buffer[curr_ind + 1 + ch_ind * 8 + bit_ind] as u8;
			}
		}
		let color = Pixel::new(channels[0], channels[1], channels[2], channels[3]);
		let should_recurse = buffer[curr_ind];
		curr_ind += 33;
		if !should_recurse {
			return Ok((QuadtreeNode::Leaf(color), curr_ind));
		}
		if size < 2 {
			return Err(DecodeError::TooDeep);
		}
		// Recursion
		let mut section = || -> Result<QuadtreeNode, DecodeError> {
			let (node, next_ind) = QuadtreeNode::decode(buffer, size / 2, curr_ind)?;
			curr_ind = next_ind;
			Ok(node)
		};
		let sects = [section()?, section()?, section()?, section()?];
		// The stored color is kept, so pruned averages survive a round trip
		Ok((QuadtreeNode::Branch(color, Box::new(sects)), curr_ind))
	}
}

impl Quadtree {
	/// Encodes the quadtree into QTI data with direct RGBA colors.
	pub fn to_qti(&self) -> Vec<u8> {
		let mut ret = Vec::new();
		// Header (version 1)
		ret.extend_from_slice(MAGIC);
		ret.push(VERSION);
		ret.extend_from_slice(&self.res.to_be_bytes());
		// Quadtree
		if let Some(root) = &self.root {
			let mut bit_buf = QuadtreeEncodeBitVec::new();
			root.encode(&mut bit_buf);
			ret.extend_from_slice(bit_buf.as_slice());
		}
		ret
	}

	/// Derives a quadtree from the data of a QTI file.
	pub fn from_qti(source: &[u8]) -> Result<Quadtree, DecodeError> {
		// Verify header
		if source.len() < HEADER_LEN || &source[..6] != MAGIC || source[6] != VERSION {
			return Err(DecodeError::MissingHeader);
		}
		let res = u32::from_be_bytes([source[7], source[8], source[9], source[10]]);
		if res == 0 {
			return Ok(Quadtree::new());
		}
		if !res.is_power_of_two() {
			return Err(DecodeError::InvalidResolution(res));
		}
		if res > MAX_RESOLUTION {
			return Err(DecodeError::ResolutionTooLarge(res));
		}
		// Decode tree
		let tree_bits = QuadtreeEncodeBitVec::from(&source[HEADER_LEN..]);
		let (root, _) = QuadtreeNode::decode(&tree_bits, res, 0)?;
		Ok(Quadtree { root: Some(root), res })
	}
}
