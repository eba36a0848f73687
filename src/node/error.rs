use thiserror::Error;

/// Reason why a raster couldn't be turned into a quadtree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyzeError {
	/// The requested resolution is zero or not a power of two.
	#[error("resolution {0} is not a power of two")]
	NonPowerOfTwo(u32),
	/// The raster does not cover the requested `resolution` square.
	#[error("{width}x{height} raster is too small for resolution {resolution}")]
	RasterTooSmall {
		resolution: u32,
		width: u32,
		height: u32,
	},
}

/// Reason why no pruning tolerance could be found.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PruneError {
	/// A non-empty tree always keeps at least one leaf.
	#[error("a non-empty tree cannot be pruned to zero leaves")]
	UnreachableLeafCount,
}

/// Reason why a QTI encoding couldn't be decoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
	/// There was no valid QTI file header.
	#[error("missing QTI header")]
	MissingHeader,
	/// A node was expected but not found.
	#[error("not enough node data")]
	InsufficientData,
	/// The stored resolution is not a power of two.
	#[error("stored resolution {0} is not a power of two")]
	InvalidResolution(u32),
	/// The stored resolution is larger than `qti::MAX_RESOLUTION`.
	#[error("stored resolution {0} is too large to render")]
	ResolutionTooLarge(u32),
	/// A branch node was found at single-pixel resolution.
	#[error("tree is deeper than its resolution allows")]
	TooDeep,
}
