use image::error::ImageError;

use quadtree_img::Quadtree;
use quadtree_img::error::AnalyzeError;

use std::fs::File;

use std::io::{Read, Write};

/// Helper function for `main`.
fn error_exit(msg: &str, code: i32) -> ! {
	eprintln!("{}", msg);
	std::process::exit(code)
}

/// Parses an optional numeric argument.
fn numeric_arg<T: std::str::FromStr>(matches: &clap::ArgMatches, name: &str) -> Option<T> {
	matches.value_of(name).map(|v| match v.parse() {
		Ok(n) => n,
		Err(_) => error_exit(&format!("Non-numeric value for {}", name), 2)
	})
}

/// Largest power of two that fits in both dimensions, if any.
fn fitting_resolution(width: u32, height: u32) -> Option<u32> {
	match std::cmp::min(width, height) {
		0 => None,
		side => Some(1 << (31 - side.leading_zeros()))
	}
}

/// Output path next to `input_path`. The `.pruned` infix keeps it from
/// ever naming the input itself.
fn default_output_path(input_path: &str, as_qti: bool) -> String {
	std::path::Path::new(input_path)
		.with_extension(if as_qti { "pruned.qti" } else { "pruned.png" })
		.to_string_lossy()
		.into_owned()
}

fn load_image(input_path: &str, resolution: Option<u32>) -> Quadtree {
	let source = match image::open(input_path) {
		Ok(i) => i,
		Err(e) => {
			let (msg, code) = match e {
				ImageError::Decoding(_) | ImageError::Unsupported(_) => ("Invalid image data", 4),
				ImageError::IoError(_) => ("File not found or could not be read", 3),
				_ => ("An error occurred", 10)
			};
			error_exit(msg, code)
		}
	}.into_rgba8();
	let fitting = match fitting_resolution(source.width(), source.height()) {
		Some(r) => r,
		None => error_exit("Input image is empty", 4)
	};
	let resolution = resolution.unwrap_or(fitting);
	log::info!("{}x{} image, building at resolution {}", source.width(), source.height(), resolution);
	match Quadtree::from_raster(&source, resolution) {
		Ok(tree) => tree,
		Err(AnalyzeError::NonPowerOfTwo(_)) => error_exit("Resolution must be a power of two", 2),
		Err(AnalyzeError::RasterTooSmall { .. }) => error_exit("Resolution exceeds image dimensions", 2),
	}
}

fn load_qti(input_path: &str) -> Quadtree {
	let mut source_data = Vec::new();
	let mut source_fh = match File::open(input_path) {
		Ok(f) => f,
		Err(_) => error_exit("File not found or could not be read", 3)
	};
	match source_fh.read_to_end(&mut source_data) {
		Ok(_) => (),
		Err(_) => error_exit("Could not read from input file", 3)
	}
	match Quadtree::from_qti(&source_data) {
		Ok(t) => t,
		Err(_) => error_exit("Invalid image data", 4)
	}
}

/// `clap`-based CLI for building, pruning and rotating image quadtrees.
///
/// May exit process with status code if there are errors:
///
/// 1: `clap` error
///
/// 2: invalid arguments
///
/// 3: file I/O issues
///
/// 4: invalid image data
///
/// 10: other, potentially unknown error
fn main() {
	let clap_matches = clap::App::new("quadtree_img")
		.version(env!("CARGO_PKG_VERSION"))
		.author("vkcz")
		.about("Compresses square images by pruning their quadtree representation.")
		.arg_from_usage("-f, --from 'Read the input file as QTI instead of an image'")
		.arg_from_usage("-q, --qti 'Write QTI instead of PNG'")
		.arg_from_usage("-r, --resolution=[N] 'Side of the top-left square to build from (image input only); must be a power of two; defaults to the largest that fits'")
		.arg_from_usage("-t, --tolerance=[N] 'Prune with this color distance tolerance'")
		.arg_from_usage("-l, --leaves=[N] 'Prune with the smallest tolerance leaving at most N leaves'")
		.arg_from_usage("-c, --rotate=[N] 'Number of clockwise quarter turns; defaults to 0'")
		.arg_from_usage("-p, --print 'Print the leaves of the tree to standard output'")
		.arg_from_usage("-v, --verbose 'Log debugging information'")
		.arg_from_usage("<INPUT> 'Path to input file'")
		.arg_from_usage("[OUTPUT] 'Path to output file; defaults to INPUT with the extension replaced by .pruned.png or .pruned.qti'")
		.get_matches();

	env_logger::Builder::from_env(
		env_logger::Env::default()
			.default_filter_or(if clap_matches.is_present("verbose") { "debug" } else { "info" })
	)
	.format_timestamp(None)
	.init();

	let input_path = match clap_matches.value_of("INPUT") {
		Some(p) => p,
		None => error_exit("Missing input file", 1)
	};
	let resolution = numeric_arg::<u32>(&clap_matches, "resolution");
	let tolerance = numeric_arg::<u32>(&clap_matches, "tolerance");
	let leaves = numeric_arg::<usize>(&clap_matches, "leaves");
	let rotations = numeric_arg::<usize>(&clap_matches, "rotate").unwrap_or(0);

	let mut tree = if clap_matches.is_present("from") {
		if resolution.is_some() {
			error_exit("-r/--resolution only applies to image input", 2);
		}
		load_qti(input_path)
	} else {
		load_image(input_path, resolution)
	};
	log::info!("{} leaves before pruning", tree.leaf_count());

	let tolerance = match (tolerance, leaves) {
		(Some(_), Some(_)) => error_exit("Only one of -t/--tolerance and -l/--leaves may be present", 2),
		(Some(t), None) => Some(t),
		(None, Some(n)) => match tree.ideal_prune(n) {
			Ok(t) => Some(t),
			Err(e) => error_exit(&e.to_string(), 2)
		},
		(None, None) => None
	};
	if let Some(t) = tolerance {
		tree.prune(t);
		log::info!("{} leaves after pruning at tolerance {}", tree.leaf_count(), t);
	}

	for _ in 0..rotations % 4 {
		tree.clockwise_rotate();
	}

	if clap_matches.is_present("print") {
		let stdout = std::io::stdout();
		if tree.print_tree(&mut stdout.lock(), false).is_err() {
			error_exit("Could not write to standard output", 3);
		}
	}

	let as_qti = clap_matches.is_present("qti");
	let output_path = clap_matches.value_of("OUTPUT")
		.map(str::to_string)
		.unwrap_or_else(|| default_output_path(input_path, as_qti));
	if as_qti {
		let mut out_fh = match File::create(&output_path) {
			Ok(f) => f,
			Err(_) => error_exit("Could not open output file", 3)
		};
		match out_fh.write_all(&tree.to_qti()) {
			Ok(_) => (),
			Err(_) => error_exit("Could not write to output file", 3)
		}
	} else {
		if tree.is_empty() {
			error_exit("Cannot save an empty image", 4);
		}
		let output: image::RgbaImage = tree.decompress();
		match output.save(&output_path) {
			Ok(_) => (),
			Err(_) => error_exit("Could not save output", 3)
		}
	}
	log::info!("wrote {}", output_path);
}
