use std::fmt;

/// A single RGBA color with 8 bits per channel.
///
/// The default pixel is all zeroes, including alpha; this is also what
/// point queries outside of a tree return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
	pub red: u8,
	pub green: u8,
	pub blue: u8,
	pub alpha: u8,
}

fn abs_sub(a: u8, b: u8) -> u32 {
	(a as i16 - b as i16).abs() as u32
}

fn vec3_len_squared(a: u32, b: u32, c: u32) -> u32 {
	a * a + b * b + c * c
}

fn channel_avg(a: u8, b: u8, c: u8, d: u8) -> u8 {
	((a as u16 + b as u16 + c as u16 + d as u16) / 4) as u8
}

impl Pixel {
	pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
		Pixel { red, green, blue, alpha }
	}

	/// An opaque pixel of the given color.
	pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
		Pixel { red, green, blue, alpha: 255 }
	}

	/// Squared color distance between two pixels.
	///
	/// Alpha is carried by pixels but does not count towards the distance.
	/// The result is at most `3 * 255 * 255`.
	pub fn distance(&self, other: &Pixel) -> u32 {
		vec3_len_squared(
			abs_sub(self.red, other.red),
			abs_sub(self.green, other.green),
			abs_sub(self.blue, other.blue),
		)
	}

	/// Truncating per-channel mean of four pixels.
	pub fn average_of(pixels: &[Pixel; 4]) -> Pixel {
		let [a, b, c, d] = pixels;
		Pixel {
			red: channel_avg(a.red, b.red, c.red, d.red),
			green: channel_avg(a.green, b.green, c.green, d.green),
			blue: channel_avg(a.blue, b.blue, c.blue, d.blue),
			alpha: channel_avg(a.alpha, b.alpha, c.alpha, d.alpha),
		}
	}
}

impl From<image::Rgba<u8>> for Pixel {
	fn from(c: image::Rgba<u8>) -> Self {
		Pixel::new(c.0[0], c.0[1], c.0[2], c.0[3])
	}
}

impl From<Pixel> for image::Rgba<u8> {
	fn from(p: Pixel) -> Self {
		image::Rgba([p.red, p.green, p.blue, p.alpha])
	}
}

impl fmt::Display for Pixel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({},{},{})", self.red, self.green, self.blue)?;
		if self.alpha != 255 {
			write!(f, " a:{}", self.alpha)?;
		}
		Ok(())
	}
}
