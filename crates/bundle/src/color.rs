//! Hex color specifications used by theme and preference settings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: u8,
}

impl Color {
	/// Fully transparent black, the fallback for malformed specifications.
	pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
	pub const BLACK: Color = Color::rgb(0, 0, 0);
	pub const WHITE: Color = Color::rgb(255, 255, 255);

	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 255 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self { r, g, b, a }
	}

	/// Parses `RGB`, `RGBA`, `RRGGBB` or `RRGGBBAA` with an optional leading `#`.
	///
	/// Returns `None` for anything else.
	pub fn parse_hex(value: &str) -> Option<Self> {
		let hex = value.trim();
		let hex = hex.strip_prefix('#').unwrap_or(hex);
		if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
			return None;
		}

		let short = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
		let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

		match hex.len() {
			3 => Some(Self::rgb(short(0)?, short(1)?, short(2)?)),
			4 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
			6 => Some(Self::rgb(long(0)?, long(2)?, long(4)?)),
			8 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
			_ => None,
		}
	}

	/// Like [`Color::parse_hex`] but never fails: malformed input yields
	/// [`Color::TRANSPARENT`].
	pub fn from_hex(value: &str) -> Self {
		Self::parse_hex(value).unwrap_or_else(|| {
			tracing::debug!(value, "malformed color, using transparent");
			Self::TRANSPARENT
		})
	}

	pub fn is_opaque(&self) -> bool {
		self.a == 255
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
		if !self.is_opaque() {
			write!(f, "{:02X}", self.a)?;
		}
		Ok(())
	}
}
