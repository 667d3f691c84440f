//! Categorical color palettes keyed by entity and relationship type.
//!
//! Colors are assigned by sorted distinct type name, so a given type keeps
//! its color across ticks and across rebuilds of the same type set.

use std::collections::HashMap;

use super::model::Graph;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	/// Opaque color from RGB components.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// CSS string: `#rrggbb` when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Fallback for types not seen at palette construction.
const FALLBACK: Color = Color::rgb(128, 128, 128);

/// Node fill palette: muted slate blues and teals.
fn node_colors() -> Vec<Color> {
	vec![
		Color::rgb(94, 129, 172),  // Steel blue
		Color::rgb(100, 148, 160), // Teal gray
		Color::rgb(129, 161, 193), // Light steel
		Color::rgb(108, 142, 173), // Air force blue
		Color::rgb(119, 158, 165), // Desaturated cyan
		Color::rgb(136, 160, 175), // Cadet blue
		Color::rgb(143, 163, 180), // Cool gray
		Color::rgb(122, 153, 168), // Dusty blue
	]
}

/// Link stroke palette: warm muted tones, visually independent of the
/// node palette.
fn link_colors() -> Vec<Color> {
	vec![
		Color::rgb(180, 120, 100), // Terracotta
		Color::rgb(185, 145, 110), // Amber
		Color::rgb(170, 130, 95),  // Sienna
		Color::rgb(160, 135, 100), // Ochre
		Color::rgb(175, 125, 105), // Clay
		Color::rgb(170, 140, 115), // Copper
		Color::rgb(165, 115, 90),  // Rust
		Color::rgb(155, 120, 95),  // Chestnut
	]
}

/// Stable mapping from type name to palette color.
#[derive(Clone, Debug)]
pub struct TypePalette {
	colors: Vec<Color>,
	index: HashMap<String, usize>,
}

impl TypePalette {
	fn assign<'a>(kinds: impl Iterator<Item = &'a str>, colors: Vec<Color>) -> Self {
		let mut distinct: Vec<&str> = kinds.collect();
		distinct.sort_unstable();
		distinct.dedup();

		let index = distinct
			.into_iter()
			.enumerate()
			.map(|(i, kind)| (kind.to_string(), i))
			.collect();
		Self { colors, index }
	}

	/// Color for a type; gray for types unseen at construction.
	pub fn color(&self, kind: &str) -> Color {
		match self.index.get(kind) {
			Some(&i) => self.colors[i % self.colors.len()],
			None => FALLBACK,
		}
	}

	/// All known types in sorted order with their colors.
	pub fn entries(&self) -> Vec<(String, Color)> {
		let mut kinds: Vec<&String> = self.index.keys().collect();
		kinds.sort_unstable();
		kinds
			.into_iter()
			.map(|kind| (kind.clone(), self.color(kind)))
			.collect()
	}
}

/// The two independent palettes used by one graph instance.
#[derive(Clone, Debug)]
pub struct GraphPalettes {
	/// Node fill colors, keyed by entity type.
	pub nodes: TypePalette,
	/// Edge stroke colors, keyed by relationship type.
	pub links: TypePalette,
}

impl GraphPalettes {
	/// Builds both palettes from the types present in a graph.
	pub fn new(graph: &Graph) -> Self {
		Self {
			nodes: TypePalette::assign(
				graph.nodes.iter().map(|n| n.kind.as_str()),
				node_colors(),
			),
			links: TypePalette::assign(
				graph.links.iter().map(|l| l.kind.as_str()),
				link_colors(),
			),
		}
	}
}
