//! Canvas painting for the entity graph scene.
//!
//! Draws in passes for correct z-ordering: background, then edges, nodes,
//! and labels in world space under the viewport transform, then the legend
//! panel in screen space. Painting is a pure function of the scene and
//! transform; repeated calls with the same inputs draw the same frame.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::palette::Color;
use super::scene::Scene;
use super::state::ViewTransform;

const BACKGROUND: Color = Color::rgb(22, 27, 34);
const OUTLINE: Color = Color::rgb(255, 255, 255);
const LABEL_COLOR: &str = "rgba(255, 255, 255, 0.85)";
const LABEL_FONT: &str = "11px sans-serif";

const LEGEND_PADDING: f64 = 12.0;
const LEGEND_ROW_HEIGHT: f64 = 18.0;
const LEGEND_SWATCH: f64 = 10.0;
const LEGEND_WIDTH: f64 = 160.0;

/// Paints one frame.
pub fn render(
	scene: &Scene,
	ctx: &CanvasRenderingContext2d,
	transform: &ViewTransform,
	width: f64,
	height: f64,
) {
	ctx.set_fill_style_str(&BACKGROUND.to_css());
	ctx.fill_rect(0.0, 0.0, width, height);

	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);

	for edge in &scene.edges {
		ctx.set_stroke_style_str(&edge.color.to_css());
		ctx.set_line_width(edge.width);
		ctx.begin_path();
		ctx.move_to(edge.x1, edge.y1);
		ctx.line_to(edge.x2, edge.y2);
		ctx.stroke();
	}

	for node in &scene.nodes {
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.fill.to_css());
		ctx.fill();
		ctx.set_stroke_style_str(&OUTLINE.to_css());
		ctx.set_line_width(1.5 / transform.k);
		ctx.stroke();
	}

	ctx.set_fill_style_str(LABEL_COLOR);
	ctx.set_font(LABEL_FONT);
	for label in &scene.labels {
		let _ = ctx.fill_text(&label.text, label.x, label.y);
	}

	ctx.restore();

	draw_legend(scene, ctx);
}

// Fixed panel in the top-left corner, unaffected by pan/zoom.
fn draw_legend(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	if scene.legend.is_empty() {
		return;
	}

	let panel_height = LEGEND_PADDING * 2.0 + scene.legend.len() as f64 * LEGEND_ROW_HEIGHT;
	ctx.set_fill_style_str("rgba(22, 27, 34, 0.8)");
	ctx.fill_rect(LEGEND_PADDING, LEGEND_PADDING, LEGEND_WIDTH, panel_height);

	ctx.set_font(LABEL_FONT);
	for (i, entry) in scene.legend.iter().enumerate() {
		let row_y = LEGEND_PADDING * 2.0 + i as f64 * LEGEND_ROW_HEIGHT;
		ctx.set_fill_style_str(&entry.swatch.to_css());
		ctx.fill_rect(LEGEND_PADDING * 2.0, row_y, LEGEND_SWATCH, LEGEND_SWATCH);
		ctx.set_fill_style_str(LABEL_COLOR);
		let _ = ctx.fill_text(
			&entry.kind,
			LEGEND_PADDING * 2.0 + LEGEND_SWATCH + 8.0,
			row_y + LEGEND_SWATCH - 1.0,
		);
	}
}
