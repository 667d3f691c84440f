//! Graph interaction state: viewport transform, drag/pan tracking, hit
//! testing, and the glue that ties one simulation instance to one canvas.

use super::model::build;
use super::palette::GraphPalettes;
use super::scene::tooltip;
use super::simulation::{Simulation, SimulationParams};
use super::types::GraphData;

/// Minimum zoom factor.
pub const SCALE_MIN: f64 = 0.3;
/// Maximum zoom factor.
pub const SCALE_MAX: f64 = 5.0;

/// Pointer travel (screen px) below which a press-release counts as a
/// click rather than a drag.
pub const CLICK_TOLERANCE: f64 = 3.0;

/// Pan and zoom transform applied to the whole scene at render time.
/// Never mutates node coordinates.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor, clamped to `[SCALE_MIN, SCALE_MAX]`.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Scales around a screen-space anchor so the point under the cursor
	/// stays put.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(SCALE_MIN, SCALE_MAX);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}

	/// Screen coordinates to graph (simulation) coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}
}

/// Tracks an in-progress node drag (or pending click).
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<usize>,
	/// Accumulated pointer travel, for click-vs-drag discrimination.
	pub travel: f64,
	pub last_x: f64,
	pub last_y: f64,
}

/// Tracks an in-progress canvas pan.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// One live graph instance: simulation, palettes, viewport, and gesture
/// state. Created per dataset; replaced wholesale when the input changes.
pub struct GraphState {
	/// The simulation engine; sole owner of node positions.
	pub sim: Simulation,
	/// Color palettes fixed at build time.
	pub palettes: GraphPalettes,
	/// Pan/zoom transform, applied only at render time.
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
}

impl GraphState {
	/// Builds the model and starts a simulation. Returns `None` for an
	/// empty entity set: the host shows an empty-state message instead,
	/// and no simulation must be initialized.
	pub fn new(data: &GraphData, width: f64, height: f64) -> Option<Self> {
		if data.entities.is_empty() {
			return None;
		}
		let graph = build(&data.entities, &data.relationships);
		let palettes = GraphPalettes::new(&graph);
		let sim = Simulation::new(graph, SimulationParams::default(), width, height);

		Some(Self {
			sim,
			palettes,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
		})
	}

	/// Topmost node under a screen position, by rendered radius.
	/// Later nodes draw on top, so the last hit wins. The 2 px slop is
	/// divided by the zoom factor so the affordance stays constant in
	/// screen pixels.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);
		let mut found = None;
		for (i, node) in self.sim.graph.nodes.iter().enumerate() {
			let dx = node.x - gx;
			let dy = node.y - gy;
			let hit = node.radius() + 2.0 / self.transform.k;
			if dx * dx + dy * dy <= hit * hit {
				found = Some(i);
			}
		}
		found
	}

	/// Begins dragging a node from a screen position: pins it where it
	/// sits and reheats the layout.
	pub fn begin_drag(&mut self, idx: usize, sx: f64, sy: f64) {
		self.drag.active = true;
		self.drag.node = Some(idx);
		self.drag.travel = 0.0;
		self.drag.last_x = sx;
		self.drag.last_y = sy;
		let (nx, ny) = (self.sim.graph.nodes[idx].x, self.sim.graph.nodes[idx].y);
		self.sim.pin(idx, nx, ny);
		self.sim.reheat();
	}

	/// Advances an active drag: accumulates pointer travel and pins the
	/// node to the pointer. A no-op when no drag is active.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		if !self.drag.active {
			return;
		}
		let Some(idx) = self.drag.node else {
			return;
		};
		self.drag.travel += (sx - self.drag.last_x).hypot(sy - self.drag.last_y);
		self.drag.last_x = sx;
		self.drag.last_y = sy;
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);
		self.sim.pin(idx, gx, gy);
	}

	/// Ends an active drag: releases the pin and lets alpha decay.
	/// Returns the node's name when the pointer never travelled beyond
	/// [`CLICK_TOLERANCE`] (a press without drag movement is a click);
	/// a release with no active drag returns `None`.
	pub fn end_drag(&mut self) -> Option<String> {
		if !self.drag.active {
			return None;
		}
		let clicked = self.drag.node.and_then(|idx| {
			self.sim.unpin(idx);
			if self.drag.travel <= CLICK_TOLERANCE {
				Some(self.sim.graph.nodes[idx].name.clone())
			} else {
				None
			}
		});
		self.sim.cool();
		self.drag.active = false;
		self.drag.node = None;
		clicked
	}

	/// Tooltip text for the node under a screen position, if any.
	pub fn tooltip_at(&self, sx: f64, sy: f64) -> Option<String> {
		self.node_at_position(sx, sy)
			.map(|i| tooltip(&self.sim.graph.nodes[i]))
	}

	/// Updates canvas dimensions after a window resize.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::entity_graph::types::{Entity, Relationship};

	fn data() -> GraphData {
		GraphData {
			entities: vec![
				Entity {
					name: "A".into(),
					kind: "X".into(),
					mentions: 5,
				},
				Entity {
					name: "B".into(),
					kind: "Y".into(),
					mentions: 1,
				},
			],
			relationships: vec![Relationship {
				from: "A".into(),
				to: "B".into(),
				kind: "rel".into(),
				mentions: 2,
			}],
		}
	}

	#[test]
	fn empty_entity_set_initializes_no_simulation() {
		let empty = GraphData::default();
		assert!(GraphState::new(&empty, 800.0, 600.0).is_none());
	}

	#[test]
	fn zoom_is_clamped_at_both_ends() {
		let mut t = ViewTransform::default();
		for _ in 0..100 {
			t.zoom_at(400.0, 300.0, 1.1);
		}
		assert_eq!(t.k, SCALE_MAX);

		for _ in 0..200 {
			t.zoom_at(400.0, 300.0, 0.9);
		}
		assert_eq!(t.k, SCALE_MIN);
	}

	#[test]
	fn zoom_keeps_the_anchor_point_fixed() {
		let mut t = ViewTransform {
			x: 40.0,
			y: -25.0,
			k: 1.0,
		};
		let before = t.screen_to_graph(200.0, 150.0);
		t.zoom_at(200.0, 150.0, 1.5);
		let after = t.screen_to_graph(200.0, 150.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn zoom_never_mutates_node_coordinates() {
		let mut state = GraphState::new(&data(), 800.0, 600.0).unwrap();
		let positions: Vec<(f64, f64)> =
			state.sim.graph.nodes.iter().map(|n| (n.x, n.y)).collect();
		state.transform.zoom_at(100.0, 100.0, 2.0);
		for (node, (x, y)) in state.sim.graph.nodes.iter().zip(positions) {
			assert_eq!(node.x, x);
			assert_eq!(node.y, y);
		}
	}

	#[test]
	fn hit_test_respects_rendered_radius_and_transform() {
		let mut state = GraphState::new(&data(), 800.0, 600.0).unwrap();
		state.sim.graph.nodes[0].x = 100.0;
		state.sim.graph.nodes[0].y = 100.0;
		state.sim.graph.nodes[1].x = 500.0;
		state.sim.graph.nodes[1].y = 500.0;

		// Node A: mentions 5, radius ~10.7.
		assert_eq!(state.node_at_position(100.0, 100.0), Some(0));
		assert_eq!(state.node_at_position(108.0, 100.0), Some(0));
		assert_eq!(state.node_at_position(130.0, 100.0), None);

		state.transform = ViewTransform {
			x: 50.0,
			y: 0.0,
			k: 2.0,
		};
		assert_eq!(state.node_at_position(250.0, 200.0), Some(0));
	}

	#[test]
	fn hit_slop_is_constant_in_screen_pixels() {
		let mut state = GraphState::new(&data(), 800.0, 600.0).unwrap();
		state.sim.graph.nodes[0].x = 100.0;
		state.sim.graph.nodes[0].y = 100.0;
		state.sim.graph.nodes[1].x = 900.0;
		state.sim.graph.nodes[1].y = 900.0;
		state.transform = ViewTransform {
			x: 0.0,
			y: 0.0,
			k: 5.0,
		};

		// At max zoom the node edge sits at screen x = 500 + 5r; the
		// click affordance extends 2 screen px past it, no more.
		let edge = 500.0 + 5.0 * state.sim.graph.nodes[0].radius();
		assert_eq!(state.node_at_position(edge + 1.9, 500.0), Some(0));
		assert_eq!(state.node_at_position(edge + 2.1, 500.0), None);
	}

	#[test]
	fn press_without_movement_dispatches_click_once() {
		let mut state = GraphState::new(&data(), 800.0, 600.0).unwrap();
		state.sim.graph.nodes[0].x = 100.0;
		state.sim.graph.nodes[0].y = 100.0;
		state.sim.graph.nodes[1].x = 500.0;
		state.sim.graph.nodes[1].y = 500.0;

		let idx = state.node_at_position(100.0, 100.0).unwrap();
		state.begin_drag(idx, 100.0, 100.0);
		assert!(state.sim.graph.nodes[idx].pinned());

		assert_eq!(state.end_drag().as_deref(), Some("A"));
		assert!(!state.sim.graph.nodes[idx].pinned());

		// A second release without a new press dispatches nothing.
		assert_eq!(state.end_drag(), None);
	}

	#[test]
	fn jitter_within_click_tolerance_still_clicks() {
		let mut state = GraphState::new(&data(), 800.0, 600.0).unwrap();
		state.sim.graph.nodes[0].x = 100.0;
		state.sim.graph.nodes[0].y = 100.0;
		state.sim.graph.nodes[1].x = 500.0;
		state.sim.graph.nodes[1].y = 500.0;

		state.begin_drag(0, 100.0, 100.0);
		state.drag_to(101.0, 101.0);
		assert_eq!(state.end_drag().as_deref(), Some("A"));
	}

	#[test]
	fn movement_beyond_tolerance_is_a_drag_not_a_click() {
		let mut state = GraphState::new(&data(), 800.0, 600.0).unwrap();
		state.sim.graph.nodes[0].x = 100.0;
		state.sim.graph.nodes[0].y = 100.0;
		state.sim.graph.nodes[1].x = 500.0;
		state.sim.graph.nodes[1].y = 500.0;

		state.begin_drag(0, 100.0, 100.0);
		state.drag_to(120.0, 100.0);

		// While the drag is active the node tracks the pointer exactly.
		state.sim.tick(|_| {});
		assert_eq!(state.sim.graph.nodes[0].x, 120.0);
		assert_eq!(state.sim.graph.nodes[0].y, 100.0);

		assert_eq!(state.end_drag(), None);
		assert!(state.sim.graph.nodes[0].fx.is_none());
		assert!(!state.drag.active);
	}

	#[test]
	fn tooltip_reports_name_type_and_mentions() {
		let mut state = GraphState::new(&data(), 800.0, 600.0).unwrap();
		state.sim.graph.nodes[0].x = 100.0;
		state.sim.graph.nodes[0].y = 100.0;
		state.sim.graph.nodes[1].x = 500.0;
		state.sim.graph.nodes[1].y = 500.0;

		assert_eq!(
			state.tooltip_at(100.0, 100.0).as_deref(),
			Some("A (X, 5 mentions)")
		);
		assert_eq!(state.tooltip_at(300.0, 300.0), None);
	}
}
