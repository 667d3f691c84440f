//! Pure translation of simulation state into drawable primitives.
//!
//! `Scene::build` reads the current node/link state and produces value
//! types only, so building twice from unchanged state yields an identical
//! scene. Canvas painting lives in `render`; nothing here touches the DOM.

use super::model::{Graph, Node};
use super::palette::{Color, GraphPalettes};

/// Names longer than this are truncated in labels.
const LABEL_MAX_CHARS: usize = 20;
/// Truncated labels keep this many characters before the ellipsis.
const LABEL_KEEP_CHARS: usize = 18;

/// One line per retained link.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeShape {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
	/// Stroke width; grows with sqrt(mentions), never below 1.
	pub width: f64,
	/// Stroke color keyed by relationship type.
	pub color: Color,
}

/// One circle per node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeShape {
	pub x: f64,
	pub y: f64,
	/// Radius per the mention-count rule.
	pub radius: f64,
	/// Fill color keyed by entity type.
	pub fill: Color,
}

/// A text label next to a high-mention node.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelShape {
	pub x: f64,
	pub y: f64,
	pub text: String,
}

/// One legend row per distinct entity type.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
	pub kind: String,
	pub swatch: Color,
}

/// A complete drawable frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	pub edges: Vec<EdgeShape>,
	pub nodes: Vec<NodeShape>,
	pub labels: Vec<LabelShape>,
	/// Distinct entity types present, sorted, with node-palette swatches.
	pub legend: Vec<LegendEntry>,
}

impl Scene {
	/// Builds the frame for the graph's current positions.
	pub fn build(graph: &Graph, palettes: &GraphPalettes) -> Self {
		let edges = graph
			.links
			.iter()
			.map(|link| {
				let s = &graph.nodes[link.source];
				let t = &graph.nodes[link.target];
				EdgeShape {
					x1: s.x,
					y1: s.y,
					x2: t.x,
					y2: t.y,
					width: f64::from(link.mentions).sqrt().max(1.0),
					color: palettes.links.color(&link.kind),
				}
			})
			.collect();

		let nodes = graph
			.nodes
			.iter()
			.map(|node| NodeShape {
				x: node.x,
				y: node.y,
				radius: node.radius(),
				fill: palettes.nodes.color(&node.kind),
			})
			.collect();

		let labels = graph
			.nodes
			.iter()
			.filter(|node| node.mentions >= graph.label_threshold)
			.map(|node| LabelShape {
				x: node.x + node.radius() + 4.0,
				y: node.y + 3.0,
				text: truncate_label(&node.name),
			})
			.collect();

		let legend = palettes
			.nodes
			.entries()
			.into_iter()
			.map(|(kind, swatch)| LegendEntry { kind, swatch })
			.collect();

		Self {
			edges,
			nodes,
			labels,
			legend,
		}
	}
}

/// Plain-text hover tooltip for a node.
pub fn tooltip(node: &Node) -> String {
	format!("{} ({}, {} mentions)", node.name, node.kind, node.mentions)
}

/// Bounds label width: long names are cut at 18 characters plus an
/// ellipsis marker.
fn truncate_label(name: &str) -> String {
	if name.chars().count() > LABEL_MAX_CHARS {
		let mut label: String = name.chars().take(LABEL_KEEP_CHARS).collect();
		label.push('…');
		label
	} else {
		name.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::entity_graph::model::build;
	use crate::components::entity_graph::types::{Entity, Relationship};

	fn sample_graph() -> Graph {
		let entities = vec![
			Entity {
				name: "Acme".into(),
				kind: "company".into(),
				mentions: 9,
			},
			Entity {
				name: "widget".into(),
				kind: "product".into(),
				mentions: 1,
			},
			Entity {
				name: "gadget".into(),
				kind: "product".into(),
				mentions: 1,
			},
		];
		let relationships = vec![
			Relationship {
				from: "Acme".into(),
				to: "widget".into(),
				kind: "produces".into(),
				mentions: 4,
			},
			Relationship {
				from: "Acme".into(),
				to: "gadget".into(),
				kind: "produces".into(),
				mentions: 1,
			},
		];
		let mut graph = build(&entities, &relationships);
		// Spread nodes so shapes have distinct positions.
		for (i, node) in graph.nodes.iter_mut().enumerate() {
			node.x = 100.0 * i as f64;
			node.y = 50.0 * i as f64;
		}
		graph
	}

	#[test]
	fn building_twice_from_unchanged_state_is_identical() {
		let graph = sample_graph();
		let palettes = GraphPalettes::new(&graph);
		assert_eq!(
			Scene::build(&graph, &palettes),
			Scene::build(&graph, &palettes)
		);
	}

	#[test]
	fn edge_width_has_floor_of_one() {
		let graph = sample_graph();
		let scene = Scene::build(&graph, &GraphPalettes::new(&graph));
		assert_eq!(scene.edges[0].width, 2.0);
		assert_eq!(scene.edges[1].width, 1.0);
	}

	#[test]
	fn only_high_mention_nodes_get_labels() {
		let graph = sample_graph();
		// Threshold for mentions [1, 1, 9] at the 70th percentile is 9.
		assert_eq!(graph.label_threshold, 9);
		let scene = Scene::build(&graph, &GraphPalettes::new(&graph));
		assert_eq!(scene.labels.len(), 1);
		assert_eq!(scene.labels[0].text, "Acme");
	}

	#[test]
	fn long_names_truncate_at_eighteen_chars() {
		assert_eq!(truncate_label("a"), "a");
		let twenty = "x".repeat(20);
		assert_eq!(truncate_label(&twenty), twenty);
		let twenty_one = "y".repeat(21);
		assert_eq!(truncate_label(&twenty_one), format!("{}…", "y".repeat(18)));
	}

	#[test]
	fn legend_lists_sorted_distinct_entity_types() {
		let graph = sample_graph();
		let scene = Scene::build(&graph, &GraphPalettes::new(&graph));
		let kinds: Vec<&str> = scene.legend.iter().map(|e| e.kind.as_str()).collect();
		assert_eq!(kinds, ["company", "product"]);
	}

	#[test]
	fn node_shapes_share_link_endpoint_positions() {
		let graph = sample_graph();
		let scene = Scene::build(&graph, &GraphPalettes::new(&graph));
		assert_eq!(scene.edges[0].x1, scene.nodes[0].x);
		assert_eq!(scene.edges[0].x2, scene.nodes[1].x);
	}

	#[test]
	fn tooltip_format() {
		let graph = sample_graph();
		assert_eq!(tooltip(&graph.nodes[0]), "Acme (company, 9 mentions)");
	}
}
