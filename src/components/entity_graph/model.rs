//! Graph model builder: raw entity/relationship records to simulation records.
//!
//! `build` is a pure function and the first seam where structural correctness
//! can be asserted without touching the simulation. Relationships whose
//! endpoints are not both present are silently dropped; that is an expected
//! consequence of upstream filtering, not an error.

use std::collections::HashMap;

use super::types::{Entity, Relationship};

/// A graph vertex with mutable simulation state.
///
/// `fx`/`fy`, when set, override free-body integration for that axis. They
/// are set while a drag is active and cleared on release.
#[derive(Clone, Debug)]
pub struct Node {
	/// Entity name; stable identity for the lifetime of one graph instance.
	pub name: String,
	/// Entity category.
	pub kind: String,
	/// Mention count (>= 1).
	pub mentions: u32,
	/// Position.
	pub x: f64,
	/// Position.
	pub y: f64,
	/// Velocity.
	pub vx: f64,
	/// Velocity.
	pub vy: f64,
	/// Pinned x position (drag in progress).
	pub fx: Option<f64>,
	/// Pinned y position (drag in progress).
	pub fy: Option<f64>,
}

impl Node {
	/// Effective circle radius: larger-mention nodes render and collide as
	/// bigger circles.
	pub fn radius(&self) -> f64 {
		4.0 + 3.0 * f64::from(self.mentions).sqrt()
	}

	/// Whether the node is held in place by an active drag.
	pub fn pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// A retained relationship with endpoints resolved to node arena indices.
///
/// Indices (not copies) keep node identity shared between the simulation,
/// the renderer, and the interaction layer.
#[derive(Clone, Debug)]
pub struct Link {
	/// Arena index of the source node.
	pub source: usize,
	/// Arena index of the target node.
	pub target: usize,
	/// Relationship category.
	pub kind: String,
	/// Mention count (>= 1).
	pub mentions: u32,
}

/// Node arena plus resolved links for one graph instance.
///
/// Rebuilding the graph (new filter, new dataset) discards and recreates
/// everything; there is no incremental re-layout.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	/// All nodes, in input order.
	pub nodes: Vec<Node>,
	/// Retained links, in input order.
	pub links: Vec<Link>,
	/// Mention count at the 70th percentile; nodes at or above it get a
	/// text label. Computed once per build, not per tick.
	pub label_threshold: u32,
}

/// Converts entity/relationship records into a node arena and resolved links.
///
/// A relationship is included iff both `from` and `to` name a loaded entity
/// (exact, case-sensitive match). Output order follows input order. If a
/// name somehow appears twice, links bind to its first occurrence.
pub fn build(entities: &[Entity], relationships: &[Relationship]) -> Graph {
	let nodes: Vec<Node> = entities
		.iter()
		.map(|e| Node {
			name: e.name.clone(),
			kind: e.kind.clone(),
			mentions: e.mentions,
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		})
		.collect();

	let mut index: HashMap<&str, usize> = HashMap::new();
	for (i, node) in nodes.iter().enumerate() {
		index.entry(node.name.as_str()).or_insert(i);
	}

	let links: Vec<Link> = relationships
		.iter()
		.filter_map(|r| {
			if let (Some(&source), Some(&target)) =
				(index.get(r.from.as_str()), index.get(r.to.as_str()))
			{
				Some(Link {
					source,
					target,
					kind: r.kind.clone(),
					mentions: r.mentions,
				})
			} else {
				None
			}
		})
		.collect();

	let label_threshold = percentile_70(&nodes);

	Graph {
		nodes,
		links,
		label_threshold,
	}
}

/// Nearest-rank 70th percentile of node mention counts.
fn percentile_70(nodes: &[Node]) -> u32 {
	if nodes.is_empty() {
		return 0;
	}
	let mut mentions: Vec<u32> = nodes.iter().map(|n| n.mentions).collect();
	mentions.sort_unstable();
	let rank = (nodes.len() as f64 * 0.7).ceil() as usize;
	mentions[rank.clamp(1, nodes.len()) - 1]
}
