//! Alpha-driven force simulation over the node arena.
//!
//! The engine owns the [`Graph`] for its lifetime and advances it one tick
//! at a time under four additive forces: link springs, Barnes-Hut charge
//! repulsion, a weak centering pull, and circle collision. A "temperature"
//! parameter (alpha) decays geometrically toward zero; while it stays above
//! `alpha_min` the engine is running, below it the layout is settled.
//! Re-raising the alpha target (a drag starting) re-enters the running
//! phase, so the lifecycle is an explicit two-state machine rather than a
//! set of flags.
//!
//! The engine never touches rendering; it is fully headless and drives its
//! observer with a synchronous callback once per tick.

use super::model::Graph;
use super::quadtree::{PointMass, Quadtree};

/// Tuning knobs for the force field and the alpha lifecycle.
#[derive(Clone, Debug)]
pub struct SimulationParams {
	/// Target separation for connected node pairs, in layout units.
	pub link_distance: f64,
	/// Repulsion strength applied by every node; negative repels.
	pub charge_strength: f64,
	/// Barnes-Hut opening angle. Larger is faster but less accurate.
	pub theta: f64,
	/// Fraction of the centroid-to-center offset applied per tick.
	pub center_strength: f64,
	/// Extra clearance added to combined radii during collision.
	pub collide_padding: f64,
	/// Fraction of each overlap corrected per tick.
	pub collide_strength: f64,
	/// Fraction of velocity lost per tick (friction).
	pub velocity_decay: f64,
	/// Alpha below which the layout counts as settled.
	pub alpha_min: f64,
	/// Geometric decay rate moving alpha toward its target each tick.
	pub alpha_decay: f64,
	/// Alpha target while a drag is active.
	pub reheat_target: f64,
}

impl Default for SimulationParams {
	fn default() -> Self {
		Self {
			link_distance: 80.0,
			charge_strength: -200.0,
			theta: 0.9,
			center_strength: 0.05,
			collide_padding: 1.5,
			collide_strength: 0.7,
			velocity_decay: 0.4,
			alpha_min: 0.001,
			// Reaches alpha_min from 1.0 in ~300 ticks.
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			reheat_target: 0.3,
		}
	}
}

/// Simulation lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Alpha above threshold; positions still moving significantly.
	Running,
	/// Alpha decayed below threshold; ticks are no-ops until a reheat.
	Settled,
}

/// Owns the node arena and advances it tick by tick.
pub struct Simulation {
	/// The live graph. Readers (renderer, hit testing) borrow it; the
	/// engine is the sole writer of physical state.
	pub graph: Graph,
	params: SimulationParams,
	center_x: f64,
	center_y: f64,
	alpha: f64,
	alpha_target: f64,
	phase: Phase,
	// Per-link spring strength and distribution bias, derived from node
	// degrees once per build.
	link_strength: Vec<f64>,
	link_bias: Vec<f64>,
}

impl Simulation {
	/// Takes ownership of a freshly built graph, seeds initial positions,
	/// and starts hot (alpha = 1).
	pub fn new(graph: Graph, params: SimulationParams, width: f64, height: f64) -> Self {
		let mut sim = Self {
			graph,
			params,
			center_x: width / 2.0,
			center_y: height / 2.0,
			alpha: 1.0,
			alpha_target: 0.0,
			phase: Phase::Running,
			link_strength: Vec::new(),
			link_bias: Vec::new(),
		};
		sim.seed_positions();
		sim.derive_link_coefficients();
		if sim.graph.nodes.is_empty() {
			sim.phase = Phase::Settled;
		}
		sim
	}

	/// Current temperature.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Current lifecycle phase.
	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// Advances one tick if running, then synchronously notifies the
	/// observer so the drawn scene always reflects the latest positions.
	pub fn tick(&mut self, observe: impl FnOnce(&Graph)) {
		if self.phase == Phase::Running {
			self.step();
		}
		observe(&self.graph);
	}

	/// Raises the alpha target; a target at or above `alpha_min` re-enters
	/// the running phase (drag start).
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
		if target >= self.params.alpha_min && !self.graph.nodes.is_empty() {
			self.phase = Phase::Running;
		}
	}

	/// Reheats the layout to the drag target.
	pub fn reheat(&mut self) {
		self.set_alpha_target(self.params.reheat_target);
	}

	/// Lets alpha decay back toward settled (drag end).
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
	}

	/// Pins a node to a fixed position, overriding integration exactly.
	pub fn pin(&mut self, index: usize, x: f64, y: f64) {
		if let Some(node) = self.graph.nodes.get_mut(index) {
			node.fx = Some(x);
			node.fy = Some(y);
		}
	}

	/// Releases a pinned node back to free-body dynamics.
	pub fn unpin(&mut self, index: usize) {
		if let Some(node) = self.graph.nodes.get_mut(index) {
			node.fx = None;
			node.fy = None;
		}
	}

	fn step(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;

		self.apply_link_force();
		self.apply_charge_force();
		self.apply_center_force();
		self.apply_collision_force();
		self.integrate();

		if self.alpha < self.params.alpha_min && self.alpha_target < self.params.alpha_min {
			self.phase = Phase::Settled;
		}
	}

	// Phyllotaxis spiral around the canvas center: deterministic, seedable
	// by index, and free of systematic overlap.
	fn seed_positions(&mut self) {
		const INITIAL_RADIUS: f64 = 10.0;
		let golden_angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());

		for (i, node) in self.graph.nodes.iter_mut().enumerate() {
			let r = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
			let a = i as f64 * golden_angle;
			node.x = self.center_x + r * a.cos();
			node.y = self.center_y + r * a.sin();
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}

	// Spring stiffness 1/min(deg) keeps hubs from being yanked around by
	// every spoke; bias splits each correction in proportion to degree.
	// Independent of mention counts.
	fn derive_link_coefficients(&mut self) {
		let mut degree = vec![0usize; self.graph.nodes.len()];
		for link in &self.graph.links {
			degree[link.source] += 1;
			degree[link.target] += 1;
		}

		self.link_strength = self
			.graph
			.links
			.iter()
			.map(|l| 1.0 / degree[l.source].min(degree[l.target]).max(1) as f64)
			.collect();
		self.link_bias = self
			.graph
			.links
			.iter()
			.map(|l| {
				let ds = degree[l.source] as f64;
				let dt = degree[l.target] as f64;
				ds / (ds + dt).max(1.0)
			})
			.collect();
	}

	fn apply_link_force(&mut self) {
		for (i, link) in self.graph.links.iter().enumerate() {
			let s = &self.graph.nodes[link.source];
			let t = &self.graph.nodes[link.target];

			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 && dy == 0.0 {
				dx = jiggle(i as f64);
				dy = jiggle(i as f64 + 0.5);
			}
			let len = (dx * dx + dy * dy).sqrt();
			let k = (len - self.params.link_distance) / len * self.alpha * self.link_strength[i];
			dx *= k;
			dy *= k;

			let bias = self.link_bias[i];
			let (source, target) = (link.source, link.target);
			self.graph.nodes[target].vx -= dx * bias;
			self.graph.nodes[target].vy -= dy * bias;
			self.graph.nodes[source].vx += dx * (1.0 - bias);
			self.graph.nodes[source].vy += dy * (1.0 - bias);
		}
	}

	fn apply_charge_force(&mut self) {
		let points: Vec<PointMass> = self
			.graph
			.nodes
			.iter()
			.map(|n| PointMass {
				x: n.x,
				y: n.y,
				mass: self.params.charge_strength,
			})
			.collect();
		let Some(tree) = Quadtree::build(&points) else {
			return;
		};

		let alpha = self.alpha;
		let theta = self.params.theta;
		for i in 0..self.graph.nodes.len() {
			let (x, y) = (self.graph.nodes[i].x, self.graph.nodes[i].y);
			let mut fx = 0.0;
			let mut fy = 0.0;
			tree.visit_clusters(x, y, theta, &mut |cx, cy, mass| {
				let dx = cx - x;
				let dy = cy - y;
				let mut d2 = dx * dx + dy * dy;
				if d2 < 1e-9 {
					// Own contribution, or an exactly coincident node;
					// collision separates the latter.
					return;
				}
				if d2 < 1.0 {
					d2 = d2.sqrt();
				}
				let w = mass * alpha / d2;
				fx += dx * w;
				fy += dy * w;
			});
			self.graph.nodes[i].vx += fx;
			self.graph.nodes[i].vy += fy;
		}
	}

	// Weak pull of the overall centroid toward the canvas center. Applied
	// as a position shift so it cannot add oscillating momentum.
	fn apply_center_force(&mut self) {
		let free: Vec<usize> = (0..self.graph.nodes.len())
			.filter(|&i| !self.graph.nodes[i].pinned())
			.collect();
		if free.is_empty() {
			return;
		}

		let mut cx = 0.0;
		let mut cy = 0.0;
		for &i in &free {
			cx += self.graph.nodes[i].x;
			cy += self.graph.nodes[i].y;
		}
		cx /= free.len() as f64;
		cy /= free.len() as f64;

		let shift_x = (self.center_x - cx) * self.params.center_strength;
		let shift_y = (self.center_y - cy) * self.params.center_strength;
		for &i in &free {
			self.graph.nodes[i].x += shift_x;
			self.graph.nodes[i].y += shift_y;
		}
	}

	// One pairwise pass per tick; the Barnes-Hut mandate applies to the
	// charge force, and a single iteration is enough below ~1k nodes.
	fn apply_collision_force(&mut self) {
		let n = self.graph.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let a = &self.graph.nodes[i];
				let b = &self.graph.nodes[j];
				let clearance = a.radius() + b.radius() + self.params.collide_padding;

				let mut dx = b.x - a.x;
				let mut dy = b.y - a.y;
				if dx == 0.0 && dy == 0.0 {
					dx = jiggle((i * n + j) as f64);
					dy = jiggle((i * n + j) as f64 + 0.5);
				}
				let dist = (dx * dx + dy * dy).sqrt();
				if dist >= clearance {
					continue;
				}

				let push = (clearance - dist) / dist * self.params.collide_strength;
				let (wa, wb) = match (self.graph.nodes[i].pinned(), self.graph.nodes[j].pinned()) {
					(false, false) => (0.5, 0.5),
					(true, false) => (0.0, 1.0),
					(false, true) => (1.0, 0.0),
					(true, true) => continue,
				};
				self.graph.nodes[i].x -= dx * push * wa;
				self.graph.nodes[i].y -= dy * push * wa;
				self.graph.nodes[j].x += dx * push * wb;
				self.graph.nodes[j].y += dy * push * wb;
			}
		}
	}

	fn integrate(&mut self) {
		let friction = 1.0 - self.params.velocity_decay;
		for node in &mut self.graph.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= friction;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= friction;
					node.y += node.vy;
				}
			}
		}
	}
}

// Tiny deterministic offset used to break exact-overlap degeneracies.
fn jiggle(seed: f64) -> f64 {
	let x = (seed * 12.9898 + 78.233).sin() * 43758.5453;
	(x - x.floor() - 0.5) * 1e-6
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::entity_graph::model::build;
	use crate::components::entity_graph::types::{Entity, Relationship};

	fn chain_graph(n: usize) -> Graph {
		let entities: Vec<Entity> = (0..n)
			.map(|i| Entity {
				name: format!("e{i}"),
				kind: "concept".into(),
				mentions: 1 + (i % 4) as u32,
			})
			.collect();
		let relationships: Vec<Relationship> = (1..n)
			.map(|i| Relationship {
				from: format!("e{}", i - 1),
				to: format!("e{i}"),
				kind: "rel".into(),
				mentions: 1,
			})
			.collect();
		build(&entities, &relationships)
	}

	fn sim(n: usize) -> Simulation {
		Simulation::new(chain_graph(n), SimulationParams::default(), 800.0, 600.0)
	}

	#[test]
	fn connected_graph_settles_within_bounded_ticks() {
		let mut sim = sim(30);
		let mut ticks = 0;
		while sim.phase() == Phase::Running {
			sim.tick(|_| {});
			ticks += 1;
			assert!(ticks < 500, "simulation failed to settle");
		}

		// Once settled, one more tick must not move anything.
		let before: Vec<(f64, f64)> = sim.graph.nodes.iter().map(|n| (n.x, n.y)).collect();
		sim.tick(|_| {});
		for (node, (x, y)) in sim.graph.nodes.iter().zip(before) {
			assert_eq!(node.x, x);
			assert_eq!(node.y, y);
		}
	}

	#[test]
	fn displacement_decays_as_alpha_cools() {
		let mut sim = sim(20);
		let max_displacement = |sim: &mut Simulation| {
			let before: Vec<(f64, f64)> = sim.graph.nodes.iter().map(|n| (n.x, n.y)).collect();
			sim.tick(|_| {});
			sim.graph
				.nodes
				.iter()
				.zip(before)
				.map(|(n, (x, y))| ((n.x - x).powi(2) + (n.y - y).powi(2)).sqrt())
				.fold(0.0_f64, f64::max)
		};

		let early = max_displacement(&mut sim);
		for _ in 0..280 {
			sim.tick(|_| {});
		}
		let late = max_displacement(&mut sim);
		assert!(late < early / 10.0, "early {early}, late {late}");
		assert!(late < 1.0);
	}

	#[test]
	fn pinned_node_holds_exact_position_until_release() {
		let mut sim = sim(10);
		sim.pin(3, 123.0, 456.0);
		sim.reheat();

		for _ in 0..5 {
			sim.tick(|_| {});
			assert_eq!(sim.graph.nodes[3].x, 123.0);
			assert_eq!(sim.graph.nodes[3].y, 456.0);
		}

		sim.unpin(3);
		sim.tick(|_| {});
		let node = &sim.graph.nodes[3];
		assert!(node.fx.is_none() && node.fy.is_none());
		assert!(node.x != 123.0 || node.y != 456.0, "released node never moved");
	}

	#[test]
	fn reheat_reenters_running_and_settles_again() {
		let mut sim = sim(5);
		for _ in 0..400 {
			sim.tick(|_| {});
		}
		assert_eq!(sim.phase(), Phase::Settled);

		sim.reheat();
		assert_eq!(sim.phase(), Phase::Running);
		assert!(sim.alpha() < 0.3);

		sim.cool();
		let mut ticks = 0;
		while sim.phase() == Phase::Running {
			sim.tick(|_| {});
			ticks += 1;
			assert!(ticks < 500, "failed to settle after reheat");
		}
	}

	#[test]
	fn observer_fires_once_per_tick() {
		let mut sim = sim(3);
		let mut calls = 0;
		for _ in 0..10 {
			sim.tick(|graph| {
				assert_eq!(graph.nodes.len(), 3);
				calls += 1;
			});
		}
		assert_eq!(calls, 10);
	}

	#[test]
	fn empty_graph_is_settled_and_inert() {
		let mut sim = Simulation::new(build(&[], &[]), SimulationParams::default(), 800.0, 600.0);
		assert_eq!(sim.phase(), Phase::Settled);
		sim.tick(|graph| assert!(graph.nodes.is_empty()));
		sim.reheat();
		assert_eq!(sim.phase(), Phase::Settled);
	}

	#[test]
	fn initial_placement_has_no_overlap() {
		let sim = sim(50);
		for (i, a) in sim.graph.nodes.iter().enumerate() {
			for b in sim.graph.nodes.iter().skip(i + 1) {
				let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
				assert!(d > 1.0, "seeded nodes overlap");
			}
		}
	}

	#[test]
	fn connected_pair_pulls_toward_link_distance() {
		let mut sim = sim(2);
		for _ in 0..300 {
			sim.tick(|_| {});
		}
		let a = &sim.graph.nodes[0];
		let b = &sim.graph.nodes[1];
		let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
		// Spring equilibrium shifts a little under charge repulsion.
		assert!(d > 40.0 && d < 200.0, "settled separation {d}");
	}
}
