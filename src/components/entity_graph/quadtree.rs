//! Region quadtree with Barnes-Hut aggregates.
//!
//! Each internal cell caches the total mass and centroid of the points below
//! it, so a force traversal can treat a distant cluster as a single body.
//! This turns the all-pairs repulsion pass from O(n²) into O(n log n), which
//! is what keeps the layout interactive past a few hundred nodes.
//!
//! The tree is a standalone spatial index: it knows nothing about nodes,
//! forces, or rendering.

/// Splitting stops at this depth; further coincident points merge in place.
const MAX_DEPTH: usize = 24;

/// Squared distance below which two points count as coincident.
const COINCIDENT_EPSILON: f64 = 1e-12;

/// A point with an associated mass (for repulsion, a charge strength).
#[derive(Clone, Copy, Debug)]
pub struct PointMass {
	/// Position.
	pub x: f64,
	/// Position.
	pub y: f64,
	/// Mass; may be negative (repulsive charge).
	pub mass: f64,
}

#[derive(Clone, Debug)]
struct Cell {
	// Square extent covered by this cell.
	x0: f64,
	y0: f64,
	size: f64,
	// Aggregates over every point at or below this cell. Centroid is
	// (wx / mass, wy / mass).
	mass: f64,
	wx: f64,
	wy: f64,
	// Index of the first of four contiguous children, if split.
	children: Option<usize>,
	// Leaf payload; coincident points merge into one heavier body.
	point: Option<PointMass>,
}

impl Cell {
	fn new(x0: f64, y0: f64, size: f64) -> Self {
		Self {
			x0,
			y0,
			size,
			mass: 0.0,
			wx: 0.0,
			wy: 0.0,
			children: None,
			point: None,
		}
	}
}

/// Barnes-Hut quadtree over a fixed set of point masses.
#[derive(Clone, Debug)]
pub struct Quadtree {
	cells: Vec<Cell>,
}

impl Quadtree {
	/// Builds a tree covering all points. Returns `None` for an empty set.
	pub fn build(points: &[PointMass]) -> Option<Self> {
		if points.is_empty() {
			return None;
		}

		let mut min_x = f64::INFINITY;
		let mut min_y = f64::INFINITY;
		let mut max_x = f64::NEG_INFINITY;
		let mut max_y = f64::NEG_INFINITY;
		for p in points {
			min_x = min_x.min(p.x);
			min_y = min_y.min(p.y);
			max_x = max_x.max(p.x);
			max_y = max_y.max(p.y);
		}
		let size = (max_x - min_x).max(max_y - min_y).max(1e-6);

		let mut tree = Self {
			cells: vec![Cell::new(min_x, min_y, size)],
		};
		for p in points {
			tree.insert(0, *p, 0);
		}
		tree.aggregate();
		Some(tree)
	}

	/// Visits the point set as seen from `(x, y)`: distant cells whose
	/// width/distance ratio is below `theta` are reported once as their
	/// aggregate `(cx, cy, mass)`, near cells are opened and reported per
	/// point. The caller applies its own force law, and must tolerate a
	/// zero-distance contribution (the query point itself is included).
	pub fn visit_clusters(&self, x: f64, y: f64, theta: f64, visit: &mut impl FnMut(f64, f64, f64)) {
		self.visit_cell(0, x, y, theta * theta, visit);
	}

	/// Total mass of all inserted points.
	pub fn total_mass(&self) -> f64 {
		self.cells[0].mass
	}

	/// Centroid of all inserted points, or `None` when the total mass is 0.
	pub fn centroid(&self) -> Option<(f64, f64)> {
		let root = &self.cells[0];
		if root.mass == 0.0 {
			None
		} else {
			Some((root.wx / root.mass, root.wy / root.mass))
		}
	}

	fn quadrant(&self, cell: usize, x: f64, y: f64) -> usize {
		let c = &self.cells[cell];
		let half = c.size / 2.0;
		usize::from(x >= c.x0 + half) | (usize::from(y >= c.y0 + half) << 1)
	}

	fn insert(&mut self, cell: usize, p: PointMass, depth: usize) {
		if let Some(first) = self.cells[cell].children {
			let q = self.quadrant(cell, p.x, p.y);
			self.insert(first + q, p, depth + 1);
			return;
		}

		match self.cells[cell].point {
			None => self.cells[cell].point = Some(p),
			Some(existing) => {
				let dx = existing.x - p.x;
				let dy = existing.y - p.y;
				if depth >= MAX_DEPTH || dx * dx + dy * dy < COINCIDENT_EPSILON {
					if let Some(merged) = self.cells[cell].point.as_mut() {
						merged.mass += p.mass;
					}
				} else {
					let first = self.split(cell);
					self.cells[cell].point = None;
					let qe = self.quadrant(cell, existing.x, existing.y);
					self.insert(first + qe, existing, depth + 1);
					let qp = self.quadrant(cell, p.x, p.y);
					self.insert(first + qp, p, depth + 1);
				}
			}
		}
	}

	fn split(&mut self, cell: usize) -> usize {
		let (x0, y0, half) = {
			let c = &self.cells[cell];
			(c.x0, c.y0, c.size / 2.0)
		};
		let first = self.cells.len();
		self.cells.push(Cell::new(x0, y0, half));
		self.cells.push(Cell::new(x0 + half, y0, half));
		self.cells.push(Cell::new(x0, y0 + half, half));
		self.cells.push(Cell::new(x0 + half, y0 + half, half));
		self.cells[cell].children = Some(first);
		first
	}

	// Children always sit at higher indices than their parent, so one
	// reverse pass computes every aggregate bottom-up.
	fn aggregate(&mut self) {
		for i in (0..self.cells.len()).rev() {
			match self.cells[i].children {
				Some(first) => {
					let mut mass = 0.0;
					let mut wx = 0.0;
					let mut wy = 0.0;
					for q in 0..4 {
						let child = &self.cells[first + q];
						mass += child.mass;
						wx += child.wx;
						wy += child.wy;
					}
					let c = &mut self.cells[i];
					c.mass = mass;
					c.wx = wx;
					c.wy = wy;
				}
				None => {
					if let Some(p) = self.cells[i].point {
						let c = &mut self.cells[i];
						c.mass = p.mass;
						c.wx = p.mass * p.x;
						c.wy = p.mass * p.y;
					}
				}
			}
		}
	}

	fn visit_cell(
		&self,
		cell: usize,
		x: f64,
		y: f64,
		theta2: f64,
		visit: &mut impl FnMut(f64, f64, f64),
	) {
		let c = &self.cells[cell];
		if c.mass == 0.0 {
			return;
		}

		match c.children {
			None => {
				if let Some(p) = c.point {
					visit(p.x, p.y, p.mass);
				}
			}
			Some(first) => {
				let cx = c.wx / c.mass;
				let cy = c.wy / c.mass;
				let dx = cx - x;
				let dy = cy - y;
				if c.size * c.size < theta2 * (dx * dx + dy * dy) {
					visit(cx, cy, c.mass);
				} else {
					for q in 0..4 {
						self.visit_cell(first + q, x, y, theta2, visit);
					}
				}
			}
		}
	}
}
