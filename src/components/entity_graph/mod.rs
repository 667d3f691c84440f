//! Interactive entity-relationship graph component.
//!
//! Renders the archive's entity graph on an HTML canvas with:
//! - Physics-based layout via an alpha-driven force simulation
//! - Barnes-Hut approximation for pairwise repulsion
//! - Pan, zoom, node dragging, and click-through to the host page
//! - Mention-scaled node sizes and a per-type color legend
//!
//! # Example
//!
//! ```ignore
//! use archive_graph::{EntityGraphCanvas, GraphData, Entity, Relationship};
//!
//! let data = GraphData {
//!     entities: vec![
//!         Entity { name: "Acme".into(), kind: "company".into(), mentions: 5 },
//!         Entity { name: "widget".into(), kind: "product".into(), mentions: 2 },
//!     ],
//!     relationships: vec![
//!         Relationship { from: "Acme".into(), to: "widget".into(), kind: "produces".into(), mentions: 2 },
//!     ],
//! };
//!
//! view! { <EntityGraphCanvas data=data.into() fullscreen=true /> }
//! ```

mod component;
pub mod model;
pub mod palette;
pub mod quadtree;
mod render;
pub mod scene;
pub mod simulation;
mod state;
mod types;

pub use component::EntityGraphCanvas;
pub use types::{Entity, GraphData, Relationship};
