//! archive-graph: interactive entity-relationship graph for the research
//! archive dashboard.
//!
//! This crate provides a WASM-based canvas component that lays out the
//! archive's entity graph with an alpha-driven force simulation and renders
//! it with pan, zoom, drag, and click-through interaction.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::entity_graph::{Entity, EntityGraphCanvas, GraphData, Relationship};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("archive-graph: logging initialized");
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { entities: [...], relationships: [...] }
fn load_graph_data() -> Option<GraphData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<GraphData>(&json_text) {
		Ok(data) => {
			info!(
				"archive-graph: loaded {} entities, {} relationships",
				data.entities.len(),
				data.relationships.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("archive-graph: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads graph data from the DOM and renders the entity graph.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_default();
	let empty = graph_data.entities.is_empty();
	let graph_signal = Signal::derive(move || graph_data.clone());

	let on_node_click = Callback::new(|name: String| {
		info!("archive-graph: entity selected: {name}");
	});

	let subtitle = if empty {
		"No entities match the current filters."
	} else {
		"Drag nodes to reposition. Scroll to zoom. Drag background to pan. Click a node for details."
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Research Archive Entity Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<EntityGraphCanvas data=graph_signal fullscreen=true on_node_click=on_node_click />
			<div class="graph-overlay">
				<h1>"Research Archive"</h1>
				<p class="subtitle">{subtitle}</p>
			</div>
		</div>
	}
}
