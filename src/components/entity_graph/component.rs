//! Leptos component wrapping the entity graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel
//! handlers for node dragging, panning, zooming, and click dispatch. A
//! single animation loop runs via `requestAnimationFrame`, advancing the
//! simulation and repainting each frame.
//!
//! When the `data` signal changes, the whole [`GraphState`] behind the
//! shared cell is replaced: the old simulation is dropped before the next
//! frame, so a stale tick can never mutate a torn-down scene. The loop
//! itself is shared infrastructure and is created exactly once.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::scene::Scene;
use super::state::GraphState;
use super::types::GraphData;

/// Renders an interactive entity-relationship graph on a canvas element.
///
/// Pass already-filtered records via the reactive `data` signal; a new
/// value rebuilds the layout from scratch. The component sizes itself to
/// its parent container by default; set `fullscreen = true` to fill the
/// viewport and resize with the window. `on_node_click` receives the
/// clicked entity's name and is the component's only egress to the host.
#[component]
pub fn EntityGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(into, optional)] on_node_click: Option<Callback<String>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let graph_data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		// Replacing the state drops the previous simulation outright;
		// the shared loop below only ever sees the current instance.
		// None (empty entity set) draws nothing: the host owns the
		// empty-state message.
		*context_init.borrow_mut() = GraphState::new(&graph_data, w, h);

		if fullscreen && resize_cb_init.borrow().is_none() {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut state) = *context_resize.borrow_mut() {
					state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		if animate_init.borrow().is_some() {
			return;
		}
		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut state) = *context_anim.borrow_mut() {
				let (w, h) = (state.width, state.height);
				let GraphState {
					ref mut sim,
					ref palettes,
					ref transform,
					..
				} = *state;
				sim.tick(|graph| {
					let scene = Scene::build(graph, palettes);
					render::render(&scene, &ctx, transform, w, h);
				});
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut state) = *context_md.borrow_mut() {
			if let Some(idx) = state.node_at_position(x, y) {
				state.begin_drag(idx, x, y);
			} else {
				state.pan.active = true;
				state.pan.start_x = x;
				state.pan.start_y = y;
				state.pan.transform_start_x = state.transform.x;
				state.pan.transform_start_y = state.transform.y;
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut state) = *context_mm.borrow_mut() {
			if state.drag.active {
				state.drag_to(x, y);
			} else if state.pan.active {
				state.transform.x = state.pan.transform_start_x + (x - state.pan.start_x);
				state.transform.y = state.pan.transform_start_y + (y - state.pan.start_y);
			} else {
				let title = state.tooltip_at(x, y).unwrap_or_default();
				canvas.set_title(&title);
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut state) = *context_mu.borrow_mut() {
			if let Some(name) = state.end_drag() {
				if let Some(cb) = on_node_click {
					cb.run(name);
				}
			}
			state.pan.active = false;
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut state) = *context_ml.borrow_mut() {
			// Leaving the canvas cancels the gesture; never a click.
			state.end_drag();
			state.pan.active = false;
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut state) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			state.transform.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="entity-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
