//! Interactive graph view: a JSON editor and the canvas it renders into.
//!
//! The canvas engine (force simulation, pan/zoom, node dragging, hover and
//! click detection) lives behind the [`RenderBackend`](crate::graph::RenderBackend)
//! seam; the component only talks to the
//! [`GraphViewController`](crate::graph::GraphViewController).

mod browser;
mod component;
mod engine;
mod render;
mod state;

pub use component::GraphView;
