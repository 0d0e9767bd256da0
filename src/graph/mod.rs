//! Headless core of the graph view: document parsing, edge id normalization,
//! the session state machine and the capability seams it talks through.
//!
//! Nothing in here touches the DOM, so the whole module runs under plain
//! `cargo test`.

mod controller;
mod dataset;
mod document;
mod environment;
mod error;
mod options;
mod session;

pub use controller::{GraphViewController, RenderOutcome, SessionState};
pub use dataset::{DataSet, GraphData, Keyed};
pub use document::{GraphDocument, GraphEdge, GraphNode, ItemId};
pub use environment::{Cursor, Environment, OpenPolicy};
pub use error::{GraphError, ItemKind};
pub use options::{
	ColorPair, EdgeOptions, InteractionOptions, NodeOptions, PhysicsOptions, RenderOptions,
};
pub use session::{ClickEvent, InteractionHandlers, RenderBackend, RenderSession};
