use thiserror::Error;

use super::document::ItemId;

/// Which data set a duplicate id was found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
	/// The node set.
	Node,
	/// The edge set.
	Edge,
}

impl std::fmt::Display for ItemKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ItemKind::Node => f.write_str("node"),
			ItemKind::Edge => f.write_str("edge"),
		}
	}
}

/// Reasons a render request is rejected. None of them are fatal: the
/// controller logs the error and keeps whatever is currently on screen.
#[derive(Debug, Error)]
pub enum GraphError {
	/// The view has no mounted container to draw into yet.
	#[error("container reference is not available")]
	MissingContainer,
	/// The input text is not a valid graph document.
	#[error("failed to parse graph document: {0}")]
	Parse(#[from] serde_json::Error),
	/// Two items in the same data set share an id.
	#[error("cannot add {kind}: item with id {id} already exists")]
	DuplicateId {
		/// Data set the collision happened in.
		kind: ItemKind,
		/// The colliding id.
		id: ItemId,
	},
	/// A browser call failed while setting up the canvas.
	#[error("dom error: {0}")]
	Dom(String),
}
