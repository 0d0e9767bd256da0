//! The user-facing JSON document format and edge id normalization.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use super::error::GraphError;

/// Identifier of a node or edge: any JSON string or number.
///
/// `1` and `"1"` are different ids, matching how the document is written.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
	/// A numeric id such as `3`.
	Number(serde_json::Number),
	/// A string id such as `"doc-a"`.
	Text(String),
}

impl ItemId {
	/// Whether the id counts as "missing" for normalization purposes.
	fn is_blank(&self) -> bool {
		matches!(self, ItemId::Text(s) if s.is_empty())
	}
}

impl fmt::Display for ItemId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ItemId::Number(n) => write!(f, "{n}"),
			ItemId::Text(s) => f.write_str(s),
		}
	}
}

impl From<&str> for ItemId {
	fn from(s: &str) -> Self {
		ItemId::Text(s.to_owned())
	}
}

impl From<String> for ItemId {
	fn from(s: String) -> Self {
		ItemId::Text(s)
	}
}

impl From<i64> for ItemId {
	fn from(n: i64) -> Self {
		ItemId::Number(n.into())
	}
}

/// A node as written in the document.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	/// Optional id; the data set generates one when absent.
	pub id: Option<ItemId>,
	/// Display text drawn under the node.
	#[serde(default)]
	pub label: String,
	/// Optional category; nodes in the same group share a palette colour.
	pub group: Option<String>,
	/// Optional CSS colour overriding the group colour.
	pub color: Option<String>,
	/// Optional link target. Kept as raw JSON: only a non-empty string is a URL.
	pub link: Option<Value>,
}

impl GraphNode {
	/// The node's link if it is a non-empty string.
	pub fn link_url(&self) -> Option<&str> {
		match &self.link {
			Some(Value::String(url)) if !url.is_empty() => Some(url.as_str()),
			_ => None,
		}
	}
}

/// A directed edge as written in the document.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphEdge {
	/// Optional id; filled in by [`GraphDocument::normalize`] when absent.
	pub id: Option<ItemId>,
	/// Source node id. Not checked against the node set.
	pub from: ItemId,
	/// Target node id. Not checked against the node set.
	pub to: ItemId,
	/// Optional text drawn at the middle of the edge.
	pub label: Option<String>,
}

impl GraphEdge {
	fn has_id(&self) -> bool {
		self.id.as_ref().is_some_and(|id| !id.is_blank())
	}
}

/// Top-level parsed unit: `{ "nodes": [...], "edges": [...] }`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphDocument {
	/// All nodes, in input order.
	pub nodes: Vec<GraphNode>,
	/// All edges, in input order.
	pub edges: Vec<GraphEdge>,
}

impl GraphDocument {
	/// Parse raw text. Only structural checks are performed.
	pub fn parse(raw: &str) -> Result<Self, GraphError> {
		Ok(serde_json::from_str(raw)?)
	}

	/// Give every edge without an id the synthetic id `"e<index>"`, where
	/// index is the edge's position in the input array.
	pub fn normalize(self) -> Self {
		let edges = self
			.edges
			.into_iter()
			.enumerate()
			.map(|(i, mut edge)| {
				if !edge.has_id() {
					edge.id = Some(ItemId::Text(format!("e{i}")));
				}
				edge
			})
			.collect();
		Self {
			nodes: self.nodes,
			edges,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn edge_ids(doc: &GraphDocument) -> Vec<String> {
		doc.edges
			.iter()
			.map(|e| e.id.as_ref().map(ToString::to_string).unwrap_or_default())
			.collect()
	}

	#[test]
	fn missing_edge_ids_follow_input_position() {
		let doc = GraphDocument::parse(
			r#"{"nodes":[],"edges":[{"from":1,"to":2},{"from":2,"to":3},{"from":3,"to":1}]}"#,
		)
		.unwrap()
		.normalize();

		assert_eq!(edge_ids(&doc), vec!["e0", "e1", "e2"]);
	}

	#[test]
	fn normalize_is_idempotent() {
		let raw = r#"{"nodes":[],"edges":[{"from":"a","to":"b"},{"id":"x","from":"b","to":"a"}]}"#;
		let once = GraphDocument::parse(raw).unwrap().normalize();
		let twice = once.clone().normalize();
		assert_eq!(once, twice);
		assert_eq!(edge_ids(&once), vec!["e0", "x"]);
	}

	#[test]
	fn explicit_ids_keep_their_index_slot() {
		let doc = GraphDocument::parse(
			r#"{"nodes":[],"edges":[{"id":7,"from":1,"to":2},{"from":2,"to":1}]}"#,
		)
		.unwrap()
		.normalize();
		assert_eq!(doc.edges[0].id, Some(ItemId::from(7_i64)));
		assert_eq!(edge_ids(&doc), vec!["7", "e1"]);
	}

	#[test]
	fn null_and_empty_ids_are_replaced_but_zero_is_kept() {
		let doc = GraphDocument::parse(
			r#"{"nodes":[],"edges":[{"id":null,"from":1,"to":2},{"id":"","from":1,"to":2},{"id":0,"from":1,"to":2}]}"#,
		)
		.unwrap()
		.normalize();
		assert_eq!(edge_ids(&doc), vec!["e0", "e1", "0"]);
		assert_eq!(doc.edges[2].id, Some(ItemId::from(0_i64)));
	}

	#[test]
	fn numeric_and_string_ids_are_distinct() {
		assert_ne!(ItemId::from(1_i64), ItemId::from("1"));
	}

	#[test]
	fn link_url_requires_non_empty_string() {
		let doc = GraphDocument::parse(
			r#"{"nodes":[
				{"id":1,"label":"a","link":"https://x"},
				{"id":2,"label":"b","link":""},
				{"id":3,"label":"c","link":42},
				{"id":4,"label":"d"}
			],"edges":[]}"#,
		)
		.unwrap();
		let links: Vec<_> = doc.nodes.iter().map(GraphNode::link_url).collect();
		assert_eq!(links, vec![Some("https://x"), None, None, None]);
	}

	#[test]
	fn rejects_documents_without_edges() {
		let err = GraphDocument::parse(r#"{"nodes":[]}"#).unwrap_err();
		assert!(matches!(err, GraphError::Parse(_)));
	}

	#[test]
	fn rejects_malformed_json() {
		assert!(GraphDocument::parse("{ nodes: ").is_err());
	}

	#[test]
	fn ignores_unknown_fields() {
		let doc = GraphDocument::parse(
			r#"{"nodes":[{"id":"a","label":"A","title":"extra"}],"edges":[],"meta":{}}"#,
		)
		.unwrap();
		assert_eq!(doc.nodes[0].label, "A");
	}
}
