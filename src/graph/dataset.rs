use indexmap::IndexMap;
use log::debug;

use super::document::{GraphDocument, GraphEdge, GraphNode, ItemId};
use super::error::{GraphError, ItemKind};

/// Something stored in a [`DataSet`], keyed by its id.
pub trait Keyed {
	/// Which data set the item belongs to, for error reporting.
	const KIND: ItemKind;

	/// The item's id, if it has one.
	fn key(&self) -> Option<&ItemId>;

	/// Set the id of an item that came without one.
	fn assign_key(&mut self, id: ItemId);
}

impl Keyed for GraphNode {
	const KIND: ItemKind = ItemKind::Node;

	fn key(&self) -> Option<&ItemId> {
		self.id.as_ref()
	}

	fn assign_key(&mut self, id: ItemId) {
		self.id = Some(id);
	}
}

impl Keyed for GraphEdge {
	const KIND: ItemKind = ItemKind::Edge;

	fn key(&self) -> Option<&ItemId> {
		self.id.as_ref()
	}

	fn assign_key(&mut self, id: ItemId) {
		self.id = Some(id);
	}
}

/// Ordered collection of items with unique ids.
#[derive(Clone, Debug, PartialEq)]
pub struct DataSet<T> {
	items: IndexMap<ItemId, T>,
}

impl<T: Keyed> DataSet<T> {
	/// Build a data set, generating ids for items that have none.
	///
	/// Generated ids look like `node-0`, `node-1`, ... and skip ids that are
	/// already taken by other items. A duplicate explicit id is an error.
	pub fn from_items(items: Vec<T>) -> Result<Self, GraphError> {
		let mut keyed = IndexMap::with_capacity(items.len());
		let mut pending = Vec::new();

		for (pos, item) in items.into_iter().enumerate() {
			match item.key().cloned() {
				Some(id) => {
					if keyed.contains_key(&id) {
						return Err(GraphError::DuplicateId { kind: T::KIND, id });
					}
					keyed.insert(id, (pos, item));
				}
				None => pending.push((pos, item)),
			}
		}

		let mut counter = 0usize;
		for (pos, mut item) in pending {
			let id = loop {
				let candidate = ItemId::Text(format!("{}-{counter}", T::KIND));
				counter += 1;
				if !keyed.contains_key(&candidate) {
					break candidate;
				}
			};
			debug!("generated {} id {id}", T::KIND);
			item.assign_key(id.clone());
			keyed.insert(id, (pos, item));
		}

		// Restore input order after the generated ids were appended.
		keyed.sort_by(|_, (a, _), _, (b, _)| a.cmp(b));

		Ok(Self {
			items: keyed.into_iter().map(|(id, (_, item))| (id, item)).collect(),
		})
	}
}

impl<T> DataSet<T> {
	/// Look an item up by id.
	pub fn get(&self, id: &ItemId) -> Option<&T> {
		self.items.get(id)
	}

	/// Number of items.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether the set holds no items.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Iterate `(id, item)` pairs in input order.
	pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &T)> {
		self.items.iter()
	}

	/// Iterate the ids in input order.
	pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
		self.items.keys()
	}
}

/// Node and edge data sets handed to a render session.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphData {
	/// Nodes keyed by id.
	pub nodes: DataSet<GraphNode>,
	/// Edges keyed by id.
	pub edges: DataSet<GraphEdge>,
}

impl GraphData {
	/// Build both data sets from a normalized document.
	pub fn from_document(doc: GraphDocument) -> Result<Self, GraphError> {
		Ok(Self {
			nodes: DataSet::from_items(doc.nodes)?,
			edges: DataSet::from_items(doc.edges)?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn data(raw: &str) -> Result<GraphData, GraphError> {
		GraphData::from_document(GraphDocument::parse(raw).unwrap().normalize())
	}

	#[test]
	fn keeps_input_order() {
		let data = data(r#"{"nodes":[{"id":"b","label":"B"},{"label":"X"},{"id":"a","label":"A"}],"edges":[]}"#)
			.unwrap();
		let labels: Vec<_> = data.nodes.iter().map(|(_, n)| n.label.as_str()).collect();
		assert_eq!(labels, vec!["B", "X", "A"]);
	}

	#[test]
	fn generates_ids_that_avoid_explicit_ones() {
		let data = data(r#"{"nodes":[{"label":"X"},{"id":"node-0","label":"Y"}],"edges":[]}"#).unwrap();
		let ids: Vec<_> = data.nodes.ids().map(ToString::to_string).collect();
		assert_eq!(ids, vec!["node-1", "node-0"]);
		assert_eq!(
			data.nodes.get(&"node-1".into()).and_then(|n| n.id.clone()),
			Some("node-1".into())
		);
	}

	#[test]
	fn rejects_duplicate_node_ids() {
		let err = data(r#"{"nodes":[{"id":1,"label":"A"},{"id":1,"label":"B"}],"edges":[]}"#).unwrap_err();
		assert!(matches!(
			err,
			GraphError::DuplicateId {
				kind: ItemKind::Node,
				..
			}
		));
	}

	#[test]
	fn synthetic_edge_id_clashing_with_explicit_id_is_rejected() {
		let err = data(r#"{"nodes":[],"edges":[{"id":"e1","from":1,"to":2},{"from":2,"to":1}]}"#)
			.unwrap_err();
		assert!(matches!(
			err,
			GraphError::DuplicateId {
				kind: ItemKind::Edge,
				..
			}
		));
	}

	#[test]
	fn lookups_distinguish_number_and_string_ids() {
		let data = data(r#"{"nodes":[{"id":1,"label":"A"}],"edges":[]}"#).unwrap();
		assert!(data.nodes.get(&ItemId::from(1_i64)).is_some());
		assert!(data.nodes.get(&"1".into()).is_none());
	}
}
