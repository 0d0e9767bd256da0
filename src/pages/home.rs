use leptos::prelude::*;

use crate::components::graph_view::GraphView;

/// Sample shown on first load.
pub const SAMPLE_DOCUMENT: &str = r#"{
  "nodes": [
    { "id": 1, "label": "Document A", "link": "https://example.com/doc-a" },
    { "id": 2, "label": "Document B", "link": "https://example.com/doc-b" },
    { "id": 3, "label": "Document C", "link": "https://example.com/doc-c" }
  ],
  "edges": [
    { "from": 1, "to": 2 },
    { "from": 1, "to": 3 }
  ]
}"#;

/// Editor and canvas for the sample document. Parse failures are logged by
/// the controller and leave the drawn graph as it was.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<div style="padding: 20px;">
			<h2>"Document Graph Prototype"</h2>
			<GraphView initial=SAMPLE_DOCUMENT />
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{GraphData, GraphDocument};

	#[test]
	fn sample_document_renders_cleanly() {
		let doc = GraphDocument::parse(SAMPLE_DOCUMENT).unwrap().normalize();
		let data = GraphData::from_document(doc).unwrap();
		assert_eq!(data.nodes.len(), 3);
		let edge_ids: Vec<_> = data.edges.ids().map(ToString::to_string).collect();
		assert_eq!(edge_ids, vec!["e0", "e1"]);
	}
}
