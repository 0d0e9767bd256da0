//! Fixed visual and interaction configuration handed to a render session.

use std::time::Duration;

/// Border and background colour pair.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorPair {
	/// Outline colour.
	pub border: String,
	/// Fill colour.
	pub background: String,
}

impl ColorPair {
	fn new(border: &str, background: &str) -> Self {
		Self {
			border: border.into(),
			background: background.into(),
		}
	}
}

/// How nodes are drawn. Nodes are always dots.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeOptions {
	/// Dot radius in graph units.
	pub size: f64,
	/// Label font size in pixels.
	pub font_size: f64,
	/// Label text colour.
	pub font_color: String,
	/// Colours for nodes without a `color` or `group`.
	pub color: ColorPair,
	/// Colours while the pointer is over the node.
	pub hover: ColorPair,
	/// Fill colours assigned to groups in order of first appearance.
	pub group_palette: Vec<String>,
}

/// How edges are drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeOptions {
	/// Draw an arrowhead at the `to` end.
	pub arrow_to: bool,
	/// Draw edges as curves instead of straight lines.
	pub smooth: bool,
	/// Curve bend relative to edge length.
	pub roundness: f64,
	/// Stroke colour.
	pub color: String,
	/// Stroke width in graph units.
	pub width: f64,
	/// Label font size in pixels.
	pub font_size: f64,
}

/// Force simulation settings.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsOptions {
	/// Run the simulation ahead of the first frame when a session is created.
	pub stabilization: bool,
	/// Ticks spent on stabilization.
	pub stabilization_iterations: usize,
	/// Repulsion between nodes.
	pub force_charge: f32,
	/// Spring strength of edges.
	pub force_spring: f32,
	/// Upper bound for a single force.
	pub force_max: f32,
	/// Velocity scale.
	pub node_speed: f32,
	/// Per-tick velocity damping.
	pub damping_factor: f32,
}

/// Pointer interaction settings.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionOptions {
	/// Track hover and emit hover/blur events.
	pub hover: bool,
	/// How long the pointer rests on a node before its tooltip shows.
	pub tooltip_delay: Duration,
}

/// Complete session configuration.
///
/// This is not user-configurable; [`RenderOptions::default`] is the one
/// configuration every session is created with.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
	/// Node appearance.
	pub nodes: NodeOptions,
	/// Edge appearance.
	pub edges: EdgeOptions,
	/// Simulation.
	pub physics: PhysicsOptions,
	/// Pointer behaviour.
	pub interaction: InteractionOptions,
}

const GROUP_PALETTE: &[&str] = &[
	"#97C2FC", "#FFFF00", "#FB7E81", "#7BE141", "#6E6EFD", "#C2FABC", "#FFA807", "#AD85E4",
	"#EB7DF4", "#E6FFE3",
];

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			nodes: NodeOptions {
				size: 16.0,
				font_size: 16.0,
				font_color: "#343434".into(),
				color: ColorPair::new("#2B7CE9", "#97C2FC"),
				hover: ColorPair::new("#2B7CE9", "#D2E5FF"),
				group_palette: GROUP_PALETTE.iter().map(|c| (*c).to_owned()).collect(),
			},
			edges: EdgeOptions {
				arrow_to: true,
				smooth: true,
				roundness: 0.5,
				color: "#848484".into(),
				width: 1.0,
				font_size: 14.0,
			},
			physics: PhysicsOptions {
				stabilization: true,
				stabilization_iterations: 1000,
				force_charge: 150.0,
				force_spring: 0.05,
				force_max: 100.0,
				node_speed: 3000.0,
				damping_factor: 0.9,
			},
			interaction: InteractionOptions {
				hover: true,
				tooltip_delay: Duration::from_millis(200),
			},
		}
	}
}
