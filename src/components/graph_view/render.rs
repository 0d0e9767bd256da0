use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::GraphViewState;

const BACKGROUND: &str = "#ffffff";
const TOOLTIP_PADDING: f64 = 5.0;
const TOOLTIP_FONT: f64 = 14.0;

pub fn render(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_tooltip(state, ctx);
}

fn unit(dx: f64, dy: f64) -> Option<(f64, f64)> {
	let len = (dx * dx + dy * dy).sqrt();
	(len >= 0.001).then(|| (dx / len, dy / len))
}

fn draw_edges(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let edges = &state.options.edges;
	let radius = state.options.nodes.size;
	let arrow_size = if edges.arrow_to { 8.0 + edges.width * 2.0 } else { 0.0 };

	ctx.set_stroke_style_str(&edges.color);
	ctx.set_fill_style_str(&edges.color);
	ctx.set_line_width(edges.width);

	state.graph.visit_edges(|n1, n2, edge| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let dist = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
		let Some((ux, uy)) = unit(x2 - x1, y2 - y1) else {
			return;
		};

		// Quadratic control point, bent to the right of the travel direction.
		let bend = if edges.smooth { dist * edges.roundness * 0.25 } else { 0.0 };
		let (cx, cy) = ((x1 + x2) / 2.0 - uy * bend, (y1 + y2) / 2.0 + ux * bend);

		let (sx, sy) = unit(cx - x1, cy - y1).unwrap_or((ux, uy));
		let (ex, ey) = unit(x2 - cx, y2 - cy).unwrap_or((ux, uy));
		let (start_x, start_y) = (x1 + sx * radius, y1 + sy * radius);
		let (tip_x, tip_y) = (x2 - ex * radius, y2 - ey * radius);
		let (end_x, end_y) = (tip_x - ex * arrow_size, tip_y - ey * arrow_size);

		ctx.begin_path();
		ctx.move_to(start_x, start_y);
		ctx.quadratic_curve_to(cx, cy, end_x, end_y);
		ctx.stroke();

		if edges.arrow_to {
			let (px, py) = (-ey * arrow_size * 0.5, ex * arrow_size * 0.5);
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(end_x + px, end_y + py);
			ctx.line_to(end_x - px, end_y - py);
			ctx.close_path();
			ctx.fill();
		}

		if let Some(label) = &edge.user_data.label {
			let (mx, my) = (
				0.25 * x1 + 0.5 * cx + 0.25 * x2,
				0.25 * y1 + 0.5 * cy + 0.25 * y2,
			);
			draw_label(ctx, label, mx, my, edges.font_size, "#343434");
			ctx.set_fill_style_str(&edges.color);
		}
	});

	for (idx, info) in &state.loops {
		state.graph.visit_nodes(|node| {
			if node.index() != *idx {
				return;
			}
			let (x, y) = (node.x() as f64, node.y() as f64);
			let loop_r = radius * 0.75;
			let (lx, ly) = (x + radius * 0.7, y - radius * 0.7);
			ctx.begin_path();
			let _ = ctx.arc(lx, ly, loop_r, 0.0, 2.0 * PI);
			ctx.stroke();
			if let Some(label) = &info.label {
				draw_label(ctx, label, lx + loop_r, ly - loop_r, edges.font_size, "#343434");
			}
		});
	}
}

fn draw_nodes(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let nodes = &state.options.nodes;
	let radius = nodes.size;

	state.graph.visit_nodes(|node| {
		let (x, y) = (node.x() as f64, node.y() as f64);
		let info = &node.data.user_data;
		let (fill, border, border_width) = if state.is_hovered(node.index()) {
			(&nodes.hover.background, &nodes.hover.border, 2.0)
		} else {
			(&info.fill, &nodes.color.border, 1.0)
		};

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(fill);
		ctx.fill();
		ctx.set_stroke_style_str(border);
		ctx.set_line_width(border_width);
		ctx.stroke();

		if !info.label.is_empty() {
			draw_label(
				ctx,
				&info.label,
				x,
				y + radius + nodes.font_size * 0.75,
				nodes.font_size,
				&nodes.font_color,
			);
		}
	});
}

fn draw_label(ctx: &CanvasRenderingContext2d, text: &str, x: f64, y: f64, size: f64, color: &str) {
	ctx.set_font(&format!("{size}px arial"));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(color);
	let _ = ctx.fill_text(text, x, y);
}

/// Tooltips are drawn in screen space so they keep their size under zoom.
fn draw_tooltip(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let Some((text, px, py)) = state.tooltip() else {
		return;
	};
	ctx.set_font(&format!("{TOOLTIP_FONT}px arial"));
	let width = ctx
		.measure_text(&text)
		.map(|m| m.width())
		.unwrap_or(text.len() as f64 * TOOLTIP_FONT * 0.6);
	let (w, h) = (width + TOOLTIP_PADDING * 2.0, TOOLTIP_FONT + TOOLTIP_PADDING * 2.0);
	let x = (px + 10.0).min(state.width - w).max(0.0);
	let y = (py + 10.0).min(state.height - h).max(0.0);

	ctx.set_fill_style_str("#f5f4ed");
	ctx.fill_rect(x, y, w, h);
	ctx.set_stroke_style_str("#808074");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(x, y, w, h);

	ctx.set_text_align("left");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str("#000000");
	let _ = ctx.fill_text(&text, x + TOOLTIP_PADDING, y + h / 2.0);
}
