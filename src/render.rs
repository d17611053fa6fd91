//! Relationship diagram rendering onto an abstract 2D surface.

use crate::layout::{EdgeGeometry, Layout, Point, compute_layout, edge_geometry};
use crate::model::{Relationship, table_names};

/// Minimal 2D drawing capability the diagram needs.
///
/// Colors are CSS color strings.
pub trait DrawingSurface {
    /// Current size in pixels as `(width, height)`.
    fn size(&self) -> (f64, f64);
    fn resize(&mut self, width: f64, height: f64);
    fn clear(&mut self);
    fn draw_circle(&mut self, center: Point, radius: f64, fill: &str, stroke: &str, line_width: f64);
    fn draw_line(&mut self, from: Point, to: Point, stroke: &str, line_width: f64);
    fn draw_filled_polygon(&mut self, points: &[Point], fill: &str);
    /// Draw text centered horizontally and vertically on `at`.
    fn draw_text(&mut self, text: &str, at: Point, color: &str, font: &str);
}

#[derive(Debug, Clone)]
pub struct DiagramStyle {
    pub node_radius: f64,
    pub node_fill: &'static str,
    pub node_stroke: &'static str,
    pub node_line_width: f64,
    pub label_color: &'static str,
    pub label_font: &'static str,
    pub edge_color: &'static str,
    pub edge_line_width: f64,
    pub arrow_size: f64,
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self {
            node_radius: 40.0,
            node_fill: "#f1f5f9",
            node_stroke: "#94a3b8",
            node_line_width: 2.0,
            label_color: "#0f172a",
            label_font: "12px sans-serif",
            edge_color: "#3b82f6",
            edge_line_width: 2.0,
            arrow_size: 10.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiagramRenderer {
    pub style: DiagramStyle,
}

impl DiagramRenderer {
    pub fn new(style: DiagramStyle) -> Self {
        Self { style }
    }

    /// Lay out and draw the whole diagram at the surface's current size.
    pub fn draw<S: DrawingSurface + ?Sized>(&self, surface: &mut S, relationships: &[Relationship]) -> Layout {
        let (width, height) = surface.size();
        let layout = compute_layout(&table_names(relationships), width, height);
        self.render(surface, &layout, relationships);
        layout
    }

    /// Draw nodes, then edges. An empty layout leaves the surface untouched.
    pub fn render<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        layout: &Layout,
        relationships: &[Relationship],
    ) {
        if layout.is_empty() {
            return;
        }
        surface.clear();

        let style = &self.style;
        for pos in &layout.positions {
            surface.draw_circle(
                pos.point(),
                style.node_radius,
                style.node_fill,
                style.node_stroke,
                style.node_line_width,
            );
            surface.draw_text(&pos.table_name, pos.point(), style.label_color, style.label_font);
        }

        for edge in self.edges(layout, relationships) {
            surface.draw_line(edge.start, edge.end, style.edge_color, style.edge_line_width);
            surface.draw_filled_polygon(&edge.arrow, style.edge_color);
        }
    }

    /// Geometry of every drawable edge, skipping relationships whose tables
    /// are not in the layout.
    pub fn edges(&self, layout: &Layout, relationships: &[Relationship]) -> Vec<EdgeGeometry> {
        relationships
            .iter()
            .filter_map(|rel| {
                let source = layout.get(&rel.table_name)?;
                let target = layout.get(&rel.foreign_table)?;
                edge_geometry(source, target, self.style.node_radius, self.style.arrow_size)
            })
            .collect()
    }
}
