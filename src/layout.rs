//! Circular layout for the relationship diagram.
//!
//! Pure geometry only: nothing here touches a drawing surface.

use serde::Serialize;
use std::collections::HashMap;
use std::f64::consts::PI;

/// Fraction of the half-extent used as the layout circle's radius.
pub const RADIUS_FACTOR: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePosition {
    pub table_name: String,
    pub x: f64,
    pub y: f64,
}

impl TablePosition {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub positions: Vec<TablePosition>,
    pub width: f64,
    pub height: f64,
    index: HashMap<String, usize>,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Position of a table, if it was laid out.
    ///
    /// Names are expected to be unique; a repeated name resolves to its last slot.
    pub fn get(&self, table_name: &str) -> Option<Point> {
        self.index
            .get(table_name)
            .map(|&i| self.positions[i].point())
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn radius(&self) -> f64 {
        layout_radius(self.width, self.height)
    }
}

pub fn layout_radius(width: f64, height: f64) -> f64 {
    RADIUS_FACTOR * width.min(height) / 2.0
}

/// Place tables evenly on a circle centered in a `width` x `height` surface.
///
/// Table `i` of `n` sits at angle `2π·i/n`, measured from the positive x axis.
pub fn compute_layout(table_names: &[String], width: f64, height: f64) -> Layout {
    let mut layout = Layout {
        positions: Vec::with_capacity(table_names.len()),
        width,
        height,
        index: HashMap::with_capacity(table_names.len()),
    };

    if table_names.is_empty() {
        return layout;
    }

    let center = layout.center();
    let radius = layout.radius();
    let n = table_names.len() as f64;

    for (i, name) in table_names.iter().enumerate() {
        let angle = (i as f64 / n) * PI * 2.0;
        layout.index.insert(name.clone(), i);
        layout.positions.push(TablePosition {
            table_name: name.clone(),
            x: center.x + radius * angle.cos(),
            y: center.y + radius * angle.sin(),
        });
    }

    layout
}

/// Line and arrowhead for one foreign-key edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeGeometry {
    pub start: Point,
    pub end: Point,
    /// Tip first, then the two barbs.
    pub arrow: [Point; 3],
}

/// Edge between two node centers, clipped to circles of `node_radius`.
///
/// Returns `None` when the centers coincide (a self-reference), since there is
/// no direction to draw along.
pub fn edge_geometry(
    source: Point,
    target: Point,
    node_radius: f64,
    arrow_size: f64,
) -> Option<EdgeGeometry> {
    let dx = target.x - source.x;
    let dy = target.y - source.y;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance == 0.0 || !distance.is_finite() {
        return None;
    }

    let nx = dx / distance;
    let ny = dy / distance;

    let start = Point::new(source.x + nx * node_radius, source.y + ny * node_radius);
    let end = Point::new(target.x - nx * node_radius, target.y - ny * node_radius);

    let angle = (end.y - start.y).atan2(end.x - start.x);
    let barb = |offset: f64| {
        Point::new(
            end.x - arrow_size * (angle + offset).cos(),
            end.y - arrow_size * (angle + offset).sin(),
        )
    };

    Some(EdgeGeometry {
        start,
        end,
        arrow: [end, barb(-PI / 6.0), barb(PI / 6.0)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EPS: f64 = 1e-9;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("table_{}", i)).collect()
    }

    #[test]
    fn test_empty_layout() {
        let layout = compute_layout(&[], 800.0, 600.0);
        assert!(layout.is_empty());
        assert_eq!(layout.get("anything"), None);
    }

    #[rstest]
    #[case(1, 800.0, 600.0)]
    #[case(2, 800.0, 600.0)]
    #[case(5, 1024.0, 500.0)]
    #[case(12, 300.0, 900.0)]
    fn test_points_on_circle(#[case] n: usize, #[case] w: f64, #[case] h: f64) {
        let layout = compute_layout(&names(n), w, h);
        let center = Point::new(w / 2.0, h / 2.0);
        let r = 0.7 * w.min(h) / 2.0;

        assert_eq!(layout.len(), n);
        for pos in &layout.positions {
            assert!((center.distance(pos.point()) - r).abs() < EPS);
        }
    }

    #[rstest]
    #[case(3)]
    #[case(4)]
    #[case(7)]
    fn test_even_angular_spacing(#[case] n: usize) {
        let layout = compute_layout(&names(n), 800.0, 800.0);
        let center = layout.center();
        let step = 2.0 * PI / n as f64;

        for (i, pos) in layout.positions.iter().enumerate() {
            let angle = (pos.y - center.y).atan2(pos.x - center.x).rem_euclid(2.0 * PI);
            let expected = (step * i as f64).rem_euclid(2.0 * PI);
            let diff = (angle - expected).abs();
            assert!(diff < 1e-9 || (2.0 * PI - diff) < 1e-9, "table {} at {}", i, angle);
        }
    }

    #[test]
    fn test_first_table_at_zero_angle() {
        let layout = compute_layout(&names(4), 1000.0, 500.0);
        let first = layout.get("table_0").unwrap();
        assert!((first.x - (500.0 + 175.0)).abs() < EPS);
        assert!((first.y - 250.0).abs() < EPS);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let a = compute_layout(&names(6), 640.0, 480.0);
        let b = compute_layout(&names(6), 640.0, 480.0);
        assert_eq!(a.positions, b.positions);
    }

    #[test]
    fn test_edge_offsets_to_circle_boundary() {
        let source = Point::new(0.0, 0.0);
        let target = Point::new(200.0, 0.0);
        let edge = edge_geometry(source, target, 40.0, 10.0).unwrap();

        assert!((edge.start.x - 40.0).abs() < EPS);
        assert!((edge.end.x - 160.0).abs() < EPS);
        assert_eq!(edge.arrow[0], edge.end);
    }

    #[test]
    fn test_arrow_barbs() {
        let edge = edge_geometry(Point::new(0.0, 0.0), Point::new(200.0, 0.0), 40.0, 10.0).unwrap();
        let [tip, left, right] = edge.arrow;

        assert!((tip.distance(left) - 10.0).abs() < EPS);
        assert!((tip.distance(right) - 10.0).abs() < EPS);
        // Barbs mirror each other across the edge direction.
        assert!((left.x - right.x).abs() < EPS);
        assert!((left.y + right.y).abs() < EPS);
        assert!(left.x < tip.x);
    }

    #[test]
    fn test_arrow_tip_on_target_boundary() {
        let layout = compute_layout(&names(5), 900.0, 700.0);
        for a in &layout.positions {
            for b in &layout.positions {
                if a.table_name == b.table_name {
                    continue;
                }
                let edge = edge_geometry(a.point(), b.point(), 40.0, 10.0).unwrap();
                assert!((edge.arrow[0].distance(b.point()) - 40.0).abs() < 1.0);
            }
        }
    }

    #[test]
    fn test_self_reference_has_no_geometry() {
        let p = Point::new(10.0, 10.0);
        assert_eq!(edge_geometry(p, p, 40.0, 10.0), None);
    }

    #[test]
    fn test_position_serializes_for_host() {
        let layout = compute_layout(&["users".to_string()], 200.0, 100.0);
        let value = serde_json::to_value(&layout.positions).unwrap();
        assert_eq!(value, serde_json::json!([{"tableName": "users", "x": 135.0, "y": 50.0}]));
    }
}
