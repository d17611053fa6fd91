use crate::layout::Point;
use crate::render::DrawingSurface;

/// A `DrawingSurface` that records primitives as SVG elements.
pub struct SvgSurface {
    width: f64,
    height: f64,
    elements: Vec<String>,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Serialize everything drawn so far as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = fmt_num(self.width),
            h = fmt_num(self.height)
        );
        for element in &self.elements {
            svg.push_str(element);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }
}

impl DrawingSurface for SvgSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.elements.clear();
    }

    fn draw_circle(&mut self, center: Point, radius: f64, fill: &str, stroke: &str, line_width: f64) {
        self.elements.push(format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" stroke-width="{}" />"#,
            fmt_num(center.x),
            fmt_num(center.y),
            fmt_num(radius),
            escape_xml(fill),
            escape_xml(stroke),
            fmt_num(line_width)
        ));
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: &str, line_width: f64) {
        self.elements.push(format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" />"#,
            fmt_num(from.x),
            fmt_num(from.y),
            fmt_num(to.x),
            fmt_num(to.y),
            escape_xml(stroke),
            fmt_num(line_width)
        ));
    }

    fn draw_filled_polygon(&mut self, points: &[Point], fill: &str) {
        let points = points
            .iter()
            .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
            .collect::<Vec<_>>()
            .join(" ");
        self.elements.push(format!(
            r#"<polygon points="{}" fill="{}" />"#,
            points,
            escape_xml(fill)
        ));
    }

    fn draw_text(&mut self, text: &str, at: Point, color: &str, font: &str) {
        self.elements.push(format!(
            r#"<text x="{}" y="{}" fill="{}" style="font: {}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
            fmt_num(at.x),
            fmt_num(at.y),
            escape_xml(color),
            escape_xml(font),
            escape_xml(text)
        ));
    }
}

// Two decimals keeps documents small and stable across platforms.
fn fmt_num(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
