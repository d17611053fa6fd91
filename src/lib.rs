pub mod cli;
pub mod config;
pub mod db;
pub mod diagram;
pub mod error;
pub mod grid;
pub mod layout;
pub mod measure;
pub mod model;
pub mod render;
pub mod sql;
pub mod svg;

#[cfg(test)]
mod test_utils;

use wasm_bindgen::prelude::*;

use diagram::{CanvasSize, DiagramView, ResizeEvents};
use model::{Relationship, Row};
use render::DiagramRenderer;
use sql::{ExecutorResponse, QueryResult};
use std::cell::RefCell;
use std::rc::Rc;
use svg::SvgSurface;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn parse_relationships(json: &str) -> Result<Vec<Relationship>, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid relationships: {}", e))
}

/// Render a relationships JSON array to an SVG diagram
#[wasm_bindgen(js_name = "relationshipsToSvg")]
pub fn render_relationships(json: &str, width: f64, height: f64) -> Result<String, String> {
    let relationships = parse_relationships(json)?;
    let mut surface = SvgSurface::new(width, height);
    DiagramRenderer::default().draw(&mut surface, &relationships);
    Ok(surface.to_svg())
}

/// Circular positions for table names, as `{ tableName, x, y }` objects
#[wasm_bindgen(js_name = "computeLayout")]
pub fn compute_layout_js(
    table_names: js_sys::Array,
    width: f64,
    height: f64,
) -> Result<JsValue, JsValue> {
    let names: Vec<String> = table_names.iter().filter_map(|v| v.as_string()).collect();
    let layout = layout::compute_layout(&names, width, height);
    serde_wasm_bindgen::to_value(&layout.positions).map_err(JsValue::from)
}

/// Serialize a JSON array of row objects as CSV
#[wasm_bindgen(js_name = "rowsToCsv")]
pub fn rows_to_csv(json: &str) -> Result<String, String> {
    let rows: Vec<Row> = serde_json::from_str(json).map_err(|e| format!("Invalid rows: {}", e))?;
    Ok(sql::to_csv(&rows))
}

/// Turn a `{ success, data, error }` executor response into a tagged result
#[wasm_bindgen(js_name = "interpretQueryResponse")]
pub fn interpret_query_response(json: &str) -> Result<String, String> {
    let response: ExecutorResponse =
        serde_json::from_str(json).map_err(|e| format!("Invalid response: {}", e))?;
    let result = match response.into_result() {
        Ok(rows) => QueryResult::from_rows(rows),
        Err(e) => QueryResult::Error {
            message: e.to_string(),
        },
    };
    serde_json::to_string(&result).map_err(|e| e.to_string())
}

/// File name for a CSV download started now
#[wasm_bindgen(js_name = "csvDownloadName")]
pub fn csv_download_name() -> String {
    sql::csv_file_name_now()
}

/// Relationship diagram kept in sync with the host's canvas size.
///
/// The host calls `resize` from its window listener and `free` on unmount;
/// freeing drops the view, which unregisters its resize listener.
#[wasm_bindgen]
pub struct RelationshipDiagram {
    events: ResizeEvents,
    view: DiagramView<SvgSurface>,
}

#[wasm_bindgen]
impl RelationshipDiagram {
    #[wasm_bindgen(constructor)]
    pub fn new(relationships_json: &str, width: f64, height: f64) -> Result<RelationshipDiagram, String> {
        let relationships = parse_relationships(relationships_json)?;
        let events = ResizeEvents::new();
        let surface = Rc::new(RefCell::new(SvgSurface::new(width, height)));
        let view = DiagramView::mount(surface, &events, relationships, DiagramRenderer::default());
        Ok(Self { events, view })
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.events.emit(CanvasSize { width, height });
    }

    #[wasm_bindgen(js_name = "tableCount")]
    pub fn table_count(&self) -> usize {
        self.view.layout().len()
    }

    pub fn svg(&self) -> String {
        self.view.surface().borrow().to_svg()
    }
}
