//! WASM bindings for the erd-layout-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Each one takes a JSON string and returns a JSON string; failures are
//! reported inside the returned JSON and echoed to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::LayoutError;
use crate::layout::overlap;
use crate::output::{ErrorInfo, ImportOutput, LayoutOutput, OverlapOutput};
use crate::request::{LayoutAlgorithm, LayoutRequest, TablesRequest};
use crate::schema;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

/// `log` backend that forwards records to the browser console.
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}: {}", record.level(), record.target(), record.args());
        if record.level() <= Level::Warn {
            console_error(&line);
        } else {
            console_log(&line);
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Route `log` output to the console. `level` is one of `error`, `warn`,
/// `info`, `debug`, `trace`; anything else means `info`. Calling it again
/// only changes the level.
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    let filter = level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
    // set_logger fails once a logger is installed; the level still applies.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(filter);
}

/// Run a layout request. The request's `algorithm` picks the layout.
#[wasm_bindgen]
pub fn adjust_table_positions(input: &str) -> String {
    let out = layout_json(input, None);
    report(out.error.as_ref());
    to_json(&out)
}

/// Run a layout request with the optimized algorithm, whatever the request says.
#[wasm_bindgen]
pub fn adjust_table_positions_optimized(input: &str) -> String {
    let out = layout_json(input, Some(LayoutAlgorithm::Optimized));
    report(out.error.as_ref());
    to_json(&out)
}

/// Convert a custom JSON schema document into a laid-out diagram.
#[wasm_bindgen]
pub fn import_custom_json(input: &str) -> String {
    let out = import_json(input);
    report(out.error.as_ref());
    to_json(&out)
}

/// List the pairs of tables whose boxes touch or overlap.
#[wasm_bindgen]
pub fn find_overlapping_tables(input: &str) -> String {
    let out = overlap_json(input);
    report(out.error.as_ref());
    to_json(&out)
}

fn layout_json(input: &str, force: Option<LayoutAlgorithm>) -> LayoutOutput {
    let run = || -> Result<_, LayoutError> {
        let mut req = LayoutRequest::from_json(input)?;
        if let Some(algorithm) = force {
            req.algorithm = algorithm;
        }
        req.run()
    };
    match run() {
        Ok(tables) => LayoutOutput::ok(tables),
        Err(e) => LayoutOutput::failed(&e),
    }
}

fn import_json(input: &str) -> ImportOutput {
    match schema::import_custom_json(input) {
        Ok(diagram) => ImportOutput::ok(diagram),
        Err(e) => ImportOutput::failed(&e),
    }
}

fn overlap_json(input: &str) -> OverlapOutput {
    match TablesRequest::from_json(input) {
        Ok(req) => OverlapOutput::ok(overlap::find_overlapping_tables(&req.tables)),
        Err(e) => OverlapOutput::failed(&e),
    }
}

fn report(error: Option<&ErrorInfo>) {
    if let Some(e) = error {
        console_error(&format!("Error at {}:{}: {}", e.line, e.column, e.message));
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| format!("{{\"error\":{{\"message\":{:?}}}}}", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &str = r#"{
        "tables": [
            {"id": "a", "name": "a", "x": 0, "y": 0},
            {"id": "b", "name": "b", "x": 0, "y": 0}
        ],
        "relationships": [{"id": "r", "sourceTableId": "a", "targetTableId": "b"}]
    }"#;

    #[test]
    fn test_layout_json_round_trip() {
        let out = layout_json(REQUEST, None);
        assert!(out.error.is_none());
        assert_eq!(out.tables.len(), 2);
        assert_eq!((out.tables[0].x, out.tables[0].y), (100.0, 100.0));
    }

    #[test]
    fn test_forced_algorithm() {
        let standard = layout_json(REQUEST, None);
        let optimized = layout_json(REQUEST, Some(LayoutAlgorithm::Optimized));
        assert_ne!(standard.tables, optimized.tables);
    }

    #[test]
    fn test_layout_json_reports_parse_error() {
        let out = layout_json("{\"tables\": [", None);
        assert!(out.tables.is_empty());
        let err = out.error.unwrap();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_overlap_json() {
        let out = overlap_json(
            r#"{"tables": [
                {"id": "a", "name": "a", "x": 0, "y": 0},
                {"id": "b", "name": "b", "x": 50, "y": 50},
                {"id": "c", "name": "c", "x": 900, "y": 0}
            ]}"#,
        );
        assert!(out.has_overlap);
        assert_eq!(out.pairs.len(), 1);
        assert_eq!((out.pairs[0].first.as_str(), out.pairs[0].second.as_str()), ("a", "b"));
    }

    #[test]
    fn test_import_json_error() {
        let out = import_json("not json");
        assert!(out.diagram.is_none());
        assert!(out.error.is_some());
    }

    #[test]
    fn test_to_json_output_shape() {
        let json = to_json(&layout_json(REQUEST, None));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["tables"].is_array());
        assert!(value.get("error").is_none());
    }
}
