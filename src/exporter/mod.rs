// file: src/exporter/mod.rs
// description: answer export module exports
// reference: json output of batch results

pub mod json;

pub use json::{ExportManifest, JsonExporter};
