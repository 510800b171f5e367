//! Discovery Module for the Codegen Core
//!
//! Recursively scans a directory for per-namespace introspection dumps
//! (one JSON document per namespace, as emitted by the external parser)
//! and deserializes them into raw namespaces. A dump that fails to parse
//! is reported and skipped; discovery never aborts the run.

use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::raw::RawNamespace;

lazy_static! {
    /// Dump file names look like `Gtk.json` or `Gtk-4.0.json`.
    static ref DUMP_FILE_RE: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(-[0-9][0-9.]*)?\.json$").unwrap();
}

/// Discover all namespace dumps under a directory, sorted by namespace
/// name for deterministic downstream iteration.
pub fn discover_namespaces(base_dir: &Path) -> Vec<RawNamespace> {
    let mut namespaces = Vec::new();

    if !base_dir.exists() {
        return namespaces;
    }

    for file_path in find_dump_files(base_dir) {
        match parse_dump_file(&file_path) {
            Ok(ns) => namespaces.push(ns),
            Err(e) => {
                eprintln!("[GirCodegen] Failed to parse namespace dump {:?}: {}", file_path, e);
                // Continue despite errors in one dump
            }
        }
    }

    namespaces.sort_by(|a, b| a.name.cmp(&b.name));
    namespaces
}

/// Recursively find all dump files in a directory
fn find_dump_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true) {
        if let Ok(entry) = entry {
            let path = entry.path();
            if path.is_file() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    if DUMP_FILE_RE.is_match(name) {
                        files.push(path.to_path_buf());
                    }
                }
            }
        }
    }

    files
}

fn parse_dump_file(file_path: &Path) -> Result<RawNamespace, String> {
    let source =
        fs::read_to_string(file_path).map_err(|e| format!("Failed to read file: {}", e))?;
    serde_json::from_str(&source).map_err(|e| e.to_string())
}
