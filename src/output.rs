//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Render (`--headers`)
//!
//! ```text
//! HTTP 200 OK
//! content-type: text/html; charset=utf-8
//! cache-control: public
//!
//! <!DOCTYPE html>...
//! ```
//!
//! ## Check assets
//!
//! ```text
//! Registry files
//!     media/system.asset.json
//!
//! Presets
//! 001 core
//!     styles: base, theme
//!     scripts: core, app
//!
//! 4 scripts, 2 styles, 1 preset
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::assets::{AssetError, AssetKind, WebAssetManager, WebAssetRegistry};
use crate::document::Response;
use std::io::{self, Write};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

// ============================================================================
// Render
// ============================================================================

/// Status line and headers of a rendered response.
pub fn format_headers(response: &Response) -> Vec<String> {
    let mut lines = vec![format!(
        "HTTP {} {}",
        response.status.as_u16(),
        response.status.canonical_reason().unwrap_or("")
    )
    .trim_end()
    .to_string()];
    for (name, value) in &response.headers {
        lines.push(format!("{}: {}", name, value.to_str().unwrap_or("<binary>")));
    }
    lines
}

/// Write a response to stdout, optionally preceded by its headers.
pub fn print_response(response: &Response, with_headers: bool) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    if with_headers {
        for line in format_headers(response) {
            writeln!(stdout, "{}", line)?;
        }
        writeln!(stdout)?;
    }
    stdout.write_all(&response.body)?;
    stdout.flush()
}

// ============================================================================
// Check assets
// ============================================================================

/// Show the registry files and the resolved asset order of every preset.
///
/// Each preset is resolved in a fresh manager, so unknown, unsatisfied or
/// circular dependencies surface as errors.
pub fn format_asset_report(registry: &WebAssetRegistry) -> Result<Vec<String>, AssetError> {
    let mut lines = vec!["Registry files".to_string()];
    for path in registry.registry_files() {
        lines.push(format!("{}{}", indent(1), path.display()));
    }

    let presets: Vec<&str> = registry
        .assets_of(AssetKind::Preset)
        .map(|p| p.name.as_str())
        .collect();
    if !presets.is_empty() {
        lines.push(String::new());
        lines.push("Presets".to_string());
    }
    for (i, preset) in presets.iter().enumerate() {
        let mut manager = WebAssetManager::new(registry.clone());
        manager.use_preset(preset)?;
        lines.push(format!("{} {}", format_index(i + 1), preset));
        for (label, kind) in [("styles", AssetKind::Style), ("scripts", AssetKind::Script)] {
            let names: Vec<String> = manager
                .get_assets(kind, true)?
                .into_iter()
                .map(|a| a.name)
                .collect();
            if !names.is_empty() {
                lines.push(format!("{}{}: {}", indent(1), label, names.join(", ")));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{}, {}, {}",
        plural(registry.assets_of(AssetKind::Script).count(), "script"),
        plural(registry.assets_of(AssetKind::Style).count(), "style"),
        plural(presets.len(), "preset"),
    ));
    Ok(lines)
}

pub fn print_asset_report(registry: &WebAssetRegistry) -> Result<(), AssetError> {
    for line in format_asset_report(registry)? {
        println!("{}", line);
    }
    Ok(())
}
