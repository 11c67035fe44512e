//! Centralized constants for file names, UI sizing, and colors.

use eframe::egui::Color32;

// =============================================================================
// FILE CONSTANTS
// =============================================================================

/// File name of the macro document inside the data directory.
pub const MACRO_FILE_NAME: &str = "macros.json";

/// File name of the viewer document written into an export bundle.
pub const EXPORT_DOCUMENT_NAME: &str = "index.html";

/// Extensions offered when picking page images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Extensions offered when picking a document to import.
pub const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

// =============================================================================
// WINDOW CONSTANTS
// =============================================================================

pub const INITIAL_WINDOW_WIDTH: f32 = 1400.0;
pub const INITIAL_WINDOW_HEIGHT: f32 = 900.0;

/// Width of the page list panel.
pub const PAGES_PANEL_WIDTH: f32 = 240.0;

/// Width of the hotspot inspector and macro panel.
pub const INSPECTOR_PANEL_WIDTH: f32 = 300.0;

/// Height of a row in the hotspot inspector table.
pub const INSPECTOR_ROW_HEIGHT: f32 = 18.0;

// =============================================================================
// CANVAS CONSTANTS
// =============================================================================

/// Stroke width for hotspot outlines.
pub const HOTSPOT_STROKE_WIDTH: f32 = 2.0;

/// Rectangles smaller than this on either axis are treated as stray clicks.
pub const MIN_HOTSPOT_SIZE: f32 = 2.0;

// =============================================================================
// COLORS
// =============================================================================

/// Outline of saved hotspots.
pub const COLOR_HOTSPOT: Color32 = Color32::from_rgb(60, 120, 255);

/// Outline of the hotspot selected in the inspector.
pub const COLOR_HOTSPOT_SELECTED: Color32 = Color32::from_rgb(255, 200, 0);

/// Outline of the rectangle being drawn.
pub const COLOR_DRAFT_RECT: Color32 = Color32::RED;

/// Text for pages whose image could not be shown.
pub const COLOR_MISSING_IMAGE: Color32 = Color32::from_rgb(255, 120, 120);
