//! Native dialogs. Every call blocks until the user answers.

use crate::assets::MissingAssetPrompt;
use crate::constants::{HTML_EXTENSIONS, IMAGE_EXTENSIONS};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use std::path::PathBuf;

pub fn pick_image(title: &str) -> Option<PathBuf> {
    FileDialog::new()
        .set_title(title)
        .add_filter("Image files", IMAGE_EXTENSIONS)
        .pick_file()
}

pub fn pick_html() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Import HTML Simulator")
        .add_filter("HTML Files", HTML_EXTENSIONS)
        .pick_file()
}

pub fn pick_export_dir() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Select Export Directory")
        .pick_folder()
}

pub fn show_error(message: &str) {
    show(MessageLevel::Error, "Error", message);
}

pub fn show_warning(title: &str, message: &str) {
    show(MessageLevel::Warning, title, message);
}

pub fn show_info(title: &str, message: &str) {
    show(MessageLevel::Info, title, message);
}

fn show(level: MessageLevel, title: &str, message: &str) {
    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// Warns about the missing file, then lets the user pick it by hand.
pub struct DialogAssetPrompt;

impl MissingAssetPrompt for DialogAssetPrompt {
    fn locate_manually(&mut self, file_name: &str) -> Option<PathBuf> {
        show_warning(
            "Missing Image",
            &format!("Image '{file_name}' not found. Please locate it."),
        );
        pick_image(&format!("Locate {file_name}"))
    }
}
