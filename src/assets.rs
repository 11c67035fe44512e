//! Locating page images on disk.
//!
//! Lookup is a two step affair: first the file name is tried inside a
//! search directory, then the human is asked through a [`MissingAssetPrompt`].
//! The prompt is injected so the core can run against a scripted fake.

use std::path::{Path, PathBuf};

/// Human-in-the-loop fallback used when a file cannot be found automatically.
pub trait MissingAssetPrompt {
    /// Blocks until the user picks a file for `file_name` or gives up.
    fn locate_manually(&mut self, file_name: &str) -> Option<PathBuf>;
}

/// Returns the path of `file_name` inside `search_dir` if it exists.
pub fn locate(file_name: &str, search_dir: &Path) -> Option<PathBuf> {
    let candidate = search_dir.join(file_name);
    candidate.is_file().then_some(candidate)
}

/// Resolves page names to image paths relative to one directory.
pub struct AssetLocator<'p> {
    search_dir: PathBuf,
    prompt: &'p mut dyn MissingAssetPrompt,
}

impl<'p> AssetLocator<'p> {
    pub fn new(search_dir: impl Into<PathBuf>, prompt: &'p mut dyn MissingAssetPrompt) -> Self {
        Self {
            search_dir: search_dir.into(),
            prompt,
        }
    }

    /// Returns a resolved path, or `None` when both the search directory
    /// and the human came up empty.
    pub fn resolve(&mut self, file_name: &str) -> Option<PathBuf> {
        if let Some(path) = locate(file_name, &self.search_dir) {
            return Some(path);
        }
        log::warn!(
            "Image '{}' not found in {}, asking for its location",
            file_name,
            self.search_dir.display()
        );
        let picked = self.prompt.locate_manually(file_name);
        if picked.is_none() {
            log::warn!("Image '{}' left unresolved", file_name);
        }
        picked
    }
}
