//! Named hotspot templates, persisted to a small JSON document.
//!
//! The store is loaded once at startup and rewritten wholesale after every
//! save. Persistence is best effort: a missing or corrupt document yields an
//! empty store, and a failed write leaves the in-memory store ahead of disk
//! until the next successful save.

use crate::assets::AssetLocator;
use crate::error::{MapperError, MapperResult};
use crate::page::{Hotspot, HotspotRect};
use crate::page_graph::PageGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk form of one macro hotspot.
#[derive(Serialize, Deserialize)]
struct MacroHotspot {
    coords: [i32; 4],
    target: String,
}

impl From<&Hotspot> for MacroHotspot {
    fn from(hs: &Hotspot) -> Self {
        Self {
            coords: hs.rect.coords(),
            target: hs.target.clone(),
        }
    }
}

impl From<MacroHotspot> for Hotspot {
    fn from(data: MacroHotspot) -> Self {
        Hotspot::new(HotspotRect::from_coords(data.coords), data.target)
    }
}

type MacroDocument = BTreeMap<String, Vec<MacroHotspot>>;

pub struct MacroStore {
    macros: BTreeMap<String, Vec<Hotspot>>,
    path: Option<PathBuf>,
}

impl MacroStore {
    /// A store that never touches the disk.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            macros: BTreeMap::new(),
            path: None,
        }
    }

    /// Loads the document at `path`, degrading to an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let macros = match read_document(&path) {
            Ok(Some(doc)) => doc
                .into_iter()
                .map(|(name, hotspots)| (name, hotspots.into_iter().map(Hotspot::from).collect()))
                .collect(),
            Ok(None) => BTreeMap::new(),
            Err(err) => {
                log::warn!("Ignoring unreadable macro document: {err}");
                BTreeMap::new()
            }
        };
        log::info!("Loaded {} macros from {}", macros.len(), path.display());
        Self {
            macros,
            path: Some(path),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Macro names, sorted.
    pub fn list(&self) -> Vec<String> {
        self.macros.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> MapperResult<&[Hotspot]> {
        self.macros
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| MapperError::MacroNotFound(name.to_string()))
    }

    /// Stores a copy of `hotspots` under `name`, replacing any previous
    /// macro of that name, then flushes the whole store to disk.
    pub fn save(&mut self, name: &str, hotspots: &[Hotspot]) -> MapperResult<()> {
        self.macros.insert(name.to_string(), hotspots.to_vec());
        self.flush()?;
        log::info!("Saved macro '{}' with {} hotspots", name, hotspots.len());
        Ok(())
    }

    fn flush(&self) -> MapperResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let doc: BTreeMap<&str, Vec<MacroHotspot>> = self
            .macros
            .iter()
            .map(|(name, hotspots)| (name.as_str(), hotspots.iter().map(MacroHotspot::from).collect()))
            .collect();
        let json = serde_json::to_string_pretty(&doc)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| MapperError::io("create", parent, err))?;
        }
        fs::write(path, json).map_err(|err| MapperError::io("write", path, err))
    }
}

fn read_document(path: &Path) -> MapperResult<Option<MacroDocument>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path).map_err(|err| MapperError::io("read", path, err))?;
    Ok(Some(serde_json::from_str(&text)?))
}

/// Appends a fresh copy of every hotspot of macro `name` onto `page`.
///
/// Existing hotspots are kept, so applying a macro twice doubles its
/// hotspots. Missing target pages are created through `locator`.
/// Returns the number of hotspots appended.
pub fn apply_macro(
    store: &MacroStore,
    name: &str,
    graph: &mut PageGraph,
    page: &str,
    locator: &mut AssetLocator<'_>,
) -> MapperResult<usize> {
    let hotspots = store.get(name)?;
    if !graph.contains(page) {
        return Err(MapperError::PageNotFound(page.to_string()));
    }
    for hs in hotspots {
        graph.ensure_page(&hs.target, locator);
        graph.push_hotspot(page, hs.clone())?;
    }
    log::info!("Applied macro '{}' to '{}'", name, page);
    Ok(hotspots.len())
}
