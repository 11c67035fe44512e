//! The in-memory page graph: pages in insertion order, each owning its hotspots.
//!
//! Hotspots refer to their target page by name. Any reference to a page the
//! graph does not know yet goes through [`PageGraph::ensure_page`], which
//! creates the page on the spot instead of rejecting the reference.

use crate::assets::AssetLocator;
use crate::error::{MapperError, MapperResult};
use crate::page::{Hotspot, HotspotRect, Page};
use std::path::PathBuf;

/// All pages of an image map. The first inserted page is the landing page.
#[derive(Clone, Debug, Default)]
pub struct PageGraph {
    pages: Vec<Page>,
}

impl PageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Page Access
    // ─────────────────────────────────────────────────────────────────────────────

    /// Pages in insertion order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.pages.iter().map(|p| p.name.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.name == name)
    }

    /// The page the exported viewer opens on.
    pub fn first_page(&self) -> Option<&Page> {
        self.pages.first()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Page Growth
    // ─────────────────────────────────────────────────────────────────────────────

    /// Adds a page unless one with `name` already exists, in which case the
    /// existing page is returned unchanged.
    pub fn add_page(&mut self, name: &str, source: Option<PathBuf>) -> &mut Page {
        let index = match self.index_of(name) {
            Some(index) => index,
            None => {
                log::debug!("Adding page '{}'", name);
                self.pages.push(Page::new(name, source));
                self.pages.len() - 1
            }
        };
        &mut self.pages[index]
    }

    /// Makes sure a page called `name` exists, resolving its image through
    /// `locator` when it has to be created. Returns true if it was created.
    ///
    /// An unresolved image still produces a page, with no source and an
    /// unavailable image, so that hotspot targets always name a real page.
    pub fn ensure_page(&mut self, name: &str, locator: &mut AssetLocator<'_>) -> bool {
        if self.contains(name) {
            return false;
        }
        let source = locator.resolve(name);
        if source.is_none() {
            log::warn!("{}", MapperError::MissingAsset(name.to_string()));
        }
        self.add_page(name, source);
        true
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Hotspot Editing
    // ─────────────────────────────────────────────────────────────────────────────

    /// Appends a hotspot to `page`, creating the target page if needed.
    pub fn add_hotspot(
        &mut self,
        page: &str,
        rect: HotspotRect,
        target: &str,
        locator: &mut AssetLocator<'_>,
    ) -> MapperResult<()> {
        if !self.contains(page) {
            return Err(MapperError::PageNotFound(page.to_string()));
        }
        self.ensure_page(target, locator);
        self.push_hotspot(page, Hotspot::new(rect, target))
    }

    /// Appends an already built hotspot without touching its target.
    pub(crate) fn push_hotspot(&mut self, page: &str, hotspot: Hotspot) -> MapperResult<()> {
        let page = self
            .get_mut(page)
            .ok_or_else(|| MapperError::PageNotFound(page.to_string()))?;
        page.hotspots.push(hotspot);
        Ok(())
    }

    /// Removes the hotspot at `index`. Out of range indices are ignored.
    pub fn remove_hotspot(&mut self, page: &str, index: usize) -> Option<Hotspot> {
        let page = self.get_mut(page)?;
        (index < page.hotspots.len()).then(|| page.hotspots.remove(index))
    }

    /// Points the hotspot at `index` to `target`, creating that page if needed.
    /// Returns false when `index` is out of range, leaving the graph untouched.
    pub fn set_hotspot_target(
        &mut self,
        page: &str,
        index: usize,
        target: &str,
        locator: &mut AssetLocator<'_>,
    ) -> MapperResult<bool> {
        let in_range = self
            .get(page)
            .ok_or_else(|| MapperError::PageNotFound(page.to_string()))?
            .hotspots
            .len()
            > index;
        if !in_range {
            return Ok(false);
        }
        self.ensure_page(target, locator);
        if let Some(hotspot) = self
            .get_mut(page)
            .and_then(|p| p.hotspots.get_mut(index))
        {
            hotspot.target = target.to_string();
        }
        Ok(true)
    }

    /// Every `(page, hotspot)` pair in page insertion then hotspot order.
    pub fn hotspot_pairs(&self) -> impl Iterator<Item = (&Page, &Hotspot)> + '_ {
        self.pages
            .iter()
            .flat_map(|page| page.hotspots.iter().map(move |hs| (page, hs)))
    }
}
