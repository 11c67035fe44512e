//! Exporting a page graph as a standalone browser simulator.
//!
//! A bundle is a directory holding a copy of every page image plus one
//! viewer document that embeds the `areas` literal.

use crate::areas::{is_literal_safe, render_literal, AreaEntry};
use crate::constants::EXPORT_DOCUMENT_NAME;
use crate::error::{MapperError, MapperResult};
use crate::page_graph::PageGraph;
use std::fs;
use std::path::{Path, PathBuf};

const VIEWER_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Image Map Simulator</title>
<style>
#container { position: relative; display: inline-block; }
#mainImage { display: block; }
.area {
    position: absolute;
    border: 2px solid rgba(255,0,0,0.25);
    cursor: pointer;
    z-index: 10;
}
</style>
<script>
let areas = {{AREAS}};

function loadImage(img) {
    const main = document.getElementById("mainImage");
    main.onload = () => redrawHotspots(img);
    main.src = img;
}

function redrawHotspots(baseImg) {
    const container = document.getElementById("container");
    document.querySelectorAll(".area").forEach(a => a.remove());

    areas.filter(a => a.base === baseImg).forEach(hs => {
        const div = document.createElement("div");
        div.className = "area";
        div.style.left = Math.min(hs.x1, hs.x2) + "px";
        div.style.top = Math.min(hs.y1, hs.y2) + "px";
        div.style.width = Math.abs(hs.x2 - hs.x1) + "px";
        div.style.height = Math.abs(hs.y2 - hs.y1) + "px";
        div.onclick = () => loadImage(hs.target);
        container.appendChild(div);
    });
}

window.onload = () => loadImage({{FIRST_PAGE}});
</script>
</head>

<body>
<div id="container">
    <img id="mainImage" src="">
</div>
</body>
</html>
"#;

/// Flattens every hotspot into an entry tagged with its owning page.
pub fn flatten(graph: &PageGraph) -> Vec<AreaEntry> {
    graph
        .hotspot_pairs()
        .map(|(page, hs)| AreaEntry::new(hs.rect, &hs.target, &page.name))
        .collect()
}

/// Builds the viewer document for `graph`.
pub fn render_viewer(graph: &PageGraph) -> MapperResult<String> {
    let first = graph.first_page().ok_or(MapperError::NothingToExport)?;
    let first_page = serde_json::to_string(&first.name)?;
    Ok(VIEWER_TEMPLATE
        .replace("{{AREAS}}", &render_literal(&flatten(graph)))
        .replace("{{FIRST_PAGE}}", &first_page))
}

/// Outcome of a bundle export. Image copies fail independently.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub document: PathBuf,
    pub copied: Vec<PathBuf>,
    pub failed: Vec<(String, MapperError)>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes the bundle into `export_dir`, creating the directory if needed.
///
/// Each image is written under its page name, which is what the viewer
/// loads. A failing image copy, or a page name the literal cannot carry,
/// is recorded in the report and the export carries on. Failing to write
/// the viewer document fails the whole call.
pub fn export_bundle(graph: &PageGraph, export_dir: &Path) -> MapperResult<ExportReport> {
    let viewer = render_viewer(graph)?;
    fs::create_dir_all(export_dir)
        .map_err(|err| MapperError::io("create", export_dir, err))?;

    let mut report = ExportReport::default();
    for page in graph.pages() {
        if !is_literal_safe(&page.name) {
            log::warn!("Page name '{}' will not survive re-import", page.name);
            report
                .failed
                .push((page.name.clone(), MapperError::UnrenderableName(page.name.clone())));
        }
        match copy_page_image(page.source(), &page.name, export_dir) {
            Ok(dst) => report.copied.push(dst),
            Err(err) => {
                log::warn!("Skipping image for page '{}': {}", page.name, err);
                report.failed.push((page.name.clone(), err));
            }
        }
    }

    let document = export_dir.join(EXPORT_DOCUMENT_NAME);
    fs::write(&document, viewer).map_err(|err| MapperError::io("write", &document, err))?;
    report.document = document;

    log::info!(
        "Exported {} pages to {} ({} image copies failed)",
        graph.len(),
        export_dir.display(),
        report.failed.len()
    );
    Ok(report)
}

fn copy_page_image(source: Option<&Path>, name: &str, export_dir: &Path) -> MapperResult<PathBuf> {
    let src = source.ok_or_else(|| MapperError::MissingAsset(name.to_string()))?;
    let dst = export_dir.join(name);

    // Copying a file onto itself truncates it.
    if same_file(src, &dst) {
        return Ok(dst);
    }
    fs::copy(src, &dst).map_err(|err| MapperError::io("copy", src, err))?;
    Ok(dst)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::ScriptedPrompt;
    use crate::assets::AssetLocator;
    use crate::page::HotspotRect;
    use std::collections::VecDeque;
    use tempfile::tempdir;

    fn two_page_graph(src_dir: &Path) -> PageGraph {
        std::fs::write(src_dir.join("A.png"), b"image-a").unwrap();
        std::fs::write(src_dir.join("B.png"), b"image-b").unwrap();

        let mut prompt = ScriptedPrompt::default();
        let mut locator = AssetLocator::new(src_dir, &mut prompt);
        let mut graph = PageGraph::new();
        graph.add_page("A.png", Some(src_dir.join("A.png")));
        graph
            .add_hotspot("A.png", HotspotRect::new(10, 10, 50, 50), "B.png", &mut locator)
            .unwrap();
        graph
    }

    #[test]
    fn single_hotspot_example() {
        let src = tempdir().unwrap();
        let graph = two_page_graph(src.path());

        let html = render_viewer(&graph).unwrap();
        assert!(html.contains(
            "let areas = [{x1:10, y1:10, x2:50, y2:50, target:'B.png', base:'A.png'}];"
        ));
        assert!(html.contains(r#"window.onload = () => loadImage("A.png");"#));
    }

    #[test]
    fn empty_graph_has_nothing_to_export() {
        let out = tempdir().unwrap();
        let err = export_bundle(&PageGraph::new(), out.path()).unwrap_err();
        assert!(matches!(err, MapperError::NothingToExport));
        assert!(!out.path().join(EXPORT_DOCUMENT_NAME).exists());
    }

    #[test]
    fn page_without_hotspots_exports_empty_array() {
        let mut graph = PageGraph::new();
        graph.add_page("only.png", None);
        let html = render_viewer(&graph).unwrap();
        assert!(html.contains("let areas = [];"));
    }

    #[test]
    fn bundle_copies_images_and_writes_viewer() {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        let graph = two_page_graph(src.path());

        let report = export_bundle(&graph, &out.path().join("bundle")).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.copied.len(), 2);

        let bundle = out.path().join("bundle");
        assert_eq!(std::fs::read(bundle.join("A.png")).unwrap(), b"image-a");
        assert_eq!(std::fs::read(bundle.join("B.png")).unwrap(), b"image-b");
        assert_eq!(report.document, bundle.join(EXPORT_DOCUMENT_NAME));
        assert!(report.document.is_file());
    }

    #[test]
    fn unresolved_page_is_reported_not_fatal() {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        let mut graph = two_page_graph(src.path());
        graph.add_page("lost.png", None);

        let report = export_bundle(&graph, out.path()).unwrap();
        assert_eq!(report.copied.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "lost.png");
        assert!(matches!(report.failed[0].1, MapperError::MissingAsset(_)));
        assert!(report.document.is_file());
    }

    #[test]
    fn located_image_is_bundled_under_page_name() {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        std::fs::write(src.path().join("A.png"), b"image-a").unwrap();
        std::fs::write(src.path().join("other.png"), b"image-b").unwrap();

        let mut prompt = ScriptedPrompt {
            answers: VecDeque::from([Some(src.path().join("other.png"))]),
            ..Default::default()
        };
        let mut locator = AssetLocator::new(out.path().join("nowhere"), &mut prompt);
        let mut graph = PageGraph::new();
        graph.add_page("A.png", Some(src.path().join("A.png")));
        graph
            .add_hotspot("A.png", HotspotRect::new(0, 0, 5, 5), "B.png", &mut locator)
            .unwrap();

        let report = export_bundle(&graph, out.path()).unwrap();
        assert!(report.is_complete());
        assert_eq!(std::fs::read(out.path().join("B.png")).unwrap(), b"image-b");
        assert!(!out.path().join("other.png").exists());
    }

    #[test]
    fn pages_sharing_a_file_name_do_not_collide() {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        for dir in ["one", "two"] {
            std::fs::create_dir(src.path().join(dir)).unwrap();
            std::fs::write(src.path().join(dir).join("shot.png"), dir.as_bytes()).unwrap();
        }

        let mut graph = PageGraph::new();
        graph.add_page("first.png", Some(src.path().join("one").join("shot.png")));
        graph.add_page("second.png", Some(src.path().join("two").join("shot.png")));

        let report = export_bundle(&graph, out.path()).unwrap();
        assert!(report.is_complete());
        assert_eq!(std::fs::read(out.path().join("first.png")).unwrap(), b"one");
        assert_eq!(std::fs::read(out.path().join("second.png")).unwrap(), b"two");
    }

    #[test]
    fn quoted_page_name_is_reported() {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        std::fs::write(src.path().join("Bob's.png"), b"bob").unwrap();
        let mut graph = PageGraph::new();
        graph.add_page("Bob's.png", Some(src.path().join("Bob's.png")));

        let report = export_bundle(&graph, out.path()).unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(&report.failed[0].1, MapperError::UnrenderableName(n) if n == "Bob's.png"));
        assert!(out.path().join("Bob's.png").is_file());
        assert!(report.document.is_file());
    }

    #[test]
    fn export_into_source_dir_keeps_images_intact() {
        let src = tempdir().unwrap();
        let graph = two_page_graph(src.path());

        let report = export_bundle(&graph, src.path()).unwrap();
        assert!(report.is_complete());
        assert_eq!(std::fs::read(src.path().join("A.png")).unwrap(), b"image-a");
    }
}
