//! Rebuilding a page graph from an exported (or hand written) document.

use crate::areas::{read_entries, AreaEntry};
use crate::assets::{AssetLocator, MissingAssetPrompt};
use crate::error::{MapperError, MapperResult};
use crate::page::Hotspot;
use crate::page_graph::PageGraph;
use std::fs;
use std::path::Path;

/// Builds a fresh graph from parsed entries.
///
/// Every distinct `base` becomes a page first, in order of first
/// appearance, so the first base is the landing page. Hotspots are wired
/// afterwards; targets that never appear as a base are created on demand.
///
/// The literal only records hotspots, so a page that has none and is
/// targeted by none is not rebuilt. When that page was the landing page,
/// the first base takes its place.
pub fn build_graph(entries: &[AreaEntry], locator: &mut AssetLocator<'_>) -> PageGraph {
    let mut graph = PageGraph::new();

    for entry in entries {
        graph.ensure_page(&entry.base, locator);
    }

    for entry in entries {
        graph.ensure_page(&entry.target, locator);
        let hotspot = Hotspot::new(entry.rect(), entry.target.as_str());
        if let Err(err) = graph.push_hotspot(&entry.base, hotspot) {
            // Unreachable after the first pass, but never worth aborting for.
            log::error!("Dropping hotspot: {err}");
        }
    }

    graph
}

/// Replaces `graph` with the one described by `document`.
///
/// Parsing finishes before anything is touched, so on error `graph` is left
/// exactly as it was. Images are looked up relative to `locator`'s directory.
pub fn import_document(
    graph: &mut PageGraph,
    document: &str,
    locator: &mut AssetLocator<'_>,
) -> MapperResult<()> {
    let entries = read_entries(document)?;
    *graph = build_graph(&entries, locator);
    log::info!(
        "Imported {} hotspots across {} pages",
        entries.len(),
        graph.len()
    );
    Ok(())
}

/// Reads the document at `path` and imports it, resolving images next to it.
pub fn import_file(
    graph: &mut PageGraph,
    path: &Path,
    prompt: &mut dyn MissingAssetPrompt,
) -> MapperResult<()> {
    let document = fs::read_to_string(path).map_err(|err| MapperError::io("read", path, err))?;
    let search_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut locator = AssetLocator::new(search_dir, prompt);
    import_document(graph, &document, &mut locator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::ScriptedPrompt;
    use crate::export::{export_bundle, flatten};
    use crate::page::HotspotRect;
    use std::collections::{HashSet, VecDeque};
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn names(graph: &PageGraph) -> Vec<String> {
        graph.page_names().map(str::to_owned).collect()
    }

    #[test]
    fn self_referencing_page() {
        let mut prompt = ScriptedPrompt::default();
        let mut locator = AssetLocator::new(".", &mut prompt);
        let mut graph = PageGraph::new();
        import_document(
            &mut graph,
            "areas = [{x1:0,y1:0,x2:5,y2:5,target:'x.png',base:'x.png'}]",
            &mut locator,
        )
        .unwrap();

        assert_eq!(names(&graph), vec!["x.png"]);
        let page = graph.get("x.png").unwrap();
        assert_eq!(page.hotspots, vec![Hotspot::new(HotspotRect::new(0, 0, 5, 5), "x.png")]);
    }

    #[test]
    fn missing_literal_leaves_graph_untouched() {
        let mut prompt = ScriptedPrompt::default();
        let mut locator = AssetLocator::new(".", &mut prompt);
        let mut graph = PageGraph::new();
        graph.add_page("keep.png", None);

        let err = import_document(&mut graph, "<html>no data</html>", &mut locator).unwrap_err();
        assert!(matches!(err, MapperError::NoHotspotData));
        assert_eq!(names(&graph), vec!["keep.png"]);
    }

    #[test]
    fn malformed_literal_leaves_graph_untouched() {
        let mut prompt = ScriptedPrompt::default();
        let mut locator = AssetLocator::new(".", &mut prompt);
        let mut graph = PageGraph::new();
        graph.add_page("keep.png", None);

        let err = import_document(&mut graph, "areas = [{x1:oops}]", &mut locator).unwrap_err();
        assert!(matches!(err, MapperError::MalformedHotspotData(_)));
        assert_eq!(names(&graph), vec!["keep.png"]);
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn forward_references_resolve_regardless_of_order() {
        let doc = "areas = [\
            {x1:1,y1:1,x2:2,y2:2,target:'C.png',base:'A.png'},\
            {x1:3,y1:3,x2:4,y2:4,target:'A.png',base:'B.png'},\
            {x1:5,y1:5,x2:6,y2:6,target:'D.png',base:'A.png'}]";
        let mut prompt = ScriptedPrompt::default();
        let mut locator = AssetLocator::new(".", &mut prompt);
        let mut graph = PageGraph::new();
        import_document(&mut graph, doc, &mut locator).unwrap();

        // Bases first, in first-appearance order, then target-only pages.
        assert_eq!(names(&graph), vec!["A.png", "B.png", "C.png", "D.png"]);
        assert_eq!(graph.first_page().unwrap().name, "A.png");
        let targets: Vec<&str> = graph.get("A.png").unwrap().hotspots.iter().map(|h| h.target.as_str()).collect();
        assert_eq!(targets, vec!["C.png", "D.png"]);
        assert!(graph.get("C.png").unwrap().hotspots.is_empty());
    }

    #[test]
    fn each_missing_image_is_asked_for_once() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("A.png"), b"a").unwrap();
        let picked = PathBuf::from("/picked/B.png");

        let mut prompt = ScriptedPrompt {
            answers: VecDeque::from([Some(picked.clone())]),
            ..Default::default()
        };
        let mut locator = AssetLocator::new(dir.path(), &mut prompt);
        let mut graph = PageGraph::new();
        import_document(
            &mut graph,
            "areas = [{x1:0,y1:0,x2:1,y2:1,target:'B.png',base:'A.png'},\
                      {x1:0,y1:0,x2:1,y2:1,target:'A.png',base:'B.png'}]",
            &mut locator,
        )
        .unwrap();

        assert_eq!(prompt.asked, vec!["B.png".to_string()]);
        assert_eq!(graph.get("A.png").unwrap().source(), Some(dir.path().join("A.png").as_path()));
        assert_eq!(graph.get("B.png").unwrap().source(), Some(picked.as_path()));
    }

    #[test]
    fn round_trip_through_bundle() {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        for name in ["A.png", "B.png", "C.png"] {
            std::fs::write(src.path().join(name), name.as_bytes()).unwrap();
        }

        let mut prompt = ScriptedPrompt::default();
        let mut authored = PageGraph::new();
        {
            let mut locator = AssetLocator::new(src.path(), &mut prompt);
            authored.add_page("A.png", Some(src.path().join("A.png")));
            authored.add_hotspot("A.png", HotspotRect::new(10, 10, 50, 50), "B.png", &mut locator).unwrap();
            authored.add_hotspot("A.png", HotspotRect::new(60, 10, 90, 50), "C.png", &mut locator).unwrap();
            authored.add_hotspot("B.png", HotspotRect::new(0, 0, 20, 20), "A.png", &mut locator).unwrap();
            authored.add_hotspot("C.png", HotspotRect::new(5, 5, 1, 1), "C.png", &mut locator).unwrap();
        }

        let report = export_bundle(&authored, out.path()).unwrap();
        assert!(report.is_complete());

        let mut imported = PageGraph::new();
        import_file(&mut imported, &report.document, &mut prompt).unwrap();
        assert!(prompt.asked.is_empty());

        assert_eq!(names(&imported), names(&authored));
        for page in authored.pages() {
            let other = imported.get(&page.name).unwrap();
            assert_eq!(other.hotspots, page.hotspots);
            assert_eq!(other.source(), Some(out.path().join(&page.name).as_path()));
        }

        // Re-exporting yields the same records.
        let first: HashSet<_> = flatten(&authored).into_iter().collect();
        let second: HashSet<_> = flatten(&imported).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn isolated_page_is_dropped_on_round_trip() {
        let out = tempdir().unwrap();
        let mut prompt = ScriptedPrompt::default();
        let mut authored = PageGraph::new();
        {
            let mut locator = AssetLocator::new(out.path(), &mut prompt);
            authored.add_page("cover.png", None);
            authored.add_page("A.png", None);
            authored.add_hotspot("A.png", HotspotRect::new(0, 0, 5, 5), "B.png", &mut locator).unwrap();
        }
        assert_eq!(authored.first_page().unwrap().name, "cover.png");

        let report = export_bundle(&authored, out.path()).unwrap();
        let mut imported = PageGraph::new();
        import_file(&mut imported, &report.document, &mut prompt).unwrap();

        assert_eq!(names(&imported), vec!["A.png", "B.png"]);
        assert_eq!(imported.first_page().unwrap().name, "A.png");
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let dir = tempdir().unwrap();
        let mut prompt = ScriptedPrompt::default();
        let mut graph = PageGraph::new();
        let err = import_file(&mut graph, &dir.path().join("missing.html"), &mut prompt).unwrap_err();
        assert!(matches!(err, MapperError::Io { action: "read", .. }));
    }
}
