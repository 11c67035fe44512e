use eframe::egui::{self, Pos2, Rect};
use std::fmt;
use std::path::{Path, PathBuf};

/// Axis-aligned rectangle in image pixel coordinates.
///
/// The corners are stored exactly as drawn; `x1` may be greater than `x2`
/// (and likewise for `y`), so use [`HotspotRect::to_egui`] when a
/// normalized rectangle is needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HotspotRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl HotspotRect {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn coords(&self) -> [i32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    pub fn from_coords([x1, y1, x2, y2]: [i32; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Builds a rectangle from two canvas points relative to `origin`.
    pub fn from_points(origin: Pos2, start: Pos2, end: Pos2) -> Self {
        let a = start - origin;
        let b = end - origin;
        Self::new(
            a.x.round() as i32,
            a.y.round() as i32,
            b.x.round() as i32,
            b.y.round() as i32,
        )
    }

    /// Normalized screen rectangle, offset by `origin`.
    pub fn to_egui(&self, origin: Pos2) -> Rect {
        Rect::from_two_pos(
            origin + egui::vec2(self.x1 as f32, self.y1 as f32),
            origin + egui::vec2(self.x2 as f32, self.y2 as f32),
        )
    }
}

/// A rectangular region on a page that links to another page by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hotspot {
    pub rect: HotspotRect,
    pub target: String,
}

impl Hotspot {
    pub fn new(rect: HotspotRect, target: impl Into<String>) -> Self {
        Self {
            rect,
            target: target.into(),
        }
    }

    /// Inspector row text, `index` is zero based.
    pub fn label(&self, index: usize) -> String {
        let HotspotRect { x1, y1, x2, y2 } = self.rect;
        format!(
            "{}: ({x1},{y1},{x2},{y2}) → {}",
            index + 1,
            self.target
        )
    }
}

/// Display state of a page's backing image.
#[derive(Clone, Default)]
pub enum PageImage {
    /// Not decoded yet; the editor loads it the first time the page is shown.
    #[default]
    Pending,
    Ready(egui::TextureHandle),
    /// Decoding failed or the file was never located.
    Unavailable(String),
}

impl fmt::Debug for PageImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageImage::Pending => f.write_str("Pending"),
            PageImage::Ready(texture) => f.debug_tuple("Ready").field(&texture.id()).finish(),
            PageImage::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

/// A named image plus its outgoing hotspots, in creation order.
#[derive(Clone, Debug)]
pub struct Page {
    pub name: String,
    /// `None` when the backing file could not be located.
    pub source: Option<PathBuf>,
    pub image: PageImage,
    pub hotspots: Vec<Hotspot>,
}

impl Page {
    pub fn new(name: impl Into<String>, source: Option<PathBuf>) -> Self {
        let name = name.into();
        let image = match source {
            Some(_) => PageImage::Pending,
            None => PageImage::Unavailable(format!("image '{name}' could not be located")),
        };
        Self {
            name,
            source,
            image,
            hotspots: Vec::new(),
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Page identifier for an image file: its base file name.
pub fn page_name_for(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn label_is_one_based() {
        let hs = Hotspot::new(HotspotRect::new(10, 20, 30, 40), "B.png");
        assert_eq!(hs.label(0), "1: (10,20,30,40) → B.png");
    }

    #[test]
    fn rect_keeps_drawn_corner_order() {
        let rect = HotspotRect::from_points(pos2(100.0, 100.0), pos2(150.0, 160.0), pos2(110.0, 120.0));
        assert_eq!(rect.coords(), [50, 60, 10, 20]);

        let screen = rect.to_egui(pos2(0.0, 0.0));
        assert_eq!(screen.min, pos2(10.0, 20.0));
        assert_eq!(screen.max, pos2(50.0, 60.0));
    }

    #[test]
    fn page_without_source_is_unavailable() {
        let page = Page::new("lost.png", None);
        assert!(matches!(page.image, PageImage::Unavailable(_)));
        assert!(page.hotspots.is_empty());
    }

    #[test]
    fn page_name_is_base_file_name() {
        assert_eq!(
            page_name_for(Path::new("/shots/login/A.png")).as_deref(),
            Some("A.png")
        );
    }
}
