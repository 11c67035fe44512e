use std::path::PathBuf;

/// Convenience result type used across the editor core.
pub type MapperResult<T> = Result<T, MapperError>;

/// Failures the page graph, macro store, exporter and importer can report.
#[derive(thiserror::Error, Debug)]
pub enum MapperError {
    /// The document did not contain an `areas = [...]` assignment.
    #[error("could not find hotspot data in document")]
    NoHotspotData,

    /// The areas literal was found but could not be parsed.
    #[error("failed to parse hotspot data: {0}")]
    MalformedHotspotData(String),

    #[error("macro '{0}' not found")]
    MacroNotFound(String),

    #[error("page '{0}' not found")]
    PageNotFound(String),

    #[error("no pages to export")]
    NothingToExport,

    /// An image referenced by a page could not be located on disk.
    #[error("image '{0}' could not be located")]
    MissingAsset(String),

    /// A page name that the `areas` literal cannot carry intact.
    #[error("page name '{0}' cannot be written to the hotspot data unchanged")]
    UnrenderableName(String),

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("macro document error: {0}")]
    MacroDocument(#[from] serde_json::Error),

    #[error("failed to decode image {}: {message}", path.display())]
    ImageDecode { path: PathBuf, message: String },
}

impl MapperError {
    /// Build a [`MapperError::Io`] value for the given action and path.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
