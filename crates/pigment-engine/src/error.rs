use std::path::PathBuf;

/// Recoverable failure while loading a font or an image.
///
/// Returned by the `load_*` entry points; the scene's slot table, font list and
/// vertex cursor are left exactly as they were.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font parse error: {0}")]
    Font(String),

    #[error("font charset is empty")]
    EmptyCharset,

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("svg parse error: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("svg has an empty canvas")]
    EmptySvg,

    #[error("unsupported image type `{0}`")]
    UnsupportedKind(String),

    #[error("image of {width}x{height} exceeds the {limit}px texture limit")]
    TooLarge { width: u32, height: u32, limit: u32 },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io { path: path.into(), source }
    }
}
