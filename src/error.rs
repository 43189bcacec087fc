use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfCensusError {
    #[error("PDF read error: {0}")]
    PdfReadError(String),

    #[error("Content stream error: {0}")]
    ContentStreamError(String),

    #[error("Resource error: {0}")]
    ResourceError(String),

    #[error("Image XObject error: {0}")]
    ImageXObjectError(String),

    #[error("Report error: {0}")]
    ReportError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`PdfCensusError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl PdfCensusError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a PDF read error.
    pdf_read => PdfReadError,
    /// Create a content stream error.
    content_stream => ContentStreamError,
    /// Create a resource resolution error.
    resource => ResourceError,
    /// Create an image XObject error.
    image_xobject => ImageXObjectError,
}

impl From<lopdf::Error> for PdfCensusError {
    fn from(e: lopdf::Error) -> Self {
        Self::PdfReadError(e.to_string())
    }
}

impl From<serde_json::Error> for PdfCensusError {
    fn from(e: serde_json::Error) -> Self {
        Self::ReportError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PdfCensusError>;
