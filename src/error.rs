use std::path::PathBuf;

/// Everything that can stop the tracer.
///
/// Degenerate screen regions are deliberately absent: they produce an
/// empty drawing, not an error.
#[derive(Debug, thiserror::Error)]
pub enum TracerError {
    #[error("No image file was selected")]
    NoFileSelected,

    #[error("Could not find or open the image {}: {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Pointer backend failure
    #[error("Input simulation failed: {0}")]
    Input(String),

    /// Window, surface or GPU device setup failure
    #[error("Preview window failed: {0}")]
    Gui(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TracerError {
    /// Process exit status for a fatal error.
    ///
    /// Input-selection failures get their own status so scripts can tell a
    /// bad file apart from a broken display.
    pub fn exit_code(&self) -> u8 {
        match self {
            TracerError::NoFileSelected | TracerError::ImageLoad { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, TracerError>;
