use thiserror::Error;

/// Blocks add-to-cart. The layer model is never touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a size")]
    MissingSize,

    #[error("Please select a color")]
    MissingColor,

    #[error("Size {0} is not offered for this product")]
    UnknownSize(String),

    #[error("Color {0} is not offered for this product")]
    UnknownColor(String),

    #[error("Quantity must be at least 1")]
    ZeroQuantity,
}

/// Network failure at a collaborator boundary. Editor state is left intact, so the action can
/// simply be retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransientIoError {
    #[error("Image upload failed: {0}")]
    Upload(String),

    #[error("Cart submission failed: {0}")]
    CartSubmission(String),
}

impl TransientIoError {
    pub fn retryable(&self) -> bool {
        true
    }
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Unreadable image {name}: {source}")]
    Unreadable {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Transient(#[from] TransientIoError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    TransientIo(#[from] TransientIoError),
}
