//! Icon references and their resolution into pixmaps.
//!
//! Buttons carry an [`IconRef`], a lazy handle that says where an icon comes
//! from without holding any pixel data. Turning a reference into a [`Pixmap`]
//! is the job of an [`IconResolver`]. Resolution is the only work that runs
//! off the UI context, so resolvers must be `Send + Sync` and must not touch
//! the chrome.

mod pixmap;
mod resolver;

pub use self::pixmap::{Icon, Pixmap};
pub use self::resolver::PngIconResolver;

use crate::color::Color;
use std::fmt;
use std::path::PathBuf;

/// Lazy, resolvable handle to a button icon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconRef(String);

impl IconRef {
    pub fn new(uri: impl Into<String>) -> Self {
        IconRef(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IconRef {
    fn from(value: &str) -> Self {
        IconRef::new(value)
    }
}

impl From<String> for IconRef {
    fn from(value: String) -> Self {
        IconRef(value)
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a backend needs to produce one icon.
///
/// `tint` is a hint: the chrome tints resolved icons itself when it applies
/// them, so a backend may ignore it.
#[derive(Debug, Clone, Copy)]
pub struct IconRequest<'a> {
    pub icon: &'a IconRef,
    pub size: u32,
    pub tint: Option<Color>,
}

/// Error types that can occur while resolving a single icon.
#[derive(thiserror::Error, Debug)]
pub enum IconError {
    #[error("icon not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG decoding error: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("unsupported icon format: {0}")]
    UnsupportedFormat(String),

    /// The chrome has no height yet, so there is no size to resolve to.
    #[error("icon target size is zero")]
    EmptyTarget,

    #[error("icon backend unavailable: {0}")]
    Unavailable(String),
}

/// Backend that turns icon references into renderable images.
pub trait IconResolver: Send + Sync {
    fn resolve(&self, request: &IconRequest<'_>) -> Result<Pixmap, IconError>;
}

impl<F> IconResolver for F
where
    F: Fn(&IconRequest<'_>) -> Result<Pixmap, IconError> + Send + Sync,
{
    fn resolve(&self, request: &IconRequest<'_>) -> Result<Pixmap, IconError> {
        self(request)
    }
}
