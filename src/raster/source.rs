use std::sync::Arc;

use crate::foundation::core::Size;
use crate::foundation::error::ReelResult;
use crate::raster::buffer::{ImageBuffer, PixelFormat};
use crate::raster::keeper::KeeperId;

/// Anything that can produce an image for a frame number.
///
/// Sources are total: asked for any index they return a buffer, wrapping or
/// falling back as they see fit. Errors are reserved for IO and decoding.
pub trait ImageSource: Send + Sync + std::fmt::Debug {
    /// Size of every buffer this source returns.
    fn size(&self) -> Size;

    /// Produce the image for `frame` (1-based, relative to the reading effect).
    fn image(&self, frame: u64) -> ReelResult<ImageBuffer>;
}

/// An effect input.
///
/// Keeper reads are resolved by the controller at invocation time, so an input can
/// name a keeper written earlier in the same frame, or the controller's own
/// committed frame.
#[derive(Clone, Debug)]
pub enum Source {
    /// External, asset-backed source.
    Asset(Arc<dyn ImageSource>),
    /// Plain read of a keeper.
    Keeper(KeeperId),
    /// Derived mask read of a keeper.
    KeeperMask {
        /// Keeper being read.
        keeper: KeeperId,
        /// Invert before converting.
        invert: bool,
        /// Target format of the view.
        format: PixelFormat,
    },
    /// The controller's most recently committed frame.
    Committed,
}

impl Source {
    /// Wrap an external source.
    pub fn asset(src: impl ImageSource + 'static) -> Self {
        Self::Asset(Arc::new(src))
    }

    /// Plain keeper read.
    pub fn keeper(id: KeeperId) -> Self {
        Self::Keeper(id)
    }

    /// Derived mask view of a keeper.
    pub fn keeper_mask(id: KeeperId, invert: bool, format: PixelFormat) -> Self {
        Self::KeeperMask {
            keeper: id,
            invert,
            format,
        }
    }

    /// Keeper referenced by this input, if any.
    pub fn keeper_id(&self) -> Option<KeeperId> {
        match self {
            Self::Keeper(id) | Self::KeeperMask { keeper: id, .. } => Some(*id),
            Self::Asset(_) | Self::Committed => None,
        }
    }
}

impl From<Arc<dyn ImageSource>> for Source {
    fn from(src: Arc<dyn ImageSource>) -> Self {
        Self::Asset(src)
    }
}

impl From<KeeperId> for Source {
    fn from(id: KeeperId) -> Self {
        Self::Keeper(id)
    }
}
