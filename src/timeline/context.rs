use crate::foundation::core::Size;
use crate::foundation::error::{ReelError, ReelResult};
use crate::raster::buffer::ImageBuffer;
use crate::raster::keeper::{KeeperId, KeeperStore};
use crate::raster::source::Source;

/// Mutable view of the controller handed to effects for one invocation.
pub struct FrameContext<'a> {
    size: Size,
    keepers: &'a mut KeeperStore,
    committed: &'a mut Option<ImageBuffer>,
}

impl<'a> FrameContext<'a> {
    pub(crate) fn new(
        size: Size,
        keepers: &'a mut KeeperStore,
        committed: &'a mut Option<ImageBuffer>,
    ) -> Self {
        Self {
            size,
            keepers,
            committed,
        }
    }

    /// Raster size of the run.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Resolve an input for the reading effect's local `frame`.
    pub fn read(&self, src: &Source, frame: u64) -> ReelResult<ImageBuffer> {
        match src {
            Source::Asset(asset) => asset.image(frame),
            Source::Keeper(id) => self.keepers.get(*id)?.image().ok_or_else(|| unwritten(*id)),
            Source::KeeperMask {
                keeper,
                invert,
                format,
            } => self
                .keepers
                .get(*keeper)?
                .mask(*invert, *format)
                .ok_or_else(|| unwritten(*keeper)),
            Source::Committed => self
                .committed
                .clone()
                .ok_or_else(|| ReelError::evaluation("committed frame read before any commit")),
        }
    }

    /// Store `image` in keeper `id`.
    pub fn write(&mut self, id: KeeperId, image: ImageBuffer) -> ReelResult<()> {
        if image.size() != self.size {
            return Err(ReelError::evaluation(format!(
                "keeper {} expects {} images, got {}",
                id.0,
                self.size,
                image.size()
            )));
        }
        self.keepers.get_mut(id)?.set_image(image);
        Ok(())
    }

    /// Publish `image` as the controller's externally visible frame.
    pub fn commit(&mut self, image: ImageBuffer) {
        *self.committed = Some(image);
    }
}

fn unwritten(id: KeeperId) -> ReelError {
    ReelError::evaluation(format!("keeper {} read before its first write", id.0))
}
