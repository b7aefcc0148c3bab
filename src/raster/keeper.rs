use crate::foundation::error::{ReelError, ReelResult};
use crate::raster::buffer::{ImageBuffer, PixelFormat};

/// Handle to a keeper owned by a [`KeeperStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeeperId(pub(crate) u32);

/// Single-slot image cell: written by effects, read back as a source.
///
/// Reads never alias the stored buffer. The mask view is a separate accessor
/// so two readers can see the same slot in different formats.
#[derive(Clone, Debug, Default)]
pub struct ImageKeeper {
    image: Option<ImageBuffer>,
}

impl ImageKeeper {
    /// Create an empty keeper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored buffer (last write wins).
    pub fn set_image(&mut self, image: ImageBuffer) {
        self.image = Some(image);
    }

    /// `true` once any buffer has been stored.
    pub fn is_written(&self) -> bool {
        self.image.is_some()
    }

    /// Copy of the stored buffer.
    pub fn image(&self) -> Option<ImageBuffer> {
        self.image.clone()
    }

    /// Copy of the stored buffer, inverted when asked, converted to `format`.
    pub fn mask(&self, invert: bool, format: PixelFormat) -> Option<ImageBuffer> {
        let stored = self.image.as_ref()?;
        Some(if invert {
            stored.inverted().convert(format)
        } else {
            stored.convert(format)
        })
    }
}

/// Arena of keepers addressed by [`KeeperId`].
#[derive(Debug, Default)]
pub struct KeeperStore {
    keepers: Vec<ImageKeeper>,
}

impl KeeperStore {
    /// Allocate a new empty keeper.
    pub fn create(&mut self) -> ReelResult<KeeperId> {
        let id = KeeperId(
            self.keepers
                .len()
                .try_into()
                .map_err(|_| ReelError::configuration("keeper id overflow"))?,
        );
        self.keepers.push(ImageKeeper::new());
        Ok(id)
    }

    /// `true` when `id` was allocated by this store.
    pub fn contains(&self, id: KeeperId) -> bool {
        (id.0 as usize) < self.keepers.len()
    }

    /// Number of allocated keepers.
    pub(crate) fn len(&self) -> usize {
        self.keepers.len()
    }

    /// Borrow a keeper.
    pub fn get(&self, id: KeeperId) -> ReelResult<&ImageKeeper> {
        self.keepers
            .get(id.0 as usize)
            .ok_or_else(|| ReelError::evaluation(format!("unknown keeper {}", id.0)))
    }

    /// Mutably borrow a keeper.
    pub fn get_mut(&mut self, id: KeeperId) -> ReelResult<&mut ImageKeeper> {
        self.keepers
            .get_mut(id.0 as usize)
            .ok_or_else(|| ReelError::evaluation(format!("unknown keeper {}", id.0)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/keeper.rs"]
mod tests;
