//! Reelwright is a frame-accurate compositing engine for animated image sequences.
//!
//! A run is driven by a [`Controller`] that advances a global frame counter over an
//! inclusive range and invokes every attached [`Effect`] whose range contains the
//! frame, in attachment order. Effects read [`Source`]s, write keepers, and one or
//! more commit effects publish the visible frame that is handed to a [`FrameSink`].
//!
//! - Build a controller by hand, or load a JSON [`Script`] and let a [`Director`] build it
//! - Stream the range into a sink with [`Controller::run`] or [`Director::run`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod assets;
pub(crate) mod effects;
/// Output sinks.
pub mod encode;
pub(crate) mod raster;
pub(crate) mod script;
pub(crate) mod timeline;

pub use crate::foundation::color::Rgb8;
pub use crate::foundation::core::{FrameIndex, FrameRange, Size};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::animation::tween::{Tween, TweenKind};
pub use crate::assets::sources::{ColorSource, FrameSequenceSource, MaskView, StillImageSource};
pub use crate::assets::template::PathTemplate;
pub use crate::effects::fade::{FadeInOutFx, FadePercents, FadePhase, SimpleFaderFx};
pub use crate::effects::mask::{ColorScaleFx, MaskFx};
pub use crate::effects::slice::{SliceRepeaterFx, SliceSlideFx, SliceSpan, slice_spans};
pub use crate::effects::squares::CollapsingSquaresFx;
pub use crate::effects::swap::{PixelSwapFx, color_matches};
pub use crate::effects::commit::CommitFx;
pub use crate::effects::{Effect, EffectKind, EffectState};
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::raster::buffer::{ImageBuffer, PixelFormat};
pub use crate::raster::keeper::{ImageKeeper, KeeperId};
pub use crate::raster::ops::{blend, composite};
pub use crate::raster::source::{ImageSource, Source};
pub use crate::script::director::Director;
pub use crate::script::model::{RunConfig, Script};
pub use crate::timeline::context::FrameContext;
pub use crate::timeline::controller::{Controller, EffectId, RunStats};
