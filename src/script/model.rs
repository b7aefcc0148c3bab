use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::animation::tween::TweenKind;
use crate::assets::sources::MaskView;
use crate::effects::fade::FadePercents;
use crate::foundation::color::Rgb8;
use crate::foundation::core::{FrameIndex, FrameRange, Size};
use crate::foundation::error::{ReelError, ReelResult};
use crate::raster::buffer::PixelFormat;

/// Run-wide settings, fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Raster size of every frame.
    pub size: Size,
    /// First global frame, inclusive.
    pub first_frame: u64,
    /// Last global frame, inclusive.
    pub last_frame: u64,
    /// Output path template such as `out/frame_%04d.png`.
    #[serde(default)]
    pub output: Option<String>,
}

impl RunConfig {
    /// Global frames covered by the run.
    pub fn frame_range(&self) -> ReelResult<FrameRange> {
        FrameRange::inclusive(self.first_frame, self.last_frame)
    }
}

/// A parsed content script: sources, sections and their effects.
///
/// Relative paths inside the script resolve against `base_dir`, which is the
/// script's directory when loaded with [`Script::from_path`].
#[derive(Debug, Clone)]
pub struct Script {
    def: ScriptDef,
    base_dir: PathBuf,
}

impl Script {
    /// Parse a script from a JSON reader; relative paths resolve against the working directory.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        let def: ScriptDef = serde_json::from_reader(r)
            .map_err(|e| ReelError::serde(format!("parse script JSON: {e}")))?;
        Ok(Self {
            def,
            base_dir: PathBuf::new(),
        })
    }

    /// Parse a script from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::configuration(format!("open script '{}': {e}", path.display()))
        })?;
        let mut script = Self::from_reader(BufReader::new(f))?;
        script.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(script)
    }

    /// Directory relative paths resolve against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Run settings.
    pub fn run(&self) -> &RunConfig {
        &self.def.run
    }

    /// Mutable run settings, for command-line overrides.
    pub fn run_mut(&mut self) -> &mut RunConfig {
        &mut self.def.run
    }

    /// Resolve `path` against the script's directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.base_dir.join(path)
    }

    pub(crate) fn def(&self) -> &ScriptDef {
        &self.def
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScriptDef {
    pub(crate) run: RunConfig,
    #[serde(default)]
    pub(crate) sources: BTreeMap<String, SourceDef>,
    #[serde(default)]
    pub(crate) sections: Vec<SectionDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum SourceDef {
    Color {
        color: Rgb8,
        #[serde(default)]
        format: PixelFormat,
    },
    Image {
        path: PathBuf,
        #[serde(default)]
        mask: Option<MaskView>,
    },
    Sequence {
        template: String,
        #[serde(default)]
        mask: Option<MaskView>,
    },
}

/// A group of effects owning its own keepers.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SectionDef {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) keepers: Vec<String>,
    #[serde(default)]
    pub(crate) effects: Vec<EffectDef>,
}

/// Name of the input that reads the controller's committed frame.
pub(crate) const COMMITTED_INPUT: &str = "@frame";

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum InputDef {
    Name(String),
    KeeperMask {
        keeper: String,
        #[serde(default)]
        invert: bool,
        #[serde(default = "default_mask_format")]
        format: PixelFormat,
    },
}

fn default_mask_format() -> PixelFormat {
    PixelFormat::Luma8
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct DriftDef {
    #[serde(default)]
    pub(crate) tween: TweenKind,
    pub(crate) change: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum EffectDef {
    Mask {
        frames: [u64; 2],
        foreground: InputDef,
        background: InputDef,
        mask: InputDef,
        output: String,
    },
    ColorScale {
        frames: [u64; 2],
        input: InputDef,
        background: Rgb8,
        foreground: Rgb8,
        output: String,
    },
    SimpleFader {
        frames: [u64; 2],
        a: InputDef,
        b: InputDef,
        #[serde(default)]
        tween: TweenKind,
        output: String,
    },
    FadeInOut {
        frames: [u64; 2],
        a: InputDef,
        b: InputDef,
        percents: FadePercents,
        #[serde(default)]
        tween: TweenKind,
        output: String,
    },
    SliceRepeater {
        frames: [u64; 2],
        a: InputDef,
        b: InputDef,
        #[serde(default)]
        mask: Option<InputDef>,
        percents: Vec<f64>,
        #[serde(default)]
        truths: Option<Vec<bool>>,
        output: String,
    },
    SliceSlide {
        frames: [u64; 2],
        source: InputDef,
        percents: Vec<f64>,
        slide_frames: u64,
        output: String,
    },
    PixelSwap {
        frames: [u64; 2],
        input: InputDef,
        replacement: Rgb8,
        target: Rgb8,
        threshold: f64,
        #[serde(default)]
        drift: Option<DriftDef>,
        output: String,
    },
    CollapsingSquares {
        frames: [u64; 2],
        input: InputDef,
        iterations: f64,
        output: String,
    },
    Commit {
        frames: [u64; 2],
        input: InputDef,
    },
}

impl EffectDef {
    pub(crate) fn frames(&self) -> ReelResult<FrameRange> {
        let [start, end] = match self {
            Self::Mask { frames, .. }
            | Self::ColorScale { frames, .. }
            | Self::SimpleFader { frames, .. }
            | Self::FadeInOut { frames, .. }
            | Self::SliceRepeater { frames, .. }
            | Self::SliceSlide { frames, .. }
            | Self::PixelSwap { frames, .. }
            | Self::CollapsingSquares { frames, .. }
            | Self::Commit { frames, .. } => *frames,
        };
        FrameRange::new(FrameIndex(start), FrameIndex(end))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/model.rs"]
mod tests;
