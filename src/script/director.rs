use std::collections::BTreeMap;
use std::sync::Arc;

use crate::assets::sources::{ColorSource, FrameSequenceSource, StillImageSource};
use crate::assets::template::PathTemplate;
use crate::effects::Effect;
use crate::encode::sink::{FrameSink, PngSequenceSink};
use crate::foundation::core::Size;
use crate::foundation::error::{ReelError, ReelResult};
use crate::raster::keeper::KeeperId;
use crate::raster::source::{ImageSource, Source};
use crate::script::model::{COMMITTED_INPUT, EffectDef, InputDef, Script, SourceDef};
use crate::timeline::controller::{Controller, RunStats};

/// Compiles a [`Script`] into a [`Controller`] and drives it into a sink.
#[derive(Debug, Clone)]
pub struct Director {
    script: Script,
}

/// Named sources and keepers visible while compiling effects.
#[derive(Default)]
struct Names {
    sources: BTreeMap<String, Arc<dyn ImageSource>>,
    keepers: BTreeMap<String, KeeperId>,
}

impl Names {
    fn ensure_free(&self, name: &str) -> ReelResult<()> {
        if name == COMMITTED_INPUT
            || self.sources.contains_key(name)
            || self.keepers.contains_key(name)
        {
            return Err(ReelError::configuration(format!(
                "name '{name}' is already in use"
            )));
        }
        Ok(())
    }

    fn keeper(&self, name: &str) -> ReelResult<KeeperId> {
        self.keepers
            .get(name)
            .copied()
            .ok_or_else(|| ReelError::configuration(format!("unknown keeper '{name}'")))
    }

    fn input(&self, def: &InputDef) -> ReelResult<Source> {
        match def {
            InputDef::Name(name) if name == COMMITTED_INPUT => Ok(Source::Committed),
            InputDef::Name(name) => {
                if let Some(id) = self.keepers.get(name) {
                    return Ok(Source::Keeper(*id));
                }
                self.sources
                    .get(name)
                    .map(|s| Source::Asset(Arc::clone(s)))
                    .ok_or_else(|| ReelError::configuration(format!("unknown input '{name}'")))
            }
            InputDef::KeeperMask {
                keeper,
                invert,
                format,
            } => Ok(Source::keeper_mask(self.keeper(keeper)?, *invert, *format)),
        }
    }
}

impl Director {
    /// Wrap a parsed script.
    pub fn new(script: Script) -> Self {
        Self { script }
    }

    /// The script being directed.
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Open every source, allocate section keepers and attach effects in script order.
    #[tracing::instrument(skip(self))]
    pub fn build(&self) -> ReelResult<Controller> {
        let run = self.script.run();
        let mut controller = Controller::new(run.size, run.first_frame, run.last_frame)?;
        let mut names = Names::default();

        for (name, def) in &self.script.def().sources {
            names.ensure_free(name)?;
            let source = self
                .open_source(def, run.size)
                .map_err(|e| with_context(e, &format!("source '{name}'")))?;
            names.sources.insert(name.clone(), source);
        }

        for section in &self.script.def().sections {
            for keeper in &section.keepers {
                names.ensure_free(keeper)?;
                let id = controller.create_keeper()?;
                names.keepers.insert(keeper.clone(), id);
            }
            for (i, def) in section.effects.iter().enumerate() {
                let ctx = format!("section '{}' effect {i}", section.name);
                let effect = compile_effect(def, &names).map_err(|e| with_context(e, &ctx))?;
                controller
                    .attach(effect)
                    .map_err(|e| with_context(e, &ctx))?;
            }
            tracing::debug!(
                section = %section.name,
                keepers = section.keepers.len(),
                effects = section.effects.len(),
                "compiled section"
            );
        }
        Ok(controller)
    }

    /// Build the controller and render every frame into `sink`.
    #[tracing::instrument(skip(self, sink))]
    pub fn run(&self, sink: &mut dyn FrameSink) -> ReelResult<RunStats> {
        let mut controller = self.build()?;
        let stats = controller.run(sink)?;
        tracing::info!(
            written = stats.frames_written,
            committed = stats.frames_committed,
            fallback = stats.frames_fallback,
            "run finished"
        );
        Ok(stats)
    }

    /// Render into numbered PNGs at `output`, or the script's own output template.
    pub fn render_png(&self, output: Option<&str>) -> ReelResult<RunStats> {
        let template = match output {
            Some(t) => PathTemplate::parse(t)?,
            None => {
                let t = self.script.run().output.as_deref().ok_or_else(|| {
                    ReelError::configuration("no output template given by script or caller")
                })?;
                PathTemplate::parse(&self.script.resolve(t).to_string_lossy())?
            }
        };
        let mut sink = PngSequenceSink::new(template);
        let stats = self.run(&mut sink)?;
        tracing::info!(files = sink.written(), "png sequence written");
        Ok(stats)
    }

    fn open_source(&self, def: &SourceDef, size: Size) -> ReelResult<Arc<dyn ImageSource>> {
        let source: Arc<dyn ImageSource> = match def {
            SourceDef::Color { color, format } => {
                Arc::new(ColorSource::with_format(size, *color, *format))
            }
            SourceDef::Image { path, mask } => {
                Arc::new(StillImageSource::open(self.script.resolve(path), size, *mask)?)
            }
            SourceDef::Sequence { template, mask } => {
                let resolved = self.script.resolve(template);
                let template = PathTemplate::parse(&resolved.to_string_lossy())?;
                Arc::new(FrameSequenceSource::open(template, size, *mask)?)
            }
        };
        Ok(source)
    }
}

fn compile_effect(def: &EffectDef, names: &Names) -> ReelResult<Effect> {
    let range = def.frames()?;
    match def {
        EffectDef::Mask {
            foreground,
            background,
            mask,
            output,
            ..
        } => Ok(Effect::mask(
            range,
            names.input(foreground)?,
            names.input(background)?,
            names.input(mask)?,
            names.keeper(output)?,
        )),
        EffectDef::ColorScale {
            input,
            background,
            foreground,
            output,
            ..
        } => Ok(Effect::color_scale(
            range,
            names.input(input)?,
            *background,
            *foreground,
            names.keeper(output)?,
        )),
        EffectDef::SimpleFader {
            a, b, tween, output, ..
        } => Ok(Effect::simple_fader(
            range,
            names.input(a)?,
            names.input(b)?,
            *tween,
            names.keeper(output)?,
        )),
        EffectDef::FadeInOut {
            a,
            b,
            percents,
            tween,
            output,
            ..
        } => Effect::fade_in_out(
            range,
            names.input(a)?,
            names.input(b)?,
            *percents,
            *tween,
            names.keeper(output)?,
        ),
        EffectDef::SliceRepeater {
            a,
            b,
            mask,
            percents,
            truths,
            output,
            ..
        } => Effect::slice_repeater(
            range,
            names.input(a)?,
            names.input(b)?,
            mask.as_ref().map(|m| names.input(m)).transpose()?,
            percents.clone(),
            truths.clone(),
            names.keeper(output)?,
        ),
        EffectDef::SliceSlide {
            source,
            percents,
            slide_frames,
            output,
            ..
        } => Effect::slice_slide(
            range,
            names.input(source)?,
            percents.clone(),
            *slide_frames,
            names.keeper(output)?,
        ),
        EffectDef::PixelSwap {
            input,
            replacement,
            target,
            threshold,
            drift,
            output,
            ..
        } => Effect::pixel_swap(
            range,
            names.input(input)?,
            *replacement,
            *target,
            *threshold,
            drift.map(|d| (d.tween, d.change)),
            names.keeper(output)?,
        ),
        EffectDef::CollapsingSquares {
            input,
            iterations,
            output,
            ..
        } => Effect::collapsing_squares(
            range,
            names.input(input)?,
            *iterations,
            names.keeper(output)?,
        ),
        EffectDef::Commit { input, .. } => Ok(Effect::commit_source(range, names.input(input)?)),
    }
}

fn with_context(err: ReelError, ctx: &str) -> ReelError {
    match err {
        ReelError::Configuration(m) => ReelError::configuration(format!("{ctx}: {m}")),
        ReelError::Asset(m) => ReelError::asset(format!("{ctx}: {m}")),
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/director.rs"]
mod tests;
