use super::*;
use crate::animation::tween::TweenKind;
use crate::encode::sink::InMemorySink;
use crate::foundation::error::ReelResult;
use crate::raster::source::ImageSource;

#[derive(Debug)]
struct Flat(Size, Rgb8);

impl ImageSource for Flat {
    fn size(&self) -> Size {
        self.0
    }

    fn image(&self, _frame: u64) -> ReelResult<ImageBuffer> {
        Ok(ImageBuffer::filled(self.0, self.1, PixelFormat::Rgb8))
    }
}

fn flat(size: Size, color: Rgb8) -> Source {
    Source::asset(Flat(size, color))
}

fn range(first: u64, last: u64) -> FrameRange {
    FrameRange::inclusive(first, last).unwrap()
}

#[test]
fn new_rejects_empty_size_and_reversed_range() {
    assert!(Controller::new(Size::new(0, 4), 1, 2).is_err());
    assert!(Controller::new(Size::new(4, 4), 5, 4).is_err());
    let c = Controller::new(Size::new(4, 4), 3, 3).unwrap();
    assert_eq!(c.range().len_frames(), 1);
    assert_eq!(c.frame_number(), None);
}

#[test]
fn attach_rejects_asset_of_wrong_size() {
    let size = Size::new(4, 4);
    let mut c = Controller::new(size, 1, 3).unwrap();
    let out = c.create_keeper().unwrap();
    let fx = Effect::mask(
        range(1, 3),
        flat(Size::new(2, 2), Rgb8::WHITE),
        flat(size, Rgb8::BLACK),
        flat(size, Rgb8::WHITE),
        out,
    );
    let err = c.attach(fx).unwrap_err();
    assert!(matches!(err, ReelError::Configuration(_)));
    assert!(c.effects().is_empty());
}

#[test]
fn attach_requires_an_earlier_producer_for_keeper_reads() {
    let size = Size::new(2, 2);
    let mut c = Controller::new(size, 1, 10).unwrap();
    let k = c.create_keeper().unwrap();

    // Commit before anything writes `k`.
    assert!(c.attach(Effect::commit(range(1, 10), k)).is_err());

    let producer = Effect::mask(
        range(3, 10),
        flat(size, Rgb8::WHITE),
        flat(size, Rgb8::BLACK),
        flat(size, Rgb8::WHITE),
        k,
    );
    c.attach(producer).unwrap();
    // A reader starting before its producer would see an unwritten keeper.
    assert!(c.attach(Effect::commit(range(1, 10), k)).is_err());
    let id = c.attach(Effect::commit(range(3, 10), k)).unwrap();
    assert_eq!(c.effect(id).unwrap().kind().name(), "commit");
}

#[test]
fn attached_clone_is_a_separate_effect() {
    let size = Size::new(1, 1);
    let mut c = Controller::new(size, 1, 3).unwrap();
    let k = c.create_keeper().unwrap();
    let fader = Effect::simple_fader(
        range(1, 3),
        flat(size, Rgb8::WHITE),
        flat(size, Rgb8::BLACK),
        TweenKind::Linear,
        k,
    );
    let first = c.attach(fader.clone()).unwrap();
    let second = c.attach(fader).unwrap();
    assert_ne!(first, second);

    c.run(&mut InMemorySink::new()).unwrap();
    assert_eq!(c.effects().len(), 2);
    assert!(c.effects().iter().all(|fx| fx.local_frame() == 3));
}

#[test]
fn attach_rejects_unknown_keepers_and_early_committed_reads() {
    let size = Size::new(2, 2);
    let mut c = Controller::new(size, 1, 2).unwrap();
    let stray = KeeperId(9);
    let fx = Effect::color_scale(
        range(1, 2),
        flat(size, Rgb8::WHITE),
        Rgb8::WHITE,
        Rgb8::BLACK,
        stray,
    );
    assert!(c.attach(fx).is_err());

    let k = c.create_keeper().unwrap();
    let fx = Effect::color_scale(range(1, 2), Source::Committed, Rgb8::WHITE, Rgb8::BLACK, k);
    assert!(c.attach(fx).is_err());
}

#[test]
fn effects_see_writes_of_effects_attached_before_them() {
    let size = Size::new(1, 1);
    let mut c = Controller::new(size, 1, 1).unwrap();
    let a = c.create_keeper().unwrap();
    let b = c.create_keeper().unwrap();
    c.attach(Effect::color_scale(
        range(1, 1),
        flat(size, Rgb8::WHITE),
        Rgb8::new(10, 20, 30),
        Rgb8::BLACK,
        a,
    ))
    .unwrap();
    c.attach(Effect::pixel_swap(
        range(1, 1),
        Source::keeper(a),
        Rgb8::new(1, 1, 1),
        Rgb8::new(10, 20, 30),
        1.0,
        None,
        b,
    )
    .unwrap())
    .unwrap();
    c.attach(Effect::commit(range(1, 1), b)).unwrap();

    assert_eq!(c.advance().unwrap(), FrameIndex(1));
    assert_eq!(c.current_frame().unwrap().pixel(0, 0), Rgb8::new(1, 1, 1));
    assert!(c.is_finished());
    assert!(matches!(c.advance(), Err(ReelError::Evaluation(_))));
}

#[test]
fn current_frame_is_none_until_first_commit() {
    let size = Size::new(1, 1);
    let mut c = Controller::new(size, 1, 4).unwrap();
    let k = c.create_keeper().unwrap();
    c.attach(Effect::simple_fader(
        range(3, 4),
        flat(size, Rgb8::WHITE),
        flat(size, Rgb8::BLACK),
        TweenKind::Linear,
        k,
    ))
    .unwrap();
    c.attach(Effect::commit(range(3, 4), k)).unwrap();

    c.advance().unwrap();
    c.advance().unwrap();
    assert_eq!(c.frame_number(), Some(FrameIndex(2)));
    assert!(c.current_frame().is_none());
    c.advance().unwrap();
    assert!(c.current_frame().is_some());
}

#[test]
fn run_writes_every_frame_with_white_fallback() {
    let size = Size::new(2, 1);
    let mut c = Controller::new(size, 1, 4).unwrap();
    let k = c.create_keeper().unwrap();
    let red = Rgb8::new(255, 0, 0);
    c.attach(Effect::color_scale(range(3, 4), flat(size, Rgb8::WHITE), red, Rgb8::BLACK, k))
        .unwrap();
    c.attach(Effect::commit(range(3, 4), k)).unwrap();

    let mut sink = InMemorySink::new();
    let stats = c.run(&mut sink).unwrap();
    assert_eq!(
        stats,
        RunStats {
            frames_written: 4,
            frames_committed: 2,
            frames_fallback: 2,
        }
    );

    let cfg = sink.config().unwrap();
    assert_eq!(cfg.size, size);
    let frames = sink.frames();
    assert_eq!(
        frames.iter().map(|(i, _)| i.0).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
    assert_eq!(frames[0].1.pixel(0, 0), Rgb8::WHITE);
    assert_eq!(frames[3].1.pixel(1, 0), red);
}

#[test]
fn committed_frame_persists_after_commit_range_ends() {
    let size = Size::new(1, 1);
    let mut c = Controller::new(size, 1, 3).unwrap();
    let k = c.create_keeper().unwrap();
    let blue = Rgb8::new(0, 0, 255);
    c.attach(Effect::color_scale(range(1, 1), flat(size, Rgb8::WHITE), blue, Rgb8::BLACK, k))
        .unwrap();
    c.attach(Effect::commit(range(1, 1), k)).unwrap();

    let mut sink = InMemorySink::new();
    let stats = c.run(&mut sink).unwrap();
    assert_eq!(stats.frames_fallback, 0);
    assert!(sink.frames().iter().all(|(_, f)| f.pixel(0, 0) == blue));
}
