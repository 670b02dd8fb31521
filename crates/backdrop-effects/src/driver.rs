//! Frame loop driver.
//!
//! The host calls [`FrameLoop::pump`] once per redraw. Starting the loop hands
//! out a [`LoopHandle`]; stopping any clone of it ends the chain of frames so
//! nothing keeps drawing after the surface goes away.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use backdrop_core::{Clock, Surface, Viewport, replay};

use crate::state::Backdrop;

thread_local! {
    static IN_FRAME: Cell<bool> = const { Cell::new(false) };
}

/// Whether the current thread is inside [`FrameLoop::pump`].
///
/// Panic hooks use this to tell a recoverable frame failure apart from a
/// fatal panic.
pub fn in_frame() -> bool {
    IN_FRAME.with(Cell::get)
}

/// What happened in one call to [`FrameLoop::pump`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame was drawn with this many commands.
    Drawn(usize),
    /// The frame panicked and was skipped; the loop keeps going.
    Recovered,
    /// The loop is not running; nothing was drawn.
    Stopped,
}

/// Cancellation handle for a running frame loop.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    running: Arc<RwLock<bool>>,
}

impl LoopHandle {
    pub fn is_running(&self) -> bool {
        self.running.read().map(|r| *r).unwrap_or(false)
    }

    /// Break the frame chain. Idempotent.
    pub fn stop(&self) {
        if let Ok(mut running) = self.running.write() {
            *running = false;
        }
    }

    fn set_running(&self) {
        if let Ok(mut running) = self.running.write() {
            *running = true;
        }
    }
}

/// Drives a [`Backdrop`] one frame at a time.
#[derive(Debug)]
pub struct FrameLoop<C: Clock> {
    clock: C,
    handle: LoopHandle,
    frames_drawn: u64,
    frames_recovered: u64,
}

impl<C: Clock> FrameLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            handle: LoopHandle::default(),
            frames_drawn: 0,
            frames_recovered: 0,
        }
    }

    /// Start (or restart) the loop and return a handle that can stop it.
    pub fn start(&mut self) -> LoopHandle {
        self.handle.set_running();
        self.handle.clone()
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn frames_recovered(&self) -> u64 {
        self.frames_recovered
    }

    /// Run one frame onto `surface` if the loop is running.
    ///
    /// A panic while building or replaying the frame is caught and logged so
    /// the next frame still runs.
    pub fn pump<S: Surface + ?Sized>(
        &mut self,
        backdrop: &mut Backdrop,
        viewport: Viewport,
        surface: &mut S,
    ) -> FrameOutcome {
        if !self.handle.is_running() {
            return FrameOutcome::Stopped;
        }

        let now = self.clock.now_seconds();
        IN_FRAME.with(|f| f.set(true));
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let commands = backdrop.frame(viewport, now);
            replay(&commands, surface);
            commands.len()
        }));
        IN_FRAME.with(|f| f.set(false));

        match result {
            Ok(count) => {
                self.frames_drawn += 1;
                FrameOutcome::Drawn(count)
            }
            Err(payload) => {
                self.frames_recovered += 1;
                log::warn!(
                    "{} frame at t={now:.3} failed: {}",
                    backdrop.kind(),
                    panic_message(payload.as_ref())
                );
                FrameOutcome::Recovered
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::{DrawCommand, EffectKind, ManualClock, Rgba};
    use rand::RngCore;

    use crate::scene::Scene;

    /// Counts the commands it receives.
    #[derive(Default)]
    struct CountingSurface {
        clears: usize,
        calls: usize,
    }

    impl Surface for CountingSurface {
        fn clear_rect(&mut self, _: f64, _: f64, _: f64, _: f64) {
            self.clears += 1;
            self.calls += 1;
        }
        fn begin_path(&mut self) {
            self.calls += 1;
        }
        fn move_to(&mut self, _: f64, _: f64) {
            self.calls += 1;
        }
        fn line_to(&mut self, _: f64, _: f64) {
            self.calls += 1;
        }
        fn arc(&mut self, _: f64, _: f64, _: f64) {
            self.calls += 1;
        }
        fn close_path(&mut self) {
            self.calls += 1;
        }
        fn stroke(&mut self, _: Rgba, _: f64) {
            self.calls += 1;
        }
        fn fill(&mut self, _: Rgba) {
            self.calls += 1;
        }
        fn fill_rect(&mut self, _: f64, _: f64, _: f64, _: f64, _: Rgba) {
            self.calls += 1;
        }
        fn set_shadow(&mut self, _: f64, _: Rgba) {
            self.calls += 1;
        }
    }

    /// Scene whose first tick panics.
    #[derive(Debug, Default)]
    struct FlakyScene {
        ticks: usize,
        saw_in_frame: bool,
    }

    impl Scene for FlakyScene {
        fn kind(&self) -> EffectKind {
            EffectKind::Hexagons
        }
        fn initialize(&mut self, _: Viewport, _: &mut dyn RngCore) {}
        fn tick(&mut self, _: f64, _: &mut dyn RngCore) -> Vec<DrawCommand> {
            self.ticks += 1;
            self.saw_in_frame = in_frame();
            if self.ticks == 1 {
                panic!("first frame blew up");
            }
            vec![DrawCommand::ClearRect {
                x: 0.0,
                y: 0.0,
                w: 1.0,
                h: 1.0,
            }]
        }
        fn viewport(&self) -> Viewport {
            Viewport::default()
        }
        fn len(&self) -> usize {
            0
        }
    }

    const VIEWPORT: Viewport = Viewport::new(400.0, 300.0);

    #[test]
    fn test_not_started_draws_nothing() {
        let mut frames = FrameLoop::new(ManualClock::new(0.0));
        let mut backdrop = Backdrop::new(EffectKind::Voronoi, Some(1));
        let mut surface = CountingSurface::default();
        assert_eq!(
            frames.pump(&mut backdrop, VIEWPORT, &mut surface),
            FrameOutcome::Stopped
        );
        assert_eq!(surface.calls, 0);
    }

    #[test]
    fn test_pump_replays_frame() {
        let mut frames = FrameLoop::new(ManualClock::new(0.0));
        let mut backdrop = Backdrop::new(EffectKind::Hexagons, Some(1));
        let mut surface = CountingSurface::default();
        frames.start();

        let outcome = frames.pump(&mut backdrop, VIEWPORT, &mut surface);
        assert_eq!(outcome, FrameOutcome::Drawn(surface.calls));
        assert_eq!(surface.clears, 1);
        assert_eq!(frames.frames_drawn(), 1);
    }

    #[test]
    fn test_stop_breaks_chain() {
        let mut frames = FrameLoop::new(ManualClock::new(0.0));
        let mut backdrop = Backdrop::new(EffectKind::Constellation, Some(1));
        let mut surface = CountingSurface::default();
        let handle = frames.start();

        for _ in 0..3 {
            frames.clock().advance(1.0 / 60.0);
            assert!(matches!(
                frames.pump(&mut backdrop, VIEWPORT, &mut surface),
                FrameOutcome::Drawn(_)
            ));
        }

        handle.stop();
        assert!(!frames.handle().is_running());
        let calls = surface.calls;
        assert_eq!(
            frames.pump(&mut backdrop, VIEWPORT, &mut surface),
            FrameOutcome::Stopped
        );
        assert_eq!(surface.calls, calls);
        assert_eq!(frames.frames_drawn(), 3);

        // Restart resumes drawing.
        frames.start();
        assert!(handle.is_running());
        frames.clock().advance(1.0 / 60.0);
        assert!(matches!(
            frames.pump(&mut backdrop, VIEWPORT, &mut surface),
            FrameOutcome::Drawn(_)
        ));
        assert!(surface.calls > calls);
        assert_eq!(frames.frames_drawn(), 4);
    }

    #[test]
    fn test_bad_frame_does_not_end_loop() {
        let mut frames = FrameLoop::new(ManualClock::new(0.0));
        let mut backdrop = Backdrop::with_scene(Box::new(FlakyScene::default()), Some(1));
        let mut surface = CountingSurface::default();
        frames.start();

        assert_eq!(
            frames.pump(&mut backdrop, VIEWPORT, &mut surface),
            FrameOutcome::Recovered
        );
        assert_eq!(
            frames.pump(&mut backdrop, VIEWPORT, &mut surface),
            FrameOutcome::Drawn(1)
        );
        assert_eq!(frames.frames_recovered(), 1);
        assert_eq!(frames.frames_drawn(), 1);
        assert!(!in_frame());
    }

    #[test]
    fn test_in_frame_during_tick_only() {
        let mut frames = FrameLoop::new(ManualClock::new(0.0));
        let mut backdrop = Backdrop::with_scene(Box::new(FlakyScene::default()), Some(1));
        let mut surface = CountingSurface::default();
        frames.start();
        frames.pump(&mut backdrop, VIEWPORT, &mut surface);
        frames.pump(&mut backdrop, VIEWPORT, &mut surface);
        assert!(format!("{:?}", backdrop.scene()).contains("saw_in_frame: true"));
        assert!(!in_frame());
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
