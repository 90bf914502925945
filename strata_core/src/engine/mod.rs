// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine orchestration: lifecycle, frame stepping, and per-frame callbacks.
//!
//! An [`Engine`] is either [`Stopped`](EngineState::Stopped) or
//! [`Running`](EngineState::Running). While running, the host calls
//! [`step`](Engine::step) once per display frame. A step runs four phases in
//! order:
//!
//! 1. **Update**: the active scene's update hook, then the update pass.
//! 2. **Draw**: every visible batch is submitted to the host's
//!    [`BatchSubmitter`].
//! 3. **Touch**: the frame's pointer samples are routed to the touch targets
//!    collected by the update pass.
//! 4. **Callbacks**: queued callback changes are merged, then every
//!    registered callback runs once.
//!
//! Frame deltas come from a [`FrameClock`], so time spent stopped never shows
//! up as a large first delta after a restart.

mod app;
mod callbacks;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use kurbo::Size;

use crate::batch::BatchSubmitter;
use crate::clock::FrameClock;
use crate::color::Color;
use crate::dirty::ReRender;
use crate::error::FrameError;
use crate::node::{DrawStats, UpdateStats};
use crate::scene::{AppHandle, Scene};
use crate::stats::{DEFAULT_STATS_INTERVAL, FrameStats};
use crate::time::{Duration, HostTime};
use crate::touch::{DispatchedTouch, PointerSamples, TouchRouter, TouchRouterConfig};
use crate::trace::{
    FrameBeginEvent, FrameSummaryBuilder, LifecycleEvent, LifecycleKind, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, PointerEvent, Tracer,
};
use crate::viewport::{BASE_SCREEN_HEIGHT, BaseScreen, Viewport};

pub use app::{AppContext, Application};
pub use callbacks::{CallbackId, CallbackRegistry, FrameCallback, FrameContext, PendingCallbacks};

/// Engine options fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Whether pointer samples are routed at all.
    pub touch_enabled: bool,
    /// Whether several pointers are tracked at once.
    pub multi_touch_enabled: bool,
    /// How scene units relate to display pixels.
    pub base_screen: BaseScreen,
    /// Refresh interval of [`FrameStats`] snapshots, in seconds.
    pub stats_interval: f32,
    /// Color the target is cleared to at the start of every draw phase.
    pub clear_color: Color,
}

impl EngineConfig {
    /// Multi-touch input with a 640-unit tall screen.
    #[must_use]
    pub const fn interactive() -> Self {
        Self {
            touch_enabled: true,
            multi_touch_enabled: true,
            base_screen: BaseScreen::Height(BASE_SCREEN_HEIGHT),
            stats_interval: DEFAULT_STATS_INTERVAL,
            clear_color: Color::BLACK,
        }
    }

    /// Like [`interactive`](Self::interactive), tracking one pointer at a
    /// time.
    #[must_use]
    pub const fn single_touch() -> Self {
        Self {
            multi_touch_enabled: false,
            ..Self::interactive()
        }
    }

    /// No input routing; for displays and offscreen rendering.
    #[must_use]
    pub const fn display_only() -> Self {
        Self {
            touch_enabled: false,
            multi_touch_enabled: false,
            ..Self::interactive()
        }
    }

    /// The touch router subset of this configuration.
    #[must_use]
    pub const fn touch_router(&self) -> TouchRouterConfig {
        TouchRouterConfig {
            enabled: self.touch_enabled,
            multi_touch: self.multi_touch_enabled,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::interactive()
    }
}

/// Engine run state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Not stepping. The initial state.
    Stopped,
    /// Stepping once per frame.
    Running,
}

/// What one [`Engine::step`] did.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    /// Index of the frame, starting at 0.
    pub frame_index: u64,
    /// Running time since the previous frame.
    pub delta: Duration,
    /// Update pass counters. Default when no scene is loaded.
    pub update: UpdateStats,
    /// Draw pass counters. Default when no scene is loaded.
    pub draw: DrawStats,
    /// Touches routed this frame, in delivery order.
    pub touches: Vec<DispatchedTouch>,
    /// Callbacks invoked.
    pub callbacks: u32,
}

static NEXT_HANDLE: AtomicU32 = AtomicU32::new(0);

/// Drives an [`Application`] and its active [`Scene`].
pub struct Engine {
    config: EngineConfig,
    state: EngineState,
    loaded: bool,
    clock: FrameClock,
    last_elapsed: Duration,
    app: Box<dyn Application>,
    handle: AppHandle,
    scene: Option<Scene>,
    router: TouchRouter,
    callbacks: CallbackRegistry,
    viewport: Viewport,
    stats: FrameStats,
    frame_count: u64,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("handle", &self.handle)
            .field("scene", &self.scene)
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates a stopped engine for `app`.
    pub fn new(app: impl Application + 'static, config: EngineConfig) -> Self {
        Self {
            config,
            state: EngineState::Stopped,
            loaded: false,
            clock: FrameClock::new(),
            last_elapsed: Duration::ZERO,
            app: Box::new(app),
            handle: AppHandle(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed)),
            scene: None,
            router: TouchRouter::new(config.touch_router()),
            callbacks: CallbackRegistry::new(),
            viewport: Viewport::new(config.base_screen),
            stats: FrameStats::new(config.stats_interval),
            frame_count: 0,
        }
    }

    /// The configuration the engine was created with, with any touch
    /// switches applied since.
    #[must_use]
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Current run state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Whether the engine is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    /// The handle scenes loaded by this engine are tagged with.
    #[must_use]
    pub fn handle(&self) -> AppHandle {
        self.handle
    }

    /// Frames stepped so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // -- Lifecycle --

    /// Starts the engine. No-op if already running.
    pub fn start(&mut self, now: HostTime) {
        self.start_traced(now, &mut Tracer::none());
    }

    /// [`start`](Self::start) with tracing.
    ///
    /// Calls [`Application::on_load`] on the first start ever, then
    /// [`Application::on_resume`].
    pub fn start_traced(&mut self, now: HostTime, tracer: &mut Tracer<'_>) {
        if self.is_running() {
            return;
        }
        self.state = EngineState::Running;
        self.clock.start(now);
        self.last_elapsed = self.clock.elapsed(now);
        if !self.loaded {
            self.loaded = true;
            tracer.lifecycle(&LifecycleEvent {
                kind: LifecycleKind::Load,
                now,
            });
            self.with_app(|app, cx| app.on_load(cx));
        }
        tracer.lifecycle(&LifecycleEvent {
            kind: LifecycleKind::Resume,
            now,
        });
        self.with_app(|app, cx| app.on_resume(cx));
    }

    /// Stops the engine. No-op if already stopped.
    pub fn stop(&mut self, now: HostTime) {
        self.stop_traced(now, &mut Tracer::none());
    }

    /// [`stop`](Self::stop) with tracing. Calls [`Application::on_pause`]
    /// before the clock stops.
    pub fn stop_traced(&mut self, now: HostTime, tracer: &mut Tracer<'_>) {
        if !self.is_running() {
            return;
        }
        tracer.lifecycle(&LifecycleEvent {
            kind: LifecycleKind::Pause,
            now,
        });
        self.with_app(|app, cx| app.on_pause(cx));
        self.clock.stop(now);
        self.state = EngineState::Stopped;
    }

    /// Forwards a host memory warning to [`Application::on_low_memory`].
    /// Ignored while stopped.
    pub fn low_memory(&mut self, now: HostTime) {
        self.low_memory_traced(now, &mut Tracer::none());
    }

    /// [`low_memory`](Self::low_memory) with tracing.
    pub fn low_memory_traced(&mut self, now: HostTime, tracer: &mut Tracer<'_>) {
        if !self.is_running() {
            return;
        }
        tracer.lifecycle(&LifecycleEvent {
            kind: LifecycleKind::LowMemory,
            now,
        });
        self.with_app(|app, cx| app.on_low_memory(cx));
    }

    fn with_app(&mut self, f: impl FnOnce(&mut dyn Application, &mut AppContext<'_>)) {
        let mut cx = AppContext {
            handle: self.handle,
            scene: &mut self.scene,
            callbacks: self.callbacks.pending_mut(),
            viewport: &mut self.viewport,
            scene_swapped: false,
        };
        f(&mut *self.app, &mut cx);
        if cx.scene_swapped {
            self.router.reset();
        }
    }

    // -- Scene & services --

    /// Makes `scene` the active scene and returns the previous one.
    pub fn load_scene(&mut self, scene: Scene) -> Option<Scene> {
        self.router.reset();
        app::load_scene(&mut self.scene, self.handle, scene)
    }

    /// Removes and returns the active scene.
    pub fn unload_scene(&mut self) -> Option<Scene> {
        self.router.reset();
        let mut old = self.scene.take();
        if let Some(old) = &mut old {
            old.set_app(None);
        }
        old
    }

    /// The active scene.
    #[must_use]
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// The active scene, mutably.
    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    /// Output surface sizes.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Output surface sizes, mutably.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Updates the display and view sizes. Returns whether anything changed.
    pub fn set_display_size(&mut self, display: Size, view: Size) -> bool {
        self.viewport.set_display_size(display, view)
    }

    /// The color each frame starts from.
    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.config.clear_color
    }

    /// Changes the color each frame starts from.
    pub fn set_clear_color(&mut self, color: Color) {
        self.config.clear_color = color;
    }

    /// Sampled frame statistics.
    #[must_use]
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Turns touch routing on or off. Turning it off forgets all pointers.
    pub fn set_touch_enabled(&mut self, enabled: bool) {
        self.config.touch_enabled = enabled;
        self.router.set_config(self.config.touch_router());
    }

    /// Switches between multi-touch and single-touch tracking. Switching
    /// forgets all pointers.
    pub fn set_multi_touch_enabled(&mut self, enabled: bool) {
        self.config.multi_touch_enabled = enabled;
        self.router.set_config(self.config.touch_router());
    }

    /// Queues a per-frame callback. It first runs on the next step.
    pub fn register_callback(
        &mut self,
        f: impl FnMut(&mut FrameContext<'_>) + 'static,
    ) -> CallbackId {
        self.callbacks.pending_mut().register(f)
    }

    /// Queues removal of a per-frame callback.
    pub fn remove_callback(&mut self, id: CallbackId) {
        self.callbacks.pending_mut().remove(id);
    }

    // -- Frame loop --

    /// Runs one frame. Returns `Ok(None)` without doing anything while
    /// stopped.
    ///
    /// # Errors
    ///
    /// Returns the first batch submission failure. The rest of the draw pass
    /// is skipped, but touches and callbacks still run and the engine keeps
    /// running.
    pub fn step(
        &mut self,
        now: HostTime,
        samples: &PointerSamples,
        submitter: &mut dyn BatchSubmitter,
    ) -> Result<Option<FrameReport>, FrameError> {
        self.step_traced(now, samples, submitter, &mut Tracer::none())
    }

    /// [`step`](Self::step) with tracing.
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    pub fn step_traced(
        &mut self,
        now: HostTime,
        samples: &PointerSamples,
        submitter: &mut dyn BatchSubmitter,
        tracer: &mut Tracer<'_>,
    ) -> Result<Option<FrameReport>, FrameError> {
        if !self.is_running() {
            return Ok(None);
        }
        let elapsed = self.clock.elapsed(now);
        let delta = elapsed.saturating_sub(self.last_elapsed);
        self.last_elapsed = elapsed;
        let frame_index = self.frame_count;
        self.frame_count += 1;
        let dt = delta.as_secs_f32();

        let begin = FrameBeginEvent {
            frame_index,
            now,
            delta,
        };
        tracer.frame_begin(&begin);
        let mut summary = FrameSummaryBuilder::new(&begin);

        // A resized surface changes every vertex's projection.
        if self.viewport.take_changed()
            && let Some(scene) = &mut self.scene
        {
            let root = scene.root();
            scene.nodes_mut().mark_rerender(root, ReRender::VERTEX);
        }

        // 1. Update
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase: PhaseKind::Update,
        });
        let update = self
            .scene
            .as_mut()
            .map(|scene| scene.update(dt))
            .unwrap_or_default();
        tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase: PhaseKind::Update,
            items: update.nodes_visited,
        });
        #[cfg(feature = "trace-rich")]
        if !update.changes.is_empty() {
            tracer.node_changes(frame_index, &update.changes);
        }
        summary.record_update(&update);

        // 2. Draw
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase: PhaseKind::Draw,
        });
        submitter.begin_frame(self.config.clear_color);
        let draw = match &mut self.scene {
            Some(scene) => scene.draw(submitter),
            None => Ok(DrawStats::default()),
        };
        tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase: PhaseKind::Draw,
            items: draw.as_ref().map_or(0, |d| d.draw_calls),
        });
        if let Ok(d) = &draw {
            summary.record_draw(d);
        }

        // 3. Touch. Runs even when the draw failed so no pointer loses a
        // release.
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase: PhaseKind::Touch,
        });
        let touches = match &mut self.scene {
            Some(scene) => {
                self.router.set_scale(self.viewport.view_to_scene_scale());
                scene.dispatch_touches(&mut self.router, dt, samples)
            }
            None => {
                self.router.reset();
                Vec::new()
            }
        };
        for touch in &touches {
            tracer.pointer(&PointerEvent::new(frame_index, touch));
        }
        let touch_count = u32::try_from(touches.len()).unwrap_or(u32::MAX);
        tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase: PhaseKind::Touch,
            items: touch_count,
        });
        summary.record_touches(touch_count);

        let nodes = self.scene.as_ref().map_or(0, |s| s.nodes().node_count());
        let draw_calls = draw.as_ref().map_or(0, |d| d.draw_calls);
        self.stats.record(dt, draw_calls, nodes);

        // 4. Callbacks
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase: PhaseKind::Callbacks,
        });
        let callbacks = self.callbacks.run(delta, frame_index, self.scene.as_mut());
        tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase: PhaseKind::Callbacks,
            items: callbacks,
        });
        summary.record_callbacks(callbacks);

        tracer.frame_summary(&summary.finish());

        let draw = draw?;
        Ok(Some(FrameReport {
            frame_index,
            delta,
            update,
            draw,
            touches,
            callbacks,
        }))
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.app.on_dispose();
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::Point;

    use super::*;
    use crate::batch::RenderBatch;
    use crate::error::SubmitError;
    use crate::node::NodeId;
    use crate::testing::{Heard, RecordingListener, RecordingSubmitter};
    use crate::touch::{PointerPhase, PointerSample, TouchPhase, Touchable};

    type Events = Rc<RefCell<Vec<&'static str>>>;

    #[derive(Default)]
    struct Lifecycle {
        events: Events,
        scene_on_load: bool,
    }

    impl Application for Lifecycle {
        fn on_load(&mut self, cx: &mut AppContext<'_>) {
            self.events.borrow_mut().push("load");
            if self.scene_on_load {
                let mut scene = Scene::new();
                let n = scene.nodes_mut().create_drawable(RenderBatch::new());
                scene.add(n);
                cx.load_scene(scene);
            }
        }

        fn on_resume(&mut self, _cx: &mut AppContext<'_>) {
            self.events.borrow_mut().push("resume");
        }

        fn on_pause(&mut self, _cx: &mut AppContext<'_>) {
            self.events.borrow_mut().push("pause");
        }

        fn on_low_memory(&mut self, _cx: &mut AppContext<'_>) {
            self.events.borrow_mut().push("low_memory");
        }

        fn on_dispose(&mut self) {
            self.events.borrow_mut().push("dispose");
        }
    }

    fn engine_with(events: &Events, scene_on_load: bool) -> Engine {
        let app = Lifecycle {
            events: Rc::clone(events),
            scene_on_load,
        };
        Engine::new(app, EngineConfig::default())
    }

    fn ms(v: u64) -> HostTime {
        HostTime::from_millis(v)
    }

    #[test]
    fn load_runs_once_and_resume_every_start() {
        let events = Events::default();
        let mut engine = engine_with(&events, false);
        engine.start(ms(0));
        engine.start(ms(1));
        engine.stop(ms(2));
        engine.stop(ms(3));
        engine.start(ms(4));
        engine.low_memory(ms(5));
        engine.stop(ms(6));
        engine.low_memory(ms(7));
        drop(engine);
        assert_eq!(
            *events.borrow(),
            ["load", "resume", "pause", "resume", "low_memory", "pause", "dispose"],
            "low memory is ignored while stopped"
        );
    }

    #[test]
    fn stepping_a_stopped_engine_is_a_noop() {
        let events = Events::default();
        let mut engine = engine_with(&events, true);
        let mut sub = RecordingSubmitter::default();
        let report = engine.step(ms(16), &PointerSamples::new(), &mut sub).unwrap();
        assert!(report.is_none(), "stopped engine must not step");
        assert_eq!(engine.frame_count(), 0);
        assert!(sub.calls.is_empty());
    }

    #[test]
    fn app_loaded_scene_is_tagged_and_drawn() {
        let events = Events::default();
        let mut engine = engine_with(&events, true);
        engine.start(ms(0));
        assert_eq!(engine.scene().and_then(Scene::app), Some(engine.handle()));

        let mut sub = RecordingSubmitter::default();
        let report = engine
            .step(ms(16), &PointerSamples::new(), &mut sub)
            .unwrap()
            .unwrap();
        assert_eq!(report.frame_index, 0);
        assert_eq!(report.draw.draw_calls, 1);
        assert_eq!(sub.calls.len(), 1);

        let old = engine.unload_scene().unwrap();
        assert_eq!(old.app(), None, "unloaded scene keeps no app handle");
    }

    #[test]
    fn delta_excludes_stopped_time() {
        let events = Events::default();
        let mut engine = engine_with(&events, false);
        let mut sub = RecordingSubmitter::default();
        let samples = PointerSamples::new();

        engine.start(ms(1000));
        let r = engine.step(ms(1016), &samples, &mut sub).unwrap().unwrap();
        assert_eq!(r.delta, Duration::from_millis(16));

        engine.stop(ms(1020));
        engine.start(ms(9000));
        let r = engine.step(ms(9016), &samples, &mut sub).unwrap().unwrap();
        assert_eq!(r.delta, Duration::from_millis(16), "paused gap leaked into delta");
        assert_eq!(r.frame_index, 1);
    }

    #[test]
    fn callbacks_registered_from_lifecycle_run_next_step() {
        struct Registers(Rc<RefCell<u32>>);
        impl Application for Registers {
            fn on_resume(&mut self, cx: &mut AppContext<'_>) {
                let count = Rc::clone(&self.0);
                cx.register_callback(move |_| *count.borrow_mut() += 1);
            }
        }

        let count = Rc::new(RefCell::new(0));
        let mut engine = Engine::new(Registers(Rc::clone(&count)), EngineConfig::default());
        engine.start(ms(0));
        let mut sub = RecordingSubmitter::default();
        let r = engine
            .step(ms(16), &PointerSamples::new(), &mut sub)
            .unwrap()
            .unwrap();
        assert_eq!(r.callbacks, 1);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn callback_removal_is_deferred() {
        let events = Events::default();
        let mut engine = engine_with(&events, false);
        engine.start(ms(0));
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        let id = engine.register_callback(move |cx| {
            *h.borrow_mut() += 1;
            cx.remove_self();
        });
        let mut sub = RecordingSubmitter::default();
        let samples = PointerSamples::new();
        engine.step(ms(16), &samples, &mut sub).unwrap();
        engine.step(ms(32), &samples, &mut sub).unwrap();
        assert_eq!(*hits.borrow(), 1);
        // Removing an already-removed id is harmless.
        engine.remove_callback(id);
        engine.step(ms(48), &samples, &mut sub).unwrap();
        assert_eq!(*hits.borrow(), 1);
    }

    /// A running single-touch engine with one 100x100 touchable drawable.
    fn touch_pad(log: &crate::testing::Log) -> (Engine, NodeId) {
        let mut scene = Scene::new();
        let pad = scene
            .nodes_mut()
            .create_drawable(RenderBatch::quad(Size::new(100.0, 100.0)));
        scene.nodes_mut().set_size(pad, Size::new(100.0, 100.0));
        scene
            .nodes_mut()
            .set_touchable(pad, Some(Touchable::new(RecordingListener::shared(log))));
        scene.add(pad);
        let mut engine = Engine::new(Lifecycle::default(), EngineConfig::single_touch());
        engine.load_scene(scene);
        engine.start(ms(0));
        (engine, pad)
    }

    fn sample(id: u32, phase: PointerPhase, x: f64, y: f64) -> PointerSamples {
        let mut samples = PointerSamples::new();
        samples.insert(id, PointerSample::new(phase, x, y));
        samples
    }

    #[test]
    fn submission_failure_keeps_engine_running() {
        let log = crate::testing::Log::default();
        let (mut engine, pad) = touch_pad(&log);
        let mut sub = RecordingSubmitter::default();
        engine
            .step(ms(16), &sample(1, PointerPhase::Down, 10.0, 10.0), &mut sub)
            .unwrap();
        engine.step(ms(32), &PointerSamples::new(), &mut sub).unwrap();

        // The release arrives on a frame whose submission fails.
        let mut failing = RecordingSubmitter::failing_after(0);
        let err = engine
            .step(ms(48), &sample(1, PointerPhase::Up, 10.0, 10.0), &mut failing)
            .unwrap_err();
        assert!(matches!(
            err,
            FrameError::Submit {
                source: SubmitError::ResourceExhausted,
                ..
            }
        ));
        assert!(engine.is_running());
        assert_eq!(
            log.borrow().last(),
            Some(&Heard::End {
                node: pad,
                id: 1,
                contains: true
            }),
            "release on a failed frame must still be delivered"
        );

        let r = engine
            .step(ms(64), &PointerSamples::new(), &mut sub)
            .unwrap()
            .unwrap();
        assert_eq!(r.frame_index, 3);
        assert_eq!(r.delta, Duration::from_millis(16));
    }

    #[test]
    fn failed_frame_does_not_lock_out_single_touch() {
        let log = crate::testing::Log::default();
        let (mut engine, pad) = touch_pad(&log);
        let mut sub = RecordingSubmitter::default();
        let mut failing = RecordingSubmitter::failing_after(0);
        engine
            .step(ms(16), &sample(1, PointerPhase::Down, 10.0, 10.0), &mut sub)
            .unwrap();
        engine.step(ms(32), &PointerSamples::new(), &mut sub).unwrap();
        assert!(
            engine
                .step(ms(48), &sample(1, PointerPhase::Up, 10.0, 10.0), &mut failing)
                .is_err()
        );

        log.borrow_mut().clear();
        engine
            .step(ms(64), &sample(2, PointerPhase::Down, 20.0, 20.0), &mut sub)
            .unwrap();
        let r = engine
            .step(ms(80), &sample(2, PointerPhase::Up, 20.0, 20.0), &mut sub)
            .unwrap()
            .unwrap();
        assert_eq!(r.touches.len(), 1);
        assert_eq!(r.touches[0].touch.phase, TouchPhase::DownUp);
        assert_eq!(
            *log.borrow(),
            [
                Heard::Begin {
                    node: pad,
                    id: 2,
                    phase: TouchPhase::DownUp
                },
                Heard::End {
                    node: pad,
                    id: 2,
                    contains: true
                },
            ]
        );
    }

    #[test]
    fn callbacks_run_on_a_failed_frame() {
        let events = Events::default();
        let mut engine = engine_with(&events, true);
        engine.start(ms(0));
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        engine.register_callback(move |_| *h.borrow_mut() += 1);
        let mut failing = RecordingSubmitter::failing_after(0);
        assert!(engine.step(ms(16), &PointerSamples::new(), &mut failing).is_err());
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn each_frame_begins_with_the_clear_color() {
        let events = Events::default();
        let mut engine = engine_with(&events, false);
        assert_eq!(engine.clear_color(), Color::BLACK);
        engine.start(ms(0));
        let mut sub = RecordingSubmitter::default();
        engine.step(ms(16), &PointerSamples::new(), &mut sub).unwrap();
        engine.set_clear_color(Color::rgb(0.1, 0.2, 0.3));
        engine.step(ms(32), &PointerSamples::new(), &mut sub).unwrap();
        assert_eq!(sub.clears, [Color::BLACK, Color::rgb(0.1, 0.2, 0.3)]);

        // Stopped engines do not begin frames.
        engine.stop(ms(40));
        engine.step(ms(48), &PointerSamples::new(), &mut sub).unwrap();
        assert_eq!(sub.clears.len(), 2);
    }

    #[test]
    fn resize_reuploads_every_vertex() {
        let events = Events::default();
        let mut engine = engine_with(&events, true);
        engine.start(ms(0));
        let mut sub = RecordingSubmitter::default();
        let samples = PointerSamples::new();
        engine.step(ms(16), &samples, &mut sub).unwrap();
        engine.step(ms(32), &samples, &mut sub).unwrap();
        assert_eq!(sub.calls.last().map(|c| c.uploads), Some(ReRender::NONE));

        assert!(engine.set_display_size(Size::new(640.0, 1280.0), Size::new(320.0, 640.0)));
        engine.step(ms(48), &samples, &mut sub).unwrap();
        assert_eq!(sub.calls.last().map(|c| c.uploads), Some(ReRender::VERTEX));

        engine.step(ms(64), &samples, &mut sub).unwrap();
        assert_eq!(sub.calls.last().map(|c| c.uploads), Some(ReRender::NONE));
    }

    #[test]
    fn touches_are_scaled_into_scene_units() {
        let events = Events::default();
        let mut engine = engine_with(&events, false);
        // Screen is 320x640 units, view is 160x320 points.
        engine.set_display_size(Size::new(640.0, 1280.0), Size::new(160.0, 320.0));

        let log = Rc::default();
        let mut scene = Scene::new();
        let n = scene.nodes_mut().create_group();
        scene.nodes_mut().set_size(n, Size::new(100.0, 100.0));
        scene
            .nodes_mut()
            .set_touchable(n, Some(Touchable::new(RecordingListener::shared(&log))));
        scene.add(n);
        engine.load_scene(scene);
        engine.start(ms(0));

        let mut sub = RecordingSubmitter::default();
        let mut samples = PointerSamples::new();
        samples.insert(3, PointerSample::new(PointerPhase::Down, 10.0, 20.0));
        let r = engine.step(ms(16), &samples, &mut sub).unwrap().unwrap();
        assert!(r.touches.is_empty(), "a fresh press is held for one frame");

        let r = engine
            .step(ms(32), &PointerSamples::new(), &mut sub)
            .unwrap()
            .unwrap();
        assert_eq!(r.touches.len(), 1);
        let t = r.touches[0].touch;
        assert_eq!(t.phase, TouchPhase::Down);
        assert_eq!(t.position, Point::new(20.0, 40.0));
        assert_eq!(t.view_position, Point::new(10.0, 20.0));
        assert_eq!(r.touches[0].began, 1);
    }

    #[test]
    fn display_only_config_routes_nothing() {
        let mut engine = Engine::new(Lifecycle::default(), EngineConfig::display_only());
        let log = Rc::default();
        let mut scene = Scene::new();
        let n = scene.nodes_mut().create_group();
        scene
            .nodes_mut()
            .set_touchable(n, Some(Touchable::new(RecordingListener::shared(&log))));
        scene.add(n);
        engine.load_scene(scene);
        engine.start(ms(0));

        let mut sub = RecordingSubmitter::default();
        let mut samples = PointerSamples::new();
        samples.insert(0, PointerSample::new(PointerPhase::Down, 0.0, 0.0));
        for t in [16, 32] {
            let r = engine.step(ms(t), &samples, &mut sub).unwrap().unwrap();
            assert!(r.touches.is_empty());
        }
        assert!(log.borrow().is_empty());

        engine.set_touch_enabled(true);
        assert!(engine.config().touch_enabled);
    }

    #[test]
    fn stats_sample_frames() {
        let events = Events::default();
        let mut engine = engine_with(&events, true);
        engine.start(ms(0));
        let mut sub = RecordingSubmitter::default();
        let samples = PointerSamples::new();
        for i in 1..=20 {
            engine.step(ms(i * 20), &samples, &mut sub).unwrap();
        }
        assert_eq!(engine.stats().frames(), 20);
        let snap = engine.stats().snapshot();
        assert!((snap.fps - 50.0).abs() < 0.5, "fps was {}", snap.fps);
        assert_eq!(snap.draw_calls, 1);
        assert_eq!(snap.nodes, 2);
    }
}
