// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame loop that exercises the tracing and diagnostics pipeline.
//!
//! Runs 60 frames of a small scene (a spinning group, a tappable button, and
//! a draggable knob) through the [`Engine`], sending trace events to both a
//! [`PrettyPrintSink`] and a [`RecorderSink`], then exports a Chrome trace
//! JSON file.

use std::cell::Cell;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use kurbo::{Point, Size};
use strata_core::batch::{RenderBatch, TextureId};
use strata_core::color::Color;
use strata_core::engine::{AppContext, Application, Engine, EngineConfig};
use strata_core::node::NodeId;
use strata_core::scene::Scene;
use strata_core::time::HostTime;
use strata_core::touch::{
    GestureListener, PointerPhase, PointerSample, PointerSamples, TouchPhase, Touchable,
};
use strata_core::trace::{
    FrameBeginEvent, FrameSummary, LifecycleEvent, NodeChange, PhaseBeginEvent, PhaseEndEvent,
    PointerEvent, TraceSink, Tracer,
};
use strata_render::DrawList;

use strata_debug::pretty::PrettyPrintSink;
use strata_debug::recorder::RecorderSink;

const FRAME_COUNT: u64 = 60;
const DRAG_POINTER: u32 = 1;
/// 16.6ms refresh interval in nanoseconds (≈60 Hz).
const REFRESH_INTERVAL_NS: u64 = 16_666_667;

/// Radians per second of the spinning group.
const SPIN_RATE: f64 = 1.5;

/// Forwards every event to two sinks.
struct Tee<'a> {
    a: &'a mut dyn TraceSink,
    b: &'a mut dyn TraceSink,
}

impl TraceSink for Tee<'_> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.a.on_frame_begin(e);
        self.b.on_frame_begin(e);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.a.on_phase_begin(e);
        self.b.on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.a.on_phase_end(e);
        self.b.on_phase_end(e);
    }

    fn on_pointer(&mut self, e: &PointerEvent) {
        self.a.on_pointer(e);
        self.b.on_pointer(e);
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.a.on_lifecycle(e);
        self.b.on_lifecycle(e);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.a.on_frame_summary(s);
        self.b.on_frame_summary(s);
    }

    fn on_node_changes(&mut self, frame_index: u64, changes: &[NodeChange]) {
        self.a.on_node_changes(frame_index, changes);
        self.b.on_node_changes(frame_index, changes);
    }
}

/// Builds the demo scene on load and spins its group from a frame callback.
struct Demo {
    taps: Rc<Cell<u32>>,
    knob: Rc<Cell<Option<NodeId>>>,
}

impl Application for Demo {
    fn on_load(&mut self, cx: &mut AppContext<'_>) {
        let mut scene = Scene::new();
        let nodes = scene.nodes_mut();

        // Spinning group of three tinted tiles.
        let spinner = nodes.create_group();
        nodes.set_position(spinner, Point::new(160.0, 200.0));
        for (i, color) in [
            Color::rgb(1.0, 0.3, 0.3),
            Color::rgb(0.3, 1.0, 0.3),
            Color::rgb(0.3, 0.3, 1.0),
        ]
        .into_iter()
        .enumerate()
        {
            let tile = nodes.create_drawable(RenderBatch::quad(Size::new(32.0, 32.0)));
            nodes.set_position(tile, Point::new(40.0 * i as f64, 0.0));
            nodes.set_color(tile, color);
            nodes.add_child(spinner, tile);
        }
        scene.add(spinner);

        // Button drawn above the spinner.
        let nodes = scene.nodes_mut();
        let button = nodes.create_drawable(
            RenderBatch::quad(Size::new(80.0, 40.0)).with_texture(TextureId(1)),
        );
        nodes.set_position(button, Point::new(20.0, 20.0));
        nodes.set_size(button, Size::new(80.0, 40.0));
        nodes.set_z_index(button, 1);
        let taps = Rc::clone(&self.taps);
        let _ = nodes.set_touchable(
            button,
            Some(
                Touchable::new(GestureListener::new().on_tap(move |_, _| taps.set(taps.get() + 1)))
                    .with_swallow(true),
            ),
        );
        scene.add(button);

        // Knob that follows drags.
        let nodes = scene.nodes_mut();
        let knob = nodes.create_drawable(RenderBatch::quad(Size::new(24.0, 24.0)));
        nodes.set_position(knob, Point::new(200.0, 400.0));
        nodes.set_size(knob, Size::new(24.0, 24.0));
        let _ = nodes.set_touchable(knob, Some(Touchable::new(GestureListener::new())));
        scene.add(knob);
        self.knob.set(Some(knob));

        cx.load_scene(scene);
        cx.register_callback(move |frame| {
            let dt = frame.delta().as_secs_f64();
            if let Some(scene) = frame.scene_mut() {
                spin(scene, spinner, dt);
            }
        });
    }
}

fn spin(scene: &mut Scene, group: NodeId, dt: f64) {
    let nodes = scene.nodes_mut();
    let r = nodes.transform(group).rotation();
    nodes.set_rotation(group, r + SPIN_RATE * dt);
}

/// Pointer samples for frame `i`: a tap on the button, then a knob drag.
fn samples_for(i: u64) -> PointerSamples {
    let mut s = PointerSamples::new();
    match i {
        10 => {
            s.insert(0, PointerSample::new(PointerPhase::Down, 30.0, 30.0));
        }
        11 => {
            s.insert(0, PointerSample::new(PointerPhase::Up, 30.0, 30.0));
        }
        20 => {
            s.insert(DRAG_POINTER, PointerSample::new(PointerPhase::Down, 205.0, 405.0));
        }
        21..=39 => {
            let step = (i - 20) as f64;
            s.insert(
                DRAG_POINTER,
                PointerSample::new(PointerPhase::Move, 205.0 + 3.0 * step, 405.0),
            );
        }
        40 => {
            s.insert(DRAG_POINTER, PointerSample::new(PointerPhase::Up, 262.0, 405.0));
        }
        _ => {}
    }
    s
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();

    // -- engine ------------------------------------------------------------
    let taps = Rc::new(Cell::new(0));
    let knob = Rc::new(Cell::new(None));
    let mut engine = Engine::new(
        Demo {
            taps: Rc::clone(&taps),
            knob: Rc::clone(&knob),
        },
        EngineConfig::interactive(),
    );
    let _ = engine.set_display_size(Size::new(640.0, 1280.0), Size::new(320.0, 640.0));
    engine.set_clear_color(Color::rgb(0.08, 0.08, 0.12));

    let mut list = DrawList::new();
    list.register_texture(TextureId(1));

    // -- simulated loop ----------------------------------------------------
    let mut now_ns: u64 = 1_000_000_000; // start at 1s
    {
        let mut tee = Tee {
            a: &mut pretty,
            b: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut tee);
        engine.start_traced(HostTime(now_ns), &mut tracer);

        for i in 0..FRAME_COUNT {
            now_ns += REFRESH_INTERVAL_NS;
            list.clear();

            // Background briefly at frame 45; the pause never shows up as a delta.
            if i == 45 {
                engine.stop_traced(HostTime(now_ns), &mut tracer);
                now_ns += 2_000_000_000;
                engine.start_traced(HostTime(now_ns), &mut tracer);
            }

            let samples = samples_for(i);
            let step = engine.step_traced(HostTime(now_ns), &samples, &mut list, &mut tracer);
            let report = match step {
                Ok(Some(report)) => report,
                Ok(None) => continue,
                Err(e) => {
                    eprintln!("frame {i}: {e}");
                    continue;
                }
            };

            // Pointer 1 drags the knob.
            let Some(scene) = engine.scene_mut() else {
                continue;
            };
            for t in &report.touches {
                if t.touch.id == DRAG_POINTER && t.touch.phase == TouchPhase::Move {
                    let knob = knob.get().expect("knob is built on load");
                    let pos = scene.nodes().transform(knob).position();
                    scene
                        .nodes_mut()
                        .set_position(knob, pos + t.touch.delta_position);
                }
            }
        }

        engine.stop_traced(HostTime(now_ns), &mut tracer);
    }

    println!(
        "taps={} draws(last frame)={} fps={:.1} knob={:?}",
        taps.get(),
        list.items().len(),
        engine.stats().snapshot().fps,
        knob.get()
            .and_then(|k| engine.scene().map(|s| s.nodes().transform(k).position())),
    );

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    strata_debug::chrome::export(recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({FRAME_COUNT} frames)");
}
