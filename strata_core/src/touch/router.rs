// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame touch routing with pointer history.
//!
//! # Held presses
//!
//! A pointer's first `Down` sample produces no event on its own frame. The
//! press is held and resolved by the pointer's next sample:
//!
//! | next sample            | events                      |
//! |------------------------|-----------------------------|
//! | `Up`                   | one [`TouchPhase::DownUp`]  |
//! | `Move`                 | `Down`, then `Move`         |
//! | none (next frame)      | `Down`                      |
//!
//! A quick tap that lands entirely between two frames is therefore reported
//! as a single `DownUp` rather than as a press and release on adjacent
//! frames.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::Point;

use super::{PointerPhase, PointerSample, PointerSamples, Touch, TouchContext, TouchPhase};
use crate::node::{NodeId, NodeStore};

/// Touch routing options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchRouterConfig {
    /// Whether samples are routed at all.
    pub enabled: bool,
    /// Whether several pointers are tracked at once. When off, only the first
    /// pointer to go down is tracked until it is released.
    pub multi_touch: bool,
}

impl Default for TouchRouterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            multi_touch: true,
        }
    }
}

/// The outcome of routing one touch event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DispatchedTouch {
    /// The event as routed.
    pub touch: Touch,
    /// Nodes offered the press through `touch_begin`.
    pub began: u32,
    /// Nodes that received any listener call.
    pub notified: u32,
    /// The swallowing node that accepted the press, if any.
    pub swallowed_by: Option<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    /// Down seen, no event produced yet.
    Held,
    /// Down delivered; the pointer is being tracked.
    Pressed,
}

#[derive(Clone, Copy, Debug)]
struct History {
    last: Touch,
    stage: Stage,
}

/// Turns per-frame pointer samples into routed touch events.
#[derive(Clone, Debug)]
pub struct TouchRouter {
    config: TouchRouterConfig,
    scale: f64,
    uptime: f64,
    history: BTreeMap<u32, History>,
}

impl Default for TouchRouter {
    fn default() -> Self {
        Self::new(TouchRouterConfig::default())
    }
}

impl TouchRouter {
    /// Creates a router with no pointer history and a view-to-scene scale of 1.
    #[must_use]
    pub fn new(config: TouchRouterConfig) -> Self {
        Self {
            config,
            scale: 1.0,
            uptime: 0.0,
            history: BTreeMap::new(),
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> TouchRouterConfig {
        self.config
    }

    /// Replaces the configuration. Switching modes forgets all pointers.
    pub fn set_config(&mut self, config: TouchRouterConfig) {
        if config != self.config {
            self.history.clear();
        }
        self.config = config;
    }

    /// Factor from view pixels to scene units.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Sets the factor from view pixels to scene units.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// Seconds of routed time, advanced by each dispatch.
    #[must_use]
    pub fn uptime(&self) -> f64 {
        self.uptime
    }

    /// Number of pointers currently tracked, held presses included.
    #[must_use]
    pub fn active_pointers(&self) -> usize {
        self.history.len()
    }

    /// Forgets all pointers.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Routes one frame of samples to `targets` and clears `targets`.
    ///
    /// `targets` must be in draw order, as collected by
    /// [`NodeStore::update`]; it is walked back to front. Returns the routed
    /// events in the order they were delivered.
    pub fn dispatch(
        &mut self,
        delta: f32,
        samples: &PointerSamples,
        nodes: &mut NodeStore,
        targets: &mut Vec<NodeId>,
    ) -> Vec<DispatchedTouch> {
        self.uptime += f64::from(delta);
        let mut out = Vec::new();
        if !self.config.enabled {
            targets.clear();
            return out;
        }

        let mut seen = Vec::new();
        if self.config.multi_touch {
            for (&id, sample) in samples {
                self.apply(id, sample, nodes, targets, &mut seen, &mut out);
            }
        } else if let Some(&active) = self.history.keys().next() {
            if let Some(sample) = samples.get(&active) {
                self.apply(active, sample, nodes, targets, &mut seen, &mut out);
            }
        } else if let Some((&id, sample)) = samples
            .iter()
            .find(|(_, s)| s.phase == PointerPhase::Down)
        {
            self.apply(id, sample, nodes, targets, &mut seen, &mut out);
        }

        // Presses held on an earlier frame with no sample this frame.
        let held: Vec<u32> = self
            .history
            .iter()
            .filter(|(id, h)| h.stage == Stage::Held && !seen.contains(*id))
            .map(|(&id, _)| id)
            .collect();
        for id in held {
            let Some(h) = self.history.get_mut(&id) else {
                continue;
            };
            h.stage = Stage::Pressed;
            let touch = h.last;
            out.push(route(touch, nodes, targets));
        }

        targets.clear();
        out
    }

    fn apply(
        &mut self,
        id: u32,
        sample: &PointerSample,
        nodes: &mut NodeStore,
        targets: &[NodeId],
        seen: &mut Vec<u32>,
        out: &mut Vec<DispatchedTouch>,
    ) {
        seen.push(id);
        let view = Point::new(sample.x, sample.y);
        let pos = Point::new(sample.x * self.scale, sample.y * self.scale);

        let Some(prev) = self.history.get(&id).copied() else {
            if sample.phase == PointerPhase::Down
                && (self.config.multi_touch || self.history.is_empty())
            {
                let last = Touch::pressed(id, pos, view, self.uptime);
                self.history.insert(
                    id,
                    History {
                        last,
                        stage: Stage::Held,
                    },
                );
            }
            // Moves and releases of unknown pointers are dropped.
            return;
        };

        match (prev.stage, sample.phase) {
            // Duplicate press.
            (_, PointerPhase::Down) => {}
            (Stage::Held, PointerPhase::Up) => {
                self.history.remove(&id);
                let touch = prev.last.advanced(TouchPhase::DownUp, pos, view, self.uptime);
                out.push(route(touch, nodes, targets));
            }
            (Stage::Held, PointerPhase::Move) => {
                out.push(route(prev.last, nodes, targets));
                let touch = prev.last.advanced(TouchPhase::Move, pos, view, self.uptime);
                self.history.insert(
                    id,
                    History {
                        last: touch,
                        stage: Stage::Pressed,
                    },
                );
                out.push(route(touch, nodes, targets));
            }
            (Stage::Pressed, PointerPhase::Move) => {
                let touch = prev.last.advanced(TouchPhase::Move, pos, view, self.uptime);
                self.history.insert(
                    id,
                    History {
                        last: touch,
                        stage: Stage::Pressed,
                    },
                );
                out.push(route(touch, nodes, targets));
            }
            (Stage::Pressed, PointerPhase::Up) => {
                self.history.remove(&id);
                let touch = prev.last.advanced(TouchPhase::Up, pos, view, self.uptime);
                out.push(route(touch, nodes, targets));
            }
        }
    }
}

/// Delivers one touch to `targets`, topmost first.
fn route(touch: Touch, nodes: &mut NodeStore, targets: &[NodeId]) -> DispatchedTouch {
    let mut out = DispatchedTouch {
        touch,
        began: 0,
        notified: 0,
        swallowed_by: None,
    };
    for &node in targets.iter().rev() {
        if !nodes.is_alive(node) {
            continue;
        }
        let contains = nodes.contains_point(node, touch.position);
        let cx = TouchContext { node, contains };
        let Some(touchable) = nodes.touchable_mut(node) else {
            continue;
        };
        let swallow = touchable.swallow;
        let listener = touchable.listener_mut();
        let mut notified = false;

        if touch.phase.is_press() && contains && out.swallowed_by.is_none() {
            notified = true;
            out.began += 1;
            if listener.touch_begin(&touch, &cx) && swallow {
                out.swallowed_by = Some(node);
            }
        }
        if touch.phase == TouchPhase::Move {
            notified = true;
            listener.touch_move(&touch, &cx);
        }
        if touch.phase.is_release() {
            notified = true;
            listener.touch_end(&touch, &cx);
        }
        if notified {
            out.notified += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::{Point, Size};

    use super::*;
    use crate::testing::{Heard, Log, RecordingListener};
    use crate::touch::Touchable;

    const DT: f32 = 1.0 / 60.0;

    struct Fixture {
        store: NodeStore,
        root: NodeId,
        back: NodeId,
        front: NodeId,
        log: Log,
        targets: Vec<NodeId>,
    }

    /// Two overlapping 100×100 nodes; `front` is drawn last.
    fn fixture(front_swallows: bool) -> Fixture {
        let mut store = NodeStore::new();
        let root = store.create_group();
        let back = store.create_group();
        let front = store.create_group();
        store.add_child(root, back);
        store.add_child(root, front);
        let log = Log::default();
        for (n, swallow) in [(back, false), (front, front_swallows)] {
            store.set_size(n, Size::new(100.0, 100.0));
            store.set_touchable(
                n,
                Some(Touchable::new(RecordingListener::shared(&log)).with_swallow(swallow)),
            );
        }
        Fixture {
            store,
            root,
            back,
            front,
            log,
            targets: Vec::new(),
        }
    }

    fn samples(entries: &[(u32, PointerPhase, f64, f64)]) -> PointerSamples {
        entries
            .iter()
            .map(|&(id, phase, x, y)| (id, PointerSample::new(phase, x, y)))
            .collect()
    }

    impl Fixture {
        fn frame(
            &mut self,
            router: &mut TouchRouter,
            entries: &[(u32, PointerPhase, f64, f64)],
        ) -> Vec<DispatchedTouch> {
            self.store.update(self.root, &mut self.targets);
            router.dispatch(DT, &samples(entries), &mut self.store, &mut self.targets)
        }

        fn heard(&self) -> Vec<Heard> {
            self.log.borrow_mut().drain(..).collect()
        }
    }

    #[test]
    fn press_is_held_for_one_frame() {
        let mut f = fixture(false);
        let mut router = TouchRouter::default();

        let out = f.frame(&mut router, &[(1, PointerPhase::Down, 10.0, 10.0)]);
        assert!(out.is_empty());
        assert_eq!(router.active_pointers(), 1);
        assert!(f.heard().is_empty());

        let out = f.frame(&mut router, &[]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].touch.phase, TouchPhase::Down);
        assert_eq!(out[0].began, 2);
        assert_eq!(
            f.heard(),
            vec![
                Heard::Begin {
                    node: f.front,
                    id: 1,
                    phase: TouchPhase::Down
                },
                Heard::Begin {
                    node: f.back,
                    id: 1,
                    phase: TouchPhase::Down
                },
            ]
        );
    }

    #[test]
    fn up_after_held_press_is_down_up() {
        let mut f = fixture(false);
        let mut router = TouchRouter::default();
        f.frame(&mut router, &[(1, PointerPhase::Down, 10.0, 10.0)]);
        let out = f.frame(&mut router, &[(1, PointerPhase::Up, 12.0, 10.0)]);

        assert_eq!(out.len(), 1);
        let touch = out[0].touch;
        assert_eq!(touch.phase, TouchPhase::DownUp);
        assert_eq!(touch.start_position, Point::new(10.0, 10.0));
        assert_eq!(touch.position, Point::new(12.0, 10.0));
        assert_eq!(router.active_pointers(), 0);
        assert_eq!(
            f.heard(),
            vec![
                Heard::Begin {
                    node: f.front,
                    id: 1,
                    phase: TouchPhase::DownUp
                },
                Heard::End {
                    node: f.front,
                    id: 1,
                    contains: true
                },
                Heard::Begin {
                    node: f.back,
                    id: 1,
                    phase: TouchPhase::DownUp
                },
                Heard::End {
                    node: f.back,
                    id: 1,
                    contains: true
                },
            ]
        );
    }

    #[test]
    fn move_after_held_press_emits_down_then_move() {
        let mut f = fixture(false);
        let mut router = TouchRouter::default();
        f.frame(&mut router, &[(4, PointerPhase::Down, 10.0, 10.0)]);
        let out = f.frame(&mut router, &[(4, PointerPhase::Move, 30.0, 10.0)]);
        let phases: Vec<_> = out.iter().map(|d| d.touch.phase).collect();
        assert_eq!(phases, [TouchPhase::Down, TouchPhase::Move]);
        assert_eq!(out[1].touch.delta_position.x, 20.0);
        assert!((out[1].touch.delta_time - f64::from(DT)).abs() < 1e-9);
    }

    #[test]
    fn swallowing_node_hides_press_from_nodes_beneath() {
        let mut f = fixture(true);
        let mut router = TouchRouter::default();
        f.frame(&mut router, &[(1, PointerPhase::Down, 10.0, 10.0)]);
        let out = f.frame(&mut router, &[]);
        assert_eq!(out[0].swallowed_by, Some(f.front));
        assert_eq!(out[0].began, 1);
        assert_eq!(
            f.heard(),
            vec![Heard::Begin {
                node: f.front,
                id: 1,
                phase: TouchPhase::Down
            }]
        );

        // Release still reaches both.
        f.frame(&mut router, &[(1, PointerPhase::Up, 10.0, 10.0)]);
        let heard = f.heard();
        assert_eq!(heard.len(), 2);
        assert!(heard.iter().all(|h| matches!(h, Heard::End { .. })));
    }

    #[test]
    fn rejected_press_is_not_swallowed() {
        let mut f = fixture(true);
        let mut listener = RecordingListener::shared(&f.log);
        listener.reject = true;
        f.store.set_touchable(
            f.front,
            Some(Touchable::new(listener).with_swallow(true)),
        );
        f.store.set_size(f.front, Size::new(100.0, 100.0));
        let mut router = TouchRouter::default();
        f.frame(&mut router, &[(1, PointerPhase::Down, 10.0, 10.0)]);
        let out = f.frame(&mut router, &[]);
        assert_eq!(out[0].swallowed_by, None);
        assert_eq!(out[0].began, 2);
    }

    #[test]
    fn press_outside_is_not_offered() {
        let mut f = fixture(false);
        f.store.set_position(f.front, Point::new(200.0, 0.0));
        let mut router = TouchRouter::default();
        f.frame(&mut router, &[(1, PointerPhase::Down, 250.0, 50.0)]);
        f.frame(&mut router, &[]);
        assert_eq!(
            f.heard(),
            vec![Heard::Begin {
                node: f.front,
                id: 1,
                phase: TouchPhase::Down
            }]
        );
    }

    #[test]
    fn moves_reach_every_target() {
        let mut f = fixture(false);
        let mut router = TouchRouter::default();
        f.frame(&mut router, &[(1, PointerPhase::Down, 10.0, 10.0)]);
        f.frame(&mut router, &[]);
        f.heard();

        let out = f.frame(&mut router, &[(1, PointerPhase::Move, 500.0, 500.0)]);
        assert_eq!(out[0].notified, 2);
        assert_eq!(
            f.heard(),
            vec![
                Heard::Move {
                    node: f.front,
                    id: 1,
                    contains: false
                },
                Heard::Move {
                    node: f.back,
                    id: 1,
                    contains: false
                },
            ]
        );
    }

    #[test]
    fn history_is_erased_on_release() {
        let mut f = fixture(false);
        let mut router = TouchRouter::default();
        f.frame(&mut router, &[(1, PointerPhase::Down, 10.0, 10.0)]);
        f.frame(&mut router, &[]);
        f.frame(&mut router, &[(1, PointerPhase::Up, 10.0, 10.0)]);
        assert_eq!(router.active_pointers(), 0);
        f.heard();

        // A stray release or move for the same id is ignored.
        let out = f.frame(&mut router, &[(1, PointerPhase::Up, 10.0, 10.0)]);
        assert!(out.is_empty());
        let out = f.frame(&mut router, &[(1, PointerPhase::Move, 10.0, 10.0)]);
        assert!(out.is_empty());
        assert!(f.heard().is_empty());
    }

    #[test]
    fn duplicate_press_is_ignored() {
        let mut f = fixture(false);
        let mut router = TouchRouter::default();
        f.frame(&mut router, &[(1, PointerPhase::Down, 10.0, 10.0)]);
        f.frame(&mut router, &[]);
        let out = f.frame(&mut router, &[(1, PointerPhase::Down, 40.0, 40.0)]);
        assert!(out.is_empty());
        assert_eq!(router.active_pointers(), 1);
    }

    #[test]
    fn single_touch_tracks_first_pointer_only() {
        let mut f = fixture(false);
        let mut router = TouchRouter::new(TouchRouterConfig {
            enabled: true,
            multi_touch: false,
        });
        f.frame(
            &mut router,
            &[
                (2, PointerPhase::Down, 10.0, 10.0),
                (5, PointerPhase::Down, 20.0, 20.0),
            ],
        );
        assert_eq!(router.active_pointers(), 1);
        let out = f.frame(&mut router, &[(5, PointerPhase::Move, 30.0, 30.0)]);
        // Pointer 5 is ignored; pointer 2's held press resolves.
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].touch.id, 2);
        assert_eq!(out[0].touch.phase, TouchPhase::Down);

        f.frame(&mut router, &[(2, PointerPhase::Up, 10.0, 10.0)]);
        assert_eq!(router.active_pointers(), 0);
        f.frame(&mut router, &[(5, PointerPhase::Down, 20.0, 20.0)]);
        assert_eq!(router.active_pointers(), 1);
    }

    #[test]
    fn multi_touch_tracks_pointers_independently() {
        let mut f = fixture(false);
        let mut router = TouchRouter::default();
        f.frame(
            &mut router,
            &[
                (1, PointerPhase::Down, 10.0, 10.0),
                (2, PointerPhase::Down, 20.0, 20.0),
            ],
        );
        let out = f.frame(
            &mut router,
            &[
                (1, PointerPhase::Up, 10.0, 10.0),
                (2, PointerPhase::Move, 25.0, 20.0),
            ],
        );
        let events: Vec<_> = out.iter().map(|d| (d.touch.id, d.touch.phase)).collect();
        assert_eq!(
            events,
            [
                (1, TouchPhase::DownUp),
                (2, TouchPhase::Down),
                (2, TouchPhase::Move)
            ]
        );
        assert_eq!(router.active_pointers(), 1);
    }

    #[test]
    fn view_positions_are_scaled_into_scene_units() {
        let mut f = fixture(false);
        let mut router = TouchRouter::default();
        router.set_scale(0.5);
        f.frame(&mut router, &[(1, PointerPhase::Down, 180.0, 20.0)]);
        let out = f.frame(&mut router, &[]);
        assert_eq!(out[0].touch.view_position, Point::new(180.0, 20.0));
        assert_eq!(out[0].touch.position, Point::new(90.0, 10.0));
        // 90 scene units is inside the 100-unit nodes.
        assert_eq!(out[0].began, 2);
    }

    #[test]
    fn targets_are_cleared_after_dispatch() {
        let mut f = fixture(false);
        let mut router = TouchRouter::default();
        f.frame(&mut router, &[]);
        assert!(f.targets.is_empty());
    }

    #[test]
    fn disabled_router_drops_samples() {
        let mut f = fixture(false);
        let mut router = TouchRouter::new(TouchRouterConfig {
            enabled: false,
            multi_touch: true,
        });
        f.frame(&mut router, &[(1, PointerPhase::Down, 10.0, 10.0)]);
        let out = f.frame(&mut router, &[(1, PointerPhase::Up, 10.0, 10.0)]);
        assert!(out.is_empty());
        assert_eq!(router.active_pointers(), 0);
        assert!(f.targets.is_empty());
    }

    #[test]
    fn uptime_accumulates_deltas() {
        let mut f = fixture(false);
        let mut router = TouchRouter::default();
        f.frame(&mut router, &[]);
        f.frame(&mut router, &[(1, PointerPhase::Down, 1.0, 1.0)]);
        f.frame(&mut router, &[(1, PointerPhase::Move, 2.0, 1.0)]);
        assert!((router.uptime() - 3.0 * f64::from(DT)).abs() < 1e-9);
    }
}
