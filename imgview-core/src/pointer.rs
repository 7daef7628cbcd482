//! Active-contact bookkeeping for pan and pinch gestures.
//!
//! The tracker knows nothing about the view transform. It turns raw
//! down/move/up events into [`PointerUpdate`]s that the engine applies.

use crate::points::Point;
use std::collections::BTreeMap;

/// Pinch distances at or below this are treated as coincident fingers.
const MIN_PINCH_DISTANCE: f64 = 1e-6;

/// Identifier of a contact point, as reported by the input system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointerId(pub i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureMode {
    Idle,
    Panning,
    Pinching,
}

/// Reference values captured when a pinch starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchAnchor {
    /// The two contacts whose distance drives the pinch.
    pub ids: (PointerId, PointerId),
    pub start_distance: f64,
    pub start_scale: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum GestureState {
    Idle,
    Panning {
        last_point: Point,
    },
    /// `anchor` is `None` while it still has to be seeded: the fingers
    /// coincide, or the distance-defining pair just changed.
    Pinching {
        anchor: Option<PinchAnchor>,
    },
}

/// What the engine should do in response to a move event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerUpdate {
    None,
    Pan {
        dx: f64,
        dy: f64,
    },
    Pinch {
        anchor: PinchAnchor,
        distance: f64,
        midpoint: Point,
    },
}

/// Single-contact press that may still turn out to be a tap.
#[derive(Clone, Copy, Debug)]
struct TapTracking {
    id: PointerId,
    start: Point,
    max_displacement: f64,
}

#[derive(Clone, Debug)]
pub struct PointerTracker {
    active: BTreeMap<PointerId, Point>,
    state: GestureState,
    tap: Option<TapTracking>,
    tap_slop_px: f64,
}

impl PointerTracker {
    pub fn new(tap_slop_px: f64) -> Self {
        Self {
            active: BTreeMap::new(),
            state: GestureState::Idle,
            tap: None,
            tap_slop_px,
        }
    }

    pub fn mode(&self) -> GestureMode {
        match self.state {
            GestureState::Idle => GestureMode::Idle,
            GestureState::Panning { .. } => GestureMode::Panning,
            GestureState::Pinching { .. } => GestureMode::Pinching,
        }
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn position(&self, id: PointerId) -> Option<Point> {
        self.active.get(&id).copied()
    }

    /// Anchor of the pinch in progress, if one has been seeded.
    pub fn pinch_anchor(&self) -> Option<PinchAnchor> {
        match self.state {
            GestureState::Pinching { anchor } => anchor,
            _ => None,
        }
    }

    /// Forget every contact, e.g. when the content is replaced.
    pub fn clear(&mut self) {
        self.active.clear();
        self.state = GestureState::Idle;
        self.tap = None;
    }

    /// The scale changed outside the pinch (resize, wheel, buttons). Re-seed
    /// the pinch from the new scale and the current finger distance.
    pub fn rebase_pinch(&mut self, current_scale: f64) {
        if let GestureState::Pinching { .. } = self.state {
            self.state = GestureState::Pinching {
                anchor: self.seed_anchor(current_scale),
            };
        }
    }

    pub fn pointer_down(&mut self, id: PointerId, point: Point, current_scale: f64) {
        if let Some(existing) = self.active.get_mut(&id) {
            // Repeated down for a contact we already track: resync its position only.
            *existing = point;
            if let GestureState::Panning { last_point } = &mut self.state {
                *last_point = point;
            }
            return;
        }

        self.active.insert(id, point);

        match self.active.len() {
            1 => {
                self.state = GestureState::Panning { last_point: point };
                self.tap = Some(TapTracking {
                    id,
                    start: point,
                    max_displacement: 0.0,
                });
            }
            _ => {
                // A second contact turns any press into a pinch, never a tap.
                self.tap = None;
                let pair = self.pinch_pair();
                let keep = matches!(
                    self.state,
                    GestureState::Pinching { anchor: Some(anchor) } if Some(anchor.ids) == pair
                );
                if !keep {
                    self.state = GestureState::Pinching {
                        anchor: self.seed_anchor(current_scale),
                    };
                }
            }
        }
    }

    pub fn pointer_move(
        &mut self,
        id: PointerId,
        point: Point,
        current_scale: f64,
    ) -> PointerUpdate {
        let Some(position) = self.active.get_mut(&id) else {
            return PointerUpdate::None;
        };
        *position = point;

        if let Some(tap) = self.tap.as_mut().filter(|tap| tap.id == id) {
            tap.max_displacement = tap.max_displacement.max(tap.start.distance(&point));
        }

        match self.state {
            GestureState::Idle => PointerUpdate::None,
            GestureState::Panning { last_point } => {
                let delta = point - last_point;
                self.state = GestureState::Panning { last_point: point };
                PointerUpdate::Pan {
                    dx: delta.x(),
                    dy: delta.y(),
                }
            }
            GestureState::Pinching { anchor } => {
                let Some((a, b)) = self.pinch_pair() else {
                    return PointerUpdate::None;
                };
                let anchor = match anchor {
                    Some(anchor) if anchor.ids == (a, b) => anchor,
                    _ => {
                        self.state = GestureState::Pinching {
                            anchor: self.seed_anchor(current_scale),
                        };
                        return PointerUpdate::None;
                    }
                };
                if id != a && id != b {
                    return PointerUpdate::None;
                }

                let (pa, pb) = (self.active[&a], self.active[&b]);
                PointerUpdate::Pinch {
                    anchor,
                    distance: pa.distance(&pb),
                    midpoint: pa.midpoint(&pb),
                }
            }
        }
    }

    /// Release a contact. Returns its last position when the press was a tap.
    pub fn pointer_up(&mut self, id: PointerId) -> Option<Point> {
        let released = self.release(id)?;

        let tap = match self.tap {
            Some(tap) if tap.id == id => self.tap.take(),
            _ => None,
        };
        let is_tap = self.active.is_empty()
            && tap.is_some_and(|tap| tap.max_displacement < self.tap_slop_px);

        is_tap.then_some(released)
    }

    /// Abnormal end of contact. Same transitions as `pointer_up`, never a tap.
    pub fn pointer_cancel(&mut self, id: PointerId) {
        if self.release(id).is_some() {
            self.tap = None;
        }
    }

    fn release(&mut self, id: PointerId) -> Option<Point> {
        let released = self.active.remove(&id)?;

        self.state = match self.active.len() {
            0 => GestureState::Idle,
            1 => {
                // Re-seed from the remaining contact so its next move does not jump.
                let last_point = self.active.values().next().copied().unwrap_or(released);
                GestureState::Panning { last_point }
            }
            _ => {
                let anchor = match self.state {
                    GestureState::Pinching { anchor: Some(anchor) }
                        if Some(anchor.ids) == self.pinch_pair() =>
                    {
                        Some(anchor)
                    }
                    _ => None,
                };
                GestureState::Pinching { anchor }
            }
        };

        Some(released)
    }

    /// The two lowest ids define the pinch distance.
    fn pinch_pair(&self) -> Option<(PointerId, PointerId)> {
        let mut ids = self.active.keys().copied();
        Some((ids.next()?, ids.next()?))
    }

    fn seed_anchor(&self, current_scale: f64) -> Option<PinchAnchor> {
        let (a, b) = self.pinch_pair()?;
        let start_distance = self.active[&a].distance(&self.active[&b]);
        (start_distance > MIN_PINCH_DISTANCE).then_some(PinchAnchor {
            ids: (a, b),
            start_distance,
            start_scale: current_scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLOP: f64 = 6.0;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn first_contact_starts_panning() {
        let mut tracker = PointerTracker::new(SLOP);
        assert_eq!(tracker.mode(), GestureMode::Idle);

        tracker.pointer_down(PointerId(1), p(10.0, 10.0), 1.0);

        assert_eq!(tracker.mode(), GestureMode::Panning);
        assert_eq!(tracker.active_count(), 1);
    }

    #[test]
    fn move_while_panning_yields_delta_from_last_point() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(10.0, 10.0), 1.0);

        let first = tracker.pointer_move(PointerId(1), p(25.0, 5.0), 1.0);
        let second = tracker.pointer_move(PointerId(1), p(30.0, 5.0), 1.0);

        assert_eq!(first, PointerUpdate::Pan { dx: 15.0, dy: -5.0 });
        assert_eq!(second, PointerUpdate::Pan { dx: 5.0, dy: 0.0 });
    }

    #[test]
    fn second_contact_seeds_pinch_anchor() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(0.0, 0.0), 0.75);
        tracker.pointer_down(PointerId(2), p(30.0, 40.0), 0.75);

        assert_eq!(tracker.mode(), GestureMode::Pinching);
        let anchor = tracker.pinch_anchor().unwrap();
        assert_eq!(anchor.ids, (PointerId(1), PointerId(2)));
        assert_eq!(anchor.start_distance, 50.0);
        assert_eq!(anchor.start_scale, 0.75);
    }

    #[test]
    fn pinch_move_reports_distance_and_midpoint() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(100.0, 100.0), 1.0);
        tracker.pointer_down(PointerId(2), p(200.0, 100.0), 1.0);

        let update = tracker.pointer_move(PointerId(2), p(300.0, 100.0), 1.0);

        match update {
            PointerUpdate::Pinch {
                anchor,
                distance,
                midpoint,
            } => {
                assert_eq!(anchor.start_distance, 100.0);
                assert_eq!(distance, 200.0);
                assert_eq!(midpoint, p(200.0, 100.0));
            }
            other => panic!("expected pinch update, got {:?}", other),
        }
    }

    #[test]
    fn coincident_fingers_defer_anchor_until_they_separate() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(50.0, 50.0), 1.0);
        tracker.pointer_down(PointerId(2), p(50.0, 50.0), 1.0);
        assert_eq!(tracker.mode(), GestureMode::Pinching);
        assert!(tracker.pinch_anchor().is_none());

        // Still coincident: no-op frame
        assert_eq!(
            tracker.pointer_move(PointerId(1), p(50.0, 50.0), 1.0),
            PointerUpdate::None
        );
        assert!(tracker.pinch_anchor().is_none());

        // First separated frame seeds the anchor but does not zoom yet
        assert_eq!(
            tracker.pointer_move(PointerId(2), p(60.0, 50.0), 2.0),
            PointerUpdate::None
        );
        let anchor = tracker.pinch_anchor().unwrap();
        assert_eq!(anchor.start_distance, 10.0);
        assert_eq!(anchor.start_scale, 2.0);
    }

    #[test]
    fn lifting_one_of_two_fingers_reseeds_pan_point() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(0.0, 0.0), 1.0);
        tracker.pointer_down(PointerId(2), p(100.0, 0.0), 1.0);
        tracker.pointer_move(PointerId(2), p(150.0, 20.0), 1.0);

        assert_eq!(tracker.pointer_up(PointerId(1)), None);
        assert_eq!(tracker.mode(), GestureMode::Panning);

        // Remaining finger moves by (5, 0) from where it actually is
        let update = tracker.pointer_move(PointerId(2), p(155.0, 20.0), 1.0);
        assert_eq!(update, PointerUpdate::Pan { dx: 5.0, dy: 0.0 });
    }

    #[test]
    fn third_finger_does_not_change_the_pinch_pair() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(0.0, 0.0), 1.0);
        tracker.pointer_down(PointerId(2), p(100.0, 0.0), 1.0);
        let before = tracker.pinch_anchor().unwrap();

        tracker.pointer_down(PointerId(3), p(500.0, 500.0), 1.0);
        assert_eq!(tracker.pinch_anchor(), Some(before));
        assert_eq!(
            tracker.pointer_move(PointerId(3), p(510.0, 500.0), 1.0),
            PointerUpdate::None
        );
    }

    #[test]
    fn losing_a_pair_finger_with_three_down_reseeds_on_next_move() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(0.0, 0.0), 1.0);
        tracker.pointer_down(PointerId(2), p(100.0, 0.0), 1.0);
        tracker.pointer_down(PointerId(3), p(100.0, 100.0), 1.0);

        tracker.pointer_up(PointerId(1));
        assert_eq!(tracker.mode(), GestureMode::Pinching);
        assert!(tracker.pinch_anchor().is_none());

        assert_eq!(
            tracker.pointer_move(PointerId(2), p(100.0, 0.0), 1.5),
            PointerUpdate::None
        );
        let anchor = tracker.pinch_anchor().unwrap();
        assert_eq!(anchor.ids, (PointerId(2), PointerId(3)));
        assert_eq!(anchor.start_distance, 100.0);
        assert_eq!(anchor.start_scale, 1.5);
    }

    #[test]
    fn all_contacts_up_returns_to_idle() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(0.0, 0.0), 1.0);
        tracker.pointer_down(PointerId(2), p(10.0, 0.0), 1.0);
        tracker.pointer_up(PointerId(2));
        tracker.pointer_up(PointerId(1));

        assert_eq!(tracker.mode(), GestureMode::Idle);
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn cancel_behaves_like_up_for_transitions() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(0.0, 0.0), 1.0);
        tracker.pointer_down(PointerId(2), p(10.0, 0.0), 1.0);

        tracker.pointer_cancel(PointerId(1));
        assert_eq!(tracker.mode(), GestureMode::Panning);
        tracker.pointer_cancel(PointerId(2));
        assert_eq!(tracker.mode(), GestureMode::Idle);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(0.0, 0.0), 1.0);

        assert_eq!(
            tracker.pointer_move(PointerId(9), p(50.0, 50.0), 1.0),
            PointerUpdate::None
        );
        assert_eq!(tracker.pointer_up(PointerId(9)), None);
        tracker.pointer_cancel(PointerId(9));

        assert_eq!(tracker.mode(), GestureMode::Panning);
        assert_eq!(tracker.active_count(), 1);
    }

    #[test]
    fn duplicate_down_only_moves_the_contact() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(0.0, 0.0), 1.0);
        tracker.pointer_down(PointerId(1), p(40.0, 0.0), 1.0);

        assert_eq!(tracker.mode(), GestureMode::Panning);
        assert_eq!(tracker.active_count(), 1);
        assert_eq!(
            tracker.pointer_move(PointerId(1), p(45.0, 0.0), 1.0),
            PointerUpdate::Pan { dx: 5.0, dy: 0.0 }
        );
    }

    #[test]
    fn still_press_and_release_is_a_tap() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(100.0, 100.0), 1.0);
        tracker.pointer_move(PointerId(1), p(102.0, 101.0), 1.0);

        assert_eq!(tracker.pointer_up(PointerId(1)), Some(p(102.0, 101.0)));
    }

    #[test]
    fn drag_beyond_slop_is_not_a_tap() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(100.0, 100.0), 1.0);
        tracker.pointer_move(PointerId(1), p(140.0, 100.0), 1.0);
        // Returning to the start does not make it a tap again
        tracker.pointer_move(PointerId(1), p(100.0, 100.0), 1.0);

        assert_eq!(tracker.pointer_up(PointerId(1)), None);
    }

    #[test]
    fn pinch_release_is_never_a_tap() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(0.0, 0.0), 1.0);
        tracker.pointer_down(PointerId(2), p(50.0, 0.0), 1.0);

        assert_eq!(tracker.pointer_up(PointerId(2)), None);
        assert_eq!(tracker.pointer_up(PointerId(1)), None);
    }

    #[test]
    fn cancelled_press_is_not_a_tap() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(0.0, 0.0), 1.0);
        tracker.pointer_cancel(PointerId(1));

        tracker.pointer_down(PointerId(2), p(0.0, 0.0), 1.0);
        tracker.pointer_cancel(PointerId(2));
        assert_eq!(tracker.pointer_up(PointerId(2)), None);
    }

    #[test]
    fn rebase_pinch_seeds_from_new_scale() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(0.0, 0.0), 0.5);
        tracker.pointer_down(PointerId(2), p(100.0, 0.0), 0.5);
        tracker.pointer_move(PointerId(2), p(200.0, 0.0), 0.5);

        tracker.rebase_pinch(0.25);

        let anchor = tracker.pinch_anchor().unwrap();
        assert_eq!(anchor.start_scale, 0.25);
        assert_eq!(anchor.start_distance, 200.0);
    }

    #[test]
    fn rebase_pinch_leaves_pan_alone() {
        let mut tracker = PointerTracker::new(SLOP);
        tracker.pointer_down(PointerId(1), p(10.0, 10.0), 1.0);

        tracker.rebase_pinch(2.0);

        assert_eq!(tracker.mode(), GestureMode::Panning);
        assert_eq!(
            tracker.pointer_move(PointerId(1), p(15.0, 10.0), 2.0),
            PointerUpdate::Pan { dx: 5.0, dy: 0.0 }
        );
    }
}
