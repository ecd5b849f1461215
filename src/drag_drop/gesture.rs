use egui::Pos2;

/// How a drag is recognized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DragType {
    /// Press and hold without moving, then drag.
    #[default]
    LongPress,

    /// Drag as soon as the pointer moves past the touch slop.
    Immediate,
}

/// One frame's worth of primary-pointer input, in container-local coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub position: Option<Pos2>,

    /// The primary button is held and the press started inside the container.
    pub down: bool,

    /// Seconds, same clock as the animations.
    pub time: f64,

    /// The user asked to abort the drag (e.g. Escape).
    pub cancel: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    DragStart(Pos2),
    Drag(Pos2),
    DragEnd,
    DragCancel,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Phase {
    #[default]
    Idle,
    Pressed {
        origin: Pos2,
        at: f64,
        drag_type: DragType,
    },
    Dragging {
        last: Pos2,
    },
    /// Wait for the button to be released; this press will never become a drag.
    Ignored,
}

/// Turns [`PointerSample`]s into drag gestures.
#[derive(Clone, Debug)]
pub struct GestureDetector {
    long_press_timeout: f64,
    touch_slop: f32,
    phase: Phase,
}

impl GestureDetector {
    pub fn new(long_press_timeout: f64, touch_slop: f32) -> Self {
        Self {
            long_press_timeout,
            touch_slop,
            phase: Phase::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// When will an undecided long-press fire, if one is pending?
    pub fn long_press_deadline(&self) -> Option<f64> {
        match self.phase {
            Phase::Pressed {
                at,
                drag_type: DragType::LongPress,
                ..
            } => Some(at + self.long_press_timeout),
            _ => None,
        }
    }

    /// Ignore the rest of the current press.
    pub fn abort(&mut self) {
        if self.phase != Phase::Idle {
            self.phase = Phase::Ignored;
        }
    }

    /// Feed one sample. `drag_type` is only consulted when a new press begins.
    pub fn update(&mut self, sample: PointerSample, drag_type: DragType) -> Vec<GestureEvent> {
        let mut events = Vec::new();

        match self.phase {
            Phase::Idle => {
                let Some(origin) = sample.position.filter(|_| sample.down && !sample.cancel)
                else {
                    return events;
                };
                self.phase = Phase::Pressed {
                    origin,
                    at: sample.time,
                    drag_type,
                };
                // A zero-timeout long-press can decide on the same frame.
                self.update_pressed(sample, &mut events);
            }
            Phase::Pressed { .. } => self.update_pressed(sample, &mut events),
            Phase::Dragging { last } => {
                if sample.cancel {
                    // The press that carried the cancelled drag can't start another one.
                    self.phase = if sample.down {
                        Phase::Ignored
                    } else {
                        Phase::Idle
                    };
                    events.push(GestureEvent::DragCancel);
                } else if !sample.down {
                    self.phase = Phase::Idle;
                    events.push(GestureEvent::DragEnd);
                } else if let Some(position) = sample.position {
                    if position != last {
                        self.phase = Phase::Dragging { last: position };
                        events.push(GestureEvent::Drag(position));
                    }
                }
            }
            Phase::Ignored => {
                if !sample.down {
                    self.phase = Phase::Idle;
                }
            }
        }

        events
    }

    fn update_pressed(&mut self, sample: PointerSample, events: &mut Vec<GestureEvent>) {
        let Phase::Pressed {
            origin,
            at,
            drag_type,
        } = self.phase
        else {
            return;
        };

        if !sample.down {
            // A tap.
            self.phase = Phase::Idle;
            return;
        }
        if sample.cancel {
            self.phase = Phase::Ignored;
            return;
        }

        let position = sample.position.unwrap_or(origin);
        let moved_past_slop = position.distance(origin) > self.touch_slop;

        match drag_type {
            DragType::Immediate => {
                if moved_past_slop {
                    self.phase = Phase::Dragging { last: position };
                    events.push(GestureEvent::DragStart(origin));
                    events.push(GestureEvent::Drag(position));
                }
            }
            DragType::LongPress => {
                if moved_past_slop {
                    self.phase = Phase::Ignored;
                } else if sample.time - at >= self.long_press_timeout {
                    self.phase = Phase::Dragging { last: origin };
                    events.push(GestureEvent::DragStart(origin));
                    if position != origin {
                        self.phase = Phase::Dragging { last: position };
                        events.push(GestureEvent::Drag(position));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f32, y: f32, down: bool, time: f64) -> PointerSample {
        PointerSample {
            position: Some(Pos2::new(x, y)),
            down,
            time,
            cancel: false,
        }
    }

    #[test]
    fn immediate_starts_after_slop_at_press_origin() {
        let mut detector = GestureDetector::new(0.5, 8.0);

        assert!(detector.update(sample(10.0, 10.0, true, 0.0), DragType::Immediate).is_empty());
        assert!(detector.update(sample(14.0, 10.0, true, 0.1), DragType::Immediate).is_empty());
        assert_eq!(
            detector.update(sample(30.0, 10.0, true, 0.2), DragType::Immediate),
            vec![
                GestureEvent::DragStart(Pos2::new(10.0, 10.0)),
                GestureEvent::Drag(Pos2::new(30.0, 10.0)),
            ]
        );
        assert!(detector.is_dragging());
        assert_eq!(
            detector.update(sample(40.0, 10.0, true, 0.3), DragType::Immediate),
            vec![GestureEvent::Drag(Pos2::new(40.0, 10.0))]
        );
        assert_eq!(
            detector.update(sample(40.0, 10.0, false, 0.4), DragType::Immediate),
            vec![GestureEvent::DragEnd]
        );
        assert!(!detector.is_dragging());
    }

    #[test]
    fn long_press_waits_for_timeout() {
        let mut detector = GestureDetector::new(0.5, 8.0);

        assert!(detector.update(sample(10.0, 10.0, true, 1.0), DragType::LongPress).is_empty());
        assert_eq!(detector.long_press_deadline(), Some(1.5));
        assert!(detector.update(sample(12.0, 10.0, true, 1.2), DragType::LongPress).is_empty());
        assert_eq!(
            detector.update(sample(12.0, 10.0, true, 1.5), DragType::LongPress),
            vec![
                GestureEvent::DragStart(Pos2::new(10.0, 10.0)),
                GestureEvent::Drag(Pos2::new(12.0, 10.0)),
            ]
        );
        assert_eq!(detector.long_press_deadline(), None);
    }

    #[test]
    fn moving_before_long_press_abandons_the_gesture() {
        let mut detector = GestureDetector::new(0.5, 8.0);

        detector.update(sample(10.0, 10.0, true, 0.0), DragType::LongPress);
        assert!(detector.update(sample(40.0, 10.0, true, 0.1), DragType::LongPress).is_empty());
        assert!(detector.update(sample(40.0, 10.0, true, 1.0), DragType::LongPress).is_empty());
        assert!(detector.update(sample(40.0, 10.0, false, 1.1), DragType::LongPress).is_empty());

        // The next press is judged afresh.
        detector.update(sample(40.0, 10.0, true, 2.0), DragType::LongPress);
        assert_eq!(
            detector.update(sample(40.0, 10.0, true, 2.5), DragType::LongPress),
            vec![GestureEvent::DragStart(Pos2::new(40.0, 10.0))]
        );
    }

    #[test]
    fn cancel_request_cancels_an_active_drag() {
        let mut detector = GestureDetector::new(0.0, 8.0);
        assert_eq!(
            detector.update(sample(10.0, 10.0, true, 0.0), DragType::LongPress),
            vec![GestureEvent::DragStart(Pos2::new(10.0, 10.0))]
        );

        let cancel = PointerSample {
            cancel: true,
            ..sample(10.0, 10.0, true, 0.1)
        };
        assert_eq!(
            detector.update(cancel, DragType::LongPress),
            vec![GestureEvent::DragCancel]
        );
        // Still held: the press was consumed by the cancelled drag.
        assert!(detector.update(sample(10.0, 10.0, true, 0.2), DragType::LongPress).is_empty());
        assert!(detector.update(sample(10.0, 10.0, false, 0.3), DragType::LongPress).is_empty());
        assert_eq!(
            detector.update(sample(10.0, 10.0, true, 0.4), DragType::LongPress),
            vec![GestureEvent::DragStart(Pos2::new(10.0, 10.0))]
        );
    }

    #[test]
    fn aborted_press_is_ignored_until_release() {
        let mut detector = GestureDetector::new(0.5, 8.0);
        detector.update(sample(10.0, 10.0, true, 0.0), DragType::Immediate);
        detector.abort();

        assert!(detector.update(sample(50.0, 10.0, true, 0.1), DragType::Immediate).is_empty());
        assert!(detector.update(sample(50.0, 10.0, false, 0.2), DragType::Immediate).is_empty());
        assert!(!detector.is_dragging());
    }
}
