use super::animation::{Easing, Tween};
use super::gesture::DragType;

/// Options for [`super::DragDropState`].
///
/// Fixed for the lifetime of a state; build a new state to change them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DragDropOptions {
    /// Uniform scale of the floating snapshot while dragging.
    pub scale: f32,

    /// Opacity of the floating snapshot while dragging.
    pub alpha: f32,

    /// Gesture used by drag targets that don't pick their own.
    pub default_drag_type: DragType,

    /// If set, the snapshot animates out of its origin on pick-up and back into it on cancel.
    pub animation: Option<DragAnimationOptions>,

    /// Seconds a press must be held (without moving past `touch_slop`) to start a long-press drag.
    pub long_press_timeout: f64,

    /// Pointer distance (in points) that separates a press from a drag.
    pub touch_slop: f32,

    /// If true, record session events in a small ring buffer (see `DragDropState::debug_log`).
    pub debug_event_log: bool,

    /// Maximum number of debug log lines to keep (ring buffer).
    pub debug_event_log_capacity: usize,
}

impl Default for DragDropOptions {
    fn default() -> Self {
        Self {
            scale: 1.2,
            alpha: 0.9,
            default_drag_type: DragType::LongPress,
            animation: None,
            long_press_timeout: 0.5,
            touch_slop: 8.0,
            debug_event_log: false,
            debug_event_log_capacity: 200,
        }
    }
}

impl DragDropOptions {
    pub fn animated() -> Self {
        Self {
            animation: Some(DragAnimationOptions::default()),
            ..Default::default()
        }
    }
}

/// Pick-up and settle animation specs.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DragAnimationOptions {
    /// Pick-up: origin → pointer, identity → `scale`/`alpha`.
    pub start: Tween,

    /// Return to the origin after a cancel.
    pub end: Tween,
}

impl Default for DragAnimationOptions {
    fn default() -> Self {
        Self {
            start: Tween::default(),
            end: Tween::new(0.4).with_easing(Easing::CubicOut),
        }
    }
}
