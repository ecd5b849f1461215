use egui::{Pos2, Rect};

use super::gesture::DragType;
use crate::drag_target::Snapshot;
use crate::payload::AnyDataToDrop;

/// Read-only view of the in-flight drag, as seen by overlays and hosts.
pub trait DragTargetInfo {
    fn is_dragging(&self) -> bool;

    /// A pick-up or settle animation is still moving the overlay.
    fn is_animation_running(&self) -> bool;

    /// Should the overlay be painted?
    fn is_active(&self) -> bool {
        self.is_dragging() || self.is_animation_running()
    }

    /// Current pointer position, in container-local coordinates.
    fn drag_offset(&self) -> Pos2;

    fn drag_target_snapshot(&self) -> Option<&Snapshot>;

    /// Bounds of the target the drag started from, in container-local coordinates.
    fn drag_target_bound_in_box(&self) -> Rect;

    fn data_to_drop(&self) -> Option<&AnyDataToDrop>;

    /// Uniform scale of the floating snapshot.
    fn scale(&self) -> f32;

    fn alpha(&self) -> f32;

    fn drag_type(&self) -> DragType;
}

/// The single mutable record of the active drag, owned by a helper.
#[derive(Clone, Debug)]
pub struct SessionRecord {
    pub(super) is_dragging: bool,
    pub(super) is_animation_running: bool,
    pub(super) drag_offset: Pos2,
    pub(super) drag_target_bound_in_box: Rect,
    pub(super) drag_target_snapshot: Option<Snapshot>,
    pub(super) data_to_drop: Option<AnyDataToDrop>,

    scale: f32,
    alpha: f32,
    drag_type: DragType,

    /// Pick-up progress for the animated variant; `None` for the simple one.
    pub(super) animated_value: Option<f32>,
}

impl SessionRecord {
    pub(super) fn new(scale: f32, alpha: f32, drag_type: DragType) -> Self {
        Self {
            is_dragging: false,
            is_animation_running: false,
            drag_offset: Pos2::ZERO,
            drag_target_bound_in_box: Rect::ZERO,
            drag_target_snapshot: None,
            data_to_drop: None,
            scale,
            alpha,
            drag_type,
            animated_value: None,
        }
    }

    pub(super) fn new_animated(scale: f32, alpha: f32, drag_type: DragType) -> Self {
        Self {
            animated_value: Some(0.0),
            ..Self::new(scale, alpha, drag_type)
        }
    }

    /// Seed every session field at once.
    pub(super) fn begin(
        &mut self,
        data_to_drop: AnyDataToDrop,
        drag_start_offset: Pos2,
        snapshot: Option<Snapshot>,
        bound_in_box: Rect,
    ) {
        self.is_dragging = true;
        self.drag_offset = drag_start_offset;
        self.data_to_drop = Some(data_to_drop);
        self.drag_target_snapshot = snapshot;
        self.drag_target_bound_in_box = bound_in_box;
    }

    /// Clear every session field at once, keeping the configuration.
    pub(super) fn reset(&mut self) {
        self.is_dragging = false;
        self.is_animation_running = false;
        self.drag_offset = Pos2::ZERO;
        self.drag_target_bound_in_box = Rect::ZERO;
        self.drag_target_snapshot = None;
        self.data_to_drop = None;
        if let Some(value) = &mut self.animated_value {
            *value = 0.0;
        }
    }

    fn blend(&self, configured: f32) -> f32 {
        match self.animated_value {
            Some(value) => 1.0 + value * (configured - 1.0),
            None => configured,
        }
    }
}

impl DragTargetInfo for SessionRecord {
    fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    fn is_animation_running(&self) -> bool {
        self.is_animation_running
    }

    fn drag_offset(&self) -> Pos2 {
        self.drag_offset
    }

    fn drag_target_snapshot(&self) -> Option<&Snapshot> {
        self.drag_target_snapshot.as_ref()
    }

    fn drag_target_bound_in_box(&self) -> Rect {
        self.drag_target_bound_in_box
    }

    fn data_to_drop(&self) -> Option<&AnyDataToDrop> {
        self.data_to_drop.as_ref()
    }

    fn scale(&self) -> f32 {
        self.blend(self.scale)
    }

    fn alpha(&self) -> f32 {
        self.blend(self.alpha)
    }

    fn drag_type(&self) -> DragType {
        self.drag_type
    }
}
