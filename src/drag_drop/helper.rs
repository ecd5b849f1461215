use egui::{Pos2, Rect};

use super::animation::{Animatable, AnimationToken, Tween};
use super::gesture::DragType;
use super::info::{DragTargetInfo as _, SessionRecord};
use crate::drag_target::Snapshot;
use crate::payload::AnyDataToDrop;

/// When the coordinator should reset its drag targets and drop zones after a cancel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetTiming {
    Immediate,
    /// A return animation is running; [`DragDropHelper::tick`] reports when it settles.
    Deferred,
}

/// Owns the session record and the optional pick-up/settle animation.
///
/// Hit-testing lives in [`super::DragDropState`]; helpers only mutate the record.
pub trait DragDropHelper {
    fn record(&self) -> &SessionRecord;

    fn handle_drag_start(
        &mut self,
        data_to_drop: AnyDataToDrop,
        drag_start_offset: Pos2,
        snapshot: Option<Snapshot>,
        bound_in_box: Rect,
    );

    fn handle_drag(&mut self, drag_offset: Pos2);

    fn handle_drag_end(&mut self);

    fn handle_drag_cancel(&mut self) -> ResetTiming;

    /// Advance animations to `now` (seconds). Returns `true` when a deferred reset just completed.
    fn tick(&mut self, now: f64) -> bool;

    /// Where the overlay's top-left corner goes, in container-local coordinates.
    fn calculate_target_offset(&self) -> Pos2;

    fn current_drag_offset(&self) -> Pos2 {
        self.record().drag_offset
    }

    /// Stop everything and clear the record, e.g. when the host goes away mid-animation.
    fn dispose(&mut self);
}

/// Pointer position minus half the dragged content's size.
fn centered_offset(record: &SessionRecord) -> Pos2 {
    record.drag_offset - record.drag_target_bound_in_box.size() / 2.0
}

#[derive(Debug)]
pub struct SimpleDragDropHelper {
    record: SessionRecord,
}

impl SimpleDragDropHelper {
    pub fn new(scale: f32, alpha: f32, drag_type: DragType) -> Self {
        Self {
            record: SessionRecord::new(scale, alpha, drag_type),
        }
    }
}

impl DragDropHelper for SimpleDragDropHelper {
    fn record(&self) -> &SessionRecord {
        &self.record
    }

    fn handle_drag_start(
        &mut self,
        data_to_drop: AnyDataToDrop,
        drag_start_offset: Pos2,
        snapshot: Option<Snapshot>,
        bound_in_box: Rect,
    ) {
        self.record
            .begin(data_to_drop, drag_start_offset, snapshot, bound_in_box);
    }

    fn handle_drag(&mut self, drag_offset: Pos2) {
        self.record.drag_offset = drag_offset;
    }

    fn handle_drag_end(&mut self) {
        self.record.reset();
    }

    fn handle_drag_cancel(&mut self) -> ResetTiming {
        self.record.reset();
        ResetTiming::Immediate
    }

    fn tick(&mut self, _now: f64) -> bool {
        false
    }

    fn calculate_target_offset(&self) -> Pos2 {
        centered_offset(&self.record)
    }

    fn dispose(&mut self) {
        self.record.reset();
    }
}

/// Animates the snapshot out of its origin on pick-up and back into it on cancel.
#[derive(Debug)]
pub struct AnimatedDragDropHelper {
    record: SessionRecord,
    animatable: Animatable,
    start_spec: Tween,
    end_spec: Tween,

    /// The return run whose completion clears the record.
    pending_reset: Option<AnimationToken>,
}

impl AnimatedDragDropHelper {
    pub fn new(
        scale: f32,
        alpha: f32,
        drag_type: DragType,
        start_spec: Tween,
        end_spec: Tween,
    ) -> Self {
        Self {
            record: SessionRecord::new_animated(scale, alpha, drag_type),
            animatable: Animatable::new(0.0),
            start_spec,
            end_spec,
            pending_reset: None,
        }
    }

    pub fn animated_value(&self) -> f32 {
        self.animatable.value()
    }

    fn sync_record(&mut self) {
        self.record.animated_value = Some(self.animatable.value());
        self.record.is_animation_running = self.animatable.is_running();
    }
}

impl DragDropHelper for AnimatedDragDropHelper {
    fn record(&self) -> &SessionRecord {
        &self.record
    }

    fn handle_drag_start(
        &mut self,
        data_to_drop: AnyDataToDrop,
        drag_start_offset: Pos2,
        snapshot: Option<Snapshot>,
        bound_in_box: Rect,
    ) {
        // Picking the same target up again mid-return: stop where the overlay is, don't snap.
        self.animatable.stop();
        self.pending_reset = None;
        self.record
            .begin(data_to_drop, drag_start_offset, snapshot, bound_in_box);
        self.animatable.animate_to(1.0, self.start_spec);
        self.sync_record();
    }

    fn handle_drag(&mut self, drag_offset: Pos2) {
        self.record.drag_offset = drag_offset;
    }

    fn handle_drag_end(&mut self) {
        self.animatable.snap_to(0.0);
        self.pending_reset = None;
        self.record.reset();
        self.sync_record();
    }

    fn handle_drag_cancel(&mut self) -> ResetTiming {
        if !self.record.is_dragging() && !self.animatable.is_running() {
            self.pending_reset = None;
            self.animatable.snap_to(0.0);
            self.record.reset();
            self.sync_record();
            return ResetTiming::Immediate;
        }

        if self.pending_reset.is_some() && self.animatable.is_running() {
            // Already settling; a second cancel must not restart the return.
            return ResetTiming::Deferred;
        }

        self.pending_reset = Some(self.animatable.animate_to(0.0, self.end_spec));
        self.sync_record();
        ResetTiming::Deferred
    }

    fn tick(&mut self, now: f64) -> bool {
        let finished = self.animatable.tick(now);
        self.sync_record();

        match (finished, self.pending_reset) {
            (Some(finished), Some(pending)) if finished == pending => {
                self.pending_reset = None;
                self.record.reset();
                self.sync_record();
                true
            }
            _ => false,
        }
    }

    fn calculate_target_offset(&self) -> Pos2 {
        let centered = centered_offset(&self.record);
        if !self.animatable.is_running() {
            return centered;
        }

        let origin = self.record.drag_target_bound_in_box.min;
        origin + (centered - origin) * self.animatable.value()
    }

    fn dispose(&mut self) {
        self.animatable.snap_to(0.0);
        self.pending_reset = None;
        self.record.reset();
        self.sync_record();
    }
}
