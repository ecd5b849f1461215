use std::collections::VecDeque;
use std::rc::Rc;

use egui::{Id, Pos2, Rect};

mod animation;
mod debug;
mod error;
mod geometry;
mod gesture;
mod helper;
mod info;
mod options;
mod registry;


pub use animation::{Animatable, AnimationToken, Easing, Tween};
pub use error::DragStartRejected;
pub use gesture::{DragType, GestureDetector, GestureEvent, PointerSample};
pub use helper::{AnimatedDragDropHelper, DragDropHelper, ResetTiming, SimpleDragDropHelper};
pub use info::{DragTargetInfo, SessionRecord};
pub use options::{DragAnimationOptions, DragDropOptions};

pub(crate) use geometry::rect_contains;

use geometry::Attachment;
use registry::Registry;

use crate::drag_target::{DragTargetCallback, Snapshot};
use crate::drop_target::DropTargetCallback;
use crate::payload::AnyDataToDrop;

/// How a drag gesture ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// Released over `zone`. `delivered` is false if the zone lost interest in the payload.
    Dropped { zone: Id, delivered: bool },
    Cancelled,
}

/// The session coordinator: one per drag-drop container.
///
/// Drag targets and drop zones register themselves here (normally through the
/// [`crate::DragTarget`] and [`crate::DropTarget`] widgets, which take `&mut DragDropState`
/// explicitly). Pointer gestures are fed in through [`Self::handle_pointer`] or the individual
/// `on_drag_*` callbacks; the overlay reads the session through [`DragTargetInfo`].
///
/// At most one drag session exists at a time.
pub struct DragDropState {
    options: DragDropOptions,
    helper: Box<dyn DragDropHelper>,
    attachment: Attachment,

    drag_targets: Registry<dyn DragTargetCallback>,
    drop_targets: Registry<dyn DropTargetCallback>,

    /// The target that owns the current session, including its settle animation.
    active_target: Option<Id>,

    gesture: GestureDetector,

    debug_log: VecDeque<String>,
    debug_frame: u64,
}

impl Default for DragDropState {
    fn default() -> Self {
        Self::new(DragDropOptions::default())
    }
}

impl std::fmt::Debug for DragDropState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragDropState")
            .field("options", &self.options)
            .field("record", self.helper.record())
            .field("drag_targets", &self.drag_targets)
            .field("drop_targets", &self.drop_targets)
            .field("active_target", &self.active_target)
            .finish_non_exhaustive()
    }
}

impl DragDropState {
    pub fn new(options: DragDropOptions) -> Self {
        let helper: Box<dyn DragDropHelper> = match options.animation {
            Some(animation) => Box::new(AnimatedDragDropHelper::new(
                options.scale,
                options.alpha,
                options.default_drag_type,
                animation.start,
                animation.end,
            )),
            None => Box::new(SimpleDragDropHelper::new(
                options.scale,
                options.alpha,
                options.default_drag_type,
            )),
        };
        Self::with_helper(options, helper)
    }

    /// Use a custom helper. `options.animation` is ignored; the helper decides.
    pub fn with_helper(options: DragDropOptions, helper: Box<dyn DragDropHelper>) -> Self {
        let gesture = GestureDetector::new(options.long_press_timeout, options.touch_slop);
        Self {
            options,
            helper,
            attachment: Attachment::default(),
            drag_targets: Registry::default(),
            drop_targets: Registry::default(),
            active_target: None,
            gesture,
            debug_log: VecDeque::new(),
            debug_frame: 0,
        }
    }

    pub fn options(&self) -> &DragDropOptions {
        &self.options
    }

    pub fn record(&self) -> &SessionRecord {
        self.helper.record()
    }

    // ------------------------------------------------------------------------
    // Geometry

    /// Record the container's screen rect. All bounds and positions are relative to its `min`.
    pub fn attach(&mut self, container: Rect) {
        self.attachment.attach(container);
    }

    pub fn container_rect(&self) -> Option<Rect> {
        self.attachment.container()
    }

    /// Container-local bounds of a screen-space rect; `Rect::ZERO` until [`Self::attach`] is called.
    pub fn calculate_bound_in_box(&self, rect: Rect, clip_bounds: bool) -> Rect {
        self.attachment.local_bounding_box_of(rect, clip_bounds)
    }

    /// Container-local position of a screen-space point; `Pos2::ZERO` until attached.
    pub fn local_position_of(&self, position: Pos2) -> Pos2 {
        self.attachment.local_position_of(position)
    }

    pub fn screen_position_of(&self, local: Pos2) -> Pos2 {
        self.attachment.screen_position_of(local)
    }

    // ------------------------------------------------------------------------
    // Registration

    pub fn register_drag_target(&mut self, target: Rc<dyn DragTargetCallback>) {
        let id = target.id();
        if self.drag_targets.register(target) {
            log::trace!("drag target registered {id:?}");
        }
    }

    /// Remove a drag target and reset it. Unknown ids are ignored.
    ///
    /// The session itself survives: its payload and snapshot are owned by the record.
    pub fn unregister_drag_target(&mut self, id: Id) {
        if let Some(target) = self.drag_targets.unregister(id) {
            target.on_reset();
            log::trace!("drag target unregistered {id:?}");
        }
    }

    pub fn register_drop_target(&mut self, target: Rc<dyn DropTargetCallback>) {
        let id = target.id();
        if self.drop_targets.register(target) {
            log::trace!("drop target registered {id:?}");
        }
    }

    /// Remove a drop zone and reset it. Unknown ids are ignored.
    pub fn unregister_drop_target(&mut self, id: Id) {
        if let Some(target) = self.drop_targets.unregister(id) {
            target.on_reset();
            log::trace!("drop target unregistered {id:?}");
        }
    }

    pub fn drag_target_count(&self) -> usize {
        self.drag_targets.len()
    }

    pub fn drop_target_count(&self) -> usize {
        self.drop_targets.len()
    }

    // ------------------------------------------------------------------------
    // Gesture callbacks

    /// Pick up the topmost drag target under `position` (container-local).
    ///
    /// # Errors
    /// [`DragStartRejected::NoTarget`] if nothing is under `position`,
    /// [`DragStartRejected::SessionActive`] if another target owns the session.
    pub fn on_drag_start(&mut self, position: Pos2) -> Result<(), DragStartRejected> {
        let hit = self
            .drag_targets
            .iter_topmost_first()
            .find(|target| target.contains(position))
            .cloned();
        let Some(target) = hit else {
            let rejected = DragStartRejected::NoTarget { position };
            self.debug_log_event(format!("drag_start rejected: {rejected}"));
            return Err(rejected);
        };

        let id = target.id();
        if let Some(active) = self.active_target {
            if active != id {
                let rejected = DragStartRejected::SessionActive {
                    active,
                    requested: id,
                };
                self.debug_log_event(format!("drag_start rejected: {rejected}"));
                return Err(rejected);
            }
        }

        self.active_target = Some(id);
        self.helper.handle_drag_start(
            target.data_to_drop(),
            position,
            target.snapshot(),
            target.bound_in_box(),
        );
        target.on_drag_start();

        self.debug_log_event(format!(
            "drag_start target={id:?} payload={} at ({:.1},{:.1})",
            target.data_to_drop().payload_type().name(),
            position.x,
            position.y
        ));
        Ok(())
    }

    /// Move the drag to `position` (container-local) and update which zone is entered.
    pub fn on_drag(&mut self, position: Pos2) {
        self.helper.handle_drag(position);

        let Some(data) = self.helper.record().data_to_drop.clone() else {
            return;
        };

        let last = self.last_in_bound_drop_target();
        let drag_position = self.helper.current_drag_offset();
        let next = self.find_drop_target(drag_position, &data);

        let changed = match (&last, &next) {
            (Some(last), Some(next)) => last.id() != next.id(),
            (None, None) => false,
            _ => true,
        };
        if !changed {
            return;
        }

        // Exit strictly before enter: never two zones in bound at once.
        if let Some(last) = &last {
            last.on_drag_out();
        }
        if let Some(next) = &next {
            next.on_drag_in(&data);
        }

        self.debug_log_event(format!(
            "drop target {:?} -> {:?} at ({:.1},{:.1})",
            last.map(|z| z.id()),
            next.map(|z| z.id()),
            drag_position.x,
            drag_position.y
        ));
    }

    /// Release: drop on the entered zone, or cancel if there is none.
    pub fn on_drag_end(&mut self) -> DragOutcome {
        let data = self.helper.record().data_to_drop.clone();
        let Some(data) = data else {
            self.on_drag_cancel();
            return DragOutcome::Cancelled;
        };
        let zone = self.last_in_bound_drop_target();
        let Some(zone) = zone else {
            self.on_drag_cancel();
            return DragOutcome::Cancelled;
        };

        let delivered = zone.on_drop(&data);
        if let Some(target) = self.active_target.and_then(|id| self.drag_targets.get(id)) {
            target.on_drag_end();
        }
        self.helper.handle_drag_end();
        self.reset();

        let outcome = DragOutcome::Dropped {
            zone: zone.id(),
            delivered,
        };
        self.debug_log_event(format!("drag_end {outcome:?}"));
        outcome
    }

    /// Abort the drag. Targets and zones are reset now, or after the settle animation.
    pub fn on_drag_cancel(&mut self) {
        match self.helper.handle_drag_cancel() {
            ResetTiming::Immediate => {
                self.reset();
                self.debug_log_event("drag_cancel");
            }
            ResetTiming::Deferred => {
                // The record is cleared later, but nothing may stay entered meanwhile.
                for zone in self.drop_targets.snapshot() {
                    zone.on_reset();
                }
                self.debug_log_event("drag_cancel (settling)");
            }
        }
    }

    /// Where the floating snapshot's top-left corner goes, container-local.
    pub fn current_overlay_offset(&self) -> Pos2 {
        self.helper.calculate_target_offset()
    }

    /// The overlay rect in screen coordinates, before scaling.
    pub fn overlay_rect(&self) -> Rect {
        let offset = self.screen_position_of(self.current_overlay_offset());
        Rect::from_min_size(offset, self.drag_target_bound_in_box().size())
    }

    // ------------------------------------------------------------------------
    // Frame loop

    /// Advance animations to `now` (seconds).
    pub fn tick(&mut self, now: f64) {
        if self.helper.tick(now) {
            self.reset();
            self.debug_log_event("settle finished");
        }
    }

    /// Start a frame: attach to `container` (screen rect) and advance animations.
    ///
    /// Every target or zone that is not registered again before [`Self::end_frame`] is dropped.
    pub fn begin_frame(&mut self, container: Rect, now: f64) {
        self.debug_frame = self.debug_frame.wrapping_add(1);
        self.attach(container);
        self.tick(now);
        self.drag_targets.begin_frame();
        self.drop_targets.begin_frame();
    }

    pub fn end_frame(&mut self) {
        for target in self.drag_targets.end_frame() {
            log::trace!("drag target left the frame {:?}", target.id());
            target.on_reset();
        }
        for zone in self.drop_targets.end_frame() {
            log::trace!("drop target left the frame {:?}", zone.id());
            zone.on_reset();
        }
    }

    /// Feed one pointer sample (container-local) through the gesture detector.
    pub fn handle_pointer(&mut self, sample: PointerSample) {
        let drag_type = sample
            .position
            .map(|position| self.drag_type_at(position))
            .unwrap_or(self.options.default_drag_type);

        for event in self.gesture.update(sample, drag_type) {
            match event {
                GestureEvent::DragStart(position) => {
                    if self.on_drag_start(position).is_err() {
                        // A press with nothing to pick up is just not a drag.
                        self.gesture.abort();
                        break;
                    }
                }
                GestureEvent::Drag(position) => self.on_drag(position),
                GestureEvent::DragEnd => {
                    self.on_drag_end();
                }
                GestureEvent::DragCancel => self.on_drag_cancel(),
            }
        }
    }

    /// If a long-press is pending, the time at which it fires.
    pub fn long_press_deadline(&self) -> Option<f64> {
        self.gesture.long_press_deadline()
    }

    /// Gesture type for a press at `position`: the topmost target's override, else the default.
    pub fn drag_type_at(&self, position: Pos2) -> DragType {
        self.drag_targets
            .iter_topmost_first()
            .find(|target| target.contains(position))
            .and_then(|target| target.drag_type())
            .unwrap_or(self.options.default_drag_type)
    }

    /// Hosts should not scroll while this is true, or the drag would fight the scroll.
    pub fn blocks_scrolling(&self) -> bool {
        self.is_active() || self.active_target.is_some() || self.gesture.is_dragging()
    }

    /// Tear down mid-anything: stop animations and return everything to neutral at once.
    pub fn dispose(&mut self) {
        self.helper.dispose();
        self.gesture.abort();
        self.reset();
        for target in self.drag_targets.clear() {
            target.on_reset();
        }
        for zone in self.drop_targets.clear() {
            zone.on_reset();
        }
    }

    // ------------------------------------------------------------------------

    fn last_in_bound_drop_target(&self) -> Option<Rc<dyn DropTargetCallback>> {
        self.drop_targets
            .iter_topmost_first()
            .find(|zone| zone.is_in_bound())
            .cloned()
    }

    fn find_drop_target(
        &self,
        position: Pos2,
        data: &AnyDataToDrop,
    ) -> Option<Rc<dyn DropTargetCallback>> {
        let found = self
            .drop_targets
            .iter_topmost_first()
            .find(|zone| zone.contains(position) && zone.is_interest(data))
            .cloned();
        log::trace!(
            "hit-test ({:.1},{:.1}) -> {:?}",
            position.x,
            position.y,
            found.as_ref().map(|z| z.id())
        );
        found
    }

    fn reset(&mut self) {
        self.active_target = None;
        for target in self.drag_targets.snapshot() {
            target.on_reset();
        }
        for zone in self.drop_targets.snapshot() {
            zone.on_reset();
        }
    }
}

/// Read-only facade over the helper's record.
impl DragTargetInfo for DragDropState {
    fn is_dragging(&self) -> bool {
        self.helper.record().is_dragging()
    }

    fn is_animation_running(&self) -> bool {
        self.helper.record().is_animation_running()
    }

    fn drag_offset(&self) -> Pos2 {
        self.helper.record().drag_offset()
    }

    fn drag_target_snapshot(&self) -> Option<&Snapshot> {
        self.helper.record().drag_target_snapshot()
    }

    fn drag_target_bound_in_box(&self) -> Rect {
        self.helper.record().drag_target_bound_in_box()
    }

    fn data_to_drop(&self) -> Option<&AnyDataToDrop> {
        self.helper.record().data_to_drop()
    }

    fn scale(&self) -> f32 {
        self.helper.record().scale()
    }

    fn alpha(&self) -> f32 {
        self.helper.record().alpha()
    }

    fn drag_type(&self) -> DragType {
        self.helper.record().drag_type()
    }
}
