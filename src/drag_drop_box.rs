use std::time::Duration;

use egui::emath::TSTransform;
use egui::{Area, InnerResponse, Key, Order, Rect, Ui, UiBuilder};

use crate::drag_drop::{DragDropState, DragTargetInfo as _, PointerSample};

/// The container that drag targets and drop zones live in.
///
/// Each frame it attaches the state to the available rect, lets `add_contents` lay out (and
/// register) the targets, feeds the pointer into the gesture detector and paints the floating
/// snapshot on top.
///
/// ```no_run
/// # fn demo(ui: &mut egui::Ui, state: &mut egui_dragdrop::DragDropState,
/// #         steak: &egui_dragdrop::DragTargetState<String>,
/// #         cat: &egui_dragdrop::DropTargetState<String>) {
/// egui_dragdrop::DragDropBox::new(state).show(ui, |ui, state| {
///     egui_dragdrop::DragTarget::new(steak).show(ui, state, |ui| {
///         ui.label("steak");
///     });
///     egui_dragdrop::DropTarget::new(cat).show(ui, state, |ui, _state, hovered, _| {
///         ui.label(if hovered { "cat (hungry)" } else { "cat" });
///     });
/// });
/// # }
/// ```
#[must_use = "You should call .show()"]
pub struct DragDropBox<'a> {
    state: &'a mut DragDropState,
    paint_overlay: bool,
}

impl<'a> DragDropBox<'a> {
    pub fn new(state: &'a mut DragDropState) -> Self {
        Self {
            state,
            paint_overlay: true,
        }
    }

    /// Set to `false` to paint the overlay yourself with [`DragDropOverlay::paint`].
    pub fn paint_overlay(mut self, paint_overlay: bool) -> Self {
        self.paint_overlay = paint_overlay;
        self
    }

    pub fn show<R>(
        self,
        ui: &mut Ui,
        add_contents: impl FnOnce(&mut Ui, &mut DragDropState) -> R,
    ) -> InnerResponse<R> {
        let Self {
            state,
            paint_overlay,
        } = self;

        let container = ui.available_rect_before_wrap();
        let now = ui.input(|i| i.time);
        state.begin_frame(container, now);

        let inner = ui.scope_builder(UiBuilder::new().max_rect(container), |ui| {
            add_contents(ui, state)
        });

        let sample = pointer_sample(ui, state, container);
        state.handle_pointer(sample);
        state.end_frame();

        if paint_overlay {
            DragDropOverlay::paint(ui, state);
        }

        if state.is_active() {
            ui.ctx().request_repaint();
        } else if let Some(deadline) = state.long_press_deadline() {
            ui.ctx().request_repaint_after(long_press_wakeup(deadline - now));
        }

        inner
    }
}

/// Longest timed repaint requested while waiting for a long-press.
///
/// A huge or infinite `long_press_timeout` effectively disables long-press; we still wake up
/// now and then instead of overflowing `Duration`.
const MAX_LONG_PRESS_WAKEUP: Duration = Duration::from_secs(60);

fn long_press_wakeup(remaining_secs: f64) -> Duration {
    Duration::try_from_secs_f64(remaining_secs.max(0.0))
        .unwrap_or(Duration::MAX)
        .min(MAX_LONG_PRESS_WAKEUP)
}

fn pointer_sample(ui: &Ui, state: &DragDropState, container: Rect) -> PointerSample {
    ui.input(|i| {
        let pressed_inside = i
            .pointer
            .press_origin()
            .is_some_and(|origin| container.contains(origin));
        PointerSample {
            position: i
                .pointer
                .latest_pos()
                .map(|pos| state.local_position_of(pos)),
            down: i.pointer.primary_down() && pressed_inside,
            time: i.time,
            cancel: i.key_pressed(Key::Escape),
        }
    })
}

/// Paints the floating snapshot of the in-flight drag.
pub struct DragDropOverlay;

impl DragDropOverlay {
    /// Replay the snapshot in a non-interactive tooltip area, at the overlay offset, scaled about
    /// its centre.
    pub fn paint(ui: &Ui, state: &DragDropState) {
        if !state.is_active() {
            return;
        }
        let Some(snapshot) = state.drag_target_snapshot() else {
            return;
        };

        let bound = state.drag_target_bound_in_box();
        let source = Rect::from_min_size(state.screen_position_of(bound.min), bound.size());
        let target = state.overlay_rect();

        let alpha = state.alpha();
        let overlay = Area::new(ui.id().with("drag_drop_overlay"))
            .order(Order::Tooltip)
            .fixed_pos(source.min)
            .constrain(false)
            .interactable(false)
            .show(ui.ctx(), |ui| {
                ui.set_max_size(source.size());
                ui.multiply_opacity(alpha);
                snapshot.show(ui);
            });

        let transform = TSTransform::from_translation(target.center().to_vec2())
            * TSTransform::from_scaling(state.scale())
            * TSTransform::from_translation(-source.center().to_vec2());
        ui.ctx()
            .transform_layer_shapes(overlay.response.layer_id, transform);
    }
}
