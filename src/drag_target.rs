use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use egui::{Id, Pos2, Rect, Response, Ui};

use crate::drag_drop::{DragDropState, DragType, rect_contains};
use crate::payload::{AnyDataToDrop, DataToDrop};

/// A replayable picture of a drag target's content.
///
/// The overlay calls it again every frame on its own layer, so it keeps working after the
/// original widget is gone.
#[derive(Clone)]
pub struct Snapshot(Rc<dyn Fn(&mut Ui)>);

impl Snapshot {
    pub fn new(paint: impl Fn(&mut Ui) + 'static) -> Self {
        Self(Rc::new(paint))
    }

    pub fn show(&self, ui: &mut Ui) {
        (self.0)(ui);
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Snapshot")
    }
}

/// What [`DragDropState`] needs from a draggable element.
pub trait DragTargetCallback {
    fn id(&self) -> Id;

    fn data_to_drop(&self) -> AnyDataToDrop;

    /// Container-local bounds.
    fn bound_in_box(&self) -> Rect;

    fn snapshot(&self) -> Option<Snapshot>;

    /// Gesture override for this target; `None` uses the container default.
    fn drag_type(&self) -> Option<DragType> {
        None
    }

    fn contains(&self, position: Pos2) -> bool {
        rect_contains(self.bound_in_box(), position)
    }

    fn on_drag_start(&self);

    fn on_drag_end(&self);

    fn on_reset(&self);
}

struct DragTargetInner {
    id: Id,
    data_to_drop: AnyDataToDrop,
    drag_type: Cell<Option<DragType>>,
    is_dragging: Cell<bool>,
    bound_in_box: Cell<Rect>,
    snapshot: RefCell<Option<Snapshot>>,
}

impl DragTargetCallback for DragTargetInner {
    fn id(&self) -> Id {
        self.id
    }

    fn data_to_drop(&self) -> AnyDataToDrop {
        self.data_to_drop.clone()
    }

    fn bound_in_box(&self) -> Rect {
        self.bound_in_box.get()
    }

    fn snapshot(&self) -> Option<Snapshot> {
        self.snapshot.borrow().clone()
    }

    fn drag_type(&self) -> Option<DragType> {
        self.drag_type.get()
    }

    fn on_drag_start(&self) {
        self.is_dragging.set(true);
    }

    fn on_drag_end(&self) {
        self.is_dragging.set(false);
    }

    fn on_reset(&self) {
        self.is_dragging.set(false);
    }
}

/// Per-element state of something that can be dragged.
///
/// Keep it alive across frames (in your app state) and hand it to [`DragTarget`] every frame.
/// Clones share the same state.
pub struct DragTargetState<T> {
    inner: Rc<DragTargetInner>,
    _payload: PhantomData<fn() -> T>,
}

impl<T> Clone for DragTargetState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            _payload: PhantomData,
        }
    }
}

impl<T: 'static> DragTargetState<T> {
    pub fn new(id: Id, data_to_drop: DataToDrop<T>) -> Self {
        Self {
            inner: Rc::new(DragTargetInner {
                id,
                data_to_drop: data_to_drop.erased(),
                drag_type: Cell::new(None),
                is_dragging: Cell::new(false),
                bound_in_box: Cell::new(Rect::ZERO),
                snapshot: RefCell::new(None),
            }),
            _payload: PhantomData,
        }
    }

    pub fn from_value(id: Id, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(id, DataToDrop::from_value(value))
    }

    /// Pick this target up with `drag_type` instead of the container default.
    pub fn with_drag_type(self, drag_type: DragType) -> Self {
        self.inner.drag_type.set(Some(drag_type));
        self
    }
}

impl<T> DragTargetState<T> {
    pub fn id(&self) -> Id {
        self.inner.id
    }

    pub fn is_dragging(&self) -> bool {
        self.inner.is_dragging.get()
    }

    pub fn bound_in_box(&self) -> Rect {
        self.inner.bound_in_box.get()
    }

    pub fn set_bound_in_box(&self, bound_in_box: Rect) {
        self.inner.bound_in_box.set(bound_in_box);
    }

    pub fn set_snapshot(&self, snapshot: Option<Snapshot>) {
        *self.inner.snapshot.borrow_mut() = snapshot;
    }

    pub fn data_to_drop(&self) -> AnyDataToDrop {
        self.inner.data_to_drop.clone()
    }

    /// The handle [`DragDropState`] keeps in its registry.
    pub fn callback(&self) -> Rc<dyn DragTargetCallback> {
        self.inner.clone()
    }
}

impl<T> fmt::Debug for DragTargetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragTargetState")
            .field("id", &self.inner.id)
            .field("data_to_drop", &self.inner.data_to_drop)
            .field("is_dragging", &self.inner.is_dragging.get())
            .field("bound_in_box", &self.inner.bound_in_box.get())
            .finish()
    }
}

/// Shows some content and makes it draggable inside a [`crate::DragDropBox`].
#[must_use = "You should call .show()"]
pub struct DragTarget<'a, T> {
    state: &'a DragTargetState<T>,
    enabled: bool,
    hidden_while_dragging: bool,
}

impl<'a, T: 'static> DragTarget<'a, T> {
    pub fn new(state: &'a DragTargetState<T>) -> Self {
        Self {
            state,
            enabled: true,
            hidden_while_dragging: false,
        }
    }

    /// A disabled target is still shown but can't be picked up.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Leave a hole (keep the layout, skip painting) while the overlay carries the content.
    pub fn hidden_while_dragging(mut self, hidden: bool) -> Self {
        self.hidden_while_dragging = hidden;
        self
    }

    /// `content` paints the target in place and is kept as the overlay [`Snapshot`].
    pub fn show(
        self,
        ui: &mut Ui,
        drag_drop: &mut DragDropState,
        content: impl Fn(&mut Ui) + 'static,
    ) -> Response {
        let Self {
            state,
            enabled,
            hidden_while_dragging,
        } = self;

        let snapshot = Snapshot::new(content);
        let response = ui
            .scope(|ui| {
                if enabled && hidden_while_dragging && state.is_dragging() {
                    ui.set_invisible();
                }
                snapshot.show(ui);
            })
            .response;

        if !enabled {
            drag_drop.unregister_drag_target(state.id());
            return response;
        }

        state.set_bound_in_box(drag_drop.calculate_bound_in_box(response.rect, false));
        state.set_snapshot(Some(snapshot));
        drag_drop.register_drag_target(state.callback());
        response
    }
}
