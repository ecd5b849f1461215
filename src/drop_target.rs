use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use egui::{Id, InnerResponse, Pos2, Rect, Ui};

use crate::drag_drop::{DragDropState, rect_contains};
use crate::payload::{AnyDataToDrop, PayloadType};

/// What [`DragDropState`] needs from a drop zone.
pub trait DropTargetCallback {
    fn id(&self) -> Id;

    /// Container-local bounds.
    fn bound_in_box(&self) -> Rect;

    /// A payload is hovering over this zone.
    fn is_in_bound(&self) -> bool;

    fn contains(&self, position: Pos2) -> bool {
        rect_contains(self.bound_in_box(), position)
    }

    /// Would this zone accept `data`?
    fn is_interest(&self, data: &AnyDataToDrop) -> bool;

    fn on_drag_in(&self, data: &AnyDataToDrop);

    fn on_drag_out(&self);

    /// Returns `false` if the drop was ignored (not in bound, or no longer interested).
    fn on_drop(&self, data: &AnyDataToDrop) -> bool;

    fn on_reset(&self);
}

type OnDrop<T> = Box<dyn FnMut(Option<T>)>;

struct DropTargetInner<T> {
    id: Id,
    accepts: PayloadType,
    bound_in_box: Cell<Rect>,
    is_in_bound: Cell<bool>,
    hovered: RefCell<Option<T>>,
    on_drop: RefCell<Option<OnDrop<T>>>,
}

impl<T: 'static> DropTargetInner<T> {
    fn clear(&self) {
        self.is_in_bound.set(false);
        *self.hovered.borrow_mut() = None;
    }
}

impl<T: 'static> DropTargetCallback for DropTargetInner<T> {
    fn id(&self) -> Id {
        self.id
    }

    fn bound_in_box(&self) -> Rect {
        self.bound_in_box.get()
    }

    fn is_in_bound(&self) -> bool {
        self.is_in_bound.get()
    }

    fn is_interest(&self, data: &AnyDataToDrop) -> bool {
        data.is_assignable_to(self.accepts)
    }

    fn on_drag_in(&self, data: &AnyDataToDrop) {
        self.is_in_bound.set(true);
        *self.hovered.borrow_mut() = data.data_as::<T>();
    }

    fn on_drag_out(&self) {
        self.clear();
    }

    fn on_drop(&self, data: &AnyDataToDrop) -> bool {
        if !self.is_in_bound() || !self.is_interest(data) {
            log::debug!(
                "drop on {:?} ignored: in_bound={} payload={}",
                self.id,
                self.is_in_bound(),
                data.payload_type().name()
            );
            return false;
        }

        let value = data.data_as::<T>();
        let Ok(mut on_drop) = self.on_drop.try_borrow_mut() else {
            log::warn!("re-entrant drop on {:?} ignored", self.id);
            return false;
        };
        if let Some(on_drop) = on_drop.as_mut() {
            on_drop(value);
        }
        true
    }

    fn on_reset(&self) {
        self.clear();
    }
}

/// Per-element state of a zone that accepts payloads of type `T`.
///
/// Payloads are accepted if they are a `T`, or were made acceptable as one with
/// [`crate::DataToDrop::accepting_as`]. Clones share the same state.
pub struct DropTargetState<T> {
    inner: Rc<DropTargetInner<T>>,
}

impl<T> Clone for DropTargetState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> DropTargetState<T> {
    pub fn new(id: Id, on_drop: impl FnMut(Option<T>) + 'static) -> Self {
        Self::with_on_drop(id, Some(Box::new(on_drop)))
    }

    /// A zone that only reports hovering; drops are accepted but go nowhere.
    pub fn without_callback(id: Id) -> Self {
        Self::with_on_drop(id, None)
    }

    fn with_on_drop(id: Id, on_drop: Option<OnDrop<T>>) -> Self {
        Self {
            inner: Rc::new(DropTargetInner {
                id,
                accepts: PayloadType::of::<T>(),
                bound_in_box: Cell::new(Rect::ZERO),
                is_in_bound: Cell::new(false),
                hovered: RefCell::new(None),
                on_drop: RefCell::new(on_drop),
            }),
        }
    }

    pub fn id(&self) -> Id {
        self.inner.id
    }

    pub fn accepts(&self) -> PayloadType {
        self.inner.accepts
    }

    pub fn is_in_bound(&self) -> bool {
        self.inner.is_in_bound.get()
    }

    pub fn bound_in_box(&self) -> Rect {
        self.inner.bound_in_box.get()
    }

    pub fn set_bound_in_box(&self, bound_in_box: Rect) {
        self.inner.bound_in_box.set(bound_in_box);
    }

    /// The payload currently hovering over this zone.
    pub fn hovered_data(&self) -> Option<T>
    where
        T: Clone,
    {
        self.inner.hovered.borrow().clone()
    }

    pub fn with_hovered_data<R>(&self, reader: impl FnOnce(Option<&T>) -> R) -> R {
        reader(self.inner.hovered.borrow().as_ref())
    }

    pub fn reset(&self) {
        self.inner.clear();
    }

    /// The handle [`DragDropState`] keeps in its registry.
    pub fn callback(&self) -> Rc<dyn DropTargetCallback> {
        self.inner.clone()
    }
}

impl<T: fmt::Debug> fmt::Debug for DropTargetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropTargetState")
            .field("id", &self.inner.id)
            .field("accepts", &self.inner.accepts)
            .field("is_in_bound", &self.inner.is_in_bound.get())
            .field("hovered", &self.inner.hovered.borrow())
            .finish()
    }
}

/// A region inside a [`crate::DragDropBox`] that payloads of type `T` can be dropped onto.
#[must_use = "You should call .show()"]
pub struct DropTarget<'a, T> {
    state: &'a DropTargetState<T>,
    enabled: bool,
}

impl<'a, T: 'static> DropTarget<'a, T> {
    pub fn new(state: &'a DropTargetState<T>) -> Self {
        Self {
            state,
            enabled: true,
        }
    }

    /// A disabled zone is shown but never entered.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// `add_contents` receives the state (so the zone can hold drag targets and nested zones),
    /// whether a payload is hovering and, if so, its value.
    ///
    /// The zone registers before its contents, so nested zones sit above it in hit-tests.
    pub fn show<R>(
        self,
        ui: &mut Ui,
        drag_drop: &mut DragDropState,
        add_contents: impl FnOnce(&mut Ui, &mut DragDropState, bool, Option<&T>) -> R,
    ) -> InnerResponse<R> {
        let Self { state, enabled } = self;

        if enabled {
            drag_drop.register_drop_target(state.callback());
        }

        let is_in_bound = state.is_in_bound();
        let inner = ui.scope(|ui| {
            state.with_hovered_data(|hovered| add_contents(ui, drag_drop, is_in_bound, hovered))
        });

        if enabled {
            state.set_bound_in_box(drag_drop.calculate_bound_in_box(inner.response.rect, true));
        } else {
            drag_drop.unregister_drop_target(state.id());
            state.reset();
        }
        inner
    }
}
