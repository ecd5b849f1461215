//! Drag-and-drop for [`egui`]: draggable targets, typed drop zones and a floating snapshot that
//! follows the pointer.
//!
//! - [`DragDropState`] coordinates one drag session at a time: hit-testing, enter/exit/drop
//!   callbacks and the optional pick-up/settle animation.
//! - [`DragDropBox`] hosts the targets and paints the overlay.
//! - [`DragTarget`] / [`DropTarget`] are the widgets, backed by identity-stable
//!   [`DragTargetState`] / [`DropTargetState`] handles you keep in your app state.

#![forbid(unsafe_code)]

pub mod drag_drop;
pub mod drag_drop_box;
pub mod drag_target;
pub mod drop_target;
pub mod payload;

#[cfg(test)]
mod widget_tests;

pub use drag_drop::{
    DragAnimationOptions, DragDropHelper, DragDropOptions, DragDropState, DragOutcome,
    DragStartRejected, DragTargetInfo, DragType, Easing, PointerSample, Tween,
};
pub use drag_drop_box::{DragDropBox, DragDropOverlay};
pub use drag_target::{DragTarget, DragTargetCallback, DragTargetState, Snapshot};
pub use drop_target::{DropTarget, DropTargetCallback, DropTargetState};
pub use payload::{AnyDataToDrop, DataToDrop, PayloadType};
