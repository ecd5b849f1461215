use egui::{Id, Pos2};

/// Why [`super::DragDropState::on_drag_start`] refused to start a drag.
///
/// Neither case disturbs an existing session; the gesture layer simply ignores the rest of the press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragStartRejected {
    /// No registered drag target contains the press position.
    NoTarget { position: Pos2 },

    /// A session (or its settle animation) already belongs to another target.
    SessionActive { active: Id, requested: Id },
}

impl std::fmt::Display for DragStartRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTarget { position } => write!(
                f,
                "no drag target contains ({:.1},{:.1})",
                position.x, position.y
            ),
            Self::SessionActive { active, requested } => write!(
                f,
                "cannot drag {requested:?} while {active:?} is being dragged"
            ),
        }
    }
}

impl std::error::Error for DragStartRejected {}
