use egui::{Pos2, Rect};

/// Half-open containment (`min <= p < max`), so an empty rect never contains anything.
///
/// `egui::Rect::contains` is inclusive on both ends, which would make `Rect::ZERO` match the origin.
pub(crate) fn rect_contains(rect: Rect, position: Pos2) -> bool {
    rect.min.x <= position.x
        && position.x < rect.max.x
        && rect.min.y <= position.y
        && position.y < rect.max.y
}

/// The coordinate space of the drag-drop container, recorded by [`super::DragDropState::attach`].
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct Attachment {
    container: Option<Rect>,
}

impl Attachment {
    pub(super) fn attach(&mut self, container: Rect) {
        self.container = Some(container);
    }

    pub(super) fn container(&self) -> Option<Rect> {
        self.container
    }

    /// Translate a screen-space rect into container-local coordinates.
    ///
    /// With `clip`, the result is intersected with the container first.
    pub(super) fn local_bounding_box_of(&self, rect: Rect, clip: bool) -> Rect {
        let Some(container) = self.container else {
            return Rect::ZERO;
        };

        let rect = if clip {
            let clipped = rect.intersect(container);
            if !clipped.is_positive() {
                return Rect::ZERO;
            }
            clipped
        } else {
            rect
        };
        rect.translate(-container.min.to_vec2())
    }

    pub(super) fn local_position_of(&self, position: Pos2) -> Pos2 {
        self.container
            .map(|container| Pos2::ZERO + (position - container.min))
            .unwrap_or(Pos2::ZERO)
    }

    pub(super) fn screen_position_of(&self, local: Pos2) -> Pos2 {
        self.container
            .map(|container| container.min + local.to_vec2())
            .unwrap_or(local)
    }
}
