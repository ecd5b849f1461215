use itertools::Itertools as _;

use super::DragDropState;
use super::info::DragTargetInfo as _;

impl DragDropState {
    pub(super) fn debug_log_event(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{message}");

        if !self.options.debug_event_log {
            return;
        }
        let cap = self.options.debug_event_log_capacity.clamp(1, 10_000);
        while self.debug_log.len() >= cap {
            self.debug_log.pop_front();
        }
        self.debug_log
            .push_back(format!("[frame {}] {}", self.debug_frame, message));
    }

    /// Recorded session events, oldest first. Empty unless `debug_event_log` is enabled.
    pub fn debug_log(&self) -> impl Iterator<Item = &str> {
        self.debug_log.iter().map(String::as_str)
    }

    pub fn debug_log_clear(&mut self) {
        self.debug_log.clear();
    }

    /// One-paragraph summary of the registries and the session, for debug panels.
    pub fn debug_summary(&self) -> String {
        let drag_targets = self
            .drag_targets
            .iter()
            .map(|t| {
                let r = t.bound_in_box();
                format!(
                    "{:?}@({:.0},{:.0} {:.0}x{:.0})",
                    t.id(),
                    r.min.x,
                    r.min.y,
                    r.width(),
                    r.height()
                )
            })
            .join(", ");
        let drop_targets = self
            .drop_targets
            .iter()
            .map(|z| {
                let marker = if z.is_in_bound() { "*" } else { "" };
                format!("{marker}{:?}", z.id())
            })
            .join(", ");
        let payload = self
            .data_to_drop()
            .map(|data| data.payload_type().name())
            .unwrap_or("-");

        format!(
            "dragging={} animating={} active_target={:?} payload={payload}\n\
             drag_targets=[{drag_targets}]\n\
             drop_targets=[{drop_targets}]",
            self.is_dragging(),
            self.is_animation_running(),
            self.active_target,
        )
    }
}
