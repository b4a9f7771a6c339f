use eframe::egui::{self, Rect, Ui, Vec2};

use super::super::{BubblePulse, ViewModel};

impl ViewModel {
    /// Topmost bubble under a container-local point; ties go to the closest
    /// center.
    fn bubble_under(&self, local: Vec2) -> Option<usize> {
        let sim = self.sim.as_ref()?;
        sim.bubbles()
            .iter()
            .enumerate()
            .filter_map(|(index, bubble)| {
                let distance = (bubble.pos - local).length();
                (distance <= bubble.radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub(in crate::app) fn handle_pointer(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        let pointer_local = ui
            .input(|input| input.pointer.latest_pos())
            .map(|pointer| pointer - rect.min);

        self.hovered = if response.hovered() && !response.dragged() {
            pointer_local.and_then(|local| self.bubble_under(local))
        } else {
            None
        };

        if response.drag_started()
            && let Some(local) = pointer_local
            && let Some(index) = self.bubble_under(local)
            && let Some(sim) = self.sim.as_mut()
        {
            sim.begin_drag(index);
            self.dragging = Some(index);
        }

        if response.dragged()
            && let Some(index) = self.dragging
            && let Some(local) = pointer_local
            && let Some(sim) = self.sim.as_mut()
        {
            sim.update_drag(index, local);
        }

        if response.drag_stopped()
            && let Some(index) = self.dragging.take()
            && let Some(sim) = self.sim.as_mut()
        {
            sim.end_drag(index);
        }

        if response.clicked()
            && let Some(index) = self.hovered
        {
            self.pulse = Some(BubblePulse {
                index,
                started_at: ui.input(|input| input.time),
            });
        }

        if self.hovered.is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
    }
}
