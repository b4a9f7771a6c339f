use eframe::egui::{
    Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, vec2,
};

use crate::items::{ItemStat, MetricMode};
use crate::util::format_money;

use super::super::physics::Simulation;
use super::super::render_utils::{blend_color, design};
use super::super::ViewModel;

const PULSE_SECONDS: f64 = 0.3;
const PULSE_SCALE: f32 = 1.2;

impl ViewModel {
    pub(in crate::app) fn draw_bubbles(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 12.0, Color32::from_rgb(44, 47, 54));

        if let Some(viewport) = self.adapter.observe(rect.width(), rect.height())
            && let Some(sim) = self.sim.as_mut()
        {
            sim.set_viewport(viewport, &self.items);
        }
        if self.sim.is_none()
            && let Some(viewport) = self.adapter.current()
        {
            self.sim = Some(Simulation::new(&self.items, self.metric, viewport));
        }

        self.handle_pointer(ui, rect, &response);

        let now = ui.input(|input| input.time);
        if let Some(pulse) = self.pulse
            && now - pulse.started_at >= PULSE_SECONDS
        {
            self.pulse = None;
        }

        let Some(sim) = self.sim.as_mut() else {
            // First valid measurement has not arrived yet.
            ui.ctx().request_repaint();
            return;
        };
        sim.step();

        let bubbles = sim.bubbles();
        let mut draw_order = (0..bubbles.len()).collect::<Vec<_>>();
        draw_order.sort_by(|a, b| bubbles[*b].radius.total_cmp(&bubbles[*a].radius));

        for &index in &draw_order {
            let bubble = &bubbles[index];
            let mut radius = bubble.radius;
            if let Some(pulse) = self.pulse
                && pulse.index == index
            {
                let progress = ((now - pulse.started_at) / PULSE_SECONDS).clamp(0.0, 1.0) as f32;
                radius *= PULSE_SCALE - (PULSE_SCALE - 1.0) * progress;
            }

            let center = rect.min + bubble.pos;
            let palette = design(bubble.design_index);

            painter.circle_filled(center, radius, palette.halo);
            painter.circle_filled(center, radius * 0.7, palette.core);
            painter.circle_filled(center, radius * 0.4, Color32::BLACK);
            painter.circle_stroke(center, radius, Stroke::new(1.0, palette.border));

            if radius >= 14.0 {
                let item = &self.items[index];
                let name_font = FontId::proportional((radius * 0.25).max(8.0));
                let value_font = FontId::proportional((radius * 0.18).max(6.0));
                painter.text(
                    center,
                    Align2::CENTER_BOTTOM,
                    item.name.to_uppercase(),
                    name_font,
                    Color32::WHITE,
                );
                let value_text = match self.metric {
                    MetricMode::Frequency => format!("{}x", item.frequency_count),
                    MetricMode::Spending => format_money(item.total_spent),
                };
                painter.text(
                    center + vec2(0.0, 2.0),
                    Align2::CENTER_TOP,
                    value_text,
                    value_font,
                    blend_color(Color32::WHITE, palette.border, 0.35),
                );
            }
        }

        if let Some(hover) = self.hovered
            && hover < bubbles.len()
        {
            let bubble = &bubbles[hover];
            draw_tooltip(
                &painter,
                rect,
                &self.items[hover],
                rect.min + bubble.pos,
                bubble.radius,
                design(bubble.design_index).border,
            );
        }

        ui.ctx().request_repaint();
    }
}

fn draw_tooltip(
    painter: &eframe::egui::Painter,
    rect: Rect,
    item: &ItemStat,
    center: Pos2,
    radius: f32,
    border: Color32,
) {
    let size = vec2(170.0, 74.0);
    let mut anchor = center - vec2(0.0, radius + size.y * 0.5 + 12.0);
    anchor.x = anchor.x.clamp(rect.left() + size.x * 0.5, rect.right() - size.x * 0.5);
    if anchor.y - size.y * 0.5 < rect.top() {
        anchor.y = center.y + radius + size.y * 0.5 + 12.0;
    }

    let tooltip = Rect::from_center_size(anchor, size);
    painter.rect_filled(tooltip, 8.0, Color32::from_rgba_unmultiplied(34, 37, 44, 244));
    painter.rect_stroke(tooltip, 8.0, Stroke::new(2.0, border), StrokeKind::Outside);

    let top = tooltip.top();
    painter.text(
        Pos2::new(anchor.x, top + 14.0),
        Align2::CENTER_CENTER,
        item.name.to_uppercase(),
        FontId::proportional(12.0),
        Color32::WHITE,
    );
    painter.text(
        Pos2::new(anchor.x, top + 31.0),
        Align2::CENTER_CENTER,
        format!("Purchased {} times", item.frequency_count),
        FontId::proportional(10.0),
        border,
    );
    painter.text(
        Pos2::new(anchor.x, top + 46.0),
        Align2::CENTER_CENTER,
        format!("Total spent: {}", format_money(item.total_spent)),
        FontId::proportional(10.0),
        border,
    );
    if item.frequency_count > 0.0 {
        painter.text(
            Pos2::new(anchor.x, top + 61.0),
            Align2::CENTER_CENTER,
            format!(
                "Avg: {} per purchase",
                format_money(item.total_spent / item.frequency_count)
            ),
            FontId::proportional(9.0),
            Color32::from_rgb(204, 204, 204),
        );
    }
}
