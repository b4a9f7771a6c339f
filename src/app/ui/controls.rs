use eframe::egui::{RichText, Ui};

use crate::items::MetricMode;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn metric_controls(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            for mode in [MetricMode::Frequency, MetricMode::Spending] {
                let selected = self.metric == mode;
                if ui
                    .selectable_label(selected, RichText::new(mode.label()).strong())
                    .clicked()
                    && !selected
                {
                    self.metric = mode;
                    if let Some(sim) = self.sim.as_mut() {
                        sim.set_metric_mode(mode, &self.items);
                    }
                }
            }
        });
    }
}
