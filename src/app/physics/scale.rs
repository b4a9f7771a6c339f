use crate::items::{ItemStat, MetricMode};

use super::super::viewport::ViewportContext;

const MIN_SCALE: f32 = 1.0;
const MAX_SCALE: f32 = 4.0;
const FLAT_SCALE: f32 = 2.5;
const NORMAL_BASE_RADIUS: f32 = 25.0;
const CONSTRAINED_BASE_MIN: f32 = 8.0;
const CONSTRAINED_BASE_MAX: f32 = 25.0;

/// Linear 1x..4x scaling between the dataset's min and max metric; a flat
/// dataset maps to the middle of the range instead of dividing by zero.
pub(in crate::app) fn scale_factor(value: f32, min: f32, max: f32) -> f32 {
    if max <= min {
        return FLAT_SCALE;
    }
    let normalized = ((value - min) / (max - min)).clamp(0.0, 1.0);
    MIN_SCALE + normalized * (MAX_SCALE - MIN_SCALE)
}

fn bubbles_per_row(width: f32) -> f32 {
    if width <= 375.0 {
        3.0
    } else if width <= 414.0 {
        4.0
    } else {
        5.0
    }
}

fn base_radius(viewport: &ViewportContext, average_scale: f32) -> f32 {
    if !viewport.constrained {
        return NORMAL_BASE_RADIUS;
    }

    let available = viewport.width * 0.8;
    let per_row = bubbles_per_row(viewport.width);
    let base = (available / per_row) / (average_scale.max(MIN_SCALE) * 2.5);
    base.clamp(CONSTRAINED_BASE_MIN, CONSTRAINED_BASE_MAX)
}

/// Target radius per item for the active metric mode. The result is capped so
/// a single oversized circle can never exceed the container, and stays
/// strictly positive.
pub(in crate::app) fn bubble_radii(
    items: &[ItemStat],
    mode: MetricMode,
    viewport: &ViewportContext,
) -> Vec<f32> {
    if items.is_empty() {
        return Vec::new();
    }

    let metrics = items.iter().map(|item| item.metric(mode)).collect::<Vec<_>>();
    let mut min_metric = f32::MAX;
    let mut max_metric = f32::MIN;
    for &metric in &metrics {
        min_metric = min_metric.min(metric);
        max_metric = max_metric.max(metric);
    }

    let scales = metrics
        .iter()
        .map(|&metric| scale_factor(metric, min_metric, max_metric))
        .collect::<Vec<_>>();
    let average_scale = scales.iter().sum::<f32>() / scales.len() as f32;
    let base = base_radius(viewport, average_scale);

    let radius_cap = (viewport.width.min(viewport.height) * 0.25).max(1.0);
    scales
        .iter()
        .map(|scale| (base * scale).min(radius_cap).max(1.0))
        .collect()
}
