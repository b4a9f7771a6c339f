use eframe::egui::{Vec2, vec2};

const CONSTRAINED_MAX_WIDTH: f32 = 768.0;
const DEBOUNCE_DELTA: f32 = 10.0;
const MAX_ZERO_RETRIES: u32 = 8;
const FALLBACK_WIDTH: f32 = 800.0;
const FALLBACK_HEIGHT: f32 = 600.0;

/// Measured container dimensions plus the small-screen classification that
/// selects the gentler force parameter table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ViewportContext {
    pub width: f32,
    pub height: f32,
    pub constrained: bool,
}

impl ViewportContext {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            constrained: width <= CONSTRAINED_MAX_WIDTH,
        }
    }

    pub fn fallback() -> Self {
        Self::new(FALLBACK_WIDTH, FALLBACK_HEIGHT)
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }
}

/// Remeasures the hosting container once per frame and republishes a
/// `ViewportContext` only on meaningful changes. Never publishes a
/// zero or negative dimension: a degenerate first measurement is retried a
/// few frames and then replaced by a fixed default.
pub(in crate::app) struct ViewportAdapter {
    current: Option<ViewportContext>,
    zero_retries: u32,
}

impl ViewportAdapter {
    pub fn new() -> Self {
        Self {
            current: None,
            zero_retries: 0,
        }
    }

    pub fn current(&self) -> Option<ViewportContext> {
        self.current
    }

    /// Feed one measurement; returns `Some` when a new context was published.
    pub fn observe(&mut self, width: f32, height: f32) -> Option<ViewportContext> {
        if width <= 0.0 || height <= 0.0 || !width.is_finite() || !height.is_finite() {
            if self.current.is_some() {
                return None;
            }
            self.zero_retries += 1;
            if self.zero_retries >= MAX_ZERO_RETRIES {
                let fallback = ViewportContext::fallback();
                self.current = Some(fallback);
                return Some(fallback);
            }
            return None;
        }

        self.zero_retries = 0;
        if let Some(current) = self.current
            && (current.width - width).abs() < DEBOUNCE_DELTA
            && (current.height - height).abs() < DEBOUNCE_DELTA
        {
            return None;
        }

        let next = ViewportContext::new(width, height);
        self.current = Some(next);
        Some(next)
    }
}
