use eframe::egui::{Vec2, vec2};
use rand::Rng;
use rand::rngs::SmallRng;

use super::Bubble;
use super::super::viewport::ViewportContext;
use super::config::SimulationConfig;

/// Deterministic fallback direction for coincident centers; distinct per pair
/// so a stack of bubbles fans out instead of jittering along one axis.
fn pair_nudge_direction(a: usize, b: usize) -> Vec2 {
    let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

pub(super) fn apply_repulsion(bubbles: &mut [Bubble], config: &SimulationConfig, energy: f32) {
    let count = bubbles.len();
    for i in 0..count {
        for j in (i + 1)..count {
            let delta = bubbles[i].pos - bubbles[j].pos;
            let distance_sq = delta.length_sq();
            let distance = distance_sq.sqrt();
            let direction = if distance > 0.0001 {
                delta / distance
            } else {
                pair_nudge_direction(i, j)
            };

            let push = direction
                * (config.repulsion_strength * energy / (distance_sq + config.repulsion_softening));
            if !bubbles[i].pinned {
                bubbles[i].vel += push;
            }
            if !bubbles[j].pinned {
                bubbles[j].vel -= push;
            }
        }
    }
}

/// Positional overlap correction along the center-to-center axis, plus
/// cancellation of the approaching velocity component so corrected pairs do
/// not immediately re-penetrate. A pinned body never moves; its partner
/// absorbs the full correction.
pub(super) fn resolve_collisions(bubbles: &mut [Bubble], config: &SimulationConfig) {
    let count = bubbles.len();
    for _ in 0..config.collision_passes {
        for i in 0..count {
            for j in (i + 1)..count {
                let min_distance = bubbles[i].radius + bubbles[j].radius + config.collision_padding;
                let delta = bubbles[i].pos - bubbles[j].pos;
                let distance = delta.length();
                if distance >= min_distance {
                    continue;
                }

                let direction = if distance > 0.0001 {
                    delta / distance
                } else {
                    pair_nudge_direction(i, j)
                };

                let (weight_i, weight_j) = match (bubbles[i].pinned, bubbles[j].pinned) {
                    (true, true) => (0.0, 0.0),
                    (true, false) => (0.0, 1.0),
                    (false, true) => (1.0, 0.0),
                    (false, false) => (0.5, 0.5),
                };

                let correction = (min_distance - distance) * config.collision_strength;
                bubbles[i].pos += direction * correction * weight_i;
                bubbles[j].pos -= direction * correction * weight_j;

                let approach = (bubbles[i].vel - bubbles[j].vel).dot(direction);
                if approach < 0.0 {
                    bubbles[i].vel -= direction * approach * weight_i;
                    bubbles[j].vel += direction * approach * weight_j;
                }
            }
        }
    }
}

pub(super) fn apply_centering(
    bubbles: &mut [Bubble],
    config: &SimulationConfig,
    viewport: &ViewportContext,
    energy: f32,
) {
    let center = viewport.center();
    for bubble in bubbles.iter_mut().filter(|bubble| !bubble.pinned) {
        let mut pull = (center - bubble.pos) * config.centering_strength * energy;
        let magnitude = pull.length();
        // Cap the per-tick pull so the centering squeeze cannot out-push the
        // collision resolution and hold packed pairs in permanent overlap.
        if magnitude > config.centering_max_pull {
            pull *= config.centering_max_pull / magnitude;
        }
        bubble.vel += pull;
    }
}

/// Clamp every unpinned body back inside the walls, inverting the offending
/// velocity component with energy loss. Non-finite coordinates (a corrupted
/// upstream value) are reset to the container center instead of propagating.
pub(super) fn contain_in_bounds(
    bubbles: &mut [Bubble],
    config: &SimulationConfig,
    viewport: &ViewportContext,
) {
    for bubble in bubbles.iter_mut().filter(|bubble| !bubble.pinned) {
        if !bubble.pos.x.is_finite() || !bubble.pos.y.is_finite() {
            bubble.pos = viewport.center();
            bubble.vel = Vec2::ZERO;
        }
        if !bubble.vel.x.is_finite() || !bubble.vel.y.is_finite() {
            bubble.vel = Vec2::ZERO;
        }

        let margin = config.wall_margin(bubble.radius);
        let (low_x, high_x) = axis_range(bubble.radius, margin, viewport.width);
        let (low_y, high_y) = axis_range(bubble.radius, margin, viewport.height);

        if bubble.pos.x <= low_x {
            bubble.pos.x = low_x;
            bubble.vel.x = bubble.vel.x.abs() * config.bounce_retention;
        } else if bubble.pos.x >= high_x {
            bubble.pos.x = high_x;
            bubble.vel.x = -bubble.vel.x.abs() * config.bounce_retention;
        }

        if bubble.pos.y <= low_y {
            bubble.pos.y = low_y;
            bubble.vel.y = bubble.vel.y.abs() * config.bounce_retention;
        } else if bubble.pos.y >= high_y {
            bubble.pos.y = high_y;
            bubble.vel.y = -bubble.vel.y.abs() * config.bounce_retention;
        }
    }
}

fn axis_range(radius: f32, margin: f32, dimension: f32) -> (f32, f32) {
    let low = radius + margin;
    let high = dimension - radius - margin;
    if high < low {
        // Body cannot fit with margins; park it on the axis center.
        (dimension * 0.5, dimension * 0.5)
    } else {
        (low, high)
    }
}

pub(super) fn apply_jitter(bubbles: &mut [Bubble], config: &SimulationConfig, rng: &mut SmallRng) {
    for bubble in bubbles.iter_mut().filter(|bubble| !bubble.pinned) {
        bubble.vel.x += (rng.random::<f32>() - 0.5) * config.jitter_magnitude;
        bubble.vel.y += (rng.random::<f32>() - 0.5) * config.jitter_magnitude;
    }
}

pub(super) fn clamp_velocities(bubbles: &mut [Bubble], config: &SimulationConfig) {
    let max_speed_sq = config.max_velocity * config.max_velocity;
    for bubble in bubbles.iter_mut().filter(|bubble| !bubble.pinned) {
        let speed_sq = bubble.vel.length_sq();
        if speed_sq > max_speed_sq {
            bubble.vel *= config.max_velocity / speed_sq.sqrt();
        }
    }
}
