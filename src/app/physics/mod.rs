mod config;
mod forces;
mod scale;

use eframe::egui::{Vec2, vec2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::items::{ItemStat, MetricMode};
use crate::util::stable_pair;

use super::render_utils::DESIGN_COUNT;
use super::viewport::ViewportContext;
pub(in crate::app) use config::SimulationConfig;

/// Energy below which the keep-alive watchdog considers the layout quiescent.
const QUIESCENT_ENERGY: f32 = 0.05;
/// Energy target held while a body is dragged.
const DRAG_ENERGY: f32 = 0.5;
/// Square zone at the container origin where stalled bodies collect.
const CORNER_ZONE: f32 = 60.0;
const CORNER_STALL_SPEED: f32 = 0.05;
const CORNER_STALL_TICKS: u32 = 30;

/// One simulated circle. Positions are container-local, origin at the
/// top-left corner.
pub(in crate::app) struct Bubble {
    pub name: String,
    pub radius: f32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub pinned: bool,
    /// Cosmetic palette slot, stable across reconfiguration.
    pub design_index: usize,
    stuck_ticks: u32,
}

/// The perpetually running layout: body set, energy scalar, keep-alive and
/// corner watchdogs, and the drag pin. One `step` per rendered frame.
pub(in crate::app) struct Simulation {
    bubbles: Vec<Bubble>,
    config: SimulationConfig,
    viewport: ViewportContext,
    metric_mode: MetricMode,
    energy: f32,
    energy_target: f32,
    reheat_revert_tick: Option<u64>,
    tick: u64,
    pinned: Option<usize>,
    rng: SmallRng,
}

impl Simulation {
    pub fn new(items: &[ItemStat], mode: MetricMode, viewport: ViewportContext) -> Self {
        Self::with_seed(items, mode, viewport, rand::random())
    }

    pub fn with_seed(
        items: &[ItemStat],
        mode: MetricMode,
        viewport: ViewportContext,
        seed: u64,
    ) -> Self {
        let config = SimulationConfig::for_viewport(&viewport);
        let mut rng = SmallRng::seed_from_u64(seed);
        let radii = scale::bubble_radii(items, mode, &viewport);
        let bubbles = items
            .iter()
            .zip(radii)
            .enumerate()
            .map(|(index, (item, radius))| seed_bubble(&mut rng, item, index, radius, &viewport))
            .collect();

        Self {
            bubbles,
            config,
            viewport,
            metric_mode: mode,
            energy: 1.0,
            energy_target: config.ambient_energy,
            reheat_revert_tick: None,
            tick: 0,
            pinned: None,
            rng,
        }
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn viewport(&self) -> ViewportContext {
        self.viewport
    }

    /// Adopt a republished viewport: swap the parameter table, rescale radii
    /// for the possibly changed viewport class, and clamp everything back
    /// inside the new walls right away.
    pub fn set_viewport(&mut self, viewport: ViewportContext, items: &[ItemStat]) {
        self.viewport = viewport;
        self.config = SimulationConfig::for_viewport(&viewport);
        self.assign_radii(items);
        forces::contain_in_bounds(&mut self.bubbles, &self.config, &self.viewport);
    }

    /// Metric-mode change recomputes radii in place; positions and velocities
    /// carry over so the layout morphs instead of restarting.
    pub fn set_metric_mode(&mut self, mode: MetricMode, items: &[ItemStat]) {
        if self.metric_mode == mode {
            return;
        }
        self.metric_mode = mode;
        self.assign_radii(items);
    }

    fn assign_radii(&mut self, items: &[ItemStat]) {
        let radii = scale::bubble_radii(items, self.metric_mode, &self.viewport);
        for (bubble, radius) in self.bubbles.iter_mut().zip(radii) {
            bubble.radius = radius;
        }
    }

    pub fn step(&mut self) {
        self.tick += 1;
        self.update_energy();

        forces::apply_repulsion(&mut self.bubbles, &self.config, self.energy);
        forces::resolve_collisions(&mut self.bubbles, &self.config);
        forces::apply_centering(&mut self.bubbles, &self.config, &self.viewport, self.energy);
        forces::contain_in_bounds(&mut self.bubbles, &self.config, &self.viewport);
        forces::apply_jitter(&mut self.bubbles, &self.config, &mut self.rng);
        forces::clamp_velocities(&mut self.bubbles, &self.config);

        self.integrate();
        self.rescue_corner_stalls();
    }

    /// Relax the energy scalar toward its target and run the keep-alive
    /// cadence. The target never drops below the ambient value, so the
    /// scalar stays strictly positive for the simulation's lifetime.
    fn update_energy(&mut self) {
        if self.pinned.is_none() {
            if self.tick % self.config.reheat_interval_ticks == 0 && self.energy < QUIESCENT_ENERGY
            {
                self.energy_target = self.config.reheat_energy;
                self.reheat_revert_tick = Some(self.tick + self.config.reheat_interval_ticks / 2);
            }
            if let Some(revert_tick) = self.reheat_revert_tick
                && self.tick >= revert_tick
            {
                self.energy_target = self.config.ambient_energy;
                self.reheat_revert_tick = None;
            }
        }

        self.energy += (self.energy_target - self.energy) * self.config.energy_decay;
    }

    fn integrate(&mut self) {
        for bubble in &mut self.bubbles {
            if bubble.pinned {
                bubble.vel = Vec2::ZERO;
                continue;
            }
            bubble.vel *= self.config.velocity_decay;
            bubble.pos += bubble.vel;
        }
    }

    /// The origin corner is a degenerate attractor under some force balances;
    /// any body idling there for too long is teleported to a random interior
    /// point with a fresh velocity kick so nothing stays visually stuck.
    fn rescue_corner_stalls(&mut self) {
        let viewport = self.viewport;
        let config = self.config;
        for bubble in self.bubbles.iter_mut() {
            if bubble.pinned {
                bubble.stuck_ticks = 0;
                continue;
            }

            let in_corner = bubble.pos.x - bubble.radius < CORNER_ZONE
                && bubble.pos.y - bubble.radius < CORNER_ZONE;
            let stalled = bubble.vel.length_sq() < CORNER_STALL_SPEED * CORNER_STALL_SPEED;
            if in_corner && stalled {
                bubble.stuck_ticks += 1;
            } else {
                bubble.stuck_ticks = 0;
            }

            if bubble.stuck_ticks >= CORNER_STALL_TICKS {
                let margin = config.wall_margin(bubble.radius);
                let inset = bubble.radius + margin;
                bubble.pos = vec2(
                    sample_range(
                        &mut self.rng,
                        (viewport.width * 0.3).max(inset),
                        (viewport.width * 0.7).max(inset),
                    ),
                    sample_range(
                        &mut self.rng,
                        (viewport.height * 0.3).max(inset),
                        (viewport.height * 0.7).max(inset),
                    ),
                );
                bubble.vel = kick_direction(&mut self.rng)
                    * (0.8 + self.rng.random::<f32>() * 0.7).min(config.max_velocity);
                bubble.stuck_ticks = 0;
            }
        }
    }

    pub fn begin_drag(&mut self, index: usize) {
        if index >= self.bubbles.len() {
            return;
        }
        if let Some(previous) = self.pinned.take() {
            self.bubbles[previous].pinned = false;
        }
        self.bubbles[index].pinned = true;
        self.bubbles[index].vel = Vec2::ZERO;
        self.pinned = Some(index);
        self.energy_target = DRAG_ENERGY;
        self.energy = self.energy.max(0.3);
        self.reheat_revert_tick = None;
    }

    pub fn update_drag(&mut self, index: usize, pos: Vec2) {
        if self.pinned == Some(index) {
            self.bubbles[index].pos = pos;
        }
    }

    pub fn end_drag(&mut self, index: usize) {
        if self.pinned == Some(index) {
            self.bubbles[index].pinned = false;
            self.pinned = None;
            self.energy_target = self.config.ambient_energy;
        }
    }
}

fn sample_range(rng: &mut SmallRng, low: f32, high: f32) -> f32 {
    if high <= low {
        (low + high) * 0.5
    } else {
        low + rng.random::<f32>() * (high - low)
    }
}

fn kick_direction(rng: &mut SmallRng) -> Vec2 {
    let angle = rng.random::<f32>() * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

/// Seed one body: position inside a safe inset, never on the boundary, and a
/// small nonzero starting velocity whose direction is stable per item name.
fn seed_bubble(
    rng: &mut SmallRng,
    item: &ItemStat,
    index: usize,
    radius: f32,
    viewport: &ViewportContext,
) -> Bubble {
    let inset = radius * 1.25;
    let pos = vec2(
        sample_range(rng, inset, viewport.width - inset),
        sample_range(rng, inset, viewport.height - inset),
    );

    let (dir_x, dir_y) = stable_pair(&item.name);
    let mut direction = vec2(dir_x, dir_y);
    if direction.length_sq() <= 0.0001 {
        let angle = ((index as f32) * 0.618_034 + 0.11) * std::f32::consts::TAU;
        direction = vec2(angle.cos(), angle.sin());
    } else {
        direction = direction.normalized();
    }
    let speed = 0.4 + rng.random::<f32>() * 0.8;

    Bubble {
        name: item.name.clone(),
        radius,
        pos,
        vel: direction * speed,
        pinned: false,
        design_index: index % DESIGN_COUNT,
        stuck_ticks: 0,
    }
}

#[cfg(test)]
mod tests {
    use crate::items::sample_items;

    use super::*;

    fn item(name: &str, frequency: f64, spent: f64) -> ItemStat {
        ItemStat {
            name: name.to_owned(),
            frequency_count: frequency,
            total_spent: spent,
        }
    }

    fn two_item_dataset() -> Vec<ItemStat> {
        vec![item("milk", 15.0, 65.50), item("eggs", 3.0, 10.0)]
    }

    fn assert_contained(sim: &Simulation) {
        let viewport = sim.viewport();
        for bubble in sim.bubbles() {
            assert!(bubble.pos.x.is_finite() && bubble.pos.y.is_finite());
            assert!(
                bubble.pos.x >= bubble.radius && bubble.pos.x <= viewport.width - bubble.radius,
                "{} escaped on x: {} (radius {})",
                bubble.name,
                bubble.pos.x,
                bubble.radius
            );
            assert!(
                bubble.pos.y >= bubble.radius && bubble.pos.y <= viewport.height - bubble.radius,
                "{} escaped on y: {} (radius {})",
                bubble.name,
                bubble.pos.y,
                bubble.radius
            );
        }
    }

    fn max_overlap(sim: &Simulation) -> f32 {
        let bubbles = sim.bubbles();
        let mut worst = 0.0f32;
        for i in 0..bubbles.len() {
            for j in (i + 1)..bubbles.len() {
                let distance = (bubbles[i].pos - bubbles[j].pos).length();
                let min_distance = bubbles[i].radius + bubbles[j].radius;
                worst = worst.max(min_distance - distance);
            }
        }
        worst
    }

    #[test]
    fn milk_outranks_eggs_and_both_stay_inside() {
        let items = two_item_dataset();
        let viewport = ViewportContext::new(800.0, 600.0);
        assert!(!viewport.constrained);

        let mut sim = Simulation::with_seed(&items, MetricMode::Frequency, viewport, 42);
        assert!(sim.bubbles()[0].radius > sim.bubbles()[1].radius);

        for _ in 0..300 {
            sim.step();
            assert_contained(&sim);
        }
        assert!(max_overlap(&sim) <= 2.0);
    }

    #[test]
    fn no_overlap_convergence_for_full_dataset() {
        let items = sample_items();
        let viewport = ViewportContext::new(800.0, 600.0);
        let mut sim = Simulation::with_seed(&items, MetricMode::Frequency, viewport, 7);

        for _ in 0..280 {
            sim.step();
        }
        // The layout never stops moving, so allow the padding plus one tick of
        // relative travel as transient, and require true separation at some
        // point of the settled window.
        let transient = 2.0 * sim.config.max_velocity + sim.config.collision_padding;
        let mut best = f32::MAX;
        for _ in 0..20 {
            sim.step();
            let overlap = max_overlap(&sim);
            assert!(overlap <= transient, "residual overlap {overlap}");
            best = best.min(overlap);
        }
        assert_contained(&sim);
        assert!(best <= 2.0, "no settled tick without overlap, best {best}");
    }

    #[test]
    fn containment_holds_in_constrained_viewports() {
        let items = sample_items();
        let viewport = ViewportContext::new(375.0, 620.0);
        assert!(viewport.constrained);
        let mut sim = Simulation::with_seed(&items, MetricMode::Spending, viewport, 11);

        for _ in 0..300 {
            sim.step();
            assert_contained(&sim);
        }
    }

    #[test]
    fn no_overlap_convergence_in_constrained_viewports() {
        let items = sample_items();
        let viewport = ViewportContext::new(375.0, 620.0);
        assert!(viewport.constrained);
        let mut sim = Simulation::with_seed(&items, MetricMode::Frequency, viewport, 3);

        for _ in 0..280 {
            sim.step();
        }
        // The stronger centering of small containers must not squeeze packed
        // pairs past what the collision passes can undo.
        let transient = 2.0 * sim.config.max_velocity + sim.config.collision_padding;
        let mut best = f32::MAX;
        for _ in 0..30 {
            sim.step();
            let overlap = max_overlap(&sim);
            assert!(overlap <= transient, "residual overlap {overlap}");
            best = best.min(overlap);
        }
        assert_contained(&sim);
        assert!(best <= 2.0, "no settled tick without overlap, best {best}");
    }

    #[test]
    fn dragged_body_tracks_the_pointer_exactly() {
        let items = two_item_dataset();
        let viewport = ViewportContext::new(800.0, 600.0);
        let mut sim = Simulation::with_seed(&items, MetricMode::Frequency, viewport, 3);

        sim.begin_drag(0);
        let target = vec2(123.0, 456.0);
        sim.update_drag(0, target);
        for _ in 0..10 {
            sim.step();
            assert_eq!(sim.bubbles()[0].pos, target);
        }

        sim.end_drag(0);
        sim.step();
        assert!(!sim.bubbles()[0].pinned);
        assert!(sim.bubbles()[0].vel.length() > 0.0, "forces resume after release");
    }

    #[test]
    fn at_most_one_body_is_pinned() {
        let items = two_item_dataset();
        let viewport = ViewportContext::new(800.0, 600.0);
        let mut sim = Simulation::with_seed(&items, MetricMode::Frequency, viewport, 5);

        sim.begin_drag(0);
        sim.begin_drag(1);
        let pinned = sim.bubbles().iter().filter(|bubble| bubble.pinned).count();
        assert_eq!(pinned, 1);
        assert!(sim.bubbles()[1].pinned);
    }

    #[test]
    fn corner_stall_is_rescued_within_a_bounded_tick_count() {
        let items = vec![item("milk", 15.0, 65.5)];
        let viewport = ViewportContext::new(800.0, 600.0);
        let mut sim = Simulation::with_seed(&items, MetricMode::Frequency, viewport, 9);

        // Strip the ambient forces so only the watchdog can act.
        sim.config.jitter_magnitude = 0.0;
        sim.config.centering_strength = 0.0;
        sim.config.repulsion_strength = 0.0;

        let radius = sim.bubbles()[0].radius;
        sim.bubbles[0].pos = vec2(radius + 1.0, radius + 1.0);
        sim.bubbles[0].vel = Vec2::ZERO;

        let mut rescued_at = None;
        for tick in 0..CORNER_STALL_TICKS + 10 {
            sim.step();
            let bubble = &sim.bubbles()[0];
            if bubble.pos.x - bubble.radius >= CORNER_ZONE
                && bubble.pos.y - bubble.radius >= CORNER_ZONE
            {
                rescued_at = Some(tick);
                break;
            }
        }

        let rescued_at = rescued_at.expect("watchdog repositioned the stalled body");
        assert!(rescued_at <= CORNER_STALL_TICKS + 1);
        assert!(sim.bubbles()[0].vel.length() > 0.0);
    }

    #[test]
    fn quiescent_energy_is_reinjected_on_cadence() {
        let items = two_item_dataset();
        let viewport = ViewportContext::new(800.0, 600.0);
        let mut sim = Simulation::with_seed(&items, MetricMode::Frequency, viewport, 13);

        sim.energy = 0.01;
        sim.energy_target = sim.config.ambient_energy;

        let interval = sim.config.reheat_interval_ticks;
        for _ in 0..interval {
            sim.step();
        }
        assert_eq!(sim.energy_target, sim.config.reheat_energy);
        assert!(sim.energy > 0.01);

        for _ in 0..interval {
            sim.step();
        }
        assert_eq!(sim.energy_target, sim.config.ambient_energy);
    }

    #[test]
    fn energy_never_reaches_zero() {
        let items = two_item_dataset();
        let viewport = ViewportContext::new(800.0, 600.0);
        let mut sim = Simulation::with_seed(&items, MetricMode::Frequency, viewport, 17);

        for _ in 0..2_000 {
            sim.step();
            assert!(sim.energy > 0.0);
        }
    }

    #[test]
    fn resize_sequence_stays_finite_and_contained() {
        let items = sample_items();
        let mut sim = Simulation::with_seed(
            &items,
            MetricMode::Frequency,
            ViewportContext::new(800.0, 600.0),
            21,
        );

        for (width, height) in [(400.0, 500.0), (1200.0, 800.0), (350.0, 520.0), (900.0, 640.0)] {
            sim.set_viewport(ViewportContext::new(width, height), &items);
            for _ in 0..5 {
                sim.step();
            }
            assert_contained(&sim);
        }
    }

    #[test]
    fn metric_mode_switch_rescales_without_repositioning() {
        let items = sample_items();
        let viewport = ViewportContext::new(800.0, 600.0);
        let mut sim = Simulation::with_seed(&items, MetricMode::Frequency, viewport, 19);

        for _ in 0..50 {
            sim.step();
        }
        let positions = sim.bubbles().iter().map(|bubble| bubble.pos).collect::<Vec<_>>();
        let radii = sim.bubbles().iter().map(|bubble| bubble.radius).collect::<Vec<_>>();

        sim.set_metric_mode(MetricMode::Spending, &items);
        let after = sim.bubbles();
        for (index, bubble) in after.iter().enumerate() {
            assert_eq!(bubble.pos, positions[index]);
        }
        assert!(after.iter().zip(&radii).any(|(bubble, &old)| bubble.radius != old));
    }

    #[test]
    fn empty_and_single_item_datasets_are_harmless() {
        let viewport = ViewportContext::new(800.0, 600.0);

        let mut empty = Simulation::with_seed(&[], MetricMode::Frequency, viewport, 1);
        for _ in 0..10 {
            empty.step();
        }
        assert!(empty.bubbles().is_empty());

        let mut single =
            Simulation::with_seed(&[item("milk", 15.0, 65.5)], MetricMode::Spending, viewport, 2);
        for _ in 0..100 {
            single.step();
            assert_contained(&single);
        }
    }

    #[test]
    fn seeded_bodies_start_inside_with_nonzero_velocity() {
        let items = sample_items();
        let viewport = ViewportContext::new(800.0, 600.0);
        let sim = Simulation::with_seed(&items, MetricMode::Frequency, viewport, 23);

        for bubble in sim.bubbles() {
            assert!(bubble.radius > 0.0);
            assert!(bubble.pos.x > bubble.radius && bubble.pos.x < viewport.width - bubble.radius);
            assert!(bubble.pos.y > bubble.radius && bubble.pos.y < viewport.height - bubble.radius);
            assert!(bubble.vel.length() > 0.0);
        }
    }
}
