use super::super::viewport::ViewportContext;

/// One tick's worth of force and integration parameters. Two fixed tables
/// exist: `normal()` for regular containers and `constrained()` for small
/// ones (weaker repulsion, stronger centering, higher velocity decay, gentler
/// jitter and bounce). All mode conditionals live here so the force code is a
/// pure function of (state, config).
#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct SimulationConfig {
    /// Charge-like pair repulsion, applied as `strength / (d^2 + softening)`.
    pub repulsion_strength: f32,
    pub repulsion_softening: f32,
    /// Extra clearance required between circle edges.
    pub collision_padding: f32,
    /// Fraction of the measured overlap corrected per collision pass.
    pub collision_strength: f32,
    /// Passes per tick; small containers need faster convergence.
    pub collision_passes: usize,
    pub centering_strength: f32,
    /// Upper bound on the per-tick centering pull, so a crowded container
    /// cannot be squeezed into permanent overlap.
    pub centering_max_pull: f32,
    /// Multiplicative velocity retention per tick.
    pub velocity_decay: f32,
    /// Relaxation rate of the energy scalar toward its target.
    pub energy_decay: f32,
    /// Random per-tick velocity perturbation, full range per axis.
    pub jitter_magnitude: f32,
    pub max_velocity: f32,
    /// Fixed floor of the wall margin.
    pub boundary_margin: f32,
    /// Radius-proportional part of the wall margin.
    pub margin_radius_fraction: f32,
    /// Velocity retained (and inverted) by an inelastic wall bounce.
    pub bounce_retention: f32,
    /// Keep-alive cadence in ticks (~60 ticks per second).
    pub reheat_interval_ticks: u64,
    /// Energy target while a keep-alive reheat is active.
    pub reheat_energy: f32,
    /// Resting energy target; strictly positive so motion never fully stops.
    pub ambient_energy: f32,
}

impl SimulationConfig {
    pub fn for_viewport(viewport: &ViewportContext) -> Self {
        if viewport.constrained {
            Self::constrained()
        } else {
            Self::normal()
        }
    }

    pub fn normal() -> Self {
        Self {
            repulsion_strength: 60_000.0,
            repulsion_softening: 600.0,
            collision_padding: 2.0,
            collision_strength: 0.9,
            collision_passes: 1,
            centering_strength: 0.02,
            centering_max_pull: 1.0,
            velocity_decay: 0.92,
            energy_decay: 0.002,
            jitter_magnitude: 0.15,
            max_velocity: 3.0,
            boundary_margin: 10.0,
            margin_radius_fraction: 0.0,
            bounce_retention: 0.8,
            reheat_interval_ticks: 120,
            reheat_energy: 0.4,
            ambient_energy: 0.1,
        }
    }

    pub fn constrained() -> Self {
        Self {
            repulsion_strength: 30_000.0,
            repulsion_softening: 600.0,
            collision_padding: 2.0,
            collision_strength: 0.9,
            collision_passes: 2,
            centering_strength: 0.1,
            centering_max_pull: 0.35,
            velocity_decay: 0.88,
            energy_decay: 0.002,
            jitter_magnitude: 0.05,
            max_velocity: 1.5,
            boundary_margin: 5.0,
            margin_radius_fraction: 0.2,
            bounce_retention: 0.4,
            reheat_interval_ticks: 240,
            reheat_energy: 0.2,
            ambient_energy: 0.1,
        }
    }

    pub fn wall_margin(&self, radius: f32) -> f32 {
        self.boundary_margin.max(radius * self.margin_radius_fraction)
    }
}
