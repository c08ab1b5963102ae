//! A noise-driven orbiting-particle agent.
//!
//! The agent keeps one [`Drifter`] per budgeted entity. Each frame every
//! drifter advances around the surface centre; its angular wobble comes
//! from fractal noise and its radial breathing from a 3D noise slice over
//! time, so motion is smooth and reproducible for a given field seed.
//!
//! On a tier change the agent syncs its entity list to the tier's budget
//! and recomputes its backing surface size.

use std::f64::consts::TAU;

use backdrop_noise::NoiseField;
use backdrop_quality::{BudgetChange, EntityBudget, QualitySettings, SurfacePolicy};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Frame duration the per-frame motion constants are tuned for.
const REFERENCE_FRAME_MS: f64 = 16.67;
/// Noise time scale applied to the agent clock in milliseconds.
const TIME_SCALE: f64 = 0.0005;

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (b - a).mul_add(t, a)
}

/// One orbiting entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Drifter {
    /// Current orbit angle in radians.
    pub angle: f64,
    /// Orbit radius as a fraction of the half-extent.
    pub base_radius: f64,
    /// Amplitude of the noise-driven radial breathing.
    pub radial_offset: f64,
    /// Angular speed per reference frame.
    pub speed: f64,
    /// Radial drift per reference frame.
    pub radial_drift: f64,
    /// Offset into the noise field keeping drifters decorrelated.
    pub noise_offset: f64,
    /// Last computed position in layout pixels.
    pub position: (f64, f64),
}

impl Drifter {
    fn spawn(rng: &mut SmallRng, seed: f64) -> Self {
        let radius_t: f64 = rng.random();
        Self {
            angle: rng.random_range(0.0..TAU),
            base_radius: lerp(0.1, 0.7, radius_t.powf(0.6)),
            radial_offset: rng.random_range(-0.08..0.08),
            speed: lerp(0.1, 0.45, rng.random()),
            radial_drift: lerp(-0.12, 0.12, rng.random()),
            noise_offset: seed * 1000.0,
            position: (0.0, 0.0),
        }
    }
}

/// Orbiting-particle agent sized by the quality governor.
#[derive(Debug, Clone)]
pub struct DriftAgent {
    entities: Vec<Drifter>,
    budget: EntityBudget,
    policy: SurfacePolicy,
    css_size: (f64, f64),
    device_pixel_ratio: f64,
    surface: (u32, u32),
    level: String,
    time_ms: f64,
    rng: SmallRng,
}

impl DriftAgent {
    /// Build an agent populated for `settings` on a `css_size` layout box.
    ///
    /// `rng_seed` seeds entity spawning only; motion comes from the
    /// noise field passed to [`Self::update`].
    pub fn new(
        settings: &QualitySettings,
        policy: SurfacePolicy,
        css_size: (f64, f64),
        device_pixel_ratio: f64,
        rng_seed: u64,
    ) -> Self {
        let mut rng = SmallRng::seed_from_u64(rng_seed);
        let count = settings.max_entities;
        let entities = (0..count)
            .map(|i| Drifter::spawn(&mut rng, f64::from(i) / f64::from(count)))
            .collect();
        let surface = settings.backing_size(css_size.0, css_size.1, device_pixel_ratio, &policy);

        debug!(
            level = settings.level.as_str(),
            entities = count,
            width = surface.0,
            height = surface.1,
            "Drift agent created"
        );

        Self {
            entities,
            budget: EntityBudget::new(count),
            policy,
            css_size,
            device_pixel_ratio,
            surface,
            level: settings.level.clone(),
            time_ms: 0.0,
            rng,
        }
    }

    /// Resize the entity list and backing surface for new settings.
    pub fn apply_settings(&mut self, settings: &QualitySettings) -> BudgetChange {
        let change = self.budget.sync(settings);
        match change {
            BudgetChange::Grow(extra) => {
                for _ in 0..extra {
                    let seed: f64 = self.rng.random();
                    self.entities.push(Drifter::spawn(&mut self.rng, seed));
                }
            }
            BudgetChange::Shrink(_) => {
                let keep = usize::try_from(self.budget.current()).unwrap_or(usize::MAX);
                self.entities.truncate(keep);
            }
            BudgetChange::Unchanged => {}
        }

        self.surface = settings.backing_size(
            self.css_size.0,
            self.css_size.1,
            self.device_pixel_ratio,
            &self.policy,
        );
        self.level.clone_from(&settings.level);

        info!(
            level = settings.level.as_str(),
            entities = self.entities.len(),
            ?change,
            width = self.surface.0,
            height = self.surface.1,
            "Drift agent resized"
        );
        change
    }

    /// Advance every drifter by `dt_ms` of wall time.
    pub fn update(&mut self, field: &NoiseField, dt_ms: f64) {
        self.time_ms += dt_ms;
        let step = dt_ms / REFERENCE_FRAME_MS;
        let t = self.time_ms * TIME_SCALE;
        let (width, height) = self.css_size;
        let (cx, cy) = (width * 0.5, height * 0.5);
        let half_extent = width.min(height) * 0.5;

        for e in &mut self.entities {
            let wobble = field.fbm_2d(e.noise_offset, t, 3, 0.5, 2.0);
            e.angle = (e.speed * 0.12).mul_add(step, e.angle) + wobble * 0.02 * step;
            e.angle = e.angle.rem_euclid(TAU);

            e.base_radius = (e.radial_drift * 0.02).mul_add(step, e.base_radius);
            if e.base_radius > 1.1 {
                e.base_radius = 0.1;
            }
            if e.base_radius < 0.05 {
                e.base_radius = 0.9;
            }

            let breath = field.sample_3d(e.noise_offset, e.base_radius, t).mul_add(0.5, 0.5);
            let radius = e.radial_offset.mul_add(breath, e.base_radius) * half_extent;
            let (sin, cos) = e.angle.sin_cos();
            e.position = (cos.mul_add(radius, cx), sin.mul_add(radius, cy));
        }
    }

    /// Live drifters.
    pub fn entities(&self) -> &[Drifter] {
        &self.entities
    }

    /// Backing surface size in device pixels.
    pub const fn surface(&self) -> (u32, u32) {
        self.surface
    }

    /// Name of the tier the agent is currently sized for.
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Mean position of all drifters, or `None` with no drifters.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        let (sum_x, sum_y, count) = self
            .entities
            .iter()
            .fold((0.0, 0.0, 0.0), |(sx, sy, n), e| {
                (sx + e.position.0, sy + e.position.1, n + 1.0)
            });
        (count > 0.0).then_some((sum_x / count, sum_y / count))
    }

    /// Agent clock in milliseconds.
    pub const fn time_ms(&self) -> f64 {
        self.time_ms
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use backdrop_quality::QualityLevel;

    use super::*;

    fn settings(name: &str, scale: f64, max_entities: u32) -> QualitySettings {
        QualitySettings::from(&QualityLevel::new(name, scale, max_entities))
    }

    fn agent() -> DriftAgent {
        DriftAgent::new(
            &settings("high", 1.0, 220),
            SurfacePolicy::default(),
            (1280.0, 720.0),
            1.0,
            7,
        )
    }

    #[test]
    fn new_agent_fills_budget_and_sizes_surface() {
        let agent = agent();
        assert_eq!(agent.entities().len(), 220);
        assert_eq!(agent.surface(), (1280, 720));
        assert_eq!(agent.level(), "high");
    }

    #[test]
    fn apply_settings_shrinks_and_grows() {
        let mut agent = agent();
        let change = agent.apply_settings(&settings("medium", 0.85, 140));
        assert_eq!(change, BudgetChange::Shrink(80));
        assert_eq!(agent.entities().len(), 140);
        assert_eq!(agent.surface(), (1088, 612));
        assert_eq!(agent.level(), "medium");

        let change = agent.apply_settings(&settings("high", 1.0, 220));
        assert_eq!(change, BudgetChange::Grow(80));
        assert_eq!(agent.entities().len(), 220);
    }

    #[test]
    fn update_keeps_positions_finite_and_near_surface() {
        let field = NoiseField::new(42);
        let mut agent = agent();
        for _ in 0..120 {
            agent.update(&field, 16.67);
        }
        for e in agent.entities() {
            let (x, y) = e.position;
            assert!(x.is_finite() && y.is_finite());
            assert!((-100.0..=1380.0).contains(&x), "x = {x}");
            assert!((-100.0..=820.0).contains(&y), "y = {y}");
            assert!((0.05..=1.1).contains(&e.base_radius));
        }
        assert!((agent.time_ms() - 2000.4).abs() < 1e-6);

        let (cx, cy) = agent.centroid().unwrap();
        assert!((0.0..=1280.0).contains(&cx), "cx = {cx}");
        assert!((0.0..=720.0).contains(&cy), "cy = {cy}");
    }

    #[test]
    fn empty_agent_has_no_centroid() {
        let agent = DriftAgent::new(
            &settings("none", 1.0, 0),
            SurfacePolicy::default(),
            (100.0, 100.0),
            1.0,
            0,
        );
        assert!(agent.centroid().is_none());
    }

    #[test]
    fn motion_is_reproducible_for_a_seed() {
        let field = NoiseField::new(3);
        let mut a = agent();
        let mut b = agent();
        for _ in 0..30 {
            a.update(&field, 16.0);
            b.update(&field, 16.0);
        }
        assert_eq!(a.entities(), b.entities());
    }
}
