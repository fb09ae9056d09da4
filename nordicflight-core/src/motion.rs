use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use fastrand::Rng;

use crate::drone::DroneStatus;

pub const PATROL_RANGE: f64 = 120.0;
pub const PATROL_BASE_SPEED: f64 = 2.0;
pub const PATROL_SPEED_SCALE: f64 = 0.2;
pub const PATROL_MAX_PITCH: f64 = 0.15;

pub const CRITICAL_DRIFT_RANGE: f64 = 2.0;
pub const CRITICAL_DRIFT_SPEED: f64 = 0.5;
pub const CRITICAL_ROLL: f64 = 0.05;
pub const CRITICAL_ROLL_SPEED: f64 = 5.0;
pub const CRITICAL_PITCH: f64 = 0.1;
pub const CRITICAL_PITCH_SPEED: f64 = 2.0;

pub const BOB_AMPLITUDE: f64 = 0.05;
pub const BOB_SPEED: f64 = 3.0;

const PHASE_BUCKETS: u32 = 8;

/// Identity-derived animation phase. Computed once per drone and never re-rolled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSeed {
    index: u32,
}

impl PhaseSeed {
    pub fn from_id(id: &str) -> Self {
        let index = trailing_number(id).unwrap_or_else(|| {
            let mut hasher = DefaultHasher::new();
            id.hash(&mut hasher);
            Rng::with_seed(hasher.finish()).u32(0..PHASE_BUCKETS)
        });
        Self { index }
    }

    pub fn index(self) -> u32 {
        self.index
    }

    pub fn speed_multiplier(self) -> f64 {
        f64::from(self.index) * 0.5
    }

    pub fn bob_phase(self) -> f64 {
        f64::from(self.index)
    }

    /// Angular speed of the patrol sweep in radians per second.
    pub fn patrol_angular_speed(self) -> f64 {
        PATROL_SPEED_SCALE * (PATROL_BASE_SPEED + self.speed_multiplier())
    }
}

fn trailing_number(id: &str) -> Option<u32> {
    let digits_start = id
        .char_indices()
        .rev()
        .take_while(|(_, ch)| ch.is_ascii_digit())
        .last()
        .map(|(index, _)| index)?;
    id[digits_start..].parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionContext {
    pub anchor: [f32; 3],
    pub phase: PhaseSeed,
    pub elapsed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
}

impl MotionSample {
    fn at_anchor(ctx: &MotionContext) -> Self {
        Self {
            position: ctx.anchor,
            rotation: [0.0; 3],
        }
    }
}

pub type MotionPolicy = fn(&MotionContext) -> MotionSample;

/// Sweeps back and forth along z, pitching into the direction of travel.
pub fn patrol(ctx: &MotionContext) -> MotionSample {
    let angle = ctx.elapsed * ctx.phase.patrol_angular_speed();
    let mut sample = MotionSample::at_anchor(ctx);
    sample.position[2] = (f64::from(ctx.anchor[2]) + angle.sin() * PATROL_RANGE) as f32;
    sample.rotation[0] = (angle.cos() * PATROL_MAX_PITCH) as f32;
    sample
}

/// Stays near the anchor with a short drift plus roll and pitch jitter.
pub fn unstable_hover(ctx: &MotionContext) -> MotionSample {
    let t = ctx.elapsed;
    let mut sample = MotionSample::at_anchor(ctx);
    sample.position[2] =
        (f64::from(ctx.anchor[2]) + (t * CRITICAL_DRIFT_SPEED).sin() * CRITICAL_DRIFT_RANGE) as f32;
    sample.rotation[0] = ((t * CRITICAL_PITCH_SPEED).sin() * CRITICAL_PITCH) as f32;
    sample.rotation[2] = ((t * CRITICAL_ROLL_SPEED).sin() * CRITICAL_ROLL) as f32;
    sample
}

pub fn hold_position(ctx: &MotionContext) -> MotionSample {
    MotionSample::at_anchor(ctx)
}

/// Vertical offset applied on top of every policy.
pub fn bob_offset(phase: PhaseSeed, elapsed: f64) -> f64 {
    (elapsed * BOB_SPEED + phase.bob_phase()).sin() * BOB_AMPLITUDE
}

/// Status-keyed motion policies. Statuses without an entry hold position.
#[derive(Debug, Clone)]
pub struct MotionTable {
    policies: HashMap<DroneStatus, MotionPolicy>,
}

impl MotionTable {
    pub fn empty() -> Self {
        Self {
            policies: HashMap::new(),
        }
    }

    pub fn register(&mut self, status: DroneStatus, policy: MotionPolicy) -> &mut Self {
        self.policies.insert(status, policy);
        self
    }

    pub fn policy_for(&self, status: DroneStatus) -> MotionPolicy {
        self.policies
            .get(&status)
            .copied()
            .unwrap_or(hold_position)
    }

    pub fn sample(&self, status: DroneStatus, ctx: &MotionContext) -> MotionSample {
        let mut sample = (self.policy_for(status))(ctx);
        sample.position[1] =
            (f64::from(sample.position[1]) + bob_offset(ctx.phase, ctx.elapsed)) as f32;
        sample
    }
}

impl Default for MotionTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table
            .register(DroneStatus::Nominal, patrol)
            .register(DroneStatus::Degraded, patrol)
            .register(DroneStatus::Critical, unstable_hover)
            .register(DroneStatus::Returning, hold_position);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn ctx(id: &str, anchor: [f32; 3], elapsed: f64) -> MotionContext {
        MotionContext {
            anchor,
            phase: PhaseSeed::from_id(id),
            elapsed,
        }
    }

    fn distance(a: [f32; 3], b: [f32; 3]) -> f32 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f32>()
            .sqrt()
    }

    #[test]
    fn phase_seed_reads_trailing_digits() {
        assert_eq!(PhaseSeed::from_id("d3").index(), 3);
        assert_eq!(PhaseSeed::from_id("eagle-12").index(), 12);
        assert!((PhaseSeed::from_id("d2").patrol_angular_speed() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn phase_seed_is_stable_for_non_numeric_ids() {
        let first = PhaseSeed::from_id("falcon");
        let second = PhaseSeed::from_id("falcon");
        assert_eq!(first, second);
        assert!(first.index() < PHASE_BUCKETS);
    }

    #[test]
    fn patrol_is_periodic_and_finite() {
        let table = MotionTable::default();
        let anchor = [-8.0, 2.0, -2.0];
        let omega = PhaseSeed::from_id("d1").patrol_angular_speed();
        let period = TAU / omega;

        for step in 0..200 {
            let t = f64::from(step) * 0.37;
            let now = table.sample(DroneStatus::Degraded, &ctx("d1", anchor, t));
            let later = table.sample(DroneStatus::Degraded, &ctx("d1", anchor, t + period));
            assert!(now.position.iter().all(|v| v.is_finite()));
            assert!(distance(now.position, later.position) < 1e-2);
            assert_eq!(now.position[0], anchor[0]);
        }
    }

    #[test]
    fn patrol_pitch_follows_direction_of_travel() {
        let sample = patrol(&ctx("d2", [6.0, 3.0, 4.0], 0.0));
        assert!((sample.rotation[0] - PATROL_MAX_PITCH as f32).abs() < 1e-6);
        assert_eq!(sample.position, [6.0, 3.0, 4.0]);
    }

    #[test]
    fn critical_hover_stays_near_anchor() {
        let table = MotionTable::default();
        let anchor = [0.0, 1.8, 0.0];
        let bound = (CRITICAL_DRIFT_RANGE + BOB_AMPLITUDE) as f32 + 1e-4;

        for step in 0..2_000 {
            let t = f64::from(step) * 0.05;
            let sample = table.sample(DroneStatus::Critical, &ctx("d3", anchor, t));
            assert!(distance(sample.position, anchor) <= bound);
            assert!(sample.rotation[2].abs() <= CRITICAL_ROLL as f32);
            assert!(sample.rotation[0].abs() <= CRITICAL_PITCH as f32);
        }
    }

    #[test]
    fn returning_holds_position_apart_from_bobbing() {
        let table = MotionTable::default();
        let anchor = [4.0, 2.5, -6.0];
        let sample = table.sample(DroneStatus::Returning, &ctx("d4", anchor, 12.5));
        assert_eq!(sample.position[0], anchor[0]);
        assert_eq!(sample.position[2], anchor[2]);
        assert!((sample.position[1] - anchor[1]).abs() <= BOB_AMPLITUDE as f32 + 1e-6);
        assert_eq!(sample.rotation, [0.0; 3]);
    }

    #[test]
    fn unregistered_status_falls_back_to_hold() {
        let table = MotionTable::empty();
        let sample = table.sample(DroneStatus::Nominal, &ctx("d1", [1.0, 0.0, 1.0], 3.0));
        assert_eq!(sample.position[2], 1.0);
    }

    #[test]
    fn registered_policy_overrides_default() {
        let mut table = MotionTable::default();
        table.register(DroneStatus::Critical, hold_position);
        let sample = table.sample(DroneStatus::Critical, &ctx("d3", [0.0, 0.0, 0.0], 3.0));
        assert_eq!(sample.position[2], 0.0);
    }
}
