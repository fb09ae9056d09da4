use tracing::debug;

use crate::drone::{Drone, DroneStatus};
use crate::heading::{AzimuthSource, HeadingTracker, ViewHeading};
use crate::motion::{MotionContext, MotionTable, PhaseSeed};
use crate::selection::{DerivedCoordinate, SelectionProjector, SelectionState};

/// Elapsed simulation time in seconds. Never moves backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationClock {
    elapsed: f64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn advance_to(&mut self, elapsed: f64) -> f64 {
        if elapsed.is_finite() && elapsed > self.elapsed {
            self.elapsed = elapsed;
        }
        self.elapsed
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Anchor {
    position: [f32; 3],
    phase: PhaseSeed,
}

/// Everything the per-frame update mutates, owned by the driver.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub frame: u64,
    drones: Vec<Drone>,
    anchors: Vec<Anchor>,
    selection: SelectionState,
}

impl SimulationState {
    pub fn new(drones: Vec<Drone>) -> Self {
        let anchors = drones
            .iter()
            .map(|drone| Anchor {
                position: drone.position,
                phase: PhaseSeed::from_id(&drone.id),
            })
            .collect();
        Self {
            frame: 0,
            drones,
            anchors,
            selection: SelectionState::new(),
        }
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn drone(&self, id: &str) -> Option<&Drone> {
        self.drones.iter().find(|drone| drone.id == id)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selected_drone(&self) -> Option<&Drone> {
        self.selection.resolve(&self.drones)
    }

    pub fn anchor(&self, index: usize) -> Option<[f32; 3]> {
        self.anchors.get(index).map(|anchor| anchor.position)
    }

    fn apply_motion(&mut self, motion: &MotionTable, elapsed: f64) {
        for (drone, anchor) in self.drones.iter_mut().zip(self.anchors.iter()) {
            let ctx = MotionContext {
                anchor: anchor.position,
                phase: anchor.phase,
                elapsed,
            };
            let sample = motion.sample(drone.status, &ctx);
            drone.position = sample.position;
            drone.rotation = sample.rotation;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DroneFrame {
    pub id: String,
    pub callsign: String,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub status: DroneStatus,
    pub selected: bool,
}

/// What the drawing surface receives for a single frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub index: u64,
    pub elapsed: f64,
    pub drones: &'a [DroneFrame],
    pub coordinate: DerivedCoordinate,
    pub heading: ViewHeading,
}

pub trait DrawingSurface {
    fn draw_frame(&mut self, frame: &Frame<'_>);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSummary {
    pub index: u64,
    pub elapsed: f64,
    pub coordinate: DerivedCoordinate,
    pub heading: ViewHeading,
}

pub struct RenderLoopDriver {
    state: SimulationState,
    clock: SimulationClock,
    motion: MotionTable,
    projector: SelectionProjector,
    heading: HeadingTracker,
    scratch: Vec<DroneFrame>,
}

impl RenderLoopDriver {
    pub fn new(drones: Vec<Drone>) -> Self {
        Self::with_motion(drones, MotionTable::default())
    }

    pub fn with_motion(drones: Vec<Drone>, motion: MotionTable) -> Self {
        let scratch = Vec::with_capacity(drones.len());
        Self {
            state: SimulationState::new(drones),
            clock: SimulationClock::new(),
            motion,
            projector: SelectionProjector::new(),
            heading: HeadingTracker::new(),
            scratch,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn clock(&self) -> SimulationClock {
        self.clock
    }

    pub fn coordinate(&self) -> DerivedCoordinate {
        self.projector.last()
    }

    pub fn heading(&self) -> ViewHeading {
        self.heading.current()
    }

    pub fn select(&mut self, id: impl Into<String>) {
        let id = id.into();
        debug!(drone = %id, "selection changed");
        self.state.selection.select(id);
    }

    pub fn clear_selection(&mut self) {
        if self.state.selection.selected_id().is_some() {
            debug!("selection cleared");
        }
        self.state.selection.clear();
    }

    /// Selects the drone at `index` in fleet order, or clears when out of range.
    pub fn select_index(&mut self, index: usize) {
        match self.state.drones.get(index).map(|drone| drone.id.clone()) {
            Some(id) => self.select(id),
            None => self.clear_selection(),
        }
    }

    pub fn frame<C, S>(&mut self, elapsed: f64, controls: &C, surface: &mut S) -> FrameSummary
    where
        C: AzimuthSource + ?Sized,
        S: DrawingSurface + ?Sized,
    {
        let elapsed = self.clock.advance_to(elapsed);
        self.state.apply_motion(&self.motion, elapsed);
        let coordinate = self
            .projector
            .project(&self.state.selection, &self.state.drones);
        let heading = self.heading.observe(controls);

        self.scratch.clear();
        for drone in &self.state.drones {
            self.scratch.push(DroneFrame {
                id: drone.id.clone(),
                callsign: drone.callsign.clone(),
                position: drone.position,
                rotation: drone.rotation,
                status: drone.status,
                selected: self.state.selection.is_selected(&drone.id),
            });
        }

        let index = self.state.frame;
        surface.draw_frame(&Frame {
            index,
            elapsed,
            drones: &self.scratch,
            coordinate,
            heading,
        });
        self.state.frame += 1;

        FrameSummary {
            index,
            elapsed,
            coordinate,
            heading,
        }
    }
}

/// Drawing surface that discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessSurface;

impl DrawingSurface for HeadlessSurface {
    fn draw_frame(&mut self, _frame: &Frame<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::TrackingStatus;

    #[derive(Default)]
    struct RecordingSurface {
        frames: Vec<(u64, usize, Option<String>)>,
    }

    impl DrawingSurface for RecordingSurface {
        fn draw_frame(&mut self, frame: &Frame<'_>) {
            let selected = frame
                .drones
                .iter()
                .find(|drone| drone.selected)
                .map(|drone| drone.id.clone());
            self.frames.push((frame.index, frame.drones.len(), selected));
        }
    }

    fn fleet() -> Vec<Drone> {
        vec![
            Drone::new("d1", "EAGLE-01", DroneStatus::Degraded, [-8.0, 2.0, -2.0]),
            Drone::new("d3", "EAGLE-03", DroneStatus::Critical, [0.0, 1.8, 0.0]),
        ]
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut clock = SimulationClock::new();
        assert_eq!(clock.advance_to(2.0), 2.0);
        assert_eq!(clock.advance_to(1.0), 2.0);
        assert_eq!(clock.advance_to(f64::NAN), 2.0);
        assert_eq!(clock.advance_to(2.5), 2.5);
    }

    #[test]
    fn frame_hands_every_drone_to_surface() {
        let mut driver = RenderLoopDriver::new(fleet());
        let mut surface = RecordingSurface::default();
        driver.select("d3");

        driver.frame(0.0, &0.0_f32, &mut surface);
        driver.frame(0.016, &0.0_f32, &mut surface);

        assert_eq!(
            surface.frames,
            vec![
                (0, 2, Some("d3".to_string())),
                (1, 2, Some("d3".to_string())),
            ]
        );
        assert_eq!(driver.state().frame, 2);
    }

    #[test]
    fn motion_is_driven_by_clock_not_frame_count() {
        let mut stepped = RenderLoopDriver::new(fleet());
        for step in 0..=20 {
            stepped.frame(f64::from(step) * 0.25, &0.0_f32, &mut HeadlessSurface);
        }

        let mut jumped = RenderLoopDriver::new(fleet());
        jumped.frame(5.0, &0.0_f32, &mut HeadlessSurface);

        assert_eq!(stepped.state().drones(), jumped.state().drones());
    }

    #[test]
    fn anchors_survive_motion() {
        let mut driver = RenderLoopDriver::new(fleet());
        driver.frame(3.0, &0.0_f32, &mut HeadlessSurface);
        assert_eq!(driver.state().anchor(0), Some([-8.0, 2.0, -2.0]));
        assert_ne!(driver.state().drones()[0].position, [-8.0, 2.0, -2.0]);
    }

    #[test]
    fn select_index_out_of_range_clears() {
        let mut driver = RenderLoopDriver::new(fleet());
        driver.select_index(1);
        assert_eq!(driver.state().selection().selected_id(), Some("d3"));

        driver.select_index(9);
        let summary = driver.frame(0.0, &0.0_f32, &mut HeadlessSurface);
        assert_eq!(summary.coordinate.status, TrackingStatus::Scanning);
    }
}
