pub mod driver;
pub mod drone;
pub mod fixtures;
pub mod heading;
pub mod motion;
pub mod readouts;
pub mod risk;
pub mod selection;
pub mod settings;
pub mod telemetry;
pub mod units;

pub use driver::{
    DrawingSurface, DroneFrame, Frame, FrameSummary, HeadlessSurface, RenderLoopDriver,
    SimulationClock, SimulationState,
};
pub use drone::{Drone, DroneId, DroneStatus};
pub use fixtures::{FixtureError, Fixtures};
pub use heading::{AzimuthSource, HeadingTracker, ViewHeading};
pub use motion::{MotionContext, MotionPolicy, MotionSample, MotionTable, PhaseSeed};
pub use readouts::{COMPLIANCE_SCORE, ComplianceBand, SchematicReadout};
pub use risk::{EMPTY_SUMMARY, FALLBACK_SUMMARY, RiskSnapshot, summary_or_fallback};
pub use selection::{DerivedCoordinate, SelectionProjector, SelectionState, TrackingStatus};
pub use settings::{DisplaySettings, SettingsError};
pub use telemetry::{Alert, LogEntry, LogLevel, Severity, Weather};
pub use units::UnitSystem;
