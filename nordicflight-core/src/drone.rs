use serde::{Deserialize, Serialize};

pub type DroneId = String;

/// Battery fraction below which the fleet list flags a drone.
pub const LOW_BATTERY_FRACTION: f32 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DroneStatus {
    #[serde(rename = "OPERATIONAL")]
    Nominal,
    #[serde(rename = "WARNING")]
    Degraded,
    #[serde(rename = "CRITICAL")]
    Critical,
    #[serde(rename = "RTB")]
    Returning,
}

impl DroneStatus {
    pub const ALL: [DroneStatus; 4] = [
        DroneStatus::Nominal,
        DroneStatus::Degraded,
        DroneStatus::Critical,
        DroneStatus::Returning,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DroneStatus::Nominal => "OPERATIONAL",
            DroneStatus::Degraded => "WARNING",
            DroneStatus::Critical => "CRITICAL",
            DroneStatus::Returning => "RTB",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drone {
    pub id: DroneId,
    pub callsign: String,
    pub status: DroneStatus,
    pub position: [f32; 3], // scene units, y is altitude
    pub rotation: [f32; 3], // pitch, yaw, roll in radians
    pub heading: f32,       // degrees, display only
    pub battery: f32,       // fraction in 0..=1
    pub speed: f32,         // m/s
}

impl Drone {
    pub fn new(
        id: impl Into<DroneId>,
        callsign: impl Into<String>,
        status: DroneStatus,
        position: [f32; 3],
    ) -> Self {
        Self {
            id: id.into(),
            callsign: callsign.into(),
            status,
            position,
            rotation: [0.0; 3],
            heading: 0.0,
            battery: 1.0,
            speed: 0.0,
        }
    }

    pub fn with_telemetry(mut self, heading: f32, battery: f32, speed: f32) -> Self {
        self.heading = heading;
        self.battery = battery.clamp(0.0, 1.0);
        self.speed = speed;
        self
    }

    pub fn battery_percent(&self) -> u32 {
        (self.battery * 100.0).round() as u32
    }

    pub fn battery_low(&self) -> bool {
        self.battery < LOW_BATTERY_FRACTION
    }

    pub fn is_critical(&self) -> bool {
        self.status == DroneStatus::Critical
    }
}
