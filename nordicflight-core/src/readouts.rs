use crate::drone::{Drone, DroneStatus};
use crate::units::UnitSystem;

pub const COMPLIANCE_SCORE: u32 = 72;

const NOMINAL_MOTOR_RPM: u32 = 4200;
const NOMINAL_ESC_TEMP_C: f32 = 45.0;
const CRITICAL_ESC_TEMP_C: f32 = 62.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceBand {
    Nominal,
    Hazardous,
    Critical,
}

impl ComplianceBand {
    pub fn for_score(score: u32) -> Self {
        match score {
            85.. => ComplianceBand::Nominal,
            50..=84 => ComplianceBand::Hazardous,
            _ => ComplianceBand::Critical,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComplianceBand::Nominal => "Nominal",
            ComplianceBand::Hazardous => "Hazardous",
            ComplianceBand::Critical => "Critical",
        }
    }
}

/// Telemetry tiles shown on the schematic panel for the selected drone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchematicReadout {
    pub callsign: String,
    pub motor_rpm: String,
    pub esc_temp: String,
    pub airspeed: String,
    pub payload: &'static str,
    pub alarm: bool,
}

impl SchematicReadout {
    pub fn for_drone(drone: &Drone, units: UnitSystem) -> Self {
        let motor_rpm = if drone.status == DroneStatus::Nominal {
            NOMINAL_MOTOR_RPM.to_string()
        } else {
            "VAR".to_string()
        };
        let esc_celsius = if drone.is_critical() {
            CRITICAL_ESC_TEMP_C
        } else {
            NOMINAL_ESC_TEMP_C
        };

        Self {
            callsign: drone.callsign.clone(),
            motor_rpm,
            esc_temp: units.rounded_temperature(esc_celsius),
            airspeed: format!("{} m/s", drone.speed),
            payload: "OPTICAL",
            alarm: drone.is_critical(),
        }
    }
}
