use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::drone::{Drone, DroneStatus};
use crate::telemetry::{Alert, LogEntry, Weather};

const DEFAULT_FLEET: &str = include_str!("../fixtures/fleet.json");

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode fixture data: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("duplicate drone id `{0}`")]
    DuplicateDrone(String),
    #[error("alert `{alert}` refers to unknown callsign `{code}`")]
    UnknownAlertTarget { alert: String, code: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DroneRecord {
    id: String,
    callsign: String,
    status: DroneStatus,
    position: [f32; 3],
    heading: f32,
    battery: f32, // percent
    velocity: f32,
}

impl From<DroneRecord> for Drone {
    fn from(record: DroneRecord) -> Self {
        Drone::new(record.id, record.callsign, record.status, record.position).with_telemetry(
            record.heading,
            record.battery / 100.0,
            record.velocity,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
struct FixtureFile {
    weather: Weather,
    alerts: Vec<Alert>,
    drones: Vec<DroneRecord>,
    logs: Vec<LogEntry>,
}

/// Static data the console starts from.
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub weather: Weather,
    pub alerts: Vec<Alert>,
    pub drones: Vec<Drone>,
    pub logs: Vec<LogEntry>,
}

impl Fixtures {
    pub fn load_default() -> Result<Self, FixtureError> {
        Self::from_json(DEFAULT_FLEET)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, FixtureError> {
        let file: FixtureFile = serde_json::from_str(raw)?;

        let mut seen = HashSet::new();
        for record in &file.drones {
            if !seen.insert(record.id.as_str()) {
                return Err(FixtureError::DuplicateDrone(record.id.clone()));
            }
        }

        let callsigns: HashSet<&str> = file
            .drones
            .iter()
            .map(|record| record.callsign.as_str())
            .collect();
        if let Some(alert) = file
            .alerts
            .iter()
            .find(|alert| !callsigns.contains(alert.code.as_str()))
        {
            return Err(FixtureError::UnknownAlertTarget {
                alert: alert.id.clone(),
                code: alert.code.clone(),
            });
        }

        let fixtures = Self {
            weather: file.weather,
            alerts: file.alerts,
            drones: file.drones.into_iter().map(Drone::from).collect(),
            logs: file.logs,
        };
        info!(
            drones = fixtures.drones.len(),
            alerts = fixtures.alerts.len(),
            logs = fixtures.logs.len(),
            "fixtures loaded"
        );
        Ok(fixtures)
    }

    pub fn drone_by_callsign(&self, callsign: &str) -> Option<&Drone> {
        self.drones.iter().find(|drone| drone.callsign == callsign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{LogLevel, Severity};

    #[test]
    fn default_fleet_loads() {
        let fixtures = Fixtures::load_default().unwrap();
        assert_eq!(fixtures.drones.len(), 3);
        assert_eq!(fixtures.alerts.len(), 3);
        assert_eq!(fixtures.logs.len(), 6);
        assert_eq!(fixtures.weather.wind_direction, "E/SE");

        let eagle_three = fixtures.drone_by_callsign("EAGLE-03").unwrap();
        assert_eq!(eagle_three.id, "d3");
        assert_eq!(eagle_three.status, DroneStatus::Critical);
        assert_eq!(eagle_three.position, [0.0, 1.8, 0.0]);
        assert!((eagle_three.battery - 0.78).abs() < 1e-6);

        assert_eq!(fixtures.alerts[0].severity, Severity::Critical);
        assert_eq!(fixtures.logs[4].level, LogLevel::Err);
    }

    #[test]
    fn rejects_alert_for_unknown_callsign() {
        let raw = r#"{
            "weather": {"wind_speed": 1.0, "wind_direction": "N", "visibility": 100, "temp": 0.0},
            "alerts": [{"id": "9", "code": "HAWK-09", "severity": "INFO",
                        "message": "m", "details": "d", "timestamp": "00:00"}],
            "drones": [],
            "logs": []
        }"#;
        match Fixtures::from_json(raw) {
            Err(FixtureError::UnknownAlertTarget { alert, code }) => {
                assert_eq!(alert, "9");
                assert_eq!(code, "HAWK-09");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_drone_ids() {
        let raw = r#"{
            "weather": {"wind_speed": 1.0, "wind_direction": "N", "visibility": 100, "temp": 0.0},
            "alerts": [],
            "drones": [
                {"id": "d1", "callsign": "A", "status": "RTB", "position": [0, 0, 0],
                 "heading": 0, "battery": 50, "velocity": 0},
                {"id": "d1", "callsign": "B", "status": "RTB", "position": [0, 0, 0],
                 "heading": 0, "battery": 50, "velocity": 0}
            ],
            "logs": []
        }"#;
        assert!(matches!(
            Fixtures::from_json(raw),
            Err(FixtureError::DuplicateDrone(id)) if id == "d1"
        ));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert!(matches!(
            Fixtures::from_json("{"),
            Err(FixtureError::Decode(_))
        ));
    }
}
