use std::fmt;

use tracing::warn;

use crate::drone::Drone;
use crate::readouts::{COMPLIANCE_SCORE, ComplianceBand};
use crate::telemetry::{Alert, Weather};

pub const FALLBACK_SUMMARY: &str = "SYSTEM ERROR: UNABLE TO CONNECT TO AI SAFETY MODULE.";
pub const EMPTY_SUMMARY: &str = "UNABLE TO GENERATE ANALYSIS.";

/// Fleet state the risk prompt is built from.
#[derive(Debug, Clone, Copy)]
pub struct RiskSnapshot<'a> {
    pub drones: &'a [Drone],
    pub weather: &'a Weather,
    pub alerts: &'a [Alert],
    pub compliance_score: u32,
}

impl<'a> RiskSnapshot<'a> {
    pub fn new(drones: &'a [Drone], weather: &'a Weather, alerts: &'a [Alert]) -> Self {
        Self {
            drones,
            weather,
            alerts,
            compliance_score: COMPLIANCE_SCORE,
        }
    }

    pub fn prompt(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RiskSnapshot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alerts = self
            .alerts
            .iter()
            .map(|alert| format!("{}: {} ({})", alert.code, alert.message, alert.severity.label()))
            .collect::<Vec<_>>()
            .join("; ");
        let drones = self
            .drones
            .iter()
            .map(|drone| {
                format!(
                    "{} Bat:{}% Stat:{}",
                    drone.callsign,
                    drone.battery_percent(),
                    drone.status.label()
                )
            })
            .collect::<Vec<_>>()
            .join("; ");

        writeln!(f, "You are the AI Safety Officer for NordicFlight Ops.")?;
        writeln!(f, "Current Telemetry:")?;
        writeln!(
            f,
            "- Weather: Wind {} m/s {}, Temp {}C.",
            self.weather.wind_speed, self.weather.wind_direction, self.weather.temp
        )?;
        writeln!(
            f,
            "- Compliance Score: {} ({}).",
            self.compliance_score,
            ComplianceBand::for_score(self.compliance_score).label()
        )?;
        writeln!(f, "- Active Alerts: {alerts}")?;
        writeln!(f, "- Drones: {drones}")?;

        let mut critical = self
            .drones
            .iter()
            .filter(|drone| drone.is_critical())
            .peekable();
        if critical.peek().is_some() {
            writeln!(f)?;
        }
        for drone in critical {
            let reason = self
                .alerts
                .iter()
                .find(|alert| alert.code == drone.callsign)
                .map(|alert| alert.message.to_lowercase())
                .unwrap_or_else(|| "an unresolved fault".to_string());
            writeln!(
                f,
                "{} is in a CRITICAL state with {} and high wind exposure.",
                drone.callsign, reason
            )?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "Provide a concise, 3-bullet point tactical executive summary \
             for the Flight Controller."
        )?;
        writeln!(
            f,
            "Focus on immediate risk mitigation and RTH (Return To Home) verification."
        )?;
        write!(f, "Use industrial, authoritative language.")
    }
}

/// Collapses a generative-text result into what the console shows.
pub fn summary_or_fallback<E: fmt::Display>(result: Result<String, E>) -> String {
    match result {
        Ok(text) if text.trim().is_empty() => EMPTY_SUMMARY.to_string(),
        Ok(text) => text,
        Err(err) => {
            warn!(%err, "risk analysis failed");
            FALLBACK_SUMMARY.to_string()
        }
    }
}
