use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const KNOTS_PER_MPS: f32 = 1.94384;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn wind_speed(self, mps: f32) -> String {
        match self {
            UnitSystem::Metric => format!("{mps} m/s"),
            UnitSystem::Imperial => format!("{:.1} kts", mps * KNOTS_PER_MPS),
        }
    }

    pub fn temperature(self, celsius: f32) -> String {
        match self {
            UnitSystem::Metric => format!("{celsius}°C"),
            UnitSystem::Imperial => format!("{:.1}°F", celsius_to_fahrenheit(celsius)),
        }
    }

    /// Whole-degree temperature used by the schematic read-outs.
    pub fn rounded_temperature(self, celsius: f32) -> String {
        match self {
            UnitSystem::Metric => format!("{}°C", celsius.round()),
            UnitSystem::Imperial => format!("{}°F", celsius_to_fahrenheit(celsius).round()),
        }
    }

    pub fn cruise_altitude(self) -> &'static str {
        match self {
            UnitSystem::Metric => "46m",
            UnitSystem::Imperial => "150ft",
        }
    }
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            other => Err(format!("unknown unit system `{other}`")),
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_wind_speed() {
        assert_eq!(UnitSystem::Metric.wind_speed(18.5), "18.5 m/s");
        assert_eq!(UnitSystem::Imperial.wind_speed(18.5), "36.0 kts");
    }

    #[test]
    fn formats_temperature() {
        assert_eq!(UnitSystem::Metric.temperature(4.2), "4.2°C");
        assert_eq!(UnitSystem::Imperial.temperature(4.2), "39.6°F");
        assert_eq!(UnitSystem::Imperial.rounded_temperature(62.0), "144°F");
        assert_eq!(UnitSystem::Metric.rounded_temperature(45.0), "45°C");
    }

    #[test]
    fn parses_and_toggles() {
        assert_eq!("Imperial".parse::<UnitSystem>(), Ok(UnitSystem::Imperial));
        assert!("furlongs".parse::<UnitSystem>().is_err());
        assert_eq!(UnitSystem::Metric.toggled(), UnitSystem::Imperial);
    }
}
