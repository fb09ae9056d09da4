use macroquad::prelude::*;
use nordicflight_core::{DroneStatus, LogLevel, Severity};

pub const SELECTION_BLUE: Color = Color::from_rgba(59, 130, 246, 255);
pub const CRITICAL_RED: Color = Color::from_rgba(220, 38, 38, 255);
pub const WARNING_AMBER: Color = Color::from_rgba(245, 158, 11, 255);
pub const HEALTHY_GREEN: Color = Color::from_rgba(16, 185, 129, 255);
pub const MUTED_GRAY: Color = Color::from_rgba(107, 114, 128, 255);

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub panel: Color,
    pub panel_border: Color,
    pub text: Color,
    pub text_muted: Color,
    pub grid: Color,
    pub grid_section: Color,
    pub rail: Color,
    pub sleeper: Color,
    pub nominal_body: Color,
}

impl Theme {
    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self {
                background: Color::from_rgba(17, 24, 39, 255),
                panel: Color::from_rgba(31, 41, 55, 235),
                panel_border: Color::from_rgba(55, 65, 81, 255),
                text: Color::from_rgba(229, 231, 235, 255),
                text_muted: Color::from_rgba(156, 163, 175, 255),
                grid: Color::from_rgba(55, 65, 81, 255),
                grid_section: Color::from_rgba(75, 85, 99, 255),
                rail: Color::from_rgba(107, 114, 128, 255),
                sleeper: Color::from_rgba(31, 41, 55, 255),
                nominal_body: Color::from_rgba(156, 163, 175, 255),
            }
        } else {
            Self {
                background: Color::from_rgba(249, 250, 251, 255),
                panel: Color::from_rgba(255, 255, 255, 235),
                panel_border: Color::from_rgba(229, 231, 235, 255),
                text: Color::from_rgba(17, 24, 39, 255),
                text_muted: Color::from_rgba(107, 114, 128, 255),
                grid: Color::from_rgba(229, 231, 235, 255),
                grid_section: Color::from_rgba(209, 213, 219, 255),
                rail: Color::from_rgba(55, 65, 81, 255),
                sleeper: Color::from_rgba(209, 213, 219, 255),
                nominal_body: Color::from_rgba(55, 65, 81, 255),
            }
        }
    }

    pub fn drone_body(&self, status: DroneStatus) -> Color {
        match status {
            DroneStatus::Critical => CRITICAL_RED,
            DroneStatus::Degraded => WARNING_AMBER,
            DroneStatus::Nominal | DroneStatus::Returning => self.nominal_body,
        }
    }

    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Critical => CRITICAL_RED,
            Severity::Warning => WARNING_AMBER,
            Severity::Info => self.text_muted,
        }
    }

    pub fn log_level(&self, level: LogLevel) -> Color {
        match level {
            LogLevel::Err => CRITICAL_RED,
            LogLevel::Warn => WARNING_AMBER,
            LogLevel::Sys => SELECTION_BLUE,
            LogLevel::Info => self.text_muted,
        }
    }
}
