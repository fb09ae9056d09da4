use macroquad::prelude::*;
use nordicflight_core::telemetry::{has_critical, sorted_by_severity};
use nordicflight_core::{
    Alert, COMPLIANCE_SCORE, ComplianceBand, DerivedCoordinate, DisplaySettings, Drone,
    LogEntry, SchematicReadout, ViewHeading, Weather,
};

use crate::theme::{CRITICAL_RED, HEALTHY_GREEN, SELECTION_BLUE, Theme, WARNING_AMBER};

const HEADER_HEIGHT: f32 = 48.0;
const SIDEBAR_WIDTH: f32 = 260.0;
const ALERTS_WIDTH: f32 = 300.0;
const LOGS_HEIGHT: f32 = 130.0;
const PADDING: f32 = 12.0;
const FLEET_LIST_TOP: f32 = 190.0;
const FLEET_ROW_HEIGHT: f32 = 56.0;
const FONT_SMALL: f32 = 14.0;
const FONT_BODY: f32 = 18.0;
const FONT_TITLE: f32 = 22.0;
// Approximate advance of the default font at FONT_SMALL.
const SMALL_CHAR_WIDTH: f32 = 7.0;
const COMPASS_RADIUS: f32 = 20.0;
const BELL_RADIUS: f32 = 7.0;
const BELL_HIT_RADIUS: f32 = 14.0;

/// Screen regions of the console. The map fills whatever the panels leave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudLayout {
    pub header: Rect,
    pub sidebar: Rect,
    pub alerts: Rect,
    pub logs: Rect,
    pub map: Rect,
}

impl HudLayout {
    pub fn for_screen(width: f32, height: f32) -> Self {
        let body_height = (height - HEADER_HEIGHT).max(0.0);
        let map_width = (width - SIDEBAR_WIDTH - ALERTS_WIDTH).max(0.0);
        let map_height = (body_height - LOGS_HEIGHT).max(0.0);
        Self {
            header: Rect::new(0.0, 0.0, width, HEADER_HEIGHT),
            sidebar: Rect::new(0.0, HEADER_HEIGHT, SIDEBAR_WIDTH, body_height),
            alerts: Rect::new(width - ALERTS_WIDTH, HEADER_HEIGHT, ALERTS_WIDTH, body_height),
            logs: Rect::new(SIDEBAR_WIDTH, HEADER_HEIGHT + map_height, map_width, LOGS_HEIGHT),
            map: Rect::new(SIDEBAR_WIDTH, HEADER_HEIGHT, map_width, map_height),
        }
    }

    pub fn fleet_row(&self, index: usize) -> Rect {
        Rect::new(
            self.sidebar.x + PADDING,
            self.sidebar.y + FLEET_LIST_TOP + index as f32 * FLEET_ROW_HEIGHT,
            self.sidebar.w - PADDING * 2.0,
            FLEET_ROW_HEIGHT - 6.0,
        )
    }

    pub fn fleet_row_at(&self, point: Vec2, drone_count: usize) -> Option<usize> {
        (0..drone_count).find(|&index| self.fleet_row(index).contains(point))
    }

    pub fn bell_center(&self) -> Vec2 {
        vec2(
            self.header.x + self.header.w - PADDING - 180.0,
            self.header.y + self.header.h * 0.5,
        )
    }

    pub fn over_bell(&self, point: Vec2) -> bool {
        self.bell_center().distance(point) <= BELL_HIT_RADIUS
    }

    pub fn over_panel(&self, point: Vec2) -> bool {
        [self.header, self.sidebar, self.alerts, self.logs]
            .iter()
            .any(|panel| panel.contains(point))
    }
}

/// Everything the overlay panels read for one frame.
pub struct HudView<'a> {
    pub theme: &'a Theme,
    pub settings: DisplaySettings,
    pub weather: &'a Weather,
    pub alerts: &'a [Alert],
    pub logs: &'a [LogEntry],
    pub drones: &'a [Drone],
    pub selected: Option<&'a Drone>,
    pub coordinate: DerivedCoordinate,
    pub heading: ViewHeading,
    pub risk_summary: Option<&'a str>,
    pub risk_pending: bool,
    pub utc_seconds: f64,
    pub fps: f32,
}

pub fn draw_hud(layout: &HudLayout, view: &HudView<'_>) {
    draw_header(layout, view);
    draw_fleet_sidebar(layout, view);
    draw_alert_panel(layout.alerts, view);
    draw_logs(layout.logs, view);
    draw_compass(layout.map, view);
    draw_tracking_panel(layout.map, view);
}

fn draw_panel(rect: Rect, theme: &Theme) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, theme.panel);
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, theme.panel_border);
}

fn draw_header(layout: &HudLayout, view: &HudView<'_>) {
    let rect = layout.header;
    let theme = view.theme;
    draw_panel(rect, theme);
    let baseline = rect.y + rect.h * 0.5 + 7.0;

    draw_text("NORDICFLIGHT", rect.x + PADDING, baseline, FONT_TITLE, theme.text);
    draw_text("OPS", rect.x + PADDING + 150.0, baseline, FONT_TITLE, SELECTION_BLUE);

    let weather = view.weather;
    let units = view.settings.units;
    let conditions = format!(
        "WIND {} {}   VIS {}m   TEMP {}",
        units.wind_speed(weather.wind_speed),
        weather.wind_direction,
        weather.visibility,
        units.temperature(weather.temp),
    );
    draw_text(&conditions, rect.x + 260.0, baseline, FONT_BODY, theme.text_muted);

    let clock = format!("{} UTC", utc_clock(view.utc_seconds));
    let right = rect.x + rect.w - PADDING;
    draw_text(&clock, right - 150.0, baseline, FONT_BODY, theme.text);

    // Alarm bell: filled when any alert is critical.
    let bell = layout.bell_center();
    if has_critical(view.alerts) {
        let pulse = 0.6 + 0.4 * ((view.utc_seconds * 4.0).sin() as f32).abs();
        draw_circle(bell.x, bell.y, BELL_RADIUS, Color { a: pulse, ..CRITICAL_RED });
    } else {
        draw_circle_lines(bell.x, bell.y, BELL_RADIUS, 1.5, theme.text_muted);
    }
    let sound_label = if view.settings.sound { "SND ON" } else { "SND OFF" };
    draw_text(
        sound_label,
        bell.x - 24.0,
        rect.y + rect.h - 4.0,
        FONT_SMALL - 4.0,
        theme.text_muted,
    );

    draw_text(
        &format!("{:.0} fps", view.fps),
        right - 240.0,
        baseline,
        FONT_SMALL,
        theme.text_muted,
    );
}

fn compliance_color(band: ComplianceBand) -> Color {
    match band {
        ComplianceBand::Nominal => HEALTHY_GREEN,
        ComplianceBand::Hazardous => WARNING_AMBER,
        ComplianceBand::Critical => CRITICAL_RED,
    }
}

fn draw_fleet_sidebar(layout: &HudLayout, view: &HudView<'_>) {
    let theme = view.theme;
    let rect = layout.sidebar;
    draw_panel(rect, theme);

    let x = rect.x + PADDING;
    draw_text("COMPLIANCE SCORE", x, rect.y + 28.0, FONT_SMALL, theme.text_muted);

    let band = ComplianceBand::for_score(COMPLIANCE_SCORE);
    let color = compliance_color(band);
    let center = vec2(rect.x + rect.w * 0.5, rect.y + 100.0);
    let sweep = 360.0 * COMPLIANCE_SCORE as f32 / 100.0;
    draw_circle_lines(center.x, center.y, 48.0, 6.0, theme.panel_border);
    draw_arc(center.x, center.y, 48, 45.0, -90.0, 6.0, sweep, color);
    let score = COMPLIANCE_SCORE.to_string();
    draw_text(&score, center.x - 14.0, center.y + 8.0, FONT_TITLE + 6.0, theme.text);
    draw_text(
        &band.label().to_ascii_uppercase(),
        center.x - 40.0,
        center.y + 70.0,
        FONT_SMALL,
        color,
    );

    draw_text(
        "FLEET STATUS",
        x,
        rect.y + FLEET_LIST_TOP - 10.0,
        FONT_SMALL,
        theme.text_muted,
    );

    for (index, drone) in view.drones.iter().enumerate() {
        let row = layout.fleet_row(index);
        let selected = view.selected.is_some_and(|current| current.id == drone.id);
        let border = if selected { SELECTION_BLUE } else { theme.panel_border };
        draw_rectangle_lines(row.x, row.y, row.w, row.h, if selected { 2.0 } else { 1.0 }, border);

        draw_circle(row.x + 12.0, row.y + 16.0, 4.0, theme.drone_body(drone.status));
        draw_text(&drone.callsign, row.x + 24.0, row.y + 21.0, FONT_BODY, theme.text);
        draw_text(
            drone.status.label(),
            row.x + row.w - 100.0,
            row.y + 21.0,
            FONT_SMALL,
            theme.drone_body(drone.status),
        );

        let battery_color = if drone.battery_low() { CRITICAL_RED } else { theme.text_muted };
        draw_text(
            &format!(
                "[{}] BAT {}%  HDG {:03.0}  {} m/s",
                index + 1,
                drone.battery_percent(),
                drone.heading,
                drone.speed
            ),
            row.x + 8.0,
            row.y + 42.0,
            FONT_SMALL,
            battery_color,
        );
    }
}

fn draw_alert_panel(rect: Rect, view: &HudView<'_>) {
    let theme = view.theme;
    draw_panel(rect, theme);

    let x = rect.x + PADDING;
    let wrap_chars = ((rect.w - PADDING * 2.0) / SMALL_CHAR_WIDTH) as usize;
    let mut y = rect.y + 28.0;
    draw_text("ACTIONABLE ALERTS", x, y, FONT_SMALL, theme.text_muted);
    y += 22.0;

    for alert in sorted_by_severity(view.alerts) {
        let color = theme.severity(alert.severity);
        draw_rectangle(x, y - 12.0, 3.0, 30.0, color);
        draw_text(
            &format!("{} {}", alert.severity.label(), alert.timestamp),
            x + 10.0,
            y,
            FONT_SMALL,
            color,
        );
        draw_text(
            &format!("{}: {}", alert.code, alert.message),
            x + 10.0,
            y + 16.0,
            FONT_SMALL,
            theme.text,
        );
        y += 40.0;
    }

    y += 8.0;
    draw_text("RISK FACTORS", x, y, FONT_SMALL, theme.text_muted);
    y += 18.0;
    let summary = match (view.risk_summary, view.risk_pending) {
        (_, true) => "ANALYZING FLEET TELEMETRY...",
        (Some(summary), false) => summary,
        (None, false) => "Press R for an AI risk summary.",
    };
    for line in wrap_text(summary, wrap_chars).into_iter().take(8) {
        draw_text(&line, x, y, FONT_SMALL, theme.text);
        y += 16.0;
    }

    y += 12.0;
    draw_text("SCHEMATIC VIEW", x, y, FONT_SMALL, theme.text_muted);
    y += 20.0;
    match view.selected {
        Some(drone) => {
            let readout = SchematicReadout::for_drone(drone, view.settings.units);
            draw_schematic(x, y, &readout, theme);
        }
        None => {
            draw_text("Select Drone for Schematic", x, y, FONT_SMALL, theme.text_muted);
        }
    }
}

fn draw_schematic(x: f32, y: f32, readout: &SchematicReadout, theme: &Theme) {
    let title_color = if readout.alarm { CRITICAL_RED } else { theme.text };
    draw_text(&readout.callsign, x, y, FONT_BODY, title_color);

    let tiles = [
        ("MOTOR RPM", readout.motor_rpm.as_str()),
        ("ESC TEMP", readout.esc_temp.as_str()),
        ("AIRSPEED", readout.airspeed.as_str()),
        ("PAYLOAD", readout.payload),
    ];
    for (index, (label, value)) in tiles.iter().enumerate() {
        let column = (index % 2) as f32;
        let row = (index / 2) as f32;
        let tile_x = x + column * 135.0;
        let tile_y = y + 14.0 + row * 44.0;
        draw_rectangle_lines(tile_x, tile_y, 128.0, 38.0, 1.0, theme.panel_border);
        draw_text(label, tile_x + 6.0, tile_y + 14.0, FONT_SMALL - 2.0, theme.text_muted);
        let value_color = if readout.alarm && *label == "ESC TEMP" {
            CRITICAL_RED
        } else {
            theme.text
        };
        draw_text(value, tile_x + 6.0, tile_y + 31.0, FONT_BODY, value_color);
    }
}

fn draw_logs(rect: Rect, view: &HudView<'_>) {
    let theme = view.theme;
    draw_panel(rect, theme);

    let x = rect.x + PADDING;
    let mut y = rect.y + 22.0;
    draw_text("SYSTEM LOGS", x, y, FONT_SMALL, theme.text_muted);
    y += 18.0;

    let visible = ((rect.h - 30.0) / 16.0).max(0.0) as usize;
    let skip = view.logs.len().saturating_sub(visible);
    for entry in &view.logs[skip..] {
        draw_text(&entry.timestamp, x, y, FONT_SMALL, theme.text_muted);
        draw_text(
            &format!("[{}]", entry.level.label()),
            x + 64.0,
            y,
            FONT_SMALL,
            theme.log_level(entry.level),
        );
        draw_text(&entry.message, x + 112.0, y, FONT_SMALL, theme.text);
        y += 16.0;
    }
}

fn draw_compass(map: Rect, view: &HudView<'_>) {
    let theme = view.theme;
    let center = vec2(
        map.x + map.w - PADDING - COMPASS_RADIUS - 4.0,
        map.y + PADDING + COMPASS_RADIUS + 4.0,
    );
    draw_circle(center.x, center.y, COMPASS_RADIUS, theme.panel);
    draw_circle_lines(center.x, center.y, COMPASS_RADIUS, 2.0, theme.panel_border);

    let north = compass_marker(center, COMPASS_RADIUS, view.heading);
    draw_line(center.x, center.y, north.x, north.y, 2.0, CRITICAL_RED);
    draw_text("N", north.x - 4.0, north.y - 4.0, FONT_SMALL, theme.text);
}

/// Screen position of the north marker; the rose turns clockwise with the heading.
pub fn compass_marker(center: Vec2, radius: f32, heading: ViewHeading) -> Vec2 {
    let (sin, cos) = heading.radians().sin_cos();
    vec2(center.x + radius * sin, center.y - radius * cos)
}

fn draw_tracking_panel(map: Rect, view: &HudView<'_>) {
    let theme = view.theme;
    let panel = Rect::new(map.x + PADDING, map.y + map.h - 70.0 - PADDING, 220.0, 70.0);
    draw_panel(panel, theme);

    let (title, lines) = tracking_lines(&view.coordinate);
    let title_color = if view.coordinate.is_tracking() {
        SELECTION_BLUE
    } else {
        theme.text_muted
    };
    draw_text(title, panel.x + 10.0, panel.y + 20.0, FONT_SMALL, title_color);
    for (index, line) in lines.iter().enumerate() {
        draw_text(
            line,
            panel.x + 10.0,
            panel.y + 40.0 + index as f32 * 16.0,
            FONT_SMALL,
            theme.text,
        );
    }
    draw_text(
        "ORTHOGRAPHIC VECTOR FEED",
        map.x + PADDING,
        map.y + PADDING + 10.0,
        FONT_SMALL,
        theme.text_muted,
    );
}

pub fn tracking_lines(coordinate: &DerivedCoordinate) -> (&'static str, Vec<String>) {
    if coordinate.is_tracking() {
        (
            "LIVE TRACKING",
            vec![
                format!("LAT {:.6}", coordinate.latitude),
                format!("LON {:.6}", coordinate.longitude),
            ],
        )
    } else {
        ("SECTOR SCAN", vec!["Acquiring Signal...".to_string()])
    }
}

pub fn utc_clock(unix_seconds: f64) -> String {
    let seconds_of_day = unix_seconds.max(0.0) as u64 % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        seconds_of_day / 3600,
        seconds_of_day / 60 % 60,
        seconds_of_day % 60
    )
}

/// Greedy word wrap by character count; words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                lines.push(word.drain(..max_chars).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }

            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text("RTB EAGLE-03 immediately due to cell imbalance", 16);
        assert_eq!(
            lines,
            vec!["RTB EAGLE-03", "immediately due", "to cell", "imbalance"]
        );
        assert!(lines.iter().all(|line| line.chars().count() <= 16));
    }

    #[test]
    fn splits_overlong_words_and_keeps_paragraphs() {
        let lines = wrap_text("ABCDEFGHIJ\n- ok", 4);
        assert_eq!(lines, vec!["ABCD", "EFGH", "IJ", "- ok"]);
    }

    #[test]
    fn tracking_lines_use_six_decimals() {
        let (title, lines) = tracking_lines(&DerivedCoordinate::from_scene([-8.0, 2.0, -2.0]));
        assert_eq!(title, "LIVE TRACKING");
        assert_eq!(lines, vec!["LAT 59.913700", "LON 10.751400"]);

        let (title, lines) = tracking_lines(&DerivedCoordinate::origin());
        assert_eq!(title, "SECTOR SCAN");
        assert_eq!(lines, vec!["Acquiring Signal..."]);
    }

    #[test]
    fn utc_clock_formats_time_of_day() {
        assert_eq!(utc_clock(0.0), "00:00:00");
        assert_eq!(utc_clock(86_400.0 + 13.0 * 3600.0 + 12.0 * 60.0 + 5.5), "13:12:05");
    }

    #[test]
    fn fleet_rows_are_hit_tested_inside_the_sidebar() {
        let layout = HudLayout::for_screen(1280.0, 800.0);
        let second = layout.fleet_row(1);
        assert_eq!(layout.fleet_row_at(second.center(), 3), Some(1));
        assert_eq!(layout.fleet_row_at(second.center(), 1), None);
        assert_eq!(layout.fleet_row_at(layout.map.center(), 3), None);
        assert!(layout.over_panel(second.center()));
        assert!(!layout.over_panel(layout.map.center()));
    }

    #[test]
    fn bell_is_hit_tested_in_the_header() {
        let layout = HudLayout::for_screen(1280.0, 800.0);
        let bell = layout.bell_center();
        assert!(layout.header.contains(bell));
        assert!(layout.over_bell(bell + vec2(5.0, -5.0)));
        assert!(!layout.over_bell(bell + vec2(40.0, 0.0)));
        assert!(!layout.over_bell(layout.map.center()));
    }

    #[test]
    fn compass_marker_turns_clockwise() {
        let center = vec2(100.0, 100.0);
        let up = compass_marker(center, 10.0, ViewHeading::new(0.0));
        assert!((up - vec2(100.0, 90.0)).length() < 1e-4);
        let right = compass_marker(center, 10.0, ViewHeading::new(std::f32::consts::FRAC_PI_2));
        assert!((right - vec2(110.0, 100.0)).length() < 1e-4);
    }
}
