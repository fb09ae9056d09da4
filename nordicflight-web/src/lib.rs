#[cfg(target_arch = "wasm32")]
use macroquad::miniquad;
use macroquad::prelude::*;
use nordicflight_core::settings::SETTINGS_FILE;
use nordicflight_core::telemetry::has_critical;
use nordicflight_core::{DisplaySettings, DrawingSurface, Fixtures, Frame, RenderLoopDriver};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Mutex, OnceLock};
use tracing::{error, info, warn};

use crate::advisor::RiskSummaryTask;
use crate::alarm::{AlarmSchedule, AlertTone};
use crate::camera::{OrbitControls, world_to_screen};
use crate::drone::{DroneDrawConfig, draw_drone, drone_world_center};
use crate::hud::{HudLayout, HudView, draw_hud};
use crate::theme::Theme;

mod advisor;
mod alarm;
mod camera;
mod drone;
mod hud;
mod scene;
mod theme;

const NO_SLOT: i32 = -1;
const FLEET_HOTKEYS: [KeyCode; 9] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
    KeyCode::Key7,
    KeyCode::Key8,
    KeyCode::Key9,
];

static PENDING_SELECT_SLOT: AtomicI32 = AtomicI32::new(NO_SLOT);
static PENDING_CLEAR_SELECTION: AtomicBool = AtomicBool::new(false);
static PENDING_DARK_MODE_TOGGLE: AtomicBool = AtomicBool::new(false);
static PENDING_UNITS_TOGGLE: AtomicBool = AtomicBool::new(false);
static PENDING_RISK_REQUEST: AtomicBool = AtomicBool::new(false);
static PENDING_SOUND_TOGGLE: AtomicBool = AtomicBool::new(false);

/// Last frame's tracking read-out, mirrored for the HTML shell.
#[derive(Default)]
struct TrackingUi {
    active: bool,
    latitude: f64,
    longitude: f64,
    heading_degrees: f32,
}

fn tracking_ui() -> &'static Mutex<TrackingUi> {
    static TRACKING_UI: OnceLock<Mutex<TrackingUi>> = OnceLock::new();
    TRACKING_UI.get_or_init(|| Mutex::new(TrackingUi::default()))
}

/// Selects the drone at fleet position `slot` (zero based); negative clears.
#[unsafe(no_mangle)]
pub extern "C" fn select_drone_slot(slot: i32) {
    if slot < 0 {
        PENDING_CLEAR_SELECTION.store(true, Ordering::SeqCst);
    } else {
        PENDING_SELECT_SLOT.store(slot, Ordering::SeqCst);
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn clear_drone_selection() {
    PENDING_CLEAR_SELECTION.store(true, Ordering::SeqCst);
}

#[unsafe(no_mangle)]
pub extern "C" fn toggle_dark_mode() {
    PENDING_DARK_MODE_TOGGLE.store(true, Ordering::SeqCst);
}

#[unsafe(no_mangle)]
pub extern "C" fn toggle_units() {
    PENDING_UNITS_TOGGLE.store(true, Ordering::SeqCst);
}

#[unsafe(no_mangle)]
pub extern "C" fn toggle_sound() {
    PENDING_SOUND_TOGGLE.store(true, Ordering::SeqCst);
}

#[unsafe(no_mangle)]
pub extern "C" fn request_risk_summary() {
    PENDING_RISK_REQUEST.store(true, Ordering::SeqCst);
}

#[unsafe(no_mangle)]
pub extern "C" fn tracking_active() -> i32 {
    let ui = tracking_ui().lock().ok();
    ui.map_or(0, |ui| ui.active as i32)
}

#[unsafe(no_mangle)]
pub extern "C" fn tracking_latitude() -> f64 {
    let ui = tracking_ui().lock().ok();
    ui.map_or(0.0, |ui| ui.latitude)
}

#[unsafe(no_mangle)]
pub extern "C" fn tracking_longitude() -> f64 {
    let ui = tracking_ui().lock().ok();
    ui.map_or(0.0, |ui| ui.longitude)
}

#[unsafe(no_mangle)]
pub extern "C" fn compass_heading() -> f32 {
    let ui = tracking_ui().lock().ok();
    ui.map_or(0.0, |ui| ui.heading_degrees)
}

fn take_pending_select_slot() -> Option<usize> {
    let slot = PENDING_SELECT_SLOT.swap(NO_SLOT, Ordering::SeqCst);
    usize::try_from(slot).ok()
}

fn take_flag(flag: &AtomicBool) -> bool {
    flag.swap(false, Ordering::SeqCst)
}

fn log_ui_action(label: &str) {
    #[cfg(target_arch = "wasm32")]
    miniquad::info!("{}", label);
    #[cfg(not(target_arch = "wasm32"))]
    info!(action = label, "ui action");
}

/// Index of the point closest to `target` within `radius`, skipping unprojected entries.
fn nearest_within(points: &[Option<Vec2>], target: Vec2, radius: f32) -> Option<usize> {
    let mut closest: Option<(usize, f32)> = None;
    for (index, point) in points.iter().enumerate() {
        let Some(point) = point else {
            continue;
        };
        let distance = point.distance(target);
        if distance > radius {
            continue;
        }
        if closest.is_none_or(|(_, best)| distance < best) {
            closest = Some((index, distance));
        }
    }
    closest.map(|(index, _)| index)
}

/// 3D map drawn through the orbit camera. Remembers where each drone landed
/// on screen so clicks can be resolved against the last frame.
struct MapSurface {
    camera: Camera3D,
    theme: Theme,
    draw: DroneDrawConfig,
    screen_positions: Vec<Option<Vec2>>,
}

impl MapSurface {
    fn new(theme: Theme) -> Self {
        Self {
            camera: OrbitControls::default().camera(),
            theme,
            draw: DroneDrawConfig::default(),
            screen_positions: Vec::new(),
        }
    }

    fn drone_at(&self, screen_pos: Vec2) -> Option<usize> {
        nearest_within(&self.screen_positions, screen_pos, self.draw.pick_radius_px)
    }
}

impl DrawingSurface for MapSurface {
    fn draw_frame(&mut self, frame: &Frame<'_>) {
        clear_background(self.theme.background);
        set_camera(&self.camera);

        scene::draw_backdrop(&self.theme);
        for drone in frame.drones {
            draw_drone(drone, frame.elapsed, &self.theme, &self.draw);
        }

        set_default_camera();

        self.screen_positions.clear();
        self.screen_positions.extend(
            frame
                .drones
                .iter()
                .map(|drone| world_to_screen(&self.camera, drone_world_center(drone))),
        );
    }
}

struct DashboardState {
    driver: RenderLoopDriver,
    controls: OrbitControls,
    settings: DisplaySettings,
    fixtures: Fixtures,
    surface: MapSurface,
    risk: RiskSummaryTask,
    alarm: AlarmSchedule,
    tone: AlertTone,
    fps: f32,
    fps_frame_count: u32,
    fps_last_update_time: f64,
}

impl DashboardState {
    fn new(fixtures: Fixtures, settings: DisplaySettings, tone: AlertTone) -> Self {
        let driver = RenderLoopDriver::new(fixtures.drones.clone());
        let mut alarm = AlarmSchedule::default();
        if has_critical(&fixtures.alerts) {
            alarm.arm(get_time());
        }
        Self {
            driver,
            controls: OrbitControls::default(),
            settings,
            fixtures,
            surface: MapSurface::new(Theme::for_mode(settings.dark_mode)),
            risk: RiskSummaryTask::default(),
            alarm,
            tone,
            fps: 0.0,
            fps_frame_count: 0,
            fps_last_update_time: get_time(),
        }
    }

    fn theme(&self) -> Theme {
        Theme::for_mode(self.settings.dark_mode)
    }

    fn update_fps_if_due(&mut self) {
        let now = get_time();
        self.fps_frame_count += 1;
        let elapsed = now - self.fps_last_update_time;
        if elapsed >= 1.0 {
            self.fps = self.fps_frame_count as f32 / elapsed as f32;
            self.fps_frame_count = 0;
            self.fps_last_update_time = now;
        }
    }

    fn apply_pending_ui_actions(&mut self) {
        if let Some(slot) = take_pending_select_slot() {
            self.select_slot(slot);
        }
        if take_flag(&PENDING_CLEAR_SELECTION) {
            self.clear_selection();
        }
        if take_flag(&PENDING_DARK_MODE_TOGGLE) {
            self.toggle_dark_mode();
        }
        if take_flag(&PENDING_UNITS_TOGGLE) {
            self.toggle_units();
        }
        if take_flag(&PENDING_RISK_REQUEST) {
            self.request_risk_summary();
        }
        if take_flag(&PENDING_SOUND_TOGGLE) {
            self.toggle_sound();
        }
    }

    fn handle_keyboard(&mut self) {
        for (slot, key) in FLEET_HOTKEYS.iter().enumerate() {
            if is_key_pressed(*key) {
                self.select_slot(slot);
            }
        }
        if is_key_pressed(KeyCode::Escape) {
            self.clear_selection();
        }
        if is_key_pressed(KeyCode::D) {
            self.toggle_dark_mode();
        }
        if is_key_pressed(KeyCode::U) {
            self.toggle_units();
        }
        if is_key_pressed(KeyCode::R) {
            self.request_risk_summary();
        }
        if is_key_pressed(KeyCode::S) {
            self.toggle_sound();
        }
    }

    fn handle_left_click(&mut self, layout: &HudLayout) {
        if !is_mouse_button_pressed(MouseButton::Left) {
            return;
        }

        let (mouse_x, mouse_y) = mouse_position();
        let screen_pos = vec2(mouse_x, mouse_y);
        let drone_count = self.driver.state().drones().len();

        if layout.over_bell(screen_pos) {
            log_ui_action("alert bell");
            self.play_alert();
            return;
        }
        if let Some(slot) = layout.fleet_row_at(screen_pos, drone_count) {
            self.select_slot(slot);
            return;
        }
        if layout.over_panel(screen_pos) {
            return;
        }

        match self.surface.drone_at(screen_pos) {
            Some(index) => self.select_slot(index),
            None => self.clear_selection(),
        }
    }

    fn select_slot(&mut self, slot: usize) {
        let Some(drone) = self.driver.state().drones().get(slot) else {
            return;
        };
        log_ui_action(&format!("select {}", drone.callsign));
        self.driver.select_index(slot);
    }

    fn clear_selection(&mut self) {
        if self.driver.state().selection().selected_id().is_some() {
            log_ui_action("clear selection");
        }
        self.driver.clear_selection();
    }

    fn toggle_dark_mode(&mut self) {
        self.settings.toggle_dark_mode();
        log_ui_action(if self.settings.dark_mode { "dark mode on" } else { "dark mode off" });
    }

    fn toggle_units(&mut self) {
        self.settings.toggle_units();
        log_ui_action(&format!("units {}", self.settings.units.label()));
    }

    fn toggle_sound(&mut self) {
        self.settings.toggle_sound();
        log_ui_action(if self.settings.sound { "sound on" } else { "sound off" });
        if has_critical(&self.fixtures.alerts) {
            self.alarm.arm(get_time());
        }
    }

    fn play_alert(&self) {
        if self.settings.sound {
            self.tone.play();
        }
    }

    fn update_alarm(&mut self) {
        if self.alarm.take_due(get_time()) {
            self.play_alert();
        }
    }

    fn request_risk_summary(&mut self) {
        log_ui_action("risk summary");
        self.risk.request(
            self.driver.state().drones(),
            &self.fixtures.weather,
            &self.fixtures.alerts,
        );
    }

    fn render(&mut self, layout: &HudLayout) {
        self.surface.theme = self.theme();
        self.surface.camera = self.controls.camera();
        let summary = self
            .driver
            .frame(get_time(), &self.controls, &mut self.surface);

        if let Ok(mut ui) = tracking_ui().lock() {
            ui.active = summary.coordinate.is_tracking();
            ui.latitude = summary.coordinate.latitude;
            ui.longitude = summary.coordinate.longitude;
            ui.heading_degrees = summary.heading.degrees();
        }

        let theme = self.surface.theme;
        let state = self.driver.state();
        draw_hud(
            layout,
            &HudView {
                theme: &theme,
                settings: self.settings,
                weather: &self.fixtures.weather,
                alerts: &self.fixtures.alerts,
                logs: &self.fixtures.logs,
                drones: state.drones(),
                selected: state.selected_drone(),
                coordinate: summary.coordinate,
                heading: summary.heading,
                risk_summary: self.risk.summary(),
                risk_pending: self.risk.is_pending(),
                utc_seconds: macroquad::miniquad::date::now(),
                fps: self.fps,
            },
        );
    }
}

fn load_settings() -> DisplaySettings {
    let settings = DisplaySettings::load(SETTINGS_FILE).unwrap_or_else(|err| {
        warn!(%err, path = SETTINGS_FILE, "falling back to default display settings");
        DisplaySettings::default()
    });
    settings.with_env_overrides()
}

pub async fn run() {
    install_panic_hook();

    let fixtures = match Fixtures::load_default() {
        Ok(fixtures) => fixtures,
        Err(err) => {
            error!(%err, "failed to load fleet fixtures");
            return;
        }
    };
    let tone = AlertTone::load().await;
    let mut dashboard = DashboardState::new(fixtures, load_settings(), tone);
    info!(
        drones = dashboard.driver.state().drones().len(),
        units = dashboard.settings.units.label(),
        "console ready"
    );

    loop {
        let layout = HudLayout::for_screen(screen_width(), screen_height());

        dashboard.apply_pending_ui_actions();
        dashboard.handle_keyboard();
        dashboard.handle_left_click(&layout);
        if !layout.over_panel(mouse_position().into()) {
            dashboard.controls.handle_input();
        }
        dashboard.risk.poll();
        dashboard.update_alarm();
        dashboard.update_fps_if_due();

        dashboard.render(&layout);

        next_frame().await;
    }
}

#[cfg(target_arch = "wasm32")]
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let msg = info.to_string();
        if let Some(location) = info.location() {
            miniquad::error!("panic at {}:{}: {}", location.file(), location.line(), msg);
        } else {
            miniquad::error!("panic: {}", msg);
        }
    }));
}

#[cfg(not(target_arch = "wasm32"))]
fn install_panic_hook() {}
