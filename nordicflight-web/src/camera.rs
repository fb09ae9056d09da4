use macroquad::camera::Camera as _;
use macroquad::prelude::*;
use nordicflight_core::AzimuthSource;
use std::f32::consts::PI;

const ORBIT_SENSITIVITY: f32 = 0.01;
const ZOOM_STEP: f32 = 0.5;
const MIN_ZOOM: f32 = 20.0;
const MAX_ZOOM: f32 = 60.0;
const DEFAULT_ZOOM: f32 = 30.0;
const MIN_POLAR: f32 = 1e-4;
const MAX_POLAR: f32 = PI / 2.2;
// Orthographic, so distance only has to keep the whole track in front of the camera.
const EYE_DISTANCE: f32 = 400.0;

/// Orbit-style controls around a fixed target, azimuth measured like three.js
/// (`atan2(x, z)` of the eye offset, in `(-PI, PI]`).
#[derive(Debug, Clone)]
pub struct OrbitControls {
    target: Vec3,
    azimuth: f32,
    polar: f32,
    zoom: f32,
    last_drag_pos: Option<Vec2>,
}

impl OrbitControls {
    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let radius = offset.length().max(f32::EPSILON);
        Self {
            target,
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / radius).clamp(-1.0, 1.0).acos().clamp(MIN_POLAR, MAX_POLAR),
            zoom: DEFAULT_ZOOM,
            last_drag_pos: None,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn polar_angle(&self) -> f32 {
        self.polar
    }

    pub fn rotate(&mut self, delta: Vec2) {
        self.azimuth = wrap_angle(self.azimuth - delta.x * ORBIT_SENSITIVITY);
        self.polar = (self.polar - delta.y * ORBIT_SENSITIVITY).clamp(MIN_POLAR, MAX_POLAR);
    }

    pub fn zoom_by(&mut self, steps: f32) {
        self.zoom = (self.zoom + steps * ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn eye_direction(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        vec3(sin_polar * sin_azimuth, cos_polar, sin_polar * cos_azimuth)
    }

    pub fn camera(&self) -> Camera3D {
        Camera3D {
            position: self.target + self.eye_direction() * EYE_DISTANCE,
            target: self.target,
            up: Vec3::Y,
            // Orthographic fovy is the visible height in world units.
            fovy: screen_height() / self.zoom,
            projection: Projection::Orthographics,
            ..Default::default()
        }
    }

    pub fn handle_input(&mut self) {
        if is_mouse_button_down(MouseButton::Right) {
            let (mouse_x, mouse_y) = mouse_position();
            let current = vec2(mouse_x, mouse_y);
            if let Some(last) = self.last_drag_pos {
                self.rotate(current - last);
            }
            self.last_drag_pos = Some(current);
        } else {
            self.last_drag_pos = None;
        }

        let (_wheel_x, wheel_y) = mouse_wheel();
        if wheel_y != 0.0 {
            self.zoom_by(wheel_y.signum());
        }
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::looking_from(vec3(30.0, 30.0, 30.0), Vec3::ZERO)
    }
}

impl AzimuthSource for OrbitControls {
    fn azimuthal_angle(&self) -> f32 {
        self.azimuth
    }
}

/// Projects a world point through `camera` into screen pixels.
pub fn world_to_screen(camera: &Camera3D, point: Vec3) -> Option<Vec2> {
    let ndc = camera.matrix().project_point3(point);
    if !ndc.is_finite() || ndc.z.abs() > 1.0 {
        return None;
    }
    Some(vec2(
        (ndc.x + 1.0) * 0.5 * screen_width(),
        (1.0 - ndc.y) * 0.5 * screen_height(),
    ))
}

fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI { wrapped + 2.0 * PI } else { wrapped }
}
