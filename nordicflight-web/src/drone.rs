use macroquad::math::Quat;
use macroquad::prelude::*;
use nordicflight_core::{DroneFrame, DroneStatus};

use crate::theme::{CRITICAL_RED, SELECTION_BLUE, Theme};

/// Scene is drawn two units below the simulation origin, matching the floor grid.
pub const SCENE_OFFSET_Y: f32 = -2.0;

#[derive(Debug, Clone)]
pub struct DroneDrawConfig {
    pub scale: f32,              // body scale relative to the unit airframe
    pub hub_radius: f32,         // scene units, before scaling
    pub arm_reach: f32,          // rotor offset from the hub along x/z, before scaling
    pub rotor_length: f32,       // blade length, before scaling
    pub rotor_spin: f32,         // radians per second
    pub selection_radius: f32,   // scene units
    pub pick_radius_px: f32,     // screen pixels around the projected hub
    pub ring_segments: usize,
}

impl Default for DroneDrawConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            hub_radius: 0.15,
            arm_reach: 0.5,
            rotor_length: 0.7,
            rotor_spin: 20.0,
            selection_radius: 1.5,
            pick_radius_px: 24.0,
            ring_segments: 32,
        }
    }
}

pub fn drone_world_center(drone: &DroneFrame) -> Vec3 {
    vec3(
        drone.position[0],
        drone.position[1] + SCENE_OFFSET_Y,
        drone.position[2],
    )
}

fn orientation(drone: &DroneFrame) -> Quat {
    let [pitch, yaw, roll] = drone.rotation;
    Quat::from_rotation_x(pitch) * Quat::from_rotation_y(yaw) * Quat::from_rotation_z(roll)
}

/// Pulse radius of the warning ring drawn under critical drones.
pub fn critical_ring_radius(config: &DroneDrawConfig, elapsed: f64) -> f32 {
    let scale = 2.5 + (elapsed * 4.0).sin() as f32 * 0.5;
    config.selection_radius * scale
}

pub fn draw_drone(drone: &DroneFrame, elapsed: f64, theme: &Theme, config: &DroneDrawConfig) {
    let center = drone_world_center(drone);
    let rotation = orientation(drone);
    let body_color = theme.drone_body(drone.status);
    let to_world = |local: Vec3| center + rotation * (local * config.scale);

    draw_sphere(center, config.hub_radius * config.scale, None, body_color);

    let reach = config.arm_reach;
    let rotor_hubs = [
        vec3(-reach, 0.1, -reach),
        vec3(reach, 0.1, -reach),
        vec3(reach, 0.1, reach),
        vec3(-reach, 0.1, reach),
    ];

    // Airframe outline, then arms out to each rotor.
    for (index, hub) in rotor_hubs.iter().enumerate() {
        let next = rotor_hubs[(index + 1) % rotor_hubs.len()];
        draw_line_3d(to_world(*hub * 0.8), to_world(next * 0.8), body_color);
        draw_line_3d(to_world(Vec3::ZERO), to_world(*hub), body_color);
    }

    let spin = (elapsed * f64::from(config.rotor_spin)) as f32;
    let half_blade = config.rotor_length * 0.5;
    for hub in rotor_hubs {
        for blade in 0..2 {
            let angle = spin + blade as f32 * std::f32::consts::FRAC_PI_2;
            let tip = vec3(angle.cos(), 0.0, angle.sin()) * half_blade;
            draw_line_3d(to_world(hub - tip), to_world(hub + tip), theme.text_muted);
        }
    }

    if drone.selected {
        let ring_center = center - vec3(0.0, 0.4, 0.0);
        draw_ring_3d(ring_center, config.selection_radius, config.ring_segments, SELECTION_BLUE);
        draw_line_3d(ring_center, ring_center - vec3(0.0, 4.5, 0.0), SELECTION_BLUE);
    }

    if drone.status == DroneStatus::Critical {
        let ring_center = center - vec3(0.0, 0.4, 0.0);
        let radius = critical_ring_radius(config, elapsed);
        draw_ring_3d(ring_center, radius, config.ring_segments * 2, CRITICAL_RED);
    }
}

pub fn draw_ring_3d(center: Vec3, radius: f32, segments: usize, color: Color) {
    let segments = segments.max(3);
    let point = |index: usize| {
        let angle = index as f32 / segments as f32 * std::f32::consts::TAU;
        center + vec3(angle.cos() * radius, 0.0, angle.sin() * radius)
    };
    for index in 0..segments {
        draw_line_3d(point(index), point(index + 1), color);
    }
}
