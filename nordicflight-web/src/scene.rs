use macroquad::prelude::*;

use crate::drone::{SCENE_OFFSET_Y, draw_ring_3d};
use crate::theme::Theme;

const GRID_HALF_EXTENT: i32 = 50;
const GRID_SECTION_EVERY: i32 = 5;
const RADAR_RADII: [f32; 3] = [10.0, 20.0, 30.0];
const RADAR_SEGMENTS: usize = 64;
const AXIS_HALF_LENGTH: f32 = 30.0;
const RAIL_HALF_LENGTH: f32 = 100.0;
const RAIL_OFFSET_Z: f32 = 1.0;
const SLEEPER_SPACING: f32 = 2.0;
const SLEEPER_HALF_WIDTH: f32 = 1.4;

fn floor(x: f32, z: f32) -> Vec3 {
    vec3(x, SCENE_OFFSET_Y, z)
}

/// Static backdrop: floor grid, radar rings, cross axes and the rail corridor.
pub fn draw_backdrop(theme: &Theme) {
    draw_floor_grid(theme);
    draw_radar(theme);
    draw_rail_corridor(theme);
}

fn draw_floor_grid(theme: &Theme) {
    let extent = GRID_HALF_EXTENT as f32;
    for line in -GRID_HALF_EXTENT..=GRID_HALF_EXTENT {
        let color = if line % GRID_SECTION_EVERY == 0 {
            theme.grid_section
        } else {
            theme.grid
        };
        let offset = line as f32;
        draw_line_3d(floor(offset, -extent), floor(offset, extent), color);
        draw_line_3d(floor(-extent, offset), floor(extent, offset), color);
    }
}

fn draw_radar(theme: &Theme) {
    let lift = vec3(0.0, 0.01, 0.0);
    for radius in RADAR_RADII {
        draw_ring_3d(floor(0.0, 0.0) + lift, radius, RADAR_SEGMENTS, theme.grid_section);
    }
    draw_line_3d(
        floor(-AXIS_HALF_LENGTH, 0.0) + lift,
        floor(AXIS_HALF_LENGTH, 0.0) + lift,
        theme.grid_section,
    );
    draw_line_3d(
        floor(0.0, -AXIS_HALF_LENGTH) + lift,
        floor(0.0, AXIS_HALF_LENGTH) + lift,
        theme.grid_section,
    );
}

fn draw_rail_corridor(theme: &Theme) {
    let lift = vec3(0.0, 0.05, 0.0);
    for z in [-RAIL_OFFSET_Z, RAIL_OFFSET_Z] {
        draw_line_3d(
            floor(-RAIL_HALF_LENGTH, z) + lift,
            floor(RAIL_HALF_LENGTH, z) + lift,
            theme.rail,
        );
    }

    for x in sleeper_positions() {
        draw_cube(
            floor(x, 0.0) + vec3(0.0, 0.02, 0.0),
            vec3(0.3, 0.04, SLEEPER_HALF_WIDTH * 2.0),
            None,
            theme.sleeper,
        );
    }
}

fn sleeper_positions() -> impl Iterator<Item = f32> {
    let count = (RAIL_HALF_LENGTH * 2.0 / SLEEPER_SPACING) as i32;
    (0..=count).map(|step| -RAIL_HALF_LENGTH + step as f32 * SLEEPER_SPACING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleepers_span_the_rails() {
        let positions: Vec<f32> = sleeper_positions().collect();
        assert_eq!(positions.len(), 101);
        assert_eq!(positions.first().copied(), Some(-RAIL_HALF_LENGTH));
        assert_eq!(positions.last().copied(), Some(RAIL_HALF_LENGTH));
    }
}
