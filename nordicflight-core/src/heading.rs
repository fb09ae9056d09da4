/// Anything that can report the azimuthal angle of an orbiting view, in radians.
pub trait AzimuthSource {
    fn azimuthal_angle(&self) -> f32;
}

impl AzimuthSource for f32 {
    fn azimuthal_angle(&self) -> f32 {
        *self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewHeading(f32);

impl ViewHeading {
    pub fn new(radians: f32) -> Self {
        Self(radians)
    }

    pub fn radians(self) -> f32 {
        self.0
    }

    pub fn degrees(self) -> f32 {
        self.0.to_degrees()
    }
}

/// Publishes the camera's azimuth once per frame without renormalizing it.
#[derive(Debug, Clone, Default)]
pub struct HeadingTracker {
    current: ViewHeading,
}

impl HeadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe<C: AzimuthSource + ?Sized>(&mut self, controls: &C) -> ViewHeading {
        self.current = ViewHeading(controls.azimuthal_angle());
        self.current
    }

    pub fn current(&self) -> ViewHeading {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_4, PI};

    struct FixedControls {
        azimuth: f32,
    }

    impl AzimuthSource for FixedControls {
        fn azimuthal_angle(&self) -> f32 {
            self.azimuth
        }
    }

    #[test]
    fn publishes_native_angle() {
        let mut tracker = HeadingTracker::new();
        let heading = tracker.observe(&FixedControls { azimuth: -3.0 });
        assert_eq!(heading.radians(), -3.0);
        assert_eq!(tracker.current(), heading);
    }

    #[test]
    fn reports_degrees_for_the_compass() {
        let mut tracker = HeadingTracker::new();
        assert!((tracker.observe(&FRAC_PI_4).degrees() - 45.0).abs() < 1e-4);
        assert!((tracker.observe(&PI).degrees() - 180.0).abs() < 1e-4);
    }
}
