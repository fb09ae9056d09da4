use serde::{Deserialize, Serialize};

use crate::drone::{Drone, DroneId};

pub const BASE_LATITUDE: f64 = 59.9139;
pub const BASE_LONGITUDE: f64 = 10.7522;
/// Degrees of latitude/longitude per scene unit along z/x.
pub const DEGREES_PER_UNIT: f64 = 0.0001;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<DroneId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: impl Into<DroneId>) {
        self.selected = Some(id.into());
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    /// Looks the selection up in `drones`; a stale id resolves to `None`.
    pub fn resolve<'a>(&self, drones: &'a [Drone]) -> Option<&'a Drone> {
        let id = self.selected.as_deref()?;
        drones.iter().find(|drone| drone.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingStatus {
    Tracking,
    Scanning,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    pub status: TrackingStatus,
}

impl DerivedCoordinate {
    pub fn origin() -> Self {
        Self {
            latitude: BASE_LATITUDE,
            longitude: BASE_LONGITUDE,
            status: TrackingStatus::Scanning,
        }
    }

    /// z maps to latitude, x maps to longitude.
    pub fn from_scene(position: [f32; 3]) -> Self {
        Self {
            latitude: BASE_LATITUDE + f64::from(position[2]) * DEGREES_PER_UNIT,
            longitude: BASE_LONGITUDE + f64::from(position[0]) * DEGREES_PER_UNIT,
            status: TrackingStatus::Tracking,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.status == TrackingStatus::Tracking
    }
}

impl Default for DerivedCoordinate {
    fn default() -> Self {
        Self::origin()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionProjector {
    last: DerivedCoordinate,
}

impl SelectionProjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> DerivedCoordinate {
        self.last
    }

    pub fn project(&mut self, selection: &SelectionState, drones: &[Drone]) -> DerivedCoordinate {
        self.last = match selection.resolve(drones) {
            Some(drone) => DerivedCoordinate::from_scene(drone.position),
            None => DerivedCoordinate {
                status: TrackingStatus::Scanning,
                ..self.last
            },
        };
        self.last
    }
}
