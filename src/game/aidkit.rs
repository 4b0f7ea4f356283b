//! Stationary healing pickups

use crate::ws::protocol::AidKitView;

use super::object::GameObject;

/// A healing pickup. Spawns inert and becomes pickable once its
/// scheduled activation time elapses. Never expires on its own.
#[derive(Debug, Clone)]
pub struct AidKit {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    /// Health granted on pickup
    pub hp: i32,
    /// False until `active_at_ms` has passed
    pub exist: bool,
    active_at_ms: u64,
}

impl AidKit {
    pub fn new(id: u64, x: f32, y: f32, hp: i32, active_at_ms: u64) -> Self {
        Self {
            id,
            x,
            y,
            hp,
            exist: false,
            active_at_ms,
        }
    }

    /// Flip to pickable once the activation delay has elapsed
    pub fn update(&mut self, now_ms: u64) {
        if !self.exist && now_ms >= self.active_at_ms {
            self.exist = true;
        }
    }

    pub fn distance_to(&self, other: &GameObject) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn serialize_for_update(&self) -> AidKitView {
        AidKitView {
            id: self.id,
            x: self.x,
            y: self.y,
        }
    }
}
