//! Bullets fired by players

use uuid::Uuid;

use crate::ws::protocol::BulletView;

use super::constants::{BULLET_LIFETIME, BULLET_SPEED};
use super::object::GameObject;

/// A live projectile. Owned by the world's bullet collection;
/// identified by a stable `id` so removal never depends on position
/// in the collection.
#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: u64,
    /// Shooter's player id, for kill attribution and self-hit exclusion
    pub parent_id: Uuid,
    pub object: GameObject,
    /// Shooter's cosmetic color, doubling as the friendly-fire discriminator
    pub color: String,
    lifetime_remaining: f32,
}

impl Bullet {
    pub fn new(id: u64, parent_id: Uuid, x: f32, y: f32, direction: f32, color: String) -> Self {
        Self {
            id,
            parent_id,
            object: GameObject::new(x, y, direction, BULLET_SPEED),
            color,
            lifetime_remaining: BULLET_LIFETIME,
        }
    }

    /// Advance the bullet; returns false once it has expired.
    /// No bounds clamp here, expiry is the only way out.
    pub fn update(&mut self, dt: f32) -> bool {
        self.object.integrate(dt);
        self.lifetime_remaining -= dt;
        self.lifetime_remaining > 0.0
    }

    pub fn serialize_for_update(&self) -> BulletView {
        BulletView {
            id: self.id,
            x: self.object.x,
            y: self.object.y,
            direction: self.object.direction,
            color: self.color.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullet_expires_after_lifetime() {
        let mut bullet = Bullet::new(1, Uuid::new_v4(), 0.0, 0.0, 0.0, "white".into());
        let dt = 1.0 / 60.0;
        let mut ticks = 0;
        while bullet.update(dt) {
            ticks += 1;
            assert!(ticks < 1000, "bullet never expired");
        }
        let expected = (BULLET_LIFETIME / dt) as i32;
        assert!((ticks - expected).abs() <= 1);
    }

    #[test]
    fn bullet_travels_at_bullet_speed() {
        let mut bullet = Bullet::new(1, Uuid::new_v4(), 0.0, 0.0, 0.0, "white".into());
        bullet.update(0.1);
        assert!((bullet.object.x - BULLET_SPEED * 0.1).abs() < 1e-3);
    }
}
