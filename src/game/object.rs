//! Shared kinematic state for moving entities

/// Position, heading and speed shared by players and bullets.
///
/// Integration has no bounds checking; each entity decides how to
/// treat the map edge (players clamp, bullets expire).
#[derive(Debug, Clone, Copy)]
pub struct GameObject {
    pub x: f32,
    pub y: f32,
    /// Heading in radians. Not normalized; whatever the client sent.
    pub direction: f32,
    /// Scalar speed in units per second
    pub speed: f32,
}

impl GameObject {
    pub fn new(x: f32, y: f32, direction: f32, speed: f32) -> Self {
        Self {
            x,
            y,
            direction,
            speed,
        }
    }

    /// Advance position along the current heading
    pub fn integrate(&mut self, dt: f32) {
        self.x += self.speed * dt * self.direction.cos();
        self.y += self.speed * dt * self.direction.sin();
    }

    /// Euclidean distance to another entity. Hot path for both
    /// collision checks and snapshot culling.
    #[inline]
    pub fn distance_to(&self, other: &GameObject) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Monotonic id allocator for bullets and aid kits.
/// Ids are stable for the lifetime of the world, never reused.
#[derive(Debug, Default)]
pub struct IdGen(u64);

impl IdGen {
    pub fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrate_moves_along_heading() {
        let mut obj = GameObject::new(100.0, 100.0, 0.0, 50.0);
        obj.integrate(0.5);
        assert!((obj.x - 125.0).abs() < 1e-3);
        assert!((obj.y - 100.0).abs() < 1e-3);

        let mut obj = GameObject::new(0.0, 0.0, std::f32::consts::FRAC_PI_2, 100.0);
        obj.integrate(1.0);
        assert!(obj.x.abs() < 1e-3);
        assert!((obj.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GameObject::new(0.0, 0.0, 0.0, 0.0);
        let b = GameObject::new(3.0, 4.0, 0.0, 0.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-6);
        assert!((b.distance_to(&a) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn id_gen_is_monotonic() {
        let mut ids = IdGen::default();
        let a = ids.next();
        let b = ids.next();
        assert!(b > a);
    }
}
