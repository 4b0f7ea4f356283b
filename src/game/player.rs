//! Player entities and their lifecycle

use uuid::Uuid;

use crate::ws::protocol::{PlayerView, UserIdentity};

use super::bullet::Bullet;
use super::constants::{
    AFTER_DEATH_COUNTDOWN, BULLET_DAMAGE, DEAD_COLOR, MAP_SIZE, PLAYER_FIRE_COOLDOWN,
    PLAYER_MAX_HP, PLAYER_RADIUS, PLAYER_SPEED,
};
use super::object::{GameObject, IdGen};

/// Player lifecycle. A lethal hit moves a player from `Alive` into the
/// countdown; the world removes the player once the countdown runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive { hp: i32 },
    Dying { ticks_remaining: u32 },
}

/// A connected player's authoritative state. Owned exclusively by the world.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: Uuid,
    pub user: UserIdentity,
    pub object: GameObject,
    pub liveness: Liveness,
    pub score: f32,
    pub fire_cooldown: f32,
    /// Cosmetic tag fixed at creation; also the friendly-fire discriminator
    pub color: String,
}

impl Player {
    pub fn new(id: Uuid, user: UserIdentity, x: f32, y: f32, direction: f32, color: String) -> Self {
        Self {
            id,
            user,
            object: GameObject::new(x, y, direction, PLAYER_SPEED),
            liveness: Liveness::Alive { hp: PLAYER_MAX_HP },
            score: 0.0,
            fire_cooldown: 0.0,
            color,
        }
    }

    /// Record the desired heading for subsequent ticks
    pub fn set_direction(&mut self, direction: f32) {
        self.object.direction = direction;
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.liveness, Liveness::Alive { .. })
    }

    /// Advance one tick: move, clamp to the map, tick the fire cooldown.
    /// Returns a freshly fired bullet when the cooldown elapses.
    /// No-op while in the death countdown.
    pub fn update(&mut self, dt: f32, ids: &mut IdGen) -> Option<Bullet> {
        if !self.is_alive() {
            return None;
        }

        self.object.integrate(dt);

        // Hard backstop; the map has no walls beyond this clamp
        self.object.x = self.object.x.clamp(PLAYER_RADIUS, MAP_SIZE - PLAYER_RADIUS);
        self.object.y = self.object.y.clamp(PLAYER_RADIUS, MAP_SIZE - PLAYER_RADIUS);

        self.fire_cooldown -= dt;
        if self.fire_cooldown <= 0.0 {
            // Add rather than reset: the overshoot carries into the next interval
            self.fire_cooldown += PLAYER_FIRE_COOLDOWN;
            return Some(Bullet::new(
                ids.next(),
                self.id,
                self.object.x,
                self.object.y,
                self.object.direction,
                self.color.clone(),
            ));
        }

        None
    }

    /// Apply one bullet's worth of damage. HP may go negative; the
    /// world reads that only as the death trigger.
    pub fn take_bullet_damage(&mut self) {
        if let Liveness::Alive { hp } = &mut self.liveness {
            *hp -= BULLET_DAMAGE;
        }
    }

    /// Credit one confirmed kill
    pub fn on_dealt_damage(&mut self) {
        self.score += 1.0;
    }

    /// Heal from a kit, saturating at max HP
    pub fn use_aid_kit(&mut self, kit_hp: i32) {
        if let Liveness::Alive { hp } = &mut self.liveness {
            *hp = (*hp + kit_hp).min(PLAYER_MAX_HP);
        }
    }

    /// Enter the death countdown
    pub fn begin_death_countdown(&mut self) {
        self.liveness = Liveness::Dying {
            ticks_remaining: AFTER_DEATH_COUNTDOWN,
        };
    }

    /// Color as seen on the wire: the dead sentinel while in countdown
    pub fn wire_color(&self) -> &str {
        if self.is_alive() {
            &self.color
        } else {
            DEAD_COLOR
        }
    }

    /// Network-facing projection of this player. The hp field carries
    /// the countdown while dead, as clients expect.
    pub fn serialize_for_update(&self) -> PlayerView {
        let hp = match self.liveness {
            Liveness::Alive { hp } => hp,
            Liveness::Dying { ticks_remaining } => ticks_remaining as i32,
        };
        PlayerView {
            id: self.id,
            x: self.object.x,
            y: self.object.y,
            direction: self.object.direction,
            hp,
            user: self.user.clone(),
            color: self.wire_color().to_string(),
        }
    }
}
