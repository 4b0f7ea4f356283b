//! Collision resolution between bullets, players and aid kits
//!
//! Stateless passes run once per tick after integration. Iteration
//! order over players is connection-registration order, which makes
//! tie-breaks stable and reproducible.

use uuid::Uuid;

use super::aidkit::AidKit;
use super::bullet::Bullet;
use super::constants::{AID_KIT_RADIUS, BULLET_RADIUS, PLAYER_RADIUS};
use super::player::Player;

/// One bullet striking one player this tick
#[derive(Debug, Clone, Copy)]
pub struct BulletHit {
    pub bullet_id: u64,
    pub shooter_id: Uuid,
    pub victim_id: Uuid,
}

/// Resolve bullet strikes. Each hit damages the victim immediately and
/// marks the bullet destroyed. A bullet hits at most one player (the
/// first qualifying one); a player can absorb several bullets per tick.
pub fn apply_bullets(players: &mut [Player], bullets: &[Bullet]) -> Vec<BulletHit> {
    let mut hits = Vec::new();

    for bullet in bullets {
        for player in players.iter_mut() {
            // No self-hits, no friendly fire (color is the team tag),
            // and the dead can't be shot again
            if player.id == bullet.parent_id
                || player.color == bullet.color
                || !player.is_alive()
            {
                continue;
            }

            if bullet.object.distance_to(&player.object) <= PLAYER_RADIUS + BULLET_RADIUS {
                player.take_bullet_damage();
                hits.push(BulletHit {
                    bullet_id: bullet.id,
                    shooter_id: bullet.parent_id,
                    victim_id: player.id,
                });
                break;
            }
        }
    }

    hits
}

/// Resolve aid kit pickups. Only activated kits count; the first
/// qualifying player consumes the kit. Returns consumed kit ids.
pub fn apply_aid_kits(players: &mut [Player], kits: &[AidKit]) -> Vec<u64> {
    let mut consumed = Vec::new();

    for kit in kits.iter().filter(|k| k.exist) {
        for player in players.iter_mut() {
            if !player.is_alive() {
                continue;
            }

            if kit.distance_to(&player.object) <= PLAYER_RADIUS + AID_KIT_RADIUS {
                player.use_aid_kit(kit.hp);
                consumed.push(kit.id);
                break;
            }
        }
    }

    consumed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::{BULLET_DAMAGE, PLAYER_MAX_HP};
    use crate::game::player::Liveness;
    use crate::ws::protocol::UserIdentity;

    fn player_at(x: f32, y: f32, color: &str) -> Player {
        Player::new(
            Uuid::new_v4(),
            UserIdentity {
                name: "p".to_string(),
                token_id: None,
            },
            x,
            y,
            0.0,
            color.to_string(),
        )
    }

    fn hp_of(player: &Player) -> i32 {
        match player.liveness {
            Liveness::Alive { hp } => hp,
            Liveness::Dying { .. } => panic!("expected alive"),
        }
    }

    #[test]
    fn bullet_damages_first_player_in_registration_order() {
        let mut players = vec![
            player_at(100.0, 100.0, "blue"),
            player_at(105.0, 100.0, "green"),
        ];
        let shooter = Uuid::new_v4();
        let bullets = vec![Bullet::new(1, shooter, 102.0, 100.0, 0.0, "red".into())];

        let hits = apply_bullets(&mut players, &bullets);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].victim_id, players[0].id);
        assert_eq!(hp_of(&players[0]), PLAYER_MAX_HP - BULLET_DAMAGE);
        assert_eq!(hp_of(&players[1]), PLAYER_MAX_HP);
    }

    #[test]
    fn bullet_never_hits_its_shooter() {
        let mut players = vec![player_at(100.0, 100.0, "blue")];
        let shooter_id = players[0].id;
        let bullets = vec![Bullet::new(1, shooter_id, 100.0, 100.0, 0.0, "red".into())];

        assert!(apply_bullets(&mut players, &bullets).is_empty());
    }

    #[test]
    fn same_color_means_no_friendly_fire() {
        let mut players = vec![player_at(100.0, 100.0, "blue")];
        let bullets = vec![Bullet::new(1, Uuid::new_v4(), 100.0, 100.0, 0.0, "blue".into())];

        assert!(apply_bullets(&mut players, &bullets).is_empty());
        assert_eq!(hp_of(&players[0]), PLAYER_MAX_HP);
    }

    #[test]
    fn dying_players_are_not_hit() {
        let mut players = vec![player_at(100.0, 100.0, "blue")];
        players[0].begin_death_countdown();
        let bullets = vec![Bullet::new(1, Uuid::new_v4(), 100.0, 100.0, 0.0, "red".into())];

        assert!(apply_bullets(&mut players, &bullets).is_empty());
    }

    #[test]
    fn multiple_bullets_stack_damage_in_one_tick() {
        let mut players = vec![player_at(100.0, 100.0, "blue")];
        let shooter = Uuid::new_v4();
        let bullets = vec![
            Bullet::new(1, shooter, 100.0, 100.0, 0.0, "red".into()),
            Bullet::new(2, shooter, 101.0, 100.0, 0.0, "red".into()),
        ];

        let hits = apply_bullets(&mut players, &bullets);
        assert_eq!(hits.len(), 2);
        assert_eq!(hp_of(&players[0]), PLAYER_MAX_HP - 2 * BULLET_DAMAGE);
    }

    #[test]
    fn out_of_range_bullet_misses() {
        let mut players = vec![player_at(100.0, 100.0, "blue")];
        let far = 100.0 + PLAYER_RADIUS + BULLET_RADIUS + 1.0;
        let bullets = vec![Bullet::new(1, Uuid::new_v4(), far, 100.0, 0.0, "red".into())];

        assert!(apply_bullets(&mut players, &bullets).is_empty());
    }

    #[test]
    fn only_activated_kits_are_consumed() {
        let mut players = vec![player_at(100.0, 100.0, "blue")];
        players[0].take_bullet_damage();

        let mut inert = AidKit::new(1, 100.0, 100.0, PLAYER_MAX_HP, u64::MAX);
        inert.exist = false;
        let kits = vec![inert];

        assert!(apply_aid_kits(&mut players, &kits).is_empty());
        assert_eq!(hp_of(&players[0]), PLAYER_MAX_HP - BULLET_DAMAGE);
    }

    #[test]
    fn kit_goes_to_first_player_in_registration_order() {
        let mut players = vec![
            player_at(100.0, 100.0, "blue"),
            player_at(110.0, 100.0, "green"),
        ];
        players[0].take_bullet_damage();
        players[1].take_bullet_damage();

        let mut kit = AidKit::new(7, 105.0, 100.0, PLAYER_MAX_HP, 0);
        kit.exist = true;
        let kits = vec![kit];

        let consumed = apply_aid_kits(&mut players, &kits);
        assert_eq!(consumed, vec![7]);
        assert_eq!(hp_of(&players[0]), PLAYER_MAX_HP);
        assert_eq!(hp_of(&players[1]), PLAYER_MAX_HP - BULLET_DAMAGE);
    }
}
