//! Gameplay constants for the arena world

/// Side length of the square map, in world units
pub const MAP_SIZE: f32 = 3000.0;

/// Player hitbox radius
pub const PLAYER_RADIUS: f32 = 20.0;
/// Maximum (and starting) player health
pub const PLAYER_MAX_HP: i32 = 100;
/// Player movement speed, units per second
pub const PLAYER_SPEED: f32 = 400.0;
/// Seconds between shots. Overdue cooldowns bank the overshoot into
/// the next interval rather than resetting, smoothing the fire rate.
pub const PLAYER_FIRE_COOLDOWN: f32 = 0.25;
/// Display names are truncated to this many characters
pub const MAX_NAME_LEN: usize = 15;

/// Bullet hitbox radius
pub const BULLET_RADIUS: f32 = 3.0;
/// Bullet speed, units per second
pub const BULLET_SPEED: f32 = 800.0;
/// Damage dealt per bullet hit
pub const BULLET_DAMAGE: i32 = 10;
/// Seconds before an unspent bullet expires
pub const BULLET_LIFETIME: f32 = 1.5;

/// Aid kit pickup radius
pub const AID_KIT_RADIUS: f32 = 20.0;
/// Target aid kits per connected player (when more than one player)
pub const AID_KIT_PLAYER_RATIO: f32 = 0.33;

/// Ticks a dead player lingers before removal
pub const AFTER_DEATH_COUNTDOWN: u32 = 60;

/// Leaderboard length
pub const LEADERBOARD_SIZE: usize = 5;
/// Entities farther than this from a recipient are culled from its snapshot
pub const CULL_RADIUS: f32 = 0.5 * MAP_SIZE;

/// Cosmetic color used when no trait entry matches
pub const DEFAULT_COLOR: &str = "white";
/// Reserved sentinel color for players in the death countdown
pub const DEAD_COLOR: &str = "dead";
