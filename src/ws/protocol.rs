//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client-supplied identity presented on join. The name is truncated
/// server-side; the token id only drives the cosmetic color lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub token_id: Option<String>,
}

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Enter the world
    Join {
        user: UserIdentity,
    },

    /// Desired heading for subsequent ticks
    Input {
        /// Heading in radians
        direction: f32,
    },

    /// Ping for latency measurement
    Ping {
        /// Client timestamp
        t: u64,
    },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Welcome message after connection
    Welcome {
        player_id: Uuid,
        server_time: u64,
    },

    /// Personalized world snapshot, sent every other tick
    GameUpdate {
        /// Server timestamp (ms)
        t: u64,
        /// The recipient's own state
        me: PlayerView,
        /// Other players within the cull radius
        others: Vec<PlayerView>,
        /// Bullets within the cull radius
        bullets: Vec<BulletView>,
        /// Activated aid kits within the cull radius
        aid_kits: Vec<AidKitView>,
        /// Shared leaderboard, identical for every recipient
        leaderboard: Vec<LeaderboardEntry>,
        /// World event messages accumulated since the last broadcast
        messages: Vec<String>,
        /// Total connected players
        player_count: usize,
    },

    /// The recipient's player has finished the death countdown
    GameOver,

    /// Pong response
    Pong {
        /// Echo back client timestamp
        t: u64,
    },
}

/// Network-facing view of a player. Never a live alias into world state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: Uuid,
    pub x: f32,
    pub y: f32,
    /// Heading in radians
    pub direction: f32,
    /// Health while alive; the removal countdown while dead
    pub hp: i32,
    pub user: UserIdentity,
    /// Cosmetic tag, or the reserved `"dead"` sentinel
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub direction: f32,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AidKitView {
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

/// One leaderboard row; scores are rounded to whole numbers on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: i64,
}
