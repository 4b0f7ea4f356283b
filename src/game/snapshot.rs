//! Snapshot building and per-recipient culling

use crate::util::time::unix_millis;
use crate::ws::protocol::{LeaderboardEntry, ServerMsg};

use super::aidkit::AidKit;
use super::bullet::Bullet;
use super::constants::{CULL_RADIUS, LEADERBOARD_SIZE};
use super::player::Player;

/// Paces broadcasts to every Nth tick
pub struct SnapshotBuilder {
    /// Tick counter since last snapshot
    ticks_since_snapshot: u32,
    /// Snapshot interval in ticks
    snapshot_interval: u32,
}

impl SnapshotBuilder {
    pub fn new(snapshot_interval: u32) -> Self {
        Self {
            ticks_since_snapshot: 0,
            snapshot_interval,
        }
    }

    /// Check if it's time to send a snapshot
    pub fn should_send(&mut self) -> bool {
        self.ticks_since_snapshot += 1;
        if self.ticks_since_snapshot >= self.snapshot_interval {
            self.ticks_since_snapshot = 0;
            true
        } else {
            false
        }
    }

    /// Build the personalized update for one recipient.
    ///
    /// Only entities within the cull radius of the recipient make it
    /// into the payload; the leaderboard, messages and player count are
    /// shared across recipients. Recomputed fresh per recipient, since
    /// every view differs.
    pub fn build_for(
        &self,
        recipient: &Player,
        players: &[Player],
        bullets: &[Bullet],
        aid_kits: &[AidKit],
        leaderboard: &[LeaderboardEntry],
        messages: &[String],
    ) -> ServerMsg {
        let center = &recipient.object;

        let others = players
            .iter()
            .filter(|p| p.id != recipient.id && p.object.distance_to(center) <= CULL_RADIUS)
            .map(Player::serialize_for_update)
            .collect();

        let bullets = bullets
            .iter()
            .filter(|b| b.object.distance_to(center) <= CULL_RADIUS)
            .map(Bullet::serialize_for_update)
            .collect();

        let aid_kits = aid_kits
            .iter()
            .filter(|k| k.exist && k.distance_to(center) <= CULL_RADIUS)
            .map(AidKit::serialize_for_update)
            .collect();

        ServerMsg::GameUpdate {
            t: unix_millis(),
            me: recipient.serialize_for_update(),
            others,
            bullets,
            aid_kits,
            leaderboard: leaderboard.to_vec(),
            messages: messages.to_vec(),
            player_count: players.len(),
        }
    }
}

/// Top players by score, descending; ties keep registration order.
/// Scores are rounded to whole numbers for display.
pub fn leaderboard(players: &[Player]) -> Vec<LeaderboardEntry> {
    let mut by_score: Vec<&Player> = players.iter().collect();
    // Stable sort, so equal scores stay in registration order
    by_score.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    by_score
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .map(|p| LeaderboardEntry {
            name: p.user.name.clone(),
            score: p.score.round() as i64,
        })
        .collect()
}
