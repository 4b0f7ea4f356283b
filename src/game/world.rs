//! World state and authoritative tick loop

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{info, warn};
use uuid::Uuid;

use crate::util::join_log::JoinLog;
use crate::util::time::{unix_millis, SNAPSHOT_INTERVAL_TICKS, TICK_DURATION_MICROS};
use crate::ws::protocol::{ServerMsg, UserIdentity};

use super::aidkit::AidKit;
use super::bullet::Bullet;
use super::collisions::{apply_aid_kits, apply_bullets, BulletHit};
use super::constants::{
    AID_KIT_PLAYER_RATIO, AID_KIT_RADIUS, MAP_SIZE, MAX_NAME_LEN, PLAYER_MAX_HP, PLAYER_RADIUS,
};
use super::object::IdGen;
use super::player::{Liveness, Player};
use super::snapshot::{leaderboard, SnapshotBuilder};
use super::traits::TraitTable;

/// Session-originated events. Queued by session tasks and applied at
/// the start of the next tick, so no mutation races the simulation.
#[derive(Debug)]
pub enum WorldCommand {
    Join {
        player_id: Uuid,
        user: UserIdentity,
        tx: mpsc::UnboundedSender<ServerMsg>,
    },
    Input {
        player_id: Uuid,
        direction: f32,
    },
    Disconnect {
        player_id: Uuid,
    },
}

/// Handle to the running world
#[derive(Clone)]
pub struct WorldHandle {
    pub cmd_tx: mpsc::UnboundedSender<WorldCommand>,
    player_count: Arc<AtomicUsize>,
}

impl WorldHandle {
    pub fn player_count(&self) -> usize {
        self.player_count.load(Ordering::Relaxed)
    }
}

/// The one shared world. Owns every entity collection and the
/// connection registry; all mutation happens inside `step`.
pub struct World {
    /// Registration order; this is the tie-break order everywhere
    players: Vec<Player>,
    connections: HashMap<Uuid, mpsc::UnboundedSender<ServerMsg>>,
    bullets: Vec<Bullet>,
    aid_kits: Vec<AidKit>,
    /// World event messages, flushed on every broadcast
    messages: Vec<String>,
    traits: Arc<TraitTable>,
    join_log: JoinLog,
    rng: ChaCha8Rng,
    ids: IdGen,
    snapshot_builder: SnapshotBuilder,
    cmd_rx: mpsc::UnboundedReceiver<WorldCommand>,
    player_count: Arc<AtomicUsize>,
    tick: u64,
}

impl World {
    pub fn new(seed: u64, traits: Arc<TraitTable>, join_log: JoinLog) -> (Self, WorldHandle) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let player_count = Arc::new(AtomicUsize::new(0));

        let handle = WorldHandle {
            cmd_tx,
            player_count: player_count.clone(),
        };

        let world = Self {
            players: Vec::new(),
            connections: HashMap::new(),
            bullets: Vec::new(),
            aid_kits: Vec::new(),
            messages: Vec::new(),
            traits,
            join_log,
            rng: ChaCha8Rng::seed_from_u64(seed),
            ids: IdGen::default(),
            snapshot_builder: SnapshotBuilder::new(SNAPSHOT_INTERVAL_TICKS),
            cmd_rx,
            player_count,
            tick: 0,
        };

        (world, handle)
    }

    /// Run the authoritative tick loop until every handle is dropped.
    /// A slow tick delays the next firing; ticks never overlap.
    pub async fn run(mut self) {
        info!("world started");

        let tick_duration = Duration::from_micros(TICK_DURATION_MICROS);
        let mut tick_interval = interval(tick_duration);
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut last_update = Instant::now();
        loop {
            tick_interval.tick().await;

            if !self.drain_commands() {
                info!("command channel closed, world stopping");
                break;
            }

            let now = Instant::now();
            let dt = now.duration_since(last_update).as_secs_f32();
            last_update = now;

            self.step(dt, unix_millis());
        }
    }

    /// Apply queued session events. Returns false once the channel is
    /// closed and drained.
    fn drain_commands(&mut self) -> bool {
        loop {
            match self.cmd_rx.try_recv() {
                Ok(WorldCommand::Join {
                    player_id,
                    user,
                    tx,
                }) => self.join(player_id, user, tx),
                Ok(WorldCommand::Input {
                    player_id,
                    direction,
                }) => self.handle_input(player_id, direction),
                Ok(WorldCommand::Disconnect { player_id }) => self.disconnect(player_id),
                Err(mpsc::error::TryRecvError::Empty) => return true,
                Err(mpsc::error::TryRecvError::Disconnected) => return false,
            }
        }
    }

    /// Register a new player at a random in-bounds position
    fn join(&mut self, player_id: Uuid, user: UserIdentity, tx: mpsc::UnboundedSender<ServerMsg>) {
        if self.connections.contains_key(&player_id) {
            warn!(player_id = %player_id, "duplicate join ignored");
            return;
        }

        let mut user = user;
        if user.name.is_empty() {
            user.name = "anonymous".to_string();
        }
        user.name = user.name.chars().take(MAX_NAME_LEN).collect();

        let color = self.traits.background_color(user.token_id.as_deref());
        let x = self.rng.gen_range(PLAYER_RADIUS..MAP_SIZE - PLAYER_RADIUS);
        let y = self.rng.gen_range(PLAYER_RADIUS..MAP_SIZE - PLAYER_RADIUS);
        let direction = self.rng.gen_range(0.0..std::f32::consts::TAU);

        self.join_log.record(&user.name);
        self.messages.push(format!("{} enters the chat", user.name));

        info!(player_id = %player_id, name = %user.name, color = %color, "player joined");

        self.players
            .push(Player::new(player_id, user, x, y, direction, color));
        self.connections.insert(player_id, tx);
        self.player_count.store(self.players.len(), Ordering::Relaxed);
    }

    /// Record a heading change. Unknown senders are ignored.
    fn handle_input(&mut self, player_id: Uuid, direction: f32) {
        if let Some(player) = self.players.iter_mut().find(|p| p.id == player_id) {
            player.set_direction(direction);
        }
    }

    /// Remove a player and its connection. Idempotent.
    fn disconnect(&mut self, player_id: Uuid) {
        if self.connections.remove(&player_id).is_some() {
            info!(player_id = %player_id, "player disconnected");
        }
        self.players.retain(|p| p.id != player_id);
        self.player_count.store(self.players.len(), Ordering::Relaxed);
    }

    /// One simulation tick
    pub(crate) fn step(&mut self, dt: f32, now_ms: u64) {
        self.tick += 1;

        // Bullets fly; expired ones drop out
        self.bullets.retain_mut(|b| b.update(dt));

        // Players move and possibly fire
        let mut fired: Vec<Bullet> = Vec::new();
        for player in &mut self.players {
            if let Some(bullet) = player.update(dt, &mut self.ids) {
                fired.push(bullet);
            }
        }
        self.bullets.extend(fired);

        // Bullet strikes; a bullet that scored a hit is gone this tick
        let hits = apply_bullets(&mut self.players, &self.bullets);
        self.bullets
            .retain(|b| !hits.iter().any(|h| h.bullet_id == b.id));

        self.sweep_deaths(&hits);

        // Heals
        let consumed = apply_aid_kits(&mut self.players, &self.aid_kits);
        self.aid_kits.retain(|k| !consumed.contains(&k.id));

        // Keep the kit population near the player-count target
        if self.aid_kits.len() < self.aid_kit_target() {
            self.spawn_aid_kit(now_ms);
        }
        for kit in &mut self.aid_kits {
            kit.update(now_ms);
        }

        // Broadcast at half tick rate
        if self.snapshot_builder.should_send() {
            self.broadcast();
            self.messages.clear();
        }
    }

    /// Transition freshly lethal hits into the death countdown, credit
    /// kills, and remove players whose countdown has run out.
    fn sweep_deaths(&mut self, hits: &[BulletHit]) {
        // Freshly dead: still Alive but at or below zero
        let mut kills: Vec<(Uuid, Option<Uuid>, String)> = Vec::new();
        for player in &self.players {
            if let Liveness::Alive { hp } = player.liveness {
                if hp <= 0 {
                    // First recorded hit on the victim wins attribution
                    let shooter = hits
                        .iter()
                        .find(|h| h.victim_id == player.id)
                        .map(|h| h.shooter_id);
                    kills.push((player.id, shooter, player.user.name.clone()));
                }
            }
        }

        for (victim_id, shooter_id, victim_name) in kills {
            // The killer may have disconnected this very tick
            let killer_name = shooter_id.and_then(|sid| {
                self.players.iter_mut().find(|p| p.id == sid).map(|killer| {
                    killer.on_dealt_damage();
                    killer.user.name.clone()
                })
            });

            info!(
                tick = self.tick,
                victim = %victim_name,
                killer = killer_name.as_deref().unwrap_or("unknown"),
                "player killed"
            );
            self.messages.push(format!(
                "{} blasted by {}",
                victim_name,
                killer_name.as_deref().unwrap_or("unknown")
            ));

            if let Some(victim) = self.players.iter_mut().find(|p| p.id == victim_id) {
                victim.begin_death_countdown();
            }
        }

        // Countdown runs every tick, including the transition tick
        let mut finished = Vec::new();
        for player in &mut self.players {
            if let Liveness::Dying { ticks_remaining } = &mut player.liveness {
                if *ticks_remaining == 0 {
                    finished.push(player.id);
                } else {
                    *ticks_remaining -= 1;
                }
            }
        }

        for player_id in finished {
            if let Some(tx) = self.connections.remove(&player_id) {
                let _ = tx.send(ServerMsg::GameOver);
            }
            self.players.retain(|p| p.id != player_id);
            info!(tick = self.tick, player_id = %player_id, "death countdown finished, player removed");
        }
        self.player_count.store(self.players.len(), Ordering::Relaxed);
    }

    /// Target kit count scales with the population
    fn aid_kit_target(&self) -> usize {
        let n = self.players.len();
        if n > 1 {
            ((AID_KIT_PLAYER_RATIO * n as f32).round() as usize).max(1)
        } else {
            1
        }
    }

    /// Spawn one inert kit with a jittered activation delay. The
    /// jitter keeps spawn timing from ever being perfectly periodic.
    fn spawn_aid_kit(&mut self, now_ms: u64) {
        let x = self.rng.gen_range(0.0..MAP_SIZE - AID_KIT_RADIUS);
        let y = self.rng.gen_range(0.0..MAP_SIZE - AID_KIT_RADIUS);
        let delay_ms =
            (2000.0 * (self.rng.gen::<f64>() + 5.0 * self.rng.gen::<f64>())) as u64;

        self.aid_kits.push(AidKit::new(
            self.ids.next(),
            x,
            y,
            PLAYER_MAX_HP,
            now_ms + delay_ms,
        ));
    }

    /// Fan out personalized snapshots. Read-only over settled state.
    fn broadcast(&self) {
        let board = leaderboard(&self.players);
        for player in &self.players {
            if let Some(tx) = self.connections.get(&player.id) {
                let _ = tx.send(self.snapshot_builder.build_for(
                    player,
                    &self.players,
                    &self.bullets,
                    &self.aid_kits,
                    &board,
                    &self.messages,
                ));
            }
        }
    }
}
