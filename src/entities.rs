/// All game entity types. Pure data, no logic.

use serde::{Deserialize, Serialize};

use crate::config::RoundConfig;
use crate::factory::TargetFactory;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Normal,
    Fast,
    Fake,
    Bonus,
}

impl TargetKind {
    /// Stable ordering used by the weight table in `RoundConfig`.
    pub const ALL: [TargetKind; 4] = [
        TargetKind::Normal,
        TargetKind::Fast,
        TargetKind::Fake,
        TargetKind::Bonus,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Menu,
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    OutOfAmmo,
    TimeUp,
}

// ── Targets ───────────────────────────────────────────────────────────────────

/// A moving target.  `x`/`y` is the top-left corner of its bounding box;
/// the box size comes from `RoundConfig`, never from artwork.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub x: f32,
    pub y: f32,
    /// Pixels per reference frame (negative = leftward).
    pub vx: f32,
    pub vy: f32,
    pub kind: TargetKind,
    pub points: i64,
    pub restores_ammo: bool,
    /// Set by a shot; the next tick removes the target.
    pub hit: bool,
}

impl Target {
    /// Half-open containment test, so touching boxes never both claim a point.
    pub fn contains(&self, px: f32, py: f32, width: f32, height: f32) -> bool {
        px >= self.x && px < self.x + width && py >= self.y && py < self.y + height
    }

    pub fn center(&self, width: f32, height: f32) -> (f32, f32) {
        (self.x + width / 2.0, self.y + height / 2.0)
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// May go negative (fake targets subtract points).
    pub score: i64,
    pub ammo: u32,
    pub max_ammo: u32,
    pub shots: u32,
    pub hits: u32,
    pub misses: u32,
}

// ── Round ─────────────────────────────────────────────────────────────────────

/// The entire round state.  Cloneable so pure update functions can return a
/// new copy without mutating the original, and serializable so a round can be
/// snapshotted and resumed.
///
/// Timer fields named `*_at_ms` are measured on the round's *active* clock
/// (wall time minus paused time), so pausing freezes them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub config: RoundConfig,
    pub factory: TargetFactory,
    /// Spawn order; shot resolution scans front to back.
    pub targets: Vec<Target>,
    pub player: Player,
    pub status: GameStatus,
    pub game_over_reason: Option<GameOverReason>,
    pub spawn_interval_ms: u64,
    pub last_spawn_at_ms: u64,
    pub last_ramp_at_ms: u64,
    /// Active time as of the last tick.
    pub elapsed_ms: u64,
    /// Clock reading at round start (or at resume from a snapshot).
    pub started_at_ms: u64,
    /// Active time already accumulated before `started_at_ms`; non-zero only
    /// for rounds resumed from a snapshot.
    pub carried_elapsed_ms: u64,
    pub paused_total_ms: u64,
    pub pause_started_at_ms: Option<u64>,
    pub tick_count: u64,
}

impl RoundState {
    pub fn speed_bonus(&self) -> f32 {
        self.factory.speed_bonus
    }

    pub fn is_paused(&self) -> bool {
        self.status == GameStatus::Paused
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    /// Targets not yet resolved by a shot.
    pub fn live_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| !t.hit)
    }

    /// Read-only view handed to the renderer once per tick.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            targets: &self.targets,
            target_width: self.config.target_width,
            target_height: self.config.target_height,
            screen_width: self.config.screen_width,
            screen_height: self.config.screen_height,
            score: self.player.score,
            ammo: self.player.ammo,
            max_ammo: self.player.max_ammo,
            elapsed_seconds: self.elapsed_ms / 1000,
            time_limit_seconds: self.config.time_limit_ms.map(|ms| ms / 1000),
            paused: self.is_paused(),
            game_over: self.is_over(),
            game_over_reason: self.game_over_reason,
        }
    }
}

/// Snapshot view of a round for presentation.  Holds no mutable access.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub targets: &'a [Target],
    pub target_width: f32,
    pub target_height: f32,
    pub screen_width: f32,
    pub screen_height: f32,
    pub score: i64,
    pub ammo: u32,
    pub max_ammo: u32,
    pub elapsed_seconds: u64,
    pub time_limit_seconds: Option<u64>,
    pub paused: bool,
    pub game_over: bool,
    pub game_over_reason: Option<GameOverReason>,
}
