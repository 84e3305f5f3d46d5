/// Pure game-logic functions.
///
/// Every public state transition takes an immutable reference to the current
/// `RoundState` (plus the current clock reading and, where needed, an RNG
/// handle) and returns a brand-new `RoundState`.  Side effects are limited to
/// the injected RNG and log output.

use rand::Rng;
use tracing::{debug, info};

use crate::config::RoundConfig;
use crate::entities::{GameOverReason, GameStatus, Player, RoundState, Target};
use crate::factory::TargetFactory;
use crate::input::InputEvent;

/// What the caller should do after an input event has been applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a round sitting at the menu.  Nothing moves until `start_round`.
pub fn new_round(config: RoundConfig) -> RoundState {
    let factory = TargetFactory::new(&config);
    let player = Player {
        score: 0,
        ammo: config.starting_ammo.min(config.max_ammo),
        max_ammo: config.max_ammo,
        shots: 0,
        hits: 0,
        misses: 0,
    };
    RoundState {
        spawn_interval_ms: config.initial_spawn_interval_ms,
        config,
        factory,
        targets: Vec::new(),
        player,
        status: GameStatus::Menu,
        game_over_reason: None,
        last_spawn_at_ms: 0,
        last_ramp_at_ms: 0,
        elapsed_ms: 0,
        started_at_ms: 0,
        carried_elapsed_ms: 0,
        paused_total_ms: 0,
        pause_started_at_ms: None,
        tick_count: 0,
    }
}

/// Leave the menu and start the round clock at `now_ms`.
pub fn start_round(state: &RoundState, now_ms: u64) -> RoundState {
    if state.status != GameStatus::Menu {
        return state.clone();
    }
    info!(
        ammo = state.player.ammo,
        time_limit_ms = ?state.config.time_limit_ms,
        "round started"
    );
    RoundState {
        status: GameStatus::Running,
        started_at_ms: now_ms,
        carried_elapsed_ms: 0,
        paused_total_ms: 0,
        pause_started_at_ms: None,
        elapsed_ms: 0,
        last_spawn_at_ms: 0,
        last_ramp_at_ms: 0,
        ..state.clone()
    }
}

// ── Time accounting ──────────────────────────────────────────────────────────

/// Active round time at `now_ms`: wall time since start minus every paused
/// stretch, including one still in progress.
pub fn elapsed_at(state: &RoundState, now_ms: u64) -> u64 {
    match state.status {
        GameStatus::Menu => 0,
        GameStatus::GameOver => state.elapsed_ms,
        GameStatus::Running | GameStatus::Paused => {
            let paused_now = state
                .pause_started_at_ms
                .map(|p| now_ms.saturating_sub(p))
                .unwrap_or(0);
            let since_start = now_ms
                .saturating_sub(state.started_at_ms)
                .saturating_sub(state.paused_total_ms)
                .saturating_sub(paused_now);
            state.carried_elapsed_ms.saturating_add(since_start)
        }
    }
}

/// Running ↔ Paused.  Any other status is left untouched.
pub fn toggle_pause(state: &RoundState, now_ms: u64) -> RoundState {
    match state.status {
        GameStatus::Running => {
            debug!(elapsed_ms = elapsed_at(state, now_ms), "paused");
            RoundState {
                status: GameStatus::Paused,
                pause_started_at_ms: Some(now_ms),
                ..state.clone()
            }
        }
        GameStatus::Paused => {
            let paused_for = state
                .pause_started_at_ms
                .map(|p| now_ms.saturating_sub(p))
                .unwrap_or(0);
            debug!(paused_for_ms = paused_for, "resumed");
            RoundState {
                status: GameStatus::Running,
                paused_total_ms: state.paused_total_ms.saturating_add(paused_for),
                pause_started_at_ms: None,
                ..state.clone()
            }
        }
        GameStatus::Menu | GameStatus::GameOver => state.clone(),
    }
}

// ── Shooting ─────────────────────────────────────────────────────────────────

/// Resolve one shot at `(x, y)` against `targets` in spawn order.
///
/// The earliest-spawned unresolved target whose box contains the point is
/// hit: it is flagged, its points are credited and a bonus target gives back
/// one round (capped at `max_ammo`).  A shot that hits nothing costs one
/// round.  At most one target is resolved per call.
///
/// Callers must not invoke this with zero ammo; `player_shoot` enforces that.
pub fn resolve_shot(
    player: &mut Player,
    targets: &mut [Target],
    x: f32,
    y: f32,
    target_width: f32,
    target_height: f32,
) -> bool {
    player.shots = player.shots.saturating_add(1);

    let struck = targets
        .iter_mut()
        .find(|t| !t.hit && t.contains(x, y, target_width, target_height));

    match struck {
        Some(target) => {
            target.hit = true;
            player.score = player.score.saturating_add(target.points);
            if target.restores_ammo {
                player.ammo = player.ammo.saturating_add(1).min(player.max_ammo);
            }
            player.hits = player.hits.saturating_add(1);
            debug!(kind = ?target.kind, points = target.points, "target hit");
            true
        }
        None => {
            player.ammo = player.ammo.saturating_sub(1);
            player.misses = player.misses.saturating_add(1);
            false
        }
    }
}

/// Fire at `(x, y)`.  Rejected (state unchanged, returns `false`) unless the
/// round is running and the player still has ammo.
pub fn player_shoot(state: &RoundState, x: f32, y: f32) -> (RoundState, bool) {
    if state.status != GameStatus::Running || state.player.ammo == 0 {
        return (state.clone(), false);
    }
    let mut player = state.player.clone();
    let mut targets = state.targets.clone();
    let hit = resolve_shot(
        &mut player,
        &mut targets,
        x,
        y,
        state.config.target_width,
        state.config.target_height,
    );
    let next = RoundState {
        player,
        targets,
        ..state.clone()
    };
    (next, hit)
}

/// Apply one queued input event.
pub fn apply_input(state: &RoundState, event: InputEvent, now_ms: u64) -> (RoundState, Control) {
    match event {
        InputEvent::Quit => (state.clone(), Control::Quit),
        InputEvent::PauseToggle => (toggle_pause(state, now_ms), Control::Continue),
        InputEvent::Click { x, y } => (player_shoot(state, x, y).0, Control::Continue),
    }
}

// ── Per-tick update (RNG is injected) ──────────────────────────────────

fn is_off_screen(target: &Target, config: &RoundConfig) -> bool {
    target.x + config.target_width < 0.0
        || target.y + config.target_height < 0.0
        || target.y > config.screen_height
}

/// Advance the simulation to `now_ms`.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// Only a running round advances; menu, paused and finished rounds come back
/// unchanged.
pub fn tick(state: &RoundState, now_ms: u64, rng: &mut impl Rng) -> RoundState {
    if state.status != GameStatus::Running {
        return state.clone();
    }

    let config = &state.config;
    let elapsed = elapsed_at(state, now_ms);
    let dt_ms = elapsed.saturating_sub(state.elapsed_ms);

    let mut factory = state.factory.clone();
    let mut targets = state.targets.clone();
    let mut spawn_interval_ms = state.spawn_interval_ms;
    let mut last_spawn_at_ms = state.last_spawn_at_ms;
    let mut last_ramp_at_ms = state.last_ramp_at_ms;

    // ── 1. Spawn ─────────────────────────────────────────────────────────────
    let live = targets.iter().filter(|t| !t.hit).count();
    if live < config.max_targets
        && elapsed.saturating_sub(last_spawn_at_ms) >= spawn_interval_ms
    {
        let target = factory.create(rng);
        debug!(kind = ?target.kind, x = target.x, y = target.y, vx = target.vx, "spawned");
        targets.push(target);
        last_spawn_at_ms = elapsed;
    }

    // ── 2. Difficulty ramp ───────────────────────────────────────────────────
    if elapsed.saturating_sub(last_ramp_at_ms) >= config.ramp_interval_ms {
        spawn_interval_ms = spawn_interval_ms
            .saturating_sub(config.spawn_interval_step_ms)
            .max(config.min_spawn_interval_ms);
        factory.increase_speed();
        last_ramp_at_ms = elapsed;
        debug!(spawn_interval_ms, speed_bonus = factory.speed_bonus, "difficulty ramp");
    }

    // ── 3. Movement & culling ────────────────────────────────────────────────
    // Hit targets were already credited by `resolve_shot`; here they are only
    // purged.  Misses that drift away cost nothing.
    let frames = config.frames_for(dt_ms);
    let before = targets.len();
    let targets: Vec<Target> = targets
        .into_iter()
        .filter(|t| !t.hit)
        .map(|t| Target {
            x: t.x + t.vx * frames,
            y: t.y + t.vy * frames,
            ..t
        })
        .filter(|t| !is_off_screen(t, config))
        .collect();
    if targets.len() != before {
        debug!(removed = before - targets.len(), "targets culled");
    }

    // ── 4. Terminal check ────────────────────────────────────────────────────
    let reason = if state.player.ammo == 0 {
        Some(GameOverReason::OutOfAmmo)
    } else if config.time_limit_ms.is_some_and(|limit| elapsed >= limit) {
        Some(GameOverReason::TimeUp)
    } else {
        None
    };
    let status = match reason {
        Some(reason) => {
            info!(?reason, score = state.player.score, elapsed_ms = elapsed, "game over");
            GameStatus::GameOver
        }
        None => GameStatus::Running,
    };

    RoundState {
        factory,
        targets,
        status,
        game_over_reason: reason,
        spawn_interval_ms,
        last_spawn_at_ms,
        last_ramp_at_ms,
        elapsed_ms: elapsed,
        tick_count: state.tick_count + 1,
        ..state.clone()
    }
}
