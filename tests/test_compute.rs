use shooting_gallery::compute::*;
use shooting_gallery::config::RoundConfig;
use shooting_gallery::entities::*;
use shooting_gallery::factory::TargetFactory;
use shooting_gallery::input::InputEvent;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn make_config() -> RoundConfig {
    RoundConfig {
        time_limit_ms: None,
        ..RoundConfig::default()
    }
}

/// A running round started at t=0 with an empty field.
fn make_state() -> RoundState {
    start_round(&new_round(make_config()), 0)
}

fn seeded_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

fn target(kind: TargetKind, x: f32, y: f32) -> Target {
    let factory = TargetFactory::new(&RoundConfig::default());
    let mut t = factory.create_kind(kind, &mut seeded_rng());
    t.x = x;
    t.y = y;
    t.vx = 0.0;
    t.vy = 0.0;
    t
}

// ── new_round / start_round ───────────────────────────────────────────────────

#[test]
fn new_round_waits_at_menu() {
    let s = new_round(make_config());
    assert_eq!(s.status, GameStatus::Menu);
    assert_eq!(s.player.ammo, 5);
    assert_eq!(s.player.max_ammo, 5);
    assert_eq!(s.player.score, 0);
    assert_eq!(s.spawn_interval_ms, 1500);
    assert!(s.targets.is_empty());
}

#[test]
fn tick_does_nothing_at_menu() {
    let s = new_round(make_config());
    let s2 = tick(&s, 10_000, &mut seeded_rng());
    assert_eq!(s2, s);
}

#[test]
fn start_round_enters_running() {
    let s = start_round(&new_round(make_config()), 250);
    assert_eq!(s.status, GameStatus::Running);
    assert_eq!(s.started_at_ms, 250);
    assert_eq!(elapsed_at(&s, 1250), 1000);
}

#[test]
fn start_round_twice_is_a_no_op() {
    let s = make_state();
    let s2 = start_round(&s, 9999);
    assert_eq!(s2.started_at_ms, 0);
}

// ── shooting ──────────────────────────────────────────────────────────────────

#[test]
fn hit_normal_target_on_center() {
    let mut s = make_state();
    s.targets.push(target(TargetKind::Normal, 100.0, 100.0));
    let (cx, cy) = s.targets[0].center(60.0, 40.0);

    let (s2, hit) = player_shoot(&s, cx, cy);
    assert!(hit);
    assert_eq!(s2.player.score, 1);
    assert_eq!(s2.player.ammo, 5);
    assert!(s2.targets[0].hit);

    let s3 = tick(&s2, 16, &mut seeded_rng());
    assert!(s3.targets.is_empty());
    assert_eq!(s3.player.score, 1); // credited once, not again on removal
}

#[test]
fn miss_costs_one_round_and_records_miss() {
    let mut s = make_state();
    s.targets.push(target(TargetKind::Normal, 100.0, 100.0));
    let (s2, hit) = player_shoot(&s, 500.0, 500.0);
    assert!(!hit);
    assert_eq!(s2.player.ammo, 4);
    assert_eq!(s2.player.misses, 1);
    assert_eq!(s2.player.score, 0);
    assert!(!s2.targets[0].hit);
}

#[test]
fn bonus_target_restores_one_round() {
    let mut s = make_state();
    s.player.ammo = 3;
    s.targets.push(target(TargetKind::Bonus, 200.0, 200.0));
    let (s2, hit) = player_shoot(&s, 230.0, 220.0);
    assert!(hit);
    assert_eq!(s2.player.score, 3);
    assert_eq!(s2.player.ammo, 4);
}

#[test]
fn bonus_ammo_is_capped_at_max() {
    let mut s = make_state();
    s.player.ammo = 4;
    s.targets.push(target(TargetKind::Bonus, 200.0, 200.0));
    s.targets.push(target(TargetKind::Bonus, 400.0, 200.0));
    let (s2, _) = player_shoot(&s, 230.0, 220.0);
    assert_eq!(s2.player.ammo, 5);
    let (s3, _) = player_shoot(&s2, 430.0, 220.0);
    assert_eq!(s3.player.ammo, 5); // not 6
}

#[test]
fn fake_target_can_drive_score_negative() {
    let mut s = make_state();
    s.targets.push(target(TargetKind::Fake, 100.0, 100.0));
    let (s2, hit) = player_shoot(&s, 110.0, 110.0);
    assert!(hit);
    assert_eq!(s2.player.score, -1);
}

#[test]
fn fast_target_scores_two() {
    let mut s = make_state();
    s.targets.push(target(TargetKind::Fast, 100.0, 100.0));
    let (s2, _) = player_shoot(&s, 110.0, 110.0);
    assert_eq!(s2.player.score, 2);
}

#[test]
fn overlapping_targets_resolve_to_earliest_spawned() {
    let mut s = make_state();
    s.targets.push(target(TargetKind::Fake, 100.0, 100.0));
    s.targets.push(target(TargetKind::Bonus, 120.0, 110.0));
    // (130, 120) is inside both boxes
    let (s2, hit) = player_shoot(&s, 130.0, 120.0);
    assert!(hit);
    assert!(s2.targets[0].hit);
    assert!(!s2.targets[1].hit);
    assert_eq!(s2.player.score, -1);

    // A second shot at the same point skips the resolved target
    let (s3, hit) = player_shoot(&s2, 130.0, 120.0);
    assert!(hit);
    assert!(s3.targets[1].hit);
    assert_eq!(s3.player.score, 2);
}

#[test]
fn box_edges_are_half_open() {
    let mut s = make_state();
    s.targets.push(target(TargetKind::Normal, 100.0, 100.0));
    let (_, hit_left) = player_shoot(&s, 100.0, 100.0);
    let (_, hit_right) = player_shoot(&s, 160.0, 120.0);
    assert!(hit_left);
    assert!(!hit_right);
}

#[test]
fn shooting_with_no_ammo_is_rejected() {
    let mut s = make_state();
    s.player.ammo = 0;
    s.targets.push(target(TargetKind::Normal, 100.0, 100.0));
    let (s2, hit) = player_shoot(&s, 110.0, 110.0);
    assert!(!hit);
    assert_eq!(s2, s);
}

#[test]
fn shooting_while_paused_is_rejected() {
    let mut s = make_state();
    s.targets.push(target(TargetKind::Normal, 100.0, 100.0));
    let paused = toggle_pause(&s, 100);
    let (s2, hit) = player_shoot(&paused, 110.0, 110.0);
    assert!(!hit);
    assert_eq!(s2.player, s.player);
    assert!(!s2.targets[0].hit);
}

#[test]
fn resolve_shot_handles_one_target_per_call() {
    let mut player = make_state().player;
    let mut targets = vec![
        target(TargetKind::Normal, 0.0, 0.0),
        target(TargetKind::Normal, 0.0, 0.0),
    ];
    assert!(resolve_shot(&mut player, &mut targets, 5.0, 5.0, 60.0, 40.0));
    assert_eq!(targets.iter().filter(|t| t.hit).count(), 1);
    assert_eq!(player.shots, 1);
    assert_eq!(player.hits, 1);
}

#[test]
fn does_not_mutate_original() {
    let mut s = make_state();
    s.targets.push(target(TargetKind::Normal, 100.0, 100.0));
    let _ = player_shoot(&s, 110.0, 110.0);
    let _ = tick(&s, 500, &mut seeded_rng());
    assert!(!s.targets[0].hit);
    assert_eq!(s.player.ammo, 5);
    assert_eq!(s.elapsed_ms, 0);
}

// ── game over ─────────────────────────────────────────────────────────────────

#[test]
fn last_round_missed_ends_game_on_next_tick() {
    let mut s = make_state();
    s.player.ammo = 1;
    let (s2, hit) = player_shoot(&s, 400.0, 300.0);
    assert!(!hit);
    assert_eq!(s2.player.ammo, 0);
    assert_eq!(s2.status, GameStatus::Running);

    let s3 = tick(&s2, 16, &mut seeded_rng());
    assert_eq!(s3.status, GameStatus::GameOver);
    assert_eq!(s3.game_over_reason, Some(GameOverReason::OutOfAmmo));
}

#[test]
fn time_limit_ends_round() {
    let config = RoundConfig {
        time_limit_ms: Some(5000),
        ..RoundConfig::default()
    };
    let s = start_round(&new_round(config), 0);
    let s2 = tick(&s, 4999, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Running);
    let s3 = tick(&s2, 5000, &mut seeded_rng());
    assert_eq!(s3.status, GameStatus::GameOver);
    assert_eq!(s3.game_over_reason, Some(GameOverReason::TimeUp));
}

#[test]
fn game_over_is_terminal() {
    let mut s = make_state();
    s.player.ammo = 0;
    let over = tick(&s, 16, &mut seeded_rng());
    assert!(over.is_over());
    assert_eq!(tick(&over, 10_000, &mut seeded_rng()), over);
    assert_eq!(toggle_pause(&over, 10_000), over);
    assert_eq!(elapsed_at(&over, 50_000), 16);
}

// ── pause / time accounting ───────────────────────────────────────────────────

#[test]
fn pause_excludes_paused_duration() {
    let s = tick(&make_state(), 1000, &mut seeded_rng());
    let before = elapsed_at(&s, 1000);
    let paused = toggle_pause(&s, 1000);
    assert!(paused.is_paused());
    assert_eq!(elapsed_at(&paused, 4000), before);

    let resumed = toggle_pause(&paused, 6000);
    assert_eq!(resumed.status, GameStatus::Running);
    assert_eq!(resumed.paused_total_ms, 5000);
    assert_eq!(elapsed_at(&resumed, 6000), before);
    assert_eq!(elapsed_at(&resumed, 6016), before + 16);
}

#[test]
fn paused_round_does_not_advance() {
    let mut s = make_state();
    let mut t = target(TargetKind::Normal, 400.0, 300.0);
    t.vx = -3.0;
    s.targets.push(t);
    let paused = toggle_pause(&s, 0);
    let later = tick(&paused, 20_000, &mut seeded_rng());
    assert_eq!(later, paused);
}

#[test]
fn resume_does_not_trigger_catch_up_spawn() {
    let s = tick(&make_state(), 1000, &mut seeded_rng());
    let paused = toggle_pause(&s, 1000);
    let resumed = toggle_pause(&paused, 30_000);
    let s2 = tick(&resumed, 30_016, &mut seeded_rng());
    assert!(s2.targets.is_empty());
    assert_eq!(s2.spawn_interval_ms, 1500);
    assert_eq!(s2.elapsed_ms, 1016);
}

#[test]
fn toggle_pause_at_menu_is_ignored() {
    let s = new_round(make_config());
    assert_eq!(toggle_pause(&s, 10), s);
}

#[test]
fn apply_input_routes_events() {
    let s = make_state();
    let (paused, ctl) = apply_input(&s, InputEvent::PauseToggle, 10);
    assert_eq!(ctl, Control::Continue);
    assert!(paused.is_paused());

    let (_, ctl) = apply_input(&s, InputEvent::Quit, 10);
    assert_eq!(ctl, Control::Quit);

    let (shot, ctl) = apply_input(&s, InputEvent::Click { x: 1.0, y: 1.0 }, 10);
    assert_eq!(ctl, Control::Continue);
    assert_eq!(shot.player.ammo, 4);
}

// ── tick: spawning ───────────────────────────────────────────────────────────

#[test]
fn no_spawn_before_interval() {
    let s = tick(&make_state(), 1499, &mut seeded_rng());
    assert!(s.targets.is_empty());
}

#[test]
fn spawns_off_the_right_edge_on_interval() {
    let s = tick(&make_state(), 1499, &mut seeded_rng());
    let s2 = tick(&s, 1500, &mut seeded_rng());
    assert_eq!(s2.targets.len(), 1);
    assert_eq!(s2.last_spawn_at_ms, 1500);
    let t = &s2.targets[0];
    assert!(t.x >= 790.0 && t.x <= 900.0);
    assert!(t.y >= 49.0 && t.y <= 551.0);
    assert!(t.vx < 0.0);
}

#[test]
fn spawn_respects_target_cap() {
    let mut s = make_state();
    for i in 0..10 {
        s.targets.push(target(TargetKind::Normal, 100.0 + i as f32, 100.0));
    }
    let s2 = tick(&s, 1500, &mut seeded_rng());
    assert_eq!(s2.targets.len(), 10);
}

#[test]
fn resolved_targets_do_not_count_toward_cap() {
    let mut s = make_state();
    for i in 0..10 {
        s.targets.push(target(TargetKind::Normal, 100.0 + i as f32, 100.0));
    }
    s.targets[3].hit = true;
    // pretend the previous tick ran at 1499 so the newcomer barely moves
    s.elapsed_ms = 1499;
    let s2 = tick(&s, 1500, &mut seeded_rng());
    // one purged, one spawned
    assert_eq!(s2.targets.len(), 10);
    assert!(s2.targets.iter().all(|t| !t.hit));
}

// ── tick: difficulty ramp ────────────────────────────────────────────────────

#[test]
fn ramp_shortens_interval_down_to_floor() {
    let mut rng = seeded_rng();
    let s = tick(&make_state(), 2999, &mut rng);
    assert_eq!(s.spawn_interval_ms, 1500);
    assert_eq!(s.speed_bonus(), 0.0);

    let s = tick(&s, 3000, &mut rng);
    assert_eq!(s.spawn_interval_ms, 1000);
    assert_eq!(s.speed_bonus(), 0.5);

    let s = tick(&s, 6000, &mut rng);
    assert_eq!(s.spawn_interval_ms, 500);

    let s = tick(&s, 9000, &mut rng);
    assert_eq!(s.spawn_interval_ms, 400);

    let s = tick(&s, 12_000, &mut rng);
    assert_eq!(s.spawn_interval_ms, 400);
    assert_eq!(s.speed_bonus(), 2.0);
}

#[test]
fn ramp_leaves_existing_targets_velocity_alone() {
    let mut s = make_state();
    let mut t = target(TargetKind::Normal, 400.0, 300.0);
    t.vx = -0.25;
    s.targets.push(t);
    let s2 = tick(&s, 2999, &mut seeded_rng());
    let s3 = tick(&s2, 3000, &mut seeded_rng());
    assert_eq!(s3.speed_bonus(), 0.5);
    assert_eq!(s3.targets[0].vx, -0.25);
}

// ── tick: movement & culling ─────────────────────────────────────────────────

#[test]
fn movement_scales_with_elapsed_time() {
    let mut s = make_state();
    let mut t = target(TargetKind::Normal, 400.0, 300.0);
    t.vx = -2.0;
    t.vy = 1.0;
    s.targets.push(t);

    // One second at the 60 Hz reference is 60 frames.
    let one_step = tick(&s, 1000, &mut seeded_rng());
    assert!((one_step.targets[0].x - 280.0).abs() < 1e-3);
    assert!((one_step.targets[0].y - 360.0).abs() < 1e-3);

    // The same second in ten slices lands in the same place.
    let mut sliced = s.clone();
    for i in 1..=10 {
        sliced = tick(&sliced, i * 100, &mut seeded_rng());
    }
    assert!((sliced.targets[0].x - one_step.targets[0].x).abs() < 1e-3);
    assert!((sliced.targets[0].y - one_step.targets[0].y).abs() < 1e-3);
}

#[test]
fn target_leaving_left_edge_is_removed_without_penalty() {
    let mut s = make_state();
    let mut t = target(TargetKind::Normal, -59.0, 300.0);
    t.vx = -3.0;
    s.targets.push(t);
    let s2 = tick(&s, 16, &mut seeded_rng());
    assert!(s2.targets.is_empty());
    assert_eq!(s2.player.ammo, 5);
    assert_eq!(s2.player.score, 0);
    assert_eq!(s2.player.misses, 0);
}

#[test]
fn target_leaving_top_or_bottom_is_removed() {
    let mut s = make_state();
    let mut up = target(TargetKind::Normal, 400.0, -39.0);
    up.vy = -3.0;
    let mut down = target(TargetKind::Normal, 400.0, 599.0);
    down.vy = 3.0;
    s.targets.push(up);
    s.targets.push(down);
    let s2 = tick(&s, 16, &mut seeded_rng());
    assert!(s2.targets.is_empty());
}

#[test]
fn tick_counts_ticks() {
    let s = tick(&make_state(), 16, &mut seeded_rng());
    let s2 = tick(&s, 32, &mut seeded_rng());
    assert_eq!(s2.tick_count, 2);
    assert_eq!(s2.elapsed_ms, 32);
}
