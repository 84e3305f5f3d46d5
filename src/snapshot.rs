/// Save/replay support: a round serialized to JSON and resumed on any clock.

use crate::compute::elapsed_at;
use crate::entities::{GameStatus, RoundState};

pub fn encode(state: &RoundState) -> serde_json::Result<String> {
    serde_json::to_string(state)
}

pub fn decode(json: &str) -> serde_json::Result<RoundState> {
    serde_json::from_str(json)
}

/// Rebase a restored round onto a clock that now reads `now_ms`.
///
/// The active time recorded in the snapshot is carried over, so the next
/// tick sees exactly the delta it would have seen without the interruption.
/// A round captured while paused stays paused, with its pause starting now;
/// it carries the active time reached at the moment it was paused, which can
/// be later than its last tick.
pub fn resume_from_snapshot(state: &RoundState, now_ms: u64) -> RoundState {
    match state.status {
        GameStatus::Running => RoundState {
            started_at_ms: now_ms,
            carried_elapsed_ms: state.elapsed_ms,
            paused_total_ms: 0,
            pause_started_at_ms: None,
            ..state.clone()
        },
        GameStatus::Paused => RoundState {
            started_at_ms: now_ms,
            carried_elapsed_ms: state
                .pause_started_at_ms
                .map_or(state.elapsed_ms, |p| elapsed_at(state, p)),
            paused_total_ms: 0,
            pause_started_at_ms: Some(now_ms),
            ..state.clone()
        },
        GameStatus::Menu | GameStatus::GameOver => state.clone(),
    }
}
