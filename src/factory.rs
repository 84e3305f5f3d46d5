/// Target creation: weighted kind selection and per-kind constant tables.
///
/// The difficulty `speed_bonus` lives here as a plain value owned by the
/// round.  It is read once when a target is created and copied into that
/// target's velocity, so raising it later never touches targets already
/// on screen.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{KindWeights, RoundConfig};
use crate::entities::{Target, TargetKind};

// ── Per-kind tables ──────────────────────────────────────────────────────────

/// Base horizontal speed range, pixels per reference frame.
pub fn base_speed_range(kind: TargetKind) -> (f32, f32) {
    match kind {
        TargetKind::Normal => (3.0, 4.0),
        TargetKind::Fast => (6.0, 7.0),
        TargetKind::Fake => (2.0, 3.0),
        TargetKind::Bonus => (3.0, 4.0),
    }
}

/// Score change when a target of this kind is hit.
pub fn points_for(kind: TargetKind) -> i64 {
    match kind {
        TargetKind::Normal => 1,
        TargetKind::Fast => 2,
        TargetKind::Fake => -1,
        TargetKind::Bonus => 3,
    }
}

pub fn restores_ammo(kind: TargetKind) -> bool {
    matches!(kind, TargetKind::Bonus)
}

/// Vertical speed magnitude is a whole number in this range.
const VERTICAL_SPEED: std::ops::RangeInclusive<i32> = 1..=3;
/// Spawn x is staggered up to this far past the right edge.
const SPAWN_STAGGER: f32 = 100.0;
/// Vertical margin kept clear at the top and bottom of the spawn band.
const SPAWN_MARGIN: f32 = 50.0;

// ── Kind selection ───────────────────────────────────────────────────────────

/// The configured weights together with the sampling table built from them.
/// Only the weights are serialized; the table is rebuilt on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "KindWeights", into = "KindWeights")]
pub struct KindPicker {
    weights: KindWeights,
    index: Option<WeightedIndex<f64>>,
}

impl KindPicker {
    pub fn pick(&self, rng: &mut impl Rng) -> TargetKind {
        match &self.index {
            Some(dist) => TargetKind::ALL[dist.sample(rng)],
            // Degenerate weights are rejected by `RoundConfig::validate`.
            None => TargetKind::Normal,
        }
    }
}

impl From<KindWeights> for KindPicker {
    fn from(weights: KindWeights) -> Self {
        Self {
            weights,
            index: WeightedIndex::new(weights.as_array()).ok(),
        }
    }
}

impl From<KindPicker> for KindWeights {
    fn from(picker: KindPicker) -> Self {
        picker.weights
    }
}

impl PartialEq for KindPicker {
    fn eq(&self, other: &Self) -> bool {
        self.weights == other.weights
    }
}

// ── Factory ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetFactory {
    pub kinds: KindPicker,
    pub speed_bonus: f32,
    pub speed_step: f32,
    pub max_speed_bonus: f32,
    pub screen_width: f32,
    pub screen_height: f32,
}

impl TargetFactory {
    pub fn new(config: &RoundConfig) -> Self {
        Self {
            kinds: KindPicker::from(config.weights),
            speed_bonus: 0.0,
            speed_step: config.speed_step,
            max_speed_bonus: config.max_speed_bonus,
            screen_width: config.screen_width,
            screen_height: config.screen_height,
        }
    }

    /// Pick a kind according to the configured weights.
    pub fn choose_kind(&self, rng: &mut impl Rng) -> TargetKind {
        self.kinds.pick(rng)
    }

    pub fn create(&self, rng: &mut impl Rng) -> Target {
        let kind = self.choose_kind(rng);
        self.create_kind(kind, rng)
    }

    /// Build a target of a specific kind, sampling its speed and spawn point.
    pub fn create_kind(&self, kind: TargetKind, rng: &mut impl Rng) -> Target {
        let (lo, hi) = base_speed_range(kind);
        let base = rng.gen_range(lo..=hi);

        let magnitude = rng.gen_range(VERTICAL_SPEED) as f32;
        let vy = if rng.gen_bool(0.5) { magnitude } else { -magnitude };

        let x = rng.gen_range(self.screen_width..=self.screen_width + SPAWN_STAGGER);
        let y_max = (self.screen_height - SPAWN_MARGIN).max(SPAWN_MARGIN);
        let y = rng.gen_range(SPAWN_MARGIN..=y_max);

        Target {
            x,
            y,
            vx: -(base + self.speed_bonus),
            vy,
            kind,
            points: points_for(kind),
            restores_ammo: restores_ammo(kind),
            hit: false,
        }
    }

    /// Raise the bonus applied to targets created from now on.
    pub fn increase_speed(&mut self) {
        self.speed_bonus = (self.speed_bonus + self.speed_step).min(self.max_speed_bonus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn scoring_table() {
        assert_eq!(points_for(TargetKind::Normal), 1);
        assert_eq!(points_for(TargetKind::Fast), 2);
        assert_eq!(points_for(TargetKind::Fake), -1);
        assert_eq!(points_for(TargetKind::Bonus), 3);
        assert!(restores_ammo(TargetKind::Bonus));
        assert!(!restores_ammo(TargetKind::Fake));
    }

    #[test]
    fn speed_bonus_is_clamped() {
        let config = RoundConfig {
            max_speed_bonus: 1.0,
            ..RoundConfig::default()
        };
        let mut factory = TargetFactory::new(&config);
        for _ in 0..10 {
            factory.increase_speed();
        }
        assert_eq!(factory.speed_bonus, 1.0);
    }

    #[test]
    fn kind_table_is_rebuilt_after_deserializing() {
        let factory = TargetFactory::new(&RoundConfig::default());
        let json = serde_json::to_string(&factory).unwrap();
        assert!(json.contains("\"kinds\":{\"normal\":0.5"));

        let restored: TargetFactory = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, factory);
        assert!(restored.kinds.index.is_some());

        let mut a = rand_chacha::ChaCha8Rng::seed_from_u64(11);
        let mut b = a.clone();
        for _ in 0..200 {
            assert_eq!(factory.choose_kind(&mut a), restored.choose_kind(&mut b));
        }
    }

    #[test]
    fn degenerate_weights_fall_back_to_normal() {
        let picker = KindPicker::from(KindWeights {
            normal: 0.0,
            fast: 0.0,
            fake: 0.0,
            bonus: 0.0,
        });
        assert!(picker.index.is_none());
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
        assert_eq!(picker.pick(&mut rng), TargetKind::Normal);
    }
}
