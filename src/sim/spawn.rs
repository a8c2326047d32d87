//! Procedural spawning of hazards and pickups
//!
//! One spawn call per cadence window. Category selection walks a declarative
//! cumulative-weight table; coins come out as a five-coin string the player
//! can sweep through.

use glam::Vec2;
use rand::Rng;

use super::state::{Entity, EntityKind, WorldState};
use crate::consts::*;

/// Cumulative weight bands in fixed order, checked ascending.
/// The last bound is 1.0 so every roll in [0, 1) lands somewhere.
const SPAWN_TABLE: &[(EntityKind, f32)] = &[
    (EntityKind::Shield, 0.05),
    (EntityKind::Magnet, 0.08),
    (EntityKind::SlowMo, 0.10),
    (EntityKind::Coin, 0.30),
    (EntityKind::Beam, 0.50),
    (EntityKind::Bird, 0.70),
    (EntityKind::Rock, 1.00),
];

/// Spawn cadence shrinks as difficulty rises
pub fn spawn_interval(difficulty: f32) -> u32 {
    ((SPAWN_BASE_INTERVAL as f32 / difficulty).floor() as u32).max(1)
}

fn pick_kind(roll: f32) -> EntityKind {
    for &(kind, bound) in SPAWN_TABLE {
        if roll < bound {
            return kind;
        }
    }
    EntityKind::Rock
}

/// Vertical band that keeps a freshly spawned entity reachable
fn safe_band(kind: EntityKind, view_h: f32) -> (f32, f32) {
    let h = kind.size().y;
    let top = 20.0;
    let bottom = view_h - GROUND_MARGIN - 20.0 - h;
    (top, bottom.max(top + 1.0))
}

/// Roll a category and place it just past the right edge
pub fn spawn(state: &mut WorldState, view_w: f32, view_h: f32) {
    let view_w = if view_w.is_finite() { view_w.max(MIN_VIEW_W) } else { MIN_VIEW_W };
    let view_h = if view_h.is_finite() { view_h.max(MIN_VIEW_H) } else { MIN_VIEW_H };

    let roll: f32 = state.rng.random();
    let kind = pick_kind(roll);

    let x = view_w + SPAWN_MARGIN;
    let (lo, hi) = safe_band(kind, view_h);
    let y = state.rng.random_range(lo..hi);

    match kind {
        EntityKind::Coin => spawn_coin_cluster(state, x, y),
        _ => {
            let id = state.next_entity_id();
            state.entities.push(Entity::new(id, kind, Vec2::new(x, y)));
        }
    }
}

/// Primary coin at the rolled position, four trailers staggered right on a
/// sine wave. The string never overlaps itself; overlap with unrelated
/// spawns is tolerated.
pub(crate) fn spawn_coin_cluster(state: &mut WorldState, x: f32, y: f32) {
    for i in 0..COIN_CLUSTER {
        let pos = Vec2::new(
            x + i as f32 * COIN_PITCH,
            y + (i as f32 * COIN_WAVE_STEP).sin() * COIN_WAVE_AMP,
        );
        let id = state.next_entity_id();
        state.entities.push(Entity::new(id, EntityKind::Coin, pos));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_bands_in_order() {
        assert_eq!(pick_kind(0.0), EntityKind::Shield);
        assert_eq!(pick_kind(0.049), EntityKind::Shield);
        assert_eq!(pick_kind(0.05), EntityKind::Magnet);
        assert_eq!(pick_kind(0.08), EntityKind::SlowMo);
        assert_eq!(pick_kind(0.10), EntityKind::Coin);
        assert_eq!(pick_kind(0.299), EntityKind::Coin);
        assert_eq!(pick_kind(0.30), EntityKind::Beam);
        assert_eq!(pick_kind(0.50), EntityKind::Bird);
        assert_eq!(pick_kind(0.70), EntityKind::Rock);
        assert_eq!(pick_kind(0.999), EntityKind::Rock);
    }

    #[test]
    fn test_interval_shrinks_with_difficulty() {
        assert_eq!(spawn_interval(1.0), SPAWN_BASE_INTERVAL);
        assert_eq!(spawn_interval(1.5), 60);
        assert_eq!(spawn_interval(2.0), 45);
        // Never reaches zero no matter the difficulty
        assert_eq!(spawn_interval(1000.0), 1);
    }

    #[test]
    fn test_coin_cluster_shape() {
        let mut state = WorldState::new(1, 480.0);
        spawn_coin_cluster(&mut state, 840.0, 200.0);

        assert_eq!(state.entities.len(), COIN_CLUSTER);
        assert!(state.entities.iter().all(|e| e.kind == EntityKind::Coin));
        // Primary at the rolled position
        assert_eq!(state.entities[0].pos, Vec2::new(840.0, 200.0));
        // Trailers at fixed pitch with sine vertical offsets
        for i in 1..COIN_CLUSTER {
            let e = &state.entities[i];
            assert_eq!(e.pos.x, 840.0 + i as f32 * COIN_PITCH);
            let expected_y = 200.0 + (i as f32 * COIN_WAVE_STEP).sin() * COIN_WAVE_AMP;
            assert!((e.pos.y - expected_y).abs() < 1e-4);
        }
    }

    #[test]
    fn test_spawns_enter_at_right_edge() {
        let mut state = WorldState::new(99, 480.0);
        for _ in 0..50 {
            spawn(&mut state, 800.0, 480.0);
        }
        assert!(!state.entities.is_empty());
        for e in &state.entities {
            assert!(e.pos.x >= 800.0 + SPAWN_MARGIN);
            assert!(e.pos.y.is_finite());
        }
        // Per-call count is 1, or COIN_CLUSTER for a coin string
        // (checked indirectly: every entity got a unique id)
        let mut ids: Vec<u32> = state.entities.iter().map(|e| e.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), state.entities.len());
        // Fifty rolls cover both sides of the weight table
        assert!(state.entities.iter().any(|e| e.kind.is_hazard()));
        assert!(state.entities.iter().any(|e| !e.kind.is_hazard()));
    }

    #[test]
    fn test_zero_view_does_not_produce_nan() {
        let mut state = WorldState::new(5, 480.0);
        for _ in 0..20 {
            spawn(&mut state, 0.0, 0.0);
        }
        for e in &state.entities {
            assert!(e.pos.x.is_finite() && e.pos.y.is_finite());
            assert!(e.pos.x >= MIN_VIEW_W);
        }
    }

    #[test]
    fn test_safe_band_keeps_margins() {
        let (lo, hi) = safe_band(EntityKind::Rock, 480.0);
        assert_eq!(lo, 20.0);
        assert_eq!(hi, 480.0 - GROUND_MARGIN - 20.0 - ROCK_SIZE.1);
        // Degenerate view still yields an ordered band
        let (lo, hi) = safe_band(EntityKind::Beam, 30.0);
        assert!(hi > lo);
    }
}
