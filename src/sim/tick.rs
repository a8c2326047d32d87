//! Per-frame simulation tick
//!
//! One call advances the world by one tick. The phase machine gates the
//! gameplay pipeline; the decorative parallax advances in every phase so
//! the menu and game-over screens still animate.

use crate::consts::*;
use crate::mix_seed;
use super::state::{EntityKind, GameEvent, Phase, WorldState};
use super::{collision, particles, spawn};

/// Input signals for a single tick.
///
/// `thrusting` is level-triggered and read fresh every tick; `activate` is
/// edge-triggered and must be cleared by the driver after the tick consumes
/// it.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub thrusting: bool,
    pub activate: bool,
}

/// Advance the world by one tick
pub fn tick(state: &mut WorldState, input: &TickInput, view_w: f32, view_h: f32) {
    let view_w = if view_w.is_finite() { view_w.max(MIN_VIEW_W) } else { MIN_VIEW_W };
    let view_h = if view_h.is_finite() { view_h.max(MIN_VIEW_H) } else { MIN_VIEW_H };

    // Start or restart: the whole world is replaced, never patched
    if input.activate && state.phase != Phase::Playing {
        let next_seed = mix_seed(state.seed ^ state.tick_count);
        *state = WorldState::new(next_seed, view_h);
        state.phase = Phase::Playing;
        state.push_event(GameEvent::EngineStart);
        log::info!("run started (seed {next_seed})");
    }

    state.thrusting = input.thrusting;

    if state.phase == Phase::Playing {
        step_playing(state, view_w, view_h);
    }

    // Background keeps drifting on the menu and game-over screens
    state.scroll_offset = (state.scroll_offset + state.scroll_speed * SCROLL_BG_RATE) % SCROLL_WRAP;
    state.tick_count += 1;
}

/// The full gameplay pipeline: spawn, physics, collisions, sweep, timers,
/// particles, score. Fatal contact aborts the rest of the tick.
fn step_playing(state: &mut WorldState, view_w: f32, view_h: f32) {
    let dt = state.dt();

    // Spawn cadence tightens as difficulty rises
    state.ticks_since_spawn += 1;
    if state.ticks_since_spawn >= spawn::spawn_interval(state.difficulty()) {
        state.ticks_since_spawn = 0;
        spawn::spawn(state, view_w, view_h);
    }

    state.distance += state.scroll_speed * dt;
    let effective = (state.scroll_speed + state.difficulty()) * dt;

    // Player vertical motion: thrust up, gravity down, clamp, integrate
    if state.thrusting {
        state.player.vy -= THRUST_ACCEL;
    }
    state.player.vy += GRAVITY;
    state.player.vy = state.player.vy.clamp(-MAX_FALL_SPEED, MAX_FALL_SPEED);
    state.player.pos.y += state.player.vy * dt;

    // Ceiling is soft: clamp and zero velocity, no penalty
    if state.player.pos.y < 0.0 {
        state.player.pos.y = 0.0;
        state.player.vy = 0.0;
    }

    // Ground contact is fatal and ends the tick immediately
    if state.player.pos.y > view_h - PLAYER_H - GROUND_MARGIN {
        state.crash();
        log::info!("ground contact, run over at score {}", state.final_score());
        return;
    }

    // Everything scrolls left; birds wobble on the tick counter
    let wobble = (state.tick_count as f32 * BIRD_FREQ).sin() * BIRD_AMP;
    for e in &mut state.entities {
        e.pos.x -= effective;
        if e.kind == EntityKind::Bird {
            e.pos.y += wobble;
        }
    }

    // Magnet drags nearby coins a fixed step toward the player. The step
    // overshoots inside MAGNET_PULL range; collection resolves the jitter.
    if state.magnet_ticks > 0 {
        let target = state.player.midpoint();
        for e in &mut state.entities {
            if e.kind != EntityKind::Coin {
                continue;
            }
            let to_player = target - e.center();
            let dist = to_player.length();
            if dist > f32::EPSILON && dist <= MAGNET_RADIUS {
                e.pos += to_player / dist * MAGNET_PULL;
            }
        }
    }

    if state.tick_count % TRAIL_SAMPLE_INTERVAL == 0 {
        state.player.record_trail();
    }

    if collision::resolve(state) {
        log::info!("hazard hit, run over at score {}", state.final_score());
        return;
    }

    // Timers tick down once per simulation tick, never below zero
    state.shield_ticks = state.shield_ticks.saturating_sub(1);
    state.magnet_ticks = state.magnet_ticks.saturating_sub(1);
    state.slowmo_ticks = state.slowmo_ticks.saturating_sub(1);

    particles::update(&mut state.particles, dt);

    state.score += SCORE_RATE * dt;
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    use crate::sim::state::Entity;

    const VIEW_W: f32 = 800.0;
    const VIEW_H: f32 = 480.0;

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn activate() -> TickInput {
        TickInput {
            activate: true,
            ..Default::default()
        }
    }

    fn start_run(state: &mut WorldState) {
        tick(state, &activate(), VIEW_W, VIEW_H);
        state.take_events();
    }

    #[test]
    fn test_activate_starts_a_run() {
        let mut state = WorldState::new(1, VIEW_H);
        assert_eq!(state.phase, Phase::Start);

        tick(&mut state, &idle(), VIEW_W, VIEW_H);
        assert_eq!(state.phase, Phase::Start);

        tick(&mut state, &activate(), VIEW_W, VIEW_H);
        assert_eq!(state.phase, Phase::Playing);
        assert!(state.take_events().contains(&GameEvent::EngineStart));
    }

    #[test]
    fn test_restart_fully_replaces_the_world() {
        let mut state = WorldState::new(1, VIEW_H);
        start_run(&mut state);

        // Dirty the world, then kill the run
        state.score = 500.0;
        state.shield_ticks = 50;
        state.magnet_ticks = 50;
        state.slowmo_ticks = 50;
        let id = state.next_entity_id();
        state.entities.push(Entity::new(id, EntityKind::Rock, state.player.pos));
        tick(&mut state, &idle(), VIEW_W, VIEW_H);
        // Shield absorbed the first hit; hit again unshielded
        let id = state.next_entity_id();
        state.entities.push(Entity::new(id, EntityKind::Rock, state.player.pos));
        tick(&mut state, &idle(), VIEW_W, VIEW_H);
        assert_eq!(state.phase, Phase::GameOver);

        tick(&mut state, &activate(), VIEW_W, VIEW_H);
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.final_score(), 0);
        assert!(state.entities.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.shield_ticks, 0);
        assert_eq!(state.magnet_ticks, 0);
        assert_eq!(state.slowmo_ticks, 0);
    }

    #[test]
    fn test_free_fall_reaches_clamped_velocity() {
        // Tall view so the ground stays far away
        let mut state = WorldState::new(1, 4000.0);
        tick(&mut state, &activate(), VIEW_W, 4000.0);
        state.player.pos.y = 0.0;
        state.player.vy = 0.0;

        for _ in 0..10 {
            tick(&mut state, &idle(), VIEW_W, 4000.0);
        }
        assert!((state.player.vy - 10.0 * GRAVITY).abs() < 1e-4);

        for _ in 0..30 {
            tick(&mut state, &idle(), VIEW_W, 4000.0);
        }
        assert_eq!(state.player.vy, MAX_FALL_SPEED);
    }

    #[test]
    fn test_ceiling_clamp_zeroes_velocity() {
        let mut state = WorldState::new(1, VIEW_H);
        start_run(&mut state);
        state.player.pos.y = 5.0;
        state.player.vy = -MAX_FALL_SPEED;

        tick(&mut state, &TickInput { thrusting: true, activate: false }, VIEW_W, VIEW_H);
        assert_eq!(state.player.pos.y, 0.0);
        assert_eq!(state.player.vy, 0.0);
        assert_eq!(state.phase, Phase::Playing);
    }

    #[test]
    fn test_ground_contact_is_fatal_and_freezes_score() {
        let mut state = WorldState::new(1, VIEW_H);
        start_run(&mut state);
        state.score = 77.7;
        state.player.pos.y = VIEW_H - PLAYER_H - GROUND_MARGIN;
        state.player.vy = MAX_FALL_SPEED;

        tick(&mut state, &idle(), VIEW_W, VIEW_H);
        assert_eq!(state.phase, Phase::GameOver);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::Crashed));
        assert!(events.contains(&GameEvent::EngineStop));
        assert_eq!(state.final_score(), 77);

        // Frozen: further ticks change nothing
        let before = state.clone();
        tick(&mut state, &idle(), VIEW_W, VIEW_H);
        assert_eq!(state.score, before.score);
        assert_eq!(state.entities, before.entities);
        assert_eq!(state.particles, before.particles);
        assert_eq!(state.player, before.player);
    }

    #[test]
    fn test_score_accrues_per_tick() {
        let mut state = WorldState::new(1, VIEW_H);
        start_run(&mut state);
        let after_start = state.score;
        tick(&mut state, &TickInput { thrusting: true, activate: false }, VIEW_W, VIEW_H);
        assert!((state.score - after_start - SCORE_RATE).abs() < 1e-6);
    }

    #[test]
    fn test_slow_mo_halves_time() {
        let mut fast = WorldState::new(1, VIEW_H);
        start_run(&mut fast);
        let mut slow = fast.clone();
        slow.slowmo_ticks = 100;
        let base = fast.distance;

        let input = TickInput { thrusting: true, activate: false };
        tick(&mut fast, &input, VIEW_W, VIEW_H);
        tick(&mut slow, &input, VIEW_W, VIEW_H);

        let fast_travel = fast.distance - base;
        let slow_travel = slow.distance - base;
        assert!((slow_travel * 2.0 - fast_travel).abs() < 1e-4);
    }

    #[test]
    fn test_magnet_pulls_only_nearby_coins() {
        let mut state = WorldState::new(1, VIEW_H);
        start_run(&mut state);
        state.magnet_ticks = 50;

        let target = state.player.midpoint();
        let near_coin = Vec2::new(target.x + 90.0, target.y);
        let far_coin = Vec2::new(target.x + MAGNET_RADIUS + 200.0, target.y);
        let near_rock = Vec2::new(target.x, target.y + 90.0);
        let ids: Vec<u32> = [
            (EntityKind::Coin, near_coin),
            (EntityKind::Coin, far_coin),
            (EntityKind::Rock, near_rock),
        ]
        .into_iter()
        .map(|(kind, pos)| {
            let id = state.next_entity_id();
            state.entities.push(Entity::new(id, kind, pos));
            id
        })
        .collect();

        let effective = (state.scroll_speed + state.difficulty()) * 1.0;
        tick(&mut state, &idle(), VIEW_W, VIEW_H);

        let by_id = |id: u32| state.entities.iter().find(|e| e.id == id).unwrap().pos;
        // Scroll-only for the far coin and the rock
        assert_eq!(by_id(ids[1]), far_coin - Vec2::new(effective, 0.0));
        assert_eq!(by_id(ids[2]), near_rock - Vec2::new(effective, 0.0));
        // The near coin took an extra MAGNET_PULL step toward the player
        let scroll_only = near_coin - Vec2::new(effective, 0.0);
        let pulled = by_id(ids[0]);
        assert!((pulled - scroll_only).length() > MAGNET_PULL - 1e-3);
        assert!(pulled.x < scroll_only.x);
    }

    #[test]
    fn test_trail_samples_on_cadence() {
        let mut state = WorldState::new(1, VIEW_H);
        start_run(&mut state);
        let initial = state.player.trail.len();
        for _ in 0..(TRAIL_SAMPLE_INTERVAL as usize * 4) {
            tick(&mut state, &TickInput { thrusting: true, activate: false }, VIEW_W, VIEW_H);
        }
        assert_eq!(state.player.trail.len(), initial + 4);
    }

    #[test]
    fn test_parallax_advances_in_every_phase() {
        let mut state = WorldState::new(1, VIEW_H);
        let menu_offset = state.scroll_offset;
        tick(&mut state, &idle(), VIEW_W, VIEW_H);
        assert!(state.scroll_offset > menu_offset);
        assert_eq!(state.phase, Phase::Start);
        assert!(state.scroll_offset < SCROLL_WRAP);
    }

    #[test]
    fn test_determinism_same_seed_same_inputs() {
        let mut a = WorldState::new(99999, VIEW_H);
        let mut b = WorldState::new(99999, VIEW_H);

        for i in 0..600u64 {
            let input = TickInput {
                thrusting: i % 2 == 0,
                activate: i == 0,
            };
            tick(&mut a, &input, VIEW_W, VIEW_H);
            tick(&mut b, &input, VIEW_W, VIEW_H);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_view_is_survivable() {
        let mut state = WorldState::new(3, VIEW_H);
        tick(&mut state, &activate(), 0.0, f32::NAN);
        for _ in 0..120 {
            tick(&mut state, &TickInput { thrusting: true, activate: false }, 0.0, 0.0);
        }
        assert!(state.player.pos.y.is_finite());
        assert!(state.entities.iter().all(|e| e.pos.x.is_finite() && e.pos.y.is_finite()));
    }

    proptest! {
        #[test]
        fn prop_timers_decrement_once_per_tick_and_never_wrap(
            shield in 0u32..1000,
            magnet in 0u32..1000,
            slowmo in 0u32..1000,
            k in 0u32..80,
        ) {
            let mut state = WorldState::new(7, VIEW_H);
            state.phase = Phase::Playing;
            state.shield_ticks = shield;
            state.magnet_ticks = magnet;
            state.slowmo_ticks = slowmo;

            // Hold thrust: the craft hugs the ceiling and nothing spawns
            // inside the first cadence window, so no pickups interfere.
            let input = TickInput { thrusting: true, activate: false };
            for _ in 0..k {
                tick(&mut state, &input, VIEW_W, VIEW_H);
            }
            prop_assert_eq!(state.shield_ticks, shield.saturating_sub(k));
            prop_assert_eq!(state.magnet_ticks, magnet.saturating_sub(k));
            prop_assert_eq!(state.slowmo_ticks, slowmo.saturating_sub(k));
        }

        #[test]
        fn prop_difficulty_is_monotone_in_travel(k in 1usize..500) {
            let mut state = WorldState::new(11, VIEW_H);
            state.phase = Phase::Playing;
            let mut last = state.difficulty();
            for i in 0..k {
                let input = TickInput { thrusting: i % 2 == 0, activate: false };
                tick(&mut state, &input, VIEW_W, VIEW_H);
                if state.phase != Phase::Playing {
                    break;
                }
                let d = state.difficulty();
                prop_assert!(d >= last);
                let expected = 1.0 + (state.distance / DISTANCE_UNIT).floor() * DIFFICULTY_STEP;
                prop_assert!((d - expected).abs() < 1e-6);
                last = d;
            }
        }

        #[test]
        fn prop_swept_entities_never_linger_off_screen(k in 1usize..300) {
            let mut state = WorldState::new(13, VIEW_H);
            state.phase = Phase::Playing;
            let input = TickInput { thrusting: true, activate: false };
            for _ in 0..k {
                tick(&mut state, &input, VIEW_W, VIEW_H);
                if state.phase != Phase::Playing {
                    break;
                }
                for e in &state.entities {
                    prop_assert!(e.pos.x + e.kind.size().x >= 0.0);
                    prop_assert!(!e.removed);
                }
            }
        }
    }
}
