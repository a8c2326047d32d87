//! Collision detection and per-category resolution
//!
//! Overlap tests shrink both boxes by a fairness inset so sprites that
//! merely graze each other visually never count as a hit.

use glam::Vec2;

use super::particles;
use super::state::{EntityKind, GameEvent, Phase, PowerUp, WorldState};
use crate::consts::*;

/// Axis-aligned overlap with both boxes shrunk inward by `inset` on all
/// sides. Positions are top-left corners.
pub fn padded_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2, inset: f32) -> bool {
    let ax0 = a_pos.x + inset;
    let ay0 = a_pos.y + inset;
    let ax1 = a_pos.x + a_size.x - inset;
    let ay1 = a_pos.y + a_size.y - inset;
    let bx0 = b_pos.x + inset;
    let by0 = b_pos.y + inset;
    let bx1 = b_pos.x + b_size.x - inset;
    let by1 = b_pos.y + b_size.y - inset;

    ax0 < bx1 && bx0 < ax1 && ay0 < by1 && by0 < ay1
}

/// Test every live entity against the player and apply category effects.
/// Marks consumed and off-screen entities, then sweeps them in one pass.
/// Returns true if the run ended this tick.
pub fn resolve(state: &mut WorldState) -> bool {
    let player_pos = state.player.pos;
    let player_size = Vec2::new(PLAYER_W, PLAYER_H);
    let tick_seed = state.tick_count as u32;
    let mut fatal = false;

    for i in 0..state.entities.len() {
        let (kind, pos, removed, off_screen) = {
            let e = &state.entities[i];
            (e.kind, e.pos, e.removed, e.off_screen())
        };
        if removed {
            continue;
        }

        // Scrolled past the left edge: gone regardless of anything else
        if off_screen {
            state.entities[i].removed = true;
            continue;
        }

        if !padded_overlap(player_pos, player_size, pos, kind.size(), HITBOX_INSET) {
            continue;
        }

        let center = pos + kind.size() / 2.0;
        match kind {
            EntityKind::Coin => {
                state.score += COIN_SCORE;
                state.entities[i].removed = true;
                particles::emit_burst(
                    &mut state.particles,
                    tick_seed,
                    center,
                    kind.palette(),
                    COIN_BURST,
                );
                state.push_event(GameEvent::CoinCollected);
            }
            EntityKind::Shield | EntityKind::Magnet | EntityKind::SlowMo => {
                // Re-pickup resets to full duration; no stacking
                let tag = match kind {
                    EntityKind::Shield => {
                        state.shield_ticks = POWERUP_TICKS;
                        PowerUp::Shield
                    }
                    EntityKind::Magnet => {
                        state.magnet_ticks = POWERUP_TICKS;
                        PowerUp::Magnet
                    }
                    _ => {
                        state.slowmo_ticks = SLOWMO_TICKS;
                        PowerUp::SlowMo
                    }
                };
                state.entities[i].removed = true;
                particles::emit_burst(
                    &mut state.particles,
                    tick_seed,
                    center,
                    kind.palette(),
                    POWERUP_BURST,
                );
                state.push_event(GameEvent::PowerUpCollected(tag));
            }
            EntityKind::Rock | EntityKind::Beam | EntityKind::Bird => {
                if state.shield_ticks > 0 {
                    // Shield soaks the hit and is spent
                    state.shield_ticks = 0;
                    state.entities[i].removed = true;
                    particles::emit_burst(
                        &mut state.particles,
                        tick_seed,
                        center,
                        kind.palette(),
                        POWERUP_BURST,
                    );
                    state.push_event(GameEvent::Crashed);
                } else {
                    state.crash();
                    fatal = true;
                    break;
                }
            }
        }
    }

    state.entities.retain(|e| !e.removed);
    debug_assert!(state.phase == Phase::Playing || fatal);
    fatal
}
