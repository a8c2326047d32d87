//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, fixed tick units
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod particles;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{padded_overlap, resolve};
pub use spawn::{spawn, spawn_interval};
pub use state::{
    Entity, EntityKind, GameEvent, Particle, Phase, Player, PowerUp, TrailPoint, UiProjection,
    WorldState,
};
pub use tick::{TickInput, tick};
