//! Jet Dash - a side-scrolling jetpack arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `renderer`: Canvas-2d painter (wasm)
//! - `audio`: Web Audio synthesis for engine tone and SFX (wasm)
//! - `platform`: Cancellable frame scheduler (wasm)
//! - `highscores`: Persisted best score

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
#[cfg(target_arch = "wasm32")]
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod sim;

pub use highscores::HighScore;

/// Game tuning constants
pub mod consts {
    /// Fallback view dimensions when the canvas reports zero/garbage
    pub const MIN_VIEW_W: f32 = 320.0;
    pub const MIN_VIEW_H: f32 = 240.0;

    /// Player craft - x is fixed after spawn, only y moves
    pub const PLAYER_X: f32 = 120.0;
    pub const PLAYER_W: f32 = 40.0;
    pub const PLAYER_H: f32 = 40.0;
    /// Downward acceleration per tick (canvas y grows downward)
    pub const GRAVITY: f32 = 0.4;
    /// Upward acceleration per tick while thrusting
    pub const THRUST_ACCEL: f32 = 0.85;
    /// Vertical velocity clamp, both directions
    pub const MAX_FALL_SPEED: f32 = 8.0;
    /// Hitting this close to the bottom edge is fatal
    pub const GROUND_MARGIN: f32 = 12.0;

    /// Scroll speed at run start; difficulty adds on top
    pub const SCROLL_START_SPEED: f32 = 4.0;
    /// Distance travelled per difficulty step
    pub const DISTANCE_UNIT: f32 = 1000.0;
    pub const DIFFICULTY_STEP: f32 = 0.1;

    /// Spawn cadence at difficulty 1.0, in ticks
    pub const SPAWN_BASE_INTERVAL: u32 = 90;
    /// Entities enter this far past the right edge
    pub const SPAWN_MARGIN: f32 = 40.0;

    /// Entity bounding boxes (width, height)
    pub const COIN_SIZE: (f32, f32) = (20.0, 20.0);
    pub const POWERUP_SIZE: (f32, f32) = (30.0, 30.0);
    pub const ROCK_SIZE: (f32, f32) = (50.0, 50.0);
    pub const BEAM_SIZE: (f32, f32) = (200.0, 10.0);
    pub const BIRD_SIZE: (f32, f32) = (30.0, 30.0);

    /// Coin strings: 1 primary + 4 trailing coins
    pub const COIN_CLUSTER: usize = 5;
    pub const COIN_PITCH: f32 = 30.0;
    pub const COIN_WAVE_STEP: f32 = 0.9;
    pub const COIN_WAVE_AMP: f32 = 30.0;

    /// Both hitboxes shrink inward by this much on every side
    pub const HITBOX_INSET: f32 = 4.0;
    pub const COIN_SCORE: f32 = 25.0;
    /// Passive score accrual per tick
    pub const SCORE_RATE: f32 = 0.1;

    /// Shield and magnet duration, in ticks
    pub const POWERUP_TICKS: u32 = 600;
    /// Slow-mo runs shorter
    pub const SLOWMO_TICKS: u32 = 300;
    /// Time-dilation factor while slow-mo is active
    pub const SLOWMO_DT: f32 = 0.5;
    pub const MAGNET_RADIUS: f32 = 120.0;
    /// Fixed pull step per tick (can overshoot at close range)
    pub const MAGNET_PULL: f32 = 6.0;

    /// Bird vertical wobble
    pub const BIRD_FREQ: f32 = 0.1;
    pub const BIRD_AMP: f32 = 2.0;

    /// Player trail sampling
    pub const TRAIL_LENGTH: usize = 20;
    pub const TRAIL_SAMPLE_INTERVAL: u64 = 3;

    /// Particle bursts
    pub const BURST_SPEED_MIN: f32 = 1.0;
    pub const BURST_SPEED_MAX: f32 = 4.0;
    pub const PARTICLE_DECAY: f32 = 0.03;
    pub const PARTICLE_DAMPING: f32 = 0.96;
    pub const COIN_BURST: usize = 6;
    pub const POWERUP_BURST: usize = 12;
    pub const CRASH_BURST: usize = 24;

    /// Decorative parallax phase wraps modulo this
    pub const SCROLL_WRAP: f32 = 240.0;
    /// Parallax advances at this fraction of scroll speed
    pub const SCROLL_BG_RATE: f32 = 0.5;

    /// HUD projection publish cadence, in ticks
    pub const UI_PUSH_INTERVAL: u64 = 5;
}

/// One splitmix64 step, used to derive per-run seeds
#[inline]
pub fn mix_seed(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

/// Cheap 32-bit mix for cosmetic scatter (particles), keeping the
/// gameplay RNG stream untouched
#[inline]
pub fn scatter_hash(seed: u32, salt: u32) -> u32 {
    seed.wrapping_mul(2654435761)
        .wrapping_add(salt.wrapping_mul(7919))
}
