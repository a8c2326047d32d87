//! Game state and core simulation types
//!
//! One `WorldState` per run; the loop driver owns it exclusively and
//! everything else reads it through `&WorldState`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::particles;
use crate::consts::*;

/// Current phase of the run state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Idle menu, no simulation
    Start,
    /// Full tick pipeline active
    Playing,
    /// Simulation frozen, final score displayed
    GameOver,
}

/// Closed classification of everything that scrolls past the player.
///
/// Every kind-dependent decision (motion, collision effect, paint color)
/// matches exhaustively on this, so a new kind fails to compile until it
/// is handled everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Rock,
    Beam,
    Bird,
    Coin,
    Shield,
    Magnet,
    SlowMo,
}

impl EntityKind {
    /// Fixed bounding box per category
    pub fn size(&self) -> Vec2 {
        let (w, h) = match self {
            EntityKind::Coin => COIN_SIZE,
            EntityKind::Shield | EntityKind::Magnet | EntityKind::SlowMo => POWERUP_SIZE,
            EntityKind::Rock => ROCK_SIZE,
            EntityKind::Beam => BEAM_SIZE,
            EntityKind::Bird => BIRD_SIZE,
        };
        Vec2::new(w, h)
    }

    /// Hazards end the run on contact (unless shielded)
    pub fn is_hazard(&self) -> bool {
        matches!(self, EntityKind::Rock | EntityKind::Beam | EntityKind::Bird)
    }

    /// Particle palette index for bursts involving this kind
    pub fn palette(&self) -> u32 {
        match self {
            EntityKind::Coin => palette::COIN,
            EntityKind::Shield => palette::SHIELD,
            EntityKind::Magnet => palette::MAGNET,
            EntityKind::SlowMo => palette::SLOWMO,
            EntityKind::Rock | EntityKind::Beam | EntityKind::Bird => palette::CRASH,
        }
    }
}

/// Particle color indices, resolved to real colors by the painter
pub mod palette {
    pub const COIN: u32 = 0;
    pub const SHIELD: u32 = 1;
    pub const MAGNET: u32 = 2;
    pub const SLOWMO: u32 = 3;
    pub const CRASH: u32 = 4;
}

/// A scrolling hazard or pickup
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: u32,
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    pub kind: EntityKind,
    /// Set by collision/off-screen checks, swept at tick end
    pub removed: bool,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            kind,
            removed: false,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.kind.size() / 2.0
    }

    /// Fully past the left edge
    pub fn off_screen(&self) -> bool {
        self.pos.x + self.kind.size().x < 0.0
    }
}

/// Trail point for player rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
}

/// The player craft. `pos.x` never changes after spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    /// Vertical velocity, positive = downward
    pub vy: f32,
    /// Recent midpoints, newest first
    pub trail: Vec<TrailPoint>,
}

impl Player {
    fn new(view_h: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, (view_h - PLAYER_H) / 2.0),
            vy: 0.0,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    pub fn midpoint(&self) -> Vec2 {
        self.pos + Vec2::new(PLAYER_W, PLAYER_H) / 2.0
    }

    /// Record current midpoint to the trail (bounded, oldest dropped)
    pub fn record_trail(&mut self) {
        self.trail.insert(0, TrailPoint {
            pos: self.midpoint(),
        });
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }
}

/// A cosmetic burst particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Palette index for color lookup
    pub color: u32,
    /// 1.0 at birth, removed at <= 0
    pub life: f32,
    pub size: f32,
}

/// Power-up tag, as surfaced to the UI shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUp {
    Shield,
    Magnet,
    SlowMo,
}

/// Discrete gameplay notifications, drained by the loop driver each frame
/// and forwarded to the audio subsystem. Fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    EngineStart,
    EngineStop,
    CoinCollected,
    PowerUpCollected(PowerUp),
    /// Fired for both the fatal hit and a shield-absorbed hit
    Crashed,
}

/// What the UI shell needs, pushed only on change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiProjection {
    pub phase: Phase,
    pub score: u64,
    pub high_score: u64,
    pub active_powerups: Vec<PowerUp>,
}

/// Complete world state for one run
#[derive(Debug, Clone, PartialEq)]
pub struct WorldState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: Phase,
    pub score: f32,
    pub distance: f32,
    pub scroll_speed: f32,
    pub player: Player,
    /// Input signal, copied in at the top of each tick
    pub thrusting: bool,
    /// Power-up timers; zero means inactive
    pub shield_ticks: u32,
    pub magnet_ticks: u32,
    pub slowmo_ticks: u32,
    pub entities: Vec<Entity>,
    pub particles: Vec<Particle>,
    /// Monotonic tick counter (spawn cadence, trail cadence, bird phase)
    pub tick_count: u64,
    /// Background parallax phase
    pub scroll_offset: f32,
    /// Ticks since the spawner last fired
    pub ticks_since_spawn: u32,
    /// Gameplay RNG; the spawner is its only consumer
    pub rng: Pcg32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl WorldState {
    /// Fresh world at the menu, player centered vertically
    pub fn new(seed: u64, view_h: f32) -> Self {
        let view_h = if view_h.is_finite() { view_h.max(MIN_VIEW_H) } else { MIN_VIEW_H };
        Self {
            seed,
            phase: Phase::Start,
            score: 0.0,
            distance: 0.0,
            scroll_speed: SCROLL_START_SPEED,
            player: Player::new(view_h),
            thrusting: false,
            shield_ticks: 0,
            magnet_ticks: 0,
            slowmo_ticks: 0,
            entities: Vec::new(),
            particles: Vec::new(),
            tick_count: 0,
            scroll_offset: 0.0,
            ticks_since_spawn: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Difficulty steps up every DISTANCE_UNIT of travel, never down
    pub fn difficulty(&self) -> f32 {
        1.0 + (self.distance / DISTANCE_UNIT).floor() * DIFFICULTY_STEP
    }

    /// Time-dilation factor for this tick
    pub fn dt(&self) -> f32 {
        if self.slowmo_ticks > 0 { SLOWMO_DT } else { 1.0 }
    }

    /// Integer score as displayed and persisted
    pub fn final_score(&self) -> u64 {
        self.score.floor() as u64
    }

    /// Active power-ups in fixed display order
    pub fn active_powerups(&self) -> Vec<PowerUp> {
        let mut out = Vec::new();
        if self.shield_ticks > 0 {
            out.push(PowerUp::Shield);
        }
        if self.magnet_ticks > 0 {
            out.push(PowerUp::Magnet);
        }
        if self.slowmo_ticks > 0 {
            out.push(PowerUp::SlowMo);
        }
        out
    }

    /// Snapshot for the UI shell
    pub fn projection(&self, high_score: u64) -> UiProjection {
        UiProjection {
            phase: self.phase,
            score: self.final_score(),
            high_score,
            active_powerups: self.active_powerups(),
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain queued gameplay events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Fatal hit: burst at the player, freeze the run
    pub(crate) fn crash(&mut self) {
        let at = self.player.midpoint();
        particles::emit_burst(
            &mut self.particles,
            self.tick_count as u32,
            at,
            palette::CRASH,
            CRASH_BURST,
        );
        self.push_event(GameEvent::Crashed);
        self.push_event(GameEvent::EngineStop);
        self.phase = Phase::GameOver;
    }
}
