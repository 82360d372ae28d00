//! Comet Storm - deterministic arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity pools, physics, collisions, AI, bosses)
//! - `audio`: Semantic sound-event consumer (degrades to silence)
//! - `highscores`: Top-10 leaderboard with JSON file persistence
//! - `settings`: Preferences and gameplay tuning knobs

pub mod audio;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Default screen dimensions (spawn-edge and wrap math)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Pool capacities (fixed, never grow)
    pub const MAX_ASTEROIDS: usize = 32;
    pub const MAX_BULLETS: usize = 128;
    pub const MAX_ENEMY_BULLETS: usize = 64;
    pub const MAX_ENEMY_SHIPS: usize = 4;
    pub const MAX_PARTICLES: usize = 512;
    pub const MAX_FLOATING_TEXTS: usize = 32;

    /// Player ship
    pub const SHIP_RADIUS: f32 = 15.0;
    pub const SHIP_TURN_RATE: f32 = 6.0; // rad/s
    pub const SHIP_THRUST: f32 = 500.0; // px/s^2
    pub const SHIP_BOOST_THRUST: f32 = 800.0;
    pub const SHIP_MAX_SPEED: f32 = 400.0;
    pub const SHIP_DRAG: f32 = 0.95; // per-frame velocity factor
    pub const POINTER_TURN_RATE: f32 = 5.0;
    pub const POINTER_BASE_ACCEL: f32 = 200.0;

    /// Player resources
    pub const MAX_ENERGY: f32 = 100.0;
    pub const ENERGY_RECHARGE_RATE: f32 = 10.0;
    pub const ENERGY_BURN_RATE: f32 = 25.0;
    pub const BOOST_MIN_ENERGY: f32 = 2.0;
    pub const MAX_SHIELD: f32 = 3.0;
    pub const SHIELD_REGEN_RATE: f32 = 0.5;
    pub const SHIELD_REGEN_DELAY: f32 = 3.0;
    pub const START_LIVES: i32 = 3;

    /// Weapons
    pub const BULLET_SPEED: f32 = 400.0;
    pub const BULLET_LIFETIME: f32 = 1.5;
    pub const BULLET_RADIUS: f32 = 2.0;
    pub const FIRE_COOLDOWN: f32 = 0.05;
    pub const FIRE_ENERGY_COST: f32 = 0.25;
    pub const OMNI_DIRECTIONS: usize = 32;
    pub const OMNI_ENERGY_COST: f32 = 30.0;
    pub const OMNI_COOLDOWN: f32 = 0.3;
    pub const ENEMY_BULLET_SPEED: f32 = 150.0;
    pub const ENEMY_BULLET_LIFETIME: f32 = 10.0;
    pub const BOSS_BULLET_SPEED: f32 = 180.0;

    /// Enemy ships
    pub const ENEMY_SHIP_RADIUS: f32 = 15.0;
    /// Wider contact circle for ship/asteroid impacts
    pub const ENEMY_SHIP_ASTEROID_RADIUS: f32 = 30.0;
    pub const ENEMY_DESPAWN_MARGIN: f32 = 50.0;
    pub const ENEMY_AVOID_RADIUS: f32 = 50.0;

    /// Bosses
    pub const BOSS_RADIUS: f32 = 35.0;
    pub const BOSS_SHIELD_RADIUS: f32 = 50.0;
    pub const BOSS_SIDE_MARGIN: f32 = 60.0;
    pub const BOSS_HOLD_Y: f32 = 100.0;
    pub const BOSS_PHASE_DURATION: f32 = 5.0;
    pub const QUEEN_RADIUS: f32 = 50.0;

    /// Timers
    pub const WAVE_COMPLETE_DELAY: f32 = 2.0;
    pub const GAME_OVER_DELAY: f32 = 3.0;
    pub const FLOATING_TEXT_LIFETIME: f32 = 2.0;
    pub const PARTICLE_GRAVITY: f32 = 100.0; // px/s^2, downward

    /// Scoring
    pub const BOSS_POINTS: u64 = 5000;
    pub const ENEMY_SHIP_POINTS: u64 = 300;
    pub const RAM_SHIP_POINTS: u64 = 250;
    pub const MAX_MULTIPLIER: f32 = 5.0;
    pub const STREAK_STEP: u32 = 5;
    pub const EXTRA_LIFE_POINTS: u64 = 100_000;

    /// Attract mode reuses the wave spawner with this wave number for a dense field
    pub const ATTRACT_WAVE: u32 = 32;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector for a heading angle
#[inline]
pub fn heading_vec(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Wrap a position toroidally into [0, bounds) on both axes
#[inline]
pub fn wrap_position(pos: Vec2, bounds: Vec2) -> Vec2 {
    let mut p = pos;
    if p.x < 0.0 {
        p.x += bounds.x;
    } else if p.x >= bounds.x {
        p.x -= bounds.x;
    }
    if p.y < 0.0 {
        p.y += bounds.y;
    } else if p.y >= bounds.y {
        p.y -= bounds.y;
    }
    p
}
