//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Bounded entity pools with swap-compaction removal
//! - No rendering or platform dependencies

pub mod boss;
pub mod collision;
pub mod enemy;
pub mod player;
pub mod pool;
pub mod spawn;
pub mod state;
pub mod tick;

pub use boss::update_boss;
pub use collision::{elastic_collision, resolve_collisions};
pub use enemy::update_enemy_ships;
pub use player::{ControlMode, resolve_control_mode, update_player};
pub use pool::Pool;
pub use spawn::{spawn_wave, wave_asteroid_count, wave_speed_multiplier};
pub use state::{
    Asteroid, Boss, BossPhase, Bullet, EnemyShip, FloatingText, GameEvent, GamePhase, GameState,
    Particle, PhaseBoss, Player, QueenBoss, QueenPhase, ShipKind, SizeClass,
};
pub use tick::{TickInput, tick};
