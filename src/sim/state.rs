//! Game state and core simulation types
//!
//! All state that must be persisted for determinism lives here. The
//! aggregate `GameState` owns every entity pool by value; subsystems are
//! plain functions over `(&mut GameState, dt)`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool::Pool;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Pre-game attract screen (dense drifting asteroid field, cosmetic)
    Attract,
    /// Active gameplay
    Playing,
    /// Run ended, terminal countdown running
    GameOver,
}

/// Semantic events emitted by the simulation for the audio/frontend layer.
/// Drained once per frame; losing them never affects correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Fire,
    AlienFire,
    Explosion,
    Hit,
    Boost,
    ExtraLife,
    GameOver,
}

/// Asteroid size class; radius and point value are fixed per class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
    Mega,
    Special,
}

impl SizeClass {
    pub fn radius(&self) -> f32 {
        match self {
            SizeClass::Small => 10.0,
            SizeClass::Medium => 20.0,
            SizeClass::Large => 30.0,
            SizeClass::Mega => 50.0,
            SizeClass::Special => 15.0,
        }
    }

    pub fn points(&self) -> u64 {
        match self {
            SizeClass::Small => 50,
            SizeClass::Medium => 100,
            SizeClass::Large => 200,
            SizeClass::Mega => 500,
            SizeClass::Special => 500,
        }
    }

    /// Destruction fan-out: (child class, child count, child speed band)
    pub fn split(&self) -> Option<(SizeClass, usize, std::ops::Range<f32>)> {
        match self {
            SizeClass::Mega => Some((SizeClass::Large, 3, 80.0..160.0)),
            SizeClass::Large => Some((SizeClass::Medium, 2, 100.0..200.0)),
            SizeClass::Medium => Some((SizeClass::Small, 2, 150.0..250.0)),
            SizeClass::Small | SizeClass::Special => None,
        }
    }
}

/// Cosmetic color for a frequency band tag
pub fn band_color(band: u8) -> [f32; 3] {
    match band % 3 {
        0 => [0.9, 0.4, 0.3],
        1 => [0.4, 0.9, 0.4],
        _ => [0.4, 0.5, 0.9],
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: SizeClass,
    pub radius: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Frequency-band tag (cosmetic, drives color)
    pub band: u8,
    pub color: [f32; 3],
}

/// Shared bullet record; `owner` is set only for enemy-fired bullets
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub heading: f32,
    pub lifetime: f32,
    #[serde(default)]
    pub owner: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub lifetime: f32,
    pub max_lifetime: f32,
    pub radius: f32,
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub color: [f32; 3],
    pub lifetime: f32,
}

/// Enemy ship behavior archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipKind {
    Patrol,
    Aggressive,
    Hunter,
    Sentinel,
}

impl ShipKind {
    pub fn shield_points(&self) -> i32 {
        match self {
            ShipKind::Patrol => 3,
            ShipKind::Aggressive => 2,
            ShipKind::Hunter => 3,
            ShipKind::Sentinel => 4,
        }
    }
}

/// Sentinel formation membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    pub id: u32,
    pub size: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyShip {
    pub id: u32,
    pub kind: ShipKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Cruise velocity the behaviors perturb and renormalize against
    pub base_vel: Vec2,
    pub heading: f32,
    pub health: i32,
    pub shield: i32,
    pub max_shield: i32,
    pub fire_cooldown: f32,
    /// Seconds along the sine path (patrol/hunter oscillation)
    pub path_time: f32,
    #[serde(default)]
    pub formation: Option<Formation>,
}

/// Phase-cycling boss phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    Normal,
    Shielded,
    Enraged,
}

impl BossPhase {
    pub fn next(&self) -> BossPhase {
        match self {
            BossPhase::Normal => BossPhase::Shielded,
            BossPhase::Shielded => BossPhase::Enraged,
            BossPhase::Enraged => BossPhase::Normal,
        }
    }

    pub fn fire_cadence(&self) -> f32 {
        match self {
            BossPhase::Normal => 0.8,
            BossPhase::Shielded => 1.0,
            BossPhase::Enraged => 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseBoss {
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub shield: i32,
    pub max_shield: i32,
    pub shield_active: bool,
    pub phase: BossPhase,
    pub phase_timer: f32,
    pub fire_cooldown: f32,
    pub flash_timer: f32,
}

/// Spawn Queen phases, keyed off remaining health fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueenPhase {
    Recruitment,
    Aggression,
    Desperation,
}

impl QueenPhase {
    pub fn spawn_cooldown(&self) -> f32 {
        match self {
            QueenPhase::Recruitment => 3.0,
            QueenPhase::Aggression => 2.5,
            QueenPhase::Desperation => 2.0,
        }
    }

    pub fn attack_cooldown(&self) -> f32 {
        match self {
            QueenPhase::Recruitment => 2.0,
            QueenPhase::Aggression => 1.2,
            QueenPhase::Desperation => 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueenBoss {
    pub pos: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub shield: i32,
    pub max_shield: i32,
    pub phase: QueenPhase,
    pub spawn_timer: f32,
    pub attack_timer: f32,
    pub movement_timer: f32,
    pub flash_timer: f32,
}

/// At most one boss variant is live at a time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum Boss {
    #[default]
    None,
    Phase(PhaseBoss),
    Queen(QueenBoss),
}

impl Boss {
    pub fn is_active(&self) -> bool {
        !matches!(self, Boss::None)
    }
}

/// The player ship and its resource economy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub heading: f32,
    pub lives: i32,
    pub invuln_timer: f32,
    /// Shield points; regenerates fractionally, hits consume whole points
    pub shield: f32,
    /// Seconds since the shield last absorbed a hit
    pub shield_regen_timer: f32,
    pub energy: f32,
    pub energy_burn_rate: f32,
    pub energy_recharge_rate: f32,
    pub boosting: bool,
    pub fire_cooldown: f32,
    pub omni_cooldown: f32,
    pub muzzle_flash_timer: f32,
}

impl Player {
    pub fn new(center: Vec2) -> Self {
        Self {
            pos: center,
            vel: Vec2::ZERO,
            heading: -std::f32::consts::FRAC_PI_2,
            lives: START_LIVES,
            invuln_timer: 0.0,
            shield: MAX_SHIELD,
            shield_regen_timer: 0.0,
            energy: MAX_ENERGY,
            energy_burn_rate: ENERGY_BURN_RATE,
            energy_recharge_rate: ENERGY_RECHARGE_RATE,
            boosting: false,
            fire_cooldown: 0.0,
            omni_cooldown: 0.0,
            muzzle_flash_timer: 0.0,
        }
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG carried in-state so snapshots replay identically
    pub rng: Pcg32,
    /// Screen bounds for spawn-edge and wrap math
    pub bounds: Vec2,
    pub phase: GamePhase,
    pub wave: u32,
    pub score: u64,
    pub multiplier: f32,
    pub consecutive_hits: u32,
    /// Count of 100k score thresholds already rewarded with a life
    pub life_milestones: u64,
    /// Countdown to the next wave once the field is clear (0 = idle)
    pub wave_complete_timer: f32,
    pub game_over_timer: f32,
    pub enemy_spawn_timer: f32,
    pub player: Player,
    pub boss: Boss,
    pub asteroids: Pool<Asteroid>,
    pub bullets: Pool<Bullet>,
    pub enemy_bullets: Pool<Bullet>,
    pub enemy_ships: Pool<EnemyShip>,
    pub particles: Pool<Particle>,
    pub floating_texts: Pool<FloatingText>,
    next_ship_id: u32,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh state sitting in the attract phase
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        let bounds = Vec2::new(width, height);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            bounds,
            phase: GamePhase::Attract,
            wave: 0,
            score: 0,
            multiplier: 1.0,
            consecutive_hits: 0,
            life_milestones: 0,
            wave_complete_timer: 0.0,
            game_over_timer: 0.0,
            enemy_spawn_timer: 0.0,
            player: Player::new(bounds * 0.5),
            boss: Boss::None,
            asteroids: Pool::new(MAX_ASTEROIDS),
            bullets: Pool::new(MAX_BULLETS),
            enemy_bullets: Pool::new(MAX_ENEMY_BULLETS),
            enemy_ships: Pool::new(MAX_ENEMY_SHIPS),
            particles: Pool::new(MAX_PARTICLES),
            floating_texts: Pool::new(MAX_FLOATING_TEXTS),
            next_ship_id: 1,
            events: Vec::new(),
        }
    }

    /// Atomically clear every pool and player-state field for a new run.
    /// The caller spawns the first wave afterwards.
    pub fn reset_run(&mut self) {
        let burn = self.player.energy_burn_rate;
        let recharge = self.player.energy_recharge_rate;
        self.asteroids.clear();
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.enemy_ships.clear();
        self.particles.clear();
        self.floating_texts.clear();
        self.boss = Boss::None;
        self.player = Player::new(self.bounds * 0.5);
        self.player.energy_burn_rate = burn;
        self.player.energy_recharge_rate = recharge;
        self.wave = 1;
        self.score = 0;
        self.multiplier = 1.0;
        self.consecutive_hits = 0;
        self.life_milestones = 0;
        self.wave_complete_timer = 0.0;
        self.game_over_timer = 0.0;
        self.enemy_spawn_timer = 8.0;
        self.phase = GamePhase::Playing;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.bounds = Vec2::new(width, height);
    }

    /// Allocate a stable enemy-ship id (for bullet ownership bookkeeping)
    pub fn next_ship_id(&mut self) -> u32 {
        let id = self.next_ship_id;
        self.next_ship_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand the frame's events to the frontend
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Award `points x multiplier` (truncated) and check the extra-life
    /// milestone. Returns the amount actually added.
    pub fn award_points(&mut self, points: u64) -> u64 {
        let awarded = (points as f32 * self.multiplier) as u64;
        self.score += awarded;

        while self.score / EXTRA_LIFE_POINTS > self.life_milestones {
            self.life_milestones += 1;
            self.player.lives += 1;
            self.push_event(GameEvent::ExtraLife);
            log::info!("extra life at {} points", self.score);
        }
        awarded
    }

    /// Record one undamaged kill toward the multiplier streak
    pub fn register_kill(&mut self) {
        self.consecutive_hits += 1;
        if self.consecutive_hits % STREAK_STEP == 0 {
            self.add_multiplier(0.1);
        }
    }

    pub fn add_multiplier(&mut self, amount: f32) {
        self.multiplier = (self.multiplier + amount).min(MAX_MULTIPLIER);
    }

    /// Apply one hit through the layered defense chain:
    /// energy >= 80 absorbs, partial energy drains and falls through,
    /// then shield, then a life.
    pub fn take_hit(&mut self) {
        if self.player.invuln_timer > 0.0 {
            return;
        }
        self.push_event(GameEvent::Hit);

        if self.player.energy >= 80.0 {
            self.player.energy -= 80.0;
            self.player.invuln_timer = 0.5;
            return;
        }
        if self.player.energy > 0.0 {
            // Partial energy only softens the blow; fall through
            self.player.energy = 0.0;
        }

        if self.player.shield > 0.0 {
            self.player.shield -= 1.0;
            self.player.shield_regen_timer = 0.0;
            self.player.invuln_timer = 0.5;
            return;
        }

        self.player.lives -= 1;
        self.consecutive_hits = 0;
        self.multiplier = 1.0;
        self.player.shield = MAX_SHIELD;
        self.player.shield_regen_timer = 0.0;

        if self.player.lives <= 0 {
            self.phase = GamePhase::GameOver;
            self.game_over_timer = GAME_OVER_DELAY;
            self.push_event(GameEvent::GameOver);
            log::info!("game over: wave {} score {}", self.wave, self.score);
        } else {
            self.player.pos = self.bounds * 0.5;
            self.player.vel = Vec2::ZERO;
            self.player.invuln_timer = 3.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(7, 800.0, 600.0)
    }

    #[test]
    fn test_hit_with_full_energy_spends_energy_only() {
        let mut s = state();
        s.player.energy = 90.0;
        s.player.shield = 3.0;
        s.take_hit();
        assert_eq!(s.player.energy, 10.0);
        assert_eq!(s.player.shield, 3.0);
        assert_eq!(s.player.lives, START_LIVES);
        assert!(s.player.invuln_timer > 0.0);
    }

    #[test]
    fn test_hit_with_partial_energy_drains_then_shields() {
        let mut s = state();
        s.player.energy = 50.0;
        s.player.shield = 2.0;
        s.take_hit();
        assert_eq!(s.player.energy, 0.0);
        assert_eq!(s.player.shield, 1.0);
        assert_eq!(s.player.lives, START_LIVES);
    }

    #[test]
    fn test_hit_with_nothing_left_costs_a_life() {
        let mut s = state();
        s.player.energy = 0.0;
        s.player.shield = 0.0;
        s.multiplier = 3.4;
        s.consecutive_hits = 17;
        s.take_hit();
        assert_eq!(s.player.lives, START_LIVES - 1);
        assert_eq!(s.multiplier, 1.0);
        assert_eq!(s.consecutive_hits, 0);
        // Shield comes back with the new life
        assert_eq!(s.player.shield, MAX_SHIELD);
        assert_eq!(s.player.invuln_timer, 3.0);
        assert_eq!(s.player.pos, s.bounds * 0.5);
    }

    #[test]
    fn test_invulnerability_blocks_hits() {
        let mut s = state();
        s.player.energy = 90.0;
        s.player.invuln_timer = 1.0;
        s.take_hit();
        assert_eq!(s.player.energy, 90.0);
    }

    #[test]
    fn test_last_life_triggers_game_over() {
        let mut s = state();
        s.phase = GamePhase::Playing;
        s.player.lives = 1;
        s.player.energy = 0.0;
        s.player.shield = 0.0;
        s.take_hit();
        assert_eq!(s.phase, GamePhase::GameOver);
        assert_eq!(s.game_over_timer, GAME_OVER_DELAY);
    }

    #[test]
    fn test_multiplier_steps_every_five_kills_and_caps() {
        let mut s = state();
        for _ in 0..5 {
            s.register_kill();
        }
        assert!((s.multiplier - 1.1).abs() < 1e-6);

        for _ in 0..10_000 {
            s.register_kill();
        }
        assert_eq!(s.multiplier, MAX_MULTIPLIER);
    }

    #[test]
    fn test_award_points_truncates_and_grants_extra_life() {
        let mut s = state();
        s.multiplier = 1.5;
        let awarded = s.award_points(333);
        // 333 * 1.5 = 499.5 truncates to 499
        assert_eq!(awarded, 499);
        assert_eq!(s.score, 499);

        let lives_before = s.player.lives;
        s.multiplier = 1.0;
        s.award_points(EXTRA_LIFE_POINTS);
        assert_eq!(s.player.lives, lives_before + 1);
        assert_eq!(s.life_milestones, 1);

        // Crossing the same threshold again does not re-fire
        s.award_points(10);
        assert_eq!(s.player.lives, lives_before + 1);
    }

    #[test]
    fn test_reset_run_clears_everything() {
        let mut s = state();
        s.score = 1234;
        s.multiplier = 4.0;
        s.asteroids.spawn(Asteroid {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: SizeClass::Small,
            radius: SizeClass::Small.radius(),
            rotation: 0.0,
            rotation_speed: 0.0,
            band: 0,
            color: band_color(0),
        });
        s.reset_run();
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.score, 0);
        assert_eq!(s.multiplier, 1.0);
        assert_eq!(s.wave, 1);
        assert!(s.asteroids.is_empty());
        assert_eq!(s.player.lives, START_LIVES);
    }

    #[test]
    fn test_split_fanout() {
        assert!(matches!(
            SizeClass::Mega.split(),
            Some((SizeClass::Large, 3, _))
        ));
        assert!(matches!(
            SizeClass::Large.split(),
            Some((SizeClass::Medium, 2, _))
        ));
        assert!(matches!(
            SizeClass::Medium.split(),
            Some((SizeClass::Small, 2, _))
        ));
        assert!(SizeClass::Small.split().is_none());
        assert!(SizeClass::Special.split().is_none());
    }
}
