//! Wave/spawn director
//!
//! Decides when asteroids, enemy ships and bosses enter play, and advances
//! the wave counter once the field is clear. Enemy ships arrive on their
//! own jittered timer, independent of waves.

use glam::Vec2;
use rand::Rng;

use super::state::{
    Asteroid, Boss, BossPhase, Bullet, EnemyShip, FloatingText, Formation, GameState, Particle,
    PhaseBoss, QueenBoss, QueenPhase, ShipKind, SizeClass, band_color,
};
use crate::consts::*;

/// Asteroid count for a wave: 3,5,7,9,11 then +3 per wave, capped at 25
pub fn wave_asteroid_count(wave: u32) -> usize {
    match wave.max(1) {
        1 => 3,
        2 => 5,
        3 => 7,
        4 => 9,
        5 => 11,
        w => (11 + 3 * (w as usize - 5)).min(25),
    }
}

/// Asteroid speed multiplier for a wave, capped at 2.5
pub fn wave_speed_multiplier(wave: u32) -> f32 {
    match wave {
        0 | 1 => 1.0,
        2 => 1.1,
        3 => 1.2,
        4 => 1.35,
        5 => 1.5,
        w => (1.5 + 0.1 * (w - 5) as f32).min(2.5),
    }
}

/// Spawn one asteroid on a random screen edge, drifting toward the
/// center region. Sizes skew heavy: 40% mega, 30% large, 20% medium,
/// 10% small.
pub fn spawn_asteroid(state: &mut GameState, band: u8, speed_mult: f32) {
    if state.asteroids.is_full() {
        return;
    }
    let (w, h) = (state.bounds.x, state.bounds.y);

    let pos = match state.rng.random_range(0..4u32) {
        0 => Vec2::new(state.rng.random_range(0.0..w), -30.0),
        1 => Vec2::new(w + 30.0, state.rng.random_range(0.0..h)),
        2 => Vec2::new(state.rng.random_range(0.0..w), h + 30.0),
        _ => Vec2::new(-30.0, state.rng.random_range(0.0..h)),
    };

    let target = Vec2::new(
        w / 2.0 + state.rng.random_range(-100.0..100.0),
        h / 2.0 + state.rng.random_range(-100.0..100.0),
    );
    let speed = state.rng.random_range(50.0..100.0) * speed_mult;
    let vel = (target - pos).normalize_or_zero() * speed;

    let size = match state.rng.random_range(0..100u32) {
        0..40 => SizeClass::Mega,
        40..70 => SizeClass::Large,
        70..90 => SizeClass::Medium,
        _ => SizeClass::Small,
    };

    let rotation_speed = state.rng.random_range(0.8..4.0);
    state.asteroids.spawn(Asteroid {
        pos,
        vel,
        size,
        radius: size.radius(),
        rotation: 0.0,
        rotation_speed,
        band,
        color: band_color(band),
    });
}

/// Low-level asteroid spawn at an explicit position/velocity (boss hurls)
pub fn spawn_asteroid_at(state: &mut GameState, pos: Vec2, vel: Vec2, size: SizeClass, band: u8) {
    state.asteroids.spawn(Asteroid {
        pos,
        vel,
        size,
        radius: size.radius(),
        rotation: 0.0,
        rotation_speed: 1.5,
        band,
        color: band_color(band),
    });
}

/// Populate the current wave: Spawn Queen every 10th wave, phase boss
/// (plus 3 asteroids) every wave ending in 5, otherwise asteroids only.
pub fn spawn_wave(state: &mut GameState) {
    state.boss = Boss::None;

    if state.wave > 0 && state.wave % 10 == 0 {
        spawn_queen(state);
        log::info!("wave {}: spawn queen", state.wave);
    } else if state.wave % 10 == 5 {
        spawn_phase_boss(state);
        for _ in 0..3 {
            let band = state.rng.random_range(0..3u32) as u8;
            spawn_asteroid(state, band, 1.0);
        }
        log::info!("wave {}: phase boss", state.wave);
    } else {
        let count = wave_asteroid_count(state.wave);
        let mult = wave_speed_multiplier(state.wave);
        for _ in 0..count {
            let band = state.rng.random_range(0..3u32) as u8;
            spawn_asteroid(state, band, mult);
        }
        log::debug!("wave {}: {} asteroids x{:.2}", state.wave, count, mult);
    }
}

fn spawn_phase_boss(state: &mut GameState) {
    let vx = state.rng.random_range(40.0..80.0);
    state.boss = Boss::Phase(PhaseBoss {
        pos: Vec2::new(state.bounds.x / 2.0, -80.0),
        vel: Vec2::new(vx, 100.0),
        health: 180,
        max_health: 180,
        shield: 30,
        max_shield: 30,
        shield_active: true,
        phase: BossPhase::Normal,
        phase_timer: 0.0,
        fire_cooldown: 0.0,
        flash_timer: 0.0,
    });
}

fn spawn_queen(state: &mut GameState) {
    let health = 80 + 5 * state.wave.saturating_sub(10) as i32;
    state.boss = Boss::Queen(QueenBoss {
        pos: Vec2::new(state.bounds.x / 2.0, 100.0),
        health,
        max_health: health,
        shield: 15,
        max_shield: 15,
        phase: QueenPhase::Recruitment,
        spawn_timer: 2.0,
        attack_timer: 0.0,
        movement_timer: 0.0,
        flash_timer: 0.0,
    });
}

/// Entry position, velocity and heading for one of the 8 spawn edges
/// (4 sides + 4 diagonals)
fn edge_entry(state: &mut GameState, edge: u32, speed: f32) -> (Vec2, Vec2) {
    let (w, h) = (state.bounds.x, state.bounds.y);
    let diag = speed / std::f32::consts::SQRT_2;
    match edge % 8 {
        0 => (
            Vec2::new(-20.0, state.rng.random_range(50.0..h - 50.0)),
            Vec2::new(speed, 0.0),
        ),
        1 => (
            Vec2::new(w + 20.0, state.rng.random_range(50.0..h - 50.0)),
            Vec2::new(-speed, 0.0),
        ),
        2 => (
            Vec2::new(state.rng.random_range(50.0..w - 50.0), -20.0),
            Vec2::new(0.0, speed),
        ),
        3 => (
            Vec2::new(state.rng.random_range(50.0..w - 50.0), h + 20.0),
            Vec2::new(0.0, -speed),
        ),
        4 => (Vec2::new(-20.0, -20.0), Vec2::new(diag, diag)),
        5 => (Vec2::new(w + 20.0, -20.0), Vec2::new(-diag, diag)),
        6 => (Vec2::new(-20.0, h + 20.0), Vec2::new(diag, -diag)),
        _ => (Vec2::new(w + 20.0, h + 20.0), Vec2::new(-diag, -diag)),
    }
}

/// Spawn one enemy ship at a given edge. `member` spreads formation
/// mates 30px apart so they do not stack.
pub fn spawn_enemy_ship_at(
    state: &mut GameState,
    kind: ShipKind,
    edge: u32,
    speed: f32,
    formation: Option<Formation>,
    member: usize,
) {
    if state.enemy_ships.is_full() {
        return;
    }
    let (mut pos, vel) = edge_entry(state, edge, speed);

    if let Some(f) = formation {
        let offset_angle = std::f32::consts::TAU * member as f32 / f.size.max(1) as f32;
        pos += Vec2::new(offset_angle.cos(), offset_angle.sin()) * 30.0;
    }

    let id = state.next_ship_id();
    let shield = kind.shield_points();
    let fire_cooldown = state.rng.random_range(1.0..3.0);
    state.enemy_ships.spawn(EnemyShip {
        id,
        kind,
        pos,
        vel,
        base_vel: vel,
        heading: vel.y.atan2(vel.x),
        health: 1,
        shield,
        max_shield: shield,
        fire_cooldown,
        path_time: 0.0,
        formation,
    });
}

/// Weighted pick for the independent ship spawner: 10% aggressive,
/// 75% patrol, 10% hunter, 5% sentinel pair/triple. Sentinels only
/// arrive while no aggressive ship is live and the pool can hold a pair;
/// otherwise the roll falls back to a patrol ship.
pub fn spawn_enemy_ship(state: &mut GameState) {
    let edge = state.rng.random_range(0..8u32);
    let speed = state.rng.random_range(80.0..120.0);
    let roll = state.rng.random_range(0..100u32);

    let aggressive_live = state
        .enemy_ships
        .iter()
        .any(|s| s.kind == ShipKind::Aggressive);

    match roll {
        0..10 => spawn_enemy_ship_at(state, ShipKind::Aggressive, edge, speed, None, 0),
        10..85 => spawn_enemy_ship_at(state, ShipKind::Patrol, edge, speed, None, 0),
        85..95 => spawn_enemy_ship_at(state, ShipKind::Hunter, edge, speed, None, 0),
        _ => {
            let room = state.enemy_ships.capacity() - state.enemy_ships.len();
            if !aggressive_live && room >= 2 {
                let size = state.rng.random_range(2..4u32) as u8;
                let formation = Formation {
                    id: state.wave * 100 + state.rng.random_range(0..100u32),
                    size,
                };
                for member in 0..size as usize {
                    spawn_enemy_ship_at(
                        state,
                        ShipKind::Sentinel,
                        edge,
                        speed,
                        Some(formation),
                        member,
                    );
                }
            } else {
                spawn_enemy_ship_at(state, ShipKind::Patrol, edge, speed, None, 0);
            }
        }
    }
}

pub fn spawn_enemy_bullet(state: &mut GameState, pos: Vec2, vel: Vec2, owner: Option<u32>) {
    state.enemy_bullets.spawn(Bullet {
        pos,
        vel,
        heading: vel.y.atan2(vel.x),
        lifetime: ENEMY_BULLET_LIFETIME,
        owner,
    });
}

/// Radial particle burst at a destruction site
pub fn spawn_explosion(state: &mut GameState, pos: Vec2, band: u8, count: usize) {
    for i in 0..count {
        if state.particles.is_full() {
            break;
        }
        let angle =
            std::f32::consts::TAU * i as f32 / count as f32 + state.rng.random_range(0.0..0.3);
        let speed = state.rng.random_range(100.0..200.0);
        let lifetime = state.rng.random_range(0.3..0.5);
        let radius = state.rng.random_range(2.0..6.0);
        state.particles.spawn(Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            lifetime,
            max_lifetime: lifetime,
            radius,
            color: band_color(band),
        });
    }
}

pub fn spawn_floating_text(state: &mut GameState, pos: Vec2, text: impl Into<String>, color: [f32; 3]) {
    state.floating_texts.spawn(FloatingText {
        pos,
        text: text.into(),
        color,
        lifetime: FLOATING_TEXT_LIFETIME,
    });
}

/// Per-frame director duties: the jittered enemy-ship timer and wave
/// progression. Progression never runs while a boss is live.
pub fn update_director(state: &mut GameState, dt: f32) {
    state.enemy_spawn_timer -= dt;
    if state.enemy_spawn_timer <= 0.0 {
        spawn_enemy_ship(state);
        state.enemy_spawn_timer = 8.0 + state.rng.random_range(0.0..3.0);
    }

    if state.asteroids.is_empty() && !state.boss.is_active() && state.wave_complete_timer <= 0.0 {
        state.wave_complete_timer = WAVE_COMPLETE_DELAY;
    }

    if state.wave_complete_timer > 0.0 {
        state.wave_complete_timer -= dt;
        if state.wave_complete_timer <= 0.0 {
            state.wave_complete_timer = 0.0;
            state.wave += 1;
            spawn_wave(state);
        }
    }
}
