//! Fixed timestep simulation tick
//!
//! One call advances the whole game by `dt`. The update order is fixed:
//! player, movement/expiry for every pool, collisions, enemy AI, boss,
//! director. Callers drive this at SIM_DT from an accumulator.

use super::boss::update_boss;
use super::collision::resolve_collisions;
use super::enemy::update_enemy_ships;
use super::player::update_player;
use super::spawn::{spawn_wave, update_director};
use super::state::{GamePhase, GameState};
use crate::consts::*;
use crate::wrap_position;

/// Input commands for a single tick. `omni_fire` and `start` are
/// one-shot edges; the held keys are level-triggered.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub turn_left: bool,
    pub turn_right: bool,
    pub thrust_forward: bool,
    pub thrust_backward: bool,
    pub fire: bool,
    pub omni_fire: bool,
    pub boost: bool,
    pub pointer_pos: glam::Vec2,
    pub pointer_active: bool,
    pub start: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::Attract => {
            if state.asteroids.is_empty() {
                populate_attract_field(state);
            }
            drift_entities(state, dt);
            if input.start {
                start_run(state);
            }
        }
        GamePhase::GameOver => {
            drift_entities(state, dt);
            state.game_over_timer -= dt;
            if input.start {
                start_run(state);
            } else if state.game_over_timer <= 0.0 {
                state.phase = GamePhase::Attract;
                state.asteroids.clear();
                state.enemy_ships.clear();
                state.enemy_bullets.clear();
                state.bullets.clear();
            }
        }
        GamePhase::Playing => {
            update_player(state, input, dt);
            move_asteroids(state, dt);
            move_bullets(state, dt);
            move_enemy_bullets(state, dt);
            update_particles(state, dt);
            update_floating_texts(state, dt);
            resolve_collisions(state);
            update_enemy_ships(state, dt);
            update_boss(state, dt);
            update_director(state, dt);
        }
    }
}

fn start_run(state: &mut GameState) {
    state.reset_run();
    spawn_wave(state);
    log::info!("new run, seed {}", state.seed);
}

/// Dense cosmetic asteroid field for the attract screen. The wave
/// counter is display-only until a run starts.
fn populate_attract_field(state: &mut GameState) {
    state.wave = ATTRACT_WAVE;
    spawn_wave(state);
    // Scatter the field instead of having everything pour in from the edges
    let bounds = state.bounds;
    for (i, a) in state.asteroids.iter_mut().enumerate() {
        let spread = i as f32 * 73.0;
        a.pos.x = (a.pos.x + spread).rem_euclid(bounds.x);
        a.pos.y = (a.pos.y + spread * 0.61).rem_euclid(bounds.y);
    }
}

/// Passive motion for the attract and game-over screens
fn drift_entities(state: &mut GameState, dt: f32) {
    move_asteroids(state, dt);
    update_particles(state, dt);
    update_floating_texts(state, dt);
}

fn move_asteroids(state: &mut GameState, dt: f32) {
    let bounds = state.bounds;
    for a in state.asteroids.iter_mut() {
        a.pos = wrap_position(a.pos + a.vel * dt, bounds);
        a.rotation += a.rotation_speed * dt;
    }
}

fn move_bullets(state: &mut GameState, dt: f32) {
    let bounds = state.bounds;
    let mut i = 0;
    while i < state.bullets.len() {
        let b = &mut state.bullets[i];
        b.lifetime -= dt;
        if b.lifetime <= 0.0 {
            state.bullets.remove(i);
            continue;
        }
        b.pos = wrap_position(b.pos + b.vel * dt, bounds);
        i += 1;
    }
}

/// Enemy bullets do not wrap; they fly straight and despawn off-screen
fn move_enemy_bullets(state: &mut GameState, dt: f32) {
    let bounds = state.bounds;
    let mut i = 0;
    while i < state.enemy_bullets.len() {
        let b = &mut state.enemy_bullets[i];
        b.lifetime -= dt;
        b.pos += b.vel * dt;
        let gone = b.lifetime <= 0.0
            || b.pos.x < -ENEMY_DESPAWN_MARGIN
            || b.pos.x > bounds.x + ENEMY_DESPAWN_MARGIN
            || b.pos.y < -ENEMY_DESPAWN_MARGIN
            || b.pos.y > bounds.y + ENEMY_DESPAWN_MARGIN;
        if gone {
            state.enemy_bullets.remove(i);
            continue;
        }
        i += 1;
    }
}

fn update_particles(state: &mut GameState, dt: f32) {
    let mut i = 0;
    while i < state.particles.len() {
        let p = &mut state.particles[i];
        p.lifetime -= dt;
        if p.lifetime <= 0.0 {
            state.particles.remove(i);
            continue;
        }
        p.vel.y += PARTICLE_GRAVITY * dt;
        p.pos += p.vel * dt;
        i += 1;
    }
}

fn update_floating_texts(state: &mut GameState, dt: f32) {
    let mut i = 0;
    while i < state.floating_texts.len() {
        let t = &mut state.floating_texts[i];
        t.lifetime -= dt;
        if t.lifetime <= 0.0 {
            state.floating_texts.remove(i);
            continue;
        }
        t.pos.y -= 20.0 * dt;
        i += 1;
    }
}
