//! Enemy ship behaviors
//!
//! Each ship type steers independently every frame; all types share the
//! emergency asteroid-avoidance nudge. Steering only writes velocities
//! and fire decisions; integration happens with the rest of the movement
//! pass. Fired bullets are deferred into a scratch list so the ship loop
//! never aliases the bullet pool.

use glam::Vec2;
use rand::Rng;

use super::pool::Pool;
use super::spawn::spawn_enemy_bullet;
use super::state::{Asteroid, GameEvent, GameState, ShipKind};
use crate::consts::*;

/// Perpendicular sine oscillation: amplitude 50px at 1.5 Hz of path time
const SINE_AMPLITUDE: f32 = 50.0;
const SINE_FREQUENCY: f32 = 1.5;

/// Hunter switches from mining to pursuit inside this range
const HUNTER_PURSUIT_RANGE: f32 = 300.0;
const PATROL_TARGET_RANGE: f32 = 500.0;
const HUNTER_TARGET_RANGE: f32 = 600.0;
const SENTINEL_COHESION: f32 = 0.7;
const SENTINEL_CENTROID_RANGE: f32 = 100.0;

fn nearest_asteroid(asteroids: &Pool<Asteroid>, from: Vec2) -> Option<(Vec2, f32)> {
    asteroids
        .iter()
        .map(|a| (a.pos, a.pos.distance(from)))
        .min_by(|x, y| x.1.partial_cmp(&y.1).unwrap_or(std::cmp::Ordering::Equal))
}

/// Sine-weave velocity around the cruise vector (patrol and idle hunter)
fn weave_velocity(base_vel: Vec2, path_time: f32) -> Vec2 {
    let dir = base_vel.normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x);
    let swing = (std::f32::consts::TAU * SINE_FREQUENCY * path_time).sin() * SINE_AMPLITUDE;
    base_vel + perp * swing
}

/// Kicks in once the strongest contact exceeds this
const AVOID_THRESHOLD: f32 = 0.1;

/// Sum away-vectors over every asteroid within 50px, weighted by
/// proximity. Above the threshold the dodge blends in at 20% and the
/// result is renormalized so the ship keeps its cruise speed.
fn apply_avoidance(vel: Vec2, pos: Vec2, base_speed: f32, asteroids: &Pool<Asteroid>) -> Vec2 {
    let mut away = Vec2::ZERO;
    let mut max_strength = 0.0f32;
    for a in asteroids.iter() {
        let delta = pos - a.pos;
        let dist = delta.length();
        if dist >= ENEMY_AVOID_RADIUS || dist <= 0.0001 {
            continue;
        }
        let strength = 1.0 - dist / ENEMY_AVOID_RADIUS;
        away += delta / dist * strength;
        max_strength = max_strength.max(strength);
    }
    if max_strength <= AVOID_THRESHOLD {
        return vel;
    }

    let dodge = away.normalize_or_zero() * base_speed;
    (vel * 0.8 + dodge * 0.2).normalize_or_zero() * base_speed
}

/// Steer and fire every live enemy ship for one frame
pub fn update_enemy_ships(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos;
    let bounds = state.bounds;
    let mut shots: Vec<(Vec2, Vec2, u32)> = Vec::new();

    let mut i = 0;
    while i < state.enemy_ships.len() {
        let pos = state.enemy_ships[i].pos;
        if pos.x < -ENEMY_DESPAWN_MARGIN
            || pos.x > bounds.x + ENEMY_DESPAWN_MARGIN
            || pos.y < -ENEMY_DESPAWN_MARGIN
            || pos.y > bounds.y + ENEMY_DESPAWN_MARGIN
        {
            state.enemy_ships.remove(i);
            continue;
        }

        let mut ship = state.enemy_ships[i].clone();
        ship.path_time += dt;
        let base_speed = ship.base_vel.length().max(1.0);
        let to_player = player_pos - ship.pos;
        let player_dist = to_player.length();

        let mut vel = match ship.kind {
            ShipKind::Patrol => weave_velocity(ship.base_vel, ship.path_time),
            ShipKind::Aggressive => to_player.normalize_or_zero() * base_speed,
            ShipKind::Hunter => {
                if player_dist < HUNTER_PURSUIT_RANGE {
                    to_player.normalize_or_zero() * base_speed
                } else {
                    weave_velocity(ship.base_vel, ship.path_time)
                }
            }
            ShipKind::Sentinel => {
                let mut vel = ship.base_vel * SENTINEL_COHESION;
                if let Some(f) = ship.formation {
                    let mates: Vec<Vec2> = state
                        .enemy_ships
                        .iter()
                        .filter(|s| s.id != ship.id && s.formation.map(|m| m.id) == Some(f.id))
                        .map(|s| s.pos)
                        .collect();
                    if !mates.is_empty() {
                        let centroid = mates.iter().sum::<Vec2>() / mates.len() as f32;
                        let gap = centroid - ship.pos;
                        if gap.length() > SENTINEL_CENTROID_RANGE {
                            vel += gap.normalize_or_zero() * base_speed * (1.0 - SENTINEL_COHESION);
                        }
                    }
                }
                vel
            }
        };

        vel = apply_avoidance(vel, ship.pos, base_speed, &state.asteroids);
        ship.vel = vel;
        ship.heading = vel.y.atan2(vel.x);

        // Fire decisions; sentinels hold formation and never shoot
        ship.fire_cooldown = (ship.fire_cooldown - dt).max(0.0);
        if ship.fire_cooldown <= 0.0 {
            match ship.kind {
                ShipKind::Patrol => {
                    if let Some((target, dist)) = nearest_asteroid(&state.asteroids, ship.pos) {
                        if dist <= PATROL_TARGET_RANGE {
                            let dir = (target - ship.pos).normalize_or_zero();
                            shots.push((ship.pos, dir * ENEMY_BULLET_SPEED, ship.id));
                            ship.fire_cooldown = state.rng.random_range(0.8..1.8);
                        }
                    }
                }
                ShipKind::Aggressive => {
                    let dir = to_player.normalize_or_zero();
                    shots.push((ship.pos, dir * ENEMY_BULLET_SPEED, ship.id));
                    ship.fire_cooldown = state.rng.random_range(0.3..0.8);
                }
                ShipKind::Hunter => {
                    if player_dist < HUNTER_PURSUIT_RANGE {
                        let dir = to_player.normalize_or_zero();
                        shots.push((ship.pos, dir * ENEMY_BULLET_SPEED, ship.id));
                        ship.fire_cooldown = state.rng.random_range(0.15..0.4);
                    } else if let Some((target, dist)) =
                        nearest_asteroid(&state.asteroids, ship.pos)
                    {
                        if dist <= HUNTER_TARGET_RANGE {
                            let dir = (target - ship.pos).normalize_or_zero();
                            shots.push((ship.pos, dir * ENEMY_BULLET_SPEED, ship.id));
                            ship.fire_cooldown = state.rng.random_range(0.15..0.4);
                        } else {
                            ship.fire_cooldown = 0.4;
                        }
                    } else {
                        ship.fire_cooldown = 0.4;
                    }
                }
                ShipKind::Sentinel => {}
            }
        }

        state.enemy_ships[i] = ship;
        i += 1;
    }

    for (pos, vel, owner) in shots {
        spawn_enemy_bullet(state, pos, vel, Some(owner));
        state.push_event(GameEvent::AlienFire);
    }
}
