//! Player ship control, movement, resource economy and weapons

use glam::Vec2;

use super::state::{Bullet, GameEvent, GameState};
use super::tick::TickInput;
use crate::consts::*;
use crate::{heading_vec, normalize_angle, wrap_position};

/// Resolved control scheme for one frame. Keyboard movement always wins
/// over the pointer; with neither, the ship coasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    Keyboard,
    Pointer,
    Coast,
}

pub fn resolve_control_mode(input: &TickInput) -> ControlMode {
    if input.turn_left || input.turn_right || input.thrust_forward || input.thrust_backward {
        ControlMode::Keyboard
    } else if input.pointer_active {
        ControlMode::Pointer
    } else {
        ControlMode::Coast
    }
}

/// Pointer-distance acceleration band: gentle inside 50px, ramping
/// between 50 and 400px, doubled beyond.
fn pointer_accel_factor(distance: f32) -> f32 {
    if distance < 50.0 {
        0.1
    } else if distance <= 400.0 {
        1.0 + (distance / 400.0) * 1.5
    } else {
        2.0
    }
}

/// Advance the player ship one frame: control, thrust, boost, drag,
/// integration, wrap, energy and weapon handling.
pub fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let player = &mut state.player;

    player.invuln_timer = (player.invuln_timer - dt).max(0.0);
    player.fire_cooldown = (player.fire_cooldown - dt).max(0.0);
    player.omni_cooldown = (player.omni_cooldown - dt).max(0.0);
    player.muzzle_flash_timer = (player.muzzle_flash_timer - dt).max(0.0);

    match resolve_control_mode(input) {
        ControlMode::Keyboard => {
            if input.turn_left {
                player.heading = normalize_angle(player.heading - SHIP_TURN_RATE * dt);
            }
            if input.turn_right {
                player.heading = normalize_angle(player.heading + SHIP_TURN_RATE * dt);
            }
            if input.thrust_forward {
                player.vel += heading_vec(player.heading) * SHIP_THRUST * dt;
            }
            if input.thrust_backward {
                player.vel -= heading_vec(player.heading) * SHIP_THRUST * dt;
            }
        }
        ControlMode::Pointer => {
            let to_pointer = input.pointer_pos - player.pos;
            let distance = to_pointer.length();
            if distance > 1.0 {
                let bearing = to_pointer.y.atan2(to_pointer.x);
                let mut delta = normalize_angle(bearing - player.heading);
                let max_turn = POINTER_TURN_RATE * dt;
                delta = delta.clamp(-max_turn, max_turn);
                player.heading = normalize_angle(player.heading + delta);

                let accel = POINTER_BASE_ACCEL * pointer_accel_factor(distance);
                player.vel += heading_vec(player.heading) * accel * dt;
            }
        }
        ControlMode::Coast => {}
    }

    // Boost: extra thrust along heading while energy holds out
    let want_boost = input.boost && player.energy >= BOOST_MIN_ENERGY;
    if want_boost {
        if !player.boosting {
            state.events.push(GameEvent::Boost);
        }
        player.vel += heading_vec(player.heading) * SHIP_BOOST_THRUST * dt;
        player.energy = (player.energy - player.energy_burn_rate * dt).max(0.0);
    }
    player.boosting = want_boost;

    // Cap, drag, integrate, wrap
    let speed = player.vel.length();
    if speed > SHIP_MAX_SPEED {
        player.vel *= SHIP_MAX_SPEED / speed;
    }
    player.vel *= SHIP_DRAG;
    player.pos = wrap_position(player.pos + player.vel * dt, state.bounds);

    // Shield regen after the undamaged delay window
    player.shield_regen_timer += dt;
    if player.shield_regen_timer >= SHIELD_REGEN_DELAY && player.shield < MAX_SHIELD {
        player.shield = (player.shield + SHIELD_REGEN_RATE * dt).min(MAX_SHIELD);
    }

    let mut fired = false;

    if input.fire && player.fire_cooldown <= 0.0 && player.energy >= FIRE_ENERGY_COST {
        let bullet = Bullet {
            pos: player.pos,
            vel: heading_vec(player.heading) * BULLET_SPEED,
            heading: player.heading,
            lifetime: BULLET_LIFETIME,
            owner: None,
        };
        player.energy -= FIRE_ENERGY_COST;
        player.fire_cooldown = FIRE_COOLDOWN;
        player.muzzle_flash_timer = 0.1;
        fired = true;
        state.bullets.spawn(bullet);
        state.events.push(GameEvent::Fire);
    }

    if input.omni_fire && state.player.omni_cooldown <= 0.0 && state.player.energy >= OMNI_ENERGY_COST
    {
        let origin = state.player.pos;
        for i in 0..OMNI_DIRECTIONS {
            let angle = std::f32::consts::TAU * i as f32 / OMNI_DIRECTIONS as f32;
            if !state.bullets.spawn(Bullet {
                pos: origin,
                vel: heading_vec(angle) * BULLET_SPEED,
                heading: angle,
                lifetime: BULLET_LIFETIME,
                owner: None,
            }) {
                break;
            }
        }
        state.player.energy -= OMNI_ENERGY_COST;
        state.player.omni_cooldown = OMNI_COOLDOWN;
        state.player.muzzle_flash_timer = 0.15;
        fired = true;
        state.events.push(GameEvent::Fire);
    }

    // Recharge only while neither boosting nor firing
    let player = &mut state.player;
    if !player.boosting && !fired {
        player.energy = (player.energy + player.energy_recharge_rate * dt).min(MAX_ENERGY);
    }
}
