//! Collision detection and response
//!
//! All pairwise tests run once per frame after movement, in a fixed order:
//! asteroid-asteroid (elastic), then the destructive bullet and contact
//! passes. Removal during iteration uses the swap-and-revisit pattern, so
//! loops advance their cursor only when the current slot survives.

use glam::Vec2;
use rand::Rng;

use super::spawn::{spawn_asteroid_at, spawn_explosion, spawn_floating_text};
use super::state::{Asteroid, Boss, GameEvent, GameState, ShipKind};
use crate::consts::*;

#[inline]
pub fn circles_overlap(p1: Vec2, r1: f32, p2: Vec2, r2: f32) -> bool {
    p1.distance_squared(p2) < (r1 + r2) * (r1 + r2)
}

/// Impulse-based elastic response between two asteroids, mass ~ radius^2.
/// Skips pairs that are already separating; afterwards pushes the pair
/// apart by the overlap split proportional to inverse mass, plus a small
/// epsilon so the contact does not re-trigger next frame.
pub fn elastic_collision(a: &mut Asteroid, b: &mut Asteroid) -> bool {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    if dist <= 0.0001 || dist >= a.radius + b.radius {
        return false;
    }

    let normal = delta / dist;
    let approach = (a.vel - b.vel).dot(normal);
    if approach <= 0.0 {
        return false;
    }

    let mass_a = a.radius * a.radius;
    let mass_b = b.radius * b.radius;
    let impulse = 2.0 * approach / (mass_a + mass_b);
    a.vel -= normal * impulse * mass_b;
    b.vel += normal * impulse * mass_a;

    let overlap = (a.radius + b.radius) - dist + 0.01;
    a.pos -= normal * overlap * (mass_b / (mass_a + mass_b));
    b.pos += normal * overlap * (mass_a / (mass_a + mass_b));
    true
}

/// Destroy the asteroid at `idx`: score + streak, size-class fan-out into
/// children, particles and a floating score popup. One shared path no
/// matter what destroyed it.
pub fn destroy_asteroid(state: &mut GameState, idx: usize) {
    let Some(asteroid) = state.asteroids.remove(idx) else {
        return;
    };

    let awarded = state.award_points(asteroid.size.points());
    state.register_kill();
    state.push_event(GameEvent::Explosion);

    spawn_explosion(state, asteroid.pos, asteroid.band, 14);
    spawn_floating_text(
        state,
        asteroid.pos,
        format!("+{awarded}"),
        asteroid.color,
    );

    if let Some((child_size, count, speed_band)) = asteroid.size.split() {
        for _ in 0..count {
            let offset = Vec2::new(
                state.rng.random_range(-5.0..5.0),
                state.rng.random_range(-5.0..5.0),
            );
            let angle = state.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = state.rng.random_range(speed_band.clone());
            spawn_asteroid_at(
                state,
                asteroid.pos + offset,
                Vec2::new(angle.cos(), angle.sin()) * speed,
                child_size,
                asteroid.band,
            );
        }
    }
}

/// Destroy the enemy ship at `idx`, awarding `points`
pub fn destroy_enemy_ship(state: &mut GameState, idx: usize, points: u64) {
    let Some(ship) = state.enemy_ships.remove(idx) else {
        return;
    };
    let awarded = state.award_points(points);
    state.register_kill();
    state.push_event(GameEvent::Explosion);
    spawn_explosion(state, ship.pos, 1, 16);
    spawn_floating_text(state, ship.pos, format!("+{awarded}"), [0.9, 0.9, 0.3]);
}

/// One player-bullet (or stray enemy-bullet) hit on an enemy ship.
/// The first hit on a patrol ship provokes it instead of damaging:
/// it turns aggressive with a restored shield and an instant reload.
/// Returns true when the ship was destroyed.
fn hit_enemy_ship(state: &mut GameState, idx: usize, allow_provoke: bool) -> bool {
    let ship = &mut state.enemy_ships[idx];

    if allow_provoke && ship.kind == ShipKind::Patrol {
        ship.kind = ShipKind::Aggressive;
        ship.shield = 3;
        ship.max_shield = 3;
        ship.fire_cooldown = 0.0;
        let pos = ship.pos;
        spawn_floating_text(state, pos, "PROVOKED", [1.0, 0.3, 0.3]);
        return false;
    }

    if ship.shield > 0 {
        ship.shield -= 1;
        return false;
    }

    destroy_enemy_ship(state, idx, ENEMY_SHIP_POINTS);
    true
}

/// Shared boss destruction reward: large bonus, straight +1.0 multiplier,
/// +10 streak and the 2s wave-complete countdown.
fn destroy_boss(state: &mut GameState, pos: Vec2) {
    let awarded = state.award_points(BOSS_POINTS);
    state.add_multiplier(1.0);
    state.consecutive_hits += 10;
    state.wave_complete_timer = WAVE_COMPLETE_DELAY;
    state.boss = Boss::None;
    state.push_event(GameEvent::Explosion);
    spawn_explosion(state, pos, 2, 80);
    spawn_floating_text(state, pos, format!("+{awarded}"), [1.0, 0.2, 1.0]);
    log::info!("boss destroyed on wave {}", state.wave);
}

/// One bullet hit on whatever boss is live. Phase boss: shielded hits cost
/// shield 1 + health 1, unshielded cost health 2. Queen: shield first,
/// then health 1:1.
fn hit_boss(state: &mut GameState) {
    match &mut state.boss {
        Boss::None => {}
        Boss::Phase(boss) => {
            if boss.shield_active && boss.shield > 0 {
                boss.shield -= 1;
                boss.health -= 1;
            } else {
                boss.health -= 2;
            }
            boss.flash_timer = 0.1;
            if boss.health <= 0 {
                let pos = boss.pos;
                destroy_boss(state, pos);
            }
        }
        Boss::Queen(queen) => {
            if queen.shield > 0 {
                queen.shield -= 1;
            } else {
                queen.health -= 1;
            }
            queen.flash_timer = 0.1;
            if queen.health <= 0 {
                let pos = queen.pos;
                destroy_boss(state, pos);
            }
        }
    }
}

/// Live boss hull position/radius for bullet and contact tests
fn boss_body(state: &GameState) -> Option<(Vec2, f32)> {
    match &state.boss {
        Boss::None => None,
        Boss::Phase(b) => Some((b.pos, BOSS_RADIUS)),
        Boss::Queen(q) => Some((q.pos, QUEEN_RADIUS)),
    }
}

/// Run every collision pass for the frame
pub fn resolve_collisions(state: &mut GameState) {
    // Asteroid-asteroid elastic bounces
    let n = state.asteroids.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = state.asteroids.pair_mut(i, j);
            elastic_collision(a, b);
        }
    }

    // Player bullets vs asteroids
    let mut i = 0;
    'bullets: while i < state.bullets.len() {
        let bpos = state.bullets[i].pos;
        let mut j = 0;
        while j < state.asteroids.len() {
            let a = &state.asteroids[j];
            if circles_overlap(bpos, BULLET_RADIUS, a.pos, a.radius) {
                state.bullets.remove(i);
                destroy_asteroid(state, j);
                continue 'bullets;
            }
            j += 1;
        }
        i += 1;
    }

    // Player bullets vs enemy ships
    let mut i = 0;
    'bullets2: while i < state.bullets.len() {
        let bpos = state.bullets[i].pos;
        let mut j = 0;
        while j < state.enemy_ships.len() {
            let ship = &state.enemy_ships[j];
            if circles_overlap(bpos, BULLET_RADIUS, ship.pos, ENEMY_SHIP_RADIUS) {
                state.bullets.remove(i);
                hit_enemy_ship(state, j, true);
                continue 'bullets2;
            }
            j += 1;
        }
        i += 1;
    }

    // Player bullets vs boss
    if let Some((boss_pos, boss_radius)) = boss_body(state) {
        let mut i = 0;
        while i < state.bullets.len() {
            if circles_overlap(state.bullets[i].pos, BULLET_RADIUS, boss_pos, boss_radius) {
                state.bullets.remove(i);
                hit_boss(state);
                if !state.boss.is_active() {
                    break;
                }
                continue;
            }
            i += 1;
        }
    }

    // Enemy bullets vs asteroids
    let mut i = 0;
    'ebullets: while i < state.enemy_bullets.len() {
        let bpos = state.enemy_bullets[i].pos;
        let mut j = 0;
        while j < state.asteroids.len() {
            let a = &state.asteroids[j];
            if circles_overlap(bpos, BULLET_RADIUS, a.pos, a.radius) {
                state.enemy_bullets.remove(i);
                destroy_asteroid(state, j);
                continue 'ebullets;
            }
            j += 1;
        }
        i += 1;
    }

    // Enemy bullets vs enemy ships (friendly fire, never the owner)
    let mut i = 0;
    'ff: while i < state.enemy_bullets.len() {
        let bullet = state.enemy_bullets[i];
        let mut j = 0;
        while j < state.enemy_ships.len() {
            let ship = &state.enemy_ships[j];
            let is_owner = bullet.owner == Some(ship.id);
            if !is_owner && circles_overlap(bullet.pos, BULLET_RADIUS, ship.pos, ENEMY_SHIP_RADIUS)
            {
                state.enemy_bullets.remove(i);
                hit_enemy_ship(state, j, false);
                continue 'ff;
            }
            j += 1;
        }
        i += 1;
    }

    // Enemy bullets vs player
    if state.player.invuln_timer <= 0.0 {
        let mut i = 0;
        while i < state.enemy_bullets.len() {
            if circles_overlap(
                state.enemy_bullets[i].pos,
                BULLET_RADIUS,
                state.player.pos,
                SHIP_RADIUS,
            ) {
                state.enemy_bullets.remove(i);
                state.take_hit();
                if state.player.invuln_timer > 0.0 || state.player.lives <= 0 {
                    break;
                }
                continue;
            }
            i += 1;
        }
    }

    // Player vs asteroids
    if state.player.invuln_timer <= 0.0 {
        let mut j = 0;
        while j < state.asteroids.len() {
            let a = &state.asteroids[j];
            if circles_overlap(state.player.pos, SHIP_RADIUS, a.pos, a.radius) {
                destroy_asteroid(state, j);
                state.take_hit();
                break;
            }
            j += 1;
        }
    }

    // Player vs enemy ships (mutual destruction)
    if state.player.invuln_timer <= 0.0 {
        let mut j = 0;
        while j < state.enemy_ships.len() {
            let ship = &state.enemy_ships[j];
            if circles_overlap(state.player.pos, SHIP_RADIUS, ship.pos, ENEMY_SHIP_RADIUS) {
                destroy_enemy_ship(state, j, RAM_SHIP_POINTS);
                state.take_hit();
                break;
            }
            j += 1;
        }
    }

    // Enemy ships vs asteroids: each rock eats a shield point, then the
    // ship goes. The contact circle is wider than the hull here.
    let mut i = 0;
    'ships: while i < state.enemy_ships.len() {
        let spos = state.enemy_ships[i].pos;
        let mut j = 0;
        while j < state.asteroids.len() {
            let a = &state.asteroids[j];
            if circles_overlap(spos, ENEMY_SHIP_ASTEROID_RADIUS, a.pos, a.radius) {
                destroy_asteroid(state, j);
                if state.enemy_ships[i].shield > 0 {
                    state.enemy_ships[i].shield -= 1;
                } else {
                    destroy_enemy_ship(state, i, ENEMY_SHIP_POINTS);
                    continue 'ships;
                }
                continue;
            }
            j += 1;
        }
        i += 1;
    }

    // Boss contact: damage plus a shove away from the hull
    if state.player.invuln_timer <= 0.0 {
        if let Some((boss_pos, boss_radius)) = boss_body(state) {
            if circles_overlap(state.player.pos, SHIP_RADIUS, boss_pos, boss_radius) {
                state.take_hit();
                let away = (state.player.pos - boss_pos).normalize_or_zero();
                state.player.vel = away * 200.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn;
    use crate::sim::state::{Bullet, GamePhase, PhaseBoss, SizeClass, band_color};

    fn state() -> GameState {
        let mut s = GameState::new(11, 800.0, 600.0);
        s.phase = GamePhase::Playing;
        s.player.pos = Vec2::new(400.0, 300.0);
        s
    }

    fn asteroid(pos: Vec2, vel: Vec2, size: SizeClass) -> Asteroid {
        Asteroid {
            pos,
            vel,
            size,
            radius: size.radius(),
            rotation: 0.0,
            rotation_speed: 0.0,
            band: 0,
            color: band_color(0),
        }
    }

    #[test]
    fn test_elastic_skips_separating_pair() {
        let mut a = asteroid(Vec2::new(0.0, 0.0), Vec2::new(-50.0, 0.0), SizeClass::Medium);
        let mut b = asteroid(Vec2::new(30.0, 0.0), Vec2::new(50.0, 0.0), SizeClass::Medium);
        assert!(!elastic_collision(&mut a, &mut b));
        assert_eq!(a.vel, Vec2::new(-50.0, 0.0));
    }

    #[test]
    fn test_elastic_conserves_momentum() {
        let mut a = asteroid(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), SizeClass::Medium);
        let mut b = asteroid(Vec2::new(30.0, 0.0), Vec2::new(-100.0, 0.0), SizeClass::Medium);
        let before = a.vel * (a.radius * a.radius) + b.vel * (b.radius * b.radius);
        assert!(elastic_collision(&mut a, &mut b));
        let after = a.vel * (a.radius * a.radius) + b.vel * (b.radius * b.radius);
        assert!((before - after).length() < 1e-2);
        // Equal masses head-on: velocities swap
        assert!(a.vel.x < 0.0);
        assert!(b.vel.x > 0.0);
    }

    #[test]
    fn test_elastic_separates_overlap() {
        let mut a = asteroid(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), SizeClass::Medium);
        let mut b = asteroid(Vec2::new(30.0, 0.0), Vec2::new(-10.0, 0.0), SizeClass::Medium);
        elastic_collision(&mut a, &mut b);
        let dist = a.pos.distance(b.pos);
        assert!(dist >= a.radius + b.radius);
    }

    #[test]
    fn test_large_splits_into_two_mediums() {
        let mut s = state();
        s.asteroids
            .spawn(asteroid(Vec2::new(100.0, 100.0), Vec2::ZERO, SizeClass::Large));
        destroy_asteroid(&mut s, 0);
        assert_eq!(s.asteroids.len(), 2);
        assert!(s.asteroids.iter().all(|a| a.size == SizeClass::Medium));
    }

    #[test]
    fn test_mega_splits_into_three_larges() {
        let mut s = state();
        s.asteroids
            .spawn(asteroid(Vec2::new(100.0, 100.0), Vec2::ZERO, SizeClass::Mega));
        destroy_asteroid(&mut s, 0);
        assert_eq!(s.asteroids.len(), 3);
        assert!(s.asteroids.iter().all(|a| a.size == SizeClass::Large));
    }

    #[test]
    fn test_small_does_not_split_and_scores() {
        let mut s = state();
        s.asteroids
            .spawn(asteroid(Vec2::new(100.0, 100.0), Vec2::ZERO, SizeClass::Small));
        destroy_asteroid(&mut s, 0);
        assert_eq!(s.asteroids.len(), 0);
        assert_eq!(s.score, 50);
        assert_eq!(s.consecutive_hits, 1);
    }

    #[test]
    fn test_bullet_consumed_on_shield_hit() {
        let mut s = state();
        spawn::spawn_enemy_ship_at(&mut s, ShipKind::Hunter, 0, 100.0, None, 0);
        let ship_pos = s.enemy_ships[0].pos;
        s.bullets.spawn(Bullet {
            pos: ship_pos,
            vel: Vec2::ZERO,
            heading: 0.0,
            lifetime: 1.0,
            owner: None,
        });

        resolve_collisions(&mut s);
        assert_eq!(s.bullets.len(), 0);
        assert_eq!(s.enemy_ships.len(), 1);
        assert_eq!(s.enemy_ships[0].shield, ShipKind::Hunter.shield_points() - 1);
    }

    #[test]
    fn test_first_hit_provokes_patrol() {
        let mut s = state();
        spawn::spawn_enemy_ship_at(&mut s, ShipKind::Patrol, 0, 100.0, None, 0);
        s.enemy_ships[0].fire_cooldown = 2.0;
        let ship_pos = s.enemy_ships[0].pos;
        s.bullets.spawn(Bullet {
            pos: ship_pos,
            vel: Vec2::ZERO,
            heading: 0.0,
            lifetime: 1.0,
            owner: None,
        });

        resolve_collisions(&mut s);
        assert_eq!(s.bullets.len(), 0);
        assert_eq!(s.enemy_ships[0].kind, ShipKind::Aggressive);
        assert_eq!(s.enemy_ships[0].shield, 3);
        assert_eq!(s.enemy_ships[0].fire_cooldown, 0.0);
    }

    #[test]
    fn test_friendly_fire_skips_owner() {
        let mut s = state();
        spawn::spawn_enemy_ship_at(&mut s, ShipKind::Hunter, 0, 100.0, None, 0);
        let ship = &s.enemy_ships[0];
        let (ship_id, ship_pos) = (ship.id, ship.pos);

        spawn::spawn_enemy_bullet(&mut s, ship_pos, Vec2::ZERO, Some(ship_id));
        resolve_collisions(&mut s);
        // Own bullet passes straight through
        assert_eq!(s.enemy_bullets.len(), 1);
        assert_eq!(s.enemy_ships[0].shield, ShipKind::Hunter.shield_points());

        spawn::spawn_enemy_bullet(&mut s, ship_pos, Vec2::ZERO, Some(ship_id + 999));
        resolve_collisions(&mut s);
        assert_eq!(s.enemy_ships[0].shield, ShipKind::Hunter.shield_points() - 1);
    }

    #[test]
    fn test_shielded_boss_hit_costs_shield_and_one_health() {
        let mut s = state();
        s.boss = Boss::Phase(PhaseBoss {
            pos: Vec2::new(400.0, 100.0),
            vel: Vec2::ZERO,
            health: 180,
            max_health: 180,
            shield: 30,
            max_shield: 30,
            shield_active: true,
            phase: crate::sim::state::BossPhase::Shielded,
            phase_timer: 0.0,
            fire_cooldown: 10.0,
            flash_timer: 0.0,
        });
        s.bullets.spawn(Bullet {
            pos: Vec2::new(400.0, 100.0),
            vel: Vec2::ZERO,
            heading: 0.0,
            lifetime: 1.0,
            owner: None,
        });
        s.player.pos = Vec2::ZERO; // out of contact range

        resolve_collisions(&mut s);
        if let Boss::Phase(b) = &s.boss {
            assert_eq!(b.shield, 29);
            assert_eq!(b.health, 179);
        } else {
            panic!("boss gone");
        }
    }

    #[test]
    fn test_unshielded_boss_hit_costs_two_health() {
        let mut s = state();
        s.boss = Boss::Phase(PhaseBoss {
            pos: Vec2::new(400.0, 100.0),
            vel: Vec2::ZERO,
            health: 180,
            max_health: 180,
            shield: 30,
            max_shield: 30,
            shield_active: false,
            phase: crate::sim::state::BossPhase::Normal,
            phase_timer: 0.0,
            fire_cooldown: 10.0,
            flash_timer: 0.0,
        });
        s.bullets.spawn(Bullet {
            pos: Vec2::new(400.0, 100.0),
            vel: Vec2::ZERO,
            heading: 0.0,
            lifetime: 1.0,
            owner: None,
        });
        s.player.pos = Vec2::ZERO;

        resolve_collisions(&mut s);
        if let Boss::Phase(b) = &s.boss {
            assert_eq!(b.health, 178);
            assert_eq!(b.shield, 30);
        } else {
            panic!("boss gone");
        }
    }

    #[test]
    fn test_boss_destruction_rewards_and_counts_down() {
        let mut s = state();
        s.player.pos = Vec2::ZERO;
        s.boss = Boss::Phase(PhaseBoss {
            pos: Vec2::new(400.0, 100.0),
            vel: Vec2::ZERO,
            health: 2,
            max_health: 180,
            shield: 0,
            max_shield: 30,
            shield_active: false,
            phase: crate::sim::state::BossPhase::Normal,
            phase_timer: 0.0,
            fire_cooldown: 10.0,
            flash_timer: 0.0,
        });
        s.bullets.spawn(Bullet {
            pos: Vec2::new(400.0, 100.0),
            vel: Vec2::ZERO,
            heading: 0.0,
            lifetime: 1.0,
            owner: None,
        });

        resolve_collisions(&mut s);
        assert!(!s.boss.is_active());
        assert_eq!(s.score, BOSS_POINTS);
        assert_eq!(s.multiplier, 2.0);
        assert_eq!(s.consecutive_hits, 10);
        assert_eq!(s.wave_complete_timer, WAVE_COMPLETE_DELAY);
    }

    #[test]
    fn test_queen_shield_depletes_before_health() {
        let mut s = state();
        s.player.pos = Vec2::ZERO;
        s.wave = 10;
        spawn::spawn_wave(&mut s);
        let queen_pos = match &s.boss {
            Boss::Queen(q) => q.pos,
            _ => panic!("expected queen"),
        };
        s.bullets.spawn(Bullet {
            pos: queen_pos,
            vel: Vec2::ZERO,
            heading: 0.0,
            lifetime: 1.0,
            owner: None,
        });

        resolve_collisions(&mut s);
        if let Boss::Queen(q) = &s.boss {
            assert_eq!(q.shield, 14);
            assert_eq!(q.health, 80);
        } else {
            panic!("queen gone");
        }
    }

    #[test]
    fn test_asteroid_contact_routes_defense_chain() {
        let mut s = state();
        s.player.energy = 90.0;
        s.asteroids
            .spawn(asteroid(s.player.pos, Vec2::ZERO, SizeClass::Small));

        resolve_collisions(&mut s);
        assert_eq!(s.asteroids.len(), 0);
        assert_eq!(s.player.energy, 10.0);
        assert_eq!(s.player.lives, START_LIVES);
    }

    #[test]
    fn test_two_rocks_in_one_frame_break_through_the_shield() {
        let mut s = state();
        spawn::spawn_enemy_ship_at(&mut s, ShipKind::Patrol, 0, 0.0, None, 0);
        s.enemy_ships[0].pos = Vec2::new(100.0, 100.0);
        s.enemy_ships[0].shield = 1;
        s.asteroids
            .spawn(asteroid(Vec2::new(85.0, 100.0), Vec2::ZERO, SizeClass::Small));
        s.asteroids
            .spawn(asteroid(Vec2::new(115.0, 100.0), Vec2::ZERO, SizeClass::Small));

        resolve_collisions(&mut s);
        // First rock soaks the last shield point, the second kills the ship
        assert!(s.asteroids.is_empty());
        assert!(s.enemy_ships.is_empty());
    }

    #[test]
    fn test_ship_asteroid_contact_uses_the_wide_circle() {
        let mut s = state();
        spawn::spawn_enemy_ship_at(&mut s, ShipKind::Aggressive, 0, 0.0, None, 0);
        s.enemy_ships[0].pos = Vec2::new(100.0, 100.0);
        s.enemy_ships[0].shield = 0;
        // Outside the hull radius but inside the impact circle
        s.asteroids
            .spawn(asteroid(Vec2::new(135.0, 100.0), Vec2::ZERO, SizeClass::Small));

        resolve_collisions(&mut s);
        assert!(s.enemy_ships.is_empty());
    }

    #[test]
    fn test_ram_enemy_ship_awards_points_and_hit() {
        let mut s = state();
        s.player.energy = 0.0;
        s.player.shield = 0.0;
        spawn::spawn_enemy_ship_at(&mut s, ShipKind::Patrol, 0, 0.0, None, 0);
        s.enemy_ships[0].pos = s.player.pos;

        resolve_collisions(&mut s);
        assert_eq!(s.enemy_ships.len(), 0);
        assert_eq!(s.score, RAM_SHIP_POINTS);
        assert_eq!(s.player.lives, START_LIVES - 1);
    }
}
