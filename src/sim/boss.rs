//! Boss behaviors
//!
//! Two variants share the `Boss` slot: the phase boss (waves ending in 5)
//! cycles Normal/Shielded/Enraged on a fixed timer, the Spawn Queen (every
//! 10th wave) escalates by remaining health. Both are taken out of the
//! state for the frame so their updates can spawn entities freely, then
//! put back unless they despawned.

use glam::Vec2;
use rand::Rng;

use super::spawn::{spawn_asteroid_at, spawn_enemy_bullet, spawn_enemy_ship_at};
use super::state::{
    Boss, BossPhase, Formation, GameEvent, GameState, PhaseBoss, QueenBoss, QueenPhase, ShipKind,
    SizeClass,
};
use crate::consts::*;

/// Chance per frame that the phase boss hurls a corner asteroid
const HURL_CHANCE: f32 = 0.015;
/// Chance per frame of a sentinel-pair summon (higher when enraged)
const SUMMON_CHANCE: f32 = 0.005;
const SUMMON_CHANCE_ENRAGED: f32 = 0.012;

const QUEEN_SWAY_AMPLITUDE: f32 = 150.0;
const QUEEN_SWAY_RATE: f32 = 0.4;
const QUEEN_BULLET_SPEED: f32 = 200.0;
const QUEEN_RING_SPEED: f32 = 250.0;
const QUEEN_RING_COUNT: usize = 16;

pub fn update_boss(state: &mut GameState, dt: f32) {
    match std::mem::take(&mut state.boss) {
        Boss::None => {}
        Boss::Phase(boss) => update_phase_boss(state, boss, dt),
        Boss::Queen(queen) => update_queen(state, queen, dt),
    }
}

/// Bullet velocities for a volley of `count` shots fanned evenly across
/// `spread` radians, centered on the target direction
fn aimed_volley(from: Vec2, target: Vec2, count: usize, spread: f32) -> Vec<Vec2> {
    let base = {
        let d = target - from;
        d.y.atan2(d.x)
    };
    (0..count)
        .map(|i| {
            let offset = if count > 1 {
                spread * (i as f32 / (count - 1) as f32 - 0.5)
            } else {
                0.0
            };
            let angle = base + offset;
            Vec2::new(angle.cos(), angle.sin())
        })
        .collect()
}

fn update_phase_boss(state: &mut GameState, mut boss: PhaseBoss, dt: f32) {
    let (w, h) = (state.bounds.x, state.bounds.y);

    boss.phase_timer += dt;
    if boss.phase_timer >= BOSS_PHASE_DURATION {
        boss.phase_timer = 0.0;
        boss.phase = boss.phase.next();
        boss.shield_active = boss.phase == BossPhase::Shielded;
        if boss.shield_active {
            boss.shield = boss.max_shield;
        }
        log::debug!("boss phase -> {:?}", boss.phase);
    }
    if boss.phase == BossPhase::Shielded {
        boss.shield = (boss.shield + 1).min(boss.max_shield);
    }

    // Descend to the hold line, then patrol horizontally between margins.
    // Snap only on the crossing; a boss already below the line keeps moving
    // so it can leave the field.
    let prev_y = boss.pos.y;
    boss.pos += boss.vel * dt;
    if boss.vel.y > 0.0 && prev_y <= BOSS_HOLD_Y && boss.pos.y >= BOSS_HOLD_Y {
        boss.pos.y = BOSS_HOLD_Y;
        boss.vel.y = 0.0;
    }
    if boss.pos.x < BOSS_SIDE_MARGIN {
        boss.pos.x = BOSS_SIDE_MARGIN;
        boss.vel.x = boss.vel.x.abs();
    } else if boss.pos.x > w - BOSS_SIDE_MARGIN {
        boss.pos.x = w - BOSS_SIDE_MARGIN;
        boss.vel.x = -boss.vel.x.abs();
    }
    if boss.pos.y > h + 100.0 {
        log::info!("phase boss left the field");
        return;
    }

    boss.flash_timer = (boss.flash_timer - dt).max(0.0);

    boss.fire_cooldown -= dt;
    if boss.fire_cooldown <= 0.0 {
        boss.fire_cooldown = boss.phase.fire_cadence();
        let (count, spread, rounds) = match boss.phase {
            BossPhase::Enraged => (3, 45f32.to_radians(), 2),
            _ => (2, 30f32.to_radians(), 1),
        };
        for _ in 0..rounds {
            for dir in aimed_volley(boss.pos, state.player.pos, count, spread) {
                spawn_enemy_bullet(state, boss.pos, dir * BOSS_BULLET_SPEED, None);
            }
        }
        state.push_event(GameEvent::AlienFire);
    }

    if state.rng.random_range(0.0..1.0) < HURL_CHANCE {
        hurl_corner_asteroid(state);
    }

    let summon_chance = if boss.phase == BossPhase::Enraged {
        SUMMON_CHANCE_ENRAGED
    } else {
        SUMMON_CHANCE
    };
    if state.rng.random_range(0.0..1.0) < summon_chance {
        summon_sentinel_pair(state);
    }

    state.boss = Boss::Phase(boss);
}

/// Fling an asteroid from a random screen corner at the player, with a
/// little angular noise so volleys do not stack
fn hurl_corner_asteroid(state: &mut GameState) {
    let (w, h) = (state.bounds.x, state.bounds.y);
    let corner = match state.rng.random_range(0..4u32) {
        0 => Vec2::new(0.0, 0.0),
        1 => Vec2::new(w, 0.0),
        2 => Vec2::new(0.0, h),
        _ => Vec2::new(w, h),
    };

    let to_player = state.player.pos - corner;
    let noise = state.rng.random_range(-30f32.to_radians()..30f32.to_radians());
    let angle = to_player.y.atan2(to_player.x) + noise;
    let speed = state.rng.random_range(80.0..140.0);

    let size = match state.rng.random_range(0..100u32) {
        0..40 => SizeClass::Large,
        40..75 => SizeClass::Medium,
        _ => SizeClass::Small,
    };
    let band = state.rng.random_range(0..3u32) as u8;
    spawn_asteroid_at(
        state,
        corner,
        Vec2::new(angle.cos(), angle.sin()) * speed,
        size,
        band,
    );
}

fn summon_sentinel_pair(state: &mut GameState) {
    let speed = state.rng.random_range(100.0..160.0);
    let formation = Formation {
        id: state.wave * 100 + state.rng.random_range(0..100u32),
        size: 2,
    };
    let edge = state.rng.random_range(0..8u32);
    for member in 0..2u32 {
        spawn_enemy_ship_at(
            state,
            ShipKind::Sentinel,
            (edge + member) % 8,
            speed,
            Some(formation),
            member as usize,
        );
    }
}

fn queen_phase(queen: &QueenBoss) -> QueenPhase {
    let fraction = queen.health as f32 / queen.max_health.max(1) as f32;
    if fraction > 0.75 {
        QueenPhase::Recruitment
    } else if fraction > 0.4 {
        QueenPhase::Aggression
    } else {
        QueenPhase::Desperation
    }
}

fn update_queen(state: &mut GameState, mut queen: QueenBoss, dt: f32) {
    let w = state.bounds.x;

    queen.phase = queen_phase(&queen);
    queen.movement_timer += dt;
    queen.pos.x = (w / 2.0 + (queen.movement_timer * QUEEN_SWAY_RATE).sin() * QUEEN_SWAY_AMPLITUDE)
        .clamp(BOSS_SIDE_MARGIN, w - BOSS_SIDE_MARGIN);
    queen.flash_timer = (queen.flash_timer - dt).max(0.0);

    queen.spawn_timer -= dt;
    if queen.spawn_timer <= 0.0 {
        queen.spawn_timer = queen.phase.spawn_cooldown();
        recruit(state);
    }

    queen.attack_timer -= dt;
    if queen.attack_timer <= 0.0 {
        queen.attack_timer = queen.phase.attack_cooldown();
        queen_attack(state, &queen);
    }

    state.boss = Boss::Queen(queen);
}

/// One recruitment volley: a mixed escort detachment plus a salvo of
/// heavy asteroids aimed at the player. Both are clipped by pool
/// capacity; overflow drops silently.
fn recruit(state: &mut GameState) {
    let pair = Formation {
        id: state.wave * 100 + state.rng.random_range(0..100u32),
        size: 2,
    };
    for i in 0..10u32 {
        let speed = state.rng.random_range(90.0..140.0);
        let edge = i % 8;
        match i {
            0..6 => spawn_enemy_ship_at(state, ShipKind::Aggressive, edge, speed, None, 0),
            6..8 => spawn_enemy_ship_at(state, ShipKind::Hunter, edge, speed, None, 0),
            _ => spawn_enemy_ship_at(
                state,
                ShipKind::Sentinel,
                edge,
                speed,
                Some(pair),
                (i - 8) as usize,
            ),
        }
    }

    let (w, h) = (state.bounds.x, state.bounds.y);
    let player_pos = state.player.pos;
    let count = state.rng.random_range(4..7u32);
    for _ in 0..count {
        let corner = match state.rng.random_range(0..4u32) {
            0 => Vec2::new(0.0, 0.0),
            1 => Vec2::new(w, 0.0),
            2 => Vec2::new(0.0, h),
            _ => Vec2::new(w, h),
        };
        let speed = state.rng.random_range(150.0..250.0);
        let vel = (player_pos - corner).normalize_or_zero() * speed;
        let size = if state.rng.random_range(0..100u32) < 70 {
            SizeClass::Mega
        } else {
            SizeClass::Large
        };
        let band = state.rng.random_range(0..3u32) as u8;
        spawn_asteroid_at(state, corner, vel, size, band);
    }
    log::debug!("queen recruitment: {} asteroids", count);
}

fn queen_attack(state: &mut GameState, queen: &QueenBoss) {
    match queen.phase {
        QueenPhase::Recruitment => {
            let dir = (state.player.pos - queen.pos).normalize_or_zero();
            spawn_enemy_bullet(state, queen.pos, dir * QUEEN_BULLET_SPEED, None);
        }
        QueenPhase::Aggression => {
            for dir in aimed_volley(queen.pos, state.player.pos, 3, 45f32.to_radians()) {
                spawn_enemy_bullet(state, queen.pos, dir * QUEEN_BULLET_SPEED, None);
            }
        }
        QueenPhase::Desperation => {
            for i in 0..QUEEN_RING_COUNT {
                let angle = std::f32::consts::TAU * i as f32 / QUEEN_RING_COUNT as f32;
                let dir = Vec2::new(angle.cos(), angle.sin());
                spawn_enemy_bullet(state, queen.pos, dir * QUEEN_RING_SPEED, None);
            }
        }
    }
    state.push_event(GameEvent::AlienFire);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::spawn_wave;
    use crate::sim::state::GamePhase;

    const DT: f32 = 1.0 / 60.0;

    fn boss_state() -> GameState {
        let mut s = GameState::new(5, 800.0, 600.0);
        s.phase = GamePhase::Playing;
        s.wave = 5;
        spawn_wave(&mut s);
        s.asteroids.clear();
        s
    }

    fn queen_state() -> GameState {
        let mut s = GameState::new(5, 800.0, 600.0);
        s.phase = GamePhase::Playing;
        s.wave = 10;
        spawn_wave(&mut s);
        s
    }

    fn phase_boss(s: &GameState) -> &PhaseBoss {
        match &s.boss {
            Boss::Phase(b) => b,
            _ => panic!("expected phase boss"),
        }
    }

    fn queen(s: &GameState) -> &QueenBoss {
        match &s.boss {
            Boss::Queen(q) => q,
            _ => panic!("expected queen"),
        }
    }

    #[test]
    fn test_phase_cycles_and_shield_restores() {
        let mut s = boss_state();
        if let Boss::Phase(b) = &mut s.boss {
            b.shield = 0;
            b.fire_cooldown = 1000.0;
        }

        for _ in 0..301 {
            update_boss(&mut s, DT);
        }
        let b = phase_boss(&s);
        assert_eq!(b.phase, BossPhase::Shielded);
        assert!(b.shield_active);
        assert_eq!(b.shield, b.max_shield);

        for _ in 0..301 {
            update_boss(&mut s, DT);
        }
        let b = phase_boss(&s);
        assert_eq!(b.phase, BossPhase::Enraged);
        assert!(!b.shield_active);
    }

    #[test]
    fn test_boss_descends_then_holds() {
        let mut s = boss_state();
        if let Boss::Phase(b) = &mut s.boss {
            b.fire_cooldown = 1000.0;
        }
        for _ in 0..240 {
            update_boss(&mut s, DT);
        }
        let b = phase_boss(&s);
        assert_eq!(b.pos.y, BOSS_HOLD_Y);
        assert_eq!(b.vel.y, 0.0);
    }

    #[test]
    fn test_boss_bounces_off_side_margins() {
        let mut s = boss_state();
        if let Boss::Phase(b) = &mut s.boss {
            b.pos = Vec2::new(BOSS_SIDE_MARGIN + 1.0, BOSS_HOLD_Y);
            b.vel = Vec2::new(-70.0, 0.0);
            b.fire_cooldown = 1000.0;
        }
        for _ in 0..10 {
            update_boss(&mut s, DT);
        }
        let b = phase_boss(&s);
        assert!(b.vel.x > 0.0);
        assert!(b.pos.x >= BOSS_SIDE_MARGIN);
    }

    #[test]
    fn test_boss_below_hold_line_keeps_falling() {
        let mut s = boss_state();
        if let Boss::Phase(b) = &mut s.boss {
            b.pos = Vec2::new(400.0, 300.0);
            b.vel = Vec2::new(0.0, 100.0);
            b.fire_cooldown = 1000.0;
        }
        update_boss(&mut s, DT);
        let b = phase_boss(&s);
        assert!(b.pos.y > 300.0);
        assert_eq!(b.vel.y, 100.0);
    }

    #[test]
    fn test_boss_despawns_below_screen_without_reward() {
        let mut s = boss_state();
        if let Boss::Phase(b) = &mut s.boss {
            b.pos = Vec2::new(400.0, 750.0);
            b.vel = Vec2::new(0.0, 100.0);
        }
        update_boss(&mut s, DT);
        assert!(!s.boss.is_active());
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_normal_volley_is_two_bullets() {
        let mut s = boss_state();
        if let Boss::Phase(b) = &mut s.boss {
            b.fire_cooldown = 0.0;
            b.phase = BossPhase::Normal;
        }
        update_boss(&mut s, DT);
        assert_eq!(s.enemy_bullets.len(), 2);
        assert!(phase_boss(&s).fire_cooldown > 0.0);
    }

    #[test]
    fn test_enraged_volley_fires_twice() {
        let mut s = boss_state();
        if let Boss::Phase(b) = &mut s.boss {
            b.fire_cooldown = 0.0;
            b.phase = BossPhase::Enraged;
        }
        update_boss(&mut s, DT);
        assert_eq!(s.enemy_bullets.len(), 6);
    }

    #[test]
    fn test_volley_aims_at_player() {
        let mut s = boss_state();
        s.player.pos = Vec2::new(400.0, 500.0);
        if let Boss::Phase(b) = &mut s.boss {
            b.pos = Vec2::new(400.0, 100.0);
            b.fire_cooldown = 0.0;
            b.phase = BossPhase::Normal;
        }
        update_boss(&mut s, DT);
        for b in s.enemy_bullets.iter() {
            assert!(b.vel.y > 0.0);
            assert!((b.vel.length() - BOSS_BULLET_SPEED).abs() < 1.0);
        }
    }

    #[test]
    fn test_queen_phase_follows_health() {
        let mut s = queen_state();
        assert_eq!(queen(&s).phase, QueenPhase::Recruitment);

        if let Boss::Queen(q) = &mut s.boss {
            q.health = (q.max_health as f32 * 0.5) as i32;
            q.spawn_timer = 1000.0;
            q.attack_timer = 1000.0;
        }
        update_boss(&mut s, DT);
        assert_eq!(queen(&s).phase, QueenPhase::Aggression);

        if let Boss::Queen(q) = &mut s.boss {
            q.health = (q.max_health as f32 * 0.2) as i32;
        }
        update_boss(&mut s, DT);
        assert_eq!(queen(&s).phase, QueenPhase::Desperation);
    }

    #[test]
    fn test_queen_sway_respects_margins() {
        let mut s = queen_state();
        if let Boss::Queen(q) = &mut s.boss {
            q.spawn_timer = 1000.0;
            q.attack_timer = 1000.0;
        }
        s.resize(300.0, 600.0);
        for _ in 0..1200 {
            update_boss(&mut s, DT);
            let q = queen(&s);
            assert!(q.pos.x >= BOSS_SIDE_MARGIN);
            assert!(q.pos.x <= 300.0 - BOSS_SIDE_MARGIN);
        }
    }

    #[test]
    fn test_recruitment_spawns_ships_and_asteroids() {
        let mut s = queen_state();
        if let Boss::Queen(q) = &mut s.boss {
            q.spawn_timer = 0.0;
            q.attack_timer = 1000.0;
        }
        update_boss(&mut s, DT);
        // The 10-ship detachment is clipped by the pool
        assert_eq!(s.enemy_ships.len(), s.enemy_ships.capacity());
        let n = s.asteroids.len();
        assert!((4..=6).contains(&n));
        assert!(queen(&s).spawn_timer > 0.0);
    }

    #[test]
    fn test_desperation_attack_is_a_ring() {
        let mut s = queen_state();
        if let Boss::Queen(q) = &mut s.boss {
            q.health = 1;
            q.spawn_timer = 1000.0;
            q.attack_timer = 0.0;
        }
        update_boss(&mut s, DT);
        assert_eq!(s.enemy_bullets.len(), QUEEN_RING_COUNT);
        for b in s.enemy_bullets.iter() {
            assert!((b.vel.length() - QUEEN_RING_SPEED).abs() < 1.0);
        }
    }

    #[test]
    fn test_recruitment_attack_is_single_aimed_bullet() {
        let mut s = queen_state();
        s.player.pos = Vec2::new(400.0, 500.0);
        if let Boss::Queen(q) = &mut s.boss {
            q.spawn_timer = 1000.0;
            q.attack_timer = 0.0;
        }
        update_boss(&mut s, DT);
        assert_eq!(s.enemy_bullets.len(), 1);
        assert!(s.enemy_bullets[0].vel.y > 0.0);
    }
}
