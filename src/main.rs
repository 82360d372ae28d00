//! Comet Storm entry point
//!
//! Headless demo runner: plays a scripted run at the fixed timestep and
//! reports the result. A graphical frontend drives the same `tick` API
//! from its frame loop instead.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use comet_storm::consts::*;
use comet_storm::audio::AudioManager;
use comet_storm::sim::{GamePhase, GameState, TickInput, tick};
use comet_storm::{HighScores, Settings};

const SETTINGS_FILE: &str = "comet_storm_settings.json";
const HIGHSCORES_FILE: &str = "comet_storm_highscores.json";

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Scripted pilot for the demo run: sweep and fire, boost in bursts,
/// omni-blast periodically. Deterministic in the frame counter.
fn demo_input(frame: u64) -> TickInput {
    TickInput {
        turn_left: frame % 240 < 90,
        turn_right: frame % 240 >= 150,
        thrust_forward: frame % 120 < 70,
        fire: true,
        omni_fire: frame % 600 == 599,
        boost: frame % 300 < 40,
        ..Default::default()
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or_else(unix_now);
    let demo_seconds: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(60);

    let settings = Settings::load(Path::new(SETTINGS_FILE));
    let mut highscores = HighScores::load(Path::new(HIGHSCORES_FILE));

    let mut audio = AudioManager::new();
    audio.set_master_volume(settings.master_volume);
    audio.set_sfx_volume(settings.sfx_volume);
    audio.set_muted(settings.muted);

    let mut state = GameState::new(seed, SCREEN_WIDTH, SCREEN_HEIGHT);
    settings.apply(&mut state);
    log::info!("comet storm, seed {}, {}s demo", seed, demo_seconds);

    // First frame leaves attract mode
    tick(&mut state, &TickInput::default(), SIM_DT);
    let start = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut state, &start, SIM_DT);

    let frames = demo_seconds * 60;
    for frame in 0..frames {
        tick(&mut state, &demo_input(frame), SIM_DT);
        for event in state.drain_events() {
            audio.handle_event(event);
        }
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "run over: score {} wave {} lives {}",
        state.score, state.wave, state.player.lives
    );

    if let Some(rank) = highscores.add_score(state.score, state.wave, unix_now()) {
        println!("high score! rank {}", rank);
        highscores.save(Path::new(HIGHSCORES_FILE));
    }
    settings.save(Path::new(SETTINGS_FILE));
}
