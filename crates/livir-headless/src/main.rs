use std::time::Duration;

use tracing_subscriber::EnvFilter;

use livir_core::input::{InputSignals, InputTracker};
use livir_core::simulation::Simulation;
use livir_platformer::LivirWorld;
use livir_platformer::config::SimConfig;
use livir_platformer::level::LevelId;

/// Command-line options. Anything malformed keeps its default.
struct Args {
    ticks: u64,
    seed: Option<u64>,
    level: Option<String>,
    config: Option<String>,
}

fn parse_args() -> Args {
    let mut args = Args {
        ticks: 1800,
        seed: None,
        level: None,
        config: None,
    };
    for arg in std::env::args().skip(1) {
        if let Some(v) = arg.strip_prefix("--ticks=") {
            args.ticks = v.parse().unwrap_or(args.ticks);
        } else if let Some(v) = arg.strip_prefix("--seed=") {
            args.seed = v.parse().ok();
        } else if let Some(v) = arg.strip_prefix("--level=") {
            args.level = Some(v.to_string());
        } else if let Some(v) = arg.strip_prefix("--config=") {
            args.config = Some(v.to_string());
        } else {
            tracing::warn!("Ignoring unknown argument {arg}");
        }
    }
    args
}

/// Built-in input script: walk left onto the first teleporter and press
/// down, then loop through patrol, attack and jump sections.
fn scripted_input(frame: u64) -> InputSignals {
    if frame < 30 {
        return InputSignals {
            left: true,
            ..Default::default()
        };
    }
    if frame == 30 {
        return InputSignals {
            down: true,
            ..Default::default()
        };
    }

    let cycle = (frame - 31) / 120;
    let step = (frame - 31) % 120;
    match step {
        0..60 => InputSignals {
            left: cycle % 2 == 0,
            right: cycle % 2 == 1,
            ..Default::default()
        },
        60..90 => InputSignals {
            attack: (step / 2) % 2 == 0,
            ..Default::default()
        },
        90..100 => InputSignals {
            up: true,
            ..Default::default()
        },
        _ => InputSignals::default(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = parse_args();

    let mut config = match &args.config {
        Some(path) => SimConfig::load_from(path),
        None => SimConfig::load(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let level = args
        .level
        .as_deref()
        .map(LevelId::from_name_or_default)
        .unwrap_or_default();

    let mut world = LivirWorld::with_level(config, level);
    let dt = Duration::from_secs_f32(1.0 / world.tick_rate());
    tracing::info!(
        ticks = args.ticks,
        seed = world.seed(),
        level = level.name(),
        "Livir headless run starting"
    );

    let mut tracker = InputTracker::new();
    for frame in 0..args.ticks {
        let input = tracker.next_frame(scripted_input(frame));
        for event in world.update(dt, &input) {
            tracing::info!(frame, ?event, "Event");
        }
    }

    match serde_json::to_string_pretty(&world.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to encode final snapshot: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_opens_with_walk_to_teleporter() {
        assert!(scripted_input(0).left);
        assert!(scripted_input(29).left);
        assert!(scripted_input(30).down);
        assert!(!scripted_input(31).down);
    }

    #[test]
    fn attack_section_releases_between_presses() {
        let mut tracker = InputTracker::new();
        let presses = (0..400)
            .map(|f| tracker.next_frame(scripted_input(f)))
            .filter(|i| i.attack_pressed)
            .count();
        assert!(presses > 10);
    }

    #[test]
    fn scripted_run_reaches_level_b() {
        let mut world = LivirWorld::new(SimConfig {
            seed: Some(7),
            ..SimConfig::default()
        });
        let mut tracker = InputTracker::new();
        for frame in 0..40 {
            let input = tracker.next_frame(scripted_input(frame));
            world.update(Duration::from_millis(16), &input);
        }
        assert_eq!(world.level().id, LevelId::B);
    }
}
