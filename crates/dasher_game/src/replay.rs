use crate::world::GameInput;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub jump_pressed: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<GameInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(GameInput {
                    jump_pressed: frame.jump_pressed,
                });
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::TextureSizes;
    use crate::config::GameConfig;
    use crate::outcome::Outcome;
    use crate::world::World;
    use std::time::{SystemTime, UNIX_EPOCH};

    // Jumps at steps 55, 145 and 235 clear each obstacle with margin to spare.
    const WINNING_RUN: &str = r#"{
      "frames": [
        { "repeat": 55 },
        { "jump_pressed": true },
        { "repeat": 89 },
        { "jump_pressed": true },
        { "repeat": 89 },
        { "jump_pressed": true },
        { "repeat": 64 }
      ]
    }"#;

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "dasher_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn load(name_hint: &str, json: &str) -> ReplaySequence {
        let path = temp_file_path(name_hint);
        fs::write(&path, json).expect("write replay file");
        let replay = load_replay_from_path(&path).expect("replay should load");
        let _ = fs::remove_file(path);
        replay
    }

    fn play(replay: &ReplaySequence) -> (World, Vec<Outcome>) {
        let mut world = World::new(GameConfig::default(), &TextureSizes::default());
        let mut outcomes = Vec::new();
        for input in replay.expanded_inputs() {
            world = world.update(input, replay.fixed_dt);
            outcomes.push(Outcome::of(&world));
        }
        (world, outcomes)
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let replay = load(
            "parse",
            r#"{
              "fixed_dt": 0.02,
              "frames": [
                { "repeat": 3 },
                { "jump_pressed": true, "repeat": 1 }
              ]
            }"#,
        );
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 4);
        assert!(!expanded[0].jump_pressed);
        assert!(expanded[3].jump_pressed);
        assert_eq!(replay.fixed_dt, 0.02);
    }

    #[test]
    fn empty_replay_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn timed_jumps_reach_the_finish() {
        let replay = load("win", WINNING_RUN);
        assert_eq!(replay.expanded_inputs().len(), 300);

        let (world, outcomes) = play(&replay);
        assert!(!world.collided);
        assert_eq!(Outcome::of(&world), Outcome::Won);
        assert_eq!(outcomes[269], Outcome::Running);
        assert!(outcomes.iter().all(|o| *o != Outcome::GameOver));
    }

    #[test]
    fn no_input_ends_in_game_over() {
        let replay = load("idle", r#"{ "frames": [ { "repeat": 150 } ] }"#);
        let (world, outcomes) = play(&replay);
        assert!(world.collided);
        assert_eq!(Outcome::of(&world), Outcome::GameOver);
        assert!(outcomes.iter().all(|o| *o != Outcome::Won));
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = load("deterministic", WINNING_RUN);
        let (run_a, _) = play(&replay);
        let (run_b, _) = play(&replay);
        assert_eq!(run_a, run_b);
    }
}
