//! Scripted key input played against a session, one tick per expanded frame.

use glam::Vec2;
use rand::Rng;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::session::GameSession;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayScript {
    #[serde(default = "default_viewport")]
    pub viewport: [f32; 2],
    pub frames: Vec<ReplayFrame>,
}

/// Keys in `down` are pressed, then keys in `up` released, then the session
/// ticks `repeat` times. Key events only fire on the first repetition.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub down: Vec<String>,
    #[serde(default)]
    pub up: Vec<String>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub ticks: u64,
    pub score: u64,
    /// Tick numbers on which a point was scored.
    pub scoring_ticks: Vec<u64>,
    pub final_position: Vec2,
}

impl ReplayScript {
    pub fn viewport(&self) -> Vec2 {
        Vec2::from(self.viewport)
    }

    pub fn total_ticks(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.repeat.max(1))).sum()
    }

    pub fn run<R: Rng>(&self, session: &mut GameSession<R>) -> ReplayOutcome {
        let viewport = self.viewport();
        let mut scoring_ticks = Vec::new();

        for frame in &self.frames {
            for code in &frame.down {
                session.key_down(code);
            }
            for code in &frame.up {
                session.key_up(code);
            }
            for _ in 0..frame.repeat.max(1) {
                let report = session.tick(viewport);
                if report.scored {
                    scoring_ticks.push(report.tick);
                }
            }
        }

        ReplayOutcome {
            ticks: session.ticks(),
            score: session.score(),
            scoring_ticks,
            final_position: session.world().player.sprite.position,
        }
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplayScript, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    parse_replay(&raw).map_err(|e| format!("{e} ({})", path.display()))
}

pub fn parse_replay(raw: &str) -> Result<ReplayScript, String> {
    let replay: ReplayScript =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse replay JSON: {e}"))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplayScript) -> Result<(), String> {
    let [w, h] = replay.viewport;
    if !(w > 0.0 && h > 0.0) {
        return Err("Replay validation failed: viewport must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_viewport() -> [f32; 2] {
    [1280.0, 720.0]
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetCatalog;
    use crate::config::GameConfig;
    use crate::host::testing::Recorders;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "catch_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn catalog() -> AssetCatalog {
        let mut catalog = AssetCatalog::new();
        catalog.insert("player", 128, 128);
        catalog.insert("player_egg", 256, 256);
        catalog.insert("target", 512, 512);
        catalog.insert("target_egg", 128, 128);
        catalog.insert("background", 1280, 720);
        catalog
    }

    fn session(seed: u64, rec: &Recorders, viewport: Vec2) -> GameSession<StdRng> {
        GameSession::new(
            &GameConfig::default(),
            &catalog(),
            rec.collaborators(),
            viewport,
            StdRng::seed_from_u64(seed),
        )
        .expect("session builds")
    }

    const WANDER: &str = r#"{
      "viewport": [640, 480],
      "frames": [
        { "down": ["KeyD"], "repeat": 40 },
        { "down": ["KeyS"], "repeat": 30 },
        { "up": ["KeyD"], "down": ["ShiftLeft"], "repeat": 20 },
        { "down": ["ArrowLeft"], "up": ["KeyS"], "repeat": 60 },
        { "down": ["Space"], "up": ["ShiftLeft"], "repeat": 10 },
        { "up": ["ArrowLeft", "Space"], "down": ["KeyW"], "repeat": 80 }
      ]
    }"#;

    #[test]
    fn replay_file_parses() {
        let path = temp_file_path("parse");
        fs::write(&path, WANDER).expect("write replay file");
        let replay = load_replay_from_path(&path).expect("replay should load");
        assert_eq!(replay.viewport(), Vec2::new(640.0, 480.0));
        assert_eq!(replay.frames.len(), 6);
        assert_eq!(replay.total_ticks(), 240);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_defaults_viewport_and_repeat() {
        let replay = parse_replay(r#"{ "frames": [ { "down": ["KeyA"] } ] }"#)
            .expect("replay should parse");
        assert_eq!(replay.viewport(), Vec2::new(1280.0, 720.0));
        assert_eq!(replay.frames[0].repeat, 1);
    }

    #[test]
    fn replay_rejects_empty_frames_and_bad_viewport() {
        let err = parse_replay(r#"{ "frames": [] }"#).expect_err("empty frames should fail");
        assert!(err.contains("frames list is empty"));
        let err = parse_replay(r#"{ "viewport": [0, 100], "frames": [ {} ] }"#)
            .expect_err("zero viewport should fail");
        assert!(err.contains("viewport must be > 0"));
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = parse_replay(WANDER).expect("replay should parse");
        let viewport = replay.viewport();

        let rec_a = Recorders::default();
        let rec_b = Recorders::default();
        let mut run_a = session(9, &rec_a, viewport);
        let mut run_b = session(9, &rec_b, viewport);

        let a = replay.run(&mut run_a);
        let b = replay.run(&mut run_b);
        assert_eq!(a, b);
        assert_eq!(a.ticks, replay.total_ticks());
        assert_eq!(run_a.world().target.sprite.position, run_b.world().target.sprite.position);
        assert_eq!(rec_a.score_text.count(), rec_b.score_text.count());
    }

    #[test]
    fn replay_walks_player_onto_target_and_scores() {
        // Target pinned next to the player's start; holding D walks into it.
        let replay = parse_replay(
            r#"{ "viewport": [640, 480], "frames": [ { "down": ["KeyD"], "repeat": 30 } ] }"#,
        )
        .expect("replay should parse");
        let rec = Recorders::default();
        let mut s = session(3, &rec, replay.viewport());
        s.world_mut().target.sprite.position = Vec2::new(400.0, 240.0);

        let outcome = replay.run(&mut s);
        assert!(outcome.score >= 1);
        assert!(!outcome.scoring_ticks.is_empty());
        assert_eq!(rec.score.0.borrow().plays as u64, outcome.score);
        assert_eq!(
            rec.score_text.last(),
            Some(format!("Score: {}", outcome.score))
        );
    }

    #[test]
    fn replay_releasing_keys_stops_the_player() {
        let replay = parse_replay(
            r#"{
              "viewport": [640, 480],
              "frames": [
                { "down": ["ArrowUp"], "repeat": 10 },
                { "up": ["ArrowUp"], "repeat": 10 }
              ]
            }"#,
        )
        .expect("replay should parse");
        let rec = Recorders::default();
        let mut s = session(5, &rec, replay.viewport());
        s.world_mut().target.sprite.position = Vec2::ZERO;

        let outcome = replay.run(&mut s);
        assert_eq!(outcome.final_position, Vec2::new(320.0, 190.0));
        assert_eq!(s.world().player.motion.velocity, Vec2::ZERO);
    }
}
