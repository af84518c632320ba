use std::env;
use std::path::PathBuf;

pub const DEFAULT_TRACK_DIR: &str = "tracks";
pub const DEFAULT_MOVE_DIR: &str = "moves";
pub const DEFAULT_FOLLOWER_DIR: &str = "follower";
pub const DEFAULT_MAX_TURNS: usize = 10_000;

/// Directories and limits shared by every subcommand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RacetrackConfig {
    pub track_dir: PathBuf,
    pub move_dir: PathBuf,
    pub follower_dir: PathBuf,
    pub max_turns: usize,
}

impl Default for RacetrackConfig {
    fn default() -> Self {
        Self {
            track_dir: PathBuf::from(DEFAULT_TRACK_DIR),
            move_dir: PathBuf::from(DEFAULT_MOVE_DIR),
            follower_dir: PathBuf::from(DEFAULT_FOLLOWER_DIR),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl RacetrackConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            track_dir: read_dir(&lookup, "RACETRACK_TRACK_DIR", DEFAULT_TRACK_DIR),
            move_dir: read_dir(&lookup, "RACETRACK_MOVE_DIR", DEFAULT_MOVE_DIR),
            follower_dir: read_dir(&lookup, "RACETRACK_FOLLOWER_DIR", DEFAULT_FOLLOWER_DIR),
            max_turns: read_usize(&lookup, "RACETRACK_MAX_TURNS", DEFAULT_MAX_TURNS),
        }
    }
}

fn read_dir(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> PathBuf {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn read_usize(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: usize) -> usize {
    let Some(raw) = lookup(name) else {
        return default;
    };
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => value,
        _ => {
            tracing::warn!("{name}={raw:?} is not a positive integer. Falling back to {default}.");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = RacetrackConfig::from_lookup(|_| None);
        assert_eq!(config, RacetrackConfig::default());
        assert_eq!(config.max_turns, 10_000);
        assert_eq!(config.track_dir, PathBuf::from("tracks"));
    }

    #[test]
    fn reads_every_variable() {
        let config = RacetrackConfig::from_lookup(lookup_from(&[
            ("RACETRACK_TRACK_DIR", "/data/tracks"),
            ("RACETRACK_MOVE_DIR", "recorded"),
            ("RACETRACK_FOLLOWER_DIR", " paths "),
            ("RACETRACK_MAX_TURNS", "250"),
        ]));
        assert_eq!(config.track_dir, PathBuf::from("/data/tracks"));
        assert_eq!(config.move_dir, PathBuf::from("recorded"));
        assert_eq!(config.follower_dir, PathBuf::from("paths"));
        assert_eq!(config.max_turns, 250);
    }

    #[test]
    fn invalid_turn_limits_fall_back() {
        for raw in ["0", "-3", "lots", ""] {
            let config =
                RacetrackConfig::from_lookup(lookup_from(&[("RACETRACK_MAX_TURNS", raw)]));
            assert_eq!(config.max_turns, DEFAULT_MAX_TURNS, "value {raw:?}");
        }
    }

    #[test]
    fn blank_directories_fall_back() {
        let config = RacetrackConfig::from_lookup(lookup_from(&[("RACETRACK_MOVE_DIR", "  ")]));
        assert_eq!(config.move_dir, PathBuf::from(DEFAULT_MOVE_DIR));
    }
}
