//! Proxy mode definitions and the process-wide mode controller.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Proxy mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Forward to the real target and persist the exchange
    #[default]
    Record,
    /// Answer from persisted exchanges, never touch the network
    Playback,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Record => "record",
            Mode::Playback => "playback",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for anything other than `record` or `playback`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid mode '{0}': expected 'record' or 'playback'")]
pub struct InvalidMode(pub String);

impl FromStr for Mode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "record" => Ok(Mode::Record),
            "playback" => Ok(Mode::Playback),
            other => Err(InvalidMode(other.to_string())),
        }
    }
}

/// Holds the current mode behind a reader/writer lock.
///
/// The proxy handler reads it on every request while the admin API may
/// switch it at any time.
#[derive(Debug, Default)]
pub struct ModeController {
    mode: RwLock<Mode>,
}

impl ModeController {
    pub fn new(initial: Mode) -> Self {
        Self {
            mode: RwLock::new(initial),
        }
    }

    pub fn get(&self) -> Mode {
        *self.mode.read()
    }

    /// Switch mode. Returns the previous mode.
    pub fn set(&self, mode: Mode) -> Mode {
        let mut current = self.mode.write();
        std::mem::replace(&mut *current, mode)
    }

    /// Parse and switch. Invalid input leaves the mode untouched.
    pub fn set_from_str(&self, value: &str) -> Result<Mode, InvalidMode> {
        let mode = value.parse::<Mode>()?;
        self.set(mode);
        Ok(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_mode_default_is_record() {
        assert_eq!(Mode::default(), Mode::Record);
        assert_eq!(ModeController::default().get(), Mode::Record);
    }

    #[test]
    fn test_parse_valid_modes() {
        assert_eq!("record".parse::<Mode>().unwrap(), Mode::Record);
        assert_eq!("playback".parse::<Mode>().unwrap(), Mode::Playback);
    }

    #[test]
    fn test_parse_is_exact() {
        for bad in ["", "Record", "PLAYBACK", "replay", " record", "proxy"] {
            let err = bad.parse::<Mode>().unwrap_err();
            assert_eq!(err, InvalidMode(bad.to_string()));
        }
    }

    #[test]
    fn test_set_returns_previous() {
        let controller = ModeController::new(Mode::Record);
        assert_eq!(controller.set(Mode::Playback), Mode::Record);
        assert_eq!(controller.get(), Mode::Playback);
        assert_eq!(controller.set(Mode::Record), Mode::Playback);
    }

    #[test]
    fn test_self_transition_is_noop() {
        let controller = ModeController::new(Mode::Playback);
        assert_eq!(controller.set_from_str("playback").unwrap(), Mode::Playback);
        assert_eq!(controller.get(), Mode::Playback);
    }

    #[test]
    fn test_invalid_value_leaves_state() {
        let controller = ModeController::new(Mode::Playback);
        let err = controller.set_from_str("bogus").unwrap_err();
        assert!(err.to_string().contains("bogus"));
        assert_eq!(controller.get(), Mode::Playback);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Playback).unwrap(), "\"playback\"");
        let mode: Mode = serde_yaml::from_str("record").unwrap();
        assert_eq!(mode, Mode::Record);
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let controller = Arc::new(ModeController::new(Mode::Record));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let controller = Arc::clone(&controller);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        if i % 2 == 0 {
                            controller.set(Mode::Playback);
                            controller.set(Mode::Record);
                        } else {
                            let mode = controller.get();
                            assert!(matches!(mode, Mode::Record | Mode::Playback));
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
