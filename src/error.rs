//! Error types for loading configuration

use std::fmt;
use std::io;

/// Failure to load or parse [`Settings`](crate::Settings).
///
/// The simulation and timeline never fail; invalid operations there are
/// no-ops. Only the configuration layer touches the outside world.
#[derive(Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    Io(io::Error),
    /// The settings file is not valid JSON for [`Settings`](crate::Settings).
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse(e) => write!(f, "invalid settings: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for SettingsError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
