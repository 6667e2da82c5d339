//! Load session state

use std::fmt;

use super::fetch::Ticket;
use super::format::GeometryFormat;

/// Phase of a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadPhase {
    /// Nothing started, or the format is not handled
    #[default]
    Idle,
    /// Fetching the material library
    Materials,
    /// Fetching and decoding geometry
    Geometry,
    /// Geometry attached to the scene
    Done,
    /// Geometry retries exhausted
    Failed,
}

impl LoadPhase {
    /// Whether no further transitions happen
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "IDLE",
            Self::Materials => "MATERIALS",
            Self::Geometry => "GEOMETRY",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Everything known about the current load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSession {
    /// Geometry URL the load was started with
    pub url_file: String,
    /// Derived material library URL, for formats that have one
    pub material_url: Option<String>,
    /// Geometry format
    pub format: GeometryFormat,
    /// Current phase
    pub phase: LoadPhase,
    /// Label describing what is loading right now
    pub detail_label: &'static str,
    /// Whether materials were resolved for the geometry
    pub materials_loaded: bool,
    /// Geometry fetch attempts so far
    pub geometry_attempts: u32,
    pub(crate) pending: Option<Ticket>,
}

impl LoadSession {
    pub(crate) fn new(url_file: impl Into<String>, format: GeometryFormat) -> Self {
        Self {
            url_file: url_file.into(),
            material_url: None,
            format,
            phase: LoadPhase::Idle,
            detail_label: "",
            materials_loaded: false,
            geometry_attempts: 0,
            pending: None,
        }
    }

    /// Ticket of the outstanding fetch, if any
    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    /// Whether a fetch is outstanding
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}
