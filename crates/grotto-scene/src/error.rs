//! Scene generation and output errors.

use std::path::PathBuf;

/// Errors from validating parameters or writing scene files.
///
/// Every variant except [`SceneError::Io`] is raised before any geometry is
/// generated.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("floor resolution must be at least 1, got {0}")]
    InvalidResolution(u32),

    #[error("{kind} segment count must be at least 3, got {count}")]
    InvalidSegmentCount { kind: &'static str, count: u32 },

    #[error("pillar slice count must be at least 1, got {0}")]
    InvalidSliceCount(u32),

    #[error("floor size must be positive and finite, got {0}")]
    InvalidFloorSize(f64),

    #[error("output scale must be positive and finite, got {0}")]
    InvalidScale(f64),

    /// The height functions could put the ceiling at or below the floor.
    #[error("cave profile is invalid: worst-case floor-to-ceiling gap is {0}")]
    InvalidProfile(f64),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SceneError {
    /// `true` for parameter errors, `false` for I/O failures.
    pub fn is_config_error(&self) -> bool {
        !matches!(self, SceneError::Io { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SceneError::Io {
            path: path.into(),
            source,
        }
    }
}
