use crate::lcd::Geometry;
use crate::{LcdError, LcdResult};
use serde::{Deserialize, Serialize};

/// Display configuration, as loaded from a config file by the application.
///
/// Missing fields fall back to a 16x2 panel with a tab step of 4.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(default)]
pub struct LcdConfig {
    pub width: u8,
    pub height: u8,
    pub tab_step: u8,
}

impl LcdConfig {
    /// Validates the configured size into a [Geometry].
    pub fn geometry(&self) -> LcdResult<Geometry> {
        Geometry::new(self.width, self.height)
    }

    /// Validates the configured tab step.
    pub fn tab_step(&self) -> LcdResult<u8> {
        if self.tab_step == 0 {
            return Err(LcdError::InvalidTabStep);
        }
        Ok(self.tab_step)
    }
}

impl Default for LcdConfig {
    fn default() -> Self {
        LcdConfig {
            width: 16,
            height: 2,
            tab_step: 4,
        }
    }
}
