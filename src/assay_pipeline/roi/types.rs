//! ROI data types

use serde::{Deserialize, Serialize};

/// Semantic slot of an ROI. Extraction order follows the declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoiKind {
    InternalControl,
    Hiv,
    Hbv,
    Hcv,
}

impl RoiKind {
    pub const ALL: [RoiKind; 4] = [RoiKind::InternalControl, RoiKind::Hiv, RoiKind::Hbv, RoiKind::Hcv];

    pub fn label(self) -> &'static str {
        match self {
            RoiKind::InternalControl => "Internal",
            RoiKind::Hiv => "HIV",
            RoiKind::Hbv => "HBV",
            RoiKind::Hcv => "HCV",
        }
    }
}

/// Center of an ROI window in frame coordinates.
///
/// Callers may supply any value, including negative ones; extraction clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiCenter {
    pub cx: i64,
    pub cy: i64,
}

impl RoiCenter {
    pub const fn new(cx: i64, cy: i64) -> Self {
        Self { cx, cy }
    }

    /// Nearest center whose `size x size` window lies fully inside a
    /// `width x height` frame. Requires `size <= width` and `size <= height`.
    pub fn clamp_to(self, width: usize, height: usize, size: usize) -> RoiCenter {
        let half = (size / 2) as i64;
        // `size - half` keeps odd sizes inside the frame as well.
        let upper = (size - size / 2) as i64;
        RoiCenter {
            cx: self.cx.clamp(half, width as i64 - upper),
            cy: self.cy.clamp(half, height as i64 - upper),
        }
    }

    /// Top-left corner of the window around an already clamped center.
    pub fn top_left(self, size: usize) -> (usize, usize) {
        let half = (size / 2) as i64;
        ((self.cx - half) as usize, (self.cy - half) as usize)
    }

    /// Moves the center by one operator step and clamps it again.
    pub fn nudge(self, dx: i64, dy: i64, width: usize, height: usize, size: usize) -> RoiCenter {
        RoiCenter::new(self.cx.saturating_add(dx), self.cy.saturating_add(dy)).clamp_to(width, height, size)
    }
}

impl std::fmt::Display for RoiCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.cx, self.cy)
    }
}

impl std::str::FromStr for RoiCenter {
    type Err = String;

    /// Parses `CX,CY`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (cx, cy) = s
            .split_once(',')
            .ok_or_else(|| format!("expected CX,CY, got {s:?}"))?;
        let cx = cx.trim().parse().map_err(|e| format!("bad cx {cx:?}: {e}"))?;
        let cy = cy.trim().parse().map_err(|e| format!("bad cy {cy:?}: {e}"))?;
        Ok(RoiCenter::new(cx, cy))
    }
}
