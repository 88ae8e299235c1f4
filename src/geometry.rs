//! Container geometry: a square left box joined to a right box whose
//! height equals the channel width, centred on the left box's mid-height.

use serde::Serialize;
use ultraviolet::DVec2;

use crate::io::{BoxSide, SimParams};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Container {
    pub channel_width: f64,
    pub radius: f64,
    pub box1_width: f64,
    pub box2_width: f64,
    pub box1_height: f64,
}

impl From<&SimParams> for Container {
    fn from(p: &SimParams) -> Self {
        Self {
            channel_width: p.channel_width,
            radius: p.radius,
            box1_width: p.box1_width,
            box2_width: p.box2_width,
            box1_height: p.box1_height,
        }
    }
}

impl Container {
    /// Vertical band `(y_min, y_max)` of the opening into the right box.
    pub fn opening(&self) -> (f64, f64) {
        let y_min = (self.box1_height - self.channel_width) / 2.0;
        (y_min, y_min + self.channel_width)
    }

    pub fn total_width(&self) -> f64 {
        self.box1_width + self.box2_width
    }

    /// Wall length reachable by particle centres, one radius in from each
    /// corner.
    pub fn perimeter(&self, side: BoxSide) -> f64 {
        let r = self.radius;
        match side {
            BoxSide::Left => 2.0 * (self.box1_height + self.box1_width - 2.0 * r),
            BoxSide::Right => 2.0 * (self.channel_width + self.box2_width - 2.0 * r),
        }
    }

    /// Area available to the gas, both boxes shrunk by one radius.
    pub fn accessible_area(&self) -> f64 {
        let r = self.radius;
        (self.box1_width - r) * (self.box1_height - r)
            + (self.box2_width - r) * (self.channel_width - r)
    }

    /// Closed outline of the container walls, starting at the origin.
    pub fn outline(&self) -> [DVec2; 9] {
        let (y_min, y_max) = self.opening();
        let w1 = self.box1_width;
        let w = self.total_width();
        let h = self.box1_height;
        [
            DVec2::new(0.0, 0.0),
            DVec2::new(w1, 0.0),
            DVec2::new(w1, y_min),
            DVec2::new(w, y_min),
            DVec2::new(w, y_max),
            DVec2::new(w1, y_max),
            DVec2::new(w1, h),
            DVec2::new(0.0, h),
            DVec2::new(0.0, 0.0),
        ]
    }
}
