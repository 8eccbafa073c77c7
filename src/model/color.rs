// src/model/color.rs

use serde::{Deserialize, Serialize};

/// RGB colour with components in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f64; 3]);

impl Color {
    pub const BLACK: Color = Color([0.0, 0.0, 0.0]);
    pub const WHITE: Color = Color([1.0, 1.0, 1.0]);
    /// Marks cells that could not be classified. No rule table produces it.
    pub const ERROR: Color = Color([0.5, 0.5, 0.5]);

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color([r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0])
    }

    pub fn to_rgb8(&self) -> [u8; 3] {
        self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}
