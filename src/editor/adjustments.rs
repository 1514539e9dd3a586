use super::Channel;
use serde::{Deserialize, Serialize};

/// Hundredths: a channel counts as edited once it reaches 0.01 in magnitude.
const CHANGE_SCALE: f32 = 100.0;

/// Four tonal adjustment magnitudes; zero means untouched.
///
/// Values are stored exactly as written. Rendering works on
/// [`Adjustments::sanitized`], which maps each channel into `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    pub brightness: f32,
    pub hue: f32,
    pub saturation: f32,
    pub contrast: f32,
}

impl Adjustments {
    pub const fn get(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Brightness => self.brightness,
            Channel::Hue => self.hue,
            Channel::Saturation => self.saturation,
            Channel::Contrast => self.contrast,
        }
    }

    pub const fn set(&mut self, channel: Channel, value: f32) {
        match channel {
            Channel::Brightness => self.brightness = value,
            Channel::Hue => self.hue = value,
            Channel::Saturation => self.saturation = value,
            Channel::Contrast => self.contrast = value,
        }
    }

    /// True when any channel rounds to a nonzero value at two decimals.
    pub fn is_changed(&self) -> bool {
        Channel::ALL
            .iter()
            .any(|&channel| rounds_to_nonzero(self.get(channel)))
    }

    /// Clamp every channel into `[-1, 1]`; non-finite values become zero.
    pub fn sanitized(self) -> Self {
        Self {
            brightness: sanitize_channel(self.brightness),
            hue: sanitize_channel(self.hue),
            saturation: sanitize_channel(self.saturation),
            contrast: sanitize_channel(self.contrast),
        }
    }

    pub fn is_identity(self) -> bool {
        let sanitized = self.sanitized();
        Channel::ALL
            .iter()
            .all(|&channel| sanitized.get(channel).abs() <= f32::EPSILON)
    }
}

fn rounds_to_nonzero(value: f32) -> bool {
    (value.abs() * CHANGE_SCALE).round() >= 1.0
}

fn sanitize_channel(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
