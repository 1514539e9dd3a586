use serde::{Deserialize, Serialize};
use std::fmt;

/// Tonal channel edited by the adjustment slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Brightness,
    Hue,
    Saturation,
    Contrast,
}

impl Channel {
    pub const ALL: [Self; 4] = [Self::Brightness, Self::Hue, Self::Saturation, Self::Contrast];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Brightness => "Brightness",
            Self::Hue => "Hue",
            Self::Saturation => "Saturation",
            Self::Contrast => "Contrast",
        }
    }

    pub const fn mode(self) -> Mode {
        match self {
            Self::Brightness => Mode::Brightness,
            Self::Hue => Mode::Hue,
            Self::Saturation => Mode::Saturation,
            Self::Contrast => Mode::Contrast,
        }
    }
}

/// Active editing operation. Exactly one is selected at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Crop,
    Brightness,
    Hue,
    Saturation,
    Contrast,
}

impl Mode {
    pub const ALL: [Self; 5] = [
        Self::Crop,
        Self::Brightness,
        Self::Hue,
        Self::Saturation,
        Self::Contrast,
    ];

    /// Adjustment channel edited in this mode; `None` for crop.
    pub const fn channel(self) -> Option<Channel> {
        match self {
            Self::Crop => None,
            Self::Brightness => Some(Channel::Brightness),
            Self::Hue => Some(Channel::Hue),
            Self::Saturation => Some(Channel::Saturation),
            Self::Contrast => Some(Channel::Contrast),
        }
    }

    pub const fn is_crop(self) -> bool {
        matches!(self, Self::Crop)
    }

    pub const fn label(self) -> &'static str {
        match self.channel() {
            Some(channel) => channel.label(),
            None => "Crop",
        }
    }
}

impl From<Channel> for Mode {
    fn from(channel: Channel) -> Self {
        channel.mode()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_has_no_channel() {
        assert_eq!(Mode::Crop.channel(), None);
        assert!(Mode::Crop.is_crop());
    }

    #[test]
    fn every_channel_maps_back_to_its_mode() {
        for channel in Channel::ALL {
            let mode = Mode::from(channel);
            assert!(!mode.is_crop());
            assert_eq!(mode.channel(), Some(channel));
        }
    }

    #[test]
    fn default_mode_is_crop() {
        assert_eq!(Mode::default(), Mode::Crop);
    }
}
