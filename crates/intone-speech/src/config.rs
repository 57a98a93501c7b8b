//! Configuration surface for the synthesis component.

use crate::device::Device;
use crate::types::SynthesisControls;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 22_050;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("sample rate must be greater than zero")]
    InvalidSampleRate,
    #[error("{0} must be a positive, finite value")]
    InvalidScale(&'static str),
}

/// Component-wide synthesis configuration.
///
/// The sample rate is a fixed configuration value for the whole component;
/// it is never derived from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Output sample rate in Hz (default: 22050)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Speaking-rate scale (default: 1.0)
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Pitch scale (default: 1.0)
    #[serde(default = "default_pitch")]
    pub pitch: f32,

    /// Glottal-tension scale (default: 0.8)
    #[serde(default = "default_glottal")]
    pub glottal: f32,

    /// Voice identifier handed to the phonemizer (default: "en-us")
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Relative path to the phonemizer's data resources, if it needs one
    #[serde(default)]
    pub phonemizer_data_dir: Option<PathBuf>,

    /// Compute device for the inference backend
    #[serde(default)]
    pub device: Device,
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

fn default_speed() -> f32 {
    1.0
}

fn default_pitch() -> f32 {
    1.0
}

fn default_glottal() -> f32 {
    0.8
}

fn default_voice() -> String {
    "en-us".to_string()
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            speed: default_speed(),
            pitch: default_pitch(),
            glottal: default_glottal(),
            voice: default_voice(),
            phonemizer_data_dir: None,
            device: Device::default(),
        }
    }
}

impl SynthesisConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    pub fn with_glottal(mut self, glottal: f32) -> Self {
        self.glottal = glottal;
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn with_phonemizer_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.phonemizer_data_dir = Some(dir.into());
        self
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// The scalar controls bound to every sentence of a request.
    pub fn controls(&self) -> SynthesisControls {
        SynthesisControls::new(self.speed, self.pitch, self.glottal)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::InvalidSampleRate);
        }
        for (name, value) in [
            ("speed", self.speed),
            ("pitch", self.pitch),
            ("glottal", self.glottal),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidScale(name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SynthesisConfig::default();
        assert_eq!(config.sample_rate, 22_050);
        assert_eq!(config.speed, 1.0);
        assert_eq!(config.pitch, 1.0);
        assert_eq!(config.glottal, 0.8);
        assert_eq!(config.voice, "en-us");
        assert_eq!(config.device, Device::Cpu(0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = SynthesisConfig::default().with_voice("de").with_speed(1.2);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SynthesisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.voice, "de");
        assert_eq!(deserialized.speed, 1.2);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: SynthesisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.sample_rate, DEFAULT_SAMPLE_RATE);
        assert_eq!(config.glottal, 0.8);
    }

    #[test]
    fn rejects_invalid_values() {
        let config = SynthesisConfig::default().with_sample_rate(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSampleRate)
        ));

        let config = SynthesisConfig::default().with_speed(-1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidScale("speed"))
        ));

        let config = SynthesisConfig::default().with_pitch(f32::NAN);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidScale("pitch"))
        ));
    }

    #[test]
    fn controls_mirror_scales() {
        let config = SynthesisConfig::default()
            .with_speed(1.1)
            .with_pitch(0.9)
            .with_glottal(0.7);
        assert_eq!(config.controls().as_scales(), [1.1, 0.9, 0.7]);
    }
}
