//! Compute device selection for the inference backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Device types for model execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Device {
    /// CPU device with thread count (0 = runtime default)
    Cpu(usize),
    /// CUDA device with device ID
    Cuda(usize),
}

impl Default for Device {
    fn default() -> Self {
        Self::Cpu(0)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu(i) => write!(f, "cpu:{i}"),
            Self::Cuda(i) => write!(f, "cuda:{i}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported device: {0}")]
pub struct DeviceParseError(String);

impl std::str::FromStr for Device {
    type Err = DeviceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[inline]
        fn parse_device_id(id_str: Option<&str>) -> usize {
            id_str
                .map(|s| s.trim().parse::<usize>().unwrap_or(0))
                .unwrap_or(0)
        }

        let (device_type, id_part) = s
            .trim()
            .split_once(':')
            .map_or_else(|| (s.trim(), None), |(device, id)| (device, Some(id)));

        match device_type.to_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu(parse_device_id(id_part))),
            "cuda" => Ok(Self::Cuda(parse_device_id(id_part))),
            _ => Err(DeviceParseError(s.to_string())),
        }
    }
}

impl Device {
    /// Get the device ID (thread count for CPU devices)
    pub fn id(&self) -> usize {
        match self {
            Self::Cpu(i) | Self::Cuda(i) => *i,
        }
    }

    /// Check if the device is available on the system
    pub fn is_available(&self) -> bool {
        match self {
            Self::Cpu(_) => true,
            Self::Cuda(_) => {
                #[cfg(all(feature = "onnx", feature = "cuda"))]
                {
                    use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};
                    CUDAExecutionProvider::default()
                        .with_device_id(self.id() as i32)
                        .is_available()
                        .unwrap_or(false)
                }
                #[cfg(not(all(feature = "onnx", feature = "cuda")))]
                {
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_device_strings() {
        assert_eq!("cpu".parse::<Device>().unwrap(), Device::Cpu(0));
        assert_eq!("cpu:4".parse::<Device>().unwrap(), Device::Cpu(4));
        assert_eq!("cuda:1".parse::<Device>().unwrap(), Device::Cuda(1));
        assert!("tpu".parse::<Device>().is_err());
    }

    #[test]
    fn display_roundtrip() {
        let device = Device::Cuda(2);
        assert_eq!(device.to_string().parse::<Device>().unwrap(), device);
    }

    #[test]
    fn cpu_is_always_available() {
        assert!(Device::Cpu(0).is_available());
    }
}
