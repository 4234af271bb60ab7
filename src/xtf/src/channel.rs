//! Channel descriptors from the file header
//!
//! Each sonar or bathymetry channel is described by one 128-byte block after
//! the document header. The descriptor fixes how wide each sample is and how
//! many samples a ping carries for that channel.

use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::{Result, CHANNEL_INFO_SIZE};

/// Channel category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    Subbottom,
    Port,
    Starboard,
    Bathymetry,
    Other(u8),
}

impl ChannelType {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Subbottom,
            1 => Self::Port,
            2 => Self::Starboard,
            3 => Self::Bathymetry,
            other => Self::Other(other),
        }
    }

    pub fn to_raw(self) -> u8 {
        match self {
            Self::Subbottom => 0,
            Self::Port => 1,
            Self::Starboard => 2,
            Self::Bathymetry => 3,
            Self::Other(raw) => raw,
        }
    }
}

/// How slant range was corrected before recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionFlag {
    None,
    Range,
    Depth,
    Other(u16),
}

impl CorrectionFlag {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            0 => Self::None,
            1 => Self::Range,
            2 => Self::Depth,
            other => Self::Other(other),
        }
    }

    pub fn to_raw(self) -> u16 {
        match self {
            Self::None => 0,
            Self::Range => 1,
            Self::Depth => 2,
            Self::Other(raw) => raw,
        }
    }
}

/// Sample signedness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Bipolar,
    Unipolar,
    Other(u16),
}

impl Polarity {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            0 => Self::Bipolar,
            1 => Self::Unipolar,
            other => Self::Other(other),
        }
    }

    pub fn to_raw(self) -> u16 {
        match self {
            Self::Bipolar => 0,
            Self::Unipolar => 1,
            Self::Other(raw) => raw,
        }
    }

    /// Only an explicit unipolar code means unsigned samples
    pub fn is_unipolar(self) -> bool {
        self == Self::Unipolar
    }
}

/// Static description of one recorded channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelDescriptor {
    pub channel_type: ChannelType,
    pub sub_channel: u8,
    pub correction: CorrectionFlag,
    pub polarity: Polarity,
    pub bytes_per_sample: u16,
    pub samples_per_channel: u32,
    pub name: String,
    pub volt_scale: f32,
    pub frequency: f32,
    pub horizontal_beam_angle: f32,
    pub tilt_angle: f32,
    pub beam_width: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub offset_z: f32,
    pub offset_yaw: f32,
    pub offset_pitch: f32,
    pub offset_roll: f32,
    pub beams_per_array: u16,
    pub latency: f32,
}

impl Default for ChannelDescriptor {
    fn default() -> Self {
        Self {
            channel_type: ChannelType::Subbottom,
            sub_channel: 0,
            correction: CorrectionFlag::Range,
            polarity: Polarity::Bipolar,
            bytes_per_sample: 0,
            samples_per_channel: 0,
            name: String::new(),
            volt_scale: 0.0,
            frequency: 0.0,
            horizontal_beam_angle: 0.0,
            tilt_angle: 0.0,
            beam_width: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            offset_z: 0.0,
            offset_yaw: 0.0,
            offset_pitch: 0.0,
            offset_roll: 0.0,
            beams_per_array: 0,
            latency: 0.0,
        }
    }
}

impl ChannelDescriptor {
    /// Parse a 128-byte channel block
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < CHANNEL_INFO_SIZE {
            return Err(crate::Error::DataTooShort {
                needed: CHANNEL_INFO_SIZE,
                actual: data.len(),
            });
        }

        let mut cur = ByteCursor::new(data);
        Ok(Self {
            channel_type: ChannelType::from_raw(cur.read_u8()?),
            sub_channel: cur.read_u8()?,
            correction: CorrectionFlag::from_raw(cur.read_u16()?),
            polarity: Polarity::from_raw(cur.read_u16()?),
            bytes_per_sample: cur.read_u16()?,
            samples_per_channel: cur.read_u32()?,
            name: cur.read_chars(16)?,
            volt_scale: cur.read_f32()?,
            frequency: cur.read_f32()?,
            horizontal_beam_angle: cur.read_f32()?,
            tilt_angle: cur.read_f32()?,
            beam_width: cur.read_f32()?,
            offset_x: cur.read_f32()?,
            offset_y: cur.read_f32()?,
            offset_z: cur.read_f32()?,
            offset_yaw: cur.read_f32()?,
            offset_pitch: cur.read_f32()?,
            offset_roll: cur.read_f32()?,
            beams_per_array: cur.read_u16()?,
            latency: cur.read_f32()?,
        })
    }

    /// Byte length of one ping's sample block for this channel
    pub fn sample_block_len(&self) -> u64 {
        u64::from(self.samples_per_channel) * u64::from(self.bytes_per_sample)
    }
}

#[cfg(test)]
pub(crate) fn channel_block(
    channel_type: u8,
    polarity: u16,
    bytes_per_sample: u16,
    samples: u32,
    name: &str,
) -> Vec<u8> {
    let mut block = vec![0u8; CHANNEL_INFO_SIZE];
    block[0] = channel_type;
    block[2..4].copy_from_slice(&1u16.to_le_bytes());
    block[4..6].copy_from_slice(&polarity.to_le_bytes());
    block[6..8].copy_from_slice(&bytes_per_sample.to_le_bytes());
    block[8..12].copy_from_slice(&samples.to_le_bytes());
    block[12..12 + name.len()].copy_from_slice(name.as_bytes());
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_parse_descriptor() {
        let mut block = channel_block(2, 1, 2, 4096, "STBD");
        block[32..36].copy_from_slice(&455_000.0f32.to_le_bytes());
        block[72..74].copy_from_slice(&3u16.to_le_bytes());
        block[74..78].copy_from_slice(&0.25f32.to_le_bytes());

        let ch = ChannelDescriptor::from_bytes(&block).unwrap();
        assert_eq!(ch.channel_type, ChannelType::Starboard);
        assert_eq!(ch.correction, CorrectionFlag::Range);
        assert_eq!(ch.polarity, Polarity::Unipolar);
        assert_eq!(ch.bytes_per_sample, 2);
        assert_eq!(ch.samples_per_channel, 4096);
        assert_eq!(ch.name, "STBD");
        assert_eq!(ch.frequency, 455_000.0);
        assert_eq!(ch.beams_per_array, 3);
        assert_eq!(ch.latency, 0.25);
        assert_eq!(ch.sample_block_len(), 8192);
    }

    #[test]
    fn test_short_block() {
        let block = channel_block(1, 0, 1, 10, "PORT");
        assert_eq!(
            ChannelDescriptor::from_bytes(&block[..127]),
            Err(Error::DataTooShort {
                needed: 128,
                actual: 127
            })
        );
    }

    #[test]
    fn test_unknown_codes_survive() {
        let block = channel_block(9, 7, 1, 1, "");
        let ch = ChannelDescriptor::from_bytes(&block).unwrap();
        assert_eq!(ch.channel_type, ChannelType::Other(9));
        assert_eq!(ch.channel_type.to_raw(), 9);
        assert_eq!(ch.polarity, Polarity::Other(7));
        assert!(!ch.polarity.is_unipolar());
    }

    #[test]
    fn test_enum_codes() {
        for raw in 0..=4u8 {
            assert_eq!(ChannelType::from_raw(raw).to_raw(), raw);
        }
        for raw in 0..=3u16 {
            assert_eq!(CorrectionFlag::from_raw(raw).to_raw(), raw);
            assert_eq!(Polarity::from_raw(raw).to_raw(), raw);
        }
    }

    #[test]
    fn test_default_descriptor() {
        let ch = ChannelDescriptor::default();
        assert_eq!(ch.polarity, Polarity::Bipolar);
        assert_eq!(ch.sample_block_len(), 0);
    }
}
