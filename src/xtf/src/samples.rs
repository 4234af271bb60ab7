//! Ping sample decimation
//!
//! Sonar channels record 1, 2 or 4 byte samples, signed (bipolar) or
//! unsigned (unipolar). For display every sample is projected onto a single
//! byte:
//!
//! - unipolar: the unsigned value divided by 256^(width-1)
//! - bipolar: the signed value shifted into unsigned range by subtracting
//!   the type's minimum, then divided the same way
//!
//! Four-byte samples have two divisors, see [`WideSamplePolicy`].

use serde::{Deserialize, Serialize};

use crate::channel::Polarity;

/// Divisor applied to 4-byte samples by existing XTF tooling
///
/// Written there as `256 ^ 3`, which is a bitwise XOR and evaluates to 259.
const LEGACY_WIDE_DIVISOR: u32 = 256 ^ 3;

/// How 4-byte samples are reduced to one byte
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WideSamplePolicy {
    /// Divide by 259 and keep the low byte, matching existing viewers
    #[default]
    Legacy,
    /// Keep the most significant byte (divide by 256^3)
    Scaled,
}

impl WideSamplePolicy {
    fn reduce(self, value: u32) -> u8 {
        match self {
            WideSamplePolicy::Legacy => (value / LEGACY_WIDE_DIVISOR) as u8,
            WideSamplePolicy::Scaled => (value >> 24) as u8,
        }
    }
}

/// Samples of one channel in one ping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleBlock {
    pub bytes_per_sample: u16,
    pub polarity: Polarity,
    /// Sample bytes as recorded
    #[serde(skip)]
    pub raw: Vec<u8>,
    /// One display byte per complete sample
    pub display: Vec<u8>,
}

impl SampleBlock {
    pub fn new(
        raw: &[u8],
        bytes_per_sample: u16,
        polarity: Polarity,
        policy: WideSamplePolicy,
    ) -> Self {
        Self {
            bytes_per_sample,
            polarity,
            raw: raw.to_vec(),
            display: decimate(raw, bytes_per_sample, polarity, policy),
        }
    }

    /// Number of complete samples in the block
    pub fn sample_count(&self) -> usize {
        match self.bytes_per_sample {
            0 => 0,
            width => self.raw.len() / usize::from(width),
        }
    }
}

/// Project raw samples onto one byte each
///
/// A trailing partial sample is ignored. Sample widths other than 1, 2 and
/// 4 bytes produce no display bytes.
pub fn decimate(
    raw: &[u8],
    bytes_per_sample: u16,
    polarity: Polarity,
    policy: WideSamplePolicy,
) -> Vec<u8> {
    let unipolar = polarity.is_unipolar();
    match bytes_per_sample {
        1 => raw
            .iter()
            .map(|&b| if unipolar { b } else { b ^ 0x80 })
            .collect(),
        2 => raw
            .chunks_exact(2)
            .map(|c| {
                let bits = u16::from_le_bytes([c[0], c[1]]);
                // i16 - i16::MIN, taken as u16, flips the sign bit
                let value = if unipolar { bits } else { bits ^ 0x8000 };
                (value / 256) as u8
            })
            .collect(),
        4 => raw
            .chunks_exact(4)
            .map(|c| {
                let bits = u32::from_le_bytes([c[0], c[1], c[2], c[3]]);
                let value = if unipolar { bits } else { bits ^ 0x8000_0000 };
                policy.reduce(value)
            })
            .collect(),
        _ => Vec::new(),
    }
}
