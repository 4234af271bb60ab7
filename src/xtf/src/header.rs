//! File header decoding
//!
//! Layout of the header region:
//! - Bytes 0-255: [`DocumentHeader`]
//! - Bytes 256+: one 128-byte [`ChannelDescriptor`] per sonar and
//!   bathymetry channel
//!
//! The region occupies 1024 bytes for up to 6 channels, 2048 bytes for up
//! to 14 and 3072 bytes beyond that. The first record starts right after it.

use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{sonar_model_by_id, SonarModel};
use crate::channel::ChannelDescriptor;
use crate::cursor::ByteCursor;
use crate::{Error, Result, CHANNEL_INFO_SIZE, DOCUMENT_HEADER_SIZE, MIN_FILE_SIZE};

/// Most channel blocks that fit in the largest header region
pub const MAX_CHANNELS: usize = 22;

/// Channel blocks read when a file declares many channels but is too short
/// to hold a 2048-byte header region
const SHORT_FILE_CHANNELS: usize = 7;

/// Navigation coordinate mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateUnits {
    #[default]
    Meters,
    LatLon,
    Other(u16),
}

impl CoordinateUnits {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            0 => Self::Meters,
            3 => Self::LatLon,
            other => Self::Other(other),
        }
    }

    pub fn to_raw(self) -> u16 {
        match self {
            Self::Meters => 0,
            Self::LatLon => 3,
            Self::Other(raw) => raw,
        }
    }
}

/// The 256-byte preamble of every XTF file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentHeader {
    pub file_format: u8,
    pub system_type: u8,
    pub program_name: String,
    pub program_version: String,
    pub sonar_name: String,
    pub sonar_type: u16,
    pub note: String,
    pub file_name: String,
    pub coordinate_units: CoordinateUnits,
    pub sonar_channels: u16,
    pub bathymetry_channels: u16,
    pub snippet_channels: u8,
    pub forward_look_arrays: u8,
    pub echo_strength_channels: u16,
    pub interferometry_channels: u8,
    pub reference_point_height: f32,
    pub navigation_latency: i32,
    pub navigation_offset_y: f32,
    pub navigation_offset_x: f32,
    pub navigation_offset_z: f32,
    pub navigation_offset_yaw: f32,
    pub mru_offset_y: f32,
    pub mru_offset_x: f32,
    pub mru_offset_z: f32,
    pub mru_offset_yaw: f32,
    pub mru_offset_pitch: f32,
    pub mru_offset_roll: f32,
}

impl DocumentHeader {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < DOCUMENT_HEADER_SIZE {
            return Err(Error::DataTooShort {
                needed: DOCUMENT_HEADER_SIZE,
                actual: data.len(),
            });
        }

        let mut cur = ByteCursor::new(data);
        let file_format = cur.read_u8()?;
        let system_type = cur.read_u8()?;
        let program_name = cur.read_chars(8)?;
        let program_version = cur.read_chars(8)?;
        let sonar_name = cur.read_chars(16)?;
        let sonar_type = cur.read_u16()?; // 34
        let note = cur.read_chars(64)?;
        let file_name = cur.read_chars(64)?;
        let coordinate_units = CoordinateUnits::from_raw(cur.read_u16()?); // 164
        let sonar_channels = cur.read_u16()?;
        let bathymetry_channels = cur.read_u16()?;
        let snippet_channels = cur.read_u8()?; // 170
        let forward_look_arrays = cur.read_u8()?;
        let echo_strength_channels = cur.read_u16()?;
        let interferometry_channels = cur.read_u8()?; // 174
        cur.skip(3)?;
        let reference_point_height = cur.read_f32()?; // 178
        // projection and spheroid type, unused
        cur.skip(22)?;
        let navigation_latency = cur.read_i32()?; // 204
        // origin Y/X, unused
        cur.skip(8)?;

        Ok(Self {
            file_format,
            system_type,
            program_name,
            program_version,
            sonar_name,
            sonar_type,
            note,
            file_name,
            coordinate_units,
            sonar_channels,
            bathymetry_channels,
            snippet_channels,
            forward_look_arrays,
            echo_strength_channels,
            interferometry_channels,
            reference_point_height,
            navigation_latency,
            navigation_offset_y: cur.read_f32()?, // 216
            navigation_offset_x: cur.read_f32()?,
            navigation_offset_z: cur.read_f32()?,
            navigation_offset_yaw: cur.read_f32()?,
            mru_offset_y: cur.read_f32()?, // 232
            mru_offset_x: cur.read_f32()?,
            mru_offset_z: cur.read_f32()?,
            mru_offset_yaw: cur.read_f32()?,
            mru_offset_pitch: cur.read_f32()?,
            mru_offset_roll: cur.read_f32()?,
        })
    }

    /// Channels that carry a descriptor block (sonar plus bathymetry)
    pub fn declared_channels(&self) -> usize {
        usize::from(self.sonar_channels) + usize::from(self.bathymetry_channels)
    }

    /// The recorded sonar system, if its id is known
    pub fn sonar_model(&self) -> Option<&'static SonarModel> {
        sonar_model_by_id(self.sonar_type)
    }
}

/// Decoded header region
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileHeader {
    pub header: DocumentHeader,
    pub channels: Vec<ChannelDescriptor>,
    /// Offset of the first record
    pub region_size: usize,
}

/// Size of the header region holding `channel_count` descriptors
pub fn header_region_size(channel_count: usize) -> usize {
    match channel_count {
        0..=6 => 1024,
        7..=14 => 2048,
        _ => 3072,
    }
}

/// Decode the document header and its channel descriptors
///
/// Fails only when the buffer cannot hold the 1024-byte minimum header
/// region. A channel block that lies past the end of the buffer decodes as
/// a default descriptor.
pub fn decode_file_header(data: &[u8]) -> Result<FileHeader> {
    if data.len() < MIN_FILE_SIZE {
        warn!(len = data.len(), "Buffer too short for an XTF file header");
        return Err(Error::DataTooShort {
            needed: MIN_FILE_SIZE,
            actual: data.len(),
        });
    }

    let header = DocumentHeader::from_bytes(&data[..DOCUMENT_HEADER_SIZE])?;

    let declared = header.declared_channels();
    let mut count = declared.min(MAX_CHANNELS);
    if count > SHORT_FILE_CHANNELS && data.len() < 2048 {
        debug!(
            declared,
            len = data.len(),
            "Header region too short for all channels, reading {}",
            SHORT_FILE_CHANNELS
        );
        count = SHORT_FILE_CHANNELS;
    } else if count < declared {
        debug!(declared, "Channel count capped at {}", MAX_CHANNELS);
    }

    let channels = (0..count)
        .map(|i| {
            let start = DOCUMENT_HEADER_SIZE + i * CHANNEL_INFO_SIZE;
            data.get(start..start + CHANNEL_INFO_SIZE)
                .and_then(|block| ChannelDescriptor::from_bytes(block).ok())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>();

    let region_size = header_region_size(channels.len());
    Ok(FileHeader {
        header,
        channels,
        region_size,
    })
}

#[cfg(test)]
pub(crate) fn header_bytes(sonar: u16, bathy: u16, len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    data[0] = 123;
    data[1] = 1;
    data[2..9].copy_from_slice(b"Isis v7");
    data[18..22].copy_from_slice(b"K595");
    data[34..36].copy_from_slice(&9u16.to_le_bytes());
    data[166..168].copy_from_slice(&sonar.to_le_bytes());
    data[168..170].copy_from_slice(&bathy.to_le_bytes());
    data
}
