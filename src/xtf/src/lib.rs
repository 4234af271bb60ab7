//! Reader for eXtended Triton Format (XTF) files
//!
//! XTF is the container written by sidescan, subbottom and multibeam survey
//! software. A file is a fixed header followed by a stream of variable-length
//! records ("packets") of many different shapes.
//!
//! # Format Overview
//!
//! ## File header
//!
//! - Bytes 0-255: document header (program, sonar, channel counts, offsets)
//! - Bytes 256+: one 128-byte channel descriptor per sonar/bathymetry channel
//! - The header region is padded to 1024, 2048 or 3072 bytes
//!
//! ## Records
//!
//! Every record starts with the same 14-byte prefix:
//! - Bytes 0-1: magic number `0xFACE` (little-endian 64206)
//! - Byte 2: header type (selects the record shape)
//! - Byte 3: sub-channel number
//! - Bytes 4-5: number of channels to follow
//! - Bytes 6-9: reserved
//! - Bytes 10-13: total record length, prefix included
//!
//! The record length is the only way to find where the next record starts.
//!
//! # Example
//!
//! ```no_run
//! use xtf::Packet;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("survey.xtf")?;
//! let doc = xtf::Document::parse(&data);
//!
//! for group in doc.statistics.iter() {
//!     println!("{:>3} {:<32} {}", group.header_type, group.name, group.count);
//! }
//!
//! if let Some(entry) = doc.index.first() {
//!     let record = doc.decode_at(&data, entry.offset)?;
//!     println!("{:?}", record.packet_time());
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod channel;
mod cursor;
pub mod document;
pub mod header;
mod options;
pub mod record;
pub mod samples;
pub mod scanner;
mod sniffer;
mod stats;
pub mod timestamp;

pub use catalog::{
    packet_type_by_id, packet_type_description, packet_type_name, sonar_model_by_id, sonar_model_name,
    PacketType, SonarModel, PACKET_TYPES, SONAR_MODELS,
};
pub use channel::{ChannelDescriptor, ChannelType, CorrectionFlag, Polarity};
pub use cursor::ByteCursor;
pub use document::{Document, Summary};
pub use header::{decode_file_header, CoordinateUnits, DocumentHeader, FileHeader};
pub use options::ScanOptions;
pub use record::{decode_record, FromBytes, Packet, Record, RecordHeader, RecordKind};
pub use samples::{SampleBlock, WideSamplePolicy};
pub use scanner::{IndexEntry, ScanEnd, ScanOutput, Scanner};
pub use sniffer::Sniff;
pub use stats::{StatEntry, Statistics};

/// Magic number at the start of every record (`0xFACE`)
pub const MAGIC_NUMBER: u16 = 64206;

/// Size of the prefix shared by every record
pub const RECORD_PREFIX_SIZE: usize = 14;

/// Size of the fixed document header
pub const DOCUMENT_HEADER_SIZE: usize = 256;

/// Size of one channel descriptor block
pub const CHANNEL_INFO_SIZE: usize = 128;

/// Smallest buffer that can hold a file header region
pub const MIN_FILE_SIZE: usize = 1024;

/// Errors from XTF decoding
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Data too short: need {needed} bytes, got {actual}")]
    DataTooShort { needed: usize, actual: usize },

    #[error("Invalid magic number: expected 0xface, got 0x{0:04x}")]
    InvalidMagic(u16),

    #[error("Invalid snippet block id: 0x{0:08x}")]
    InvalidSnippetMagic(u32),

    #[error("Offset {offset} is outside the buffer ({len} bytes)")]
    OffsetOutOfRange { offset: u64, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Check if data starts with the record magic number
pub fn is_record_start(data: &[u8]) -> bool {
    data.len() >= 2 && u16::from_le_bytes([data[0], data[1]]) == MAGIC_NUMBER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_bytes() {
        assert_eq!(MAGIC_NUMBER, 0xFACE);
        assert!(is_record_start(&[0xCE, 0xFA, 0x00]));
        assert!(!is_record_start(&[0xFA, 0xCE]));
        assert!(!is_record_start(&[0xCE]));
    }

    #[test]
    fn test_size_constants() {
        assert_eq!(RECORD_PREFIX_SIZE, 14);
        assert_eq!(DOCUMENT_HEADER_SIZE, 256);
        assert_eq!(CHANNEL_INFO_SIZE, 128);
        assert_eq!(MIN_FILE_SIZE, DOCUMENT_HEADER_SIZE + 6 * CHANNEL_INFO_SIZE);
    }

    #[test]
    fn test_error_display() {
        let err = Error::DataTooShort {
            needed: 14,
            actual: 3,
        };
        assert!(err.to_string().contains("Data too short"));

        let err = Error::InvalidMagic(0x1234);
        assert!(err.to_string().contains("0x1234"));

        let err = Error::OffsetOutOfRange { offset: 10, len: 5 };
        assert!(err.to_string().contains("outside the buffer"));
    }
}
