//! Text annotation records (type 1)
//!
//! Layout:
//! - Bytes 0-13: common prefix
//! - Bytes 14-20: date and time, whole seconds
//! - Bytes 21-55: unused
//! - Bytes 56+: NUL-padded text up to the end of the record

use serde::Serialize;

use super::{read_prefix, record_view, FromBytes, Packet, RecordHeader};
use crate::cursor::fixed_str;
use crate::timestamp::{DateTimeFields, Precision};
use crate::Result;

const TEXT_OFFSET: usize = 56;

/// Meaning of a note, carried in the sub-channel byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteSubChannel {
    Generic,
    VesselName,
    SurveyArea,
    OperatorName,
    Other(u8),
}

impl NoteSubChannel {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Generic,
            1 => Self::VesselName,
            2 => Self::SurveyArea,
            3 => Self::OperatorName,
            other => Self::Other(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notes {
    pub header: RecordHeader,
    pub note_kind: NoteSubChannel,
    pub text: String,
}

impl FromBytes for Notes {
    const MIN_SIZE: usize = 256;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let (mut header, mut cur) = read_prefix(data, Self::MIN_SIZE)?;
        header.packet_time = DateTimeFields::read_date(&mut cur)?.compose(Precision::Seconds);

        let view = record_view(data, &header, TEXT_OFFSET);
        let text = fixed_str(view.get(TEXT_OFFSET..).unwrap_or_default());

        Ok(Self {
            note_kind: NoteSubChannel::from_raw(header.sub_channel),
            header,
            text,
        })
    }
}

impl Packet for Notes {
    fn header(&self) -> &RecordHeader {
        &self.header
    }
}
