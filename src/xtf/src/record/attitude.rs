//! Attitude records (types 3 and 103)

use serde::Serialize;

use super::{read_prefix, FromBytes, Packet, RecordHeader};
use crate::timestamp::{DateTimeFields, Precision};
use crate::Result;

/// Pitch, roll, heave and yaw from a motion sensor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attitude {
    pub header: RecordHeader,
    pub source_epoch_microseconds: u32,
    pub source_epoch: u32,
    pub pitch: f32,
    pub roll: f32,
    pub heave: f32,
    pub yaw: f32,
    pub time_tag: u32,
    pub heading: f32,
}

impl FromBytes for Attitude {
    const MIN_SIZE: usize = 63;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let (mut header, mut cur) = read_prefix(data, Self::MIN_SIZE)?;
        cur.skip(8)?; // 14-21 reserved
        let source_epoch_microseconds = cur.read_u32()?; // 22
        let source_epoch = cur.read_u32()?;
        let pitch = cur.read_f32()?; // 30
        let roll = cur.read_f32()?;
        let heave = cur.read_f32()?;
        let yaw = cur.read_f32()?;
        let time_tag = cur.read_u32()?; // 46
        let heading = cur.read_f32()?;

        let date = DateTimeFields::read_date(&mut cur)?; // 54
        let millis = cur.read_u16()?; // 61
        header.packet_time = date
            .with_subsecond(u32::from(millis))
            .compose(Precision::Millis);

        Ok(Self {
            header,
            source_epoch_microseconds,
            source_epoch,
            pitch,
            roll,
            heave,
            yaw,
            time_tag,
            heading,
        })
    }
}

impl Packet for Attitude {
    fn header(&self) -> &RecordHeader {
        &self.header
    }

    fn time_tag(&self) -> Option<u32> {
        Some(self.time_tag)
    }
}
