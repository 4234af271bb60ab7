//! QPS single-beam echosounder records (type 26)
//!
//! Unlike the other records, the time tag comes first and the date sits at
//! the end of the record (bytes 38-46).

use serde::Serialize;

use super::{read_prefix, FromBytes, Packet, RecordHeader};
use crate::timestamp::{DateTimeFields, Precision};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QpsSingleBeam {
    pub header: RecordHeader,
    pub time_tag: u32,
    pub id: i32,
    pub sound_velocity: f32,
    pub intensity: f32,
    pub quality: i32,
    pub two_way_travel_time: f32,
}

impl FromBytes for QpsSingleBeam {
    const MIN_SIZE: usize = 53;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let (mut header, mut cur) = read_prefix(data, Self::MIN_SIZE)?;
        let time_tag = cur.read_u32()?; // 14
        let id = cur.read_i32()?;
        let sound_velocity = cur.read_f32()?; // 22
        let intensity = cur.read_f32()?;
        let quality = cur.read_i32()?; // 30
        let two_way_travel_time = cur.read_f32()?;

        let date = DateTimeFields::read_date(&mut cur)?; // 38
        let millis = cur.read_u16()?; // 45
        header.packet_time = date
            .with_subsecond(u32::from(millis))
            .compose(Precision::Millis);

        Ok(Self {
            header,
            time_tag,
            id,
            sound_velocity,
            intensity,
            quality,
            two_way_travel_time,
        })
    }
}

impl Packet for QpsSingleBeam {
    fn header(&self) -> &RecordHeader {
        &self.header
    }
}
