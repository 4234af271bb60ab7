//! Heading sensor records (types 23 and 84)

use serde::Serialize;

use super::{read_prefix, FromBytes, Packet, RecordHeader};
use crate::timestamp::{DateTimeFields, Precision};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gyro {
    pub header: RecordHeader,
    pub source_epoch: u32,
    pub time_tag: u32,
    pub gyro: f32,
    pub timestamp_validity: u8,
}

impl FromBytes for Gyro {
    const MIN_SIZE: usize = 38;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let (mut header, mut cur) = read_prefix(data, Self::MIN_SIZE)?;
        let date = DateTimeFields::read_date(&mut cur)?;
        let micros = cur.read_u32()?; // 21
        header.packet_time = date.with_subsecond(micros).compose(Precision::Micros);

        Ok(Self {
            header,
            source_epoch: cur.read_u32()?, // 25
            time_tag: cur.read_u32()?,
            gyro: cur.read_f32()?, // 33
            timestamp_validity: cur.read_u8()?,
        })
    }
}

impl Packet for Gyro {
    fn header(&self) -> &RecordHeader {
        &self.header
    }

    fn time_tag(&self) -> Option<u32> {
        Some(self.time_tag)
    }
}
