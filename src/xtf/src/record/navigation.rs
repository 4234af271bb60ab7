//! Navigation records
//!
//! - types 42 and 100: source time-stamped position ([`Navigation`])
//! - type 107: raw position with attitude ([`PosRawNavigation`])

use serde::Serialize;

use super::{read_prefix, FromBytes, Packet, RecordHeader};
use crate::timestamp::{DateTimeFields, Precision};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Navigation {
    pub header: RecordHeader,
    pub source_epoch: u32,
    pub time_tag: u32,
    pub raw_y: f64,
    pub raw_x: f64,
    pub raw_altitude: f64,
    pub timestamp_validity: u8,
}

impl FromBytes for Navigation {
    const MIN_SIZE: usize = 58;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let (mut header, mut cur) = read_prefix(data, Self::MIN_SIZE)?;
        let date = DateTimeFields::read_date(&mut cur)?;
        let micros = cur.read_u32()?; // 21
        header.packet_time = date.with_subsecond(micros).compose(Precision::Micros);

        Ok(Self {
            header,
            source_epoch: cur.read_u32()?, // 25
            time_tag: cur.read_u32()?,
            raw_y: cur.read_f64()?, // 33
            raw_x: cur.read_f64()?,
            raw_altitude: cur.read_f64()?,
            timestamp_validity: cur.read_u8()?, // 57
        })
    }
}

impl Packet for Navigation {
    fn header(&self) -> &RecordHeader {
        &self.header
    }

    fn time_tag(&self) -> Option<u32> {
        Some(self.time_tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PosRawNavigation {
    pub header: RecordHeader,
    pub raw_y: f64,
    pub raw_x: f64,
    pub raw_altitude: f64,
    pub pitch: f32,
    pub roll: f32,
    pub heave: f32,
    pub heading: f32,
}

impl FromBytes for PosRawNavigation {
    const MIN_SIZE: usize = 64;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let (mut header, mut cur) = read_prefix(data, Self::MIN_SIZE)?;
        let date = DateTimeFields::read_date(&mut cur)?;
        let ten_thousandths = cur.read_u16()?; // 21
        header.packet_time = date
            .with_subsecond(u32::from(ten_thousandths))
            .compose(Precision::TenThousandths);

        Ok(Self {
            header,
            raw_y: cur.read_f64()?, // 23
            raw_x: cur.read_f64()?,
            raw_altitude: cur.read_f64()?,
            pitch: cur.read_f32()?, // 47
            roll: cur.read_f32()?,
            heave: cur.read_f32()?,
            heading: cur.read_f32()?,
        })
    }
}

impl Packet for PosRawNavigation {
    fn header(&self) -> &RecordHeader {
        &self.header
    }
}
