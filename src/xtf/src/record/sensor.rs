//! High-speed sensor records (types 11 and 15)

use serde::Serialize;

use super::{read_prefix, FromBytes, Packet, RecordHeader};
use crate::timestamp::{DateTimeFields, Precision};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighSpeedSensor {
    pub header: RecordHeader,
    pub number_sensor_bytes: u32,
    pub relative_bathy_ping_number: u32,
}

impl FromBytes for HighSpeedSensor {
    const MIN_SIZE: usize = 31;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let (mut header, mut cur) = read_prefix(data, Self::MIN_SIZE)?;
        let date = DateTimeFields::read_date(&mut cur)?;
        let hundredths = cur.read_u16()?; // 21
        header.packet_time = date
            .with_subsecond(u32::from(hundredths))
            .compose(Precision::Centis);

        Ok(Self {
            header,
            number_sensor_bytes: cur.read_u32()?, // 23
            relative_bathy_ping_number: cur.read_u32()?,
        })
    }
}

impl Packet for HighSpeedSensor {
    fn header(&self) -> &RecordHeader {
        &self.header
    }
}
