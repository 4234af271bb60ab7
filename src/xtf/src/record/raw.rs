//! Raw pass-through records
//!
//! - type 6: text captured from a serial port ([`RawSerial`])
//! - type 199: vendor-defined payload ([`RawCustom`])
//!
//! Both carry a variable payload. Its length is bounded by the declared
//! record length and by the bytes actually present, whichever is smaller.

use serde::Serialize;

use super::{read_prefix, record_view, FromBytes, Packet, RecordHeader};
use crate::cursor::fixed_str;
use crate::timestamp::{DateTimeFields, Precision};
use crate::Result;

const SERIAL_TEXT_OFFSET: usize = 30;
const CUSTOM_PAYLOAD_OFFSET: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawSerial {
    pub header: RecordHeader,
    pub julian_day: u16,
    pub time_tag: u32,
    /// Text length as declared by the writer
    pub string_size: u16,
    pub text: String,
}

impl FromBytes for RawSerial {
    const MIN_SIZE: usize = 64;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let (mut header, mut cur) = read_prefix(data, Self::MIN_SIZE)?;
        let date = DateTimeFields::read_date(&mut cur)?;
        let millis = cur.read_u8()?; // 21
        header.packet_time = date
            .with_subsecond(u32::from(millis))
            .compose(Precision::Millis);
        let julian_day = cur.read_u16()?; // 22
        let time_tag = cur.read_u32()?;
        let string_size = cur.read_u16()?; // 28

        // The declared record length wins over the string size, and the
        // buffer end wins over both
        let view = record_view(data, &header, SERIAL_TEXT_OFFSET);
        let available = view.len() - SERIAL_TEXT_OFFSET;
        let len = usize::from(string_size).min(available);
        let text = fixed_str(&view[SERIAL_TEXT_OFFSET..SERIAL_TEXT_OFFSET + len]);

        Ok(Self {
            header,
            julian_day,
            time_tag,
            string_size,
            text,
        })
    }
}

impl Packet for RawSerial {
    fn header(&self) -> &RecordHeader {
        &self.header
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawCustom {
    pub header: RecordHeader,
    pub manufacturer_id: u8,
    pub sonar_id: u16,
    pub packet_id: u16,
    pub ping_number: u32,
    pub time_tag: u32,
    pub number_customer_bytes: u32,
    #[serde(skip)]
    pub payload: Vec<u8>,
}

impl FromBytes for RawCustom {
    const MIN_SIZE: usize = 64;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let (mut header, mut cur) = read_prefix(data, Self::MIN_SIZE)?;
        let date = DateTimeFields::read_date(&mut cur)?;
        let hundredths = cur.read_u8()?; // 21
        header.packet_time = date
            .with_subsecond(u32::from(hundredths))
            .compose(Precision::Centis);
        cur.skip(6)?; // julian day and two unused words
        let ping_number = cur.read_u32()?; // 28
        let time_tag = cur.read_u32()?;
        let number_customer_bytes = cur.read_u32()?; // 36

        let view = record_view(data, &header, CUSTOM_PAYLOAD_OFFSET);
        let mut payload = &view[CUSTOM_PAYLOAD_OFFSET..];
        if number_customer_bytes > 0 {
            let cap = usize::try_from(number_customer_bytes).unwrap_or(usize::MAX);
            payload = &payload[..cap.min(payload.len())];
        }

        Ok(Self {
            // bytes 3-7 hold vendor ids rather than channel fields
            manufacturer_id: header.sub_channel,
            sonar_id: header.channels_to_follow,
            packet_id: u16::from_le_bytes([data[6], data[7]]),
            header,
            ping_number,
            time_tag,
            number_customer_bytes,
            payload: payload.to_vec(),
        })
    }
}

impl Packet for RawCustom {
    fn header(&self) -> &RecordHeader {
        &self.header
    }

    fn time_tag(&self) -> Option<u32> {
        Some(self.time_tag)
    }
}
