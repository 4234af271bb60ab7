//! Cheap record identification
//!
//! The scanner needs the type and length of every record, but the time only
//! for the statistics table. [`Sniff`] always reads the 14-byte prefix and,
//! when a full 256-byte window is available, runs the record's own decoder
//! to pull out its time.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::record::{
    Attitude, FromBytes, Gyro, HighSpeedSensor, Navigation, Notes, Packet, PingHeader,
    PosRawNavigation, QpsSingleBeam, RawCustom, RawSerial, RecordHeader, RecordKind,
};
use crate::Result;

/// Window handed to the full decoders
pub(crate) const SNIFF_WINDOW: usize = 256;

/// Prefix fields of one record plus its time, when cheaply available
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Sniff {
    pub magic_number: u16,
    pub header_type: u8,
    pub sub_channel: u8,
    pub channels_to_follow: u16,
    pub record_length: u32,
    pub packet_time: Option<NaiveDateTime>,
    /// Source time tag in milliseconds, for records that carry one
    pub time_tag: Option<u32>,
}

impl Sniff {
    /// Identify the record at the start of `data`
    ///
    /// Fails only when fewer than 14 bytes are available. The magic number
    /// is not checked here; see [`Sniff::is_valid`].
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut sniff = Self::prefix(data)?;
        if data.len() >= SNIFF_WINDOW && sniff.is_valid() {
            if let Some((packet_time, time_tag)) = timing(&data[..SNIFF_WINDOW], sniff.kind()) {
                sniff.packet_time = packet_time;
                sniff.time_tag = time_tag;
            }
        }
        Ok(sniff)
    }

    /// Read the 14-byte prefix only
    pub fn prefix(data: &[u8]) -> Result<Self> {
        let header = RecordHeader::parse(data)?;
        Ok(Self {
            magic_number: header.magic_number,
            header_type: header.header_type,
            sub_channel: header.sub_channel,
            channels_to_follow: header.channels_to_follow,
            record_length: header.record_length,
            packet_time: None,
            time_tag: None,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.magic_number == crate::MAGIC_NUMBER
    }

    pub fn kind(&self) -> RecordKind {
        RecordKind::from_type(self.header_type)
    }
}

type Timing = (Option<NaiveDateTime>, Option<u32>);

fn timing(window: &[u8], kind: RecordKind) -> Option<Timing> {
    match kind {
        RecordKind::Ping
        | RecordKind::BathyXyza
        | RecordKind::Snippet
        | RecordKind::QpsMultiTx
        | RecordKind::QpsMultibeam => time_of::<PingHeader>(window),
        RecordKind::Notes => time_of::<Notes>(window),
        RecordKind::Attitude => time_of::<Attitude>(window),
        RecordKind::RawSerial => time_of::<RawSerial>(window),
        RecordKind::HighSpeedSensor => time_of::<HighSpeedSensor>(window),
        RecordKind::Gyro => time_of::<Gyro>(window),
        RecordKind::QpsSingleBeam => time_of::<QpsSingleBeam>(window),
        RecordKind::Navigation => time_of::<Navigation>(window),
        RecordKind::PosRawNavigation => time_of::<PosRawNavigation>(window),
        RecordKind::RawCustom => time_of::<RawCustom>(window),
        RecordKind::Base => None,
    }
}

fn time_of<T: FromBytes + Packet>(window: &[u8]) -> Option<Timing> {
    T::from_bytes(window)
        .ok()
        .map(|packet| (packet.packet_time(), packet.time_tag()))
}
