//! Record decoding
//!
//! Every record starts with the same 14-byte prefix ([`RecordHeader`]); its
//! header type selects one of a closed set of body layouts ([`RecordKind`]).
//! [`decode_record`] performs the full decode of one record and returns it
//! as a [`Record`].
//!
//! Decoders follow one protocol:
//! 1. Reject buffers shorter than the record's minimum size
//! 2. Reject a prefix without the magic number
//! 3. Read the prefix, then the body fields at their fixed offsets
//!
//! The declared record length is stored as read. It decides where the next
//! record starts and is never recomputed from content.

mod attitude;
mod bathy;
mod gyro;
mod navigation;
mod notes;
pub(crate) mod ping;
mod qps;
mod raw;
mod sensor;

pub use attitude::Attitude;
pub use bathy::{
    BathySnippet0, BathySnippet1, BeamRecord, BeamXyza, QpsMbeEntry, QpsMultiTxEntry,
    SnippetBeam, SnippetRecord,
};
pub use gyro::Gyro;
pub use navigation::{Navigation, PosRawNavigation};
pub use notes::{NoteSubChannel, Notes};
pub use ping::{PingChannel, PingChannelHeader, PingHeader, PingRecord, PING_CHANNEL_HEADER_SIZE};
pub use qps::QpsSingleBeam;
pub use raw::{RawCustom, RawSerial};
pub use sensor::HighSpeedSensor;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::channel::ChannelDescriptor;
use crate::cursor::ByteCursor;
use crate::options::ScanOptions;
use crate::{Error, Result, MAGIC_NUMBER, RECORD_PREFIX_SIZE};

/// Fixed-size structures decoded from the start of a slice
pub trait FromBytes: Sized {
    /// Smallest slice the decoder accepts
    const MIN_SIZE: usize;

    fn from_bytes(data: &[u8]) -> Result<Self>;
}

/// Common view over every decoded record
pub trait Packet {
    fn header(&self) -> &RecordHeader;

    fn header_type(&self) -> u8 {
        self.header().header_type
    }

    fn magic_number(&self) -> u16 {
        self.header().magic_number
    }

    fn sub_channel(&self) -> u8 {
        self.header().sub_channel
    }

    fn channels_to_follow(&self) -> u16 {
        self.header().channels_to_follow
    }

    fn record_length(&self) -> u32 {
        self.header().record_length
    }

    fn packet_time(&self) -> Option<NaiveDateTime> {
        self.header().packet_time
    }

    /// Source time tag in milliseconds, for records that carry one
    fn time_tag(&self) -> Option<u32> {
        None
    }
}

/// The 14-byte prefix shared by all records, plus the record's time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordHeader {
    pub magic_number: u16,
    pub header_type: u8,
    pub sub_channel: u8,
    pub channels_to_follow: u16,
    /// Total record length, prefix included
    pub record_length: u32,
    pub packet_time: Option<NaiveDateTime>,
}

impl RecordHeader {
    /// Read the prefix without checking the magic number
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cur = ByteCursor::new(data);
        Self::read(&mut cur)
    }

    fn read(cur: &mut ByteCursor<'_>) -> Result<Self> {
        if cur.remaining() < RECORD_PREFIX_SIZE {
            return Err(Error::DataTooShort {
                needed: RECORD_PREFIX_SIZE,
                actual: cur.remaining(),
            });
        }
        let magic_number = cur.read_u16()?;
        let header_type = cur.read_u8()?;
        let sub_channel = cur.read_u8()?;
        let channels_to_follow = cur.read_u16()?;
        cur.skip(4)?; // reserved
        let record_length = cur.read_u32()?;
        Ok(Self {
            magic_number,
            header_type,
            sub_channel,
            channels_to_follow,
            record_length,
            packet_time: None,
        })
    }

    pub fn has_valid_magic(&self) -> bool {
        self.magic_number == MAGIC_NUMBER
    }

    pub fn kind(&self) -> RecordKind {
        RecordKind::from_type(self.header_type)
    }
}

/// Check the minimum size and magic number, then read the prefix
///
/// Returns the prefix and a cursor positioned at byte 14.
pub(crate) fn read_prefix(data: &[u8], min_size: usize) -> Result<(RecordHeader, ByteCursor<'_>)> {
    if data.len() < min_size {
        return Err(Error::DataTooShort {
            needed: min_size,
            actual: data.len(),
        });
    }
    let mut cur = ByteCursor::new(data);
    let header = RecordHeader::read(&mut cur)?;
    if !header.has_valid_magic() {
        return Err(Error::InvalidMagic(header.magic_number));
    }
    Ok((header, cur))
}

/// Slice of `data` covered by the record's declared length
///
/// Never shorter than `floor` (when available) and never past the buffer.
pub(crate) fn record_view<'a>(
    data: &'a [u8],
    header: &RecordHeader,
    floor: usize,
) -> &'a [u8] {
    let declared = usize::try_from(header.record_length).unwrap_or(usize::MAX);
    &data[..declared.max(floor).min(data.len())]
}

/// Decode packed fixed-size entries, ignoring a trailing partial entry
pub(crate) fn read_entries<T: FromBytes>(data: &[u8]) -> Vec<T> {
    data.chunks_exact(T::MIN_SIZE)
        .filter_map(|chunk| T::from_bytes(chunk).ok())
        .collect()
}

/// Body layout selected by a header type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Ping,
    BathyXyza,
    Snippet,
    QpsMultiTx,
    QpsMultibeam,
    Notes,
    Attitude,
    RawSerial,
    HighSpeedSensor,
    Gyro,
    QpsSingleBeam,
    Navigation,
    PosRawNavigation,
    RawCustom,
    Base,
}

impl RecordKind {
    pub fn from_type(header_type: u8) -> Self {
        match header_type {
            0 | 2 | 4 | 5 | 8 | 9 | 10 | 14 | 16 | 18 | 22 | 25 | 60 | 61 | 65 | 66 | 68 | 69
            | 73 => Self::Ping,
            17 => Self::BathyXyza,
            19 | 62 => Self::Snippet,
            27 => Self::QpsMultiTx,
            28 => Self::QpsMultibeam,
            1 => Self::Notes,
            3 | 103 => Self::Attitude,
            6 => Self::RawSerial,
            11 | 15 => Self::HighSpeedSensor,
            23 | 84 => Self::Gyro,
            26 => Self::QpsSingleBeam,
            42 | 100 => Self::Navigation,
            107 => Self::PosRawNavigation,
            199 => Self::RawCustom,
            _ => Self::Base,
        }
    }

    /// Records whose body starts with a full ping header
    pub fn has_ping_header(self) -> bool {
        matches!(
            self,
            Self::Ping | Self::BathyXyza | Self::Snippet | Self::QpsMultiTx | Self::QpsMultibeam
        )
    }
}

/// A record of unknown layout: only the common prefix is decoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasePacket {
    pub header: RecordHeader,
}

impl FromBytes for BasePacket {
    const MIN_SIZE: usize = RECORD_PREFIX_SIZE;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let (header, _) = read_prefix(data, Self::MIN_SIZE)?;
        Ok(Self { header })
    }
}

impl Packet for BasePacket {
    fn header(&self) -> &RecordHeader {
        &self.header
    }
}

/// A fully decoded record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Ping(PingRecord),
    BathyXyza(BeamRecord<BeamXyza>),
    Snippet(SnippetRecord),
    QpsMultiTx(BeamRecord<QpsMultiTxEntry>),
    QpsMultibeam(BeamRecord<QpsMbeEntry>),
    Notes(Notes),
    Attitude(Attitude),
    RawSerial(RawSerial),
    HighSpeedSensor(HighSpeedSensor),
    Gyro(Gyro),
    QpsSingleBeam(QpsSingleBeam),
    Navigation(Navigation),
    PosRawNavigation(PosRawNavigation),
    RawCustom(RawCustom),
    Base(BasePacket),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Ping(_) => RecordKind::Ping,
            Record::BathyXyza(_) => RecordKind::BathyXyza,
            Record::Snippet(_) => RecordKind::Snippet,
            Record::QpsMultiTx(_) => RecordKind::QpsMultiTx,
            Record::QpsMultibeam(_) => RecordKind::QpsMultibeam,
            Record::Notes(_) => RecordKind::Notes,
            Record::Attitude(_) => RecordKind::Attitude,
            Record::RawSerial(_) => RecordKind::RawSerial,
            Record::HighSpeedSensor(_) => RecordKind::HighSpeedSensor,
            Record::Gyro(_) => RecordKind::Gyro,
            Record::QpsSingleBeam(_) => RecordKind::QpsSingleBeam,
            Record::Navigation(_) => RecordKind::Navigation,
            Record::PosRawNavigation(_) => RecordKind::PosRawNavigation,
            Record::RawCustom(_) => RecordKind::RawCustom,
            Record::Base(_) => RecordKind::Base,
        }
    }

    fn as_packet(&self) -> &dyn Packet {
        match self {
            Record::Ping(r) => r,
            Record::BathyXyza(r) => r,
            Record::Snippet(r) => r,
            Record::QpsMultiTx(r) => r,
            Record::QpsMultibeam(r) => r,
            Record::Notes(r) => r,
            Record::Attitude(r) => r,
            Record::RawSerial(r) => r,
            Record::HighSpeedSensor(r) => r,
            Record::Gyro(r) => r,
            Record::QpsSingleBeam(r) => r,
            Record::Navigation(r) => r,
            Record::PosRawNavigation(r) => r,
            Record::RawCustom(r) => r,
            Record::Base(r) => r,
        }
    }
}

impl Packet for Record {
    fn header(&self) -> &RecordHeader {
        self.as_packet().header()
    }

    fn time_tag(&self) -> Option<u32> {
        self.as_packet().time_tag()
    }
}

/// Fully decode the record at the start of `data`
///
/// `channels` are the file's channel descriptors; ping records look up the
/// sample layout of their n-th channel block at `channels[n]`.
pub fn decode_record(
    data: &[u8],
    channels: &[ChannelDescriptor],
    options: &ScanOptions,
) -> Result<Record> {
    let prefix = RecordHeader::parse(data)?;
    let record = match prefix.kind() {
        RecordKind::Ping => Record::Ping(PingRecord::decode(data, channels, options)?),
        RecordKind::BathyXyza => Record::BathyXyza(BeamRecord::decode(data)?),
        RecordKind::Snippet => Record::Snippet(SnippetRecord::decode(data)?),
        RecordKind::QpsMultiTx => Record::QpsMultiTx(BeamRecord::decode(data)?),
        RecordKind::QpsMultibeam => Record::QpsMultibeam(BeamRecord::decode(data)?),
        RecordKind::Notes => Record::Notes(Notes::from_bytes(data)?),
        RecordKind::Attitude => Record::Attitude(Attitude::from_bytes(data)?),
        RecordKind::RawSerial => Record::RawSerial(RawSerial::from_bytes(data)?),
        RecordKind::HighSpeedSensor => Record::HighSpeedSensor(HighSpeedSensor::from_bytes(data)?),
        RecordKind::Gyro => Record::Gyro(Gyro::from_bytes(data)?),
        RecordKind::QpsSingleBeam => Record::QpsSingleBeam(QpsSingleBeam::from_bytes(data)?),
        RecordKind::Navigation => Record::Navigation(Navigation::from_bytes(data)?),
        RecordKind::PosRawNavigation => {
            Record::PosRawNavigation(PosRawNavigation::from_bytes(data)?)
        }
        RecordKind::RawCustom => Record::RawCustom(RawCustom::from_bytes(data)?),
        RecordKind::Base => Record::Base(BasePacket::from_bytes(data)?),
    };
    Ok(record)
}


#[cfg(test)]
mod tests {
    use super::testutil::*;
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_prefix_fields() {
        let mut data = record(42, 64);
        data[3] = 7;
        put(&mut data, 4, 3u16.to_le_bytes());
        let header = RecordHeader::parse(&data).unwrap();
        assert_eq!(header.magic_number, MAGIC_NUMBER);
        assert_eq!(header.header_type, 42);
        assert_eq!(header.sub_channel, 7);
        assert_eq!(header.channels_to_follow, 3);
        assert_eq!(header.record_length, 64);
        assert_eq!(header.kind(), RecordKind::Navigation);
    }

    #[test]
    fn test_parse_ignores_magic() {
        let mut data = record(1, 14);
        data[0] = 0;
        let header = RecordHeader::parse(&data).unwrap();
        assert!(!header.has_valid_magic());
        assert_eq!(
            BasePacket::from_bytes(&data),
            Err(Error::InvalidMagic(0xFA00))
        );
    }

    #[test]
    fn test_size_checked_before_magic() {
        let data = [0u8; 20];
        assert_eq!(
            read_prefix(&data, 64).unwrap_err(),
            Error::DataTooShort {
                needed: 64,
                actual: 20
            }
        );
    }

    #[test]
    fn test_kind_dispatch_table() {
        let ping = [0u8, 2, 4, 5, 8, 9, 10, 14, 16, 18, 22, 25, 60, 61, 65, 66, 68, 69, 73];
        for t in ping {
            assert_eq!(RecordKind::from_type(t), RecordKind::Ping, "type {t}");
        }
        assert_eq!(RecordKind::from_type(17), RecordKind::BathyXyza);
        assert_eq!(RecordKind::from_type(62), RecordKind::Snippet);
        assert_eq!(RecordKind::from_type(103), RecordKind::Attitude);
        assert_eq!(RecordKind::from_type(84), RecordKind::Gyro);
        assert_eq!(RecordKind::from_type(100), RecordKind::Navigation);
        assert_eq!(RecordKind::from_type(199), RecordKind::RawCustom);
        assert_eq!(RecordKind::from_type(7), RecordKind::Base);
        assert_eq!(RecordKind::from_type(255), RecordKind::Base);
        assert!(RecordKind::Snippet.has_ping_header());
        assert!(!RecordKind::Notes.has_ping_header());
    }

    #[test]
    fn test_decode_base_record() {
        let data = record(50, 40);
        let rec = decode_record(&data, &[], &ScanOptions::default()).unwrap();
        assert_eq!(rec.kind(), RecordKind::Base);
        assert_eq!(rec.header_type(), 50);
        assert_eq!(rec.record_length(), 40);
        assert_eq!(rec.packet_time(), None);
    }

    #[test]
    fn test_record_view_bounds() {
        let data = record(0, 300);
        let mut header = RecordHeader::parse(&data).unwrap();
        assert_eq!(record_view(&data, &header, 256).len(), 300);
        header.record_length = 100;
        assert_eq!(record_view(&data, &header, 256).len(), 256);
        header.record_length = 10_000;
        assert_eq!(record_view(&data, &header, 256).len(), 300);
        assert_eq!(record_view(&data[..50], &header, 256).len(), 50);
    }

    #[test]
    fn test_record_view_outlives_header() {
        let data = record(1, 300);
        let view = {
            let header = RecordHeader::parse(&data).unwrap();
            record_view(&data, &header, 14)
        };
        assert_eq!(view.len(), 300);
        assert_eq!(&view[..2], &MAGIC_NUMBER.to_le_bytes());
    }

    #[test]
    fn test_every_decoder_rejects_short_buffers() {
        let options = ScanOptions::default();
        for header_type in 0..=255u8 {
            let full = record(header_type, 512);
            for len in 0..RECORD_PREFIX_SIZE {
                assert!(
                    decode_record(&full[..len], &[], &options).is_err(),
                    "type {header_type} len {len}"
                );
            }
        }
    }

    #[test]
    fn test_corrupted_magic_rejected_for_every_type() {
        let options = ScanOptions::default();
        for header_type in 0..=255u8 {
            let mut data = record(header_type, 512);
            data[0] = 0x00;
            data[1] = 0x00;
            assert_eq!(
                decode_record(&data, &[], &options),
                Err(Error::InvalidMagic(0)),
                "type {header_type}"
            );
        }
    }

    #[test]
    fn test_random_buffers_never_panic() {
        let mut rng = StdRng::seed_from_u64(0x7F0);
        let options = ScanOptions::default();
        for _ in 0..2000 {
            let len = rng.gen_range(0..600);
            let mut data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            if len >= 3 && rng.gen_bool(0.7) {
                data[0..2].copy_from_slice(&MAGIC_NUMBER.to_le_bytes());
            }
            let first = decode_record(&data, &[], &options);
            let second = decode_record(&data, &[], &options);
            // NaN fields make PartialEq unreliable, Debug output is stable
            assert_eq!(format!("{first:?}"), format!("{second:?}"));
        }
    }
}
