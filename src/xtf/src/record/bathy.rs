//! Processed bathymetry and snippet records
//!
//! These records reuse the 256-byte ping header and follow it with packed
//! fixed-size entries instead of channel blocks:
//! - type 17: [`BeamXyza`] soundings (31 bytes each)
//! - type 27: [`QpsMultiTxEntry`] beams (32 bytes each)
//! - type 28: [`QpsMbeEntry`] beams (48 bytes each)
//! - types 19/62: a [`BathySnippet0`] ping block, then one [`BathySnippet1`]
//!   header plus sample data per beam

use serde::Serialize;

use super::ping::{PingHeader, PING_HEADER_SIZE};
use super::{read_entries, record_view, FromBytes, Packet, RecordHeader};
use crate::cursor::ByteCursor;
use crate::{Error, Result};

fn ensure_len(data: &[u8], needed: usize) -> Result<()> {
    if data.len() < needed {
        return Err(Error::DataTooShort {
            needed,
            actual: data.len(),
        });
    }
    Ok(())
}

/// One processed sounding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeamXyza {
    pub offset_y: f64,
    pub offset_x: f64,
    pub depth: f32,
    pub time: f64,
    pub amplitude: i16,
    pub quality: u8,
}

impl FromBytes for BeamXyza {
    const MIN_SIZE: usize = 31;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        ensure_len(data, Self::MIN_SIZE)?;
        let mut cur = ByteCursor::new(data);
        Ok(Self {
            offset_y: cur.read_f64()?,
            offset_x: cur.read_f64()?,
            depth: cur.read_f32()?, // 16
            time: cur.read_f64()?,
            amplitude: cur.read_i16()?, // 28
            quality: cur.read_u8()?,
        })
    }
}

/// One beam of a QPS multibeam ping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QpsMbeEntry {
    pub id: i32,
    pub intensity: f64,
    pub quality: i32,
    pub two_way_travel_time: f64,
    pub delta_time: f64,
    pub beam_angle: f64,
    pub tilt_angle: f64,
}

impl FromBytes for QpsMbeEntry {
    const MIN_SIZE: usize = 48;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        ensure_len(data, Self::MIN_SIZE)?;
        let mut cur = ByteCursor::new(data);
        Ok(Self {
            id: cur.read_i32()?,
            intensity: cur.read_f64()?,
            quality: cur.read_i32()?, // 12
            two_way_travel_time: cur.read_f64()?,
            delta_time: cur.read_f64()?,
            beam_angle: cur.read_f64()?, // 32
            tilt_angle: cur.read_f64()?,
        })
    }
}

/// One beam of a QPS multi-transducer ping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QpsMultiTxEntry {
    pub id: i32,
    pub intensity: f32,
    pub quality: i32,
    pub two_way_travel_time: f32,
    pub delta_time: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub offset_z: f32,
}

impl FromBytes for QpsMultiTxEntry {
    const MIN_SIZE: usize = 32;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        ensure_len(data, Self::MIN_SIZE)?;
        let mut cur = ByteCursor::new(data);
        Ok(Self {
            id: cur.read_i32()?,
            intensity: cur.read_f32()?,
            quality: cur.read_i32()?,
            two_way_travel_time: cur.read_f32()?,
            delta_time: cur.read_f32()?, // 16
            offset_x: cur.read_f32()?,
            offset_y: cur.read_f32()?,
            offset_z: cur.read_f32()?,
        })
    }
}

/// A ping header followed by packed beam entries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeamRecord<T> {
    pub header: PingHeader,
    pub beams: Vec<T>,
}

impl<T: FromBytes> BeamRecord<T> {
    /// Decode the header and as many whole entries as the record holds
    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = PingHeader::from_bytes(data)?;
        let view = record_view(data, &header.header, PING_HEADER_SIZE);
        let beams = view
            .get(PING_HEADER_SIZE..)
            .map(read_entries::<T>)
            .unwrap_or_default();
        Ok(Self { header, beams })
    }
}

impl<T> Packet for BeamRecord<T> {
    fn header(&self) -> &RecordHeader {
        &self.header.header
    }
}

/// Snippet ping block ("SNP0")
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BathySnippet0 {
    pub header_size: u16,
    pub data_size: u16,
    pub ping_number: u32,
    pub seconds: u32,
    pub milliseconds: u32,
    pub latency: u16,
    pub sonar_id: [u16; 2],
    pub sonar_model: u16,
    pub frequency: u16,
    pub sound_speed: u16,
    pub sample_rate: u16,
    pub ping_rate: u16,
    pub range: u16,
    pub power: u16,
    pub gain: u16,
    pub pulse_width: u16,
    pub spread: u16,
    pub absorb: u16,
    pub projector_type: u16,
    pub projector_width: u16,
    pub spacing_numerator: u16,
    pub spacing_denominator: u16,
    pub projector_angle: i16,
    pub min_range: u16,
    pub max_range: u16,
    pub min_depth: u16,
    pub max_depth: u16,
    pub filters: u16,
    pub flags: u16,
    pub head_temperature: i16,
    pub beam_count: u16,
}

impl BathySnippet0 {
    pub const MAGIC: u32 = 0x534E_5030;
}

fn read_snippet_magic(cur: &mut ByteCursor<'_>, expected: u32) -> Result<()> {
    let magic = cur.read_u32()?;
    if magic != expected {
        return Err(Error::InvalidSnippetMagic(magic));
    }
    Ok(())
}

impl FromBytes for BathySnippet0 {
    const MIN_SIZE: usize = 74;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        ensure_len(data, Self::MIN_SIZE)?;
        let mut cur = ByteCursor::new(data);
        read_snippet_magic(&mut cur, Self::MAGIC)?;
        Ok(Self {
            header_size: cur.read_u16()?,
            data_size: cur.read_u16()?,
            ping_number: cur.read_u32()?, // 8
            seconds: cur.read_u32()?,
            milliseconds: cur.read_u32()?,
            latency: cur.read_u16()?, // 20
            sonar_id: [cur.read_u16()?, cur.read_u16()?],
            sonar_model: cur.read_u16()?, // 26
            frequency: cur.read_u16()?,
            sound_speed: cur.read_u16()?,
            sample_rate: cur.read_u16()?,
            ping_rate: cur.read_u16()?,
            range: cur.read_u16()?, // 36
            power: cur.read_u16()?,
            gain: cur.read_u16()?,
            pulse_width: cur.read_u16()?,
            spread: cur.read_u16()?,
            absorb: cur.read_u16()?,
            projector_type: cur.read_u16()?, // 48
            projector_width: cur.read_u16()?,
            spacing_numerator: cur.read_u16()?,
            spacing_denominator: cur.read_u16()?,
            projector_angle: cur.read_i16()?, // 56
            min_range: cur.read_u16()?,
            max_range: cur.read_u16()?,
            min_depth: cur.read_u16()?,
            max_depth: cur.read_u16()?,
            filters: cur.read_u16()?,
            flags: cur.read_u16()?, // 68
            head_temperature: cur.read_i16()?,
            beam_count: cur.read_u16()?,
        })
    }
}

/// Snippet beam header ("SNP1")
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BathySnippet1 {
    pub header_size: u16,
    pub data_size: u16,
    pub ping_number: u32,
    pub beam: u16,
    pub snip_samples: u16,
    pub gain_start: u16,
    pub gain_end: u16,
    pub frag_offset: u16,
    pub frag_samples: u16,
}

impl BathySnippet1 {
    pub const MAGIC: u32 = 0x534E_5031;
}

impl FromBytes for BathySnippet1 {
    const MIN_SIZE: usize = 24;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        ensure_len(data, Self::MIN_SIZE)?;
        let mut cur = ByteCursor::new(data);
        read_snippet_magic(&mut cur, Self::MAGIC)?;
        Ok(Self {
            header_size: cur.read_u16()?,
            data_size: cur.read_u16()?,
            ping_number: cur.read_u32()?,
            beam: cur.read_u16()?, // 12
            snip_samples: cur.read_u16()?,
            gain_start: cur.read_u16()?,
            gain_end: cur.read_u16()?,
            frag_offset: cur.read_u16()?,
            frag_samples: cur.read_u16()?,
        })
    }
}

/// One snippet beam: its header and sample bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnippetBeam {
    pub header: BathySnippet1,
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// Ping header, snippet ping block and snippet beams
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnippetRecord {
    pub header: PingHeader,
    /// `None` when the block after the ping header is not a valid SNP0
    pub snippet: Option<BathySnippet0>,
    pub beams: Vec<SnippetBeam>,
}

impl SnippetRecord {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = PingHeader::from_bytes(data)?;
        let view = record_view(data, &header.header, PING_HEADER_SIZE);
        let body = view.get(PING_HEADER_SIZE..).unwrap_or_default();

        let Ok(snippet) = BathySnippet0::from_bytes(body) else {
            return Ok(Self {
                header,
                snippet: None,
                beams: Vec::new(),
            });
        };

        let mut beams = Vec::new();
        let mut pos = BathySnippet0::MIN_SIZE;
        for _ in 0..snippet.beam_count {
            let Some(Ok(beam)) = body.get(pos..).map(BathySnippet1::from_bytes) else {
                break;
            };
            pos += BathySnippet1::MIN_SIZE;
            let end = (pos + usize::from(beam.data_size)).min(body.len());
            beams.push(SnippetBeam {
                data: body[pos..end].to_vec(),
                header: beam,
            });
            pos = end;
        }

        Ok(Self {
            header,
            snippet: Some(snippet),
            beams,
        })
    }
}

impl Packet for SnippetRecord {
    fn header(&self) -> &RecordHeader {
        &self.header.header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ping::testutil::ping_bytes;
    use crate::record::testutil::put;

    fn finish(mut data: Vec<u8>) -> Vec<u8> {
        let len = data.len() as u32;
        put(&mut data, 10, len.to_le_bytes());
        data
    }

    fn xyza(depth: f32, quality: u8) -> Vec<u8> {
        let mut entry = vec![0u8; 31];
        put(&mut entry, 0, 1.5f64.to_le_bytes());
        put(&mut entry, 8, (-2.5f64).to_le_bytes());
        put(&mut entry, 16, depth.to_le_bytes());
        put(&mut entry, 20, 0.125f64.to_le_bytes());
        put(&mut entry, 28, (-300i16).to_le_bytes());
        entry[30] = quality;
        entry
    }

    #[test]
    fn test_xyza_record() {
        let mut data = ping_bytes(17, 0, PING_HEADER_SIZE);
        data.extend(xyza(10.0, 1));
        data.extend(xyza(12.5, 2));
        data.extend([0u8; 7]); // partial trailing entry
        let data = finish(data);

        let rec = BeamRecord::<BeamXyza>::decode(&data).unwrap();
        assert_eq!(rec.header_type(), 17);
        assert_eq!(rec.beams.len(), 2);
        assert_eq!(rec.beams[0].offset_y, 1.5);
        assert_eq!(rec.beams[0].offset_x, -2.5);
        assert_eq!(rec.beams[1].depth, 12.5);
        assert_eq!(rec.beams[1].time, 0.125);
        assert_eq!(rec.beams[1].amplitude, -300);
        assert_eq!(rec.beams[1].quality, 2);
    }

    #[test]
    fn test_qps_entries() {
        let mut mbe = vec![0u8; 48];
        put(&mut mbe, 0, (-4i32).to_le_bytes());
        put(&mut mbe, 12, 99i32.to_le_bytes());
        put(&mut mbe, 40, 0.75f64.to_le_bytes());
        let entry = QpsMbeEntry::from_bytes(&mbe).unwrap();
        assert_eq!(entry.id, -4);
        assert_eq!(entry.quality, 99);
        assert_eq!(entry.tilt_angle, 0.75);

        let mut tx = vec![0u8; 32];
        put(&mut tx, 4, 3.0f32.to_le_bytes());
        put(&mut tx, 28, (-1.0f32).to_le_bytes());
        let entry = QpsMultiTxEntry::from_bytes(&tx).unwrap();
        assert_eq!(entry.intensity, 3.0);
        assert_eq!(entry.offset_z, -1.0);

        assert!(QpsMultiTxEntry::from_bytes(&tx[..31]).is_err());
    }

    #[test]
    fn test_beams_limited_to_declared_length() {
        let mut data = ping_bytes(28, 0, PING_HEADER_SIZE);
        data.extend(vec![0u8; 48 * 3]);
        // declare only two entries
        let len = (PING_HEADER_SIZE + 96) as u32;
        put(&mut data, 10, len.to_le_bytes());

        let rec = BeamRecord::<QpsMbeEntry>::decode(&data).unwrap();
        assert_eq!(rec.beams.len(), 2);
    }

    fn snp0(beam_count: u16) -> Vec<u8> {
        let mut block = vec![0u8; 74];
        put(&mut block, 0, BathySnippet0::MAGIC.to_le_bytes());
        put(&mut block, 4, 74u16.to_le_bytes());
        put(&mut block, 8, 321u32.to_le_bytes());
        put(&mut block, 56, (-15i16).to_le_bytes());
        put(&mut block, 72, beam_count.to_le_bytes());
        block
    }

    fn snp1(beam: u16, data: &[u8]) -> Vec<u8> {
        let mut block = vec![0u8; 24];
        put(&mut block, 0, BathySnippet1::MAGIC.to_le_bytes());
        put(&mut block, 4, 24u16.to_le_bytes());
        put(&mut block, 6, (data.len() as u16).to_le_bytes());
        put(&mut block, 12, beam.to_le_bytes());
        block.extend_from_slice(data);
        block
    }

    #[test]
    fn test_snippet_record() {
        let mut data = ping_bytes(19, 0, PING_HEADER_SIZE);
        data.extend(snp0(3));
        data.extend(snp1(0, &[1, 2, 3]));
        data.extend(snp1(1, &[4, 5]));
        let data = finish(data);

        let rec = SnippetRecord::decode(&data).unwrap();
        let snippet = rec.snippet.unwrap();
        assert_eq!(snippet.ping_number, 321);
        assert_eq!(snippet.projector_angle, -15);
        assert_eq!(snippet.beam_count, 3);
        // the third beam is missing from the record
        assert_eq!(rec.beams.len(), 2);
        assert_eq!(rec.beams[0].data, vec![1, 2, 3]);
        assert_eq!(rec.beams[1].header.beam, 1);
        assert_eq!(rec.beams[1].data, vec![4, 5]);
    }

    #[test]
    fn test_snippet_bad_magic() {
        let mut block = snp0(1);
        block[0] = b'X';
        let mut data = ping_bytes(62, 0, PING_HEADER_SIZE);
        data.extend(block.clone());
        let data = finish(data);

        let rec = SnippetRecord::decode(&data).unwrap();
        assert!(rec.snippet.is_none());
        assert!(rec.beams.is_empty());
        assert!(matches!(
            BathySnippet0::from_bytes(&block),
            Err(Error::InvalidSnippetMagic(_))
        ));
    }

    #[test]
    fn test_snippet_data_clipped() {
        let mut data = ping_bytes(19, 0, PING_HEADER_SIZE);
        data.extend(snp0(1));
        let mut beam = snp1(0, &[7; 10]);
        beam.truncate(24 + 4);
        data.extend(beam);
        let data = finish(data);

        let rec = SnippetRecord::decode(&data).unwrap();
        assert_eq!(rec.beams[0].header.data_size, 10);
        assert_eq!(rec.beams[0].data, vec![7; 4]);
    }
}
