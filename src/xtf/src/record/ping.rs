//! Sonar ping records
//!
//! Layout:
//! - Bytes 0-255: [`PingHeader`] (245 bytes used, padded to 256)
//! - For each of `channels_to_follow` channels:
//!   - 64 bytes: [`PingChannelHeader`]
//!   - samples x bytes-per-sample bytes of sample data
//!
//! Sample widths come from the file header's channel descriptors, matched
//! to channel blocks by position: the n-th block uses the n-th descriptor.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::trace;

use super::{read_prefix, record_view, FromBytes, Packet, RecordHeader};
use crate::channel::{ChannelDescriptor, Polarity};
use crate::cursor::ByteCursor;
use crate::options::ScanOptions;
use crate::samples::SampleBlock;
use crate::timestamp::{compose_time_of_day, DateTimeFields, Precision};
use crate::Result;

/// Space reserved for the ping header
pub const PING_HEADER_SIZE: usize = 256;

/// Space reserved for each channel header
pub const PING_CHANNEL_HEADER_SIZE: usize = 64;

/// Sensor, navigation and attitude values recorded with each ping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PingHeader {
    pub header: RecordHeader,
    pub julian_day: u16,
    pub event_number: u32,
    pub ping_number: u32,
    pub sound_velocity: f32,
    pub ocean_tide: f32,
    pub conductivity_frequency: f32,
    pub temperature_frequency: f32,
    pub pressure_frequency: f32,
    pub pressure_temperature: f32,
    pub conductivity: f32,
    pub water_temperature: f32,
    pub pressure: f32,
    pub computed_sound_velocity: f32,
    pub mag_x: f32,
    pub mag_y: f32,
    pub mag_z: f32,
    pub aux_values: [f32; 6],
    pub speed_log: f32,
    pub turbidity: f32,
    pub ship_speed: f32,
    pub ship_gyro: f32,
    pub ship_y: f64,
    pub ship_x: f64,
    pub ship_altitude: u16,
    pub ship_depth: u16,
    /// Time of the last navigation fix, on the ping's date
    pub fix_time: Option<NaiveDateTime>,
    pub sensor_speed: f32,
    pub kp: f32,
    pub sensor_y: f64,
    pub sensor_x: f64,
    pub sonar_status: u16,
    pub range_to_fish: u16,
    pub bearing_to_fish: u16,
    pub cable_out: u16,
    pub layback: f32,
    pub cable_tension: f32,
    pub sensor_depth: f32,
    pub sensor_primary_altitude: f32,
    pub sensor_aux_altitude: f32,
    pub sensor_pitch: f32,
    pub sensor_roll: f32,
    pub sensor_heading: f32,
    pub heave: f32,
    pub yaw: f32,
    pub attitude_time_tag: u32,
    pub distance_off_track: f32,
    pub nav_fix_milliseconds: u32,
    /// Acquisition computer clock, on the ping's date
    pub computer_clock_time: Option<NaiveDateTime>,
    pub fish_position_delta_x: i16,
    pub fish_position_delta_y: i16,
    pub fish_position_error_code: u8,
}

fn read_time_of_day(
    cur: &mut ByteCursor<'_>,
    packet_time: Option<NaiveDateTime>,
) -> Result<Option<NaiveDateTime>> {
    let hour = cur.read_u8()?;
    let minute = cur.read_u8()?;
    let second = cur.read_u8()?;
    let hundredths = cur.read_u8()?;
    Ok(compose_time_of_day(
        packet_time.map(|t| t.date()),
        hour,
        minute,
        second,
        u32::from(hundredths),
        Precision::Centis,
    ))
}

impl FromBytes for PingHeader {
    const MIN_SIZE: usize = 245;

    #[allow(clippy::too_many_lines)]
    fn from_bytes(data: &[u8]) -> Result<Self> {
        let (mut header, mut cur) = read_prefix(data, Self::MIN_SIZE)?;

        let date = DateTimeFields::read_date(&mut cur)?;
        let hundredths = cur.read_u8()?; // 21
        header.packet_time = date
            .with_subsecond(u32::from(hundredths))
            .compose(Precision::Centis);
        let julian_day = cur.read_u16()?;
        let event_number = cur.read_u32()?; // 24
        let ping_number = cur.read_u32()?;
        let sound_velocity = cur.read_f32()?;
        let ocean_tide = cur.read_f32()?;
        cur.skip(4)?; // 40 reserved
        let conductivity_frequency = cur.read_f32()?; // 44
        let temperature_frequency = cur.read_f32()?;
        let pressure_frequency = cur.read_f32()?;
        let pressure_temperature = cur.read_f32()?;
        let conductivity = cur.read_f32()?;
        let water_temperature = cur.read_f32()?;
        let pressure = cur.read_f32()?;
        let computed_sound_velocity = cur.read_f32()?;
        let mag_x = cur.read_f32()?; // 76
        let mag_y = cur.read_f32()?;
        let mag_z = cur.read_f32()?;
        let mut aux_values = [0.0f32; 6];
        for value in &mut aux_values {
            *value = cur.read_f32()?;
        }
        let speed_log = cur.read_f32()?; // 112
        let turbidity = cur.read_f32()?;
        let ship_speed = cur.read_f32()?;
        let ship_gyro = cur.read_f32()?;
        let ship_y = cur.read_f64()?; // 128
        let ship_x = cur.read_f64()?;
        let ship_altitude = cur.read_u16()?; // 144
        let ship_depth = cur.read_u16()?;
        let fix_time = read_time_of_day(&mut cur, header.packet_time)?; // 148
        let sensor_speed = cur.read_f32()?; // 152
        let kp = cur.read_f32()?;
        let sensor_y = cur.read_f64()?; // 160
        let sensor_x = cur.read_f64()?;
        let sonar_status = cur.read_u16()?; // 176
        let range_to_fish = cur.read_u16()?;
        let bearing_to_fish = cur.read_u16()?;
        let cable_out = cur.read_u16()?;
        let layback = cur.read_f32()?; // 184
        let cable_tension = cur.read_f32()?;
        let sensor_depth = cur.read_f32()?;
        let sensor_primary_altitude = cur.read_f32()?;
        let sensor_aux_altitude = cur.read_f32()?;
        let sensor_pitch = cur.read_f32()?;
        let sensor_roll = cur.read_f32()?;
        let sensor_heading = cur.read_f32()?;
        let heave = cur.read_f32()?;
        let yaw = cur.read_f32()?;
        let attitude_time_tag = cur.read_u32()?; // 224
        let distance_off_track = cur.read_f32()?;
        let nav_fix_milliseconds = cur.read_u32()?;
        let computer_clock_time = read_time_of_day(&mut cur, header.packet_time)?; // 236
        let fish_position_delta_x = cur.read_i16()?; // 240
        let fish_position_delta_y = cur.read_i16()?;
        let fish_position_error_code = cur.read_u8()?; // 244

        Ok(Self {
            header,
            julian_day,
            event_number,
            ping_number,
            sound_velocity,
            ocean_tide,
            conductivity_frequency,
            temperature_frequency,
            pressure_frequency,
            pressure_temperature,
            conductivity,
            water_temperature,
            pressure,
            computed_sound_velocity,
            mag_x,
            mag_y,
            mag_z,
            aux_values,
            speed_log,
            turbidity,
            ship_speed,
            ship_gyro,
            ship_y,
            ship_x,
            ship_altitude,
            ship_depth,
            fix_time,
            sensor_speed,
            kp,
            sensor_y,
            sensor_x,
            sonar_status,
            range_to_fish,
            bearing_to_fish,
            cable_out,
            layback,
            cable_tension,
            sensor_depth,
            sensor_primary_altitude,
            sensor_aux_altitude,
            sensor_pitch,
            sensor_roll,
            sensor_heading,
            heave,
            yaw,
            attitude_time_tag,
            distance_off_track,
            nav_fix_milliseconds,
            computer_clock_time,
            fish_position_delta_x,
            fish_position_delta_y,
            fish_position_error_code,
        })
    }
}

impl Packet for PingHeader {
    fn header(&self) -> &RecordHeader {
        &self.header
    }
}

/// Per-channel settings preceding each block of samples
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PingChannelHeader {
    pub channel_number: u16,
    pub downsample_method: u16,
    pub slant_range: f32,
    pub ground_range: f32,
    pub time_delay: f32,
    pub time_duration: f32,
    pub seconds_per_ping: f32,
    pub processing_flags: u16,
    pub frequency: u16,
    pub initial_gain_code: u16,
    pub gain_code: u16,
    pub bandwidth: u16,
    pub contact_number: u32,
    pub contact_classification: u16,
    pub contact_sub_number: u8,
    pub contact_type: u8,
    pub number_samples: u32,
    pub millivolt_scale: u16,
    pub contact_time_off_track: f32,
    pub contact_close_number: u8,
    pub fixed_vsop: f32,
    pub weight: i16,
}

impl FromBytes for PingChannelHeader {
    const MIN_SIZE: usize = 60;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::MIN_SIZE {
            return Err(crate::Error::DataTooShort {
                needed: Self::MIN_SIZE,
                actual: data.len(),
            });
        }
        let mut cur = ByteCursor::new(data);
        let mut header = Self {
            channel_number: cur.read_u16()?,
            downsample_method: cur.read_u16()?,
            slant_range: cur.read_f32()?,
            ground_range: cur.read_f32()?,
            time_delay: cur.read_f32()?,
            time_duration: cur.read_f32()?,
            seconds_per_ping: cur.read_f32()?,
            processing_flags: cur.read_u16()?, // 24
            frequency: cur.read_u16()?,
            initial_gain_code: cur.read_u16()?,
            gain_code: cur.read_u16()?,
            bandwidth: cur.read_u16()?,
            contact_number: cur.read_u32()?, // 34
            contact_classification: cur.read_u16()?,
            contact_sub_number: cur.read_u8()?,
            contact_type: cur.read_u8()?,
            number_samples: cur.read_u32()?, // 42
            millivolt_scale: cur.read_u16()?,
            contact_time_off_track: cur.read_f32()?,
            contact_close_number: cur.read_u8()?, // 52
            ..Self::default()
        };
        cur.skip(1)?;
        header.fixed_vsop = cur.read_f32()?; // 54
        header.weight = cur.read_i16()?;
        Ok(header)
    }
}

/// One channel block of a ping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PingChannel {
    pub header: PingChannelHeader,
    pub samples: SampleBlock,
}

/// A ping header with its channel blocks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PingRecord {
    pub header: PingHeader,
    pub channels: Vec<PingChannel>,
}

impl PingRecord {
    /// Decode a ping and its `channels_to_follow` channel blocks
    ///
    /// Sample blocks are clipped to the record (and the buffer). Decoding
    /// stops early when fewer than 64 bytes remain for a channel header. A
    /// block with no matching descriptor is read with the channel header's
    /// own sample count, one unipolar byte per sample.
    pub fn decode(
        data: &[u8],
        descriptors: &[ChannelDescriptor],
        options: &ScanOptions,
    ) -> Result<Self> {
        let header = PingHeader::from_bytes(data)?;
        let view = record_view(data, &header.header, PING_HEADER_SIZE);

        let mut channels = Vec::new();
        let mut pos = PING_HEADER_SIZE;
        for index in 0..usize::from(header.header.channels_to_follow) {
            let Some(block) = view.get(pos..pos + PING_CHANNEL_HEADER_SIZE) else {
                trace!(index, pos, "Ping truncated before channel header");
                break;
            };
            let channel_header = PingChannelHeader::from_bytes(block)?;
            pos += PING_CHANNEL_HEADER_SIZE;

            let (bytes_per_sample, polarity, len) = match descriptors.get(index) {
                Some(desc) => (desc.bytes_per_sample, desc.polarity, desc.sample_block_len()),
                None => (
                    1,
                    Polarity::Unipolar,
                    u64::from(channel_header.number_samples),
                ),
            };
            let len = usize::try_from(len).unwrap_or(usize::MAX);
            let end = pos.saturating_add(len).min(view.len());
            let raw = &view[pos.min(end)..end];

            channels.push(PingChannel {
                header: channel_header,
                samples: SampleBlock::new(raw, bytes_per_sample, polarity, options.wide_samples),
            });
            pos = pos.saturating_add(len);
        }

        Ok(Self { header, channels })
    }
}

impl Packet for PingRecord {
    fn header(&self) -> &RecordHeader {
        &self.header.header
    }
}
