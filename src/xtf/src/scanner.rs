//! Single-pass record indexing
//!
//! Starting right after the header region, the scanner walks the buffer
//! record by record:
//!
//! - More than 256 bytes left: sniff the record. A valid magic number with a
//!   declared length between 14 bytes and the bytes left is indexed and
//!   skipped over. Anything else starts a search for the next magic number.
//! - 64 to 256 bytes left: one last prefix-only sniff, then stop.
//! - Fewer than 64 bytes left: stop.
//!
//! Malformed records never end the scan early; at worst a corrupt region
//! is searched byte by byte for the next candidate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use memchr::memmem;
use serde::Serialize;
use tracing::{debug, trace};

use crate::options::ScanOptions;
use crate::sniffer::{Sniff, SNIFF_WINDOW};
use crate::stats::Statistics;
use crate::{Result, MAGIC_NUMBER, RECORD_PREFIX_SIZE};

/// Smallest tail that still gets a final sniff
const TAIL_MIN: usize = 64;

/// Position of one record in the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub header_type: u8,
    /// Offset of the record's magic number
    pub offset: u64,
}

/// Why a scan stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanEnd {
    /// Reached the end of the buffer
    #[default]
    Exhausted,
    /// The cancel flag was raised
    Cancelled,
    /// `max_records` entries were indexed
    RecordLimit,
    /// No header region, nothing was scanned
    NoHeader,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanOutput {
    pub index: Vec<IndexEntry>,
    pub statistics: Statistics,
    pub end: ScanEnd,
}

pub struct Scanner<'a> {
    data: &'a [u8],
    options: ScanOptions,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> Scanner<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            options: ScanOptions::default(),
            cancel: None,
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Stop between records once `flag` is set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Index every record from `start` to the end of the buffer
    pub fn scan(&self, start: usize) -> ScanOutput {
        let total = self.data.len();
        let mut out = ScanOutput::default();
        let mut offset = start;

        loop {
            if self.cancelled() {
                debug!(offset, indexed = out.index.len(), "Scan cancelled");
                out.end = ScanEnd::Cancelled;
                break;
            }
            if self
                .options
                .max_records
                .is_some_and(|limit| out.index.len() >= limit)
            {
                debug!(offset, "Record limit reached");
                out.end = ScanEnd::RecordLimit;
                break;
            }

            let remaining = total.saturating_sub(offset);
            if remaining > SNIFF_WINDOW {
                let window = &self.data[offset..offset + SNIFF_WINDOW];
                match accept(Sniff::from_bytes(window), offset, remaining) {
                    Some(sniff) => {
                        record(&mut out, &sniff, offset);
                        offset += sniff.record_length as usize;
                    }
                    None => offset = self.resync(offset),
                }
            } else {
                if remaining >= TAIL_MIN {
                    let tail = &self.data[offset..];
                    if let Some(sniff) = accept(Sniff::prefix(tail), offset, remaining) {
                        record(&mut out, &sniff, offset);
                    }
                }
                break;
            }
        }

        out
    }

    /// Next offset after `offset` that could hold a full-window record
    ///
    /// Only offsets with more than 256 bytes left are candidates. Without
    /// one, the scan moves straight to the tail region.
    fn resync(&self, offset: usize) -> usize {
        let tail_start = self.data.len() - SNIFF_WINDOW;
        let haystack = &self.data[offset + 1..tail_start + 1];
        let next = memmem::find(haystack, &MAGIC_NUMBER.to_le_bytes())
            .map_or(tail_start, |at| offset + 1 + at);
        if next - offset > 1 {
            debug!(offset, skipped = next - offset, "Resynchronized");
        }
        next
    }
}

/// Keep a sniff only if it starts a plausible record
fn accept(sniff: Result<Sniff>, offset: usize, remaining: usize) -> Option<Sniff> {
    let sniff = sniff.ok().filter(Sniff::is_valid)?;
    let len = sniff.record_length as usize;
    if len < RECORD_PREFIX_SIZE || len > remaining {
        debug!(
            offset,
            header_type = sniff.header_type,
            record_length = sniff.record_length,
            remaining,
            "Rejected record length"
        );
        return None;
    }
    Some(sniff)
}

fn record(out: &mut ScanOutput, sniff: &Sniff, offset: usize) {
    trace!(
        offset,
        header_type = sniff.header_type,
        record_length = sniff.record_length,
        "Indexed record"
    );
    out.index.push(IndexEntry {
        header_type: sniff.header_type,
        offset: offset as u64,
    });
    out.statistics.add(sniff);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::testutil::record as record_bytes;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Byte-at-a-time scan loop without the accelerated search
    fn reference_scan(data: &[u8], start: usize) -> Vec<IndexEntry> {
        let mut index = Vec::new();
        let mut offset = start;
        loop {
            let remaining = data.len().saturating_sub(offset);
            if remaining > SNIFF_WINDOW {
                let sniff = Sniff::prefix(&data[offset..]).unwrap();
                let len = sniff.record_length as usize;
                if sniff.is_valid() && (RECORD_PREFIX_SIZE..=remaining).contains(&len) {
                    index.push(IndexEntry {
                        header_type: sniff.header_type,
                        offset: offset as u64,
                    });
                    offset += len;
                } else {
                    offset += 1;
                }
            } else {
                if remaining >= TAIL_MIN {
                    let sniff = Sniff::prefix(&data[offset..]).unwrap();
                    let len = sniff.record_length as usize;
                    if sniff.is_valid() && (RECORD_PREFIX_SIZE..=remaining).contains(&len) {
                        index.push(IndexEntry {
                            header_type: sniff.header_type,
                            offset: offset as u64,
                        });
                    }
                }
                return index;
            }
        }
    }

    fn records(layout: &[(u8, usize)]) -> Vec<u8> {
        layout
            .iter()
            .flat_map(|&(t, len)| record_bytes(t, len))
            .collect()
    }

    fn offsets(out: &ScanOutput) -> Vec<u64> {
        out.index.iter().map(|e| e.offset).collect()
    }

    #[test]
    fn test_back_to_back_records() {
        let data = records(&[(3, 300), (0, 400), (50, 100)]);
        let out = Scanner::new(&data).scan(0);
        assert_eq!(offsets(&out), vec![0, 300, 700]);
        assert_eq!(out.end, ScanEnd::Exhausted);
        assert_eq!(out.statistics.total(), 3);
    }

    #[test]
    fn test_garbage_between_records() {
        let mut data = records(&[(3, 300)]);
        data.extend_from_slice(&[0x11; 37]);
        data.extend(records(&[(1, 256), (42, 300)]));
        let out = Scanner::new(&data).scan(0);
        assert_eq!(offsets(&out), vec![0, 337, 593]);
    }

    #[test]
    fn test_zero_length_is_skipped() {
        let mut data = records(&[(3, 300), (3, 300)]);
        data[10..14].copy_from_slice(&0u32.to_le_bytes());
        data.extend(vec![0u8; 100]);
        let out = Scanner::new(&data).scan(0);
        assert_eq!(offsets(&out), vec![300]);
    }

    #[test]
    fn test_length_past_end_is_skipped() {
        let mut data = records(&[(3, 300), (3, 300)]);
        data[10..14].copy_from_slice(&100_000u32.to_le_bytes());
        let out = Scanner::new(&data).scan(0);
        assert_eq!(offsets(&out), vec![300]);
    }

    #[test]
    fn test_tail_record() {
        let data = records(&[(3, 400), (6, 64)]);
        let out = Scanner::new(&data).scan(0);
        assert_eq!(offsets(&out), vec![0, 400]);

        // a 63-byte tail is never sniffed
        let data = records(&[(3, 400), (6, 63)]);
        assert_eq!(offsets(&Scanner::new(&data).scan(0)), vec![0]);
    }

    #[test]
    fn test_single_tail_attempt() {
        // two small records in the tail: only the first is seen
        let data = records(&[(3, 400), (6, 100), (6, 100)]);
        let out = Scanner::new(&data).scan(0);
        assert_eq!(offsets(&out), vec![0, 400]);
    }

    #[test]
    fn test_start_past_end() {
        let data = records(&[(3, 300)]);
        let out = Scanner::new(&data).scan(5000);
        assert!(out.index.is_empty());
        assert_eq!(out.end, ScanEnd::Exhausted);
    }

    #[test]
    fn test_all_zero_buffer() {
        let data = vec![0u8; 64 * 1024];
        let out = Scanner::new(&data).scan(0);
        assert!(out.index.is_empty());
        assert!(out.statistics.is_empty());
    }

    #[test]
    fn test_random_buffers_terminate_with_increasing_offsets() {
        let mut rng = StdRng::seed_from_u64(0xFACE);
        for _ in 0..200 {
            let len = rng.gen_range(0..8192);
            let mut data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            for _ in 0..rng.gen_range(0..40) {
                if len < 16 {
                    break;
                }
                let at = rng.gen_range(0..len - 14);
                data[at..at + 2].copy_from_slice(&MAGIC_NUMBER.to_le_bytes());
                let declared: u32 = rng.gen_range(0..600);
                data[at + 10..at + 14].copy_from_slice(&declared.to_le_bytes());
            }
            let out = Scanner::new(&data).scan(0);
            assert!(out.index.windows(2).all(|w| w[0].offset < w[1].offset));
            assert_eq!(out.statistics.total(), out.index.len() as u64);
        }
    }

    #[test]
    fn test_resync_matches_reference_loop() {
        let mut rng = StdRng::seed_from_u64(64206);
        for _ in 0..300 {
            let len = rng.gen_range(256..6000);
            let mut data: Vec<u8> = (0..len).map(|_| rng.gen_range(0..4)).collect();
            for _ in 0..rng.gen_range(0..60) {
                let at = rng.gen_range(0..len - 14);
                data[at..at + 2].copy_from_slice(&MAGIC_NUMBER.to_le_bytes());
                data[at + 2] = rng.gen();
                let declared: u32 = rng.gen_range(0..800);
                data[at + 10..at + 14].copy_from_slice(&declared.to_le_bytes());
            }
            let start = rng.gen_range(0..300);
            let out = Scanner::new(&data).scan(start);
            assert_eq!(out.index, reference_scan(&data, start));
        }
    }

    #[test]
    fn test_record_limit() {
        let data = records(&[(3, 300), (3, 300), (3, 300), (3, 300)]);
        let options = ScanOptions::default().with_max_records(2);
        let out = Scanner::new(&data).with_options(options).scan(0);
        assert_eq!(offsets(&out), vec![0, 300]);
        assert_eq!(out.end, ScanEnd::RecordLimit);

        let options = ScanOptions::default().with_max_records(10);
        let out = Scanner::new(&data).with_options(options).scan(0);
        assert_eq!(out.index.len(), 4);
        assert_eq!(out.end, ScanEnd::Exhausted);
    }

    #[test]
    fn test_cancel_flag() {
        let data = records(&[(3, 300), (3, 300)]);
        let flag = Arc::new(AtomicBool::new(true));
        let out = Scanner::new(&data).with_cancel_flag(flag.clone()).scan(0);
        assert!(out.index.is_empty());
        assert_eq!(out.end, ScanEnd::Cancelled);

        flag.store(false, Ordering::Relaxed);
        let out = Scanner::new(&data).with_cancel_flag(flag).scan(0);
        assert_eq!(out.index.len(), 2);
    }
}
