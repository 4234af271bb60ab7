//! Parsed XTF documents
//!
//! [`Document::parse`] decodes the header region and indexes every record
//! in one pass. Record bodies are not kept: [`Document::decode_at`] and
//! [`Document::records`] decode them on demand from the same buffer.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::channel::ChannelDescriptor;
use crate::header::{decode_file_header, DocumentHeader};
use crate::options::ScanOptions;
use crate::record::{decode_record, Record};
use crate::scanner::{IndexEntry, ScanEnd, ScanOutput, Scanner};
use crate::stats::Statistics;
use crate::{Error, Result};

/// Header, channel list and record index of one XTF buffer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub header: DocumentHeader,
    pub channels: Vec<ChannelDescriptor>,
    /// Offset of the first record
    pub header_size: usize,
    pub index: Vec<IndexEntry>,
    pub statistics: Statistics,
    pub scan_end: ScanEnd,
    #[serde(skip)]
    options: ScanOptions,
}

/// Overview of a document without its index
#[derive(Debug, Clone, Serialize)]
pub struct Summary<'a> {
    pub header: &'a DocumentHeader,
    pub sonar_model: Option<&'static str>,
    pub channels: &'a [ChannelDescriptor],
    pub header_size: usize,
    pub record_count: usize,
    pub scan_end: ScanEnd,
    pub statistics: &'a Statistics,
}

impl Document {
    /// Parse with default options
    ///
    /// Never fails. A buffer too short for a header region yields an empty
    /// document whose `scan_end` is [`ScanEnd::NoHeader`].
    pub fn parse(data: &[u8]) -> Self {
        Self::parse_with(data, &ScanOptions::default())
    }

    pub fn parse_with(data: &[u8], options: &ScanOptions) -> Self {
        Self::build(data, options, Scanner::new(data))
    }

    /// Parse, stopping between records once `cancel` is set
    pub fn parse_cancellable(data: &[u8], options: &ScanOptions, cancel: Arc<AtomicBool>) -> Self {
        Self::build(data, options, Scanner::new(data).with_cancel_flag(cancel))
    }

    fn build(data: &[u8], options: &ScanOptions, scanner: Scanner<'_>) -> Self {
        let Ok(file_header) = decode_file_header(data) else {
            return Self {
                scan_end: ScanEnd::NoHeader,
                options: *options,
                ..Self::default()
            };
        };

        let ScanOutput {
            index,
            statistics,
            end,
        } = scanner.with_options(*options).scan(file_header.region_size);
        debug!(
            records = index.len(),
            types = statistics.len(),
            end = ?end,
            "Indexed document"
        );

        Self {
            header: file_header.header,
            channels: file_header.channels,
            header_size: file_header.region_size,
            index,
            statistics,
            scan_end: end,
            options: *options,
        }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Fully decode the record starting at `offset`
    ///
    /// `data` must be the buffer the document was parsed from.
    pub fn decode_at(&self, data: &[u8], offset: u64) -> Result<Record> {
        let start = usize::try_from(offset)
            .ok()
            .filter(|&start| start < data.len())
            .ok_or(Error::OffsetOutOfRange {
                offset,
                len: data.len(),
            })?;
        decode_record(&data[start..], &self.channels, &self.options)
    }

    /// Decode every indexed record, lazily and in file order
    pub fn records<'a>(
        &'a self,
        data: &'a [u8],
    ) -> impl Iterator<Item = (IndexEntry, Result<Record>)> + 'a {
        self.index
            .iter()
            .map(move |entry| (*entry, self.decode_at(data, entry.offset)))
    }

    pub fn summary(&self) -> Summary<'_> {
        Summary {
            header: &self.header,
            sonar_model: self.header.sonar_model().map(|m| m.name),
            channels: &self.channels,
            header_size: self.header_size,
            record_count: self.index.len(),
            scan_end: self.scan_end,
            statistics: &self.statistics,
        }
    }
}
