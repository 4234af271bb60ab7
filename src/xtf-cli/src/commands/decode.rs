//! `xtf decode`: full decode of a single record

use anyhow::{Context, Result};
use std::path::Path;

use xtf::{packet_type_name, Document, Packet, Record, ScanOptions};

use super::{format_time, print_json, read_input};

pub fn handle(input: &Path, offset: u64, options: &ScanOptions, json: bool) -> Result<()> {
    let data = read_input(input)?;
    // Only the channel list is needed, skip indexing
    let doc = Document::parse_with(&data, &options.with_max_records(0));
    let record = doc
        .decode_at(&data, offset)
        .with_context(|| format!("Failed to decode record at offset {}", offset))?;

    if json {
        return print_json(&record);
    }

    print!("{}", render(offset, &record));
    Ok(())
}

fn render(offset: u64, record: &Record) -> String {
    let mut out = format!(
        "Offset:   {}\nType:     {} ({})\nLength:   {} bytes\nTime:     {}\n",
        offset,
        record.header_type(),
        packet_type_name(record.header_type()),
        record.record_length(),
        format_time(record.packet_time())
    );
    if let Some(tag) = record.time_tag() {
        out.push_str(&format!("Time tag: {} ms\n", tag));
    }
    out.push_str(&format!("\n{:#?}\n", record));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::sample_file;

    #[test]
    fn test_render_note() {
        let data = sample_file("hello");
        let doc = Document::parse(&data);
        let record = doc.decode_at(&data, 1024).unwrap();
        let text = render(1024, &record);
        assert!(text.contains("Type:     1 (Notes)"));
        assert!(text.contains("Length:   256 bytes"));
        assert!(text.contains("hello"));
    }

    #[test]
    fn test_offset_past_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("line.xtf");
        std::fs::write(&path, sample_file("TEST")).unwrap();
        let err = handle(&path, 99_999, &ScanOptions::default(), false).unwrap_err();
        assert!(err.to_string().contains("offset 99999"));
        handle(&path, 1024, &ScanOptions::default(), true).unwrap();
    }
}
