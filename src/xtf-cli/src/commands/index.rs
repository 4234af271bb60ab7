//! `xtf index`: one line per record

use anyhow::Result;
use std::path::Path;

use xtf::{packet_type_name, Document, IndexEntry, ScanOptions};

use super::{print_json, read_input};

pub fn handle(input: &Path, options: &ScanOptions, json: bool) -> Result<()> {
    let data = read_input(input)?;
    let doc = Document::parse_with(&data, options);

    if json {
        return print_json(&doc.index);
    }

    for entry in &doc.index {
        println!("{}", render_entry(entry));
    }
    Ok(())
}

fn render_entry(entry: &IndexEntry) -> String {
    format!(
        "{:>12}  {:>3}  {}",
        entry.offset,
        entry.header_type,
        packet_type_name(entry.header_type)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::sample_file;

    #[test]
    fn test_render_entry() {
        let entry = IndexEntry {
            header_type: 1,
            offset: 1024,
        };
        assert_eq!(render_entry(&entry), "        1024    1  Notes");
    }

    #[test]
    fn test_handle_with_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("line.xtf");
        std::fs::write(&path, sample_file("TEST")).unwrap();
        let options = ScanOptions::default().with_max_records(0);
        handle(&path, &options, false).unwrap();
        handle(&path, &options, true).unwrap();
    }
}
