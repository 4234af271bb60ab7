//! `xtf info`: header, channels and record statistics

use anyhow::Result;
use std::path::Path;

use xtf::{Document, ScanEnd, ScanOptions};

use super::{format_time, print_json, read_input};

pub fn handle(input: &Path, options: &ScanOptions, json: bool) -> Result<()> {
    let data = read_input(input)?;
    let doc = Document::parse_with(&data, options);

    if json {
        return print_json(&doc.summary());
    }

    print!("{}", render(input, &doc));
    Ok(())
}

fn render(input: &Path, doc: &Document) -> String {
    let mut out = String::new();
    let h = &doc.header;

    out.push_str(&format!("File:       {}\n", input.display()));
    if doc.scan_end == ScanEnd::NoHeader {
        out.push_str("Not an XTF file: too short for a header\n");
        return out;
    }

    out.push_str(&format!(
        "Program:    {} {}\n",
        h.program_name, h.program_version
    ));
    let model = h.sonar_model().map_or("Unknown", |m| m.name);
    out.push_str(&format!(
        "Sonar:      {} (type {}, {})\n",
        h.sonar_name, h.sonar_type, model
    ));
    out.push_str(&format!(
        "Channels:  {} sonar, {} bathymetry\n",
        h.sonar_channels, h.bathymetry_channels
    ));
    out.push_str(&format!("Header:     {} bytes\n", doc.header_size));
    out.push_str(&format!(
        "Records:    {} ({:?})\n",
        doc.index.len(),
        doc.scan_end
    ));

    if !doc.channels.is_empty() {
        out.push_str("\n  #  Type        Name              Bytes  Samples  Polarity\n");
        for (i, c) in doc.channels.iter().enumerate() {
            out.push_str(&format!(
                "{:>3}  {:<10}  {:<16}  {:>5}  {:>7}  {:?}\n",
                i,
                format!("{:?}", c.channel_type),
                c.name,
                c.bytes_per_sample,
                c.samples_per_channel,
                c.polarity
            ));
        }
    }

    if !doc.statistics.is_empty() {
        out.push_str("\nType  Name                      Count  First                    Last\n");
        for s in doc.statistics.iter() {
            out.push_str(&format!(
                "{:>4}  {:<24}  {:>5}  {:<23}  {}\n",
                s.header_type,
                s.name,
                s.count,
                format_time(s.first.packet_time),
                format_time(s.last.packet_time)
            ));
        }
    }

    out
}
