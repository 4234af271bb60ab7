//! Command handlers for the xtf CLI
//!
//! Each subcommand has its own module with a `handle` function.

pub mod decode;
pub mod index;
pub mod info;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Read a whole XTF file into memory
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Render an optional record time, `-` when absent
pub fn format_time(time: Option<NaiveDateTime>) -> String {
    match time {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
        None => "-".to_string(),
    }
}

/// A minimal two-channel file with one note record
///
/// Zero padding after the note keeps it out of the tail region, so the
/// scan reads its time.
#[cfg(test)]
pub(crate) fn sample_file(text: &str) -> Vec<u8> {
    let mut data = vec![0u8; 1024];
    data[2..9].copy_from_slice(b"Isis v7");
    data[34..36].copy_from_slice(&9u16.to_le_bytes());
    data[166..168].copy_from_slice(&2u16.to_le_bytes());
    for (i, name) in [b"PORT", b"STBD"].iter().enumerate() {
        let start = 256 + i * 128;
        data[start] = i as u8 + 1;
        data[start + 6..start + 8].copy_from_slice(&1u16.to_le_bytes());
        data[start + 8..start + 12].copy_from_slice(&10u32.to_le_bytes());
        data[start + 12..start + 16].copy_from_slice(*name);
    }

    let mut note = vec![0u8; 256];
    note[0..2].copy_from_slice(&xtf::MAGIC_NUMBER.to_le_bytes());
    note[2] = 1;
    note[10..14].copy_from_slice(&256u32.to_le_bytes());
    note[14..16].copy_from_slice(&2020u16.to_le_bytes());
    note[16] = 6;
    note[17] = 1;
    note[56..56 + text.len()].copy_from_slice(text.as_bytes());
    data.extend(note);
    data.extend([0u8; SAMPLE_PADDING]);
    data
}

#[cfg(test)]
pub(crate) const SAMPLE_PADDING: usize = 64;
