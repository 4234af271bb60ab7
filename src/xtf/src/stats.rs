//! Per-type record statistics gathered while scanning

use serde::Serialize;

use crate::catalog::{packet_type_description, packet_type_name};
use crate::sniffer::Sniff;

/// Records of one header type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatEntry {
    pub header_type: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub count: u64,
    /// First record of this type in file order
    pub first: Sniff,
    /// Most recent record of this type in file order
    pub last: Sniff,
}

/// Statistics per header type, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Statistics {
    entries: Vec<StatEntry>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one indexed record into the table
    pub fn add(&mut self, sniff: &Sniff) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.header_type == sniff.header_type)
        {
            Some(entry) => {
                entry.count += 1;
                entry.last = *sniff;
            }
            None => self.entries.push(StatEntry {
                header_type: sniff.header_type,
                name: packet_type_name(sniff.header_type),
                description: packet_type_description(sniff.header_type),
                count: 1,
                first: *sniff,
                last: *sniff,
            }),
        }
    }

    pub fn get(&self, header_type: u8) -> Option<&StatEntry> {
        self.entries.iter().find(|e| e.header_type == header_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatEntry> {
        self.entries.iter()
    }

    /// Number of distinct header types seen
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records counted across all types
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sniff(header_type: u8, record_length: u32) -> Sniff {
        Sniff {
            magic_number: crate::MAGIC_NUMBER,
            header_type,
            record_length,
            ..Sniff::default()
        }
    }

    #[test]
    fn test_counts_and_order() {
        let mut stats = Statistics::new();
        stats.add(&sniff(3, 64));
        stats.add(&sniff(0, 1000));
        stats.add(&sniff(3, 65));
        stats.add(&sniff(3, 66));

        assert_eq!(stats.len(), 2);
        assert_eq!(stats.total(), 4);
        let order: Vec<u8> = stats.iter().map(|e| e.header_type).collect();
        assert_eq!(order, vec![3, 0]);

        let attitude = stats.get(3).unwrap();
        assert_eq!(attitude.count, 3);
        assert_eq!(attitude.first.record_length, 64);
        assert_eq!(attitude.last.record_length, 66);
        assert_eq!(attitude.name, "Attitude");
    }

    #[test]
    fn test_unknown_type_names() {
        let mut stats = Statistics::new();
        stats.add(&sniff(250, 14));
        let entry = stats.get(250).unwrap();
        assert_eq!(entry.name, "Unknown");
        assert_eq!(entry.description, "Unknown");
        assert!(stats.get(1).is_none());
    }

    #[test]
    fn test_serializes_as_list() {
        let mut stats = Statistics::new();
        stats.add(&sniff(1, 256));
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["count"], 1);
        assert_eq!(json[0]["name"], "Notes");
    }
}
