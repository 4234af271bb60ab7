//! Decoding options

use serde::{Deserialize, Serialize};

use crate::samples::WideSamplePolicy;

/// Options shared by the scanner and on-demand record decoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Reduction used for 4-byte ping samples
    pub wide_samples: WideSamplePolicy,
    /// Stop indexing once this many records have been found
    pub max_records: Option<usize>,
}

impl ScanOptions {
    pub fn with_wide_samples(mut self, policy: WideSamplePolicy) -> Self {
        self.wide_samples = policy;
        self
    }

    pub fn with_max_records(mut self, limit: usize) -> Self {
        self.max_records = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ScanOptions::default();
        assert_eq!(opts.wide_samples, WideSamplePolicy::Legacy);
        assert_eq!(opts.max_records, None);
    }

    #[test]
    fn test_partial_json() {
        let opts: ScanOptions = serde_json::from_str(r#"{"wide_samples":"scaled"}"#).unwrap();
        assert_eq!(opts.wide_samples, WideSamplePolicy::Scaled);
        assert_eq!(opts.max_records, None);
    }

    #[test]
    fn test_builders() {
        let opts = ScanOptions::default()
            .with_wide_samples(WideSamplePolicy::Scaled)
            .with_max_records(3);
        assert_eq!(opts.max_records, Some(3));
        assert_eq!(opts.wide_samples, WideSamplePolicy::Scaled);
    }
}
