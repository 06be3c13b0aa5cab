//! Colored-sequence query output: FASTA-like records whose header may carry a
//! `C:<color_id>:<count>` tag.

use super::{Parsed, ResultParser};
use crate::error::Result;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Color id → count accumulated across every record carrying that color
pub type ColorAbundanceMap = BTreeMap<u64, u64>;

/// `(color_id, count)` pair extracted from a record header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorTag {
    pub color_id: u64,
    pub count: u64,
}

/// One `>` record of a colored query result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColoredSequenceRecord {
    pub header: String,
    pub sequence: String,
    pub color: Option<ColorTag>,
}

impl ColoredSequenceRecord {
    pub fn length(&self) -> usize {
        self.sequence.len()
    }
}

/// Parsed colored query result
#[derive(Debug, Clone, Default, Serialize)]
pub struct ColoredQueryResult {
    pub records: Vec<ColoredSequenceRecord>,
    /// Number of `>` records seen, including ones without a sequence line
    pub total: usize,
    /// Records whose header carried a color tag
    pub found: usize,
    pub colors: ColorAbundanceMap,
}

impl ColoredQueryResult {
    pub fn not_found(&self) -> usize {
        self.total - self.found
    }

    /// Distinct sequences, the identifiers used for presence/absence comparison
    pub fn sequence_set(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.sequence.clone()).collect()
    }
}

/// Parser for FASTA-like colored query output
pub struct ColoredParser {
    tag_regex: Regex,
}

impl ColoredParser {
    pub fn new() -> Self {
        Self {
            tag_regex: Regex::new(r"C:(\d+):(\d+)").expect("Invalid color tag pattern"),
        }
    }

    /// Extract the first color tag of a header; `Err` when the digits overflow
    fn color_tag(&self, header: &str) -> std::result::Result<Option<ColorTag>, String> {
        let Some(cap) = self.tag_regex.captures(header) else {
            return Ok(None);
        };
        let color_id = cap[1]
            .parse::<u64>()
            .map_err(|e| format!("color id {:?}: {}", &cap[1], e))?;
        let count = cap[2]
            .parse::<u64>()
            .map_err(|e| format!("color count {:?}: {}", &cap[2], e))?;
        Ok(Some(ColorTag { color_id, count }))
    }
}

impl Default for ColoredParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultParser for ColoredParser {
    type Output = ColoredQueryResult;

    fn format_name(&self) -> &'static str {
        "colored sequence"
    }

    fn parse_str(&self, content: &str) -> Result<Parsed<ColoredQueryResult>> {
        let mut parsed = Parsed::new(ColoredQueryResult::default());

        // Text before the first '>' is noise
        for (idx, chunk) in content.split('>').skip(1).enumerate() {
            let record_no = idx + 1;
            parsed.data.total += 1;

            let lines: Vec<&str> = chunk.trim().lines().map(|l| l.trim_end_matches('\r')).collect();
            if lines.len() < 2 {
                parsed.warn(record_no, "record has no sequence line");
                continue;
            }

            let header = lines[0].to_string();
            let sequence: String = lines[1..].concat();

            let color = match self.color_tag(&header) {
                Ok(tag) => tag,
                Err(msg) => {
                    parsed.warn(record_no, format!("unreadable color tag, treating as untagged: {}", msg));
                    None
                }
            };

            if let Some(tag) = color {
                *parsed.data.colors.entry(tag.color_id).or_insert(0) += tag.count;
                parsed.data.found += 1;
            }

            parsed.data.records.push(ColoredSequenceRecord { header, sequence, color });
        }

        log::info!(
            "Parsed {} records ({} with color, {} without)",
            parsed.data.total,
            parsed.data.found,
            parsed.data.not_found()
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "noise before first record\n\
>seq1 C:3:5\nACGT\nAC\n\
>seq2 C:3:2 C:9:9\nTTTT\n\
>seq3 no tag\nGGG\n\
>seq4 C:7:1\nCCCC\n";

    #[test]
    fn test_records_and_sequences() {
        let parsed = ColoredParser::new().parse_str(SAMPLE).unwrap();
        let data = parsed.data;
        assert_eq!(data.total, 4);
        assert_eq!(data.records.len(), 4);
        assert_eq!(data.records[0].header, "seq1 C:3:5");
        assert_eq!(data.records[0].sequence, "ACGTAC");
        assert_eq!(data.records[0].length(), 6);
    }

    #[test]
    fn test_color_counts_are_summed_per_color() {
        let data = ColoredParser::new().parse_str(SAMPLE).unwrap().data;
        // Only the first tag of a header is used
        assert_eq!(data.colors.get(&3), Some(&7));
        assert_eq!(data.colors.get(&7), Some(&1));
        assert_eq!(data.colors.get(&9), None);
        assert_eq!(data.found, 3);
        assert_eq!(data.not_found(), 1);
    }

    #[test]
    fn test_untagged_record_is_kept() {
        let data = ColoredParser::new().parse_str(SAMPLE).unwrap().data;
        let untagged = &data.records[2];
        assert_eq!(untagged.color, None);
        assert_eq!(untagged.sequence, "GGG");
    }

    #[test]
    fn test_record_without_sequence_is_warned() {
        let parsed = ColoredParser::new().parse_str(">lonely C:1:1\n>ok C:2:4\nAAA\n").unwrap();
        assert_eq!(parsed.data.total, 2);
        assert_eq!(parsed.data.records.len(), 1);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].line, 1);
        assert_eq!(parsed.data.not_found(), 1);
    }

    #[test]
    fn test_overflowing_tag_is_untagged() {
        let parsed = ColoredParser::new()
            .parse_str(">x C:99999999999999999999999:1\nAC\n")
            .unwrap();
        assert_eq!(parsed.data.records[0].color, None);
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.data.colors.is_empty());
    }

    #[test]
    fn test_sequence_set_deduplicates() {
        let data = ColoredParser::new().parse_str(">a\nAC\n>b\nAC\n>c\nGT\n").unwrap().data;
        assert_eq!(data.sequence_set().len(), 2);
    }
}
