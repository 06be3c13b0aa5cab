use super::{Parsed, ResultParser};
use crate::error::Result;
use std::collections::BTreeMap;

/// Identifier → abundance for one query result
pub type AbundanceMap = BTreeMap<String, u64>;

/// One CSV row, fields taken from the end because identifiers may contain commas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbundanceRecord {
    pub identifier: String,
    /// Auxiliary numeric column (source file index); not compared, None when unreadable
    pub tag: Option<i64>,
    pub abundance: u64,
}

/// Parse one data row: `<identifier-with-commas>,<tag>,<abundance>`
pub fn parse_record(line: &str) -> std::result::Result<AbundanceRecord, String> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() < 3 {
        return Err(format!("expected at least 3 comma-separated fields, found {}", parts.len()));
    }
    let n = parts.len();
    let abundance = parts[n - 1]
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("abundance {:?} is not a non-negative integer: {}", parts[n - 1], e))?;
    if abundance > i64::MAX as u64 {
        return Err(format!("abundance {} exceeds {}", abundance, i64::MAX));
    }
    let tag = parts[n - 2].trim().parse::<i64>().ok();
    let identifier = parts[..n - 2].join(",");

    Ok(AbundanceRecord {
        identifier,
        tag,
        abundance,
    })
}

/// Parser for CSV abundance tables with a header line
pub struct AbundanceParser;

impl ResultParser for AbundanceParser {
    type Output = AbundanceMap;

    fn format_name(&self) -> &'static str {
        "abundance CSV"
    }

    fn parse_str(&self, content: &str) -> Result<Parsed<AbundanceMap>> {
        let mut parsed = Parsed::new(AbundanceMap::new());

        for (idx, line) in content.lines().enumerate().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_record(line) {
                Ok(record) => {
                    if record.tag.is_none() {
                        parsed.warn(idx + 1, format!("tag of {} is not an integer, row kept", record.identifier));
                    }
                    if let Some(previous) = parsed.data.insert(record.identifier.clone(), record.abundance) {
                        log::debug!(
                            "line {}: {} repeated, abundance {} replaces {}",
                            idx + 1,
                            record.identifier,
                            record.abundance,
                            previous
                        );
                    }
                }
                Err(msg) => parsed.warn(idx + 1, msg),
            }
        }

        log::info!("Loaded {} identifiers with abundance", parsed.data.len());
        Ok(parsed)
    }
}
