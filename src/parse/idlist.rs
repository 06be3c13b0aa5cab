use super::{Parsed, ResultParser};
use crate::error::Result;
use std::collections::BTreeSet;

/// Unique integer identifiers extracted from one query result
pub type IdentifierSet = BTreeSet<i64>;

/// Parser for tab-delimited identifier lists: `<query_id>\t<num>\t<num>...`
///
/// The leading field of each line names the query and is discarded.
pub struct IdListParser;

impl ResultParser for IdListParser {
    type Output = IdentifierSet;

    fn format_name(&self) -> &'static str {
        "identifier list"
    }

    fn parse_str(&self, content: &str) -> Result<Parsed<IdentifierSet>> {
        let mut parsed = Parsed::new(IdentifierSet::new());

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            for field in line.split('\t').skip(1) {
                match field.trim().parse::<i64>() {
                    Ok(id) => {
                        parsed.data.insert(id);
                    }
                    Err(_) => {
                        log::debug!("line {}: ignoring non-numeric field {:?}", idx + 1, field);
                    }
                }
            }
        }

        log::info!("Found {} identifiers", parsed.data.len());
        Ok(parsed)
    }
}
