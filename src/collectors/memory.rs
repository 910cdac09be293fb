use super::fields::{parse_u64_or_zero, split_fields};
use super::{Tool, ToolParser};
use crate::state::MemoryUsage;
use tracing::debug;

/// Parses `free -m`.
///
/// The header row has no label column, so every value sits one column to the
/// right of its header token:
///
/// ```text
///                total        used        free ...
/// Mem:           15896        6243        1804 ...
/// Swap:           2047           0        2047
/// ```
pub struct FreeParser;

const VALUE_COLUMN_OFFSET: usize = 1;

impl ToolParser for FreeParser {
    type Output = MemoryUsage;

    fn tool(&self) -> Tool {
        Tool::Free
    }

    fn parse(&self, text: &str) -> MemoryUsage {
        let lines = split_fields(text);
        let Some((header, rows)) = lines.split_first() else {
            return MemoryUsage::default();
        };
        let (Some(total_col), Some(used_col)) =
            (header_column(header, "total"), header_column(header, "used"))
        else {
            debug!(header = ?header, "free header lacks total/used columns");
            return MemoryUsage::default();
        };

        let usage = |label: &str| {
            rows.iter()
                .find(|row| row.first() == Some(&label))
                .map(|row| {
                    let total = parse_u64_or_zero(row.get(total_col).copied());
                    let used = parse_u64_or_zero(row.get(used_col).copied());
                    (used, total)
                })
        };

        let mem_used_percent = match usage("Mem:") {
            Some((used, total)) => percent(used, total),
            None => {
                debug!("no Mem: row in free output");
                0.0
            }
        };
        // No row, or a zero-sized row, both mean swap is off.
        let swap_used_percent = usage("Swap:")
            .filter(|(_, total)| *total > 0)
            .map(|(used, total)| percent(used, total));

        MemoryUsage {
            mem_used_percent,
            swap_used_percent,
        }
    }
}

fn header_column(header: &[&str], name: &str) -> Option<usize> {
    header
        .iter()
        .position(|t| *t == name)
        .map(|i| i + VALUE_COLUMN_OFFSET)
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * used as f64 / total as f64
}
