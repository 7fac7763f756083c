//! Flag extraction from report text

/// Lines containing this are placeholders, not flags
const NO_FLAGS_MARKER: &str = "No heuristic flags";

/// Pull flag lines out of every `Diagnostics` block in `report`
///
/// A line starting with `diagnostics` (trimmed, any case) opens a block and
/// is itself skipped. Each following non-blank line is a flag, minus a
/// leading `- ` bullet. A blank line closes the block.
pub fn extract_flags(report: &str) -> Vec<String> {
    let mut flags = Vec::new();
    let mut in_block = false;

    for line in report.lines() {
        let s = line.trim();
        if s.to_lowercase().starts_with("diagnostics") {
            in_block = true;
            continue;
        }
        if !in_block {
            continue;
        }
        if s.is_empty() {
            in_block = false;
            continue;
        }
        match s.strip_prefix("- ") {
            Some(rest) => flags.push(rest.trim().to_string()),
            None => flags.push(s.to_string()),
        }
    }

    flags.retain(|f| !f.contains(NO_FLAGS_MARKER));
    flags
}
