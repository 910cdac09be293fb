/// Splits tool output into lines and each line into whitespace-delimited tokens.
///
/// One token list is produced per `\n`-separated segment, so a trailing newline
/// yields a trailing empty list and empty input yields a single empty list.
pub fn split_fields(text: &str) -> Vec<Vec<&str>> {
    text.split('\n')
        .map(|line| line.split_whitespace().collect())
        .collect()
}

/// Best-effort integer conversion; anything unparseable counts as zero.
pub fn parse_u64_or_zero(token: Option<&str>) -> u64 {
    token.and_then(|t| t.parse::<u64>().ok()).unwrap_or(0)
}
