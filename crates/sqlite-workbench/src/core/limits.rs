/// Row cap for full-table reads. Purely a responsiveness measure for
/// interactive grids; rows past the cap are silently dropped, so capped
/// reads are lossy for large tables.
pub const DEFAULT_ROW_LIMIT: usize = 1000;

pub fn effective_limit(requested: Option<usize>, max_rows: usize) -> usize {
    requested.unwrap_or(max_rows).min(max_rows).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_max_and_floor() {
        assert_eq!(effective_limit(None, 1000), 1000);
        assert_eq!(effective_limit(Some(50), 1000), 50);
        assert_eq!(effective_limit(Some(5000), 1000), 1000);
        assert_eq!(effective_limit(Some(0), 1000), 1);
    }
}
