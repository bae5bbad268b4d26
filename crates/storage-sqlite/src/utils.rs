//! Utility functions for SQLite storage operations.

/// Maximum number of bound parameters we put in a single SQLite statement.
///
/// Older SQLite builds cap a statement at 999 parameters
/// (SQLITE_MAX_VARIABLE_NUMBER); 500 leaves room for anything else the
/// statement binds.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits rows for a multi-row `INSERT ... VALUES` so that no statement binds
/// more than [`SQLITE_MAX_PARAMS_CHUNK`] parameters. Every chunk holds at
/// least one row.
pub fn chunk_rows_for_sqlite<T>(rows: &[T], params_per_row: usize) -> impl Iterator<Item = &[T]> {
    let rows_per_chunk = (SQLITE_MAX_PARAMS_CHUNK / params_per_row.max(1)).max(1);
    rows.chunks(rows_per_chunk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_rows_empty() {
        let rows: Vec<i32> = vec![];
        assert_eq!(chunk_rows_for_sqlite(&rows, 6).count(), 0);
    }

    #[test]
    fn test_chunk_rows_under_limit() {
        let rows: Vec<i32> = (0..50).collect();
        let chunks: Vec<_> = chunk_rows_for_sqlite(&rows, 6).collect();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 50);
    }

    #[test]
    fn test_chunk_rows_year_of_days() {
        // 366 rows of 6 columns: 83 rows (498 params) per statement
        let rows: Vec<i32> = (0..366).collect();
        let chunks: Vec<_> = chunk_rows_for_sqlite(&rows, 6).collect();
        assert_eq!(chunks.len(), 5);
        assert!(chunks.iter().all(|c| c.len() * 6 <= SQLITE_MAX_PARAMS_CHUNK));
        assert_eq!(chunks.iter().map(|c| c.len()).sum::<usize>(), 366);
    }

    #[test]
    fn test_chunk_rows_wide_rows_still_progress() {
        let rows: Vec<i32> = (0..3).collect();
        let chunks: Vec<_> = chunk_rows_for_sqlite(&rows, SQLITE_MAX_PARAMS_CHUNK * 2).collect();
        assert_eq!(chunks.len(), 3);
    }
}
