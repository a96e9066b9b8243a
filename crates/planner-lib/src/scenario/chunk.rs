//! Staging chunk-size resolution
//!
//! Free staging capacity is counted in chunks: placing one instance needs
//! a chunk of free cell memory at least as large as the biggest instance
//! the platform runs.

use super::{DEFAULT_CHUNK_SIZE_MB, MIN_INFERRED_CHUNK_MB};

/// Resolves the staging chunk size in MB.
///
/// An explicit override wins verbatim, even below the inference floor.
/// An inferred size (largest per-instance memory request) is floored at
/// 1 GB. With neither, a 4 GB chunk is assumed.
pub fn resolve_chunk_size_mb(override_mb: i64, inferred_max_mb: i64) -> i64 {
    if override_mb > 0 {
        return override_mb;
    }
    if inferred_max_mb > 0 {
        return inferred_max_mb.max(MIN_INFERRED_CHUNK_MB);
    }
    DEFAULT_CHUNK_SIZE_MB
}

/// Number of staging chunks that fit into the free capacity, never
/// negative.
pub fn free_chunks(capacity_gb: f64, workload_gb: f64, chunk_size_mb: i64) -> i64 {
    if chunk_size_mb <= 0 {
        return 0;
    }
    let free_mb = (capacity_gb - workload_gb) * 1024.0;
    let chunks = (free_mb / chunk_size_mb as f64).floor() as i64;
    chunks.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins_verbatim() {
        assert_eq!(resolve_chunk_size_mb(512, 0), 512);
        assert_eq!(resolve_chunk_size_mb(512, 8192), 512);
        assert_eq!(resolve_chunk_size_mb(2048, 4096), 2048);
    }

    #[test]
    fn test_inferred_size_floored_at_one_gb() {
        assert_eq!(resolve_chunk_size_mb(0, 100), 1024);
        assert_eq!(resolve_chunk_size_mb(0, 1024), 1024);
        assert_eq!(resolve_chunk_size_mb(0, 2048), 2048);
    }

    #[test]
    fn test_default_when_nothing_known() {
        assert_eq!(resolve_chunk_size_mb(0, 0), DEFAULT_CHUNK_SIZE_MB);
    }

    #[test]
    fn test_free_chunks_with_configurable_size() {
        // 1000 GB free
        assert_eq!(free_chunks(1500.0, 500.0, 2048), 500);
        assert_eq!(free_chunks(1500.0, 500.0, 1024), 1000);
    }

    #[test]
    fn test_free_chunks_floor_fractional_pool() {
        // 3487.2 GB free at 4 GB chunks
        let chunks = free_chunks(13_987.2, 10_500.0, 4096);
        assert_eq!(chunks, 871);
    }

    #[test]
    fn test_free_chunks_clamped_when_overcommitted() {
        assert_eq!(free_chunks(100.0, 250.0, 4096), 0);
    }

    #[test]
    fn test_free_chunks_zero_chunk_size() {
        assert_eq!(free_chunks(1000.0, 0.0, 0), 0);
    }
}
