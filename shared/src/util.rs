/// Reserved prefix of client-allocated identifiers
///
/// Ids carrying this prefix never reach the server: they key variants and
/// sizes created in the admin UI until the first successful save.
pub const TEMP_ID_PREFIX: &str = "tmp-";

/// Whether `id` was allocated client-side and is still pending server assignment
pub fn is_temp_id(id: &str) -> bool {
    id.starts_with(TEMP_ID_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_temp_id() {
        assert!(is_temp_id("tmp-variant-3f2a-1"));
        assert!(!is_temp_id("65f1c0a9e4b0a1b2c3d4e5f6"));
        assert!(!is_temp_id(""));
        assert!(!is_temp_id("TMP-variant"));
    }
}
