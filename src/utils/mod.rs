// Utility functions

/// Extension trait for adding context to errors when converting to String.
///
/// Command handlers report failures as plain strings; this keeps the
/// `map_err(|e| format!("{}: {}", msg, e))` pattern in one place.
///
/// # Example
/// ```ignore
/// use crate::utils::ResultExt;
///
/// let file = std::fs::read_to_string("config.toml")
///     .with_context("Failed to read config file")?;
/// ```
pub trait ResultExt<T> {
    /// Converts the error to a String with context message.
    fn with_context(self, msg: &str) -> Result<T, String>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn with_context(self, msg: &str) -> Result<T, String> {
        self.map_err(|e| format!("{}: {}", msg, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context() {
        let err: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert_eq!(err.with_context("Failed").unwrap_err(), "Failed: boom");

        let ok: Result<u8, String> = Ok(1);
        assert_eq!(ok.with_context("unused"), Ok(1));
    }
}
