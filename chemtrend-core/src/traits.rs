//! Core trait definitions shared across the chemtrend crates.

/// A type that carries a numeric score (similarity, correlation coefficient).
pub trait Scored {
    /// The score value.
    fn score(&self) -> f64;
}

/// A type that carries a human-readable name.
pub trait Annotated {
    /// A name or identifier.
    fn name(&self) -> &str;

    /// An optional description.
    fn description(&self) -> Option<&str> {
        None
    }
}

/// A type that can produce a one-line summary of its contents.
pub trait Summarizable {
    /// A one-line summary suitable for display.
    fn summary(&self) -> String;
}

/// A type whose identity can be derived from its content via cryptographic hash.
pub trait ContentAddressable {
    /// Return the content hash as a hex string (e.g. SHA-256).
    fn content_hash(&self) -> String;
}
