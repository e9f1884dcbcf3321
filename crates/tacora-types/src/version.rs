//! Schema versions of columnar payloads.

/// Which optional column set a response carries.
///
/// `V1` has only the mandatory columns. `V2` additionally carries every
/// optional column, each non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchemaVersion {
    /// Mandatory columns only.
    #[default]
    V1,
    /// Mandatory plus all optional columns.
    V2,
}

impl SchemaVersion {
    /// Returns the short lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
