use crate::math::Precision;

/// Settings shared by every role-gated transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferConfig {
    /// Quantization used by every correspondence build.
    pub precision: Precision,
    /// Write the morph into a shape key of the unimesh instead of its base
    /// positions.
    pub as_shape_key: bool,
}

impl TransferConfig {
    /// Creates a configuration with the given precision and base-position output.
    #[must_use]
    pub fn new(precision: Precision) -> Self {
        Self {
            precision,
            as_shape_key: false,
        }
    }

    /// Sets shape-key output.
    #[must_use]
    pub fn with_shape_key(mut self, as_shape_key: bool) -> Self {
        self.as_shape_key = as_shape_key;
        self
    }
}
