//! Decoder limits.

/// Resource limits for one decode call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum number of values decoded (default: 100,000,000).
    pub(crate) fuel: u64,
    /// Maximum value nesting depth (default: 512).
    pub(crate) recursion_limit: u32,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            fuel: 100_000_000,
            recursion_limit: 512,
        }
    }
}

impl DecodeLimits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the decoding fuel: one unit per value, including nested ones.
    pub fn fuel(mut self, fuel: u64) -> Self {
        self.fuel = fuel;
        self
    }

    /// Set the recursion limit.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn get_fuel(&self) -> u64 {
        self.fuel
    }

    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}
