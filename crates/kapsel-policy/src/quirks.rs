//! Platform version quirks.

/// Version-gated platform defects the resource chain works around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformQuirks {
    api_level: u32,
}

impl PlatformQuirks {
    pub fn new(api_level: u32) -> Self {
        Self { api_level }
    }

    pub fn api_level(&self) -> u32 {
        self.api_level
    }

    /// On API levels 14-15 the surface fails to resolve bundled-asset
    /// URLs containing an encoded space; such loads must be answered
    /// from the asset store instead of the default fetch path.
    pub fn needs_encoded_space_fix(&self, url: &str) -> bool {
        url.contains("%20") && matches!(self.api_level, 14 | 15)
    }
}
