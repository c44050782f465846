/// Label reserved for the tier synthesised from the daily challenge.
pub const DAILY_TIER_LABEL: &str = "Daily";

/// Named difficulty configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifficultyTier {
    /// Unique label, also used as the storage key suffix.
    pub label: String,
    /// Number of tiles in the grid.
    pub size: u32,
}

impl DifficultyTier {
    /// Build a tier from its label and grid size.
    pub fn new(label: impl Into<String>, size: u32) -> Self {
        Self {
            label: label.into(),
            size,
        }
    }

    /// Tier used for a daily challenge with `grid_size` tiles.
    pub fn daily(grid_size: u32) -> Self {
        Self::new(DAILY_TIER_LABEL, grid_size)
    }

    /// Whether this is the synthesised daily tier.
    pub fn is_daily(&self) -> bool {
        self.label == DAILY_TIER_LABEL
    }
}

/// The built-in tier set: Easy, Medium and Hard.
pub fn default_tiers() -> Vec<DifficultyTier> {
    vec![
        DifficultyTier::new("Easy", 10),
        DifficultyTier::new("Medium", 20),
        DifficultyTier::new("Hard", 30),
    ]
}
