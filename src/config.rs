//! Configuration for tree construction.

use crate::arena::MAX_ENTRIES;
use crate::comparator::KeyOrder;
use crate::error::{AvlError, Result};

/// Construction-time settings for an [`AvlTree`](crate::AvlTree).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Number of nodes to pre-allocate in the arena.
    pub initial_capacity: usize,
    /// Maximum number of live entries (`None` = limited only by the handle space).
    pub max_entries: Option<u32>,
    /// Key ordering by name ("natural", "reverse", ...).
    pub ordering: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            max_entries: None,
            ordering: KeyOrder::Ascending.name().to_string(),
        }
    }
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of pre-allocated nodes.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Cap the number of live entries.
    pub fn max_entries(mut self, max: u32) -> Self {
        self.max_entries = Some(max);
        self
    }

    /// Select the key ordering by name.
    pub fn ordering(mut self, name: impl Into<String>) -> Self {
        self.ordering = name.into();
        self
    }

    /// Resolve the configured ordering name.
    pub fn key_order(&self) -> Result<KeyOrder> {
        self.ordering.parse()
    }

    /// Effective entry limit after clamping to the handle space.
    pub fn entry_limit(&self) -> u32 {
        self.max_entries.map_or(MAX_ENTRIES, |max| max.min(MAX_ENTRIES))
    }

    /// Check the configuration for consistency.
    pub fn validate(&self) -> Result<()> {
        if let Some(max) = self.max_entries {
            if max > MAX_ENTRIES {
                return Err(AvlError::InvalidConfig(format!(
                    "max_entries {} exceeds handle space {}",
                    max, MAX_ENTRIES
                )));
            }
            if self.initial_capacity > max as usize {
                return Err(AvlError::InvalidConfig(format!(
                    "initial_capacity {} exceeds max_entries {}",
                    self.initial_capacity, max
                )));
            }
        }
        self.key_order()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TreeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.key_order().unwrap(), KeyOrder::Ascending);
        assert_eq!(config.entry_limit(), MAX_ENTRIES);
    }

    #[test]
    fn test_entry_limit_clamps_to_handle_space() {
        let config = TreeConfig::new().max_entries(u32::MAX);
        assert_eq!(config.entry_limit(), MAX_ENTRIES);
        assert!(config.validate().is_err());
        assert_eq!(TreeConfig::new().max_entries(10).entry_limit(), 10);
    }

    #[test]
    fn test_builder() {
        let config = TreeConfig::new()
            .initial_capacity(64)
            .max_entries(128)
            .ordering("reverse");
        assert_eq!(config.initial_capacity, 64);
        assert_eq!(config.entry_limit(), 128);
        assert_eq!(config.key_order().unwrap(), KeyOrder::Descending);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_capacity_above_limit_rejected() {
        let config = TreeConfig::new().initial_capacity(10).max_entries(5);
        assert!(matches!(config.validate(), Err(AvlError::InvalidConfig(_))));
    }

    #[test]
    fn test_limit_above_handle_space_rejected() {
        let config = TreeConfig::new().max_entries(u32::MAX);
        assert!(matches!(config.validate(), Err(AvlError::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_ordering_rejected() {
        let config = TreeConfig::new().ordering("random");
        assert!(matches!(
            config.validate(),
            Err(AvlError::InvalidComparator { .. })
        ));
    }
}
