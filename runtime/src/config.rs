//! Store configuration

/// What a store does when a reducer calls back into it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReentrancyPolicy {
    /// Reject the call with a [`StoreError`](reflux_core::StoreError) (default)
    #[default]
    Error,
    /// Panic with the error message, unwinding out of the reducer
    ///
    /// For hosts whose tests rely on misuse being fatal.
    Panic,
}

/// Configuration for store instances
///
/// # Example
///
/// ```
/// use reflux_runtime::{ReentrancyPolicy, StoreConfig};
///
/// let config = StoreConfig::default()
///     .with_name("session")
///     .with_reentrancy_policy(ReentrancyPolicy::Panic);
///
/// assert_eq!(config.name, "session");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Name attached to every log line and metric of the store
    pub name: String,
    /// Reaction to dispatch or subscribe from inside a reducer
    pub reentrancy_policy: ReentrancyPolicy,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub fn new(name: impl Into<String>, reentrancy_policy: ReentrancyPolicy) -> Self {
        Self {
            name: name.into(),
            reentrancy_policy,
        }
    }

    /// Set the store name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the reentrancy policy
    #[must_use]
    pub const fn with_reentrancy_policy(mut self, policy: ReentrancyPolicy) -> Self {
        self.reentrancy_policy = policy;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "store".to_string(),
            reentrancy_policy: ReentrancyPolicy::Error,
        }
    }
}
