//! Container configuration.
//!
//! Options can be built in code, read from the environment, or (with the
//! `config` feature) parsed from JSON.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};

/// Default upper bound on the injection chain length.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

const ENV_MAX_DEPTH: &str = "IOC_MAX_DEPTH";
const ENV_SELF_BINDING: &str = "IOC_SELF_BINDING";

/// Tunables of a [`Container`](crate::Container).
///
/// # Examples
///
/// ```
/// use ioc_abstractions::{Container, ContainerOptions};
///
/// let options = ContainerOptions::default().with_max_depth(64).with_self_binding(false);
/// let container = Container::with_options(options);
/// assert_eq!(container.options().max_depth, 64);
/// assert!(!container.options().self_binding);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    /// Maximum number of types under construction in one resolution call.
    pub max_depth: usize,
    /// Whether unbound concrete types may be constructed directly.
    pub self_binding: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            self_binding: true,
        }
    }
}

impl ContainerOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_self_binding(mut self, self_binding: bool) -> Self {
        self.self_binding = self_binding;
        self
    }

    /// Checks option values.
    pub fn validate(&self) -> DiResult<()> {
        if self.max_depth == 0 {
            return Err(DiError::InvalidOptions("max_depth must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Reads `IOC_MAX_DEPTH` and `IOC_SELF_BINDING`, keeping defaults for
    /// unset variables.
    ///
    /// # Errors
    ///
    /// `InvalidOptions` when a variable is set but cannot be parsed.
    pub fn from_env() -> DiResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DiResult<Self> {
        let mut options = Self::default();

        if let Some(raw) = lookup(ENV_MAX_DEPTH) {
            options.max_depth = raw.trim().parse().map_err(|_| {
                DiError::InvalidOptions(format!("{} is not a positive integer: {:?}", ENV_MAX_DEPTH, raw))
            })?;
        }

        if let Some(raw) = lookup(ENV_SELF_BINDING) {
            options.self_binding = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(DiError::InvalidOptions(format!(
                        "{} is not a boolean: {:?}",
                        ENV_SELF_BINDING, raw
                    )))
                }
            };
        }

        options.validate()?;
        Ok(options)
    }

    /// Parses options from JSON. Missing fields keep their defaults.
    ///
    /// ```
    /// use ioc_abstractions::ContainerOptions;
    ///
    /// let options = ContainerOptions::from_json(r#"{ "max_depth": 32 }"#).unwrap();
    /// assert_eq!(options.max_depth, 32);
    /// assert!(options.self_binding);
    /// ```
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> DiResult<Self> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| DiError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    #[cfg(feature = "config")]
    pub fn to_json(&self) -> DiResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DiError::InvalidOptions(e.to_string()))
    }
}
