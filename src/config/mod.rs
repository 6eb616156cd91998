//! Process-wide configuration.
//!
//! Two settings exist:
//!
//! - whether new layers capture the [`Location`](crate::Location) of the call
//!   that opened them (off by default),
//! - the separator placed between name prefix segments (`-` by default).
//!
//! The intended lifecycle is to configure once at startup and then only read.
//! Either install a [`Config`]:
//!
//! ```no_run
//! use errtrail::Config;
//!
//! Config::new()
//!     .locations(true)
//!     .prefix_separator(".")
//!     .install()
//!     .expect("errtrail configured twice");
//! ```
//!
//! or flip location capture with the two toggles:
//!
//! ```no_run
//! errtrail::config::insert_locations();
//! // ...
//! errtrail::config::do_not_insert_locations();
//! ```
//!
//! Capturing locations costs one lock read per layer plus the location
//! itself. Production builds usually leave it off.

mod config_lock;

use self::config_lock::ConfigLock;

static CONFIG: ConfigLock<Config> = ConfigLock::new();

/// Configuration for the whole process.
///
/// # Examples
///
/// ```no_run
/// use errtrail::{Config, Error};
///
/// Config::new().locations(true).install().unwrap();
///
/// let err = Error::new("boom");
/// assert!(err.tree().groups()[0].location().is_some());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    locations: bool,
    prefix_separator: &'static str,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Error returned by [`Config::install`] when a configuration is already in
/// place. Carries the configuration that was rejected.
#[derive(Copy, Clone, Debug)]
pub struct ConfigAlreadyInstalledError(pub Config);

impl core::fmt::Display for ConfigAlreadyInstalledError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "errtrail configuration is already installed")
    }
}

impl core::error::Error for ConfigAlreadyInstalledError {}

impl Config {
    /// Creates the default configuration: no locations, `-` as prefix
    /// separator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locations: false,
            prefix_separator: "-",
        }
    }

    /// Sets whether new layers capture the caller location.
    #[must_use]
    pub const fn locations(mut self, enabled: bool) -> Self {
        self.locations = enabled;
        self
    }

    /// Sets the separator placed between name prefix segments.
    #[must_use]
    pub const fn prefix_separator(mut self, separator: &'static str) -> Self {
        self.prefix_separator = separator;
        self
    }

    /// Returns whether new layers capture the caller location.
    #[inline]
    pub const fn locations_enabled(&self) -> bool {
        self.locations
    }

    /// Returns the separator placed between name prefix segments.
    #[inline]
    pub const fn separator(&self) -> &'static str {
        self.prefix_separator
    }

    /// Installs this configuration for the process.
    ///
    /// Fails if a configuration is already in place, including one created
    /// implicitly by [`insert_locations`] or [`do_not_insert_locations`]. Use
    /// [`replace`](Self::replace) to overwrite unconditionally.
    pub fn install(self) -> Result<(), ConfigAlreadyInstalledError> {
        CONFIG.try_init(self).map_err(ConfigAlreadyInstalledError)
    }

    /// Installs this configuration, returning the previous one if any.
    pub fn replace(self) -> Option<Config> {
        CONFIG.swap(self)
    }

    /// Returns the configuration currently in effect.
    #[inline]
    pub fn current() -> Config {
        CONFIG.load().unwrap_or_default()
    }
}

/// Turns location capture on for the whole process.
pub fn insert_locations() {
    CONFIG.update(Config::new, |config| config.locations = true);
}

/// Turns location capture off for the whole process.
pub fn do_not_insert_locations() {
    CONFIG.update(Config::new, |config| config.locations = false);
}
