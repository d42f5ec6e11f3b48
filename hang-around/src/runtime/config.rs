use crate::error::AlreadyInitialized;

use std::env;
use std::sync::OnceLock;

/// Environment variable overriding [`Config::stack_size`].
pub const STACK_SIZE_ENV: &str = "HANG_AROUND_STACK_SIZE";

/// Environment variable overriding [`Config::name_prefix`].
pub const NAME_PREFIX_ENV: &str = "HANG_AROUND_NAME_PREFIX";

static GLOBAL: OnceLock<Config> = OnceLock::new();

/// Process-wide defaults applied to every new execution context.
///
/// The active configuration is resolved once, the first time a context
/// is spawned: an explicitly [installed](Config::install) configuration
/// wins, otherwise [`Config::from_env`] is used.
///
/// Individual spawns can still override these through
/// [`Builder`](crate::Builder).
///
/// # Examples
///
/// ```rust,ignore
/// use hang_around::Config;
///
/// Config {
///     stack_size: 128 * 1024,
///     ..Config::default()
/// }
/// .install()
/// .expect("configured twice");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Stack size, in bytes, of each context.
    ///
    /// Contexts only ever run sequential task code and park while waiting,
    /// so they get by with a fraction of a default thread stack.
    pub stack_size: usize,

    /// Prefix of context names. The context id is appended to it.
    pub name_prefix: String,
}

impl Config {
    /// Default context stack size: 256 KiB.
    pub const DEFAULT_STACK_SIZE: usize = 256 * 1024;

    /// Default context name prefix.
    pub const DEFAULT_NAME_PREFIX: &'static str = "hang-around";

    /// Builds a configuration from the defaults, overridden by
    /// [`STACK_SIZE_ENV`] and [`NAME_PREFIX_ENV`] when they are set.
    ///
    /// Unparsable or zero stack sizes are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var(STACK_SIZE_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(bytes) if bytes > 0 => config.stack_size = bytes,
                _ => tracing::warn!(
                    variable = STACK_SIZE_ENV,
                    value = %raw,
                    "ignoring invalid stack size"
                ),
            }
        }

        if let Ok(prefix) = env::var(NAME_PREFIX_ENV)
            && !prefix.is_empty()
        {
            config.name_prefix = prefix;
        }

        config
    }

    /// Installs this configuration as the process-wide default.
    ///
    /// Must happen before the first context is spawned; afterwards the
    /// configuration is frozen.
    ///
    /// # Panics
    ///
    /// Panics if `stack_size` is zero.
    pub fn install(self) -> Result<(), AlreadyInitialized> {
        assert!(self.stack_size > 0, "stack_size must be > 0");

        GLOBAL.set(self).map_err(|_| AlreadyInitialized("global configuration"))
    }

    /// Returns the active process-wide configuration.
    pub fn global() -> &'static Config {
        GLOBAL.get_or_init(Config::from_env)
    }

    /// Formats the default name of the context with the given number.
    pub(crate) fn context_name(&self, number: u64) -> String {
        format!("{}-{}", self.name_prefix, number)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stack_size: Self::DEFAULT_STACK_SIZE,
            name_prefix: Self::DEFAULT_NAME_PREFIX.to_string(),
        }
    }
}
