/// Key holding a top-level value that is not a field-bearing object.
pub const ESCAPE_KEY: &str = "__value";

/// Field prefix of an error collection created without one.
pub const DEFAULT_PREFIX: &str = "errors";

/// Message of the detail substituted for an unusable factory input.
pub const FALLBACK_MESSAGE: &str = "Unrecognized error value";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub escape_key: String,
    pub default_prefix: String,
    pub fallback_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            escape_key: ESCAPE_KEY.to_string(),
            default_prefix: DEFAULT_PREFIX.to_string(),
            fallback_message: FALLBACK_MESSAGE.to_string(),
        }
    }
}
