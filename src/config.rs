use chrono::Duration;
use serde::Deserialize;

/// Default minimum period length in seconds. Registration and voting periods
/// must be strictly longer than this.
pub const DEFAULT_MIN_PERIOD: u32 = 20;

/// Registry configuration. This struct is owned by the registry and can be
/// deserialized from whatever configuration source the embedding application
/// uses.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    min_period: u32,
}

impl Config {
    /// Shortest legal registration or voting period, in seconds.
    /// Periods must strictly exceed this.
    pub fn min_period(&self) -> Duration {
        Duration::seconds(self.min_period.into())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_period: DEFAULT_MIN_PERIOD,
        }
    }
}
