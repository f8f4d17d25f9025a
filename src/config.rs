//! Page tunables. Every field has a default matching the stock page, so a
//! JSON document only needs the keys it wants to override.

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct PageConfig {
    /// Name shown in the hero and finale sections.
    pub recipient: String,
    pub candle_count: usize,
    /// Particles in the burst fired on page load.
    pub initial_burst: usize,
    /// Particles appended by each gift open, pop or wish.
    pub follow_up_burst: usize,
    pub initial_delay_spread_secs: f64,
    pub follow_up_delay_spread_secs: f64,
    /// How long confetti stays visible after the burst that showed it.
    pub confetti_window_secs: f64,
    pub wish_delay_secs: f64,
    pub gift_open_delay_secs: f64,
    pub balloon_count: usize,
    /// `tracing` level filter: "error", "warn", "info", "debug", "trace" or "off".
    pub log_level: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            recipient: "Amishi".to_string(),
            candle_count: 5,
            initial_burst: 50,
            follow_up_burst: 30,
            initial_delay_spread_secs: 2.0,
            follow_up_delay_spread_secs: 1.0,
            confetti_window_secs: 6.0,
            wish_delay_secs: 0.5,
            gift_open_delay_secs: 0.5,
            balloon_count: 12,
            log_level: "info".to_string(),
        }
    }
}

impl PageConfig {
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_page() {
        let cfg = PageConfig::default();
        assert_eq!(cfg.candle_count, 5);
        assert_eq!(cfg.initial_burst, 50);
        assert_eq!(cfg.follow_up_burst, 30);
        assert_eq!(cfg.balloon_count, 12);
        assert!((cfg.confetti_window_secs - 6.0).abs() < f64::EPSILON);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = PageConfig::from_json(r#"{ "recipient": "Ravi", "balloon_count": 8 }"#).unwrap();
        assert_eq!(cfg.recipient, "Ravi");
        assert_eq!(cfg.balloon_count, 8);
        assert_eq!(cfg.candle_count, 5);
        assert_eq!(cfg.log_level, "info");
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn malformed_json_is_an_error() {
        assert!(PageConfig::from_json("{ recipient: ").is_err());
    }
}
