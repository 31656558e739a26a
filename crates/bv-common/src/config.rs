/// Engine-side tunables, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Categories scoring below this cutoff get a recommendation
    /// (default: 70).
    pub attention_cutoff: f64,
    /// Floor applied to ranked matches when a request does not set its own
    /// `min_score` (default: 0, no filtering).
    pub default_min_match_score: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            attention_cutoff: 70.0,
            default_min_match_score: 0.0,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self {
            attention_cutoff: std::env::var("BV_ATTENTION_CUTOFF")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(70.0),
            default_min_match_score: std::env::var("BV_MIN_MATCH_SCORE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.attention_cutoff, 70.0);
        assert_eq!(config.default_min_match_score, 0.0);
    }
}
