//! Presets for the landing page hero tagline.

use crate::types::TypewriterConfig;

/// Hero headline shown above the tagline.
pub const HERO_HEADLINE: &str = "Sustainability x Technology x Community";

/// Tagline phrases, cycled in order.
pub const HERO_PHRASES: [&str; 3] = [
    "Regenerative finance for planet-positive outcomes",
    "Tools that align people, planet, and purpose",
    "Open protocols for a circular, equitable future",
];

pub const HERO_TYPE_SPEED_MS: u64 = 26;
pub const HERO_PAUSE_MS: u64 = 1400;

/// The hero tagline configuration.
pub fn hero_tagline() -> TypewriterConfig {
    TypewriterConfig::new(HERO_PHRASES, HERO_TYPE_SPEED_MS, HERO_PAUSE_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hero_tagline_is_valid() {
        let config = hero_tagline();
        assert!(config.validate().is_ok());
        assert_eq!(config.phrases.len(), 3);
        assert_eq!(config.phrases[1], "Tools that align people, planet, and purpose");
        assert_eq!(config.type_speed_ms, 26);
        assert_eq!(config.pause_ms, 1400);
    }
}
