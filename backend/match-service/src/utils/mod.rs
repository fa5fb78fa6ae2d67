// Utility functions for match-service

pub mod random;

use crate::config::LimitsConfig;

/// Colour keywords recognised in product names. Multi-word colours come
/// first so "Navy Blue" wins over "Blue".
const COLOUR_KEYWORDS: &[&str] = &[
    "Navy Blue",
    "Off White",
    "Coffee Brown",
    "Grey Melange",
    "Lime Green",
    "Sea Green",
    "Turquoise Blue",
    "Mushroom Brown",
    "Fluorescent Green",
    "Blue",
    "Silver",
    "Black",
    "Grey",
    "Green",
    "Purple",
    "Beige",
    "Brown",
    "White",
    "Bronze",
    "Teal",
    "Copper",
    "Pink",
    "Maroon",
    "Red",
    "Khaki",
    "Orange",
    "Yellow",
    "Gold",
    "Tan",
    "Magenta",
    "Lavender",
    "Cream",
    "Peach",
    "Olive",
    "Burgundy",
    "Rust",
    "Rose",
    "Mauve",
    "Metallic",
    "Mustard",
    "Taupe",
    "Nude",
    "Charcoal",
    "Steel",
    "Skin",
];

/// First colour keyword contained in `name`, case-insensitive.
pub fn extract_colour_from_name(name: &str) -> Option<&'static str> {
    let name = name.to_lowercase();
    COLOUR_KEYWORDS
        .iter()
        .find(|colour| name.contains(&colour.to_lowercase()))
        .copied()
}

/// Clamp a caller-supplied result count into the configured range.
/// Missing values fall back to the default.
pub fn clamp_limit(requested: Option<i64>, limits: &LimitsConfig) -> usize {
    match requested {
        None => limits.default,
        Some(value) if value < limits.min as i64 => limits.min,
        Some(value) if value > limits.max as i64 => limits.max,
        Some(value) => value as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_colour_prefers_longer_phrase() {
        assert_eq!(extract_colour_from_name("Men Navy Blue Polo"), Some("Navy Blue"));
        assert_eq!(extract_colour_from_name("blue denim jacket"), Some("Blue"));
        assert_eq!(extract_colour_from_name("Classic Watch"), None);
    }

    #[test]
    fn test_clamp_limit() {
        let limits = LimitsConfig::default();
        assert_eq!(clamp_limit(None, &limits), 5);
        assert_eq!(clamp_limit(Some(9), &limits), 9);
        assert_eq!(clamp_limit(Some(0), &limits), 1);
        assert_eq!(clamp_limit(Some(-4), &limits), 1);
        assert_eq!(clamp_limit(Some(500), &limits), 50);
    }
}
