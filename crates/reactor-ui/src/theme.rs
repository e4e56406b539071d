//! Reactor palette and color helpers

use ecolor::Color32;

/// Shared color constants for the reactor control
pub mod colors {
    use egui::Color32;

    pub const REACTOR_PURPLE: Color32 = Color32::from_rgb(0x77, 0x5F, 0xD8); // Bars and meter
    pub const CYAN_ACCENT: Color32 = Color32::from_rgb(0, 229, 255); // Selection outline
    pub const DARK_GREY: Color32 = Color32::from_rgb(18, 18, 24); // Panel background
    pub const DARKER_GREY: Color32 = Color32::from_rgb(5, 5, 8); // Canvas background
    pub const LIGHTER_GREY: Color32 = Color32::from_rgb(40, 40, 45); // Header background
    pub const STROKE_GREY: Color32 = Color32::from_rgb(80, 80, 90); // Borders
}

/// Parse `#RRGGBB` (or `#RGB`, `#RRGGBBAA`) into a color
pub fn parse_hex(text: &str) -> Option<Color32> {
    let text = text.trim();
    if !text.starts_with('#') {
        return None;
    }
    Color32::from_hex(text).ok()
}

/// Format as `#RRGGBB`, dropping alpha
pub fn to_hex_rgb(color: Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#775FD8"), Some(colors::REACTOR_PURPLE));
        assert_eq!(parse_hex(" #775fd8 "), Some(colors::REACTOR_PURPLE));
        assert_eq!(parse_hex("775FD8"), None);
        assert_eq!(parse_hex("#77"), None);
        assert_eq!(parse_hex("#GGGGGG"), None);
    }

    #[test]
    fn test_to_hex_rgb() {
        assert_eq!(to_hex_rgb(colors::REACTOR_PURPLE), "#775FD8");
        assert_eq!(parse_hex(&to_hex_rgb(colors::CYAN_ACCENT)), Some(colors::CYAN_ACCENT));
    }
}
