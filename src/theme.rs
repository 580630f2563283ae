//! Colour theme: One Dark defaults, btop-style `theme[key]="value"` files, accessibility palettes.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// One Dark palette and UI colours loaded from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Item colours (index 0..=2): carrot, cabbage, bone.
    pub items: [Color; 3],
    pub player: Color,
    pub hazard: Color,
    /// Lives indicator.
    pub heart: Color,
    /// Playfield background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, difficulty).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text (hints, inactive hunter).
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

/// Colour literal baked into the binary.
const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

impl Theme {
    /// Hardcoded One Dark defaults (hex values from onedark.theme).
    pub fn onedark_default() -> Self {
        Self {
            items: [
                rgb(0xD1_9A66), // orange: carrot
                rgb(0x98_C379), // green: cabbage
                rgb(0xC6_78DD), // magenta: bone
            ],
            player: rgb(0xFF_FFFF),
            hazard: rgb(0xE0_6C75),
            heart: rgb(0xE0_6C75),
            bg: rgb(0x28_2C34),
            div_line: rgb(0x3F_444F),
            main_fg: rgb(0xAB_B2BF),
            title: rgb(0xE5_C07B),
            inactive_fg: rgb(0x5C_6370),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark defaults if path is None or the file is missing.
    /// `palette` selects colour variant: Normal (theme), HighContrast, or Colorblind.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Default theme for a palette when no file is loaded.
    pub fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::onedark_default();
        t.apply_palette(palette);
        t
    }

    /// Override item and entity colours for high-contrast or colorblind.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.items = [rgb(0xFF_8800), rgb(0x00_FF00), rgb(0xFF_00FF)];
                self.player = rgb(0xFF_FFFF);
                self.hazard = rgb(0xFF_0000);
                self.heart = rgb(0xFF_0000);
            }
            crate::Palette::Colorblind => {
                // Okabe-Ito: orange / bluish green / reddish purple, vermillion hunter.
                self.items = [rgb(0xE6_9F00), rgb(0x00_9E73), rgb(0xCC_79A7)];
                self.hazard = rgb(0xD5_5E00);
                self.heart = rgb(0xD5_5E00);
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .and_then(|v| parse_hex(v.trim_matches('"').trim_matches('\'').trim()).ok())
        };
        let d = Self::onedark_default();
        Self {
            items: [
                get("cpu_mid").or_else(|| get("temp_mid")).unwrap_or(d.items[0]),
                get("mem_box").or_else(|| get("cpu_start")).unwrap_or(d.items[1]),
                get("net_box").unwrap_or(d.items[2]),
            ],
            player: get("hi_fg").unwrap_or(d.player),
            hazard: get("cpu_end").or_else(|| get("temp_end")).unwrap_or(d.hazard),
            heart: get("cpu_end").unwrap_or(d.heart),
            bg: get("main_bg").or_else(|| get("meter_bg")).unwrap_or(d.bg),
            div_line: get("div_line").unwrap_or(d.div_line),
            main_fg: get("main_fg").unwrap_or(d.main_fg),
            title: get("title").unwrap_or(d.title),
            inactive_fg: get("inactive_fg").unwrap_or(d.inactive_fg),
        }
    }

    /// Item colour for theme index (0..3).
    #[inline]
    pub fn item_color(&self, index: u8) -> Color {
        self.items[(index as usize) % 3]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    if !s.is_ascii() {
        return Err(ThemeError::InvalidHex(s.to_string()));
    }
    let (r, g, b) = if s.len() == 6 {
        let r =
            u8::from_str_radix(&s[0..2], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        let g =
            u8::from_str_radix(&s[2..4], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        let b =
            u8::from_str_radix(&s[4..6], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        (r, g, b)
    } else if s.len() == 3 {
        let r = u8::from_str_radix(&s[0..1], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        let g = u8::from_str_radix(&s[1..2], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        let b = u8::from_str_radix(&s[2..3], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        (r, g, b)
    } else {
        return Err(ThemeError::InvalidHex(s.to_string()));
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#GGHHII").is_err());
        assert!(matches!(parse_hex("#aé123"), Err(ThemeError::InvalidHex(_))));
        assert!(parse_hex("é1").is_err());
    }

    #[test]
    fn test_from_map_overrides_and_falls_back() {
        let map = parse_theme_file(
            "# comment\ntheme[net_box]=\"#102030\"\ntheme[title]='#FFF'\n",
        );
        let t = Theme::from_map(&map);
        assert!(matches!(t.item_color(2), Color::Rgb(0x10, 0x20, 0x30)));
        assert!(matches!(t.title, Color::Rgb(255, 255, 255)));
        assert_eq!(t.items[0], Theme::onedark_default().items[0]);
    }

    #[test]
    fn test_missing_file_uses_palette_default() {
        let t = Theme::load(
            Some(Path::new("/nonexistent/rabbit.theme")),
            crate::Palette::HighContrast,
        )
        .unwrap();
        assert!(matches!(t.hazard, Color::Rgb(255, 0, 0)));
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[meter_bg]="#31353F""##);
        assert_eq!(map.get("meter_bg"), Some(&"#31353F".to_string()));
    }
}
