//! Gold and emerald shard colors.
//!
//! Each particle gets one concrete color at startup: one of two shades of
//! its family, picked with equal odds. Palette entries are authored as sRGB
//! hex strings and stored as linear RGB, which is what the shader expects.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::particle::{ColorClass, Particle};

/// Background clear color of the viewer (sRGB).
pub const BACKGROUND_HEX: &str = "#000502";

/// Palette as written in a config file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PaletteConfig {
    pub gold: String,
    pub gold_dark: String,
    pub emerald: String,
    pub emerald_dark: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            gold: "#FFD700".into(),
            gold_dark: "#B8860B".into(),
            emerald: "#046307".into(),
            emerald_dark: "#002400".into(),
        }
    }
}

impl PaletteConfig {
    /// Parse every entry into linear RGB.
    pub fn resolve(&self) -> Result<ShardPalette, ConfigError> {
        Ok(ShardPalette {
            gold: srgb_hex_to_linear(&self.gold)?,
            gold_dark: srgb_hex_to_linear(&self.gold_dark)?,
            emerald: srgb_hex_to_linear(&self.emerald)?,
            emerald_dark: srgb_hex_to_linear(&self.emerald_dark)?,
        })
    }
}

/// Resolved palette in linear RGB.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShardPalette {
    pub gold: Vec3,
    pub gold_dark: Vec3,
    pub emerald: Vec3,
    pub emerald_dark: Vec3,
}

impl ShardPalette {
    /// The bright and dark shade for a color class.
    #[inline]
    pub fn shades(&self, class: ColorClass) -> [Vec3; 2] {
        match class {
            ColorClass::Primary => [self.gold, self.gold_dark],
            ColorClass::Secondary => [self.emerald, self.emerald_dark],
        }
    }

    /// Pick one of the two shades of `class` with equal probability.
    pub fn pick<R: Rng + ?Sized>(&self, class: ColorClass, rng: &mut R) -> Vec3 {
        let [bright, dark] = self.shades(class);
        if rng.gen_bool(0.5) {
            bright
        } else {
            dark
        }
    }
}

/// One entry of the instance color buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ColorRaw {
    pub color: [f32; 3],
}

impl From<Vec3> for ColorRaw {
    fn from(v: Vec3) -> Self {
        Self { color: v.to_array() }
    }
}

/// Build the instance color buffer, one entry per particle in table order.
pub fn assign_colors<R: Rng + ?Sized>(
    particles: &[Particle],
    palette: &ShardPalette,
    rng: &mut R,
) -> Vec<ColorRaw> {
    particles
        .iter()
        .map(|p| ColorRaw::from(palette.pick(p.color_class, rng)))
        .collect()
}

/// Parse `#RRGGBB` (leading `#` optional) into sRGB components in [0, 1].
pub fn parse_hex(hex: &str) -> Result<Vec3, ConfigError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidColor(hex.to_string()));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|_| ConfigError::InvalidColor(hex.to_string()))
    };

    Ok(Vec3::new(channel(0)?, channel(2)?, channel(4)?))
}

/// sRGB transfer function, one channel.
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.077_399_38
    } else {
        (c * 0.947_867_3 + 0.052_132_7).powf(2.4)
    }
}

/// Parse a hex color and convert it to linear RGB.
pub fn srgb_hex_to_linear(hex: &str) -> Result<Vec3, ConfigError> {
    let srgb = parse_hex(hex)?;
    Ok(Vec3::new(
        srgb_to_linear(srgb.x),
        srgb_to_linear(srgb.y),
        srgb_to_linear(srgb.z),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn particle(class: ColorClass) -> Particle {
        Particle {
            scatter_position: Vec3::ZERO,
            tree_position: Vec3::ZERO,
            base_rotation: Vec3::ZERO,
            scale: 1.0,
            color_class: class,
        }
    }

    #[test]
    fn test_parse_hex() {
        let c = parse_hex("#FFD700").unwrap();
        assert!((c.x - 1.0).abs() < 1e-6);
        assert!((c.y - 215.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.z, 0.0);

        assert_eq!(parse_hex("000000").unwrap(), Vec3::ZERO);
    }

    #[test]
    fn test_parse_hex_rejects_malformed() {
        for bad in ["", "#FFF", "#GGGGGG", "#FFD7000", "gold", "#ÿÿÿ", "#+F+F+F", "+0+0+0"] {
            assert!(parse_hex(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_srgb_to_linear() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-5);
        assert!((srgb_to_linear(0.5) - 0.214).abs() < 1e-3);
        // Linear segment near black
        assert!((srgb_to_linear(0.02) - 0.02 / 12.92).abs() < 1e-6);
    }

    #[test]
    fn test_default_palette_resolves() {
        let palette = PaletteConfig::default().resolve().unwrap();
        assert!((palette.gold.x - 1.0).abs() < 1e-5);
        assert!(palette.gold.y > palette.gold_dark.y);
        assert!(palette.emerald.y > palette.emerald_dark.y);
        assert!(palette.emerald_dark.x < 1e-6);
    }

    #[test]
    fn test_colors_stay_in_class() {
        let palette = PaletteConfig::default().resolve().unwrap();
        let mut rng = SmallRng::seed_from_u64(7);

        let particles: Vec<Particle> = (0..200)
            .map(|i| {
                if i % 3 == 0 {
                    particle(ColorClass::Secondary)
                } else {
                    particle(ColorClass::Primary)
                }
            })
            .collect();

        let colors = assign_colors(&particles, &palette, &mut rng);
        assert_eq!(colors.len(), particles.len());

        for (p, c) in particles.iter().zip(&colors) {
            let c = Vec3::from_array(c.color);
            assert!(palette.shades(p.color_class).contains(&c));
        }
    }

    #[test]
    fn test_both_shades_are_used() {
        let palette = PaletteConfig::default().resolve().unwrap();
        let mut rng = SmallRng::seed_from_u64(11);
        let particles = vec![particle(ColorClass::Primary); 1000];

        let colors = assign_colors(&particles, &palette, &mut rng);
        let bright = colors
            .iter()
            .filter(|c| Vec3::from_array(c.color) == palette.gold)
            .count();

        assert!((400..=600).contains(&bright), "bright count {bright}");
    }

    #[test]
    fn test_empty_table() {
        let palette = PaletteConfig::default().resolve().unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(assign_colors(&[], &palette, &mut rng).is_empty());
    }
}
