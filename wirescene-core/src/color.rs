/// HSL colors for outlines and their 8-bit RGB form
use rand::Rng;

use crate::config::ShapeRanges;

/// Hue in degrees, saturation and lightness in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const RED: Hsl = Hsl::new(0.0, 1.0, 0.5);
pub const YELLOW: Hsl = Hsl::new(60.0, 1.0, 0.5);
pub const BLUE: Hsl = Hsl::new(240.0, 1.0, 0.5);

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Draw a color from the hue, saturation and lightness ranges
    pub fn random<R: Rng + ?Sized>(ranges: &ShapeRanges, rng: &mut R) -> Self {
        Self {
            h: ranges.hue.sample(rng),
            s: ranges.saturation.sample(rng),
            l: ranges.lightness.sample(rng),
        }
    }

    pub fn to_rgb(&self) -> Rgb {
        let h = self.h.rem_euclid(360.0) / 60.0;
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;

        Rgb {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }

    /// CSS `hsl()` notation
    pub fn css(&self) -> String {
        format!(
            "hsl({:.1}, {:.1}%, {:.1}%)",
            self.h,
            self.s * 100.0,
            self.l * 100.0
        )
    }
}
