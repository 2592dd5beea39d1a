//! Colour parsing, format conversion and palette generation.

use serde::Serialize;

use crate::error::{WidgetError, WidgetResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue in degrees, saturation and lightness as fractions (0.0..=1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ColorFormats {
    pub hex: String,
    pub rgb: String,
    pub hsl: String,
    pub cmyk: String,
}

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Accepts `#RRGGBB`, `RRGGBB` and the `#RGB` shorthand, in any case.
pub fn parse_hex(input: &str) -> WidgetResult<Rgb> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(WidgetError::invalid("hex color", input));
    }
    let expanded: String = match digits.len() {
        6 => digits.to_string(),
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        _ => return Err(WidgetError::invalid("hex color", input)),
    };
    let channel = |idx: usize| {
        u8::from_str_radix(&expanded[idx..idx + 2], 16)
            .map_err(|_| WidgetError::invalid("hex color", input))
    };
    Ok(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }
    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let sector = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    Hsl {
        h: sector * 60.0,
        s,
        l,
    }
}

pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = hsl.h.rem_euclid(360.0) / 360.0;
    let s = hsl.s.clamp(0.0, 1.0);
    let l = hsl.l.clamp(0.0, 1.0);
    let to_channel = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    if s == 0.0 {
        let v = to_channel(l);
        return Rgb { r: v, g: v, b: v };
    }
    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;
    let hue = |mut t: f64| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    Rgb {
        r: to_channel(hue(h + 1.0 / 3.0)),
        g: to_channel(hue(h)),
        b: to_channel(hue(h - 1.0 / 3.0)),
    }
}

/// CMYK percentages, rounded. Pure black maps to `0, 0, 0, 100`.
pub fn rgb_to_cmyk(rgb: Rgb) -> (u8, u8, u8, u8) {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;
    let k = 1.0 - r.max(g).max(b);
    let part = |v: f64| {
        if k >= 1.0 {
            0.0
        } else {
            (1.0 - v - k) / (1.0 - k)
        }
    };
    (
        percent(part(r)),
        percent(part(g)),
        percent(part(b)),
        percent(k),
    )
}

fn percent(fraction: f64) -> u8 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}

pub fn color_formats_internal(hex: &str) -> WidgetResult<ColorFormats> {
    let rgb = parse_hex(hex)?;
    let hsl = rgb_to_hsl(rgb);
    let (c, m, y, k) = rgb_to_cmyk(rgb);
    Ok(ColorFormats {
        hex: rgb.to_hex().to_uppercase(),
        rgb: format!("rgb({}, {}, {})", rgb.r, rgb.g, rgb.b),
        hsl: format!(
            "hsl({}, {}%, {}%)",
            hsl.h.round() as u16 % 360,
            percent(hsl.s),
            percent(hsl.l)
        ),
        cmyk: format!("cmyk({c}%, {m}%, {y}%, {k}%)"),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteScheme {
    Analogous,
    Complementary,
    Triadic,
    Monochrome,
}

impl PaletteScheme {
    pub fn parse(input: &str) -> WidgetResult<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "" | "analogous" => Ok(Self::Analogous),
            "complementary" => Ok(Self::Complementary),
            "triadic" => Ok(Self::Triadic),
            "monochrome" | "monochromatic" => Ok(Self::Monochrome),
            other => Err(WidgetError::unsupported("palette scheme", other)),
        }
    }

    /// Hue rotation in degrees and lightness shift for each generated swatch.
    fn steps(self) -> [(f64, f64); 4] {
        match self {
            Self::Analogous => [(30.0, 0.0), (60.0, 0.0), (90.0, 0.0), (120.0, 0.0)],
            Self::Complementary => [(180.0, 0.0), (150.0, 0.0), (210.0, 0.0), (30.0, 0.0)],
            Self::Triadic => [(120.0, 0.0), (240.0, 0.0), (120.0, 0.15), (240.0, 0.15)],
            Self::Monochrome => [(0.0, -0.2), (0.0, -0.1), (0.0, 0.1), (0.0, 0.2)],
        }
    }
}

/// Base colour followed by four derived swatches, all as lowercase `#rrggbb`.
pub fn generate_palette_internal(base: &str, scheme: &str) -> WidgetResult<Vec<String>> {
    let scheme = PaletteScheme::parse(scheme)?;
    let rgb = parse_hex(base)?;
    let hsl = rgb_to_hsl(rgb);
    let mut palette = Vec::with_capacity(5);
    palette.push(rgb.to_hex());
    for (rotate, lighten) in scheme.steps() {
        let swatch = hsl_to_rgb(Hsl {
            h: hsl.h + rotate,
            s: hsl.s,
            l: hsl.l + lighten,
        });
        palette.push(swatch.to_hex());
    }
    log::debug!("palette {scheme:?} from {base}: {palette:?}");
    Ok(palette)
}
