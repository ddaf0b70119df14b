use palette::{FromColor, Lab, Srgb};

/// L* added per unit of brighten amount.
pub const LAB_BRIGHTEN_STEP: f32 = 18.0;

/// Parse a color specification into RGB.
///
/// Accepts `#rrggbb`, `#rgb` (the `#` is optional) and CSS color names.
pub fn parse_color(spec: &str) -> Option<(u8, u8, u8)> {
    let spec = spec.trim();
    if spec.is_empty() {
        return None;
    }
    if let Some(rgb) = parse_hex_color(spec) {
        return Some(rgb);
    }
    let named = palette::named::from_str(&spec.to_ascii_lowercase())?;
    Some((named.red, named.green, named.blue))
}

fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            Some((r * 17, g * 17, b * 17))
        }
        _ => None,
    }
}

/// Format RGB as a lowercase `#rrggbb` string.
pub fn hex_string((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Lighten a color by `amount` steps in CIE L*a*b* space (0.0 = no change).
///
/// Out-of-gamut results are clamped back into sRGB.
pub fn brighten((r, g, b): (u8, u8, u8), amount: f64) -> (u8, u8, u8) {
    if amount == 0.0 {
        return (r, g, b);
    }
    let rgb: Srgb = Srgb::new(r, g, b).into_format();
    let mut lab: Lab = Lab::from_color(rgb);
    lab.l += LAB_BRIGHTEN_STEP * amount as f32;
    let out: Srgb = Srgb::from_color(lab);
    let out: Srgb<u8> = out.into_format();
    (out.red, out.green, out.blue)
}

/// CIE L* of a color.
pub fn lightness((r, g, b): (u8, u8, u8)) -> f32 {
    let rgb: Srgb = Srgb::new(r, g, b).into_format();
    let lab: Lab = Lab::from_color(rgb);
    lab.l
}
