//! Conversion between `#rrggbb` colors and the simulator's `r g b` float triples.

use crate::outcome::Decoded;
use rand::Rng;

/// Written in place of a color that is not a `#rrggbb` string.
pub const FALLBACK_RGB: &str = "1 1 1";

/// Returned for a float triple that cannot be read.
pub const UNKNOWN_COLOR: &str = "gray";

/// Converts `#rrggbb` into a space-separated normalized triple, each component
/// rounded to 4 decimals (`"#ff8000"` -> `"1 0.502 0"`).
///
/// Anything that is not a `#` followed by six hex digits yields
/// `Fallback("1 1 1")`.
pub fn to_normalized_rgb(hex: &str) -> Decoded<String> {
    match parse_hex(hex) {
        Some(channels) => Decoded::Parsed(
            channels
                .iter()
                .map(|&c| format_component(c as f64 / 255.0))
                .collect::<Vec<_>>()
                .join(" "),
        ),
        None => Decoded::Fallback(FALLBACK_RGB.to_owned()),
    }
}

/// Reads a normalized triple back into lowercase `#rrggbb`.
///
/// Brackets and commas are ignored, so `[0.5 0.5 0.5]`, `0.5, 0.5, 0.5` and a
/// four-component `[r g b a]` all parse. Each component is scaled by 255 and
/// truncated. Fewer than three numbers or a non-numeric component yields
/// `Fallback("gray")`.
pub fn from_normalized_rgb(text: &str) -> Decoded<String> {
    let cleaned = text.replace(['[', ']', ','], " ");
    let parts: Vec<&str> = cleaned.split_whitespace().collect();
    if parts.len() < 3 {
        return Decoded::Fallback(UNKNOWN_COLOR.to_owned());
    }

    let mut channels = [0u8; 3];
    for (slot, part) in channels.iter_mut().zip(&parts) {
        match part.parse::<f64>() {
            Ok(v) if v.is_finite() => *slot = (v * 255.0).trunc().clamp(0.0, 255.0) as u8,
            _ => return Decoded::Fallback(UNKNOWN_COLOR.to_owned()),
        }
    }

    Decoded::Parsed(format_hex(channels))
}

/// Picks a random color for a new goal pair.
///
/// Channels are drawn from `range` and then nudged to the nearest value that
/// reads back unchanged after a trip through the 4-decimal triple notation, so
/// a freshly generated pair keeps its exact color across save and load.
pub fn random_goal_color<R: Rng + ?Sized>(rng: &mut R, range: (u8, u8)) -> String {
    let (lo, hi) = if range.0 <= range.1 {
        range
    } else {
        (range.1, range.0)
    };
    let mut channels = [0u8; 3];
    for slot in &mut channels {
        let start = rng.gen_range(lo..=hi);
        *slot = (start..=hi)
            .chain(lo..start)
            .find(|&v| survives_notation(v))
            .unwrap_or(start);
    }
    format_hex(channels)
}

/// Nudges each channel of a `#rrggbb` color to the nearest value that reads
/// back unchanged from the triple notation, so a color picked in the editor
/// is the color the next load sees. Output is lowercase; anything that is not
/// `#rrggbb` is returned as is.
pub fn snap_color(color: &str) -> String {
    match parse_hex(color) {
        Some(channels) => format_hex(channels.map(nearest_surviving)),
        None => color.to_owned(),
    }
}

/// Ties go upward. 0 and 255 always survive, so a match exists.
fn nearest_surviving(v: u8) -> u8 {
    (0..=u8::MAX)
        .filter(|&c| survives_notation(c))
        .min_by_key(|&c| (c.abs_diff(v), c < v))
        .unwrap_or(v)
}

/// Whether a channel value is unchanged by encode (round to 4 places) then
/// decode (scale and truncate).
fn survives_notation(v: u8) -> bool {
    let rounded = round_to(v as f64 / 255.0, 4);
    (rounded * 255.0).trunc() as i64 == v as i64
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let mut channels = [0u8; 3];
    for (i, slot) in channels.iter_mut().enumerate() {
        *slot = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(channels)
}

fn format_hex([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn format_component(v: f64) -> String {
    format!("{}", round_to(v, 4))
}

/// Rounds to `places` decimals. Negative zero collapses to zero so it never
/// prints as `-0`.
pub(crate) fn round_to(v: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (v * scale).round() / scale + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn hex_to_triple_rounds_to_four_places() {
        assert_eq!(to_normalized_rgb("#ff8000").value(), "1 0.502 0");
        assert_eq!(to_normalized_rgb("#B18373").value(), "0.6941 0.5137 0.451");
    }

    #[test]
    fn malformed_hex_falls_back_to_white() {
        for input in ["not hex", "ff8000", "#ff80", "#ff80001", "#gg0000", ""] {
            let out = to_normalized_rgb(input);
            assert!(out.is_fallback(), "{input:?} should fall back");
            assert_eq!(out.value(), FALLBACK_RGB);
        }
    }

    #[test]
    fn triple_to_hex_truncates() {
        assert_eq!(from_normalized_rgb("[1, 0.502, 0]").value(), "#ff8000");
        assert_eq!(from_normalized_rgb("0.69 0.51 0.45").value(), "#af8272");
        // Alpha is ignored.
        assert_eq!(from_normalized_rgb("[0 0 1 .3]").value(), "#0000ff");
    }

    #[test]
    fn unreadable_triple_is_gray() {
        for input in ["not a color", "0.1 0.2", "[0.1 x 0.3]", "nan 0 0", ""] {
            let out = from_normalized_rgb(input);
            assert!(out.is_fallback(), "{input:?} should fall back");
            assert_eq!(out.value(), UNKNOWN_COLOR);
        }
    }

    #[test]
    fn snapped_colors_read_back_unchanged() {
        assert_eq!(snap_color("#010203"), "#000303");
        assert_eq!(snap_color("#FF8000"), "#ff8000");
        assert_eq!(snap_color("gray"), "gray");

        for color in ["#0a1b2c", "#123456", "#fedcba", "#7f7f7f"] {
            let snapped = snap_color(color);
            assert_eq!(snap_color(&snapped), snapped);
            let triple = to_normalized_rgb(&snapped).into_value();
            assert_eq!(from_normalized_rgb(&triple).into_value(), snapped);
        }
    }

    #[test]
    fn generated_colors_survive_the_triple_notation() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let color = random_goal_color(&mut rng, (50, 200));
            let triple = to_normalized_rgb(&color).into_value();
            assert_eq!(from_normalized_rgb(&triple).into_value(), color);
        }
    }
}
