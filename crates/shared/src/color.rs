//! Material color parsing and comparison.
//!
//! Accepts `#rrggbb`, `#rgb` (any case) and the CSS basic color keywords.

/// An 8-bit RGB triple
pub type Rgb = [u8; 3];

const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("black", [0x00, 0x00, 0x00]),
    ("silver", [0xc0, 0xc0, 0xc0]),
    ("gray", [0x80, 0x80, 0x80]),
    ("grey", [0x80, 0x80, 0x80]),
    ("white", [0xff, 0xff, 0xff]),
    ("maroon", [0x80, 0x00, 0x00]),
    ("red", [0xff, 0x00, 0x00]),
    ("purple", [0x80, 0x00, 0x80]),
    ("fuchsia", [0xff, 0x00, 0xff]),
    ("magenta", [0xff, 0x00, 0xff]),
    ("green", [0x00, 0x80, 0x00]),
    ("lime", [0x00, 0xff, 0x00]),
    ("olive", [0x80, 0x80, 0x00]),
    ("yellow", [0xff, 0xff, 0x00]),
    ("navy", [0x00, 0x00, 0x80]),
    ("blue", [0x00, 0x00, 0xff]),
    ("teal", [0x00, 0x80, 0x80]),
    ("aqua", [0x00, 0xff, 0xff]),
    ("cyan", [0x00, 0xff, 0xff]),
    ("orange", [0xff, 0xa5, 0x00]),
];

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Parse a color string into RGB. Returns `None` for anything unrecognised.
pub fn parse_color(input: &str) -> Option<Rgb> {
    let s = input.trim();
    if let Some(hex) = s.strip_prefix('#') {
        let digits: Vec<u8> = hex.bytes().map(hex_digit).collect::<Option<_>>()?;
        return match digits.len() {
            6 => Some([
                digits[0] * 16 + digits[1],
                digits[2] * 16 + digits[3],
                digits[4] * 16 + digits[5],
            ]),
            3 => Some([digits[0] * 17, digits[1] * 17, digits[2] * 17]),
            _ => None,
        };
    }

    let lower = s.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, rgb)| *rgb)
}

/// Format RGB as lowercase `#rrggbb`
pub fn to_hex([r, g, b]: Rgb) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Compare two colors after normalization.
///
/// When either side does not parse, falls back to a trimmed,
/// case-insensitive string comparison.
pub fn colors_equal(a: &str, b: &str) -> bool {
    match (parse_color(a), parse_color(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a.trim().eq_ignore_ascii_case(b.trim()),
    }
}
