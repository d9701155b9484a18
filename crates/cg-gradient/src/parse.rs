// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Stop-list grammar.
//!
//! One stop per line: `<position> [:] <color>`, where the position is a
//! decimal number or a fraction like `1/3` and the color is `#rgb`,
//! `#rrggbb`, or `rgb(...)`/`rgba(...)` with integer or percentage
//! components. The alpha component of `rgba()` is accepted and ignored.

use thiserror::Error;

use crate::stops::ColorStop;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("stop list is empty")]
    Empty,
    #[error("line {line}: cannot parse position '{token}'")]
    InvalidPosition { line: usize, token: String },
    #[error("line {line}: cannot parse color '{token}'")]
    InvalidColor { line: usize, token: String },
}

/// Parses a textual stop list into ordered (position, color) pairs.
///
/// Channel values are scaled to [0, 1]; positions are passed through
/// untouched. Semantic validation (count, ordering, ranges) happens in the
/// driver, not here.
pub fn parse_stops(text: &str) -> Result<Vec<ColorStop>, ParseError> {
    let mut stops = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let number = index + 1;

        let color_start = line
            .find(|c| c == '#' || c == 'r')
            .ok_or_else(|| ParseError::InvalidColor {
                line: number,
                token: line.to_string(),
            })?;
        let (position_part, color_part) = line.split_at(color_start);
        let position_token = position_part.trim().trim_end_matches(':').trim();
        let position = parse_position(position_token).ok_or_else(|| {
            ParseError::InvalidPosition {
                line: number,
                token: position_token.to_string(),
            }
        })?;
        let rgb = parse_color(color_part.trim()).ok_or_else(|| ParseError::InvalidColor {
            line: number,
            token: color_part.trim().to_string(),
        })?;
        stops.push(ColorStop { position, rgb });
    }
    if stops.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(stops)
}

fn parse_position(token: &str) -> Option<f64> {
    if token.is_empty() {
        return None;
    }
    if let Some((numerator, denominator)) = token.split_once('/') {
        let n: f64 = numerator.trim().parse().ok()?;
        let d: f64 = denominator.trim().parse().ok()?;
        if d == 0.0 {
            return None;
        }
        return Some(n / d);
    }
    token.parse().ok()
}

fn parse_color(token: &str) -> Option<[f64; 3]> {
    if let Some(hex) = token.strip_prefix('#') {
        return parse_hex(hex);
    }
    let inner = token
        .strip_prefix("rgba(")
        .or_else(|| token.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let mut channels = [0.0; 3];
    let mut parts = inner.split(',');
    for slot in channels.iter_mut() {
        let part = parts.next()?.trim();
        let value = if let Some(percent) = part.strip_suffix('%') {
            percent.trim().parse::<f64>().ok()? * 255.0 / 100.0
        } else {
            part.parse::<f64>().ok()?
        };
        *slot = value / 255.0;
    }
    // at most one trailing component (alpha), silently ignored
    match (parts.next(), parts.next()) {
        (_, Some(_)) => None,
        _ => Some(channels),
    }
}

fn parse_hex(hex: &str) -> Option<[f64; 3]> {
    let nibble = |c: u8| -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            b'A'..=b'F' => Some(c - b'A' + 10),
            _ => None,
        }
    };
    let bytes = hex.as_bytes();
    let rgb8 = match bytes.len() {
        3 => [
            nibble(bytes[0])? * 17,
            nibble(bytes[1])? * 17,
            nibble(bytes[2])? * 17,
        ],
        6 => [
            nibble(bytes[0])? << 4 | nibble(bytes[1])?,
            nibble(bytes[2])? << 4 | nibble(bytes[3])?,
            nibble(bytes[4])? << 4 | nibble(bytes[5])?,
        ],
        _ => return None,
    };
    Some([
        rgb8[0] as f64 / 255.0,
        rgb8[1] as f64 / 255.0,
        rgb8[2] as f64 / 255.0,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_documented_forms() {
        let text = "0 #333\n1/3: rgb(51, 127, 51)\n0.8 rgba(255, 50%, 0, 128)\n1 #ffcc00\n";
        let stops = parse_stops(text).unwrap();
        assert_eq!(stops.len(), 4);
        assert!((stops[0].rgb[0] - 51.0 / 255.0).abs() < 1e-12);
        assert!((stops[1].position - 1.0 / 3.0).abs() < 1e-12);
        assert!((stops[1].rgb[1] - 127.0 / 255.0).abs() < 1e-12);
        assert!((stops[2].rgb[1] - 0.5).abs() < 1e-12);
        assert!((stops[3].rgb[2] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn short_hex_expands_each_nibble() {
        let stops = parse_stops("0 #fa0\n1 #ffaa00").unwrap();
        assert_eq!(stops[0].rgb, stops[1].rgb);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let stops = parse_stops("0 #000\n\n  \n1 #fff\n").unwrap();
        assert_eq!(stops.len(), 2);
    }

    #[test]
    fn rejects_malformed_positions_and_colors() {
        assert!(matches!(
            parse_stops("zero #333\n"),
            Err(ParseError::InvalidColor { line: 1, .. }) | Err(ParseError::InvalidPosition { line: 1, .. })
        ));
        assert!(matches!(
            parse_stops("0 #12345\n"),
            Err(ParseError::InvalidColor { line: 1, .. })
        ));
        assert!(matches!(
            parse_stops("0 rgb(1, 2)\n"),
            Err(ParseError::InvalidColor { line: 1, .. })
        ));
        assert_eq!(parse_stops("   \n"), Err(ParseError::Empty));
    }
}
