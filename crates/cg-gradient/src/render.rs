// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Presentation of finished gradients.
//!
//! Format contracts: the CSV carries the raw float channel values under a
//! `x,r,g,b` header, and the HTML fragment renders one labeled swatch per
//! sample, choosing light or dark label text by the swatch's relative
//! luminance.

use std::fmt::Write;

use cg_ucs::relative_luminance;

/// CSV with one row per output sample.
pub fn to_csv(positions: &[f64], colors: &[[f64; 3]]) -> String {
    let mut out = String::from("x,r,g,b\n");
    for (x, [r, g, b]) in positions.iter().zip(colors) {
        let _ = writeln!(out, "{x},{r},{g},{b}");
    }
    out
}

/// HTML fragment with one labeled swatch `<div>` per sample.
pub fn to_html(positions: &[f64], colors: &[[f64; 3]]) -> String {
    let mut out = String::from("<div class=\"gradient\">\n");
    for (_, rgb) in positions.iter().zip(colors) {
        let css = format!(
            "rgb({:.1}%, {:.1}%, {:.1}%)",
            rgb[0] * 100.0,
            rgb[1] * 100.0,
            rgb[2] * 100.0
        );
        let class = if relative_luminance(*rgb) < 0.5 {
            "light-text"
        } else {
            "dark-text"
        };
        let _ = writeln!(
            out,
            "<div class=\"{class}\" style=\"background-color: {css};\">{css}</div>"
        );
    }
    out.push_str("</div>\n");
    out
}

/// Truecolor terminal swatches, one line per sample. Requires a 24-bit
/// color capable terminal.
pub fn to_ansi(positions: &[f64], colors: &[[f64; 3]]) -> String {
    let mut out = String::new();
    for (x, rgb) in positions.iter().zip(colors) {
        let [r, g, b] = rgb8(*rgb);
        let fg = if relative_luminance(*rgb) < 0.5 {
            "255;255;255"
        } else {
            "0;0;0"
        };
        let _ = writeln!(
            out,
            "\x1b[38;2;{fg}m\x1b[48;2;{r};{g};{b}m{x:.4} [{r:3}, {g:3}, {b:3}]\x1b[0m"
        );
    }
    out
}

fn rgb8(rgb: [f64; 3]) -> [u8; 3] {
    [
        (rgb[0] * 255.0).round().clamp(0.0, 255.0) as u8,
        (rgb[1] * 255.0).round().clamp(0.0, 255.0) as u8,
        (rgb[2] * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<f64>, Vec<[f64; 3]>) {
        (
            vec![0.0, 0.5, 1.0],
            vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5], [1.0, 1.0, 1.0]],
        )
    }

    #[test]
    fn csv_has_header_and_one_row_per_sample() {
        let (x, y) = sample();
        let csv = to_csv(&x, &y);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "x,r,g,b");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "0.5,0.5,0.5,0.5");
    }

    #[test]
    fn html_labels_dark_swatches_with_light_text() {
        let (x, y) = sample();
        let html = to_html(&x, &y);
        assert_eq!(html.matches("<div class=").count(), 4);
        assert!(html.contains("light-text"));
        assert!(html.contains("dark-text"));
        assert!(html.starts_with("<div class=\"gradient\">\n"));
        assert!(html.ends_with("</div>\n"));
    }

    #[test]
    fn ansi_resets_after_every_swatch() {
        let (x, y) = sample();
        let ansi = to_ansi(&x, &y);
        assert_eq!(ansi.matches("\x1b[0m").count(), 3);
        assert!(ansi.contains("\x1b[48;2;255;255;255m"));
    }
}
