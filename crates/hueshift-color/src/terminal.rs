//! Terminal color approximation for swatches.

use crate::color::Color;

/// Channel values of the xterm 6×6×6 color cube (indices 16–231).
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Maps a color to the nearest entry of the xterm 256-color palette.
///
/// Both the 6×6×6 cube (16–231) and the 24-step gray ramp (232–255) are
/// considered; the candidate closest in RGB distance wins, the cube on ties.
///
/// ```rust
/// use hueshift_color::{terminal::to_ansi256, Color};
///
/// assert_eq!(to_ansi256(Color::from_rgb(254, 0, 0)), 196);
/// assert_eq!(to_ansi256(Color::from_rgb(128, 128, 128)), 244);
/// ```
pub fn to_ansi256(color: Color) -> u8 {
    let (r, g, b) = color.rgb();

    let (ri, gi, bi) = (cube_index(r), cube_index(g), cube_index(b));
    let cube = (CUBE_LEVELS[ri], CUBE_LEVELS[gi], CUBE_LEVELS[bi]);
    let cube_code = 16 + 36 * ri as u8 + 6 * gi as u8 + bi as u8;

    let average = (r as u16 + g as u16 + b as u16) / 3;
    let gray_step = (average.saturating_sub(3) / 10).min(23) as u8;
    let gray = 8 + 10 * gray_step;

    if distance((r, g, b), (gray, gray, gray)) < distance((r, g, b), cube) {
        232 + gray_step
    } else {
        cube_code
    }
}

fn cube_index(channel: u8) -> usize {
    let mut best = 0;
    for (i, level) in CUBE_LEVELS.iter().enumerate() {
        if channel.abs_diff(*level) < channel.abs_diff(CUBE_LEVELS[best]) {
            best = i;
        }
    }
    best
}

fn distance(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| (x.abs_diff(y) as u32).pow(2);
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}
