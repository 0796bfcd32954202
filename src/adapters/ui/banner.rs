//! ASCII banner with a vertical color gradient (COLDMAIL).

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Ice Blue (#5ee7ff).
const ICE_BLUE: (u8, u8, u8) = (0x5e, 0xe7, 0xff);
/// Mail Orange (#ff8c42).
const MAIL_ORANGE: (u8, u8, u8) = (0xff, 0x8c, 0x42);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Prints "COLDMAIL" in the standard figlet font with a gradient from Ice Blue to
/// Mail Orange, then the version line. Falls back to plain text if the font fails.
pub fn print_welcome() {
    let mut out = stdout();
    let art = FIGfont::standard()
        .ok()
        .and_then(|font| font.convert("COLDMAIL").map(|f| f.to_string()))
        .unwrap_or_else(|| "COLDMAIL\n".to_string());
    let lines: Vec<&str> = art.lines().collect();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(ICE_BLUE, MAIL_ORANGE, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let version = env!("CARGO_PKG_VERSION");
    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: MAIL_ORANGE.0,
        g: MAIL_ORANGE.1,
        b: MAIL_ORANGE.2,
    }));
    let _ = out.execute(Print(format!(
        "v{} · careers page in, cold emails out\r\n",
        version
    )));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp_rgb(ICE_BLUE, MAIL_ORANGE, 0.0), ICE_BLUE);
        assert_eq!(lerp_rgb(ICE_BLUE, MAIL_ORANGE, 1.0), MAIL_ORANGE);
    }
}
