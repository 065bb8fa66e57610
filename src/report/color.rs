//! Parsing of `--bar-color` values into terminal colors.
//!
//! Accepted forms:
//! - a color name: `green`, `darkred`, `dark_red`, ...
//! - an RGB triple: `132,50,1`
//! - a raw ANSI 256-color code: `31`

use crossterm::style::Color;
use regex::Regex;

use crate::error::{Result, StatError};

/// Color of the usage bar when none is configured
pub const DEFAULT_BAR_COLOR: Color = Color::Green;

/// Parse a bar color name, RGB triple or ANSI code.
pub fn parse_color(input: &str) -> Result<Color> {
    let color = input.trim().to_ascii_lowercase();
    let rgb_re = Regex::new(r"^(?P<r>\d{1,3}),(?P<g>\d{1,3}),(?P<b>\d{1,3})$")
        .map_err(|e| StatError::InvalidColor(e.to_string()))?;
    let ansi_re =
        Regex::new(r"^(?P<code>\d{1,3})$").map_err(|e| StatError::InvalidColor(e.to_string()))?;

    if let Some(caps) = rgb_re.captures(&color) {
        let channel = |name: &str| {
            caps[name].parse::<u8>().map_err(|_| {
                StatError::InvalidColor(format!(
                    "invalid '{name}' value in '{color}'; valid numbers are 0-255"
                ))
            })
        };
        return Ok(Color::Rgb {
            r: channel("r")?,
            g: channel("g")?,
            b: channel("b")?,
        });
    }

    if let Some(caps) = ansi_re.captures(&color) {
        let code = caps["code"].parse::<u8>().map_err(|_| {
            StatError::InvalidColor(format!(
                "invalid ANSI code '{color}'; valid numbers are 0-255"
            ))
        })?;
        return Ok(Color::AnsiValue(code));
    }

    match color.replace('_', "").as_str() {
        "black" => Ok(Color::Black),
        "darkgrey" | "darkgray" => Ok(Color::DarkGrey),
        "red" => Ok(Color::Red),
        "darkred" => Ok(Color::DarkRed),
        "green" => Ok(Color::Green),
        "darkgreen" => Ok(Color::DarkGreen),
        "yellow" => Ok(Color::Yellow),
        "darkyellow" => Ok(Color::DarkYellow),
        "blue" => Ok(Color::Blue),
        "darkblue" => Ok(Color::DarkBlue),
        "magenta" => Ok(Color::Magenta),
        "darkmagenta" => Ok(Color::DarkMagenta),
        "cyan" => Ok(Color::Cyan),
        "darkcyan" => Ok(Color::DarkCyan),
        "white" => Ok(Color::White),
        "grey" | "gray" => Ok(Color::Grey),
        _ => Err(StatError::InvalidColor(format!(
            "unknown color name '{input}'"
        ))),
    }
}
