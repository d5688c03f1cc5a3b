//! Conversion from token values to terminal styling.
//!
//! Tokens carry CSS-shaped strings; the terminal needs `ratatui` colors and
//! cell counts. Conversion failures surface as errors before a frame is
//! drawn — a malformed token value must not render as some fallback color.

use crate::components::StyleDescriptor;
use anyhow::{Context, Result};
use ratatui::style::{Color, Modifier, Style};

/// Parses a `#rrggbb` token value into an RGB color.
pub fn color_from_hex(value: &str) -> Result<Color> {
    let hex = value
        .strip_prefix('#')
        .with_context(|| format!("expected hex color, got `{}`", value))?;
    anyhow::ensure!(hex.len() == 6, "expected #rrggbb, got `{}`", value);
    let packed =
        u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex color `{}`", value))?;
    let r = ((packed >> 16) & 0xff) as u8;
    let g = ((packed >> 8) & 0xff) as u8;
    let b = (packed & 0xff) as u8;
    Ok(Color::Rgb(r, g, b))
}

/// Converts a `<n>px` token value to terminal cells (8px per cell, at least
/// one).
pub fn cells_from_px(value: &str) -> Result<u16> {
    let px: u16 = value
        .strip_suffix("px")
        .with_context(|| format!("expected px length, got `{}`", value))?
        .trim()
        .parse()
        .with_context(|| format!("invalid px length `{}`", value))?;
    Ok((px / 8).max(1))
}

/// Converts a component style descriptor to a terminal style.
///
/// The hover lift maps to bold, the missing shadow of a disabled component
/// maps to dim.
pub fn style_from_descriptor(descriptor: &StyleDescriptor) -> Result<Style> {
    let mut style = Style::default()
        .bg(color_from_hex(&descriptor.background)?)
        .fg(color_from_hex(&descriptor.foreground)?);
    if descriptor.transform.is_some() {
        style = style.add_modifier(Modifier::BOLD);
    }
    if descriptor.box_shadow.is_none() {
        style = style.add_modifier(Modifier::DIM);
    }
    Ok(style)
}
