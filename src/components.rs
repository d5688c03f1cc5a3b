//! Renderable design-system primitives.
//!
//! Each component is a pure function from (variant, resolved tokens) to a
//! [`StyleDescriptor`]. Components own no state: hover/press is a transient
//! [`Interaction`] flag passed in by the rendering boundary, never stored in
//! the data model.

use crate::resolver::ResolvedTokenSet;
use crate::state::GateStatus;
use crate::tokens::TokenError;
use crate::variants::{palette_for, status_palette_for, Intent};

/// Transient pointer-interaction flag owned by the rendering environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Hover,
    Pressed,
}

/// CSS-shaped style description produced by a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDescriptor {
    pub background: String,
    pub foreground: String,
    pub border: Option<String>,
    pub border_radius: String,
    pub padding: String,
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub font_weight: Option<String>,
    pub box_shadow: Option<String>,
    /// Hover lift; only present for the hover interaction.
    pub transform: Option<String>,
}

/// Primary action button.
///
/// Palette comes from the intent table; structure comes from fixed tokens
/// (radius.md, spacing sm/lg padding, typography, shadow.soft). Hover lifts
/// the button, press cancels the lift, disabled drops shadow and interaction
/// effects entirely.
pub fn base_button(
    intent: Intent,
    interaction: Interaction,
    disabled: bool,
    resolved: &ResolvedTokenSet,
) -> Result<StyleDescriptor, TokenError> {
    let palette = palette_for(intent, resolved)?;
    let box_shadow = if disabled {
        None
    } else {
        Some(resolved.shadow("soft")?.to_string())
    };
    let transform = match interaction {
        Interaction::Hover if !disabled => Some("translateY(-1px)".to_string()),
        _ => None,
    };
    Ok(StyleDescriptor {
        background: palette.background,
        foreground: palette.foreground,
        border: Some(format!("1px solid {}", resolved.color("border")?)),
        border_radius: resolved.radius("md")?.to_string(),
        padding: format!("{} {}", resolved.spacing("sm")?, resolved.spacing("lg")?),
        font_family: Some(resolved.typography("font_family")?.to_string()),
        font_size: Some(resolved.typography("font_size_md")?.to_string()),
        font_weight: Some(resolved.typography("font_weight_semibold")?.to_string()),
        box_shadow,
        transform,
    })
}

/// Compact Clean/Dirty indicator.
///
/// The accent follows `status_palette_for`; the chip itself sits on the
/// surface color with an accent border.
pub fn status_chip(
    status: GateStatus,
    resolved: &ResolvedTokenSet,
) -> Result<StyleDescriptor, TokenError> {
    let accent = status_palette_for(status, resolved)?.accent;
    Ok(StyleDescriptor {
        background: resolved.color("surface")?.to_string(),
        foreground: accent.clone(),
        border: Some(format!("1px solid {}", accent)),
        border_radius: resolved.radius("sm")?.to_string(),
        padding: format!("{} {}", resolved.spacing("xs")?, resolved.spacing("sm")?),
        font_family: Some(resolved.typography("font_family")?.to_string()),
        font_size: Some(resolved.typography("font_size_sm")?.to_string()),
        font_weight: Some(resolved.typography("font_weight_semibold")?.to_string()),
        box_shadow: None,
        transform: None,
    })
}

/// Elevated, content-agnostic container. Consumes only structural tokens.
pub fn surface_card(resolved: &ResolvedTokenSet) -> Result<StyleDescriptor, TokenError> {
    Ok(StyleDescriptor {
        background: resolved.color("surface")?.to_string(),
        foreground: resolved.color("secondary_text")?.to_string(),
        border: Some(format!("1px solid {}", resolved.color("border")?)),
        border_radius: resolved.radius("lg")?.to_string(),
        padding: resolved.spacing("lg")?.to_string(),
        font_family: None,
        font_size: None,
        font_weight: None,
        box_shadow: Some(resolved.shadow("soft")?.to_string()),
        transform: None,
    })
}
