//! Mapping of semantic component variants onto concrete tokens.
//!
//! The intent and status enumerations are closed: values outside them are
//! rejected at the parsing boundary, and the palette tables never fall back
//! to a default color. An unrecognized variant must be visibly wrong, not
//! silently mis-colored.

use crate::resolver::ResolvedTokenSet;
use crate::state::GateStatus;
use crate::tokens::TokenError;
use std::fmt;
use std::str::FromStr;

/// Semantic role of an interactive component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Primary,
    Secondary,
    Danger,
}

impl Intent {
    pub const ALL: [Intent; 3] = [Intent::Primary, Intent::Secondary, Intent::Danger];

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Primary => "primary",
            Intent::Secondary => "secondary",
            Intent::Danger => "danger",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = VariantError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_intent(value)
    }
}

/// Errors for values outside the closed variant enumerations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantError {
    UnknownIntent { value: String },
    UnknownStatus { value: String },
}

impl fmt::Display for VariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownIntent { value } => write!(f, "unknown intent `{}`", value),
            Self::UnknownStatus { value } => write!(f, "unknown status `{}`", value),
        }
    }
}

impl std::error::Error for VariantError {}

/// Parses an intent string from an external caller.
pub fn parse_intent(value: &str) -> Result<Intent, VariantError> {
    Intent::ALL
        .into_iter()
        .find(|intent| intent.as_str() == value)
        .ok_or_else(|| VariantError::UnknownIntent {
            value: value.to_string(),
        })
}

/// Parses a gate status string from an external caller.
pub fn parse_status(value: &str) -> Result<GateStatus, VariantError> {
    match value {
        "clean" => Ok(GateStatus::Clean),
        "dirty" => Ok(GateStatus::Dirty),
        _ => Err(VariantError::UnknownStatus {
            value: value.to_string(),
        }),
    }
}

/// Background/foreground pair for a button-like component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: String,
    pub foreground: String,
}

/// Accent color for a status-bearing component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPalette {
    pub accent: String,
}

/// Resolves the fixed intent table:
///
/// | intent    | background      | foreground             |
/// |-----------|-----------------|------------------------|
/// | primary   | `color.primary` | `color.primary_text`   |
/// | secondary | `color.surface` | `color.secondary_text` |
/// | danger    | `color.danger`  | `color.primary_text`   |
pub fn palette_for(intent: Intent, resolved: &ResolvedTokenSet) -> Result<Palette, TokenError> {
    let (background, foreground) = match intent {
        Intent::Primary => ("primary", "primary_text"),
        Intent::Secondary => ("surface", "secondary_text"),
        Intent::Danger => ("danger", "primary_text"),
    };
    Ok(Palette {
        background: resolved.color(background)?.to_string(),
        foreground: resolved.color(foreground)?.to_string(),
    })
}

/// Resolves the status accent: clean maps to `color.success`, dirty to
/// `color.danger`.
pub fn status_palette_for(
    status: GateStatus,
    resolved: &ResolvedTokenSet,
) -> Result<StatusPalette, TokenError> {
    let accent = match status {
        GateStatus::Clean => resolved.color("success")?,
        GateStatus::Dirty => resolved.color("danger")?,
    };
    Ok(StatusPalette {
        accent: accent.to_string(),
    })
}
