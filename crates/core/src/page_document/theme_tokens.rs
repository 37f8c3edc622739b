//! Flat V2 theme <-> tiered V3 design tokens.
//!
//! `theme_to_tokens` seeds single-entry ramps at step 500 (neutral gets the
//! lightest, middle and darkest steps) and injects the fixed breakpoints.
//! `tokens_to_theme` is a lossy projection back onto the six flat colors.

use super::styles::Breakpoint;
use super::v2::{ThemeColors, ThemeTypography, V2Theme};
use super::v3::{
    default_breakpoints, ColorRamp, ColorTokens, DesignTokens, FontFamilies, SemanticColors,
    TypographyTokens, BASE_RAMP_STEP, DARKEST_NEUTRAL_STEP, LIGHTEST_NEUTRAL_STEP,
};

/// Expand a flat theme into design tokens.
pub fn theme_to_tokens(theme: &V2Theme) -> DesignTokens {
    let colors = &theme.colors;

    let mut neutral = ColorRamp::new();
    neutral.insert(LIGHTEST_NEUTRAL_STEP, colors.background.clone());
    neutral.insert(BASE_RAMP_STEP, colors.muted.clone());
    neutral.insert(DARKEST_NEUTRAL_STEP, colors.text.clone());

    DesignTokens {
        colors: ColorTokens {
            primary: single_step_ramp(&colors.primary),
            secondary: single_step_ramp(&colors.secondary),
            accent: single_step_ramp(&colors.accent),
            neutral,
            semantic: SemanticColors::default(),
        },
        typography: TypographyTokens {
            font_families: FontFamilies {
                heading: theme.typography.heading_font.clone(),
                body: theme.typography.body_font.clone(),
                ..FontFamilies::default()
            },
            ..TypographyTokens::default()
        },
        spacing: theme.spacing.clone(),
        border_radius: theme.border_radius.clone(),
        breakpoints: default_breakpoints(),
    }
}

/// Project design tokens back onto a flat theme.
///
/// Only step 500 of the brand ramps and the lightest / middle / darkest
/// neutral steps survive. Semantic colors, the typography scale and custom
/// breakpoints are discarded.
pub fn tokens_to_theme(tokens: &DesignTokens) -> V2Theme {
    let defaults = ThemeColors::default();
    let ramps = &tokens.colors;

    warn_extra_steps("primary", &ramps.primary);
    warn_extra_steps("secondary", &ramps.secondary);
    warn_extra_steps("accent", &ramps.accent);

    let custom_breakpoints: Vec<&str> = tokens
        .breakpoints
        .keys()
        .map(String::as_str)
        .filter(|name| Breakpoint::from_str(name).is_none())
        .collect();
    if !custom_breakpoints.is_empty() {
        tracing::warn!(
            dropped = ?custom_breakpoints,
            "Discarding custom breakpoints during theme projection",
        );
    }

    let colors = ThemeColors {
        primary: base_step(&ramps.primary).unwrap_or(defaults.primary),
        secondary: base_step(&ramps.secondary).unwrap_or(defaults.secondary),
        accent: base_step(&ramps.accent).unwrap_or(defaults.accent),
        background: lightest_step(&ramps.neutral).unwrap_or(defaults.background),
        text: darkest_step(&ramps.neutral).unwrap_or(defaults.text),
        muted: base_step(&ramps.neutral).unwrap_or(defaults.muted),
    };

    let fonts = &tokens.typography.font_families;
    let font_defaults = ThemeTypography::default();
    let typography = ThemeTypography {
        heading_font: non_empty(&fonts.heading).unwrap_or(font_defaults.heading_font),
        body_font: non_empty(&fonts.body).unwrap_or(font_defaults.body_font),
    };

    V2Theme {
        colors,
        typography,
        spacing: tokens.spacing.clone(),
        border_radius: tokens.border_radius.clone(),
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn single_step_ramp(color: &str) -> ColorRamp {
    let mut ramp = ColorRamp::new();
    ramp.insert(BASE_RAMP_STEP, color.to_string());
    ramp
}

fn base_step(ramp: &ColorRamp) -> Option<String> {
    ramp.get(&BASE_RAMP_STEP).and_then(|c| non_empty(c))
}

fn lightest_step(ramp: &ColorRamp) -> Option<String> {
    ramp.values().next().and_then(|c| non_empty(c))
}

fn darkest_step(ramp: &ColorRamp) -> Option<String> {
    ramp.values().next_back().and_then(|c| non_empty(c))
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn warn_extra_steps(ramp_name: &str, ramp: &ColorRamp) {
    let extra: Vec<u16> = ramp
        .keys()
        .copied()
        .filter(|step| *step != BASE_RAMP_STEP)
        .collect();
    if !extra.is_empty() {
        tracing::warn!(
            ramp = ramp_name,
            dropped_steps = ?extra,
            "Discarding color ramp steps during theme projection",
        );
    }
}
