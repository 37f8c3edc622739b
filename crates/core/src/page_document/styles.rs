//! Style records: flat (Legacy/V2), responsive and state-aware (V3).
//!
//! V3 keys declarations by breakpoint. Wrapping a flat record places it
//! under `desktop` only; unwrapping reads `desktop` and discards the other
//! breakpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;

/// A flat record of CSS-like declarations (`fontSize`, `backgroundColor`, ...).
pub type StyleMap = Map<String, Value>;

// ---------------------------------------------------------------------------
// Breakpoints
// ---------------------------------------------------------------------------

/// Named responsive breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 3] = [Self::Mobile, Self::Tablet, Self::Desktop];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "mobile" => Some(Self::Mobile),
            "tablet" => Some(Self::Tablet),
            "desktop" => Some(Self::Desktop),
            _ => None,
        }
    }

    /// Default CSS width injected into design tokens for this breakpoint.
    pub fn default_width(&self) -> &'static str {
        match self {
            Self::Mobile => "768px",
            Self::Tablet => "1024px",
            Self::Desktop => "1280px",
        }
    }
}

impl std::fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Interaction states
// ---------------------------------------------------------------------------

/// Interaction state an element can be styled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionState {
    Default,
    Hover,
    Focus,
    Active,
    Disabled,
    Visited,
}

impl InteractionState {
    pub const ALL: [InteractionState; 6] = [
        Self::Default,
        Self::Hover,
        Self::Focus,
        Self::Active,
        Self::Disabled,
        Self::Visited,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Hover => "hover",
            Self::Focus => "focus",
            Self::Active => "active",
            Self::Disabled => "disabled",
            Self::Visited => "visited",
        }
    }
}

impl std::fmt::Display for InteractionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Responsive style record
// ---------------------------------------------------------------------------

/// Style declarations keyed by breakpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsiveStyles {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_map")]
    pub mobile: Option<StyleMap>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_map")]
    pub tablet: Option<StyleMap>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_map")]
    pub desktop: Option<StyleMap>,
}

impl ResponsiveStyles {
    pub fn get(&self, breakpoint: Breakpoint) -> Option<&StyleMap> {
        match breakpoint {
            Breakpoint::Mobile => self.mobile.as_ref(),
            Breakpoint::Tablet => self.tablet.as_ref(),
            Breakpoint::Desktop => self.desktop.as_ref(),
        }
    }

    /// Breakpoints other than `desktop` that hold at least one declaration.
    pub fn non_desktop_breakpoints(&self) -> Vec<Breakpoint> {
        [Breakpoint::Mobile, Breakpoint::Tablet]
            .into_iter()
            .filter(|bp| self.get(*bp).is_some_and(|styles| !styles.is_empty()))
            .collect()
    }

    fn slot_mut(&mut self, breakpoint: Breakpoint) -> &mut Option<StyleMap> {
        match breakpoint {
            Breakpoint::Mobile => &mut self.mobile,
            Breakpoint::Tablet => &mut self.tablet,
            Breakpoint::Desktop => &mut self.desktop,
        }
    }

    pub fn is_empty(&self) -> bool {
        Breakpoint::ALL
            .iter()
            .all(|bp| self.get(*bp).map_or(true, |styles| styles.is_empty()))
    }
}

// ---------------------------------------------------------------------------
// State style record
// ---------------------------------------------------------------------------

/// Style declarations keyed by interaction state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateStyles {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_map")]
    pub default: Option<StyleMap>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_map")]
    pub hover: Option<StyleMap>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_map")]
    pub focus: Option<StyleMap>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_map")]
    pub active: Option<StyleMap>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_map")]
    pub disabled: Option<StyleMap>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_map")]
    pub visited: Option<StyleMap>,
}

impl StateStyles {
    pub fn get(&self, state: InteractionState) -> Option<&StyleMap> {
        match state {
            InteractionState::Default => self.default.as_ref(),
            InteractionState::Hover => self.hover.as_ref(),
            InteractionState::Focus => self.focus.as_ref(),
            InteractionState::Active => self.active.as_ref(),
            InteractionState::Disabled => self.disabled.as_ref(),
            InteractionState::Visited => self.visited.as_ref(),
        }
    }

    /// States that hold at least one declaration.
    pub fn populated_states(&self) -> Vec<InteractionState> {
        InteractionState::ALL
            .into_iter()
            .filter(|state| self.get(*state).is_some_and(|styles| !styles.is_empty()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Wrap / unwrap
// ---------------------------------------------------------------------------

/// Wrap a flat style record into a responsive one under `desktop`.
///
/// An empty record wraps to an empty responsive record.
pub fn wrap_responsive(styles: &StyleMap) -> ResponsiveStyles {
    if styles.is_empty() {
        return ResponsiveStyles::default();
    }
    ResponsiveStyles {
        desktop: Some(styles.clone()),
        ..ResponsiveStyles::default()
    }
}

/// Unwrap a responsive record by reading only `desktop`.
///
/// Mobile and tablet declarations are dropped; `owner_id` identifies the
/// node in the warning that records the loss.
pub fn unwrap_responsive(styles: &ResponsiveStyles, owner_id: &str) -> StyleMap {
    let dropped = styles.non_desktop_breakpoints();
    if !dropped.is_empty() {
        let dropped: Vec<&str> = dropped.iter().map(Breakpoint::as_str).collect();
        tracing::warn!(
            owner_id,
            dropped = ?dropped,
            "Discarding non-desktop responsive styles during downgrade",
        );
    }
    styles.desktop.clone().unwrap_or_default()
}

/// Log the loss of state styles when a node moves to a generation without them.
pub(crate) fn warn_dropped_states(state_styles: Option<&StateStyles>, owner_id: &str) {
    let Some(state_styles) = state_styles else {
        return;
    };
    let dropped = state_styles.populated_states();
    if !dropped.is_empty() {
        let dropped: Vec<&str> = dropped.iter().map(InteractionState::as_str).collect();
        tracing::warn!(
            owner_id,
            dropped = ?dropped,
            "Discarding interaction-state styles during downgrade",
        );
    }
}

/// Whether a raw JSON style object is keyed by breakpoint names rather than
/// CSS properties. Used by version detection.
pub fn is_breakpoint_keyed(styles: &Value) -> bool {
    let Some(obj) = styles.as_object() else {
        return false;
    };
    obj.iter()
        .any(|(key, val)| Breakpoint::from_str(key).is_some() && val.is_object())
}

/// Read a V3 style record from raw JSON.
///
/// Breakpoint keys holding objects fill their slot. Any other key is a flat
/// declaration and lands under `desktop` (an explicit `desktop` value wins
/// on conflict), so records written in the flat V2 shape keep their styles.
pub fn responsive_from_value(value: &Value) -> ResponsiveStyles {
    let Some(obj) = value.as_object() else {
        return ResponsiveStyles::default();
    };

    let mut styles = ResponsiveStyles::default();
    let mut flat = StyleMap::new();
    for (key, val) in obj {
        match (Breakpoint::from_str(key), val) {
            (Some(bp), Value::Object(declarations)) => {
                *styles.slot_mut(bp) = Some(declarations.clone());
            }
            (Some(_), Value::Null) => {}
            _ => {
                flat.insert(key.clone(), val.clone());
            }
        }
    }

    if !flat.is_empty() {
        let desktop = styles.desktop.get_or_insert_with(StyleMap::new);
        for (key, val) in flat {
            desktop.entry(key).or_insert(val);
        }
    }
    styles
}

/// `deserialize_with` adapter for [`responsive_from_value`].
pub fn deserialize_responsive<'de, D>(deserializer: D) -> Result<ResponsiveStyles, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(responsive_from_value(&value))
}
