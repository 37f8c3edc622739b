//! Section and element type enums shared by the V2 and V3 shapes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Section kind
// ---------------------------------------------------------------------------

/// Purpose of a page section. Unknown strings are kept verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Hero,
    Content,
    Cta,
    Benefits,
    Testimonials,
    Faq,
    Checkout,
    #[default]
    Custom,
    Other(String),
}

impl SectionKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Hero => "hero",
            Self::Content => "content",
            Self::Cta => "cta",
            Self::Benefits => "benefits",
            Self::Testimonials => "testimonials",
            Self::Faq => "faq",
            Self::Checkout => "checkout",
            Self::Custom => "custom",
            Self::Other(name) => name,
        }
    }

    /// Parse a section kind. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "hero" => Some(Self::Hero),
            "content" => Some(Self::Content),
            "cta" => Some(Self::Cta),
            "benefits" => Some(Self::Benefits),
            "testimonials" => Some(Self::Testimonials),
            "faq" => Some(Self::Faq),
            "checkout" => Some(Self::Checkout),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    /// Parse any type string, keeping unknown names as `Other`.
    pub fn from_name(s: &str) -> Self {
        match s {
            "" => Self::Custom,
            _ => Self::from_str(s).unwrap_or_else(|| Self::Other(s.to_string())),
        }
    }

    /// Human-readable label used as the default section display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Hero => "Hero",
            Self::Content => "Content",
            Self::Cta => "Call to Action",
            Self::Benefits => "Benefits",
            Self::Testimonials => "Testimonials",
            Self::Faq => "FAQ",
            Self::Checkout => "Checkout",
            Self::Custom | Self::Other(_) => "Custom Section",
        }
    }

    /// All valid section kind values.
    pub const ALL: &'static [&'static str] = &[
        "hero",
        "content",
        "cta",
        "benefits",
        "testimonials",
        "faq",
        "checkout",
        "custom",
    ];
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SectionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SectionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Self::from_name(&s),
            _ => Self::default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Element type
// ---------------------------------------------------------------------------

/// Kind of content element. Unknown strings are kept verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ElementType {
    Heading,
    Text,
    Button,
    Image,
    Video,
    Container,
    Spacer,
    Divider,
    Form,
    Input,
    Embed,
    #[default]
    Custom,
    Other(String),
}

impl ElementType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Heading => "heading",
            Self::Text => "text",
            Self::Button => "button",
            Self::Image => "image",
            Self::Video => "video",
            Self::Container => "container",
            Self::Spacer => "spacer",
            Self::Divider => "divider",
            Self::Form => "form",
            Self::Input => "input",
            Self::Embed => "embed",
            Self::Custom => "custom",
            Self::Other(name) => name,
        }
    }

    /// Parse any type string, keeping unknown names as `Other`.
    pub fn from_name(s: &str) -> Self {
        match s {
            "heading" => Self::Heading,
            "text" => Self::Text,
            "button" => Self::Button,
            "image" => Self::Image,
            "video" => Self::Video,
            "container" => Self::Container,
            "spacer" => Self::Spacer,
            "divider" => Self::Divider,
            "form" => Self::Form,
            "input" => Self::Input,
            "embed" => Self::Embed,
            "custom" | "" => Self::Custom,
            other => Self::Other(other.to_string()),
        }
    }

    /// Structural element types may own nested children.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Container)
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ElementType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ElementType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Self::from_name(&s),
            _ => Self::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_kind_round_trip() {
        for s in SectionKind::ALL {
            let kind = SectionKind::from_str(s).unwrap();
            assert_eq!(kind.as_str(), *s);
        }
    }

    #[test]
    fn unknown_section_kind_keeps_its_name() {
        let kind: SectionKind = serde_json::from_str("\"pricing\"").unwrap();
        assert_eq!(kind, SectionKind::Other("pricing".to_string()));
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"pricing\"");
        assert_eq!(kind.display_name(), "Custom Section");
        assert!(SectionKind::from_str("pricing").is_none());
    }

    #[test]
    fn unknown_element_type_keeps_its_name() {
        let ty: ElementType = serde_json::from_str("\"carousel\"").unwrap();
        assert_eq!(ty, ElementType::Other("carousel".to_string()));
        assert_eq!(serde_json::to_string(&ty).unwrap(), "\"carousel\"");
    }

    #[test]
    fn non_string_type_falls_back_to_custom() {
        let ty: ElementType = serde_json::from_str("42").unwrap();
        assert_eq!(ty, ElementType::Custom);
        let kind: SectionKind = serde_json::from_str("\"\"").unwrap();
        assert_eq!(kind, SectionKind::Custom);
    }

    #[test]
    fn element_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ElementType::Heading).unwrap(), "\"heading\"");
        assert_eq!(format!("{}", ElementType::Button), "button");
    }

    #[test]
    fn only_containers_are_structural() {
        assert!(ElementType::Container.is_structural());
        assert!(!ElementType::Text.is_structural());
    }
}
