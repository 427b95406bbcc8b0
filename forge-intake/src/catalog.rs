//! Static registry of campaign input-source types
//!
//! Each descriptor names an input kind, the personas it is suggested
//! for, and a priority ordering (lower = shown first). The catalog is
//! fixed at compile time; campaigns reference entries by id.

use serde::{Deserialize, Serialize};

/// User persona tag, used to prioritize which input types are suggested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    Affiliate,
    Business,
    Creator,
    Agency,
}

impl std::str::FromStr for Persona {
    type Err = forge_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "affiliate" => Ok(Persona::Affiliate),
            "business" => Ok(Persona::Business),
            "creator" => Ok(Persona::Creator),
            "agency" => Ok(Persona::Agency),
            other => Err(forge_common::Error::InvalidInput(format!(
                "Unknown persona: {}",
                other
            ))),
        }
    }
}

/// Kind of input source, determining validation and analyzer routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Web page address, strictly parsed
    Url,
    /// Free-form pasted text
    Text,
    /// Uploaded document (value holds the file name)
    File,
    /// Reference id from the external product catalog
    ProductReference,
    /// Pasted analytics or performance metrics
    Analytics,
}

/// One entry in the input-type catalog
#[derive(Debug, Clone, Serialize)]
pub struct InputTypeDescriptor {
    /// Unique catalog key
    pub id: &'static str,
    pub kind: InputKind,
    pub label: &'static str,
    pub description: &'static str,
    /// Example value shown in an empty field
    pub placeholder: Option<&'static str>,
    /// Personas this input is suggested for
    pub suggested_for: &'static [Persona],
    /// Lower = higher priority in suggestion lists
    pub priority: u8,
}

/// The full input-type catalog, in declaration order
pub const INPUT_TYPES: &[InputTypeDescriptor] = &[
    InputTypeDescriptor {
        id: "salespage_url",
        kind: InputKind::Url,
        label: "Salespage URL",
        description: "The main sales/landing page you're promoting",
        placeholder: Some("https://example.com/product"),
        suggested_for: &[Persona::Affiliate, Persona::Business],
        priority: 1,
    },
    InputTypeDescriptor {
        id: "competitor_url",
        kind: InputKind::Url,
        label: "Competitor Page",
        description: "Competitor sales page or marketing material",
        placeholder: Some("https://competitor.com/similar-product"),
        suggested_for: &[Persona::Business, Persona::Agency],
        priority: 3,
    },
    InputTypeDescriptor {
        id: "product_description",
        kind: InputKind::Text,
        label: "Product Details",
        description: "Detailed description of your product or service",
        placeholder: Some("Enter product features, benefits, pricing..."),
        suggested_for: &[Persona::Business, Persona::Creator],
        priority: 2,
    },
    InputTypeDescriptor {
        id: "existing_content",
        kind: InputKind::Text,
        label: "Existing Marketing Copy",
        description: "Any existing ads, emails, or marketing content",
        placeholder: Some("Paste your existing marketing content..."),
        suggested_for: &[Persona::Business, Persona::Agency, Persona::Creator],
        priority: 4,
    },
    InputTypeDescriptor {
        id: "brand_guidelines",
        kind: InputKind::File,
        label: "Brand Guidelines",
        description: "Brand guidelines, style guide, or brand assets",
        placeholder: None,
        suggested_for: &[Persona::Business, Persona::Agency],
        priority: 5,
    },
    InputTypeDescriptor {
        id: "performance_data",
        kind: InputKind::Analytics,
        label: "Performance Data",
        description: "Analytics, conversion rates, or performance metrics",
        placeholder: Some("Paste analytics data or performance metrics..."),
        suggested_for: &[Persona::Affiliate, Persona::Business, Persona::Agency],
        priority: 6,
    },
];

/// Look up a descriptor by catalog id
pub fn descriptor(id: &str) -> Option<&'static InputTypeDescriptor> {
    INPUT_TYPES.iter().find(|t| t.id == id)
}

/// Input types suggested for a persona, sorted by priority
///
/// `None` (persona unknown) returns the full catalog. An empty filter
/// result also falls back to the full catalog rather than offering
/// nothing.
pub fn suggested_for(persona: Option<Persona>) -> Vec<&'static InputTypeDescriptor> {
    let Some(persona) = persona else {
        return INPUT_TYPES.iter().collect();
    };

    let mut filtered: Vec<_> = INPUT_TYPES
        .iter()
        .filter(|t| t.suggested_for.contains(&persona))
        .collect();
    filtered.sort_by_key(|t| t.priority);

    if filtered.is_empty() {
        INPUT_TYPES.iter().collect()
    } else {
        filtered
    }
}

/// Suggested input types not yet present in `existing_type_ids`
///
/// The picker filter: already-added types are excluded from the menu.
/// When every suggested type is taken, falls back to the remaining
/// full-catalog entries so the picker never dead-ends early.
pub fn available_for(
    persona: Option<Persona>,
    existing_type_ids: &[String],
) -> Vec<&'static InputTypeDescriptor> {
    let not_added = |t: &&'static InputTypeDescriptor| -> bool {
        !existing_type_ids.iter().any(|id| id == t.id)
    };

    let available: Vec<_> = suggested_for(persona).into_iter().filter(not_added).collect();
    if !available.is_empty() {
        return available;
    }

    INPUT_TYPES.iter().filter(not_added).collect()
}
