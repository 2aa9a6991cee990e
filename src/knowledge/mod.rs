//! Hand-authored agronomy reference data behind the advisories.

use serde::Serialize;

pub mod leaf;
pub mod palm;

pub type TextList = &'static [&'static str];

pub const NO_TEXT: TextList = &[];

pub(crate) fn is_empty(list: &TextList) -> bool {
    list.is_empty()
}

#[derive(Debug, Serialize)]
pub struct ChemicalTreatment {
    pub fungicides: TextList,
    pub application: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_interval: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct FertilizerGuidance {
    #[serde(skip_serializing_if = "is_empty")]
    pub recommended: TextList,
    #[serde(skip_serializing_if = "is_empty")]
    pub avoid: TextList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<&'static str>,
}

impl FertilizerGuidance {
    pub const EMPTY: FertilizerGuidance = FertilizerGuidance {
        recommended: &[],
        avoid: &[],
        timing: None,
    };
}

/// Returns `list`, or `fallback` when the knowledge base has nothing.
pub fn or_default(list: TextList, fallback: TextList) -> TextList {
    if list.is_empty() {
        fallback
    } else {
        list
    }
}
