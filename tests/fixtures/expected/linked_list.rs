//! Generated from JSON schema - DO NOT EDIT
//!
//! This file is generated by `schema-typegen generate --target rust`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootOptional {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Box<Root>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootRequired {
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Root {
    #[serde(flatten)]
    pub optional: RootOptional,
    #[serde(flatten)]
    pub required: RootRequired,
}
