//! Per-call configuration for read and write operations.

use serde::{Deserialize, Serialize};

use crate::{Content, Encoding};

/// Options as supplied by a caller. Unset fields fall back to a defaults
/// constant when the call resolves them.
///
/// Deserializes from documents such as
/// `{"json": false, "createIfNotExists": true, "encoding": "utf8", "seed": ""}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessOptions {
    /// Encode on write and decode on read as JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
    /// Create a missing file, seeded with `seed`, when reading it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_if_not_exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
    /// Content used for missing or blank files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<Content>,
}

impl AccessOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = Some(json);
        self
    }

    pub fn with_create_if_not_exists(mut self, create: bool) -> Self {
        self.create_if_not_exists = Some(create);
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn with_seed(mut self, seed: impl Into<Content>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Layer `overrides` on top of `self`; fields set in `overrides` win.
    pub fn overlay(self, overrides: AccessOptions) -> AccessOptions {
        AccessOptions {
            json: overrides.json.or(self.json),
            create_if_not_exists: overrides.create_if_not_exists.or(self.create_if_not_exists),
            encoding: overrides.encoding.or(self.encoding),
            seed: overrides.seed.or(self.seed),
        }
    }

    /// Fill unset fields from `defaults`.
    pub fn resolve(&self, defaults: &ResolvedOptions) -> ResolvedOptions {
        ResolvedOptions {
            json: self.json.unwrap_or(defaults.json),
            create_if_not_exists: self
                .create_if_not_exists
                .unwrap_or(defaults.create_if_not_exists),
            encoding: self.encoding.unwrap_or(defaults.encoding),
            seed: self.seed.clone().unwrap_or_else(|| defaults.seed.clone()),
        }
    }
}

/// Fully specified options for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub json: bool,
    pub create_if_not_exists: bool,
    pub encoding: Encoding,
    pub seed: Content,
}

/// Defaults for `read_file` and `write_file`.
pub const DEFAULT_OPTIONS: ResolvedOptions = ResolvedOptions {
    json: true,
    create_if_not_exists: true,
    encoding: Encoding::Utf8,
    seed: Content::Text(String::new()),
};

/// Defaults for `read_text_file` and `write_text_file`.
pub const TEXT_DEFAULT_OPTIONS: ResolvedOptions = ResolvedOptions {
    json: false,
    create_if_not_exists: true,
    encoding: Encoding::Utf8,
    seed: Content::Text(String::new()),
};
