// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Link types for associating issues with other project records.
//!
//! A link points from an issue to a related entity (by id), to an external
//! reference string, or both. The kind of entity is implied by the
//! [`LinkType`] and never checked against other tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// What kind of record the link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    WorkTask,
    ModelElement,
    Document,
    Contract,
    DailyLog,
    Other,
}

impl LinkType {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::WorkTask => "work_task",
            LinkType::ModelElement => "model_element",
            LinkType::Document => "document",
            LinkType::Contract => "contract",
            LinkType::DailyLog => "daily_log",
            LinkType::Other => "other",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LinkType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "work_task" => Ok(LinkType::WorkTask),
            "model_element" => Ok(LinkType::ModelElement),
            "document" => Ok(LinkType::Document),
            "contract" => Ok(LinkType::Contract),
            "daily_log" => Ok(LinkType::DailyLog),
            "other" => Ok(LinkType::Other),
            _ => Err(Error::InvalidLinkType(s.to_string())),
        }
    }
}

/// A typed, directed association from an issue to something else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: Uuid,
    pub issue_id: Uuid,
    pub link_type: LinkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_entity_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Free-form, typically JSON, supplied by the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Materializes a link request for `issue_id`.
    pub fn from_new(id: Uuid, issue_id: Uuid, new: &NewLink, created_at: DateTime<Utc>) -> Self {
        Link {
            id,
            issue_id,
            link_type: new.link_type,
            related_entity_id: new.related_entity_id,
            external_reference: new.external_reference.clone(),
            label: new.label.clone(),
            metadata: new.metadata.clone(),
            created_at,
        }
    }
}

/// Payload for the add-link operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLink {
    pub link_type: LinkType,
    #[serde(default)]
    pub related_entity_id: Option<Uuid>,
    #[serde(default)]
    pub external_reference: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub metadata: Option<String>,
}

impl NewLink {
    /// Creates a request of the given type with nothing else set.
    pub fn new(link_type: LinkType) -> Self {
        NewLink {
            link_type,
            related_entity_id: None,
            external_reference: None,
            label: None,
            metadata: None,
        }
    }

    /// Sets the related entity (builder pattern).
    pub fn with_entity(mut self, id: Uuid) -> Self {
        self.related_entity_id = Some(id);
        self
    }

    /// Sets the external reference (builder pattern).
    pub fn with_external_reference(mut self, reference: impl Into<String>) -> Self {
        self.external_reference = Some(reference.into());
        self
    }

    /// Sets the label (builder pattern).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[cfg(test)]
#[path = "link_tests.rs"]
mod tests;
