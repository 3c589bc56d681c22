// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    work_task = { "work_task", LinkType::WorkTask },
    model_element = { "model_element", LinkType::ModelElement },
    document = { "document", LinkType::Document },
    contract = { "contract", LinkType::Contract },
    daily_log = { "daily_log", LinkType::DailyLog },
    other = { "other", LinkType::Other },
    upper = { "DOCUMENT", LinkType::Document },
)]
fn link_type_from_str(input: &str, expected: LinkType) {
    assert_eq!(input.parse::<LinkType>().unwrap(), expected);
    assert_eq!(expected.as_str(), input.to_lowercase());
}

#[test]
fn link_type_from_str_invalid() {
    assert!("github".parse::<LinkType>().is_err());
    assert!("".parse::<LinkType>().is_err());
}

#[test]
fn link_type_serializes_snake_case() {
    let json = serde_json::to_string(&LinkType::DailyLog).unwrap();
    assert_eq!(json, "\"daily_log\"");
}

#[test]
fn link_builder_pattern() {
    let entity = Uuid::new_v4();
    let new = NewLink::new(LinkType::Document)
        .with_entity(entity)
        .with_external_reference("DWG-A-101")
        .with_label("Ground floor plan");

    let issue_id = Uuid::new_v4();
    let link = Link::from_new(Uuid::new_v4(), issue_id, &new, Utc::now());

    assert_eq!(link.issue_id, issue_id);
    assert_eq!(link.link_type, LinkType::Document);
    assert_eq!(link.related_entity_id, Some(entity));
    assert_eq!(link.external_reference.as_deref(), Some("DWG-A-101"));
    assert_eq!(link.label.as_deref(), Some("Ground floor plan"));
    assert!(link.metadata.is_none());
}

#[test]
fn new_link_deserializes_camel_case() {
    let new: NewLink = serde_json::from_str(
        r#"{"linkType":"daily_log","externalReference":"DL-2026-03-01","metadata":"{\"weather\":\"rain\"}"}"#,
    )
    .unwrap();
    assert_eq!(new.link_type, LinkType::DailyLog);
    assert_eq!(new.external_reference.as_deref(), Some("DL-2026-03-01"));
    assert!(new.related_entity_id.is_none());
    assert!(new.metadata.unwrap().contains("rain"));
}
