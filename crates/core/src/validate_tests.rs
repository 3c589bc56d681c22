// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use uuid::Uuid;
use yare::parameterized;

#[test]
fn title_ok_up_to_limit() {
    assert!(validate_title("Crack in slab").is_ok());
    assert!(validate_title(&"x".repeat(MAX_TITLE_LENGTH)).is_ok());
}

#[parameterized(
    empty = { "" },
    spaces = { "   " },
    newline = { "\n\t" },
)]
fn title_blank_rejected(title: &str) {
    let err = validate_title(title).unwrap_err();
    assert!(matches!(err, Error::FieldEmpty { field: "title" }));
}

#[test]
fn title_too_long_reports_sizes() {
    let err = validate_title(&"x".repeat(MAX_TITLE_LENGTH + 1)).unwrap_err();
    assert!(matches!(
        err,
        Error::FieldTooLong { field: "title", actual, max }
            if actual == MAX_TITLE_LENGTH + 1 && max == MAX_TITLE_LENGTH
    ));
    assert_eq!(err.to_string(), "title too long (301 chars, max 300)");
}

#[test]
fn length_counts_chars_not_bytes() {
    // 300 two-byte characters fit even though they are 600 bytes.
    assert!(validate_title(&"é".repeat(MAX_TITLE_LENGTH)).is_ok());
}

#[test]
fn new_issue_optional_fields_checked() {
    let mut new = NewIssue::new(Uuid::new_v4(), "Leak");
    new.location = Some("x".repeat(MAX_LOCATION_LENGTH + 1));
    assert!(validate_new_issue(&new).is_err());

    new.location = Some("Level 2".into());
    new.rfi_question = Some("q".repeat(MAX_RFI_TEXT_LENGTH + 1));
    assert!(validate_new_issue(&new).is_err());

    new.rfi_question = Some("Which mix?".into());
    assert!(validate_new_issue(&new).is_ok());
}

#[test]
fn update_checks_rfi_answer() {
    let mut update: IssueUpdate = serde_json::from_str(
        r#"{"title":"T","type":"design","priority":"p2_high","status":"open"}"#,
    )
    .unwrap();
    assert!(validate_update(&update).is_ok());
    update.rfi_answer = Some("a".repeat(MAX_RFI_TEXT_LENGTH + 1));
    assert!(validate_update(&update).is_err());
}

#[test]
fn attachment_requires_name_and_url() {
    assert!(validate_attachment(&NewAttachment::new("a.pdf", "https://files/a.pdf")).is_ok());
    assert!(validate_attachment(&NewAttachment::new("", "https://files/a.pdf")).is_err());
    assert!(validate_attachment(&NewAttachment::new("a.pdf", " ")).is_err());
}

#[test]
fn attachment_negative_size_rejected() {
    let att = NewAttachment::new("a.pdf", "https://files/a.pdf").with_content("application/pdf", -1);
    assert!(matches!(
        validate_attachment(&att).unwrap_err(),
        Error::InvalidInput(_)
    ));
}

#[test]
fn comment_validates_nested_attachments() {
    let ok = NewComment::new("See photo").with_attachment(NewAttachment::new("p.jpg", "u"));
    assert!(validate_comment(&ok).is_ok());

    let bad = NewComment::new("See photo").with_attachment(NewAttachment::new("", "u"));
    assert!(validate_comment(&bad).is_err());

    assert!(validate_comment(&NewComment::new("")).is_err());
}

#[test]
fn link_limits() {
    let ok = NewLink::new(crate::link::LinkType::Other).with_label("x".repeat(MAX_LINK_LABEL_LENGTH));
    assert!(validate_link(&ok).is_ok());
    let bad =
        NewLink::new(crate::link::LinkType::Other).with_label("x".repeat(MAX_LINK_LABEL_LENGTH + 1));
    assert!(validate_link(&bad).is_err());
}

#[test]
fn supporting_records() {
    assert!(validate_project(&NewProject { name: "Tower A".into() }).is_ok());
    assert!(validate_project(&NewProject { name: " ".into() }).is_err());

    let user = NewUser {
        email: "ana@example.com".into(),
        first_name: "Ana".into(),
        last_name: String::new(),
    };
    assert!(validate_user(&user).is_ok());
    assert!(validate_user(&NewUser {
        email: String::new(),
        ..user
    })
    .is_err());

    assert!(validate_work_task(&NewWorkTask { title: "Pour slab".into() }).is_ok());
    assert!(validate_work_task(&NewWorkTask { title: String::new() }).is_err());
}
