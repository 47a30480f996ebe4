use damage_report::domain::report::{
    errors::{FailureKind, ReportError},
    ledger::DamageLedger,
    locale::ReportLocale,
    value_objects::{ArtifactName, MAX_IDENTIFIER_LENGTH, ReportIdentifier, sanitize_identifier},
};

#[test]
fn identifier_is_sanitized_into_a_pdf_name() {
    let identifier = ReportIdentifier::new("PO#123 Düsseldorf").expect("identifier is valid");
    let artifact = ArtifactName::sanitize(&identifier).expect("name has usable characters");
    assert_eq!(artifact.stem(), "PO_123_D_sseldorf");
    assert_eq!(artifact.file_name(), "PO_123_D_sseldorf.pdf");
}

#[test]
fn sanitizer_keeps_safe_characters_and_length() {
    assert_eq!(sanitize_identifier("PO-2024.07_a"), "PO-2024.07_a");
    assert_eq!(sanitize_identifier("a/b\\c"), "a_b_c");
    assert_eq!(sanitize_identifier("../etc"), ".._etc");
    assert_eq!(sanitize_identifier("Ñu").chars().count(), 2);
}

#[test]
fn identifier_rejects_blank_and_oversized_input() {
    assert!(ReportIdentifier::new("").is_err());
    assert!(ReportIdentifier::new(" \t ").is_err());
    assert!(ReportIdentifier::new(&"x".repeat(MAX_IDENTIFIER_LENGTH + 1)).is_err());
    assert!(ReportIdentifier::new(&"x".repeat(MAX_IDENTIFIER_LENGTH)).is_ok());
}

#[test]
fn ledger_renders_worked_example() {
    let ledger =
        DamageLedger::parse(Some(r#"{"Water damage": {"checked": true, "quantity": 2}}"#))
            .expect("ledger parses");
    assert_eq!(ledger.render(ReportLocale::En), vec!["- Water damage (Qty: 2)"]);
    assert_eq!(ledger.render(ReportLocale::Es), vec!["- Daño por agua (Cantidad: 2)"]);
}

#[test]
fn ledger_keeps_submission_order() {
    let ledger = DamageLedger::parse(Some(
        r#"{"Zipper": {"checked": true}, "Apple": {"checked": true}, "Mango": {"quantity": 1}}"#,
    ))
    .expect("ledger parses");
    assert_eq!(
        ledger.render(ReportLocale::En),
        vec!["- Zipper", "- Apple", "- Mango (Qty: 1)"]
    );
}

#[test]
fn failures_are_classified_for_callers() {
    assert_eq!(ReportError::MissingImages.kind(), FailureKind::Input);
    assert_eq!(
        DamageLedger::parse(Some("nope")).unwrap_err().kind(),
        FailureKind::Ledger
    );
    assert_eq!(
        ReportError::Document("serialize".into()).kind(),
        FailureKind::Image
    );
}
