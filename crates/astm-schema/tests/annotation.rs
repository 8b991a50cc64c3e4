use astm_schema::annotation::{FieldAnnotation, StructAnnotation};
use astm_schema::error::Error;

#[test]
fn field_annotation_rejects_empty_string() {
    let err = FieldAnnotation::parse("", false, false).unwrap_err();
    assert!(matches!(err, Error::InvalidAnnotationSyntax(_)));
}

#[test]
fn field_annotation_rejects_non_numeric_field() {
    let err = FieldAnnotation::parse("abc", false, false).unwrap_err();
    assert!(matches!(err, Error::InvalidAnnotationSyntax(_)));
}

#[test]
fn field_annotation_accepts_sequence_attribute() {
    let a = FieldAnnotation::parse("3,sequence", false, false).unwrap();
    assert!(a.sequence);
}

#[test]
fn struct_annotation_composite_array_has_no_name() {
    let a = StructAnnotation::parse(None).unwrap();
    assert!(a.record_name.is_none());
    assert!(!a.required);
}

#[test]
fn struct_annotation_required_named_record() {
    let a = StructAnnotation::parse(Some("P,required")).unwrap();
    assert_eq!(a.record_name.as_deref(), Some("P"));
    assert!(a.required);
}

#[test]
fn struct_annotation_rejects_lowercase_name() {
    let err = StructAnnotation::parse(Some("o")).unwrap_err();
    assert!(matches!(err, Error::InvalidAnnotationSyntax(_)));
}
