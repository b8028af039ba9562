use super::*;

#[test]
fn test_defaults() {
    let options = IndexOptions::default();
    assert_eq!(options.entry_point, "main");
    assert_eq!(options.runtime_package, None);
}

#[test]
fn test_from_json_camel_case() {
    let options =
        IndexOptions::from_json(r#"{"entryPoint": "start", "runtimePackage": "acme/runtime"}"#)
            .expect("valid options");
    assert_eq!(options.entry_point, "start");
    assert_eq!(options.runtime_package.as_deref(), Some("acme/runtime"));
}

#[test]
fn test_from_json_missing_fields_use_defaults() {
    let options = IndexOptions::from_json("{}").expect("valid options");
    assert_eq!(options, IndexOptions::default());
}

#[test]
fn test_from_json_rejects_malformed_document() {
    let err = IndexOptions::from_json(r#"{"entryPoint": 3}"#).unwrap_err();
    assert!(matches!(err, IndexError::InvalidOptions(_)));
    assert_eq!(
        err.code(),
        gojs_common::diagnostics::diagnostic_codes::INVALID_INDEX_OPTIONS
    );
}

#[test]
fn test_overrides_replace_configured_values() {
    let options = IndexOptions::default()
        .with_runtime_package("acme/runtime")
        .with_overrides(Some("other/runtime".to_string()), Some("run".to_string()));
    assert_eq!(options.runtime_package.as_deref(), Some("other/runtime"));
    assert_eq!(options.entry_point, "run");
}

#[test]
fn test_empty_entry_point_override_is_ignored() {
    let options = IndexOptions::default().with_overrides(None, Some(String::new()));
    assert_eq!(options.entry_point, "main");
}

#[test]
fn test_validate_import_path() {
    assert!(validate_import_path("github.com/acme/runtime").is_ok());
    assert!(validate_import_path("runtime").is_ok());
    assert!(validate_import_path("").is_err());
    assert!(validate_import_path("/abs/path").is_err());
    assert!(validate_import_path("trailing/").is_err());
    assert!(validate_import_path("a//b").is_err());
    assert!(validate_import_path("has space").is_err());
}
