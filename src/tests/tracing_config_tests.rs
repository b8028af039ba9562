use crate::tracing_config::{LogFormat, filter_directives};

#[test]
fn test_log_format_parse() {
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
    assert_eq!(LogFormat::parse(" Tree "), LogFormat::Tree);
    assert_eq!(LogFormat::parse("text"), LogFormat::Text);
    assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
    assert_eq!(LogFormat::parse(""), LogFormat::Text);
    assert_eq!(LogFormat::default(), LogFormat::Text);
}

#[test]
fn test_gojs_log_takes_precedence() {
    assert_eq!(
        filter_directives(Some("gojs_index=trace".into()), Some("info".into())).as_deref(),
        Some("gojs_index=trace")
    );
    assert_eq!(
        filter_directives(None, Some("debug".into())).as_deref(),
        Some("debug")
    );
    assert_eq!(filter_directives(None, None), None);
}
