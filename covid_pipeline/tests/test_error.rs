use covid_pipeline::error::PipelineError;
use covid_pipeline::ReportConfig;
use eda_math::MathError;
use std::io;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let error = PipelineError::from(io_error);
    assert!(matches!(error, PipelineError::IoError(_)));

    let math_error = MathError::InsufficientData("Mean needs at least 1 value(s), have 0".into());
    let error = PipelineError::from(math_error.clone());
    match error {
        PipelineError::Math(inner) => assert_eq!(inner, math_error),
        other => panic!("Expected Math variant, got {:?}", other),
    }

    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(
        PipelineError::from(json_error),
        PipelineError::MalformedInput(_)
    ));
}

#[test]
fn test_error_display() {
    let error = PipelineError::UnknownColumn("active".to_string());
    assert_eq!(error.to_string(), "Unknown column: active");

    let error = PipelineError::MalformedInput("gap after 2020-03-01".to_string());
    assert!(error.to_string().starts_with("Malformed input"));

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error = PipelineError::from(io_error);
    let message = error.to_string();
    assert!(message.contains("IO error"));
    assert!(message.contains("permission denied"));
}

#[test]
fn test_config_errors_surface_as_config_variant() {
    let result = ReportConfig::from_toml_str("top_n = \"ten\"");
    assert!(matches!(result, Err(PipelineError::ConfigError(_))));

    let result = ReportConfig::from_toml_str("unknown_key = 1");
    assert!(matches!(result, Err(PipelineError::ConfigError(_))));
}

#[test]
fn test_result_mapping() {
    let result: Result<(), &str> = Err("bad row");
    let mapped = result.map_err(|e| PipelineError::MalformedInput(e.to_string()));

    if let Err(PipelineError::MalformedInput(msg)) = mapped {
        assert_eq!(msg, "bad row");
    } else {
        panic!("Wrong error variant");
    }
}
