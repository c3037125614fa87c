//! Basic usage example for rulechain

use rulechain::prelude::*;
use serde_json::json;

fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let registry = ErrorRegistry::from_json(
        r#"{ "entries": { "port_range": { "message": "{} is not a valid port" } } }"#,
    )?;

    let is_null = Validator::new().add_fn(|v, _| match v {
        Value::Null => Ok(StepOutput::Keep),
        _ => Err(Rejection::new("default").into()),
    });

    // Missing ports default to 8080, present ones must fit in u16.
    let port = Validator::with_registry(registry)
        .alternatives(vec![Condition::when(is_null).then_value(8080)])
        .required()
        .add_fn(|v, _| match v.as_u64() {
            Some(n) if n > 0 && n <= u64::from(u16::MAX) => Ok(StepOutput::Keep),
            _ => Err(Rejection::new("port_range").with_value(v.clone()).into()),
        })
        .to_bool(false);

    for input in [Value::Null, json!(443), json!(70000)] {
        match port.invoke(input.clone(), Some("port"))? {
            Verdict::Accepted(value) => println!("✓ {input} -> {value}"),
            Verdict::Failed(failure) => println!("✗ {input}: {failure}"),
            Verdict::Rejected => println!("✗ {input}"),
        }
    }

    Ok(())
}
