use crate::core::error::InvocationError;
use crate::core::invocation::{Context, Request, handle};
use anyhow::{Result, anyhow};
use serde_json::{Value, json};
use std::error::Error;

/// Parses a `key=value` query pair.
pub fn parse_query_pair(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid query pair `{s}`, expected key=value"))?;
    Ok((key.to_string(), value.to_string()))
}

/// Error side of the result channel: the error code plus the message with
/// its full source chain.
pub fn error_payload(err: &InvocationError) -> Value {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    json!({ "error": err.code(), "message": message })
}

/// Runs one invocation and prints its single JSON result: the success
/// payload, or an error payload.
pub async fn run(ctx: &Context<'_>, query: &[(String, String)]) -> Result<()> {
    let request = Request::from_query(query.iter().map(|(k, v)| (k.as_str(), v.clone())));

    match handle(ctx, &request).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", serde_json::to_string_pretty(&error_payload(&e))?);
            Err(e.into())
        }
    }
}
