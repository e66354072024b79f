use super::client::CompletionApi;
use super::models::{
    InputItem, ResponseRequest, ResponseSchema, TextConfig, ToolDescriptor,
};
use crate::components::tools::ToolRegistry;
use crate::error::{completion_error, AppResult, Error};
use chrono::Utc;
use chrono_tz::Tz;
use jsonschema::JSONSchema;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Fixed persona for the system message
const SYSTEM_PERSONA: &str = "You are a helpful assistant for the Grinnell community \
events calendar. Use the available tools to look up events, and resolve relative \
dates like \"this weekend\" against the current time given below.";

/// Drives the two-round tool-calling exchange with the completion endpoint.
///
/// Round 1 offers every registered tool; requested calls are executed locally
/// and their results appended to the transcript; round 2 produces the final
/// answer with no tools offered. Any endpoint, argument-parse or tool failure
/// aborts the whole call and the partial transcript is discarded. No retries
/// here; retrying is the caller's concern.
pub struct Orchestrator {
    api: Arc<dyn CompletionApi>,
    registry: Arc<ToolRegistry>,
    model: String,
    tz: Tz,
}

impl Orchestrator {
    pub fn new(
        api: Arc<dyn CompletionApi>,
        registry: Arc<ToolRegistry>,
        model: String,
        tz: Tz,
    ) -> Self {
        Self {
            api,
            registry,
            model,
            tz,
        }
    }

    /// Answer a free-text prompt, optionally constrained to a JSON schema.
    /// Returns the final text, or the structured JSON string in schema mode.
    pub async fn complete(
        &self,
        prompt: &str,
        response_schema: Option<ResponseSchema>,
    ) -> AppResult<String> {
        // The timestamp grounds relative-date reasoning
        let now = Utc::now().with_timezone(&self.tz);
        let mut transcript = vec![
            InputItem::system(format!("{}\nCurrent time: {}", SYSTEM_PERSONA, now.to_rfc3339())),
            InputItem::user(prompt),
        ];

        let tools: Vec<ToolDescriptor> = self
            .registry
            .describe_all()
            .into_iter()
            .map(ToolDescriptor::from)
            .collect();

        let first = self
            .api
            .create_response(ResponseRequest {
                model: self.model.clone(),
                input: transcript.clone(),
                tools: Some(tools),
                tool_choice: Some("auto".to_string()),
                text: None,
            })
            .await?;

        let calls = first.function_calls();
        if calls.is_empty() {
            // The model answered without tools; its text is final
            return finalize(&first.output_text(), response_schema.as_ref());
        }

        for call in &calls {
            debug!("Model requested tool {} ({})", call.name, call.call_id);
            let args: Value = serde_json::from_str(&call.arguments).map_err(|e| {
                Error::ToolExecution(format!(
                    "invalid JSON arguments for {}: {}",
                    call.name, e
                ))
            })?;

            let result = self.registry.invoke(&call.name, args).await?;

            transcript.push(InputItem::FunctionCall {
                name: call.name.clone(),
                call_id: call.call_id.clone(),
                arguments: call.arguments.clone(),
            });
            transcript.push(InputItem::FunctionCallOutput {
                call_id: call.call_id.clone(),
                output: tool_output_string(result),
            });
        }
        info!("Executed {} tool call(s), requesting final answer", calls.len());

        let second = self
            .api
            .create_response(ResponseRequest {
                model: self.model.clone(),
                input: transcript,
                tools: None,
                tool_choice: None,
                text: response_schema.as_ref().map(TextConfig::json_schema),
            })
            .await?;

        finalize(&second.output_text(), response_schema.as_ref())
    }
}

/// Serialize a tool result for the transcript; string results go through
/// unquoted
fn tool_output_string(result: Value) -> String {
    match result {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn finalize(text: &str, schema: Option<&ResponseSchema>) -> AppResult<String> {
    if text.is_empty() {
        return Err(completion_error("Empty completion output"));
    }
    if let Some(schema) = schema {
        validate_structured(text, schema)?;
    }
    Ok(text.to_string())
}

/// Check a structured answer against the requested schema
fn validate_structured(text: &str, schema: &ResponseSchema) -> AppResult<()> {
    let instance: Value = serde_json::from_str(text)
        .map_err(|e| Error::SchemaValidation(format!("output is not valid JSON: {}", e)))?;

    let compiled = JSONSchema::compile(&schema.schema)
        .map_err(|e| Error::SchemaValidation(format!("invalid response schema: {}", e)))?;

    if let Err(errors) = compiled.validate(&instance) {
        let detail = errors
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::SchemaValidation(detail));
    }

    Ok(())
}
