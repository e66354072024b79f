use crate::components::tools::ToolSpec;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One item of the request input transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputItem {
    #[serde(rename = "message")]
    Message { role: String, content: String },
    #[serde(rename = "function_call")]
    FunctionCall {
        name: String,
        call_id: String,
        arguments: String,
    },
    #[serde(rename = "function_call_output")]
    FunctionCallOutput { call_id: String, output: String },
}

impl InputItem {
    pub fn system(content: impl Into<String>) -> Self {
        InputItem::Message {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        InputItem::Message {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Tool descriptor in the endpoint's wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub description: String,
    pub parameters: Value,
    pub strict: bool,
}

impl From<ToolSpec> for ToolDescriptor {
    fn from(spec: ToolSpec) -> Self {
        ToolDescriptor {
            kind: "function".to_string(),
            name: spec.name,
            description: spec.description,
            parameters: spec.parameters,
            strict: spec.strict,
        }
    }
}

/// A caller-supplied constraint on the final output shape
#[derive(Debug, Clone)]
pub struct ResponseSchema {
    pub name: String,
    pub schema: Value,
    pub strict: bool,
}

/// `text.format` request section for structured JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    pub format: FormatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub schema: Value,
    pub strict: bool,
}

impl TextConfig {
    pub fn json_schema(schema: &ResponseSchema) -> Self {
        TextConfig {
            format: FormatConfig {
                kind: "json_schema".to_string(),
                name: schema.name.clone(),
                schema: schema.schema.clone(),
                strict: schema.strict,
            },
        }
    }
}

/// Request body for the completion endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ResponseRequest {
    pub model: String,
    pub input: Vec<InputItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextConfig>,
}

/// Response body from the completion endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum OutputItem {
    #[serde(rename = "message")]
    Message {
        #[serde(default)]
        content: Vec<ContentPart>,
    },
    #[serde(rename = "function_call")]
    FunctionCall {
        name: String,
        call_id: String,
        arguments: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "output_text")]
    OutputText { text: String },
    #[serde(other)]
    Other,
}

/// A function-call request extracted from a response
#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub name: String,
    pub call_id: String,
    pub arguments: String,
}

impl Response {
    /// Concatenated output text of all message items
    pub fn output_text(&self) -> String {
        let mut text = String::new();
        for item in &self.output {
            if let OutputItem::Message { content } = item {
                for part in content {
                    if let ContentPart::OutputText { text: t } = part {
                        text.push_str(t);
                    }
                }
            }
        }
        text
    }

    /// Function-call requests in the order the endpoint returned them
    pub fn function_calls(&self) -> Vec<FunctionCall> {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::FunctionCall {
                    name,
                    call_id,
                    arguments,
                } => Some(FunctionCall {
                    name: name.clone(),
                    call_id: call_id.clone(),
                    arguments: arguments.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

/// Schema for an event-list answer: `{events: [{title, pubDate, description}]}`
pub fn event_list_schema() -> ResponseSchema {
    ResponseSchema {
        name: "event_list".to_string(),
        schema: json!({
            "type": "object",
            "properties": {
                "events": {
                    "type": "array",
                    "description": "A list of events.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": {
                                "type": "string",
                                "description": "The title of the event."
                            },
                            "pubDate": {
                                "type": "string",
                                "description": "The publication date of the event."
                            },
                            "description": {
                                "type": "string",
                                "description": "A detailed description of the event."
                            }
                        },
                        "required": ["title", "pubDate", "description"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["events"],
            "additionalProperties": false
        }),
        strict: true,
    }
}
