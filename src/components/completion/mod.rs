mod client;
mod models;
mod orchestrator;

pub use client::{CompletionApi, HttpCompletionClient};
pub use models::{
    event_list_schema, ContentPart, FunctionCall, InputItem, OutputItem, Response,
    ResponseRequest, ResponseSchema, TextConfig, ToolDescriptor,
};
pub use orchestrator::Orchestrator;
