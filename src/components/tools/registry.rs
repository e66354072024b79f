use crate::error::{AppResult, Error};
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Async tool handler taking a structured argument bag keyed by parameter name
pub type ToolHandler = Arc<dyn Fn(Value) -> BoxFuture<'static, AppResult<Value>> + Send + Sync>;

/// A registered model-invocable capability
#[derive(Clone)]
pub struct Tool {
    pub name: String,
    pub description: String,
    /// JSON-Schema description of the expected arguments
    pub parameters: Value,
    pub strict: bool,
    handler: ToolHandler,
}

impl Tool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        handler: ToolHandler,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            strict: true,
            handler,
        }
    }
}

/// Schema-level view of a tool, advertised to the completion endpoint
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
    pub strict: bool,
}

/// A mapping from tool name to description, parameter schema and handler.
///
/// Constructed explicitly and handed to the orchestrator, so tests can
/// substitute fake tools. Registering a name twice is rejected.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool; fails if the name is already taken
    pub fn register(&mut self, tool: Tool) -> AppResult<()> {
        if self.tools.iter().any(|t| t.name == tool.name) {
            return Err(Error::DuplicateTool(tool.name));
        }
        debug!("Registered tool {}", tool.name);
        self.tools.push(tool);
        Ok(())
    }

    /// Describe every registered tool, in registration order
    pub fn describe_all(&self) -> Vec<ToolSpec> {
        self.tools
            .iter()
            .map(|tool| ToolSpec {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
                strict: tool.strict,
            })
            .collect()
    }

    /// Invoke a tool by name with the given argument bag
    pub async fn invoke(&self, name: &str, args: Value) -> AppResult<Value> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| Error::ToolNotFound(name.to_string()))?;

        (tool.handler)(args).await.map_err(|e| match e {
            Error::ToolExecution(_) => e,
            other => Error::ToolExecution(format!("{}: {}", name, other)),
        })
    }
}
