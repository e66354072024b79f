mod builtin;
mod registry;

pub use builtin::{register_event_tools, DateRangeArgs};
pub use registry::{Tool, ToolHandler, ToolRegistry, ToolSpec};
