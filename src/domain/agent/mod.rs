//! Agent definitions.
//!
//! Agents are owned by the agent configuration store; conversations only
//! read them.

mod defaults;
mod definition;
mod template;

pub use defaults::{default_agents, default_global_variables};
pub use definition::{Agent, AgentCapabilities};
pub use template::{placeholders, render_template};
