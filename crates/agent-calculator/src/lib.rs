//! Calculator agent for graph-agents
//!
//! A model answers arithmetic questions by calling three pure functions,
//! `add`, `multiply` and `divide`, through the tool-dispatch loop.
//!
//! ```no_run
//! use agent_calculator::CalculatorAgent;
//! use agent_llm::{Message, providers::AnthropicProvider};
//! use agent_utils::AgentConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Arc::new(AnthropicProvider::from_env()?);
//! let agent = CalculatorAgent::new(provider, &AgentConfig::from_env()?)?;
//! let outcome = agent.respond(vec![Message::user("What is 3 times 4?")]).await?;
//! println!("{}", outcome.final_text());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod arithmetic;
pub mod error;
pub mod tools;

pub use agent::{CalculatorAgent, SYSTEM_PROMPT};
pub use arithmetic::{ArithmeticOp, Number, add, divide, multiply};
pub use error::{CalculatorError, Result};
pub use tools::{ArithmeticTool, calculator_registry, calculator_registry_all};
