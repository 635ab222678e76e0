//! Arithmetic functions exposed as agent tools

use agent_core::Result as AgentResult;
use agent_llm::tools::schema;
use agent_tools::{Tool, ToolRegistry};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

use crate::arithmetic::{ArithmeticOp, Number};

/// One arithmetic function as a tool
#[derive(Debug, Clone, Copy)]
pub struct ArithmeticTool {
    op: ArithmeticOp,
}

#[derive(Debug, Deserialize)]
struct Operands {
    a: i64,
    b: i64,
}

impl ArithmeticTool {
    /// Create a tool for `op`
    pub fn new(op: ArithmeticOp) -> Self {
        Self { op }
    }

    /// The wrapped operation
    pub fn op(&self) -> ArithmeticOp {
        self.op
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Int(n) => json!(n),
            Number::Float(x) => json!(x),
        }
    }
}

#[async_trait]
impl Tool for ArithmeticTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let Operands { a, b } = serde_json::from_value(params).map_err(|e| {
            agent_core::Error::ProcessingFailed(format!("Invalid parameters: {e}"))
        })?;

        let result = self.op.apply(a, b)?;
        debug!(op = %self.op, a, b, result = %result, "Arithmetic evaluated");
        Ok(result.into())
    }

    fn name(&self) -> &'static str {
        self.op.name()
    }

    fn description(&self) -> &'static str {
        self.op.description()
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "a": schema::integer("First int"),
                "b": schema::integer("Second int"),
            }),
            vec!["a", "b"],
        )
    }
}

/// Build a registry holding the named functions
///
/// Names are resolved up front, so a name outside the calculator's table is
/// a construction error rather than a failure in the middle of a run.
pub fn calculator_registry<S: AsRef<str>>(names: &[S]) -> AgentResult<ToolRegistry> {
    let tools = names
        .iter()
        .map(|name| {
            let op: ArithmeticOp = name.as_ref().parse()?;
            Ok(Arc::new(ArithmeticTool::new(op)) as Arc<dyn Tool>)
        })
        .collect::<AgentResult<Vec<_>>>()?;

    ToolRegistry::builder().register_all(tools).build()
}

/// Registry with `add`, `multiply` and `divide`
pub fn calculator_registry_all() -> AgentResult<ToolRegistry> {
    let names: Vec<&str> = ArithmeticOp::ALL.iter().map(|op| op.name()).collect();
    calculator_registry(&names)
}
