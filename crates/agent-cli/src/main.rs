//! Command-line interface for graph-agents
//!
//! # Usage
//!
//! ```bash
//! export ANTHROPIC_API_KEY=...
//!
//! graph-agents calculator "What is 3 times 4, divided by 2?"
//! graph-agents test-runner --path libs/langgraph/tests
//! ```

use agent_calculator::CalculatorAgent;
use agent_llm::providers::AnthropicProvider;
use agent_llm::{LLMProvider, Message};
use agent_runtime::{ExecutorEventHandler, RunOutcome, RunStatus};
use agent_sandbox::SandboxConfig;
use agent_test_runner::{DEFAULT_INSTRUCTION, TestEnvironment, TestRunnerAgent, WorkflowConfig};
use agent_utils::AgentConfig;
use anyhow::Context as _;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "graph-agents")]
#[command(about = "Tool-calling agents: a calculator and a sandboxed test runner", long_about = None)]
struct Args {
    /// Model identifier (overrides AGENT_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Maximum model calls per run (overrides AGENT_MAX_ITERATIONS)
    #[arg(long, global = true)]
    max_iterations: Option<usize>,

    /// Print each tool call and its result to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer an arithmetic question with add, multiply and divide
    Calculator {
        /// The question
        question: String,
    },

    /// Set up the sandbox, run the tests and summarize the results
    TestRunner {
        /// Restrict the run to this test path inside the repository checkout
        #[arg(long)]
        path: Option<String>,

        /// Message to start with; the default instruction is used when omitted
        message: Option<String>,
    },
}

/// Prints tool activity to stderr
struct ConsoleEventHandler;

#[async_trait]
impl ExecutorEventHandler for ConsoleEventHandler {
    async fn on_tool_start(&self, _id: &str, name: &str, input: &Value) {
        eprintln!("-> {name}({input})");
    }

    async fn on_tool_done(
        &self,
        _id: &str,
        name: &str,
        result: std::result::Result<&str, &str>,
        duration_ms: u64,
    ) {
        let (status, text) = match result {
            Ok(text) => ("ok", text),
            Err(text) => ("error", text),
        };
        let preview: String = text.chars().take(300).collect();
        eprintln!("<- {name} [{status}, {duration_ms}ms] {preview}");
    }
}

fn agent_config(args: &Args) -> anyhow::Result<AgentConfig> {
    let mut config = AgentConfig::from_env().context("invalid agent configuration")?;
    if let Some(model) = &args.model {
        config.model.clone_from(model);
    }
    if let Some(max) = args.max_iterations {
        config.max_iterations = max;
    }
    config.validate().context("invalid agent configuration")?;
    Ok(config)
}

fn print_outcome(outcome: &RunOutcome) {
    if outcome.status == RunStatus::IterationLimitReached {
        warn!(llm_calls = outcome.llm_calls, "Run stopped at the iteration cap");
    }
    println!("{}", outcome.final_text());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.log_json {
        agent_utils::init_tracing_json("info");
    } else {
        agent_utils::init_tracing();
    }

    let config = agent_config(&args)?;
    let provider: Arc<dyn LLMProvider> =
        Arc::new(AnthropicProvider::from_env().context("failed to create model provider")?);
    let handler: Option<Arc<dyn ExecutorEventHandler>> = if args.verbose {
        Some(Arc::new(ConsoleEventHandler))
    } else {
        None
    };

    info!(model = %config.model, max_iterations = config.max_iterations, "Starting graph-agents");

    match args.command {
        Command::Calculator { question } => {
            let agent = CalculatorAgent::with_event_handler(provider, &config, handler)?;
            let outcome = agent.respond(vec![Message::user(question)]).await?;
            print_outcome(&outcome);
        }
        Command::TestRunner { path, message } => {
            let sandbox = SandboxConfig::default().with_env_overrides();
            sandbox.validate()?;
            let workflow = WorkflowConfig::default().with_env_overrides();
            workflow.validate()?;

            let env = Arc::new(TestEnvironment::from_config(sandbox, workflow));
            let agent = TestRunnerAgent::with_event_handler(provider, env, &config, handler)?;

            let conversation = match (message, path) {
                (None, None) => Vec::new(),
                (message, path) => {
                    let mut text = message.unwrap_or_else(|| DEFAULT_INSTRUCTION.to_string());
                    if let Some(path) = path {
                        text.push_str(&format!(" Only run the tests under `{path}`."));
                    }
                    vec![Message::user(text)]
                }
            };
            let outcome = agent.respond(conversation).await?;
            print_outcome(&outcome);
        }
    }

    Ok(())
}
