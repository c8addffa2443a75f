//! Pipeline execution dispatcher
//!
//! Walks a validated pipeline graph in topological order, dispatching each
//! node to the command runner, analyzer, or notifier, while threading a
//! [`RunContext`] through the steps. Every run returns a complete ordered
//! list of step outcomes; individual step failures never abort the run on
//! the manual/scheduled path.
//!
//! The webhook-triggered path (`run_webhook`) intentionally differs: it
//! executes nodes in declaration order and stops at the first script node
//! that reports an error, preserving the behavior alert consumers rely on.

use aiops_core::domain::host::Host;
use aiops_core::domain::pipeline::{ActionKind, Node, NodeKind, Pipeline, PipelineDefinition};
use aiops_core::domain::run::{AiProvider, RunOptions, StepResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::ai;
use crate::context::RunContext;
use crate::error::{AiError, NotifyError, SshError};
use crate::graph;

/// Name used for the synthetic step reporting a rejected graph
const PIPELINE_ERROR_STEP: &str = "Pipeline Error";

/// Captured output of one remote command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Remote command execution seam
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run_command(&self, host: &Host, command: &str) -> Result<CommandOutput, SshError>;
}

/// Generative-AI seam
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn generate(&self, prompt: &str, provider: AiProvider) -> Result<String, AiError>;
}

/// Notification seam (chat webhook + email)
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_chat(&self, message: &str) -> Result<String, NotifyError>;
    async fn send_email(&self, subject: &str, html_body: &str) -> Result<String, NotifyError>;
}

/// The pipeline execution engine
///
/// Holds its adapters behind trait objects so the dispatch logic is
/// testable with in-memory fakes.
pub struct PipelineExecutor {
    runner: Arc<dyn CommandRunner>,
    analyzer: Arc<dyn Analyzer>,
    notifier: Arc<dyn Notifier>,
}

impl PipelineExecutor {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        analyzer: Arc<dyn Analyzer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            runner,
            analyzer,
            notifier,
        }
    }

    /// Runs a pipeline in topological order (manual and scheduled triggers).
    ///
    /// The graph is validated before any step dispatch; a cyclic or
    /// malformed graph yields exactly one synthetic failed step and no
    /// remote calls. Script failures are recorded and the run continues, so
    /// later analysis/notification nodes can consume the failure context.
    pub async fn run(
        &self,
        pipeline: &Pipeline,
        hosts: &[Host],
        options: &RunOptions,
    ) -> Vec<StepResult> {
        let order = match graph::execution_order(&pipeline.definition) {
            Ok(order) => order,
            Err(err) => {
                warn!("Pipeline '{}' rejected: {}", pipeline.name, err);
                return vec![StepResult::failed(PIPELINE_ERROR_STEP, err.to_string())];
            }
        };

        info!(
            "Running pipeline '{}' ({} nodes, {} steps)",
            pipeline.name,
            pipeline.definition.nodes.len(),
            order
                .iter()
                .filter(|id| !matches!(pipeline.definition.nodes[id.as_str()].kind, NodeKind::Host))
                .count()
        );

        let mut ctx = RunContext::default();
        let mut results = Vec::new();

        for node_id in &order {
            let node = &pipeline.definition.nodes[node_id];
            match &node.kind {
                // Host nodes are pure metadata and never produce a step.
                NodeKind::Host => continue,
                NodeKind::Script { content } => {
                    let result = self
                        .run_script_step(&pipeline.definition, node_id, node, content, hosts, options, &mut ctx)
                        .await;
                    results.push(result);
                }
                NodeKind::Action { data } => {
                    let result = self
                        .run_action_step(&pipeline.name, node, *data, options, &mut ctx)
                        .await;
                    results.push(result);
                }
            }
        }

        results
    }

    /// Runs a pipeline for an inbound alert (webhook trigger).
    ///
    /// Nodes execute in declaration order against the single resolved host,
    /// and the walk stops at the first script node that reports an error.
    pub async fn run_webhook(
        &self,
        pipeline: &Pipeline,
        host: &Host,
        trigger_name: &str,
        options: &RunOptions,
    ) -> Vec<StepResult> {
        info!(
            "Running pipeline '{}' on host '{}' for trigger '{}'",
            pipeline.name, host.name, trigger_name
        );

        let mut ctx = RunContext::default();
        let mut script_outputs: Vec<String> = Vec::new();
        let mut results = Vec::new();

        for (_, node) in pipeline.definition.nodes_in_order() {
            match &node.kind {
                NodeKind::Host => continue,
                NodeKind::Script { content } => {
                    if content.is_empty() {
                        continue;
                    }
                    info!("Executing script node: '{}'", node.name);
                    let result = self
                        .dispatch_command(host, content, options, &node.name, &mut ctx)
                        .await;
                    script_outputs.push(format!(
                        "--- Output of '{}' ---\n{}",
                        node.name, result.output
                    ));
                    let failed = !result.success;
                    results.push(result);
                    if failed {
                        // Stop the walk; the alert consumer treats a failed
                        // remediation step as terminal.
                        break;
                    }
                }
                NodeKind::Action { data: ActionKind::AiAnalysis } => {
                    info!("Executing action node: '{}'", node.name);
                    let diagnostic = script_outputs.join("\n");
                    let prompt = ai::alert_analysis_prompt(trigger_name, &host.name, &diagnostic);
                    let result = match self.analyzer.generate(&prompt, options.ai_provider).await {
                        Ok(text) => {
                            ctx.last_analysis = text.clone();
                            StepResult::ok(&node.name, text)
                        }
                        Err(err) => StepResult::failed(&node.name, err.to_string()),
                    };
                    results.push(result);
                }
                NodeKind::Action { data: ActionKind::NotifyChat } => {
                    info!("Executing action node: '{}'", node.name);
                    let message = alert_report(
                        &host.name,
                        trigger_name,
                        &pipeline.name,
                        &ctx.last_analysis,
                        &script_outputs,
                    );
                    let result = match self.notifier.send_chat(&message).await {
                        Ok(msg) => StepResult::ok(&node.name, msg),
                        Err(err) => StepResult::failed(&node.name, err.to_string()),
                    };
                    results.push(result);
                }
                NodeKind::Action { data: ActionKind::SendEmail } => {
                    info!("Executing action node: '{}'", node.name);
                    let subject = format!("AIOps alert: {} on {}", trigger_name, host.name);
                    let html = alert_report_html(
                        &host.name,
                        trigger_name,
                        &pipeline.name,
                        &ctx.last_analysis,
                        &script_outputs,
                    );
                    let result = match self.notifier.send_email(&subject, &html).await {
                        Ok(msg) => StepResult::ok(&node.name, msg),
                        Err(err) => StepResult::failed(&node.name, err.to_string()),
                    };
                    results.push(result);
                }
            }
        }

        results
    }

    async fn run_script_step(
        &self,
        def: &PipelineDefinition,
        node_id: &str,
        node: &Node,
        content: &str,
        hosts: &[Host],
        options: &RunOptions,
        ctx: &mut RunContext,
    ) -> StepResult {
        let host = match resolve_host(def, node_id, hosts) {
            Ok(host) => host,
            Err(message) => {
                // Resolution failures only fail this step; the run continues.
                ctx.record_script(content, "", &message);
                return StepResult::failed(&node.name, message);
            }
        };

        self.dispatch_command(host, content, options, &node.name, ctx)
            .await
    }

    async fn dispatch_command(
        &self,
        host: &Host,
        content: &str,
        options: &RunOptions,
        step_name: &str,
        ctx: &mut RunContext,
    ) -> StepResult {
        let command = compose_command(content, options.use_sudo);
        match self.runner.run_command(host, &command).await {
            Ok(output) => {
                ctx.record_script(content, &output.stdout, &output.stderr);
                let success = output.exit_code == 0 && output.stderr.is_empty();
                StepResult {
                    step_name: step_name.to_string(),
                    success,
                    output: output.stdout,
                    error: output.stderr,
                }
            }
            Err(err) => {
                let message = err.to_string();
                ctx.record_script(content, "", &message);
                StepResult::failed(step_name, message)
            }
        }
    }

    async fn run_action_step(
        &self,
        pipeline_name: &str,
        node: &Node,
        kind: ActionKind,
        options: &RunOptions,
        ctx: &mut RunContext,
    ) -> StepResult {
        match kind {
            ActionKind::AiAnalysis => {
                let prompt = ai::analysis_prompt(&ctx.last_script, &ctx.last_output, &ctx.last_error);
                match self.analyzer.generate(&prompt, options.ai_provider).await {
                    Ok(text) => {
                        ctx.last_analysis = text.clone();
                        StepResult::ok(&node.name, text)
                    }
                    Err(err) => StepResult::failed(&node.name, err.to_string()),
                }
            }
            ActionKind::NotifyChat => {
                let message = run_report(pipeline_name, ctx);
                match self.notifier.send_chat(&message).await {
                    Ok(msg) => StepResult::ok(&node.name, msg),
                    Err(err) => StepResult::failed(&node.name, err.to_string()),
                }
            }
            ActionKind::SendEmail => {
                let subject = format!("AIOps pipeline report: {}", pipeline_name);
                let html = run_report_html(pipeline_name, ctx);
                match self.notifier.send_email(&subject, &html).await {
                    Ok(msg) => StepResult::ok(&node.name, msg),
                    Err(err) => StepResult::failed(&node.name, err.to_string()),
                }
            }
        }
    }
}

/// Resolves the target host for a script node.
///
/// Preference order: an explicit incoming connection from a host node, then
/// the first host node declared anywhere in the graph. The resolved node's
/// name must match a registered host.
fn resolve_host<'a>(
    def: &PipelineDefinition,
    node_id: &str,
    hosts: &'a [Host],
) -> Result<&'a Host, String> {
    let connected = def
        .connections
        .iter()
        .filter(|c| c.to == node_id)
        .filter_map(|c| def.nodes.get(&c.from))
        .find(|n| matches!(n.kind, NodeKind::Host));

    let default = || {
        def.nodes
            .values()
            .find(|n| matches!(n.kind, NodeKind::Host))
    };

    let host_node = connected
        .or_else(default)
        .ok_or_else(|| "no host connected".to_string())?;

    hosts
        .iter()
        .find(|h| h.name == host_node.name)
        .ok_or_else(|| format!("host '{}' not found in registry", host_node.name))
}

/// Composes the remote command, optionally wrapped for elevated execution.
///
/// Single quotes in the script are escaped so the sudo wrapper survives
/// arbitrary script bodies.
fn compose_command(script: &str, use_sudo: bool) -> String {
    if use_sudo {
        let sanitized = script.replace('\'', r"'\''");
        format!("sudo bash -c '{}'", sanitized)
    } else {
        script.to_string()
    }
}

fn or_na(text: &str) -> &str {
    if text.is_empty() { "N/A" } else { text }
}

/// Fixed chat report for manual/scheduled runs
fn run_report(pipeline_name: &str, ctx: &RunContext) -> String {
    format!(
        "**Pipeline Report: {}**\n\
         ----------------------------------------\n\
         **Last Script:**\n```\n{}\n```\n\
         **Output:**\n```\n{}\n```\n\
         **Error:**\n```\n{}\n```\n\
         **AI Analysis:**\n```\n{}\n```",
        pipeline_name,
        or_na(&ctx.last_script),
        or_na(&ctx.last_output),
        or_na(&ctx.last_error),
        or_na(&ctx.last_analysis),
    )
}

/// Same report rendered as HTML for the email path
fn run_report_html(pipeline_name: &str, ctx: &RunContext) -> String {
    format!(
        "<h2>Pipeline Report: {}</h2>\
         <h3>Last Script</h3><pre>{}</pre>\
         <h3>Output</h3><pre>{}</pre>\
         <h3>Error</h3><pre>{}</pre>\
         <h3>AI Analysis</h3><pre>{}</pre>",
        pipeline_name,
        or_na(&ctx.last_script),
        or_na(&ctx.last_output),
        or_na(&ctx.last_error),
        or_na(&ctx.last_analysis),
    )
}

/// Triage report for webhook-triggered runs
fn alert_report(
    host_name: &str,
    trigger_name: &str,
    pipeline_name: &str,
    analysis: &str,
    script_outputs: &[String],
) -> String {
    let raw = if script_outputs.is_empty() {
        "No output.".to_string()
    } else {
        script_outputs.join("\n")
    };
    format!(
        "**Alert Triage Report**\n\
         **Host:** `{}`\n\
         **Trigger:** `{}`\n\
         **Pipeline:** `{}`\n\
         ----------------------------------------\n\
         **AI Synopsis & Recommendations:**\n```\n{}\n```\n\
         ----------------------------------------\n\
         **Raw Diagnostic Output:**\n```\n{}\n```",
        host_name,
        trigger_name,
        pipeline_name,
        or_na(analysis),
        raw,
    )
}

fn alert_report_html(
    host_name: &str,
    trigger_name: &str,
    pipeline_name: &str,
    analysis: &str,
    script_outputs: &[String],
) -> String {
    let raw = if script_outputs.is_empty() {
        "No output.".to_string()
    } else {
        script_outputs.join("\n")
    };
    format!(
        "<h2>Alert Triage Report</h2>\
         <p><b>Host:</b> {}<br><b>Trigger:</b> {}<br><b>Pipeline:</b> {}</p>\
         <h3>AI Synopsis &amp; Recommendations</h3><pre>{}</pre>\
         <h3>Raw Diagnostic Output</h3><pre>{}</pre>",
        host_name,
        trigger_name,
        pipeline_name,
        or_na(analysis),
        raw,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiops_core::domain::pipeline::{Connection, NodeMap};
    use std::sync::Mutex;
    use uuid::Uuid;

    // =========================================================================
    // Fakes
    // =========================================================================

    #[derive(Default)]
    struct FakeRunner {
        commands: Mutex<Vec<(String, String)>>,
        fail_matching: Option<String>,
    }

    #[async_trait]
    impl CommandRunner for FakeRunner {
        async fn run_command(
            &self,
            host: &Host,
            command: &str,
        ) -> Result<CommandOutput, SshError> {
            self.commands
                .lock()
                .unwrap()
                .push((host.name.clone(), command.to_string()));
            if let Some(pattern) = &self.fail_matching {
                if command.contains(pattern.as_str()) {
                    return Ok(CommandOutput {
                        stdout: String::new(),
                        stderr: format!("command not found: {}", pattern),
                        exit_code: 127,
                    });
                }
            }
            Ok(CommandOutput {
                stdout: format!("ran: {}", command),
                stderr: String::new(),
                exit_code: 0,
            })
        }
    }

    #[derive(Default)]
    struct FakeAnalyzer {
        prompts: Mutex<Vec<String>>,
        missing_key: bool,
    }

    #[async_trait]
    impl Analyzer for FakeAnalyzer {
        async fn generate(&self, prompt: &str, _provider: AiProvider) -> Result<String, AiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.missing_key {
                return Err(AiError::MissingApiKey {
                    provider: "openai".to_string(),
                });
            }
            Ok("analysis: looks fine".to_string())
        }
    }

    #[derive(Default)]
    struct FakeNotifier {
        chats: Mutex<Vec<String>>,
        emails: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn send_chat(&self, message: &str) -> Result<String, NotifyError> {
            self.chats.lock().unwrap().push(message.to_string());
            Ok("Message sent".to_string())
        }

        async fn send_email(&self, subject: &str, html: &str) -> Result<String, NotifyError> {
            self.emails
                .lock()
                .unwrap()
                .push((subject.to_string(), html.to_string()));
            Ok("Email sent".to_string())
        }
    }

    // =========================================================================
    // Builders
    // =========================================================================

    fn host_node(name: &str) -> Node {
        Node {
            name: name.to_string(),
            kind: NodeKind::Host,
        }
    }

    fn script_node(name: &str, content: &str) -> Node {
        Node {
            name: name.to_string(),
            kind: NodeKind::Script {
                content: content.to_string(),
            },
        }
    }

    fn action_node(name: &str, kind: ActionKind) -> Node {
        Node {
            name: name.to_string(),
            kind: NodeKind::Action { data: kind },
        }
    }

    fn pipeline(nodes: Vec<(&str, Node)>, edges: &[(&str, &str)]) -> Pipeline {
        let nodes: NodeMap = nodes
            .into_iter()
            .map(|(id, n)| (id.to_string(), n))
            .collect();
        let connections = edges
            .iter()
            .map(|(from, to)| Connection {
                from: from.to_string(),
                to: to.to_string(),
            })
            .collect();
        Pipeline {
            id: Uuid::new_v4(),
            name: "Triage".to_string(),
            description: None,
            definition: PipelineDefinition { nodes, connections },
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn registered_host(name: &str) -> Host {
        Host {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: "127.0.0.1".to_string(),
            os_type: "Linux".to_string(),
            distro: Some("Ubuntu".to_string()),
            ssh_user: "ops".to_string(),
            ssh_key_path: None,
            password: None,
            location: None,
            description: None,
            group_id: None,
        }
    }

    fn executor(
        runner: Arc<FakeRunner>,
        analyzer: Arc<FakeAnalyzer>,
        notifier: Arc<FakeNotifier>,
    ) -> PipelineExecutor {
        PipelineExecutor::new(runner, analyzer, notifier)
    }

    // =========================================================================
    // Manual/scheduled path
    // =========================================================================

    #[tokio::test]
    async fn test_host_then_script_runs_on_connected_host() {
        let runner = Arc::new(FakeRunner::default());
        let analyzer = Arc::new(FakeAnalyzer::default());
        let notifier = Arc::new(FakeNotifier::default());
        let exec = executor(runner.clone(), analyzer, notifier);

        let p = pipeline(
            vec![
                ("h1", host_node("web1")),
                ("s1", script_node("Check uptime", "uptime")),
            ],
            &[("h1", "s1")],
        );
        let hosts = vec![registered_host("web1")];

        let results = exec.run(&p, &hosts, &RunOptions::default()).await;

        // h1 produces no StepResult.
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].step_name, "Check uptime");
        assert!(results[0].success);
        assert!(results[0].output.contains("uptime"));

        let commands = runner.commands.lock().unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0], ("web1".to_string(), "uptime".to_string()));
    }

    #[tokio::test]
    async fn test_cycle_yields_single_synthetic_step_and_no_calls() {
        let runner = Arc::new(FakeRunner::default());
        let analyzer = Arc::new(FakeAnalyzer::default());
        let notifier = Arc::new(FakeNotifier::default());
        let exec = executor(runner.clone(), analyzer.clone(), notifier.clone());

        let p = pipeline(
            vec![
                ("a", script_node("A", "true")),
                ("b", script_node("B", "true")),
                ("c", script_node("C", "true")),
            ],
            &[("a", "b"), ("b", "c"), ("c", "a")],
        );

        let results = exec.run(&p, &[], &RunOptions::default()).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].step_name, "Pipeline Error");
        assert!(!results[0].success);
        assert!(results[0].error.contains("cycle"));
        assert!(runner.commands.lock().unwrap().is_empty());
        assert!(analyzer.prompts.lock().unwrap().is_empty());
        assert!(notifier.chats.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_script_without_host_fails_but_run_continues() {
        let runner = Arc::new(FakeRunner::default());
        let analyzer = Arc::new(FakeAnalyzer::default());
        let notifier = Arc::new(FakeNotifier::default());
        let exec = executor(runner.clone(), analyzer.clone(), notifier);

        let p = pipeline(
            vec![
                ("s1", script_node("Orphan", "uptime")),
                ("a1", action_node("AI Analysis", ActionKind::AiAnalysis)),
            ],
            &[("s1", "a1")],
        );

        let results = exec.run(&p, &[], &RunOptions::default()).await;

        assert_eq!(results.len(), 2);
        assert!(!results[0].success);
        assert!(results[0].error.contains("no host connected"));
        // The analysis node still executed and saw the failure context.
        assert!(results[1].success);
        let prompts = analyzer.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("no host connected"));
        assert!(runner.commands.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unregistered_host_name_fails_resolution() {
        let runner = Arc::new(FakeRunner::default());
        let exec = executor(
            runner.clone(),
            Arc::new(FakeAnalyzer::default()),
            Arc::new(FakeNotifier::default()),
        );

        let p = pipeline(
            vec![
                ("h1", host_node("ghost")),
                ("s1", script_node("Check", "uptime")),
            ],
            &[("h1", "s1")],
        );
        let hosts = vec![registered_host("web1")];

        let results = exec.run(&p, &hosts, &RunOptions::default()).await;

        assert_eq!(results.len(), 1);
        assert!(!results[0].success);
        assert!(results[0].error.contains("ghost"));
        assert!(runner.commands.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_default_host_fallback_without_edge() {
        let runner = Arc::new(FakeRunner::default());
        let exec = executor(
            runner.clone(),
            Arc::new(FakeAnalyzer::default()),
            Arc::new(FakeNotifier::default()),
        );

        // No edge connects the host to the script; the first host node in
        // the graph still serves as the default target.
        let p = pipeline(
            vec![
                ("h1", host_node("web1")),
                ("s1", script_node("Check", "uptime")),
            ],
            &[],
        );
        let hosts = vec![registered_host("web1")];

        let results = exec.run(&p, &hosts, &RunOptions::default()).await;
        assert!(results[0].success);
        assert_eq!(runner.commands.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_script_does_not_halt_run() {
        let runner = Arc::new(FakeRunner {
            fail_matching: Some("broken".to_string()),
            ..Default::default()
        });
        let analyzer = Arc::new(FakeAnalyzer::default());
        let notifier = Arc::new(FakeNotifier::default());
        let exec = executor(runner.clone(), analyzer.clone(), notifier.clone());

        let p = pipeline(
            vec![
                ("h1", host_node("web1")),
                ("s1", script_node("Broken step", "broken-cmd")),
                ("a1", action_node("AI Analysis", ActionKind::AiAnalysis)),
                ("n1", action_node("Notify Chat", ActionKind::NotifyChat)),
            ],
            &[("h1", "s1"), ("s1", "a1"), ("a1", "n1")],
        );
        let hosts = vec![registered_host("web1")];

        let results = exec.run(&p, &hosts, &RunOptions::default()).await;

        assert_eq!(results.len(), 3);
        assert!(!results[0].success);
        assert!(results[1].success);
        assert!(results[2].success);
        // The chat report carries the analysis produced from the failure.
        let chats = notifier.chats.lock().unwrap();
        assert_eq!(chats.len(), 1);
        assert!(chats[0].contains("analysis: looks fine"));
        assert!(chats[0].contains("command not found"));
    }

    #[tokio::test]
    async fn test_missing_ai_key_fails_step_not_run() {
        let runner = Arc::new(FakeRunner::default());
        let analyzer = Arc::new(FakeAnalyzer {
            missing_key: true,
            ..Default::default()
        });
        let notifier = Arc::new(FakeNotifier::default());
        let exec = executor(runner, analyzer, notifier.clone());

        let p = pipeline(
            vec![
                ("a1", action_node("AI Analysis", ActionKind::AiAnalysis)),
                ("n1", action_node("Notify Chat", ActionKind::NotifyChat)),
            ],
            &[("a1", "n1")],
        );

        let results = exec.run(&p, &[], &RunOptions::default()).await;

        assert_eq!(results.len(), 2);
        assert!(!results[0].success);
        assert!(results[0].error.contains("API key is missing"));
        assert!(results[1].success);
    }

    #[tokio::test]
    async fn test_sudo_wraps_and_escapes_command() {
        let runner = Arc::new(FakeRunner::default());
        let exec = executor(
            runner.clone(),
            Arc::new(FakeAnalyzer::default()),
            Arc::new(FakeNotifier::default()),
        );

        let p = pipeline(
            vec![
                ("h1", host_node("web1")),
                ("s1", script_node("Check", "echo 'hi'")),
            ],
            &[("h1", "s1")],
        );
        let hosts = vec![registered_host("web1")];
        let options = RunOptions {
            use_sudo: true,
            ..Default::default()
        };

        exec.run(&p, &hosts, &options).await;

        let commands = runner.commands.lock().unwrap();
        assert_eq!(commands[0].1, r"sudo bash -c 'echo '\''hi'\'''");
    }

    #[tokio::test]
    async fn test_email_action_sends_html_report() {
        let notifier = Arc::new(FakeNotifier::default());
        let exec = executor(
            Arc::new(FakeRunner::default()),
            Arc::new(FakeAnalyzer::default()),
            notifier.clone(),
        );

        let p = pipeline(
            vec![
                ("h1", host_node("web1")),
                ("s1", script_node("Check", "uptime")),
                ("e1", action_node("Send Email", ActionKind::SendEmail)),
            ],
            &[("h1", "s1"), ("s1", "e1")],
        );
        let hosts = vec![registered_host("web1")];

        let results = exec.run(&p, &hosts, &RunOptions::default()).await;
        assert!(results.iter().all(|r| r.success));

        let emails = notifier.emails.lock().unwrap();
        assert_eq!(emails.len(), 1);
        assert!(emails[0].0.contains("Triage"));
        assert!(emails[0].1.contains("<pre>"));
    }

    // =========================================================================
    // Webhook path
    // =========================================================================

    #[tokio::test]
    async fn test_webhook_runs_numbered_nodes_in_declaration_order() {
        let runner = Arc::new(FakeRunner::default());
        let analyzer = Arc::new(FakeAnalyzer::default());
        let notifier = Arc::new(FakeNotifier::default());
        let exec = executor(runner.clone(), analyzer, notifier);

        // node_10 sorts before node_2 lexicographically; declaration order
        // must win.
        let p = pipeline(
            vec![
                ("node_2", script_node("First", "first-cmd")),
                ("node_10", script_node("Second", "second-cmd")),
            ],
            &[],
        );
        let host = registered_host("web1");

        let results = exec
            .run_webhook(&p, &host, "High CPU", &RunOptions::default())
            .await;

        assert_eq!(results.len(), 2);
        let commands: Vec<String> = runner
            .commands
            .lock()
            .unwrap()
            .iter()
            .map(|(_, cmd)| cmd.clone())
            .collect();
        assert_eq!(commands, vec!["first-cmd", "second-cmd"]);
    }

    #[tokio::test]
    async fn test_webhook_halts_on_first_script_error() {
        let runner = Arc::new(FakeRunner {
            fail_matching: Some("broken".to_string()),
            ..Default::default()
        });
        let analyzer = Arc::new(FakeAnalyzer::default());
        let notifier = Arc::new(FakeNotifier::default());
        let exec = executor(runner.clone(), analyzer.clone(), notifier.clone());

        let p = pipeline(
            vec![
                ("s1", script_node("First", "broken-cmd")),
                ("s2", script_node("Second", "uptime")),
                ("a1", action_node("AI Analysis", ActionKind::AiAnalysis)),
            ],
            &[],
        );
        let host = registered_host("web1");

        let results = exec
            .run_webhook(&p, &host, "High CPU", &RunOptions::default())
            .await;

        assert_eq!(results.len(), 1);
        assert!(!results[0].success);
        assert_eq!(runner.commands.lock().unwrap().len(), 1);
        assert!(analyzer.prompts.lock().unwrap().is_empty());
        assert!(notifier.chats.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_full_triage_flow() {
        let runner = Arc::new(FakeRunner::default());
        let analyzer = Arc::new(FakeAnalyzer::default());
        let notifier = Arc::new(FakeNotifier::default());
        let exec = executor(runner, analyzer.clone(), notifier.clone());

        let p = pipeline(
            vec![
                ("s1", script_node("Collect diagnostics", "dmesg | tail")),
                ("s2", script_node("Disk usage", "df -h")),
                ("a1", action_node("AI Analysis", ActionKind::AiAnalysis)),
                ("n1", action_node("Notify Chat", ActionKind::NotifyChat)),
            ],
            &[],
        );
        let host = registered_host("web1");

        let results = exec
            .run_webhook(&p, &host, "Disk full", &RunOptions::default())
            .await;

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.success));

        let prompts = analyzer.prompts.lock().unwrap();
        assert!(prompts[0].contains("Disk full"));
        assert!(prompts[0].contains("web1"));
        assert!(prompts[0].contains("Collect diagnostics"));

        let chats = notifier.chats.lock().unwrap();
        assert!(chats[0].contains("Alert Triage Report"));
        assert!(chats[0].contains("Disk full"));
        assert!(chats[0].contains("analysis: looks fine"));
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn test_compose_command_without_sudo_is_verbatim() {
        assert_eq!(compose_command("df -h", false), "df -h");
    }

    #[test]
    fn test_run_report_uses_na_for_empty_fields() {
        let report = run_report("Triage", &RunContext::default());
        assert!(report.contains("N/A"));
    }
}
