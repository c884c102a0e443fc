//! External OpenAPI generator invocation.
//!
//! The generator is a black box: only its exit status matters. Argument
//! construction is kept separate from process spawning so it can be tested.
use crate::error::StepError;
use crate::graph::TaskSpec;
use crate::util::path_to_string;
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::Instant;

/// Environment variable holding the generator command line.
pub const GENERATOR_ENV: &str = "SPECGEN_GENERATOR";
/// Executable looked up on `PATH` when no command is configured.
pub const DEFAULT_GENERATOR_BIN: &str = "openapi-generator-cli";

/// Backend that performs validate and generate steps.
pub trait Generator {
    fn validate(&self, task: &TaskSpec) -> Result<(), StepError>;
    fn generate(&self, task: &TaskSpec) -> Result<(), StepError>;
}

/// Generator backed by an `openapi-generator-cli` compatible command.
#[derive(Debug, Clone)]
pub struct CliGenerator {
    program: String,
    leading_args: Vec<String>,
}

impl CliGenerator {
    /// Parse a shell-style command line such as
    /// `npx @openapitools/openapi-generator-cli`.
    pub fn from_command(command: &str) -> Result<Self> {
        let mut args = shell_words::split(command)
            .with_context(|| format!("parse generator command: {command}"))?;
        if args.is_empty() {
            return Err(anyhow!("generator command is empty"));
        }
        let program = args.remove(0);
        Ok(Self {
            program,
            leading_args: args,
        })
    }

    /// Resolve the generator: explicit command, then `SPECGEN_GENERATOR`, then
    /// `openapi-generator-cli` on `PATH`.
    pub fn resolve(explicit: Option<&str>) -> Result<Self> {
        let configured = explicit
            .map(str::to_string)
            .or_else(|| std::env::var(GENERATOR_ENV).ok())
            .filter(|command| !command.trim().is_empty());
        if let Some(command) = configured {
            return Self::from_command(&command);
        }
        let binary = which::which(DEFAULT_GENERATOR_BIN).with_context(|| {
            format!(
                "locate {DEFAULT_GENERATOR_BIN} on PATH (pass --generator or set {GENERATOR_ENV})"
            )
        })?;
        Ok(Self {
            program: binary.display().to_string(),
            leading_args: Vec::new(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, task: &TaskSpec, args: &[String]) -> Result<Output, StepError> {
        let start = Instant::now();
        let output = Command::new(&self.program)
            .args(&self.leading_args)
            .args(args)
            .output()
            .map_err(|source| StepError::Launch {
                program: self.program.clone(),
                source,
            })?;
        tracing::info!(
            task = %task.id,
            elapsed_ms = start.elapsed().as_millis(),
            success = output.status.success(),
            "generator step complete"
        );
        Ok(output)
    }
}

impl Generator for CliGenerator {
    fn validate(&self, task: &TaskSpec) -> Result<(), StepError> {
        let output = self.run(task, &build_validate_args(task))?;
        if output.status.success() {
            return Ok(());
        }
        Err(StepError::ValidationFailure {
            spec: spec_path(task),
            detail: failure_detail(&output),
        })
    }

    fn generate(&self, task: &TaskSpec) -> Result<(), StepError> {
        let output = self.run(task, &build_generate_args(task))?;
        if output.status.success() {
            return Ok(());
        }
        Err(StepError::GenerationFailure {
            spec: spec_path(task),
            detail: failure_detail(&output),
        })
    }
}

fn spec_path(task: &TaskSpec) -> PathBuf {
    task.spec_path.clone().unwrap_or_default()
}

/// Arguments for `validate -i <spec> [--recommend]`.
pub(crate) fn build_validate_args(task: &TaskSpec) -> Vec<String> {
    let mut args = vec!["validate".to_string()];
    if let Some(spec) = &task.spec_path {
        args.push("-i".to_string());
        args.push(path_to_string(spec));
    }
    if task.options.get("recommend").map(String::as_str) == Some("true") {
        args.push("--recommend".to_string());
    }
    args
}

/// Arguments for `generate -i <spec> -g <generator> -o <out> ...`.
pub(crate) fn build_generate_args(task: &TaskSpec) -> Vec<String> {
    let mut args = vec!["generate".to_string()];
    if let Some(spec) = &task.spec_path {
        args.push("-i".to_string());
        args.push(path_to_string(spec));
    }
    if let Some(generator) = &task.generator_name {
        args.push("-g".to_string());
        args.push(generator.clone());
    }
    if let Some(out) = &task.output_dir {
        args.push("-o".to_string());
        args.push(path_to_string(out));
    }
    push_pairs(&mut args, "--type-mappings", &task.type_mappings);
    push_pairs(&mut args, "--additional-properties", &task.options);
    push_pairs(&mut args, "--global-property", &task.global_properties);
    if let Some(packages) = &task.packages {
        args.push("--api-package".to_string());
        args.push(packages.api_package.clone());
        args.push("--model-package".to_string());
        args.push(packages.model_package.clone());
        args.push("--invoker-package".to_string());
        args.push(packages.invoker_package.clone());
    }
    args
}

fn push_pairs(args: &mut Vec<String>, flag: &str, pairs: &BTreeMap<String, String>) {
    if pairs.is_empty() {
        return;
    }
    let joined = pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(",");
    args.push(flag.to_string());
    args.push(joined);
}

fn failure_detail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let last_line = |text: &str| {
        text.lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    };
    last_line(&stderr)
        .or_else(|| last_line(&stdout))
        .unwrap_or_else(|| format!("status {}", output.status))
}
