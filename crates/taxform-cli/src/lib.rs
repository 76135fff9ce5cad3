//! Taxform CLI
//!
//! Command definitions and the reports behind the `taxform` binary:
//! - `check`: visible fields and validation errors for a data file
//! - `visible`: visible field ids only
//! - `lint`: structural issues in a template

#![warn(missing_docs)]
#![warn(unreachable_pub)]

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use taxform_engine::{visible_field_ids, EngineConfig, ErrorMap, FormSession};
use taxform_schema::{lint_template, FormData, FormTemplate};

/// Default filter directive when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Result of `taxform check`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    /// Template id
    pub template: String,
    /// Whether validation passed
    pub valid: bool,
    /// Visible fields in template order
    pub visible: Vec<String>,
    /// Field id → message
    pub errors: ErrorMap,
}

/// One lint finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintFinding {
    /// Field the finding is about
    pub field_id: String,
    /// Description
    pub message: String,
}

/// Build the command-line interface
#[must_use]
pub fn cli() -> Command {
    let template = Arg::new("template")
        .long("template")
        .short('t')
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Template file (.json, .yaml, .yml)");
    let data = Arg::new("data")
        .long("data")
        .short('d')
        .value_parser(value_parser!(PathBuf))
        .help("Form data file; omitted means an empty form");
    let json = Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON");

    Command::new("taxform")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Check tax form templates and form data")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value(DEFAULT_LOG_LEVEL)
                .help("Log filter used when RUST_LOG is unset"),
        )
        .subcommand(
            Command::new("check")
                .about("Validate form data against a template")
                .arg(template.clone())
                .arg(data.clone())
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .value_parser(value_parser!(PathBuf))
                        .help("Engine configuration (TOML)"),
                )
                .arg(json.clone()),
        )
        .subcommand(
            Command::new("visible")
                .about("List the fields visible for the given data")
                .arg(template.clone())
                .arg(data)
                .arg(json.clone()),
        )
        .subcommand(
            Command::new("lint")
                .about("Report structural problems in a template")
                .arg(template)
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Exit with failure when any issue is found"),
                )
                .arg(json),
        )
}

/// Validate `data` against `template`
pub fn check(template: &Path, data: Option<&Path>, config: Option<&Path>) -> anyhow::Result<CheckReport> {
    let config = match config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let mut session = FormSession::load(template, data, &config)
        .with_context(|| format!("failed to open form {}", template.display()))?;
    let valid = session.validate();
    tracing::info!(
        template = %session.template().id,
        valid,
        errors = session.errors().len(),
        "checked form data"
    );
    Ok(CheckReport {
        template: session.template().id.clone(),
        valid,
        visible: session.visible_field_ids().iter().cloned().collect(),
        errors: session.errors().clone(),
    })
}

/// Visible field ids for `data`
pub fn visible(template: &Path, data: Option<&Path>) -> anyhow::Result<Vec<String>> {
    let template = load_template(template)?;
    let data = load_data(data)?;
    Ok(visible_field_ids(Some(&template), &data).into_iter().collect())
}

/// Lint a template file
pub fn lint(template: &Path) -> anyhow::Result<Vec<LintFinding>> {
    let template = load_template(template)?;
    Ok(lint_template(&template)
        .into_iter()
        .map(|issue| LintFinding {
            field_id: issue.field_id().to_string(),
            message: issue.to_string(),
        })
        .collect())
}

fn load_template(path: &Path) -> anyhow::Result<FormTemplate> {
    FormTemplate::load(path).with_context(|| format!("failed to load template {}", path.display()))
}

fn load_data(path: Option<&Path>) -> anyhow::Result<FormData> {
    let Some(path) = path else {
        return Ok(FormData::new());
    };
    FormData::load(path).with_context(|| format!("failed to load form data {}", path.display()))
}

/// Dispatch parsed arguments
pub fn run(matches: &ArgMatches) -> anyhow::Result<ExitCode> {
    match matches.subcommand() {
        Some(("check", args)) => {
            let report = check(
                path_arg(args, "template")?,
                optional_path(args, "data"),
                optional_path(args, "config"),
            )?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_check(&report));
            }
            Ok(exit_code(report.valid))
        }
        Some(("visible", args)) => {
            let ids = visible(path_arg(args, "template")?, optional_path(args, "data"))?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&ids)?);
            } else {
                for id in &ids {
                    println!("{id}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(("lint", args)) => {
            let findings = lint(path_arg(args, "template")?)?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&findings)?);
            } else if findings.is_empty() {
                println!("no issues");
            } else {
                for finding in &findings {
                    println!("{}: {}", finding.field_id, finding.message);
                }
            }
            Ok(exit_code(findings.is_empty() || !args.get_flag("strict")))
        }
        Some((other, _)) => anyhow::bail!("unknown command '{other}'"),
        None => anyhow::bail!("no command given"),
    }
}

/// Human-readable `check` output
#[must_use]
pub fn render_check(report: &CheckReport) -> String {
    let mut out = format!(
        "Template: {}\nVisible fields: {}\n",
        report.template,
        report.visible.len()
    );
    if report.valid {
        out.push_str("Status: VALID\n");
    } else {
        out.push_str(&format!("Status: INVALID ({} errors)\n", report.errors.len()));
        for (field_id, message) in &report.errors {
            out.push_str(&format!("  {field_id}: {message}\n"));
        }
    }
    out
}

fn path_arg<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a Path> {
    args.get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .with_context(|| format!("missing --{name}"))
}

fn optional_path<'a>(args: &'a ArgMatches, name: &str) -> Option<&'a Path> {
    args.get_one::<PathBuf>(name).map(PathBuf::as_path)
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
