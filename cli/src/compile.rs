#![deny(missing_docs)]

//! # Compile Command
//!
//! Reads an OpenAPI document, compiles it and writes the IR as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use openapi_zod_core::{
    compile_yaml, CompiledDocument, CompilerOptions, Emitter, ErrorStatusBehavior, JsonEmitter,
};

use crate::error::{CliError, CliResult};

/// Error status selection, as accepted on the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatusArg {
    /// Every declared non-2xx status is an error.
    SpecCompliant,
    /// Only 4xx, 5xx and `default` are errors.
    AutoCorrect,
}

impl From<ErrorStatusArg> for ErrorStatusBehavior {
    fn from(arg: ErrorStatusArg) -> Self {
        match arg {
            ErrorStatusArg::SpecCompliant => ErrorStatusBehavior::SpecCompliant,
            ErrorStatusArg::AutoCorrect => ErrorStatusBehavior::AutoCorrect,
        }
    }
}

/// Compiler options; each flag overrides the config file.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct OptionArgs {
    /// Options file (YAML or JSON).
    #[clap(long, env = "OPENAPI_ZOD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Reject undeclared object keys unless `additionalProperties` says otherwise.
    #[clap(long, env = "OPENAPI_ZOD_STRICT_OBJECTS")]
    pub strict_objects: Option<bool>,

    /// Emit `default` modifiers.
    #[clap(long, env = "OPENAPI_ZOD_WITH_DEFAULT_VALUES")]
    pub with_default_values: Option<bool>,

    /// Emit `describe` modifiers.
    #[clap(long, env = "OPENAPI_ZOD_WITH_DESCRIPTION")]
    pub with_description: Option<bool>,

    /// Attach aliases to endpoints.
    #[clap(long, env = "OPENAPI_ZOD_WITH_ALIAS")]
    pub with_alias: Option<bool>,

    /// How error responses are selected.
    #[clap(long, value_enum, env = "OPENAPI_ZOD_ERROR_STATUS_BEHAVIOR")]
    pub error_status_behavior: Option<ErrorStatusArg>,
}

impl OptionArgs {
    /// Loads the config file (if any) and applies the flag overrides.
    pub fn resolve(&self) -> CliResult<CompilerOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let content = read_file(path, "config")?;
                CompilerOptions::from_yaml_str(&content)?
            }
            None => CompilerOptions::default(),
        };

        if let Some(value) = self.strict_objects {
            options.strict_objects = value;
        }
        if let Some(value) = self.with_default_values {
            options.with_default_values = value;
        }
        if let Some(value) = self.with_description {
            options.with_description = value;
        }
        if let Some(value) = self.with_alias {
            options.with_alias = value;
        }
        if let Some(value) = self.error_status_behavior {
            options.error_status_behavior = value.into();
        }
        Ok(options)
    }
}

/// Arguments for the compile command.
#[derive(clap::Args, Debug, Clone)]
pub struct CompileArgs {
    /// Path to the OpenAPI document.
    #[clap(long, short, default_value = "docs/openapi.yaml")]
    pub input: PathBuf,

    /// Output file. Defaults to stdout.
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Single-line JSON instead of pretty-printed.
    #[clap(long)]
    pub compact: bool,

    #[clap(flatten)]
    pub options: OptionArgs,
}

/// Arguments for the check command.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to the OpenAPI document.
    #[clap(long, short, default_value = "docs/openapi.yaml")]
    pub input: PathBuf,

    /// Exit with an error when any warning is reported.
    #[clap(long)]
    pub deny_warnings: bool,

    #[clap(flatten)]
    pub options: OptionArgs,
}

/// Executes the compile command.
pub fn execute(args: &CompileArgs) -> CliResult<()> {
    let compiled = run(&args.input, &args.options)?;
    let emitter = JsonEmitter {
        pretty: !args.compact,
    };
    let rendered = emitter.emit(&compiled)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, rendered)?;
            println!("Compiled {:?} to {:?}", args.input, path);
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

/// Executes the check command.
pub fn check(args: &CheckArgs) -> CliResult<()> {
    let compiled = run(&args.input, &args.options)?;
    println!(
        "{:?}: {} declarations, {} endpoints, {} warnings",
        args.input,
        compiled.declarations.len(),
        compiled.endpoints.len(),
        compiled.warnings.len()
    );
    if args.deny_warnings && !compiled.warnings.is_empty() {
        return Err(CliError::General(format!(
            "{} warning(s) reported",
            compiled.warnings.len()
        )));
    }
    Ok(())
}

fn run(input: &Path, option_args: &OptionArgs) -> CliResult<CompiledDocument> {
    let options = option_args.resolve()?;
    tracing::debug!(input = ?input, options = ?options, "compiling document");
    let content = read_file(input, "OpenAPI")?;
    let compiled = compile_yaml(&content, &options)?;
    for warning in &compiled.warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(compiled)
}

fn read_file(path: &Path, what: &str) -> CliResult<String> {
    if !path.exists() {
        return Err(CliError::General(format!("{} file not found: {:?}", what, path)));
    }
    Ok(fs::read_to_string(path)?)
}
