//! Glue for the GitHub Actions invocation environment: named inputs arrive
//! as `INPUT_*` environment variables, step outputs are appended to the file
//! named by `GITHUB_OUTPUT`, and workflow commands are printed to stdout.

use std::{
    collections::HashMap,
    env,
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

/// Delimiter for multiline values in the output file.
const OUTPUT_DELIMITER: &str = "ghadelimiter";

/// Snapshot of the Actions environment, taken once at startup.
pub struct ActionEnv {
    inputs: HashMap<String, String>,
    output_path: Option<PathBuf>,
}

impl ActionEnv {
    pub fn from_env() -> Self {
        let inputs = env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix("INPUT_").map(|name| (name.to_string(), value))
            })
            .collect();
        let output_path = env::var_os("GITHUB_OUTPUT").map(PathBuf::from);
        Self { inputs, output_path }
    }

    /// Look up a named input. The runner exports inputs uppercased with
    /// spaces replaced by underscores; a present-but-blank input counts as
    /// absent.
    pub fn input(&self, name: &str) -> Option<&str> {
        let key = name.to_uppercase().replace(' ', "_");
        self.inputs.get(&key).map(|value| value.trim()).filter(|value| !value.is_empty())
    }

    /// Append a named output to the step output file. Outside a workflow
    /// (no `GITHUB_OUTPUT`), the output is printed instead so the tool stays
    /// usable from a shell.
    pub fn set_output(&self, name: &str, value: &str) -> std::io::Result<()> {
        let Some(path) = &self.output_path else {
            tracing::warn!("GITHUB_OUTPUT is not set, printing output");
            println!("{name}={value}");
            return Ok(());
        };
        append_output(path, name, value)
    }
}

fn append_output(path: &Path, name: &str, value: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if value.contains('\n') {
        writeln!(file, "{name}<<{OUTPUT_DELIMITER}\n{value}\n{OUTPUT_DELIMITER}")
    } else {
        writeln!(file, "{name}={value}")
    }
}

/// Ask the runner to redact a value from everything it logs.
pub fn add_mask(value: &str) {
    if !value.is_empty() {
        println!("::add-mask::{value}");
    }
}

/// Surface a fatal error as a workflow annotation.
pub fn error(message: &str) {
    println!("::error::{message}");
}
