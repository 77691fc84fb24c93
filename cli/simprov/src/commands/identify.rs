//! `simprov identify` — which program is this?

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::Serialize;
use simprov_programs::{Executable, ExecutableRecord, ProgramKind};

use crate::settings::Settings;

/// What the user asked to identify.
pub enum Query {
    /// An executable path or a script file (exactly one).
    Resolve {
        path: Option<PathBuf>,
        script: Option<PathBuf>,
    },
    /// A registered program name.
    Name(String),
}

#[derive(Serialize)]
struct Report {
    kind: ProgramKind,
    #[serde(flatten)]
    record: ExecutableRecord,
    diagnostics: Vec<String>,
}

/// Identify the program and print it in the requested format.
pub fn run(settings: &Settings, query: Query, format: &str) -> Result<()> {
    let executable = match query {
        Query::Resolve { path, script } => settings.registry.resolve(
            path.as_deref(),
            script.as_deref(),
            &settings.probe,
        )?,
        Query::Name(name) => settings.registry.resolve_name(&name, &settings.probe)?,
    };
    println!("{}", render(&executable, format)?);
    Ok(())
}

/// Render an identified executable as `text` or `json`.
pub fn render(executable: &Executable, format: &str) -> Result<String> {
    match format {
        "text" => {
            let mut out = executable.to_string();
            for diagnostic in executable.diagnostics() {
                out.push_str(&format!("\n  note: {diagnostic}"));
            }
            Ok(out)
        }
        "json" => {
            let report = Report {
                kind: executable.kind(),
                record: executable.record(),
                diagnostics: executable
                    .diagnostics()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        other => bail!("unknown format: '{other}' (expected text or json)"),
    }
}
