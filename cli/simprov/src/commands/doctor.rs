//! `simprov doctor` — discovery diagnostics for every registered program.

use anyhow::Result;
use simprov_programs::SystemProbe;

use crate::settings::Settings;

/// Print discovery status for each registered program.
pub fn run(settings: &Settings) -> Result<()> {
    println!("=== simprov doctor ===");
    println!();
    println!("simprov version: {}", env!("CARGO_PKG_VERSION"));
    match &settings.source {
        Some(path) => println!("Configuration:   {}", path.display()),
        None => println!("Configuration:   (none)"),
    }
    println!();

    println!("--- Search Path ---");
    for dir in settings.probe.search_path() {
        println!("  {}", dir.display());
    }
    println!();

    println!("--- Programs ---");
    for line in status_lines(settings) {
        println!("{line}");
    }
    Ok(())
}

fn status_lines(settings: &Settings) -> Vec<String> {
    let mut lines = Vec::new();
    for reg in settings.registry.registrations() {
        match settings.registry.resolve_name(&reg.name, &settings.probe) {
            Ok(exe) => {
                lines.push(format!(
                    "  {}: {} at {}",
                    reg.name,
                    exe.version().unwrap_or("unknown version"),
                    exe.path().display()
                ));
                for diagnostic in exe.diagnostics() {
                    lines.push(format!("    note: {diagnostic}"));
                }
            }
            Err(e) if e.is_not_found() => lines.push(format!("  {}: not found", reg.name)),
            Err(e) => lines.push(format!("  {}: error: {e}", reg.name)),
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use simprov_programs::Config;

    #[test]
    fn reports_missing_programs() {
        let config = Config {
            search_path: Some(Vec::new()),
            ..Config::default()
        };
        let settings = Settings::from_config(&config, None);
        let lines = status_lines(&settings);
        assert_eq!(
            lines,
            vec!["  NEST: not found", "  NEURON: not found", "  Python: not found"]
        );
        run(&settings).unwrap();
    }
}
