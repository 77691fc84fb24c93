//! `simprov programs` — registered program listing.

use anyhow::Result;

use crate::settings::Settings;

/// Print every registered program with its executable and extensions.
pub fn run(settings: &Settings) -> Result<()> {
    if let Some(source) = &settings.source {
        println!("Configuration: {}", source.display());
        println!();
    }
    println!("Registered programs:");
    println!();
    for line in table(settings) {
        println!("{line}");
    }
    Ok(())
}

fn table(settings: &Settings) -> Vec<String> {
    let registry = &settings.registry;
    registry
        .registrations()
        .into_iter()
        .map(|reg| {
            let extensions = registry.extensions_of(&reg.name).join(" ");
            let mut line = format!(
                "  {:<12} {:<8} {:<12} {}",
                reg.name, reg.kind, reg.executable, extensions
            );
            if let Some(pinned) = registry.pinned(&reg.executable) {
                line.push_str(&format!("  (pinned: {})", pinned.display()));
            }
            line.trim_end().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use simprov_programs::Config;

    #[test]
    fn lists_builtins_with_pins() {
        let config = Config::parse("[executables]\nnest = \"/opt/nest/bin/nest\"\n").unwrap();
        let settings = Settings::from_config(&config, None);
        let lines = table(&settings);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("NEST") && lines[0].contains("(pinned: /opt/nest/bin/nest)"));
        assert!(lines[1].contains("NEURON") && lines[1].ends_with(".hoc .oc"));
        assert!(lines[2].contains("python") && lines[2].ends_with(".py"));
    }

    #[test]
    fn runs_without_config() {
        let settings = Settings::from_config(&Config::default(), None);
        run(&settings).unwrap();
    }
}
