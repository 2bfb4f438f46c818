//! Log message decoration command — `infra-widgets decorate`.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use infra_widgets::decorator::MessageDecorator;
use infra_widgets::widgets_config::WidgetsConfig;

pub fn cmd_decorate(project_dir: &std::path::Path, message: Option<&str>) -> Result<()> {
    let config = WidgetsConfig::new(project_dir.to_path_buf())?;
    let decorator = MessageDecorator::new(config.link_targets());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match message {
        Some(message) => writeln!(out, "{}", decorator.decorate(message))?,
        None => {
            // One log entry per line
            for line in std::io::stdin().lock().lines() {
                let line = line.context("Failed to read message from stdin")?;
                writeln!(out, "{}", decorator.decorate(&line))?;
            }
        }
    }

    Ok(())
}
