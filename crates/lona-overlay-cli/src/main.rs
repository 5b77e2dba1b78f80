// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Load a Lonala namespace with override roots applied.
//!
//! Prints the namespace's visible symbols, marking those provided by an
//! override. With `--eval`, evaluates an expression in the namespace
//! instead; with `--chain`, also prints the override chain.

mod config;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod main_test;

use anyhow::Context as _;
use clap::{ArgAction, Parser};
use config::Config;
use lona_overlay::namespace::is_reserved;
use lona_overlay::{NamespaceRegistry, Runtime};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lona-overlay", version)]
#[command(about = "Load a Lonala namespace with override roots applied")]
struct Cli {
    /// Fully-qualified namespace to load
    namespace: String,

    /// Library directory (repeatable)
    #[arg(short = 'L', long = "lib", env = "LONA_PATH", value_delimiter = ':')]
    lib: Vec<PathBuf>,

    /// Override root, later roots win (repeatable)
    #[arg(
        short = 'O',
        long = "overlay",
        env = "LONA_OVERLAY_PATH",
        value_delimiter = ':'
    )]
    overlay: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Expression to evaluate in the namespace
    #[arg(short, long)]
    eval: Option<String>,

    /// Print the override chain
    #[arg(long)]
    chain: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Merge the configuration file with command-line paths. File entries
    /// come first.
    fn settings(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        config.lib_paths.extend(self.lib.iter().cloned());
        config.overlay_roots.extend(self.overlay.iter().cloned());
        Ok(config)
    }
}

fn log_filter(verbose: u8, configured: Option<&str>) -> EnvFilter {
    let fallback = match (verbose, configured) {
        (0, Some(directive)) => directive.to_owned(),
        (0, None) => "warn".to_owned(),
        (1, _) => "info".to_owned(),
        (2, _) => "debug".to_owned(),
        _ => "trace".to_owned(),
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

fn run(cli: &Cli, config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    let rt = Runtime::new(config.lib_paths.clone());
    let registry = NamespaceRegistry::new();
    for root in &config.overlay_roots {
        registry.register_root(root);
    }
    registry.install(&rt);
    tracing::info!(
        lib_paths = ?config.lib_paths,
        roots = ?registry.roots(),
        "loading {}",
        cli.namespace
    );

    let ns = rt
        .require(&cli.namespace)
        .with_context(|| format!("failed to load {}", cli.namespace))?;

    if let Some(expr) = &cli.eval {
        let value = rt
            .eval_in(&ns, expr)
            .with_context(|| format!("failed to evaluate {expr}"))?;
        writeln!(out, "{value}")?;
    } else {
        for (name, value) in ns.symbols() {
            if is_reserved(&name) {
                continue;
            }
            match ns.overridden_by(&name) {
                Some(source) => writeln!(out, "{name} = {value}  ; {}", source.display())?,
                None => writeln!(out, "{name} = {value}")?,
            }
        }
    }

    if cli.chain {
        match registry.namespace(&cli.namespace) {
            Some(registered) => {
                for (index, layer) in registered.chain().iter().enumerate() {
                    let role = if layer.is_base() { "base" } else { "override" };
                    writeln!(
                        out,
                        "{index}: {role} {} ({} symbols)",
                        layer.source().display(),
                        layer.symbols().len()
                    )?;
                }
            }
            None => writeln!(out, "{} has no override roots", cli.namespace)?,
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.settings()?;
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, config.log.as_deref()))
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli, &config, &mut out)
}
