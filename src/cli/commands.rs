//! Command dispatch: one function per subcommand

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::render::{render_text, OutputFormat, RenderOptions};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{ChartStats, Tier};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, run `orgchart --help`".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "orgchart", &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => cmd_config(cli, command),
        Commands::Tier { positions } => cmd_tier(&create_container(cli)?, positions),
        Commands::Tree { file } => cmd_tree(&create_container(cli)?, file.as_deref()),
        Commands::Render {
            file,
            format,
            output: out,
            standalone,
            no_avatars,
        } => {
            let container = create_container(cli)?;
            let (source, format, options) =
                render_request(&container, file.as_deref(), *format, *standalone, *no_avatars)?;
            let content = container
                .chart_service
                .render_source(&source, format, &options)?;
            match out {
                Some(path) => {
                    container.chart_service.write_output(path, &content)?;
                    output::action("Wrote", &path.display());
                }
                None => print_block(&content),
            }
            Ok(())
        }
        Commands::Stats { file } => cmd_stats(&create_container(cli)?, file.as_deref()),
    }
}

fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e).into()),
    }
}

fn create_container(cli: &Cli) -> CliResult<ServiceContainer> {
    let dir = project_dir(cli)?;
    let settings = Settings::load(Some(&dir))?;
    debug!(?settings, "loaded settings");
    Ok(ServiceContainer::new(settings)?)
}

/// Explicit file argument, else the configured `data_file`.
fn resolve_source(container: &ServiceContainer, file: Option<&Path>) -> CliResult<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| container.settings.data_file.clone())
        .ok_or_else(|| {
            CliError::InvalidArgs(
                "no leader file given and no data_file configured".to_string(),
            )
        })
}

/// Source, format and options for `render`; flags win over config.
fn render_request(
    container: &ServiceContainer,
    file: Option<&Path>,
    format: Option<OutputFormat>,
    standalone: bool,
    no_avatars: bool,
) -> CliResult<(PathBuf, OutputFormat, RenderOptions)> {
    let source = resolve_source(container, file)?;
    let format = format.unwrap_or(container.settings.render.format);
    let mut options = container.render_options();
    options.standalone = standalone;
    if no_avatars {
        options.show_avatars = false;
    }
    Ok((source, format, options))
}

fn print_block(content: &str) {
    if content.ends_with('\n') {
        print!("{content}");
    } else {
        println!("{content}");
    }
}

#[instrument(skip(container))]
fn cmd_tier(container: &ServiceContainer, positions: &[String]) -> CliResult<()> {
    let rules = container.chart_service.rules();
    for position in positions {
        let tier = rules.classify(Some(position.as_str()));
        output::info(&format!("{}\t{:<8}\t{}", tier, tier.label(), position));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let source = resolve_source(container, file)?;
    let chart = container.chart_service.load_chart(&source)?;
    print_block(&render_text(&chart, &container.render_options()));

    let stats = ChartStats::from_chart(&chart);
    if stats.promoted > 0 {
        output::warning(&format!(
            "{} leader(s) had no matching parent and were shown as roots",
            stats.promoted
        ));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_stats(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let source = resolve_source(container, file)?;
    let stats = container.chart_service.stats(&source)?;

    output::header("Chart statistics");
    output::field("leaders", &stats.total);
    for tier in Tier::ALL {
        output::field(&format!("tier {} ({})", tier, tier.label()), &stats.count(tier));
    }
    output::field("roots", &stats.roots);
    output::field("promoted roots", &stats.promoted);
    output::field("depth", &stats.depth);
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(&project_dir(cli)?))?;
            print_block(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            let local = local_config_path(&project_dir(cli)?);
            match global_config_path() {
                Some(global) => output::field("global", &describe_path(&global)),
                None => output::field("global", "(no config directory on this platform)"),
            }
            output::field("local", &describe_path(&local));
            Ok(())
        }
        ConfigCommands::Init { global, force } => {
            let target = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("no global config directory on this platform".to_string())
                })?
            } else {
                local_config_path(&project_dir(cli)?)
            };
            if target.exists() && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    target.display()
                )));
            }
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            std::fs::write(&target, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", target.display()), e))?;
            output::action("Created", &target.display());
            Ok(())
        }
    }
}

fn describe_path(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found)", path.display())
    }
}
