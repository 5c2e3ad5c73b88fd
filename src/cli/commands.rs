//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::{MenuOptions, Strategy};
use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::MenuMode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            print_completions(*shell);
            Ok(())
        }
        Some(Commands::Config { command }) => config_command(cli, command),
        Some(Commands::Build {
            file,
            root,
            mode,
            strategy,
            format,
            sort,
            strict,
            max_depth,
            output,
        }) => {
            let container = ServiceContainer::new(load_settings(cli)?);
            let overrides = BuildOverrides {
                root: *root,
                mode: *mode,
                strategy: *strategy,
                sort: *sort,
                strict: *strict,
                max_depth: *max_depth,
            };
            build(
                &container,
                file.as_deref(),
                &overrides,
                *format,
                output.as_deref(),
            )
        }
        Some(Commands::Validate { file, root }) => {
            let container = ServiceContainer::new(load_settings(cli)?);
            validate(&container, file.as_deref(), *root)
        }
        None => Err(CliError::Usage(
            "no command given, see `menutree --help`".to_string(),
        )),
    }
}

/// Command-line values that take precedence over settings.
#[derive(Debug, Default)]
struct BuildOverrides {
    root: Option<i64>,
    mode: Option<MenuMode>,
    strategy: Option<Strategy>,
    sort: bool,
    strict: bool,
    max_depth: Option<usize>,
}

impl BuildOverrides {
    fn apply(&self, mut options: MenuOptions) -> MenuOptions {
        if let Some(root) = self.root {
            options.root_id = root;
        }
        if let Some(mode) = self.mode {
            options.mode = mode;
        }
        if let Some(strategy) = self.strategy {
            options.strategy = strategy;
        }
        if let Some(max_depth) = self.max_depth {
            options.max_depth = max_depth;
        }
        options.sort |= self.sort;
        options.strict |= self.strict;
        options
    }
}

fn local_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("determine working directory", e))),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = local_dir(cli)?;
    let settings = Settings::load(Some(&dir))?;
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn resolve_input(file: Option<&Path>, settings: &Settings) -> CliResult<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| settings.input.clone())
        .ok_or_else(|| {
            CliError::Usage("no records file given and no `input` configured".to_string())
        })
}

#[instrument(skip(container, overrides))]
fn build(
    container: &ServiceContainer,
    file: Option<&Path>,
    overrides: &BuildOverrides,
    format: OutputFormat,
    output_path: Option<&Path>,
) -> CliResult<()> {
    let path = resolve_input(file, &container.settings)?;
    let records = container.menu.load_records(&path)?;
    let options = overrides.apply(MenuOptions::from_settings(&container.settings));
    debug!("build: options={:?}", options);

    let result = container.menu.build(records, &options)?;
    if result.node_count < result.record_count {
        output::warning(&format!(
            "{} of {} records not reachable from root {}",
            result.record_count - result.node_count,
            result.record_count,
            options.root_id
        ));
    }

    let rendered = match format {
        OutputFormat::Json => container.menu.render_json(&result.nodes)?,
        OutputFormat::Tree => container
            .menu
            .render_tree(&path.display().to_string(), &result.nodes),
    };

    match output_path {
        Some(target) => {
            container
                .fs
                .write(target, &rendered)
                .map_err(|e| InfraError::io(format!("write {}", target.display()), e))?;
            output::success(&format!(
                "wrote {} nodes to {}",
                result.node_count,
                target.display()
            ));
        }
        None => output::info(&rendered),
    }
    Ok(())
}

#[instrument(skip(container))]
fn validate(container: &ServiceContainer, file: Option<&Path>, root: Option<i64>) -> CliResult<()> {
    let path = resolve_input(file, &container.settings)?;
    let records = container.menu.load_records(&path)?;
    let root = root.unwrap_or(container.settings.root_id);
    container.menu.validate(&records, root)?;
    output::success(&format!(
        "{}: {} records well-formed",
        path.display(),
        records.len()
    ));
    Ok(())
}

fn config_command(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            output::header("Config locations");
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail("global: <no config directory>"),
            }
            let dir = local_dir(cli)?;
            output::detail(&format!("local:  {}", local_config_path(&dir).display()));
        }
    }
    Ok(())
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_overrides_when_applying_then_cli_values_win() {
        let options = MenuOptions::from_settings(&Settings::default());
        let overrides = BuildOverrides {
            root: Some(7),
            mode: Some(MenuMode::Extended),
            strategy: Some(Strategy::Scan),
            sort: true,
            strict: false,
            max_depth: Some(64),
        };

        let applied = overrides.apply(options);

        assert_eq!(applied.root_id, 7);
        assert_eq!(applied.mode, MenuMode::Extended);
        assert_eq!(applied.strategy, Strategy::Scan);
        assert!(applied.sort);
        assert!(!applied.strict);
        assert_eq!(applied.max_depth, 64);
    }

    #[test]
    fn given_no_file_and_no_config_input_when_resolving_then_usage_error() {
        let result = resolve_input(None, &Settings::default());
        assert!(matches!(result, Err(CliError::Usage(_))));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
