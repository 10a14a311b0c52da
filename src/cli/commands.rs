//! Command dispatch
//!
//! Each API command is a short sequence of management service calls whose
//! results are reported on the console as they arrive. A failure stops the
//! sequence; steps that already succeeded are neither undone nor hidden.

use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::application::services::ManagementService;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output::Console;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, LoadOptions, Settings};
use crate::domain::{parse_roles, required_str};
use crate::infrastructure::di::ServiceContainer;

/// Load settings for `cli` and run its command.
///
/// `completion` is handled by the binary, since it needs the clap `Command`.
pub fn run<O: Write, E: Write>(cli: &Cli, console: &mut Console<O, E>) -> CliResult<()> {
    match &cli.command {
        Commands::Completion { .. } => Ok(()),
        Commands::Config { command } => execute_config(command, &load_settings(cli)?, console),
        command => {
            let container = ServiceContainer::new(load_settings(cli)?)?;
            execute_command(command, &container, console)
        }
    }
}

/// Settings from all configuration layers, with command line overrides applied.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let options = LoadOptions {
        config_path: cli.config_file.clone(),
        env_file: cli.env_file.clone(),
    };
    let settings = Settings::load(&options)?
        .with_overrides(cli.base_url.clone(), cli.admin_token.clone());
    debug!("settings: {:?}", settings);
    Ok(settings)
}

/// Run an API command against the services in `container`.
pub fn execute_command<O: Write, E: Write>(
    command: &Commands,
    container: &ServiceContainer,
    console: &mut Console<O, E>,
) -> CliResult<()> {
    let service = container.management();
    match command {
        Commands::CreateApp { name, app_type } => create_app(&service, name, app_type, console),
        Commands::CreateServiceUser { username, roles } => {
            create_service_user(&service, username, roles, console)
        }
        Commands::SetupWebProject {
            project_name,
            app_name,
        } => setup_web_project(&service, project_name, app_name, console),
        Commands::Config { command } => execute_config(command, &container.settings, console),
        Commands::Completion { .. } => Ok(()),
    }
}

#[instrument(skip(service, console))]
fn create_app<O: Write, E: Write>(
    service: &ManagementService,
    name: &str,
    app_type: &str,
    console: &mut Console<O, E>,
) -> CliResult<()> {
    let fail = |e: ApplicationError| CliError::command("creating application", e);

    let app = service.create_application(name, app_type).map_err(fail)?;
    let client_id = required_str(&app, "clientId").map_err(|e| fail(e.into()))?;

    console.success("Application created successfully!");
    console.field("Client ID", &client_id);
    Ok(())
}

#[instrument(skip(service, console))]
fn create_service_user<O: Write, E: Write>(
    service: &ManagementService,
    username: &str,
    roles: &str,
    console: &mut Console<O, E>,
) -> CliResult<()> {
    let fail = |e: ApplicationError| CliError::command("creating service user", e);

    let roles = parse_roles(roles);
    debug!("roles: {:?}", roles);

    let user = service.create_service_user(username, &roles).map_err(fail)?;
    let user_id = required_str(&user, "userId").map_err(|e| fail(e.into()))?;
    let token = service.get_service_user_token(&user_id).map_err(fail)?;

    console.success("Service user created successfully!");
    console.field("User ID", &user_id);
    console.field("Token", &token);
    Ok(())
}

#[instrument(skip(service, console))]
fn setup_web_project<O: Write, E: Write>(
    service: &ManagementService,
    project_name: &str,
    app_name: &str,
    console: &mut Console<O, E>,
) -> CliResult<()> {
    let fail = |e: ApplicationError| CliError::command("setting up project", e);

    let project = service.create_project(project_name).map_err(fail)?;
    let project_id = required_str(&project, "id").map_err(|e| fail(e.into()))?;
    console.success("Project created successfully!");
    console.field("Project ID", &project_id);

    // a project created above stays in place if this step fails
    let app = service
        .create_web_application(&project_id, app_name)
        .map_err(fail)?;
    let client_id = required_str(&app, "clientId").map_err(|e| fail(e.into()))?;
    console.success("Web application created successfully!");
    console.field("Client ID", &client_id);
    Ok(())
}

fn execute_config<O: Write, E: Write>(
    command: &ConfigCommands,
    settings: &Settings,
    console: &mut Console<O, E>,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let shown = settings.redacted().to_toml()?;
            if shown.trim().is_empty() {
                console.info("# no settings found");
            } else {
                console.info(shown.trim_end());
            }
        }
        ConfigCommands::Path => {
            let path = config_file_location(global_config_path())?;
            console.info(&path.display());
        }
        ConfigCommands::Template => console.info(&Settings::template()),
    }
    Ok(())
}

fn config_file_location(path: Option<PathBuf>) -> CliResult<PathBuf> {
    path.ok_or_else(|| ApplicationError::config("cannot determine config directory").into())
}
