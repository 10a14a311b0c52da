//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::DEFAULT_APP_TYPE;

/// CLI tool for Zitadel automation: applications, projects and service users
#[derive(Parser, Debug)]
#[command(name = "zitadel-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file (default: $XDG_CONFIG_HOME/zitadel-cli/zitadel-cli.toml)
    #[arg(long = "config", global = true, env = "ZITADEL_CONFIG", value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    /// Dotenv file (default: ./.env if present)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub env_file: Option<PathBuf>,

    /// Management API base URL (overrides ZITADEL_BASE_URL)
    #[arg(long, global = true, value_hint = ValueHint::Url)]
    pub base_url: Option<String>,

    /// Admin bearer token (overrides ZITADEL_ADMIN_TOKEN)
    #[arg(long, global = true, hide = true)]
    pub admin_token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new application in Zitadel
    CreateApp {
        /// Application name
        #[arg(long)]
        name: String,
        /// Application type
        #[arg(long, default_value = DEFAULT_APP_TYPE)]
        app_type: String,
    },

    /// Create a service user with specified roles
    CreateServiceUser {
        /// Service user username
        #[arg(long)]
        username: String,
        /// Comma-separated list of roles
        #[arg(long)]
        roles: String,
    },

    /// Create a new project and web application with PKCE authentication
    SetupWebProject {
        /// Project name
        #[arg(long)]
        project_name: String,
        /// Application name
        #[arg(long)]
        app_name: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings (token masked)
    Show,
    /// Show global config file location
    Path,
    /// Print a commented config template
    Template,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_create_app_without_type_when_parsing_then_defaults_to_api() {
        let cli = Cli::try_parse_from(["zitadel-cli", "create-app", "--name", "billing"]).unwrap();
        match cli.command {
            Commands::CreateApp { name, app_type } => {
                assert_eq!(name, "billing");
                assert_eq!(app_type, "APPLICATION_TYPE_API");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_setup_web_project_when_parsing_then_reads_kebab_case_options() {
        let cli = Cli::try_parse_from([
            "zitadel-cli",
            "setup-web-project",
            "--project-name",
            "shop",
            "--app-name",
            "shop-web",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::SetupWebProject {
                project_name,
                app_name,
            } => {
                assert_eq!(project_name, "shop");
                assert_eq!(app_name, "shop-web");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_service_user_without_roles_when_parsing_then_fails() {
        let result = Cli::try_parse_from(["zitadel-cli", "create-service-user", "--username", "bot"]);
        assert!(result.is_err());
    }
}
