//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Error: {0}")]
    Infra(#[from] InfraError),

    /// A command failed part-way; `action` reads like "creating application".
    #[error("Error {action}: {source}")]
    Command {
        action: &'static str,
        #[source]
        source: InfraError,
    },
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl CliError {
    /// Wrap an error raised while performing `action`.
    pub fn command(action: &'static str, source: impl Into<InfraError>) -> Self {
        CliError::Command {
            action,
            source: source.into(),
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Infra(e) | CliError::Command { source: e, .. } => infra_exit_code(e),
        }
    }
}

fn infra_exit_code(e: &InfraError) -> i32 {
    match e {
        InfraError::HttpClient(_) => exitcode::SOFTWARE,
        InfraError::Application(app) => match app {
            ApplicationError::Config { .. } => exitcode::CONFIG,
            ApplicationError::Transport { .. } => exitcode::UNAVAILABLE,
            ApplicationError::Status { status, .. } if *status == 401 || *status == 403 => {
                exitcode::NOPERM
            }
            ApplicationError::Status { .. } => exitcode::UNAVAILABLE,
            ApplicationError::Decode { .. }
            | ApplicationError::Domain(DomainError::MissingField { .. })
            | ApplicationError::Domain(DomainError::NotAString { .. }) => exitcode::DATAERR,
            ApplicationError::Encode(_) => exitcode::SOFTWARE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::TransportError;

    fn status(code: u16) -> ApplicationError {
        ApplicationError::Status {
            status: code,
            url: "https://z.example.com/management/v1/projects".into(),
            body: "{}".into(),
        }
    }

    #[test]
    fn given_command_error_when_displayed_then_names_action() {
        let err = CliError::command("creating application", status(500));
        let shown = err.to_string();
        assert!(shown.starts_with("Error creating application: 500"), "{shown}");
    }

    #[test]
    fn given_errors_when_mapping_exit_codes_then_follow_sysexits() {
        assert_eq!(
            CliError::command("x", status(500)).exit_code(),
            exitcode::UNAVAILABLE
        );
        assert_eq!(CliError::command("x", status(401)).exit_code(), exitcode::NOPERM);
        assert_eq!(CliError::command("x", status(403)).exit_code(), exitcode::NOPERM);
        assert_eq!(
            CliError::command(
                "x",
                ApplicationError::Transport {
                    url: "u".into(),
                    source: TransportError::new("refused"),
                }
            )
            .exit_code(),
            exitcode::UNAVAILABLE
        );
        assert_eq!(
            CliError::command(
                "x",
                ApplicationError::Domain(DomainError::MissingField {
                    field: "clientId".into()
                })
            )
            .exit_code(),
            exitcode::DATAERR
        );
        assert_eq!(
            CliError::from(ApplicationError::config("ZITADEL_BASE_URL is not set")).exit_code(),
            exitcode::CONFIG
        );
    }
}
