//! Tests for command handlers: request sequencing and console output

use std::sync::Arc;

use zitadel_cli::cli::args::Commands;
use zitadel_cli::cli::commands::execute_command;
use zitadel_cli::cli::{CliResult, Console};
use zitadel_cli::config::Settings;
use zitadel_cli::exitcode;
use zitadel_cli::infrastructure::di::ServiceContainer;
use zitadel_cli::util::testing::{init_test_setup, ScriptedTransport};

const BASE: &str = "https://z.example.com";

struct Outcome {
    result: CliResult<()>,
    out: String,
    err: String,
}

fn settings() -> Settings {
    Settings {
        base_url: Some(BASE.to_string()),
        admin_token: Some("admin-tok".to_string()),
    }
}

fn execute(command: Commands, transport: &Arc<ScriptedTransport>) -> Outcome {
    init_test_setup();
    let transport: Arc<ScriptedTransport> = Arc::clone(transport);
    let container = ServiceContainer::with_deps(settings(), transport).expect("container");
    let mut console = Console::new(Vec::new(), Vec::new());

    let result = execute_command(&command, &container, &mut console);
    if let Err(e) = &result {
        // mirror the binary: errors are reported on stderr
        console.error(e);
    }

    let (out, err) = console.into_inner();
    Outcome {
        result,
        out: String::from_utf8(out).unwrap(),
        err: String::from_utf8(err).unwrap(),
    }
}

fn create_app(name: &str) -> Commands {
    Commands::CreateApp {
        name: name.to_string(),
        app_type: "APPLICATION_TYPE_API".to_string(),
    }
}

fn create_service_user(username: &str, roles: &str) -> Commands {
    Commands::CreateServiceUser {
        username: username.to_string(),
        roles: roles.to_string(),
    }
}

fn setup_web_project(project_name: &str, app_name: &str) -> Commands {
    Commands::SetupWebProject {
        project_name: project_name.to_string(),
        app_name: app_name.to_string(),
    }
}

// ============================================================
// create-app
// ============================================================

#[test]
fn given_successful_response_when_create_app_then_prints_client_id() {
    let transport = Arc::new(ScriptedTransport::new().reply(200, r#"{"clientId":"c1"}"#));

    let outcome = execute(create_app("billing"), &transport);

    assert!(outcome.result.is_ok());
    assert!(outcome.out.contains("Application created successfully!"));
    assert!(outcome.out.contains("Client ID: c1\n"));
    assert!(outcome.err.is_empty());
    assert_eq!(
        transport.urls(),
        vec![format!("{BASE}/management/v1/projects/me/apps")]
    );
}

#[test]
fn given_error_status_when_create_app_then_reports_on_stderr_only() {
    let transport = Arc::new(ScriptedTransport::new().reply(500, "internal"));

    let outcome = execute(create_app("billing"), &transport);

    let err = outcome.result.unwrap_err();
    assert_eq!(err.exit_code(), exitcode::UNAVAILABLE);
    assert!(outcome.err.contains("Error creating application: 500"));
    assert!(!outcome.out.contains("Application created successfully!"));
    assert!(!outcome.out.contains("Client ID"));
}

#[test]
fn given_unreachable_server_when_create_app_then_reports_transport_error() {
    let transport = Arc::new(ScriptedTransport::new().fail("dns error: no such host"));

    let outcome = execute(create_app("billing"), &transport);

    assert!(outcome.result.is_err());
    assert!(outcome.err.contains("Error creating application"));
    assert!(outcome.err.contains("no such host"));
    assert!(outcome.out.is_empty());
}

#[test]
fn given_response_without_client_id_when_create_app_then_reports_missing_field() {
    let transport = Arc::new(ScriptedTransport::new().reply(200, r#"{"appId":"a1"}"#));

    let outcome = execute(create_app("billing"), &transport);

    let err = outcome.result.unwrap_err();
    assert_eq!(err.exit_code(), exitcode::DATAERR);
    assert!(outcome.err.contains("missing field 'clientId'"));
    assert!(!outcome.out.contains("Application created successfully!"));
}

// ============================================================
// create-service-user
// ============================================================

#[test]
fn given_successful_responses_when_create_service_user_then_prints_user_id_and_token() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .reply(200, r#"{"userId":"u1"}"#)
            .reply(200, "{}")
            .reply(200, "{}")
            .reply(200, "{}")
            .reply(200, r#"{"token":"t1"}"#),
    );

    let outcome = execute(create_service_user("ci-bot", "a, b ,c"), &transport);

    assert!(outcome.result.is_ok());
    assert!(outcome.out.contains("Service user created successfully!"));
    assert!(outcome.out.contains("User ID: u1\n"));
    assert!(outcome.out.contains("Token: t1\n"));

    // user, three roles in input order, then the token
    let requests = transport.requests();
    assert_eq!(
        transport.urls(),
        vec![
            format!("{BASE}/management/v1/users/machine"),
            format!("{BASE}/management/v1/users/u1/roles"),
            format!("{BASE}/management/v1/users/u1/roles"),
            format!("{BASE}/management/v1/users/u1/roles"),
            format!("{BASE}/management/v1/users/u1/token"),
        ]
    );
    let roles: Vec<_> = requests[1..4]
        .iter()
        .map(|r| r.body.clone().unwrap()["roleKey"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(roles, vec!["a", "b", "c"]);
}

#[test]
fn given_failing_role_when_create_service_user_then_skips_later_roles_and_token() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .reply(200, r#"{"userId":"u1"}"#)
            .reply(400, r#"{"message":"invalid role"}"#),
    );

    let outcome = execute(create_service_user("ci-bot", "bad,good"), &transport);

    assert!(outcome.result.is_err());
    assert!(outcome.err.contains("Error creating service user: 400"));
    assert!(!outcome.out.contains("Service user created successfully!"));
    assert_eq!(transport.requests().len(), 2);
}

#[test]
fn given_failing_token_request_when_create_service_user_then_reports_error() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .reply(200, r#"{"userId":"u1"}"#)
            .reply(200, "{}")
            .reply(401, "unauthorized"),
    );

    let outcome = execute(create_service_user("ci-bot", "reader"), &transport);

    let err = outcome.result.unwrap_err();
    assert_eq!(err.exit_code(), exitcode::NOPERM);
    assert!(outcome.err.contains("Error creating service user"));
    assert!(!outcome.out.contains("User ID"));
}

// ============================================================
// setup-web-project
// ============================================================

#[test]
fn given_successful_responses_when_setup_web_project_then_creates_project_before_app() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .reply(200, r#"{"id":"p42"}"#)
            .reply(200, r#"{"appId":"a1","clientId":"web-c1"}"#),
    );

    let outcome = execute(setup_web_project("shop", "shop-web"), &transport);

    assert!(outcome.result.is_ok());
    assert_eq!(
        outcome.out.lines().filter(|l| !l.trim().is_empty()).count(),
        4
    );
    let project_pos = outcome.out.find("Project ID: p42").unwrap();
    let app_pos = outcome.out.find("Client ID: web-c1").unwrap();
    assert!(project_pos < app_pos);
    assert!(outcome.out.contains("Project created successfully!"));
    assert!(outcome.out.contains("Web application created successfully!"));
    assert_eq!(
        transport.urls(),
        vec![
            format!("{BASE}/management/v1/projects"),
            format!("{BASE}/management/v1/projects/p42/apps/oidc"),
        ]
    );
}

#[test]
fn given_failing_app_creation_when_setup_web_project_then_keeps_project_output() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .reply(200, r#"{"id":"p42"}"#)
            .reply(409, r#"{"message":"already exists"}"#),
    );

    let outcome = execute(setup_web_project("shop", "shop-web"), &transport);

    assert!(outcome.result.is_err());
    assert!(outcome.out.contains("Project ID: p42"));
    assert!(!outcome.out.contains("Web application created successfully!"));
    assert!(outcome.err.contains("Error setting up project: 409"));
    // no cleanup request for the orphaned project
    assert_eq!(transport.requests().len(), 2);
}

#[test]
fn given_failing_project_creation_when_setup_web_project_then_never_creates_app() {
    let transport = Arc::new(ScriptedTransport::new().reply(500, "boom"));

    let outcome = execute(setup_web_project("shop", "shop-web"), &transport);

    assert!(outcome.result.is_err());
    assert!(!outcome.out.contains("Project created successfully!"));
    assert_eq!(transport.requests().len(), 1);
}

#[test]
fn given_missing_credentials_when_building_container_then_fails_with_config_error() {
    let transport: Arc<ScriptedTransport> = Arc::new(ScriptedTransport::new());
    let result = ServiceContainer::with_deps(Settings::default(), transport);

    let err = zitadel_cli::cli::CliError::from(result.err().expect("config error"));
    assert_eq!(err.exit_code(), exitcode::CONFIG);
    assert!(err.to_string().contains("ZITADEL_BASE_URL"));
}
