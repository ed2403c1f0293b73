use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notifyd::{state::build_service, Config, NotificationService};
use notifyd_core::notification::{
    CreateNotificationRequest, NotificationId, UpdateNotificationRequest,
};
use notifyd_core::service::{service_error_to_status_code, ServiceError};

/// notifyd - Create, read, update and delete notification records
#[derive(Parser, Debug)]
#[command(name = "notifyd")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Tracing filter directives (e.g. "notifyd=debug")
    #[arg(long, env = "RUST_LOG", default_value = "notifyd=info,notifyd_core=info")]
    log_filter: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Pretty)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Indented JSON
    Pretty,
    /// Single-line JSON
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a notification
    Create {
        /// Delivery channel: email or sms
        #[arg(long = "type")]
        kind: String,
        #[arg(long)]
        recipient: String,
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Show one notification
    Get { id: NotificationId },
    /// List the most recently created notifications
    Recent,
    /// Change the subject and content of a notification
    Update {
        id: NotificationId,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        content: String,
    },
    /// Delete a notification
    Delete { id: NotificationId },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only command output.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&cli.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    let service = build_service(&config).await?;

    let outcome = run(&service, cli.command, cli.format).await;

    // Publish whatever the command enqueued before exiting.
    service.shutdown().await;

    if let Err(err) = &outcome {
        match err.downcast_ref::<ServiceError>() {
            Some(service_err) => tracing::error!(
                status = service_error_to_status_code(service_err),
                error = %service_err,
                "Command failed"
            ),
            None => tracing::error!(error = %err, "Command failed"),
        }
    }

    outcome
}

async fn run(
    service: &NotificationService,
    command: Command,
    format: Format,
) -> Result<()> {
    match command {
        Command::Create {
            kind,
            recipient,
            subject,
            content,
        } => {
            let request = CreateNotificationRequest::new(kind, recipient, subject, content);
            print(&service.create(&request).await?, format)
        }
        Command::Get { id } => print(&service.get_by_id(id).await?, format),
        Command::Recent => print(&service.get_recent().await, format),
        Command::Update {
            id,
            subject,
            content,
        } => {
            let request = UpdateNotificationRequest::new(subject, content);
            print(&service.update(id, &request).await?, format)
        }
        Command::Delete { id } => {
            service.delete(id).await?;
            print(&serde_json::json!({ "deleted": id }), format)
        }
    }
}

fn print<T: Serialize>(value: &T, format: Format) -> Result<()> {
    let rendered = match format {
        Format::Pretty => serde_json::to_string_pretty(value)?,
        Format::Json => serde_json::to_string(value)?,
    };

    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "notifyd",
            "create",
            "--type",
            "sms",
            "--recipient",
            "+15550100",
            "--subject",
            "Code",
        ])
        .unwrap();

        assert_eq!(cli.format, Format::Pretty);
        match cli.command {
            Command::Create {
                kind,
                recipient,
                subject,
                content,
            } => {
                assert_eq!(kind, "sms");
                assert_eq!(recipient, "+15550100");
                assert_eq!(subject, "Code");
                assert_eq!(content, "");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["notifyd", "get", "abc"]).is_err());
    }

    #[test]
    fn test_parse_global_format() {
        let cli = Cli::try_parse_from(["notifyd", "--format", "json", "delete", "7"]).unwrap();

        assert_eq!(cli.format, Format::Json);
        assert!(matches!(cli.command, Command::Delete { id } if id == NotificationId::new(7)));
    }
}
