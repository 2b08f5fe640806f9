use clap::{crate_authors, crate_description, crate_version, value_parser, Arg, ArgAction, Command};
use pretty_env_logger::env_logger::Builder;
use std::env;
use std::io::Write;
use std::process::exit;

use crate::common::{DesiredState, Outcome, Params, Report};
use crate::service::DomainReconciler;
use crate::Config;

fn set_logger_level(b: &mut Builder) {
    let mut b = b;
    if env::var("RUST_LOG").is_err() {
        b = b.filter_level(log::LevelFilter::Info)
    }
    b.init();
}

fn setup_logger() {
    // Adapted from env_logger examples. <3 Systemd support
    match std::env::var("RUST_LOG_STYLE") {
        Ok(s) if s == "SYSTEMD" => {
            let builder = &mut pretty_env_logger::env_logger::builder();
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "<{}>{}: {}",
                    match record.level() {
                        log::Level::Error => 3,
                        log::Level::Warn => 4,
                        log::Level::Info => 6,
                        log::Level::Debug => 7,
                        log::Level::Trace => 7,
                    },
                    record.target(),
                    record.args()
                )
            });
            set_logger_level(builder);
        }
        _ => {
            let builder = &mut pretty_env_logger::formatted_builder();
            set_logger_level(builder);
        }
    };
}

fn command() -> Command {
    Command::new("dodomain")
        .about(format!(
            "{}\n{} {}",
            crate_description!(),
            "The API token may also be set with DO_API_TOKEN or DO_API_KEY.",
            "Prefix the token with '@' to read it from a file.",
        ))
        .arg(
            Arg::new("state")
                .long("state")
                .value_parser(["present", "absent"])
                .default_value("present")
                .help("Desired state of the domain"),
        )
        .arg(
            Arg::new("id")
                .long("id")
                .alias("droplet-id")
                .value_parser(value_parser!(u64))
                .help("Numeric id of the domain"),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .help("Domain name, formatted by hostname rules"),
        )
        .arg(
            Arg::new("ip")
                .long("ip")
                .help("IP address the root A record should point at"),
        )
        .arg(
            Arg::new("api-token")
                .long("api-token")
                .help("DigitalOcean API token"),
        )
        .arg(
            Arg::new("check")
                .action(ArgAction::SetTrue)
                .short('t')
                .long("test")
                .help("Check the configuration"),
        )
        .arg(
            Arg::new("dry-run")
                .action(ArgAction::SetTrue)
                .long("dry-run")
                .help("Show changes without applying them"),
        )
        .version(crate_version!())
        .author(crate_authors!("\n"))
}

fn params(args: &clap::ArgMatches) -> crate::common::Result<Params> {
    Ok(Params {
        state: args
            .get_one::<String>("state")
            .map(|s| s.parse::<DesiredState>())
            .transpose()?
            .unwrap_or(DesiredState::Present),
        id: args.get_one::<u64>("id").copied(),
        name: args.get_one::<String>("name").cloned(),
        ip: args.get_one::<String>("ip").cloned(),
    })
}

/// Configuration failures are reported in the same shape as any other.
fn config_failure(err: crate::common::Error) -> Report {
    Report::from(Err::<Outcome, _>(err))
}

fn print_report(report: &Report) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            tracing::error!(error = err.to_string(), "Failed to render result");
            exit(1);
        }
    }
}

pub(crate) fn main() {
    let args = command().get_matches();

    setup_logger();

    let client = match Config::populate_from_env()
        .map(|c| c.with_api_token(args.get_one::<String>("api-token").cloned()))
        .and_then(Config::into_client)
    {
        Ok(c) => c,
        Err(err) => {
            print_report(&config_failure(err));
            exit(2);
        }
    };

    if args.get_flag("check") {
        tracing::info!(base_url = client.base_url().as_str(), "Configuration is valid.");
        exit(0);
    }

    let report: Report = params(&args)
        .and_then(|p| {
            DomainReconciler::new(&client)
                .dry_run(args.get_flag("dry-run"))
                .reconcile(&p)
        })
        .into();

    print_report(&report);

    if report.is_failure() {
        exit(1);
    }
}
