use std::process::ExitCode;

use clap::{value_parser, Arg, ArgMatches, Command};
use dotenvy::dotenv;
use order_lines::config::{Config, ConfigError};
use order_lines::{create_pool, run_migrations, DomainError, OrderLineService, PgUnitOfWork};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to create database connection pool: {0}")]
    Pool(#[from] r2d2::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("Missing required argument --{0}")]
    MissingArgument(String),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Domain(DomainError::NotFound(..)) => 2,
            CliError::Domain(DomainError::AlreadyShipped(_)) => 3,
            CliError::Domain(DomainError::InvalidQuantity(_)) => 4,
            CliError::Domain(DomainError::InsufficientStock { .. }) => 5,
            CliError::Domain(DomainError::OnOrderOverflow { .. }) => 6,
            _ => 1,
        }
    }
}

fn key_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .required(true)
        .value_parser(value_parser!(i32))
        .help(help)
}

fn cli() -> Command {
    Command::new("order-lines")
        .about("Order line administration against the orders database")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("migrate").about("Apply pending database migrations"))
        .subcommand(
            Command::new("add-line")
                .about("Add a line to an order that has not shipped yet")
                .arg(key_arg("order", "Order number"))
                .arg(key_arg("product", "Product reference"))
                .arg(
                    Arg::new("quantity")
                        .long("quantity")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i32))
                        .help("Units to order"),
                ),
        )
        .subcommand(
            Command::new("show-order")
                .about("Print an order and its lines")
                .arg(key_arg("id", "Order number")),
        )
        .subcommand(
            Command::new("show-product")
                .about("Print a product and its stock counters")
                .arg(key_arg("id", "Product reference")),
        )
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn key(matches: &ArgMatches, name: &str) -> Result<i32, CliError> {
    matches
        .try_get_one::<i32>(name)
        .ok()
        .flatten()
        .copied()
        .ok_or_else(|| CliError::MissingArgument(name.to_string()))
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let config = Config::from_env()?;
    let pool = create_pool(&config.database_url, config.pool_size)?;

    if let Some(("migrate", _)) = matches.subcommand() {
        return Ok(run_migrations(&pool)?);
    }

    let service = OrderLineService::new(PgUnitOfWork::new(pool));
    match matches.subcommand() {
        Some(("add-line", args)) => print_json(&service.add_order_line(
            key(args, "order")?,
            key(args, "product")?,
            key(args, "quantity")?,
        )?),
        Some(("show-order", args)) => print_json(&service.get_order(key(args, "id")?)?),
        Some(("show-product", args)) => print_json(&service.get_product(key(args, "id")?)?),
        _ => Ok(()),
    }
}

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    match run(&cli().get_matches()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
