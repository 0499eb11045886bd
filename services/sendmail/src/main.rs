use clap::Parser;
use rust_common::init_tracing;
use sendmail::cli::{Cli, env_login};
use std::process::ExitCode;
use tracing::debug;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.tracing_config());

    let options = cli.into_options(env_login());
    match sendmail::run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(exit_code = e.exit_code(), "send failed");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
