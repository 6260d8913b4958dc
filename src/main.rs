use clap::Parser;
use std::process::ExitCode;

use devserve::args::Args;
use devserve::logging::setup_logging;
use devserve::{mime, Server, StartupError};

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.log_level().filter());

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: Args) -> Result<(), StartupError> {
    let config = args.into_config()?;
    mime::init();

    let server = Server::bind(config)?;
    let shutdown = server.shutdown_handle();
    ctrlc::set_handler(move || shutdown.shutdown())?;

    server.run()?;
    Ok(())
}
