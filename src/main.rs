// src/main.rs

use multirun::cli::{self, Command, RunArgs};
use multirun::errors::RunnerError;
use multirun::exec::exec_command;
use multirun::{exit_codes, logging, run};

fn main() {
    let args = cli::parse();

    // The shim must not start a runtime or a subscriber: it only sets up
    // its files and execs.
    if let Some(Command::Launch(launch)) = args.command {
        std::process::exit(exec_command(launch.into()));
    }

    let code = match run_main(args.run) {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("multirun error: {err:?}");
            err.downcast_ref::<RunnerError>()
                .map(RunnerError::exit_code)
                .unwrap_or(exit_codes::INVALID)
        }
    };
    std::process::exit(code);
}

fn run_main(args: RunArgs) -> anyhow::Result<()> {
    logging::init_logging(args.log_level)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(args));

    // A cancelled run may leave the stdin reader thread blocked; don't wait
    // for it.
    runtime.shutdown_background();
    result?;
    Ok(())
}
