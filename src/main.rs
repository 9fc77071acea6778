use dwimsh::Interpreter;
use env_logger::Env;
use std::process::ExitCode;

fn init_logging() {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    builder.format_timestamp_millis();
    let _ = builder.try_init();
}

fn main() -> ExitCode {
    init_logging();

    let mut shell = match Interpreter::interactive() {
        Ok(shell) => shell,
        Err(e) => {
            eprintln!("dwimsh: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = shell.interrupt().install() {
        log::warn!("{:#}", e);
    }

    match shell.repl() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error reading the command: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
