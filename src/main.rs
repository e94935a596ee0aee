use std::env;
use std::process;

use aco_tsp::Config;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::build(env::args_os()).unwrap_or_else(|err| err.exit());

    if let Err(e) = aco_tsp::run(&config) {
        eprintln!("Application error: {e}");
        process::exit(1);
    };
}
