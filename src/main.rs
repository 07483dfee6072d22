pub mod config;
pub mod contexts;
pub mod frontmatter;
pub mod gitvoy;
pub mod loader;
pub mod post;
pub mod render;
pub mod theme;

use std::io::Write;
use std::process::exit;

use clap::Parser;

use gitvoy::{Args, Gitvoy};

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("GITVOY_LOG", level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let app = Gitvoy::new(&args);
    let output = match app.run(&args.command) {
        Ok(o) => o,
        Err(err) => {
            eprintln!("Error: {err:#}");
            exit(1);
        }
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(err) = stdout.write_all(output.as_bytes()).and_then(|_| stdout.flush()) {
        eprintln!("Error: could not write output: {err}");
        exit(1);
    }
}
