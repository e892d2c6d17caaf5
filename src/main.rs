//Enable more cargo lint tests
#![warn(rust_2018_idioms)]

use log::{error, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use sbzip::error::Result;
use sbzip::tools::cli::{Mode, Options};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    let options = Options::from_env();

    if let Err(e) = TermLogger::init(
        options.verbosity,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Could not start logging: {}", e);
    }

    if let Err(e) = run(&options) {
        error!("{}", e);
        eprintln!("sbzip: {}: {}", options.input.display(), e);
        std::process::exit(1);
    }
}

fn run(options: &Options) -> Result<()> {
    options.report();
    let packager = options.packager()?;

    //----- Figure how what we need to do and go do it
    let blocks = match options.mode {
        Mode::Encode => packager.encode(&options.input, &options.output)?,
        Mode::Decode => packager.decode(&options.input, &options.output)?,
    };

    info!("Done. {} blocks.", blocks);
    Ok(())
}
