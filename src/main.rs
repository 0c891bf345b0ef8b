use clap::Parser;
use log::{debug, warn, LevelFilter};

mod args;
mod rcc;

use crate::rcc::{FileOpener, NoOpener, ReportSettings, SystemOpener};

fn main() {
    let args = args::Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }
    debug!("main: args: {:?}", args);

    let settings = ReportSettings {
        input: args.input.clone(),
        excel_worksheet_name: args.excel_worksheet_name.clone(),
        out_dir: args.out_dir.clone(),
        summary_out: args.out.clone().filter(|s| !s.is_empty()),
    };
    let opener: Box<dyn FileOpener> = if args.no_open {
        Box::new(NoOpener)
    } else {
        Box::new(SystemOpener)
    };

    if let Err(e) = rcc::run_report(&settings, opener.as_ref()) {
        warn!("Error occured {:?}", e);
        eprintln!("An error occurred: {}", e);
        std::process::exit(1);
    }
}
