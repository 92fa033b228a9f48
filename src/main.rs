#[macro_use]
extern crate log;

use log::LevelFilter;
use stackcheck::app::App;
use stackcheck::configuration::command_line::{LogLevel, Opt};
use stackcheck::configuration::settings::Settings;
use stackcheck::configuration::suite::Suite;
use std::path::PathBuf;
use std::process::exit;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use structopt::StructOpt;

fn main() {
    let options = Opt::from_args();

    if let Err(e) = init_logging(
        options.logging.unwrap_or(LogLevel::Info).into(),
        &options.log_output_file,
    ) {
        eprintln!("Failed to initialize logging: {}", e);
        exit(2);
    }

    let cancel = Arc::new(AtomicBool::new(false));
    if let Err(e) = signal_hook::flag::register(signal_hook::SIGINT, Arc::clone(&cancel)) {
        warn!("Cannot listen for SIGINT, run will not be interruptible: {}", e);
    }

    let mut settings = match Settings::load(options.settings.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load settings {}", e);
            exit(2);
        }
    };
    options.apply(&mut settings);
    debug!("Initiated settings {:#?}", settings);

    let suite = match Suite::from_path(&options.file) {
        Ok(suite) => suite,
        Err(e) => {
            error!("Failed to load fixture {}: {}", options.file.display(), e);
            exit(2);
        }
    };

    let report_path = settings.report.clone();
    let app = App::new(suite, settings);
    let report = app.run_until(&cancel);

    if let Some(path) = report_path {
        match report.save_into_file(&path) {
            Ok(()) => info!("Report written to {}", path.display()),
            Err(e) => error!("Cannot write report to {}: {}", path.display(), e),
        }
    }

    for test in report.tests() {
        for failure in test.failures() {
            error!(
                "'{}' step {} ({}): {}",
                test.name(),
                failure.step_index,
                failure.step_type,
                failure.error
            );
        }
    }

    if !report.all_passed() {
        exit(1);
    }
}

fn init_logging(level: LevelFilter, output: &Option<PathBuf>) -> Result<(), fern::InitError> {
    let mut dispatcher = fern::Dispatch::new()
        // Perform allocation-free log formatting
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}:{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record
                    .line()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "".to_owned()),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout());

    if let Some(log_file) = output {
        dispatcher = dispatcher.chain(fern::log_file(log_file)?)
    }
    dispatcher.apply()?;
    info!("Logging level {} enabled", level);
    Ok(())
}
