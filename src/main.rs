use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use clap::Parser;
use beatberry::{
    batch::{BatchConverter, ConversionOptions},
    cli::commands::{Cli, Commands},
    cli::convert::{default_input_dir, exit_status, failure_hint, run_convert, ConvertOptions},
    cli::interactive::run_interactive,
    engine::{FfmpegEngine, TranscodeEngine},
    utils::reporting::Reporter,
};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let engine: Arc<dyn TranscodeEngine> = Arc::new(FfmpegEngine::new(&cli.ffmpeg));

    match cli.command {
        Commands::Convert { clean, prefix, input, report } => {
            let options = ConvertOptions {
                input_dir: input.unwrap_or_else(default_input_dir),
                clean,
                prefix,
                report,
            };

            let mut reporter = Reporter::stdout();
            let result = run_convert(&options, engine, &mut reporter);
            if let Err(e) = &result {
                eprintln!("Error: {}", e);
                if let Some(hint) = failure_hint(e) {
                    eprintln!("{}", hint);
                }
            }
            ExitCode::from(exit_status(&result))
        }

        Commands::Interactive { format, output } => {
            let options = ConversionOptions {
                format,
                destination_dir: output,
                ..ConversionOptions::default()
            };

            match run_interactive(BatchConverter::new(engine), options, io::stdout()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
