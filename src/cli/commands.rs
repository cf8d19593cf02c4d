use clap::{Parser, Subcommand};
use std::path::PathBuf;
use crate::audio::format::AudioFormat;
use crate::engine::ffmpeg::DEFAULT_FFMPEG;

#[derive(Parser)]
#[command(name = "beatberry")]
#[command(version = "1.0")]
#[command(about = "Batch audio converter backed by ffmpeg", long_about = None)]
pub struct Cli {
    /// ffmpeg executable to run for each file
    #[arg(long, global = true, env = "BEATBERRY_FFMPEG", default_value = DEFAULT_FFMPEG)]
    pub ffmpeg: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert every .m4a file in a folder to 192 kbps mp3 under <folder>/outputs
    Convert {
        /// Strip --prefix from the start of each output file name
        #[arg(long, requires = "prefix")]
        clean: bool,

        /// Prefix removed in --clean mode
        #[arg(long)]
        prefix: Option<String>,

        /// Folder to convert (defaults to the Downloads folder)
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,

        /// Write a CSV summary of the run
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Select files and convert them from an interactive prompt
    Interactive {
        /// Target format: mp3, wav, flac, ogg or m4a
        #[arg(short = 'f', long, default_value = "mp3")]
        format: AudioFormat,

        /// Output folder (defaults to an outputs folder beside each file)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}
