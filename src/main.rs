use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use squeez::{Codec, CodecConfig};
use tracing_subscriber::EnvFilter;

/// Lossless Huffman compression for text files
#[derive(Parser)]
#[command(name = "squeez", author, version, about, long_about = None)]
struct Args {
    /// Log pipeline details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file with codec settings
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Encode a UTF-8 text file into a compressed frame
    #[command(alias = "e")]
    Encode { input: PathBuf, output: PathBuf },

    /// Decode a compressed frame back into the original text
    #[command(alias = "d")]
    Decode { input: PathBuf, output: PathBuf },

    /// Print compression statistics for a text file
    Stats { input: PathBuf },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => CodecConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CodecConfig::default(),
    };
    let codec = Codec::new(config);

    match args.mode {
        Mode::Encode { input, output } => {
            codec
                .compress_file(&input, &output)
                .with_context(|| format!("failed to encode {}", input.display()))?;
        }
        Mode::Decode { input, output } => {
            codec
                .decompress_file(&input, &output)
                .with_context(|| format!("failed to decode {}", input.display()))?;
        }
        Mode::Stats { input } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let report = codec.report(&text)?;
            println!("symbols:          {}", report.symbol_count);
            println!("distinct symbols: {}", report.distinct_symbols);
            println!("input bytes:      {}", report.input_bytes);
            println!("header bytes:     {}", report.header_bytes);
            println!("payload bits:     {}", report.payload_bits);
            println!("frame bytes:      {}", report.frame_bytes);
            println!("ratio:            {:.3}", report.ratio);
            println!("entropy:          {:.3} bits/symbol", report.entropy_bits);
            println!("avg code length:  {:.3} bits/symbol", report.average_code_length);
        }
    }

    Ok(())
}
