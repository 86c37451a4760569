use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};

use huff_codec::output::{ensure_distinct, write_replacing};
use huff_codec::{CodecConfig, HeaderFormat, HuffMark, HuffmanCodec};

#[derive(Parser)]
#[command(name = "huff", about = "Huffman compression with count or tree headers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    Compress {
        /// Input file
        file: PathBuf,
        /// Output file (default: <file><suffix>)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Header format: count or tree
        #[arg(short, long)]
        format: Option<HeaderFormat>,
        /// Write the output even if it is larger than the input
        #[arg(long)]
        force: bool,
        /// JSON config file (default: HUFF_* environment variables)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Decompress a file
    Decompress {
        /// Input file
        file: PathBuf,
        /// Output file (default: strip the suffix, or append .unhf)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// JSON config file (default: HUFF_* environment variables)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Compress every file in a directory and report totals
    Mark {
        /// Directory to compress
        dir: PathBuf,
        /// JSON config file (default: HUFF_* environment variables)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> huff_codec::Result<CodecConfig> {
    match path {
        Some(path) => CodecConfig::load_from_file(path),
        None => CodecConfig::from_env(),
    }
}

fn run(command: Commands) -> huff_codec::Result<()> {
    match command {
        Commands::Compress { file, output, format, force, config } => {
            let config = load_config(config.as_deref())?;
            let format = format.unwrap_or(config.header_format);
            let out_path = output.unwrap_or_else(|| {
                let mut name = file.clone().into_os_string();
                name.push(&config.suffix);
                PathBuf::from(name)
            });

            let mut codec = HuffmanCodec::new();
            codec.set_viewer(|message: &str| eprintln!("  {message}"));
            ensure_distinct(&file, &out_path)?;
            codec.preprocess(File::open(&file)?, format)?;
            write_replacing(&out_path, |out| codec.encode(File::open(&file)?, out, force || config.force))?;
            eprintln!("  Written to {}", out_path.display());
        }
        Commands::Decompress { file, output, config } => {
            let config = load_config(config.as_deref())?;
            let out_path = output.unwrap_or_else(|| {
                let s = file.to_string_lossy();
                match s.strip_suffix(config.suffix.as_str()) {
                    Some(stripped) if !stripped.is_empty() => PathBuf::from(stripped),
                    _ => PathBuf::from(format!("{}.unhf", s)),
                }
            });

            let mut codec = HuffmanCodec::new();
            codec.set_viewer(|message: &str| eprintln!("  {message}"));
            ensure_distinct(&file, &out_path)?;
            write_replacing(&out_path, |out| codec.decode(File::open(&file)?, out))?;
            eprintln!("  Written to {}", out_path.display());
        }
        Commands::Mark { dir, config } => {
            let config = load_config(config.as_deref())?;
            let report = HuffMark::new(config.suffix).run(&dir)?;
            eprintln!("  compressing to: {}", report.output_dir.display());
            for f in &report.files {
                println!("{} from\t {} to\t {} in\t {:.3}", f.name, f.original_bytes, f.compressed_bytes, f.seconds);
            }
            println!("total bytes read: {}", report.total_original_bytes());
            println!("total compressed bytes {}", report.total_compressed_bytes());
            println!("total percent compression {:.3}", report.percent_compression());
            println!("compression time: {:.3}", report.total_seconds());
        }
    }
    Ok(())
}
