/// huff-hist – print the byte histogram of a file.
///
///   huff-hist file.bin                  → histogram with one worker per CPU
///   huff-hist -w 8 -b 4096 file.bin     → 8 workers claiming 4 KiB blocks
///   huff-hist -c build.toml file.bin    → settings from a TOML file
use std::env;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use huffhist_core::{BuildConfig, Coordinator};

fn usage() {
    eprintln!("huff-hist - concurrent byte histogram");
    eprintln!();
    eprintln!("Usage: huff-hist [OPTIONS] FILE");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -w, --workers N      Number of worker threads (default: CPU count)");
    eprintln!("  -b, --block-size B   Bytes claimed per read (default: 65536)");
    eprintln!("  -c, --config FILE    Load settings from a TOML file");
    eprintln!("  -p, --pin            Pin worker threads to CPU cores");
    eprintln!("  -h, --help           Show this help");
}

struct Args {
    input: PathBuf,
    config: Option<PathBuf>,
    workers: Option<usize>,
    block_size: Option<usize>,
    pin: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut input = None;
    let mut config = None;
    let mut workers = None;
    let mut block_size = None;
    let mut pin = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-w" | "--workers" => workers = Some(parse_number(&arg, args.next())?),
            "-b" | "--block-size" => block_size = Some(parse_number(&arg, args.next())?),
            "-c" | "--config" => {
                config = Some(PathBuf::from(args.next().ok_or("--config needs a path")?));
            }
            "-p" | "--pin" => pin = true,
            "-h" | "--help" => {
                usage();
                std::process::exit(0);
            }
            s if s.starts_with('-') => return Err(format!("unknown option: {}", s)),
            _ => {
                if input.replace(PathBuf::from(&arg)).is_some() {
                    return Err("only one input file is accepted".to_string());
                }
            }
        }
    }

    Ok(Args {
        input: input.ok_or("missing input file")?,
        config,
        workers,
        block_size,
        pin,
    })
}

fn parse_number(flag: &str, value: Option<String>) -> Result<usize, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .parse()
        .map_err(|_| format!("{}: not a number: {}", flag, value))
}

fn printable(symbol: u8) -> String {
    if symbol.is_ascii_graphic() {
        format!("'{}'", symbol as char)
    } else {
        format!("{:#04x}", symbol)
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => BuildConfig::from_file(path)?,
        None => BuildConfig::default(),
    };
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    if let Some(block_size) = args.block_size {
        config = config.with_block_size(block_size);
    }
    if args.pin {
        config = config.with_pinning(true);
    }

    tracing::debug!("using {:?} for {}", config, args.input.display());
    let file = File::open(&args.input)?;
    let histogram = Coordinator::new(config)?.run(file)?;

    for (symbol, count) in histogram.iter() {
        println!("{:>6} {}", printable(symbol), count);
    }
    println!();
    println!("total:    {}", histogram.total());
    println!("distinct: {}", histogram.distinct());
    println!("entropy:  {:.4} bits/byte", histogram.entropy());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("huff-hist: {}", msg);
            usage();
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("huff-hist: {}", e);
            ExitCode::FAILURE
        }
    }
}
