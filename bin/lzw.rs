#![forbid(unsafe_code)]
use std::path::PathBuf;
use std::{env, ffi, fs, io, process};

use lzwtst::{Decoder, Encoder, ResetPolicy};

fn main() -> CodingResult {
    CodingResult::catch_panic(|| {
        let flags = Flags::from_args(env::args_os()).unwrap_or_else(|ParamError| explain());
        init_logging();
        run_coding(flags)
    })
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_coding(flags: Flags) -> Result<(), io::Error> {
    let out = io::stdout();
    let out = io::BufWriter::new(out.lock());

    let input: Box<dyn io::BufRead> = match flags.input {
        Input::File(file) => {
            let data = fs::File::open(file)?;
            Box::new(io::BufReader::with_capacity(1 << 20, data))
        }
        Input::Stdin => Box::new(io::BufReader::with_capacity(1 << 20, io::stdin())),
    };

    match flags.operation {
        Operation::Compress(policy) => {
            let mut encoder = Encoder::with_policy(policy);
            let result = encoder.into_stream(out).encode_all(input);
            tracing::info!(
                bytes_read = result.bytes_read,
                bytes_written = result.bytes_written,
                resets = encoder.dictionary_resets(),
                "compressed"
            );
            result.status
        }
        Operation::Expand => {
            let mut decoder = Decoder::new();
            let result = decoder.into_stream(out).decode_all(input);
            tracing::info!(
                bytes_read = result.bytes_read,
                bytes_written = result.bytes_written,
                resets = decoder.dictionary_resets(),
                "expanded"
            );
            result.status
        }
    }
}

struct Flags {
    input: Input,
    operation: Operation,
}

struct ParamError;

#[derive(Debug)]
enum Input {
    File(PathBuf),
    Stdin,
}

#[derive(Debug)]
enum Operation {
    Compress(ResetPolicy),
    Expand,
}

fn explain<T>() -> T {
    eprintln!(
        "Usage: lzw [-|+] [r] [--input <file>]\n\
        Arguments:\n\
        -\t compress standard input to standard output\n\
        +\t expand standard input to standard output\n\
        r\t when compressing, reset the dictionary once it is full\n\
        --input <file>\tread from a file instead of standard input"
    );
    process::exit(1);
}

fn command() -> clap::Command<'static> {
    clap::Command::new("lzw")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compress or expand data with LZW")
        .arg(
            clap::Arg::new("mode")
                .required(true)
                .value_parser(["-", "+"]),
        )
        .arg(clap::Arg::new("reset").value_parser(["r"]))
        .arg(
            clap::Arg::new("input")
                .short('i')
                .long("input")
                .takes_value(true)
                .value_parser(clap::builder::ValueParser::path_buf()),
        )
}

impl Flags {
    fn from_args(args: impl Iterator<Item = ffi::OsString>) -> Result<Self, ParamError> {
        let matches = command().try_get_matches_from(args).map_err(|_| ParamError)?;

        let reset = if matches.contains_id("reset") {
            ResetPolicy::Reset
        } else {
            ResetPolicy::Freeze
        };

        let operation = match matches.get_one::<String>("mode").map(String::as_str) {
            Some("-") => Operation::Compress(reset),
            Some("+") if !matches.contains_id("reset") => Operation::Expand,
            _ => return Err(ParamError),
        };

        let input = match matches.get_one::<PathBuf>("input") {
            None => Input::Stdin,
            Some(p) => Input::File(p.clone()),
        };

        Ok(Flags { input, operation })
    }
}

enum CodingResult {
    Ok,
    Err(io::Error),
    Panic,
}

impl CodingResult {
    fn catch_panic(op: fn() -> Result<(), io::Error>) -> Self {
        std::panic::catch_unwind(|| match op() {
            Ok(()) => CodingResult::Ok,
            Err(err) => CodingResult::Err(err),
        })
        .unwrap_or(CodingResult::Panic)
    }
}

impl std::process::Termination for CodingResult {
    fn report(self) -> std::process::ExitCode {
        match self {
            CodingResult::Ok => std::process::ExitCode::SUCCESS,
            CodingResult::Err(err) => {
                eprintln!("{}", err);
                std::process::ExitCode::FAILURE
            }
            CodingResult::Panic => {
                eprintln!(
                    "The process failed irrecoverably! This should never happen and is a bug."
                );
                std::process::ExitCode::from(128)
            }
        }
    }
}
