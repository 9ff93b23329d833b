// Command-line front end.
//
// Opens a file as a store and runs one decoder over it from a given
// offset, printing decoded values as text or JSON.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

use crate::error::StoreError;
use crate::input::{DataInput, StoreInput};
use crate::store::{ByteOrder, Store, StoreOptions, check_range};

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Decode primitives, varints and delta arrays from a store file.
#[derive(Parser, Debug)]
#[command(
    name = "storecursor",
    version,
    about = "Sequential store decoder",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Store typed values little-endian (default big-endian).
    #[arg(long, global = true)]
    little_endian: bool,

    /// Quiet mode (only errors on stderr).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode: -v reports the final cursor, -vv store activity, -vvv every decode.
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Print results as JSON.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Read fixed-width values or single varints.
    Read(ReadArgs),
    /// Decode a delta-compressed varint array.
    Deltas(ArrayArgs),
    /// Decode a plain varint array.
    Varints(ArrayArgs),
    /// Run the varint skip loop and report where it stops.
    Skip(ArrayArgs),
    /// Bulk-read raw bytes.
    Bytes(BytesArgs),
}

#[derive(Args, Debug)]
struct Location {
    /// Store file.
    #[arg(value_hint = ValueHint::FilePath)]
    file: PathBuf,

    /// Starting cursor offset.
    #[arg(short = 'o', long, default_value_t = 0)]
    offset: u64,
}

#[derive(Args, Debug)]
struct ReadArgs {
    #[command(flatten)]
    at: Location,

    /// Value type to decode.
    #[arg(short = 't', long = "type", value_enum)]
    ty: ValueType,

    /// Number of values.
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,
}

#[derive(Args, Debug)]
struct ArrayArgs {
    #[command(flatten)]
    at: Location,

    /// Number of values (or continuation bytes, for `skip`).
    #[arg(short = 'n', long)]
    count: usize,
}

#[derive(Args, Debug)]
struct BytesArgs {
    #[command(flatten)]
    at: Location,

    /// Number of bytes.
    #[arg(short = 'l', long)]
    len: usize,

    /// Print the SHA-256 of the bytes instead of hex.
    #[arg(long)]
    sha256: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ValueType {
    Bool,
    Byte,
    Ubyte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Varint,
    Varint32,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("write: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Store opening
// ---------------------------------------------------------------------------

/// Open `path` as a store and report its size.
fn open_store(path: &Path, opts: StoreOptions) -> Result<(Box<dyn Store>, u64), StoreError> {
    #[cfg(feature = "mmap")]
    let (store, size): (Box<dyn Store>, u64) = {
        let store = crate::store::MmapStore::open_with_options(path, opts)?;
        let size = store.len();
        (Box::new(store), size)
    };

    #[cfg(all(not(feature = "mmap"), unix))]
    let (store, size): (Box<dyn Store>, u64) = {
        let store = crate::store::FileStore::open_with_options(path, opts)?;
        let size = store.len();
        (Box::new(store), size)
    };

    #[cfg(all(not(feature = "mmap"), not(unix)))]
    let (store, size): (Box<dyn Store>, u64) = {
        let bytes = std::fs::read(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let size = bytes.len() as u64;
        (Box::new(crate::store::MemoryStore::with_options(bytes, opts)), size)
    };

    log::debug!("opened store {} ({size} bytes)", path.display());
    Ok((store, size))
}

/// Reject a request that needs at least `min_bytes` past `offset` when the
/// store cannot hold them, before allocating anything for it.
fn check_room(offset: u64, min_bytes: usize, size: u64) -> Result<(), StoreError> {
    check_range(offset, min_bytes, size).map(drop)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Outcome of one command: decoded values and the final cursor.
#[derive(Debug)]
struct Report {
    values: Vec<Value>,
    end_offset: u64,
}

fn read_value<I: DataInput>(input: &mut I, ty: ValueType) -> Result<Value, StoreError> {
    Ok(match ty {
        ValueType::Bool => json!(input.read_boolean()?),
        ValueType::Byte => json!(input.read_byte()?),
        ValueType::Ubyte => json!(input.read_unsigned_byte()?),
        ValueType::Short => json!(input.read_short()?),
        ValueType::Char => json!(input.read_char()?),
        ValueType::Int => json!(input.read_int()?),
        ValueType::Long => json!(input.read_long()?),
        ValueType::Float => json!(input.read_float()?),
        ValueType::Double => json!(input.read_double()?),
        ValueType::Varint => json!(input.unpack_long()?),
        ValueType::Varint32 => json!(input.unpack_int()?),
    })
}

fn execute(cmd: &Cmd, store_opts: StoreOptions) -> Result<Report, CliError> {
    let at = match cmd {
        Cmd::Read(a) => &a.at,
        Cmd::Deltas(a) | Cmd::Varints(a) | Cmd::Skip(a) => &a.at,
        Cmd::Bytes(a) => &a.at,
    };
    let (store, size) = open_store(&at.file, store_opts)?;

    // Every value takes at least one byte.
    match cmd {
        Cmd::Read(a) => check_room(at.offset, a.count, size)?,
        Cmd::Deltas(a) | Cmd::Varints(a) => check_room(at.offset, a.count, size)?,
        Cmd::Bytes(a) => check_room(at.offset, a.len, size)?,
        Cmd::Skip(_) => {}
    }

    let mut input = StoreInput::at(store, at.offset);

    let values = match cmd {
        Cmd::Read(a) => (0..a.count)
            .map(|_| read_value(&mut input, a.ty))
            .collect::<Result<Vec<_>, _>>()?,
        Cmd::Deltas(a) => input
            .unpack_long_array_delta_compression(a.count)?
            .into_iter()
            .map(Value::from)
            .collect(),
        Cmd::Varints(a) => {
            let mut buf = vec![0u64; a.count];
            input.unpack_long_array(&mut buf, 0, a.count)?;
            buf.into_iter().map(Value::from).collect()
        }
        Cmd::Skip(a) => {
            input.unpack_long_skip(a.count)?;
            Vec::new()
        }
        Cmd::Bytes(a) => {
            let mut buf = vec![0u8; a.len];
            input.read_fully(&mut buf)?;
            let text = if a.sha256 {
                hex(&Sha256::digest(&buf))
            } else {
                hex(&buf)
            };
            vec![Value::from(text)]
        }
    };

    let end_offset = input.offset();
    input.close();
    Ok(Report { values, end_offset })
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn print_report<W: Write>(out: &mut W, report: &Report, json_output: bool) -> io::Result<()> {
    if json_output {
        let doc = json!({
            "values": report.values,
            "end_offset": report.end_offset,
        });
        writeln!(out, "{doc}")
    } else if report.values.is_empty() {
        writeln!(out, "{}", report.end_offset)
    } else {
        for v in &report.values {
            match v {
                Value::String(s) => writeln!(out, "{s}")?,
                other => writeln!(out, "{other}")?,
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fuzzing hook
// ---------------------------------------------------------------------------

#[cfg(feature = "fuzzing")]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv = std::iter::once("storecursor".to_string()).chain(args.iter().cloned());
    let _ = Cli::try_parse_from(argv);
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn store_options(cli: &Cli) -> StoreOptions {
    StoreOptions {
        byte_order: if cli.little_endian {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        },
        ..Default::default()
    }
}

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(&cli)))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run_to(&cli, &mut out) {
        Ok(report) => {
            log::info!(
                "{} values, cursor at {}",
                report.values.len(),
                report.end_offset
            );
            process::exit(0);
        }
        Err(e) => {
            eprintln!("storecursor: {e}");
            process::exit(1);
        }
    }
}

/// Default log filter for the `-q` / `-v` flags; `RUST_LOG` still wins.
fn log_filter(cli: &Cli) -> &'static str {
    if cli.quiet {
        return "error";
    }
    match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn run_to<W: Write>(cli: &Cli, out: &mut W) -> Result<Report, CliError> {
    let report = execute(&cli.command, store_options(cli))?;
    print_report(out, &report, cli.json_output)?;
    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
