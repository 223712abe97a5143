use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use canfix_core::{
    BitRate, BitRateSet, CanFrame, DeviceInfo, NodeIdSet, NodeIdentification, NodeSpecificCodec,
    Report, analyze_candump_file, describe, parse_frame_text, parse_node_specific,
};
use clap::{ArgGroup, Args, Parser, Subcommand};
use glob::glob;
use log::debug;

const LOG_EXTENSIONS: [&str; 3] = ["log", "txt", "candump"];

#[derive(Parser, Debug)]
#[command(name = "canfix")]
#[command(
    version,
    long_version = concat!(
        env!("CARGO_PKG_VERSION"),
        " (commit ",
        env!("CANFIX_BUILD_COMMIT"),
        ", built ",
        env!("CANFIX_BUILD_DATE"),
        ")"
    )
)]
#[command(
    about = "Decode and encode CAN-FIX node specific messages.",
    long_about = None,
    after_help = "Examples:\n  canfix log decode bus.log -o report.json\n  canfix frame decode 701#0005\n  canfix frame encode bit-rate --send 1 --dest 5 --bitrate 500\n  canfix describe 6"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on candump log files (offline).
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },
    /// Decode or build a single frame.
    Frame {
        #[command(subcommand)]
        command: FrameCommands,
    },
    /// Print the registry name of a control code.
    Describe {
        /// Control code, decimal or 0x-prefixed hex
        #[arg(value_parser = parse_u8)]
        code: u8,
    },
}

#[derive(Subcommand, Debug)]
enum LogCommands {
    /// Decode every node specific frame in a log into a versioned JSON report.
    #[command(aliases = ["analyze", "analyse"])]
    #[command(
        after_help = "Examples:\n  canfix log decode bus.log -o report.json\n  canfix log analyze 'captures/*.log' --stdout --pretty"
    )]
    Decode(LogDecodeArgs),
}

#[derive(Args, Debug)]
struct LogDecodeArgs {
    /// Path to a candump log file (a glob matching one file is accepted)
    input: PathBuf,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if any frame failed to decode
    #[arg(long)]
    strict: bool,

    /// List decode issues after analysis
    #[arg(long)]
    list_issues: bool,
}

#[derive(Subcommand, Debug)]
enum FrameCommands {
    /// Decode one frame given as ID#HEX (cansend notation).
    Decode {
        /// Frame such as 701#0005
        frame: String,
    },
    /// Build a frame and print it as ID#HEX.
    Encode {
        #[command(subcommand)]
        message: EncodeCommands,
    },
}

#[derive(Subcommand, Debug)]
enum EncodeCommands {
    /// Node Identification request, or response when device fields are given.
    Identification(IdentificationArgs),
    /// Bit Rate Set request or response.
    BitRate(BitRateArgs),
    /// Node ID Set request, or acknowledgement without --new-node.
    NodeId(NodeIdArgs),
}

#[derive(Args, Debug)]
struct Route {
    /// Sending node number
    #[arg(long, value_parser = parse_u8)]
    send: u8,

    /// Destination node number
    #[arg(long, value_parser = parse_u8)]
    dest: u8,
}

#[derive(Args, Debug)]
struct IdentificationArgs {
    #[command(flatten)]
    route: Route,

    /// Device type (0..=255)
    #[arg(long, value_parser = parse_u32)]
    device: Option<u32>,

    /// Firmware revision (0..=255)
    #[arg(long, value_parser = parse_u32)]
    fwrev: Option<u32>,

    /// Model number (0..=0xFFFFFF)
    #[arg(long, value_parser = parse_u32)]
    model: Option<u32>,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("outcome")
        .required(true)
        .args(["bitrate", "success", "fail"])
))]
struct BitRateArgs {
    #[command(flatten)]
    route: Route,

    /// Requested rate: code 1..=4 or 125, 250, 500, 1000 kbps
    #[arg(long, value_parser = parse_u32)]
    bitrate: Option<u32>,

    /// Success response
    #[arg(long)]
    success: bool,

    /// Failure response
    #[arg(long)]
    fail: bool,
}

#[derive(Args, Debug)]
struct NodeIdArgs {
    #[command(flatten)]
    route: Route,

    /// Node number to assign (1..=255)
    #[arg(long, value_parser = parse_u32)]
    new_node: Option<u32>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Log { command } => match command {
            LogCommands::Decode(args) => cmd_log_decode(args),
        },
        Commands::Frame { command } => match command {
            FrameCommands::Decode { frame } => cmd_frame_decode(&frame),
            FrameCommands::Encode { message } => cmd_frame_encode(message),
        },
        Commands::Describe { code } => {
            println!("{}", describe(code));
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_log_decode(args: LogDecodeArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    let report_path = match (args.stdout, args.report) {
        (true, _) => None,
        (false, Some(path)) => Some(path),
        (false, None) => {
            return Err(CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            ));
        }
    };
    if let Some(path) = report_path.as_ref() {
        ensure_distinct_output(path, &input_abs)?;
    }

    let rep = analyze_candump_file(&resolved_input).context("candump log analysis failed")?;
    let json = serialize_report(&rep, args.pretty, args.compact)?;

    match report_path {
        None => print!("{}", json),
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&path, json)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            if !args.quiet {
                eprintln!("OK: report written -> {}", path.display());
            }
        }
    }

    if args.list_issues && !args.quiet {
        print_issues(&rep);
    }
    if args.strict && !rep.issues.is_empty() {
        return Err(CliError::new(
            "undecodable node specific frames detected",
            Some("use --list-issues to inspect".to_string()),
        ));
    }
    Ok(())
}

fn ensure_distinct_output(report_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let report_dir = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::canonicalize(parent),
        _ => fs::canonicalize("."),
    };
    // A missing output directory cannot contain the input.
    let Ok(report_dir) = report_dir else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn cmd_frame_decode(text: &str) -> Result<(), CliError> {
    let frame = parse_frame_text(text).map_err(|err| {
        CliError::new(
            format!("invalid frame '{}': {}", text, err),
            Some("expected ID#HEX with a 3-digit identifier, e.g. 701#0005".to_string()),
        )
    })?;
    let msg = parse_node_specific(&frame).map_err(|err| {
        CliError::new(
            format!("cannot decode {}: {}", frame, err),
            Some("node specific frames use identifiers 700..7FF".to_string()),
        )
    })?;
    debug!("decoded {:?}", msg);
    println!("{}", msg);
    Ok(())
}

fn cmd_frame_encode(message: EncodeCommands) -> Result<(), CliError> {
    let frame = match message {
        EncodeCommands::Identification(args) => encode_identification(args)?,
        EncodeCommands::BitRate(args) => encode_bit_rate(args)?,
        EncodeCommands::NodeId(args) => encode_node_id(args)?,
    };
    println!("{}", frame);
    Ok(())
}

fn encode_identification(args: IdentificationArgs) -> Result<CanFrame, CliError> {
    let Route { send, dest } = args.route;
    let msg = match (args.device, args.fwrev, args.model) {
        (None, None, None) => NodeIdentification::request(send, dest),
        (Some(device), Some(fwrev), Some(model)) => {
            let info = DeviceInfo::new(device, fwrev, model).map_err(field_error)?;
            NodeIdentification::response(send, dest, info)
        }
        _ => {
            return Err(CliError::new(
                "incomplete identification response",
                Some("give --device, --fwrev and --model together, or none for a request".into()),
            ));
        }
    };
    msg.encode().map_err(field_error)
}

fn encode_bit_rate(args: BitRateArgs) -> Result<CanFrame, CliError> {
    let Route { send, dest } = args.route;
    let msg = match args.bitrate {
        Some(value) => BitRateSet::request(send, dest, BitRate::new(value).map_err(field_error)?),
        None if args.fail => BitRateSet::failure(send, dest),
        None => BitRateSet::success(send, dest),
    };
    msg.encode().map_err(field_error)
}

fn encode_node_id(args: NodeIdArgs) -> Result<CanFrame, CliError> {
    let Route { send, dest } = args.route;
    let msg = match args.new_node {
        Some(node) => NodeIdSet::try_request(send, dest, node).map_err(field_error)?,
        None => NodeIdSet::response(send, dest),
    };
    msg.encode().map_err(field_error)
}

fn field_error(err: canfix_core::NsmError) -> CliError {
    CliError::new(err.to_string(), None)
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_issues(rep: &Report) {
    eprintln!("Decode issues:");
    for issue in &rep.issues {
        eprintln!("  {} ({}) {}", issue.id, issue.count, issue.message);
        for example in &issue.examples {
            eprintln!("    {}", example);
        }
    }
}

fn parse_u32(text: &str) -> Result<u32, String> {
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|err| format!("invalid number '{}': {}", text, err))
}

fn parse_u8(text: &str) -> Result<u8, String> {
    let value = parse_u32(text)?;
    u8::try_from(value).map_err(|_| format!("{} is out of range (0..=255)", value))
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a candump log file (.log)".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a candump log file (.log)".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if !LOG_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .log, .txt or .candump file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.len() > 1 {
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches); matches: ",
            pattern,
            matches.len()
        );
        message.push_str(
            &matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        );
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(
            message,
            Some("pass a single log file, or run once per file".to_string()),
        ));
    }

    matches.pop().ok_or_else(|| {
        CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected a candump log".to_string()),
        )
    })
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
