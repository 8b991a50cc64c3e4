//! Command-line entry points over the four operations spec'd for the
//! codec: decode, encode, classify, and raw transcode.

use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};

use astm_codec::config::{Config, Encoding as CfgEncoding, LineSeparator, Notation};
use astm_lis2a2::Message;

#[derive(Parser)]
#[command(version, about = "Encode, decode, classify, and transcode ASTM E1394/LIS2-A2 messages.")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a wire message from stdin and print its structure to stdout.
    Decode(CodecArgs),
    /// Decode a wire message from stdin and re-encode it to stdout.
    Encode(CodecArgs),
    /// Classify a wire message from stdin as query / orders-only / orders-and-results.
    Classify(CodecArgs),
    /// Transcode a wire message from stdin into UTF-8 on stdout, without parsing it.
    Transcode(TranscodeArgs),
}

#[derive(clap::Args)]
struct CodecArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(clap::Args)]
struct TranscodeArgs {
    #[arg(long, value_enum, default_value_t = EncodingArg::Iso88591)]
    encoding: EncodingArg,
}

#[derive(clap::Args)]
struct ConfigArgs {
    /// Source/target character set on the wire.
    #[arg(long, value_enum, default_value_t = EncodingArg::Iso88591)]
    encoding: EncodingArg,

    /// Line separator to emit; ignored on decode when auto-detect is on.
    #[arg(long, value_enum, default_value_t = LineSeparatorArg::Lf)]
    line_separator: LineSeparatorArg,

    /// Disable line-separator auto-detection on decode.
    #[arg(long)]
    no_auto_detect: bool,

    /// IANA time zone used to interpret naive timestamps.
    #[arg(long, default_value = "Europe/Berlin")]
    time_zone: String,

    /// Disable sequence-number validation on decode.
    #[arg(long)]
    no_enforce_sequence: bool,

    /// Standard keeps every field up to the highest populated one; short
    /// trims trailing empty fields.
    #[arg(long, value_enum, default_value_t = NotationArg::Standard)]
    notation: NotationArg,

    /// Truncate instead of round fixed-precision numbers.
    #[arg(long)]
    truncate_numbers: bool,

    /// Default decimal precision for numbers without a `length` attribute.
    #[arg(long, default_value_t = 3)]
    precision: u32,
}

#[derive(Clone, Copy, ValueEnum)]
enum EncodingArg {
    Utf8,
    Ascii,
    Windows1250,
    Windows1251,
    Windows1252,
    Dos852,
    Dos855,
    Dos866,
    Iso88591,
}

impl From<EncodingArg> for CfgEncoding {
    fn from(value: EncodingArg) -> Self {
        match value {
            EncodingArg::Utf8 => CfgEncoding::Utf8,
            EncodingArg::Ascii => CfgEncoding::Ascii,
            EncodingArg::Windows1250 => CfgEncoding::Windows1250,
            EncodingArg::Windows1251 => CfgEncoding::Windows1251,
            EncodingArg::Windows1252 => CfgEncoding::Windows1252,
            EncodingArg::Dos852 => CfgEncoding::Dos852,
            EncodingArg::Dos855 => CfgEncoding::Dos855,
            EncodingArg::Dos866 => CfgEncoding::Dos866,
            EncodingArg::Iso88591 => CfgEncoding::Iso8859_1,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LineSeparatorArg {
    Lf,
    Cr,
    CrLf,
    LfCr,
}

impl From<LineSeparatorArg> for LineSeparator {
    fn from(value: LineSeparatorArg) -> Self {
        match value {
            LineSeparatorArg::Lf => LineSeparator::Lf,
            LineSeparatorArg::Cr => LineSeparator::Cr,
            LineSeparatorArg::CrLf => LineSeparator::CrLf,
            LineSeparatorArg::LfCr => LineSeparator::LfCr,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum NotationArg {
    Standard,
    Short,
}

impl From<NotationArg> for Notation {
    fn from(value: NotationArg) -> Self {
        match value {
            NotationArg::Standard => Notation::Standard,
            NotationArg::Short => Notation::Short,
        }
    }
}

fn build_config(args: &ConfigArgs) -> Result<Config, String> {
    let time_zone = chrono_tz::Tz::from_str(&args.time_zone)
        .map_err(|_| format!("unrecognized time zone: {}", args.time_zone))?;
    Ok(Config {
        encoding: args.encoding.into(),
        line_separator: args.line_separator.into(),
        auto_detect_line_separator: !args.no_auto_detect,
        time_zone,
        enforce_sequence_number_check: !args.no_enforce_sequence,
        notation: args.notation.into(),
        round_fixed_numbers: !args.truncate_numbers,
        default_decimal_precision: args.precision,
        ..Config::default()
    })
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

fn read_stdin() -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    io::stdin().read_to_end(&mut buf)?;
    Ok(buf)
}

fn run() -> Result<(), String> {
    let args = Args::parse();

    match args.command {
        Command::Decode(codec_args) => {
            let cfg = build_config(&codec_args.config)?;
            let bytes = read_stdin().map_err(|e| e.to_string())?;
            let message: Message = astm_codec::decode(&bytes, &cfg).map_err(|e| e.to_string())?;
            println!("{message:#?}");
            Ok(())
        }
        Command::Encode(codec_args) => {
            let cfg = build_config(&codec_args.config)?;
            let bytes = read_stdin().map_err(|e| e.to_string())?;
            let message: Message = astm_codec::decode(&bytes, &cfg).map_err(|e| e.to_string())?;
            let out = astm_codec::encode(&message, &cfg).map_err(|e| e.to_string())?;
            io::stdout().write_all(&out).map_err(|e| e.to_string())?;
            Ok(())
        }
        Command::Classify(codec_args) => {
            let cfg = build_config(&codec_args.config)?;
            let bytes = read_stdin().map_err(|e| e.to_string())?;
            let kind = astm_codec::classify(&bytes, &cfg).map_err(|e| e.to_string())?;
            println!("{kind:?}");
            Ok(())
        }
        Command::Transcode(transcode_args) => {
            let bytes = read_stdin().map_err(|e| e.to_string())?;
            let text = astm_codec::transcode_utf8(&bytes, transcode_args.encoding.into())
                .map_err(|e| e.to_string())?;
            print!("{text}");
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            tracing::error!("{message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
