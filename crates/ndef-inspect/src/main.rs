use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use eyre::{WrapErr as _, bail};
use nfc::{
    CrcVariant, NdefMessage, ParseOptions, compute_crc,
    ndef::tlv,
};
use tracing::{Level, debug};

#[derive(Parser)]
#[command(name = "ndef-inspect")]
#[command(about = "Decode and display an NDEF message", long_about = None)]
struct Cli {
    /// Message bytes as hex, whitespace and ':' separators are ignored
    #[arg(conflicts_with = "file", required_unless_present = "file")]
    hex: Option<String>,

    /// Read raw bytes from a file instead
    #[arg(long)]
    file: Option<PathBuf>,

    /// Input is tag memory, find the NDEF message TLV first
    #[arg(long)]
    tlv: bool,

    /// Print the input framed with CRC_A or CRC_B instead of decoding it
    #[arg(long, value_name = "a|b")]
    crc: Option<CrcVariant>,

    /// Accept bytes after the message end record
    #[arg(long)]
    allow_trailing: bool,

    /// More output, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    fn input(&self) -> Result<Vec<u8>> {
        if let Some(path) = &self.file {
            return std::fs::read(path)
                .wrap_err_with(|| format!("unable to read {}", path.display()));
        }

        let Some(hex) = &self.hex else {
            bail!("either a hex string or --file is required");
        };

        parse_hex(hex)
    }
}

fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let cleaned = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect::<String>();

    let cleaned = cleaned.strip_prefix("0x").unwrap_or(&cleaned);
    hex::decode(cleaned).wrap_err("input is not valid hex")
}

fn render(cli: &Cli, input: &[u8]) -> Result<String> {
    if let Some(variant) = cli.crc {
        let framed = compute_crc(variant, input);
        return Ok(format!("CRC_{variant}: {}", hex::encode(framed)));
    }

    let bytes = if cli.tlv {
        tlv::find_ndef_message(input).wrap_err("unable to find an NDEF message in tag memory")?
    } else {
        input
    };

    debug!(length = bytes.len(), "decoding message");

    let options = ParseOptions {
        allow_trailing_bytes: cli.allow_trailing,
        ..ParseOptions::default()
    };

    let message =
        NdefMessage::deserialize_with(bytes, options).wrap_err("unable to decode NDEF message")?;

    Ok(message.to_string())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    nfc::logging::init_with_level(cli.log_level());

    let input = cli.input()?;
    println!("{}", render(&cli, &input)?);

    Ok(())
}
