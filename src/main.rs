use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use regex::Regex;
use tracing_subscriber::EnvFilter;

use fieldcrypt::crypto::{create_cryptor, CryptorOptions};
use fieldcrypt::{decode_document, encode_document, transform, Format, Mode, Path};

#[derive(Parser)]
#[command(
    name = "fieldcrypt",
    version,
    about = "Selective field encryption for JSON, YAML, TOML and plain-text documents",
    long_about = "fieldcrypt encrypts or decrypts scalar fields inside a structured \
                  document while preserving each field's original data type. Fields \
                  are selected by matching a regular expression against their \
                  slash-separated path (e.g. \"user/items/0/name\")."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt matching fields of a document
    Encrypt(RunArgs),

    /// Decrypt matching fields of an encrypted document
    Decrypt(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// File path to read instead of stdin
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// File path to write instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Document format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Scope the run to one sub-field (e.g. "user/items")
    #[arg(long)]
    field: Option<String>,

    /// Regular expression selecting field paths; matches every field by default
    #[arg(short, long, default_value = "")]
    pattern: String,

    /// Cryptor backend: "password" or "aws-kms"
    #[arg(long, default_value = "password")]
    cryptor: String,

    /// AWS region (required when cryptor is aws-kms)
    #[arg(long)]
    aws_region: Option<String>,

    /// AWS KMS key id (required when encrypting with aws-kms)
    #[arg(long)]
    aws_key_id: Option<String>,

    /// Password for the password backend; prompts interactively if unset
    #[arg(long, env = "FIELDCRYPT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Mark matching fields instead of transforming them
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Encrypt(args) => run(Mode::Encrypt, args),
        Commands::Decrypt(args) => run(Mode::Decrypt, args),
    }
}

fn run(mode: Mode, args: RunArgs) -> Result<()> {
    let mode = if args.dry_run { Mode::DryRun } else { mode };

    let input = read_input(args.file.as_deref())?;
    let mut document = decode_document(args.format, &input)?;

    let pattern = Regex::new(&args.pattern).map_err(fieldcrypt::FieldcryptError::from)?;
    let cryptor = create_cryptor(
        &args.cryptor,
        &CryptorOptions {
            password: resolve_password(&args)?,
            aws_region: args.aws_region.clone(),
            aws_key_id: args.aws_key_id.clone(),
        },
    )?;

    let target = match &args.field {
        Some(field) => document.get_mut(&Path::parse(field)?)?,
        None => &mut document,
    };
    transform(target, &pattern, cryptor.as_ref(), mode)?;

    write_output(args.output.as_deref(), &encode_document(args.format, &document)?)?;
    Ok(())
}

/// Resolve the password for the password backend, preferring the
/// FIELDCRYPT_PASSWORD environment variable over an interactive prompt
fn resolve_password(args: &RunArgs) -> Result<Option<String>> {
    if args.cryptor != "password" {
        return Ok(args.password.clone());
    }
    match &args.password {
        Some(password) => Ok(Some(password.clone())),
        None => Ok(Some(rpassword::prompt_password("Password: ")?)),
    }
}

fn read_input(file: Option<&std::path::Path>) -> Result<String> {
    match file {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn write_output(file: Option<&std::path::Path>, text: &str) -> Result<()> {
    match file {
        Some(path) => fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}
