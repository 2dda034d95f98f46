use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{debug, LevelFilter};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use kasiski::{analyse, analysis::MAX_CIPHERTEXT_LEN, encoding, kasiski::Locator, vote, Config};

/// Estimate the key length of a Vigenere ciphertext by Kasiski examination
/// and print the letter histogram of every key column
#[derive(Parser)]
#[command(name = "vigenere-kasiski", version)]
struct Cli {
    /// Ciphertext file of uppercase letters A-Z, "-" reads stdin
    input: PathBuf,
    #[arg(long)]
    debug: bool,
    /// Strip everything but letters and upper-case the rest before analysis
    #[arg(long)]
    clean: bool,
    #[arg(long, value_enum, default_value = "exhaustive")]
    locator: LocatorArg,
    /// Largest candidate key length to tally
    #[arg(long, default_value_t = vote::DEFAULT_MAX_KEY_LENGTH)]
    max_key_length: usize,
    /// Longest ciphertext accepted
    #[arg(long, default_value_t = MAX_CIPHERTEXT_LEN)]
    max_len: usize,
    /// Also print the index of coincidence of every column
    #[arg(long)]
    coincidence: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LocatorArg {
    Exhaustive,
    Indexed,
    Parallel,
}

impl From<LocatorArg> for Locator {
    fn from(arg: LocatorArg) -> Self {
        match arg {
            LocatorArg::Exhaustive => Locator::Exhaustive,
            LocatorArg::Indexed => Locator::Indexed,
            #[cfg(feature = "parallel")]
            LocatorArg::Parallel => Locator::Parallel,
            // without a thread pool the indexed scan is the fast path
            #[cfg(not(feature = "parallel"))]
            LocatorArg::Parallel => Locator::Indexed,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(&cli) {
        eprintln!("error: {:#}", err);
        process::exit(exit_code(&err));
    }
}

fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    builder.format_timestamp(None);
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::new(cli.max_key_length, cli.locator.into(), cli.max_len)?;
    let raw = read_input(&cli.input)?;

    let ciphertext = if cli.clean {
        encoding::clean(&raw)
    } else {
        encoding::trim(&raw).to_vec()
    };
    debug!(
        "read {} bytes from {}, {} after normalising",
        raw.len(),
        cli.input.display(),
        ciphertext.len()
    );

    let analysis = analyse(&ciphertext, &config)?;

    print!("{}", analysis);
    if cli.coincidence {
        print!("\n{}", analysis.coincidence());
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read ciphertext from stdin")?;
        return Ok(buf);
    }

    fs::read(path).with_context(|| format!("failed to read ciphertext from {}", path.display()))
}

/// Library errors carry their own exit code, anything else is an unreadable input
fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<kasiski::Error>()
        .map_or(1, |e| e.exit_code())
}
