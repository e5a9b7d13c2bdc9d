use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use threegen::{
    CharacterClass, CharacterClasses, Config, Generator, LockPolicy, MAX_PASSWORD_LENGTH,
    write_password,
};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "THREEGEN_LOG";

#[derive(Parser)]
#[command(
    name = "threegen",
    version,
    about = "Pseudorandom password generator",
    after_help = "Supply -E to mix a line typed at the keyboard into the generator before drawing."
)]
struct Cli {
    /// Use lowercase characters
    #[arg(short, long)]
    lower: bool,

    /// Use uppercase characters
    #[arg(short, long)]
    upper: bool,

    /// Use digit characters
    #[arg(short, long)]
    digit: bool,

    /// Use symbol characters
    #[arg(short, long)]
    symbol: bool,

    /// Use all character sets
    #[arg(short, long)]
    all: bool,

    /// Print the password in blocks of five for easier reading
    #[arg(short, long)]
    format: bool,

    /// Supplement the generator with a passphrase typed at the keyboard
    #[arg(short = 'E', long)]
    entropy: bool,

    /// Refuse to run when secret memory cannot be locked into RAM
    #[arg(long)]
    strict_memlock: bool,

    /// Number of characters to generate
    #[arg(value_parser = clap::value_parser!(u64).range(1..=MAX_PASSWORD_LENGTH as u64))]
    length: u64,
}

impl Cli {
    fn classes(&self) -> CharacterClasses {
        if self.all {
            return CharacterClasses::ALL;
        }
        [
            (self.lower, CharacterClass::Lowercase),
            (self.upper, CharacterClass::Uppercase),
            (self.digit, CharacterClass::Digit),
            (self.symbol, CharacterClass::Symbol),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, class)| class)
        .collect()
    }

    fn config(&self) -> Result<Config> {
        let length = usize::try_from(self.length).context("Password length does not fit")?;
        let lock_policy = if self.strict_memlock {
            LockPolicy::Strict
        } else {
            LockPolicy::Permissive
        };

        Ok(Config::new(self.classes(), length)
            .with_format(self.format)
            .with_entropy(self.entropy)
            .with_lock_policy(lock_policy))
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = cli.config()?;

    Generator::system()
        .generate_with(&config, |password| {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_password(&mut out, password, config.format())?;
            out.flush()
        })
        .context("Failed to generate password")?
        .context("Failed to write password")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_single_class_flags() {
        let cli = Cli::try_parse_from(["threegen", "-d", "-s", "12"]).unwrap();
        let config = cli.config().unwrap();

        assert_eq!(config.length(), 12);
        assert!(config.classes().contains(CharacterClass::Digit));
        assert!(config.classes().contains(CharacterClass::Symbol));
        assert!(!config.classes().contains(CharacterClass::Lowercase));
        assert!(!config.format());
        assert!(!config.supplement_entropy());
        assert_eq!(config.lock_policy(), LockPolicy::Permissive);
    }

    #[test]
    fn test_all_and_switches() {
        let cli = Cli::try_parse_from([
            "threegen",
            "--all",
            "--format",
            "-E",
            "--strict-memlock",
            "25",
        ])
        .unwrap();
        let config = cli.config().unwrap();

        assert_eq!(config.classes(), CharacterClasses::ALL);
        assert!(config.format());
        assert!(config.supplement_entropy());
        assert_eq!(config.lock_policy(), LockPolicy::Strict);
    }

    #[test]
    fn test_no_class_reaches_core_as_empty() {
        let cli = Cli::try_parse_from(["threegen", "8"]).unwrap();
        assert!(cli.config().unwrap().classes().is_empty());
    }

    #[test]
    fn test_length_bounds() {
        assert!(Cli::try_parse_from(["threegen", "-a", "0"]).is_err());
        assert!(Cli::try_parse_from(["threegen", "-a", "126"]).is_err());
        assert!(Cli::try_parse_from(["threegen", "-a", "125"]).is_ok());
        assert!(Cli::try_parse_from(["threegen", "-a"]).is_err());
    }
}
