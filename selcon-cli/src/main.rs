//! selcon CLI
//!
//! Parse CSS selectors and decide whether one selector contains another.
//!
//! `selcon contains` reports its answer through the exit status as well:
//! 0 when contained, 2 when not contained, 3 when unknown. Errors exit 1.

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use selcon_common::warning::set_enabled;
use selcon_selectors::{
    Containment, DEFAULT_MAX_COMPOUNDS, DEFAULT_MAX_LEN, ParseOptions, Selector, normalize,
};

/// selcon: static containment between CSS selectors
#[derive(Parser, Debug)]
#[command(name = "selcon")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the canonical form of a selector
    selcon parse 'div  >  a:nth-child(odd)'

    # Dump the parsed tree as JSON
    selcon parse --json 'nav a, .menu > li'

    # Resolve escapes and strip comments
    selcon normalize '.a\.b /* note */'

    # Does the first selector match everything the second one matches?
    selcon contains 'div a' 'div > p > a.nav'
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Maximum number of compound selectors in one complex selector
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_COMPOUNDS)]
    max_compounds: usize,

    /// Maximum length of the normalized selector text, in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_LEN)]
    max_len: usize,

    /// Do not print diagnostics for cases that cannot be decided
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a selector and print its canonical form
    Parse {
        /// The selector to parse
        selector: String,

        /// Print the parsed tree as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Print a selector after escape normalization
    Normalize {
        /// The raw selector text
        selector: String,
    },

    /// Check whether CONTAINER matches every element CANDIDATE matches
    Contains {
        /// The selector expected to be more general
        container: String,

        /// The selector expected to be more specific
        candidate: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    set_enabled(!cli.quiet);

    let options = ParseOptions::default()
        .with_max_compounds(cli.max_compounds)
        .with_max_len(cli.max_len);

    match cli.command {
        Command::Parse { selector, json } => {
            let parsed = parse(&selector, &options)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            } else {
                println!("{parsed}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Normalize { selector } => {
            println!("{}", normalize(&selector));
            Ok(ExitCode::SUCCESS)
        }
        Command::Contains {
            container,
            candidate,
        } => {
            let outcome = parse(&container, &options)?
                .contains(&parse(&candidate, &options)?)
                .with_context(|| format!("cannot compare `{container}` with `{candidate}`"))?;
            print_outcome(outcome);
            Ok(exit_code(outcome))
        }
    }
}

fn parse(text: &str, options: &ParseOptions) -> anyhow::Result<Selector> {
    Selector::parse_with(text, options).with_context(|| format!("failed to parse `{text}`"))
}

fn print_outcome(outcome: Containment) {
    match outcome {
        Containment::Contained => println!("{}", outcome.green()),
        Containment::NotContained => println!("{}", outcome.red()),
        Containment::Unknown => println!("{}", outcome.yellow()),
    }
}

fn exit_code(outcome: Containment) -> ExitCode {
    match outcome {
        Containment::Contained => ExitCode::SUCCESS,
        Containment::NotContained => ExitCode::from(2),
        Containment::Unknown => ExitCode::from(3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::parse_from([
            "selcon",
            "contains",
            "a",
            "b",
            "--max-compounds",
            "4",
            "-q",
        ]);
        assert_eq!(cli.max_compounds, 4);
        assert_eq!(cli.max_len, DEFAULT_MAX_LEN);
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Command::Contains { ref container, ref candidate }
                if container == "a" && candidate == "b"
        ));
    }
}
