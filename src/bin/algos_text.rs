use algos::stdin::read_words;
use algos::text::anagrams;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;

/// Text related algorithms.
///
/// All subcommands read their input from stdin and print JSON to stdout:
///
///   echo "the elbow on the arc is below the car" | algos-text anagrams
#[derive(Parser)]
#[command(name = "algos-text", version, about = "Text related algorithms")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find words which are anagrams of each other in the stdin input
    Anagrams,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Anagrams => {
            let words = read_words(io::stdin().lock())?;
            let groups = anagrams(&words);
            println!("{}", serde_json::to_string(&groups)?);
        }
    }

    Ok(())
}
