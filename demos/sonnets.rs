use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info};
use masktrie::rhyme::{most_common_rhyme_scheme, RhymeDictionary};
use masktrie::RhymeError;

/// Report the most common rhyme scheme in each sonnet collection.
#[derive(Parser, Debug)]
#[clap(name = "sonnets", about)]
struct Args {
    /// Phonetic dictionary, one `WORD PH ON EM ES` entry per line
    #[clap(short, long, value_parser, default_value = "dictionary.txt")]
    dictionary: PathBuf,

    /// Sonnet collections to analyse
    #[clap(value_parser, default_values = ["shakespeare.txt", "spenser.txt", "petrarch.txt"])]
    sonnets: Vec<PathBuf>,
}

fn run(args: &Args) -> Result<(), RhymeError> {
    let dictionary = RhymeDictionary::from_path(&args.dictionary)?;
    info!(
        "{} words, {} rhymes in {}",
        dictionary.len(),
        dictionary.rhyme_count(),
        args.dictionary.display()
    );

    for path in &args.sonnets {
        let file = File::open(path)?;
        let scheme = most_common_rhyme_scheme(BufReader::new(file), &dictionary)?;
        println!(
            "The most common rhyme scheme of sonnets from {} is: {}",
            path.display(),
            scheme.as_deref().unwrap_or("N/A")
        );
    }
    Ok(())
}

fn main() {
    let _ = env_logger::builder().format_timestamp(None).try_init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}
