//! Smoke-test CLI for `ctrlp-match`: reads candidate lines from stdin, ranks
//! them against a query, and prints the result. Not part of the library's
//! public API -- built only with `--features demo`.

use std::io::{BufRead, Write};

use clap::Parser;
use ctrlp_match::{ctrlp_match, CandidateSource, Error, HighlightMode, MatchMode, MatchRequest};

#[derive(Parser)]
#[command(name = "ctrlp-demo", about = "Rank stdin lines against a query")]
struct Args {
    /// The query to match candidates against.
    query: String,

    /// Maximum number of results to print. 0 means unlimited.
    #[arg(short, long, default_value_t = 20)]
    limit: usize,

    /// Treat candidates as plain strings instead of filesystem paths.
    #[arg(long)]
    no_path: bool,

    /// Currently open file, used for proximity scoring.
    #[arg(long)]
    cur_file: Option<String>,

    /// Highlight mode: none, basic, or detailed.
    #[arg(long, default_value = "detailed")]
    highlight: String,

    /// Worker thread count. 0 lets the driver pick.
    #[arg(long, default_value_t = 0)]
    threads: usize,
}

struct StdinSource {
    lines: std::io::Lines<std::io::StdinLock<'static>>,
    index: u32,
}

impl CandidateSource for StdinSource {
    type Handle = (u32, String);

    fn next(&mut self) -> Result<Option<(Vec<u8>, Self::Handle)>, Error> {
        match self.lines.next() {
            Some(Ok(line)) => {
                let handle = (self.index, line.clone());
                self.index += 1;
                Ok(Some((line.into_bytes(), handle)))
            }
            Some(Err(e)) => Err(Error::Host(e.to_string())),
            None => Ok(None),
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let highlight_mode = match HighlightMode::parse(&args.highlight) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let source = StdinSource { lines: std::io::stdin().lines(), index: 0 };

    let req = MatchRequest {
        limit: args.limit,
        mmode: MatchMode::FullLine,
        is_path: !args.no_path,
        cur_file: args.cur_file.map(String::into_bytes),
        highlight_mode,
        max_threads: args.threads,
        ..MatchRequest::default()
    };

    log::info!("matching against query {:?}", args.query);

    match ctrlp_match(source, args.query.as_bytes(), req) {
        Ok(response) => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for m in &response.matches {
                let (_, text) = &m.handle;
                if m.highlight_regexes.is_empty() {
                    let _ = writeln!(out, "{text}");
                } else {
                    let _ = writeln!(out, "{text}\t{}", m.highlight_regexes.join(" "));
                }
            }
        }
        Err(e) => {
            eprintln!("ctrlp-match error: {e}");
            std::process::exit(1);
        }
    }
}
