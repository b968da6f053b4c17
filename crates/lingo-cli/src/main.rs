#![deny(
    clippy::disallowed_methods,
    clippy::suspicious,
    clippy::style,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

fn main() { entry::main(); }

mod entry {
    use anyhow::{Context, Result};
    use clap::Parser;
    use lingo::{Alphabet, Lol, Nondeterministic, Regex};
    use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

    #[derive(Debug, Parser)]
    #[command(version, author, about)]
    struct Opts {
        /// Print more verbose logs
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        /// Log filter, using env_logger-like syntax.  Overrides --verbose
        #[arg(long, env = "RUST_LOG", global = true)]
        log_filter: Option<String>,

        /// Symbols the automata are built over, in addition to those appearing
        /// in the expression
        #[arg(short, long, default_value = "ab", global = true)]
        alphabet: String,

        #[command(subcommand)]
        cmd: Command,
    }

    #[derive(Debug, clap::Subcommand)]
    enum Command {
        /// Print an expression in infix and postfix form, along with its
        /// structural properties
        Show {
            /// Expression, in postfix form
            re: String,
        },
        /// Test words against an expression using every available matcher
        Match {
            /// Expression, in postfix form
            re: String,

            /// Words to test
            #[arg(required = true)]
            words: Vec<String>,
        },
        /// List the shortest words matched by an expression
        Enumerate {
            /// Expression, in postfix form
            re: String,

            /// Maximum number of words to print
            #[arg(short = 'n', long, default_value_t = 20)]
            count: usize,

            /// Stop at the first word longer than this
            #[arg(long)]
            max_len: Option<usize>,
        },
        /// Print the left derivative of an expression by a word
        Deriv {
            /// Expression, in postfix form
            re: String,

            /// Word to differentiate by
            word: String,
        },
        /// Print the transition table of the deterministic machine for an
        /// expression
        Dfa {
            /// Expression, in postfix form
            re: String,
        },
    }

    #[inline]
    pub fn main() {
        let opts = Opts::parse();

        let registry = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr),
        );
        let level = match (cfg!(debug_assertions), opts.verbose) {
            (false, 0) => LevelFilter::INFO,
            (false, 1) | (true, 0) => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };

        match opts.log_filter.as_deref().map(EnvFilter::try_new) {
            Some(Ok(filter)) => registry.with(filter).init(),
            Some(Err(e)) => {
                registry.with(level).init();
                tracing::warn!("Ignoring invalid log filter: {e}");
            },
            None => registry.with(level).init(),
        }

        tracing::debug!("{opts:#?}");

        std::process::exit(run(opts).map_or_else(
            |e| {
                tracing::error!("{e:?}");
                1
            },
            |()| 0,
        ));
    }

    fn parse(re: &str) -> Result<Regex<char>> {
        re.parse()
            .with_context(|| format!("Error parsing expression {re:?}"))
    }

    fn alphabet_for(re: &Regex<char>, extra: &str) -> Alphabet<char> {
        re.literals().into_iter().chain(extra.chars()).collect()
    }

    #[inline]
    fn run(
        Opts {
            verbose: _,
            log_filter: _,
            alphabet,
            cmd,
        }: Opts,
    ) -> Result<()> {
        match cmd {
            Command::Show { re } => {
                show(&parse(&re)?);
                Ok(())
            },
            Command::Match { re, words } => check_words(&parse(&re)?, &alphabet, &words),
            Command::Enumerate { re, count, max_len } => {
                enumerate(&parse(&re)?, count, max_len);
                Ok(())
            },
            Command::Deriv { re, word } => {
                let re = word
                    .chars()
                    .fold(parse(&re)?, |re, c| re.derivative(&c));
                println!("{re}");
                Ok(())
            },
            Command::Dfa { re } => {
                let re = parse(&re)?;
                let (dfa, map) = re
                    .to_efsm(&alphabet_for(&re, &alphabet))
                    .determinize()
                    .atomize();

                let mut map: Vec<_> = map.into_iter().collect();
                map.sort_unstable_by_key(|&(_, id)| id);
                for (states, id) in map {
                    tracing::debug!(id, %states, "Subset state");
                }

                println!("{dfa}");
                Ok(())
            },
        }
    }

    fn show(re: &Regex<char>) {
        println!("infix:    {re}");
        println!("postfix:  {}", re.postfix());
        println!("size:     {}", re.size());
        println!("empty:    {}", re.is_empty_language());
        println!("unit:     {}", re.is_unit_language());
        println!("nullable: {}", re.is_bypassable());
        println!("infinite: {}", re.is_infinite());
    }

    fn check_words(re: &Regex<char>, alphabet: &str, words: &[String]) -> Result<()> {
        let dfa = re.to_efsm(&alphabet_for(re, alphabet)).determinize();
        tracing::debug!(states = dfa.len(), "Built automaton");
        let lang = re.denote();
        let mut agreed = true;

        for word in words {
            let syms: Vec<char> = word.chars().collect();
            let _s = tracing::debug_span!("check_word", word = word.as_str()).entered();

            let verdicts = [
                ("brute force", re.matches_brute_force(&syms)),
                ("continuation", re.matches_derivative(&syms)),
                ("derivative", re.matches_brzozowski(&syms)),
                ("denotation", lang.contains(&Lol::from(syms.clone()))),
                ("automaton", dfa.accepts(&syms)),
            ];
            let expected = verdicts[0].1;

            if verdicts.iter().all(|&(_, v)| v == expected) {
                println!("{word:?}: {}", if expected { "match" } else { "no match" });
            } else {
                tracing::error!(?verdicts, "Matchers disagree");
                agreed = false;
            }
        }

        if agreed {
            Ok(())
        } else {
            Err(anyhow::anyhow!("Stopping due to disagreeing matchers"))
        }
    }

    fn enumerate(re: &Regex<char>, count: usize, max_len: Option<usize>) {
        let words = re
            .denote()
            .iter()
            .take_while(|w| max_len.is_none_or(|m| w.len() <= m))
            .take(count);

        for word in words {
            println!("{word}");
        }
    }
}
