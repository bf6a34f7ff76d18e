use anyhow::Result;
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use rand::{rngs::StdRng, SeedableRng};
use util::repl;

use crate::{evaluator::Mode, prelude::*};

mod canon;
mod evaluator;
mod generator;
mod lang;
mod parser;
mod prelude;
mod rename;

fn build_report(e: Error) -> Report<Span> {
    use chumsky::error::SimpleReason;
    let report = Report::build(ReportKind::Error, (), e.span().start);
    match e.reason() {
        SimpleReason::Unexpected => {
            let found = e.found().map(String::as_str).unwrap_or("end of the input");
            let expected = e
                .expected()
                .map(|t| t.as_ref().map(String::as_str).unwrap_or("end of the input"))
                .collect::<Vec<_>>()
                .join(", ");
            let expected = if expected.is_empty() {
                "something else"
            } else {
                &expected
            };
            report
                .with_message(format!("Unexpected {found}, expected {expected}"))
                .with_label(
                    Label::new(e.span())
                        .with_message(format!("Unexpected {}", found.fg(Color::Red)))
                        .with_color(Color::Red),
                )
        }
        SimpleReason::Unclosed { span, delimiter } => report
            .with_message(format!("Unclosed delimiter {}", delimiter.fg(Color::Yellow)))
            .with_label(
                Label::new(span.clone())
                    .with_message(format!(
                        "Unclosed delimiter {}",
                        delimiter.fg(Color::Yellow)
                    ))
                    .with_color(Color::Yellow),
            ),
        SimpleReason::Custom(msg) => report.with_message(msg).with_label(
            Label::new(e.span())
                .with_message(format!("{}", msg.fg(Color::Red)))
                .with_color(Color::Red),
        ),
    }
    .finish()
}

type CommandResult<'a> = Result<(), (&'a str, Vec<Error>)>;

struct Repl;

impl Repl {
    fn tokenize(input: &str) -> CommandResult {
        let tokens = parser::tokenize(input)
            .map_err(|es| {
                (
                    input,
                    es.into_iter()
                        .map(|e| e.map(|e| e.to_string()))
                        .collect::<Vec<_>>(),
                )
            })?
            .iter()
            .map(Spanned::value)
            .cloned()
            .collect::<Vec<_>>();
        println!("{tokens:?}");
        Ok(())
    }

    fn parse(input: &str) -> CommandResult {
        let term = parser::parse_term(input).map_err(|es| (input, es))?;
        println!("{term}");
        Ok(())
    }

    fn free(input: &str) -> CommandResult {
        let term = parser::parse_term(input).map_err(|es| (input, es))?;
        let mut names = rename::free_variables(term.value())
            .into_iter()
            .map(|name| name.as_ref().clone())
            .collect::<Vec<_>>();
        names.sort();
        println!("{}", names.join(" "));
        Ok(())
    }

    fn rename(input: &str) -> CommandResult {
        let term = parser::parse_term(input).map_err(|es| (input, es))?;
        println!("{}", rename::alpha_rename(term.value()));
        Ok(())
    }

    fn canonicalize(input: &str) -> CommandResult {
        let term = parser::parse_term(input).map_err(|es| (input, es))?;
        println!(
            "{}",
            canon::alphabetize(&rename::alpha_rename(term.value()))
        );
        Ok(())
    }

    fn reduce(input: &str, mode: Mode) -> CommandResult {
        let term = parser::parse_term(input).map_err(|es| (input, es))?;
        let outcome = evaluator::reduce(term.value(), mode)
            .map_err(|e| (input, vec![Error::custom(term.span(), e.to_string())]))?;
        println!("{}", outcome.term);
        println!("[{} reduction steps]", outcome.steps);
        Ok(())
    }

    fn generate(input: &str) -> CommandResult {
        fn usage(input: &str) -> (&str, Vec<Error>) {
            (
                input,
                vec![Error::custom(
                    0..input.len(),
                    "usage: :gen depth [seed]".to_string(),
                )],
            )
        }
        let mut args = input.split_whitespace();
        let depth = args
            .next()
            .and_then(|arg| arg.parse::<usize>().ok())
            .ok_or_else(|| usage(input))?;
        let mut rng = match args.next() {
            Some(arg) => {
                let seed = arg.parse::<u64>().map_err(|_| usage(input))?;
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        println!("{}", generator::generate(&mut rng, depth));
        Ok(())
    }

    fn show_help() {
        println!(
            "{}",
            r#"
term                -- same as :evaluate term
:to | :tokenize     -- show the token stream
:p  | :parse        -- parse and print in canonical notation
:f  | :free         -- list the free variables
:a  | :rename       -- alpha-rename so every bound name is unique
:c  | :canon        -- alpha-rename and alphabetize
:e  | :evaluate     -- reduce under call-by-value, with step count
:l  | :lazy         -- reduce under call-by-name, with step count
:g  | :gen D [SEED] -- random source string of depth D (seedable)
:h  | :help         -- show this message
        "#
            .trim()
        );
    }

    fn handle_repl_input<'i>(&mut self, input: &'i str) -> CommandResult<'i> {
        let (cmd, input) = if let Some(stripped) = input.strip_prefix(':') {
            stripped
                .trim_start()
                .split_once(' ')
                .unwrap_or((stripped, ""))
        } else {
            ("", input)
        };
        match cmd {
            "to" | "tokenize" => Self::tokenize(input)?,
            "p" | "parse" => Self::parse(input)?,
            "f" | "free" => Self::free(input)?,
            "a" | "rename" => Self::rename(input)?,
            "c" | "canon" => Self::canonicalize(input)?,
            "" | "e" | "eval" | "evaluate" => Self::reduce(input, Mode::Eager)?,
            "l" | "lazy" => Self::reduce(input, Mode::Lazy)?,
            "g" | "gen" => Self::generate(input)?,
            "h" | "help" => Self::show_help(),
            _ => {
                eprintln!("Unknown command {cmd}");
                Self::show_help();
            }
        }
        Ok(())
    }
}

impl repl::Repl for Repl {
    type Error = anyhow::Error;
    const PROMPT: &'static str = "λ> ";
    const HISTORY: Option<&'static str> = Some("/tmp/lambda.history");
    fn evaluate(&mut self, input: String) -> Result<(), Self::Error> {
        if let Err((input, es)) = self.handle_repl_input(&input) {
            for e in es {
                build_report(e).eprint(Source::from(&input))?;
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    println!("An untyped lambda-calculus normalizer. :h shows the commands");
    println!();
    repl::start(Repl)?;
    Ok(())
}
