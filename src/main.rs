//! keyprompt - Interactive prompts for shell scripts
//!
//! Asks a single question on the controlling terminal. The prompt is drawn on stderr
//! and the answer printed on stdout.

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use keyprompt::{
    ConfirmPrompt, MaskedPrompt, ModeControl, NumberPrompt, SystemTerminal, TextPrompt, Theme,
};
use std::io::{self, BufRead, Write};

fn cli() -> Command {
    Command::new("keyprompt")
        .version(keyprompt::VERSION)
        .about("Ask an interactive question and print the answer")
        .long_about(
            "keyprompt reads keystrokes in raw mode, validates input as it is typed and \
             reports problems on a single line beneath the prompt. The prompt is drawn on \
             stderr and the answer printed on stdout, so it can be captured by scripts.",
        )
        .subcommand_required(true)
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Render without colors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("text")
                .about("Ask for a line of text")
                .arg(Arg::new("message").required(true).index(1))
                .arg(Arg::new("default").long("default").short('d'))
                .arg(
                    Arg::new("min-length")
                        .long("min-length")
                        .value_parser(value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("password")
                .about("Ask for a secret without echoing it")
                .arg(Arg::new("message").required(true).index(1))
                .arg(
                    Arg::new("mask")
                        .long("mask")
                        .value_parser(value_parser!(char))
                        .default_value("*"),
                )
                .arg(
                    Arg::new("required")
                        .long("required")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("number")
                .about("Ask for a non-negative integer; arrow keys step the value")
                .arg(Arg::new("message").required(true).index(1))
                .arg(
                    Arg::new("default")
                        .long("default")
                        .short('d')
                        .value_parser(value_parser!(u64))
                        .default_value("0"),
                )
                .arg(
                    Arg::new("min")
                        .long("min")
                        .value_parser(value_parser!(u64)),
                )
                .arg(
                    Arg::new("max")
                        .long("max")
                        .value_parser(value_parser!(u64)),
                )
                .arg(
                    Arg::new("max-digits")
                        .long("max-digits")
                        .value_parser(value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("confirm")
                .about("Ask a yes/no question; exits non-zero on no")
                .arg(Arg::new("message").required(true).index(1))
                .arg(
                    Arg::new("yes")
                        .long("default-yes")
                        .short('y')
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn load_theme(matches: &ArgMatches) -> Result<Theme> {
    if matches.get_flag("no-color") {
        return Ok(Theme::monochrome());
    }

    #[cfg(feature = "config")]
    {
        Theme::load().context("Failed to load theme")
    }
    #[cfg(not(feature = "config"))]
    {
        Ok(Theme::default())
    }
}

fn message(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("message")
        .cloned()
        .unwrap_or_default()
}

/// Range check used by `number --min/--max`.
fn range_message(value: u64, min: Option<u64>, max: Option<u64>) -> String {
    match (min, max) {
        (Some(min), _) if value < min => format!("Must be at least {min}"),
        (_, Some(max)) if value > max => format!("Must be at most {max}"),
        _ => String::new(),
    }
}

/// An accepted answer and whether the command should exit successfully.
#[derive(Debug, PartialEq, Eq)]
struct Answer {
    text: String,
    success: bool,
}

impl Answer {
    fn accepted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }
}

/// Run the prompt selected by `matches`, drawing it on `ui` and reading keys from
/// `input`. The answer is returned instead of written so it can go to its own stream.
fn ask<R, W, M>(
    matches: &ArgMatches,
    theme: Theme,
    input: R,
    ui: W,
    mode: &mut M,
) -> Result<Answer>
where
    R: BufRead,
    W: Write,
    M: ModeControl,
{
    let answer = match matches.subcommand() {
        Some(("text", args)) => {
            let min_length = args.get_one::<usize>("min-length").copied();
            let mut prompt = TextPrompt::new(message(args)).theme(theme);
            if let Some(default) = args.get_one::<String>("default") {
                prompt = prompt.default(default.clone());
            }
            if let Some(min) = min_length {
                prompt = prompt.validator(move |value: &str| {
                    if value.chars().count() < min {
                        format!("Must be at least {min} characters")
                    } else {
                        String::new()
                    }
                });
            }
            let value = prompt.interact_on(input, ui).context("Text prompt failed")?;
            Answer::accepted(value)
        }
        Some(("password", args)) => {
            let mask = args.get_one::<char>("mask").copied().unwrap_or('*');
            let value = MaskedPrompt::new(message(args))
                .mask(mask)
                .required(args.get_flag("required"))
                .theme(theme)
                .interact_on(input, ui, mode)
                .context("Password prompt failed")?;
            Answer::accepted(value)
        }
        Some(("number", args)) => {
            let min = args.get_one::<u64>("min").copied();
            let max = args.get_one::<u64>("max").copied();
            let mut prompt = NumberPrompt::new(message(args))
                .default(args.get_one::<u64>("default").copied().unwrap_or(0))
                .validator(move |value: &u64| range_message(*value, min, max))
                .theme(theme);
            if let Some(digits) = args.get_one::<usize>("max-digits") {
                prompt = prompt.max_digits(*digits);
            }
            let value = prompt
                .interact_on(input, ui, mode)
                .context("Number prompt failed")?;
            Answer::accepted(value.to_string())
        }
        Some(("confirm", args)) => {
            let yes = ConfirmPrompt::new(message(args))
                .default(args.get_flag("yes"))
                .theme(theme)
                .interact_on(input, ui)
                .context("Confirm prompt failed")?;
            Answer {
                text: if yes { "yes" } else { "no" }.to_string(),
                success: yes,
            }
        }
        Some((other, _)) => bail!("Unknown subcommand: {other}"),
        None => bail!("No subcommand given"),
    };
    Ok(answer)
}

fn main() -> Result<()> {
    // Initialize logging for development
    env_logger::init();

    let matches = cli().get_matches();
    let theme = load_theme(&matches)?;

    // The prompt is drawn on stderr so stdout carries nothing but the answer.
    let stdin = io::stdin();
    let stderr = io::stderr();
    let answer = ask(
        &matches,
        theme,
        stdin.lock(),
        stderr.lock(),
        &mut SystemTerminal,
    )?;

    println!("{}", answer.text);
    if !answer.success {
        std::process::exit(1);
    }
    Ok(())
}
