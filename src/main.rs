use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use lotto_check::config::LottoConfig;
use lotto_check::game::Game;
use lotto_check::lottery::{
    Envelope, TicketCheckRequest, drawing_envelope, prize_info_envelope, ticket_envelope,
};
use lotto_check::prize::describe_paytable;
use lotto_check::upstream::HttpUpstream;

const USAGE: &str = "usage:
  lotto_check draw     --game <powerball|megamillions> --date MM/DD/YYYY
  lotto_check prizes   --game <powerball|megamillions> --date MM/DD/YYYY
  lotto_check check    --game <...> --date MM/DD/YYYY --numbers a,b,c,d,e --bonus n [--multiplier n] [--jackpot text]
  lotto_check paytable --game <...>";

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            eprintln!("{USAGE}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<bool> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let command = args.first().cloned().ok_or_else(|| anyhow!("missing command"))?;
    let cfg = LottoConfig::from_env();

    match command.as_str() {
        "paytable" => {
            let game = required_arg(&args, "--game")?
                .parse::<Game>()
                .map_err(|err| anyhow!("{err}"))?;
            print_json(&describe_paytable(game, &cfg.default_jackpot))?;
            Ok(true)
        }
        "draw" => {
            let upstream = HttpUpstream::new(&cfg)?;
            let envelope = drawing_envelope(
                &upstream,
                &cfg,
                &required_arg(&args, "--date")?,
                &required_arg(&args, "--game")?,
            );
            emit(&envelope)
        }
        "prizes" => {
            let upstream = HttpUpstream::new(&cfg)?;
            let envelope = prize_info_envelope(
                &upstream,
                &cfg,
                &required_arg(&args, "--date")?,
                &required_arg(&args, "--game")?,
            );
            emit(&envelope)
        }
        "check" => {
            let req = TicketCheckRequest {
                date: required_arg(&args, "--date")?,
                game: required_arg(&args, "--game")?,
                primary: parse_numbers(&required_arg(&args, "--numbers")?)?,
                bonus: parse_u8(&required_arg(&args, "--bonus")?, "--bonus")?,
                multiplier: match arg_value(&args, "--multiplier") {
                    Some(raw) => parse_u8(&raw, "--multiplier")?,
                    None => 0,
                },
                jackpot: arg_value(&args, "--jackpot"),
            };
            let upstream = HttpUpstream::new(&cfg)?;
            emit(&ticket_envelope(&upstream, &cfg, &req))
        }
        other => Err(anyhow!("unknown command '{other}'")),
    }
}

fn emit<T: Serialize>(envelope: &Envelope<T>) -> Result<bool> {
    print_json(envelope)?;
    Ok(envelope.is_success())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if arg == flag {
            return args.get(idx + 1).cloned();
        }
        if let Some(rest) = arg.strip_prefix(flag).and_then(|r| r.strip_prefix('=')) {
            return Some(rest.to_string());
        }
    }
    None
}

fn required_arg(args: &[String], flag: &str) -> Result<String> {
    arg_value(args, flag).ok_or_else(|| anyhow!("missing {flag}"))
}

fn parse_numbers(raw: &str) -> Result<Vec<u8>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_u8(s, "--numbers"))
        .collect()
}

fn parse_u8(raw: &str, flag: &str) -> Result<u8> {
    raw.trim()
        .parse::<u8>()
        .with_context(|| format!("{flag}: '{raw}' is not a number in 0..=255"))
}
