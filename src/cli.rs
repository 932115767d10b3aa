//! Command-line argument parsing for the `solar-quote` binary.

use std::env;
use std::path::PathBuf;

use crate::quote::QuoteInputs;
use crate::tariff::{SURCHARGE_PRESETS, surcharge_preset};

/// Parsed command-line options.
#[derive(Debug)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub inputs: QuoteInputs,
    pub csv_out: Option<PathBuf>,
    pub serve: bool,
    pub port: u16,
}

/// Outcome of parsing: either options to run with, or a request for help.
#[derive(Debug)]
pub enum Command {
    Run(CliOptions),
    Help,
}

pub fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

/// Parses arguments (without the program name).
///
/// Returns `Err` with a message naming the offending flag on bad input.
pub fn parse_args_from(args: &[String]) -> Result<Command, String> {
    let mut opts = CliOptions {
        config: None,
        preset: None,
        inputs: QuoteInputs::default(),
        csv_out: None,
        serve: false,
        port: 3000,
    };
    let mut bill_given = false;
    let mut surcharge_given = false;

    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--help" | "-h" => return Ok(Command::Help),
            "--serve" => opts.serve = true,
            _ => {
                i += 1;
                let value = args.next_or_err(i, flag)?;
                match flag {
                    "--bill" => {
                        opts.inputs.bill_amount = parse_number(flag, value)?;
                        bill_given = true;
                    }
                    "--surcharge" => {
                        if surcharge_given {
                            return Err("surcharge given more than once".to_string());
                        }
                        opts.inputs.surcharge_rate = parse_number(flag, value)?;
                        surcharge_given = true;
                    }
                    "--surcharge-preset" => {
                        if surcharge_given {
                            return Err("surcharge given more than once".to_string());
                        }
                        let preset = surcharge_preset(value).ok_or_else(|| {
                            let keys: Vec<&str> = SURCHARGE_PRESETS.iter().map(|p| p.key).collect();
                            format!(
                                "unknown surcharge preset \"{value}\", available: {}",
                                keys.join(", ")
                            )
                        })?;
                        opts.inputs.surcharge_rate = preset.rate;
                        surcharge_given = true;
                    }
                    "--config" => {
                        if opts.config.replace(PathBuf::from(value)).is_some() {
                            return Err("--config provided more than once".to_string());
                        }
                    }
                    "--preset" => {
                        if opts.preset.replace(value.to_string()).is_some() {
                            return Err("--preset provided more than once".to_string());
                        }
                    }
                    "--peak-hours" => {
                        let hours: f64 = parse_number(flag, value)?;
                        if hours <= 0.0 {
                            return Err(format!("{flag} must be > 0, got {value}"));
                        }
                        opts.inputs.peak_sun_hours = hours;
                    }
                    "--self-consumption" => {
                        let pct: f64 = parse_number(flag, value)?;
                        if !(0.0..=100.0).contains(&pct) {
                            return Err(format!("{flag} must be in [0, 100], got {value}"));
                        }
                        opts.inputs.self_consumption_percent = pct;
                    }
                    "--discount" => opts.inputs.discount_percent = parse_number(flag, value)?,
                    "--rebate" => opts.inputs.fixed_rebate = parse_number(flag, value)?,
                    "--campaign" => opts.inputs.campaign_deduction = parse_number(flag, value)?,
                    "--bank" => opts.inputs.bank = value.to_string(),
                    "--months" => opts.inputs.duration_months = parse_number(flag, value)?,
                    "--csv-out" => opts.csv_out = Some(PathBuf::from(value)),
                    "--port" => opts.port = parse_number(flag, value)?,
                    other => return Err(format!("unknown argument: {other}")),
                }
            }
        }
        i += 1;
    }

    if opts.config.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }
    if !bill_given && !opts.serve {
        return Err("missing --bill (monthly bill amount in RM)".to_string());
    }

    Ok(Command::Run(opts))
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("{flag} value \"{value}\" is not a valid number"))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, flag: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, flag: &str) -> Result<&str, String> {
        if !flag.starts_with("--") {
            return Err(format!("unknown argument: {flag}"));
        }
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| format!("missing value for {flag}"))
    }
}

pub fn print_usage() {
    eprintln!("solar-quote - estimate usage from a bill and quote a solar system");
    eprintln!();
    eprintln!("Usage: solar-quote --bill <RM> [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --bill <RM>                 Monthly bill amount");
    eprintln!("  --surcharge <RM/kWh>        AFA surcharge rate, negative for a rebate");
    eprintln!("  --surcharge-preset <name>   rebate | neutral | surcharge");
    eprintln!("  --config <path>             Load tariff and price tables from TOML");
    eprintln!("  --preset <name>             Built-in tables (tnb_2025, no_eei)");
    eprintln!("  --peak-hours <h>            Peak sun hours per day (default 3.4)");
    eprintln!("  --self-consumption <pct>    Daytime share of usage (default 30)");
    eprintln!("  --discount <pct>            Requested discount percent");
    eprintln!("  --rebate <RM>               Requested fixed rebate");
    eprintln!("  --campaign <RM>             Campaign deduction");
    eprintln!("  --bank <name>               Installment bank (default \"MBB (Maybank)\")");
    eprintln!("  --months <n>                Installment duration (default 60)");
    eprintln!("  --csv-out <path>            Write the quote as CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                     Start the REST API instead of quoting once");
        eprintln!("  --port <u16>                API server port (default: 3000)");
    }
    eprintln!("  --help                      Show this help message");
}
