// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;
mod view;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use runtime::Action;
use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::thread;
use taskcal_app::{Calendar, FilterSelector, MonthView, TaskId};
use taskcal_client::Client;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `taskcal --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    init_logging(config.log_level())?;

    let client = Client::new(
        config.base_url(),
        config.timeout()?,
        config.cookie().as_deref(),
        config.csrf_cookie(),
    )
    .with_context(|| {
        format!(
            "invalid [backend] config in {}; fix base_url/timeout values",
            options.config_path.display()
        )
    })?;
    if options.check_only {
        return client.ping();
    }

    let view = resolve_month(options.month, options.year)?;
    let filter = options.filter.unwrap_or_else(|| config.default_filter());
    let mut calendar = Calendar::new(client, view, config.sync_settings()?);
    calendar.set_filter(filter);

    let outcome = runtime::execute(&mut calendar, options.action, thread::sleep);
    for notice in calendar.take_notices() {
        eprintln!("{}", view::notice_line(&notice));
    }
    print!("{}", outcome?);
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|error| anyhow!("invalid RUST_LOG / log.level filter {level:?}: {error}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(error) = init_result {
        debug!(%error, "tracing subscriber already set, continuing");
    }
    Ok(())
}

/// Missing parts default to the current month and year.
fn resolve_month(month: Option<u8>, year: Option<i32>) -> Result<MonthView> {
    let current = MonthView::current();
    let month = month.unwrap_or_else(|| current.month_number());
    let year = year.unwrap_or(current.year);
    MonthView::from_numbers(month, year)
        .ok_or_else(|| anyhow!("--month must be between 1 and 12, got {month}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    month: Option<u8>,
    year: Option<i32>,
    filter: Option<FilterSelector>,
    action: Action,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        month: None,
        year: None,
        filter: None,
        action: Action::ShowMonth,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let arg = arg.as_ref();
        match arg {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--month" => {
                options.month = Some(parse_value(arg, iter.next(), "a month number (1-12)")?);
            }
            "--year" => {
                options.year = Some(parse_value(arg, iter.next(), "a year such as 2026")?);
            }
            "--filter" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--filter requires a filter name"))?;
                let selector = FilterSelector::parse(value.as_ref()).ok_or_else(|| {
                    anyhow!(
                        "unknown filter {:?}; use one of all, pending, done, overdue, high",
                        value.as_ref()
                    )
                })?;
                options.filter = Some(selector);
            }
            "--toggle" => {
                let id: i64 = parse_value(arg, iter.next(), "a task id")?;
                set_action(&mut options, Action::Toggle(TaskId::new(id)))?;
            }
            "--delete" => {
                let id: i64 = parse_value(arg, iter.next(), "a task id")?;
                set_action(&mut options, Action::Delete(TaskId::new(id)))?;
            }
            "--day" => {
                let day = parse_value(arg, iter.next(), "a day of the month")?;
                set_action(&mut options, Action::Day(day))?;
            }
            "--categories" => {
                set_action(&mut options, Action::Categories)?;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    Ok(options)
}

fn parse_value<T, S>(flag: &str, value: Option<S>, expected: &str) -> Result<T>
where
    T: std::str::FromStr,
    S: AsRef<str>,
{
    let value = value.ok_or_else(|| anyhow!("{flag} requires {expected}"))?;
    value
        .as_ref()
        .trim()
        .parse()
        .map_err(|_| anyhow!("{flag} expects {expected}, got {:?}", value.as_ref()))
}

fn set_action(options: &mut CliOptions, action: Action) -> Result<()> {
    if options.action != Action::ShowMonth {
        bail!("use only one of --toggle, --delete, --day, --categories");
    }
    options.action = action;
    Ok(())
}

fn print_help() {
    println!("taskcal - task calendar client");
    println!("  --config <path>          Use a specific config path");
    println!("  --month <1-12>           Month to load (default: current)");
    println!("  --year <year>            Year to load (default: current)");
    println!("  --filter <name>          all, pending, done, overdue or high");
    println!("  --toggle <id>            Complete or reopen a task");
    println!("  --delete <id>            Delete a task");
    println!("  --day <day>              List the tasks due on one day");
    println!("  --categories             List categories");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config and reach the backend");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args, resolve_month};
    use crate::runtime::Action;
    use anyhow::Result;
    use std::path::PathBuf;
    use taskcal_app::{FilterSelector, MonthView, TaskId};
    use time::Month;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/taskcal-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                month: None,
                year: None,
                filter: None,
                action: Action::ShowMonth,
                print_config_path: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_config_value() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_reads_month_year_and_filter() -> Result<()> {
        let options = parse_cli_args(
            vec!["--month", "5", "--year", "2026", "--filter", "high-priority"],
            default_options_path(),
        )?;
        assert_eq!(options.month, Some(5));
        assert_eq!(options.year, Some(2026));
        assert_eq!(options.filter, Some(FilterSelector::HighPriority));
        Ok(())
    }

    #[test]
    fn parse_cli_args_rejects_bad_values() {
        let month = parse_cli_args(vec!["--month", "may"], default_options_path())
            .expect_err("non-numeric month should fail");
        assert!(month.to_string().contains("--month expects a month number"));

        let filter = parse_cli_args(vec!["--filter", "urgent"], default_options_path())
            .expect_err("unknown filter should fail");
        assert!(filter.to_string().contains("unknown filter"));

        let toggle = parse_cli_args(vec!["--toggle"], default_options_path())
            .expect_err("missing id should fail");
        assert!(toggle.to_string().contains("--toggle requires a task id"));
    }

    #[test]
    fn parse_cli_args_sets_one_action() -> Result<()> {
        let toggle = parse_cli_args(vec!["--toggle", "7"], default_options_path())?;
        assert_eq!(toggle.action, Action::Toggle(TaskId::new(7)));

        let day = parse_cli_args(vec!["--day", "14"], default_options_path())?;
        assert_eq!(day.action, Action::Day(14));

        let categories = parse_cli_args(vec!["--categories"], default_options_path())?;
        assert_eq!(categories.action, Action::Categories);

        let error = parse_cli_args(
            vec!["--toggle", "7", "--delete", "8"],
            default_options_path(),
        )
        .expect_err("two actions should fail");
        assert!(error.to_string().contains("only one of"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn resolve_month_validates_range() -> Result<()> {
        assert_eq!(
            resolve_month(Some(2), Some(2027))?,
            MonthView::new(2027, Month::February)
        );
        let error = resolve_month(Some(13), Some(2026)).expect_err("month 13 should fail");
        assert!(error.to_string().contains("between 1 and 12"));
        Ok(())
    }
}
