//! CLI smoke entry point.
//!
//! # Responsibility
//! - Build one entry from `name=value` arguments and print its canonical form.
//! - Keep output deterministic for quick local sanity checks.
//!
//! `type=<name>` sets the entry type; every other pair is stored as a field.
//! `BIBENTRY_CONFIG` may name a JSON `CoreConfig` file; its keyword delimiter
//! splits the `keywords` argument and its timestamp preferences stamp the
//! entry. `BIBENTRY_LOG_DIR` supplies a log directory when the config has none.

use bibentry_core::{
    default_log_level, init_logging_from, CoreConfig, Entry, EntryType, Field, LoggingConfig,
    StandardField,
};
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("bibentry: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_logging_from(&config) {
        eprintln!("bibentry logging disabled: {err}");
    }

    match build_entry(std::env::args().skip(1), &config) {
        Ok(entry) => {
            info!(
                "event=cli_entry_built module=cli status=ok field_count={}",
                entry.fields().len()
            );
            print_summary(&entry, &config);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("bibentry: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> Result<CoreConfig, String> {
    let mut config = match std::env::var("BIBENTRY_CONFIG") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|err| format!("cannot read config `{path}`: {err}"))?;
            CoreConfig::from_json_str(&json).map_err(|err| format!("config `{path}`: {err}"))?
        }
        Err(_) => CoreConfig::default(),
    };
    if config.logging.is_none() {
        if let Ok(log_dir) = std::env::var("BIBENTRY_LOG_DIR") {
            config.logging = Some(LoggingConfig {
                level: default_log_level().to_string(),
                log_dir,
            });
        }
    }
    Ok(config)
}

fn build_entry(args: impl Iterator<Item = String>, config: &CoreConfig) -> Result<Entry, String> {
    let delimiter = config.keyword_delimiter;
    let mut entry = Entry::new();
    for arg in args {
        let (name, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected name=value, got `{arg}`"))?;
        if name.trim().eq_ignore_ascii_case("type") {
            entry.set_type(EntryType::parse(value));
            continue;
        }
        let field = Field::parse(name).map_err(|err| format!("`{arg}`: {err}"))?;
        if field == Field::Standard(StandardField::Keywords) {
            entry.add_keywords(value.split(delimiter), delimiter);
            continue;
        }
        entry.set_field(field, value);
    }
    entry.apply_timestamp(&config.timestamps);
    Ok(entry)
}

fn print_summary(entry: &Entry, config: &CoreConfig) {
    let delimiter = config.keyword_delimiter;
    println!("bibentry_core version={}", bibentry_core::core_version());
    println!("{entry}");
    let date = entry
        .field_or_alias(&Field::Standard(StandardField::Date))
        .unwrap_or_else(|| "N/A".to_string());
    println!("date={date}");
    println!("keywords={}", entry.keywords(delimiter).len());
    println!("summary={}", entry.author_title_year(80));
}
