use anyhow::{bail, Result};
use std::env;
use std::process;

use wso_records::config::Config;
use wso_records::run::{run, RunOptions};

fn main() {
    env_logger::init();

    let opts = match parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            print_usage();
            process::exit(2);
        }
    };

    let config = Config::from_env();
    if let Err(e) = run(&opts, &config) {
        eprintln!("✗ Sync failed: {:#}", e);
        process::exit(1);
    }
}

fn parse_args() -> Result<RunOptions> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut wso = None;
    let mut source = None;
    let mut dry_run = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--wso" => {
                i += 1;
                wso = Some(take_value(&args, i, "--wso")?);
            }
            "--source" => {
                i += 1;
                source = Some(take_value(&args, i, "--source")?);
            }
            "--dry-run" => dry_run = true,
            other => bail!("Unknown argument {:?}", other),
        }
        i += 1;
    }

    let Some(wso) = wso else {
        bail!("--wso is required");
    };
    let Some(source) = source else {
        bail!("--source is required");
    };

    Ok(RunOptions {
        wso,
        source,
        dry_run,
    })
}

fn take_value(args: &[String], idx: usize, flag: &str) -> Result<String> {
    match args.get(idx) {
        Some(v) if !v.starts_with("--") => Ok(v.clone()),
        _ => bail!("{} requires a value", flag),
    }
}

fn print_usage() {
    eprintln!(
        "\nUsage: wso-records --wso <name> --source <url-or-path> [--dry-run]\n\n\
         Environment:\n\
         \x20 WSO_RECORDS_DB       SQLite database path (default: wso_records.db)\n\
         \x20 DISCORD_WEBHOOK_URL  Change-notification webhook (required unless --dry-run)"
    );
}
