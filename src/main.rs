mod config;

use std::{io::Write, path::PathBuf, process::ExitCode, str::FromStr, time::Duration};

use chrono::Local;
use clap::{Parser, Subcommand};
use colored::{Color, Colorize};
use config::Config;
use ipset_runner::{
    Entry, HashFamily, IpSet, IpSetInterface, LockGuard, Locker, Result, Runner, SetType,
};
use log::{LevelFilter, debug, error};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable timestamp in logs (overrides config file setting)
    #[arg(short, long)]
    timestamp: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a set, defaults come from the [set] config section
    Create {
        name: String,
        /// Set type, e.g. hash:ip
        #[arg(long = "type")]
        set_type: Option<String>,
        /// inet or inet6
        #[arg(long)]
        family: Option<String>,
        #[arg(long)]
        hashsize: Option<i64>,
        #[arg(long)]
        maxelem: Option<i64>,
        /// Enable per-entry comments
        #[arg(long)]
        comment: bool,
        /// Do not fail if the set already exists
        #[arg(long)]
        exist: bool,
    },
    /// Destroy a set
    Destroy { name: String },
    /// List the names of all sets
    List,
    /// List the entries of a set
    Entries { name: String },
    /// Show the specification of a set
    Describe { name: String },
    /// Add an entry to a set
    Add {
        name: String,
        element: String,
        #[arg(long)]
        comment: Option<String>,
        /// Do not fail if the entry is already added
        #[arg(long)]
        exist: bool,
    },
    /// Delete an entry from a set
    Del { name: String, element: String },
    /// Run create, add, list, delete and destroy against a scratch set
    Smoke {
        #[arg(default_value = "foo")]
        name: String,
    },
}

fn main() -> ExitCode {
    // Parse CLI args
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load configuration file: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    // CLI timestamp option overrides config file setting
    config.log.timestamp = cli.timestamp || config.log.timestamp;

    // Initialize logger
    init_logger(
        config.log.timestamp,
        LevelFilter::from_str(&config.log.level).unwrap_or(LevelFilter::Info),
    );
    debug!("LOADED CONFIGURATION: {:?}", &config);

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &Config) -> Result<()> {
    let runner = Runner::system().with_command(&config.ipset.command);

    let _guard: Option<LockGuard> = match &config.ipset.lock_file {
        Some(path) => Some(
            Locker::new(path)
                .timeout(Duration::from_secs(config.ipset.lock_timeout))
                .lock()?,
        ),
        None => None,
    };

    match command {
        Command::Create {
            name,
            set_type,
            family,
            hashsize,
            maxelem,
            comment,
            exist,
        } => {
            let mut builder = IpSet::builder()
                .name(&name)
                .set_type(set_type.map_or(config.set.set_type.clone(), SetType::from))
                .hash_family(family.map_or(config.set.hash_family.clone(), HashFamily::from))
                .hash_size(hashsize.unwrap_or(config.set.hash_size))
                .max_element(maxelem.unwrap_or(config.set.max_element));
            if comment || config.set.comment {
                builder = builder.with_comment();
            }
            runner.create_set(&builder.build(), exist)
        }
        Command::Destroy { name } => runner.destroy_set(&name),
        Command::List => {
            runner
                .list_sets()?
                .iter()
                .for_each(|name| println!("{name}"));
            Ok(())
        }
        Command::Entries { name } => {
            runner
                .list_entries(&name)?
                .iter()
                .for_each(|entry| println!("{entry}"));
            Ok(())
        }
        Command::Describe { name } => {
            match runner.describe_set(&name)? {
                Some(set) => println!("{set}"),
                None => println!("{} {}", name, "not listed".color(Color::Yellow)),
            }
            Ok(())
        }
        Command::Add {
            name,
            element,
            comment,
            exist,
        } => {
            let entry = Entry {
                element,
                comment,
            };
            runner.add_entry(&entry, &name, exist)
        }
        Command::Del { name, element } => runner.del_entry(&element, &name),
        Command::Smoke { name } => smoke(&runner, &name),
    }
}

/// Exercise every operation once against a real ipset
fn smoke(runner: &impl IpSetInterface, name: &str) -> Result<()> {
    let ok = || "OK".color(Color::Green);
    let element = "172.18.3.2";

    runner.create_set(&IpSet::builder().name(name).with_comment().build(), true)?;
    println!("Create Set: {}", ok());

    runner.add_entry(&Entry::with_comment(element, "ContainerID: deadbeaf"), name, true)?;
    println!("Add Entry to Set: {}", ok());

    runner.list_entries(name)?;
    println!("List entries: {}", ok());

    runner.del_entry(element, name)?;
    println!("Delete Entry from Set: {}", ok());

    runner.destroy_set(name)?;
    println!("Destroy Set: {}", ok());

    Ok(())
}

/// Custom logger initialization, with optional timestamp
fn init_logger(timestamp: bool, level: LevelFilter) {
    env_logger::Builder::new()
        .format(move |buf, record| {
            let color = match record.level() {
                log::Level::Error => Color::Red,
                log::Level::Warn => Color::Yellow,
                log::Level::Info => Color::Green,
                log::Level::Debug => Color::Blue,
                log::Level::Trace => Color::Magenta,
            };
            let level = format!("{:5}", record.level()).color(color);
            if timestamp {
                writeln!(
                    buf,
                    "[{} {}] {}",
                    Local::now().format("%Y-%m-%d %H:%M:%S"),
                    level,
                    record.args()
                )
            } else {
                writeln!(buf, "[{}] {}", level, record.args())
            }
        })
        .filter_module("ipset_runner", level)
        .init();
}
