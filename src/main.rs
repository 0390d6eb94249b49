//! fairsplit CLI
//!
//! Track shared expenses and settle debts from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Interactive menu (default)
//! fairsplit
//!
//! # Show balances of a group
//! fairsplit balances --group Trip
//!
//! # Settlement plan as JSON
//! fairsplit --currency USD settle --group Trip --format json
//! ```

use fairsplit::config::{parse_tolerance, Config};
use fairsplit::core::currency::{to_display, CurrencyCode};
use fairsplit::shell::Shell;
use fairsplit::storage::group_store::GroupStore;
use log::debug;
use std::io;
use std::path::PathBuf;
use std::process;

fn print_usage() {
    eprintln!(
        r#"fairsplit: shared expenses and minimal debt settlement

USAGE:
    fairsplit [GLOBAL OPTIONS] [COMMAND] [OPTIONS]

COMMANDS:
    shell       Interactive menu (default)
    groups      List known groups
    balances    Show each member's net balance in a group
    settle      Show the transfers that settle a group
    help        Show this message

GLOBAL OPTIONS:
    --data <FILE>        Group store (default: data/groups.json, env FAIRSPLIT_DATA)
    --currency <CODE>    Currency label (default: EUR, env FAIRSPLIT_CURRENCY)
    --tolerance <AMOUNT> Settled-balance tolerance (default: 0.01, env FAIRSPLIT_TOLERANCE)

OPTIONS (balances, settle):
    --group <NAME>      Group to report on
    --format <FORMAT>   Output format: text (default) or json

EXAMPLES:
    fairsplit
    fairsplit balances --group Trip
    fairsplit --data trip.json settle --group Trip --format json"#
    );
}

#[derive(serde::Serialize)]
struct BalanceOutput {
    member: String,
    balance: String,
    status: String,
}

#[derive(serde::Serialize)]
struct BalancesOutput {
    group: String,
    currency: String,
    balances: Vec<BalanceOutput>,
}

#[derive(serde::Serialize)]
struct SettlementOutput {
    debtor: String,
    creditor: String,
    amount: String,
}

#[derive(serde::Serialize)]
struct PlanOutput {
    group: String,
    currency: String,
    settlements: Vec<SettlementOutput>,
    complete: bool,
    warning: Option<String>,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}

/// Parse `--group` and `--format` for the reporting commands.
fn parse_report_args(args: &[String]) -> (String, String) {
    let mut group = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--group" => {
                i += 1;
                group = Some(args.get(i).cloned().unwrap_or_else(|| {
                    fail("--group requires a group name");
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    fail("--format requires 'text' or 'json'");
                });
            }
            _ => fail(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    let group = group.unwrap_or_else(|| fail("--group <NAME> is required"));
    if format != "text" && format != "json" {
        fail(format!("unknown format '{}'", format));
    }
    (group, format)
}

fn cmd_groups(store: &GroupStore) {
    if store.is_empty() {
        println!("No groups yet.");
        return;
    }
    for name in store.group_names() {
        println!("{}", name);
    }
}

fn cmd_balances(store: &GroupStore, config: &Config, args: &[String]) {
    let (group, format) = parse_report_args(args);
    let balances = store.balances(&group).unwrap_or_else(|e| fail(e));

    if format == "json" {
        let output = BalancesOutput {
            group,
            currency: config.currency.to_string(),
            balances: balances
                .iter()
                .map(|(member, balance)| BalanceOutput {
                    member: member.to_string(),
                    balance: to_display(balance),
                    status: if balance > config.tolerance {
                        "CREDITOR".to_string()
                    } else if balance < -config.tolerance {
                        "DEBTOR".to_string()
                    } else {
                        "SETTLED".to_string()
                    },
                })
                .collect(),
        };
        print_json(&output);
    } else {
        println!("Balances for group '{}':", group);
        for (member, balance) in balances.iter() {
            println!("{}: {}", member, config.currency.format(balance));
        }
    }
}

fn cmd_settle(store: &GroupStore, config: &Config, args: &[String]) {
    let (group, format) = parse_report_args(args);
    let plan = store
        .settle(&group, &config.planner())
        .unwrap_or_else(|e| fail(e));

    if format == "json" {
        let output = PlanOutput {
            group,
            currency: config.currency.to_string(),
            settlements: plan
                .settlements()
                .iter()
                .map(|s| SettlementOutput {
                    debtor: s.debtor.to_string(),
                    creditor: s.creditor.to_string(),
                    amount: s.display_amount(),
                })
                .collect(),
            complete: plan.is_complete(),
            warning: plan.violation().map(|v| v.to_string()),
        };
        print_json(&output);
        return;
    }

    if plan.is_empty() && plan.is_complete() {
        println!("Everyone is settled up!");
    } else {
        println!("Settlements for group '{}':", group);
        for settlement in plan.settlements() {
            println!("{}", settlement.render(&config.currency));
        }
    }
    if let Some(violation) = plan.violation() {
        eprintln!("Warning: {}", violation);
    }
}

fn cmd_shell(store: GroupStore, config: Config) {
    let stdin = io::stdin();
    let mut shell = Shell::new(store, config, stdin.lock(), io::stdout());
    if let Err(e) = shell.run() {
        fail(e);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut config = Config::from_env().unwrap_or_else(|e| fail(e));
    let args: Vec<String> = std::env::args().collect();

    let mut command = "shell".to_string();
    let mut rest: &[String] = &[];
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--data" => {
                i += 1;
                let path = args.get(i).unwrap_or_else(|| fail("--data requires a file path"));
                config.data_path = PathBuf::from(path);
            }
            "--currency" => {
                i += 1;
                let code = args.get(i).unwrap_or_else(|| fail("--currency requires a code"));
                config.currency = CurrencyCode::new(code.as_str());
            }
            "--tolerance" => {
                i += 1;
                let raw = args.get(i).unwrap_or_else(|| fail("--tolerance requires an amount"));
                config.tolerance = parse_tolerance(raw).unwrap_or_else(|e| fail(e));
            }
            other => {
                command = other.to_string();
                rest = &args[i + 1..];
                break;
            }
        }
        i += 1;
    }

    if matches!(command.as_str(), "help" | "--help" | "-h") {
        print_usage();
        return;
    }

    debug!("opening group store at {}", config.data_path.display());
    let store = GroupStore::open(&config.data_path);

    match command.as_str() {
        "shell" => cmd_shell(store, config),
        "groups" => cmd_groups(&store),
        "balances" => cmd_balances(&store, &config, rest),
        "settle" => cmd_settle(&store, &config, rest),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
