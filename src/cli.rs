//! CLI struct definitions and dispatch for the `agora` binary.
//!
//! Mutations print a machine-readable JSON envelope on stdout; the read
//! commands render short human-facing output. Business rejections
//! (insufficient funds/shares, bad quantity) are printed as `rejected`
//! envelopes and exit zero; faults propagate and exit nonzero.

use crate::core::config::EconomyConfig;
use crate::core::db;
use crate::core::error::AgoraError;
use crate::core::output;
use crate::core::store::Store;
use crate::core::time::command_envelope;
use crate::engine::activity::{self, ActivityKind};
use crate::engine::scheduler::Scheduler;
use crate::engine::{gamble, ledger, market, pricing, replenish};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::BufRead;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[clap(
    name = "agora",
    version = env!("CARGO_PKG_VERSION"),
    about = "Community virtual-economy engine: points for observed activity, a synthetic stock, and a once-daily price control loop."
)]
pub struct Cli {
    /// Store root directory.
    #[clap(long, default_value = ".agora")]
    pub root: PathBuf,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug)]
pub struct MemberArgs {
    /// Member id.
    #[clap(long)]
    pub member: i64,
    /// Community id (accounts are independent per community).
    #[clap(long)]
    pub community: i64,
    /// Display name to record for the account.
    #[clap(long, default_value = "")]
    pub name: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the store: schema plus the seed price record.
    Init,
    /// Ingest one activity event from the chat gateway.
    Activity {
        #[clap(flatten)]
        member: MemberArgs,
        /// Event kind: message, reaction_add, or reaction_remove.
        #[clap(long)]
        kind: String,
    },
    /// Show a member's point balance.
    Balance {
        #[clap(flatten)]
        member: MemberArgs,
    },
    /// Buy shares at the current price.
    Buy {
        #[clap(flatten)]
        member: MemberArgs,
        #[clap(long)]
        quantity: i64,
    },
    /// Sell shares at the current price.
    Sell {
        #[clap(flatten)]
        member: MemberArgs,
        #[clap(long)]
        quantity: i64,
    },
    /// Double-or-nothing wager on the point balance.
    Gamble {
        #[clap(flatten)]
        member: MemberArgs,
        #[clap(long)]
        wager: i64,
    },
    /// Top members of a community by points.
    Leaderboard {
        #[clap(long)]
        community: i64,
        #[clap(long, default_value = "10")]
        limit: i64,
    },
    /// Current share price.
    Price,
    /// Points, shares, and holdings value for a member.
    Portfolio {
        #[clap(flatten)]
        member: MemberArgs,
    },
    /// Generation-token balance for a member.
    Tokens {
        #[clap(flatten)]
        member: MemberArgs,
        /// Consume one token instead of reading the balance.
        #[clap(long)]
        spend: bool,
    },
    /// Run one price-adjustment cycle immediately.
    Cycle,
    /// Run the daily token grant immediately.
    Replenish,
    /// Run the daily scheduler until stdin closes.
    Serve,
}

pub fn run(cli: Cli) -> Result<(), AgoraError> {
    let store = Store::new(&cli.root);
    let cfg = EconomyConfig::load(&store.root)?;
    let root = store.root.clone();

    let result = match cli.command {
        Command::Init => {
            db::initialize_economy_db(&root, &cfg)?;
            println!(
                "{}",
                command_envelope("init", "ok", serde_json::json!({ "root": root.display().to_string() }))
            );
            Ok(())
        }
        Command::Activity { member, kind } => {
            let kind = ActivityKind::from_str(&kind)?;
            let rec = activity::record(&root, member.member, member.community, &member.name, kind, &cfg)?;
            println!(
                "{}",
                command_envelope(
                    "activity",
                    "ok",
                    serde_json::json!({
                        "kind": rec.kind.as_str(),
                        "delta": rec.delta,
                        "registered": rec.registered,
                        "balance": rec.balance,
                    })
                )
            );
            Ok(())
        }
        Command::Balance { member } => {
            let balance = ledger::balance(&root, member.member, member.community, &member.name, &cfg)?;
            println!("{} points", balance.to_string().bold());
            Ok(())
        }
        Command::Buy { member, quantity } => {
            market::buy(&root, member.member, member.community, &member.name, quantity, &cfg).map(|trade| {
                println!(
                    "{}",
                    command_envelope(
                        "buy",
                        "ok",
                        serde_json::json!({
                            "quantity": trade.quantity,
                            "price": trade.price,
                            "cost": trade.value,
                            "points": trade.points,
                            "shares": trade.shares,
                        })
                    )
                );
            })
        }
        Command::Sell { member, quantity } => {
            market::sell(&root, member.member, member.community, &member.name, quantity, &cfg).map(|trade| {
                println!(
                    "{}",
                    command_envelope(
                        "sell",
                        "ok",
                        serde_json::json!({
                            "quantity": trade.quantity,
                            "price": trade.price,
                            "proceeds": trade.value,
                            "points": trade.points,
                            "shares": trade.shares,
                        })
                    )
                );
            })
        }
        Command::Gamble { member, wager } => {
            gamble::gamble(&root, member.member, member.community, &member.name, wager, &cfg).map(|outcome| {
                println!(
                    "{}",
                    command_envelope(
                        "gamble",
                        "ok",
                        serde_json::json!({
                            "won": outcome.won,
                            "wager": outcome.wager,
                            "payout": outcome.payout,
                            "balance": outcome.balance,
                        })
                    )
                );
            })
        }
        Command::Leaderboard { community, limit } => {
            let rows = ledger::leaderboard(&root, community, limit)?;
            if rows.is_empty() {
                println!("No registered members in community {}.", community);
            } else {
                print!("{}", output::leaderboard_lines(&rows));
            }
            Ok(())
        }
        Command::Price => {
            let price = market::current_price(&root)?;
            println!("The current stock price is {} points", price.to_string().bold());
            Ok(())
        }
        Command::Portfolio { member } => {
            let p = market::portfolio(&root, member.member, member.community, &member.name, &cfg)?;
            println!(
                "{} points | {} shares @ {} = {} points",
                p.points, p.shares, p.price, p.value
            );
            Ok(())
        }
        Command::Tokens { member, spend } => {
            let op = if spend {
                ledger::spend_token(&root, member.member, member.community, &member.name, &cfg)
            } else {
                ledger::tokens(&root, member.member, member.community, &member.name, &cfg)
            };
            op.map(|tokens| {
                println!(
                    "{}",
                    command_envelope("tokens", "ok", serde_json::json!({ "tokens": tokens, "spent": spend }))
                );
            })
        }
        Command::Cycle => {
            let report = pricing::run_cycle(&root, &cfg, crate::core::time::now_epoch())?;
            println!(
                "{}",
                command_envelope(
                    "cycle",
                    "ok",
                    serde_json::json!({
                        "previous": report.previous,
                        "price": report.price,
                        "factor": report.factor,
                        "daily_volume": report.daily_volume,
                        "baseline_volume": report.baseline_volume,
                        "window_days": report.window_days,
                    })
                )
            );
            Ok(())
        }
        Command::Replenish => {
            let report = replenish::run_grant(&root, &cfg)?;
            println!(
                "{}",
                command_envelope(
                    "replenish",
                    "ok",
                    serde_json::json!({ "replenished": report.replenished, "grant": report.grant, "cap": report.cap })
                )
            );
            Ok(())
        }
        Command::Serve => {
            // Boot invariant: the market must be seeded before serving.
            market::current_price(&root)?;
            let scheduler = Scheduler::start(store, cfg)?;
            println!(
                "{}",
                command_envelope("serve", "running", serde_json::json!({ "hint": "close stdin to stop" }))
            );
            for line in std::io::stdin().lock().lines() {
                if line.is_err() {
                    break;
                }
            }
            scheduler.stop();
            println!("{}", command_envelope("serve", "stopped", serde_json::json!({})));
            Ok(())
        }
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_rejection() => {
            println!(
                "{}",
                command_envelope("request", "rejected", serde_json::json!({ "reason": e.to_string() }))
            );
            Ok(())
        }
        Err(e) => Err(e),
    }
}
