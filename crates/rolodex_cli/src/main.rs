//! Command-line front end for the customer directory.
//!
//! # Responsibility
//! - Compose config, logging, store and services explicitly.
//! - Print one customer per line: `id<TAB>first<TAB>last`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use rolodex_core::db::open_db;
use rolodex_core::{
    init_logging, seed_sample_customers, CollectingPresenter, Customer, CustomerId,
    CustomerPatch, CustomerService, FilterQueryResolver, ListingView, RolodexConfig,
    SqliteCustomerRepository,
};
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "rolodex", version, about = "Customer directory with filtered listing")]
struct Cli {
    /// Path to rolodex.toml; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List customers, optionally by case-insensitive last-name prefix.
    List {
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Add a customer.
    Add { first_name: String, last_name: String },
    /// Change names of an existing customer.
    Update {
        id: CustomerId,
        #[arg(long = "first")]
        first_name: Option<String>,
        #[arg(long = "last")]
        last_name: Option<String>,
    },
    /// Delete a customer by id.
    Delete { id: CustomerId },
    /// Insert sample customers into an empty store.
    Seed,
    /// Read filter text from stdin, one line per edit, and list matches once
    /// input settles.
    Browse,
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => RolodexConfig::load(path)?,
        None => RolodexConfig::default(),
    };

    if let Some(dir) = &config.logging.dir {
        init_logging(&config.logging.level, dir)?;
    }

    if let Some(parent) = config.database.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory `{}`", parent.display())
            })?;
        }
    }

    let conn = open_db(&config.database.path).with_context(|| {
        format!(
            "failed to open database `{}`",
            config.database.path.display()
        )
    })?;
    let repo = SqliteCustomerRepository::try_new(&conn)?;
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&cli.command)
    );

    match cli.command {
        Command::List { filter } => {
            let mut view = ListingView::new(
                FilterQueryResolver::new(repo),
                CollectingPresenter::default(),
            );
            view.set_filter(filter.unwrap_or_default())?;
            for customer in &view.presenter().customers {
                print_customer(customer);
            }
        }
        Command::Add {
            first_name,
            last_name,
        } => {
            let customer = CustomerService::new(repo).create_customer(first_name, last_name)?;
            print_customer(&customer);
        }
        Command::Update {
            id,
            first_name,
            last_name,
        } => {
            let patch = CustomerPatch {
                first_name,
                last_name,
            };
            if patch.is_empty() {
                bail!("nothing to update; pass --first and/or --last");
            }
            let customer = CustomerService::new(repo).patch_customer(id, &patch)?;
            print_customer(&customer);
        }
        Command::Delete { id } => {
            CustomerService::new(repo).delete_customer(id)?;
        }
        Command::Seed => {
            let inserted = seed_sample_customers(&repo)?;
            println!("inserted {inserted} customers");
        }
        Command::Browse => {
            let mut view = ListingView::new(
                FilterQueryResolver::new(repo),
                |customers: &[Customer]| {
                    println!("-- {} customers", customers.len());
                    for customer in customers {
                        print_customer(customer);
                    }
                },
            );
            view.reload()?;
            let mut debouncer = config.listing.debouncer(view.filter());

            for line in std::io::stdin().lock().lines() {
                let line = line.context("failed to read filter input")?;
                let now = Instant::now();
                if let Some(settled) = debouncer.poll(now) {
                    view.set_filter(settled)?;
                }
                debouncer.on_input(line, now);
            }
            if let Some(settled) = debouncer.flush() {
                view.set_filter(settled)?;
            }
        }
    }

    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::List { .. } => "list",
        Command::Add { .. } => "add",
        Command::Update { .. } => "update",
        Command::Delete { .. } => "delete",
        Command::Seed => "seed",
        Command::Browse => "browse",
    }
}

fn print_customer(customer: &Customer) {
    println!(
        "{}\t{}\t{}",
        customer.id, customer.first_name, customer.last_name
    );
}
