// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Doris demo entrypoint.
//!
//! Walks the bundled fixture directory the way a UI would: loads root pages,
//! expands a few branches, creates a node, then prints the visible outline.
//! With `--export` the same view is flattened to CSV on stdout. Diagnostics
//! go to stderr via `RUST_LOG` (default `doris=info`).

use std::error::Error;
use std::io::{self, Write as _};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use doris::backend::fixture::FixtureDirectory;
use doris::config::ExplorerConfig;
use doris::explorer::Explorer;
use doris::export::TableSink;
use doris::model::{EndpointId, NewNodeForm, NodeId};
use doris::query::table::{CsvTable, FlattenScope};
use doris::source::Endpoint;
use doris::ui::TreeOutline;

const DEFAULT_ROOT_PAGES: u32 = 2;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<config.toml>] [--pages <n>] [--export]\n  {program} [--config <config.toml>] [--pages <n>] [--export]\n\nWithout a config file, a built-in two-endpoint demo pool is used.\n--pages selects how many root pages to load (default {DEFAULT_ROOT_PAGES}).\n--export flattens the visible tree to CSV on stdout after the walkthrough."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: Option<String>,
    pages: Option<u32>,
    export: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--export" => {
                if options.export {
                    return Err(());
                }
                options.export = true;
            }
            "--pages" => {
                if options.pages.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let pages: u32 = raw.parse().map_err(|_| ())?;
                options.pages = Some(pages);
            }
            "--config" => {
                if options.config_path.is_some() {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.config_path = Some(path);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.config_path.is_some() {
                    return Err(());
                }
                options.config_path = Some(arg);
            }
        }
    }

    Ok(options)
}

fn demo_config() -> Result<ExplorerConfig, Box<dyn Error>> {
    let endpoints = vec![
        Endpoint::new(EndpointId::new("emea")?, "https://emea.example.test/api"),
        Endpoint::new(EndpointId::new("apac")?, "https://apac.example.test/api"),
    ];
    Ok(ExplorerConfig::new(endpoints)?)
}

/// Stdout CSV sink: RFC-4180 style quoting, the part the explorer core
/// deliberately leaves to its export collaborator.
struct CsvStdoutSink;

fn csv_quote(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        let mut quoted = String::with_capacity(field.len() + 2);
        quoted.push('"');
        for ch in field.chars() {
            if ch == '"' {
                quoted.push('"');
            }
            quoted.push(ch);
        }
        quoted.push('"');
        quoted
    } else {
        field.to_owned()
    }
}

impl TableSink for CsvStdoutSink {
    fn deliver(&mut self, table: &CsvTable) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let headers: Vec<String> = table.headers.iter().map(|h| csv_quote(h)).collect();
        writeln!(out, "{}", headers.join(","))?;
        for row in &table.rows {
            let cells: Vec<String> = row.iter().map(|cell| csv_quote(cell)).collect();
            writeln!(out, "{}", cells.join(","))?;
        }
        out.flush()
    }
}

async fn run(options: CliOptions) -> Result<(), Box<dyn Error>> {
    let config = match &options.config_path {
        Some(path) => ExplorerConfig::load(path.as_ref())?,
        None => demo_config()?,
    };
    let explorer = Explorer::new(&config, Arc::new(FixtureDirectory::demo_org()));

    let pages = options.pages.unwrap_or(DEFAULT_ROOT_PAGES).max(1);
    for page in 1..=pages {
        explorer.load_root_page(page).await?;
    }

    explorer.expand(&NodeId::new("ops")?).await?;
    explorer.expand(&NodeId::new("ops-log")?).await?;
    explorer.expand(&NodeId::new("rnd")?).await?;

    // The creation target sits on root page 2; skip the step when fewer
    // pages were requested.
    let people = NodeId::new("people")?;
    if explorer.node(&people).await.is_some() {
        let mut form = NewNodeForm::new("Payroll", "Salaries and benefits", Some(6));
        let payroll_id = explorer.submit_new_node(Some(&people), &mut form).await?;
        tracing::info!(node_id = %payroll_id, "created demo node");
        explorer.expand(&people).await?;
    }

    let outline = TreeOutline::capture(&explorer).await;
    print!("{}", outline.to_text());

    if options.export {
        let mut sink = CsvStdoutSink;
        explorer
            .export_to(&FlattenScope::AllVisible, &mut sink)
            .await?;
    }

    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("doris=info")),
            )
            .with_writer(io::stderr)
            .init();

        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "doris".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(run(options))
    })();

    if let Err(err) = result {
        eprintln!("doris: {err}");
        std::process::exit(1);
    }
}
