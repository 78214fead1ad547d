// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use te_api::{ApiClient, ClientConfig, Credentials};
use te_dns_trace::TraceWindow;
use te_examples::{
    agents, cli::Cli, dns_server, http_test, interrupt, logging, stale_tests,
    stale_tests::Pacing, trace_report,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

#[tokio::main]
pub async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = cli.validate() {
        e.exit();
    }

    if let Err(e) = logging::init() {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }
    debug!("Logging subsystem enabled");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::from_env().context("invalid client configuration")?;
    let mut credentials = Credentials::new(&cli.email, &cli.api_token);
    if let Some(aid) = &cli.account_group {
        credentials = credentials.with_account_group(aid);
    }

    let cancel = CancellationToken::new();
    let client = ApiClient::new(credentials, config)?.with_cancellation(cancel.clone());
    interrupt::cancel_on_ctrl_c(cancel.clone());

    interrupt::until_cancelled(&cancel, run_example(&client, &cli)).await
}

async fn run_example(client: &ApiClient, cli: &Cli) -> anyhow::Result<()> {
    match cli.example {
        1 => print_cloud_agent_ips(client).await,
        2 => create_test(client, &cli.url).await,
        3 => print_dns_availability(client, test_id(cli)?).await,
        4 => export_trace_csv(client, test_id(cli)?, cli.window_days, cli.period_hours).await,
        5 => report_stale_tests(client, cli).await,
        other => anyhow::bail!("unknown example {other}"),
    }
}

fn test_id(cli: &Cli) -> anyhow::Result<&str> {
    cli.test_id
        .as_deref()
        .with_context(|| format!("example {} requires a test ID", cli.example))
}

async fn print_cloud_agent_ips(client: &ApiClient) -> anyhow::Result<()> {
    let agents = agents::list_agents(client).await?;
    for ip in agents::cloud_agent_ips(&agents) {
        println!("{ip}");
    }
    Ok(())
}

async fn create_test(client: &ApiClient, url: &str) -> anyhow::Result<()> {
    let agents = agents::list_agents(client).await?;
    let agent_ids = agents::online_enterprise_agent_ids(&agents);
    let created = http_test::create_http_server_test(client, url, &agent_ids).await?;

    println!("Test {} created.", created.test_name);
    println!("Currently running on agents:");
    for name in created.agent_names {
        println!("- {name}");
    }
    Ok(())
}

async fn print_dns_availability(client: &ApiClient, test_id: &str) -> anyhow::Result<()> {
    let availability = dns_server::dns_server_availability(client, test_id).await?;
    println!("Availability for the last test run is {availability}.");
    Ok(())
}

async fn export_trace_csv(
    client: &ApiClient,
    test_id: &str,
    window_days: u32,
    period_hours: u32,
) -> anyhow::Result<()> {
    let window = TraceWindow::ending_now(window_days, period_hours)?;
    let out_dir = std::env::current_dir().context("cannot resolve working directory")?;

    print!("Loading traces");
    let report = trace_report::export_dns_trace(client, test_id, &window, &out_dir, |_| {
        print!(".");
        let _ = std::io::stdout().flush();
    })
    .await;
    println!();

    let report = report?;
    let file_name = report
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| report.path.display().to_string());
    println!("Completed! Wrote out {file_name}");
    Ok(())
}

async fn report_stale_tests(client: &ApiClient, cli: &Cli) -> anyhow::Result<()> {
    let window = cli.issue_window()?;
    let pacing = Pacing::default();

    for account in stale_tests::list_accounts(client).await? {
        let report = stale_tests::find_stale_tests(client, &account, &window, pacing).await?;
        for test in &report.stale {
            println!(
                "{}\t{}\t{}",
                test.test_id, report.account.account_name, test.test_name
            );
        }
        println!(
            "{} of {} candidate tests have last result between {} and {} UTC.",
            report.stale.len(),
            report.candidates,
            window.start,
            window.end
        );

        if !cli.reenable {
            println!("Doing nothing about it. Pass --reenable to re-enable the problematic tests.");
            continue;
        }
        for test in &report.stale {
            println!("{}", test.test_id);
            let (disabled, enabled) =
                stale_tests::reenable_test(client, account.aid, test, pacing).await?;
            println!("{disabled}");
            println!("{enabled}");
        }
        println!("{} tests re-enabled.", report.stale.len());
    }
    Ok(())
}
