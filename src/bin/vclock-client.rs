use std::time::Duration;

use clap::Parser;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vclock_rpc::cli::{ClientCli, ClientCommand};
use vclock_rpc::client::{HttpTransport, RpcClient};
use vclock_rpc::clock::compare_histories;
use vclock_rpc::error::VclockError;
use vclock_rpc::rpc::{Operation, OperationResponse};
use vclock_rpc::settings::ClientSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vclock_rpc=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (settings, command) = ClientCli::parse().into_settings();
    let client = RpcClient::from_settings(&settings)?;

    if let Some((operation, x, y)) = command.as_call() {
        report(operation, client.call(operation, x, y).await);
        println!("Clock: {}", client.clock()?);
        return Ok(());
    }

    match command {
        ClientCommand::Demo => {
            report(Operation::Add, client.add(50, 50).await);
            report(Operation::Multiply, client.multiply(50, 2).await);
            println!("Clock: {}", client.clock()?);
        }
        ClientCommand::Scenario {
            other_node_id,
            delay_ms,
        } => run_scenario(&client, &settings, other_node_id, delay_ms).await?,
        ClientCommand::Add { .. } | ClientCommand::Multiply { .. } => {}
    }

    Ok(())
}

/// Print a call outcome; a failed call is reported, never fatal
fn report(operation: Operation, outcome: Result<OperationResponse, VclockError>) {
    println!(
        "{}: {}",
        capitalize(operation.name()),
        outcome_json(&outcome)
    );
}

fn outcome_json(outcome: &Result<OperationResponse, VclockError>) -> serde_json::Value {
    match outcome {
        Ok(response) => json!({"result": response.result, "clock": response.clock}),
        Err(err) => json!({"error": err.to_string()}),
    }
}

async fn run_scenario(
    first: &RpcClient<HttpTransport>,
    settings: &ClientSettings,
    other_node_id: String,
    delay_ms: u64,
) -> anyhow::Result<()> {
    let second = RpcClient::from_settings(&ClientSettings {
        node_id: other_node_id,
        ..settings.clone()
    })?;

    report(Operation::Add, first.add(1, 1).await);
    let first_after_call = first.clock()?;
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
    let second_send = second.agent().begin_call()?;
    report(
        Operation::Add,
        second
            .dispatch(Operation::Add, 2, 2, second_send.clone())
            .await,
    );

    let server = first.transport().fetch_clock().await?;
    println!("{} clock: {}", first.agent().node_id(), first.clock()?);
    println!("{} clock: {}", second.agent().node_id(), second.clock()?);
    println!("{} clock: {}", server.node_id, server.clock);
    println!(
        "{} after its call vs {}'s send event: {}",
        first.agent().node_id(),
        second.agent().node_id(),
        compare_histories(&first_after_call, &second_send)
    );
    println!(
        "{} vs {} (final clocks): {}",
        first.agent().node_id(),
        second.agent().node_id(),
        first.relation_to(&second)?
    );
    Ok(())
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vclock_rpc::clock::ClockSnapshot;

    #[test]
    fn test_outcomes_print_as_json() {
        let ok = Ok(OperationResponse {
            result: 100,
            clock: ClockSnapshot::from_pairs([("A", 1), ("server", 2)]).unwrap(),
        });
        let printed = outcome_json(&ok).to_string();
        let parsed: serde_json::Value = serde_json::from_str(&printed).unwrap();
        assert_eq!(parsed, json!({"result": 100, "clock": {"A": 1, "server": 2}}));

        // quotes in the message must not break the document
        let failed = Err(VclockError::Remote {
            status: 400,
            message: "missing field `y` in \"body\"".to_string(),
        });
        let printed = outcome_json(&failed).to_string();
        let parsed: serde_json::Value = serde_json::from_str(&printed).unwrap();
        assert_eq!(
            parsed["error"],
            "Remote error (400): missing field `y` in \"body\""
        );
    }
}
