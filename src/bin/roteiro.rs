use anyhow::Result;
use roteiro::cli::{actions, actions::Action, start, telemetry};

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Start the program
    let action = start()?;

    // Handle the action
    match action {
        Action::Server { .. } => actions::server::handle(action).await?,
    }

    telemetry::shutdown_tracer();

    Ok(())
}
