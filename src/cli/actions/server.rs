use crate::cli::actions::Action;
use crate::roteiro;
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            public_dir,
            api_url,
        } => {
            roteiro::new(port, public_dir, api_url).await?;
        }
    }

    Ok(())
}
