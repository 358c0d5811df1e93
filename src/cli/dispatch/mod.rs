use crate::cli::actions::Action;
use anyhow::Result;
use std::path::PathBuf;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(3000),
        public_dir: matches
            .get_one::<PathBuf>("public-dir")
            .cloned()
            .unwrap_or_else(|| PathBuf::from("public")),
        api_url: matches
            .get_one("api-url")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --api-url"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn handler_builds_the_server_action() -> Result<()> {
        let matches = commands::new().get_matches_from(vec![
            "roteiro",
            "--port",
            "4000",
            "--public-dir",
            "static",
            "--api-url",
            "http://localhost:9000/api",
        ]);

        let Action::Server {
            port,
            public_dir,
            api_url,
        } = handler(&matches)?;

        assert_eq!(port, 4000);
        assert_eq!(public_dir, PathBuf::from("static"));
        assert_eq!(api_url, "http://localhost:9000/api");
        Ok(())
    }
}
