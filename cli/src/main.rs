use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use mediabrowser::DiscoveredServer;
use mediabrowser::DiscoveryConfig;
use mediabrowser::ServerType;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    match Cli::parse().command {
        Command::Discover {
            timeout_ms,
            port,
            server_types,
            json,
        } => {
            let mut config = DiscoveryConfig {
                timeout: Duration::from_millis(timeout_ms),
                ..Default::default()
            };
            config.broadcast_address.set_port(port);
            if !server_types.is_empty() {
                config.server_types = server_types.into_iter().map(Into::into).collect();
            }
            discover(&config, json)?
        }
    };
    Ok(())
}

fn discover(config: &DiscoveryConfig, json: bool) -> anyhow::Result<()> {
    log::info!("Discovering servers with {:?}", config);
    let servers = mediabrowser::discover_with_config(config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&servers)?);
    } else if servers.is_empty() {
        eprintln!("No server found");
    } else {
        servers.iter().try_for_each(print_server)?;
    }
    Ok(())
}

fn print_server(server: &DiscoveredServer) -> anyhow::Result<()> {
    println!(
        "{}\t{}\t{}\t{}",
        server.server_type(),
        server.name().unwrap_or("-"),
        server.id()?,
        server.address()?
    );
    Ok(())
}

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Broadcasts discovery probes and lists the servers that answer.
    Discover {
        /// How long to wait for a reply to each probe.
        #[arg(long, default_value_t = 1000)]
        timeout_ms: u64,

        #[arg(long, default_value_t = mediabrowser::DISCOVERY_PORT)]
        port: u16,

        /// Server types to probe for. All of them if omitted.
        #[arg(long = "server-type", value_enum)]
        server_types: Vec<CliServerType>,

        /// Prints the raw responses as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CliServerType {
    Emby,
    Jellyfin,
}

impl From<CliServerType> for ServerType {
    fn from(value: CliServerType) -> Self {
        match value {
            CliServerType::Emby => ServerType::Emby,
            CliServerType::Jellyfin => ServerType::Jellyfin,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_discover() {
        let cli = Cli::parse_from([
            "mediabrowser-cli",
            "discover",
            "--timeout-ms",
            "250",
            "--server-type",
            "jellyfin",
            "--json",
        ]);

        let Command::Discover {
            timeout_ms,
            port,
            server_types,
            json,
        } = cli.command;
        assert_eq!(timeout_ms, 250);
        assert_eq!(port, 7359);
        assert_eq!(
            server_types
                .into_iter()
                .map(ServerType::from)
                .collect::<Vec<_>>(),
            vec![ServerType::Jellyfin]
        );
        assert!(json);
    }
}
