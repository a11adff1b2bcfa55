//! `dockhand network` subcommands.

use clap::{Args, Subcommand};
use color_eyre::eyre::{Result, eyre};
use dockhand_network::{
    CreateNetworkOptions, EndpointConfig, EndpointIpamConfig, IpamConfig, IpamOptions, Network,
    NetworkClient, NetworkConnectionOptions, NetworkFilters,
};
use dockhand_transport::{CallContext, Transport};
use tabled::{Table, Tabled};

/// Network commands.
#[derive(Subcommand, Debug)]
pub enum NetworkCommand {
    /// List networks
    #[command(alias = "list")]
    Ls {
        /// Filter output (e.g. driver=bridge, name=web, label=env=prod)
        #[arg(short, long = "filter")]
        filters: Vec<String>,

        /// Only display network IDs
        #[arg(short, long)]
        quiet: bool,

        /// Do not truncate IDs
        #[arg(long)]
        no_trunc: bool,
    },

    /// Display detailed information on one or more networks
    Inspect {
        /// Network IDs or names
        #[arg(required = true)]
        networks: Vec<String>,
    },

    /// Create a network
    Create(CreateArgs),

    /// Remove one or more networks
    #[command(alias = "remove")]
    Rm {
        /// Network IDs or names
        #[arg(required = true)]
        networks: Vec<String>,
    },

    /// Connect a container to a network
    Connect(ConnectArgs),

    /// Disconnect a container from a network
    Disconnect {
        /// Network ID or name
        network: String,

        /// Container ID or name
        container: String,

        /// Force the container to disconnect
        #[arg(short, long)]
        force: bool,
    },
}

/// Arguments of `dockhand network create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Network name
    pub name: String,

    /// Network driver
    #[arg(short, long, default_value = "bridge")]
    pub driver: String,

    /// Subnet in CIDR format
    #[arg(long)]
    pub subnet: Option<String>,

    /// Allocate container addresses from a sub-range
    #[arg(long)]
    pub ip_range: Option<String>,

    /// Gateway for the subnet
    #[arg(long)]
    pub gateway: Option<String>,

    /// Auxiliary address reserved by the driver (host=ip)
    #[arg(long = "aux-address", value_parser = parse_key_value)]
    pub aux_addresses: Vec<(String, String)>,

    /// IP address management driver
    #[arg(long)]
    pub ipam_driver: Option<String>,

    /// Network label (key=value)
    #[arg(long = "label", value_parser = parse_key_value)]
    pub labels: Vec<(String, String)>,

    /// Driver option (key=value)
    #[arg(short = 'o', long = "opt", value_parser = parse_key_value)]
    pub options: Vec<(String, String)>,

    /// Restrict external access to the network
    #[arg(long)]
    pub internal: bool,

    /// Enable IPv6 networking
    #[arg(long)]
    pub ipv6: bool,

    /// Ask the daemon to reject duplicate names
    #[arg(long)]
    pub check_duplicate: bool,
}

impl CreateArgs {
    /// Request body for these arguments.
    #[must_use]
    pub fn options(&self) -> CreateNetworkOptions {
        let mut ipam = IpamOptions::with_driver(self.ipam_driver.clone().unwrap_or_default());

        let has_subnet_config = self.subnet.is_some()
            || self.ip_range.is_some()
            || self.gateway.is_some()
            || !self.aux_addresses.is_empty();
        if has_subnet_config {
            ipam = ipam.with_config(IpamConfig {
                subnet: self.subnet.clone(),
                ip_range: self.ip_range.clone(),
                gateway: self.gateway.clone(),
                aux_address: self.aux_addresses.iter().cloned().collect(),
            });
        }

        let mut opts = CreateNetworkOptions::new(&self.name)
            .with_driver(&self.driver)
            .with_ipam(ipam)
            .with_internal(self.internal)
            .with_ipv6(self.ipv6)
            .with_check_duplicate(self.check_duplicate);
        for (key, value) in &self.labels {
            opts = opts.with_label(key, value);
        }
        for (key, value) in &self.options {
            opts = opts.with_option(key, value.as_str());
        }
        opts
    }
}

/// Arguments of `dockhand network connect`.
#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Network ID or name
    pub network: String,

    /// Container ID or name
    pub container: String,

    /// Static IPv4 address
    #[arg(long)]
    pub ip: Option<String>,

    /// Static IPv6 address
    #[arg(long)]
    pub ip6: Option<String>,

    /// Network-scoped alias for the container
    #[arg(long = "alias")]
    pub aliases: Vec<String>,

    /// Link to another container (name:alias)
    #[arg(long = "link")]
    pub links: Vec<String>,
}

impl ConnectArgs {
    /// Request body for these arguments.
    #[must_use]
    pub fn options(&self) -> NetworkConnectionOptions {
        let ipam = EndpointIpamConfig {
            ipv4_address: self.ip.clone(),
            ipv6_address: self.ip6.clone(),
        };

        let mut endpoint = EndpointConfig::default();
        if !ipam.is_empty() {
            endpoint = endpoint.with_ipam_config(ipam);
        }
        for alias in &self.aliases {
            endpoint = endpoint.with_alias(alias);
        }
        for link in &self.links {
            endpoint = endpoint.with_link(link);
        }

        let opts = NetworkConnectionOptions::new(&self.container);
        if endpoint == EndpointConfig::default() {
            opts
        } else {
            opts.with_endpoint_config(endpoint)
        }
    }
}

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "NETWORK ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "DRIVER")]
    driver: String,
    #[tabled(rename = "SCOPE")]
    scope: String,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}

/// Render `networks` as a table sorted by name.
#[must_use]
pub fn render_table(networks: &[Network], no_trunc: bool) -> String {
    let mut rows: Vec<NetworkRow> = networks
        .iter()
        .map(|n| NetworkRow {
            id: if no_trunc {
                n.id.clone()
            } else {
                short_id(&n.id).to_string()
            },
            name: n.name.clone(),
            driver: n.driver.clone(),
            scope: n.scope.clone(),
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    Table::new(rows).to_string()
}

impl NetworkCommand {
    /// Run the command against `client`.
    pub async fn run<T: Transport>(self, client: &NetworkClient<T>, ctx: &CallContext) -> Result<()> {
        match self {
            Self::Ls {
                filters,
                quiet,
                no_trunc,
            } => {
                let networks = if filters.is_empty() {
                    client.list_networks(ctx).await?
                } else {
                    let mut parsed = NetworkFilters::new();
                    for expr in &filters {
                        parsed.insert_expression(expr)?;
                    }
                    client.filtered_list_networks(&parsed, ctx).await?
                };

                if quiet {
                    for network in &networks {
                        let id = if no_trunc {
                            network.id.as_str()
                        } else {
                            short_id(&network.id)
                        };
                        println!("{id}");
                    }
                } else {
                    println!("{}", render_table(&networks, no_trunc));
                }
                Ok(())
            }

            Self::Inspect { networks } => {
                let mut found = Vec::with_capacity(networks.len());
                let mut failed = 0usize;
                for id in &networks {
                    match client.network_info(id, ctx).await {
                        Ok(network) => found.push(network),
                        Err(err) => {
                            eprintln!("Error: {err}");
                            failed += 1;
                        }
                    }
                }

                println!("{}", serde_json::to_string_pretty(&found)?);
                if failed > 0 {
                    return Err(eyre!("{failed} network(s) could not be inspected"));
                }
                Ok(())
            }

            Self::Create(args) => {
                let network = client.create_network(&args.options(), ctx).await?;
                println!("{}", network.id);
                Ok(())
            }

            Self::Rm { networks } => {
                let mut failed = 0usize;
                for id in &networks {
                    match client.remove_network(id, ctx).await {
                        Ok(()) => println!("{id}"),
                        Err(err) => {
                            eprintln!("Error: {err}");
                            failed += 1;
                        }
                    }
                }

                if failed > 0 {
                    return Err(eyre!("{failed} network(s) could not be removed"));
                }
                Ok(())
            }

            Self::Connect(args) => {
                client
                    .connect_network(&args.network, &args.options(), ctx)
                    .await?;
                Ok(())
            }

            Self::Disconnect {
                network,
                container,
                force,
            } => {
                let opts = NetworkConnectionOptions::new(container).with_force(force);
                client.disconnect_network(&network, &opts, ctx).await?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use serde_json::json;

    use super::*;
    use crate::cli::{Cli, Commands};

    fn parse(args: &[&str]) -> NetworkCommand {
        let mut argv = vec!["dockhand", "network"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Network(command) => command,
        }
    }

    #[test]
    fn create_args_build_request_body() {
        let NetworkCommand::Create(args) = parse(&[
            "create",
            "backend",
            "--subnet",
            "10.10.0.0/24",
            "--gateway",
            "10.10.0.1",
            "--label",
            "tier=db",
            "-o",
            "com.docker.network.driver.mtu=1400",
            "--internal",
        ]) else {
            panic!("expected create");
        };

        let body = serde_json::to_value(args.options()).unwrap();
        assert_eq!(
            body,
            json!({
                "Name": "backend",
                "CheckDuplicate": false,
                "Driver": "bridge",
                "IPAM": {
                    "Driver": "",
                    "Config": [{ "Subnet": "10.10.0.0/24", "Gateway": "10.10.0.1" }]
                },
                "Options": { "com.docker.network.driver.mtu": "1400" },
                "Labels": { "tier": "db" },
                "Internal": true,
                "EnableIPv6": false
            })
        );
    }

    #[test]
    fn create_without_subnet_sends_no_ipam_config() {
        let NetworkCommand::Create(args) = parse(&["create", "plain", "-d", "overlay"]) else {
            panic!("expected create");
        };
        let opts = args.options();
        assert_eq!(opts.driver, "overlay");
        assert!(opts.ipam.config.is_empty());
    }

    #[test]
    fn bad_label_is_rejected() {
        let argv = ["dockhand", "network", "create", "x", "--label", "novalue"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn connect_args_build_endpoint_config() {
        let NetworkCommand::Connect(args) = parse(&[
            "connect", "backend", "web", "--ip", "10.10.0.5", "--alias", "api",
        ]) else {
            panic!("expected connect");
        };

        assert_eq!(
            serde_json::to_value(args.options()).unwrap(),
            json!({
                "Container": "web",
                "EndpointConfig": {
                    "IPAMConfig": { "IPv4Address": "10.10.0.5" },
                    "Aliases": ["api"]
                },
                "Force": false
            })
        );
    }

    #[test]
    fn bare_connect_has_no_endpoint_config() {
        let NetworkCommand::Connect(args) = parse(&["connect", "backend", "web"]) else {
            panic!("expected connect");
        };
        assert!(args.options().endpoint_config.is_none());
    }

    #[test]
    fn table_truncates_and_sorts() {
        let networks = vec![
            Network {
                name: "web".to_string(),
                id: "0123456789abcdef0123".to_string(),
                driver: "bridge".to_string(),
                scope: "local".to_string(),
                ..Network::default()
            },
            Network {
                name: "db".to_string(),
                id: "fedcba".to_string(),
                driver: "overlay".to_string(),
                scope: "swarm".to_string(),
                ..Network::default()
            },
        ];

        let table = render_table(&networks, false);
        assert!(table.contains("NETWORK ID"));
        assert!(table.contains("0123456789ab"));
        assert!(!table.contains("0123456789abcdef"));
        assert!(table.find("db").unwrap() < table.find("web").unwrap());

        let table = render_table(&networks, true);
        assert!(table.contains("0123456789abcdef0123"));
    }
}
