//! Engine API records for networks and endpoints.
//!
//! Field names follow the Engine's wire format exactly (`Id`, `EndpointID`,
//! `EnableIPv6`, `AuxiliaryAddresses`, ...). Optional request fields are
//! left out of the payload when empty rather than sent as `null` or `""`.
//! On the response side, absent and `null` fields decode to their zero value.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Omit `None` and `Some("")` alike.
#[allow(clippy::ref_option)]
fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

/// A network as reported by the daemon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Network {
    /// Network name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Server-assigned network ID.
    #[serde(rename = "Id", deserialize_with = "null_as_default")]
    pub id: String,
    /// `local`, `global` or `swarm`.
    #[serde(deserialize_with = "null_as_default")]
    pub scope: String,
    /// Network driver (`bridge`, `overlay`, ...).
    #[serde(deserialize_with = "null_as_default")]
    pub driver: String,
    /// Address management configuration.
    #[serde(rename = "IPAM", deserialize_with = "null_as_default")]
    pub ipam: IpamOptions,
    /// Attached containers, keyed by container ID.
    #[serde(deserialize_with = "null_as_default")]
    pub containers: HashMap<String, Endpoint>,
    /// Driver options.
    #[serde(deserialize_with = "null_as_default")]
    pub options: HashMap<String, String>,
    /// Restricts external access to the network.
    #[serde(deserialize_with = "null_as_default")]
    pub internal: bool,
    /// IPv6 networking is enabled.
    #[serde(rename = "EnableIPv6", deserialize_with = "null_as_default")]
    pub enable_ipv6: bool,
    /// User-defined metadata.
    #[serde(deserialize_with = "null_as_default")]
    pub labels: HashMap<String, String>,
}

/// A container's attachment to a network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoint {
    /// Container name.
    #[serde(rename = "Name", deserialize_with = "null_as_default")]
    pub name: String,
    /// Endpoint ID.
    #[serde(rename = "EndpointID", deserialize_with = "null_as_default")]
    pub id: String,
    /// MAC address of the interface.
    #[serde(rename = "MacAddress", deserialize_with = "null_as_default")]
    pub mac_address: String,
    /// IPv4 address in CIDR notation.
    #[serde(rename = "IPv4Address", deserialize_with = "null_as_default")]
    pub ipv4_address: String,
    /// IPv6 address in CIDR notation.
    #[serde(rename = "IPv6Address", deserialize_with = "null_as_default")]
    pub ipv6_address: String,
}

/// IP address management settings of a network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct IpamOptions {
    /// IPAM driver; empty selects the daemon default.
    #[serde(deserialize_with = "null_as_default")]
    pub driver: String,
    /// Per-subnet configuration.
    #[serde(deserialize_with = "null_as_default")]
    pub config: Vec<IpamConfig>,
}

impl IpamOptions {
    /// IPAM settings for the given driver with no subnets.
    pub fn with_driver(driver: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            config: Vec::new(),
        }
    }

    /// Add a subnet configuration.
    #[must_use]
    pub fn with_config(mut self, config: IpamConfig) -> Self {
        self.config.push(config);
        self
    }
}

/// Configuration of one subnet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpamConfig {
    /// Subnet in CIDR notation.
    #[serde(rename = "Subnet", skip_serializing_if = "is_blank")]
    pub subnet: Option<String>,
    /// Sub-range to allocate container addresses from.
    #[serde(rename = "IPRange", skip_serializing_if = "is_blank")]
    pub ip_range: Option<String>,
    /// Gateway address.
    #[serde(rename = "Gateway", skip_serializing_if = "is_blank")]
    pub gateway: Option<String>,
    /// Auxiliary addresses reserved by the driver, keyed by host name.
    #[serde(
        rename = "AuxiliaryAddresses",
        skip_serializing_if = "HashMap::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub aux_address: HashMap<String, String>,
}

impl IpamConfig {
    /// A config for `subnet`.
    pub fn subnet(subnet: impl Into<String>) -> Self {
        Self {
            subnet: Some(subnet.into()),
            ..Self::default()
        }
    }

    /// Set the allocation range.
    #[must_use]
    pub fn with_ip_range(mut self, range: impl Into<String>) -> Self {
        self.ip_range = Some(range.into());
        self
    }

    /// Set the gateway.
    #[must_use]
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = Some(gateway.into());
        self
    }

    /// Reserve an auxiliary address.
    #[must_use]
    pub fn with_aux_address(mut self, host: impl Into<String>, address: impl Into<String>) -> Self {
        self.aux_address.insert(host.into(), address.into());
        self
    }
}

/// Body of `POST /networks/create`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CreateNetworkOptions {
    /// Network name.
    pub name: String,
    /// Ask the daemon to reject duplicate names.
    pub check_duplicate: bool,
    /// Network driver; empty selects the daemon default.
    pub driver: String,
    /// Address management configuration.
    #[serde(rename = "IPAM")]
    pub ipam: IpamOptions,
    /// Driver-specific options.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub options: HashMap<String, serde_json::Value>,
    /// User-defined metadata.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    /// Restrict external access to the network.
    pub internal: bool,
    /// Enable IPv6 networking.
    #[serde(rename = "EnableIPv6")]
    pub enable_ipv6: bool,
}

impl CreateNetworkOptions {
    /// Options for a network called `name` with daemon defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the driver.
    #[must_use]
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = driver.into();
        self
    }

    /// Set the IPAM configuration.
    #[must_use]
    pub fn with_ipam(mut self, ipam: IpamOptions) -> Self {
        self.ipam = ipam;
        self
    }

    /// Add a driver option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Add a label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Ask the daemon to reject duplicate names.
    #[must_use]
    pub const fn with_check_duplicate(mut self, check: bool) -> Self {
        self.check_duplicate = check;
        self
    }

    /// Restrict external access.
    #[must_use]
    pub const fn with_internal(mut self, internal: bool) -> Self {
        self.internal = internal;
        self
    }

    /// Enable IPv6.
    #[must_use]
    pub const fn with_ipv6(mut self, enable: bool) -> Self {
        self.enable_ipv6 = enable;
        self
    }
}

/// Reply to `POST /networks/create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateNetworkResponse {
    /// ID assigned by the daemon.
    #[serde(rename = "Id", deserialize_with = "null_as_default")]
    pub id: String,
    /// Non-fatal warning emitted by the daemon.
    #[serde(rename = "Warning", deserialize_with = "null_as_default")]
    pub warning: String,
}

/// Body of `POST /networks/{id}/connect` and `/disconnect`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NetworkConnectionOptions {
    /// Container ID or name.
    pub container: String,
    /// Endpoint settings. Only used when connecting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_config: Option<EndpointConfig>,
    /// Disconnect even if the container is running. Only used when
    /// disconnecting.
    pub force: bool,
}

impl NetworkConnectionOptions {
    /// Options targeting `container`.
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            ..Self::default()
        }
    }

    /// Set the endpoint configuration.
    #[must_use]
    pub fn with_endpoint_config(mut self, config: EndpointConfig) -> Self {
        self.endpoint_config = Some(config);
        self
    }

    /// Force the disconnect.
    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Endpoint settings for a container joining a network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Static address assignment.
    #[serde(rename = "IPAMConfig", skip_serializing_if = "is_unset")]
    pub ipam_config: Option<EndpointIpamConfig>,
    /// Legacy container links.
    #[serde(rename = "Links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
    /// DNS aliases on this network.
    #[serde(rename = "Aliases", skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Network ID.
    #[serde(rename = "NetworkID", skip_serializing_if = "String::is_empty")]
    pub network_id: String,
    /// Endpoint ID.
    #[serde(rename = "EndpointID", skip_serializing_if = "String::is_empty")]
    pub endpoint_id: String,
    /// IPv4 gateway.
    #[serde(rename = "Gateway", skip_serializing_if = "String::is_empty")]
    pub gateway: String,
    /// IPv4 address.
    #[serde(rename = "IPAddress", skip_serializing_if = "String::is_empty")]
    pub ip_address: String,
    /// IPv4 prefix length.
    #[serde(rename = "IPPrefixLen", skip_serializing_if = "is_zero")]
    pub ip_prefix_len: u32,
    /// IPv6 gateway.
    #[serde(rename = "IPv6Gateway", skip_serializing_if = "String::is_empty")]
    pub ipv6_gateway: String,
    /// Global IPv6 address.
    #[serde(rename = "GlobalIPv6Address", skip_serializing_if = "String::is_empty")]
    pub global_ipv6_address: String,
    /// Global IPv6 prefix length.
    #[serde(rename = "GlobalIPv6PrefixLen", skip_serializing_if = "is_zero")]
    pub global_ipv6_prefix_len: u32,
    /// MAC address.
    #[serde(rename = "MacAddress", skip_serializing_if = "String::is_empty")]
    pub mac_address: String,
}

impl EndpointConfig {
    /// Request static addresses.
    #[must_use]
    pub fn with_ipam_config(mut self, config: EndpointIpamConfig) -> Self {
        self.ipam_config = Some(config);
        self
    }

    /// Add a DNS alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Add a container link (`name:alias`).
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.links.push(link.into());
        self
    }
}

#[allow(clippy::ref_option)]
fn is_unset(config: &Option<EndpointIpamConfig>) -> bool {
    config.as_ref().is_none_or(EndpointIpamConfig::is_empty)
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// Static addresses for an endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointIpamConfig {
    /// Static IPv4 address.
    #[serde(rename = "IPv4Address", skip_serializing_if = "is_blank")]
    pub ipv4_address: Option<String>,
    /// Static IPv6 address.
    #[serde(rename = "IPv6Address", skip_serializing_if = "is_blank")]
    pub ipv6_address: Option<String>,
}

impl EndpointIpamConfig {
    /// Returns true if neither address is set to a non-empty value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        is_blank(&self.ipv4_address) && is_blank(&self.ipv6_address)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_ipam_fields_are_omitted() {
        let opts = CreateNetworkOptions::new("web")
            .with_driver("bridge")
            .with_ipam(IpamOptions::default().with_config(IpamConfig::subnet("10.1.0.0/24")));

        let value = serde_json::to_value(&opts).unwrap();
        assert_eq!(
            value,
            json!({
                "Name": "web",
                "CheckDuplicate": false,
                "Driver": "bridge",
                "IPAM": { "Driver": "", "Config": [{ "Subnet": "10.1.0.0/24" }] },
                "Internal": false,
                "EnableIPv6": false
            })
        );
    }

    #[test]
    fn full_ipam_config_uses_wire_names() {
        let config = IpamConfig::subnet("172.20.0.0/16")
            .with_ip_range("172.20.10.0/24")
            .with_gateway("172.20.0.1")
            .with_aux_address("router", "172.20.0.2");

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value,
            json!({
                "Subnet": "172.20.0.0/16",
                "IPRange": "172.20.10.0/24",
                "Gateway": "172.20.0.1",
                "AuxiliaryAddresses": { "router": "172.20.0.2" }
            })
        );
    }

    #[test]
    fn create_options_carry_labels_and_options() {
        let opts = CreateNetworkOptions::new("db")
            .with_label("tier", "backend")
            .with_option("com.docker.network.bridge.enable_icc", "false")
            .with_option("mtu", 1400)
            .with_check_duplicate(true)
            .with_internal(true)
            .with_ipv6(true);

        let value = serde_json::to_value(&opts).unwrap();
        assert_eq!(value["Labels"], json!({ "tier": "backend" }));
        assert_eq!(value["Options"]["mtu"], json!(1400));
        assert_eq!(
            value["Options"]["com.docker.network.bridge.enable_icc"],
            json!("false")
        );
        assert_eq!(value["CheckDuplicate"], json!(true));
        assert_eq!(value["Internal"], json!(true));
        assert_eq!(value["EnableIPv6"], json!(true));
    }

    #[test]
    fn network_with_absent_fields_decodes_to_zero_values() {
        let network: Network = serde_json::from_str(r#"{"Name":"bridge","Id":"abc123"}"#).unwrap();
        assert_eq!(network.name, "bridge");
        assert_eq!(network.id, "abc123");
        assert!(network.scope.is_empty());
        assert!(network.containers.is_empty());
        assert!(network.labels.is_empty());
        assert_eq!(network.ipam, IpamOptions::default());
        assert!(!network.internal);
        assert!(!network.enable_ipv6);
    }

    #[test]
    fn network_with_null_collections_decodes() {
        let network: Network = serde_json::from_value(json!({
            "Name": "none",
            "Id": "f00",
            "IPAM": { "Driver": "default", "Config": null },
            "Containers": null,
            "Options": null,
            "Labels": null
        }))
        .unwrap();

        assert_eq!(network.ipam.driver, "default");
        assert!(network.ipam.config.is_empty());
        assert!(network.containers.is_empty());
        assert!(network.options.is_empty());
        assert!(network.labels.is_empty());
    }

    #[test]
    fn network_with_null_scalars_decodes() {
        let network: Network =
            serde_json::from_str(r#"{"Name":"x","Id":"y","Scope":null,"Internal":null}"#).unwrap();
        assert_eq!(network.name, "x");
        assert_eq!(network.id, "y");
        assert!(network.scope.is_empty());
        assert!(!network.internal);

        let network: Network = serde_json::from_value(json!({
            "Name": null,
            "Id": null,
            "Driver": null,
            "EnableIPv6": null,
            "IPAM": { "Driver": null, "Config": [] },
            "Containers": {
                "c1": {
                    "Name": null,
                    "EndpointID": null,
                    "MacAddress": null,
                    "IPv4Address": null,
                    "IPv6Address": null
                }
            }
        }))
        .unwrap();
        assert!(network.name.is_empty());
        assert!(network.id.is_empty());
        assert!(network.driver.is_empty());
        assert!(!network.enable_ipv6);
        assert!(network.ipam.driver.is_empty());
        assert_eq!(network.containers["c1"], Endpoint::default());
    }

    #[test]
    fn endpoint_uses_endpoint_id_key() {
        let endpoint: Endpoint = serde_json::from_value(json!({
            "Name": "web",
            "EndpointID": "e1",
            "MacAddress": "02:42:ac:11:00:02",
            "IPv4Address": "172.17.0.2/16",
            "IPv6Address": ""
        }))
        .unwrap();

        assert_eq!(endpoint.id, "e1");
        assert_eq!(endpoint.ipv4_address, "172.17.0.2/16");
        assert_eq!(
            serde_json::to_value(&endpoint).unwrap()["EndpointID"],
            json!("e1")
        );
    }

    #[test]
    fn connection_options_omit_absent_endpoint_config() {
        let opts = NetworkConnectionOptions::new("web");
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({ "Container": "web", "Force": false })
        );
    }

    #[test]
    fn endpoint_config_omits_empty_fields() {
        let config = EndpointConfig::default()
            .with_alias("api")
            .with_ipam_config(EndpointIpamConfig {
                ipv4_address: Some("10.1.0.10".to_string()),
                ipv6_address: None,
            });

        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "IPAMConfig": { "IPv4Address": "10.1.0.10" },
                "Aliases": ["api"]
            })
        );
        assert_eq!(serde_json::to_value(EndpointConfig::default()).unwrap(), json!({}));
    }

    #[test]
    fn empty_string_addresses_are_omitted() {
        let config = IpamConfig {
            subnet: Some(String::new()),
            ip_range: Some(String::new()),
            gateway: Some(String::new()),
            ..IpamConfig::default()
        };
        assert_eq!(serde_json::to_value(&config).unwrap(), json!({}));

        let addresses = EndpointIpamConfig {
            ipv4_address: Some(String::new()),
            ipv6_address: Some("fd00::10".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&addresses).unwrap(),
            json!({ "IPv6Address": "fd00::10" })
        );

        let blank = EndpointIpamConfig {
            ipv4_address: Some(String::new()),
            ipv6_address: None,
        };
        assert!(blank.is_empty());
        assert_eq!(serde_json::to_value(&blank).unwrap(), json!({}));
        assert_eq!(
            serde_json::to_value(EndpointConfig::default().with_ipam_config(blank)).unwrap(),
            json!({})
        );
    }

    #[test]
    fn create_response_tolerates_missing_warning() {
        let response: CreateNetworkResponse =
            serde_json::from_str(r#"{"Id":"22be93d5babb"}"#).unwrap();
        assert_eq!(response.id, "22be93d5babb");
        assert!(response.warning.is_empty());

        let response: CreateNetworkResponse =
            serde_json::from_str(r#"{"Id":"22be93d5babb","Warning":null}"#).unwrap();
        assert!(response.warning.is_empty());
    }
}
