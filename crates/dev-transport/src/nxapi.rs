//! NX-API client for NX-OS devices
//!
//! CLI-style calls go through the `/ins` endpoint with `cli_show` /
//! `cli_conf` envelopes; object-model calls (token login, description edits)
//! go through the `/api` DME endpoints.

use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};

use devnet_config::Device;
use devnet_core::{AdminState, InterfaceId, InterfaceSnapshot};

use crate::client::{InterfaceConfigClient, RawInterfaceConfig, TransportError};

/// NX-API request envelope for `/ins`
#[derive(Debug, Serialize)]
struct InsEnvelope<'a> {
    ins_api: InsRequest<'a>,
}

#[derive(Debug, Serialize)]
struct InsRequest<'a> {
    version: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    chunk: &'a str,
    sid: &'a str,
    input: String,
    output_format: &'a str,
}

/// NX-API client for one NX-OS device
pub struct NxapiClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl NxapiClient {
    /// Create a client from device connection parameters
    pub fn new(device: &Device) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(device.timeout_secs))
            .danger_accept_invalid_certs(!device.verify_tls)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("https://{}:{}", device.host, device.port),
            username: device.username.clone(),
            password: device.password.clone(),
        })
    }

    /// Issue an `/ins` request of the given kind with the given commands
    async fn ins_request(&self, kind: &str, commands: &[&str]) -> Result<Value, TransportError> {
        let input = commands.join(" ; ");
        debug!("NX-API {} [{}]", kind, input);

        let envelope = InsEnvelope {
            ins_api: InsRequest {
                version: "1.0",
                kind,
                chunk: "0",
                sid: "1",
                input,
                output_format: "json",
            },
        };

        let response = self
            .client
            .post(format!("{}/ins", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .header("Content-Type", "application/json")
            .json(&envelope)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TransportError::Authentication);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        check_outputs(&body)?;
        Ok(body)
    }

    /// Run show commands and return the full decoded reply
    pub async fn cli_show(&self, commands: &[&str]) -> Result<Value, TransportError> {
        self.ins_request("cli_show", commands).await
    }

    /// Run configuration commands
    pub async fn cli_conf(&self, commands: &[&str]) -> Result<Value, TransportError> {
        self.ins_request("cli_conf", commands).await
    }

    /// Authenticate against the DME and return the session token, carried as
    /// the `APIC-cookie` on object-model calls.
    pub async fn login(&self) -> Result<String, TransportError> {
        let payload = json!({
            "aaaUser": {
                "attributes": {
                    "name": self.username,
                    "pwd": self.password,
                }
            }
        });

        let response = self
            .client
            .post(format!("{}/api/aaaLogin.json", self.base_url))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TransportError::Authentication);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        body.get("imdata")
            .and_then(Value::as_array)
            .and_then(|imdata| imdata.first())
            .and_then(|entry| entry.pointer("/aaaLogin/attributes/token"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(TransportError::Authentication)
    }

    /// Set an interface description through the `l1PhysIf` managed object
    pub async fn set_interface_descr(
        &self,
        token: &str,
        intf: &InterfaceId,
        descr: &str,
    ) -> Result<Value, TransportError> {
        let url = format!("{}/api/mo/sys/intf/phys-[{}].json", self.base_url, intf);
        let payload = json!({
            "l1PhysIf": {
                "attributes": {
                    "id": intf.as_str(),
                    "descr": descr,
                }
            }
        });

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("Cookie", format!("APIC-cookie={}", token))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TransportError::Authentication);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Output entries of an `/ins` reply; a single-command reply carries an
/// object where a multi-command reply carries an array.
fn output_entries(body: &Value) -> Vec<&Value> {
    match body.pointer("/ins_api/outputs/output") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
        None => Vec::new(),
    }
}

/// Surface per-command errors reported inside an otherwise-200 reply
fn check_outputs(body: &Value) -> Result<(), TransportError> {
    for entry in output_entries(body) {
        let code = entry.get("code").and_then(Value::as_str).unwrap_or("");
        if !code.is_empty() && code != "200" {
            let msg = entry.get("msg").and_then(Value::as_str).unwrap_or("");
            let input = entry.get("input").and_then(Value::as_str).unwrap_or("");
            return Err(TransportError::DeviceError {
                message: format!("{} {} (command: {})", code, msg, input),
            });
        }
    }
    Ok(())
}

/// Body of the first command output, if any
fn first_body(body: &Value) -> Option<&Value> {
    output_entries(body).first().and_then(|e| e.get("body"))
}

/// Row of `show interface` output for a single interface
fn interface_row(body: &Value) -> Option<&Value> {
    let row = first_body(body)?.pointer("/TABLE_interface/ROW_interface")?;
    match row {
        Value::Array(items) => items.first(),
        other => Some(other),
    }
}

/// Dotted-quad netmask for a prefix length
fn mask_from_prefix(prefix: u32) -> String {
    let bits = if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - prefix.min(32))
    };
    Ipv4Addr::from(bits).to_string()
}

/// Prefix length arrives as either a JSON number or a string
fn prefix_value(row: &Value) -> Option<u32> {
    match row.get("eth_ip_mask")? {
        Value::Number(n) => n.as_u64().map(|n| n as u32),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl InterfaceConfigClient for NxapiClient {
    async fn fetch_interface(
        &self,
        id: &InterfaceId,
    ) -> Result<RawInterfaceConfig, TransportError> {
        let command = format!("show interface {}", id);
        let reply = match self.cli_show(&[&command]).await {
            Ok(reply) => reply,
            Err(TransportError::DeviceError { message }) => {
                return Err(TransportError::InterfaceNotFound {
                    interface: format!("{} ({})", id, message),
                })
            }
            Err(e) => return Err(e),
        };

        let row = interface_row(&reply).ok_or_else(|| TransportError::InterfaceNotFound {
            interface: id.to_string(),
        })?;

        Ok(RawInterfaceConfig {
            description: row
                .get("desc")
                .and_then(Value::as_str)
                .map(str::to_string),
            ip_address: row
                .get("eth_ip_addr")
                .and_then(Value::as_str)
                .map(str::to_string),
            subnet_mask: prefix_value(row).map(mask_from_prefix),
            admin_state: row.get("admin_state").and_then(Value::as_str).map(|s| {
                if s.eq_ignore_ascii_case("up") {
                    AdminState::Up
                } else {
                    AdminState::Down
                }
            }),
        })
    }

    async fn set_admin_state(
        &self,
        id: &InterfaceId,
        state: AdminState,
    ) -> Result<(), TransportError> {
        let interface = format!("interface {}", id);
        let toggle = match state {
            AdminState::Down => "shutdown",
            AdminState::Up => "no shutdown",
        };
        self.cli_conf(&[&interface, toggle]).await?;
        Ok(())
    }

    async fn apply_config(
        &self,
        id: &InterfaceId,
        fields: &InterfaceSnapshot,
    ) -> Result<(), TransportError> {
        let interface = format!("interface {}", id);
        let description = if fields.description.is_empty() {
            "no description".to_string()
        } else {
            format!("description {}", fields.description)
        };
        let address = if fields.ip_address.is_empty() {
            "no ip address".to_string()
        } else {
            format!("ip address {} {}", fields.ip_address, fields.subnet_mask)
        };
        self.cli_conf(&[&interface, &description, &address]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show_interface_reply() -> Value {
        json!({
            "ins_api": {
                "outputs": {
                    "output": {
                        "code": "200",
                        "msg": "Success",
                        "input": "show interface eth1/2",
                        "body": {
                            "TABLE_interface": {
                                "ROW_interface": {
                                    "interface": "Ethernet1/2",
                                    "desc": "uplink",
                                    "admin_state": "up",
                                    "eth_ip_addr": "10.0.0.1",
                                    "eth_ip_mask": 24
                                }
                            }
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn test_interface_row_extraction() {
        let reply = show_interface_reply();
        let row = interface_row(&reply).unwrap();
        assert_eq!(row.get("desc").and_then(Value::as_str), Some("uplink"));
    }

    #[test]
    fn test_check_outputs_reports_command_error() {
        let reply = json!({
            "ins_api": {
                "outputs": {
                    "output": [
                        { "code": "200", "msg": "Success", "input": "interface eth1/2" },
                        { "code": "400", "msg": "Invalid command", "input": "descriptionn x" }
                    ]
                }
            }
        });
        let err = check_outputs(&reply).unwrap_err();
        match err {
            TransportError::DeviceError { message } => {
                assert!(message.contains("400"));
                assert!(message.contains("descriptionn x"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_mask_from_prefix() {
        assert_eq!(mask_from_prefix(24), "255.255.255.0");
        assert_eq!(mask_from_prefix(30), "255.255.255.252");
        assert_eq!(mask_from_prefix(32), "255.255.255.255");
        assert_eq!(mask_from_prefix(0), "0.0.0.0");
    }

    #[test]
    fn test_prefix_value_number_or_string() {
        let row = json!({ "eth_ip_mask": 24 });
        assert_eq!(prefix_value(&row), Some(24));
        let row = json!({ "eth_ip_mask": "24" });
        assert_eq!(prefix_value(&row), Some(24));
        let row = json!({});
        assert_eq!(prefix_value(&row), None);
    }
}
