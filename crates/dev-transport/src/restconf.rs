//! RESTCONF client for IOS-XE devices
//!
//! Configuration edits go through the `Cisco-IOS-XE-native` model, keyed the
//! way the device CLI names GigabitEthernet interfaces (`"2"` for
//! GigabitEthernet2). Operational state is read from the
//! `Cisco-IOS-XE-interfaces-oper` model, which is keyed by the full interface
//! name.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

use devnet_config::Device;
use devnet_core::{AdminState, InterfaceId, InterfaceSnapshot};

use crate::client::{
    normalize_status, InterfaceConfigClient, InterfaceState, RawInterfaceConfig, TransportError,
};

const YANG_JSON: &str = "application/yang-data+json";

/// RESTCONF client for one IOS-XE device
pub struct RestconfClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl RestconfClient {
    /// Create a client from device connection parameters
    pub fn new(device: &Device) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(device.timeout_secs))
            .danger_accept_invalid_certs(!device.verify_tls)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("https://{}:{}/restconf", device.host, device.port),
            username: device.username.clone(),
            password: device.password.clone(),
        })
    }

    fn native_interface_path(&self, id: &InterfaceId) -> String {
        format!(
            "/data/Cisco-IOS-XE-native:native/interface/GigabitEthernet={}",
            urlencoding::encode(id.as_str())
        )
    }

    /// Issue an authenticated yang-data request; non-2xx statuses map to
    /// typed errors, 404 stays distinguishable for the callers that treat it
    /// as "absent" rather than failure.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<reqwest::Response, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("RESTCONF {} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", YANG_JSON)
            .header("Content-Type", YANG_JSON);

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TransportError::Authentication);
        }
        Ok(response)
    }

    async fn expect_success(response: reqwest::Response) -> Result<(), TransportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response.text().await.unwrap_or_default();
        Err(TransportError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn json_body(response: reqwest::Response) -> Result<Value, TransportError> {
        let status = response.status();
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

    /// Fetch operational state of one interface (full name, e.g.
    /// `GigabitEthernet1`) for status display.
    pub async fn interface_state(&self, name: &str) -> Result<InterfaceState, TransportError> {
        let path = format!(
            "/data/Cisco-IOS-XE-interfaces-oper:interfaces/interface={}",
            urlencoding::encode(name)
        );
        let response = self.request(Method::GET, &path, None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TransportError::InterfaceNotFound {
                interface: name.to_string(),
            });
        }
        let body = Self::json_body(response).await?;

        let iface = container(&body, "Cisco-IOS-XE-interfaces-oper:interface").ok_or_else(|| {
            TransportError::Decode("missing interface container in oper reply".to_string())
        })?;

        Ok(InterfaceState {
            name: name.to_string(),
            description: iface
                .get("description")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or("N/A")
                .to_string(),
            admin_status: normalize_status(iface.get("admin-status").and_then(Value::as_str)),
            oper_status: normalize_status(iface.get("oper-status").and_then(Value::as_str)),
        })
    }
}

/// Unwrap a RESTCONF reply container, tolerating the list-query form where
/// the value arrives as a one-element array.
fn container<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    let value = body.get(key)?;
    match value {
        Value::Array(items) => items.first(),
        other => Some(other),
    }
}

/// Parse the native-model interface subtree into a raw configuration
fn parse_native_interface(body: &Value) -> Result<RawInterfaceConfig, TransportError> {
    let iface = container(body, "Cisco-IOS-XE-native:GigabitEthernet").ok_or_else(|| {
        TransportError::Decode("missing GigabitEthernet container in reply".to_string())
    })?;

    let primary = iface
        .get("ip")
        .and_then(|ip| ip.get("address"))
        .and_then(|addr| addr.get("primary"));

    Ok(RawInterfaceConfig {
        description: iface
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        ip_address: primary
            .and_then(|p| p.get("address"))
            .and_then(Value::as_str)
            .map(str::to_string),
        subnet_mask: primary
            .and_then(|p| p.get("mask"))
            .and_then(Value::as_str)
            .map(str::to_string),
        admin_state: Some(if iface.get("shutdown").is_some() {
            AdminState::Down
        } else {
            AdminState::Up
        }),
    })
}

#[async_trait]
impl InterfaceConfigClient for RestconfClient {
    async fn fetch_interface(
        &self,
        id: &InterfaceId,
    ) -> Result<RawInterfaceConfig, TransportError> {
        let path = self.native_interface_path(id);
        let response = self.request(Method::GET, &path, None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TransportError::InterfaceNotFound {
                interface: id.to_string(),
            });
        }
        // 204: interface exists with no configured leaves
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(RawInterfaceConfig::default());
        }
        let body = Self::json_body(response).await?;
        parse_native_interface(&body)
    }

    async fn set_admin_state(
        &self,
        id: &InterfaceId,
        state: AdminState,
    ) -> Result<(), TransportError> {
        let path = self.native_interface_path(id);
        match state {
            AdminState::Down => {
                // shutdown is a presence leaf; PATCHing it in shuts the port
                let body = json!({
                    "Cisco-IOS-XE-native:GigabitEthernet": {
                        "name": id.as_str(),
                        "shutdown": [null],
                    }
                });
                let response = self.request(Method::PATCH, &path, Some(body)).await?;
                Self::expect_success(response).await
            }
            AdminState::Up => {
                let response = self
                    .request(Method::DELETE, &format!("{}/shutdown", path), None)
                    .await?;
                // already up
                if response.status() == StatusCode::NOT_FOUND {
                    return Ok(());
                }
                Self::expect_success(response).await
            }
        }
    }

    async fn apply_config(
        &self,
        id: &InterfaceId,
        fields: &InterfaceSnapshot,
    ) -> Result<(), TransportError> {
        let path = self.native_interface_path(id);
        let mut iface = json!({
            "name": id.as_str(),
            "description": fields.description,
        });
        if !fields.ip_address.is_empty() && !fields.subnet_mask.is_empty() {
            iface["ip"] = json!({
                "address": {
                    "primary": {
                        "address": fields.ip_address,
                        "mask": fields.subnet_mask,
                    }
                }
            });
        }
        let body = json!({ "Cisco-IOS-XE-native:GigabitEthernet": iface });
        let response = self.request(Method::PATCH, &path, Some(body)).await?;
        Self::expect_success(response).await?;

        // A snapshot without an address means the interface had none; make
        // the applied state match by removing any primary address left over.
        if fields.ip_address.is_empty() {
            let response = self
                .request(
                    Method::DELETE,
                    &format!("{}/ip/address/primary", path),
                    None,
                )
                .await?;
            if response.status() != StatusCode::NOT_FOUND {
                Self::expect_success(response).await?;
            }
        }
        Ok(())
    }
}
