use serde::Deserialize;
use serde_json::Value;

use super::error::TopologyError;

pub(super) const NO_PEER: &str = "00:00:00:00:00:00";

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawDevice {
    #[serde(rename = "MAC")]
    pub(super) mac: String,
    #[serde(default, rename = "IP")]
    pub(super) ip: Value,
    #[serde(default, rename = "Vendor")]
    pub(super) vendor: Value,
    #[serde(default, rename = "Protocol")]
    pub(super) protocol: Value,
    #[serde(default, rename = "Port")]
    pub(super) port: Value,
    #[serde(default)]
    pub(super) status: Value,
    #[serde(flatten)]
    pub(super) extra: serde_json::Map<String, Value>,
}

impl RawDevice {
    pub(super) fn peers(&self) -> Vec<&str> {
        self.extra
            .get(&self.mac)
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|peer| !peer.is_empty() && *peer != NO_PEER)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(super) fn is_active(&self) -> bool {
        match &self.status {
            Value::String(status) => status == "true",
            Value::Bool(status) => *status,
            _ => false,
        }
    }
}

pub(super) struct RawCategory {
    pub(super) name: String,
    pub(super) devices: Vec<Result<RawDevice, String>>,
}

impl RawCategory {
    pub(super) fn tag(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}

pub(super) fn parse_document(document: Option<&Value>) -> Result<Vec<RawCategory>, TopologyError> {
    let invalid = |reason: &str| TopologyError::InvalidTopologyFormat(reason.to_owned());

    let document = document.ok_or_else(|| invalid("no document"))?;
    let root = document
        .as_array()
        .ok_or_else(|| invalid("expected a top-level array"))?
        .first()
        .ok_or_else(|| invalid("top-level array is empty"))?;
    let mac_data = root
        .get("mac_data")
        .ok_or_else(|| invalid("first record has no mac_data field"))?
        .as_array()
        .ok_or_else(|| invalid("mac_data is not a list"))?;

    let mut categories = Vec::with_capacity(mac_data.len());
    for entry in mac_data {
        let object = entry
            .as_object()
            .ok_or_else(|| invalid("mac_data entries must be objects"))?;

        for (name, devices) in object {
            let devices = devices
                .as_array()
                .ok_or_else(|| invalid("category value must be a list of devices"))?;
            let devices = devices
                .iter()
                .map(|device| RawDevice::deserialize(device).map_err(|error| error.to_string()))
                .collect();
            categories.push(RawCategory {
                name: name.clone(),
                devices,
            });
        }
    }

    Ok(categories)
}

pub(super) fn value_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_string).collect(),
        other => scalar_string(other).into_iter().collect(),
    }
}

pub(super) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_owned()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
