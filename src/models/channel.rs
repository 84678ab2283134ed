use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::stay::{coerce_number, StayInput};

/// Candidates tried when the probe request names none.
pub const DEFAULT_PROBE_CHANNELS: [i64; 8] = [2013, 2020, 2000, 2001, 2002, 2003, 2004, 2005];
pub const MAX_PROBE_CHANNELS: usize = 12;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    pub id: Value,
    pub name: Value,
    #[serde(rename = "type")]
    pub kind: Value,
    pub is_active: Value,
    pub raw: Value,
}

impl ChannelSummary {
    /// Upstream spells the same fields several ways; take the first one present.
    pub fn from_raw(raw: &Value) -> Self {
        let pick = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| raw.get(*k))
                .find(|v| !v.is_null())
                .cloned()
                .unwrap_or(Value::Null)
        };

        ChannelSummary {
            id: pick(&["id", "channelId", "channel_id"]),
            name: pick(&["name", "channelName"]),
            kind: pick(&["type", "channelType"]),
            is_active: pick(&["isActive", "active"]),
            raw: raw.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChannelList {
    pub count: usize,
    pub channels: Vec<ChannelSummary>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeInput {
    #[serde(flatten)]
    pub stay: StayInput,
    #[serde(default)]
    pub channel_ids: Value,
}

impl ProbeInput {
    /// Integer entries of `channelIds`, capped. The default candidates apply
    /// only when `channelIds` is absent or an empty array; a list with no
    /// usable ids probes nothing.
    pub fn candidates(&self) -> Vec<i64> {
        match self.channel_ids.as_array() {
            Some(ids) if !ids.is_empty() => ids
                .iter()
                .filter_map(coerce_number)
                .filter(|n| n.fract() == 0.0 && n.abs() <= i64::MAX as f64)
                .map(|n| n as i64)
                .take(MAX_PROBE_CHANNELS)
                .collect(),
            _ => DEFAULT_PROBE_CHANNELS.to_vec(),
        }
    }
}

/// Outcome of pricing the stay under one channel (or none, for the baseline).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<i64>,
    pub ok: bool,
    pub payload_sent: Value,
    #[serde(flatten)]
    pub result: ProbeResult,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ProbeResult {
    #[serde(rename_all = "camelCase")]
    Priced {
        currency: String,
        accommodation_subtotal: f64,
        other_included_total: f64,
        total_price: f64,
        components: Value,
    },
    #[serde(rename_all = "camelCase")]
    Failed {
        status: u16,
        message: String,
        raw: Value,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestGuess {
    pub channel_id: i64,
    pub accommodation_subtotal: f64,
    pub other_included_total: f64,
    pub total_price: f64,
    pub currency: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    pub listing_id: String,
    pub nights: i64,
    pub guests: u32,
    pub arrival: String,
    pub departure: String,
    pub baseline: ProbeOutcome,
    pub probed_count: usize,
    pub results: Vec<ProbeOutcome>,
    pub best_guess: Option<BestGuess>,
}
