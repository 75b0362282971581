use std::fmt;

use serde::{Deserialize, Serialize};

// ── Creation payload ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVmRequest {
    pub constraints: Constraints,
    pub instances: u32,
    pub vm_configuration: VmConfiguration,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    pub additional_resources: AdditionalResources,
    pub basic_configuration: String,
    pub datacenter: Datacenter,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdditionalResources {
    pub storage: Vec<StorageRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StorageRequest {
    pub supply: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub units: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Datacenter {
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmConfiguration {
    pub hostname: String,
    pub name: String,
    pub open_ports: Vec<OpenPort>,
    pub os_image: String,
    pub ssh_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenPort {
    pub port: u16,
    pub protocol: String,
}

// ── Wire response types ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatedVm {
    pub vm_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VmStatusRecord {
    pub status: String,
    pub public_ip: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VmRecord {
    pub id: String,
    pub vm_name: String,
    pub status: String,
    pub public_ip: Option<String>,
}

// ── Typed surface ────────────────────────────────────────────────────

/// Opaque provider-side VM identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VmId(pub String);

impl fmt::Display for VmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider-reported VM status. Statuses this tool does not act on
/// (`Pending`, `Stopped`, ...) all map to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmStatus {
    Launching,
    Active,
    Failed,
    Unknown,
}

impl VmStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "Launching" => Self::Launching,
            "Active" => Self::Active,
            "Failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for VmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VmStatus::Launching => "Launching",
            VmStatus::Active => "Active",
            VmStatus::Failed => "Failed",
            VmStatus::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// One VM as reported by the list endpoint.
#[derive(Debug, Clone)]
pub struct VmSummary {
    pub id: VmId,
    pub name: String,
    pub status: VmStatus,
    pub address: Option<String>,
}

impl From<VmRecord> for VmSummary {
    fn from(rec: VmRecord) -> Self {
        Self {
            id: VmId(rec.id),
            name: rec.vm_name,
            status: VmStatus::parse(&rec.status),
            address: rec.public_ip,
        }
    }
}
