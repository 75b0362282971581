//! Typed Rust client for the Fluence VMs API.
//!
//! Covers the subset needed for managing single VMs:
//! create, status poll, page list, batch delete.

mod types;

pub use types::*;

const BASE_URL: &str = "https://api.fluence.dev/vms/v3";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("fluence api request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("fluence api {endpoint} returned {status}: {body}")]
    Api {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("fluence api {endpoint} returned a malformed response: {detail}")]
    Malformed {
        endpoint: &'static str,
        detail: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Client for the Fluence VMs REST API.
#[derive(Clone)]
pub struct FluenceClient {
    token: String,
    http: reqwest::Client,
}

impl FluenceClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{BASE_URL}{path}")
    }

    fn auth(&self) -> String {
        format!("Bearer {}", self.token)
    }

    async fn check(resp: reqwest::Response, endpoint: &'static str) -> Result<reqwest::Response> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                endpoint,
                status,
                body,
            });
        }
        Ok(resp)
    }

    /// Like `check` but only a 201 counts as success (VM creation).
    async fn check_created(
        resp: reqwest::Response,
        endpoint: &'static str,
    ) -> Result<reqwest::Response> {
        let status = resp.status();
        if status != reqwest::StatusCode::CREATED {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                endpoint,
                status,
                body,
            });
        }
        Ok(resp)
    }

    // ── VMs ──────────────────────────────────────────────────────────

    /// Request creation of a single VM, returning the provider-assigned id.
    /// The instance is still launching when this returns.
    pub async fn create_vm(&self, req: &CreateVmRequest) -> Result<VmId> {
        let resp = self
            .http
            .post(self.url(""))
            .header("Authorization", self.auth())
            .json(req)
            .send()
            .await?;

        let created: Vec<CreatedVm> = Self::check_created(resp, "create vm")
            .await?
            .json()
            .await?;

        let first = created.into_iter().next().ok_or(Error::Malformed {
            endpoint: "create vm",
            detail: "empty result set",
        })?;

        Ok(VmId(first.vm_id))
    }

    /// Current status of one VM, with its public address once it has one.
    pub async fn vm_status(&self, id: &VmId) -> Result<(VmStatus, Option<String>)> {
        let resp = self
            .http
            .get(self.url(&format!("/status?ids={id}")))
            .header("Authorization", self.auth())
            .send()
            .await?;

        let records: Vec<VmStatusRecord> = Self::check(resp, "vm status").await?.json().await?;

        let record = records.into_iter().next().ok_or(Error::Malformed {
            endpoint: "vm status",
            detail: "empty result set",
        })?;

        Ok((VmStatus::parse(&record.status), record.public_ip))
    }

    /// One provider page of VMs, unfiltered.
    pub async fn list_vms(&self) -> Result<Vec<VmSummary>> {
        let resp = self
            .http
            .get(self.url("?page=1&per_page=50"))
            .header("Authorization", self.auth())
            .send()
            .await?;

        let records: Vec<VmRecord> = Self::check(resp, "list vms").await?.json().await?;

        Ok(records.into_iter().map(VmSummary::from).collect())
    }

    /// Batch-delete VMs by id.
    pub async fn delete_vms(&self, ids: &[VmId]) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(""))
            .header("Authorization", self.auth())
            .json(&serde_json::json!({ "vmIds": ids }))
            .send()
            .await?;

        Self::check(resp, "delete vms").await?;
        Ok(())
    }
}
