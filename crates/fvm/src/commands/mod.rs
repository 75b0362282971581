pub mod create;
pub mod delete;
pub mod list;

use tracing::warn;

use fluence_api::{FluenceClient, VmStatus, VmSummary};

/// VMs worth showing: the ones running or on their way up.
fn launching_or_active(vms: Vec<VmSummary>) -> Vec<VmSummary> {
    vms.into_iter()
        .filter(|vm| matches!(vm.status, VmStatus::Active | VmStatus::Launching))
        .collect()
}

/// One filtered provider page. An API failure degrades to an empty list so
/// the list and delete flows render "No VMs found" instead of aborting.
async fn fetch_visible(client: &FluenceClient) -> Vec<VmSummary> {
    match client.list_vms().await {
        Ok(vms) => launching_or_active(vms),
        Err(e) => {
            warn!(error = %e, "failed to list vms");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluence_api::VmId;

    fn vm(name: &str, status: VmStatus) -> VmSummary {
        VmSummary {
            id: VmId(format!("id-{name}")),
            name: name.to_string(),
            status,
            address: None,
        }
    }

    #[test]
    fn filter_keeps_only_active_and_launching() {
        let vms = vec![
            vm("a", VmStatus::Active),
            vm("b", VmStatus::Unknown),
            vm("c", VmStatus::Launching),
            vm("d", VmStatus::Failed),
        ];

        let visible = launching_or_active(vms);

        let names: Vec<_> = visible.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }
}
