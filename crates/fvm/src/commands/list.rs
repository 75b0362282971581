use std::process::ExitCode;

use fluence_api::FluenceClient;

/// Print active and launching VMs, one per line.
pub async fn run(client: &FluenceClient) -> ExitCode {
    let vms = super::fetch_visible(client).await;

    if vms.is_empty() {
        println!("No VMs found");
        return ExitCode::SUCCESS;
    }

    for vm in &vms {
        let address = vm.address.as_deref().unwrap_or("No IP");
        println!("{} - {} - {}", vm.name, vm.status, address);
    }

    ExitCode::SUCCESS
}
