use std::process::ExitCode;

use tracing::error;

use ansible_sync::AnsibleState;
use fluence_api::{
    AdditionalResources, Constraints, CreateVmRequest, Datacenter, FluenceClient, OpenPort,
    StorageRequest, VmConfiguration,
};

use crate::config::Config;
use crate::poll::{self, PollConfig, PollOutcome};

const STORAGE_KIND: &str = "NVMe";
const STORAGE_UNITS: &str = "GiB";

// Every configured port is opened for both protocols.
const PORT_PROTOCOLS: [&str; 2] = ["tcp", "udp"];

/// Create one VM, wait for it to become active, and record it in the
/// inventory and vault once it is.
pub async fn run(
    client: &FluenceClient,
    config: &Config,
    state: &AnsibleState,
    name: &str,
) -> ExitCode {
    let req = creation_request(config, name);

    let id = match client.create_vm(&req).await {
        Ok(id) => id,
        Err(e) => {
            error!(vm = name, error = %e, "failed to create vm");
            return ExitCode::FAILURE;
        }
    };
    println!("VM creation initiated: {name} (ID: {id})");

    let outcome = poll::wait_for_active(
        client,
        &id,
        name,
        &PollConfig::default(),
        |host, address| state.add(host, address),
    )
    .await;

    match outcome {
        PollOutcome::Active { .. } => ExitCode::SUCCESS,
        PollOutcome::Failed => {
            println!("VM {name} failed to launch");
            ExitCode::FAILURE
        }
        PollOutcome::TimedOut => {
            println!("Timeout waiting for VM {name} to become active");
            ExitCode::FAILURE
        }
    }
}

fn creation_request(config: &Config, name: &str) -> CreateVmRequest {
    let open_ports = config
        .open_ports
        .iter()
        .flat_map(|&port| {
            PORT_PROTOCOLS.iter().map(move |proto| OpenPort {
                port,
                protocol: (*proto).to_string(),
            })
        })
        .collect();

    CreateVmRequest {
        constraints: Constraints {
            additional_resources: AdditionalResources {
                storage: vec![StorageRequest {
                    supply: config.storage_gib,
                    kind: STORAGE_KIND.to_string(),
                    units: STORAGE_UNITS.to_string(),
                }],
            },
            basic_configuration: config.basic_configuration.clone(),
            datacenter: Datacenter {
                countries: config.datacenter_countries.clone(),
            },
        },
        instances: 1,
        vm_configuration: VmConfiguration {
            hostname: name.to_string(),
            name: name.to_string(),
            open_ports,
            os_image: config.os_image.clone(),
            ssh_keys: vec![config.ssh_key_name.clone()],
        },
    }
}
