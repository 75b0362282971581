use std::io;
use std::process::ExitCode;

use tracing::{error, warn};

use ansible_sync::AnsibleState;
use fluence_api::FluenceClient;

use crate::console::Console;

/// Interactively pick one VM, confirm, delete it, and drop it from the
/// inventory and vault. Every outcome exits 0; only the cloud-side delete
/// decides whether local state is touched.
pub async fn run<C: Console>(
    client: &FluenceClient,
    state: &AnsibleState,
    console: &mut C,
) -> ExitCode {
    let vms = super::fetch_visible(client).await;
    if vms.is_empty() {
        println!("No VMs found");
        return ExitCode::SUCCESS;
    }

    println!("Available VMs:");
    for (i, vm) in vms.iter().enumerate() {
        println!("{}. {} ({}) - {}", i + 1, vm.name, vm.id, vm.status);
    }

    let selected = match select(console, vms.len()) {
        Ok(Some(index)) => &vms[index],
        Ok(None) => return ExitCode::SUCCESS,
        Err(e) => {
            warn!(error = %e, "failed to read selection");
            return ExitCode::SUCCESS;
        }
    };

    match confirm(console, &selected.name) {
        Ok(true) => {}
        Ok(false) => {
            println!("Cancelled");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            warn!(error = %e, "failed to read confirmation");
            return ExitCode::SUCCESS;
        }
    }

    match client.delete_vms(std::slice::from_ref(&selected.id)).await {
        Ok(()) => {
            println!("VM {} deleted successfully", selected.name);
            state.remove(&selected.name);
        }
        Err(e) => {
            error!(vm = %selected.name, error = %e, "failed to delete vm");
        }
    }

    ExitCode::SUCCESS
}

/// Read a 1-based menu choice; `None` means the input did not pick anything.
fn select<C: Console>(console: &mut C, count: usize) -> io::Result<Option<usize>> {
    let input = console.prompt("Select VM to delete (number): ")?;

    let Ok(choice) = input.parse::<usize>() else {
        println!("Invalid input");
        return Ok(None);
    };
    if choice < 1 || choice > count {
        println!("Invalid selection");
        return Ok(None);
    }

    Ok(Some(choice - 1))
}

/// Only a lone `y` (either case) proceeds.
fn confirm<C: Console>(console: &mut C, name: &str) -> io::Result<bool> {
    let input = console.prompt(&format!("Delete VM {name}? (y/N): "))?;
    Ok(input.eq_ignore_ascii_case("y"))
}
