//! Drives a launching VM to a terminal outcome by repeated status queries.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use fluence_api::{FluenceClient, VmId, VmStatus};

/// How a watched VM left the launching state. `TimedOut` is declared
/// locally; the other two are provider-reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Active { address: String },
    Failed,
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    pub ceiling: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            ceiling: Duration::from_secs(600),
        }
    }
}

/// Source of status observations, so the wait loop can run against a fake.
#[async_trait]
pub trait StatusProbe {
    async fn status(&self, id: &VmId) -> fluence_api::Result<(VmStatus, Option<String>)>;
}

#[async_trait]
impl StatusProbe for FluenceClient {
    async fn status(&self, id: &VmId) -> fluence_api::Result<(VmStatus, Option<String>)> {
        self.vm_status(id).await
    }
}

/// Poll until the VM reaches a terminal status or `cfg.ceiling` elapses.
///
/// `on_active` runs exactly once, with the observed address, when the VM
/// reaches `Active`; `Failed` and `TimedOut` never invoke it. Errors during
/// polling are transient: logged and retried until the ceiling. An `Active`
/// report without an address is treated the same way, since the address is
/// what reconciliation needs.
pub async fn wait_for_active<P, F>(
    probe: &P,
    id: &VmId,
    name: &str,
    cfg: &PollConfig,
    on_active: F,
) -> PollOutcome
where
    P: StatusProbe + Sync,
    F: FnOnce(&str, &str),
{
    let mut elapsed = Duration::ZERO;

    while elapsed < cfg.ceiling {
        match probe.status(id).await {
            Ok((VmStatus::Active, Some(address))) => {
                println!("VM {name} is active with IP: {address}");
                on_active(name, &address);
                return PollOutcome::Active { address };
            }
            Ok((VmStatus::Active, None)) => {
                warn!(vm = name, "active but no public address reported yet");
            }
            Ok((VmStatus::Failed, _)) => {
                return PollOutcome::Failed;
            }
            Ok((status, _)) => {
                println!("VM {name} status: {status}");
            }
            Err(e) => {
                warn!(vm = name, error = %e, "status check failed, retrying");
            }
        }

        tokio::time::sleep(cfg.interval).await;
        elapsed += cfg.interval;
    }

    PollOutcome::TimedOut
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::sync::Mutex;

    enum Step {
        Report(VmStatus, Option<&'static str>),
        Error,
    }

    /// Replays a fixed script of status responses, then reports
    /// `Launching` forever.
    struct ScriptedProbe {
        script: Mutex<Vec<Step>>,
    }

    impl ScriptedProbe {
        fn new(script: Vec<Step>) -> Self {
            Self {
                script: Mutex::new(script),
            }
        }
    }

    #[async_trait]
    impl StatusProbe for ScriptedProbe {
        async fn status(&self, _id: &VmId) -> fluence_api::Result<(VmStatus, Option<String>)> {
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                return Ok((VmStatus::Launching, None));
            }
            match script.remove(0) {
                Step::Report(status, ip) => Ok((status, ip.map(str::to_string))),
                Step::Error => Err(fluence_api::Error::Malformed {
                    endpoint: "vm status",
                    detail: "empty result set",
                }),
            }
        }
    }

    fn cfg() -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(10),
            ceiling: Duration::from_secs(60),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn active_triggers_hook_once_with_observed_address() {
        let probe = ScriptedProbe::new(vec![
            Step::Report(VmStatus::Launching, None),
            Step::Report(VmStatus::Active, Some("1.2.3.4")),
        ]);
        let calls = Cell::new(0);
        let seen = RefCell::new(String::new());

        let outcome = wait_for_active(&probe, &VmId("vm-1".into()), "node1", &cfg(), |_, addr| {
            calls.set(calls.get() + 1);
            seen.replace(addr.to_string());
        })
        .await;

        assert_eq!(
            outcome,
            PollOutcome::Active {
                address: "1.2.3.4".into()
            }
        );
        assert_eq!(calls.get(), 1);
        assert_eq!(*seen.borrow(), "1.2.3.4");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_returns_immediately_without_hook() {
        let probe = ScriptedProbe::new(vec![Step::Report(VmStatus::Failed, None)]);
        let calls = Cell::new(0);

        let outcome = wait_for_active(&probe, &VmId("vm-1".into()), "node1", &cfg(), |_, _| {
            calls.set(calls.get() + 1);
        })
        .await;

        assert_eq!(outcome, PollOutcome::Failed);
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_do_not_abort_the_wait() {
        let probe = ScriptedProbe::new(vec![
            Step::Error,
            Step::Error,
            Step::Report(VmStatus::Active, Some("1.2.3.4")),
        ]);
        let calls = Cell::new(0);

        let outcome = wait_for_active(&probe, &VmId("vm-1".into()), "node1", &cfg(), |_, _| {
            calls.set(calls.get() + 1);
        })
        .await;

        assert!(matches!(outcome, PollOutcome::Active { .. }));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn active_without_address_keeps_polling() {
        let probe = ScriptedProbe::new(vec![
            Step::Report(VmStatus::Active, None),
            Step::Report(VmStatus::Active, Some("1.2.3.4")),
        ]);
        let calls = Cell::new(0);

        let outcome = wait_for_active(&probe, &VmId("vm-1".into()), "node1", &cfg(), |_, _| {
            calls.set(calls.get() + 1);
        })
        .await;

        assert!(matches!(outcome, PollOutcome::Active { .. }));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ceiling_bounds_the_wait() {
        let probe = ScriptedProbe::new(vec![]);
        let calls = Cell::new(0);

        let outcome = wait_for_active(&probe, &VmId("vm-1".into()), "node1", &cfg(), |_, _| {
            calls.set(calls.get() + 1);
        })
        .await;

        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(calls.get(), 0);
    }
}
