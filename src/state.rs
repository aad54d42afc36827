//! The normalized service model: one representation for both the declared
//! and the live configuration of a service, holding human units only (CPU
//! cores, MiB). Wire units exist solely in the translation layer.

use std::collections::HashMap;

use serde_derive::{Deserialize, Serialize};

/// Optimistic-concurrency token attached to fetched services.
pub type ServiceVersion = u64;

/// Scheduling mode. The replica count only exists in replicated mode, so a
/// global service cannot carry a stale count around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceMode {
    /// A fixed number of identical tasks.
    Replicated {
        /// How many tasks to run.
        replicas: u64,
    },
    /// One task per eligible node.
    Global,
}

impl Default for ServiceMode {
    fn default() -> Self {
        ServiceMode::Replicated { replicas: 1 }
    }
}

/// Routing mechanism for published ports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointMode {
    /// Virtual-IP load balancing.
    #[default]
    Vip,
    /// DNS round robin.
    Dnsrr,
}

/// Restart condition of the service's tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartCondition {
    /// Never restart.
    #[default]
    None,
    /// Restart on non-zero exit.
    OnFailure,
    /// Always restart.
    Any,
}

/// Transport protocol of a published port. `sctp` can be observed on live
/// services but is rejected in declared configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortProtocol {
    #[default]
    Tcp,
    Udp,
    Sctp,
}

/// A single published port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortPublish {
    /// The port exposed on the swarm hosts.
    pub published_port: u16,
    /// The port inside the container.
    pub target_port: u16,
    #[serde(default)]
    pub protocol: PortProtocol,
}

/// The kind of a filesystem mount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountKind {
    #[default]
    Bind,
    Volume,
    Tmpfs,
    Npipe,
}

/// A filesystem mount attached to the service's containers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountSpec {
    /// Volume name or host path.
    pub source: String,
    /// Path inside the container.
    pub target: String,
    #[serde(default, rename = "type")]
    pub kind: MountKind,
    #[serde(default)]
    pub readonly: bool,
}

/// The normalized configuration of a service, declared or observed. Values
/// are immutable once constructed; construction happens either from a
/// validated [`ServiceDefinition`](crate::definition::ServiceDefinition) or
/// by normalizing a fetched service record.
///
/// Identity (`id`/`version`) deliberately lives outside this struct, on
/// [`ServiceHandle`], so that a diff can never be polluted by daemon-assigned
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceState {
    pub image: String,
    pub args: Vec<String>,
    /// Environment entries in `KEY=VALUE` form.
    pub env: Vec<String>,
    /// Labels on the service record itself.
    pub labels: HashMap<String, String>,
    /// Labels on the containers spawned for the service.
    pub container_labels: HashMap<String, String>,
    pub mode: ServiceMode,
    pub endpoint_mode: EndpointMode,
    pub publish: Vec<PortPublish>,
    pub mounts: Vec<MountSpec>,
    /// Network names; resolution to ids happens only at translation time.
    pub networks: Vec<String>,
    /// Opaque placement expressions, passed through to the scheduler.
    pub constraints: Vec<String>,
    /// CPU limit in fractional cores. 0 means no limit.
    pub limit_cpu: f64,
    /// CPU reservation in fractional cores. 0 means no reservation.
    pub reserve_cpu: f64,
    /// Memory limit in MiB. 0 means no limit.
    pub limit_memory: u64,
    /// Memory reservation in MiB. 0 means no reservation.
    pub reserve_memory: u64,
    pub restart_policy: RestartCondition,
    pub restart_policy_delay: u64,
    pub restart_policy_attempts: u64,
    pub restart_policy_window: u64,
    /// User (name or uid) the containers run as.
    pub user: String,
}

impl Default for ServiceState {
    fn default() -> Self {
        ServiceState {
            image: String::new(),
            args: Vec::new(),
            env: Vec::new(),
            labels: HashMap::new(),
            container_labels: HashMap::new(),
            mode: ServiceMode::default(),
            endpoint_mode: EndpointMode::default(),
            publish: Vec::new(),
            mounts: Vec::new(),
            networks: Vec::new(),
            constraints: Vec::new(),
            limit_cpu: 0.0,
            reserve_cpu: 0.0,
            limit_memory: 0,
            reserve_memory: 0,
            restart_policy: RestartCondition::default(),
            restart_policy_delay: 0,
            restart_policy_attempts: 0,
            restart_policy_window: 0,
            user: String::from("root"),
        }
    }
}

/// Daemon-assigned identity of a live service, round-tripped verbatim into
/// update calls and never diffed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHandle {
    pub id: String,
    pub version: ServiceVersion,
}

/// A live service: its identity plus its normalized configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteService {
    pub handle: ServiceHandle,
    pub state: ServiceState,
}

/// The outcome of comparing two service states field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct StateDiff {
    /// Names of the differing fields, in a fixed report order.
    pub fields: Vec<&'static str>,
    /// True when the divergence cannot be applied in place and the service
    /// has to be destroyed and recreated. Only network attachments trigger
    /// this: the daemon cannot alter them on a live service.
    pub requires_rebuild: bool,
}

impl StateDiff {
    /// Whether any field differs at all.
    pub fn has_changes(&self) -> bool {
        !self.fields.is_empty()
    }
}

fn sorted_ports(ports: &[PortPublish]) -> Vec<PortPublish> {
    let mut sorted = ports.to_vec();
    sorted.sort();
    sorted
}

impl ServiceState {
    /// Compare this (live) state against a desired state.
    ///
    /// Sequences compare ordered, maps compare as key/value sets, and
    /// `publish` compares as a set. The field order of the result is fixed,
    /// and is used verbatim in user-facing change reports.
    pub fn diff(&self, desired: &ServiceState) -> StateDiff {
        let mut fields = Vec::new();
        let mut requires_rebuild = false;

        if self.endpoint_mode != desired.endpoint_mode {
            fields.push("endpoint_mode");
        }
        if self.env != desired.env {
            fields.push("env");
        }
        let mode_changed = !matches!(
            (&self.mode, &desired.mode),
            (ServiceMode::Replicated { .. }, ServiceMode::Replicated { .. })
                | (ServiceMode::Global, ServiceMode::Global)
        );
        if mode_changed {
            fields.push("mode");
        }
        if self.mounts != desired.mounts {
            fields.push("mounts");
        }
        if self.networks != desired.networks {
            fields.push("networks");
            requires_rebuild = true;
        }
        if let (
            ServiceMode::Replicated { replicas: current },
            ServiceMode::Replicated { replicas: wanted },
        ) = (&self.mode, &desired.mode)
        {
            if current != wanted {
                fields.push("replicas");
            }
        }
        if self.args != desired.args {
            fields.push("args");
        }
        if self.constraints != desired.constraints {
            fields.push("constraints");
        }
        if self.labels != desired.labels {
            fields.push("labels");
        }
        if self.limit_cpu != desired.limit_cpu {
            fields.push("limit_cpu");
        }
        if self.limit_memory != desired.limit_memory {
            fields.push("limit_memory");
        }
        if self.reserve_cpu != desired.reserve_cpu {
            fields.push("reserve_cpu");
        }
        if self.reserve_memory != desired.reserve_memory {
            fields.push("reserve_memory");
        }
        if self.container_labels != desired.container_labels {
            fields.push("container_labels");
        }
        if sorted_ports(&self.publish) != sorted_ports(&desired.publish) {
            fields.push("publish");
        }
        if self.restart_policy != desired.restart_policy {
            fields.push("restart_policy");
        }
        if self.restart_policy_attempts != desired.restart_policy_attempts {
            fields.push("restart_policy_attempts");
        }
        if self.restart_policy_delay != desired.restart_policy_delay {
            fields.push("restart_policy_delay");
        }
        if self.restart_policy_window != desired.restart_policy_window {
            fields.push("restart_policy_window");
        }
        if self.image != desired.image {
            fields.push("image");
        }
        if self.user != desired.user {
            fields.push("user");
        }

        StateDiff {
            fields,
            requires_rebuild,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> ServiceState {
        ServiceState {
            image: String::from("alpine:3.20"),
            args: vec![String::from("sleep"), String::from("3600")],
            env: vec![String::from("ENVVAR1=envvar1")],
            mode: ServiceMode::Replicated { replicas: 2 },
            publish: vec![
                PortPublish {
                    published_port: 8080,
                    target_port: 80,
                    protocol: PortProtocol::Tcp,
                },
                PortPublish {
                    published_port: 9090,
                    target_port: 90,
                    protocol: PortProtocol::Udp,
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn identical_states_have_no_changes() {
        let state = baseline();
        let diff = state.diff(&state.clone());
        assert!(!diff.has_changes());
        assert!(!diff.requires_rebuild);
        assert!(diff.fields.is_empty());
    }

    #[test]
    fn network_change_requires_rebuild() {
        let live = baseline();
        let mut desired = baseline();
        desired.networks.push(String::from("backend"));
        let diff = live.diff(&desired);
        assert_eq!(diff.fields, vec!["networks"]);
        assert!(diff.requires_rebuild);
    }

    #[test]
    fn non_network_changes_apply_in_place() {
        let live = baseline();
        let mut desired = baseline();
        desired.image = String::from("alpine:edge");
        desired.restart_policy = RestartCondition::Any;
        desired.limit_cpu = 0.5;
        let diff = live.diff(&desired);
        assert!(diff.has_changes());
        assert!(!diff.requires_rebuild);
        assert_eq!(diff.fields, vec!["limit_cpu", "restart_policy", "image"]);
    }

    #[test]
    fn replica_count_reports_replicas_not_mode() {
        let live = baseline();
        let mut desired = baseline();
        desired.mode = ServiceMode::Replicated { replicas: 5 };
        let diff = live.diff(&desired);
        assert_eq!(diff.fields, vec!["replicas"]);
        assert!(!diff.requires_rebuild);
    }

    #[test]
    fn mode_switch_reports_mode() {
        let live = baseline();
        let mut desired = baseline();
        desired.mode = ServiceMode::Global;
        let diff = live.diff(&desired);
        assert_eq!(diff.fields, vec!["mode"]);
        assert!(!diff.requires_rebuild);
    }

    #[test]
    fn published_ports_compare_as_a_set() {
        let live = baseline();
        let mut desired = baseline();
        desired.publish.reverse();
        assert!(!live.diff(&desired).has_changes());
    }

    #[test]
    fn env_order_is_significant() {
        let mut live = baseline();
        live.env = vec![String::from("A=1"), String::from("B=2")];
        let mut desired = live.clone();
        desired.env.reverse();
        assert_eq!(live.diff(&desired).fields, vec!["env"]);
    }

    #[test]
    fn label_order_is_not_significant() {
        let mut live = baseline();
        live.labels.insert(String::from("a"), String::from("1"));
        live.labels.insert(String::from("b"), String::from("2"));
        let desired = live.clone();
        assert!(!live.diff(&desired).has_changes());
    }

    #[test]
    fn report_order_is_fixed() {
        let live = baseline();
        let mut desired = baseline();
        desired.image = String::from("alpine:edge");
        desired.env.push(String::from("EXTRA=1"));
        desired.networks.push(String::from("backend"));
        desired.user = String::from("nobody");
        let diff = live.diff(&desired);
        assert_eq!(diff.fields, vec!["env", "networks", "image", "user"]);
        assert!(diff.requires_rebuild);
    }
}
