//! Translation of the normalized service model into the daemon's wire
//! structures. This is the only place wire units (nano-CPUs, bytes) appear;
//! translation is pure and deterministic and mutates neither of its inputs.

use std::collections::HashMap;

use crate::errors::Error;
use crate::models;
use crate::state::{
    EndpointMode, MountKind, PortProtocol, RestartCondition, ServiceMode, ServiceState,
};

const NANO_CPUS: f64 = 1_000_000_000.0;
const MIB: i64 = 1024 * 1024;

/// Name→id lookup over the networks known to the daemon, built once per
/// reconciliation pass. The daemon is the sole source of truth for network
/// membership; nothing here outlives the pass.
#[derive(Debug, Clone, Default)]
pub struct NetworkTable {
    entries: Vec<models::Network>,
}

impl NetworkTable {
    /// Build the table from a `list_networks` response.
    pub fn new(networks: Vec<models::Network>) -> NetworkTable {
        NetworkTable { entries: networks }
    }

    /// Resolve a network name to its daemon-assigned id.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|network| network.name == name)
            .map(|network| network.id.as_str())
    }

    /// Resolve a network id back to its name.
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|network| network.id == id)
            .map(|network| network.name.as_str())
    }
}

pub(crate) fn nano_cpus(cores: f64) -> i64 {
    (cores * NANO_CPUS).round() as i64
}

pub(crate) fn cores(nano_cpus: i64) -> f64 {
    nano_cpus as f64 / NANO_CPUS
}

pub(crate) fn mebibytes(bytes: i64) -> u64 {
    (bytes.max(0) / MIB) as u64
}

fn restart_condition(condition: RestartCondition) -> models::TaskSpecRestartPolicyCondition {
    match condition {
        RestartCondition::None => models::TaskSpecRestartPolicyCondition::None,
        RestartCondition::OnFailure => models::TaskSpecRestartPolicyCondition::OnFailure,
        RestartCondition::Any => models::TaskSpecRestartPolicyCondition::Any,
    }
}

fn endpoint_mode(mode: EndpointMode) -> models::EndpointSpecMode {
    match mode {
        EndpointMode::Vip => models::EndpointSpecMode::Vip,
        EndpointMode::Dnsrr => models::EndpointSpecMode::Dnsrr,
    }
}

fn mount_type(kind: MountKind) -> models::MountType {
    match kind {
        MountKind::Bind => models::MountType::Bind,
        MountKind::Volume => models::MountType::Volume,
        MountKind::Tmpfs => models::MountType::Tmpfs,
        MountKind::Npipe => models::MountType::Npipe,
    }
}

fn port_protocol(protocol: PortProtocol) -> models::EndpointPortConfigProtocol {
    match protocol {
        PortProtocol::Tcp => models::EndpointPortConfigProtocol::Tcp,
        PortProtocol::Udp => models::EndpointPortConfigProtocol::Udp,
        PortProtocol::Sctp => models::EndpointPortConfigProtocol::Sctp,
    }
}

/// Map a service state onto the wire `ServiceSpec` the create and update
/// endpoints accept.
///
/// Every network name must resolve through `networks`; an unresolved name
/// fails the translation as a whole. The attachment order follows the order
/// of `state.networks`.
pub fn service_spec(
    name: &str,
    state: &ServiceState,
    networks: &NetworkTable,
) -> Result<models::ServiceSpec, Error> {
    let container_spec = models::TaskSpecContainerSpec {
        image: Some(state.image.clone()),
        labels: Some(state.container_labels.clone()),
        args: Some(state.args.clone()),
        env: Some(state.env.clone()),
        user: Some(state.user.clone()),
        mounts: Some(
            state
                .mounts
                .iter()
                .map(|mount| models::Mount {
                    target: Some(mount.target.clone()),
                    source: Some(mount.source.clone()),
                    typ: Some(mount_type(mount.kind)),
                    read_only: Some(mount.readonly),
                })
                .collect(),
        ),
    };

    // Reservation CPU tracks the limit value here, not the reserve value.
    let resources = models::TaskSpecResources {
        limits: Some(models::ResourceObject {
            nano_cpus: Some(nano_cpus(state.limit_cpu)),
            memory_bytes: Some(state.limit_memory as i64 * MIB),
        }),
        reservations: Some(models::ResourceObject {
            nano_cpus: Some(nano_cpus(state.limit_cpu)),
            memory_bytes: Some(state.reserve_memory as i64 * MIB),
        }),
    };

    let restart_policy = models::TaskSpecRestartPolicy {
        condition: Some(restart_condition(state.restart_policy)),
        delay: Some(state.restart_policy_delay as i64),
        max_attempts: Some(state.restart_policy_attempts as i64),
        window: Some(state.restart_policy_window as i64),
    };

    let mode = match state.mode {
        ServiceMode::Replicated { replicas } => models::ServiceSpecMode {
            replicated: Some(models::ServiceSpecModeReplicated {
                replicas: Some(replicas as i64),
            }),
            global: None,
        },
        ServiceMode::Global => models::ServiceSpecMode {
            replicated: None,
            global: Some(HashMap::new()),
        },
    };

    let mut attachments = Vec::with_capacity(state.networks.len());
    for network_name in &state.networks {
        match networks.resolve(network_name) {
            Some(id) => attachments.push(models::NetworkAttachmentConfig {
                target: Some(id.to_string()),
            }),
            None => {
                return Err(Error::NetworkNotFoundError {
                    name: network_name.clone(),
                })
            }
        }
    }

    let endpoint_spec = models::EndpointSpec {
        mode: Some(endpoint_mode(state.endpoint_mode)),
        ports: Some(
            state
                .publish
                .iter()
                .map(|port| models::EndpointPortConfig {
                    protocol: Some(port_protocol(port.protocol)),
                    target_port: Some(port.target_port),
                    published_port: Some(port.published_port),
                })
                .collect(),
        ),
    };

    Ok(models::ServiceSpec {
        name: Some(name.to_string()),
        labels: Some(state.labels.clone()),
        task_template: Some(models::TaskSpec {
            container_spec: Some(container_spec),
            resources: Some(resources),
            restart_policy: Some(restart_policy),
            placement: Some(models::TaskSpecPlacement {
                constraints: Some(state.constraints.clone()),
            }),
        }),
        mode: Some(mode),
        networks: Some(attachments),
        endpoint_spec: Some(endpoint_spec),
    })
}
