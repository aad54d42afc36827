//! The declarative service definition consumed by the reconciler: a YAML
//! document naming the service, its requested lifecycle and every tunable
//! the service model carries, with the unset ones falling back to defaults.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_derive::{Deserialize, Serialize};

use crate::errors::Error;
use crate::state::{
    EndpointMode, MountSpec, PortProtocol, PortPublish, RestartCondition, ServiceMode,
    ServiceState,
};

/// Requested lifecycle of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetState {
    /// The service should exist and match the definition.
    Present,
    /// The service should not exist.
    Absent,
}

/// Declared scheduling mode. The replica count is a sibling field in the
/// definition and only folds into the mode when the desired state is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeName {
    #[default]
    Replicated,
    Global,
}

fn default_user() -> String {
    String::from("root")
}

/// A service definition as declared by the operator. Parsing is strict:
/// unknown keys and unknown enum values are rejected rather than ignored.
///
/// ## Examples
///
/// ```rust
/// use hawser::definition::ServiceDefinition;
///
/// let definition = ServiceDefinition::from_yaml(
///     "name: myservice\nstate: present\nimage: alpine\n",
/// )
/// .unwrap();
/// assert_eq!(definition.name, "myservice");
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceDefinition {
    /// Service name, the sole lookup key.
    pub name: String,
    /// Requested lifecycle.
    pub state: TargetState,
    /// Image reference. Required when `state` is `present`.
    pub image: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: Vec<String>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub container_labels: HashMap<String, String>,
    #[serde(default)]
    pub mode: ModeName,
    /// Replica count. When omitted, an existing service keeps its current
    /// count and a new one starts with 1.
    #[serde(default)]
    pub replicas: Option<u64>,
    #[serde(default)]
    pub endpoint_mode: EndpointMode,
    #[serde(default)]
    pub publish: Vec<PortPublish>,
    #[serde(default)]
    pub mounts: Vec<MountSpec>,
    #[serde(default)]
    pub networks: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub limit_cpu: f64,
    #[serde(default)]
    pub reserve_cpu: f64,
    #[serde(default)]
    pub limit_memory: u64,
    #[serde(default)]
    pub reserve_memory: u64,
    #[serde(default)]
    pub restart_policy: RestartCondition,
    #[serde(default)]
    pub restart_policy_delay: u64,
    #[serde(default)]
    pub restart_policy_attempts: u64,
    #[serde(default)]
    pub restart_policy_window: u64,
    #[serde(default = "default_user")]
    pub user: String,
}

impl ServiceDefinition {
    /// Parse and validate a definition from a YAML document.
    pub fn from_yaml(input: &str) -> Result<ServiceDefinition, Error> {
        let definition: ServiceDefinition = serde_yaml::from_str(input)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Read, parse and validate a definition file.
    pub fn load(path: &Path) -> Result<ServiceDefinition, Error> {
        ServiceDefinition::from_yaml(&fs::read_to_string(path)?)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.state == TargetState::Present && self.image.is_none() {
            return Err(Error::InvalidDefinitionError {
                message: String::from("'image' is required when state is 'present'"),
            });
        }
        for port in &self.publish {
            if port.protocol == PortProtocol::Sctp {
                return Err(Error::InvalidDefinitionError {
                    message: format!(
                        "got publish.protocol 'sctp' for published port {}, valid values: 'tcp', 'udp'",
                        port.published_port
                    ),
                });
            }
        }
        Ok(())
    }

    /// Build the desired service state from this definition.
    ///
    /// `current` is the live state, if the service exists; it is consulted
    /// only for the replica-count inheritance described on
    /// [`replicas`](ServiceDefinition::replicas).
    pub fn desired_state(&self, current: Option<&ServiceState>) -> ServiceState {
        let mode = match self.mode {
            ModeName::Global => ServiceMode::Global,
            ModeName::Replicated => ServiceMode::Replicated {
                replicas: self.replicas.unwrap_or_else(|| match current.map(|c| c.mode) {
                    Some(ServiceMode::Replicated { replicas }) => replicas,
                    _ => 1,
                }),
            },
        };
        ServiceState {
            image: self.image.clone().unwrap_or_default(),
            args: self.args.clone(),
            env: self.env.clone(),
            labels: self.labels.clone(),
            container_labels: self.container_labels.clone(),
            mode,
            endpoint_mode: self.endpoint_mode,
            publish: self.publish.clone(),
            mounts: self.mounts.clone(),
            networks: self.networks.clone(),
            constraints: self.constraints.clone(),
            limit_cpu: self.limit_cpu,
            reserve_cpu: self.reserve_cpu,
            limit_memory: self.limit_memory,
            reserve_memory: self.reserve_memory,
            restart_policy: self.restart_policy,
            restart_policy_delay: self.restart_policy_delay,
            restart_policy_attempts: self.restart_policy_attempts,
            restart_policy_window: self.restart_policy_window,
            user: self.user.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MountKind;

    #[test]
    fn minimal_present_definition_gets_defaults() {
        let definition =
            ServiceDefinition::from_yaml("name: web\nstate: present\nimage: nginx:1.27\n")
                .unwrap();
        assert_eq!(definition.name, "web");
        assert_eq!(definition.state, TargetState::Present);
        assert_eq!(definition.mode, ModeName::Replicated);
        assert_eq!(definition.replicas, None);
        assert_eq!(definition.endpoint_mode, EndpointMode::Vip);
        assert_eq!(definition.restart_policy, RestartCondition::None);
        assert_eq!(definition.user, "root");
        assert!(definition.args.is_empty());
        assert!(definition.labels.is_empty());
        assert_eq!(definition.limit_cpu, 0.0);
        assert_eq!(definition.limit_memory, 0);
    }

    #[test]
    fn absent_definition_needs_no_image() {
        let definition = ServiceDefinition::from_yaml("name: web\nstate: absent\n").unwrap();
        assert_eq!(definition.state, TargetState::Absent);
        assert!(definition.image.is_none());
    }

    #[test]
    fn present_definition_without_image_is_rejected() {
        let err = ServiceDefinition::from_yaml("name: web\nstate: present\n").unwrap_err();
        assert!(matches!(err, Error::InvalidDefinitionError { .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err =
            ServiceDefinition::from_yaml("name: web\nstate: absent\nbogus: 1\n").unwrap_err();
        assert!(matches!(err, Error::DefinitionParseError(_)));
    }

    #[test]
    fn sctp_publish_protocol_is_rejected() {
        let input = "\
name: web
state: present
image: nginx:1.27
publish:
  - published_port: 132
    target_port: 132
    protocol: sctp
";
        let err = ServiceDefinition::from_yaml(input).unwrap_err();
        assert!(matches!(err, Error::InvalidDefinitionError { .. }));
    }

    #[test]
    fn mount_type_and_publish_protocol_default() {
        let input = "\
name: db
state: present
image: mysql:5.7
mounts:
  - source: /data
    target: /var/lib/mysql
publish:
  - published_port: 3306
    target_port: 3306
";
        let definition = ServiceDefinition::from_yaml(input).unwrap();
        assert_eq!(definition.mounts[0].kind, MountKind::Bind);
        assert!(!definition.mounts[0].readonly);
        assert_eq!(definition.publish[0].protocol, PortProtocol::Tcp);
    }

    #[test]
    fn omitted_replicas_inherit_from_live_state() {
        let definition =
            ServiceDefinition::from_yaml("name: web\nstate: present\nimage: nginx:1.27\n")
                .unwrap();

        let absent = definition.desired_state(None);
        assert_eq!(absent.mode, ServiceMode::Replicated { replicas: 1 });

        let live = ServiceState {
            mode: ServiceMode::Replicated { replicas: 7 },
            ..Default::default()
        };
        let desired = definition.desired_state(Some(&live));
        assert_eq!(desired.mode, ServiceMode::Replicated { replicas: 7 });
    }

    #[test]
    fn explicit_replicas_override_live_state() {
        let definition = ServiceDefinition::from_yaml(
            "name: web\nstate: present\nimage: nginx:1.27\nreplicas: 3\n",
        )
        .unwrap();
        let live = ServiceState {
            mode: ServiceMode::Replicated { replicas: 7 },
            ..Default::default()
        };
        assert_eq!(
            definition.desired_state(Some(&live)).mode,
            ServiceMode::Replicated { replicas: 3 }
        );
    }
}
