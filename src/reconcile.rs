//! Fetching live service state and driving a single convergence pass:
//! fetch → diff → act, with the action reduced to the smallest call set the
//! daemon needs to match the declared configuration.

use std::collections::HashMap;

use log::{debug, info};
use serde_derive::Serialize;

use crate::definition::{ServiceDefinition, TargetState};
use crate::docker::Docker;
use crate::errors::Error;
use crate::models;
use crate::service::{ListServicesOptions, UpdateServiceOptions};
use crate::state::{
    EndpointMode, MountKind, MountSpec, PortProtocol, PortPublish, RemoteService,
    ServiceHandle, ServiceMode, ServiceState,
};
use crate::translate::{self, NetworkTable};

/// The orchestration API surface the reconciler consumes. [`Docker`]
/// implements it against a live daemon; tests implement it in memory.
///
/// Every method is a single blocking round-trip; the reconciler never runs
/// two of them concurrently, and relies on the version token inside
/// [`ServiceHandle`] — not on locking — for safety against concurrent
/// writers.
#[allow(async_fn_in_trait)]
pub trait SwarmBackend {
    /// Find the service with exactly this name, or `None` when it does not
    /// exist.
    async fn find_service(&self, name: &str) -> Result<Option<models::Service>, Error>;

    /// List the networks known to the daemon.
    async fn networks(&self) -> Result<Vec<models::Network>, Error>;

    /// Create a service from a fully translated spec.
    async fn create(&self, spec: models::ServiceSpec) -> Result<(), Error>;

    /// Update a live service, presenting the version token last observed on
    /// it. A stale token must fail with [`Error::UpdateConflictError`].
    async fn update(&self, handle: &ServiceHandle, spec: models::ServiceSpec)
        -> Result<(), Error>;

    /// Remove a service by name.
    async fn remove(&self, name: &str) -> Result<(), Error>;
}

impl SwarmBackend for Docker {
    async fn find_service(&self, name: &str) -> Result<Option<models::Service>, Error> {
        let mut filters = HashMap::new();
        filters.insert(String::from("name"), vec![name.to_string()]);
        let services = self
            .list_services(Some(ListServicesOptions { filters }))
            .await?;
        // The daemon's name filter matches substrings; insist on an exact hit.
        Ok(services
            .into_iter()
            .find(|service| service.spec.name.as_deref() == Some(name)))
    }

    async fn networks(&self) -> Result<Vec<models::Network>, Error> {
        self.list_networks(None).await
    }

    async fn create(&self, spec: models::ServiceSpec) -> Result<(), Error> {
        self.create_service(spec).await.map(|_| ())
    }

    async fn update(
        &self,
        handle: &ServiceHandle,
        spec: models::ServiceSpec,
    ) -> Result<(), Error> {
        let name = spec.name.clone().unwrap_or_default();
        let options = UpdateServiceOptions {
            version: handle.version,
        };
        match self.update_service(&handle.id, spec, options).await {
            Ok(_) => Ok(()),
            Err(Error::DockerResponseServerError {
                status_code,
                message,
            }) if status_code == 409 || message.contains("out of sequence") => {
                Err(Error::UpdateConflictError {
                    name,
                    version: handle.version,
                })
            }
            Err(err) => Err(err),
        }
    }

    async fn remove(&self, name: &str) -> Result<(), Error> {
        self.delete_service(name).await
    }
}

/// Normalize a raw service record into the comparable model: wire units to
/// human units, network ids back to names, and absent optional fields to the
/// same defaults the definition side uses.
fn normalize(raw: models::Service, networks: &NetworkTable) -> Result<RemoteService, Error> {
    let models::Service {
        id,
        version,
        spec,
        endpoint,
    } = raw;
    let handle = ServiceHandle {
        id,
        version: version.index,
    };

    let task = spec.task_template.unwrap_or_default();
    let container = task.container_spec.unwrap_or_default();

    let mut state = ServiceState {
        image: container.image.unwrap_or_default(),
        args: container.args.unwrap_or_default(),
        env: container.env.unwrap_or_default(),
        user: container.user.unwrap_or_else(|| String::from("root")),
        container_labels: container.labels.unwrap_or_default(),
        labels: spec.labels.unwrap_or_default(),
        ..Default::default()
    };

    state.mounts = container
        .mounts
        .unwrap_or_default()
        .into_iter()
        .map(|mount| MountSpec {
            source: mount.source.unwrap_or_default(),
            target: mount.target.unwrap_or_default(),
            kind: match mount.typ {
                Some(models::MountType::Volume) => MountKind::Volume,
                Some(models::MountType::Tmpfs) => MountKind::Tmpfs,
                Some(models::MountType::Npipe) => MountKind::Npipe,
                _ => MountKind::Bind,
            },
            readonly: mount.read_only.unwrap_or(false),
        })
        .collect();

    if let Some(policy) = task.restart_policy {
        state.restart_policy = match policy.condition {
            Some(models::TaskSpecRestartPolicyCondition::OnFailure) => {
                crate::state::RestartCondition::OnFailure
            }
            Some(models::TaskSpecRestartPolicyCondition::Any) => {
                crate::state::RestartCondition::Any
            }
            _ => crate::state::RestartCondition::None,
        };
        state.restart_policy_delay = policy.delay.unwrap_or(0).max(0) as u64;
        state.restart_policy_attempts = policy.max_attempts.unwrap_or(0).max(0) as u64;
        state.restart_policy_window = policy.window.unwrap_or(0).max(0) as u64;
    }

    if let Some(resources) = task.resources {
        if let Some(limits) = resources.limits {
            state.limit_cpu = translate::cores(limits.nano_cpus.unwrap_or(0));
            state.limit_memory = translate::mebibytes(limits.memory_bytes.unwrap_or(0));
        }
        if let Some(reservations) = resources.reservations {
            state.reserve_cpu = translate::cores(reservations.nano_cpus.unwrap_or(0));
            state.reserve_memory = translate::mebibytes(reservations.memory_bytes.unwrap_or(0));
        }
    }

    if let Some(placement) = task.placement {
        state.constraints = placement.constraints.unwrap_or_default();
    }

    if let Some(endpoint_spec) = endpoint.and_then(|endpoint| endpoint.spec) {
        state.endpoint_mode = match endpoint_spec.mode {
            Some(models::EndpointSpecMode::Dnsrr) => EndpointMode::Dnsrr,
            _ => EndpointMode::Vip,
        };
        state.publish = endpoint_spec
            .ports
            .unwrap_or_default()
            .into_iter()
            .map(|port| PortPublish {
                published_port: port.published_port.unwrap_or(0),
                target_port: port.target_port.unwrap_or(0),
                protocol: match port.protocol {
                    Some(models::EndpointPortConfigProtocol::Udp) => PortProtocol::Udp,
                    Some(models::EndpointPortConfigProtocol::Sctp) => PortProtocol::Sctp,
                    _ => PortProtocol::Tcp,
                },
            })
            .collect();
    }

    state.mode = match spec.mode {
        Some(mode) => {
            if let Some(replicated) = mode.replicated {
                ServiceMode::Replicated {
                    replicas: replicated.replicas.unwrap_or(1).max(0) as u64,
                }
            } else if mode.global.is_some() {
                ServiceMode::Global
            } else {
                return Err(Error::UnknownServiceModeError {
                    mode: format!("{mode:?}"),
                });
            }
        }
        None => {
            return Err(Error::UnknownServiceModeError {
                mode: String::from("absent"),
            })
        }
    };

    let mut names = Vec::with_capacity(spec.networks.as_ref().map_or(0, Vec::len));
    for attachment in spec.networks.unwrap_or_default() {
        let target = attachment.target.unwrap_or_default();
        match networks.name_of(&target) {
            Some(name) => names.push(name.to_string()),
            None => return Err(Error::NetworkNotFoundError { name: target }),
        }
    }
    state.networks = names;

    Ok(RemoteService { handle, state })
}

/// What a reconciliation pass did, or — under dry-run — would have done.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    /// Whether anything was (or would be) mutated.
    pub changed: bool,
    /// Whether the service was destroyed and recreated.
    pub rebuilt: bool,
    /// Human-readable description of the action taken.
    pub message: String,
    /// Names of the fields that diverged, in report order.
    pub changes: Vec<&'static str>,
    /// The service state the pass converged on, when the target is present.
    pub service: Option<ServiceState>,
}

/// Drives one fetch → diff → converge pass over a single service.
///
/// The pass is synchronous and not retried: a conflicting concurrent writer
/// surfaces as [`Error::UpdateConflictError`] and the caller re-invokes the
/// whole pass. The rebuild path removes and then creates with no rollback in
/// between; if the create fails the service is left absent and the error is
/// surfaced.
///
/// ## Examples
///
/// ```rust,no_run
/// use hawser::{Docker, Reconciler, ServiceDefinition};
///
/// # async fn run() -> Result<(), hawser::Error> {
/// let docker = Docker::connect_with_local_defaults()?;
/// let definition = ServiceDefinition::from_yaml(
///     "name: web\nstate: present\nimage: nginx:1.27\n",
/// )?;
/// let outcome = Reconciler::new(docker).converge(&definition).await?;
/// println!("{}", outcome.message);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Reconciler<B> {
    backend: B,
    dry_run: bool,
}

impl<B> Reconciler<B>
where
    B: SwarmBackend,
{
    /// Wrap a backend into a reconciler.
    pub fn new(backend: B) -> Reconciler<B> {
        Reconciler {
            backend,
            dry_run: false,
        }
    }

    /// Toggle dry-run: report the action and the diverging fields without
    /// issuing any mutating call.
    pub fn dry_run(mut self, dry_run: bool) -> Reconciler<B> {
        self.dry_run = dry_run;
        self
    }

    /// Fetch the current state of the named service, or `None` when no such
    /// service exists. A failure of the listing query itself is an error —
    /// it is never folded into "absent".
    pub async fn fetch_service(&self, name: &str) -> Result<Option<RemoteService>, Error> {
        let networks = NetworkTable::new(self.backend.networks().await?);
        self.fetch_with(name, &networks).await
    }

    async fn fetch_with(
        &self,
        name: &str,
        networks: &NetworkTable,
    ) -> Result<Option<RemoteService>, Error> {
        let raw = self
            .backend
            .find_service(name)
            .await
            .map_err(|source| Error::ServiceLookupError {
                name: name.to_string(),
                source: Box::new(source),
            })?;
        match raw {
            Some(raw) => Ok(Some(normalize(raw, networks)?)),
            None => Ok(None),
        }
    }

    /// Run one convergence pass for the given definition.
    pub async fn converge(&self, definition: &ServiceDefinition) -> Result<Outcome, Error> {
        let networks = NetworkTable::new(self.backend.networks().await?);
        let current = self.fetch_with(&definition.name, &networks).await?;
        debug!(
            "service {} is currently {}",
            definition.name,
            if current.is_some() { "present" } else { "absent" }
        );

        match (current, definition.state) {
            (None, TargetState::Absent) => Ok(Outcome {
                changed: false,
                rebuilt: false,
                message: String::from("service already absent"),
                changes: Vec::new(),
                service: None,
            }),
            (None, TargetState::Present) => {
                let desired = definition.desired_state(None);
                let spec = translate::service_spec(&definition.name, &desired, &networks)?;
                if !self.dry_run {
                    self.backend.create(spec).await?;
                    info!("created service {}", definition.name);
                }
                Ok(Outcome {
                    changed: true,
                    rebuilt: false,
                    message: String::from("service created"),
                    changes: Vec::new(),
                    service: Some(desired),
                })
            }
            (Some(_), TargetState::Absent) => {
                if !self.dry_run {
                    self.backend.remove(&definition.name).await?;
                    info!("removed service {}", definition.name);
                }
                Ok(Outcome {
                    changed: true,
                    rebuilt: false,
                    message: String::from("service removed"),
                    changes: Vec::new(),
                    service: None,
                })
            }
            (Some(remote), TargetState::Present) => {
                let desired = definition.desired_state(Some(&remote.state));
                let diff = remote.state.diff(&desired);
                if !diff.has_changes() {
                    return Ok(Outcome {
                        changed: false,
                        rebuilt: false,
                        message: String::from("service unchanged"),
                        changes: Vec::new(),
                        service: Some(desired),
                    });
                }
                let spec = translate::service_spec(&definition.name, &desired, &networks)?;
                if diff.requires_rebuild {
                    // No rollback here: a create failure after the remove
                    // leaves the service absent.
                    if !self.dry_run {
                        self.backend.remove(&definition.name).await?;
                        self.backend.create(spec).await?;
                        info!("rebuilt service {}", definition.name);
                    }
                    Ok(Outcome {
                        changed: true,
                        rebuilt: true,
                        message: format!(
                            "rebuild service (changes: {})",
                            diff.fields.join(", ")
                        ),
                        changes: diff.fields,
                        service: Some(desired),
                    })
                } else {
                    if !self.dry_run {
                        self.backend.update(&remote.handle, spec).await?;
                        info!("updated service {}", definition.name);
                    }
                    Ok(Outcome {
                        changed: true,
                        rebuilt: false,
                        message: format!(
                            "service edited (changes: {})",
                            diff.fields.join(", ")
                        ),
                        changes: diff.fields,
                        service: Some(desired),
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::state::RestartCondition;

    #[derive(Default)]
    struct MockSwarm {
        service: Option<models::Service>,
        networks: Vec<models::Network>,
        mutations: RefCell<Vec<String>>,
    }

    impl MockSwarm {
        fn mutations(&self) -> Vec<String> {
            self.mutations.borrow().clone()
        }
    }

    impl SwarmBackend for &MockSwarm {
        async fn find_service(&self, name: &str) -> Result<Option<models::Service>, Error> {
            Ok(self
                .service
                .clone()
                .filter(|service| service.spec.name.as_deref() == Some(name)))
        }

        async fn networks(&self) -> Result<Vec<models::Network>, Error> {
            Ok(self.networks.clone())
        }

        async fn create(&self, spec: models::ServiceSpec) -> Result<(), Error> {
            self.mutations
                .borrow_mut()
                .push(format!("create {}", spec.name.unwrap_or_default()));
            Ok(())
        }

        async fn update(
            &self,
            handle: &ServiceHandle,
            _spec: models::ServiceSpec,
        ) -> Result<(), Error> {
            self.mutations
                .borrow_mut()
                .push(format!("update {} v{}", handle.id, handle.version));
            Ok(())
        }

        async fn remove(&self, name: &str) -> Result<(), Error> {
            self.mutations.borrow_mut().push(format!("remove {name}"));
            Ok(())
        }
    }

    struct FailingSwarm;

    impl SwarmBackend for FailingSwarm {
        async fn find_service(&self, _name: &str) -> Result<Option<models::Service>, Error> {
            Err(Error::DockerResponseServerError {
                status_code: 500,
                message: String::from("boom"),
            })
        }

        async fn networks(&self) -> Result<Vec<models::Network>, Error> {
            Ok(Vec::new())
        }

        async fn create(&self, _spec: models::ServiceSpec) -> Result<(), Error> {
            unreachable!()
        }

        async fn update(
            &self,
            _handle: &ServiceHandle,
            _spec: models::ServiceSpec,
        ) -> Result<(), Error> {
            unreachable!()
        }

        async fn remove(&self, _name: &str) -> Result<(), Error> {
            unreachable!()
        }
    }

    fn backend_network() -> models::Network {
        models::Network {
            name: String::from("backend"),
            id: String::from("net-backend-id"),
        }
    }

    fn definition(input: &str) -> ServiceDefinition {
        ServiceDefinition::from_yaml(input).unwrap()
    }

    /// A live record equivalent to `name: web, image: nginx:1.27` with two
    /// replicas and everything else defaulted.
    fn live_web_service() -> models::Service {
        models::Service {
            id: String::from("svc-1"),
            version: models::ObjectVersion { index: 42 },
            spec: models::ServiceSpec {
                name: Some(String::from("web")),
                mode: Some(models::ServiceSpecMode {
                    replicated: Some(models::ServiceSpecModeReplicated { replicas: Some(2) }),
                    global: None,
                }),
                task_template: Some(models::TaskSpec {
                    container_spec: Some(models::TaskSpecContainerSpec {
                        image: Some(String::from("nginx:1.27")),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
            endpoint: None,
        }
    }

    #[tokio::test]
    async fn creates_when_absent() {
        let mock = MockSwarm::default();
        let outcome = Reconciler::new(&mock)
            .converge(&definition("name: web\nstate: present\nimage: nginx:1.27\n"))
            .await
            .unwrap();
        assert!(outcome.changed);
        assert!(!outcome.rebuilt);
        assert_eq!(outcome.message, "service created");
        assert_eq!(mock.mutations(), vec!["create web"]);
    }

    #[tokio::test]
    async fn absent_and_absent_is_a_noop() {
        let mock = MockSwarm::default();
        let outcome = Reconciler::new(&mock)
            .converge(&definition("name: web\nstate: absent\n"))
            .await
            .unwrap();
        assert!(!outcome.changed);
        assert_eq!(outcome.message, "service already absent");
        assert!(mock.mutations().is_empty());
    }

    #[tokio::test]
    async fn removes_when_absence_is_requested() {
        let mock = MockSwarm {
            service: Some(live_web_service()),
            ..Default::default()
        };
        let outcome = Reconciler::new(&mock)
            .converge(&definition("name: web\nstate: absent\n"))
            .await
            .unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.message, "service removed");
        assert_eq!(mock.mutations(), vec!["remove web"]);
    }

    #[tokio::test]
    async fn matching_state_is_unchanged() {
        let mock = MockSwarm {
            service: Some(live_web_service()),
            ..Default::default()
        };
        let outcome = Reconciler::new(&mock)
            .converge(&definition("name: web\nstate: present\nimage: nginx:1.27\n"))
            .await
            .unwrap();
        assert!(!outcome.changed);
        assert_eq!(outcome.message, "service unchanged");
        assert!(outcome.changes.is_empty());
        assert!(mock.mutations().is_empty());
    }

    #[tokio::test]
    async fn in_place_update_presents_the_fetched_version() {
        let mock = MockSwarm {
            service: Some(live_web_service()),
            ..Default::default()
        };
        let outcome = Reconciler::new(&mock)
            .converge(&definition(
                "name: web\nstate: present\nimage: nginx:1.27\nrestart_policy: on-failure\n",
            ))
            .await
            .unwrap();
        assert!(outcome.changed);
        assert!(!outcome.rebuilt);
        assert_eq!(outcome.message, "service edited (changes: restart_policy)");
        assert_eq!(outcome.changes, vec!["restart_policy"]);
        assert_eq!(mock.mutations(), vec!["update svc-1 v42"]);
    }

    #[tokio::test]
    async fn network_change_rebuilds_in_remove_create_order() {
        let mock = MockSwarm {
            service: Some(live_web_service()),
            networks: vec![backend_network()],
            ..Default::default()
        };
        let outcome = Reconciler::new(&mock)
            .converge(&definition(
                "name: web\nstate: present\nimage: nginx:1.27\nnetworks: [backend]\n",
            ))
            .await
            .unwrap();
        assert!(outcome.changed);
        assert!(outcome.rebuilt);
        assert_eq!(outcome.message, "rebuild service (changes: networks)");
        assert_eq!(mock.mutations(), vec!["remove web", "create web"]);
    }

    #[tokio::test]
    async fn dry_run_reports_identically_but_never_mutates() {
        let cases: Vec<(Option<models::Service>, &str)> = vec![
            (None, "name: web\nstate: present\nimage: nginx:1.27\n"),
            (Some(live_web_service()), "name: web\nstate: absent\n"),
            (
                Some(live_web_service()),
                "name: web\nstate: present\nimage: nginx:1.28\n",
            ),
            (
                Some(live_web_service()),
                "name: web\nstate: present\nimage: nginx:1.27\nnetworks: [backend]\n",
            ),
        ];
        for (service, input) in cases {
            let wet = MockSwarm {
                service: service.clone(),
                networks: vec![backend_network()],
                ..Default::default()
            };
            let dry = MockSwarm {
                service,
                networks: vec![backend_network()],
                ..Default::default()
            };
            let expected = Reconciler::new(&wet).converge(&definition(input)).await.unwrap();
            let outcome = Reconciler::new(&dry)
                .dry_run(true)
                .converge(&definition(input))
                .await
                .unwrap();
            assert_eq!(outcome.changed, expected.changed);
            assert_eq!(outcome.message, expected.message);
            assert_eq!(outcome.changes, expected.changes);
            assert!(dry.mutations().is_empty(), "dry-run mutated for {input}");
            assert!(!wet.mutations().is_empty());
        }
    }

    #[tokio::test]
    async fn second_pass_over_created_state_is_unchanged() {
        let input = "\
name: mydb
state: present
image: mysql:5.7
mounts:
  - source: /data
    target: /var/lib/mysql
    type: bind
publish:
  - published_port: 3306
    target_port: 3306
    protocol: tcp
restart_policy: any
restart_policy_attempts: 5
restart_policy_window: 30
";
        let def = definition(input);
        let networks = NetworkTable::new(Vec::new());

        let first = MockSwarm::default();
        let outcome = Reconciler::new(&first).converge(&def).await.unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.message, "service created");

        // What the daemon would hand back for the service just created: the
        // translated spec, with the endpoint spec echoed into the endpoint.
        let spec = translate::service_spec(&def.name, &def.desired_state(None), &networks)
            .unwrap();
        let second = MockSwarm {
            service: Some(models::Service {
                id: String::from("svc-9"),
                version: models::ObjectVersion { index: 1 },
                endpoint: Some(models::ServiceEndpoint {
                    spec: spec.endpoint_spec.clone(),
                }),
                spec,
            }),
            ..Default::default()
        };
        let outcome = Reconciler::new(&second).converge(&def).await.unwrap();
        assert!(!outcome.changed, "changes: {:?}", outcome.changes);
        assert_eq!(outcome.message, "service unchanged");
        assert!(second.mutations().is_empty());
    }

    #[tokio::test]
    async fn listing_failure_is_a_lookup_error_not_absence() {
        let err = Reconciler::new(FailingSwarm)
            .converge(&definition("name: web\nstate: present\nimage: nginx:1.27\n"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ServiceLookupError { name, .. } if name == "web"));
    }

    #[test]
    fn normalize_defaults_missing_wire_fields() {
        let remote = normalize(live_web_service(), &NetworkTable::new(Vec::new())).unwrap();
        assert_eq!(remote.handle.id, "svc-1");
        assert_eq!(remote.handle.version, 42);
        let state = remote.state;
        assert_eq!(state.image, "nginx:1.27");
        assert_eq!(state.mode, ServiceMode::Replicated { replicas: 2 });
        assert!(state.env.is_empty());
        assert!(state.args.is_empty());
        assert_eq!(state.user, "root");
        assert_eq!(state.endpoint_mode, EndpointMode::Vip);
        assert_eq!(state.restart_policy, RestartCondition::None);
        assert_eq!(state.limit_cpu, 0.0);
        assert_eq!(state.limit_memory, 0);
    }

    #[test]
    fn normalize_converts_wire_units_and_resolves_networks() {
        let mut raw = live_web_service();
        let task = raw.spec.task_template.as_mut().unwrap();
        task.resources = Some(models::TaskSpecResources {
            limits: Some(models::ResourceObject {
                nano_cpus: Some(1_500_000_000),
                memory_bytes: Some(512 * 1024 * 1024),
            }),
            reservations: Some(models::ResourceObject {
                nano_cpus: Some(250_000_000),
                memory_bytes: Some(128 * 1024 * 1024),
            }),
        });
        raw.spec.networks = Some(vec![models::NetworkAttachmentConfig {
            target: Some(String::from("net-backend-id")),
        }]);

        let remote = normalize(raw, &NetworkTable::new(vec![backend_network()])).unwrap();
        assert_eq!(remote.state.limit_cpu, 1.5);
        assert_eq!(remote.state.limit_memory, 512);
        assert_eq!(remote.state.reserve_cpu, 0.25);
        assert_eq!(remote.state.reserve_memory, 128);
        assert_eq!(remote.state.networks, vec![String::from("backend")]);
    }

    #[test]
    fn normalize_rejects_unknown_mode() {
        let mut raw = live_web_service();
        raw.spec.mode = Some(models::ServiceSpecMode {
            replicated: None,
            global: None,
        });
        let err = normalize(raw, &NetworkTable::new(Vec::new())).unwrap_err();
        assert!(matches!(err, Error::UnknownServiceModeError { .. }));
    }

    #[test]
    fn normalize_fails_on_unlisted_network_id() {
        let mut raw = live_web_service();
        raw.spec.networks = Some(vec![models::NetworkAttachmentConfig {
            target: Some(String::from("gone-id")),
        }]);
        let err = normalize(raw, &NetworkTable::new(Vec::new())).unwrap_err();
        assert!(matches!(err, Error::NetworkNotFoundError { name } if name == "gone-id"));
    }
}
