//! # Hawser: reconcile docker swarm services against declared state
//!
//! Hawser compares a declared service definition with the live service
//! reported by a swarm-enabled docker daemon, and issues the minimal set of
//! API calls that converges the two: nothing when they already match, an
//! in-place update when the divergence is mutable, and a destroy-and-create
//! cycle when it is not (the daemon cannot change the network attachments of
//! a live service).
//!
//! The crate is built on the latest [Hyper](https://github.com/hyperium/hyper)
//! and [Tokio](https://github.com/tokio-rs/tokio) releases and talks to the
//! daemon over its unix socket or plain TCP.
//!
//! # Install
//!
//! Add the following to your `Cargo.toml` file
//!
//! ```nocompile
//! [dependencies]
//! hawser = "0.4"
//! ```
//!
//! # Usage
//!
//! ## Connecting with the docker daemon
//!
//! Connect to the standard unix socket location `/var/run/docker.sock`, or
//! to the address in the `DOCKER_HOST` environment variable:
//!
//! ```rust
//! use hawser::Docker;
//! Docker::connect_with_local_defaults();
//! ```
//!
//! ## Converging a service
//!
//! A definition names the service, its requested lifecycle and any of the
//! service tunables; one `converge` call per definition performs one
//! fetch → diff → act pass:
//!
//! ```rust,no_run
//! use hawser::{Docker, Reconciler, ServiceDefinition};
//!
//! # async fn run() -> Result<(), hawser::Error> {
//! let definition = ServiceDefinition::from_yaml(
//!     "
//! name: myservice
//! state: present
//! image: alpine:3.20
//! args: [sleep, '3600']
//! restart_policy: any
//! restart_policy_attempts: 5
//! restart_policy_window: 30
//! ",
//! )?;
//!
//! let docker = Docker::connect_with_local_defaults()?;
//! let outcome = Reconciler::new(docker).converge(&definition).await?;
//! println!("{} (changed: {})", outcome.message, outcome.changed);
//! # Ok(())
//! # }
//! ```
//!
//! Passes are single-shot and repeatable: a pass interrupted by a concurrent
//! writer fails with a version conflict, and re-running it converges from
//! the fresh state. Dry-run (`Reconciler::dry_run`) reports the action and
//! the diverging fields without mutating anything.
//!
//! # Integration tests
//!
//! Tests that need a swarm-enabled daemon are gated behind the
//! `test_reconcile` feature: `cargo test --features test_reconcile`.

pub mod definition;
pub mod docker;
pub mod errors;
pub mod models;
pub mod network;
pub mod reconcile;
pub mod service;
pub mod state;
pub mod translate;

pub use crate::definition::{ServiceDefinition, TargetState};
pub use crate::docker::Docker;
pub use crate::errors::Error;
pub use crate::reconcile::{Outcome, Reconciler, SwarmBackend};
pub use crate::state::{RemoteService, ServiceState, StateDiff};
