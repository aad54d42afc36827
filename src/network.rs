//! Network API: list the networks services can be attached to.

use std::collections::HashMap;

use http::request::Builder;
use http::Method;
use serde_derive::Serialize;

use super::Docker;
use crate::docker::serialize_as_json;
use crate::errors::Error;
use crate::models::Network;

/// Parameters used in the [List Networks API](Docker::list_networks())
///
/// ## Examples
///
/// ```rust
/// use hawser::network::ListNetworksOptions;
///
/// use std::collections::HashMap;
///
/// let mut filters = HashMap::new();
/// filters.insert(String::from("scope"), vec![String::from("swarm")]);
///
/// ListNetworksOptions { filters };
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListNetworksOptions {
    /// JSON encoded value of the filters to process on the network list.
    /// Available filters:
    ///  - `driver=<driver-name>` matches a network's driver.
    ///  - `id=<network-id>` matches all or part of a network id.
    ///  - `label=<key>` or `label=<key>=<value>` of a network label.
    ///  - `name=<network-name>` matches all or part of a network name.
    ///  - `scope=["swarm"|"global"|"local"]` filters networks by scope.
    #[serde(serialize_with = "serialize_as_json")]
    pub filters: HashMap<String, Vec<String>>,
}

impl Docker {
    /// ---
    ///
    /// # List Networks
    ///
    /// Returns the networks known to the daemon as name/id pairs.
    ///
    /// # Arguments
    ///
    ///  - Optional [ListNetworksOptions](ListNetworksOptions) struct.
    ///
    /// # Returns
    ///
    ///  - Vector of [Network](crate::models::Network), wrapped in a Future.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use hawser::Docker;
    /// # let docker = Docker::connect_with_local_defaults().unwrap();
    /// docker.list_networks(None);
    /// ```
    pub async fn list_networks(
        &self,
        options: Option<ListNetworksOptions>,
    ) -> Result<Vec<Network>, Error> {
        let req = self.build_request(
            "/networks",
            Builder::new().method(Method::GET),
            options.as_ref(),
            Docker::serialize_payload(None::<&Network>),
        )?;

        self.process_into_value(req).await
    }
}
