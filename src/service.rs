//! Service API: manage and inspect docker services within a swarm.

use std::collections::HashMap;

use http::header::CONTENT_TYPE;
use http::request::Builder;
use http::Method;
use serde_derive::Serialize;

use super::Docker;
use crate::docker::serialize_as_json;
use crate::errors::Error;
use crate::models::{
    Service, ServiceCreateResponse, ServiceSpec, ServiceUpdateResponse,
};

/// Parameters used in the [List Services API](Docker::list_services())
///
/// ## Examples
///
/// ```rust
/// use hawser::service::ListServicesOptions;
///
/// use std::collections::HashMap;
///
/// let mut filters = HashMap::new();
/// filters.insert(String::from("name"), vec![String::from("my-service")]);
///
/// ListServicesOptions { filters };
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListServicesOptions {
    /// Filters to process on the service list, encoded as JSON. Available
    /// filters:
    ///  - `id`=`<ID>` a service's id
    ///  - `label`=`key` or `label`=`"key=value"` of a service label
    ///  - `mode`=`["replicated"|"global"]` a service's scheduling mode
    ///  - `name`=`<name>` a service's name
    #[serde(serialize_with = "serialize_as_json")]
    pub filters: HashMap<String, Vec<String>>,
}

/// Parameters used in the [Update Service API](Docker::update_service())
///
/// ## Examples
///
/// ```rust
/// use hawser::service::UpdateServiceOptions;
///
/// UpdateServiceOptions { version: 1234 };
/// ```
#[derive(Debug, Copy, Clone, Default, Serialize)]
pub struct UpdateServiceOptions {
    /// The version number of the service object being updated. This is
    /// required to avoid conflicting writes, and must be the value last
    /// observed on the service before the update.
    pub version: u64,
}

impl Docker {
    /// ---
    ///
    /// # List Services
    ///
    /// Returns a list of services.
    ///
    /// # Arguments
    ///
    ///  - Optional [ListServicesOptions](ListServicesOptions) struct.
    ///
    /// # Returns
    ///
    ///  - Vector of [Service](crate::models::Service), wrapped in a Future.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use hawser::Docker;
    /// # let docker = Docker::connect_with_local_defaults().unwrap();
    /// use hawser::service::ListServicesOptions;
    ///
    /// use std::collections::HashMap;
    ///
    /// let mut filters = HashMap::new();
    /// filters.insert(String::from("mode"), vec![String::from("global")]);
    ///
    /// docker.list_services(Some(ListServicesOptions { filters }));
    /// ```
    pub async fn list_services(
        &self,
        options: Option<ListServicesOptions>,
    ) -> Result<Vec<Service>, Error> {
        let req = self.build_request(
            "/services",
            Builder::new().method(Method::GET),
            options.as_ref(),
            Docker::serialize_payload(None::<&ServiceSpec>),
        )?;

        self.process_into_value(req).await
    }

    /// ---
    ///
    /// # Create Service
    ///
    /// Dispatch a new service on the docker swarm.
    ///
    /// # Arguments
    ///
    ///  - [ServiceSpec](crate::models::ServiceSpec) struct.
    ///
    /// # Returns
    ///
    ///  - A [ServiceCreateResponse](crate::models::ServiceCreateResponse)
    ///    struct, wrapped in a Future.
    pub async fn create_service(
        &self,
        service_spec: ServiceSpec,
    ) -> Result<ServiceCreateResponse, Error> {
        let req = self.build_request(
            "/services/create",
            Builder::new()
                .method(Method::POST)
                .header(CONTENT_TYPE, "application/json"),
            None::<&ListServicesOptions>,
            Docker::serialize_payload(Some(&service_spec)),
        )?;

        self.process_into_value(req).await
    }

    /// ---
    ///
    /// # Update Service
    ///
    /// Update an existing service.
    ///
    /// # Arguments
    ///
    ///  - Service id or name as a string slice.
    ///  - [ServiceSpec](crate::models::ServiceSpec) struct.
    ///  - [UpdateServiceOptions](UpdateServiceOptions) struct carrying the
    ///    last observed version of the service.
    ///
    /// # Returns
    ///
    ///  - A [ServiceUpdateResponse](crate::models::ServiceUpdateResponse)
    ///    struct, wrapped in a Future.
    pub async fn update_service(
        &self,
        service_name: &str,
        service_spec: ServiceSpec,
        options: UpdateServiceOptions,
    ) -> Result<ServiceUpdateResponse, Error> {
        let url = format!("/services/{service_name}/update");

        let req = self.build_request(
            &url,
            Builder::new()
                .method(Method::POST)
                .header(CONTENT_TYPE, "application/json"),
            Some(&options),
            Docker::serialize_payload(Some(&service_spec)),
        )?;

        self.process_into_value(req).await
    }

    /// ---
    ///
    /// # Delete Service
    ///
    /// Delete a service.
    ///
    /// # Arguments
    ///
    /// - Service id or name as a string slice.
    ///
    /// # Returns
    ///
    ///  - unit type `()`, wrapped in a Future.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use hawser::Docker;
    /// # let docker = Docker::connect_with_local_defaults().unwrap();
    ///
    /// docker.delete_service("my-service");
    /// ```
    pub async fn delete_service(&self, service_name: &str) -> Result<(), Error> {
        let url = format!("/services/{service_name}");

        let req = self.build_request(
            &url,
            Builder::new().method(Method::DELETE),
            None::<&ListServicesOptions>,
            Docker::serialize_payload(None::<&ServiceSpec>),
        )?;

        self.process_into_unit(req).await
    }
}
