//! The main docker client instance: connection setup and request plumbing.

use std::env;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::request::Builder;
use http::Request;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
#[cfg(unix)]
use hyperlocal::UnixConnector;
use log::trace;
use serde::de::DeserializeOwned;
use serde::ser::Serialize;
use url::Url;

use crate::errors::Error;

/// The default `DOCKER_HOST` address that the client connects to when no
/// unix socket is in play.
pub const DEFAULT_DOCKER_HOST: &str = "tcp://localhost:2375";

/// The default unix socket location exposed by the docker daemon.
#[cfg(unix)]
pub const DEFAULT_SOCKET: &str = "/var/run/docker.sock";

/// Version of the docker API pinned into every request path.
pub const API_DEFAULT_VERSION: &str = "v1.41";

enum Transport {
    #[cfg(unix)]
    Unix {
        client: Client<UnixConnector, Full<Bytes>>,
        socket_path: String,
    },
    Http {
        client: Client<HttpConnector, Full<Bytes>>,
        authority: String,
    },
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(unix)]
            Transport::Unix { socket_path, .. } => write!(f, "Unix({socket_path})"),
            Transport::Http { authority, .. } => write!(f, "Http({authority})"),
        }
    }
}

/// `Docker` holds the client connection to the docker daemon. Instantiate it
/// with one of the `connect_with_*` methods; connections are lazy, so
/// instantiation never performs I/O. Cloning is cheap and clones share the
/// underlying connection pool.
#[derive(Clone, Debug)]
pub struct Docker {
    transport: Arc<Transport>,
}

impl Docker {
    /// Connect using a unix socket.
    ///
    /// # Arguments
    ///
    ///  - `path`: socket location, with or without the `unix://` scheme
    ///    prefix.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hawser::Docker;
    /// # #[cfg(unix)]
    /// Docker::connect_with_unix("/var/run/docker.sock");
    /// ```
    #[cfg(unix)]
    pub fn connect_with_unix(path: &str) -> Result<Docker, Error> {
        let socket_path = path.strip_prefix("unix://").unwrap_or(path).to_string();
        let client: Client<UnixConnector, Full<Bytes>> =
            Client::builder(TokioExecutor::new()).build(UnixConnector);
        Ok(Docker {
            transport: Arc::new(Transport::Unix {
                client,
                socket_path,
            }),
        })
    }

    /// Connect using the standard unix socket location `/var/run/docker.sock`.
    #[cfg(unix)]
    pub fn connect_with_unix_defaults() -> Result<Docker, Error> {
        Docker::connect_with_unix(DEFAULT_SOCKET)
    }

    /// Connect using unsecured HTTP.
    ///
    /// # Arguments
    ///
    ///  - `addr`: the connection url, in `tcp://host:port` or
    ///    `http://host:port` form.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hawser::Docker;
    /// Docker::connect_with_http("tcp://localhost:2375");
    /// ```
    pub fn connect_with_http(addr: &str) -> Result<Docker, Error> {
        let url = Url::parse(addr)?;
        match url.scheme() {
            "tcp" | "http" => {}
            scheme => {
                return Err(Error::UnsupportedUriSchemeError {
                    scheme: scheme.to_string(),
                })
            }
        }
        let authority = format!(
            "{}:{}",
            url.host_str().unwrap_or("localhost"),
            url.port().unwrap_or(2375)
        );
        let client: Client<HttpConnector, Full<Bytes>> =
            Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Ok(Docker {
            transport: Arc::new(Transport::Http { client, authority }),
        })
    }

    /// Connect using unsecured HTTP, to the location pointed at by the
    /// `DOCKER_HOST` environment variable, or `localhost:2375` if missing.
    pub fn connect_with_http_defaults() -> Result<Docker, Error> {
        let host = env::var("DOCKER_HOST").unwrap_or_else(|_| DEFAULT_DOCKER_HOST.to_string());
        Docker::connect_with_http(&host)
    }

    /// Connect to the OS-specific default handler: the standard unix socket
    /// on unix, the `DOCKER_HOST` environment variable elsewhere.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hawser::Docker;
    /// Docker::connect_with_local_defaults();
    /// ```
    pub fn connect_with_local_defaults() -> Result<Docker, Error> {
        #[cfg(unix)]
        {
            Docker::connect_with_unix_defaults()
        }
        #[cfg(not(unix))]
        {
            Docker::connect_with_http_defaults()
        }
    }

    /// Connect to an explicit host address, dispatching on its URI scheme.
    /// Accepts `unix://`, `tcp://` and `http://` addresses.
    pub fn connect_with_host(addr: &str) -> Result<Docker, Error> {
        let url = Url::parse(addr)?;
        match url.scheme() {
            "unix" => {
                #[cfg(unix)]
                {
                    Docker::connect_with_unix(url.path())
                }
                #[cfg(not(unix))]
                {
                    Err(Error::UnsupportedUriSchemeError {
                        scheme: String::from("unix"),
                    })
                }
            }
            "tcp" | "http" => Docker::connect_with_http(addr),
            scheme => Err(Error::UnsupportedUriSchemeError {
                scheme: scheme.to_string(),
            }),
        }
    }

    fn request_uri(&self, path: &str, query: &str) -> Result<hyper::Uri, Error> {
        let path_and_query = format!("/{API_DEFAULT_VERSION}{path}{query}");
        match &*self.transport {
            #[cfg(unix)]
            Transport::Unix { socket_path, .. } => {
                Ok(hyperlocal::Uri::new(socket_path, &path_and_query).into())
            }
            Transport::Http { authority, .. } => Ok(hyper::Uri::builder()
                .scheme("http")
                .authority(authority.as_str())
                .path_and_query(path_and_query.as_str())
                .build()?),
        }
    }

    pub(crate) fn build_request<O>(
        &self,
        path: &str,
        builder: Builder,
        query: Option<&O>,
        payload: Result<Full<Bytes>, Error>,
    ) -> Result<Request<Full<Bytes>>, Error>
    where
        O: Serialize,
    {
        let query = match query {
            Some(params) => {
                let encoded = serde_urlencoded::to_string(params)?;
                if encoded.is_empty() {
                    String::new()
                } else {
                    format!("?{encoded}")
                }
            }
            None => String::new(),
        };
        let uri = self.request_uri(path, &query)?;
        Ok(builder.uri(uri).body(payload?)?)
    }

    pub(crate) fn serialize_payload<S>(body: Option<&S>) -> Result<Full<Bytes>, Error>
    where
        S: Serialize,
    {
        match body {
            Some(value) => Ok(Full::new(Bytes::from(serde_json::to_vec(value)?))),
            None => Ok(Full::new(Bytes::new())),
        }
    }

    async fn process_request(&self, req: Request<Full<Bytes>>) -> Result<Bytes, Error> {
        trace!("{} {}", req.method(), req.uri());
        let response = match &*self.transport {
            #[cfg(unix)]
            Transport::Unix { client, .. } => client.request(req).await?,
            Transport::Http { client, .. } => client.request(req).await?,
        };
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        if status.is_success() {
            Ok(bytes)
        } else {
            Err(Error::DockerResponseServerError {
                status_code: status.as_u16(),
                message: daemon_message(&bytes),
            })
        }
    }

    pub(crate) async fn process_into_value<T>(
        &self,
        req: Request<Full<Bytes>>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let bytes = self.process_request(req).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) async fn process_into_unit(&self, req: Request<Full<Bytes>>) -> Result<(), Error> {
        self.process_request(req).await?;
        Ok(())
    }
}

/// Extract the `message` field the daemon embeds in error bodies, falling
/// back to the raw body when it is not JSON.
fn daemon_message(bytes: &Bytes) -> String {
    #[derive(serde_derive::Deserialize)]
    struct DaemonMessage {
        message: Option<String>,
    }

    serde_json::from_slice::<DaemonMessage>(bytes)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| String::from_utf8_lossy(bytes).trim().to_string())
}

/// Serialize a value as a JSON string inside a query parameter, as the
/// daemon expects for `filters`.
pub(crate) fn serialize_as_json<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: serde::Serializer,
{
    serializer.serialize_str(
        &serde_json::to_string(value).map_err(serde::ser::Error::custom)?,
    )
}
