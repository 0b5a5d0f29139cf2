//! Kubernetes client resolution
//!
//! Builds one authenticated client per invocation from an optional
//! kubeconfig path.

use k8s_openapi::apimachinery::pkg::version::Info;
use kube::{
    config::{KubeConfigOptions, Kubeconfig},
    Client, Config,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::api::{ApiRequest, ApiResponse, ClusterApi};
use crate::error::{ApiError, ConfigError};

/// Where the client configuration comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// Path given by the step
    Explicit(PathBuf),
    /// `$HOME/.kube/config`
    Default(PathBuf),
    /// Left to the kube loader (`KUBECONFIG`, in-cluster service account)
    Inferred,
}

impl ConfigSource {
    /// Pick the configuration source. A non-empty explicit path wins and
    /// the home directory is not looked at.
    pub fn select(config_path: Option<&str>, home_dir: impl FnOnce() -> Option<PathBuf>) -> Self {
        match config_path {
            Some(path) if !path.is_empty() => ConfigSource::Explicit(PathBuf::from(path)),
            _ => match home_dir() {
                Some(home) => ConfigSource::Default(home.join(".kube").join("config")),
                None => ConfigSource::Inferred,
            },
        }
    }

    /// Kubeconfig file this source reads, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(path) | ConfigSource::Default(path) => Some(path),
            ConfigSource::Inferred => None,
        }
    }
}

/// Resolves a step's kubeconfig into a client
#[derive(Clone, Debug, Default)]
pub struct ClientResolver {
    read_timeout: Option<Duration>,
}

impl ClientResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the read timeout applied to every request of the client
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Build a client from an optional kubeconfig path, falling back to the
    /// user's default kubeconfig
    pub async fn resolve(&self, config_path: Option<&str>) -> Result<KubeCluster, ConfigError> {
        let source = ConfigSource::select(config_path, dirs::home_dir);
        self.resolve_source(source).await
    }

    /// Build a client from an already selected source
    pub async fn resolve_source(&self, source: ConfigSource) -> Result<KubeCluster, ConfigError> {
        debug!("Resolving cluster client from {:?}", source);

        let mut config = match source.path() {
            Some(path) => {
                let kubeconfig =
                    Kubeconfig::read_from(path).map_err(|err| ConfigError::Kubeconfig {
                        path: path.display().to_string(),
                        source: err,
                    })?;
                Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                    .await
                    .map_err(|err| ConfigError::Kubeconfig {
                        path: path.display().to_string(),
                        source: err,
                    })?
            }
            None => Config::infer().await?,
        };

        if self.read_timeout.is_some() {
            config.read_timeout = self.read_timeout;
        }

        let client = Client::try_from(config)?;

        Ok(KubeCluster { client, source })
    }
}

/// Client for one cluster, owned by a single invocation
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
    source: ConfigSource,
}

impl KubeCluster {
    /// Where the configuration was loaded from
    pub fn source(&self) -> &ConfigSource {
        &self.source
    }
}

impl ClusterApi for KubeCluster {
    async fn server_version(&self) -> Result<Info, ApiError> {
        self.client.apiserver_version().await.map_err(api_error)
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let request = request.into_http()?.map(hyper::Body::from);

        let response = self.client.send(request).await.map_err(api_error)?;
        let status = response.status().as_u16();
        let body = hyper::body::to_bytes(response.into_body())
            .await
            .map_err(|e| ApiError::Transport(kube::Error::HyperError(e)))?;

        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

/// Status failures keep their code; everything else is transport
fn api_error(err: kube::Error) -> ApiError {
    match err {
        kube::Error::Api(response) => ApiError::Status {
            code: response.code,
            message: response.message,
        },
        other => ApiError::Transport(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: test
clusters:
- name: test
  cluster:
    server: http://127.0.0.1:6443
contexts:
- name: test
  context:
    cluster: test
    user: test
    namespace: default
users:
- name: test
  user:
    token: abc123
"#;

    #[test]
    fn test_explicit_path_skips_home() {
        let source = ConfigSource::select(Some("/etc/kube/admin.conf"), || {
            panic!("home directory must not be consulted")
        });
        assert_eq!(
            source,
            ConfigSource::Explicit(PathBuf::from("/etc/kube/admin.conf"))
        );
    }

    #[test]
    fn test_default_path_under_home() {
        let source = ConfigSource::select(None, || Some(PathBuf::from("/home/tester")));
        assert_eq!(
            source,
            ConfigSource::Default(PathBuf::from("/home/tester/.kube/config"))
        );

        let empty = ConfigSource::select(Some(""), || Some(PathBuf::from("/root")));
        assert_eq!(empty.path(), Some(Path::new("/root/.kube/config")));
    }

    #[test]
    fn test_no_home_is_inferred() {
        let source = ConfigSource::select(None, || None);
        assert_eq!(source, ConfigSource::Inferred);
        assert!(source.path().is_none());
    }

    #[test]
    fn test_resolve_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");

        let err = tokio_test::block_on(
            ClientResolver::new().resolve(Some(missing.to_str().unwrap())),
        )
        .err()
        .unwrap();

        assert!(matches!(err, ConfigError::Kubeconfig { .. }));
        assert!(err.to_string().contains("nope.yaml"));
    }

    #[tokio::test]
    async fn test_resolve_explicit_kubeconfig() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(KUBECONFIG.as_bytes()).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cluster = ClientResolver::new()
            .with_read_timeout(Some(Duration::from_secs(5)))
            .resolve(Some(&path))
            .await
            .unwrap();

        assert_eq!(cluster.source(), &ConfigSource::Explicit(PathBuf::from(&path)));
    }
}
