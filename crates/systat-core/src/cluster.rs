// ── Cluster connection ──
//
// Kubeconfig discovery and client construction, shared by the
// dashboard's cluster source and the `k8s` command.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use kube::config::{KubeConfigOptions, Kubeconfig};
use tracing::debug;

use crate::error::CoreError;

/// Written by k3s on cluster nodes.
pub const K3S_KUBECONFIG: &str = "/etc/rancher/k3s/k3s.yaml";

/// Candidate kubeconfig paths in lookup order.
///
/// An explicit path wins outright. Otherwise `$KUBECONFIG` entries, the
/// k3s node config, then `~/.kube/config`.
pub fn kubeconfig_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }

    let mut paths: Vec<PathBuf> = std::env::var_os("KUBECONFIG")
        .map(|v| std::env::split_paths(&v).filter(|p| !p.as_os_str().is_empty()).collect())
        .unwrap_or_default();
    paths.push(PathBuf::from(K3S_KUBECONFIG));
    if let Some(base) = BaseDirs::new() {
        paths.push(base.home_dir().join(".kube").join("config"));
    }
    paths
}

/// First candidate that exists on disk.
pub fn first_existing(candidates: &[PathBuf]) -> Result<PathBuf, CoreError> {
    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| CoreError::ClusterConfigMissing {
            tried: candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

pub fn resolve_kubeconfig(explicit: Option<&Path>) -> Result<PathBuf, CoreError> {
    first_existing(&kubeconfig_candidates(explicit))
}

/// Load the kubeconfig and build a client for its current context.
pub async fn connect(explicit: Option<&Path>) -> Result<kube::Client, CoreError> {
    let path = resolve_kubeconfig(explicit)?;
    debug!(path = %path.display(), "loading kubeconfig");

    let invalid = |reason: String| CoreError::ClusterConfigInvalid {
        path: path.clone(),
        reason,
    };

    let kubeconfig = Kubeconfig::read_from(&path).map_err(|e| invalid(e.to_string()))?;
    let config = kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|e| invalid(e.to_string()))?;
    kube::Client::try_from(config).map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_is_the_only_candidate() {
        let candidates = kubeconfig_candidates(Some(Path::new("/tmp/custom.yaml")));
        assert_eq!(candidates, vec![PathBuf::from("/tmp/custom.yaml")]);
    }

    #[test]
    fn first_existing_skips_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("config");
        std::fs::write(&present, "apiVersion: v1\n").unwrap();

        let candidates = vec![dir.path().join("missing"), present.clone()];
        assert_eq!(first_existing(&candidates).unwrap(), present);
    }

    #[test]
    fn nothing_found_lists_every_candidate() {
        let candidates = vec![PathBuf::from("/nope/a"), PathBuf::from("/nope/b")];
        let err = first_existing(&candidates).unwrap_err();
        assert!(err.disables_source());
        assert!(err.to_string().contains("/nope/a, /nope/b"));
    }

    #[tokio::test]
    async fn malformed_kubeconfig_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(&path, "{{ not yaml").unwrap();

        let err = connect(Some(&path)).await.err().unwrap();
        assert!(matches!(err, CoreError::ClusterConfigInvalid { .. }));
    }
}
