use std::path::Path;

use futures_util::future::BoxFuture;
use k8s_openapi::api::core::v1::Namespace;
use kube::Api;
use kube::api::ListParams;

use super::{Domain, StatSource};
use crate::cluster;
use crate::error::CoreError;
use crate::model::NamespaceSummary;

/// Namespaces of the configured cluster.
pub struct ClusterSource {
    client: kube::Client,
}

impl ClusterSource {
    /// Build a client from the resolved kubeconfig. Fails when no
    /// kubeconfig exists or it cannot be loaded; nothing is sent to the
    /// API server yet.
    pub async fn connect(kubeconfig: Option<&Path>) -> Result<Self, CoreError> {
        let client = cluster::connect(kubeconfig).await?;
        Ok(Self { client })
    }
}

pub(crate) fn namespace_summary(ns: &Namespace) -> NamespaceSummary {
    NamespaceSummary {
        name: ns.metadata.name.clone().unwrap_or_default(),
        phase: ns.status.as_ref().and_then(|s| s.phase.clone()),
        created: ns.metadata.creation_timestamp.as_ref().map(|t| t.0),
    }
}

impl StatSource for ClusterSource {
    type Output = Vec<NamespaceSummary>;

    fn domain(&self) -> Domain {
        Domain::Cluster
    }

    fn fetch(&self) -> BoxFuture<'_, Result<Vec<NamespaceSummary>, CoreError>> {
        Box::pin(async move {
            let api: Api<Namespace> = Api::all(self.client.clone());
            let list = api.list(&ListParams::default()).await?;
            Ok(list.items.iter().map(namespace_summary).collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use k8s_openapi::api::core::v1::NamespaceStatus;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    use super::*;

    #[test]
    fn summary_reads_phase_and_name() {
        let ns = Namespace {
            metadata: ObjectMeta {
                name: Some("kube-system".into()),
                ..ObjectMeta::default()
            },
            status: Some(NamespaceStatus {
                phase: Some("Active".into()),
                ..NamespaceStatus::default()
            }),
            ..Namespace::default()
        };

        let summary = namespace_summary(&ns);
        assert_eq!(summary.name, "kube-system");
        assert!(summary.is_active());
        assert_eq!(summary.created, None);
    }
}
