use std::path::Path;

use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{Namespace, Node, Pod};
use kube::Api;
use kube::api::ListParams;
use serde::Serialize;

use crate::cluster;
use crate::error::CoreError;
use crate::model::NamespaceSummary;
use crate::source::namespace_summary;

const ROLE_LABEL_PREFIX: &str = "node-role.kubernetes.io/";

#[derive(Debug, Clone, Serialize)]
pub struct ClusterReport {
    pub nodes: Vec<NodeSummary>,
    pub namespaces: Vec<NamespaceSummary>,
    pub pods: Vec<PodSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    pub name: String,
    pub status: String,
    pub roles: Vec<String>,
    pub version: Option<String>,
    pub internal_ip: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodSummary {
    pub namespace: String,
    pub name: String,
    pub phase: Option<String>,
    pub ready: String,
    pub restarts: i32,
    pub node: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

pub(crate) fn node_summary(node: &Node) -> NodeSummary {
    let status = node.status.as_ref();
    let ready = status
        .and_then(|s| s.conditions.as_ref())
        .and_then(|conds| conds.iter().find(|c| c.type_ == "Ready"))
        .map(|c| c.status.as_str());

    let roles = node
        .metadata
        .labels
        .iter()
        .flatten()
        .filter_map(|(k, _)| k.strip_prefix(ROLE_LABEL_PREFIX))
        .filter(|role| !role.is_empty())
        .map(ToString::to_string)
        .collect();

    NodeSummary {
        name: node.metadata.name.clone().unwrap_or_default(),
        status: match ready {
            Some("True") => "Ready",
            Some(_) => "NotReady",
            None => "Unknown",
        }
        .to_string(),
        roles,
        version: status
            .and_then(|s| s.node_info.as_ref())
            .map(|i| i.kubelet_version.clone()),
        internal_ip: status
            .and_then(|s| s.addresses.as_ref())
            .and_then(|addrs| addrs.iter().find(|a| a.type_ == "InternalIP"))
            .map(|a| a.address.clone()),
        created: node.metadata.creation_timestamp.as_ref().map(|t| t.0),
    }
}

pub(crate) fn pod_summary(pod: &Pod) -> PodSummary {
    let statuses = pod
        .status
        .as_ref()
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or_default();
    let ready = statuses.iter().filter(|c| c.ready).count();

    PodSummary {
        namespace: pod.metadata.namespace.clone().unwrap_or_default(),
        name: pod.metadata.name.clone().unwrap_or_default(),
        phase: pod.status.as_ref().and_then(|s| s.phase.clone()),
        ready: format!("{ready}/{}", statuses.len()),
        restarts: statuses.iter().map(|c| c.restart_count).sum(),
        node: pod.spec.as_ref().and_then(|s| s.node_name.clone()),
        created: pod.metadata.creation_timestamp.as_ref().map(|t| t.0),
    }
}

/// Nodes, namespaces and pods of the cluster the kubeconfig points at.
pub async fn cluster_report(kubeconfig: Option<&Path>) -> Result<ClusterReport, CoreError> {
    let client = cluster::connect(kubeconfig).await?;
    let params = ListParams::default();

    let nodes: Api<Node> = Api::all(client.clone());
    let namespaces: Api<Namespace> = Api::all(client.clone());
    let pods: Api<Pod> = Api::all(client);

    let (nodes, namespaces, pods) = tokio::try_join!(
        nodes.list(&params),
        namespaces.list(&params),
        pods.list(&params),
    )?;

    Ok(ClusterReport {
        nodes: nodes.items.iter().map(node_summary).collect(),
        namespaces: namespaces.items.iter().map(namespace_summary).collect(),
        pods: pods.items.iter().map(pod_summary).collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use k8s_openapi::api::core::v1::{
        ContainerStatus, NodeCondition, NodeStatus, PodSpec, PodStatus,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use pretty_assertions::assert_eq;

    use super::*;

    fn container(ready: bool, restarts: i32) -> ContainerStatus {
        ContainerStatus {
            name: "app".into(),
            ready,
            restart_count: restarts,
            ..ContainerStatus::default()
        }
    }

    #[test]
    fn pod_summary_counts_ready_containers() {
        let pod = Pod {
            metadata: ObjectMeta {
                name: Some("web-0".into()),
                namespace: Some("default".into()),
                ..ObjectMeta::default()
            },
            spec: Some(PodSpec {
                node_name: Some("node-a".into()),
                ..PodSpec::default()
            }),
            status: Some(PodStatus {
                phase: Some("Running".into()),
                container_statuses: Some(vec![container(true, 2), container(false, 1)]),
                ..PodStatus::default()
            }),
        };

        let summary = pod_summary(&pod);
        assert_eq!(summary.ready, "1/2");
        assert_eq!(summary.restarts, 3);
        assert_eq!(summary.node.as_deref(), Some("node-a"));
        assert_eq!(summary.phase.as_deref(), Some("Running"));
    }

    #[test]
    fn pod_without_status_is_empty() {
        let summary = pod_summary(&Pod::default());
        assert_eq!(summary.ready, "0/0");
        assert_eq!(summary.restarts, 0);
        assert_eq!(summary.phase, None);
    }

    #[test]
    fn node_summary_reads_ready_condition_and_roles() {
        let node = Node {
            metadata: ObjectMeta {
                name: Some("server-1".into()),
                labels: Some(BTreeMap::from([
                    ("node-role.kubernetes.io/control-plane".to_string(), "true".to_string()),
                    ("kubernetes.io/os".to_string(), "linux".to_string()),
                ])),
                ..ObjectMeta::default()
            },
            status: Some(NodeStatus {
                conditions: Some(vec![NodeCondition {
                    type_: "Ready".into(),
                    status: "True".into(),
                    ..NodeCondition::default()
                }]),
                ..NodeStatus::default()
            }),
            ..Node::default()
        };

        let summary = node_summary(&node);
        assert_eq!(summary.status, "Ready");
        assert_eq!(summary.roles, vec!["control-plane"]);
        assert_eq!(summary.internal_ip, None);
    }

    #[test]
    fn node_without_conditions_is_unknown() {
        assert_eq!(node_summary(&Node::default()).status, "Unknown");
    }

    #[tokio::test]
    async fn missing_kubeconfig_is_reported() {
        let err = cluster_report(Some(Path::new("/nonexistent/kubeconfig")))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ClusterConfigMissing { .. }));
    }
}
