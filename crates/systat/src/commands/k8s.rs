//! `systat k8s`: nodes, namespaces and pods.

use chrono::Utc;
use tabled::Tabled;

use systat_core::report::{ClusterReport, cluster_report};

use crate::cli::K8sArgs;
use crate::error::CliError;
use crate::output::{render, titled_table};

use super::Context;
use super::util::or_dash;

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Roles")]
    roles: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Internal IP")]
    internal_ip: String,
    #[tabled(rename = "Age")]
    age: String,
}

#[derive(Tabled)]
struct NamespaceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Age")]
    age: String,
}

#[derive(Tabled)]
struct PodRow {
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Ready")]
    ready: String,
    #[tabled(rename = "Status")]
    phase: String,
    #[tabled(rename = "Restarts")]
    restarts: i32,
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Age")]
    age: String,
}

/// `3d`, `5h`, `12m`, `40s`, the way kubectl abbreviates ages.
fn age(created: Option<chrono::DateTime<Utc>>, now: chrono::DateTime<Utc>) -> String {
    let Some(created) = created else {
        return "-".into();
    };
    let secs = (now - created).num_seconds().max(0);
    match secs {
        s if s >= 86_400 => format!("{}d", s / 86_400),
        s if s >= 3_600 => format!("{}h", s / 3_600),
        s if s >= 60 => format!("{}m", s / 60),
        s => format!("{s}s"),
    }
}

fn table(report: &ClusterReport) -> String {
    let now = Utc::now();

    let nodes: Vec<NodeRow> = report
        .nodes
        .iter()
        .map(|n| NodeRow {
            name: n.name.clone(),
            status: n.status.clone(),
            roles: if n.roles.is_empty() {
                "<none>".into()
            } else {
                n.roles.join(",")
            },
            version: or_dash(n.version.as_ref()),
            internal_ip: or_dash(n.internal_ip.as_ref()),
            age: age(n.created, now),
        })
        .collect();

    let namespaces: Vec<NamespaceRow> = report
        .namespaces
        .iter()
        .map(|ns| NamespaceRow {
            name: ns.name.clone(),
            status: or_dash(ns.phase.as_ref()),
            age: age(ns.created, now),
        })
        .collect();

    let pods: Vec<PodRow> = report
        .pods
        .iter()
        .map(|p| PodRow {
            namespace: p.namespace.clone(),
            name: p.name.clone(),
            ready: p.ready.clone(),
            phase: or_dash(p.phase.as_ref()),
            restarts: p.restarts,
            node: or_dash(p.node.as_ref()),
            age: age(p.created, now),
        })
        .collect();

    [
        titled_table("Nodes", &nodes),
        titled_table("Namespaces", &namespaces),
        titled_table("Pods", &pods),
    ]
    .join("\n\n")
}

pub async fn handle(args: &K8sArgs, ctx: &Context) -> Result<String, CliError> {
    let kubeconfig = args.kubeconfig.as_deref().or(ctx.config.kubeconfig.as_deref());
    let report = cluster_report(kubeconfig).await?;
    render(&ctx.output, &report, table)
}
