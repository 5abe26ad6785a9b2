//! Flat status rows → hosts with their services.

use std::collections::HashMap;

use tracing::warn;

use crate::model::{EnabledState, HostView, ServiceStatusRecord, ServiceView};

/// Group records by hostname in a single pass.
///
/// Hosts appear in first-seen order and each host's services keep their arrival
/// order. Only hostnames are deduplicated: two rows for the same service on the
/// same host both show up. Rows with a blank hostname are skipped.
pub fn normalize<I>(records: I) -> Vec<HostView>
where
    I: IntoIterator<Item = ServiceStatusRecord>,
{
    let mut hosts: Vec<HostView> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        if record.hostname.trim().is_empty() {
            warn!(service = %record.name, "skipping status record without hostname");
            continue;
        }

        let ServiceStatusRecord {
            hostname,
            name,
            description,
            enabled,
            active_status,
            last_check,
        } = record;

        let service = ServiceView {
            name,
            description: description.unwrap_or_default(),
            enabled: EnabledState::from(enabled.unwrap_or(false)),
            active_status: active_status.unwrap_or_default(),
            last_check,
        };

        let slot = match index.get(&hostname) {
            Some(&slot) => slot,
            None => {
                hosts.push(HostView::new(hostname.clone()));
                index.insert(hostname, hosts.len() - 1);
                hosts.len() - 1
            }
        };
        hosts[slot].services.push(service);
    }

    hosts
}

/// Inverse of [`normalize`]: one record per service, hosts in order.
pub fn flatten(hosts: &[HostView]) -> Vec<ServiceStatusRecord> {
    hosts
        .iter()
        .flat_map(|host| {
            host.services.iter().map(move |svc| ServiceStatusRecord {
                hostname: host.hostname.clone(),
                name: svc.name.clone(),
                description: Some(svc.description.clone()),
                enabled: Some(svc.enabled == EnabledState::Enabled),
                active_status: Some(svc.active_status.clone()),
                last_check: svc.last_check,
            })
        })
        .collect()
}
