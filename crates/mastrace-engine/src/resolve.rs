use std::collections::HashMap;

use mastrace_types::{AgentRecord, ClientRecord, ComponentId, SessionId, WrapperRecord};
use tracing::debug;

// NOTE: Ownership resolution order
//
// The same wrapper id can appear in the agents, clients and wrappers tables,
// occasionally with different sessions. Resolution merges the tables in the
// fixed order below and every registration overwrites, so the last table
// that mentions an id decides its session. Reordering RESOLUTION_ORDER
// changes which session function calls are attributed to.

/// Configuration tables that contribute component ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigTable {
    Agents,
    Clients,
    Wrappers,
}

/// Merge order of the identity map: later tables win.
pub const RESOLUTION_ORDER: [ConfigTable; 3] =
    [ConfigTable::Agents, ConfigTable::Clients, ConfigTable::Wrappers];

/// Component id → owning session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityMap {
    owners: HashMap<ComponentId, SessionId>,
}

impl IdentityMap {
    pub fn session_for(&self, component: &ComponentId) -> Option<&SessionId> {
        self.owners.get(component)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    fn merge(&mut self, registrations: Vec<(ComponentId, SessionId)>) {
        for (component, session) in registrations {
            self.owners.insert(component, session);
        }
    }
}

/// Build the identity map from the three configuration tables.
///
/// Rows without a session id register nothing. Ids that no table mentions are
/// simply absent.
pub fn resolve_identities(
    agents: &[AgentRecord],
    clients: &[ClientRecord],
    wrappers: &[WrapperRecord],
) -> IdentityMap {
    let mut map = IdentityMap::default();

    for table in RESOLUTION_ORDER {
        let registrations = match table {
            ConfigTable::Agents => agent_registrations(agents),
            ConfigTable::Clients => client_registrations(clients),
            ConfigTable::Wrappers => wrapper_registrations(wrappers),
        };
        debug!(?table, count = registrations.len(), "registering component ids");
        map.merge(registrations);
    }

    map
}

fn agent_registrations(agents: &[AgentRecord]) -> Vec<(ComponentId, SessionId)> {
    let mut out = Vec::new();
    for row in agents {
        let Some(session) = &row.session_id else {
            continue;
        };
        for id in [&row.wrapper_id, &row.agent_id].into_iter().flatten() {
            out.push((id.clone(), session.clone()));
        }
    }
    out
}

fn client_registrations(clients: &[ClientRecord]) -> Vec<(ComponentId, SessionId)> {
    let mut out = Vec::new();
    for row in clients {
        let Some(session) = &row.session_id else {
            continue;
        };
        for id in [&row.client_id, &row.wrapper_id].into_iter().flatten() {
            out.push((id.clone(), session.clone()));
        }
    }
    out
}

fn wrapper_registrations(wrappers: &[WrapperRecord]) -> Vec<(ComponentId, SessionId)> {
    wrappers
        .iter()
        .filter_map(|row| match (&row.wrapper_id, &row.session_id) {
            (Some(id), Some(session)) => Some((id.clone(), session.clone())),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(session: Option<&str>, agent_id: &str, wrapper_id: &str) -> AgentRecord {
        AgentRecord {
            session_id: session.map(SessionId::from),
            agent_id: Some(ComponentId::from(agent_id)),
            wrapper_id: Some(ComponentId::from(wrapper_id)),
            ..Default::default()
        }
    }

    fn wrapper(session: &str, wrapper_id: &str) -> WrapperRecord {
        WrapperRecord {
            session_id: Some(SessionId::from(session)),
            wrapper_id: Some(ComponentId::from(wrapper_id)),
            ..Default::default()
        }
    }

    #[test]
    fn test_agent_registers_both_ids() {
        let map = resolve_identities(&[agent(Some("S1"), "A1", "W1")], &[], &[]);

        assert_eq!(map.len(), 2);
        assert_eq!(
            map.session_for(&ComponentId::from("A1")),
            Some(&SessionId::from("S1"))
        );
        assert_eq!(
            map.session_for(&ComponentId::from("W1")),
            Some(&SessionId::from("S1"))
        );
    }

    #[test]
    fn test_wrappers_override_agents() {
        let map = resolve_identities(&[agent(Some("A"), "A1", "X")], &[], &[wrapper("B", "X")]);

        assert_eq!(
            map.session_for(&ComponentId::from("X")),
            Some(&SessionId::from("B"))
        );
        assert_eq!(
            map.session_for(&ComponentId::from("A1")),
            Some(&SessionId::from("A"))
        );
    }

    #[test]
    fn test_clients_override_agents_but_not_wrappers() {
        let client = ClientRecord {
            session_id: Some(SessionId::from("C")),
            client_id: Some(ComponentId::from("C1")),
            wrapper_id: Some(ComponentId::from("X")),
            ..Default::default()
        };

        let only_client = resolve_identities(&[agent(Some("A"), "A1", "X")], &[client.clone()], &[]);
        assert_eq!(
            only_client.session_for(&ComponentId::from("X")),
            Some(&SessionId::from("C"))
        );

        let with_wrapper = resolve_identities(
            &[agent(Some("A"), "A1", "X")],
            &[client],
            &[wrapper("W", "X")],
        );
        assert_eq!(
            with_wrapper.session_for(&ComponentId::from("X")),
            Some(&SessionId::from("W"))
        );
    }

    #[test]
    fn test_rows_without_session_register_nothing() {
        let map = resolve_identities(&[agent(None, "A1", "W1")], &[], &[]);
        assert!(map.is_empty());
        assert_eq!(map.session_for(&ComponentId::from("W1")), None);
    }
}
