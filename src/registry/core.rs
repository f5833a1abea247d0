use std::collections::{HashMap, HashSet};

use crate::participant::{
    MediaHandle, Participant, ParticipantId, ParticipantState, RemoteMedia, StateMap,
    fallback_name,
};

/// The caller's own identity, fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalIdentity {
    pub id: ParticipantId,
    pub display_name: String,
}

impl LocalIdentity {
    pub fn new(id: impl Into<ParticipantId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Everything the transport has told us at one instant. Each reconciliation
/// pass treats it as an immutable snapshot.
#[derive(Debug, Clone, Default)]
pub struct ParticipantSnapshot {
    pub local_media: Option<MediaHandle>,
    /// Remote streams in arrival order.
    pub remote_media: Vec<RemoteMedia>,
    pub states: StateMap,
    /// Display names resolved by the directory so far.
    pub names: HashMap<ParticipantId, String>,
}

impl ParticipantSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_local_media(mut self, handle: MediaHandle) -> Self {
        self.local_media = Some(handle);
        self
    }

    pub fn with_remote(mut self, id: impl Into<ParticipantId>, handle: MediaHandle) -> Self {
        self.remote_media.push(RemoteMedia::new(id, handle));
        self
    }

    pub fn with_state(mut self, id: impl Into<ParticipantId>, state: ParticipantState) -> Self {
        self.states.insert(id.into(), state);
        self
    }

    pub fn with_name(mut self, id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        self.names.insert(id.into(), name.into());
        self
    }
}

fn resolve_name(name: Option<&String>, id: &str) -> String {
    match name.map(|n| n.trim()) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => fallback_name(id),
    }
}

/// Merge the local user, remote streams and status map into one list with a
/// fresh canonical order: local, then remote streams by arrival, then
/// participants known only through their status.
///
/// State-only ids carry no arrival information, so they are appended in
/// ascending id order to keep the result independent of map iteration.
pub fn build_registry(local: &LocalIdentity, snapshot: &ParticipantSnapshot) -> Vec<Participant> {
    let state_of = |id: &str| snapshot.states.get(id).cloned().unwrap_or_default();

    let mut out = vec![Participant {
        id: local.id.clone(),
        display_name: resolve_name(Some(&local.display_name), &local.id),
        is_local: true,
        media: snapshot.local_media.clone(),
        state: state_of(&local.id),
    }];
    let mut index: HashMap<ParticipantId, usize> = HashMap::new();
    index.insert(local.id.clone(), 0);

    for remote in &snapshot.remote_media {
        let id = &remote.participant_id;
        if let Some(&slot) = index.get(id) {
            let existing = &mut out[slot];
            // The local record keeps its own capture stream if it has one.
            if !existing.is_local || existing.media.is_none() {
                existing.media = Some(remote.handle.clone());
            }
            continue;
        }
        index.insert(id.clone(), out.len());
        out.push(Participant {
            id: id.clone(),
            display_name: resolve_name(snapshot.names.get(id), id),
            is_local: false,
            media: Some(remote.handle.clone()),
            state: state_of(id),
        });
    }

    let mut state_only: Vec<&ParticipantId> = snapshot
        .states
        .keys()
        .filter(|id| !index.contains_key(*id))
        .collect();
    state_only.sort();
    for id in state_only {
        index.insert(id.clone(), out.len());
        out.push(Participant {
            id: id.clone(),
            display_name: resolve_name(snapshot.names.get(id), id),
            is_local: false,
            media: None,
            state: state_of(id),
        });
    }

    out
}

/// Ids that entered or left the call during one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryDiff {
    pub joined: Vec<ParticipantId>,
    pub left: Vec<ParticipantId>,
}

impl RegistryDiff {
    pub fn is_empty(&self) -> bool {
        self.joined.is_empty() && self.left.is_empty()
    }
}

/// Ordered participant list that remembers its previous order so tiles do
/// not jump around between passes.
#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    participants: Vec<Participant>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the list from a snapshot. Ids seen in the previous pass keep
    /// their relative order; new ids are appended in canonical order and
    /// missing ids are dropped. The local participant always stays first.
    pub fn reconcile(
        &mut self,
        local: &LocalIdentity,
        snapshot: &ParticipantSnapshot,
    ) -> RegistryDiff {
        let fresh = build_registry(local, snapshot);
        let fresh_order: Vec<ParticipantId> = fresh.iter().map(|p| p.id.clone()).collect();
        let mut by_id: HashMap<ParticipantId, Participant> =
            fresh.into_iter().map(|p| (p.id.clone(), p)).collect();

        let mut next = Vec::with_capacity(by_id.len());
        let mut diff = RegistryDiff::default();

        for previous in &self.participants {
            match by_id.remove(&previous.id) {
                Some(current) => next.push(current),
                None => diff.left.push(previous.id.clone()),
            }
        }

        let known: HashSet<ParticipantId> =
            self.participants.iter().map(|p| p.id.clone()).collect();
        for id in &fresh_order {
            if let Some(current) = by_id.remove(id) {
                if !known.contains(id) {
                    diff.joined.push(id.clone());
                }
                next.push(current);
            }
        }

        if let Some(pos) = next.iter().position(|p| p.is_local) {
            if pos != 0 {
                let local_record = next.remove(pos);
                next.insert(0, local_record);
            }
        }

        self.participants = next;
        diff
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn local(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is_local)
    }

    /// Apply an optimistic edit to the local participant's state. The next
    /// snapshot from the transport overwrites it.
    pub fn update_local_state(&mut self, edit: impl FnOnce(&mut ParticipantState)) -> bool {
        match self.participants.iter_mut().find(|p| p.is_local) {
            Some(local) => {
                edit(&mut local.state);
                true
            }
            None => false,
        }
    }

    pub fn remote_count(&self) -> usize {
        self.participants.iter().filter(|p| !p.is_local).count()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.participants.iter().map(|p| p.id.as_str()).collect()
    }
}

/// Participants-panel ordering: raised hands first, each group in registry
/// order.
pub fn raised_hands_first(participants: &[Participant]) -> Vec<&Participant> {
    let (raised, rest): (Vec<&Participant>, Vec<&Participant>) =
        participants.iter().partition(|p| p.state.is_hand_raised);
    raised.into_iter().chain(rest).collect()
}
