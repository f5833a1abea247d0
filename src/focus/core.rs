use crate::participant::{Participant, ParticipantId};

/// Why a participant occupies the large tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusReason {
    ScreenShare,
    Pinned,
}

/// Result of a pin toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOutcome {
    Pinned,
    Unpinned,
    /// The id was not in the registry; nothing changed.
    Ignored,
}

/// The user's manual pin. Screen-share focus is derived per pass and never
/// written here, so the pin comes back once sharing stops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusState {
    pinned: Option<ParticipantId>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pinned(&self) -> Option<&str> {
        self.pinned.as_deref()
    }

    /// Pin `id`, or unpin it when it is already pinned. Ids missing from
    /// `registry` are ignored.
    pub fn toggle_pin(&mut self, id: &str, registry: &[Participant]) -> PinOutcome {
        if !registry.iter().any(|p| p.id == id) {
            return PinOutcome::Ignored;
        }
        if self.pinned.as_deref() == Some(id) {
            self.pinned = None;
            PinOutcome::Unpinned
        } else {
            self.pinned = Some(id.to_string());
            PinOutcome::Pinned
        }
    }

    pub fn clear(&mut self) {
        self.pinned = None;
    }
}

/// Registry split into the large tile and everything else.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    pub focused: Option<&'a Participant>,
    pub reason: Option<FocusReason>,
    pub rest: Vec<&'a Participant>,
}

impl<'a> Partition<'a> {
    /// A partition with no focus tier.
    pub fn flat(participants: &'a [Participant]) -> Self {
        Self {
            focused: None,
            reason: None,
            rest: participants.iter().collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.rest.len() + usize::from(self.focused.is_some())
    }

    /// True when the local user is presenting their own screen.
    pub fn is_local_share(&self) -> bool {
        matches!(
            (self.focused, self.reason),
            (Some(p), Some(FocusReason::ScreenShare)) if p.is_local
        )
    }
}

#[derive(Debug, Clone)]
pub struct FocusResolution<'a> {
    pub focused_id: Option<&'a str>,
    pub partition: Partition<'a>,
    /// Further participants that also claimed to be sharing and lost the
    /// tie-break.
    pub ignored_sharers: Vec<&'a str>,
}

/// Choose the focused participant. The first screen sharer in registry order
/// wins outright; otherwise a manual pin that is still present; otherwise
/// nobody.
pub fn resolve_focus<'a>(
    registry: &'a [Participant],
    manual_pin: Option<&str>,
) -> FocusResolution<'a> {
    let mut sharers = registry.iter().filter(|p| p.state.is_screen_sharing);
    let sharer = sharers.next();
    let ignored_sharers: Vec<&str> = sharers.map(|p| p.id.as_str()).collect();

    let (focused, reason) = match sharer {
        Some(p) => (Some(p), Some(FocusReason::ScreenShare)),
        None => match manual_pin.and_then(|id| registry.iter().find(|p| p.id == id)) {
            Some(p) => (Some(p), Some(FocusReason::Pinned)),
            None => (None, None),
        },
    };

    let rest = registry
        .iter()
        .filter(|p| focused.map(|f| f.id != p.id).unwrap_or(true))
        .collect();

    FocusResolution {
        focused_id: focused.map(|p| p.id.as_str()),
        partition: Partition {
            focused,
            reason,
            rest,
        },
        ignored_sharers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::ParticipantState;

    fn person(id: &str, local: bool, sharing: bool) -> Participant {
        Participant {
            id: id.to_string(),
            display_name: id.to_uppercase(),
            is_local: local,
            media: None,
            state: ParticipantState {
                is_screen_sharing: sharing,
                ..ParticipantState::default()
            },
        }
    }

    fn ids<'a>(list: &[&'a Participant]) -> Vec<&'a str> {
        list.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn screen_share_overrides_manual_pin() {
        let registry = vec![
            person("u1", true, false),
            person("u2", false, true),
            person("u3", false, false),
        ];
        let res = resolve_focus(&registry, Some("u3"));
        assert_eq!(res.focused_id, Some("u2"));
        assert_eq!(res.partition.reason, Some(FocusReason::ScreenShare));
        assert_eq!(ids(&res.partition.rest), vec!["u1", "u3"]);
    }

    #[test]
    fn manual_pin_used_when_nobody_shares() {
        let registry = vec![person("u1", true, false), person("u2", false, false)];
        let res = resolve_focus(&registry, Some("u2"));
        assert_eq!(res.focused_id, Some("u2"));
        assert_eq!(res.partition.reason, Some(FocusReason::Pinned));
        assert_eq!(ids(&res.partition.rest), vec!["u1"]);
    }

    #[test]
    fn stale_pin_yields_flat_grid() {
        let registry = vec![person("u1", true, false), person("u2", false, false)];
        let res = resolve_focus(&registry, Some("u3"));
        assert!(res.focused_id.is_none());
        assert!(res.partition.focused.is_none());
        assert_eq!(res.partition.total(), 2);
    }

    #[test]
    fn first_sharer_wins_and_others_are_reported() {
        let registry = vec![
            person("u1", true, false),
            person("u2", false, true),
            person("u3", false, true),
        ];
        let res = resolve_focus(&registry, None);
        assert_eq!(res.focused_id, Some("u2"));
        assert_eq!(res.ignored_sharers, vec!["u3"]);
        // The losing sharer stays in the rest tier.
        assert_eq!(ids(&res.partition.rest), vec!["u1", "u3"]);
    }

    #[test]
    fn never_more_than_one_focus() {
        let registry: Vec<Participant> = (0..6)
            .map(|i| person(&format!("u{i}"), i == 0, i % 2 == 1))
            .collect();
        for pin in [None, Some("u0"), Some("u4"), Some("missing")] {
            let res = resolve_focus(&registry, pin);
            let focused = usize::from(res.partition.focused.is_some());
            assert!(focused <= 1);
            assert_eq!(res.partition.total(), registry.len());
        }
    }

    #[test]
    fn toggle_twice_clears_pin() {
        let registry = vec![person("u1", true, false), person("u2", false, false)];
        let mut focus = FocusState::new();
        assert_eq!(focus.toggle_pin("u2", &registry), PinOutcome::Pinned);
        assert_eq!(focus.toggle_pin("u2", &registry), PinOutcome::Unpinned);
        assert_eq!(focus.pinned(), None);
    }

    #[test]
    fn pinning_another_overwrites() {
        let registry = vec![person("u1", true, false), person("u2", false, false)];
        let mut focus = FocusState::new();
        focus.toggle_pin("u2", &registry);
        assert_eq!(focus.toggle_pin("u1", &registry), PinOutcome::Pinned);
        assert_eq!(focus.pinned(), Some("u1"));
    }

    #[test]
    fn pinning_absent_participant_is_ignored() {
        let registry = vec![person("u1", true, false)];
        let mut focus = FocusState::new();
        assert_eq!(focus.toggle_pin("gone", &registry), PinOutcome::Ignored);
        assert_eq!(focus.pinned(), None);
    }

    #[test]
    fn pin_returns_after_share_ends() {
        let mut registry = vec![
            person("u1", true, false),
            person("u2", false, true),
            person("u3", false, false),
        ];
        let mut focus = FocusState::new();
        focus.toggle_pin("u3", &registry);
        assert_eq!(resolve_focus(&registry, focus.pinned()).focused_id, Some("u2"));

        registry[1].state.is_screen_sharing = false;
        assert_eq!(resolve_focus(&registry, focus.pinned()).focused_id, Some("u3"));
    }

    #[test]
    fn local_share_detection() {
        let registry = vec![person("u1", true, true), person("u2", false, false)];
        let res = resolve_focus(&registry, None);
        assert!(res.partition.is_local_share());

        let pinned_local = vec![person("u1", true, false), person("u2", false, false)];
        let res = resolve_focus(&pinned_local, Some("u1"));
        assert!(!res.partition.is_local_share());
    }
}
