use blake3::{Hash, Hasher};
use serde::Serialize;

use crate::avatar::{AvatarStyle, TextTone, avatar_for};
use crate::layout::LayoutPlan;
use crate::participant::{MediaHandle, Participant, ReactionKind};
use crate::width::truncate_to_width;

/// Status indicators drawn on top of a tile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TileBadges {
    pub muted: bool,
    pub video_off: bool,
    pub hand_raised: bool,
    pub speaking: bool,
    pub screen_sharing: bool,
    pub reactions: Vec<ReactionKind>,
}

impl TileBadges {
    fn from_participant(p: &Participant) -> Self {
        Self {
            muted: p.state.is_muted(),
            video_off: !p.state.is_video_enabled,
            hand_raised: p.state.is_hand_raised,
            speaking: p.state.is_speaking,
            screen_sharing: p.state.is_screen_sharing,
            reactions: p.state.reactions.iter().copied().collect(),
        }
    }
}

/// Everything the rendering layer needs for one participant tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderTile {
    pub participant_id: String,
    pub label: String,
    pub is_local: bool,
    pub is_focused: bool,
    pub tile_height: f32,
    /// Stream to attach when video is showing.
    pub media: Option<MediaHandle>,
    /// Placeholder used when there is no video to show.
    pub avatar: Option<AvatarStyle>,
    pub badges: TileBadges,
}

/// Pair each id in `plan.order` with its participant. Ids the plan mentions
/// but the list lacks are skipped.
pub fn render_list(
    participants: &[Participant],
    plan: &LayoutPlan,
    label_max_width: usize,
) -> Vec<RenderTile> {
    let focused = plan.focused_id();
    plan.order
        .iter()
        .filter_map(|id| {
            let p = participants.iter().find(|p| &p.id == id)?;
            let tile_height = plan.tile_height_for(id)?;
            let shows_video = p.shows_video();
            Some(RenderTile {
                participant_id: p.id.clone(),
                label: truncate_to_width(&p.display_name, label_max_width),
                is_local: p.is_local,
                is_focused: focused == Some(p.id.as_str()),
                tile_height,
                media: if shows_video { p.media.clone() } else { None },
                avatar: (!shows_video).then(|| avatar_for(&p.id, &p.display_name)),
                badges: TileBadges::from_participant(p),
            })
        })
        .collect()
}

/// Content hash of a render list. Two lists with equal fingerprints draw
/// the same frame.
pub fn fingerprint(tiles: &[RenderTile], columns: usize) -> Hash {
    let mut hasher = Hasher::new();
    hasher.update(&(columns as u64).to_le_bytes());
    for tile in tiles {
        hasher.update(tile.participant_id.as_bytes());
        hasher.update(&[0]);
        hasher.update(tile.label.as_bytes());
        hasher.update(&[0]);
        hasher.update(&tile.tile_height.to_bits().to_le_bytes());
        let b = &tile.badges;
        hasher.update(&[
            u8::from(tile.is_local),
            u8::from(tile.is_focused),
            u8::from(b.muted),
            u8::from(b.video_off),
            u8::from(b.hand_raised),
            u8::from(b.speaking),
            u8::from(b.screen_sharing),
        ]);
        for reaction in &b.reactions {
            hasher.update(&[*reaction as u8]);
        }
        hasher.update(&[0xff]);
        if let Some(media) = &tile.media {
            hasher.update(media.as_str().as_bytes());
        }
        hasher.update(&[0]);
        if let Some(avatar) = &tile.avatar {
            hasher.update(avatar.initials.as_bytes());
            hasher.update(&[0]);
            hasher.update(avatar.color.hex.as_bytes());
            hasher.update(&[u8::from(avatar.text == TextTone::Dark)]);
        }
        hasher.update(&[0]);
    }
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::resolve_focus;
    use crate::layout::compute_layout;
    use crate::participant::ParticipantState;

    fn participant(id: &str, name: &str, media: bool) -> Participant {
        Participant {
            id: id.to_string(),
            display_name: name.to_string(),
            is_local: id == "u1",
            media: media.then(|| MediaHandle::new(format!("s-{id}"))),
            state: ParticipantState::default(),
        }
    }

    #[test]
    fn tiles_follow_plan_order_with_focus_first() {
        let list = vec![
            participant("u1", "Me", true),
            participant("u2", "Ana", true),
            participant("u3", "Bo", false),
        ];
        let res = resolve_focus(&list, Some("u3"));
        let plan = compute_layout(&res.partition, 1000.0);
        let tiles = render_list(&list, &plan, 10);

        let ids: Vec<_> = tiles.iter().map(|t| t.participant_id.as_str()).collect();
        assert_eq!(ids, vec!["u3", "u1", "u2"]);
        assert!(tiles[0].is_focused);
        assert!(!tiles[1].is_focused);
        assert_eq!(tiles[0].tile_height, plan.focus.unwrap().tile_height);
    }

    #[test]
    fn avatar_replaces_missing_or_disabled_video() {
        let mut camera_off = participant("u2", "Ana Lima", true);
        camera_off.state.is_video_enabled = false;
        let list = vec![participant("u1", "Me", true), camera_off];
        let res = resolve_focus(&list, None);
        let plan = compute_layout(&res.partition, 800.0);
        let tiles = render_list(&list, &plan, 10);

        assert!(tiles[0].media.is_some());
        assert!(tiles[0].avatar.is_none());
        assert!(tiles[1].media.is_none());
        assert_eq!(tiles[1].avatar.as_ref().unwrap().initials, "AL");
        assert!(tiles[1].badges.video_off);
    }

    #[test]
    fn labels_are_truncated() {
        let list = vec![participant("u1", "Maximiliana Fernández", false)];
        let plan = compute_layout(&resolve_focus(&list, None).partition, 800.0);
        let tiles = render_list(&list, &plan, 8);
        assert_eq!(tiles[0].label, "Maximil…");
    }

    #[test]
    fn fingerprint_tracks_visible_changes() {
        let mut list = vec![participant("u1", "Me", true), participant("u2", "Ana", true)];
        let plan = compute_layout(&resolve_focus(&list, None).partition, 800.0);
        let before = fingerprint(&render_list(&list, &plan, 10), plan.columns());
        let same = fingerprint(&render_list(&list, &plan, 10), plan.columns());
        assert_eq!(before, same);

        list[1].state.is_hand_raised = true;
        let after = fingerprint(&render_list(&list, &plan, 10), plan.columns());
        assert_ne!(before, after);
    }

    #[test]
    fn fingerprint_sees_initials_past_the_label_cut() {
        let render = |name: &str| {
            let list = vec![participant("u2", name, false)];
            let plan = compute_layout(&resolve_focus(&list, None).partition, 800.0);
            render_list(&list, &plan, 8)
        };
        let before = render("Maximiliana Fernandez");
        let after = render("Maximiliana Garcia");
        assert_eq!(before[0].label, after[0].label);
        assert_ne!(before, after);
        assert_ne!(fingerprint(&before, 1), fingerprint(&after, 1));
    }
}
