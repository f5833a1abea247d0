use std::time::{Duration, Instant};

use blake3::Hash;
use serde_json::json;

use crate::config::SessionConfig;
use crate::error::Result;
use crate::focus::{FocusState, PinOutcome, resolve_focus};
use crate::layout::{LayoutPlan, TierLayout, compute_layout_with};
use crate::logging::{LogLevel, current_ms, event_with_fields, json_kv, json_str};
use crate::messaging::{InCallMessage, MessageLog, MessageReaction};
use crate::metrics::SessionMetrics;
use crate::participant::{Participant, ParticipantId, ReactionKind};
use crate::registry::{LocalIdentity, ParticipantRegistry, ParticipantSnapshot};
use crate::render::{RenderTile, fingerprint, render_list};
use crate::session::{Overlay, OverlayTransition, SessionUi};

pub mod actions;

pub use actions::{CallActions, NoopActions, RecordedAction, RecordingActions};

const LOG_TARGET: &str = "call_room::session";
const METRICS_TARGET: &str = "call_room::session.metrics";

/// Inputs to the session: transport updates, user gestures and time.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Fresh view of media handles and participant status.
    Snapshot(ParticipantSnapshot),
    Resize { viewport_height: f32 },
    TogglePin(ParticipantId),
    OpenOverlay(Overlay),
    ToggleOverlay(Overlay),
    CloseOverlay,
    TapBackground,
    LongPressMessage(String),
    SendMessage(String),
    /// Send the preset at this index from the quick-messages overlay.
    SendQuickMessage(usize),
    IncomingMessage(InCallMessage),
    ReactToMessage {
        message_id: String,
        reaction: MessageReaction,
    },
    IncomingReaction {
        message_id: String,
        user_id: ParticipantId,
        reaction: MessageReaction,
    },
    RaiseHand(bool),
    React(ReactionKind),
    ToggleAudio,
    ToggleVideo,
    FlipCamera,
    EndCall,
    Tick,
}

impl SessionEvent {
    fn describe(&self) -> &'static str {
        match self {
            SessionEvent::Snapshot(_) => "snapshot",
            SessionEvent::Resize { .. } => "resize",
            SessionEvent::TogglePin(_) => "toggle_pin",
            SessionEvent::OpenOverlay(_) => "open_overlay",
            SessionEvent::ToggleOverlay(_) => "toggle_overlay",
            SessionEvent::CloseOverlay => "close_overlay",
            SessionEvent::TapBackground => "tap_background",
            SessionEvent::LongPressMessage(_) => "long_press_message",
            SessionEvent::SendMessage(_) => "send_message",
            SessionEvent::SendQuickMessage(_) => "send_quick_message",
            SessionEvent::IncomingMessage(_) => "incoming_message",
            SessionEvent::ReactToMessage { .. } => "react_to_message",
            SessionEvent::IncomingReaction { .. } => "incoming_reaction",
            SessionEvent::RaiseHand(_) => "raise_hand",
            SessionEvent::React(_) => "react",
            SessionEvent::ToggleAudio => "toggle_audio",
            SessionEvent::ToggleVideo => "toggle_video",
            SessionEvent::FlipCamera => "flip_camera",
            SessionEvent::EndCall => "end_call",
            SessionEvent::Tick => "tick",
        }
    }
}

/// Which controls can do anything right now. Inert controls swallow their
/// intents instead of reaching the action sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlAvailability {
    pub audio: bool,
    pub video: bool,
    pub flip_camera: bool,
    pub end_call: bool,
}

/// View-model for one call screen.
///
/// Owns the manual pin, the overlay/controls state and the chat log. All
/// participant data is derived from the latest transport snapshot on each
/// reconciliation pass and never written back.
pub struct CallRoom {
    local: LocalIdentity,
    config: SessionConfig,
    actions: Box<dyn CallActions>,
    registry: ParticipantRegistry,
    focus: FocusState,
    ui: SessionUi,
    messages: MessageLog,
    snapshot: ParticipantSnapshot,
    viewport_height: f32,
    plan: LayoutPlan,
    tiles: Vec<RenderTile>,
    frame_hash: Option<Hash>,
    started_at: Instant,
    last_metrics_emit: Option<Instant>,
    ended: bool,
}

impl CallRoom {
    pub fn new<A>(local: LocalIdentity, config: SessionConfig, actions: A) -> Result<Self>
    where
        A: CallActions + 'static,
    {
        config.validate()?;
        let now = Instant::now();
        let ui = SessionUi::new(config.auto_hide_delay());
        let viewport_height = config.viewport_height;

        let mut room = Self {
            local,
            config,
            actions: Box::new(actions),
            registry: ParticipantRegistry::new(),
            focus: FocusState::new(),
            ui,
            messages: MessageLog::new(),
            snapshot: ParticipantSnapshot::default(),
            viewport_height,
            plan: LayoutPlan {
                focus: None,
                grid: TierLayout {
                    columns: 1,
                    tile_height: 0.0,
                    tiles: 0,
                },
                order: Vec::new(),
            },
            tiles: Vec::new(),
            frame_hash: None,
            started_at: now,
            last_metrics_emit: None,
            ended: false,
        };
        room.reconcile(now);
        Ok(room)
    }

    pub fn config_mut(&mut self) -> &mut SessionConfig {
        &mut self.config
    }

    pub fn local(&self) -> &LocalIdentity {
        &self.local
    }

    pub fn participants(&self) -> &[Participant] {
        self.registry.participants()
    }

    pub fn plan(&self) -> &LayoutPlan {
        &self.plan
    }

    pub fn tiles(&self) -> &[RenderTile] {
        &self.tiles
    }

    pub fn ui(&self) -> &SessionUi {
        &self.ui
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn pinned(&self) -> Option<&str> {
        self.focus.pinned()
    }

    pub fn quick_messages(&self) -> &[String] {
        &self.config.quick_messages
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn controls(&self) -> ControlAvailability {
        let has_media = self.snapshot.local_media.is_some() && !self.ended;
        ControlAvailability {
            audio: has_media,
            video: has_media,
            flip_camera: has_media && self.config.flip_camera_supported,
            end_call: !self.ended,
        }
    }

    /// Apply one event. Returns true when the render list or UI state
    /// changed and the host should draw a new frame.
    pub fn dispatch(&mut self, event: SessionEvent, now: Instant) -> bool {
        if self.ended {
            self.log(
                LogLevel::Debug,
                "event_after_end",
                [json_str("event", event.describe())],
            );
            return false;
        }

        let name = event.describe();
        let redraw = match event {
            SessionEvent::Snapshot(snapshot) => {
                self.snapshot = snapshot;
                self.reconcile(now)
            }
            SessionEvent::Resize { viewport_height } => self.resize(viewport_height),
            SessionEvent::TogglePin(id) => self.toggle_pin(&id),
            SessionEvent::OpenOverlay(overlay) => {
                let t = self.ui.open_overlay(overlay, now);
                self.note_overlay(t)
            }
            SessionEvent::ToggleOverlay(overlay) => {
                let t = self.ui.toggle_overlay(overlay, now);
                self.note_overlay(t)
            }
            SessionEvent::CloseOverlay => {
                let t = self.ui.close_overlay(now);
                self.note_overlay(t)
            }
            SessionEvent::TapBackground => {
                let was_visible = self.ui.controls_visible();
                self.ui.tap_background(now);
                !was_visible
            }
            SessionEvent::LongPressMessage(message_id) => {
                if self.messages.get(&message_id).is_none() {
                    false
                } else {
                    let t = self.ui.long_press_message(&message_id, now);
                    self.note_overlay(t)
                }
            }
            SessionEvent::SendMessage(text) => self.send_message(&text),
            SessionEvent::SendQuickMessage(index) => self.send_quick_message(index, now),
            SessionEvent::IncomingMessage(message) => self.receive_message(message),
            SessionEvent::ReactToMessage {
                message_id,
                reaction,
            } => self.react_to_message(&message_id, reaction, now),
            SessionEvent::IncomingReaction {
                message_id,
                user_id,
                reaction,
            } => self.messages.set_reaction(&message_id, &user_id, reaction),
            SessionEvent::RaiseHand(raised) => self.raise_hand(raised),
            SessionEvent::React(kind) => self.react(kind, now),
            SessionEvent::ToggleAudio => self.forward_control(name, |c| c.audio, |a| {
                a.on_toggle_audio()
            }),
            SessionEvent::ToggleVideo => self.forward_control(name, |c| c.video, |a| {
                a.on_toggle_video()
            }),
            SessionEvent::FlipCamera => self.forward_control(name, |c| c.flip_camera, |a| {
                a.on_flip_camera()
            }),
            SessionEvent::EndCall => self.end_call(),
            SessionEvent::Tick => self.ui.tick(now),
        };

        self.log(
            LogLevel::Trace,
            "event_dispatched",
            [json_str("event", name), json_kv("redraw", redraw)],
        );
        self.maybe_emit_metrics(now);
        redraw
    }

    /// Feed a timed script of events. Returns how many of them asked for a
    /// redraw.
    pub fn run_scripted<I>(&mut self, events: I) -> usize
    where
        I: IntoIterator<Item = (Instant, SessionEvent)>,
    {
        let mut frames = 0;
        for (at, event) in events {
            if self.dispatch(event, at) {
                frames += 1;
            }
            if self.ended {
                break;
            }
        }
        frames
    }

    /// Cancel pending timers and log the session summary. Safe to call more
    /// than once.
    pub fn teardown(&mut self) {
        self.ui.teardown();
        let uptime_ms = self.started_at.elapsed().as_millis() as u64;
        self.log(
            LogLevel::Info,
            "session_stopped",
            [
                json_kv("uptime_ms", uptime_ms),
                json_kv("messages", self.messages.len()),
            ],
        );
    }

    fn reconcile(&mut self, now: Instant) -> bool {
        let diff = self.registry.reconcile(&self.local, &self.snapshot);
        if !diff.is_empty() {
            self.log(
                LogLevel::Info,
                "participants_changed",
                [
                    json_kv("joined", json!(diff.joined)),
                    json_kv("left", json!(diff.left)),
                    json_kv("total", self.registry.len()),
                ],
            );
        }
        if let Some(pinned) = self.focus.pinned() {
            if diff.left.iter().any(|id| id == pinned) {
                self.log(
                    LogLevel::Info,
                    "pinned_participant_left",
                    [json_str("participant", pinned)],
                );
            }
        }

        let present = self.registry.remote_count() > 0;
        self.ui.set_remote_present(present, now);
        self.refresh_layout(true)
    }

    /// Focus, layout and render over the current registry. Returns whether
    /// the frame differs from the previous one.
    fn refresh_layout(&mut self, count_pass: bool) -> bool {
        let participants = self.registry.participants();
        let resolution = resolve_focus(participants, self.focus.pinned());

        // Anomalies are counted once per transport pass, not per gesture.
        if count_pass && !resolution.ignored_sharers.is_empty() {
            self.record_metric(|m| m.record_anomaly());
            self.log(
                LogLevel::Warn,
                "multiple_screen_sharers",
                [
                    json_kv("chosen", json!(resolution.focused_id)),
                    json_kv("ignored", json!(resolution.ignored_sharers)),
                ],
            );
        }

        let plan = compute_layout_with(
            &resolution.partition,
            self.viewport_height,
            &self.config.layout,
        );
        let tiles = render_list(participants, &plan, self.config.label_max_width);
        let hash = fingerprint(&tiles, plan.columns());
        let changed = self.frame_hash != Some(hash);

        if changed {
            self.log(
                LogLevel::Debug,
                "layout_changed",
                [
                    json_kv("columns", plan.columns()),
                    json_kv("focused", json!(plan.focused_id())),
                    json_kv("tiles", tiles.len()),
                ],
            );
        }

        self.plan = plan;
        self.tiles = tiles;
        self.frame_hash = Some(hash);
        if count_pass {
            self.record_metric(|m| m.record_reconcile(changed));
        }
        changed
    }

    fn resize(&mut self, viewport_height: f32) -> bool {
        if !(viewport_height.is_finite() && viewport_height > 0.0) {
            self.log(
                LogLevel::Warn,
                "invalid_viewport_ignored",
                [json_kv("viewport_height", json!(viewport_height))],
            );
            return false;
        }
        self.viewport_height = viewport_height;
        self.refresh_layout(false)
    }

    fn toggle_pin(&mut self, id: &str) -> bool {
        let outcome = self.focus.toggle_pin(id, self.registry.participants());
        let label = match outcome {
            PinOutcome::Pinned => "pinned",
            PinOutcome::Unpinned => "unpinned",
            PinOutcome::Ignored => "pin_ignored",
        };
        self.log(LogLevel::Debug, label, [json_str("participant", id)]);
        match outcome {
            PinOutcome::Ignored => false,
            _ => self.refresh_layout(false),
        }
    }

    fn note_overlay(&mut self, transition: OverlayTransition) -> bool {
        if !transition.changed() {
            return false;
        }
        self.record_metric(|m| m.record_overlay_transition());
        self.log(
            LogLevel::Debug,
            "overlay_changed",
            [
                json_kv("from", json!(transition.from)),
                json_kv("to", json!(transition.to)),
            ],
        );
        true
    }

    fn local_display_name(&self) -> String {
        self.registry
            .local()
            .map(|p| p.display_name.clone())
            .unwrap_or_else(|| self.local.display_name.clone())
    }

    fn send_message(&mut self, text: &str) -> bool {
        let name = self.local_display_name();
        let sent = self
            .messages
            .compose(&self.local.id, &name, text, true, current_ms() as u64)
            .map(|m| m.text.clone());
        match sent {
            Some(text) => {
                self.actions.on_send_message(&text);
                self.record_metric(|m| m.record_message());
                true
            }
            None => false,
        }
    }

    fn send_quick_message(&mut self, index: usize, now: Instant) -> bool {
        let Some(text) = self.config.quick_messages.get(index).cloned() else {
            self.log(
                LogLevel::Warn,
                "quick_message_out_of_range",
                [json_kv("index", index)],
            );
            return false;
        };
        let sent = self.send_message(&text);
        if self.ui.active_overlay() == Overlay::QuickMessages {
            let t = self.ui.close_overlay(now);
            self.note_overlay(t);
        }
        sent
    }

    fn receive_message(&mut self, message: InCallMessage) -> bool {
        if self.messages.contains(&message.sender_id, &message.id) {
            return false;
        }
        self.messages.append(message);
        self.record_metric(|m| m.record_message());
        true
    }

    fn react_to_message(
        &mut self,
        message_id: &str,
        reaction: MessageReaction,
        now: Instant,
    ) -> bool {
        if !self
            .messages
            .set_reaction(message_id, &self.local.id, reaction)
        {
            self.log(
                LogLevel::Debug,
                "reaction_target_missing",
                [json_str("message", message_id)],
            );
            return false;
        }
        self.actions.on_react_to_message(message_id, reaction);
        if self.ui.overlay().reaction_target() == Some(message_id) {
            let t = self.ui.close_overlay(now);
            self.note_overlay(t);
        }
        true
    }

    fn raise_hand(&mut self, raised: bool) -> bool {
        self.actions.on_raise_hand(raised);
        self.registry
            .update_local_state(|state| state.is_hand_raised = raised);
        self.refresh_layout(false)
    }

    fn react(&mut self, kind: ReactionKind, now: Instant) -> bool {
        self.actions.on_reaction(kind);
        self.registry.update_local_state(|state| {
            state.reactions.insert(kind);
        });
        let mut redraw = self.refresh_layout(false);
        if self.ui.active_overlay() == Overlay::Reactions {
            let t = self.ui.close_overlay(now);
            redraw |= self.note_overlay(t);
        }
        redraw
    }

    fn forward_control(
        &mut self,
        name: &str,
        available: impl FnOnce(&ControlAvailability) -> bool,
        send: impl FnOnce(&mut Box<dyn CallActions>),
    ) -> bool {
        if !available(&self.controls()) {
            self.record_metric(|m| m.record_suppressed_intent());
            self.log(
                LogLevel::Info,
                "control_inert",
                [json_str("control", name)],
            );
            return false;
        }
        send(&mut self.actions);
        false
    }

    fn end_call(&mut self) -> bool {
        self.actions.on_end_call();
        self.ended = true;
        self.teardown();
        true
    }

    fn record_metric(&self, update: impl FnOnce(&mut SessionMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                update(&mut guard);
            }
        }
    }

    fn maybe_emit_metrics(&mut self, now: Instant) {
        let interval = self.config.metrics_interval();
        if interval == Duration::ZERO {
            return;
        }
        match self.last_metrics_emit {
            Some(last) if now.saturating_duration_since(last) < interval => return,
            _ => self.last_metrics_emit = Some(now),
        }
        let uptime = now.saturating_duration_since(self.started_at);
        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let _ = logger.log_event(guard.snapshot(uptime).to_log_event(METRICS_TARGET));
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            if logger.enabled(level) {
                let event = event_with_fields(level, LOG_TARGET, message, fields);
                let _ = logger.log_event(event);
            }
        }
    }
}
