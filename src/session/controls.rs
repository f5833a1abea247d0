use std::time::{Duration, Instant};

use super::overlay::{Overlay, OverlayState, OverlayTransition};

pub const DEFAULT_AUTO_HIDE: Duration = Duration::from_secs(3);

/// Cancellable one-shot deadline. It never fires on its own; the owner
/// polls it with the current instant on every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoHideTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl AutoHideTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn expired(&self, now: Instant) -> bool {
        self.deadline.map(|d| now >= d).unwrap_or(false)
    }
}

/// Overlay slot plus controls-bar visibility for one call screen.
///
/// The auto-hide timer runs only while the controls are visible, at least
/// one remote participant is present and chat is closed. Every transition
/// that can touch those conditions cancels and re-arms it.
#[derive(Debug, Clone)]
pub struct SessionUi {
    overlay: OverlayState,
    controls_visible: bool,
    remote_present: bool,
    timer: AutoHideTimer,
}

impl Default for SessionUi {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_HIDE)
    }
}

impl SessionUi {
    pub fn new(auto_hide: Duration) -> Self {
        Self {
            overlay: OverlayState::new(),
            controls_visible: true,
            remote_present: false,
            timer: AutoHideTimer::new(auto_hide),
        }
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    pub fn active_overlay(&self) -> Overlay {
        self.overlay.active()
    }

    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    pub fn timer(&self) -> &AutoHideTimer {
        &self.timer
    }

    pub fn tap_background(&mut self, now: Instant) {
        self.controls_visible = true;
        self.rearm(now);
    }

    pub fn open_overlay(&mut self, overlay: Overlay, now: Instant) -> OverlayTransition {
        let transition = self.overlay.open(overlay);
        self.rearm(now);
        transition
    }

    pub fn toggle_overlay(&mut self, overlay: Overlay, now: Instant) -> OverlayTransition {
        let transition = self.overlay.toggle(overlay);
        self.rearm(now);
        transition
    }

    pub fn close_overlay(&mut self, now: Instant) -> OverlayTransition {
        let transition = self.overlay.close();
        self.rearm(now);
        transition
    }

    pub fn long_press_message(&mut self, message_id: &str, now: Instant) -> OverlayTransition {
        let transition = self.overlay.long_press_message(message_id);
        self.rearm(now);
        transition
    }

    pub fn set_remote_present(&mut self, present: bool, now: Instant) {
        if self.remote_present != present {
            self.remote_present = present;
            self.rearm(now);
        }
    }

    /// Advance time. Returns true when this tick hid the controls.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.timer.expired(now) {
            return false;
        }
        self.timer.cancel();
        if self.hide_allowed() {
            self.controls_visible = false;
            return true;
        }
        false
    }

    /// Drop any pending hide. Called when the call screen goes away.
    pub fn teardown(&mut self) {
        self.timer.cancel();
    }

    fn hide_allowed(&self) -> bool {
        self.controls_visible && self.remote_present && !self.overlay.is_chat_open()
    }

    fn rearm(&mut self, now: Instant) {
        self.timer.cancel();
        if self.hide_allowed() {
            self.timer.arm(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn controls_hide_after_delay_with_remote_present() {
        let t0 = Instant::now();
        let mut ui = SessionUi::default();
        ui.set_remote_present(true, t0);
        assert!(ui.timer().is_armed());

        assert!(!ui.tick(t0 + Duration::from_millis(2999)));
        assert!(ui.controls_visible());
        assert!(ui.tick(t0 + secs(3)));
        assert!(!ui.controls_visible());
        assert!(!ui.timer().is_armed());
    }

    #[test]
    fn alone_in_call_never_hides() {
        let t0 = Instant::now();
        let mut ui = SessionUi::default();
        ui.tap_background(t0);
        assert!(!ui.timer().is_armed());
        assert!(!ui.tick(t0 + secs(10)));
        assert!(ui.controls_visible());
    }

    #[test]
    fn opening_chat_cancels_pending_hide() {
        let t0 = Instant::now();
        let mut ui = SessionUi::default();
        ui.set_remote_present(true, t0);
        ui.open_overlay(Overlay::Chat, t0 + secs(1));
        assert!(!ui.timer().is_armed());
        assert!(!ui.tick(t0 + secs(5)));
        assert!(ui.controls_visible());
    }

    #[test]
    fn message_reaction_picker_keeps_chat_semantics() {
        let t0 = Instant::now();
        let mut ui = SessionUi::default();
        ui.set_remote_present(true, t0);
        ui.open_overlay(Overlay::Chat, t0);
        ui.long_press_message("m1", t0);
        assert!(!ui.timer().is_armed());

        ui.close_overlay(t0);
        assert_eq!(ui.active_overlay(), Overlay::Chat);
        assert!(!ui.timer().is_armed());

        ui.close_overlay(t0 + secs(1));
        assert!(ui.timer().is_armed());
        assert!(ui.tick(t0 + secs(4)));
    }

    #[test]
    fn tap_rearms_from_the_latest_instant() {
        let t0 = Instant::now();
        let mut ui = SessionUi::default();
        ui.set_remote_present(true, t0);
        ui.tap_background(t0 + secs(2));
        assert!(!ui.tick(t0 + secs(4)));
        assert!(ui.tick(t0 + secs(5)));

        ui.tap_background(t0 + secs(6));
        assert!(ui.controls_visible());
        assert_eq!(ui.timer().deadline(), Some(t0 + secs(9)));
    }

    #[test]
    fn last_remote_leaving_cancels_timer() {
        let t0 = Instant::now();
        let mut ui = SessionUi::default();
        ui.set_remote_present(true, t0);
        ui.set_remote_present(false, t0 + secs(1));
        assert!(!ui.tick(t0 + secs(4)));
        assert!(ui.controls_visible());
    }

    #[test]
    fn teardown_drops_pending_hide() {
        let t0 = Instant::now();
        let mut ui = SessionUi::default();
        ui.set_remote_present(true, t0);
        ui.teardown();
        assert!(!ui.tick(t0 + secs(10)));
    }

    #[test]
    fn hidden_controls_do_not_rearm_on_overlay_change() {
        let t0 = Instant::now();
        let mut ui = SessionUi::new(secs(1));
        ui.set_remote_present(true, t0);
        assert!(ui.tick(t0 + secs(1)));
        ui.open_overlay(Overlay::Reactions, t0 + secs(2));
        assert!(!ui.timer().is_armed());
        assert_eq!(ui.active_overlay(), Overlay::Reactions);
    }
}
