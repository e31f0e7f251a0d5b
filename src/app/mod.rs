//! Application core: one event stream in, one view model out. The runtime
//! owns the state, feeds every event through the reducer, and tracks a dirty
//! flag so the presentation layer only re-reads the model when something
//! actually changed.

pub mod commands;
pub mod event;
pub mod reducer;
pub mod render;
pub mod state;

pub use commands::Command;
pub use event::{ApiEvent, AppEvent, PushEvent, TimerEvent, UiEvent, WalletOp};
pub use render::RenderModel;
pub use state::AppState;

use event::UiEvent as Ui;

/// Destructive-action gate. Consulted at event ingress, before the reducer
/// ever sees the event; a declined confirmation drops the event entirely.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Approves everything. For tests and headless runs.
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// The prompt for an operator action that needs explicit confirmation, or
/// None when the action goes straight through.
pub fn confirmation_prompt(ev: &UiEvent) -> Option<String> {
    match ev {
        Ui::ModeChangeRequested { paper_mode: false } => {
            Some("Switch to LIVE trading with real funds?".to_string())
        }
        Ui::Withdraw { amount } => Some(format!(
            "Withdraw {} from the wallet?",
            crate::format::fmt_money(*amount)
        )),
        Ui::ResetWallet { amount } => Some(format!(
            "Reset the wallet to {}? This erases the paper history.",
            crate::format::fmt_money(*amount)
        )),
        Ui::ManualTrade { side } => Some(format!("Place a manual {} order?", side.as_str())),
        _ => None,
    }
}

pub struct AppRuntime<C: Confirm> {
    state: AppState,
    confirm: C,
    dirty: bool,
}

impl<C: Confirm> AppRuntime<C> {
    pub fn new(confirm: C) -> Self {
        Self {
            state: AppState::new(),
            confirm,
            dirty: true,
        }
    }

    /// Seeds the status flags, trigger config and trade ledger over REST
    /// once at startup. Runs whether or not the push channel ever comes up;
    /// a later connect re-seeds both slices.
    pub fn bootstrap(&mut self) {
        let seq = self.state.next_seq();
        self.state.status_seq = seq;
        self.state.queue(Command::FetchStatus { seq });
        let seq = self.state.next_seq();
        self.state.trades_seq = seq;
        self.state.queue(Command::FetchTrades { seq });
    }

    /// Operator events enter here so the confirmation gate can intercept
    /// them. Returns false when the operator declined.
    pub fn submit_ui(&mut self, ev: UiEvent) -> bool {
        if let Some(prompt) = confirmation_prompt(&ev) {
            if !self.confirm.confirm(&prompt) {
                return false;
            }
        }
        self.handle_event(AppEvent::Ui(ev));
        true
    }

    /// Push, API and timer events bypass the gate.
    pub fn handle_event(&mut self, ev: AppEvent) {
        if reducer::reduce(&mut self.state, ev) {
            self.dirty = true;
        }
    }

    /// Side effects queued by the last reduce steps. Drained every loop
    /// iteration regardless of the dirty flag.
    pub fn take_commands(&mut self) -> Vec<Command> {
        self.state.take_commands()
    }

    /// Projects the current state, clearing the dirty flag. None when
    /// nothing changed since the last call.
    pub fn render_if_dirty(&mut self) -> Option<RenderModel> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(render::render(&self.state))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DenyAll;

    impl Confirm for DenyAll {
        fn confirm(&self, _prompt: &str) -> bool {
            false
        }
    }

    #[test]
    fn declined_confirmation_drops_the_event() {
        let mut rt = AppRuntime::new(DenyAll);
        rt.render_if_dirty();

        assert!(!rt.submit_ui(UiEvent::ModeChangeRequested { paper_mode: false }));
        assert!(!rt.submit_ui(UiEvent::Withdraw { amount: 50.0 }));
        assert!(rt.take_commands().is_empty());
        assert!(rt.render_if_dirty().is_none());
        assert!(rt.state().paper_mode);
    }

    #[test]
    fn paper_mode_switch_needs_no_confirmation() {
        let mut rt = AppRuntime::new(DenyAll);
        assert!(rt.submit_ui(UiEvent::ModeChangeRequested { paper_mode: true }));
        assert!(matches!(
            rt.take_commands()[0],
            Command::SetMode { paper_mode: true }
        ));
    }

    #[test]
    fn deposit_is_not_gated_but_withdraw_is() {
        assert!(confirmation_prompt(&UiEvent::Deposit { amount: 10.0 }).is_none());
        assert!(confirmation_prompt(&UiEvent::Withdraw { amount: 10.0 }).is_some());
        assert!(confirmation_prompt(&UiEvent::ResetWallet { amount: 10.0 }).is_some());
    }

    #[test]
    fn bootstrap_seeds_status_and_trades_without_a_connection() {
        let mut rt = AppRuntime::new(AlwaysConfirm);
        rt.bootstrap();
        assert!(!rt.state().connected, "no push channel involved");
        let cmds = rt.take_commands();
        assert!(matches!(cmds[0], Command::FetchStatus { .. }));
        assert!(matches!(cmds[1], Command::FetchTrades { .. }));
    }

    #[test]
    fn dirty_flag_clears_after_render() {
        let mut rt = AppRuntime::new(AlwaysConfirm);
        assert!(rt.render_if_dirty().is_some(), "initial render is forced");
        assert!(rt.render_if_dirty().is_none());

        rt.handle_event(AppEvent::Push(PushEvent::Connected));
        assert!(rt.render_if_dirty().is_some());
        assert!(rt.render_if_dirty().is_none());
    }
}
