use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use shiftboard_core::{update, AppState, AppViewModel, Msg, Notice};
use shiftboard_engine::EngineHandle;
use shiftboard_logging::{board_debug, board_trace};

use super::config::AppConfig;
use super::effects::EffectRunner;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One running dashboard: the core state, the effect runner and the
/// message channel that bus notifications and ticks arrive on.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
    notices: Vec<Notice>,
}

impl Session {
    pub fn start(config: &AppConfig) -> anyhow::Result<Self> {
        let engine = EngineHandle::new(config.api_settings())?;
        Ok(Self::with_engine(engine, &config.maintainer))
    }

    /// Starts the roster against `engine` and waits for the first load.
    pub fn with_engine(engine: EngineHandle, maintainer: &str) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
        let runner = EffectRunner::new(engine, msg_tx.clone());

        // Keeps relative times ("registered 3 days ago") current.
        thread::spawn(move || {
            while msg_tx.send(Msg::Tick { now: Utc::now() }).is_ok() {
                thread::sleep(TICK_INTERVAL);
            }
        });

        let mut session = Self {
            state: AppState::new().with_maintainer(maintainer),
            runner,
            msg_rx,
            notices: Vec::new(),
        };
        session.dispatch(Msg::Started { now: Utc::now() });
        session.settle();
        session
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.notices.extend(state.take_notices());
        if state.consume_dirty() {
            board_trace!("View changed; {} request(s) pending", state.in_flight_count());
        }
        self.state = state;
        self.runner.run(effects);
    }

    /// Pumps bus notifications and engine completions until no request is
    /// outstanding.
    pub fn settle(&mut self) {
        loop {
            while let Ok(msg) = self.msg_rx.try_recv() {
                self.dispatch(msg);
            }
            if self.state.is_idle() {
                break;
            }
            if let Some(msg) = self.runner.next_completion(POLL_INTERVAL) {
                self.dispatch(msg);
            }
        }
        board_debug!("Settled");
    }

    /// Dispatches `msg` and waits for everything it set off.
    pub fn send(&mut self, msg: Msg) {
        self.dispatch(msg);
        self.settle();
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
