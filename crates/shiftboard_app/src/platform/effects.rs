use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Duration;

use shiftboard_core::{ApiFailure, Effect, EventBus, Msg, Notifier, Subscription, ViewScope};
use shiftboard_engine::{EngineEvent, EngineHandle};
use shiftboard_logging::{board_debug, board_info, board_warn};

/// Carries core effects out to the engine and the event bus. Bus
/// notifications come back into the message channel as `Msg::Notified`.
pub struct EffectRunner {
    engine: EngineHandle,
    bus: EventBus,
    subscriptions: HashMap<ViewScope, Vec<Subscription>>,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, msg_tx: mpsc::Sender<Msg>) -> Self {
        Self {
            engine,
            bus: EventBus::new(),
            subscriptions: HashMap::new(),
            msg_tx,
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Request {
                    request,
                    scope,
                    call,
                } => {
                    board_info!("Request {request} {} for {scope:?}", call.label());
                    self.engine.execute(request, scope, call);
                }
                Effect::Publish(topic) => {
                    board_debug!("Publishing {topic}");
                    self.bus.emit(topic);
                }
                Effect::OpenScope(scope) => self.open_scope(scope),
                Effect::CloseScope(scope) => {
                    self.subscriptions.remove(&scope);
                    self.engine.cancel_scope(scope);
                }
            }
        }
    }

    fn open_scope(&mut self, scope: ViewScope) {
        let subscriptions = scope
            .topics()
            .iter()
            .map(|&topic| {
                let msg_tx = self.msg_tx.clone();
                self.bus.subscribe(topic, move || {
                    let _ = msg_tx.send(Msg::Notified { scope, topic });
                })
            })
            .collect();
        if self.subscriptions.insert(scope, subscriptions).is_some() {
            board_warn!("Scope {scope:?} opened twice; replaced its subscriptions");
        }
    }

    /// Waits up to `timeout` for the next engine completion.
    pub fn next_completion(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(completion_msg)
    }

    #[cfg(test)]
    pub fn subscribed_scopes(&self) -> usize {
        self.subscriptions.len()
    }
}

fn completion_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Completed { request, result } => Msg::ApiCompleted {
            request,
            result: result.map_err(ApiFailure::from),
        },
    }
}
