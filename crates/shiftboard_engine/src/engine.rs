use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use shiftboard_core::{ApiCall, RequestId, ViewScope};
use shiftboard_logging::{board_debug, board_info};
use tokio_util::sync::CancellationToken;

use crate::client::{ApiSettings, ReqwestApi, RosterApi};
use crate::{ApiError, EngineError, EngineEvent, FailureKind};

enum EngineCommand {
    Execute {
        request: RequestId,
        scope: ViewScope,
        call: ApiCall,
    },
    CancelScope(ViewScope),
}

/// Runs API calls on a background tokio runtime. Every call belongs to a
/// view scope; cancelling the scope resolves its outstanding calls as
/// `Cancelled`.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, EngineError> {
        let api = ReqwestApi::new(settings)?;
        Self::with_api(Arc::new(api))
    }

    pub fn with_api(api: Arc<dyn RosterApi>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            let mut scopes: HashMap<ViewScope, CancellationToken> = HashMap::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Execute {
                        request,
                        scope,
                        call,
                    } => {
                        let token = scopes.entry(scope).or_default().clone();
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            run_call(api.as_ref(), request, call, token, event_tx).await;
                        });
                    }
                    EngineCommand::CancelScope(scope) => {
                        if let Some(token) = scopes.remove(&scope) {
                            board_info!("Cancelling outstanding calls for {scope:?}");
                            token.cancel();
                        }
                    }
                }
            }
            board_debug!("Engine command channel closed");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn execute(&self, request: RequestId, scope: ViewScope, call: ApiCall) {
        let _ = self.cmd_tx.send(EngineCommand::Execute {
            request,
            scope,
            call,
        });
    }

    pub fn cancel_scope(&self, scope: ViewScope) {
        let _ = self.cmd_tx.send(EngineCommand::CancelScope(scope));
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn run_call(
    api: &dyn RosterApi,
    request: RequestId,
    call: ApiCall,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    board_debug!("Request {request}: {}", call.label());
    let result = tokio::select! {
        biased;
        () = token.cancelled() => Err(ApiError::new(FailureKind::Cancelled, "view closed")),
        result = api.call(&call) => result,
    };
    let _ = event_tx.send(EngineEvent::Completed { request, result });
}
