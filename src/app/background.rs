//! Background task handling
//!
//! Channel sends use `let _ =`: the receiver only goes away during shutdown,
//! when nobody wants the result anyway.

use crate::app::messages::BackgroundMessage;
use crate::identity::{self, IdentityProvider};
use crate::llm::{RemoteCaller, RemoteError, RemoteResult};
use crate::session::{CallPurpose, Effect, Session};
use crate::upload;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::mpsc;
use std::sync::Arc;
use tracing::error;

/// Apply every finished background result to the session.
///
/// Returns the effects those results produced so the caller can run them.
pub fn drain_messages(
    session: &mut Session,
    rx: &mpsc::Receiver<BackgroundMessage>,
) -> Vec<Effect> {
    let mut effects = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        if let BackgroundMessage::Error(detail) = &msg {
            error!(error = %detail, "Background task failed");
        }
        if let Some(action) = msg.into_action() {
            effects.extend(session.dispatch(action));
        }
    }
    effects
}

/// Start the task behind one session effect
pub fn execute(effect: Effect, caller: &Arc<RemoteCaller>, tx: &mpsc::Sender<BackgroundMessage>) {
    match effect {
        Effect::CallRemote { purpose, request } => {
            let caller = Arc::clone(caller);
            spawn_remote_call(tx.clone(), purpose, async move {
                caller.call_request(&request).await
            });
        }
        Effect::ReadFolder(path) => {
            let tx_folder = tx.clone();
            spawn_background(tx.clone(), "read_folder", async move {
                let result = upload::read_folder(&path).await;
                let _ = tx_folder.send(BackgroundMessage::FolderLoaded(result));
            });
        }
        Effect::Schedule { after, action } => {
            let tx_due = tx.clone();
            spawn_background(tx.clone(), "schedule", async move {
                tokio::time::sleep(after).await;
                let _ = tx_due.send(BackgroundMessage::Due(action));
            });
        }
    }
}

/// Run one remote call and always answer for `purpose`, even if the call
/// panics, so the session never waits on a reply that cannot come.
fn spawn_remote_call<F>(tx: mpsc::Sender<BackgroundMessage>, purpose: CallPurpose, call: F)
where
    F: Future<Output = RemoteResult> + Send + 'static,
{
    let tx_reply = tx.clone();
    spawn_guarded(
        tx,
        "remote_call",
        async move {
            let result = call.await;
            let _ = tx_reply.send(BackgroundMessage::RemoteReplied { purpose, result });
        },
        move |detail| {
            Some(BackgroundMessage::RemoteReplied {
                purpose,
                result: Err(RemoteError::Interrupted(detail.to_string())),
            })
        },
    );
}

/// Sign in once and report the handle
pub fn spawn_identity_bootstrap(
    provider: Box<dyn IdentityProvider>,
    tx: mpsc::Sender<BackgroundMessage>,
) {
    let tx_identity = tx.clone();
    spawn_background(tx, "identity_bootstrap", async move {
        let handle = identity::bootstrap(provider.as_ref()).await;
        let _ = tx_identity.send(BackgroundMessage::IdentityResolved(handle));
    });
}

pub fn spawn_background<F>(tx: mpsc::Sender<BackgroundMessage>, task_name: &'static str, fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    spawn_guarded(tx, task_name, fut, |_| None);
}

/// Spawn `fut`, reporting a panic as an error plus whatever `on_panic`
/// builds from the panic detail
fn spawn_guarded<F, P>(
    tx: mpsc::Sender<BackgroundMessage>,
    task_name: &'static str,
    fut: F,
    on_panic: P,
) where
    F: Future<Output = ()> + Send + 'static,
    P: FnOnce(&str) -> Option<BackgroundMessage> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(panic) = AssertUnwindSafe(fut).catch_unwind().await {
            let detail = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic payload".to_string()
            };
            let _ = tx.send(BackgroundMessage::Error(format!(
                "Background task '{}' crashed unexpectedly: {}",
                task_name, detail
            )));
            if let Some(msg) = on_panic(&detail) {
                let _ = tx.send(msg);
            }
        }
    });
}
