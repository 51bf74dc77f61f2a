use std::{sync::Arc, time::Duration};

use tokio::sync::watch;
use tracing::info;

/// Process-facing side of the cancellation token.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Asks the control loop to stop at its next safe point.
    pub fn on_terminate(&self) {
        self.tx.send_replace(true);
    }

    /// Hang-up hook. Accepted and logged; nothing is reloaded yet.
    pub fn on_reload(&self) {
        info!("reload requested, nothing to reload");
    }
}

/// Loop-facing side of the cancellation token, checked between steps and
/// raced against every sleep.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

pub fn channel() -> (ShutdownHandle, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx: Arc::new(tx) }, Shutdown { rx })
}

impl Shutdown {
    pub fn is_requested(&self) -> bool {
        *self.rx.borrow()
    }

    pub async fn requested(&mut self) {
        if self.rx.wait_for(|stop| *stop).await.is_err() {
            // Every handle is gone, so nobody can ask us to stop any more.
            std::future::pending::<()>().await;
        }
    }

    /// Sleeps for `duration`. Returns `false` if shutdown was requested first.
    pub async fn sleep(&mut self, duration: Duration) -> bool {
        if self.is_requested() {
            return false;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = self.requested() => false,
        }
    }
}

/// SIGTERM and Ctrl-C terminate; SIGHUP reloads.
#[cfg(unix)]
pub fn spawn_signal_listener(handle: ShutdownHandle) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!(signal = "SIGTERM", "termination requested");
                    handle.on_terminate();
                    break;
                }
                _ = sigint.recv() => {
                    info!(signal = "SIGINT", "termination requested");
                    handle.on_terminate();
                    break;
                }
                _ = sighup.recv() => {
                    info!(signal = "SIGHUP", "hang-up received");
                    handle.on_reload();
                }
            }
        }
    });
    Ok(())
}

#[cfg(not(unix))]
pub fn spawn_signal_listener(handle: ShutdownHandle) -> std::io::Result<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!(signal = "SIGINT", "termination requested");
            handle.on_terminate();
        }
    });
    Ok(())
}
