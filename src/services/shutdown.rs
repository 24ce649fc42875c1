use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Cooperative cancellation flag shared between the frame loop and the
/// signal listener
#[derive(Debug, Clone)]
pub struct RunFlag {
    running: Arc<AtomicBool>,
}

impl RunFlag {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Ask the frame loop to stop after the current iteration
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Default for RunFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn a thread that clears `flag` on SIGINT or SIGTERM (Ctrl-C on
/// Windows).
///
/// The handlers are registered before this returns, so a signal arriving
/// right after startup is never handled by the default action. The thread
/// runs a single-threaded tokio runtime and exits after the first signal.
pub fn listen_for_signals(flag: RunFlag) -> std::io::Result<JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut signals = {
        let _context = runtime.enter();
        ShutdownSignals::register()?
    };

    std::thread::Builder::new()
        .name("signal-listener".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                let signal = signals.recv().await;
                tracing::info!(signal, "Shutdown requested");
                flag.stop();
            });
        })
}

#[cfg(unix)]
struct ShutdownSignals {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    fn register() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        }
    }
}

#[cfg(windows)]
struct ShutdownSignals {
    ctrl_c: tokio::signal::windows::CtrlC,
}

#[cfg(windows)]
impl ShutdownSignals {
    fn register() -> std::io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    async fn recv(&mut self) -> &'static str {
        self.ctrl_c.recv().await;
        "Ctrl-C"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_flag_shared_between_clones() {
        let flag = RunFlag::new();
        let other = flag.clone();
        assert!(flag.is_running());

        other.stop();
        assert!(!flag.is_running());
    }

    #[test]
    fn test_listener_starts() {
        let handle = listen_for_signals(RunFlag::new()).unwrap();
        assert_eq!(handle.thread().name(), Some("signal-listener"));
    }

    #[cfg(unix)]
    #[test]
    fn test_sigterm_right_after_start_stops_flag() {
        let flag = RunFlag::new();
        listen_for_signals(flag.clone()).unwrap();

        // Sent immediately: the handler must already be in place
        let status = std::process::Command::new("sh")
            .arg("-c")
            .arg(format!("kill -TERM {}", std::process::id()))
            .status()
            .unwrap();
        assert!(status.success());

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while flag.is_running() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(!flag.is_running());
    }
}
