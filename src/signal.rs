use anyhow::{Context, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag raised when the shell receives the interrupt signal.
///
/// The handler only stores into the flag; the dispatch loop polls it and
/// runs the shutdown sequence itself.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    raised: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a process-wide SIGINT handler raising this flag.
    ///
    /// The handler is installed without `SA_RESTART`, so a blocking read on
    /// standard input fails with `Interrupted` and the line source can give
    /// up on it. Can only succeed once per process.
    #[cfg(unix)]
    pub fn install(&self) -> Result<()> {
        use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

        HANDLER_FLAG
            .set(Arc::clone(&self.raised))
            .map_err(|_| anyhow::anyhow!("interrupt handler already installed"))?;
        let action = SigAction::new(
            SigHandler::Handler(handle_sigint),
            SaFlags::empty(),
            SigSet::empty(),
        );
        // SAFETY: the handler only performs an atomic load and an atomic store.
        unsafe { sigaction(Signal::SIGINT, &action) }.context("cannot install interrupt handler")?;
        Ok(())
    }

    /// Install a process-wide Ctrl-C handler raising this flag.
    #[cfg(not(unix))]
    pub fn install(&self) -> Result<()> {
        let raised = Arc::clone(&self.raised);
        ctrlc::set_handler(move || raised.store(true, Ordering::SeqCst))
            .context("cannot install interrupt handler")
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}

/// Flag of the installed [`Interrupt`], reachable from the signal handler.
#[cfg(unix)]
static HANDLER_FLAG: std::sync::OnceLock<Arc<AtomicBool>> = std::sync::OnceLock::new();

#[cfg(unix)]
extern "C" fn handle_sigint(_signal: std::ffi::c_int) {
    if let Some(raised) = HANDLER_FLAG.get() {
        raised.store(true, Ordering::SeqCst);
    }
}
