use crate::error::{ProbeError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Records Ctrl+C. While a foreground child owns the terminal the child gets
/// the interrupt itself, so the handler only takes note; otherwise the first
/// press asks the launcher to stop and the second exits.
#[derive(Clone)]
pub struct InterruptGuard {
    interrupted: Arc<AtomicBool>,
    child_active: Arc<AtomicBool>,
}

impl InterruptGuard {
    pub fn new() -> Result<Self> {
        let interrupted = Arc::new(AtomicBool::new(false));
        let child_active = Arc::new(AtomicBool::new(false));

        let interrupted_clone = interrupted.clone();
        let child_active_clone = child_active.clone();

        ctrlc::set_handler(move || {
            let already_interrupted = interrupted_clone.swap(true, Ordering::SeqCst);

            if child_active_clone.load(Ordering::SeqCst) {
                return;
            }

            if !already_interrupted {
                eprintln!("\n🛑 Stopping... (press Ctrl+C again to force exit)");
            } else {
                eprintln!("\n💀 Force stopping...");
                std::process::exit(130);
            }
        })
        .map_err(|e| ProbeError::Config {
            message: format!("Failed to set signal handler: {}", e),
        })?;

        Ok(Self {
            interrupted,
            child_active,
        })
    }

    /// Guard without a signal handler; ctrlc allows one handler per process.
    pub fn new_for_test() -> Self {
        Self {
            interrupted: Arc::new(AtomicBool::new(false)),
            child_active: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    pub fn check_interrupted(&self) -> Result<()> {
        if self.is_interrupted() {
            return Err(ProbeError::Cancelled);
        }
        Ok(())
    }

    pub fn request_interrupt(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }

    /// Marks a foreground child as running until the returned token is dropped.
    pub fn child_running(&self) -> ChildToken {
        self.interrupted.store(false, Ordering::SeqCst);
        self.child_active.store(true, Ordering::SeqCst);
        ChildToken {
            child_active: self.child_active.clone(),
        }
    }

    pub fn is_child_active(&self) -> bool {
        self.child_active.load(Ordering::SeqCst)
    }
}

pub struct ChildToken {
    child_active: Arc<AtomicBool>,
}

impl Drop for ChildToken {
    fn drop(&mut self) {
        self.child_active.store(false, Ordering::SeqCst);
    }
}
