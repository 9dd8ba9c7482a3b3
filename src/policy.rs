//! Privileged-mode policy
//!
//! A single process-wide flag, written by the authentication collaborator and
//! read (never owned) by every session. Sessions receive a handle at
//! construction; there is no hidden global. Each engine reads the flag once
//! per tick or intent and passes the plain `bool` down into its rules.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Shared handle to the privileged-mode flag
#[derive(Debug, Clone, Default)]
pub struct PrivilegedMode {
    flag: Arc<AtomicBool>,
}

impl PrivilegedMode {
    pub fn new(enabled: bool) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(enabled)),
        }
    }

    /// Current value. Staleness of one tick is harmless, so `Relaxed` suffices.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub fn set(&self, enabled: bool) {
        let was = self.flag.swap(enabled, Ordering::Relaxed);
        if was != enabled {
            log::info!("Privileged mode {}", if enabled { "enabled" } else { "disabled" });
        }
    }

    /// Enable the flag if `code` matches the configured access code.
    /// Returns whether the code was accepted; a wrong code changes nothing.
    pub fn unlock(&self, code: &str, expected: &str) -> bool {
        if !expected.is_empty() && code == expected {
            self.set(true);
            true
        } else {
            log::warn!("Rejected privileged-mode access code");
            false
        }
    }
}

/// A numeric rule with a normal and a privileged value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tuned<T> {
    pub normal: T,
    pub privileged: T,
}

impl<T: Copy> Tuned<T> {
    pub const fn new(normal: T, privileged: T) -> Self {
        Self { normal, privileged }
    }

    /// Same value under both policies
    pub const fn fixed(value: T) -> Self {
        Self {
            normal: value,
            privileged: value,
        }
    }

    #[inline]
    pub fn pick(&self, privileged: bool) -> T {
        if privileged { self.privileged } else { self.normal }
    }
}
