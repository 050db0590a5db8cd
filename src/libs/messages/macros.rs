//! Macros for user messages and logging.
//!
//! Every macro takes a [`Message`](crate::libs::messages::Message) (or
//! anything implementing `Display`) and routes it either to `tracing` or to
//! the console:
//!
//! ```text
//! msg_info!(..) ──▶ TASKSCOPE_DEBUG or RUST_LOG set? ──▶ tracing::info!
//!                                                   └──▶ println!
//! ```
//!
//! Debug detection is evaluated once and cached. `msg_debug!` is silent
//! unless debug mode is on.
//!
//! ## Usage
//!
//! ```rust
//! use taskscope::{msg_debug, msg_info, msg_success};
//! use taskscope::libs::messages::Message;
//!
//! msg_success!(Message::TaskCreated(1));
//! msg_info!(Message::TasksVisibleCount(3));
//! msg_debug!(Message::UnknownDueFilter("tomorrow".to_string()));
//! ```
//!
//! ### Error Handling
//! ```rust
//! use taskscope::msg_error_anyhow;
//! use taskscope::libs::messages::Message;
//!
//! let error = msg_error_anyhow!(Message::TaskNotFound(42));
//! assert!(error.to_string().contains("Task #42 not found"));
//! ```

use std::sync::OnceLock;

static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| ["TASKSCOPE_DEBUG", "RUST_LOG"].iter().any(|name| std::env::var_os(name).is_some()))
}

#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("{}", $msg);
        } else {
            println!("{}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n{}\n", $msg);
        } else {
            println!("\n{}\n", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("✅ {}", $msg);
        } else {
            println!("✅ {}", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("❌ {}", $msg);
        } else {
            eprintln!("❌ {}", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("ℹ️ {}", $msg);
        } else {
            println!("ℹ️ {}", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("❌ {}", $msg)
    };
}

#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("❌ {}", $msg)
    };
}
