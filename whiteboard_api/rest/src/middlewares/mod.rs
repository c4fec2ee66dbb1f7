//! Layers are applied innermost first, so `request_id` wraps everything else.

pub mod cors;
pub mod panic_handler;
pub mod request_id;
pub mod trace;
