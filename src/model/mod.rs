//! Domain models and wire types.
//!
//! - `console` - websocket frames exchanged with the panel's console endpoint
//! - `panel` - panel HTTP API payloads and the resource snapshot built from them
//! - `status` - player roster and the combined status snapshot rendered by the poller
//! - `outcome` - structured results of console actions
//! - `whitelist_entry` - whitelist bookkeeping records

pub mod console;
pub mod outcome;
pub mod panel;
pub mod status;
pub mod whitelist_entry;
