//! # Events Module
//!
//! Event-driven progress reporting.
//!
//! ## Design
//! The core library emits events through channels, so the CLI (or any other
//! front end) can draw progress without the pipeline knowing about it.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Split(SplitEvent::Progress(p)) = event {
//!             println!("Split {} spreads", p.spreads_split);
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
