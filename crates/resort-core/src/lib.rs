//! # resort-core
//!
//! The reactive substrate the reorder engine runs on. There are four pieces:
//!
//! - `Signal<T>` — observable, reactive value with keyed subscriptions.
//! - `animation` — the per-thread animation clock plus `AnimatedValue<T>`,
//!   a value that transitions smoothly toward its target.
//! - `EventQueue<T>` — the ordered, non-blocking channel from latency-critical
//!   callbacks to the coarser control turn that applies side effects.
//! - `Dispose` — a run-once cleanup guard for subscription teardown.
//!
//! ## Signals
//!
//! `Signal<T>` is a cloneable handle to a piece of state:
//!
//! ```rust
//! use resort_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! Subscribers run after a mutation completes, so a read scheduled off a
//! publish always observes the post-mutation value.
//!
//! ## The clock
//!
//! All animation timing goes through [`animation::now`]. Hosts keep the
//! default `SystemClock`; tests install a [`animation::TestClock`] and drive
//! it by hand, which makes every time-dependent test deterministic.

pub mod animation;
pub mod effects;
pub mod queue;
pub mod signal;


pub use animation::{AnimatedValue, AnimationSpec, Clock, Easing, Interpolate, now, set_clock};
pub use effects::Dispose;
pub use queue::EventQueue;
pub use signal::{Signal, SubKey, signal};
