//! Recurring window matching
//!
//! A window set is an ordered list of start/end recurrence rule pairs,
//! OR-ed together. For an evaluation instant `now`, each pair resolves to
//! the half-open interval `[last_start, next_end)`:
//!
//! - `last_start`: latest start-rule match at or before `now`
//! - `next_end`: first end-rule match strictly after `last_start`
//!
//! The end search is anchored at `last_start`, not at `now`, so the interval
//! always describes the window opened by the most recent start.

pub mod matcher;

pub use matcher::WindowSetMatcher;
