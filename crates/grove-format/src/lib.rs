//! Compact display formatting for counts and costs.
//!
//! Renders large magnitudes as short human-readable strings with metric-ish
//! suffixes (`1500000` becomes `"1.5M"`), for dense UI surfaces like badges
//! and summary tiles.

pub mod magnitude;

pub use magnitude::abbreviate;
