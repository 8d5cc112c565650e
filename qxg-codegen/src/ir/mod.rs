//! The intermediate representation: a forest of typed nodes built once by
//! [`crate::builder`] and consumed twice, by [`crate::emit::declarations`]
//! and [`crate::emit::reader`]. References between nodes are always by
//! name — string keys into [`Schema::types`] — so the IR never needs to be
//! eagerly resolved and forward declarations fall out naturally.

mod types;

pub use types::*;
