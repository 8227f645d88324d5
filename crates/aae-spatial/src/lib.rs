//! `aae-spatial` — approximate grid-bucket spatial indexing.
//!
//! # Crate layout
//!
//! | Module   | Contents                              |
//! |----------|----------------------------------------|
//! | [`grid`] | `GridIndex<T>` — the sole exported type |

pub mod grid;

pub use grid::GridIndex;
