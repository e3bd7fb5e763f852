//! Normalize numbered course folders (`02_intro-to-topic` -> `2. Intro To Topic`),
//! apply the `Course / Module / Section` naming to a vault, and turn lecture
//! transcripts into markdown notes.

pub mod client;
pub mod config;
pub mod error;
pub mod notes;
pub mod rename;
pub mod title;
pub mod utils;

pub use error::{NotesError, Result};
