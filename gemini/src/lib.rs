//! # Stayplan Gemini
//!
//! Gemini API client used as the planning oracle for itinerary generation.
//!
//! The client is a thin transport: it submits a rendered prompt to the
//! `generateContent` endpoint and returns the model's raw text. Plan
//! parsing and validation happen in `stayplan-core`, because the model's
//! output is untrusted no matter who parses it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod error;
mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use types::{Candidate, Content, GenerateRequest, GenerateResponse, GenerationConfig, Part};
