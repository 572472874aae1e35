pub mod client;
pub mod error;
pub mod tone;
pub mod types;

pub use client::{GenerationClient, ReplyGenerator};
pub use error::{ApiError, ApiResult};
pub use tone::{Tone, ToneSelection};
pub use types::*;
