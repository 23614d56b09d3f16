//! SMS template matching.
//!
//! Human-authored templates such as `"Your OTP is {otp}. Valid till {time}."`
//! are compiled into case-insensitive matchers that locate the one-time code
//! inside arbitrary inbound SMS text, tolerating gateway line-wrapping and
//! punctuation noise.

pub mod compiler;
pub mod keyword;

pub use compiler::{normalize_single_line, OtpMatcher, TemplateSet};
pub use keyword::passes_keyword_filter;
