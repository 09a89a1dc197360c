//! Data models for requests, responses and collections.
//!
//! This module contains the value objects the engine consumes and produces.

pub mod collection;
pub mod request;
pub mod response;

pub use collection::{Collection, PostmanCollection};
pub use request::{Header, HttpMethod, Request, ValidatedParts};
pub use response::ResponseDto;
