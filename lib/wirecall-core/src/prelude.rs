//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use wirecall_core::prelude::*;
//! ```

pub use crate::{
    BasicResponse, Error, ErrorResponse, HttpClient, HttpClientStreaming, HttpRequest, Method,
    Record, Request, RequestLog, ResponseTarget, Result, RouteInfo, ToWireValue, generate,
};
