//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types, functions, and macros
//! for easy glob importing:
//!
//! ```ignore
//! use wirecall::prelude::*;
//! ```

pub use crate::{
    ApiClient, BasicResponse, ClientConfig, Error, ErrorResponse, HttpRequest, HyperClient,
    Method, Record, Request, RequestLog, ResponseTarget, Result, RouteInfo, StatusCode,
    do_request, execute, generate, header,
};
pub use serde::{Deserialize, Serialize};
