//! # Tutorial: Tag-Driven HTTP Calls with wirecall
//!
//! Describe a request as a struct, tag its fields, send it.
//!
//! ## Chapters
//!
//! 1. [Getting Started][chapter_0] - Your first request record
//! 2. [Field Placements][chapter_1] - Path, query, headers, cookies, bodies
//! 3. [Responses & Transport][chapter_2] - Result targets, errors, HTTP/2, logging
//!
//! Ready? Start with [Chapter 0: Getting Started][chapter_0].

pub mod chapter_0;
pub mod chapter_1;
pub mod chapter_2;
