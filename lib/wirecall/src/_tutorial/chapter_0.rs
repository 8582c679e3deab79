//! # Chapter 0: Getting Started
//!
//! Your first wirecall request in 5 minutes.
//!
//! ## What You'll Learn
//!
//! - Describe a request with `#[derive(HttpRequest)]`
//! - Decode the answer with `#[derive(ResponseTarget)]`
//! - Send it with [`do_request`](crate::do_request)
//!
//! ## Prerequisites
//!
//! Add to `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! wirecall = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! ## Your First Request
//!
//! ```ignore
//! use wirecall::prelude::*;
//!
//! // The request: every tagged field lands in an HTTP part
//! #[derive(HttpRequest)]
//! #[request(method = "GET", path = "/users/{id}")]
//! pub struct GetUser {
//!     #[request(path, required)]
//!     pub id: u64,
//! }
//!
//! // The response: decoded from JSON
//! #[derive(Debug, Default, Deserialize, ResponseTarget)]
//! pub struct User {
//!     pub id: u64,
//!     pub name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> wirecall::Result<()> {
//!     let mut user = User::default();
//!     wirecall::do_request("https://api.example.com", &GetUser { id: 42 }, Some(&mut user), None)
//!         .await?;
//!     println!("User: {user:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## What Happens
//!
//! ```text
//! GetUser { id: 42 }  →  generate()  →  GET https://api.example.com/users/42
//!                                                  ↓
//!          User  ←  execute()  ←  200 {"id":42,"name":"Alice"}
//! ```
//!
//! - [`generate`](crate::generate) joins the base URL and the path template,
//!   then writes every tagged field into the request
//! - [`execute`](crate::execute) sends it and fills the target
//!
//! ## Next Steps
//!
//! - [Chapter 1: Field Placements][super::chapter_1] - Every place a field can go
