//! verso-client - Client library for the verso REST API.
//!
//! # Example
//!
//! ```ignore
//! use verso_client::UsersClient;
//! use verso_core::{NewUser, UserPatch};
//!
//! let client = UsersClient::new("http://localhost:8080");
//!
//! let user = client.create(&NewUser::new("Ada", "ada@example.com")).await?;
//! client.update(&user.user_id, &UserPatch::default().age(36)).await?;
//!
//! let history = client.query_history(&user.user_id).await?;
//! ```

mod client;

pub use client::{HealthStatus, UsersClient};
pub use verso_core::{NewUser, UserPatch, UserRecord};
