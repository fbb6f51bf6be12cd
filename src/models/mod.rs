//! Data models for the auth API.
//!
//! - `UserProfile`: the signed-in user's name and email
//! - `LoginForm`, `RegisterForm`, `UpdateForm`: transient input buffers
//! - Wire types for the login, register and update responses

pub mod forms;
pub mod user;

pub use forms::{Field, Form, LoginForm, RegisterForm, UpdateForm};
pub use user::{UpdateRequest, UserProfile};
