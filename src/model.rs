//! Client configuration domain: identifiers, grant types, secrets, templates, and the aggregate.

pub mod client;
pub mod grant;
pub mod id;
pub mod secret;
pub mod template;

pub use client::*;
pub use grant::*;
pub use id::*;
pub use secret::*;
pub use template::*;
