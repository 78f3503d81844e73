mod client;
mod due_date;
mod models;

pub use client::*;
pub use due_date::*;
pub use models::*;
