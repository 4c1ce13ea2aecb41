//! Literal reading-list integration
//!
//! - GraphQL client with token session
//! - Reading state / book types

mod client;
mod graphql;
mod models;

pub use client::LiteralService;
pub use graphql::{GraphQLError, GraphQLResponse};
pub use models::{Author, Book, ReadingState, ReadingStatus};
