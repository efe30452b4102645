//! Query options, SQL clause fragments, and the free-text search filter.

pub mod composer;
pub mod options;
pub mod search;

pub use composer::{escape_query, having, limit, order_by};
pub use options::{PageTurn, QueryOptions, RequestParams};
pub use search::SearchExpression;
