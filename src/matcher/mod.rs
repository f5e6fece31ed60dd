//! Classification rules
//!
//! - [`product`] decides whether a whole product is skipped
//! - [`instruction`] decides which instruction variant of a product is kept
//!
//! Both are pure: the same inputs always give the same [`MatchResult`](crate::models::MatchResult).

pub mod instruction;
pub mod product;

pub use instruction::match_instruction;
pub use product::{ProductMatcher, DEFAULT_EXCLUDED_THEMES};
