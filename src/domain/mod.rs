//! Site-agnostic domain logic: records, criteria, normalization, ranking.

pub mod criteria;
pub mod price;
pub mod product;
pub mod ranking;

pub use criteria::{parse_override_args, FilterCriteria};
pub use price::{compute_discount, parse_count, parse_price};
pub use product::{Deal, ProductRecord};
pub use ranking::{deal_score, rank};
