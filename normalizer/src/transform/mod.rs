//! Transformation module.
//!
//! Wide sales export to long records, one stage per submodule:
//! - header: placeholder column drop, key flattening, `Order_ID` rename
//! - reshape: wide to long
//! - fields: `Segment` / `Ship_Mode` split
//! - filters: amount policies
//! - pipeline: orchestration and reporting

pub mod fields;
pub mod filters;
pub mod header;
pub mod pipeline;
pub mod reshape;

pub use fields::{split_key, split_records, KeyedRecord};
pub use filters::{apply_amount_policies, coerce_amount, AmountPolicy, FilterOutcome};
pub use header::{column_keys, flatten_header, flatten_table};
pub use pipeline::*;
pub use reshape::melt;
