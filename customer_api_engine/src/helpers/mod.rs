mod ids;
mod json_merge;
pub mod sample_data;

pub use ids::{new_customer_id, new_object_id};
pub use json_merge::shallow_merge;
