pub mod aggregate;
pub mod category;
pub mod intent;
pub mod ranking;
pub mod region;
pub mod validity;

pub use crate::domain::model::{Aggregation, Intent, IntentKind, Record, Region};
pub use crate::domain::ports::{JobProvider, PolicyProvider, PropertyProvider};
pub use crate::utils::error::Result;
