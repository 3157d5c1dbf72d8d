pub mod admin;
pub mod amount;
pub mod config;
pub mod engine;
pub mod model;
pub mod store;
pub mod wallet;

pub use amount::Amount;
pub use engine::{Engine, EngineSnapshot, Session, SessionTiming, accrue};
pub use model::{Investment, InvestmentStatus, UserId, UserRecord};
pub use store::{RowStore, SupabaseStore};
