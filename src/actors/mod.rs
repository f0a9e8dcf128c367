mod account_actor;
mod session;

pub use account_actor::AccountActor;
pub use session::{AccountSession, AccountSummary};
