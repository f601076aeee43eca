mod health_check;
mod me;

pub use health_check::health_check;
pub use me::current_identity;
