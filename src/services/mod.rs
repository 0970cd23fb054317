pub mod diagnostics;
pub mod health;
pub mod liveness;
pub mod prober;
