pub mod onboard;
pub mod solve;
pub mod status;
