pub mod contract;
pub mod game;
pub mod recommendation;
pub mod session;
