pub mod constants;
pub mod direction;
pub mod driver;
pub mod grid;
pub mod match_result;
pub mod snake;
pub mod snapshot;
pub mod state;
pub mod states;
pub mod systems;
