pub mod physics;
pub mod scoring;

pub use physics::PhysicsEngine;
pub use scoring::ScoringEngine;
