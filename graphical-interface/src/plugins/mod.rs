mod collisions;
pub use collisions::Collisions;
