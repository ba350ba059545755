pub mod generic;

pub use generic::GenericEnv;
