pub mod human;

pub use human::{BoxedStore, HumanMode};
