/// Guitar vocabulary and channel classification
pub mod classifier;
pub mod dictionary;

pub use classifier::is_guitar_channel;
pub use dictionary::{GuitarTermDictionary, TermCategory};
