pub mod dependencies;
pub mod inspect;
