pub mod repository;
pub mod session;
pub mod value_object;
