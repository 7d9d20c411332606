pub mod email;
pub mod role;
