pub mod config;
pub mod directory;
pub mod session_gate;
pub mod sign_in;
pub mod sign_out;
pub mod token;

pub use session_gate::SessionGate;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
