//! Service layer module root.
//! Contains the verification orchestration, fallback simulation, output
//! normalization, and signing services.

pub mod normalizer;
pub mod response;
pub mod signing;
pub mod simulator;
pub mod verification;

pub use response::VerificationResponse;
pub use signing::{SignOutcome, SigningService};
pub use simulator::Simulator;
pub use verification::VerificationService;
