/// Address verification.
///
/// [`StandardAddressVerifier`] walks an address down the region hierarchy,
/// refining a [`FieldVerifier`] one level at a time, and applies the checks
/// of a [`ProblemMap`] to every field. The result is an
/// [`AddressProblems`][crate::AddressProblems] report; bad user input is
/// never an error. Errors are reserved for data contract violations and
/// for a verification worker that died before reporting.
pub mod field_verifier;
pub mod problem_map;
pub mod standard;

use thiserror::Error;

pub use field_verifier::FieldVerifier;
pub use problem_map::ProblemMap;
pub use standard::StandardAddressVerifier;


/// Region data that breaks the metadata contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifierError {
    /// A node lists more sub-region names than sub-region keys.
    #[error("node {id} lists {names} names for {keys} keys")]
    NameCountMismatch { id: String, names: usize, keys: usize },
}

/// Failure of a verification run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// The worker thread stopped without reporting a result.
    #[error("verification was interrupted")]
    Interrupted,

    #[error(transparent)]
    Data(#[from] VerifierError),
}
