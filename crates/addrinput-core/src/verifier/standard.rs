/// The standard top-down address verifier.
use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};

use crate::address::AddressData;
use crate::data_source::DataSource;
use crate::field::{AddressField, HIERARCHY};
use crate::lookup_key::ScriptType;
use crate::problems::{AddressProblemType, AddressProblems};

use super::{FieldVerifier, ProblemMap, VerifierError, VerifyError};

/// Fields checked after the hierarchy, against the deepest verifier reached.
const SIBLINGS: [AddressField; 5] = [
    AddressField::PostalCode,
    AddressField::StreetAddress,
    AddressField::SortingCode,
    AddressField::Organization,
    AddressField::Recipient,
];

/// Verifies addresses against region data.
///
/// Each run happens on its own worker thread. [`verify`][Self::verify]
/// blocks until the worker reports; [`verify_async`][Self::verify_async]
/// hands the result to a listener instead.
#[derive(Debug, Clone)]
pub struct StandardAddressVerifier {
    root: Arc<FieldVerifier>,
    problem_map: Arc<ProblemMap>,
}

impl StandardAddressVerifier {
    /// Creates a verifier running the standard checks.
    pub fn new(data_source: Arc<dyn DataSource>) -> Self {
        Self::with_problem_map(data_source, ProblemMap::standard())
    }

    pub fn with_problem_map(data_source: Arc<dyn DataSource>, problem_map: ProblemMap) -> Self {
        Self::from_root(FieldVerifier::new(data_source), problem_map)
    }

    /// Creates a verifier from a prepared root, e.g. one built with
    /// [`FieldVerifier::with_region_data_constants`].
    pub fn from_root(root: FieldVerifier, problem_map: ProblemMap) -> Self {
        Self {
            root: Arc::new(root),
            problem_map: Arc::new(problem_map),
        }
    }

    pub fn problem_map(&self) -> &ProblemMap {
        &self.problem_map
    }

    /// Verifies `address`, blocking until the worker completes.
    ///
    /// # Errors
    ///
    /// [`VerifyError::Interrupted`] if the worker died before reporting and
    /// [`VerifyError::Data`] if the region data is inconsistent.
    pub fn verify(&self, address: &AddressData) -> Result<AddressProblems, VerifyError> {
        let (tx, rx) = mpsc::channel();
        let handle = self.verify_async(address.clone(), move |result| {
            // The receiver only goes away if the caller stopped waiting.
            if tx.send(result).is_err() {
                tracing::debug!("verification result dropped");
            }
        });
        let result = rx.recv().map_err(|_| VerifyError::Interrupted)?;
        if handle.join().is_err() {
            tracing::warn!("verification worker panicked after reporting");
        }
        result
    }

    /// Verifies `address` on a worker thread and passes the result to
    /// `listener` on that thread.
    pub fn verify_async<L>(&self, address: AddressData, listener: L) -> JoinHandle<()>
    where
        L: FnOnce(Result<AddressProblems, VerifyError>) + Send + 'static,
    {
        let root = Arc::clone(&self.root);
        let problem_map = Arc::clone(&self.problem_map);
        thread::spawn(move || {
            tracing::debug!(country = ?address.postal_country(), "verification started");
            let result = walk(&root, &problem_map, &address).map_err(VerifyError::from);
            tracing::debug!(ok = result.is_ok(), "verification finished");
            listener(result);
        })
    }

    /// Verifies the whole address and returns the problem found in `field`,
    /// if any.
    ///
    /// # Errors
    ///
    /// As [`verify`][Self::verify].
    pub fn verify_field(
        &self,
        address: &AddressData,
        field: AddressField,
    ) -> Result<Option<AddressProblemType>, VerifyError> {
        self.verify(address).map(|problems| problems.problem(field))
    }
}

/// Runs the checks top-down.
///
/// A hierarchy level is refined only when it is selected and nothing has
/// failed yet; the first level that is not refined ends the hierarchy walk.
fn walk(
    root: &FieldVerifier,
    problem_map: &ProblemMap,
    address: &AddressData,
) -> Result<AddressProblems, VerifierError> {
    let script = address.language_code().map(ScriptType::for_language);
    let mut problems = AddressProblems::new();
    let mut refined: Option<FieldVerifier> = None;

    for field in HIERARCHY {
        let verifier = refined.as_ref().unwrap_or(root);
        let value = address.field_value(field);
        check_field(verifier, problem_map, script, field, value, &mut problems);
        if !problem_map.is_selected(field) || !problems.is_empty() {
            break;
        }
        let sublevel = match (value, address.language_code()) {
            (Some(country), Some(language)) if field == AddressField::Country => {
                format!("{country}--{language}")
            }
            (value, _) => value.unwrap_or_default().to_owned(),
        };
        refined = Some(verifier.refine(&sublevel)?);
    }

    let verifier = refined.as_ref().unwrap_or(root);
    let street = address.address_lines().join("\n");
    for field in SIBLINGS {
        let value = match field {
            AddressField::StreetAddress => Some(street.as_str()),
            AddressField::Country
            | AddressField::AdminArea
            | AddressField::Locality
            | AddressField::DependentLocality
            | AddressField::PostalCode
            | AddressField::SortingCode
            | AddressField::Organization
            | AddressField::Recipient
            | AddressField::AddressLine1
            | AddressField::AddressLine2 => address.field_value(field),
        };
        check_field(verifier, problem_map, script, field, value, &mut problems);
    }
    Ok(problems)
}

/// Applies the checks selected for `field` until one fails.
fn check_field(
    verifier: &FieldVerifier,
    problem_map: &ProblemMap,
    script: Option<ScriptType>,
    field: AddressField,
    value: Option<&str>,
    problems: &mut AddressProblems,
) {
    for problem in problem_map.checks_for(field) {
        if !verifier.check(script, *problem, field, value, problems) {
            break;
        }
    }
}
