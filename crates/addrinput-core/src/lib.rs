#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod address;
pub mod data_key;
pub mod data_source;
pub mod field;
pub mod form_controller;
pub mod form_options;
pub mod format;
pub mod jso;
pub mod lookup_key;
pub mod node_data;
pub mod problems;
pub mod region_constants;
pub mod util;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use address::{AddressData, AddressDataBuilder};
pub use data_key::AddressDataKey;
pub use data_source::{
    BootstrapDataSource, CachingConfig, CachingDataSource, DEFAULT_TIMEOUT, DataSource,
    DirectoryFetcher, FetchError, Fetcher, MapDataSource,
};
pub use field::{ALL_FIELDS, AddressField, HIERARCHY, WidthType};
pub use form_controller::{FormController, FormError, LoadEvent, RegionData};
pub use form_options::{FormOptions, FormOptionsBuilder, FormOptionsError};
pub use format::{FormatInterpreter, FormatToken};
pub use jso::{JsoError, JsoMap, JsoValue};
pub use lookup_key::{KeyType, LookupKey, LookupKeyBuilder, LookupKeyError, ScriptType};
pub use node_data::NodeData;
pub use problems::{AddressProblemType, AddressProblems};
pub use verifier::{
    FieldVerifier, ProblemMap, StandardAddressVerifier, VerifierError, VerifyError,
};

/// Returns the current version of the addrinput-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
