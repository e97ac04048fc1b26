//! Schema melding engine
//!
//! Melding folds the schema tree observed in one witness into the tree
//! accumulated from earlier witnesses, producing the least general schema
//! that describes both.
//!
//! ## Features
//!
//! - **Primitive widening** - int32 and uint32 meld to int64, integers and floats to double
//! - **Struct unification** - Fields seen on only one side become optional
//! - **Map inference** - Structs with many, mostly-optional or numeric fields become maps
//! - **Conflict recording** - Incompatible shapes are kept side by side in a oneof
//! - **Nullability tracking** - Nullability is carried on the outermost node
//! - **Cookie capping** - Top-level accumulation retains a bounded number of cookies
//!
//! ## Example
//!
//! ```rust,ignore
//! use spec_meld::meld::{Melder, MeldOptions};
//! use spec_meld::models::{BaseType, Data};
//!
//! let melder = Melder::new(MeldOptions::default());
//!
//! let mut spec = Data::structure([("id", Data::of_type(BaseType::Int32))]);
//! melder.meld_data(&mut spec, Data::structure([("id", Data::of_type(BaseType::Uint32))]))?;
//! // spec is now {id: int64}
//! ```

mod config;
mod data;
mod error;
mod lattice;
mod lists;
mod map_inference;
mod one_of;
mod structs;
mod top_level;

pub use config::{MapInferenceThresholds, MeldOptions, MeldOptionsBuilder};
pub use error::MeldError;
pub use lattice::{is_joinable, join_base_types, join_primitives};
pub use map_inference::struct_should_be_map;
pub use top_level::MeldStats;

use crate::hash::ContentAddressedMap;
use crate::models::{Data, Struct};

/// Meld engine configured with [`MeldOptions`]
#[derive(Debug, Clone, Default)]
pub struct Melder {
    options: MeldOptions,
}

impl Melder {
    pub fn new(options: MeldOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MeldOptions {
        &self.options
    }

    /// Whether `s` should be represented as a map under this melder's thresholds
    pub fn struct_should_be_map(&self, s: &Struct) -> bool {
        self.options.map_inference.should_be_map(s)
    }
}

/// Meld `src` into `dst` with default options
pub fn meld_data(dst: &mut Data, src: Data) -> Result<(), MeldError> {
    Melder::default().meld_data(dst, src)
}

/// Meld a top-level argument or response map, returning the number of
/// discarded cookies
pub fn meld_top_level_data_map(
    dst: &mut ContentAddressedMap,
    src: ContentAddressedMap,
    options: &MeldOptions,
) -> Result<usize, MeldError> {
    Melder::new(options.clone()).meld_top_level_data_map(dst, src)
}
