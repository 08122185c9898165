//! Reader for NAIF SPK kernels (DAF container, Chebyshev segments of type 2 and 3).

mod daf_header;
mod directory;
mod ephemeris_record;
mod jpl_ephem_header;
pub mod naif_data;
pub mod naif_ids;
pub mod naif_version;
mod summary_record;

pub use summary_record::SpkDataType;
