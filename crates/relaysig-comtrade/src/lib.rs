//! COMTRADE (IEEE C37.111) reader.
//!
//! Parses `.cfg` configuration files for revisions 1991, 1999 and 2013 and the
//! ASCII flavor of `.dat` sample files. Parsing is lenient: apart from a
//! missing file or a configuration shorter than two lines, malformed fields
//! are replaced with the defaults documented by the standard so that one bad
//! line never aborts a multi-hundred-channel file.
//!
//! # Example
//!
//! ```
//! use relaysig_comtrade::parse_config;
//!
//! let text = "SUB1,REL1,1999\n2,1A,1D\n1,IA,A,,A,1.0\n1,TRIP,,,0\n50\n1\n1000,200\n,\n,\nASCII\n1";
//! let config = parse_config(text).unwrap();
//! assert_eq!(config.num_analog, 1);
//! assert_eq!(config.channels[1].name, "TRIP");
//! ```

#![deny(unsafe_code)]

mod config;
mod data;
mod error;
mod pair;
mod record;

pub use config::{parse_config, read_config};
pub use data::{SampleRecord, parse_data_ascii, read_data_ascii};
pub use error::{ComtradeError, Result};
pub use pair::{FilePair, find_config_data_pair};
pub use record::ComtradeRecord;
