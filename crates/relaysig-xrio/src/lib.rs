//! XRIO relay-export reader.
//!
//! XRIO files are XML exports of relay settings with no fixed schema: block
//! layout, tag names and namespaces differ between vendors and tool versions.
//! [`XrioExtractor`] parses the document once into an owned element tree and
//! runs a fixed sequence of independent stages over it (namespaces, relay
//! identity, analog blocks, binary blocks, disturbance report, raw blocks).
//! Each stage degrades to an empty result instead of failing the extraction.
//!
//! # Example
//!
//! ```
//! use relaysig_xrio::parse_xrio;
//!
//! let xml = r#"<XRio>
//!   <Block><Name>A1RADR: 1</Name>
//!     <Block><Name>General</Name>
//!       <Parameter><Name>NAME1</Name><Value>IL1</Value></Parameter>
//!       <Parameter><Name>NomValue01</Name><Value>400</Value></Parameter>
//!     </Block>
//!   </Block>
//! </XRio>"#;
//! let data = parse_xrio(xml).unwrap();
//! assert_eq!(data.analog_signals[0].name, "IL1");
//! assert_eq!(data.analog_signals[0].primary, 400.0);
//! ```

#![deny(unsafe_code)]

mod access;
mod blocks;
mod context;
mod disturbance;
mod error;
mod extractor;
mod identity;
mod raw;
pub mod tree;

pub use disturbance::MAX_REPORT_CHANNELS;
pub use error::{Result, XrioError};
pub use extractor::{XrioExtractor, parse_xrio, read_xrio};
pub use tree::{XmlDocument, XmlNode};
