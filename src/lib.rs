//! Read Cadence Allegro net-list exports and format them as a per-net report.
//!
//! The core is two pure functions: [`parse_netlist`] turns the export text into
//! [`NetRecord`]s and [`format_report`] merges and renders them, one line per net.
//! Reading the export, remembering the last file and writing the report with
//! rotation of older reports live in [`output`] and [`config`].
//!
//! ```
//! use allegro_netlist::{format_report, parse_netlist};
//!
//! let input = "+24V C7 2 L1 3\nFU1 1 C19 2 Z6 1\nCLK DD68 40 DD76 42\n";
//! let netlist = parse_netlist(input).unwrap();
//! assert_eq!(
//!     format_report(&netlist.records, false),
//!     "+24V C7 2 L1 3 FU1 1 C19 2 Z6 1\nCLK DD68 40 DD76 42\n"
//! );
//! ```

use std::fmt::Display;

use log::debug;

mod aggregate;
pub mod config;
mod error;
pub mod output;
pub mod reader;
mod report;

pub use aggregate::{FormattedLine, NetMap};
pub use error::{Error, ParseError};
pub use reader::{InputDialect, Records};
pub use report::Report;

/// Reference designator of a placed component, e.g. `C7`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefDes<'a>(pub &'a str);

/// Pin number on a component, e.g. `2` or `G3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PinNum<'a>(pub &'a str);

impl<'a> Display for RefDes<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl<'a> Display for PinNum<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// A component pin attached to a net
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection<'a> {
    pub ref_des: RefDes<'a>,
    pub pin: PinNum<'a>,
    /// Only known for pstxnet input, never part of the report line
    pub pin_name: Option<&'a str>,
}

impl<'a> Connection<'a> {
    pub fn new(ref_des: &'a str, pin: &'a str) -> Self {
        Self {
            ref_des: RefDes(ref_des),
            pin: PinNum(pin),
            pin_name: None,
        }
    }
}

/// A net and its connections in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetRecord<'a> {
    pub net_name: &'a str,
    pub connections: Vec<Connection<'a>>,
}

impl<'a> NetRecord<'a> {
    pub fn new(net_name: &'a str) -> Self {
        Self {
            net_name,
            connections: Vec::new(),
        }
    }
}

/// Writer version and time stamp from the pstxnet header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportInfo<'a> {
    pub version: &'a str,
    pub date: &'a str,
    pub time: &'a str,
}

impl<'a> Display for ExportInfo<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Netlist {} {} (version: {})",
            self.date, self.time, self.version
        )
    }
}

/// The parsed export, records not yet merged
#[derive(Debug, Clone)]
pub struct NetList<'a> {
    pub info: Option<ExportInfo<'a>>,
    pub records: Vec<NetRecord<'a>>,
}

impl<'a> NetList<'a> {
    /// Merge the records by net name
    pub fn nets(&self) -> NetMap<'a> {
        self.records.iter().cloned().collect()
    }
}

/// Parse a whole export.
///
/// Fails on the first malformed line, and with [`ParseError::EmptyInput`] if the
/// text holds no net at all.
pub fn parse_netlist(input: &str) -> Result<NetList<'_>, ParseError> {
    let mut reader = Records::new(input);
    let records = reader.by_ref().collect::<Result<Vec<_>, _>>()?;
    if records.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    debug!(
        "read {} net records from {:?} input",
        records.len(),
        reader.dialect()
    );
    Ok(NetList {
        info: reader.info(),
        records,
    })
}

/// Merge records by first appearance of the net name and render one line per net.
///
/// With `sort` the nets are listed alphabetically instead.
pub fn format_report(records: &[NetRecord<'_>], sort: bool) -> String {
    let nets: NetMap = records.iter().cloned().collect();
    nets.to_body(sort)
}
