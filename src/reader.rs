//! Record Reader: turns export text into a lazy sequence of closed [`NetRecord`]s.
//!
//! Two dialects are understood. The Allegro `pstxnet.dat` export, recognised by a
//! leading `FILE_TYPE` or `NET_NAME` line, and a flat line grammar where a net
//! header (`name comp pin comp pin ...`) may be followed by continuation lines
//! holding only `comp pin` pairs. Either way a record is yielded once the next
//! header or the end of input closes it.

use crate::{error::ParseError, ExportInfo, NetRecord};

mod flat;
mod lexer;
mod pstxnet;

use flat::FlatReader;
use lexer::Token;
use pstxnet::PstxnetReader;

/// Input grammar picked from the first non-blank line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDialect {
    Flat,
    Pstxnet,
}

impl InputDialect {
    pub fn detect(input: &str) -> Self {
        let first = input.lines().map(str::trim).find(|line| !line.is_empty());
        match first {
            Some(line) if line.starts_with("FILE_TYPE") || line.starts_with("NET_NAME") => {
                InputDialect::Pstxnet
            }
            _ => InputDialect::Flat,
        }
    }
}

enum Inner<'a> {
    Flat(FlatReader<'a>),
    Pstxnet(PstxnetReader<'a>),
}

/// Lazy iterator over the net records of one input.
///
/// Stops after the first error.
pub struct Records<'a> {
    inner: Inner<'a>,
}

impl<'a> Records<'a> {
    pub fn new(input: &'a str) -> Self {
        let inner = match InputDialect::detect(input) {
            InputDialect::Flat => Inner::Flat(FlatReader::new(input)),
            InputDialect::Pstxnet => Inner::Pstxnet(PstxnetReader::new(input)),
        };
        Self { inner }
    }

    pub fn dialect(&self) -> InputDialect {
        match self.inner {
            Inner::Flat(_) => InputDialect::Flat,
            Inner::Pstxnet(_) => InputDialect::Pstxnet,
        }
    }

    /// Header info of a pstxnet export, available once its header line was read
    pub fn info(&self) -> Option<ExportInfo<'a>> {
        match &self.inner {
            Inner::Flat(_) => None,
            Inner::Pstxnet(reader) => reader.info(),
        }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<NetRecord<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Flat(reader) => reader.next(),
            Inner::Pstxnet(reader) => reader.next(),
        }
    }
}

fn text<'a>(line: &'a str, token: &Token) -> &'a str {
    &line[token.span.clone()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("FILE_TYPE = EXPANDEDNETLIST;\nNET_NAME\n", InputDialect::Pstxnet)]
    #[case("\n\nNET_NAME\n'GND'\n", InputDialect::Pstxnet)]
    #[case("GND R1 1\n", InputDialect::Flat)]
    #[case("", InputDialect::Flat)]
    fn detects_dialect(#[case] input: &str, #[case] expected: InputDialect) {
        assert_eq!(InputDialect::detect(input), expected);
        assert_eq!(Records::new(input).dialect(), expected);
    }

    #[test]
    fn records_are_yielded_when_closed() {
        let input = "A R1 1\nR2 2\nB R3 3\n";
        let mut records = Records::new(input);

        let a = records.next().unwrap().unwrap();
        assert_eq!(a.net_name, "A");
        assert_eq!(a.connections.len(), 2);

        let b = records.next().unwrap().unwrap();
        assert_eq!(b.net_name, "B");
        assert!(records.next().is_none());
        assert!(records.next().is_none());
    }

    #[test]
    fn stops_after_error() {
        let mut records = Records::new("R1 1\nA R2 2\n");
        assert!(records.next().unwrap().is_err());
        assert!(records.next().is_none());
    }

    #[test]
    fn repeated_header_is_a_separate_record() {
        let records: Vec<_> = Records::new("A R1 1\nB R2 2\nA R3 3\n")
            .collect::<Result<_, _>>()
            .unwrap();
        let names: Vec<_> = records.iter().map(|r| r.net_name).collect();
        assert_eq!(names, ["A", "B", "A"]);
    }
}
