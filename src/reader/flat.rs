use std::iter::Enumerate;
use std::str::Lines;

use crate::{error::ParseError, report::EMPTY_MARKER, Connection, NetRecord};

use super::{lexer::TokenIter, text};

/// Classification of one physical line
#[derive(Debug, PartialEq, Eq)]
pub(super) enum RawLine<'a> {
    NetHeader(&'a str, Vec<Connection<'a>>),
    ContinuationPins(Vec<Connection<'a>>),
    Noise,
}

pub(super) struct FlatReader<'a> {
    lines: Enumerate<Lines<'a>>,
    open: Option<NetRecord<'a>>,
    done: bool,
}

impl<'a> FlatReader<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().enumerate(),
            open: None,
            done: false,
        }
    }

    fn fail(&mut self, err: ParseError) -> Option<Result<NetRecord<'a>, ParseError>> {
        self.done = true;
        self.open = None;
        Some(Err(err))
    }
}

impl<'a> Iterator for FlatReader<'a> {
    type Item = Result<NetRecord<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let Some((index, line)) = self.lines.next() else {
                self.done = true;
                return self.open.take().map(Ok);
            };
            let line_no = index + 1;
            match classify(line, line_no) {
                Err(err) => return self.fail(err),
                Ok(RawLine::Noise) => continue,
                Ok(RawLine::NetHeader(net_name, connections)) => {
                    let record = NetRecord {
                        net_name,
                        connections,
                    };
                    if let Some(closed) = self.open.replace(record) {
                        return Some(Ok(closed));
                    }
                }
                Ok(RawLine::ContinuationPins(connections)) => match self.open.as_mut() {
                    Some(record) => record.connections.extend(connections),
                    None => {
                        return self.fail(ParseError::malformed(
                            line_no,
                            "pin pairs before any net header",
                        ))
                    }
                },
            }
        }
    }
}

/// Blank lines, comments and the rules and frame lines of a rendered report.
///
/// A comment is `#` alone or followed by whitespace, `#RESET` is a net name.
fn is_noise(line: &str) -> bool {
    let line = line.trim();
    line.is_empty()
        || line
            .strip_prefix('#')
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        || line.starts_with('|')
        || line == EMPTY_MARKER
        || line.chars().all(|c| matches!(c, '+' | '-' | '=' | '*'))
}

pub(super) fn classify(line: &str, line_no: usize) -> Result<RawLine<'_>, ParseError> {
    if is_noise(line) {
        return Ok(RawLine::Noise);
    }

    let mut words = Vec::new();
    for token in TokenIter::new(line) {
        if !token.kind.is_text() {
            return Err(ParseError::malformed(
                line_no,
                format!("unexpected '{}'", text(line, &token)),
            ));
        }
        words.push(text(line, &token));
    }

    let indented = line.starts_with([' ', '\t']);
    if indented || words.len() % 2 == 0 {
        if words.len() % 2 != 0 {
            return Err(ParseError::malformed(
                line_no,
                format!("pin '{}' has no component", words[words.len() - 1]),
            ));
        }
        return Ok(RawLine::ContinuationPins(pairs(&words)));
    }

    let net_name = words[0];
    if net_name.is_empty() {
        return Err(ParseError::malformed(line_no, "empty net name"));
    }
    Ok(RawLine::NetHeader(net_name, pairs(&words[1..])))
}

fn pairs<'a>(words: &[&'a str]) -> Vec<Connection<'a>> {
    words
        .chunks_exact(2)
        .map(|pair| Connection::new(pair[0], pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("")]
    #[case("   \t")]
    #[case("# comment R1 1")]
    #[case("+-------------------------------+")]
    #[case("| Cadence Netlist file info:     |")]
    #[case("=====")]
    #[case("#")]
    #[case("#\tR1 1")]
    #[case("- (Empty)")]
    fn noise_lines(#[case] line: &str) {
        assert_eq!(classify(line, 1), Ok(RawLine::Noise));
    }

    #[test]
    fn header_with_pairs() {
        let line = classify("+24V C7 2 L1 3", 1).unwrap();
        assert_eq!(
            line,
            RawLine::NetHeader(
                "+24V",
                vec![Connection::new("C7", "2"), Connection::new("L1", "3")]
            )
        );
    }

    #[rstest]
    #[case("#RESET U1 12", "#RESET")]
    #[case("-12V C3 1", "-12V")]
    fn hash_and_dash_names_are_headers(#[case] line: &str, #[case] name: &str) {
        let RawLine::NetHeader(net_name, pins) = classify(line, 1).unwrap() else {
            panic!("not a header");
        };
        assert_eq!(net_name, name);
        assert_eq!(pins.len(), 1);
    }

    #[test]
    fn hash_net_keeps_its_continuation() {
        let input = "A R1 1\n#RESET U1 12\nR5 2\n";
        let records: Vec<_> = FlatReader::new(input)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].connections, vec![Connection::new("R1", "1")]);
        assert_eq!(records[1].net_name, "#RESET");
        assert_eq!(
            records[1].connections,
            vec![Connection::new("U1", "12"), Connection::new("R5", "2")]
        );
    }

    #[test]
    fn header_without_pairs() {
        assert_eq!(classify("GND", 1), Ok(RawLine::NetHeader("GND", vec![])));
    }

    #[test]
    fn quoted_net_name_keeps_whitespace() {
        assert_eq!(
            classify("'MY NET' R1 1", 1),
            Ok(RawLine::NetHeader("MY NET", vec![Connection::new("R1", "1")]))
        );
    }

    #[rstest]
    #[case("FU1 1 C19 2 Z6 1", 3)]
    #[case("  X1 29", 1)]
    #[case("\tU1 A1 U2 B2", 2)]
    fn continuation_lines(#[case] line: &str, #[case] count: usize) {
        let RawLine::ContinuationPins(pins) = classify(line, 1).unwrap() else {
            panic!("not a continuation");
        };
        assert_eq!(pins.len(), count);
    }

    #[rstest]
    #[case("  R1 1 R2")]
    #[case("NET R1 'open")]
    #[case("'' R1 1")]
    fn malformed_lines(#[case] line: &str) {
        assert!(matches!(
            classify(line, 7),
            Err(ParseError::MalformedInput { line: 7, .. })
        ));
    }

    #[test]
    fn noise_does_not_close_record() {
        let input = "A R1 1\n\n# split\nR2 2\n";
        let records: Vec<_> = FlatReader::new(input)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].connections,
            vec![Connection::new("R1", "1"), Connection::new("R2", "2")]
        );
    }
}
