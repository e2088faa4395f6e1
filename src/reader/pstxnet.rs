use std::iter::Enumerate;
use std::str::Lines;

use log::warn;

use crate::{error::ParseError, Connection, ExportInfo, NetRecord};

use super::{
    lexer::{Token, TokenIter, TokenKind},
    text,
};

/// Line holding `{ Using PSTWRITER <version> <date> at <time> }`
const HEADER_INFO_LINE: usize = 2;
/// The pin name follows its `NODE_NAME` line at this distance
const PIN_NAME_OFFSET: u8 = 2;

/// State machine over the `NET_NAME` / `NODE_NAME` records of a pstxnet export
pub(super) struct PstxnetReader<'a> {
    lines: Enumerate<Lines<'a>>,
    open: Option<NetRecord<'a>>,
    /// Line number of a `NET_NAME` still waiting for its name line
    expecting_name: Option<usize>,
    /// Lines left until the pin name of the last node
    pin_name_in: Option<u8>,
    info: Option<ExportInfo<'a>>,
    done: bool,
}

impl<'a> PstxnetReader<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().enumerate(),
            open: None,
            expecting_name: None,
            pin_name_in: None,
            info: None,
            done: false,
        }
    }

    pub(super) fn info(&self) -> Option<ExportInfo<'a>> {
        self.info
    }

    fn fail(&mut self, err: ParseError) -> Option<Result<NetRecord<'a>, ParseError>> {
        self.done = true;
        self.open = None;
        Some(Err(err))
    }

    fn finish(&mut self) -> Option<Result<NetRecord<'a>, ParseError>> {
        if let Some(line_no) = self.expecting_name.take() {
            return self.fail(ParseError::malformed(line_no, "NET_NAME without a net name"));
        }
        self.done = true;
        if self.info.is_none() {
            warn!("Could not read version/date/time from header, input may not be a pstxnet export");
        }
        self.open.take().map(Ok)
    }

    fn open_net(&mut self, line: &'a str, line_no: usize) -> Result<(), ParseError> {
        let name = TokenIter::new(line)
            .next()
            .filter(|token| matches!(token.kind, TokenKind::Quoted | TokenKind::Word))
            .map(|token| text(line, &token))
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ParseError::malformed(line_no, "expected net name after NET_NAME"))?;
        self.open = Some(NetRecord::new(name));
        Ok(())
    }

    fn add_node(
        &mut self,
        line: &'a str,
        line_no: usize,
        tokens: TokenIter<'a>,
    ) -> Result<(), ParseError> {
        let Some(record) = self.open.as_mut() else {
            return Err(ParseError::malformed(line_no, "NODE_NAME before any NET_NAME"));
        };
        let mut words = tokens
            .filter(|token| token.kind.is_text())
            .map(|token| text(line, &token));
        let (Some(ref_des), Some(pin)) = (words.next(), words.next()) else {
            return Err(ParseError::malformed(
                line_no,
                "NODE_NAME needs a component and a pin",
            ));
        };
        record.connections.push(Connection::new(ref_des, pin));
        self.pin_name_in = Some(PIN_NAME_OFFSET);
        Ok(())
    }

    fn take_pin_name(&mut self, line: &'a str) {
        let Some(left) = self.pin_name_in else {
            return;
        };
        if left > 1 {
            self.pin_name_in = Some(left - 1);
            return;
        }
        self.pin_name_in = None;
        let name = TokenIter::new(line)
            .find(|token| token.kind == TokenKind::Quoted)
            .map(|token| text(line, &token));
        if let Some(connection) = self
            .open
            .as_mut()
            .and_then(|record| record.connections.last_mut())
        {
            connection.pin_name = name;
        }
    }
}

impl<'a> Iterator for PstxnetReader<'a> {
    type Item = Result<NetRecord<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let Some((index, line)) = self.lines.next() else {
                return self.finish();
            };
            let line_no = index + 1;

            if line_no == HEADER_INFO_LINE {
                self.info = parse_export_info(line);
            }

            if self.expecting_name.take().is_some() {
                if let Err(err) = self.open_net(line, line_no) {
                    return self.fail(err);
                }
                continue;
            }

            let mut tokens = TokenIter::new(line);
            match tokens.next().map(|token| token.kind) {
                Some(TokenKind::NetName) => {
                    self.pin_name_in = None;
                    self.expecting_name = Some(line_no);
                    if let Some(closed) = self.open.take() {
                        return Some(Ok(closed));
                    }
                }
                Some(TokenKind::End) => {
                    self.pin_name_in = None;
                    return self.finish();
                }
                Some(TokenKind::NodeName) => {
                    if let Err(err) = self.add_node(line, line_no, tokens) {
                        return self.fail(err);
                    }
                }
                _ => self.take_pin_name(line),
            }
        }
    }
}

/// `{ Using PSTWRITER 16.3.0 p002Mar-22-2016 at 10:54:51 }`
fn parse_export_info(line: &str) -> Option<ExportInfo<'_>> {
    let words: Vec<&str> = TokenIter::new(line)
        .filter(|token: &Token| token.kind.is_text())
        .map(|token| text(line, &token))
        .collect();
    let at = words.iter().position(|word| *word == "PSTWRITER")?;
    let version = *words.get(at + 1)?;
    let stamp = *words.get(at + 2)?;
    let time = *words.get(at + 4)?;
    // The date carries a patch level prefix like `p002`
    let date = stamp
        .strip_prefix('p')
        .map(|rest| rest.trim_start_matches(|c: char| c.is_ascii_digit()))
        .unwrap_or(stamp);
    Some(ExportInfo {
        version,
        date,
        time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    const SAMPLE: &str = "FILE_TYPE = EXPANDEDNETLIST;
{ Using PSTWRITER 16.3.0 p002Mar-22-2016 at 10:54:51 }
NET_NAME
'NET1'
 '@CAPTURENAME.test':
 C_SIGNAL='@test';
NODE_NAME\tR1 1
 '@CAPTURENAME.test':
 'pin1':;
NODE_NAME\tR2 2
 '@CAPTURENAME.test':
 'pin2':;
NET_NAME
'NET2'
 '@CAPTURENAME.test':
 C_SIGNAL='@test';
NODE_NAME\tC1 1
 '@CAPTURENAME.test':
 'pin1':;
END.
";

    fn read(input: &str) -> Result<Vec<NetRecord<'_>>, ParseError> {
        PstxnetReader::new(input).collect()
    }

    #[test]
    fn reads_nets_and_nodes() {
        let records = read(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].net_name, "NET1");
        assert_eq!(
            records[0]
                .connections
                .iter()
                .map(|c| (c.ref_des.0, c.pin.0))
                .collect::<Vec<_>>(),
            [("R1", "1"), ("R2", "2")]
        );
        assert_eq!(records[1].net_name, "NET2");
        assert_eq!(records[1].connections.len(), 1);
    }

    #[test]
    fn reads_pin_names() {
        let records = read(SAMPLE).unwrap();
        let names: Vec<_> = records[0].connections.iter().map(|c| c.pin_name).collect();
        assert_eq!(names, [Some("pin1"), Some("pin2")]);
    }

    #[rstest]
    #[case(" 'A\\B':;", "A\\B")]
    #[case(" 'RX;EN':;", "RX;EN")]
    #[case(" 'D 0':;", "D 0")]
    fn pin_name_is_kept_verbatim(#[case] line: &str, #[case] expected: &str) {
        let input = format!("NET_NAME\n'N'\nNODE_NAME\tU1 3\n '@x':\n{line}\nEND.\n");
        let records = read(&input).unwrap();
        assert_eq!(records[0].connections[0].pin_name, Some(expected));
    }

    #[test]
    fn reads_export_info() {
        let mut reader = PstxnetReader::new(SAMPLE);
        reader.by_ref().for_each(drop);
        assert_eq!(
            reader.info(),
            Some(ExportInfo {
                version: "16.3.0",
                date: "Mar-22-2016",
                time: "10:54:51",
            })
        );
    }

    #[rstest]
    #[case("{ Using PSTWRITER 17.4.0 p001Jan-02-2023 at 08:00:00 }", Some(("17.4.0", "Jan-02-2023", "08:00:00")))]
    #[case("{ Using PSTWRITER 16.3.0 }", None)]
    #[case("garbage", None)]
    fn export_info_line(#[case] line: &str, #[case] expected: Option<(&str, &str, &str)>) {
        let info = parse_export_info(line).map(|i| (i.version, i.date, i.time));
        assert_eq!(info, expected);
    }

    #[test]
    fn net_name_resets_pending_pin_name() {
        let input = "FILE_TYPE = EXPANDEDNETLIST;
{ Using PSTWRITER 16.3.0 p002Mar-22-2016 at 10:54:51 }
NET_NAME
'NET1'
 '@CAPTURENAME.test':
 C_SIGNAL='@test';
NODE_NAME\tR1 1
NET_NAME
'NET2'
 '@CAPTURENAME.test':
 C_SIGNAL='@test';
NODE_NAME\tC1 1
 '@CAPTURENAME.test':
 'pin1':;
END.
";
        let records = read(input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].connections[0].ref_des.0, "R1");
        assert_eq!(records[0].connections[0].pin_name, None);
        assert_eq!(records[1].connections[0].ref_des.0, "C1");
        assert_eq!(records[1].connections[0].pin_name, Some("pin1"));
    }

    #[rstest]
    #[case("FILE_TYPE = EXPANDEDNETLIST;\n\nNODE_NAME\tR1 1\n", 3)]
    #[case("FILE_TYPE = EXPANDEDNETLIST;\n\nNET_NAME\n'N'\nNODE_NAME\tR1\n", 5)]
    #[case("FILE_TYPE = EXPANDEDNETLIST;\n\nNET_NAME\n", 3)]
    #[case("FILE_TYPE = EXPANDEDNETLIST;\n\nNET_NAME\n\n", 4)]
    fn malformed_records(#[case] input: &str, #[case] line: usize) {
        let err = read(input).unwrap_err();
        assert!(
            matches!(err, ParseError::MalformedInput { line: l, .. } if l == line),
            "{err:?}"
        );
    }

    #[test]
    fn lines_after_end_are_ignored() {
        let input = "NET_NAME\n'A'\nNODE_NAME\tR1 1\nEND.\nNODE_NAME\tR9 9\n";
        let records = read(input).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].connections.len(), 1);
    }
}
