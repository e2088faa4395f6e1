use std::fmt::{Display, Write};

use indexmap::IndexMap;

use crate::{Connection, NetRecord, PinNum};

/// Nets merged by name, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetMap<'a> {
    nets: IndexMap<&'a str, Vec<Connection<'a>>>,
}

/// One net rendered as `name comp pin comp pin ...`
#[derive(Debug, Clone, Copy)]
pub struct FormattedLine<'m, 'a> {
    pub net_name: &'a str,
    pub connections: &'m [Connection<'a>],
}

impl<'a> NetMap<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the record's connections to its net, creating the net on first sight
    pub fn insert(&mut self, record: NetRecord<'a>) {
        self.nets
            .entry(record.net_name)
            .or_default()
            .extend(record.connections);
    }

    pub fn len(&self) -> usize {
        self.nets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }

    pub fn connections(&self, net_name: &str) -> Option<&[Connection<'a>]> {
        self.nets.get(net_name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = FormattedLine<'_, 'a>> {
        self.nets.iter().map(|(net_name, connections)| FormattedLine {
            net_name: *net_name,
            connections: connections.as_slice(),
        })
    }

    /// Nets by name; equal names cannot occur so the order is total
    pub fn sorted(&self) -> Vec<FormattedLine<'_, 'a>> {
        let mut lines: Vec<_> = self.iter().collect();
        lines.sort_by(|a, b| a.net_name.cmp(b.net_name));
        lines
    }

    pub fn lines(&self, sort: bool) -> Vec<FormattedLine<'_, 'a>> {
        if sort {
            self.sorted()
        } else {
            self.iter().collect()
        }
    }

    /// Nets with at most one connection, usually a missing wire in the schematic
    pub fn single_node_nets(&self) -> impl Iterator<Item = FormattedLine<'_, 'a>> {
        self.iter().filter(|line| line.connections.len() <= 1)
    }

    pub fn net_of(&self, ref_des: &str, pin: &str) -> Option<&'a str> {
        self.iter().find_map(|line| {
            line.connections
                .iter()
                .any(|c| c.ref_des.0 == ref_des && c.pin.0 == pin)
                .then_some(line.net_name)
        })
    }

    pub fn pin_name(&self, ref_des: &str, pin: &str) -> Option<&'a str> {
        self.nets
            .values()
            .flatten()
            .find(|c| c.ref_des.0 == ref_des && c.pin.0 == pin)
            .and_then(|c| c.pin_name)
    }

    /// Every `(net, pin)` of a component, in report order
    pub fn refdes_pins(&self, ref_des: &str) -> Vec<(&'a str, PinNum<'a>)> {
        self.iter()
            .flat_map(|line| {
                line.connections
                    .iter()
                    .filter(move |c| c.ref_des.0 == ref_des)
                    .map(move |c| (line.net_name, c.pin))
            })
            .collect()
    }

    /// `REFDES net:pin net:pin ...`, or `None` if the component is not on any net
    pub fn refdes_line(&self, ref_des: &str) -> Option<String> {
        let pins = self.refdes_pins(ref_des);
        if pins.is_empty() {
            return None;
        }
        let mut out = ref_des.to_owned();
        for (net_name, pin) in pins {
            let _ = write!(out, " {}:{}", net_name, pin);
        }
        Some(out)
    }

    /// The report body: one line per net, each terminated by a newline
    pub fn to_body(&self, sort: bool) -> String {
        let mut out = String::new();
        for line in self.lines(sort) {
            let _ = writeln!(out, "{line}");
        }
        out
    }
}

impl<'a> FromIterator<NetRecord<'a>> for NetMap<'a> {
    fn from_iter<T: IntoIterator<Item = NetRecord<'a>>>(iter: T) -> Self {
        let mut nets = NetMap::new();
        nets.extend(iter);
        nets
    }
}

impl<'a> Extend<NetRecord<'a>> for NetMap<'a> {
    fn extend<T: IntoIterator<Item = NetRecord<'a>>>(&mut self, iter: T) {
        for record in iter {
            self.insert(record);
        }
    }
}

/// Quote tokens that would not survive a whitespace split
fn write_token(f: &mut std::fmt::Formatter<'_>, token: &str) -> std::fmt::Result {
    if token.is_empty() || token.contains(char::is_whitespace) {
        write!(f, "'{}'", token)
    } else {
        f.write_str(token)
    }
}

impl<'m, 'a> Display for FormattedLine<'m, 'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_token(f, self.net_name)?;
        for connection in self.connections {
            f.write_str(" ")?;
            write_token(f, connection.ref_des.0)?;
            f.write_str(" ")?;
            write_token(f, connection.pin.0)?;
        }
        Ok(())
    }
}
