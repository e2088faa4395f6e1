use std::fmt::Write;
use std::path::Path;

use chrono::{Local, NaiveDateTime};

use crate::{ExportInfo, NetMap};

const RULE: &str =
    "+-------------------------------------------------------------------------+";
const FRAME_WIDTH: usize = 72;
/// Listed instead of nets when no net is left dangling
pub(crate) const EMPTY_MARKER: &str = "- (Empty)";

/// The report file: title banner, net lines and single node warnings
#[derive(Debug, Clone)]
pub struct Report<'m, 'a> {
    nets: &'m NetMap<'a>,
    info: Option<ExportInfo<'a>>,
    source: Option<String>,
    sort: bool,
}

impl<'m, 'a> Report<'m, 'a> {
    pub fn new(nets: &'m NetMap<'a>, info: Option<ExportInfo<'a>>) -> Self {
        Self {
            nets,
            info,
            source: None,
            sort: false,
        }
    }

    pub fn source(mut self, path: &Path) -> Self {
        self.source = Some(path.display().to_string());
        self
    }

    pub fn sorted(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    pub fn render(&self) -> String {
        self.render_at(Local::now().naive_local())
    }

    pub fn render_at(&self, generated: NaiveDateTime) -> String {
        let mut out = String::new();
        self.title(&mut out, generated);
        out.push_str(&self.nets.to_body(self.sort));
        self.warnings(&mut out);
        out
    }

    fn title(&self, out: &mut String, generated: NaiveDateTime) {
        let info = match &self.info {
            Some(info) => info.to_string(),
            None => "Netlist info unavailable".to_owned(),
        };
        let _ = writeln!(out, "{RULE}");
        framed(out, "File contains Cadence PCB Editor netlist");
        framed(out, "NOTE: this file was auto-generated");
        framed(
            out,
            &format!(
                "generation date, time: {}",
                generated.format("%Y-%m-%d %H:%M:%S")
            ),
        );
        let _ = writeln!(out, "{RULE}");
        framed(out, "Cadence Netlist file info:");
        framed(out, &format!(" {info}"));
        if let Some(source) = &self.source {
            framed(out, &format!(" {source}"));
        }
        let _ = writeln!(out, "{RULE}");
    }

    fn warnings(&self, out: &mut String) {
        out.push_str("\n\n\n");
        let _ = writeln!(out, "{RULE}");
        framed(out, "Warnings: Single node name");
        let _ = writeln!(out, "{RULE}");
        let mut empty = true;
        for line in self.nets.single_node_nets() {
            let _ = writeln!(out, "{line}");
            empty = false;
        }
        if empty {
            let _ = writeln!(out, "{EMPTY_MARKER}");
        }
    }
}

fn framed(out: &mut String, text: &str) {
    let _ = writeln!(out, "| {:<width$}|", text, width = FRAME_WIDTH);
}
