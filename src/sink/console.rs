// Aligned plain-text table on stdout (numeric columns right-aligned)

use super::{ADDRESS_CELL_WIDTH, HEADER, SummaryRow};
use std::io::Write;

const TIME_WIDTH: usize = 19;
const ADDR_WIDTH: usize = ADDRESS_CELL_WIDTH;
const COUNT_WIDTH: usize = 5;

pub struct ConsoleSink<W: Write> {
    out: W,
}

impl ConsoleSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_header(&mut self) -> std::io::Result<()> {
        let line = render_line(HEADER[0], HEADER[1], HEADER[2], HEADER[3], HEADER[4], HEADER[5]);
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    pub fn write_row(&mut self, row: &SummaryRow) -> std::io::Result<()> {
        let line = format_row(row);
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn format_row(row: &SummaryRow) -> String {
    render_line(
        &row.time,
        &row.sources,
        &row.destinations,
        &row.sent.to_string(),
        &row.received.to_string(),
        &row.event,
    )
}

fn render_line(time: &str, src: &str, dst: &str, sent: &str, received: &str, event: &str) -> String {
    format!(
        "{time:<TIME_WIDTH$}  {src:<ADDR_WIDTH$}  {dst:<ADDR_WIDTH$}  {sent:>COUNT_WIDTH$}  {received:>COUNT_WIDTH$}  {event}"
    )
}
