use std::fmt::{self, Display};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};


#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Text(String),
    Bytes(u64),
    Seconds(f64),
}

impl Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(v) => write!(f, "{}", v),
            Cell::Bytes(v) => write!(f, "{}", v),
            Cell::Seconds(v) => write!(f, "{:.6}", v),
        }
    }
}

/// One row per source file plus a trailing totals row, in run order.
#[derive(Debug)]
pub struct Report {
    header: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Report {
    pub fn new(header: Vec<String>) -> Self {
        Report {
            header,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.header.len());
        self.rows.push(row);
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Header line, one line per row, totals last. Fields are joined with
    /// bare commas; a field that contains the delimiter is an error rather
    /// than a silently malformed document.
    pub fn write_csv<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{}", csv_line(&self.header)?)?;
        for row in &self.rows {
            let fields: Vec<String> =
                row.iter().map(|cell| cell.to_string()).collect();
            writeln!(out, "{}", csv_line(&fields)?)?;
        }
        Ok(())
    }

    pub fn to_csv_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        self.write_csv(&mut out)?;
        out.flush()
            .with_context(|| format!("cannot write {}", path.display()))
    }
}

fn csv_line<S: AsRef<str>>(fields: &[S]) -> Result<String> {
    for field in fields {
        let field = field.as_ref();
        if field.contains(',') || field.contains('\n') {
            bail!("csv field contains a delimiter: {:?}", field);
        }
    }
    Ok(fields
        .iter()
        .map(|f| f.as_ref())
        .collect::<Vec<_>>()
        .join(","))
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> =
            self.header.iter().map(|h| h.chars().count()).collect();
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        for row in &rendered {
            for (idx, field) in row.iter().enumerate() {
                widths[idx] = widths[idx].max(field.chars().count());
            }
        }

        let rule: String = widths
            .iter()
            .map(|w| format!("+{}", "-".repeat(w + 2)))
            .chain(std::iter::once("+".to_string()))
            .collect();

        writeln!(f, "{}", rule)?;
        write_row(f, &self.header, &widths)?;
        writeln!(f, "{}", rule)?;
        for row in &rendered {
            write_row(f, row, &widths)?;
        }
        write!(f, "{}", rule)
    }
}

fn write_row<S: AsRef<str>>(
    f: &mut fmt::Formatter<'_>,
    fields: &[S],
    widths: &[usize],
) -> fmt::Result {
    for (field, &width) in fields.iter().zip(widths) {
        write!(f, "| {:<1$} ", field.as_ref(), width)?;
    }
    writeln!(f, "|")
}
