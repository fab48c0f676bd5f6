//! Human-readable and JSON output of stage results

use std::io::{self, Write};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::dataset::DatasetReport;
use crate::filter::{OccurrenceCounter, RecordFilterReport};
use crate::pipeline::PipelineReport;

/// Result of any stage, for printing.
#[derive(Debug, Clone, Copy)]
pub enum Report<'a> {
    Counter(&'a OccurrenceCounter),
    Dataset(&'a DatasetReport),
    Records(&'a RecordFilterReport),
    Pipeline(&'a PipelineReport),
}

impl Serialize for Report<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Report::Counter(c) => c.serialize(serializer),
            Report::Dataset(d) => d.serialize(serializer),
            Report::Records(r) => r.serialize(serializer),
            Report::Pipeline(p) => p.serialize(serializer),
        }
    }
}

/// Print a report to stdout with optional color.
pub fn print_report(report: Report<'_>, use_color: bool) -> io::Result<()> {
    let color_choice = if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(color_choice);
    write_report(&mut stdout, report)
}

/// Print a report as pretty JSON.
pub fn print_report_json(report: Report<'_>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&report).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

pub fn write_report<W: WriteColor>(out: &mut W, report: Report<'_>) -> io::Result<()> {
    match report {
        Report::Counter(counter) => write_counter(out, "Surviving Files", counter),
        Report::Dataset(dataset) => write_dataset(out, dataset),
        Report::Records(records) => write_records(out, records),
        Report::Pipeline(pipeline) => {
            write_counter(out, "Extension Filter", &pipeline.extension_counter)?;
            if let Some(counter) = &pipeline.filename_counter {
                writeln!(out)?;
                write_counter(out, "Filename Filter", counter)?;
            }
            for dataset in &pipeline.datasets {
                writeln!(out)?;
                write_dataset(out, dataset)?;
            }
            for records in &pipeline.processed {
                writeln!(out)?;
                write_records(out, records)?;
            }
            Ok(())
        }
    }
}

fn write_header<W: WriteColor>(out: &mut W, title: &str) -> io::Result<()> {
    let mut bold = ColorSpec::new();
    bold.set_bold(true);
    out.set_color(&bold)?;
    writeln!(out, "{}", title)?;
    out.reset()?;
    writeln!(out, "{}", "─".repeat(title.chars().count()))
}

fn write_counter<W: WriteColor>(out: &mut W, title: &str, counter: &OccurrenceCounter) -> io::Result<()> {
    write_header(out, title)?;
    writeln!(
        out,
        "Files:        {} total, {} distinct names",
        format_number(counter.total()),
        format_number(counter.len())
    )?;

    let duplicates = counter.duplicates();
    if !duplicates.is_empty() {
        let mut name_color = ColorSpec::new();
        name_color.set_fg(Some(Color::Yellow));

        writeln!(out, "Duplicates:")?;
        for (name, count) in duplicates {
            write!(out, "  ")?;
            out.set_color(&name_color)?;
            write!(out, "{:<24}", name)?;
            out.reset()?;
            writeln!(out, "{:>6}", count)?;
        }
    }
    Ok(())
}

fn write_dataset<W: WriteColor>(out: &mut W, dataset: &DatasetReport) -> io::Result<()> {
    write_header(out, &format!("Dataset ({})", dataset.division))?;
    writeln!(out, "Files:        {} visited", format_number(dataset.files_visited))?;
    if dataset.files_skipped > 0 {
        let mut warn = ColorSpec::new();
        warn.set_fg(Some(Color::Yellow));
        out.set_color(&warn)?;
        writeln!(out, "Skipped:      {}", format_number(dataset.files_skipped))?;
        out.reset()?;
    }
    writeln!(out, "Records:      {}", format_number(dataset.records))?;
    write_path(out, &dataset.path.display().to_string())
}

fn write_records<W: WriteColor>(out: &mut W, records: &RecordFilterReport) -> io::Result<()> {
    write_header(out, &format!("Processed ({})", records.division))?;
    writeln!(out, "Kept:         {}", format_number(records.kept))?;
    writeln!(out, "Dropped:      {}", format_number(records.dropped))?;
    if records.malformed > 0 {
        writeln!(out, "Malformed:    {}", format_number(records.malformed))?;
    }
    write_path(out, &records.path.display().to_string())
}

fn write_path<W: WriteColor>(out: &mut W, path: &str) -> io::Result<()> {
    let mut path_color = ColorSpec::new();
    path_color.set_fg(Some(Color::Cyan));
    write!(out, "Output:       ")?;
    out.set_color(&path_color)?;
    write!(out, "{}", path)?;
    out.reset()?;
    writeln!(out)
}

/// Format a number with thousand separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}
