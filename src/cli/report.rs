use std::{fmt, path::Path};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use regex::Regex;
use roster::{
    ReportRow, Store, Truck, project_to_rows,
    roster::{HeaderLevel, grouping::effective_zone},
};
use tracing::instrument;

use super::{
    Login,
    terminal::{Colorize, is_narrow},
};

/// Command arguments for `roster report`.
#[derive(Debug, Default, Parser)]
#[command(about = "Print the roster grouped by zone and station")]
pub struct Command {
    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Only include these zones (repeatable, case-insensitive).
    #[arg(long, value_name = "ZONE")]
    zone: Vec<String>,

    /// Regular expression matched against id, name, station and officer.
    #[arg(long)]
    regex: Option<String>,

    /// Suppress headers and format rows for scripting.
    #[arg(long)]
    quiet: bool,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl Command {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, root: &Path, login: &Login) -> anyhow::Result<()> {
        let store = Store::open(root)?;
        let filters = Filters::new(&self)?;

        if store.trucks().is_empty() {
            println!("No trucks found yet. Add one with 'roster truck add'.");
            return Ok(());
        }

        let session = login.session(&store)?;
        let mut hierarchy = store.grouped_hierarchy(&session)?;
        if filters.any() {
            hierarchy.retain(|truck| filters.matches(truck));
        }
        tracing::debug!(
            total = store.trucks().len(),
            selected = hierarchy.truck_count(),
            "filtered fleet"
        );

        if hierarchy.is_empty() {
            println!("No trucks matched the specified filters.");
            return Ok(());
        }

        let rows = project_to_rows(&hierarchy);

        match self.output {
            OutputFormat::Table => {
                render_table(&rows, self.quiet);
                Ok(())
            }
            OutputFormat::Json => render_json(&rows),
            OutputFormat::Csv => {
                for line in csv_lines(&rows, self.quiet) {
                    println!("{line}");
                }
                Ok(())
            }
        }
    }
}

struct Filters {
    zones: Vec<String>,
    regex: Option<Regex>,
}

impl Filters {
    fn new(cmd: &Command) -> anyhow::Result<Self> {
        let regex = if let Some(pattern) = &cmd.regex {
            Some(Regex::new(pattern).with_context(|| format!("invalid regex: {pattern}"))?)
        } else {
            None
        };

        Ok(Self {
            zones: cmd.zone.iter().map(|zone| zone.to_lowercase()).collect(),
            regex,
        })
    }

    fn any(&self) -> bool {
        !self.zones.is_empty() || self.regex.is_some()
    }

    fn matches(&self, truck: &Truck) -> bool {
        if !self.zones.is_empty() {
            let zone = effective_zone(truck).to_lowercase();
            if !self.zones.iter().any(|z| z == &zone) {
                return false;
            }
        }

        if let Some(regex) = &self.regex {
            let haystacks = [
                Some(truck.id.as_str()),
                Some(truck.name.as_str()),
                truck.station.as_deref(),
                truck.officer.as_ref().map(|officer| officer.name.as_str()),
            ];
            if !haystacks.into_iter().flatten().any(|text| regex.is_match(text)) {
                return false;
            }
        }

        true
    }
}

/// The table columns, in display order.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Column {
    Name,
    Kind,
    Status,
    Officer,
    Personnel,
}

impl Column {
    const ALL: [Self; 5] = [
        Self::Name,
        Self::Kind,
        Self::Status,
        Self::Officer,
        Self::Personnel,
    ];

    const fn header(self) -> &'static str {
        match self {
            Self::Name => "Unidad",
            Self::Kind => "Tipo",
            Self::Status => "Estado",
            Self::Officer => "Oficial a Cargo",
            Self::Personnel => "Personal",
        }
    }

    fn value(self, truck: &Truck) -> String {
        match self {
            Self::Name => truck.name.clone(),
            Self::Kind => truck.kind.clone().unwrap_or_else(|| "-".to_string()),
            Self::Status => truck.status_text(),
            Self::Officer => truck.officer_text(),
            Self::Personnel => truck.personnel_text(),
        }
    }
}

fn render_table(rows: &[ReportRow<'_>], quiet: bool) {
    let columns: Vec<Column> = if is_narrow() {
        vec![Column::Name, Column::Status, Column::Officer]
    } else {
        Column::ALL.to_vec()
    };

    if quiet {
        for truck in rows.iter().filter_map(ReportRow::as_truck) {
            let values: Vec<String> = columns.iter().map(|column| column.value(truck)).collect();
            println!("{}\t{}", truck.id, values.join("\t"));
        }
        return;
    }

    // Column widths over every truck row, so groups line up.
    let widths: Vec<usize> = columns
        .iter()
        .map(|column| {
            rows.iter()
                .filter_map(ReportRow::as_truck)
                .map(|truck| column.value(truck).chars().count())
                .max()
                .unwrap_or(0)
                .max(column.header().chars().count())
        })
        .collect();
    let total_width = widths.iter().sum::<usize>() + 2 * widths.len();

    for row in rows {
        match row {
            ReportRow::Header(header) => match header.level {
                HeaderLevel::Zone => {
                    println!();
                    println!("{}", header.title.zone());
                    println!("{}", "=".repeat(total_width));
                }
                HeaderLevel::Station => {
                    println!();
                    println!("{}", header.title.station());
                    let line: String = columns
                        .iter()
                        .zip(&widths)
                        .map(|(column, width)| pad(column.header(), *width))
                        .collect();
                    println!("{}", line.trim_end().dim());
                }
            },
            ReportRow::Truck(truck) => {
                let line: String = columns
                    .iter()
                    .zip(&widths)
                    .map(|(column, width)| pad(&column.value(truck), *width))
                    .collect();
                let line = line.trim_end();
                if truck.status.is_operational() {
                    println!("{line}");
                } else {
                    println!("{}", line.warning());
                }
            }
        }
    }
}

/// Left-aligns `value` in `width` characters plus a two-space gutter.
fn pad(value: &str, width: usize) -> String {
    let fill = width.saturating_sub(value.chars().count()) + 2;
    format!("{value}{}", " ".repeat(fill))
}

fn render_json(rows: &[ReportRow<'_>]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(std::io::stdout(), rows)
        .context("failed to render json output")?;
    println!();
    Ok(())
}

const CSV_HEADERS: [&str; 8] = [
    "Zona", "Estación", "Id", "Unidad", "Tipo", "Estado", "Oficial a Cargo", "Personal",
];

/// Flattens the rows into one CSV line per truck, carrying the zone and
/// station of the enclosing headers.
fn csv_lines(rows: &[ReportRow<'_>], quiet: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if !quiet {
        lines.push(CSV_HEADERS.map(csv_escape).join(","));
    }

    let mut zone = "";
    let mut station = "";
    for row in rows {
        match row {
            ReportRow::Header(header) if header.level == HeaderLevel::Zone => {
                zone = header.title.as_str();
            }
            ReportRow::Header(header) => station = header.title.as_str(),
            ReportRow::Truck(truck) => {
                let values = [
                    zone.to_string(),
                    station.to_string(),
                    truck.id.clone(),
                    truck.name.clone(),
                    Column::Kind.value(truck),
                    truck.status_text(),
                    truck.officer_text(),
                    truck.personnel_text(),
                ];
                lines.push(values.map(|value| csv_escape(&value)).join(","));
            }
        }
    }
    lines
}

fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Csv => "csv",
        })
    }
}
