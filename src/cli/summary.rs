use std::path::Path;

use clap::Parser;
use roster::{
    Store,
    roster::summary::{
        Breakdown, StatusBucket, TypeBucket, in_service_breakdown, operational_breakdown,
        status_summary, type_summary,
    },
};
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Parser, Default)]
#[command(about = "Show operational counts and per-status and per-type listings")]
pub struct Command {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Only print the counts, one per line
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let store = Store::open(root)?;
        let trucks = store.trucks();

        if trucks.is_empty() {
            println!("No trucks found yet. Add one with 'roster truck add'.");
            return Ok(());
        }

        let operational = operational_breakdown(trucks);
        let in_service = in_service_breakdown(trucks);
        let statuses = status_summary(trucks);
        let types = type_summary(trucks, store.config().type_order());

        match self.output {
            OutputFormat::Json => Self::output_json(operational, in_service, &statuses, &types),
            OutputFormat::Table if self.quiet => {
                Self::output_quiet(operational, &statuses);
                Ok(())
            }
            OutputFormat::Table => {
                Self::output_table(operational, in_service, &statuses, &types);
                Ok(())
            }
        }
    }

    fn output_json(
        operational: Breakdown,
        in_service: Breakdown,
        statuses: &[StatusBucket<'_>],
        types: &[TypeBucket<'_>],
    ) -> anyhow::Result<()> {
        use serde_json::json;

        let statuses: Vec<_> = statuses
            .iter()
            .map(|bucket| {
                json!({
                    "status": bucket.status.label(),
                    "count": bucket.trucks.len(),
                    "trucks": bucket.trucks.iter().map(|t| &t.name).collect::<Vec<_>>(),
                    "by_type": bucket.by_type,
                })
            })
            .collect();

        let types: Vec<_> = types
            .iter()
            .map(|bucket| {
                json!({
                    "type": bucket.kind,
                    "count": bucket.trucks.len(),
                    "trucks": bucket.trucks.iter().map(|t| &t.name).collect::<Vec<_>>(),
                })
            })
            .collect();

        let output = json!({
            "operational": {
                "total": operational.total,
                "autobombas": operational.autobombas,
                "cisternas": operational.cisternas,
                "heavy": operational.heavy(),
            },
            "in_service": {
                "autobombas": in_service.autobombas,
                "cisternas": in_service.cisternas,
            },
            "statuses": statuses,
            "types": types,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(operational: Breakdown, statuses: &[StatusBucket<'_>]) {
        println!("operational\t{}", operational.total);
        for bucket in statuses {
            println!("{}\t{}", bucket.status.short_label(), bucket.trucks.len());
        }
    }

    fn output_table(
        operational: Breakdown,
        in_service: Breakdown,
        statuses: &[StatusBucket<'_>],
        types: &[TypeBucket<'_>],
    ) {
        let narrow = is_narrow();

        println!("{}", "Resumen por Estado".zone());
        println!(
            "{} operativas (Autobombas: {}, Cisternas: {}, Pesadas: {})",
            operational.total.to_string().success(),
            operational.autobombas,
            operational.cisternas,
            operational.heavy()
        );
        println!(
            "{}",
            format!(
                "Para Servicio: Autobombas {} / Cisternas {}",
                in_service.autobombas, in_service.cisternas
            )
            .dim()
        );
        println!();

        for bucket in statuses {
            println!(
                "{:<20} {:>4}",
                bucket.status.short_label().station(),
                bucket.trucks.len()
            );
            if !bucket.by_type.is_empty() {
                let counts: Vec<String> = bucket
                    .by_type
                    .iter()
                    .map(|(kind, count)| format!("{kind}: {count}"))
                    .collect();
                println!("  {}", counts.join(", ").dim());
            }
            if !narrow {
                for truck in &bucket.trucks {
                    println!("  - {}", truck.name);
                }
            }
        }

        println!();
        println!("{}", "Resumen por Tipo de Unidad".zone());
        for bucket in types {
            println!("{:<20} {:>4}", bucket.kind.station(), bucket.trucks.len());
            if !narrow {
                for truck in &bucket.trucks {
                    println!("  - {} {}", truck.name, truck.status_text().dim());
                }
            }
        }
    }
}
