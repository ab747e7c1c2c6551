use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;
use tabex_cli::config::load_registry;
use tabex_cli::pipeline::{ExportOutcome, OutputTarget, describe_models};
use tabex_core::ExportOptions;
use tracing::info_span;

use crate::cli::{ExportArgs, ModelsArgs};
use crate::summary::apply_table_style;

pub fn run_export(args: &ExportArgs) -> Result<ExportOutcome> {
    let span = info_span!("export", schema = %args.schema.display(), model = %args.model);
    let _guard = span.enter();
    let registry = load_registry(&args.schema)?;
    let options: ExportOptions = args.options.iter().cloned().collect();
    let target = if args.stdout {
        OutputTarget::Stdout
    } else {
        OutputTarget::Directory(
            args.output_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
        )
    };
    tabex_cli::pipeline::run_export(&registry, &args.model, options, &target)
}

pub fn run_models(args: &ModelsArgs) -> Result<()> {
    let registry = load_registry(&args.schema)?;
    let mut table = Table::new();
    table.set_header(vec!["Model", "Partial", "Column", "Resolver"]);
    apply_table_style(&mut table);
    let mut previous: Option<String> = None;
    for column in describe_models(&registry) {
        let first = previous.as_deref() != Some(column.model.as_str());
        let (model, partial) = if first {
            (column.model.clone(), column.partial_name)
        } else {
            (String::new(), String::new())
        };
        previous = Some(column.model);
        table.add_row(vec![model, partial, column.header, column.resolver]);
    }
    println!("{table}");
    Ok(())
}
