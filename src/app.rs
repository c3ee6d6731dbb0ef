use crate::cli::{Cli, Commands};
use crate::core::{aggregate_daily, aggregate_departments, summarize};
use crate::data::{DateFilter, LoadResult, load_records};
use crate::error::AppError;
use crate::output::{
    KpiTableOptions, NumberFormat, Period, SummaryOptions, output_department_csv,
    output_department_json, output_period_csv, output_period_json, output_records_csv,
    output_records_json, output_summary_csv, output_summary_json, print_department_table,
    print_period_table, print_records_table, print_summary_table,
};
use crate::utils::parse_date;

/// Everything a view handler needs: the CLI surface plus the dataset
/// loaded for this invocation. The dataset travels here explicitly
/// instead of living in a global.
pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) data: &'a LoadResult,
    pub(crate) number_format: NumberFormat,
}

impl CommandContext<'_> {
    fn table_options(&self) -> KpiTableOptions {
        KpiTableOptions {
            order: self.cli.order,
            use_color: self.cli.use_color(),
            compact: self.cli.compact,
            number_format: self.number_format,
        }
    }

    fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            loaded: self.data.records.len(),
            skipped: self.data.skipped,
            elapsed_ms: Some(self.data.elapsed_ms),
        }
    }
}

fn handle_summary(ctx: &CommandContext<'_>) {
    let overall = summarize(&ctx.data.records);
    if ctx.cli.json {
        println!(
            "{}",
            output_summary_json(&overall, ctx.data.records.len(), ctx.data.skipped)
        );
    } else if ctx.cli.csv {
        print!(
            "{}",
            output_summary_csv(&overall, ctx.data.records.len(), ctx.data.skipped)
        );
    } else {
        print_summary_table(&overall, ctx.summary_options(), ctx.table_options());
    }
}

fn handle_department(ctx: &CommandContext<'_>) {
    let departments = aggregate_departments(&ctx.data.records);
    if ctx.cli.json {
        println!("{}", output_department_json(&departments, ctx.cli.order));
    } else if ctx.cli.csv {
        print!("{}", output_department_csv(&departments, ctx.cli.order));
    } else {
        print_department_table(&departments, ctx.summary_options(), ctx.table_options());
    }
}

fn handle_period(ctx: &CommandContext<'_>, period: Period) {
    let daily = aggregate_daily(&ctx.data.records);
    if ctx.cli.json {
        println!(
            "{}",
            output_period_json(&daily, period, ctx.cli.order, ctx.cli.breakdown)
        );
    } else if ctx.cli.csv {
        print!(
            "{}",
            output_period_csv(&daily, period, ctx.cli.order, ctx.cli.breakdown)
        );
    } else {
        print_period_table(
            &daily,
            period,
            ctx.cli.breakdown,
            ctx.summary_options(),
            ctx.table_options(),
        );
    }
}

fn handle_records(ctx: &CommandContext<'_>) {
    if ctx.cli.json {
        println!("{}", output_records_json(&ctx.data.records, ctx.cli.order));
    } else if ctx.cli.csv {
        print!("{}", output_records_csv(&ctx.data.records, ctx.cli.order));
    } else {
        print_records_table(&ctx.data.records, ctx.summary_options(), ctx.table_options());
    }
}

pub(crate) fn run(cli: &Cli) -> Result<(), AppError> {
    let number_format = NumberFormat::from_locale(cli.locale.as_deref())?;

    let since = cli.since.as_deref().map(parse_date).transpose()?;
    let until = cli.until.as_deref().map(parse_date).transpose()?;
    let filter = DateFilter::new(since, until);

    let data = load_records(&cli.file, &filter)?;

    if cli.debug {
        for warning in &data.warnings {
            eprintln!("Warning: line {}: {}", warning.line, warning.message);
        }
    }

    if data.records.is_empty() {
        println!("No task data found.");
        return Ok(());
    }

    let ctx = CommandContext {
        cli,
        data: &data,
        number_format,
    };

    match cli.command.unwrap_or(Commands::Summary) {
        Commands::Summary => handle_summary(&ctx),
        Commands::Department => handle_department(&ctx),
        Commands::Daily => handle_period(&ctx, Period::Day),
        Commands::Weekly => handle_period(&ctx, Period::Week),
        Commands::Monthly => handle_period(&ctx, Period::Month),
        Commands::Records => handle_records(&ctx),
    }

    Ok(())
}
