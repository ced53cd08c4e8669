use std::fs;
use std::path::{Path, PathBuf};

use dashchart::api::{Chart, ChartConfig, NamespaceAllocator};
use dashchart::core::Row;
use dashchart::render::NullRenderer;

const USAGE: &str = "usage: render_chart_snapshot --config <chart.json> --rows <rows.json> [--filter <value>] --output <snapshot.json>";

#[derive(Debug)]
struct CliArgs {
    config: PathBuf,
    rows: PathBuf,
    filter: Option<String>,
    output: PathBuf,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let _ = dashchart::telemetry::init_default_tracing();
    let args = parse_args()?;

    let config = ChartConfig::from_json_str(&read(&args.config)?).map_err(|err| err.to_string())?;
    let rows: Vec<Row> = serde_json::from_str(&read(&args.rows)?)
        .map_err(|err| format!("invalid rows json: {err}"))?;

    let mut namespaces = NamespaceAllocator::new();
    let mut chart = Chart::construct(
        NullRenderer::default(),
        config,
        &rows,
        namespaces.next_namespace(),
    )
    .map_err(|err| err.to_string())?;
    if let Some(filter) = args.filter.as_deref() {
        chart.update(Some(filter)).map_err(|err| err.to_string())?;
    }
    chart.render().map_err(|err| err.to_string())?;

    let payload = chart
        .snapshot_json_contract_v1_pretty()
        .map_err(|err| err.to_string())?;
    fs::write(&args.output, payload)
        .map_err(|err| format!("failed to write `{}`: {err}", args.output.display()))
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("failed to read `{}`: {err}", path.display()))
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);

    let mut config = None::<PathBuf>;
    let mut rows = None::<PathBuf>;
    let mut filter = None::<String>;
    let mut output = None::<PathBuf>;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_owned())?;
                config = Some(PathBuf::from(value));
            }
            "--rows" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --rows".to_owned())?;
                rows = Some(PathBuf::from(value));
            }
            "--filter" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --filter".to_owned())?;
                filter = Some(value);
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                output = Some(PathBuf::from(value));
            }
            "--help" | "-h" => return Err(USAGE.to_owned()),
            _ => return Err(format!("unknown argument `{flag}`")),
        }
    }

    Ok(CliArgs {
        config: config.ok_or_else(|| "missing --config".to_owned())?,
        rows: rows.ok_or_else(|| "missing --rows".to_owned())?,
        filter,
        output: output.ok_or_else(|| "missing --output".to_owned())?,
    })
}
