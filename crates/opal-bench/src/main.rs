use clap::{Parser, Subcommand, ValueEnum};
use opal_expr::{sum, LinearExpr};
use opal_model::{Model, VariableParams};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

const DEFAULT_DENSE_CASES: [usize; 4] = [100, 1_000, 10_000, 100_000];
const SCHEMA_VERSION: u32 = 1;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Opal benchmark runner and reporting interface"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute benchmark scenarios and save JSONL artifacts
    Run(RunArgs),
    /// Render benchmark artifact summaries
    Report(ReportArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Benchmark scenarios to execute
    #[arg(
        long = "scenario",
        value_enum,
        value_delimiter = ',',
        default_value = "sudoku"
    )]
    scenarios: Vec<Scenario>,

    /// Comma-separated list of variable counts for the dense-build scenario
    #[arg(long, value_delimiter = ',')]
    cases: Option<Vec<usize>>,

    /// Number of repetitions per case
    #[arg(long, default_value_t = 1)]
    repetitions: u32,

    /// JSONL output artifact path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Print the built model in LP format (small cases only)
    #[arg(long)]
    print_lp: bool,
}

#[derive(Parser, Debug)]
struct ReportArgs {
    /// Input JSONL benchmark artifact
    #[arg(long)]
    input: PathBuf,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Ndjson,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum Scenario {
    /// 9x9 Sudoku: indexed variable ranges plus batch keyed constraints
    Sudoku,
    /// Synthetic build with heavy duplicate-term coalescing
    DenseBuild,
}

impl Scenario {
    fn as_str(self) -> &'static str {
        match self {
            Scenario::Sudoku => "sudoku",
            Scenario::DenseBuild => "dense-build",
        }
    }
}

#[derive(Debug, Clone)]
struct CaseConfig {
    name: String,
    variables: usize,
}

#[derive(Debug, Clone)]
struct StageMeasurement {
    stage: String,
    duration: Duration,
}

#[derive(Debug, Clone)]
struct CaseExecution {
    variables: usize,
    constraints: usize,
    entries: usize,
    stage_measurements: Vec<StageMeasurement>,
    rendered_lp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BenchRecord {
    schema_version: u32,
    run_id: String,
    scenario: String,
    case_name: String,
    repetition: u32,
    variables: usize,
    constraints: usize,
    entries: usize,
    stage: String,
    duration_ms: f64,
}

#[derive(Debug, Clone, Eq, Ord, PartialEq, PartialOrd)]
struct SummaryKey {
    scenario: String,
    case_name: String,
    stage: String,
}

#[derive(Debug, Clone, Serialize)]
struct SummaryRow {
    scenario: String,
    case_name: String,
    stage: String,
    samples: usize,
    mean_duration_ms: f64,
    max_duration_ms: f64,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run_command(args),
        Command::Report(args) => report_command(args),
    }
}

fn run_command(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.repetitions == 0 {
        return Err(boxed_input_error("repetitions must be greater than zero"));
    }

    let run_id = build_run_id()?;
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("artifacts/bench/{}.jsonl", run_id.as_str())));

    let mut records = Vec::new();

    for scenario in &args.scenarios {
        for case in resolve_cases(*scenario, &args) {
            for rep_idx in 0..args.repetitions {
                let execution = match scenario {
                    Scenario::Sudoku => execute_sudoku(args.print_lp),
                    Scenario::DenseBuild => execute_dense_build(case.variables),
                };
                if let Some(lp) = execution.rendered_lp.as_ref() {
                    println!("{lp}");
                }
                records.extend(case_records(
                    &run_id,
                    *scenario,
                    &case.name,
                    rep_idx + 1,
                    &execution,
                ));
            }
        }
    }

    write_records_jsonl(&output_path, &records)?;
    render_output(args.format, &records)?;
    println!("artifact: {}", output_path.display());

    Ok(())
}

fn report_command(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records_jsonl(&args.input)?;
    render_output(args.format, &records)?;
    Ok(())
}

fn resolve_cases(scenario: Scenario, args: &RunArgs) -> Vec<CaseConfig> {
    match scenario {
        Scenario::Sudoku => vec![CaseConfig {
            name: "classic_9x9".to_string(),
            variables: 9 * 9 * 9,
        }],
        Scenario::DenseBuild => args
            .cases
            .clone()
            .unwrap_or_else(|| DEFAULT_DENSE_CASES.to_vec())
            .into_iter()
            .map(|variables| CaseConfig {
                name: format!("vars_{}", variables),
                variables,
            })
            .collect(),
    }
}

/// A few fixed cells so the batch build exercises the builder chain.
const SUDOKU_GIVENS: [(usize, usize, usize); 4] = [(0, 0, 5), (0, 1, 3), (4, 4, 7), (8, 8, 9)];

fn execute_sudoku(render_lp: bool) -> CaseExecution {
    let mut model = Model::new();
    let mut stages = Vec::new();
    let total_started = Instant::now();

    let stage_started = Instant::now();
    // one binary per (row, col, value), value in 1..=9
    let cells = model
        .add_variables_indexed(
            9 * 9 * 9,
            VariableParams::binary(),
            |&(i, j, v): &(usize, usize, usize)| 81 * i + 9 * j + (v - 1),
        )
        .expect("binary bounds are always valid");
    stages.push(StageMeasurement {
        stage: "variables".to_string(),
        duration: stage_started.elapsed(),
    });

    let stage_started = Instant::now();
    // given cells pin their value; every other cell gets the one-value row
    let pinned = |key: &(usize, usize)| {
        SUDOKU_GIVENS
            .iter()
            .find(|(i, j, _)| (*i, *j) == *key)
            .map(|given| LinearExpr::var(cells.key(given)).eq_scalar(1.0))
    };
    let one_value = |&(i, j): &(usize, usize)| {
        Some(sum((1..=9).map(|v| LinearExpr::var(cells.key(&(i, j, v))))).eq_scalar(1.0))
    };
    let cell_keys = (0..9).flat_map(|i| (0..9).map(move |j| (i, j)));
    model
        .add_constraints(cell_keys, &[&pinned, &one_value])
        .expect("every cell key matches the fallback builder");
    stages.push(StageMeasurement {
        stage: "cell_rows".to_string(),
        duration: stage_started.elapsed(),
    });

    let stage_started = Instant::now();
    // value appears once per row, column, and box
    model.add_constraint_range(81, |k| {
        let (i, v) = (k / 9, k % 9 + 1);
        sum((0..9).map(|j| LinearExpr::var(cells.key(&(i, j, v))))).eq_scalar(1.0)
    });
    model.add_constraint_range(81, |k| {
        let (j, v) = (k / 9, k % 9 + 1);
        sum((0..9).map(|i| LinearExpr::var(cells.key(&(i, j, v))))).eq_scalar(1.0)
    });
    model.add_constraint_range(81, |k| {
        let (b, v) = (k / 9, k % 9 + 1);
        let (bi, bj) = (3 * (b / 3), 3 * (b % 3));
        sum((0..9).map(|c| LinearExpr::var(cells.key(&(bi + c / 3, bj + c % 3, v)))))
            .eq_scalar(1.0)
    });
    stages.push(StageMeasurement {
        stage: "group_rows".to_string(),
        duration: stage_started.elapsed(),
    });

    let stage_started = Instant::now();
    model.set_objective(cells.total());
    stages.push(StageMeasurement {
        stage: "objective".to_string(),
        duration: stage_started.elapsed(),
    });

    stages.push(StageMeasurement {
        stage: "total".to_string(),
        duration: total_started.elapsed(),
    });

    CaseExecution {
        variables: model.num_variables(),
        constraints: model.num_constraints(),
        entries: model.num_entries(),
        stage_measurements: stages,
        rendered_lp: render_lp.then(|| model.to_string()),
    }
}

fn execute_dense_build(variable_count: usize) -> CaseExecution {
    let mut model = Model::new();
    let mut stages = Vec::new();
    let total_started = Instant::now();

    let stage_started = Instant::now();
    let vars = model
        .add_variables(
            variable_count,
            VariableParams::default().with_upper_bound(1_000.0),
        )
        .expect("bounds are valid");
    stages.push(StageMeasurement {
        stage: "variables".to_string(),
        duration: stage_started.elapsed(),
    });

    let stage_started = Instant::now();
    // each row repeats its lead variable so the coalescer has work to do
    model.add_constraint_range(variable_count, |i| {
        let lead = vars.get(i);
        let next = vars.get((i + 1) % variable_count);
        (LinearExpr::term(lead, 3.0) - LinearExpr::var(lead) + LinearExpr::var(next))
            .le_scalar(10.0)
    });
    stages.push(StageMeasurement {
        stage: "constraints".to_string(),
        duration: stage_started.elapsed(),
    });

    let stage_started = Instant::now();
    model.set_objective(vars.total());
    model.add_objective(vars.total() * 0.5);
    stages.push(StageMeasurement {
        stage: "objective".to_string(),
        duration: stage_started.elapsed(),
    });

    stages.push(StageMeasurement {
        stage: "total".to_string(),
        duration: total_started.elapsed(),
    });

    CaseExecution {
        variables: model.num_variables(),
        constraints: model.num_constraints(),
        entries: model.num_entries(),
        stage_measurements: stages,
        rendered_lp: None,
    }
}

fn case_records(
    run_id: &str,
    scenario: Scenario,
    case_name: &str,
    repetition: u32,
    execution: &CaseExecution,
) -> Vec<BenchRecord> {
    execution
        .stage_measurements
        .iter()
        .map(|measurement| BenchRecord {
            schema_version: SCHEMA_VERSION,
            run_id: run_id.to_string(),
            scenario: scenario.as_str().to_string(),
            case_name: case_name.to_string(),
            repetition,
            variables: execution.variables,
            constraints: execution.constraints,
            entries: execution.entries,
            stage: measurement.stage.clone(),
            duration_ms: measurement.duration.as_secs_f64() * 1000.0,
        })
        .collect()
}

fn render_output(
    format: OutputFormat,
    records: &[BenchRecord],
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Table => {
            let rows = summarize_records(records);
            print_summary_table(&rows);
            Ok(())
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records)?);
            Ok(())
        }
        OutputFormat::Ndjson => {
            for record in records {
                println!("{}", serde_json::to_string(record)?);
            }
            Ok(())
        }
    }
}

fn summarize_records(records: &[BenchRecord]) -> Vec<SummaryRow> {
    #[derive(Default)]
    struct Acc {
        samples: usize,
        duration_sum: f64,
        duration_max: f64,
    }

    let mut groups: BTreeMap<SummaryKey, Acc> = BTreeMap::new();
    for record in records {
        let key = SummaryKey {
            scenario: record.scenario.clone(),
            case_name: record.case_name.clone(),
            stage: record.stage.clone(),
        };
        let entry = groups.entry(key).or_default();
        entry.samples += 1;
        entry.duration_sum += record.duration_ms;
        if record.duration_ms > entry.duration_max {
            entry.duration_max = record.duration_ms;
        }
    }

    groups
        .into_iter()
        .map(|(key, acc)| SummaryRow {
            scenario: key.scenario,
            case_name: key.case_name,
            stage: key.stage,
            samples: acc.samples,
            mean_duration_ms: if acc.samples == 0 {
                0.0
            } else {
                acc.duration_sum / acc.samples as f64
            },
            max_duration_ms: acc.duration_max,
        })
        .collect()
}

fn print_summary_table(rows: &[SummaryRow]) {
    println!(
        "{:<12} {:<16} {:<12} {:>7} {:>12} {:>12}",
        "scenario", "case", "stage", "samples", "mean_ms", "max_ms"
    );
    for row in rows {
        println!(
            "{:<12} {:<16} {:<12} {:>7} {:>12.3} {:>12.3}",
            row.scenario,
            row.case_name,
            row.stage,
            row.samples,
            row.mean_duration_ms,
            row.max_duration_ms,
        );
    }
}

fn write_records_jsonl(
    path: &Path,
    records: &[BenchRecord],
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

fn load_records_jsonl(path: &Path) -> Result<Vec<BenchRecord>, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str::<BenchRecord>(&line)?);
    }
    Ok(records)
}

fn build_run_id() -> Result<String, Box<dyn std::error::Error>> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| std::io::Error::other(err.to_string()))?
        .as_millis();
    Ok(format!("bench_{}", millis))
}

fn boxed_input_error(message: &str) -> Box<dyn std::error::Error> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        message.to_string(),
    ))
}
