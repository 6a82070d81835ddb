use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use graph_verify::config::{
    default_ignored_predicates, parse_prefix_binding, GraphLoadOptions, InputFormat, OutputFormat,
    DEFAULT_BASE_URI,
};
use graph_verify::emitter::ntriples::NTriplesEmitter;
use graph_verify::emitter::turtle::TurtleEmitter;
use graph_verify::emitter::TriplesEmitter;
use graph_verify::graph::loader::load_graph;
use graph_verify::logging;
use graph_verify::model::iri::{IriMinter, PrefixMap};
use graph_verify::report::{rdf, render, Report};
use graph_verify::schema::loader::load_schema;
use graph_verify::Validator;

/// Validate a knowledge graph against an ontology schema.
#[derive(Parser)]
#[command(name = "graph-verify", version, about)]
struct Cli {
    /// Path to the data graph (.json, .nt or .jsonl).
    graph: PathBuf,

    /// Path to the schema (.json or RDFS/OWL .nt).
    #[arg(short, long, value_name = "FILE")]
    schema: PathBuf,

    /// Schema format.
    #[arg(long, value_enum, value_name = "FORMAT", default_value_t = InputFormat::Auto)]
    schema_format: InputFormat,

    /// Graph format.
    #[arg(long, value_enum, value_name = "FORMAT", default_value_t = InputFormat::Auto)]
    graph_format: InputFormat,

    /// Report format.
    #[arg(short, long, value_enum, value_name = "FORMAT", default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Output file path [default: stdout].
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Base IRI for entities known only by name, and for report nodes.
    #[arg(short, long, value_name = "URI", default_value = DEFAULT_BASE_URI)]
    base_uri: String,

    /// Extra namespace prefix, e.g. `ex=http://example.org/` (repeatable).
    #[arg(long = "prefix", value_name = "PREFIX=IRI", value_parser = parse_prefix_binding)]
    prefixes: Vec<(String, String)>,

    /// Skip edges with this predicate IRI when reading N-Triples (repeatable).
    #[arg(long = "ignore-property", value_name = "IRI")]
    ignore_properties: Vec<String>,

    /// Validate rdfs:label, rdfs:comment, rdfs:seeAlso and owl:sameAs edges too.
    #[arg(long)]
    keep_annotations: bool,

    /// Exit non-zero on warnings as well as errors.
    #[arg(long)]
    strict: bool,

    /// Verbose logging (repeat for more).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn prefix_map(&self) -> PrefixMap {
        let mut prefixes = PrefixMap::standard();
        for (prefix, ns) in &self.prefixes {
            prefixes.insert(prefix, ns);
        }
        prefixes
    }

    fn graph_options(&self) -> GraphLoadOptions {
        let mut ignored = if self.keep_annotations {
            Default::default()
        } else {
            default_ignored_predicates()
        };
        ignored.extend(self.ignore_properties.iter().cloned());
        GraphLoadOptions {
            base_uri: self.base_uri.clone(),
            prefixes: self.prefix_map(),
            ignored_predicates: ignored,
            ..GraphLoadOptions::default()
        }
    }
}

/// Outcome of a completed run, mapped to the process exit code.
enum Outcome {
    Conforms,
    Violations,
}

fn run(cli: &Cli) -> anyhow::Result<Outcome> {
    let schema = load_schema(&cli.schema, cli.schema_format)
        .with_context(|| format!("loading schema from {}", cli.schema.display()))?;
    let graph = load_graph(&cli.graph, cli.graph_format, &cli.graph_options())
        .with_context(|| format!("loading graph from {}", cli.graph.display()))?;

    let report = Validator::new(&schema).validate(&graph);
    info!("{}", render::render_summary(&report));

    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    write_report(cli, &report, writer).context("writing report")?;

    let failed = report.has_errors() || (cli.strict && report.has_warnings());
    Ok(if failed {
        Outcome::Violations
    } else {
        Outcome::Conforms
    })
}

fn write_report(cli: &Cli, report: &Report, mut writer: Box<dyn Write>) -> anyhow::Result<()> {
    let prefixes = cli.prefix_map();
    match cli.format {
        OutputFormat::Text => {
            writer.write_all(report.render_with(&prefixes).as_bytes())?;
            writer.flush()?;
        }
        OutputFormat::Json => {
            writeln!(writer, "{}", render::render_json(report)?)?;
            writer.flush()?;
        }
        OutputFormat::NTriples => {
            let mut emitter = NTriplesEmitter::new(writer);
            rdf::write_report(report, &mut emitter, &IriMinter::new(&cli.base_uri), &prefixes)?;
            emitter.flush()?;
        }
        OutputFormat::Turtle => {
            let mut emitter = TurtleEmitter::new(writer);
            rdf::write_report(report, &mut emitter, &IriMinter::new(&cli.base_uri), &prefixes)?;
            emitter.flush()?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);
    match run(&cli) {
        Ok(Outcome::Conforms) => ExitCode::SUCCESS,
        Ok(Outcome::Violations) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}
