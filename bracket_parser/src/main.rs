use bracket_parser::config::RuntimeConfig;
use bracket_parser::pipeline::{self, PipelineError, PipelineOutput, PipelineResult};
use bracket_parser::{batch, grammar, logging};
use std::env;
use std::path::{Path, PathBuf};

const EXIT_ACCEPTED: i32 = 0;
const EXIT_REJECTED: i32 = 1;
const EXIT_USAGE: i32 = 2;

#[derive(Debug, Default, PartialEq, Eq)]
struct CliOptions {
    paths: Vec<PathBuf>,
    json: bool,
    fail_fast: bool,
    recursive: bool,
    extension: Option<String>,
    max_files: Option<usize>,
    trace: bool,
    grammar: bool,
    config_path: Option<PathBuf>,
    quiet: bool,
    help: bool,
}

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("bracket_parser");

    let options = match parse_cli_options(args.get(1..).unwrap_or(&[])) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: {} [OPTIONS] <PATH>...", program);
            eprintln!("       {} --help", program);
            return EXIT_USAGE;
        }
    };

    if options.help {
        print_help(program);
        return EXIT_ACCEPTED;
    }

    let runtime = match load_runtime_config(&options) {
        Ok(runtime) => runtime,
        Err(message) => {
            eprintln!("Error: {}", message);
            return EXIT_USAGE;
        }
    };

    if let Err(message) = startup(&runtime) {
        eprintln!("Error: {}", message);
        return EXIT_USAGE;
    }

    if options.grammar {
        println!("{}", grammar::describe_grammar());
        return EXIT_ACCEPTED;
    }

    if options.paths.is_empty() {
        eprintln!("Error: no input paths given");
        eprintln!("Usage: {} [OPTIONS] <PATH>...", program);
        return EXIT_USAGE;
    }

    let batch_config = batch::BatchConfig {
        recursive: options.recursive,
        max_files: options.max_files,
        progress_reporting: false,
        fail_fast: options.fail_fast,
        extension_filter: options.extension.clone(),
    };

    let files = match batch::collect_inputs(&options.paths, &batch_config) {
        Ok(files) => files,
        Err(error) => {
            eprintln!("Error: {}", error);
            return EXIT_USAGE;
        }
    };

    let mut outputs = Vec::new();
    let results = batch::process_files(&files, &batch_config, &runtime, |path, outcome| {
        if options.json {
            outputs.push(PipelineOutput::new(&path.display().to_string(), outcome));
        } else {
            print_report(path, outcome, options.trace);
        }
    });

    if options.json {
        match pipeline::outputs_to_json(&outputs) {
            Ok(json) => println!("{}", json),
            Err(error) => {
                eprintln!("Error: cannot serialise results: {}", error);
                return EXIT_USAGE;
            }
        }
    }

    if !options.quiet {
        eprintln!("{}", results.summary());
    }
    if runtime.logging.enable_cargo_style_output {
        logging::print_cargo_style_summary();
    }

    if results.all_succeeded() {
        EXIT_ACCEPTED
    } else {
        EXIT_REJECTED
    }
}

fn load_runtime_config(options: &CliOptions) -> Result<RuntimeConfig, String> {
    let mut runtime = match &options.config_path {
        Some(path) => RuntimeConfig::load(path).map_err(|e| e.to_string())?,
        None => RuntimeConfig::from_env(),
    };

    if options.trace {
        runtime.parser.record_trace = true;
    }

    Ok(runtime)
}

fn startup(runtime: &RuntimeConfig) -> Result<(), String> {
    logging::config::init_runtime_preferences(runtime.logging.clone())?;
    logging::init_global_logging()?;
    pipeline::validate_pipeline()
}

fn print_report(path: &Path, outcome: &Result<PipelineResult, PipelineError>, show_trace: bool) {
    for line in report_lines(path, outcome, show_trace) {
        println!("{}", line);
    }
}

/// `Current file:` header, the outcome lines, optional trace, then a blank separator
fn report_lines(
    path: &Path,
    outcome: &Result<PipelineResult, PipelineError>,
    show_trace: bool,
) -> Vec<String> {
    let mut lines = vec![format!("Current file: {}", path.display())];

    let trace = match outcome {
        Ok(result) => {
            lines.extend(result.report_lines());
            result.trace.as_ref()
        }
        Err(error) => {
            lines.push(error.report_line());
            if show_trace {
                lines.extend(error.snippet().into_iter().flat_map(str::lines).map(String::from));
            }
            error.trace()
        }
    };

    if show_trace {
        if let Some(trace) = trace {
            lines.push("Derivation trace:".to_string());
            lines.extend(trace.render().lines().map(String::from));
        }
    }

    lines.push(String::new());
    lines
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => options.help = true,
            "--json" => options.json = true,
            "--fail-fast" => options.fail_fast = true,
            "--recursive" | "-r" => options.recursive = true,
            "--trace" => options.trace = true,
            "--grammar" => options.grammar = true,
            "--quiet" | "-q" => options.quiet = true,
            "--ext" => {
                let value = option_value(args, i, "--ext")?;
                let ext = value.trim_start_matches('.');
                if ext.is_empty() {
                    return Err("--ext requires a non-empty extension".to_string());
                }
                options.extension = Some(ext.to_string());
                i += 1;
            }
            "--max-files" => {
                let value = option_value(args, i, "--max-files")?;
                let max = value
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| format!("Invalid max files '{}'", value))?;
                options.max_files = Some(max);
                i += 1;
            }
            "--config" => {
                options.config_path = Some(PathBuf::from(option_value(args, i, "--config")?));
                i += 1;
            }
            "--" => {
                options.paths.extend(args[i + 1..].iter().map(PathBuf::from));
                break;
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("Unknown option '{}'", flag));
            }
            path => options.paths.push(PathBuf::from(path)),
        }
        i += 1;
    }

    Ok(options)
}

fn option_value<'a>(args: &'a [String], i: usize, name: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires a value", name))
}

fn print_help(program_name: &str) {
    println!("bracket_parser v{}", env!("CARGO_PKG_VERSION"));
    println!("Table-driven LL(1) check that (), [] and {{}} are balanced and properly nested");
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] <PATH>...", program_name);
    println!();
    println!("ARGUMENTS:");
    println!("    <PATH>    Input file, or a directory whose files are all checked");
    println!();
    println!("OPTIONS:");
    println!("    --json              Print one JSON document with every result");
    println!("    --fail-fast         Stop after the first rejected file");
    println!("    -r, --recursive     Descend into subdirectories");
    println!("    --ext EXT           Only take files with this extension from directories");
    println!("    --max-files N       Refuse to run on more than N files");
    println!("    --trace             Print the derivation steps, and point at the error");
    println!("    --grammar           Print the rules and parse table, then exit");
    println!("    --config FILE       Load runtime preferences from a TOML file");
    println!("    -q, --quiet         Do not print the batch summary");
    println!("    -h, --help          Show this help message");
    println!();
    println!("OUTPUT:");
    println!("    Each file prints 'Current file: <path>' followed by either");
    println!("      Input accepted with no errors");
    println!("      Total number of brackets: <N>");
    println!("      Brackets are present in lines: [<line>, ...]");
    println!("    or");
    println!("      Syntax error: can't find matching bracket for <b> on line <L> (scope level: <D>)");
    println!();
    println!("EXIT STATUS:");
    println!("    0 all files accepted, 1 some file rejected, 2 usage or startup error");
    println!();
    println!("CONFIGURATION:");
    println!("    Build limits: {}", bracket_parser::config::build_info::source_info());
    println!();
    println!("{}", logging::config::get_config_summary());
}
