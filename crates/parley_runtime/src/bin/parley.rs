//! Parley CLI entry point.

use parley_debug::ObservabilityConfig;
use parley_engine::Engine;
use parley_plugin::PluginHost;
use parley_runtime::{Processor, ProcessorConfig, Repl, ShellPlugin};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    scripts: Vec<PathBuf>,
    batch_mode: bool,
    show_help: bool,
    show_version: bool,
    no_banner: bool,
    no_indicatives: bool,
    no_imperatives: bool,
    no_interrogatives: bool,
    load: Option<PathBuf>,
    save: Option<PathBuf>,
    // Debug flags
    trace: bool,
    trace_json: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => config.batch_mode = true,
            "--no-banner" => config.no_banner = true,
            "--no-indicatives" => config.no_indicatives = true,
            "--no-imperatives" => config.no_imperatives = true,
            "--no-interrogatives" => config.no_interrogatives = true,
            "--trace" => config.trace = true,
            "--trace-json" => {
                config.trace = true;
                config.trace_json = true;
            }
            flag @ ("--load" | "--save") => {
                i += 1;
                let Some(path) = args.get(i) else {
                    return Err(format!("{flag} requires a file").into());
                };
                let path = Some(PathBuf::from(path));
                if flag == "--load" {
                    config.load = path;
                } else {
                    config.save = path;
                }
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            path => config.scripts.push(PathBuf::from(path)),
        }
        i += 1;
    }

    if config.batch_mode && config.scripts.is_empty() {
        return Err("--batch requires at least one script".into());
    }
    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("parley {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let engine = Engine::pattern();
    engine.start()?;
    let result = converse(&engine, &config);
    engine.stop()?;
    result
}

fn converse(engine: &Engine, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let observability = if config.trace {
        ObservabilityConfig::development().with_json_output(config.trace_json)
    } else {
        ObservabilityConfig::default()
    };
    let processor_config = ProcessorConfig::new()
        .with_indicatives(!config.no_indicatives)
        .with_imperatives(!config.no_imperatives)
        .with_interrogatives(!config.no_interrogatives)
        .with_observability(&observability);

    let mut processor = Processor::with_plugins_and_config(
        engine,
        vec![PluginHost::boxed(ShellPlugin::new())],
        processor_config,
    )?;
    processor.finish_setup()?;
    if let Some(path) = &config.load {
        processor.load_world(path)?;
    }

    let mut repl = Repl::new(processor)?;
    if config.no_banner || !config.scripts.is_empty() {
        repl = repl.without_banner();
    }

    for script in &config.scripts {
        repl.eval_file(script)?;
    }
    if !config.batch_mode {
        repl.run()?;
    }

    let mut processor = repl.into_processor();
    if let Some(path) = &config.save {
        processor.save_world(path)?;
    }
    processor.shutdown()?;
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mParley\x1b[0m - Talk to a program in English

\x1b[1mUSAGE:\x1b[0m
    parley [OPTIONS] [SCRIPTS...]

\x1b[1mARGUMENTS:\x1b[0m
    [SCRIPTS...]    Files of utterances to run before starting the REPL

\x1b[1mOPTIONS:\x1b[0m
    -h, --help            Print help information
    -V, --version         Print version information
    -b, --batch           Run scripts and exit (no REPL)
    --no-banner           Skip the welcome banner
    --no-indicatives      Reject statements
    --no-imperatives      Reject commands
    --no-interrogatives   Reject questions
    --load FILE           Start from a saved world
    --save FILE           Save the world on exit

\x1b[1mDEBUG OPTIONS:\x1b[0m
    --trace               Echo trace records to stderr
    --trace-json          Echo trace records as JSON

\x1b[1mEXAMPLES:\x1b[0m
    parley                           Start interactive REPL
    parley -b setup.txt              Run setup.txt and exit
    parley --load world.mp           Continue a saved session
    parley --trace -b setup.txt      Run with tracing

\x1b[1mREPL COMMANDS:\x1b[0m
    :help                Show all meta-commands
    :world               Dump the world model
    :describe            Show the world as events
    :save FILE           Save a world snapshot
    Ctrl+D               Exit REPL
    Ctrl+C               Cancel current input"
    );
}
