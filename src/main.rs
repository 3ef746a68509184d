use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use hdlight::config::Config;
use hdlight::highlight::HighlightEngine;
use hdlight::preproc::{DefineTable, IncludeResolver};
use hdlight::utils;

const HELP: &str = "\
hdlight - A lightweight Verilog/SystemVerilog syntax highlighter

USAGE:
  hdlight [OPTIONS] FILE

ARGS:
  FILE                 Verilog source file (.v .vh .sv .svh)

OPTIONS:
  -t, --theme NAME     Color theme (default: eighties)
      --list-themes    List built-in themes and exit
      --color256       Force 256-color output
  -n, --line-numbers   Show line numbers
  -p, --preprocess     Evaluate `ifdef conditions with a macro table
  -D, --define NAME    Predefine a macro (repeatable)
  -I, --incdir DIR     Add an `include search directory (repeatable)
      --spans-json     Print classified spans as JSON instead of ANSI
      --debug          Enable debug logging
  -h, --help           Print help
";

#[derive(Debug)]
struct Args {
    config: Config,
    list_themes: bool,
    spans_json: bool,
    debug: bool,
    file: Option<PathBuf>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let mut config = Config::new();
    if let Some(theme) = pargs.opt_value_from_str(["-t", "--theme"])? {
        config.theme = theme;
    }
    if pargs.contains("--color256") {
        config.true_color = false;
    }
    config.line_numbers = pargs.contains(["-n", "--line-numbers"]);
    config.preprocess = pargs.contains(["-p", "--preprocess"]);
    config.defines = pargs.values_from_str(["-D", "--define"])?;
    config.incdirs = pargs.values_from_str(["-I", "--incdir"])?;

    let args = Args {
        config,
        list_themes: pargs.contains("--list-themes"),
        spans_json: pargs.contains("--spans-json"),
        debug: pargs.contains("--debug"),
        file: pargs.opt_free_from_str()?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        eprintln!("Warning: unused arguments: {:?}", remaining);
    }

    Ok(args)
}

fn main() -> Result<()> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("Error: {err}.");
            eprint!("{HELP}");
            std::process::exit(2);
        }
    };

    // 初始化日誌
    utils::init_logger(args.debug);

    if args.list_themes {
        for name in HighlightEngine::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    let file = match args.file {
        Some(file) => file,
        None => {
            eprintln!("Error: missing FILE argument.");
            eprint!("{HELP}");
            std::process::exit(2);
        }
    };

    run(&file, &args.config, args.spans_json)
}

fn run(file: &Path, config: &Config, spans_json: bool) -> Result<()> {
    let content = utils::read_to_string_lossy(file)?;

    let mut engine = HighlightEngine::new(Some(&config.theme), config.true_color)
        .context("Failed to create highlight engine")?;
    engine.set_file(Some(file));

    if config.preprocess {
        // 求值模式：-D 預定義 + 先遞迴收集 `include 的巨集，
        // 再開始高亮掃描（巨集可見性以檔案為單位近似）
        let mut table = DefineTable::with_names(config.defines.iter().cloned());
        let resolver = IncludeResolver::new(config.incdirs.clone());
        resolver.harvest(file, &mut table);
        engine.enable_preprocessor(table);
    }

    if spans_json {
        return print_spans(&engine, &content);
    }

    let mut highlighter = engine.create_highlighter();
    let total = content.lines().count();
    let width = total.max(1).to_string().len();

    for (idx, line) in content.lines().enumerate() {
        let highlighted = highlighter.highlight_line(line);
        if config.line_numbers {
            println!("{:>width$} | {}", idx + 1, highlighted);
        } else {
            println!("{highlighted}");
        }
    }

    Ok(())
}

#[cfg(feature = "json-spans")]
fn print_spans(engine: &HighlightEngine, content: &str) -> Result<()> {
    let records = hdlight::spans::collect(engine, content);
    println!("{}", hdlight::spans::to_json(&records)?);
    Ok(())
}

#[cfg(not(feature = "json-spans"))]
fn print_spans(_engine: &HighlightEngine, _content: &str) -> Result<()> {
    anyhow::bail!("this build does not include the `json-spans` feature")
}
