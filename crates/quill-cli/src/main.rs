use std::{
    env,
    io::{self, BufRead, Write as _},
    process::ExitCode,
    time::Instant,
};

use quill::{Engine, ReplSession, StdPrint, run_source};

const PROMPT: &str = ">> ";

/// The fixed benchmark program: naive recursive Fibonacci.
const BENCHMARK_PROGRAM: &str = "\
let fibonacci = fn(x) {
  if (x == 0) { 0 } else {
    if (x == 1) { 1 } else {
      fibonacci(x - 1) + fibonacci(x - 2)
    }
  }
};
fibonacci(35);
";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let engine_flag = args.iter().find_map(|arg| arg.strip_prefix("--engine="));
    match engine_flag {
        Some(name) => match name.parse::<Engine>() {
            Ok(engine) => benchmark(engine),
            Err(_) => {
                eprintln!("unknown engine {name:?}: expected vm or eval");
                ExitCode::FAILURE
            }
        },
        None => repl(),
    }
}

fn benchmark(engine: Engine) -> ExitCode {
    let start = Instant::now();
    match run_source(BENCHMARK_PROGRAM, engine, &mut StdPrint) {
        Ok(result) => {
            let duration = start.elapsed();
            println!("engine={engine}, result={result}, duration={duration:?}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn repl() -> ExitCode {
    let mut session = ReplSession::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{PROMPT}");
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }
        let Some(line) = lines.next() else {
            return ExitCode::SUCCESS;
        };
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("error reading input: {err}");
                return ExitCode::FAILURE;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match session.execute(&line, &mut StdPrint) {
            Ok(value) => println!("{value}"),
            Err(err) => eprintln!("{err}"),
        }
    }
}
