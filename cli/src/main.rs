use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use argh::FromArgs;
use lince::{module, Interpreter};
use miette::Result;
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

#[derive(FromArgs)]
/// Lince expression-language REPL
struct Args {
    #[argh(positional)]
    path: Option<PathBuf>,

    #[argh(option, description = "evaluate the given source and exit", short = 'c')]
    code: Option<String>,
}

struct ReplHelper {
    interp: Rc<RefCell<Interpreter>>,
}

impl Completer for ReplHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let start = line[..pos]
            .rfind(|c: char| !c.is_ascii_alphanumeric())
            .map_or(0, |i| i + 1);
        let prefix = &line[start..pos];
        if prefix.is_empty() {
            return Ok((pos, Vec::new()));
        }
        let names = self.interp.borrow().completions(prefix);
        Ok((start, names.into_iter().collect()))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;
}

impl Highlighter for ReplHelper {}
impl Validator for ReplHelper {}
impl Helper for ReplHelper {}

fn main() -> Result<()> {
    env_logger::init();
    let args: Args = argh::from_env();

    let interp = Rc::new(RefCell::new(Interpreter::new()));
    interp.borrow_mut().add_module(module::prelude());

    if let Some(path) = args.path {
        let source = std::fs::read_to_string(path).map_err(|e| miette::miette!(e.to_string()))?;
        return run_script(&interp, &source);
    }
    if let Some(code) = args.code {
        return run_script(&interp, &code);
    }

    repl(interp)
}

fn run_script(interp: &Rc<RefCell<Interpreter>>, source: &str) -> Result<()> {
    for line in source.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let value = interp
            .borrow_mut()
            .eval_line(line)
            .map_err(|e| miette::miette!(e.to_string()))?;
        println!("{value}");
    }
    Ok(())
}

fn repl(interp: Rc<RefCell<Interpreter>>) -> Result<()> {
    let mut rl: Editor<ReplHelper, DefaultHistory> =
        Editor::new().map_err(|e| miette::miette!(e.to_string()))?;
    rl.set_helper(Some(ReplHelper {
        interp: Rc::clone(&interp),
    }));

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                if line.trim().is_empty() {
                    continue;
                }
                match interp.borrow_mut().eval_line(&line) {
                    Ok(value) => println!("{value}"),
                    Err(e) => println!("Error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                println!("Error: {e:?}");
                break;
            }
        }
    }

    Ok(())
}
