use brief::{
    runtime::{
        built_ins::new_interpreter,
        config::Config,
        data_structures::value::Value,
        error::{self, ScriptError},
        host::{Host, StdHost},
        interpreter::{CodeManagement, Interpreter, InterpreterStack, with_evaluation_stack},
    },
    session::{EditCommand, Session, SessionError},
};
use lazy_static::lazy_static;
use std::{
    collections::HashMap,
    env::args,
    fs::read_to_string,
    io::{BufRead, stdin},
    rc::Rc,
};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, in `tracing_subscriber` `EnvFilter` syntax.
const LOG_VAR: &str = "BRIEF_LOG";

/// The handler for one editor command, given the text after the command's name.
type CommandHandler = fn(&mut Session, &str) -> Result<(), SessionError>;

struct Command {
    handler: CommandHandler,
    help: &'static str,
}

/// Apply a command that takes no argument.
fn edit(session: &mut Session, command: EditCommand) -> Result<(), SessionError> {
    let _ = session.apply(command);
    Ok(())
}

fn command(handler: CommandHandler, help: &'static str) -> Command {
    Command { handler, help }
}

lazy_static! {
    // The commands the editor script understands, one per line, the name first.
    static ref COMMANDS: HashMap<&'static str, Command> = {
        let mut commands = HashMap::new();

        commands.insert("left", command(|session, _| edit(session, EditCommand::MovePrev {
            step_in: false, step_out: true, select: false }), "Move back, stepping out of lists."));
        commands.insert("right", command(|session, _| edit(session, EditCommand::MoveNext {
            step_in: false, step_out: true, select: false }), "Move forward, stepping out of lists."));
        commands.insert("left-in", command(|session, _| edit(session, EditCommand::MovePrev {
            step_in: true, step_out: true, select: false }), "Move back, stepping into lists."));
        commands.insert("right-in", command(|session, _| edit(session, EditCommand::MoveNext {
            step_in: true, step_out: true, select: false }), "Move forward, stepping into lists."));
        commands.insert("select-left", command(|session, _| edit(session, EditCommand::MovePrev {
            step_in: false, step_out: false, select: true }), "Extend the selection back."));
        commands.insert("select-right", command(|session, _| edit(session, EditCommand::MoveNext {
            step_in: false, step_out: false, select: true }), "Extend the selection forward."));
        commands.insert("first", command(|session, _| edit(session,
            EditCommand::MoveFirst { select: false }), "Move to the front of the list."));
        commands.insert("last", command(|session, _| edit(session,
            EditCommand::MoveLast { select: false }), "Move to the end of the list."));
        commands.insert("word", command(|session, name| edit(session,
            EditCommand::InsertWord(name.to_string())), "Insert a word: word <name>"));
        commands.insert("list", command(|session, _| edit(session, EditCommand::InsertList),
            "Open a new list."));
        commands.insert("close", command(|session, _| edit(session, EditCommand::CloseList),
            "Step out of the list being typed."));
        commands.insert("type", command(|session, source| edit(session,
            EditCommand::InsertSource(source.to_string())), "Insert source text: type <code>"));
        commands.insert("backspace", command(|session, _| edit(session, EditCommand::DeletePrev {
            step_in: false, step_out: false }), "Delete backwards."));
        commands.insert("delete", command(|session, _| edit(session, EditCommand::DeleteNext {
            step_in: false, step_out: false }), "Delete forwards."));
        commands.insert("select-all", command(|session, _| edit(session, EditCommand::SelectAll),
            "Select the whole program."));
        commands.insert("select-none", command(|session, _| edit(session, EditCommand::SelectNone),
            "Drop the selection."));
        commands.insert("quote", command(|session, _| edit(session, EditCommand::Quote),
            "Wrap the selection in a list."));
        commands.insert("unquote", command(|session, _| edit(session, EditCommand::Unquote),
            "Replace the list under the cursor with its contents."));
        commands.insert("define", command(|session, name| session.define_selection(name, false),
            "Make the selection a new word: define <name>"));
        commands.insert("redefine", command(|session, name| session.define_selection(name, true),
            "Make the selection a word, replacing any existing one: redefine <name>"));

        commands
    };
}

/// Print the stack, top first, one value per line.
fn print_stack(stack: &[Value]) {
    for value in stack {
        println!("  {:?}", value);
    }
}

fn print_help() {
    let mut names: Vec<&&str> = COMMANDS.keys().collect();

    names.sort();

    for name in names {
        if let Some(command) = COMMANDS.get(*name) {
            println!("{:>14}  {}", name, command.help);
        }
    }
}

/// Drive a session from editor commands, one per line, printing the code and stack after each.
fn run_editor(config: Config, host: Rc<dyn Host>, script: Option<&String>) -> error::Result<()> {
    let mut session = Session::new(config, host)?;

    let lines: Vec<String> = match script {
        Some(path) => read_to_string(path)?.lines().map(str::to_string).collect(),
        None => stdin().lock().lines().collect::<Result<_, _>>()?,
    };

    for line in lines {
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        let (name, argument) = line.split_once(' ').unwrap_or((line, ""));

        match name {
            "help" => {
                print_help();
                continue;
            }

            "words" => {
                print!("{}", session.interpreter().dictionary());
                continue;
            }

            _ => (),
        }

        match COMMANDS.get(name) {
            Some(command) => {
                if let Err(error) = (command.handler)(&mut session, argument.trim()) {
                    eprintln!("{}", error);
                }
            }

            None => {
                eprintln!("Unknown command '{}', try help.", name);
                continue;
            }
        }

        let evaluation = session.evaluation();

        println!("{}", session.render());
        print_stack(&evaluation.stack);

        for diagnostic in &evaluation.diagnostics {
            eprintln!("{}", diagnostic);
        }

        if let Some(error) = &evaluation.error {
            eprintln!("{}", error);
        }
    }

    Ok(())
}

/// Run a source file and print the resulting stack.
fn run_file(config: Config, host: Rc<dyn Host>, path: &str) -> error::Result<()> {
    let mut interpreter = new_interpreter(config, host)?;
    let source = read_to_string(path)?;

    interpreter.process_source(path, &source)?;

    for diagnostic in interpreter.take_diagnostics() {
        eprintln!("{}", diagnostic);
    }

    print_stack(&interpreter.stack_top_first());

    Ok(())
}

/// Pick the mode from the command line.  Runs on the evaluation thread.
fn run(config: Config, args: Vec<String>) -> error::Result<()> {
    let host: Rc<dyn Host> = Rc::new(StdHost::new(config.search_paths.clone()));

    match args.get(1).map(String::as_str) {
        Some("--edit") => run_editor(config, host, args.get(2)),
        Some(path) => run_file(config, host, path),
        None => ScriptError::new_as_result(
            None,
            error::ErrorKind::Message("Usage: brief <file> | brief --edit [script]".to_string()),
            None,
        ),
    }
}

fn main() -> error::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let stack_size = config.stack_size;
    let args: Vec<String> = args().collect();

    with_evaluation_stack(stack_size, move || run(config, args))?
}
