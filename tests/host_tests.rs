// Host tests: the desktop host finds `use`d code on disk.

use brief::runtime::built_ins::new_interpreter;
use brief::runtime::config::{Config, DEFAULT_MAX_CALL_DEPTH, DEFAULT_STACK_SIZE};
use brief::runtime::data_structures::value::Value;
use brief::runtime::host::{Host, StdHost};
use brief::runtime::interpreter::{CodeManagement, InterpreterStack};
use pretty_assertions::assert_eq;
use std::{env::temp_dir, fs, path::PathBuf, process, rc::Rc};

fn scratch_directory(name: &str) -> PathBuf {
    let directory = temp_dir().join(format!("brief-{}-{}", name, process::id()));

    fs::create_dir_all(&directory).expect("could not create the scratch directory");
    directory
}

#[test]
fn default_config() {
    let config = Config::default();

    assert!(config.search_paths.is_empty());
    assert_eq!(config.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
    assert_eq!(config.stack_size, DEFAULT_STACK_SIZE);
}

#[test]
fn code_is_found_on_the_search_path() {
    let directory = scratch_directory("search");

    fs::write(directory.join("twice.brief"), "[ 2 * ] \"twice\" define")
        .expect("could not write the source file");

    let config = Config::default().with_search_path(directory.clone());
    let host = Rc::new(StdHost::new(config.search_paths.clone()));

    assert_eq!(host.find_file("twice"), Some(directory.join("twice.brief")));
    assert_eq!(host.fetch("missing"), None);

    let mut interpreter = new_interpreter(config, host).expect("bootstrap failed");

    interpreter
        .process_source("<test>", "\"twice\" use \"21 twice\" eval")
        .expect("evaluation failed");

    let stack: Vec<String> = interpreter
        .stack_top_first()
        .iter()
        .map(Value::to_source)
        .collect();

    assert_eq!(stack, vec!["42"]);

    let _ = fs::remove_dir_all(&directory);
}
