use crate::{
    editor::{Editor, printing},
    lang::compilation::{Classify, WordClass},
    runtime::{
        built_ins::{base_words::word_words::validate_word_name, new_interpreter},
        config::Config,
        data_structures::value::Value,
        error::{self, Diagnostics, ScriptError},
        host::Host,
        interpreter::{
            CodeManagement, Interpreter, InterpreterStack, brief_interpreter::BriefInterpreter,
        },
    },
};
use std::rc::Rc;

/// The name given to the editor's code in source locations.
pub const EDITOR_SOURCE_NAME: &str = "<editor>";

/// The name given to the source of words defined from selections.
pub const DEFINITION_SOURCE_NAME: &str = "<definition>";

/// The result of running the code up to the cursor.
#[derive(Clone, Debug, Default)]
pub struct Evaluation {
    /// The source text that was run.
    pub source: String,

    /// The stack after the run, top first.
    pub stack: Vec<Value>,

    /// Lexing and parsing problems.  These never stop the run.
    pub diagnostics: Diagnostics,

    /// The error that stopped the run, if one did.
    pub error: Option<ScriptError>,
}

impl Evaluation {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// The ways defining a word from the selection can fail.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Nothing is selected.")]
    NoSelection,

    #[error("A new word needs a name.")]
    EmptyName,

    #[error("Names cannot begin with double quotes.")]
    QuotedName,

    #[error("Invalid word name '{name}': {reason}.")]
    InvalidName { name: String, reason: &'static str },

    /// The name already means something, a word or a literal, and overwriting wasn't asked for.
    #[error("'{0}' is already defined.")]
    AlreadyDefined(String),

    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// One edit to the code tree.
#[derive(Clone, Debug, PartialEq)]
pub enum EditCommand {
    MovePrev {
        step_in: bool,
        step_out: bool,
        select: bool,
    },
    MoveNext {
        step_in: bool,
        step_out: bool,
        select: bool,
    },
    MoveFirst {
        select: bool,
    },
    MoveLast {
        select: bool,
    },
    InsertWord(String),
    InsertList,
    CloseList,
    InsertSource(String),
    DeletePrev {
        step_in: bool,
        step_out: bool,
    },
    DeleteNext {
        step_in: bool,
        step_out: bool,
    },
    SelectAll,
    SelectNone,
    Quote,
    Unquote,
}

/// The live loop.  Owns an editor and an engine, and after every edit resets the engine and runs
/// the code up to the cursor from scratch.
///
/// Deeply recursive code needs a big native stack, drive the session from inside
/// `with_evaluation_stack` when that matters.
pub struct Session {
    editor: Editor,
    interpreter: BriefInterpreter,

    /// Words defined from selections, as `(name, source)`, oldest first.  Replayed in order after
    /// every reset, so each one binds the words that were current when it was made.
    definitions: Vec<(String, String)>,

    evaluation: Evaluation,
}

impl Session {
    pub fn new(config: Config, host: Rc<dyn Host>) -> error::Result<Session> {
        let interpreter = new_interpreter(config, host)?;

        Ok(Session {
            editor: Editor::new(),
            interpreter,
            definitions: Vec::new(),
            evaluation: Evaluation::default(),
        })
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn interpreter(&self) -> &BriefInterpreter {
        &self.interpreter
    }

    /// The result of the last evaluation.
    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    /// The stack after the last evaluation, top first.
    pub fn stack(&self) -> &[Value] {
        &self.evaluation.stack
    }

    pub fn definitions(&self) -> &[(String, String)] {
        &self.definitions
    }

    /// Every defined word name, sorted.
    pub fn words(&self) -> Vec<String> {
        self.interpreter.word_names()
    }

    /// The editor state as a line of text.
    pub fn render(&self) -> String {
        printing::render(&self.editor)
    }

    /// Apply an edit and run the result.  Returns whether the edit did anything.
    pub fn apply(&mut self, command: EditCommand) -> bool {
        tracing::trace!(?command, "edit");

        let editor = &mut self.editor;
        let classifier: &dyn Classify = &self.interpreter;

        let changed = match command {
            EditCommand::MovePrev {
                step_in,
                step_out,
                select,
            } => editor.move_prev(step_in, step_out, select),

            EditCommand::MoveNext {
                step_in,
                step_out,
                select,
            } => editor.move_next(step_in, step_out, select),

            EditCommand::MoveFirst { select } => editor.move_first(select),
            EditCommand::MoveLast { select } => editor.move_last(select),

            EditCommand::InsertWord(name) => {
                let _ = editor.insert_word(classifier, &name);
                true
            }

            EditCommand::InsertList => {
                let _ = editor.insert_list();
                true
            }

            EditCommand::CloseList => editor.close_list(),

            EditCommand::InsertSource(source) => {
                editor.insert_source(classifier, &source);
                true
            }

            EditCommand::DeletePrev { step_in, step_out } => editor.delete_prev(step_in, step_out),
            EditCommand::DeleteNext { step_in, step_out } => editor.delete_next(step_in, step_out),

            EditCommand::SelectAll => {
                editor.select_all();
                true
            }

            EditCommand::SelectNone => {
                editor.select_none();
                true
            }

            EditCommand::Quote => editor.quote_selection().is_some(),
            EditCommand::Unquote => editor.unquote(),
        };

        let _ = self.refresh();
        changed
    }

    /// Replace the editor's contents with the given source and run it.
    pub fn load(&mut self, source: &str) -> &Evaluation {
        self.editor.clear();
        self.editor.insert_source(&self.interpreter, source);

        self.refresh()
    }

    /// Run the code up to the cursor, then reclassify the tree so words the code defined show as
    /// words.
    pub fn refresh(&mut self) -> &Evaluation {
        let source = self.editor.source_to_cursor();

        let _ = self.evaluate(&source);
        self.editor.reclassify(&self.interpreter);

        &self.evaluation
    }

    /// Reset the engine to its bootstrap state, replay the definitions and run the source.  The
    /// result depends only on the source and the definitions.
    pub fn evaluate(&mut self, source: &str) -> &Evaluation {
        self.interpreter.reset();

        for (name, definition) in self.definitions.iter() {
            if let Err(error) = self
                .interpreter
                .process_source(DEFINITION_SOURCE_NAME, definition)
            {
                tracing::warn!(%name, %error, "could not replay definition");
            }
        }

        let _ = self.interpreter.take_diagnostics();
        self.interpreter.clear_stack();

        let error = self
            .interpreter
            .process_source(EDITOR_SOURCE_NAME, source)
            .err();

        let diagnostics = self.interpreter.take_diagnostics();

        if let Some(error) = &error {
            tracing::debug!(%error, "evaluation stopped");
        }

        self.evaluation = Evaluation {
            source: source.to_string(),
            stack: self.interpreter.stack_top_first(),
            diagnostics,
            error,
        };

        tracing::debug!(
            source = %self.evaluation.source,
            depth = self.evaluation.stack.len(),
            "evaluated"
        );

        &self.evaluation
    }

    /// Turn the selection into a new word.  The selected code becomes the word's body and is
    /// replaced in the tree by a single use of the word, so the program means the same as before.
    ///
    /// Names that already mean something, words or literals, are only replaced when `overwrite`
    /// is set.
    pub fn define_selection(&mut self, name: &str, overwrite: bool) -> Result<(), SessionError> {
        let Some(source) = self.editor.selection_source() else {
            return Err(SessionError::NoSelection);
        };

        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }

        if name.starts_with('"') {
            return Err(SessionError::QuotedName);
        }

        if let Err(reason) = validate_word_name(name) {
            return Err(SessionError::InvalidName {
                name: name.to_string(),
                reason,
            });
        }

        if !overwrite && self.interpreter.classify(name) != WordClass::Unknown {
            return Err(SessionError::AlreadyDefined(name.to_string()));
        }

        let definition = format!("[ {}] {} define", source, Value::stringify(name));

        self.interpreter
            .process_source(DEFINITION_SOURCE_NAME, &definition)?;

        tracing::debug!(%name, %definition, "defined word from selection");

        self.definitions.push((name.to_string(), definition));

        let _ = self.editor.delete_selection();
        let _ = self.editor.insert_word(&self.interpreter, name);
        let _ = self.refresh();

        Ok(())
    }

    /// Complete a partly typed token.  Unknown tokens complete to the first word they prefix,
    /// then to `true` or `false`, and an open string gets its closing quote.
    pub fn complete(&self, token: &str) -> String {
        if token.is_empty() {
            return String::new();
        }

        if self.interpreter.classify(token) == WordClass::Unknown
            && let Some(word) = self
                .interpreter
                .word_names()
                .into_iter()
                .find(|word| word.starts_with(token))
        {
            return word;
        }

        for literal in ["true", "false"] {
            if literal.starts_with(token) {
                return literal.to_string();
            }
        }

        if token.starts_with('"') && (token.len() == 1 || !token.ends_with('"')) {
            return format!("{}\"", token);
        }

        token.to_string()
    }
}
