use std::rc::Rc;
use crate::{ location_here,
             lang::{ code::{ Element,
                             Quotation },
                     compilation::{ parse_source,
                                    Classify,
                                    Resolve,
                                    WordClass },
                     source_buffer::SourceLocation },
             runtime::{ config::Config,
                        data_structures::{ contextual_data::ContextualData,
                                           contextual_list::ContextualList,
                                           dictionary::{ Dictionary,
                                                         WordInfo },
                                           value::Value },
                        error::{ self,
                                 script_error,
                                 Diagnostics,
                                 ErrorKind },
                        host::Host,
                        interpreter::{ CallItem,
                                       CallStack,
                                       CodeManagement,
                                       Interpreter,
                                       InterpreterStack,
                                       PrimitiveHandler,
                                       Returned,
                                       ValueStack,
                                       WordHandler,
                                       WordHandlerInfo,
                                       WordManagement } } };



/// List of word handlers known by the interpreter.
pub type WordList = ContextualList<WordHandlerInfo>;



/// The Brief engine: a dictionary, the shared stack and everything needed to run code against
/// them.  Each session owns one, there is no global state.
pub struct BriefInterpreter
{
    config: Config,

    host: Rc<dyn Host>,

    stack: ValueStack,


    /// The last known location execution has reached in the source text.
    current_location: Option<SourceLocation>,

    call_stack: CallStack,


    dictionary: Dictionary,

    /// The executable handlers the dictionary entries point at.
    word_handlers: WordList,


    /// Lex and parse problems found since they were last taken.
    diagnostics: Diagnostics
}


impl Interpreter for BriefInterpreter
{
    fn config(&self) -> &Config
    {
        &self.config
    }

    fn host(&self) -> Rc<dyn Host>
    {
        self.host.clone()
    }

    fn dictionary(&self) -> &Dictionary
    {
        &self.dictionary
    }

    fn reset(&mut self)
    {
        self.release_context();
        self.stack.clear();
        self.call_stack.clear();
        self.current_location = None;
        self.diagnostics.clear();

        self.mark_context();
    }
}


impl ContextualData for BriefInterpreter
{
    fn mark_context(&mut self)
    {
        self.dictionary.mark_context();
        self.word_handlers.mark_context();
    }

    fn release_context(&mut self)
    {
        self.dictionary.release_context();
        self.word_handlers.release_context();
    }
}


impl InterpreterStack for BriefInterpreter
{
    fn stack(&self) -> &ValueStack
    {
        &self.stack
    }

    fn push(&mut self, value: Value)
    {
        self.stack.push(value);
    }

    fn pop(&mut self) -> error::Result<Value>
    {
        match self.stack.pop()
        {
            Some(value) => Ok(value),
            None =>
                {
                    let word = self.call_stack.last()
                                              .map(|item| item.word().clone())
                                              .unwrap_or_default();

                    script_error(self, ErrorKind::StackUnderflow { word, needed: 1, found: 0 })
                }
        }
    }

    fn clear_stack(&mut self)
    {
        self.stack.clear();
    }
}


impl CodeManagement for BriefInterpreter
{
    fn process_source(&mut self, name: &str, source: &str) -> error::Result<()>
    {
        let ( code, diagnostics ) = parse_source(self, name, source);

        self.diagnostics.extend(diagnostics);
        self.execute_code(&code)
    }

    fn execute_code(&mut self, code: &Quotation) -> error::Result<()>
    {
        for instruction in code.iter()
        {
            if let Some(location) = &instruction.location
            {
                self.current_location = Some(location.clone());
            }

            match &instruction.element
            {
                Element::Literal { value, .. } => self.push(value.clone()),

                Element::Quote(quotation) => self.push(Value::List(quotation.clone())),

                Element::Word(word) =>
                    {
                        let location = self.call_location(instruction.location.as_ref());
                        self.execute_word(&location, word)?;
                    },

                Element::Unknown(name) => tracing::trace!(word = %name, "skipping unknown word")
            }
        }

        Ok(())
    }

    fn take_diagnostics(&mut self) -> Diagnostics
    {
        std::mem::take(&mut self.diagnostics)
    }
}


impl WordManagement for BriefInterpreter
{
    fn current_location(&self) -> &Option<SourceLocation>
    {
        &self.current_location
    }

    fn add_word(&mut self,
                location: SourceLocation,
                name: String,
                handler: WordHandler,
                description: String,
                signature: String)
    {
        let mut word_info = WordInfo::new(location.clone(), name.clone(), handler.word_type());

        tracing::debug!(word = %name, kind = %word_info.word_type, "defining word");

        let info = WordHandlerInfo::new(name.clone(), handler);

        word_info.handler_index = self.word_handlers.insert(info);
        word_info.description = description;
        word_info.signature = signature;

        self.dictionary.insert(name, word_info);
    }

    fn word_handler_info(&self, index: usize) -> Option<&WordHandlerInfo>
    {
        self.word_handlers.get(index)
    }

    fn execute_word(&mut self,
                    location: &SourceLocation,
                    word: &WordHandlerInfo)
        -> error::Result<()>
    {
        if self.call_stack.len() >= self.config.max_call_depth
        {
            return script_error(self, ErrorKind::CallDepthExceeded(self.config.max_call_depth));
        }

        tracing::trace!(word = %word.name(), %location, "executing");

        self.current_location = Some(location.clone());
        self.call_stack.push(CallItem::new(word.name().clone(), location.clone()));

        let result = match word.handler()
            {
                WordHandler::Primitive { arity, handler } => self.call_primitive(word.name(),
                                                                                 *arity,
                                                                                 handler.as_ref()),
                WordHandler::Secondary(body) => self.execute_code(body)
            };

        let _ = self.call_stack.pop();

        result
    }

    fn call_stack(&self) -> &CallStack
    {
        &self.call_stack
    }
}


impl Resolve for BriefInterpreter
{
    fn bind_word(&self, name: &str) -> Option<WordHandlerInfo>
    {
        let word = self.dictionary.try_get(name)?;

        self.word_handler_info(word.handler_index).cloned()
    }
}


impl Classify for BriefInterpreter
{
    fn classify(&self, token: &str) -> WordClass
    {
        self.dictionary.classify(token)
    }
}


impl BriefInterpreter
{
    /// Create an interpreter with an empty dictionary.  Nothing is defined, not even the
    /// primitives, see `built_ins::bootstrap` for that.  A context is marked above the root one so
    /// reset always has something to release.
    pub fn new(config: Config, host: Rc<dyn Host>) -> BriefInterpreter
    {
        let mut interpreter = BriefInterpreter
            {
                config,
                host,

                stack: ValueStack::with_capacity(20),

                current_location: None,
                call_stack: CallStack::with_capacity(40),

                dictionary: Dictionary::new(),
                word_handlers: WordList::new(),

                diagnostics: Diagnostics::new()
            };

        interpreter.mark_context();
        interpreter
    }

    /// Where a word is being called from.  Code built at run time has no location of its own, so
    /// fall back to the last known location, then to the native caller.
    fn call_location(&self, location: Option<&SourceLocation>) -> SourceLocation
    {
        match ( location, &self.current_location )
        {
            ( Some(location), _ ) => location.clone(),
            ( None, Some(current) ) => current.clone(),
            ( None, None ) => location_here!()
        }
    }

    /// Run a primitive.  The arity is checked before anything is popped so a failing word leaves
    /// the stack as it found it.
    fn call_primitive(&mut self,
                      name: &str,
                      arity: usize,
                      handler: &PrimitiveHandler)
        -> error::Result<()>
    {
        let found = self.stack.len();

        if found < arity
        {
            return script_error(self,
                                ErrorKind::StackUnderflow { word: name.to_string(),
                                                            needed: arity,
                                                            found });
        }

        let arguments = self.stack.split_off(found - arity);

        match handler(self, arguments)?
        {
            Returned::Nothing => (),
            Returned::Value(value) => self.push(value),
            Returned::Values(values) =>
                {
                    for value in values
                    {
                        self.push(value);
                    }
                }
        }

        Ok(())
    }
}
