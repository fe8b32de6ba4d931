use std::{ env::{ split_paths,
                  var,
                  var_os },
           path::PathBuf };



/// Environment variable holding extra directories to search for `use`d code, in the platform's
/// path list format.
pub const LIB_PATH_VAR: &str = "BRIEF_LIB_PATH";

/// Environment variable overriding the maximum call depth.
pub const MAX_CALL_DEPTH_VAR: &str = "BRIEF_MAX_CALL_DEPTH";

/// Environment variable overriding the evaluation thread's stack size, in bytes.
pub const STACK_SIZE_VAR: &str = "BRIEF_STACK_SIZE";

/// The default limit on nested word calls.  Only runaway recursion gets near it.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 50_000;

/// The default evaluation stack, sized so `DEFAULT_MAX_CALL_DEPTH` nested words fit.
pub const DEFAULT_STACK_SIZE: usize = 512 * 1024 * 1024;



/// Settings for an interpreter and the host it runs with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config
{
    /// Directories searched, in order, when `use` asks the host for code by name.
    pub search_paths: Vec<PathBuf>,

    /// How deeply words may call each other before evaluation is stopped.  Runaway recursion
    /// would otherwise overflow the native stack.
    pub max_call_depth: usize,

    /// The stack size of the thread evaluation runs on, see `with_evaluation_stack`.
    pub stack_size: usize
}


impl Default for Config
{
    fn default() -> Self
    {
        Config
            {
                search_paths: Vec::new(),
                max_call_depth: DEFAULT_MAX_CALL_DEPTH,
                stack_size: DEFAULT_STACK_SIZE
            }
    }
}


impl Config
{
    /// Build a configuration from the environment, falling back to the defaults for anything that
    /// isn't set.  An unparsable call depth is logged and ignored.
    pub fn from_env() -> Config
    {
        let mut config = Config::default();

        if let Some(paths) = var_os(LIB_PATH_VAR)
        {
            config.search_paths = split_paths(&paths).collect();
        }

        if let Ok(depth) = var(MAX_CALL_DEPTH_VAR)
        {
            match depth.trim().parse::<usize>()
            {
                Ok(depth) if depth > 0 => config.max_call_depth = depth,
                _ => tracing::warn!(value = %depth,
                                    "ignoring invalid {}",
                                    MAX_CALL_DEPTH_VAR)
            }
        }

        if let Ok(size) = var(STACK_SIZE_VAR)
        {
            match size.trim().parse::<usize>()
            {
                Ok(size) if size > 0 => config.stack_size = size,
                _ => tracing::warn!(value = %size,
                                    "ignoring invalid {}",
                                    STACK_SIZE_VAR)
            }
        }

        tracing::debug!(?config, "configuration loaded");
        config
    }

    /// Use the given call depth limit instead.
    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Config
    {
        self.max_call_depth = max_call_depth;
        self
    }

    /// Append a directory to the search paths.
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Config
    {
        self.search_paths.push(path.into());
        self
    }
}
