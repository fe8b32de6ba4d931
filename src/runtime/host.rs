use std::{ cell::RefCell,
           collections::HashMap,
           fs::read_to_string,
           path::PathBuf };



/// The file extension given to Brief source files.
pub const SOURCE_EXTENSION: &str = "brief";



/// Side effects the language needs from its surroundings.  The `alert` and `use` words call
/// through this, and the embedding application decides what they mean.
///
/// Fetching is synchronous, any waiting for storage is the host's business.
pub trait Host
{
    /// Show a message to the user.
    fn alert(&self, message: &str);

    /// Look up a named piece of code, returning its source text if there is one.
    fn fetch(&self, name: &str) -> Option<String>;
}



/// A host for running on a desktop.  Alerts go to stdout and code is loaded from `<name>.brief`
/// files.
pub struct StdHost
{
    search_paths: Vec<PathBuf>
}


impl StdHost
{
    pub fn new(search_paths: Vec<PathBuf>) -> StdHost
    {
        StdHost { search_paths }
    }

    /// Find a source file for the name.  The name is tried as a path first, then in each of the
    /// search paths in order.  Both the name as given and the name with the source extension are
    /// tried.
    pub fn find_file(&self, name: &str) -> Option<PathBuf>
    {
        let candidates = [ PathBuf::from(name),
                           PathBuf::from(format!("{}.{}", name, SOURCE_EXTENSION)) ];

        for candidate in candidates.iter()
        {
            if candidate.is_file()
            {
                return Some(candidate.clone());
            }
        }

        for directory in self.search_paths.iter()
        {
            for candidate in candidates.iter()
            {
                let full_path = directory.join(candidate);

                if full_path.is_file()
                {
                    return Some(full_path);
                }
            }
        }

        None
    }
}


impl Host for StdHost
{
    fn alert(&self, message: &str)
    {
        println!("{}", message);
    }

    fn fetch(&self, name: &str) -> Option<String>
    {
        let path = self.find_file(name)?;

        match read_to_string(&path)
        {
            Ok(source) =>
                {
                    tracing::debug!(path = %path.display(), "loaded source");
                    Some(source)
                },

            Err(error) =>
                {
                    tracing::warn!(path = %path.display(), %error, "could not read source");
                    None
                }
        }
    }
}



/// A host that keeps everything in memory.  Code is looked up in a map and alerts are recorded so
/// they can be inspected afterwards.
#[derive(Default)]
pub struct MemoryHost
{
    sources: HashMap<String, String>,
    alerts: RefCell<Vec<String>>
}


impl MemoryHost
{
    pub fn new() -> MemoryHost
    {
        MemoryHost::default()
    }

    /// Make a piece of code available under the given name.
    pub fn with_source(mut self, name: &str, source: &str) -> MemoryHost
    {
        let _ = self.sources.insert(name.to_string(), source.to_string());
        self
    }

    /// Every message alerted so far, oldest first.
    pub fn alerts(&self) -> Vec<String>
    {
        self.alerts.borrow().clone()
    }
}


impl Host for MemoryHost
{
    fn alert(&self, message: &str)
    {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn fetch(&self, name: &str) -> Option<String>
    {
        self.sources.get(name).cloned()
    }
}
