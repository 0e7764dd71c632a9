use log::debug;

use super::{
    Entry, Error, ExecError, Executor, IpSet, Result, SystemExecutor, listing::Listing,
};

/// Name of the ipset utility looked up on `PATH`
pub const IPSET_CMD: &str = "ipset";

/// Arguments appended to every invocation to get XML output
pub const IPSET_CMD_MANDATORY_ARGS: [&str; 2] = ["-o", "xml"];

/// Set and entry lifecycle operations against the kernel's ipset state
///
/// Every call is a single synchronous request; nothing is cached between
/// calls. Implementations must be safe to share between threads.
pub trait IpSetInterface: Send + Sync {
    /// Validate `set` and create it; `ignore_exist` passes `-exist`
    fn create_set(&self, set: &IpSet, ignore_exist: bool) -> Result<()>;

    fn destroy_set(&self, name: &str) -> Result<()>;

    /// Names of all sets, in the order ipset reports them
    fn list_sets(&self) -> Result<Vec<String>>;

    /// Members of the named set
    fn list_entries(&self, name: &str) -> Result<Vec<Entry>>;

    /// Current specification of the named set, `None` if ipset omits it
    fn describe_set(&self, name: &str) -> Result<Option<IpSet>>;

    /// Add `entry` to the set; `ignore_exist` passes `-exist`
    fn add_entry(&self, entry: &Entry, name: &str, ignore_exist: bool) -> Result<()>;

    fn del_entry(&self, element: &str, name: &str) -> Result<()>;
}

/// [`IpSetInterface`] that shells out to the ipset utility
pub struct Runner<E> {
    exec: E,
    command: String,
}

impl Runner<SystemExecutor> {
    /// Runner spawning the real `ipset` binary
    pub fn system() -> Self { Runner::new(SystemExecutor) }
}

impl<E: Executor> Runner<E> {
    pub fn new(exec: E) -> Self {
        Runner {
            exec,
            command: IPSET_CMD.to_string(),
        }
    }

    /// Use a different binary, e.g. an absolute path
    pub fn with_command(mut self, command: &str) -> Self {
        self.command = command.to_string();
        self
    }

    pub fn command(&self) -> &str { &self.command }

    fn run(&self, mut args: Vec<String>) -> std::result::Result<Vec<u8>, ExecError> {
        args.extend(IPSET_CMD_MANDATORY_ARGS.iter().map(|arg| arg.to_string()));
        debug!("IPSET [EXEC] [{} {}].", self.command, args.join(" "));
        self.exec.combined_output(&self.command, &args)
    }

    fn list(&self, args: Vec<String>, context: impl Fn() -> String) -> Result<Listing> {
        let output = self.run(args).map_err(|source| Error::Exec {
            context: context(),
            source,
        })?;

        Listing::parse(&String::from_utf8_lossy(&output)).map_err(|source| Error::Decode {
            context: context(),
            source,
        })
    }
}

fn args(args: &[&str]) -> Vec<String> { args.iter().map(|arg| arg.to_string()).collect() }

impl<E: Executor> IpSetInterface for Runner<E> {
    fn create_set(&self, set: &IpSet, ignore_exist: bool) -> Result<()> {
        set.validate().map_err(|source| Error::Validation {
            name: set.name.clone(),
            source,
        })?;

        let mut cmd_args = args(&["create", &set.name]);
        cmd_args.extend(set.create_args());
        if ignore_exist {
            cmd_args.push("-exist".to_string());
        }

        self.run(cmd_args).map_err(|source| Error::Exec {
            context: format!("error creating set {set}"),
            source,
        })?;
        debug!("IPSET [CREATE] [{}].", set.name);

        Ok(())
    }

    fn destroy_set(&self, name: &str) -> Result<()> {
        self.run(args(&["destroy", name]))
            .map_err(|source| Error::Exec {
                context: format!("error destroying set {name}"),
                source,
            })?;
        debug!("IPSET [DESTROY] [{}].", name);

        Ok(())
    }

    fn list_sets(&self) -> Result<Vec<String>> {
        let listing = self.list(args(&["list", "-n"]), || "error listing all sets".to_string())?;
        Ok(listing.names())
    }

    fn list_entries(&self, name: &str) -> Result<Vec<Entry>> {
        let listing = self.list(args(&["list", name]), || {
            format!("error listing entries of set {name}")
        })?;
        Ok(listing.entries(name))
    }

    fn describe_set(&self, name: &str) -> Result<Option<IpSet>> {
        let listing = self.list(args(&["list", name]), || format!("error describing set {name}"))?;
        Ok(listing.describe(name))
    }

    fn add_entry(&self, entry: &Entry, name: &str, ignore_exist: bool) -> Result<()> {
        let mut cmd_args = args(&["add", name, &entry.element]);
        if let Some(comment) = entry.comment() {
            cmd_args.extend(args(&["comment", comment]));
        }
        if ignore_exist {
            cmd_args.push("-exist".to_string());
        }

        self.run(cmd_args).map_err(|source| Error::Exec {
            context: format!("error adding entry {entry} to set {name}"),
            source,
        })?;
        debug!("IPSET [ADD] [{}] [{}].", name, entry.element);

        Ok(())
    }

    fn del_entry(&self, element: &str, name: &str) -> Result<()> {
        self.run(args(&["del", name, element]))
            .map_err(|source| Error::Exec {
                context: format!("error deleting entry {element} from set {name}"),
                source,
            })?;
        debug!("IPSET [DEL] [{}] [{}].", name, element);

        Ok(())
    }
}
