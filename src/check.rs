use std::path::PathBuf;

#[derive(clap::Args, Debug)]
/// Validate the header of each file without building a cycle
pub struct Args {
    /// Files to check
    pub files: Vec<PathBuf>,
}
