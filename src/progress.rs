// src/progress.rs

//! Progress reporting for the archive tree walk.
#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// Receives events from a tree walk as it lists directories and downloads files.
///
/// The number of files is only known once the walk is over, so reporters see a
/// running count rather than a total. All methods default to doing nothing.
///
/// # Examples
///
/// ```
/// use bitbucket::progress::ProgressReporter;
/// use std::sync::Mutex;
///
/// // Collects downloaded paths.
/// #[derive(Default)]
/// struct Recorder {
///     paths: Mutex<Vec<String>>,
/// }
///
/// impl ProgressReporter for Recorder {
///     fn file_fetched(&self, path: &str, _count: u64) {
///         self.paths.lock().unwrap().push(path.to_string());
///     }
/// }
///
/// let recorder = Recorder::default();
/// recorder.directory_listed("src");
/// recorder.file_fetched("src/main.rs", 1);
/// assert_eq!(*recorder.paths.lock().unwrap(), vec!["src/main.rs"]);
/// ```
pub trait ProgressReporter: Send + Sync {
    /// A directory listing was fetched. `dir` is repository-relative (`""` is the root).
    fn directory_listed(&self, _dir: &str) {}
    /// A file was downloaded; `count` files have been downloaded so far.
    fn file_fetched(&self, _path: &str, _count: u64) {}
    /// The walk ended, successfully or not, after downloading `total` files.
    fn walk_finished(&self, _total: u64) {}
}

/// Ignores every event. The session default.
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {}

/// A terminal spinner showing the running file count and the latest path.
#[cfg(feature = "progress")]
#[derive(Clone)]
pub struct IndicatifProgress {
    bar: ProgressBar,
}

#[cfg(feature = "progress")]
impl IndicatifProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} files  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        Self { bar }
    }
}

#[cfg(feature = "progress")]
impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "progress")]
impl ProgressReporter for IndicatifProgress {
    fn directory_listed(&self, dir: &str) {
        self.bar.set_message(format!("listing /{}", dir));
    }

    fn file_fetched(&self, path: &str, count: u64) {
        self.bar.set_position(count);
        self.bar.set_message(path.to_string());
    }

    fn walk_finished(&self, _total: u64) {
        self.bar.finish_and_clear();
    }
}
