//! File pickers presented by the host
//!
//! The terminal implementation drives `fzf`, or any fzf-compatible picker
//! named by `OCIDE_PICKER`. Esc (or any fzf abort) is a cancellation; a
//! missing picker binary is a `DialogError`.

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use async_trait::async_trait;
use thiserror::Error;

/// A named group of extensions; `"*"` matches any file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

impl FileFilter {
    pub fn matches(&self, path: &Path) -> bool {
        if self.extensions.contains(&"*") {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

#[derive(Debug, Error)]
pub enum DialogError {
    #[error("{0}")]
    Unavailable(String),

    #[error("file picker failed: {0}")]
    Failed(String),
}

/// Picker collaborator used by the host. `Ok(None)` means the user canceled.
#[async_trait]
pub trait Dialogs: Send + Sync {
    async fn pick_open(&self, filters: &[FileFilter]) -> Result<Option<PathBuf>, DialogError>;

    async fn pick_save(
        &self,
        default_name: &str,
        filters: &[FileFilter],
    ) -> Result<Option<PathBuf>, DialogError>;
}

/// Environment variable naming an fzf-compatible picker to use instead of `fzf`
pub const PICKER_ENV: &str = "OCIDE_PICKER";

/// fzf-backed pickers rooted at a directory
#[derive(Debug, Clone)]
pub struct FzfDialogs {
    root: PathBuf,
    picker: Picker,
}

impl FzfDialogs {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            picker: Picker {
                program: "fzf".to_string(),
                args: Vec::new(),
            },
        }
    }

    pub fn in_current_dir() -> Self {
        let dialogs = Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        match std::env::var(PICKER_ENV) {
            Ok(program) if !program.trim().is_empty() => dialogs.with_command(program.trim(), &[]),
            _ => dialogs,
        }
    }

    /// Launch the picker as `program args.. <fzf options>`
    pub fn with_command(mut self, program: impl Into<String>, args: &[&str]) -> Self {
        self.picker = Picker {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        };
        self
    }
}

#[async_trait]
impl Dialogs for FzfDialogs {
    async fn pick_open(&self, filters: &[FileFilter]) -> Result<Option<PathBuf>, DialogError> {
        let root = self.root.clone();
        let picker = self.picker.clone();
        let filters = filters.to_vec();
        tokio::task::spawn_blocking(move || {
            let files = ordered_file_list(&root, &filters);
            let header = filter_header(&filters);
            picker
                .run(&root, &files, &["--prompt=Open file: ", header.as_str()])
                .map(|picked| picked.and_then(|p| p.selection).map(|s| root.join(s)))
        })
        .await
        .map_err(|e| DialogError::Failed(e.to_string()))?
    }

    async fn pick_save(
        &self,
        default_name: &str,
        filters: &[FileFilter],
    ) -> Result<Option<PathBuf>, DialogError> {
        let root = self.root.clone();
        let picker = self.picker.clone();
        let filters = filters.to_vec();
        let query = format!("--query={}", default_name);
        tokio::task::spawn_blocking(move || {
            let files = ordered_file_list(&root, &filters);
            let header = filter_header(&filters);
            let picked = picker.run(
                &root,
                &files,
                &["--prompt=Save as: ", "--print-query", query.as_str(), header.as_str()],
            )?;
            Ok(picked.and_then(|p| save_choice(&root, p)))
        })
        .await
        .map_err(|e| DialogError::Failed(e.to_string()))?
    }
}

#[derive(Debug, PartialEq, Eq)]
struct FzfPick {
    query: Option<String>,
    selection: Option<String>,
}

/// Save target from a `--print-query` pick. The typed name is the choice;
/// the highlighted match only counts when the query was cleared.
fn save_choice(root: &Path, pick: FzfPick) -> Option<PathBuf> {
    pick.query
        .filter(|q| !q.is_empty())
        .or(pick.selection)
        .filter(|s| !s.is_empty())
        .map(|s| root.join(s))
}

/// The picker command line
#[derive(Debug, Clone)]
struct Picker {
    program: String,
    args: Vec<String>,
}

impl Picker {
    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// Spawn the picker over `entries`. `Ok(None)` when the user aborts.
    fn run(
        &self,
        cwd: &Path,
        entries: &[String],
        args: &[&str],
    ) -> Result<Option<FzfPick>, DialogError> {
        if self.command().arg("--version").output().is_err() {
            return Err(DialogError::Unavailable(format!(
                "{} not found. Install with: brew install fzf",
                self.program
            )));
        }

        let print_query = args.contains(&"--print-query");

        let mut child = self
            .command()
            .args(["--height=40%", "--layout=reverse", "--border"])
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit()) // Let fzf display its UI
            .current_dir(cwd)
            .spawn()
            .map_err(|e| DialogError::Failed(format!("failed to spawn {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            for entry in entries {
                let _ = writeln!(stdin, "{}", entry);
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| DialogError::Failed(format!("{} error: {}", self.program, e)))?;

        // 0: selection, 1: no match (query only), 130: aborted
        match output.status.code() {
            Some(0) | Some(1) => Ok(parse_pick(
                &String::from_utf8_lossy(&output.stdout),
                print_query,
            )),
            _ => Ok(None),
        }
    }
}

/// Picker stdout: the query line first when `--print-query` was passed,
/// then the highlighted entry if any
fn parse_pick(stdout: &str, print_query: bool) -> Option<FzfPick> {
    let mut lines = stdout.lines().map(|l| l.trim().to_string());
    let query = if print_query { lines.next() } else { None };
    let selection = lines.next().filter(|s| !s.is_empty());
    if query.is_none() && selection.is_none() {
        return None;
    }
    Some(FzfPick { query, selection })
}

/// `--header` argument naming the filters, e.g. `OpenCode Files (oc) | All Files (*)`
fn filter_header(filters: &[FileFilter]) -> String {
    let groups: Vec<String> = filters
        .iter()
        .map(|f| format!("{} ({})", f.name, f.extensions.join(", ")))
        .collect();
    format!("--header={}", groups.join(" | "))
}

/// Files under `root`, those matching the first filter listed first
fn ordered_file_list(root: &Path, filters: &[FileFilter]) -> Vec<String> {
    let mut files = file_list(root);
    if let Some(primary) = filters.first() {
        files.sort_by_key(|f| !primary.matches(Path::new(f)));
    }
    files
}

fn file_list(cwd: &Path) -> Vec<String> {
    // Try fd first (faster and respects .gitignore)
    if let Ok(output) = Command::new("fd")
        .args(["--type", "f", "--hidden", "--exclude", ".git"])
        .current_dir(cwd)
        .output()
    {
        if output.status.success() {
            return BufReader::new(&output.stdout[..])
                .lines()
                .map_while(Result::ok)
                .collect();
        }
    }

    // Fall back to find
    if let Ok(output) = Command::new("find")
        .args([".", "-type", "f", "-not", "-path", "*/.git/*"])
        .current_dir(cwd)
        .output()
    {
        if output.status.success() {
            return BufReader::new(&output.stdout[..])
                .lines()
                .map_while(Result::ok)
                .map(|s| s.trim_start_matches("./").to_string())
                .collect();
        }
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCES: FileFilter = FileFilter {
        name: "OpenCode Files",
        extensions: &["oc", "dev"],
    };

    #[test]
    fn filter_matches_extensions_case_insensitively() {
        assert!(SOURCES.matches(Path::new("a/b.oc")));
        assert!(SOURCES.matches(Path::new("B.DEV")));
        assert!(!SOURCES.matches(Path::new("notes.txt")));
        assert!(!SOURCES.matches(Path::new("oc")));
    }

    #[test]
    fn wildcard_filter_matches_anything() {
        let all = FileFilter {
            name: "All Files",
            extensions: &["*"],
        };
        assert!(all.matches(Path::new("Makefile")));
    }

    #[test]
    fn header_lists_filter_groups() {
        assert_eq!(
            filter_header(&[SOURCES]),
            "--header=OpenCode Files (oc, dev)"
        );
    }

    #[test]
    fn ordered_file_list_puts_sources_first() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::write(dir.path().join("b.oc"), "").unwrap();

        let files = ordered_file_list(dir.path(), &[SOURCES]);
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("b.oc"));
    }

    #[test]
    fn parse_pick_reads_query_then_selection() {
        assert_eq!(
            parse_pick("a.oc\ndata.oc\n", true),
            Some(FzfPick {
                query: Some("a.oc".into()),
                selection: Some("data.oc".into()),
            })
        );
        assert_eq!(
            parse_pick("src/b.oc\n", false),
            Some(FzfPick {
                query: None,
                selection: Some("src/b.oc".into()),
            })
        );
        assert_eq!(parse_pick("", false), None);
    }

    #[test]
    fn typed_name_is_the_save_choice() {
        let root = Path::new("/work");
        let pick = FzfPick {
            query: Some("a.oc".into()),
            selection: Some("data.oc".into()),
        };
        assert_eq!(save_choice(root, pick), Some(root.join("a.oc")));
    }

    #[test]
    fn cleared_query_falls_back_to_highlighted_file() {
        let root = Path::new("/work");
        let pick = FzfPick {
            query: Some(String::new()),
            selection: Some("data.oc".into()),
        };
        assert_eq!(save_choice(root, pick), Some(root.join("data.oc")));

        let nothing = FzfPick {
            query: Some(String::new()),
            selection: None,
        };
        assert_eq!(save_choice(root, nothing), None);
    }

    /// Dialogs over `root` whose picker prints `stdout` and exits with `code`
    #[cfg(unix)]
    fn scripted(root: &Path, scripts: &Path, stdout: &str, code: i32) -> FzfDialogs {
        let script = scripts.join("picker.sh");
        std::fs::write(
            &script,
            format!("cat > /dev/null\nprintf '{}'\nexit {}\n", stdout, code),
        )
        .unwrap();
        FzfDialogs::new(root.to_path_buf()).with_command("sh", &[script.to_str().unwrap()])
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn save_keeps_new_name_that_fuzzy_matches_existing_file() {
        let root = tempfile::tempdir().unwrap();
        let scripts = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("data.oc"), "print keep").unwrap();

        // Enter with a query that also matches data.oc
        let dialogs = scripted(root.path(), scripts.path(), "a.oc\\ndata.oc\\n", 0);
        let chosen = dialogs.pick_save("a.oc", &[SOURCES]).await.unwrap();
        assert_eq!(chosen, Some(root.path().join("a.oc")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn save_with_no_match_uses_query() {
        let root = tempfile::tempdir().unwrap();
        let scripts = tempfile::tempdir().unwrap();

        let dialogs = scripted(root.path(), scripts.path(), "fresh.oc\\n", 1);
        let chosen = dialogs.pick_save("fresh.oc", &[SOURCES]).await.unwrap();
        assert_eq!(chosen, Some(root.path().join("fresh.oc")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn aborted_picker_is_canceled() {
        let root = tempfile::tempdir().unwrap();
        let scripts = tempfile::tempdir().unwrap();

        let dialogs = scripted(root.path(), scripts.path(), "untitled.oc\\n", 130);
        assert_eq!(dialogs.pick_save("untitled.oc", &[SOURCES]).await.unwrap(), None);
        assert_eq!(dialogs.pick_open(&[SOURCES]).await.unwrap(), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn open_returns_highlighted_file() {
        let root = tempfile::tempdir().unwrap();
        let scripts = tempfile::tempdir().unwrap();

        let dialogs = scripted(root.path(), scripts.path(), "src/main.oc\\n", 0);
        let chosen = dialogs.pick_open(&[SOURCES]).await.unwrap();
        assert_eq!(chosen, Some(root.path().join("src/main.oc")));
    }

    #[tokio::test]
    async fn missing_picker_is_unavailable() {
        let root = tempfile::tempdir().unwrap();
        let dialogs = FzfDialogs::new(root.path().to_path_buf())
            .with_command("ocide-no-such-picker", &[]);
        let err = dialogs.pick_open(&[SOURCES]).await.unwrap_err();
        assert!(matches!(err, DialogError::Unavailable(msg) if msg.contains("ocide-no-such-picker")));
    }
}
