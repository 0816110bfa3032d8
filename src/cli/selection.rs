//! Working-directory selection
//!
//! When the requested directory does not exist the user is shown the
//! subdirectories of the current directory that hold reflection-list files
//! and asked to pick one by number or to type a path. The prompt repeats
//! until an existing directory is given.

use anyhow::{Context, Result};
use colored::*;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::discovery::FileDiscovery;

/// A subdirectory offered for selection
#[derive(Debug, Clone)]
pub struct CandidateDirectory {
    pub name: String,
    pub path: PathBuf,
    pub reflection_files: usize,
}

/// Subdirectories of `root` holding at least one `*.<extension>` file, by name
pub fn find_candidate_directories(root: &Path, extension: &str) -> Result<Vec<CandidateDirectory>> {
    let mut candidates = Vec::new();

    for entry in std::fs::read_dir(root)
        .with_context(|| format!("Failed to read directory {}", root.display()))?
    {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let Ok(discovery) = FileDiscovery::new(path.clone()) else {
            continue;
        };
        let reflection_files = discovery.find(extension).map(|f| f.len()).unwrap_or(0);
        if reflection_files == 0 {
            continue;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        candidates.push(CandidateDirectory {
            name,
            path,
            reflection_files,
        });
    }

    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(candidates)
}

/// Resolve the working directory, prompting while it does not exist.
///
/// `interactive == false` turns a missing directory into an error. Candidates
/// are listed from `search_root`. Input is read line by line from `input`;
/// end of input aborts the selection.
pub fn resolve_working_directory<R: BufRead, W: Write>(
    requested: Option<PathBuf>,
    search_root: &Path,
    extension: &str,
    interactive: bool,
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf> {
    let mut current = requested;

    loop {
        if let Some(path) = current.as_ref().filter(|p| p.is_dir()) {
            return Ok(path.clone());
        }

        let shown = current
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none given)".to_string());
        if !interactive {
            anyhow::bail!("There is no directory: {}", shown);
        }

        writeln!(output, "{} {}", "There is no directory:".bright_red(), shown)?;
        writeln!(
            output,
            "{}",
            format!("Navigate to the directory where your .{} files are located.", extension)
                .bright_white()
        )?;

        let candidates = find_candidate_directories(search_root, extension)?;
        if !candidates.is_empty() {
            writeln!(output)?;
            for (i, candidate) in candidates.iter().enumerate() {
                writeln!(
                    output,
                    "  {}. {} {}",
                    (i + 1).to_string().bright_yellow().bold(),
                    candidate.name.bright_cyan(),
                    format!("({} .{} files)", candidate.reflection_files, extension).bright_black()
                )?;
            }
            writeln!(output)?;
        }
        write!(output, "{}", "Directory (number or path): ".bright_white())?;
        output.flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("Failed to read user input")?;
        if read == 0 {
            anyhow::bail!("No directory selected");
        }

        current = Some(interpret_selection(line.trim(), &candidates));
    }
}

/// A number picks a listed candidate; anything else is taken as a path
fn interpret_selection(answer: &str, candidates: &[CandidateDirectory]) -> PathBuf {
    match answer.parse::<usize>() {
        Ok(n) if n >= 1 && n <= candidates.len() => candidates[n - 1].path.clone(),
        _ => PathBuf::from(answer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn workspace() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let run_b = temp_dir.path().join("run_b");
        let run_a = temp_dir.path().join("run_a");
        let empty = temp_dir.path().join("empty");
        for dir in [&run_a, &run_b, &empty] {
            fs::create_dir(dir).unwrap();
        }
        fs::write(run_a.join("phase.prf"), "").unwrap();
        fs::write(run_b.join("one.prf"), "").unwrap();
        fs::write(run_b.join("two.prf"), "").unwrap();
        fs::write(empty.join("notes.txt"), "").unwrap();
        temp_dir
    }

    #[test]
    fn test_candidates_only_with_reflection_files() {
        let temp_dir = workspace();
        let candidates = find_candidate_directories(temp_dir.path(), "prf").unwrap();

        let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["run_a", "run_b"]);
        assert_eq!(candidates[1].reflection_files, 2);
    }

    #[test]
    fn test_existing_directory_needs_no_prompt() {
        let temp_dir = workspace();
        let mut output = Vec::<u8>::new();
        let resolved = resolve_working_directory(
            Some(temp_dir.path().to_path_buf()),
            temp_dir.path(),
            "prf",
            false,
            &mut Cursor::new(""),
            &mut output,
        )
        .unwrap();

        assert_eq!(resolved, temp_dir.path());
        assert!(output.is_empty());
    }

    #[test]
    fn test_non_interactive_missing_directory_fails() {
        let temp_dir = workspace();
        let result = resolve_working_directory(
            Some(temp_dir.path().join("missing")),
            temp_dir.path(),
            "prf",
            false,
            &mut Cursor::new("1\n"),
            &mut Vec::<u8>::new(),
        );
        assert!(result.unwrap_err().to_string().contains("There is no directory"));
    }

    #[test]
    fn test_prompt_retries_until_valid() {
        let temp_dir = workspace();
        let mut output = Vec::<u8>::new();
        // Out-of-range number is a path that does not exist, then pick run_b
        let mut input = Cursor::new("7\n2\n");
        let resolved = resolve_working_directory(
            None,
            temp_dir.path(),
            "prf",
            true,
            &mut input,
            &mut output,
        )
        .unwrap();

        assert_eq!(resolved, temp_dir.path().join("run_b"));
        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown.matches("Directory (number or path)").count(), 2);
    }

    #[test]
    fn test_typed_path_and_end_of_input() {
        let temp_dir = workspace();
        let typed = temp_dir.path().join("empty");
        let mut input = Cursor::new(format!("{}\n", typed.display()));
        let resolved = resolve_working_directory(
            None,
            temp_dir.path(),
            "prf",
            true,
            &mut input,
            &mut Vec::<u8>::new(),
        )
        .unwrap();
        assert_eq!(resolved, typed);

        let result = resolve_working_directory(
            None,
            temp_dir.path(),
            "prf",
            true,
            &mut Cursor::new(""),
            &mut Vec::<u8>::new(),
        );
        assert!(result.is_err());
    }
}
