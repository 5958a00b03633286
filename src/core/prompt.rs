//! Interactive prompts
//!
//! All questions go through [`Prompt`], which reads from any `BufRead` and
//! writes to any `Write` so the interactive tools can be driven from tests.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use super::scanning::subdirectories;

/// Answers that end the session wherever they are typed
const QUIT_WORDS: [&str; 5] = ["q", "quit", "exit", "выход", "0"];

/// What the user typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Quit,
}

/// Which directory a menu is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    /// Must already exist
    Source,
    /// Created when missing
    Output,
}

impl DirectoryKind {
    fn question(&self) -> &'static str {
        match self {
            DirectoryKind::Source => "Where should audio files be looked for?",
            DirectoryKind::Output => "Where should genre folders be created?",
        }
    }
}

/// Result of the subfolder menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderChoice {
    One(PathBuf),
    All,
}

pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl Prompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's stdin/stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a line of text
    pub fn say(&mut self, text: &str) -> Result<(), String> {
        writeln!(self.output, "{}", text).map_err(|e| format!("Failed to write prompt: {}", e))
    }

    /// Ask a question and read one trimmed line
    ///
    /// A quit word or end of input yields [`Answer::Quit`].
    pub fn ask(&mut self, text: &str) -> Result<Answer, String> {
        write!(self.output, "{}", text).map_err(|e| format!("Failed to write prompt: {}", e))?;
        self.output
            .flush()
            .map_err(|e| format!("Failed to flush prompt: {}", e))?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| format!("Failed to read input: {}", e))?;
        if read == 0 {
            return Ok(Answer::Quit);
        }

        Ok(parse_answer(&line))
    }

    /// Ask a question, using `default` when the answer is empty
    pub fn ask_with_default(&mut self, text: &str, default: &str) -> Result<Answer, String> {
        match self.ask(&format!("{} ({}): ", text, default))? {
            Answer::Text(text) if text.is_empty() => Ok(Answer::Text(default.to_string())),
            other => Ok(other),
        }
    }

    /// Ask for a non-empty value
    pub fn ask_required(&mut self, text: &str) -> Result<Answer, String> {
        loop {
            match self.ask(text)? {
                Answer::Text(value) if value.is_empty() => self.say("Value cannot be empty.")?,
                other => return Ok(other),
            }
        }
    }

    /// Menu choosing between the current directory and a typed path
    ///
    /// Returns `None` when the user quits.
    pub fn choose_directory(&mut self, kind: DirectoryKind) -> Result<Option<PathBuf>, String> {
        let current = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| ".".to_string());

        self.say("")?;
        self.say(kind.question())?;
        self.say("  1. Current directory")?;
        self.say(&format!("     {}", current))?;
        self.say("  2. Another directory")?;
        self.say("  q. Quit")?;

        loop {
            let choice = match self.ask("Choose an option (1-2, q to quit): ")? {
                Answer::Quit => return Ok(None),
                Answer::Text(choice) => choice,
            };

            match choice.as_str() {
                "1" => return Ok(Some(PathBuf::from("."))),
                "2" => {
                    let path = match self.ask("Enter a path (q to quit): ")? {
                        Answer::Quit => return Ok(None),
                        Answer::Text(path) => path,
                    };
                    if path.is_empty() {
                        self.say("Path cannot be empty!")?;
                        continue;
                    }
                    let path = PathBuf::from(path);
                    match kind {
                        DirectoryKind::Source if !path.is_dir() => {
                            self.say(&format!("Directory {} does not exist!", path.display()))?;
                            continue;
                        }
                        DirectoryKind::Output => {
                            if let Err(e) = fs::create_dir_all(&path) {
                                self.say(&format!("Failed to create directory: {}", e))?;
                                continue;
                            }
                        }
                        DirectoryKind::Source => {}
                    }
                    return Ok(Some(path));
                }
                _ => self.say("Invalid choice! Enter 1 or 2")?,
            }
        }
    }

    /// Numbered list of the subfolders of `root`, plus an "all folders" entry
    ///
    /// Returns `None` when the user quits or there is nothing to choose.
    pub fn choose_subfolder(&mut self, root: &Path) -> Result<Option<FolderChoice>, String> {
        let folders = subdirectories(root)?;

        self.say("")?;
        self.say(&format!("Folders in: {}", root.display()))?;
        if folders.is_empty() {
            self.say("No folders found!")?;
            return Ok(None);
        }

        for (i, folder) in folders.iter().enumerate() {
            let name = folder
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            self.say(&format!("{:2}. {}", i + 1, name))?;
        }
        let all = folders.len() + 1;
        self.say(&format!("{:2}. All folders", all))?;
        self.say(" 0. Quit")?;

        loop {
            let choice = match self.ask(&format!("Choose a folder (1-{}, 0 to quit): ", all))? {
                Answer::Quit => return Ok(None),
                Answer::Text(choice) => choice,
            };

            match choice.parse::<usize>() {
                Ok(n) if n == all => return Ok(Some(FolderChoice::All)),
                Ok(n) if (1..all).contains(&n) => {
                    return Ok(Some(FolderChoice::One(folders[n - 1].clone())));
                }
                Ok(_) => self.say(&format!("Invalid choice! Enter a number from 0 to {}", all))?,
                Err(_) => self.say("Enter a valid number!")?,
            }
        }
    }
}

/// Classify one line of input
pub fn parse_answer(line: &str) -> Answer {
    let trimmed = line.trim();
    let lower = trimmed.to_lowercase();
    if QUIT_WORDS.contains(&lower.as_str()) {
        Answer::Quit
    } else {
        Answer::Text(trimmed.to_string())
    }
}
