//! tagkit - command-line tools for bulk audio metadata editing
//!
//! Each subcommand is one independent tool: fix cover art, move tracks by a
//! comment keyword, sort tracks into genre folders, strip a file name prefix,
//! strip a comment marker, or set genres from folder names.

mod audio;
mod core;
mod logging;
mod settings;
#[cfg(test)]
mod test_fixtures;
mod tools;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::audio::{NoPreview, PlayerPreview, Previewer};
use crate::core::{DirectoryKind, Prompt};
use crate::settings::Settings;
use crate::tools::genre_from_folder::Scope;
use crate::tools::move_by_keyword::KeywordMove;
use crate::tools::sort_by_genre::GenreSorter;

#[derive(Parser, Debug)]
#[command(version, about = "Bulk audio metadata tools", long_about = None)]
struct Args {
    #[arg(short, long, help = "Show debug output on the terminal.")]
    verbose: bool,
    #[arg(short = 'c', long = "config", value_name = "FILE", help = "Settings file to use.")]
    config_file: Option<PathBuf>,
    #[command(subcommand)]
    subcommand: SubCommand,
}

#[derive(Debug, Subcommand)]
enum SubCommand {
    /// Re-embed the first picture of each file as its only front cover
    #[command(arg_required_else_help = true)]
    FixArtwork {
        /// Audio files or folders (searched recursively).
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
    },
    /// Move files whose comment contains a keyword
    MoveByKeyword {
        /// Folder with the audio files; asked for when missing.
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// Folder to move matching files to; asked for when missing.
        #[arg(short, long)]
        dest: Option<PathBuf>,
        /// Keyword to look for, case-insensitive; asked for when missing.
        #[arg(short, long)]
        keyword: Option<String>,
    },
    /// Move files into folders named after their genre
    SortByGenre {
        /// Folder with the audio files; chosen from a menu when missing.
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// Folder holding the genre folders; chosen from a menu when missing.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Do not play tracks while asking for a folder.
        #[arg(long)]
        no_preview: bool,
    },
    /// Remove a prefix from the names of the files in a folder
    StripPrefix {
        /// Folder whose entries are renamed.
        #[arg(default_value = ".", value_name = "DIR")]
        dir: PathBuf,
        /// Prefix to remove; defaults to the configured one.
        #[arg(short, long)]
        prefix: Option<String>,
    },
    /// Remove a marker such as "color=" from comments
    #[command(arg_required_else_help = true)]
    StripComment {
        /// Audio files or folders (searched recursively).
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
        /// Marker to remove; defaults to the configured one.
        #[arg(short, long)]
        marker: Option<String>,
    },
    /// Set the genre of each file from its folder name
    GenreFromFolder {
        /// Folder to process; "." means each subfolder. A menu is shown when missing.
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Use each immediate subfolder's name for the files directly inside it.
        #[arg(long)]
        subfolders: bool,
    },
    /// Show the settings in effect
    Config {
        /// Write the settings in effect to the settings file.
        #[arg(long)]
        save: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(log_path) = logging::init_logging(args.verbose) {
        log::debug!("Logging to {}", log_path.display());
    }

    let settings = match Settings::load(args.config_file.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(args.subcommand, &settings, args.config_file.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(subcommand: SubCommand, settings: &Settings, config_file: Option<&Path>) -> Result<(), String> {
    match subcommand {
        SubCommand::FixArtwork { paths } => {
            tools::fix_artwork::run(&paths);
        }
        SubCommand::MoveByKeyword {
            source,
            dest,
            keyword,
        } => {
            let mut prompt = Prompt::stdio();
            match KeywordMove::resolve(source, dest, keyword, &mut prompt)? {
                Some(job) => {
                    job.run()?;
                }
                None => println!("Stopped by user"),
            }
        }
        SubCommand::SortByGenre {
            source,
            output,
            no_preview,
        } => {
            let mut prompt = Prompt::stdio();
            let Some(source) = pick_directory(source, DirectoryKind::Source, &mut prompt)? else {
                println!("Stopped by user");
                return Ok(());
            };
            let Some(output) = pick_directory(output, DirectoryKind::Output, &mut prompt)? else {
                println!("Stopped by user");
                return Ok(());
            };

            let mut previewer = previewer(settings, no_preview);
            GenreSorter::new(
                output,
                settings.unknown_genre.clone(),
                &mut prompt,
                previewer.as_mut(),
            )
            .run(&source)?;
        }
        SubCommand::StripPrefix { dir, prefix } => {
            let prefix = prefix.unwrap_or_else(|| settings.filename_prefix.clone());
            tools::strip_prefix::run(&dir, &prefix)?;
        }
        SubCommand::StripComment { paths, marker } => {
            let marker = marker.unwrap_or_else(|| settings.comment_marker.clone());
            tools::strip_comment::run(&paths, &marker)?;
        }
        SubCommand::GenreFromFolder { dir, subfolders } => {
            let mut prompt = Prompt::stdio();
            match Scope::resolve(dir, subfolders, &mut prompt)? {
                Some(scope) => {
                    tools::genre_from_folder::run(&scope)?;
                }
                None => println!("Stopped by user"),
            }
        }
        SubCommand::Config { save } => show_config(settings, config_file, save)?,
    }
    Ok(())
}

/// Use the directory from the command line, or ask for one
fn pick_directory<R: std::io::BufRead, W: std::io::Write>(
    given: Option<PathBuf>,
    kind: DirectoryKind,
    prompt: &mut Prompt<R, W>,
) -> Result<Option<PathBuf>, String> {
    match given {
        Some(dir) => Ok(Some(dir)),
        None => prompt.choose_directory(kind),
    }
}

/// The player preview, or silence when it is disabled or no player is found
fn previewer(settings: &Settings, disabled: bool) -> Box<dyn Previewer> {
    if disabled {
        return Box::new(NoPreview);
    }
    match PlayerPreview::from_settings(settings) {
        Ok(player) => Box::new(player),
        Err(e) => {
            log::warn!("Previews disabled: {}", e);
            Box::new(NoPreview)
        }
    }
}

fn show_config(settings: &Settings, config_file: Option<&Path>, save: bool) -> Result<(), String> {
    let path = config_file
        .map(Path::to_path_buf)
        .or_else(Settings::default_path)
        .ok_or("Could not determine the settings location")?;

    if save {
        settings.save_to(&path)?;
        println!("Saved settings to {}", path.display());
    }

    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;
    println!("Settings file: {}", path.display());
    if let Some(log_file) = logging::get_log_file_path() {
        println!("Log file: {}", log_file.display());
    }
    println!("{}", json);
    Ok(())
}
