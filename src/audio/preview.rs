//! Track previews through an external player
//!
//! The player runs as a child process with its output discarded. While it
//! plays we poll every 100ms for either its exit or a line on stdin; a line
//! stops playback with SIGTERM, escalating to a kill if the player does not
//! exit in time.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::tags::probe_duration;
use crate::settings::Settings;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const TERMINATE_GRACE: Duration = Duration::from_millis(500);
const REAP_INTERVAL: Duration = Duration::from_millis(10);

/// Plays a track while the user decides what to do with it
pub trait Previewer {
    fn preview(&mut self, path: &Path) -> Result<(), String>;
}

/// Previewer that does nothing
#[derive(Debug, Default)]
pub struct NoPreview;

impl Previewer for NoPreview {
    fn preview(&mut self, _path: &Path) -> Result<(), String> {
        Ok(())
    }
}

/// Previewer backed by `ffplay` (or a compatible player)
#[derive(Debug, Clone)]
pub struct PlayerPreview {
    player: PathBuf,
    offset: Duration,
}

impl PlayerPreview {
    pub fn new(player: PathBuf, offset: Duration) -> Self {
        Self { player, offset }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, String> {
        let player = find_player(settings.player_path.as_deref())?;
        log::debug!("Using player at {}", player.display());
        Ok(Self::new(
            player,
            Duration::from_secs(settings.preview_offset_secs),
        ))
    }

    /// Where playback starts: the configured offset, or 0 for short tracks
    pub fn start_offset(&self, path: &Path) -> Duration {
        match probe_duration(path) {
            Ok(duration) if duration > self.offset => self.offset,
            Ok(_) => Duration::ZERO,
            Err(e) => {
                log::debug!("Could not read duration of {}: {}", path.display(), e);
                self.offset
            }
        }
    }

    fn spawn(&self, path: &Path, offset: Duration) -> Result<Child, String> {
        Command::new(&self.player)
            .arg("-ss")
            .arg(offset.as_secs().to_string())
            .arg("-nodisp")
            .arg("-autoexit")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| format!("Failed to start {}: {}", self.player.display(), e))
    }
}

impl Previewer for PlayerPreview {
    fn preview(&mut self, path: &Path) -> Result<(), String> {
        let offset = self.start_offset(path);
        let mut child = self.spawn(path, offset)?;
        log::debug!(
            "Previewing {} from {}s (pid {})",
            path.display(),
            offset.as_secs(),
            child.id()
        );

        println!("   (press Enter to stop playback)");

        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    log::debug!("Player exited with {}", status);
                    break;
                }
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Failed to check player status: {}", e);
                    stop_player(&mut child);
                    break;
                }
            }

            if stdin_line_ready(POLL_INTERVAL) {
                if !drain_stdin_line() {
                    log::debug!("Input closed, stopping playback");
                }
                stop_player(&mut child);
                break;
            }
        }

        println!("   Playback stopped");
        Ok(())
    }
}

/// Resolve the player binary: the configured path, else `ffplay` on PATH
pub fn find_player(configured: Option<&Path>) -> Result<PathBuf, String> {
    if let Some(path) = configured {
        return if path.exists() {
            Ok(path.to_path_buf())
        } else {
            Err(format!("Player not found at {}", path.display()))
        };
    }

    let name = if cfg!(windows) { "ffplay.exe" } else { "ffplay" };
    find_in_path(name).ok_or_else(|| format!("{} not found on PATH", name))
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Ask the player to exit, then kill it if it is still running
fn stop_player(child: &mut Child) {
    #[cfg(unix)]
    if unsafe { libc::kill(child.id() as i32, libc::SIGTERM) } == -1 {
        log::warn!(
            "Failed to send SIGTERM to player (pid {}): {}",
            child.id(),
            std::io::Error::last_os_error()
        );
    }

    if wait_with_timeout(child, TERMINATE_GRACE) {
        return;
    }

    log::debug!("Player ignored SIGTERM, killing pid {}", child.id());
    if let Err(e) = child.kill() {
        log::warn!("Failed to kill player: {}", e);
    }
    let _ = child.wait();
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return true,
            Ok(None) if Instant::now() < deadline => thread::sleep(REAP_INTERVAL),
            _ => return false,
        }
    }
}

#[cfg(unix)]
fn stdin_line_ready(timeout: Duration) -> bool {
    let mut fds = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    let ready = unsafe { libc::poll(&mut fds, 1, timeout.as_millis() as libc::c_int) };
    ready > 0 && (fds.revents & libc::POLLIN) != 0
}

/// Consume the pending input line; returns false at end of input or on error
#[cfg(unix)]
fn drain_stdin_line() -> bool {
    let mut buf = [0u8; 256];
    let read = unsafe {
        libc::read(
            libc::STDIN_FILENO,
            buf.as_mut_ptr() as *mut libc::c_void,
            buf.len(),
        )
    };
    if read < 0 {
        log::debug!("Failed to read stdin: {}", std::io::Error::last_os_error());
    }
    input_consumed(read)
}

/// A `read` of zero is end of input and a negative one is an error
#[cfg(unix)]
fn input_consumed(read: libc::ssize_t) -> bool {
    read > 0
}

// Without poll() there is no way to peek at stdin, so playback runs to the end.
#[cfg(not(unix))]
fn stdin_line_ready(timeout: Duration) -> bool {
    thread::sleep(timeout);
    false
}

#[cfg(not(unix))]
fn drain_stdin_line() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::write_flac;
    use tempfile::TempDir;

    #[test]
    fn test_no_preview_is_ok() {
        assert!(NoPreview.preview(Path::new("/nonexistent.flac")).is_ok());
    }

    #[test]
    fn test_configured_player_must_exist() {
        let result = find_player(Some(Path::new("/nonexistent/ffplay")));
        assert!(result.is_err());
    }

    #[test]
    fn test_configured_player_is_used() {
        let dir = TempDir::new().unwrap();
        let player = dir.path().join("player");
        std::fs::write(&player, "").unwrap();
        assert_eq!(find_player(Some(&player)).unwrap(), player);
    }

    #[test]
    fn test_short_track_starts_at_zero() {
        let dir = TempDir::new().unwrap();
        let path = write_flac(dir.path(), "short.flac", &[]);
        let preview = PlayerPreview::new(PathBuf::from("ffplay"), Duration::from_secs(60));
        assert_eq!(preview.start_offset(&path), Duration::ZERO);
    }

    #[test]
    fn test_unreadable_track_keeps_offset() {
        let preview = PlayerPreview::new(PathBuf::from("ffplay"), Duration::from_secs(60));
        assert_eq!(
            preview.start_offset(Path::new("/nonexistent.flac")),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn test_missing_player_fails_to_start() {
        let mut preview =
            PlayerPreview::new(PathBuf::from("/nonexistent/ffplay"), Duration::from_secs(60));
        assert!(preview.preview(Path::new("/nonexistent.flac")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_player_that_exits_is_reaped() {
        let Some(player) = find_in_path("true") else {
            return;
        };
        let mut preview = PlayerPreview::new(player, Duration::from_secs(60));
        assert!(preview.preview(Path::new("/nonexistent.flac")).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_stop_player_terminates_long_process() {
        // SIGTERM alone ends `sleep`, well inside the kill fallback
        let Some(sleep) = find_in_path("sleep") else {
            return;
        };
        let mut child = Command::new(sleep).arg("30").spawn().unwrap();
        let started = Instant::now();
        stop_player(&mut child);
        assert!(child.try_wait().unwrap().is_some());
        assert!(started.elapsed() < TERMINATE_GRACE + Duration::from_secs(1));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_result_end_of_input() {
        assert!(input_consumed(1));
        assert!(input_consumed(12));
        assert!(!input_consumed(0));
        assert!(!input_consumed(-1));
    }
}
