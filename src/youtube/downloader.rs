//! Audio download through `yt-dlp`

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Error, Result};

const ID_LOOKUP_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs `yt-dlp` to resolve ids and pull the audio track of a video
#[derive(Debug, Clone)]
pub struct AudioDownloader {
    program: PathBuf,
    timeout: Duration,
}

impl AudioDownloader {
    /// Use `path` when given, otherwise look `yt-dlp` up in PATH
    pub fn locate(path: Option<&Path>, timeout: Duration) -> Result<Self> {
        let program = match path {
            Some(p) => p.to_path_buf(),
            None => which::which("yt-dlp").map_err(|_| {
                Error::Config("yt-dlp not found in PATH; set YT_DLP_PATH".to_string())
            })?,
        };
        Ok(Self { program, timeout })
    }

    async fn run(&self, args: &[&str], timeout: Duration) -> Result<Output> {
        debug!("Running {} {}", self.program.display(), args.join(" "));

        let mut cmd = Command::new(&self.program);
        cmd.args(args).kill_on_drop(true);

        match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(Error::Transcription(format!(
                "Failed to execute '{}': {}",
                self.program.display(),
                e
            ))),
            Err(_) => Err(Error::Timeout(format!(
                "yt-dlp timed out after {} seconds",
                timeout.as_secs()
            ))),
        }
    }

    /// Ask `yt-dlp` for the id of an arbitrary video URL
    pub async fn resolve_id(&self, input: &str) -> Result<String> {
        let output = self
            .run(
                &["--print", "id", "--no-warnings", "--skip-download", "--", input],
                ID_LOOKUP_TIMEOUT,
            )
            .await?;

        let id = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .map(|l| l.trim().to_string())
            .unwrap_or_default();

        if !output.status.success() || id.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "Could not extract a video id from '{}'",
                input
            )));
        }
        Ok(id)
    }

    /// Download the lowest-quality audio of `source` (a URL or id yt-dlp
    /// understands) into `dir` as Opus.
    ///
    /// Returns the path of the audio file; `dir` is owned by the caller.
    pub async fn download_audio(&self, source: &str, dir: &Path) -> Result<PathBuf> {
        let stem = format!("audio_{}", uuid::Uuid::new_v4().simple());
        let template = dir
            .join(format!("{}.%(ext)s", stem))
            .to_string_lossy()
            .into_owned();

        info!("Downloading audio from {}", source);

        let output = self
            .run(
                &[
                    "-f",
                    "worstaudio/worst",
                    "-x",
                    "--audio-format",
                    "opus",
                    "--no-playlist",
                    "--no-warnings",
                    "-o",
                    template.as_str(),
                    "--",
                    source,
                ],
                self.timeout,
            )
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Transcription(format!(
                "yt-dlp failed for {}: {}",
                source,
                stderr.trim()
            )));
        }

        find_audio_file(dir, &stem)
    }
}

/// Canonical watch URL for a YouTube video id
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Locate the file yt-dlp wrote for `stem`, whatever extension it ended with
fn find_audio_file(dir: &Path, stem: &str) -> Result<PathBuf> {
    let path = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|p| {
            p.file_stem().and_then(|s| s.to_str()) == Some(stem)
                && p.extension().and_then(|e| e.to_str()) != Some("part")
        })
        .ok_or_else(|| Error::Transcription("Audio file was not produced".to_string()))?;

    if std::fs::metadata(&path)?.len() == 0 {
        return Err(Error::Transcription("Downloaded audio file is empty".to_string()));
    }
    Ok(path)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Shell script standing in for yt-dlp: logs its argv, prints `id`
    #[cfg(unix)]
    pub(crate) fn fake_yt_dlp(dir: &Path, id: &str) -> (PathBuf, PathBuf) {
        use std::os::unix::fs::PermissionsExt;

        let log = dir.join("argv.log");
        let script = dir.join("yt-dlp");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\nprintf '%s\\n' \"$*\" >> '{}'\necho {}\n",
                log.display(),
                id
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        (script, log)
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_input_never_parsed_as_option() {
        let bin = TempDir::new().unwrap();
        let (script, log) = fake_yt_dlp(bin.path(), "abc");
        let downloader =
            AudioDownloader::locate(Some(script.as_path()), Duration::from_secs(5)).unwrap();

        assert_eq!(downloader.resolve_id("--version").await.unwrap(), "abc");

        let out = TempDir::new().unwrap();
        let _ = downloader.download_audio("--batch-file=/etc/passwd", out.path()).await;

        let argv = std::fs::read_to_string(&log).unwrap();
        let lines: Vec<&str> = argv.lines().collect();
        assert_eq!(lines[0], "--print id --no-warnings --skip-download -- --version");
        assert!(lines[1].ends_with("-- --batch-file=/etc/passwd"));
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            watch_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_find_audio_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("audio_x.opus"), b"OggS").unwrap();
        std::fs::write(dir.path().join("other.opus"), b"OggS").unwrap();

        let found = find_audio_file(dir.path(), "audio_x").unwrap();
        assert_eq!(found.file_name().unwrap(), "audio_x.opus");
    }

    #[test]
    fn test_missing_or_empty_audio() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            find_audio_file(dir.path(), "audio_y"),
            Err(Error::Transcription(_))
        ));

        std::fs::write(dir.path().join("audio_y.opus"), b"").unwrap();
        assert!(matches!(
            find_audio_file(dir.path(), "audio_y"),
            Err(Error::Transcription(_))
        ));
    }

    #[test]
    fn test_explicit_path_skips_lookup() {
        let downloader =
            AudioDownloader::locate(Some(Path::new("/opt/bin/yt-dlp")), Duration::from_secs(5))
                .unwrap();
        assert_eq!(downloader.program, PathBuf::from("/opt/bin/yt-dlp"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_reported() {
        let downloader = AudioDownloader::locate(
            Some(Path::new("/nonexistent/yt-dlp")),
            Duration::from_secs(5),
        )
        .unwrap();
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            downloader
                .download_audio(&watch_url("dQw4w9WgXcQ"), dir.path())
                .await,
            Err(Error::Transcription(_))
        ));
    }
}
